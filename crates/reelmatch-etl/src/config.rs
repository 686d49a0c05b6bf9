use anyhow::{Context, Result};
use confyg::{env, Confygery};
use reelmatch_search::{Thresholds, Vocabulary};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for reelmatch.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (REEL_* prefix)
/// 3. Config file (~/.config/reelmatch/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API key for the embedding provider (required for `embed` and
    /// `recommend`).
    ///
    /// Can be set via:
    /// - ENV: REEL_OPENAI_API_KEY
    /// - Config: openai_api_key = "..."
    pub openai_api_key: Option<String>,

    /// Embedding model name sent with every request.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Embeddings endpoint of an OpenAI-compatible API.
    #[serde(default = "default_embedding_endpoint")]
    pub embedding_endpoint: String,

    /// Path to the SQLite database.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: REEL_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/reelmatch/reelmatch.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Directory that stored image paths are relative to.
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,

    /// Image folder below `media_root`; also the prefix of stored image
    /// paths.
    #[serde(default = "default_images_subdir")]
    pub images_subdir: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Matcher thresholds.
    #[serde(default)]
    pub matching: Thresholds,

    /// Filename prefixes, generic basenames, and image extensions.
    #[serde(default)]
    pub vocabulary: Vocabulary,
}

/// Logger settings applied by the binary at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
    pub coloured: bool,
    pub report_caller: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            coloured: true,
            report_caller: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            embedding_model: default_embedding_model(),
            embedding_endpoint: default_embedding_endpoint(),
            database_path: default_db_path(),
            media_root: default_media_root(),
            images_subdir: default_images_subdir(),
            logging: LoggingConfig::default(),
            matching: Thresholds::default(),
            vocabulary: Vocabulary::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/reelmatch/config.toml
    /// Reads environment variables with REEL_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("reel");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with custom database path.
    ///
    /// This is used when the --db CLI flag is provided.
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.database_path = db_path;
        Ok(config)
    }

    /// The folder scanned by the image-link batch.
    #[must_use]
    pub fn image_folder(&self) -> PathBuf {
        self.media_root.join(&self.images_subdir)
    }
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_endpoint() -> String {
    "https://api.openai.com/v1/embeddings".to_string()
}

fn default_images_subdir() -> String {
    "movie/images".to_string()
}

/// Returns: ~/.local/share/reelmatch/reelmatch.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    data_dir().join("reelmatch.db")
}

/// Returns: ~/.local/share/reelmatch/media (or platform equivalent)
fn default_media_root() -> PathBuf {
    data_dir().join("media")
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reelmatch")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/reelmatch/config.toml
/// - macOS: ~/Library/Application Support/reelmatch/config.toml
/// - Windows: %APPDATA%\reelmatch\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reelmatch")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Reelmatch Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (REEL_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# API key for the embedding provider
# Required by `reelmatch embed` and `reelmatch recommend`
#
# Can also be set via:
# - Environment: REEL_OPENAI_API_KEY=your-key-here
openai_api_key = "your-openai-api-key-here"

# Embedding model and endpoint of an OpenAI-compatible API
#embedding_model = "text-embedding-3-small"
#embedding_endpoint = "https://api.openai.com/v1/embeddings"

# Path to the SQLite database
#
# Can also be set via:
# - CLI: reelmatch --db /custom/path.db status
# - Environment: REEL_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/reelmatch.db"

# Image files are read from <media_root>/<images_subdir>, and stored on
# each record as "<images_subdir>/<file name>"
#media_root = "/srv/reelmatch/media"
#images_subdir = "movie/images"

[logging]
level = "info"
coloured = true
report_caller = false

# Matcher thresholds (similarity ratios between 0.0 and 1.0)
[matching]
#shortlist_cutoff = 0.72
#fuzzy_accept = 0.76
#token_overlap_accept = 0.4
#suggestion_cutoff = 0.6
#shortlist_size = 5
#suggestion_count = 3

# Filename vocabulary
[vocabulary]
#prefixes = ["m_", "poster_", "cover_", "img_", "image_", "foto_", "screenshot_", "cap_", "captura_", "sin_titulo_", "sintitulo_", "unnamed_"]
#generic_basenames = ["captura", "sintitulo", "sin titulo", "sintítul", "unnamed", "default", "image", "img", "photo", "foto", "screenshot"]
#image_extensions = ["jpg", "jpeg", "png", "webp"]
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.database_path.as_os_str().is_empty());
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.embedding_model, "text-embedding-3-small");
        assert_eq!(config.images_subdir, "movie/images");
        assert_eq!(config.matching, Thresholds::default());
    }

    #[test]
    fn test_image_folder() {
        let config = Config {
            media_root: PathBuf::from("/srv/media"),
            ..Config::default()
        };
        assert_eq!(config.image_folder(), PathBuf::from("/srv/media/movie/images"));
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_with_custom_db_path() {
        let custom_path = PathBuf::from("/tmp/test.db");
        let config = Config::load_with_db_path(custom_path.clone());
        assert!(config.is_ok());
        assert_eq!(config.unwrap().database_path, custom_path);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(config.logging, LoggingConfig::default());
        assert!(example_config().contains("[matching]"));
    }
}
