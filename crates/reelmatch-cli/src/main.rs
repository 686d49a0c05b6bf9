use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use reelmatch_etl::Config;

mod commands;
mod logging;

#[derive(Debug, Parser)]
#[command(name = "reelmatch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/reelmatch/reelmatch.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log at debug level regardless of the configured level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Import records from a JSON file
    ///
    /// The file holds an array of objects with a required `title` and
    /// optional `description`, `genre`, `year`, and `image` fields. Records
    /// whose title is already in the catalog are skipped.
    Import {
        /// Path to the JSON file
        path: PathBuf,
    },
    /// Attach image files to the records they depict
    ///
    /// Every image in the folder (.jpg, .jpeg, .png, .webp) is matched to a
    /// record by its file name:
    ///
    /// - Placeholder names (Screenshot_2023, IMG_0042, ...) are skipped
    /// - Known prefixes (poster_, m_, ...) and numeric suffixes (_2, (1)) are
    ///   removed
    /// - The cleaned name is compared exactly, then as a substring, then by
    ///   fuzzy ratio, then by word overlap
    ///
    /// Matched records store "<images_subdir>/<file name>". Unmatched files
    /// are listed with up to three suggestions.
    LinkImages {
        /// Image folder (default: <media_root>/<images_subdir>)
        #[arg(long)]
        folder: Option<PathBuf>,

        /// Resolve and report without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Show how a single file name or label would be matched
    Resolve {
        /// The label, e.g. "poster_the_matrix_2"
        label: String,
    },
    /// Fetch embeddings for records that lack one
    Embed {
        /// Re-embed records that already have a vector
        #[arg(long)]
        force: bool,
    },
    /// Recommend the record closest to a free-text description
    Recommend {
        /// The description, e.g. "a heist thriller in Los Angeles"
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Show the embedding of a random record
    ShowEmbedding,
    /// Show catalog status
    Status,
    /// Run the link-images → embed pipeline
    Process {
        /// Image folder (default: <media_root>/<images_subdir>)
        #[arg(long)]
        folder: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print a config value, or the whole config file
    Get {
        /// Key such as `embedding_model` or `matching.fuzzy_accept`
        key: Option<String>,
    },
    /// Set a value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.db {
        Some(db) => Config::load_with_db_path(db)?,
        None => Config::load()?,
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging)?;

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    match cli.command {
        Commands::Import { path } => {
            commands::run_import(&config.database_path, &path)?;
        }
        Commands::LinkImages { folder, dry_run } => {
            commands::run_link_images(&config, folder, dry_run)?;
        }
        Commands::Resolve { label } => {
            commands::run_resolve(&config, &label)?;
        }
        Commands::Embed { force } => {
            commands::run_embed(&config, force).await?;
        }
        Commands::Recommend { prompt } => {
            commands::run_recommend(&config, &prompt.join(" ")).await?;
        }
        Commands::ShowEmbedding => {
            commands::show_random_embedding(&config.database_path)?;
        }
        Commands::Status => {
            commands::show_status(&config)?;
        }
        Commands::Process { folder } => {
            commands::run_process(&config, folder).await?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show_config(&config)?,
            ConfigCommands::Get { key } => commands::config::get_config(&config, key)?,
            ConfigCommands::Set { key, value } => commands::config::set_config(&key, &value)?,
            ConfigCommands::Path => commands::config::show_path(),
            ConfigCommands::Example => commands::config::show_example(),
            ConfigCommands::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
