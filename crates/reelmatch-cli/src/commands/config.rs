use anyhow::{Context, Result};
use toml_edit::{value, DocumentMut, Item, Table};

use reelmatch_etl::{config, Config};

/// Keys accepted by `config get` and `config set`, with their value kind.
const KEYS: &[(&str, Kind)] = &[
    ("openai_api_key", Kind::Str),
    ("embedding_model", Kind::Str),
    ("embedding_endpoint", Kind::Str),
    ("database_path", Kind::Str),
    ("media_root", Kind::Str),
    ("images_subdir", Kind::Str),
    ("logging.level", Kind::Str),
    ("logging.coloured", Kind::Bool),
    ("logging.report_caller", Kind::Bool),
    ("matching.shortlist_cutoff", Kind::Ratio),
    ("matching.fuzzy_accept", Kind::Ratio),
    ("matching.token_overlap_accept", Kind::Ratio),
    ("matching.suggestion_cutoff", Kind::Ratio),
    ("matching.shortlist_size", Kind::Count),
    ("matching.suggestion_count", Kind::Count),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Str,
    Bool,
    Ratio,
    Count,
}

fn kind_of(key: &str) -> Result<Kind> {
    KEYS.iter()
        .find(|(name, _)| *name == key)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| {
            let valid: Vec<&str> = KEYS.iter().map(|(name, _)| *name).collect();
            anyhow::anyhow!("Unknown config key: {key}\n\nValid keys: {}", valid.join(", "))
        })
}

/// Mask all but the last four characters of a secret.
fn mask(secret: &str) -> String {
    let visible: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{visible}")
}

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    let path = config::config_file_path();
    println!("Config file: {}", path.display());
    println!(
        "File exists: {}\n",
        if path.exists() { "yes" } else { "no (using defaults)" }
    );

    let mut shown = config.clone();
    shown.openai_api_key = shown.openai_api_key.as_deref().map(mask);
    let rendered = toml::to_string_pretty(&shown).context("Failed to render configuration")?;
    print!("{rendered}");

    println!("\nPriority: CLI args > ENV vars (REEL_*) > Config file > Defaults");
    Ok(())
}

/// Get a specific config value, or print the config file.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    let Some(key) = key else {
        let config_path = config::config_file_path();
        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{contents}");
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'reelmatch config init' to create it.");
        }
        return Ok(());
    };

    kind_of(&key)?;
    let tree = toml::Value::try_from(config).context("Failed to render configuration")?;
    let found = key
        .split('.')
        .try_fold(&tree, |node, part| node.get(part));
    match found {
        Some(toml::Value::String(s)) => println!("{s}"),
        Some(other) => println!("{other}"),
        None => println!("<not set>"),
    }
    Ok(())
}

/// Write `raw` under a dotted `key` in a TOML document, keeping comments
/// and layout.
fn apply_setting(doc: &mut DocumentMut, key: &str, raw: &str) -> Result<()> {
    let new_value = match kind_of(key)? {
        Kind::Str => value(raw),
        Kind::Bool => value(
            raw.parse::<bool>()
                .with_context(|| format!("{key} expects true or false"))?,
        ),
        Kind::Ratio => {
            let ratio: f64 = raw
                .parse()
                .with_context(|| format!("{key} expects a number"))?;
            if !(0.0..=1.0).contains(&ratio) {
                anyhow::bail!("{key} must be between 0.0 and 1.0");
            }
            value(ratio)
        }
        Kind::Count => value(
            raw.parse::<i64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow::anyhow!("{key} expects a positive integer"))?,
        ),
    };

    match key.split_once('.') {
        Some((section, field)) => {
            let table = doc
                .entry(section)
                .or_insert_with(|| Item::Table(Table::new()))
                .as_table_mut()
                .ok_or_else(|| anyhow::anyhow!("[{section}] is not a table"))?;
            table[field] = new_value;
        }
        None => doc[key] = new_value,
    }
    Ok(())
}

/// Set a config value.
pub fn set_config(key: &str, raw: &str) -> Result<()> {
    let config_path = config::config_file_path();
    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let mut doc: DocumentMut = contents.parse().context("Config file is not valid TOML")?;

    apply_setting(&mut doc, key, raw)?;

    std::fs::write(&config_path, doc.to_string()).context("Failed to write config file")?;

    println!("✓ Updated {key} = {raw}");
    println!("  in {}", config_path.display());
    Ok(())
}

/// Show the config file path.
pub fn show_path() {
    println!("{}", config::config_file_path().display());
}

/// Show example configuration.
pub fn show_example() {
    print!("{}", config::example_config());
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure reelmatch.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
