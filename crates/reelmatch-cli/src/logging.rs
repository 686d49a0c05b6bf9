use anyhow::{anyhow, Result};
use reelmatch_etl::config::LoggingConfig;

/// Install the global logger.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let opts = twyg::OptsBuilder::new()
        .coloured(config.coloured)
        .level(level(&config.level)?)
        .report_caller(config.report_caller)
        .build()
        .map_err(|e| anyhow!("Invalid logging options: {e:?}"))?;

    twyg::setup(opts).map_err(|e| anyhow!("Failed to initialise logging: {e:?}"))?;
    Ok(())
}

fn level(name: &str) -> Result<twyg::LogLevel> {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(twyg::LogLevel::Trace),
        "debug" => Ok(twyg::LogLevel::Debug),
        "info" => Ok(twyg::LogLevel::Info),
        "warn" | "warning" => Ok(twyg::LogLevel::Warn),
        "error" => Ok(twyg::LogLevel::Error),
        other => Err(anyhow!(
            "Unknown log level {other:?} (expected trace, debug, info, warn, or error)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert!(level("DEBUG").is_ok());
        assert!(level(" warning ").is_ok());
        assert!(level("loud").is_err());
    }
}
