//! Common utilities shared across CLI commands.

use std::path::Path;

use trackspeed::config::ConfigFile;

use crate::error::CliError;

/// Load the configuration file.
///
/// Uses `path` when given, otherwise `~/.trackspeed/config.ini`. A missing
/// file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let result = match path {
        Some(path) => ConfigFile::load_from(path),
        None => ConfigFile::load(),
    };
    result.map_err(|e| CliError::Config(e.to_string()))
}

/// Resolve the provider API key from CLI args and config.
///
/// The CLI argument takes precedence. Blank keys count as missing.
pub fn resolve_api_key(cli_api_key: Option<String>, config: &ConfigFile) -> Result<String, CliError> {
    cli_api_key
        .or_else(|| config.provider.api_key.clone())
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or(CliError::MissingApiKey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_key_takes_precedence() {
        let mut config = ConfigFile::default();
        config.provider.api_key = Some("file-key".to_string());

        let key = resolve_api_key(Some("cli-key".to_string()), &config).unwrap();
        assert_eq!(key, "cli-key");
    }

    #[test]
    fn test_falls_back_to_config_key() {
        let mut config = ConfigFile::default();
        config.provider.api_key = Some(" file-key ".to_string());

        assert_eq!(resolve_api_key(None, &config).unwrap(), "file-key");
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = ConfigFile::default();
        assert!(matches!(
            resolve_api_key(Some("  ".to_string()), &config),
            Err(CliError::MissingApiKey)
        ));
    }

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = load_config(Some(&temp.path().join("absent.ini"))).unwrap();
        assert_eq!(config, ConfigFile::default());
    }
}
