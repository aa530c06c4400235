//! Settings resolution.
//!
//! Precedence: command-line flag, then environment variable (both handled
//! by clap), then the config file, then built-in defaults.

use crate::cli::Cli;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Console used when neither flag, env nor config file name one.
pub const DEFAULT_CONSOLE_URL: &str = "http://localhost:8080/console";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "GLU_CONSOLE_CONFIG";

/// Get the default config file path
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("glu").join("console-cli.toml"))
}

// ============================================================================
// Config file
// ============================================================================

/// Optional defaults read from `console-cli.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    pub console: Option<String>,
    pub fabric: Option<String>,
    pub user: Option<String>,
    pub password_file: Option<String>,
    pub api_version: Option<String>,
}

impl FileConfig {
    /// Load the config file; a missing file yields the empty config.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load a specific config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

// ============================================================================
// Resolved settings
// ============================================================================

/// Connection settings after merging every source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub console: String,
    pub fabric: String,
    pub user: String,
    pub password_file: Option<PathBuf>,
    pub api_version: String,
}

impl Settings {
    /// Merge flags with the config file. Errors are usage messages.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, String> {
        let fabric = cli
            .fabric
            .clone()
            .or(file.fabric)
            .filter(|f| !f.is_empty())
            .ok_or_else(|| "Fabric must be specified".to_string())?;

        let console = cli
            .console
            .clone()
            .or(file.console)
            .unwrap_or_else(|| DEFAULT_CONSOLE_URL.to_string());
        if console.is_empty() {
            return Err("Console URL must be specified".to_string());
        }

        let user = cli
            .user
            .clone()
            .or(file.user)
            .or_else(login_user)
            .ok_or_else(|| "User must be specified".to_string())?;

        let password_file = cli.password_file.clone().or_else(|| {
            file.password_file
                .map(|p| PathBuf::from(shellexpand::tilde(&p).into_owned()))
        });

        Ok(Self {
            console,
            fabric,
            user,
            password_file,
            api_version: file
                .api_version
                .unwrap_or_else(|| glurest::DEFAULT_API_VERSION.to_string()),
        })
    }
}

/// Name of the user running the process.
fn login_user() -> Option<String> {
    ["LOGNAME", "USER", "USERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("console-cli").chain(args.iter().copied())).unwrap()
    }

    /// Parse `args`, dropping whatever clap filled in from GLU_* variables.
    fn without_env(args: &[&str]) -> Cli {
        let mut parsed = cli(args);
        let given = |short: &str| args.contains(&short);
        if !given("-c") {
            parsed.console = None;
        }
        if !given("-f") {
            parsed.fabric = None;
        }
        if !given("-u") {
            parsed.user = None;
        }
        parsed
    }

    #[test]
    fn test_missing_config_file_is_empty() {
        let config = FileConfig::load_from(Path::new("/nonexistent/console-cli.toml")).unwrap();
        assert!(config.fabric.is_none());
        assert!(config.console.is_none());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "console = \"https://glu.example.com\"").unwrap();
        writeln!(file, "fabric = \"prod\"").unwrap();
        writeln!(file, "api_version = \"v2\"").unwrap();

        let config = FileConfig::load_from(file.path()).unwrap();
        assert_eq!(config.console.as_deref(), Some("https://glu.example.com"));
        assert_eq!(config.fabric.as_deref(), Some("prod"));
        assert_eq!(config.api_version.as_deref(), Some("v2"));
    }

    #[test]
    fn test_malformed_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fabric = ").unwrap();
        assert!(FileConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn test_unknown_config_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fabrik = \"prod\"").unwrap();
        assert!(FileConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let file = FileConfig {
            console: Some("https://from-file".to_string()),
            fabric: Some("file-fabric".to_string()),
            user: Some("file-user".to_string()),
            ..Default::default()
        };
        let settings = Settings::resolve(
            &cli(&["-f", "flag-fabric", "-c", "https://from-flag", "-u", "alice", "status"]),
            file,
        )
        .unwrap();

        assert_eq!(settings.fabric, "flag-fabric");
        assert_eq!(settings.console, "https://from-flag");
        assert_eq!(settings.user, "alice");
        assert_eq!(settings.api_version, "v1");
    }

    #[test]
    fn test_config_file_fills_gaps() {
        let file = FileConfig {
            fabric: Some("file-fabric".to_string()),
            user: Some("file-user".to_string()),
            password_file: Some("/etc/glu/password".to_string()),
            api_version: Some("v2".to_string()),
            ..Default::default()
        };
        let cli = without_env(&["-c", "http://c", "status"]);
        let settings = Settings::resolve(&cli, file).unwrap();

        assert_eq!(settings.fabric, "file-fabric");
        assert_eq!(settings.user, "file-user");
        assert_eq!(settings.password_file, Some(PathBuf::from("/etc/glu/password")));
        assert_eq!(settings.api_version, "v2");
    }

    #[test]
    fn test_missing_fabric() {
        let result = Settings::resolve(&without_env(&["status"]), FileConfig::default());
        assert_eq!(result.unwrap_err(), "Fabric must be specified");
    }

    #[test]
    fn test_default_console() {
        let cli = without_env(&["-f", "dev", "-u", "bob", "status"]);
        let settings = Settings::resolve(&cli, FileConfig::default()).unwrap();
        assert_eq!(settings.console, DEFAULT_CONSOLE_URL);
    }
}
