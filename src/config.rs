use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::FetchError;

pub const DEFAULT_ROOT_DIR: &str = "src/assets/images";

/// Pause between two requests so the remote server is not hammered.
pub const DEFAULT_DELAY_MS: u64 = 500;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Existing files at or below this many bytes are treated as incomplete.
pub const DEFAULT_MIN_VALID_SIZE: u64 = 1000;

const ENV_PREFIX: &str = "IMAGE_FETCHER";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub root_dir: PathBuf,
    pub delay_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub min_valid_size: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_ROOT_DIR),
            delay_ms: DEFAULT_DELAY_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            min_valid_size: DEFAULT_MIN_VALID_SIZE,
        }
    }
}

impl Settings {
    /// Defaults, then the optional settings file, then `IMAGE_FETCHER_*`
    /// environment variables.
    pub fn load(config_path: Option<&Path>) -> Result<Self, FetchError> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::Settings;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.root_dir, PathBuf::from("src/assets/images"));
        assert_eq!(settings.delay(), Duration::from_millis(500));
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.min_valid_size, 1000);
        assert!(settings.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();

        let path = dir.path().join("settings.toml");

        fs::write(&path, "root_dir = \"public/images\"\ndelay_ms = 0\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();

        assert_eq!(settings.root_dir, PathBuf::from("public/images"));
        assert_eq!(settings.delay_ms, 0);
        assert_eq!(settings.timeout_secs, 30);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();

        let path = dir.path().join("missing.toml");

        assert!(Settings::load(Some(&path)).is_err());
    }
}
