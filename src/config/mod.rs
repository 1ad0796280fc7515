mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::Path;
use tracing::debug;

impl Default for Settings {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            engine: EngineSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults when an implicit path is absent.
    /// An explicitly requested file must exist.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let implicit = default_settings_path();
                if implicit.exists() {
                    debug!("Loading settings from {:?}", implicit);
                    Self::load(&implicit)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retries < 1 {
            return Err(ConfigError::InvalidRetries(self.retries));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings.retries, 3);
        assert_eq!(settings.engine.node_binary, PathBuf::from("node"));
        assert_eq!(settings.engine.project_dir, PathBuf::from("."));
    }

    #[test]
    fn test_partial_engine_section() {
        let yaml = "retries: 5\nengine:\n  node_binary: /opt/node/bin/node\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.retries, 5);
        assert_eq!(
            settings.engine.node_binary,
            PathBuf::from("/opt/node/bin/node")
        );
        assert_eq!(settings.engine.project_dir, PathBuf::from("."));
    }

    #[test]
    fn test_zero_retries_rejected() {
        let settings = Settings {
            retries: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidRetries(0))
        ));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = Settings::resolve(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "retries: 2\n").unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.retries, 2);
    }
}
