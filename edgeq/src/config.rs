//! Configuration for edgeq.
//!
//! EDGEQ_ROOT resolution order:
//! 1. Explicit path passed to Config::with_root()
//! 2. EDGEQ_ROOT environment variable
//! 3. Default: ~/.local/share/edgeq

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::query::ParserOptions;
use crate::schema::SchemaFile;
use crate::{Error, Result};

/// edgeq configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory holding config.toml and the schema file.
    #[serde(skip)]
    pub root: PathBuf,

    /// Page size used when pagination is requested without a valid `limit`.
    #[serde(default = "default_limit")]
    pub default_limit: u64,

    /// Schema file name, relative to the root.
    #[serde(default = "default_schema_file")]
    pub schema_file: String,
}

fn default_limit() -> u64 {
    10
}

fn default_schema_file() -> String {
    "schema.toml".to_string()
}

impl Config {
    /// Create a new config with the given root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            default_limit: default_limit(),
            schema_file: default_schema_file(),
        }
    }

    /// Create a config using default root resolution.
    pub fn default_location() -> Result<Self> {
        let root = resolve_root()?;
        Ok(Self::with_root(root))
    }

    /// Load config from EDGEQ_ROOT/config.toml, or create default.
    pub fn load() -> Result<Self> {
        let root = resolve_root()?;
        Self::load_from(&root)
    }

    /// Load config from a specific root.
    pub fn load_from(root: &Path) -> Result<Self> {
        let config_path = root.join("config.toml");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
            if config.default_limit == 0 {
                return Err(Error::Config("default_limit must be positive".to_string()));
            }
            config.root = root.to_path_buf();
            Ok(config)
        } else {
            Ok(Self::with_root(root))
        }
    }

    /// Save config to EDGEQ_ROOT/config.toml.
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(self.config_path(), contents)?;
        Ok(())
    }

    /// Path to config.toml.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Path to the schema file.
    pub fn schema_path(&self) -> PathBuf {
        self.root.join(&self.schema_file)
    }

    /// Load the configured schema file.
    pub fn load_schema(&self) -> Result<SchemaFile> {
        SchemaFile::load(&self.schema_path())
    }

    /// Parser settings derived from this config.
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            default_limit: self.default_limit,
        }
    }
}

/// Resolve EDGEQ_ROOT using the standard resolution order.
fn resolve_root() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("EDGEQ_ROOT") {
        return Ok(PathBuf::from(path));
    }

    if let Some(proj_dirs) = ProjectDirs::from("", "", "edgeq") {
        return Ok(proj_dirs.data_dir().to_path_buf());
    }

    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;
    Ok(PathBuf::from(home).join(".local/share/edgeq"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_with_root() {
        let config = Config::with_root("/tmp/test-edgeq");
        assert_eq!(config.root, PathBuf::from("/tmp/test-edgeq"));
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.schema_path(), PathBuf::from("/tmp/test-edgeq/schema.toml"));
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();

        let mut config = Config::with_root(tmp.path());
        config.default_limit = 25;
        config.save().unwrap();

        let loaded = Config::load_from(tmp.path()).unwrap();
        assert_eq!(loaded.default_limit, 25);
        assert_eq!(loaded.root, tmp.path());
        assert_eq!(loaded.parser_options().default_limit, 25);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let loaded = Config::load_from(tmp.path()).unwrap();
        assert_eq!(loaded.default_limit, 10);
        assert_eq!(loaded.schema_file, "schema.toml");
    }

    #[test]
    fn test_zero_default_limit_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("config.toml"), "default_limit = 0\n").unwrap();

        let err = Config::load_from(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
