use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BilletError, BilletResult};

/// Top-level configuration (loaded from billet.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BilletConfig {
    pub storage: StorageConfig,
    pub authoring: AuthoringConfig,
    pub share: ShareConfig,
    pub logging: LogConfig,
}

impl BilletConfig {
    /// Parse a configuration document. An empty document yields all defaults.
    pub fn from_toml(content: &str) -> BilletResult<Self> {
        toml::from_str(content).map_err(|e| BilletError::Config(e.to_string()))
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    ///
    /// Runs before logging is configured, so reporting a missing file is left
    /// to the caller.
    pub fn load(path: &Path) -> BilletResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| BilletError::Config(format!("parsing {}: {e}", path.display())))
    }
}

/// Which OpenDAL service holds the stored payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Local directory (the static site's `public/` tree)
    #[default]
    Fs,
    /// S3-compatible object store
    S3,
    /// Process-local, for tests and dry runs
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory for the fs backend
    pub root: PathBuf,
    /// Object prefix under which `{id}.txt` payloads live
    pub prefix: String,
    /// S3 endpoint
    pub endpoint: String,
    /// S3 region (default: us-east-1)
    pub region: String,
    /// S3 bucket
    pub bucket: String,
    /// Refuse plaintext HTTP S3 endpoints
    pub enforce_tls: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Fs,
            root: PathBuf::from("public"),
            prefix: "letters".into(),
            endpoint: "http://localhost:8333".into(),
            region: "us-east-1".into(),
            bucket: "billet".into(),
            enforce_tls: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthoringConfig {
    /// Directory of `{id}.txt` drafts (password line + body)
    pub raw_dir: PathBuf,
}

impl Default for AuthoringConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("raw-letters"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Reader page URL; share links are printed only when this is set
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[storage]
backend = "s3"
root = "/srv/site"
prefix = "mail"
endpoint = "https://s3.example.com:8333"
region = "eu-west-1"
bucket = "letters-bucket"
enforce_tls = true

[authoring]
raw_dir = "/home/me/drafts"

[share]
base_url = "https://letters.example.com/"

[logging]
level = "debug"
format = "json"
"#;
        let config = BilletConfig::from_toml(toml_str).unwrap();

        assert_eq!(config.storage.backend, StorageBackend::S3);
        assert_eq!(config.storage.root, PathBuf::from("/srv/site"));
        assert_eq!(config.storage.prefix, "mail");
        assert_eq!(config.storage.bucket, "letters-bucket");
        assert!(config.storage.enforce_tls);
        assert_eq!(config.authoring.raw_dir, PathBuf::from("/home/me/drafts"));
        assert_eq!(
            config.share.base_url.as_deref(),
            Some("https://letters.example.com/")
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_parse_defaults() {
        let config = BilletConfig::from_toml("").unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Fs);
        assert_eq!(config.storage.root, PathBuf::from("public"));
        assert_eq!(config.storage.prefix, "letters");
        assert!(!config.storage.enforce_tls);
        assert_eq!(config.authoring.raw_dir, PathBuf::from("raw-letters"));
        assert!(config.share.base_url.is_none());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_parse_partial_config() {
        let config = BilletConfig::from_toml("[storage]\nbackend = \"memory\"\n").unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.prefix, "letters");
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let err = BilletConfig::from_toml("[storage]\nbackend = \"ftp\"\n").unwrap_err();
        assert!(matches!(err, BilletError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = BilletConfig::load(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.storage.prefix, "letters");
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("billet.toml");
        std::fs::write(&path, "[authoring]\nraw_dir = \"drafts\"\n").unwrap();

        let config = BilletConfig::load(&path).unwrap();
        assert_eq!(config.authoring.raw_dir, PathBuf::from("drafts"));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = BilletConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed = BilletConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.storage.root, parsed.storage.root);
        assert_eq!(config.storage.backend, parsed.storage.backend);
        assert_eq!(config.logging.level, parsed.logging.level);
    }
}
