use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{CONFIG_ENV, find_config_file, read_config, read_config_from};

mod error;
pub use error::{ConfigError, ConfigResult};

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
    #[serde(default)]
    storage: StorageConfig,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    jwt: String,
    #[serde(default = "default_docs")]
    docs: bool,
    /// Course file to serve instead of the built-in course.
    course_path: Option<PathBuf>,
}

fn default_docs() -> bool {
    true
}

/// Which progress adapter to open.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// One JSON document per user under `dir`.
    Local { dir: PathBuf },
    /// Hosted PostgreSQL.
    Remote { database_uri: String },
    Memory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Local {
            dir: PathBuf::from("./data/progress"),
        }
    }
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let bytes = read_config(use_local)?;
                    Self::from_slice(&bytes)
                };

                match read_cfg(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        if !matches!(e, ConfigError::ConfigNotFound) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Config not found.");
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    pub fn from_slice(bytes: &[u8]) -> ConfigResult<Self> {
        let config: Self = toml::from_slice(bytes)?;
        if config.app.jwt.trim().is_empty() {
            return Err(ConfigError::Invalid("app.jwt must not be empty".into()));
        }
        Ok(config)
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }

    #[inline]
    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }

    #[inline]
    pub fn course_path(&self) -> Option<&Path> {
        self.course_path.as_deref()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn config_test() {
        let config = Config::get_or_init(true).await;
        assert_eq!(config.host().bindto(), "127.0.0.1:5000"); // defaults
    }

    #[test]
    fn test_storage_backends() {
        let remote = br#"
            [host]
            bindto = "0.0.0.0:80"
            [app]
            jwt = "secret"
            [storage]
            backend = "remote"
            database_uri = "postgres://localhost/finquest"
        "#;
        let config = Config::from_slice(remote).unwrap();
        assert_eq!(
            config.storage(),
            &StorageConfig::Remote {
                database_uri: "postgres://localhost/finquest".into()
            }
        );
        assert!(config.app().docs());
        assert!(config.app().course_path().is_none());

        let memory = br#"
            [host]
            bindto = "0.0.0.0:80"
            [app]
            jwt = "secret"
            docs = false
            [storage]
            backend = "memory"
        "#;
        let config = Config::from_slice(memory).unwrap();
        assert_eq!(config.storage(), &StorageConfig::Memory);
        assert!(!config.app().docs());
    }

    #[test]
    fn test_storage_defaults_to_local() {
        let bytes = b"[host]\nbindto = \"127.0.0.1:1\"\n[app]\njwt = \"k\"\n";
        let config = Config::from_slice(bytes).unwrap();
        assert!(matches!(config.storage(), StorageConfig::Local { .. }));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let bytes = b"[host]\nbindto = \"127.0.0.1:1\"\n[app]\njwt = \" \"\n";
        assert!(matches!(
            Config::from_slice(bytes),
            Err(ConfigError::Invalid(_))
        ));
    }
}
