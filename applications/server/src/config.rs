/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use setlist_core::policy::OwnerPolicy;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default)]
    pub policy: PolicySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Retries for a playlist write that lost a revision race
    #[serde(default = "default_max_write_retries")]
    pub max_write_retries: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PolicySettings {
    /// Reject playlists and playback records created without an owner
    #[serde(default)]
    pub require_owner: bool,
}

impl PolicySettings {
    pub fn owner_policy(&self) -> OwnerPolicy {
        OwnerPolicy::new(self.require_owner)
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `config.toml` in the working
    /// directory is used when present. Environment variables prefixed with
    /// `SETLIST_` override file values, with `__` separating sections
    /// (`SETLIST_SERVER__PORT=9000`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("SETLIST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServerError::Config(
                "Server port must be non-zero (set SETLIST_SERVER__PORT)".to_string(),
            ));
        }

        if self.storage.database_url.trim().is_empty() {
            return Err(ServerError::Config(
                "Database URL is required (set SETLIST_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(ServerError::Config(
                "storage.max_connections must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        max_connections: default_max_connections(),
        max_write_retries: default_max_write_retries(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/setlist.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_max_write_retries() -> u32 {
    setlist_storage::DEFAULT_MAX_WRITE_RETRIES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            policy: PolicySettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.max_write_retries, 5);
        assert!(!config.policy.require_owner);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_sections_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9100

[storage]
database_url = "sqlite://./other.db"
max_write_retries = 2

[policy]
require_owner = true
"#
        )
        .unwrap();

        let config = ServerConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.database_url, "sqlite://./other.db");
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.storage.max_write_retries, 2);
        assert!(config.policy.owner_policy().require_owner);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = ServerConfig::load(Some(Path::new("/nonexistent/setlist.toml")));

        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = ServerConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.storage.database_url = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.storage.max_connections = 0;
        assert!(config.validate().is_err());
    }
}
