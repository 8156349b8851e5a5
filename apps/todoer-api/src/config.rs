use core_config::{AppInfo, FromEnv, app_info, env_or_default, server::ServerConfig};

// Import MongoDB config from the database library
use database::mongodb::MongoConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Storage backend selection, from `STORAGE_BACKEND`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    MongoDb,
}

impl StorageBackend {
    pub fn from_env() -> eyre::Result<Self> {
        let backend = env_or_default("STORAGE_BACKEND", "memory");
        match backend.to_ascii_lowercase().as_str() {
            "memory" | "in_memory" => Ok(StorageBackend::Memory),
            "mongodb" | "mongo" => Ok(StorageBackend::MongoDb),
            other => Err(eyre::eyre!(
                "Invalid STORAGE_BACKEND '{}': expected 'memory' or 'mongodb'",
                other
            )),
        }
    }

    /// Name reported by the `/api/service/info` endpoint
    pub fn data_source(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "in-memory",
            StorageBackend::MongoDb => "mongodb",
        }
    }
}

/// Application-specific configuration
/// Composes shared config components from the `core_config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub storage: StorageBackend,
    /// Only loaded when the MongoDB backend is selected
    pub mongodb: Option<MongoConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let storage = StorageBackend::from_env()?;

        let mongodb = match storage {
            StorageBackend::MongoDb => Some(MongoConfig::from_env()?),
            StorageBackend::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            storage,
            mongodb,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_defaults_to_memory() {
        temp_env::with_var("STORAGE_BACKEND", None::<&str>, || {
            assert_eq!(StorageBackend::from_env().unwrap(), StorageBackend::Memory);
        });
    }

    #[test]
    fn test_storage_backend_mongodb() {
        temp_env::with_var("STORAGE_BACKEND", Some("MongoDB"), || {
            assert_eq!(
                StorageBackend::from_env().unwrap(),
                StorageBackend::MongoDb
            );
        });
    }

    #[test]
    fn test_storage_backend_rejects_unknown() {
        temp_env::with_var("STORAGE_BACKEND", Some("postgres"), || {
            assert!(StorageBackend::from_env().is_err());
        });
    }

    #[test]
    fn test_memory_config_skips_mongo() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", Some("memory")),
                ("MONGODB_URL", None::<&str>),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.mongodb.is_none());
            },
        );
    }
}
