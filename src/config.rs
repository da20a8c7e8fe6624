/// Configuration management for the face registry server
use crate::error::{FaceError, FaceResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default request body limit; enrollment payloads embed the whole photo.
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub assets: AssetConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub body_limit: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    pub format: StoreFormat,
}

/// On-disk layout of the face collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    /// Single JSON array, rewritten in full on every save
    Document,
    /// Append-only log, one JSON record per line
    Jsonl,
}

impl std::str::FromStr for StoreFormat {
    type Err = FaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" | "json" => Ok(StoreFormat::Document),
            "jsonl" | "log" => Ok(StoreFormat::Jsonl),
            other => Err(FaceError::Config(format!("Unknown store format: {}", other))),
        }
    }
}

/// Static asset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    pub public_directory: PathBuf,
}

impl AssetConfig {
    /// Directory holding the pretrained recognition model files
    pub fn models_directory(&self) -> PathBuf {
        self.public_directory.join("models")
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> FaceResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> FaceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let hostname = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| FaceError::Config(format!("Invalid port number: {}", raw)))?,
            None => 3000,
        };
        let body_limit = match lookup("BODY_LIMIT_BYTES") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| FaceError::Config(format!("Invalid body limit: {}", raw)))?,
            None => DEFAULT_BODY_LIMIT,
        };

        let database_path = lookup("FACE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./database.json"));
        let format = match lookup("FACE_STORE_FORMAT") {
            Some(raw) => raw.parse()?,
            None => StoreFormat::Document,
        };

        let public_directory = lookup("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./public"));

        let json = lookup("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config = Self {
            service: ServiceConfig {
                hostname,
                port,
                body_limit,
            },
            storage: StorageConfig {
                database_path,
                format,
            },
            assets: AssetConfig { public_directory },
            logging: LoggingConfig { json },
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> FaceResult<()> {
        if self.service.port == 0 {
            return Err(FaceError::Config("Port must be non-zero".to_string()));
        }
        if self.service.body_limit == 0 {
            return Err(FaceError::Config("Body limit must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Address the listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.hostname, self.service.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.service.port, 3000);
        assert_eq!(config.service.body_limit, DEFAULT_BODY_LIMIT);
        assert_eq!(config.storage.database_path, PathBuf::from("./database.json"));
        assert_eq!(config.storage.format, StoreFormat::Document);
        assert_eq!(
            config.assets.models_directory(),
            PathBuf::from("./public").join("models")
        );
        assert!(!config.logging.json);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_port_override() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "8080")])).unwrap();
        assert_eq!(config.service.port, 8080);
    }

    #[test]
    fn test_invalid_port() {
        let result = ServerConfig::from_lookup(lookup(&[("PORT", "http")]));
        assert!(matches!(result, Err(FaceError::Config(_))));

        let result = ServerConfig::from_lookup(lookup(&[("PORT", "0")]));
        assert!(matches!(result, Err(FaceError::Config(_))));
    }

    #[test]
    fn test_store_format() {
        let config =
            ServerConfig::from_lookup(lookup(&[("FACE_STORE_FORMAT", "JSONL")])).unwrap();
        assert_eq!(config.storage.format, StoreFormat::Jsonl);

        let result = ServerConfig::from_lookup(lookup(&[("FACE_STORE_FORMAT", "sqlite")]));
        assert!(matches!(result, Err(FaceError::Config(_))));
    }

    #[test]
    fn test_json_logging() {
        let config = ServerConfig::from_lookup(lookup(&[("LOG_FORMAT", "json")])).unwrap();
        assert!(config.logging.json);
    }
}
