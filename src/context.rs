/// Application context and dependency injection
use crate::{
    config::ServerConfig,
    error::FaceResult,
    face_store::{self, FaceStore},
};
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn FaceStore>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> FaceResult<Self> {
        config.validate()?;

        let store = face_store::open_store(&config.storage);

        Ok(Self {
            config: Arc::new(config),
            store,
        })
    }

    /// Build a context around an existing store
    pub fn with_store(config: ServerConfig, store: Arc<dyn FaceStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
