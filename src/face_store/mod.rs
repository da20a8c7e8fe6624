/// Face Store
///
/// Durable storage for the enrolled face collection. The collection is an
/// ordered sequence of records; it only ever grows by appending.
/// Supports a whole-document JSON file and an append-only JSON Lines log.

pub mod document;
pub mod jsonl;
pub mod models;
pub mod queue;

pub use document::JsonDocumentStore;
pub use jsonl::JsonLinesStore;
pub use models::*;
pub use queue::WriteQueue;

use crate::{
    config::{StorageConfig, StoreFormat},
    error::FaceResult,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Face storage backend trait
#[async_trait]
pub trait FaceStore: Send + Sync {
    /// Return the full collection in insertion order
    async fn list(&self) -> FaceResult<Vec<FaceRecord>>;

    /// Append one record to the collection
    async fn append(&self, record: FaceRecord) -> FaceResult<()>;
}

/// Open the configured backend behind a single-writer queue
pub fn open_store(config: &StorageConfig) -> Arc<dyn FaceStore> {
    let backend: Arc<dyn FaceStore> = match config.format {
        StoreFormat::Document => Arc::new(JsonDocumentStore::new(config.database_path.clone())),
        StoreFormat::Jsonl => Arc::new(JsonLinesStore::new(config.database_path.clone())),
    };

    tracing::info!(
        path = %config.database_path.display(),
        format = ?config.format,
        "face store opened"
    );

    Arc::new(WriteQueue::spawn(backend))
}
