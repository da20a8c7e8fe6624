/// Whole-document JSON store
use crate::{
    error::{FaceError, FaceResult},
    face_store::{FaceRecord, FaceStore},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error};

/// Stores the collection as one pretty-printed JSON array.
///
/// Every save reads the whole document, appends in memory and rewrites the
/// file. `append` on its own is therefore a read-modify-write with no
/// coordination between callers; wrap it in a [`WriteQueue`] when more than
/// one request may save at a time.
///
/// [`WriteQueue`]: crate::face_store::WriteQueue
#[derive(Clone)]
pub struct JsonDocumentStore {
    path: PathBuf,
}

impl JsonDocumentStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full collection. A missing file is an empty collection.
    pub async fn read_collection(&self) -> FaceResult<Vec<FaceRecord>> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "face database absent, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to read face database");
                return Err(FaceError::StorageRead(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&data).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "face database is not valid JSON");
            FaceError::StorageRead(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    /// Overwrite the document with `records`.
    ///
    /// Writes to a sibling temp file first and renames it into place, so a
    /// reader sees either the old or the new collection.
    pub async fn write_collection(&self, records: &[FaceRecord]) -> FaceResult<()> {
        let body = serde_json::to_string_pretty(records)
            .map_err(|e| FaceError::StorageWrite(format!("Failed to serialize collection: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                error!(path = %parent.display(), error = %e, "failed to create database directory");
                FaceError::StorageWrite(format!("Failed to create directory: {}", e))
            })?;
        }

        let tmp_path = self.temp_path();
        if let Err(e) = fs::write(&tmp_path, body).await {
            error!(path = %tmp_path.display(), error = %e, "failed to write face database");
            return Err(FaceError::StorageWrite(format!(
                "Failed to write {}: {}",
                tmp_path.display(),
                e
            )));
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            error!(path = %self.path.display(), error = %e, "failed to replace face database");
            let _ = fs::remove_file(&tmp_path).await;
            return Err(FaceError::StorageWrite(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            )));
        }

        debug!(path = %self.path.display(), records = records.len(), "face database written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "database.json".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()))
    }
}

#[async_trait]
impl FaceStore for JsonDocumentStore {
    async fn list(&self) -> FaceResult<Vec<FaceRecord>> {
        self.read_collection().await
    }

    async fn append(&self, record: FaceRecord) -> FaceResult<()> {
        // A read failure here blocks the save; it is reported as a write error.
        let mut records = self.read_collection().await.map_err(|e| match e {
            FaceError::StorageRead(msg) => FaceError::StorageWrite(msg),
            other => other,
        })?;
        records.push(record);
        self.write_collection(&records).await
    }
}
