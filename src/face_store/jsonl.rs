/// Append-only JSON Lines store
use crate::{
    error::{FaceError, FaceResult},
    face_store::{FaceRecord, FaceStore},
};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, error};

/// One JSON record per line, opened in append mode for every save.
///
/// A save never rewrites earlier records, so two appends cannot overwrite
/// each other.
#[derive(Clone)]
pub struct JsonLinesStore {
    path: PathBuf,
}

impl JsonLinesStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl FaceStore for JsonLinesStore {
    async fn list(&self) -> FaceResult<Vec<FaceRecord>> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to read face log");
                return Err(FaceError::StorageRead(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let mut records = Vec::new();
        for (idx, line) in data.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(line).map_err(|e| {
                error!(path = %self.path.display(), line = idx + 1, error = %e, "corrupt face log entry");
                FaceError::StorageRead(format!("Invalid record on line {}: {}", idx + 1, e))
            })?;
            records.push(record);
        }

        debug!(records = records.len(), "face log read");
        Ok(records)
    }

    async fn append(&self, record: FaceRecord) -> FaceResult<()> {
        let mut line = serde_json::to_string(&record)
            .map_err(|e| FaceError::StorageWrite(format!("Failed to serialize record: {}", e)))?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FaceError::StorageWrite(format!("Failed to create directory: {}", e)))?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                error!(path = %self.path.display(), error = %e, "failed to open face log");
                FaceError::StorageWrite(format!("Failed to open {}: {}", self.path.display(), e))
            })?;

        file.write_all(line.as_bytes()).await.map_err(|e| {
            error!(path = %self.path.display(), error = %e, "failed to append to face log");
            FaceError::StorageWrite(format!("Failed to append: {}", e))
        })?;
        file.flush()
            .await
            .map_err(|e| FaceError::StorageWrite(format!("Failed to flush: {}", e)))?;

        Ok(())
    }
}
