/// Single-writer queue in front of a face store backend
use crate::{
    error::{FaceError, FaceResult},
    face_store::{FaceRecord, FaceStore},
    metrics,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

const QUEUE_DEPTH: usize = 64;

struct WriteRequest {
    record: FaceRecord,
    reply: oneshot::Sender<FaceResult<()>>,
}

/// Funnels every append through one background task.
///
/// Appends are applied strictly one after another in arrival order, so the
/// read-modify-write of the document backend never interleaves with another
/// save. Reads bypass the queue.
#[derive(Clone)]
pub struct WriteQueue {
    backend: Arc<dyn FaceStore>,
    sender: mpsc::Sender<WriteRequest>,
}

impl WriteQueue {
    /// Spawn the writer task. Must be called inside a Tokio runtime.
    pub fn spawn(backend: Arc<dyn FaceStore>) -> Self {
        let (sender, receiver) = mpsc::channel(QUEUE_DEPTH);
        tokio::spawn(run_writer(Arc::clone(&backend), receiver));
        Self { backend, sender }
    }
}

async fn run_writer(backend: Arc<dyn FaceStore>, mut receiver: mpsc::Receiver<WriteRequest>) {
    debug!("face store writer started");

    while let Some(WriteRequest { record, reply }) = receiver.recv().await {
        let id = record.id();
        let name = record.label().to_string();
        let result = backend.append(record).await;

        match &result {
            Ok(()) => {
                metrics::record_face_saved();
                info!(id = ?id, name = %name, "face saved");
            }
            Err(e) => {
                metrics::record_store_error("append");
                warn!(id = ?id, error = %e, "face save failed");
            }
        }

        // The caller may have gone away (client disconnect); the write stands.
        let _ = reply.send(result);
    }

    debug!("face store writer stopped");
}

#[async_trait]
impl FaceStore for WriteQueue {
    async fn list(&self) -> FaceResult<Vec<FaceRecord>> {
        let result = self.backend.list().await;
        if result.is_err() {
            metrics::record_store_error("list");
        }
        result
    }

    async fn append(&self, record: FaceRecord) -> FaceResult<()> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(WriteRequest { record, reply })
            .await
            .map_err(|_| FaceError::StorageWrite("Face store writer has stopped".to_string()))?;

        response
            .await
            .map_err(|_| FaceError::StorageWrite("Face store writer dropped the request".to_string()))?
    }
}
