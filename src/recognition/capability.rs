/// Injected capabilities the recognition flow orchestrates.
///
/// Detection, embedding and camera access live outside this crate; the
/// flow only sees these traits.
use crate::{error::FaceResult, recognition::Embedding};
use async_trait::async_trait;
use std::sync::Arc;

/// One captured video frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Face detection and embedding
#[async_trait]
pub trait FaceRecognizer: Send + Sync {
    /// Load the pretrained model assets from `models_url`
    async fn load_models(&self, models_url: &str) -> FaceResult<()>;

    /// Embedding of the single most prominent face in a stored photo
    async fn detect_single(&self, image_data_url: &str) -> FaceResult<Option<Embedding>>;

    /// Embeddings of every face in a live frame
    async fn detect_all(&self, frame: &Frame) -> FaceResult<Vec<Embedding>>;
}

#[async_trait]
impl<T: FaceRecognizer + ?Sized> FaceRecognizer for Arc<T> {
    async fn load_models(&self, models_url: &str) -> FaceResult<()> {
        (**self).load_models(models_url).await
    }

    async fn detect_single(&self, image_data_url: &str) -> FaceResult<Option<Embedding>> {
        (**self).detect_single(image_data_url).await
    }

    async fn detect_all(&self, frame: &Frame) -> FaceResult<Vec<Embedding>> {
        (**self).detect_all(frame).await
    }
}

/// Camera device able to open a capture stream
#[async_trait]
pub trait Camera: Send + Sync {
    /// Acquire the device. Failures surface as `FaceError::CameraAccess`.
    async fn start(&self) -> FaceResult<Box<dyn CameraStream>>;
}

/// An acquired capture stream
#[async_trait]
pub trait CameraStream: Send {
    async fn capture(&mut self) -> FaceResult<Frame>;

    /// Release every track. Calling it twice is harmless.
    fn stop(&mut self);
}
