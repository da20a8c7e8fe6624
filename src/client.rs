/// HTTP client for the face store API
use crate::{
    error::{FaceError, FaceResult},
    face_store::{FaceRecord, SaveResponse},
};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, warn};

/// Operations the enrollment and recognition flows need from the server
#[async_trait]
pub trait FaceApi: Send + Sync {
    /// Fetch the whole collection
    async fn list_faces(&self) -> FaceResult<Vec<FaceRecord>>;

    /// Submit one record, returning the server's confirmation message
    async fn save_face(&self, record: &FaceRecord) -> FaceResult<String>;
}

#[async_trait]
impl<T: FaceApi + ?Sized> FaceApi for Arc<T> {
    async fn list_faces(&self) -> FaceResult<Vec<FaceRecord>> {
        (**self).list_faces().await
    }

    async fn save_face(&self, record: &FaceRecord) -> FaceResult<String> {
        (**self).save_face(record).await
    }
}

/// `reqwest`-backed client against a running registry server
#[derive(Clone)]
pub struct HttpFaceApi {
    base_url: String,
    client: Client,
}

impl HttpFaceApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl FaceApi for HttpFaceApi {
    async fn list_faces(&self) -> FaceResult<Vec<FaceRecord>> {
        let response = self
            .client
            .get(self.url("/get-faces"))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "failed to fetch faces");
                FaceError::Connectivity(format!("Could not connect to the server: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(FaceError::Connectivity(format!(
                "Server responded with an error. ({})",
                response.status()
            )));
        }

        let records: Vec<FaceRecord> = response
            .json()
            .await
            .map_err(|e| FaceError::Connectivity(format!("Invalid face list: {}", e)))?;
        debug!(count = records.len(), "fetched faces");
        Ok(records)
    }

    async fn save_face(&self, record: &FaceRecord) -> FaceResult<String> {
        let response = self
            .client
            .post(self.url("/save-face"))
            .json(record)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "failed to save face");
                FaceError::Connectivity(format!("Could not connect to the server: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(FaceError::Connectivity(format!(
                "Server responded with an error. ({})",
                response.status()
            )));
        }

        let body: SaveResponse = response
            .json()
            .await
            .map_err(|e| FaceError::Connectivity(format!("Invalid save response: {}", e)))?;
        Ok(body.message)
    }
}
