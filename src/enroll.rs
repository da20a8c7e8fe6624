/// Client enrollment flow
///
/// Collects the enrollment form, rejects incomplete submissions locally,
/// encodes the photo as a data URL and posts the record. After a successful
/// save the face list is fetched again for display.
use crate::{
    client::FaceApi,
    error::{FaceError, FaceResult},
    face_store::FaceRecord,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use std::path::Path;
use tracing::{info, warn};

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill out all fields.";
pub const EMPTY_LIST_MESSAGE: &str = "No faces saved yet.";
pub const UNREACHABLE_MESSAGE: &str = "Could not connect to the local server. Is it running?";

/// An uploaded photo
#[derive(Debug, Clone)]
pub struct ImageFile {
    /// Declared MIME type, if the upload carried one
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            mime_type: None,
            bytes,
        }
    }

    /// Read a photo from disk
    pub async fn from_path(path: impl AsRef<Path>) -> FaceResult<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        Ok(Self::new(bytes))
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// MIME type: declared, else sniffed from the bytes
    pub fn resolved_mime_type(&self) -> String {
        if let Some(mime) = self.mime_type.as_deref().filter(|m| !m.is_empty()) {
            return mime.to_string();
        }
        image::guess_format(&self.bytes)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string())
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.resolved_mime_type(),
            STANDARD.encode(&self.bytes)
        )
    }
}

/// The four enrollment inputs
#[derive(Debug, Clone, Default)]
pub struct EnrollmentForm {
    pub name: String,
    pub age: String,
    pub location: String,
    pub image: Option<ImageFile>,
}

impl EnrollmentForm {
    /// Every field must be present; contents are not checked further.
    pub fn validate(&self) -> FaceResult<&ImageFile> {
        if self.name.is_empty() || self.age.is_empty() || self.location.is_empty() {
            return Err(FaceError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }
        self.image
            .as_ref()
            .ok_or_else(|| FaceError::Validation(MISSING_FIELDS_MESSAGE.to_string()))
    }

    /// Build the record sent to the server
    pub fn to_record(&self, id: i64) -> FaceResult<FaceRecord> {
        let image = self.validate()?;
        Ok(FaceRecord::new(
            id,
            self.name.clone(),
            self.age.clone(),
            self.location.clone(),
            image.to_data_url(),
        ))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One entry of the face list view
#[derive(Debug, Clone, PartialEq)]
pub struct FaceCard {
    pub name: String,
    pub age: String,
    pub location: String,
    pub image_data_url: String,
}

impl From<&FaceRecord> for FaceCard {
    fn from(record: &FaceRecord) -> Self {
        Self {
            name: record.display("name"),
            age: record.display("age"),
            location: record.display("location"),
            image_data_url: record.display("imageDataUrl"),
        }
    }
}

/// What the face list shows after a refresh
#[derive(Debug, Clone, PartialEq)]
pub enum FaceListView {
    Empty,
    Cards(Vec<FaceCard>),
    Unavailable(String),
}

impl FaceListView {
    /// Status line for views without cards
    pub fn message(&self) -> Option<&str> {
        match self {
            FaceListView::Empty => Some(EMPTY_LIST_MESSAGE),
            FaceListView::Cards(_) => None,
            FaceListView::Unavailable(msg) => Some(msg),
        }
    }
}

/// Result of a successful submission
#[derive(Debug, Clone)]
pub struct EnrollmentOutcome {
    /// Confirmation message from the server
    pub message: String,
    pub faces: FaceListView,
}

/// Enrollment controller over a face API
pub struct Enrollment<A> {
    api: A,
}

impl<A: FaceApi> Enrollment<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Fetch and project the current collection
    pub async fn display_faces(&self) -> FaceListView {
        match self.api.list_faces().await {
            Ok(records) if records.is_empty() => FaceListView::Empty,
            Ok(records) => FaceListView::Cards(records.iter().map(FaceCard::from).collect()),
            Err(e) => {
                warn!(error = %e, "failed to fetch faces");
                FaceListView::Unavailable(UNREACHABLE_MESSAGE.to_string())
            }
        }
    }

    /// Validate, save and refresh. The form is cleared only on success.
    pub async fn submit(&self, form: &mut EnrollmentForm) -> FaceResult<EnrollmentOutcome> {
        self.submit_with_id(form, Utc::now().timestamp_millis()).await
    }

    pub async fn submit_with_id(
        &self,
        form: &mut EnrollmentForm,
        id: i64,
    ) -> FaceResult<EnrollmentOutcome> {
        let record = form.to_record(id)?;
        let message = self.api.save_face(&record).await?;
        info!(id, name = %form.name, "face enrolled");

        form.clear();
        let faces = self.display_faces().await;
        Ok(EnrollmentOutcome { message, faces })
    }
}
