/// Recognition flow controller
///
/// Loads the models once, then for each scan: acquires the camera, learns
/// the enrolled faces from the server, and evaluates frames on a fixed
/// period until the first confident match. The camera is released before
/// any outcome is returned.
use crate::{
    client::FaceApi,
    error::{FaceError, FaceResult},
    face_store::FaceRecord,
    recognition::{
        Camera, CameraStream, FaceMatcher, FaceRecognizer, LabeledDescriptors, ScanHandle,
        ScanLoop, DEFAULT_DISTANCE_THRESHOLD, DEFAULT_SCAN_INTERVAL,
    },
};
use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tunables for a recognition session
#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    /// Where the recognizer loads its model assets from
    pub models_url: String,
    pub threshold: f32,
    pub scan_interval: Duration,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            models_url: "./models".to_string(),
            threshold: DEFAULT_DISTANCE_THRESHOLD,
            scan_interval: DEFAULT_SCAN_INTERVAL,
        }
    }
}

/// What the session is currently doing, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionStatus {
    Idle,
    LoadingModels,
    ModelsLoaded,
    AccessingCamera,
    LearningFaces,
    Scanning,
    DatabaseEmpty,
    NoReferenceFaces,
    CameraError,
    Matched,
    Stopped,
}

impl RecognitionStatus {
    pub fn message(&self) -> &'static str {
        match self {
            RecognitionStatus::Idle => "",
            RecognitionStatus::LoadingModels => "Loading AI Models...",
            RecognitionStatus::ModelsLoaded => "Models Loaded.",
            RecognitionStatus::AccessingCamera => "Accessing Camera...",
            RecognitionStatus::LearningFaces => "Learning faces from database...",
            RecognitionStatus::Scanning => "Ready! Looking for faces...",
            RecognitionStatus::DatabaseEmpty => "Database is empty.",
            RecognitionStatus::NoReferenceFaces => "No recognizable faces in database.",
            RecognitionStatus::CameraError => "Error: Could not access camera.",
            RecognitionStatus::Matched => "Match found.",
            RecognitionStatus::Stopped => "Scan stopped.",
        }
    }
}

/// A confident identification
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    /// First stored record carrying the matched name
    pub record: FaceRecord,
    pub distance: f32,
    /// `round((1 - distance) * 100)`
    pub confidence: i32,
}

/// How a scan ended
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionOutcome {
    Matched(RecognitionResult),
    /// The server holds no faces
    EmptyDatabase,
    /// No stored photo yielded a face, so nothing can ever match
    NoReferenceFaces,
    /// The scan was cancelled before any match
    Cancelled,
}

/// Explicit state of one recognition page: capabilities plus what was learned.
pub struct RecognitionSession<R, C, A> {
    recognizer: R,
    camera: C,
    api: A,
    config: RecognitionConfig,
    models_loaded: bool,
    saved_faces: Vec<FaceRecord>,
    active_scan: Option<ScanHandle>,
    status: RecognitionStatus,
}

impl<R, C, A> RecognitionSession<R, C, A>
where
    R: FaceRecognizer,
    C: Camera,
    A: FaceApi,
{
    pub fn new(recognizer: R, camera: C, api: A, config: RecognitionConfig) -> Self {
        Self {
            recognizer,
            camera,
            api,
            config,
            models_loaded: false,
            saved_faces: Vec::new(),
            active_scan: None,
            status: RecognitionStatus::Idle,
        }
    }

    pub fn status(&self) -> RecognitionStatus {
        self.status
    }

    pub fn models_loaded(&self) -> bool {
        self.models_loaded
    }

    /// Records learned by the most recent scan
    pub fn saved_faces(&self) -> &[FaceRecord] {
        &self.saved_faces
    }

    /// Load models (first call only), then scan
    pub async fn run(&mut self) -> FaceResult<RecognitionOutcome> {
        self.load_models().await?;
        self.start().await
    }

    /// Restart camera and scanning after a result; models are not reloaded
    pub async fn continue_scan(&mut self) -> FaceResult<RecognitionOutcome> {
        self.start().await
    }

    /// Cancel switch for the current scan, or for the next one if none is
    /// running. Clone it into another task to stop a scan in progress;
    /// cancelling is idempotent and a no-op once the scan has ended.
    pub fn scan_handle(&mut self) -> ScanHandle {
        self.active_scan.get_or_insert_with(ScanHandle::new).clone()
    }

    async fn load_models(&mut self) -> FaceResult<()> {
        if self.models_loaded {
            return Ok(());
        }
        self.status = RecognitionStatus::LoadingModels;
        self.recognizer
            .load_models(&self.config.models_url)
            .await
            .map_err(|e| {
                warn!(error = %e, "failed to load recognition models");
                e
            })?;
        self.models_loaded = true;
        self.status = RecognitionStatus::ModelsLoaded;
        info!(models = %self.config.models_url, "recognition models loaded");
        Ok(())
    }

    /// One full pass: camera, learn, scan
    pub async fn start(&mut self) -> FaceResult<RecognitionOutcome> {
        self.status = RecognitionStatus::AccessingCamera;
        let mut stream = match self.camera.start().await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "camera unavailable");
                self.status = RecognitionStatus::CameraError;
                self.active_scan = None;
                return Err(match e {
                    FaceError::CameraAccess(_) => e,
                    other => FaceError::CameraAccess(other.to_string()),
                });
            }
        };

        let outcome = self.learn_and_scan(stream.as_mut()).await;
        stream.stop();
        if let Some(handle) = self.active_scan.take() {
            handle.cancel();
        }
        outcome
    }

    async fn learn_and_scan(
        &mut self,
        stream: &mut dyn CameraStream,
    ) -> FaceResult<RecognitionOutcome> {
        self.status = RecognitionStatus::LearningFaces;
        let labeled = self.load_labeled_descriptors().await?;
        if self.saved_faces.is_empty() {
            self.status = RecognitionStatus::DatabaseEmpty;
            return Ok(RecognitionOutcome::EmptyDatabase);
        }

        let matcher = FaceMatcher::new(labeled, self.config.threshold);
        if matcher.is_empty() {
            warn!(records = self.saved_faces.len(), "no stored photo contains a detectable face");
            self.status = RecognitionStatus::NoReferenceFaces;
            return Ok(RecognitionOutcome::NoReferenceFaces);
        }

        let handle = self.scan_handle();
        let mut scan = ScanLoop::with_handle(self.config.scan_interval, handle.clone());
        self.status = RecognitionStatus::Scanning;

        while scan.next_tick().await {
            if let Some(result) = self.evaluate_frame(stream, &matcher).await {
                handle.cancel();
                self.status = RecognitionStatus::Matched;
                info!(
                    name = %result.record.label(),
                    confidence = result.confidence,
                    "face recognized"
                );
                return Ok(RecognitionOutcome::Matched(result));
            }
        }

        self.status = RecognitionStatus::Stopped;
        info!("face scan stopped");
        Ok(RecognitionOutcome::Cancelled)
    }

    /// Fetch the collection and compute one descriptor set per record
    async fn load_labeled_descriptors(&mut self) -> FaceResult<Vec<LabeledDescriptors>> {
        self.saved_faces = self.api.list_faces().await?;

        let recognizer = &self.recognizer;
        let labeled = join_all(self.saved_faces.iter().map(|face| async move {
            let mut descriptors = Vec::new();
            if let Some(image) = face.image_data_url() {
                match recognizer.detect_single(image).await {
                    Ok(Some(embedding)) => descriptors.push(embedding),
                    Ok(None) => debug!(name = %face.label(), "no face found in stored photo"),
                    Err(e) => warn!(name = %face.label(), error = %e, "stored photo unusable"),
                }
            }
            LabeledDescriptors::new(face.label(), descriptors)
        }))
        .await;

        Ok(labeled)
    }

    /// Check the first face in the current frame against the enrolled set
    async fn evaluate_frame(
        &self,
        stream: &mut dyn CameraStream,
        matcher: &FaceMatcher,
    ) -> Option<RecognitionResult> {
        let frame = match stream.capture().await {
            Ok(frame) => frame,
            Err(e) => {
                debug!(error = %e, "frame capture failed");
                return None;
            }
        };

        let detections = match self.recognizer.detect_all(&frame).await {
            Ok(detections) => detections,
            Err(e) => {
                debug!(error = %e, "detection failed");
                return None;
            }
        };

        let best = matcher.find_best_match(detections.first()?);
        if best.is_unknown() {
            return None;
        }

        let record = self
            .saved_faces
            .iter()
            .find(|face| face.label() == best.label)?;

        Some(RecognitionResult {
            record: record.clone(),
            distance: best.distance,
            confidence: best.confidence(),
        })
    }
}
