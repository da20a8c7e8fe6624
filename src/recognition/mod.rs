/// Live face recognition against the enrolled collection
///
/// The detector/embedder and the camera are injected capabilities; this
/// module owns matching, the scan timer and the flow around them.

pub mod capability;
pub mod matcher;
pub mod scan;
pub mod session;

pub use capability::{Camera, CameraStream, FaceRecognizer, Frame};
pub use matcher::{
    confidence_from_distance, Embedding, FaceMatch, FaceMatcher, LabeledDescriptors,
    DEFAULT_DISTANCE_THRESHOLD, UNKNOWN_LABEL,
};
pub use scan::{ScanHandle, ScanLoop, DEFAULT_SCAN_INTERVAL};
pub use session::{
    RecognitionConfig, RecognitionOutcome, RecognitionResult, RecognitionSession,
    RecognitionStatus,
};
