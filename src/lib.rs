/// Face Registry
///
/// A small REST server persisting enrolled faces to a JSON file and serving
/// the browser client and its model assets, plus the client-side enrollment
/// and recognition flows built against injected capabilities.

pub mod api;
pub mod client;
pub mod config;
pub mod context;
pub mod enroll;
pub mod error;
pub mod face_store;
pub mod metrics;
pub mod recognition;
pub mod server;

pub use config::ServerConfig;
pub use context::AppContext;
pub use error::{FaceError, FaceResult};
pub use face_store::{FaceRecord, FaceStore};
