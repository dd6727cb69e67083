//! Virtual try-on workflow.
//!
//! This crate provides:
//! - The workflow state machine (`WorkflowStore`)
//! - Image acquisition with revocable preview handles
//! - Scoped camera capture
//! - The rotating status ticker shown while generating
//! - `TryOnSession`, which sequences the generative service calls

pub mod acquisition;
pub mod camera;
pub mod config;
pub mod error;
pub mod logging;
pub mod messages;
pub mod metrics;
pub mod preview;
pub mod session;
pub mod status;
pub mod store;

pub use acquisition::ImageSlot;
pub use camera::{CameraDevice, CameraError, CameraResult, CaptureSession, VideoStream};
pub use config::WorkflowConfig;
pub use error::{MissingInput, WorkflowError, WorkflowResult};
pub use logging::WorkflowLogger;
pub use preview::{InMemoryPreviewRegistry, PreviewHandle, PreviewRegistry};
pub use session::TryOnSession;
pub use status::StatusTicker;
pub use store::{AnalysisRequest, SynthesisRequest, WorkflowStore};
