//! Shared data models for the virtual try-on workflow.
//!
//! This crate provides Serde-serializable types for:
//! - Workflow steps
//! - Source images and media types
//! - Detected item labels and the user's selection
//! - The generated try-on image
//! - Read-only workflow snapshots

pub mod generated;
pub mod image;
pub mod items;
pub mod snapshot;
pub mod step;

// Re-export common types
pub use generated::{GeneratedImage, GeneratedImageError, DOWNLOAD_FILE_PREFIX};
pub use image::{extension_for_media_type, is_image_media_type, ImageFile, ImageRole, ImageSource};
pub use items::{DetectedItems, ItemSelection, ENTIRE_ITEM_LABEL};
pub use snapshot::{ImageSummary, ResultSummary, WorkflowSnapshot};
pub use step::WorkflowStep;
