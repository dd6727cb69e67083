//! Scoped camera capture.
//!
//! A `CaptureSession` owns a live video stream from the moment it opens.
//! The stream is stopped when the session is closed or dropped, whether or
//! not a photo was accepted.

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use thiserror::Error;
use tracing::{debug, info, warn};
use tryon_models::ImageFile;

use crate::error::WorkflowResult;

/// JPEG quality of accepted captures (0.95).
pub const CAPTURE_JPEG_QUALITY: u8 = 95;

pub type CameraResult<T> = Result<T, CameraError>;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("No camera available")]
    NotAvailable,

    #[error("Camera stream failed: {0}")]
    Stream(String),

    #[error("No frame captured")]
    NothingCaptured,

    #[error("Failed to encode capture: {0}")]
    Encode(String),
}

/// A camera that can be opened for a live stream.
pub trait CameraDevice: Send + Sync {
    fn open(&self) -> CameraResult<Box<dyn VideoStream>>;
}

/// A live video stream.
pub trait VideoStream: Send {
    /// Grab the current frame.
    fn grab_frame(&mut self) -> CameraResult<RgbImage>;

    /// Stop all tracks of the stream.
    fn stop(&mut self);
}

/// Live preview → frozen frame → accept or retake.
pub struct CaptureSession {
    stream: Option<Box<dyn VideoStream>>,
    frozen: Option<RgbImage>,
}

impl CaptureSession {
    /// Open the device and start the live stream.
    ///
    /// Fails with `WorkflowError::CameraUnavailable` when permission is
    /// denied or no device exists.
    pub fn open(device: &dyn CameraDevice) -> WorkflowResult<Self> {
        let stream = device.open().map_err(|e| {
            warn!("Camera could not be opened: {}", e);
            e
        })?;

        info!("Camera stream opened");
        Ok(Self {
            stream: Some(stream),
            frozen: None,
        })
    }

    /// Check the session shows the live stream (no frozen frame).
    pub fn is_live(&self) -> bool {
        self.frozen.is_none()
    }

    pub fn frozen_frame(&self) -> Option<&RgbImage> {
        self.frozen.as_ref()
    }

    /// Next live frame, for preview.
    pub fn live_frame(&mut self) -> CameraResult<RgbImage> {
        self.stream_mut()?.grab_frame()
    }

    /// Freeze the current frame.
    pub fn freeze(&mut self) -> CameraResult<&RgbImage> {
        let frame = self.stream_mut()?.grab_frame()?;
        debug!(width = frame.width(), height = frame.height(), "Camera frame frozen");
        Ok(&*self.frozen.insert(frame))
    }

    /// Discard the frozen frame and resume the live preview.
    pub fn retake(&mut self) {
        self.frozen = None;
    }

    /// Encode the frozen frame as a JPEG file and close the session.
    pub fn accept(mut self) -> CameraResult<ImageFile> {
        let frame = self.frozen.take().ok_or(CameraError::NothingCaptured)?;

        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, CAPTURE_JPEG_QUALITY)
            .encode_image(&frame)
            .map_err(|e| CameraError::Encode(e.to_string()))?;

        let name = format!("capture-{}.jpg", chrono::Utc::now().timestamp_millis());
        info!(name = %name, bytes = bytes.len(), "Camera capture accepted");

        Ok(ImageFile::new(name, "image/jpeg", bytes))
    }

    /// Close without taking a photo.
    pub fn close(self) {}

    fn stream_mut(&mut self) -> CameraResult<&mut Box<dyn VideoStream>> {
        self.stream
            .as_mut()
            .ok_or_else(|| CameraError::Stream("stream already stopped".to_string()))
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            debug!("Camera stream stopped");
        }
    }
}
