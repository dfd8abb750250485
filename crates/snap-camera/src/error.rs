use snap_image::ImageError;
use std::{fmt, io, time::Duration};

#[derive(Debug)]
pub enum CaptureError {
    /// Permission refused or no usable device. The surface stays inactive.
    AcquisitionDenied(String),
    /// The device neither granted nor denied access in time.
    AcquisitionTimeout(Duration),
    /// Deactivated while acquisition was still pending.
    Cancelled,
    /// The stream has not delivered a decoded frame yet.
    NotReady,
    /// The crop or rotation copy failed; the controller stays ready.
    Render(ImageError),
    /// Encoding failed; the controller stays ready.
    EncodeFailure(ImageError),
    /// Another capture is in flight.
    CaptureBusy,
    /// No active source; activate first.
    Inactive,
    /// Deactivated while this capture was in flight; its result was dropped.
    Discarded,
    Device(String),
    Stream(String),
}

impl CaptureError {
    /// Errors the caller may simply retry on the next tick.
    pub fn is_transient(&self) -> bool {
        matches!(self, CaptureError::NotReady | CaptureError::CaptureBusy)
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::AcquisitionDenied(msg) => write!(f, "acquisition denied: {msg}"),
            CaptureError::AcquisitionTimeout(after) => {
                write!(f, "acquisition timed out after {}ms", after.as_millis())
            }
            CaptureError::Cancelled => write!(f, "acquisition cancelled by deactivation"),
            CaptureError::NotReady => write!(f, "video source has no frame yet"),
            CaptureError::Render(err) => write!(f, "render failure: {err}"),
            CaptureError::EncodeFailure(err) => write!(f, "encode failure: {err}"),
            CaptureError::CaptureBusy => write!(f, "a capture is already in flight"),
            CaptureError::Inactive => write!(f, "capture surface is not active"),
            CaptureError::Discarded => write!(f, "capture discarded by deactivation"),
            CaptureError::Device(msg) => write!(f, "device error: {msg}"),
            CaptureError::Stream(msg) => write!(f, "stream error: {msg}"),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Render(err) | CaptureError::EncodeFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CaptureError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound => {
                CaptureError::AcquisitionDenied(err.to_string())
            }
            _ => CaptureError::Device(err.to_string()),
        }
    }
}

impl From<ImageError> for CaptureError {
    fn from(err: ImageError) -> Self {
        CaptureError::EncodeFailure(err)
    }
}
