use crate::CaptureError;
use snap_base::{Tensor, Vec2};
use snap_image::Raster;
use std::sync::{Mutex, MutexGuard};

/// Most recent decoded frame of a live stream.
///
/// A producer thread `store`s every frame it decodes; readers snapshot
/// whatever is current. Empty until the first frame lands and after `clear`.
#[derive(Debug, Default)]
pub struct FrameSlot {
    latest: Mutex<Option<Raster>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn latest(&self) -> MutexGuard<'_, Option<Raster>> {
        self.latest.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the current frame.
    pub fn store(&self, frame: Raster) {
        *self.latest() = Some(frame);
    }

    /// Drop the current frame; readers see an empty slot again.
    pub fn clear(&self) {
        self.latest().take();
    }

    pub fn is_empty(&self) -> bool {
        self.latest().is_none()
    }

    /// Size of the current frame, zero while empty.
    pub fn dimensions(&self) -> Vec2<usize> {
        self.latest().as_ref().map(Raster::size).unwrap_or_default()
    }

    /// HWC copy of the current frame.
    ///
    /// # Errors
    ///
    /// `NotReady` while the slot is empty.
    pub fn pixels(&self) -> Result<Tensor<u8>, CaptureError> {
        self.latest()
            .as_ref()
            .map(|raster| raster.clone().into_tensor())
            .ok_or(CaptureError::NotReady)
    }
}
