use crate::CaptureError;
use snap_base::{Tensor, Vec2};
use std::future::Future;

/// Which physical camera to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Rear camera, pointing away from the user.
    #[default]
    Environment,
    /// Front camera, pointing at the user.
    User,
}

/// A capture device that can hand out a live stream.
pub trait VideoDevice: Send + Sync + 'static {
    type Stream: VideoStream;

    /// Ask the hardware for a stream.
    ///
    /// Suspends until access is granted or denied. A refusal or a missing
    /// device is reported as `CaptureError::AcquisitionDenied`.
    fn acquire(
        &self,
        facing: Facing,
    ) -> impl Future<Output = Result<Self::Stream, CaptureError>> + Send;
}

/// A live, hardware-bound video stream.
pub trait VideoStream: Send + 'static {
    /// Current frame size; zero on either axis until the first frame is decoded.
    fn dimensions(&self) -> Vec2<usize>;

    /// Snapshot of the current frame as an HWC RGB tensor.
    fn pixels(&self) -> Result<Tensor<u8>, CaptureError>;

    /// Stop the stream and give the hardware back.
    fn release(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Active,
    Released,
}

/// Exclusive owner of a granted stream.
///
/// Release is idempotent and also happens on drop, so a handle can never
/// leak the device no matter which path discards it.
pub struct SourceHandle<S: VideoStream> {
    stream: S,
    state: HandleState,
}

impl<S: VideoStream> std::fmt::Debug for SourceHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceHandle")
            .field("state", &self.state)
            .field("dimensions", &self.stream.dimensions())
            .finish()
    }
}

impl<S: VideoStream> SourceHandle<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            state: HandleState::Active,
        }
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    /// Borrow the stream for reading; `None` once released.
    pub fn stream(&self) -> Option<&S> {
        match self.state {
            HandleState::Active => Some(&self.stream),
            HandleState::Released => None,
        }
    }

    pub fn release(&mut self) {
        if self.state == HandleState::Active {
            self.stream.release();
            self.state = HandleState::Released;
        }
    }
}

impl<S: VideoStream> Drop for SourceHandle<S> {
    fn drop(&mut self) {
        self.release();
    }
}
