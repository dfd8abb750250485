//! Capture lifecycle: owns the video source and drives the still pipeline.
//!
//! ```text
//! Idle -> Acquiring -> Ready <-> Capturing
//!   ^         |          |          |
//!   +---------+----------+----------+   (deactivate, denial, drop)
//! ```
//!
//! A one-permit semaphore stands for the hardware: an activation holds it
//! from before `acquire` until its handle is released, so a second
//! acquisition waits for a cancelled one to settle and at most one handle
//! exists at a time. Pixels are only read under the state lock through the
//! lease; `deactivate` takes the lease out under the lock and releases it
//! afterwards, so nothing reads a released handle.

use crate::{
    BusyPolicy, CaptureConfig, CaptureError, CapturedArtifact, RawFrame, SourceHandle,
    VideoDevice, VideoStream, crop, encoder, encoder::CaptureClock, orientation, sampler,
    transform,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Acquiring,
    Ready,
    Capturing,
}

/// A live handle and the slot permit it occupies.
struct Lease<S: VideoStream> {
    handle: SourceHandle<S>,
    _slot: OwnedSemaphorePermit,
}

impl<S: VideoStream> Lease<S> {
    /// Give the hardware back, then free the slot.
    fn release(mut self) {
        self.handle.release();
    }
}

struct Shared<S: VideoStream> {
    state: ControllerState,
    // bumped on every activation; stale acquisitions and captures compare against it
    session: u64,
    // Some iff state is Ready or Capturing
    lease: Option<Lease<S>>,
}

fn lock<S: VideoStream>(shared: &Mutex<Shared<S>>) -> MutexGuard<'_, Shared<S>> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

/// Moves `from -> to` for one session when completed or dropped, unless the
/// session was superseded in the meantime.
struct Transition<'a, S: VideoStream> {
    shared: &'a Mutex<Shared<S>>,
    session: u64,
    from: ControllerState,
    to: ControllerState,
    armed: bool,
}

impl<'a, S: VideoStream> Transition<'a, S> {
    fn new(
        shared: &'a Mutex<Shared<S>>,
        session: u64,
        from: ControllerState,
        to: ControllerState,
    ) -> Self {
        Self {
            shared,
            session,
            from,
            to,
            armed: true,
        }
    }

    fn apply(&self, shared: &mut Shared<S>) -> bool {
        if shared.session == self.session && shared.state == self.from {
            shared.state = self.to;
            true
        } else {
            false
        }
    }

    /// Returns false if the session was deactivated before completion.
    fn complete(mut self) -> bool {
        self.armed = false;
        self.apply(&mut lock(self.shared))
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<S: VideoStream> Drop for Transition<'_, S> {
    fn drop(&mut self) {
        if self.armed && self.apply(&mut lock(self.shared)) {
            log::debug!(
                "session {}: abandoned while {:?}, back to {:?}",
                self.session,
                self.from,
                self.to
            );
        }
    }
}

/// Owns one video device and turns its live stream into normalized stills.
///
/// All methods take `&self`; share the controller behind an `Arc` to
/// activate, deactivate, and capture from different tasks.
pub struct CaptureController<D: VideoDevice> {
    device: D,
    config: CaptureConfig,
    shared: Mutex<Shared<D::Stream>>,
    slot: Arc<Semaphore>,
    pipeline: tokio::sync::Mutex<()>,
    clock: CaptureClock,
}

impl<D: VideoDevice> CaptureController<D> {
    pub fn new(device: D, config: CaptureConfig) -> Self {
        Self {
            device,
            config,
            shared: Mutex::new(Shared {
                state: ControllerState::Idle,
                session: 0,
                lease: None,
            }),
            slot: Arc::new(Semaphore::new(1)),
            pipeline: tokio::sync::Mutex::new(()),
            clock: CaptureClock::new(),
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn state(&self) -> ControllerState {
        lock(&self.shared).state
    }

    fn is_current(&self, session: u64, state: ControllerState) -> bool {
        let shared = lock(&self.shared);
        shared.session == session && shared.state == state
    }

    /// Acquire the video source. Called when the capture surface becomes active.
    ///
    /// A no-op if the controller is not idle.
    ///
    /// # Errors
    ///
    /// `AcquisitionDenied` or `AcquisitionTimeout` leave the controller idle.
    /// `Cancelled` if `deactivate` ran while acquisition was pending; a late
    /// grant is released at once. While an earlier handle or cancelled
    /// acquisition still holds the hardware, this waits for it to settle.
    pub async fn activate(&self) -> Result<(), CaptureError> {
        let session = {
            let mut shared = lock(&self.shared);
            if shared.state != ControllerState::Idle {
                log::debug!("activate ignored, controller is {:?}", shared.state);
                return Ok(());
            }
            shared.session += 1;
            shared.state = ControllerState::Acquiring;
            shared.session
        };
        let pending = Transition::new(
            &self.shared,
            session,
            ControllerState::Acquiring,
            ControllerState::Idle,
        );

        let slot = Arc::clone(&self.slot)
            .acquire_owned()
            .await
            .map_err(|_| CaptureError::Device("video source slot closed".to_string()))?;
        if !self.is_current(session, ControllerState::Acquiring) {
            log::info!("session {session}: cancelled before acquisition started");
            return Err(CaptureError::Cancelled);
        }

        log::info!("session {session}: acquiring {:?} camera", self.config.facing());
        let acquire = self.device.acquire(self.config.facing());
        let result = match self.config.acquire_timeout() {
            Some(limit) => tokio::time::timeout(limit, acquire)
                .await
                .unwrap_or(Err(CaptureError::AcquisitionTimeout(limit))),
            None => acquire.await,
        };

        let mut shared = lock(&self.shared);
        let current = shared.session == session && shared.state == ControllerState::Acquiring;
        match result {
            Ok(stream) if current => {
                let handle = SourceHandle::new(stream);
                log::info!("session {session}: video source ready {:?}", handle);
                shared.lease = Some(Lease {
                    handle,
                    _slot: slot,
                });
                shared.state = ControllerState::Ready;
                drop(shared);
                pending.disarm();
                Ok(())
            }
            Ok(stream) => {
                drop(shared);
                pending.disarm();
                Lease {
                    handle: SourceHandle::new(stream),
                    _slot: slot,
                }
                .release();
                log::warn!("session {session}: grant arrived after deactivation, released");
                Err(CaptureError::Cancelled)
            }
            Err(err) => {
                drop(shared);
                // leaves Acquiring for Idle if nothing else already did
                pending.complete();
                log::warn!("session {session}: acquisition failed: {err}");
                Err(err)
            }
        }
    }

    /// Release the video source. Called when the capture surface becomes
    /// inactive. Idempotent; also cancels a pending acquisition and discards
    /// an in-flight capture.
    pub fn deactivate(&self) {
        let (previous, lease) = {
            let mut shared = lock(&self.shared);
            let previous = shared.state;
            shared.state = ControllerState::Idle;
            (previous, shared.lease.take())
        };
        // outside the state lock; the slot stays taken until release returns
        if let Some(lease) = lease {
            lease.release();
        }

        match previous {
            ControllerState::Idle => log::debug!("deactivate ignored, already idle"),
            ControllerState::Acquiring => log::info!("pending acquisition cancelled"),
            ControllerState::Ready => log::info!("video source released"),
            ControllerState::Capturing => {
                log::warn!("video source released with a capture in flight")
            }
        }
    }

    /// Capture one still: sample, classify, crop, rotate if portrait, encode.
    ///
    /// # Errors
    ///
    /// `Inactive` when idle, `NotReady` while acquiring or warming up,
    /// `CaptureBusy` under `BusyPolicy::Reject`, `Render` or `EncodeFailure`
    /// from the image stages, `Discarded` if deactivated before the still was
    /// finished.
    pub async fn capture(&self) -> Result<CapturedArtifact, CaptureError> {
        let _turn = match self.config.busy_policy() {
            BusyPolicy::Queue => self.pipeline.lock().await,
            BusyPolicy::Reject => self
                .pipeline
                .try_lock()
                .map_err(|_| CaptureError::CaptureBusy)?,
        };

        let (session, frame) = self.begin_capture()?;
        let in_flight = Transition::new(
            &self.shared,
            session,
            ControllerState::Capturing,
            ControllerState::Ready,
        );

        let result = self.process(frame).await;

        if !in_flight.complete() {
            log::warn!("session {session}: capture discarded after deactivation");
            return Err(CaptureError::Discarded);
        }
        result
    }

    fn begin_capture(&self) -> Result<(u64, RawFrame), CaptureError> {
        let mut shared = lock(&self.shared);
        match shared.state {
            ControllerState::Ready => {}
            ControllerState::Idle => return Err(CaptureError::Inactive),
            ControllerState::Acquiring => return Err(CaptureError::NotReady),
            ControllerState::Capturing => return Err(CaptureError::CaptureBusy),
        }

        let stream = shared
            .lease
            .as_ref()
            .and_then(|lease| lease.handle.stream())
            .ok_or(CaptureError::Inactive)?;
        let frame = sampler::sample(stream)?;

        shared.state = ControllerState::Capturing;
        Ok((shared.session, frame))
    }

    async fn process(&self, frame: RawFrame) -> Result<CapturedArtifact, CaptureError> {
        let orientation = orientation::classify(&frame);
        let plan = crop::plan(&frame, orientation, self.config.target_ratio());
        let pixels = plan.pixels();
        log::debug!(
            "{:?} frame {}: crop {} at ({}, {}) -> {}",
            orientation,
            frame.size(),
            pixels.source.size,
            pixels.source.origin.x,
            pixels.source.origin.y,
            pixels.dest
        );

        let image = transform::render(&frame, &plan, self.config.rotation())?;
        drop(frame);

        let artifact = encoder::encode(
            image,
            self.config.quality(),
            self.config.filename_prefix(),
            &self.clock,
        )
        .await?;
        log::info!(
            "captured {} ({} bytes, {})",
            artifact.filename,
            artifact.bytes.len(),
            artifact.size
        );
        Ok(artifact)
    }
}

impl<D: VideoDevice> Drop for CaptureController<D> {
    fn drop(&mut self) {
        self.deactivate();
    }
}
