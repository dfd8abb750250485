use crate::{CaptureError, Facing, FrameSlot, V4l2Config, VideoDevice, VideoStream};
use snap_base::{Tensor, Vec2};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

/// V4L2 camera delivering MJPEG frames.
///
/// Clones share one open gate: the device node is held by at most one
/// stream at a time, including opens still running on the blocking pool
/// after their caller gave up.
#[derive(Debug, Clone)]
pub struct V4l2Device {
    config: V4l2Config,
    gate: Arc<Semaphore>,
}

impl Default for V4l2Device {
    fn default() -> Self {
        Self::new(V4l2Config::default())
    }
}

impl V4l2Device {
    pub fn new(config: V4l2Config) -> Self {
        Self {
            config,
            gate: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn config(&self) -> &V4l2Config {
        &self.config
    }
}

/// Open the device and negotiate MJPEG at the requested size and rate.
fn open_device(config: &V4l2Config) -> Result<Device, CaptureError> {
    let device = Device::with_path(config.device())?;

    let format = Format::new(config.width(), config.height(), FourCC::new(b"MJPG"));
    let format = Capture::set_format(&device, &format)?;
    if format.fourcc != FourCC::new(b"MJPG") {
        return Err(CaptureError::AcquisitionDenied(format!(
            "{} does not support MJPEG",
            config.device()
        )));
    }

    let params = v4l::video::capture::Parameters::with_fps(config.fps());
    Capture::set_params(&device, &params)?;

    log::info!(
        "opened {} at {}x{} MJPEG",
        config.device(),
        format.width,
        format.height
    );
    Ok(device)
}

impl VideoDevice for V4l2Device {
    type Stream = V4l2Stream;

    fn acquire(
        &self,
        facing: Facing,
    ) -> impl Future<Output = Result<V4l2Stream, CaptureError>> + Send {
        let config = self.config.clone();
        let gate = Arc::clone(&self.gate);
        async move {
            if facing != Facing::Environment {
                log::debug!(
                    "V4L2 has no facing selection, using {} for {:?}",
                    config.device(),
                    facing
                );
            }

            let permit = gate
                .acquire_owned()
                .await
                .map_err(|_| CaptureError::Device("device gate closed".to_string()))?;

            // the permit travels with the device, so an abandoned open still
            // holds the gate until its result is dropped
            let open_config = config.clone();
            let (device, permit) =
                tokio::task::spawn_blocking(move || open_device(&open_config).map(|d| (d, permit)))
                    .await
                    .map_err(|e| CaptureError::Device(e.to_string()))??;

            Ok(V4l2Stream::start(device, config.buffer_count(), permit))
        }
    }
}

/// Live V4L2 stream. A background thread decodes every frame into a
/// `FrameSlot` that `pixels` snapshots.
pub struct V4l2Stream {
    slot: Arc<FrameSlot>,
    stop: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
    permit: Option<OwnedSemaphorePermit>,
}

impl std::fmt::Debug for V4l2Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Stream")
            .field("dimensions", &self.slot.dimensions())
            .field("running", &self.thread_handle.is_some())
            .finish()
    }
}

impl V4l2Stream {
    fn start(device: Device, buffer_count: u32, permit: OwnedSemaphorePermit) -> Self {
        let slot = Arc::new(FrameSlot::new());
        let stop = Arc::new(AtomicBool::new(false));

        let handle = thread::spawn({
            let slot = Arc::clone(&slot);
            let stop = Arc::clone(&stop);
            move || {
                if let Err(e) = Self::capture_loop(device, &slot, &stop, buffer_count) {
                    log::error!("v4l2 capture thread stopped: {e}");
                }
            }
        });

        Self {
            slot,
            stop,
            thread_handle: Some(handle),
            permit: Some(permit),
        }
    }

    fn capture_loop(
        device: Device,
        slot: &FrameSlot,
        stop: &AtomicBool,
        buffer_count: u32,
    ) -> Result<(), CaptureError> {
        let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, buffer_count)?;

        while !stop.load(Ordering::Relaxed) {
            // buffer is only valid until the next call, decode it now
            let (frame_data, _metadata) = CaptureStream::next(&mut stream)?;
            match snap_image::decode_rgb(frame_data) {
                Ok(raster) => slot.store(raster),
                Err(e) => log::warn!("dropping undecodable frame: {e}"),
            }
        }

        Ok(())
    }
}

impl VideoStream for V4l2Stream {
    fn dimensions(&self) -> Vec2<usize> {
        self.slot.dimensions()
    }

    fn pixels(&self) -> Result<Tensor<u8>, CaptureError> {
        self.slot.pixels()
    }

    fn release(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
            log::debug!("v4l2 capture thread joined");
        }
        self.slot.clear();
        // device is closed with the joined thread; reopen may proceed
        self.permit.take();
    }
}

impl Drop for V4l2Stream {
    fn drop(&mut self) {
        self.release();
    }
}
