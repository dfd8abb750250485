#![allow(dead_code)]

use snap_base::{Tensor, Vec2};
use snap_camera::{CaptureController, CaptureError, ControllerState, Facing, VideoDevice, VideoStream};
use snap_image::Raster;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// How the scripted device answers `acquire`.
#[derive(Clone)]
pub enum Grant {
    Immediate,
    Deny(String),
    /// Grant once the gate is notified.
    Gated(Arc<Notify>),
    Never,
}

/// Counters shared between a device, its streams, and the test.
#[derive(Default)]
pub struct Counters {
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    pub live: AtomicUsize,
    pub peak_live: AtomicUsize,
    /// `acquire` calls that have neither resolved nor been dropped.
    pub outstanding: AtomicUsize,
    pub peak_outstanding: AtomicUsize,
    /// Set once a stream's `release` has started.
    pub releasing: AtomicBool,
    pub pixel_reads: AtomicUsize,
    pub reads_after_release: AtomicUsize,
    pub facings: Mutex<Vec<Facing>>,
}

impl Counters {
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn reads_after_release(&self) -> usize {
        self.reads_after_release.load(Ordering::SeqCst)
    }

    pub fn peak_live(&self) -> usize {
        self.peak_live.load(Ordering::SeqCst)
    }

    pub fn peak_outstanding(&self) -> usize {
        self.peak_outstanding.load(Ordering::SeqCst)
    }

    pub fn releasing(&self) -> bool {
        self.releasing.load(Ordering::SeqCst)
    }
}

/// Counts one `acquire` call as outstanding until dropped.
struct Outstanding(Arc<Counters>);

impl Outstanding {
    fn enter(counters: &Arc<Counters>) -> Self {
        let now = counters.outstanding.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak_outstanding.fetch_max(now, Ordering::SeqCst);
        Self(Arc::clone(counters))
    }
}

impl Drop for Outstanding {
    fn drop(&mut self) {
        self.0.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct ScriptedDevice {
    frame: Arc<Raster>,
    grant: Grant,
    warmup_reads: usize,
    release_delay: Duration,
    pub counters: Arc<Counters>,
}

impl ScriptedDevice {
    pub fn new(frame: Raster) -> Self {
        Self {
            frame: Arc::new(frame),
            grant: Grant::Immediate,
            warmup_reads: 0,
            release_delay: Duration::ZERO,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn with_grant(mut self, grant: Grant) -> Self {
        self.grant = grant;
        self
    }

    /// Report zero dimensions for the first `reads` samples.
    pub fn warming_up(mut self, reads: usize) -> Self {
        self.warmup_reads = reads;
        self
    }

    /// Block inside `release` for `delay`, like a driver joining its capture thread.
    pub fn slow_release(mut self, delay: Duration) -> Self {
        self.release_delay = delay;
        self
    }
}

impl VideoDevice for ScriptedDevice {
    type Stream = ScriptedStream;

    fn acquire(
        &self,
        facing: Facing,
    ) -> impl Future<Output = Result<ScriptedStream, CaptureError>> + Send {
        let grant = self.grant.clone();
        let counters = Arc::clone(&self.counters);
        let frame = Arc::clone(&self.frame);
        let warmup = self.warmup_reads;
        let release_delay = self.release_delay;
        async move {
            let _outstanding = Outstanding::enter(&counters);
            counters.facings.lock().unwrap().push(facing);
            match grant {
                Grant::Immediate => {}
                Grant::Deny(reason) => return Err(CaptureError::AcquisitionDenied(reason)),
                Grant::Gated(gate) => gate.notified().await,
                Grant::Never => std::future::pending::<()>().await,
            }
            counters.acquired.fetch_add(1, Ordering::SeqCst);
            let live = counters.live.fetch_add(1, Ordering::SeqCst) + 1;
            counters.peak_live.fetch_max(live, Ordering::SeqCst);
            Ok(ScriptedStream {
                frame,
                warmup: AtomicUsize::new(warmup),
                released: false,
                release_delay,
                counters: Arc::clone(&counters),
            })
        }
    }
}

pub struct ScriptedStream {
    frame: Arc<Raster>,
    warmup: AtomicUsize,
    released: bool,
    release_delay: Duration,
    counters: Arc<Counters>,
}

impl VideoStream for ScriptedStream {
    fn dimensions(&self) -> Vec2<usize> {
        let warming = self
            .warmup
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if warming { Vec2::zero() } else { self.frame.size() }
    }

    fn pixels(&self) -> Result<Tensor<u8>, CaptureError> {
        self.counters.pixel_reads.fetch_add(1, Ordering::SeqCst);
        if self.released {
            self.counters.reads_after_release.fetch_add(1, Ordering::SeqCst);
        }
        Ok(self.frame.as_ref().clone().into_tensor())
    }

    fn release(&mut self) {
        if !self.released {
            self.counters.releasing.store(true, Ordering::SeqCst);
            std::thread::sleep(self.release_delay);
            self.released = true;
            self.counters.live.fetch_sub(1, Ordering::SeqCst);
            self.counters.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.release();
    }
}

/// Raster whose pixel at (x, y) is `[x, y, 0]`; dimensions must stay below 256.
pub fn coordinate_frame(width: usize, height: usize) -> Raster {
    let mut raster = Raster::new(Vec2::new(width, height)).unwrap();
    for y in 0..height {
        for x in 0..width {
            raster.set_pixel(x, y, [x as u8, y as u8, 0]);
        }
    }
    raster
}

/// Raster with a red top half and a blue bottom half.
pub fn split_frame(width: usize, height: usize) -> Raster {
    let mut raster = Raster::new(Vec2::new(width, height)).unwrap();
    for y in 0..height {
        let color = if y < height / 2 { [255, 0, 0] } else { [0, 0, 255] };
        for x in 0..width {
            raster.set_pixel(x, y, color);
        }
    }
    raster
}

/// Mid-grey frame of the given size.
pub fn flat_frame(width: usize, height: usize) -> Raster {
    let mut raster = Raster::new(Vec2::new(width, height)).unwrap();
    for y in 0..height {
        for x in 0..width {
            raster.set_pixel(x, y, [128, 128, 128]);
        }
    }
    raster
}

/// Poll until the controller reports `state`, failing after five seconds.
pub async fn wait_for_state<D: VideoDevice>(controller: &CaptureController<D>, state: ControllerState) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while controller.state() != state {
        assert!(
            tokio::time::Instant::now() < deadline,
            "controller never reached {state:?}, stuck at {:?}",
            controller.state()
        );
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

/// Poll `condition` until it holds, failing after five seconds.
pub async fn wait_for(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(tokio::time::Instant::now() < deadline, "condition never held");
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

pub fn is_red(rgb: [u8; 3]) -> bool {
    rgb[0] > 200 && rgb[2] < 60
}

pub fn is_blue(rgb: [u8; 3]) -> bool {
    rgb[2] > 200 && rgb[0] < 60
}
