use crate::Facing;
use snap_image::{MAX_QUALITY, Rotation};
use std::time::Duration;

/// Width-to-height ratio of every captured still.
pub const DEFAULT_TARGET_RATIO: f64 = 1.7;

/// What to do with a capture request that arrives while another is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusyPolicy {
    /// Wait behind the in-flight capture.
    #[default]
    Queue,
    /// Fail immediately with `CaptureError::CaptureBusy`.
    Reject,
}

/// Configuration for the capture pipeline.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    target_ratio: f64,
    quality: u8,
    filename_prefix: String,
    rotation: Rotation,
    busy_policy: BusyPolicy,
    acquire_timeout: Option<Duration>,
    facing: Facing,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            target_ratio: DEFAULT_TARGET_RATIO,
            quality: MAX_QUALITY,
            filename_prefix: "cnic".to_string(),
            rotation: Rotation::Clockwise,
            busy_policy: BusyPolicy::Queue,
            acquire_timeout: Some(Duration::from_secs(10)),
            facing: Facing::Environment,
        }
    }
}

impl CaptureConfig {
    /// Set the output width-to-height ratio. Non-finite or non-positive values are ignored.
    pub fn with_target_ratio(mut self, ratio: f64) -> Self {
        if ratio.is_finite() && ratio > 0.0 {
            self.target_ratio = ratio;
        } else {
            log::warn!("ignoring invalid target ratio {ratio}");
        }
        self
    }

    /// Set the JPEG quality (1-100).
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, MAX_QUALITY);
        self
    }

    /// Set the filename prefix; files are named `{prefix}-{unix_millis}.jpg`.
    pub fn with_filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filename_prefix = prefix.into();
        self
    }

    /// Set the quarter-turn applied to portrait frames.
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_busy_policy(mut self, policy: BusyPolicy) -> Self {
        self.busy_policy = policy;
        self
    }

    /// Bound acquisition time; `None` waits forever.
    pub fn with_acquire_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    // Getters
    pub fn target_ratio(&self) -> f64 {
        self.target_ratio
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn filename_prefix(&self) -> &str {
        &self.filename_prefix
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn busy_policy(&self) -> BusyPolicy {
        self.busy_policy
    }

    pub fn acquire_timeout(&self) -> Option<Duration> {
        self.acquire_timeout
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }
}

/// Configuration for a V4L2 capture device.
#[derive(Clone, Debug)]
pub struct V4l2Config {
    device: String,
    width: u32,
    height: u32,
    fps: u32,
    buffer_count: u32,
}

impl Default for V4l2Config {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 1280,
            height: 720,
            fps: 30,
            buffer_count: 4,
        }
    }
}

impl V4l2Config {
    /// Set the device path (e.g., "/dev/video0").
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    /// Set the requested capture width in pixels. The driver may adjust it.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set the requested capture height in pixels. The driver may adjust it.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the number of mmap buffers for the capture stream.
    pub fn with_buffer_count(mut self, buffer_count: u32) -> Self {
        self.buffer_count = buffer_count;
        self
    }

    // Getters
    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn buffer_count(&self) -> u32 {
        self.buffer_count
    }
}
