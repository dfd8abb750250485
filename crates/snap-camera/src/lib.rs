//! Still capture from a live camera stream.
//!
//! `CaptureController` owns a `VideoDevice`'s stream for as long as the
//! capture surface is active. Each `capture()` samples the current frame,
//! crops it to a fixed aspect ratio (1.7 by default), turns portrait frames
//! a quarter so the output is always landscape, and encodes a JPEG
//! `CapturedArtifact`.

pub mod config;
pub mod controller;
pub mod crop;
pub mod encoder;
pub mod error;
pub mod orientation;
pub mod sampler;
pub mod slot;
pub mod source;
pub mod transform;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::{BusyPolicy, CaptureConfig, DEFAULT_TARGET_RATIO, V4l2Config};
pub use controller::{CaptureController, ControllerState};
pub use crop::{CropPlan, PixelPlan};
pub use encoder::{CaptureClock, CapturedArtifact};
pub use error::CaptureError;
pub use orientation::Orientation;
pub use sampler::RawFrame;
pub use slot::FrameSlot;
pub use source::{Facing, HandleState, SourceHandle, VideoDevice, VideoStream};

pub use snap_image::Rotation;

#[cfg(feature = "v4l2")]
pub use v4l2::{V4l2Device, V4l2Stream};
