use crate::CaptureError;
use snap_base::Vec2;
use snap_image::{JPEG_MIME, Raster};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The finished still, handed to whoever asked for the capture.
#[derive(Clone)]
pub struct CapturedArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
    pub captured_at: SystemTime,
    pub size: Vec2<usize>,
}

impl std::fmt::Debug for CapturedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedArtifact")
            .field("bytes", &self.bytes.len())
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("captured_at", &self.captured_at)
            .field("size", &self.size)
            .finish()
    }
}

/// Hands out capture timestamps that strictly increase within a session,
/// so filenames stay unique even for captures in the same millisecond.
#[derive(Debug, Default)]
pub struct CaptureClock {
    last_millis: AtomicU64,
}

impl CaptureClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next stamp at or after `now`.
    pub fn stamp_at(&self, now: SystemTime) -> SystemTime {
        let now_millis = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut last = self.last_millis.load(Ordering::Relaxed);
        loop {
            let next = now_millis.max(last + 1);
            match self.last_millis.compare_exchange_weak(
                last,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return UNIX_EPOCH + Duration::from_millis(next),
                Err(current) => last = current,
            }
        }
    }

    pub fn stamp(&self) -> SystemTime {
        self.stamp_at(SystemTime::now())
    }
}

pub fn artifact_filename(prefix: &str, captured_at: SystemTime) -> String {
    let millis = captured_at
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("{prefix}-{millis}.jpg")
}

/// JPEG-encode `image` into an artifact stamped by `clock`.
///
/// Runs the codec on the blocking pool.
///
/// # Errors
///
/// `EncodeFailure` for a zero-sized surface or a codec rejection.
pub async fn encode(
    image: Raster,
    quality: u8,
    prefix: &str,
    clock: &CaptureClock,
) -> Result<CapturedArtifact, CaptureError> {
    let size = image.size();
    let captured_at = clock.stamp();
    let bytes = snap_image::encode_jpeg_async(image, quality).await?;

    Ok(CapturedArtifact {
        bytes,
        filename: artifact_filename(prefix, captured_at),
        mime_type: JPEG_MIME,
        captured_at,
        size,
    })
}
