use crate::{CaptureError, VideoStream};
use snap_base::Vec2;
use snap_image::Raster;

/// Immutable snapshot of the stream at the instant of capture.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pixels: Raster,
}

impl RawFrame {
    pub fn new(pixels: Raster) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    pub fn size(&self) -> Vec2<usize> {
        self.pixels.size()
    }

    pub fn pixels(&self) -> &Raster {
        &self.pixels
    }
}

/// Read the current dimensions and pixels of `stream`.
///
/// # Errors
///
/// `NotReady` while the stream is warming up (a zero dimension), `Stream` if
/// the pixel buffer disagrees with the reported dimensions.
pub fn sample<S: VideoStream>(stream: &S) -> Result<RawFrame, CaptureError> {
    let size = stream.dimensions();
    if size.is_empty() {
        return Err(CaptureError::NotReady);
    }

    let pixels = Raster::from_tensor(stream.pixels()?)
        .map_err(|e| CaptureError::Stream(e.to_string()))?;
    if pixels.size() != size {
        return Err(CaptureError::Stream(format!(
            "frame buffer is {} but stream reports {size}",
            pixels.size()
        )));
    }

    Ok(RawFrame::new(pixels))
}
