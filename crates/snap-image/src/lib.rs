//! Raster surfaces and still-image codecs for the snap capture stack.
//!
//! Frames are RGB8 in HWC layout (`[height, width, 3]`), backed by
//! `Tensor<u8>` from `snap-base`. Encoding and decoding wrap the `image`
//! crate.

pub mod error;
pub mod raster;

pub use error::ImageError;
pub use raster::{Raster, Rotation};

use crates_image::ImageEncoder;
use snap_base::Tensor;

/// MIME type of everything produced by [`encode_jpeg`].
pub const JPEG_MIME: &str = "image/jpeg";

/// Highest JPEG quality, equivalent to a canvas quality of 1.0.
pub const MAX_QUALITY: u8 = 100;

/// Encodes a raster as baseline JPEG.
///
/// `quality` is clamped to 1..=100.
///
/// # Errors
///
/// Returns `ImageError::Encode` if the raster has no pixels or the codec
/// rejects the buffer.
pub fn encode_jpeg(raster: &Raster, quality: u8) -> Result<Vec<u8>, ImageError> {
    if raster.is_empty() {
        return Err(ImageError::Encode(format!(
            "cannot encode empty {} raster",
            raster.size()
        )));
    }

    let mut buffer = Vec::new();
    let encoder =
        crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    encoder
        .write_image(
            raster.as_bytes(),
            raster.width() as u32,
            raster.height() as u32,
            crates_image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImageError::Encode(e.to_string()))?;

    Ok(buffer)
}

/// Encodes a raster as JPEG on tokio's blocking thread pool.
///
/// # Errors
///
/// Same as [`encode_jpeg`]; a panicked or cancelled worker is reported as
/// `ImageError::Encode`.
pub async fn encode_jpeg_async(raster: Raster, quality: u8) -> Result<Vec<u8>, ImageError> {
    tokio::task::spawn_blocking(move || encode_jpeg(&raster, quality))
        .await
        .map_err(|e| ImageError::Encode(e.to_string()))?
}

/// Decodes a compressed image (typically an MJPEG camera frame) into RGB8.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is not a supported image.
pub fn decode_rgb(data: &[u8]) -> Result<Raster, ImageError> {
    let rgb = crates_image::load_from_memory(data)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    let tensor = Tensor::new(vec![height as usize, width as usize, 3], rgb.into_raw())?;
    Raster::from_tensor(tensor)
}
