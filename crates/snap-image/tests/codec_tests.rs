use snap_base::Vec2;
use snap_image::{ImageError, MAX_QUALITY, Raster, decode_rgb, encode_jpeg, encode_jpeg_async};

fn gradient(width: usize, height: usize) -> Raster {
    let mut raster = Raster::new(Vec2::new(width, height)).unwrap();
    for y in 0..height {
        for x in 0..width {
            raster.set_pixel(x, y, [(x * 8) as u8, (y * 8) as u8, 128]);
        }
    }
    raster
}

#[test]
fn test_encode_jpeg_soi_marker() {
    let jpeg = encode_jpeg(&gradient(17, 10), MAX_QUALITY).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_encode_then_decode_keeps_dimensions() {
    let jpeg = encode_jpeg(&gradient(34, 20), MAX_QUALITY).unwrap();
    let decoded = decode_rgb(&jpeg).unwrap();
    assert_eq!(decoded.size(), Vec2::new(34, 20));
}

#[test]
fn test_max_quality_is_near_lossless_on_flat_color() {
    let mut raster = Raster::new(Vec2::new(16, 16)).unwrap();
    for y in 0..16 {
        for x in 0..16 {
            raster.set_pixel(x, y, [200, 40, 90]);
        }
    }
    let decoded = decode_rgb(&encode_jpeg(&raster, MAX_QUALITY).unwrap()).unwrap();
    let [r, g, b] = decoded.pixel(8, 8).unwrap();
    assert!((r as i32 - 200).abs() <= 3);
    assert!((g as i32 - 40).abs() <= 3);
    assert!((b as i32 - 90).abs() <= 3);
}

#[test]
fn test_quality_affects_size() {
    let raster = gradient(32, 32);
    let low = encode_jpeg(&raster, 10).unwrap();
    let high = encode_jpeg(&raster, MAX_QUALITY).unwrap();
    assert!(low.len() < high.len());
}

#[test]
fn test_encode_rejects_empty_raster() {
    let empty = Raster::new(Vec2::new(0, 10)).unwrap();
    match encode_jpeg(&empty, MAX_QUALITY) {
        Err(ImageError::Encode(msg)) => assert!(msg.contains("empty")),
        other => panic!("Expected ImageError::Encode, got {other:?}"),
    }
}

#[tokio::test]
async fn test_encode_jpeg_async() {
    let jpeg = encode_jpeg_async(gradient(8, 8), MAX_QUALITY).await.unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(matches!(decode_rgb(b"not a jpeg"), Err(ImageError::Decode(_))));
}

#[test]
fn test_decode_mjpeg_frame_from_image_crate() {
    use crates_image::ImageEncoder;

    let frame = crates_image::RgbImage::from_fn(6, 4, |x, y| crates_image::Rgb([x as u8 * 40, y as u8 * 60, 0]));
    let mut mjpeg = Vec::new();
    crates_image::codecs::jpeg::JpegEncoder::new(&mut mjpeg)
        .write_image(frame.as_raw(), 6, 4, crates_image::ExtendedColorType::Rgb8)
        .unwrap();

    let decoded = decode_rgb(&mjpeg).unwrap();
    assert_eq!(decoded.size(), Vec2::new(6, 4));
}
