#![cfg(feature = "v4l2")]

use snap_camera::{CaptureError, Facing, V4l2Config, V4l2Device, VideoDevice};

#[tokio::test]
async fn test_missing_device_is_denied() {
    let device = V4l2Device::new(V4l2Config::default().with_device("/dev/does-not-exist"));
    match device.acquire(Facing::Environment).await {
        Err(CaptureError::AcquisitionDenied(_)) => {}
        other => panic!("Expected AcquisitionDenied, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_failed_open_frees_device_for_retry() {
    let device = V4l2Device::new(V4l2Config::default().with_device("/dev/does-not-exist"));
    for _ in 0..3 {
        assert!(matches!(
            device.acquire(Facing::Environment).await,
            Err(CaptureError::AcquisitionDenied(_))
        ));
    }
}
