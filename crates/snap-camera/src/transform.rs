use crate::{CaptureError, CropPlan, Orientation, RawFrame};
use snap_image::{Raster, Rotation};

/// Copy the planned region of `frame` into a fresh output surface.
///
/// Landscape frames are copied straight; portrait frames are turned a
/// quarter in the sense given by `rotation` so the output is landscape.
/// Pixels are copied one-to-one, without scaling.
pub fn render(frame: &RawFrame, plan: &CropPlan, rotation: Rotation) -> Result<Raster, CaptureError> {
    let pixels = plan.pixels();
    let rendered = match pixels.orientation {
        Orientation::Landscape => frame.pixels().crop(pixels.source),
        Orientation::Portrait => frame.pixels().crop_rotated(pixels.source, rotation),
    }
    .map_err(CaptureError::Render)?;

    debug_assert_eq!(rendered.size(), pixels.dest);
    Ok(rendered)
}
