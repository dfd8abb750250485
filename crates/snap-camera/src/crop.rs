//! Crop geometry: pick the largest centred window of the target ratio.
//!
//! Portrait frames are planned in the rotated frame of reference (height
//! acts as width) so that after the quarter-turn the output is landscape.
//! The window always has exactly the target ratio; it is never stretched
//! to fill the frame.

use crate::{Orientation, RawFrame};
use snap_base::{Rect, Vec2};

// absorbs representation error such as 1080.0 * 1.7 = 1836.0000000000002
// or 1835.9999999999998 before flooring to whole pixels
const PIXEL_EPSILON: f64 = 1e-9;

/// Exact crop geometry for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropPlan {
    pub orientation: Orientation,
    /// Size of the frame being planned, in source coordinates.
    pub frame: Vec2<usize>,
    /// Crop window in the output's frame of reference (rotated for portrait).
    pub working: Rect<f64>,
    /// Region of the source frame to read.
    pub source: Rect<f64>,
    /// Size of the output surface.
    pub dest: Vec2<f64>,
}

/// `CropPlan` snapped to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPlan {
    pub orientation: Orientation,
    pub source: Rect<usize>,
    pub dest: Vec2<usize>,
}

/// Largest `ratio` window inside `bounds`: try the full width first, fall
/// back to the full height when that overflows.
fn fit(bounds: Vec2<f64>, ratio: f64) -> Vec2<f64> {
    let out_w = bounds.x;
    let out_h = out_w / ratio;
    if out_h > bounds.y {
        Vec2::new(bounds.y * ratio, bounds.y)
    } else {
        Vec2::new(out_w, out_h)
    }
}

fn centered(bounds: Vec2<f64>, size: Vec2<f64>) -> Rect<f64> {
    Rect::new((bounds - size) / 2.0, size)
}

/// Plan a crop for a frame of `size`.
pub fn plan_for_size(size: Vec2<usize>, orientation: Orientation, ratio: f64) -> CropPlan {
    let bounds = match orientation {
        Orientation::Landscape => size.as_f64(),
        Orientation::Portrait => size.as_f64().transposed(),
    };
    let window = fit(bounds, ratio);
    let working = centered(bounds, window);

    // a centred window maps back to source coordinates by transposition
    let source = match orientation {
        Orientation::Landscape => working,
        Orientation::Portrait => working.transposed(),
    };

    CropPlan {
        orientation,
        frame: size,
        working,
        source,
        dest: window,
    }
}

pub fn plan(frame: &RawFrame, orientation: Orientation, ratio: f64) -> CropPlan {
    plan_for_size(frame.size(), orientation, ratio)
}

impl CropPlan {
    /// Snap to whole pixels, keeping the window centred and inside the frame.
    pub fn pixels(&self) -> PixelPlan {
        let bounds = match self.orientation {
            Orientation::Landscape => self.frame,
            Orientation::Portrait => self.frame.transposed(),
        };
        let snap = |v: f64, limit: usize| ((v + PIXEL_EPSILON).floor() as usize).min(limit);
        let dest = Vec2::new(snap(self.dest.x, bounds.x), snap(self.dest.y, bounds.y));
        let working = Rect::new((bounds - dest) / 2, dest);

        let source = match self.orientation {
            Orientation::Landscape => working,
            Orientation::Portrait => working.transposed(),
        };

        PixelPlan {
            orientation: self.orientation,
            source,
            dest,
        }
    }
}
