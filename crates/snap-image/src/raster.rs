use crate::ImageError;
use snap_base::{Rect, Tensor, Vec2};

const CHANNELS: usize = 3;

/// Sense of a quarter-turn, as seen by a viewer looking at the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Clockwise,
    CounterClockwise,
}

/// Owned RGB8 raster surface in HWC layout `[height, width, 3]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    tensor: Tensor<u8>,
}

impl Raster {
    /// Create a black raster.
    pub fn new(size: Vec2<usize>) -> Result<Self, ImageError> {
        let tensor = Tensor::zeros(vec![size.y, size.x, CHANNELS])?;
        Ok(Self { tensor })
    }

    /// Wrap an HWC tensor. The tensor must have exactly three RGB channels.
    pub fn from_tensor(tensor: Tensor<u8>) -> Result<Self, ImageError> {
        match tensor.shape.as_slice() {
            [_, _, CHANNELS] => Ok(Self { tensor }),
            shape => Err(ImageError::Decode(format!(
                "expected [height, width, 3] RGB tensor, got {shape:?}"
            ))),
        }
    }

    pub fn width(&self) -> usize {
        self.tensor.shape[1]
    }

    pub fn height(&self) -> usize {
        self.tensor.shape[0]
    }

    pub fn size(&self) -> Vec2<usize> {
        Vec2::new(self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.tensor.data
    }

    pub fn into_tensor(self) -> Tensor<u8> {
        self.tensor
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = self.offset(x, y);
        let d = &self.tensor.data;
        Some([d[i], d[i + 1], d[i + 2]])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        if x < self.width() && y < self.height() {
            let i = self.offset(x, y);
            self.tensor.data[i..i + CHANNELS].copy_from_slice(&rgb);
        }
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width() + x) * CHANNELS
    }

    fn check_bounds(&self, rect: Rect<usize>) -> Result<(), ImageError> {
        let bounds = Rect::new(Vec2::zero(), self.size());
        let fits = rect.origin.x.checked_add(rect.size.x).is_some()
            && rect.origin.y.checked_add(rect.size.y).is_some()
            && bounds.contains_rect(rect);
        if fits {
            Ok(())
        } else {
            Err(ImageError::Bounds {
                rect,
                size: self.size(),
            })
        }
    }

    /// Copy `rect` one-to-one into a new raster of `rect.size`.
    pub fn crop(&self, rect: Rect<usize>) -> Result<Raster, ImageError> {
        self.check_bounds(rect)?;
        let mut out = Raster::new(rect.size)?;
        let row_len = rect.size.x * CHANNELS;
        for row in 0..rect.size.y {
            let src = self.offset(rect.origin.x, rect.origin.y + row);
            let dst = row * row_len;
            out.tensor.data[dst..dst + row_len]
                .copy_from_slice(&self.tensor.data[src..src + row_len]);
        }
        Ok(out)
    }

    /// Copy `rect` into a new raster of `rect.size.transposed()`, turned a
    /// quarter in the given sense. Every output pixel comes from inside `rect`.
    pub fn crop_rotated(&self, rect: Rect<usize>, rotation: Rotation) -> Result<Raster, ImageError> {
        self.check_bounds(rect)?;
        let out_size = rect.size.transposed();
        let mut out = Raster::new(out_size)?;
        let (w, h) = (rect.size.x, rect.size.y);

        for dy in 0..out_size.y {
            for dx in 0..out_size.x {
                let (sx, sy) = match rotation {
                    // source top row becomes the right column
                    Rotation::Clockwise => (dy, h - 1 - dx),
                    // source top row becomes the left column, read bottom-up
                    Rotation::CounterClockwise => (w - 1 - dy, dx),
                };
                let src = self.offset(rect.origin.x + sx, rect.origin.y + sy);
                let dst = (dy * out_size.x + dx) * CHANNELS;
                out.tensor.data[dst..dst + CHANNELS]
                    .copy_from_slice(&self.tensor.data[src..src + CHANNELS]);
            }
        }
        Ok(out)
    }
}
