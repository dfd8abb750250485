use crate::Vec2;
use std::ops::{Add, Div, Mul};

/// Axis-aligned rectangle given by its top-left origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect<T> {
    pub origin: Vec2<T>,
    pub size: Vec2<T>,
}

impl<T: Default> Default for Rect<T> {
    fn default() -> Self {
        Self {
            origin: Vec2::zero(),
            size: Vec2::zero(),
        }
    }
}

impl<T> Rect<T> {
    pub fn new(origin: Vec2<T>, size: Vec2<T>) -> Self {
        Self { origin, size }
    }

    /// Mirror the rectangle across the main diagonal (x <-> y).
    pub fn transposed(self) -> Self {
        Self {
            origin: self.origin.transposed(),
            size: self.size.transposed(),
        }
    }
}

impl<T: Add<Output = T> + Copy> Rect<T> {
    pub fn min(&self) -> Vec2<T> {
        self.origin
    }

    /// Exclusive bottom-right corner.
    pub fn max(&self) -> Vec2<T> {
        self.origin + self.size
    }
}

impl<T: Mul<Output = T> + Copy> Rect<T> {
    pub fn area(&self) -> T {
        self.size.x * self.size.y
    }
}

impl<T: Add<Output = T> + Div<Output = T> + Copy + From<u8>> Rect<T> {
    pub fn center(&self) -> Vec2<T> {
        let two = T::from(2u8);
        Vec2::new(
            self.origin.x + self.size.x / two,
            self.origin.y + self.size.y / two,
        )
    }
}

impl<T: Add<Output = T> + PartialOrd + Copy> Rect<T> {
    pub fn contains_point(&self, point: Vec2<T>) -> bool {
        let max = self.max();
        point.x >= self.origin.x && point.y >= self.origin.y && point.x < max.x && point.y < max.y
    }

    pub fn contains_rect(&self, other: Rect<T>) -> bool {
        let self_max = self.max();
        let other_max = other.max();
        other.origin.x >= self.origin.x
            && other.origin.y >= self.origin.y
            && other_max.x <= self_max.x
            && other_max.y <= self_max.y
    }
}

impl Rect<usize> {
    pub fn as_f64(&self) -> Rect<f64> {
        Rect::new(self.origin.as_f64(), self.size.as_f64())
    }
}
