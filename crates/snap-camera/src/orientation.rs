use crate::RawFrame;
use snap_base::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Taller than wide.
    Portrait,
    /// Wider than tall, or square.
    Landscape,
}

impl Orientation {
    pub fn of_size(size: Vec2<usize>) -> Self {
        if size.y > size.x {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

pub fn classify(frame: &RawFrame) -> Orientation {
    Orientation::of_size(frame.size())
}
