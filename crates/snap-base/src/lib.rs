pub mod logging;
pub mod rect;
pub mod tensor;
pub mod vec2;

pub use logging::{StdoutLogger, format_timestamp, init_stdout_logger};
pub use rect::Rect;
pub use tensor::{Tensor, TensorError};
pub use vec2::Vec2;

// Re-export log crate so downstream crates can use snap_base::log::*
pub use log;
