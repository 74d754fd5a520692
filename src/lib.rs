pub mod channel;
pub mod image;
pub mod marker;

// Re-export commonly used types
pub use channel::{MethodCall, MethodChannel, MethodReply, Value};
pub use image::{PngCompression, ScaleFilter};
pub use marker::{marker_channel, ScaleConfig, ScaleRequest};
