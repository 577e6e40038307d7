use thiserror::Error;

use crate::device::StreamKind;

#[derive(Error, Debug)]
pub enum DepthcutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Depth frame is {depth_width}x{depth_height} but color frame is {color_width}x{color_height}")]
    DimensionMismatch {
        depth_width: u32,
        depth_height: u32,
        color_width: u32,
        color_height: u32,
    },

    #[error("Mask shape {actual:?} does not match expected {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Unsupported bytes per pixel: {0}")]
    InvalidBytesPerPixel(u32),

    #[error("Device does not have a depth sensor")]
    NoDepthSensor,

    #[error("No Depth stream available")]
    NoDepthStream,

    #[error("No stream found to align with Depth")]
    NoAlignTarget,

    #[error("{stream} frame unavailable")]
    FrameUnavailable { stream: StreamKind },

    #[error("Device error calling {operation}({args}): {message}")]
    Device {
        operation: String,
        args: String,
        message: String,
    },

    #[error("Refinement failed: {0}")]
    Refinement(String),

    #[error("Invalid recording: {0}")]
    InvalidRecording(String),

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DepthcutError {
    /// Unusable hardware configuration; the frame loop must not start.
    pub fn is_fatal_configuration(&self) -> bool {
        matches!(
            self,
            Self::NoDepthSensor | Self::NoDepthStream | Self::NoAlignTarget
        )
    }
}

pub type Result<T> = std::result::Result<T, DepthcutError>;
