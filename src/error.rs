//! Error types for mesh loading, rendering and encoding

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a mesh into frames
#[derive(Error, Debug)]
pub enum Error {
    /// The mesh file could not be parsed
    #[error("failed to load mesh from {path}: {message}")]
    Input { path: PathBuf, message: String },

    /// Bytes from a reader are not a valid STL mesh
    #[error("malformed STL data: {0}")]
    Parse(String),

    /// The mesh has no triangles
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The mesh has no usable extent on an axis used for projection
    #[error("degenerate geometry: extent along {axis} is {extent}")]
    DegenerateGeometry { axis: char, extent: f32 },

    /// A depth buffer was sized for a different grid
    #[error("depth buffer is {actual_width}x{actual_height}, expected {width}x{height}")]
    BufferMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    /// The animation encoder rejected a frame
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// Invalid parameter value
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Error {
    /// Create an invalid parameter error
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Encoding(e.to_string())
    }
}
