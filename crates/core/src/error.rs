//! Error types for canvas operations.

use thiserror::Error;

/// Errors raised by [`crate::ImageCanvas`] operations.
///
/// Palette exhaustion is deliberately absent: a full palette silently maps
/// new colors to index 0.
#[derive(Error, Debug)]
pub enum CanvasError {
    /// A rectangle was given with its end corner before its start corner.
    #[error("invalid geometry: ({x2}, {y2}) must not precede ({x1}, {y1})")]
    InvalidGeometry { x1: i32, y1: i32, x2: i32, y2: i32 },

    /// A replacement buffer does not match the canvas layout.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// A snapshot was taken from a canvas of a different shape.
    #[error("shape mismatch: canvas is {expected}, snapshot is {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// A serialized snapshot could not be decoded.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CanvasError>;
