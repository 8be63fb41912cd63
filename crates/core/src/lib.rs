//! # indexed-png
//!
//! In-memory encoder for 8-bit indexed-color PNG images with a small
//! rasterizer that draws straight into the encoded bytes.
//!
//! The image data is never compressed: IDAT holds a zlib stream made of
//! stored deflate blocks, so the byte offset of every pixel is fixed the
//! moment the canvas is created. Drawing is plain byte writes; the Adler-32
//! trailer and the chunk CRCs are recomputed whenever the finished file is
//! requested.
//!
//! ## Architecture
//!
//! - [`ImageCanvas`] — owns the buffer, palette and pixel addressing
//! - [`layout`] — chunk offsets, stored-block framing, zlib header
//! - [`checksum`] — CRC-32 (compile-time table) and streaming Adler-32
//! - [`palette`] — bounded insertion-ordered palette, [`Rgba`] colors
//! - [`draw`] — lines, rectangles, midpoint circles
//! - [`snapshot`] — copy a canvas, palette included, into another
//! - [`options`] — construction defaults
//!
//! ## Example
//!
//! ```
//! use indexed_png::{ImageCanvas, Rgba};
//!
//! let mut canvas = ImageCanvas::png(32, 32, 4, Rgba::opaque(0, 0, 0));
//! let white = canvas.create_rgb_color(Rgba::opaque(255, 255, 255));
//! canvas.filled_circle(16, 16, 10, white);
//! let url = canvas.data_url();
//! assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
//! ```
//!
//! ## Contract
//!
//! Coordinates are not range-checked (debug builds assert). A full palette
//! maps new colors to index 0 instead of failing. The only reported drawing
//! error is a rectangle whose corners are reversed.

pub mod canvas;
pub mod checksum;
pub mod draw;
pub mod error;
pub mod layout;
pub mod options;
pub mod palette;
pub mod snapshot;

pub use canvas::ImageCanvas;
pub use draw::{circle_points, Point, Span};
pub use error::{CanvasError, Result};
pub use options::CanvasOptions;
pub use palette::{Palette, Rgba};
pub use snapshot::CanvasSnapshot;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
