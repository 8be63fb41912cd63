//! Construction options for [`crate::ImageCanvas`].

use serde::{Deserialize, Serialize};

use crate::palette::Rgba;
use crate::PNG_SIGNATURE;

/// Default palette depth.
pub const DEFAULT_DEPTH: u16 = 10;

/// Palette depth, background color and leading header bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasOptions {
    /// Maximum number of palette entries
    pub depth: u16,
    /// Background color, always the first palette entry
    pub background: Rgba,
    /// Bytes written before the IHDR chunk (normally the PNG signature)
    pub header: Vec<u8>,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        CanvasOptions {
            depth: DEFAULT_DEPTH,
            background: Rgba::transparent(),
            header: PNG_SIGNATURE.to_vec(),
        }
    }
}

impl CanvasOptions {
    pub fn with_depth(mut self, depth: u16) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    pub fn with_header(mut self, header: impl Into<Vec<u8>>) -> Self {
        self.header = header.into();
        self
    }
}
