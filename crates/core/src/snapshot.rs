//! Canvas snapshots for copying one canvas into another.
//!
//! A snapshot captures the encoded buffer together with the palette
//! bookkeeping that the bytes alone cannot carry, so the restored canvas keeps
//! handing out the same indices for the same colors.
//!
//! ## Serialized format
//!
//! ```text
//! +------------------+
//! | Magic "IPNG"     |  4 bytes
//! +------------------+
//! | Format version   |  u32 little-endian (currently 1)
//! +------------------+
//! | Compressed data  |  deflate-compressed bincode payload
//! +------------------+
//! ```
//!
//! Snapshots live in memory only; writing them anywhere is up to the caller.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canvas::ImageCanvas;
use crate::error::{CanvasError, Result};
use crate::palette::Palette;

/// Magic bytes identifying a serialized canvas snapshot.
const MAGIC: &[u8; 4] = b"IPNG";
/// Current snapshot format version.
const FORMAT_VERSION: u32 = 1;
/// Magic + version.
const PREAMBLE_LEN: usize = 8;
/// Stored blocks compress very well; level 6 is plenty.
const COMPRESSION_LEVEL: u8 = 6;

/// Frozen canvas state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    pub width: u32,
    pub height: u32,
    pub depth: u16,
    /// Length of the caller header at the front of `buffer`
    pub header_len: usize,
    /// Palette index of the background color
    pub background: u8,
    /// Assigned palette keys in index order
    pub palette: Vec<u32>,
    /// Full encoded buffer, header included
    pub buffer: Vec<u8>,
}

impl CanvasSnapshot {
    /// Human-readable shape used in mismatch errors.
    fn shape(&self) -> String {
        shape(self.width, self.height, self.depth, self.header_len)
    }

    /// Serialize with header and deflate compression.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)
            .map_err(|e| CanvasError::Snapshot(format!("serialize error: {}", e)))?;

        let compressed = miniz_oxide::deflate::compress_to_vec(&payload, COMPRESSION_LEVEL);

        let mut out = Vec::with_capacity(PREAMBLE_LEN + compressed.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        out.extend_from_slice(&compressed);
        Ok(out)
    }

    /// Parse bytes produced by [`CanvasSnapshot::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < PREAMBLE_LEN {
            return Err(CanvasError::Snapshot("snapshot too small".into()));
        }
        if &data[0..4] != MAGIC {
            return Err(CanvasError::Snapshot("bad magic".into()));
        }
        let version = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        if version != FORMAT_VERSION {
            return Err(CanvasError::Snapshot(format!(
                "unsupported snapshot version {} (expected {})",
                version, FORMAT_VERSION
            )));
        }

        let payload = miniz_oxide::inflate::decompress_to_vec(&data[PREAMBLE_LEN..])
            .map_err(|e| CanvasError::Snapshot(format!("decompress error: {:?}", e)))?;

        bincode::deserialize(&payload)
            .map_err(|e| CanvasError::Snapshot(format!("deserialize error: {}", e)))
    }
}

fn shape(width: u32, height: u32, depth: u16, header_len: usize) -> String {
    format!("{}x{} depth {} header {}", width, height, depth, header_len)
}

impl ImageCanvas {
    /// Capture the current state. Checksums are not refreshed.
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            width: self.width(),
            height: self.height(),
            depth: self.depth(),
            header_len: self.layout().header_len,
            background: self.background(),
            palette: self.palette().keys().to_vec(),
            buffer: self.bytes().to_vec(),
        }
    }

    /// Copy a snapshot's bytes and palette into this canvas.
    ///
    /// The snapshot must come from a canvas with the same dimensions, depth
    /// and header length.
    pub fn restore(&mut self, snapshot: &CanvasSnapshot) -> Result<()> {
        let expected = shape(self.width(), self.height(), self.depth(), self.layout().header_len);
        let actual = snapshot.shape();
        if expected != actual {
            return Err(CanvasError::ShapeMismatch { expected, actual });
        }

        let palette = Palette::from_keys(snapshot.depth, snapshot.palette.clone());
        self.replace_state(snapshot.buffer.clone(), palette, snapshot.background)?;
        debug!(shape = %actual, palette = snapshot.palette.len(), "snapshot restored");
        Ok(())
    }

    /// Build a new canvas from a snapshot.
    pub fn from_snapshot(snapshot: CanvasSnapshot) -> Result<Self> {
        let palette = Palette::from_keys(snapshot.depth, snapshot.palette);
        ImageCanvas::from_parts(
            snapshot.width,
            snapshot.height,
            snapshot.depth,
            snapshot.buffer,
            palette,
            snapshot.background,
            snapshot.header_len,
        )
    }
}
