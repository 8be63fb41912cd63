//! Indexed-color canvas that is its own PNG file.
//!
//! The canvas owns one byte buffer laid out as a complete PNG (see
//! [`crate::layout`]). Palette entries are written straight into PLTE/tRNS,
//! pixel indices straight into the stored deflate blocks of IDAT. Only the
//! checksums are left stale between drawing calls; [`ImageCanvas::finalize`]
//! recomputes all of them and runs automatically whenever the encoded bytes
//! are requested.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::{debug, trace};

use crate::checksum::{crc32, Adler32};
use crate::error::{CanvasError, Result};
use crate::layout::{write_u32, Layout};
use crate::options::CanvasOptions;
use crate::palette::{pack, Assignment, Palette, Rgba};
use crate::PNG_SIGNATURE;

/// Prefix of [`ImageCanvas::data_url`].
const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// An 8-bit indexed PNG image under construction.
#[derive(Clone)]
pub struct ImageCanvas {
    width: u32,
    height: u32,
    depth: u16,
    layout: Layout,
    /// Header bytes followed by IHDR, PLTE, tRNS, IDAT, IEND
    buffer: Vec<u8>,
    palette: Palette,
    /// Palette index of the background color
    background: u8,
}

impl ImageCanvas {
    /// Create a canvas of `width`×`height` pixels with room for `depth`
    /// palette colors.
    ///
    /// `header` is copied verbatim in front of the first chunk and is not
    /// validated; pass [`PNG_SIGNATURE`] for a regular PNG file. The
    /// background color becomes the first palette entry, and since every
    /// pixel starts at index 0 the whole image starts out in that color.
    pub fn new(width: u32, height: u32, depth: u16, background: Rgba, header: &[u8]) -> Self {
        let layout = Layout::new(width, height, depth, header.len());
        let mut buffer = vec![0u8; layout.total_len];
        buffer[..header.len()].copy_from_slice(header);
        layout.write_static(&mut buffer, width, height);

        debug!(
            width,
            height,
            depth,
            blocks = layout.blocks.len(),
            bytes = layout.total_len,
            "canvas laid out"
        );

        let mut canvas = ImageCanvas {
            width,
            height,
            depth,
            layout,
            buffer,
            palette: Palette::new(depth),
            background: 0,
        };
        canvas.background = canvas.create_rgb_color(background);
        canvas
    }

    /// Create a canvas that starts with the standard PNG signature.
    pub fn png(width: u32, height: u32, depth: u16, background: Rgba) -> Self {
        Self::new(width, height, depth, background, &PNG_SIGNATURE)
    }

    /// Create a canvas from [`CanvasOptions`].
    pub fn with_options(width: u32, height: u32, options: &CanvasOptions) -> Self {
        Self::new(width, height, options.depth, options.background, &options.header)
    }

    /// Assemble a canvas from already-encoded state.
    pub(crate) fn from_parts(
        width: u32,
        height: u32,
        depth: u16,
        buffer: Vec<u8>,
        palette: Palette,
        background: u8,
        header_len: usize,
    ) -> Result<Self> {
        let layout = Layout::new(width, height, depth, header_len);
        if buffer.len() != layout.total_len {
            return Err(CanvasError::BufferSizeMismatch {
                expected: layout.total_len,
                actual: buffer.len(),
            });
        }
        Ok(ImageCanvas { width, height, depth, layout, buffer, palette, background })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Maximum number of palette entries.
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Palette index of the background color.
    pub fn background(&self) -> u8 {
        self.background
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    // ─── Palette ────────────────────────────────────────────────────────────

    /// Palette index for an RGBA color, adding it if there is room.
    ///
    /// When the palette already holds `depth` colors a new color gets index
    /// 0 and nothing is recorded. Callers that need to notice this should
    /// compare [`Palette::len`] before and after.
    pub fn color(&mut self, r: u8, g: u8, b: u8, a: u8) -> u8 {
        let assignment = self.palette.assign(pack(r, g, b, a));
        match assignment {
            Assignment::Inserted(index) => {
                let p = self.layout.palette_offset(index as usize);
                self.buffer[p..p + 3].copy_from_slice(&[r, g, b]);
                self.buffer[self.layout.alpha_offset(index as usize)] = a;
            }
            Assignment::Exhausted => {
                trace!(r, g, b, a, depth = self.depth, "palette full, using index 0");
            }
            Assignment::Existing(_) => {}
        }
        assignment.index()
    }

    /// Palette index for an [`Rgba`] color.
    pub fn create_rgb_color(&mut self, color: Rgba) -> u8 {
        self.color(color.r, color.g, color.b, color.alpha_byte())
    }

    // ─── Pixel addressing ───────────────────────────────────────────────────

    /// Buffer offset of pixel `(x, y)`.
    ///
    /// Coordinates are not range-checked outside debug builds; passing
    /// `x >= width` or `y >= height` addresses some other byte of the image
    /// or panics on the slice index.
    #[inline]
    pub fn offset(&self, x: i32, y: i32) -> usize {
        debug_assert!(
            x >= 0 && (x as u32) < self.width,
            "x = {x} outside 0..{}",
            self.width
        );
        debug_assert!(
            y >= 0 && (y as u32) < self.height,
            "y = {y} outside 0..{}",
            self.height
        );
        let i = y as i64 * (self.width as i64 + 1) + x as i64 + 1;
        self.layout.plane_offset(i as usize)
    }

    /// Set pixel `(x, y)` to palette index `color`.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u8) {
        let offset = self.offset(x, y);
        self.buffer[offset] = color;
    }

    /// Palette index at `(x, y)`.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> u8 {
        self.buffer[self.offset(x, y)]
    }

    // ─── Output ─────────────────────────────────────────────────────────────

    /// Recompute the Adler-32 trailer and every chunk CRC.
    ///
    /// Safe to call any number of times; each call covers the current
    /// buffer contents.
    pub fn finalize(&mut self) {
        let mut adler = Adler32::new();
        for i in 0..self.layout.pixel_plane {
            adler.update(self.buffer[self.layout.plane_offset(i)]);
        }
        let adler = adler.finish();
        write_u32(&mut self.buffer, self.layout.adler_offset(), adler);

        for (_, span) in self.layout.chunks() {
            let crc = crc32(&self.buffer[span.crc_range()]);
            write_u32(&mut self.buffer, span.crc_offset(), crc);
        }

        trace!(adler, palette = self.palette.len(), "canvas finalized");
    }

    /// Finalized bytes: header followed by all chunks.
    pub fn buffer(&mut self) -> &[u8] {
        self.finalize();
        &self.buffer
    }

    /// Finalize and take ownership of the encoded bytes.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.finalize();
        self.buffer
    }

    /// Current bytes without refreshing checksums.
    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Replace the underlying bytes, e.g. with the buffer of another canvas
    /// of the same shape.
    ///
    /// The palette bookkeeping is kept as is; restore a snapshot with
    /// [`ImageCanvas::restore`] to copy it as well.
    pub fn set_buffer(&mut self, buffer: Vec<u8>) -> Result<()> {
        if buffer.len() != self.layout.total_len {
            return Err(CanvasError::BufferSizeMismatch {
                expected: self.layout.total_len,
                actual: buffer.len(),
            });
        }
        debug!(bytes = buffer.len(), "canvas buffer replaced");
        self.buffer = buffer;
        Ok(())
    }

    /// Replace bytes, palette and background index in one go.
    pub(crate) fn replace_state(&mut self, buffer: Vec<u8>, palette: Palette, background: u8) -> Result<()> {
        self.set_buffer(buffer)?;
        self.palette = palette;
        self.background = background;
        Ok(())
    }

    /// Finalized bytes as standard base64.
    pub fn base64(&mut self) -> String {
        BASE64.encode(self.buffer())
    }

    /// Finalized bytes as a `data:image/png;base64,` URL for `<img src>`.
    pub fn data_url(&mut self) -> String {
        let mut url = String::from(DATA_URL_PREFIX);
        BASE64.encode_string(self.buffer(), &mut url);
        url
    }
}

impl std::fmt::Debug for ImageCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.depth)
            .field("palette", &self.palette.len())
            .field("bytes", &self.buffer.len())
            .finish_non_exhaustive()
    }
}
