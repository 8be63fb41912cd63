//! Chunk layout for a fixed-size indexed PNG.
//!
//! Every byte position in the output is known as soon as width, height and
//! palette depth are fixed, so the layout is computed once and the static
//! parts (chunk lengths and types, IHDR payload, zlib header, stored-block
//! headers) are written up front. Pixel writes later land directly inside the
//! stored deflate blocks.
//!
//! ```text
//! +---------------------+
//! | caller header bytes |
//! +---------------------+
//! | IHDR  (13)          |
//! | PLTE  (3 * depth)   |
//! | tRNS  (depth)       |
//! | IDAT  zlib stream   |  2 + plane + 5 * blocks + 4
//! | IEND  (0)           |
//! +---------------------+
//! ```

/// Chunk type tags.
pub const IHDR: [u8; 4] = *b"IHDR";
pub const PLTE: [u8; 4] = *b"PLTE";
pub const TRNS: [u8; 4] = *b"tRNS";
pub const IDAT: [u8; 4] = *b"IDAT";
pub const IEND: [u8; 4] = *b"IEND";

/// Largest payload of a single stored deflate block.
pub const MAX_STORED_BLOCK: usize = 0xFFFF;
/// Final flag + LEN + NLEN.
pub const STORED_BLOCK_HEADER: usize = 5;
/// Length + type + CRC around every chunk payload.
pub const CHUNK_OVERHEAD: usize = 12;

const IHDR_PAYLOAD: usize = 13;
const ZLIB_HEADER_LEN: usize = 2;
const ADLER_LEN: usize = 4;
/// 8 bits per palette index
const BIT_DEPTH: u8 = 8;
/// Indexed color
const COLOR_TYPE: u8 = 3;

/// zlib header: deflate with a 32K window (CMF 0x78), FLEVEL 3, and check
/// bits chosen so the 16-bit value is a multiple of 31.
pub const ZLIB_HEADER: u16 = zlib_header();

const fn zlib_header() -> u16 {
    let header: u16 = ((8 + (7 << 4)) << 8) | (3 << 6);
    header + (31 - header % 31) % 31
}

/// Position of one chunk inside the output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    /// Offset of the 4-byte length field
    pub offset: usize,
    pub payload_len: usize,
}

impl ChunkSpan {
    /// Total bytes including length, type and CRC.
    pub fn size(&self) -> usize {
        CHUNK_OVERHEAD + self.payload_len
    }

    pub fn payload_offset(&self) -> usize {
        self.offset + 8
    }

    pub fn crc_offset(&self) -> usize {
        self.payload_offset() + self.payload_len
    }

    /// Byte range covered by the CRC (type + payload).
    pub fn crc_range(&self) -> std::ops::Range<usize> {
        self.offset + 4..self.crc_offset()
    }

    fn end(&self) -> usize {
        self.offset + self.size()
    }
}

/// One stored deflate block inside the IDAT payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredBlock {
    /// Offset of the 5-byte block header
    pub offset: usize,
    pub len: u16,
    pub is_final: bool,
}

impl StoredBlock {
    /// Offset of the first raw byte after the block header.
    pub fn data_offset(&self) -> usize {
        self.offset + STORED_BLOCK_HEADER
    }
}

/// Precomputed offsets for a canvas of fixed dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub header_len: usize,
    pub ihdr: ChunkSpan,
    pub plte: ChunkSpan,
    pub trns: ChunkSpan,
    pub idat: ChunkSpan,
    pub iend: ChunkSpan,
    /// Filter byte + `width` index bytes per row, over all rows
    pub pixel_plane: usize,
    pub blocks: Vec<StoredBlock>,
    /// Header bytes plus all five chunks
    pub total_len: usize,
}

impl Layout {
    pub fn new(width: u32, height: u32, depth: u16, header_len: usize) -> Self {
        let pixel_plane = height as usize * (width as usize + 1);
        let block_count = pixel_plane.div_ceil(MAX_STORED_BLOCK);
        let depth = depth as usize;

        let ihdr = ChunkSpan { offset: header_len, payload_len: IHDR_PAYLOAD };
        let plte = ChunkSpan { offset: ihdr.end(), payload_len: 3 * depth };
        let trns = ChunkSpan { offset: plte.end(), payload_len: depth };
        let idat = ChunkSpan {
            offset: trns.end(),
            payload_len: ZLIB_HEADER_LEN
                + pixel_plane
                + STORED_BLOCK_HEADER * block_count
                + ADLER_LEN,
        };
        let iend = ChunkSpan { offset: idat.end(), payload_len: 0 };

        let stream_start = idat.payload_offset() + ZLIB_HEADER_LEN;
        let blocks = (0..block_count)
            .map(|k| {
                let start = k * MAX_STORED_BLOCK;
                let len = (pixel_plane - start).min(MAX_STORED_BLOCK);
                StoredBlock {
                    offset: stream_start + k * (MAX_STORED_BLOCK + STORED_BLOCK_HEADER),
                    len: len as u16,
                    is_final: k + 1 == block_count,
                }
            })
            .collect();

        Layout {
            header_len,
            ihdr,
            plte,
            trns,
            idat,
            iend,
            pixel_plane,
            blocks,
            total_len: iend.end(),
        }
    }

    /// All chunks with their type tags, in file order.
    pub fn chunks(&self) -> [([u8; 4], ChunkSpan); 5] {
        [
            (IHDR, self.ihdr),
            (PLTE, self.plte),
            (TRNS, self.trns),
            (IDAT, self.idat),
            (IEND, self.iend),
        ]
    }

    /// Physical offset of logical position `i` in the pixel plane.
    ///
    /// Skips the zlib header and every stored-block header up to and
    /// including the one that owns position `i`.
    #[inline]
    pub fn plane_offset(&self, i: usize) -> usize {
        self.idat.payload_offset()
            + ZLIB_HEADER_LEN
            + STORED_BLOCK_HEADER * (i / MAX_STORED_BLOCK + 1)
            + i
    }

    /// Offset of the Adler-32 trailer (last 4 bytes of the IDAT payload).
    pub fn adler_offset(&self) -> usize {
        self.idat.crc_offset() - ADLER_LEN
    }

    /// Offset of palette entry `index` inside the PLTE payload.
    pub fn palette_offset(&self, index: usize) -> usize {
        self.plte.payload_offset() + 3 * index
    }

    /// Offset of alpha entry `index` inside the tRNS payload.
    pub fn alpha_offset(&self, index: usize) -> usize {
        self.trns.payload_offset() + index
    }

    /// Write every byte that depends only on the layout.
    ///
    /// `buf` must be `total_len` bytes; the header region is left untouched.
    pub fn write_static(&self, buf: &mut [u8], width: u32, height: u32) {
        for (tag, span) in self.chunks() {
            write_u32(buf, span.offset, span.payload_len as u32);
            buf[span.offset + 4..span.offset + 8].copy_from_slice(&tag);
        }

        // IHDR: compression, filter and interlace stay 0
        let p = self.ihdr.payload_offset();
        write_u32(buf, p, width);
        write_u32(buf, p + 4, height);
        buf[p + 8] = BIT_DEPTH;
        buf[p + 9] = COLOR_TYPE;

        let z = self.idat.payload_offset();
        buf[z..z + 2].copy_from_slice(&ZLIB_HEADER.to_be_bytes());

        for block in &self.blocks {
            let o = block.offset;
            buf[o] = block.is_final as u8;
            buf[o + 1..o + 3].copy_from_slice(&block.len.to_le_bytes());
            buf[o + 3..o + 5].copy_from_slice(&(!block.len).to_le_bytes());
        }
    }
}

/// Write a big-endian u32 at `offset`.
#[inline]
pub fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// Read a big-endian u32 at `offset`.
#[inline]
pub fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zlib_header() {
        assert_eq!(ZLIB_HEADER, 0x78DA);
        assert_eq!(ZLIB_HEADER % 31, 0);
        // CMF: deflate, 32K window
        assert_eq!(ZLIB_HEADER >> 8, 0x78);
    }

    #[test]
    fn test_small_layout_sizes() {
        let layout = Layout::new(3, 3, 2, 8);
        assert_eq!(layout.pixel_plane, 12);
        assert_eq!(layout.blocks.len(), 1);
        assert_eq!(layout.ihdr.offset, 8);
        assert_eq!(layout.ihdr.size(), 25);
        assert_eq!(layout.plte.offset, 33);
        assert_eq!(layout.plte.payload_len, 6);
        assert_eq!(layout.trns.offset, 51);
        assert_eq!(layout.trns.payload_len, 2);
        assert_eq!(layout.idat.offset, 65);
        assert_eq!(layout.idat.payload_len, 2 + 12 + 5 + 4);
        assert_eq!(layout.iend.offset, 65 + 12 + 23);
        assert_eq!(layout.total_len, layout.iend.offset + 12);
    }

    #[test]
    fn test_block_split() {
        // 300 rows of 299 pixels plus filter byte: 90000 plane bytes, two blocks
        let layout = Layout::new(299, 300, 4, 0);
        assert_eq!(layout.pixel_plane, 90_000);
        assert_eq!(layout.blocks.len(), 2);
        assert_eq!(layout.blocks[0].len, 0xFFFF);
        assert!(!layout.blocks[0].is_final);
        assert_eq!(layout.blocks[1].len as usize, 90_000 - 0xFFFF);
        assert!(layout.blocks[1].is_final);
        assert_eq!(layout.blocks[1].offset - layout.blocks[0].offset, 0xFFFF + 5);
    }

    #[test]
    fn test_exact_block_boundary() {
        // Plane of exactly 65535 bytes fits one block
        let layout = Layout::new(65534, 1, 1, 0);
        assert_eq!(layout.pixel_plane, 0xFFFF);
        assert_eq!(layout.blocks.len(), 1);
        assert!(layout.blocks[0].is_final);
    }

    #[test]
    fn test_plane_offset_skips_block_headers() {
        let layout = Layout::new(299, 300, 4, 0);
        assert_eq!(layout.plane_offset(0), layout.blocks[0].data_offset());
        assert_eq!(layout.plane_offset(0xFFFE), layout.blocks[0].data_offset() + 0xFFFE);
        assert_eq!(layout.plane_offset(0xFFFF), layout.blocks[1].data_offset());
        assert_eq!(
            layout.plane_offset(89_999) + 1,
            layout.adler_offset(),
        );
    }

    #[test]
    fn test_write_static() {
        let layout = Layout::new(3, 2, 2, 0);
        let mut buf = vec![0u8; layout.total_len];
        layout.write_static(&mut buf, 3, 2);

        assert_eq!(read_u32(&buf, 0), 13);
        assert_eq!(&buf[4..8], b"IHDR");
        assert_eq!(read_u32(&buf, 8), 3);
        assert_eq!(read_u32(&buf, 12), 2);
        assert_eq!(buf[16], 8);
        assert_eq!(buf[17], 3);
        assert_eq!(&buf[18..21], &[0, 0, 0]);

        assert_eq!(&buf[layout.plte.offset + 4..layout.plte.offset + 8], b"PLTE");
        assert_eq!(&buf[layout.trns.offset + 4..layout.trns.offset + 8], b"tRNS");
        assert_eq!(&buf[layout.iend.offset + 4..layout.iend.offset + 8], b"IEND");

        let z = layout.idat.payload_offset();
        assert_eq!(&buf[z..z + 2], &[0x78, 0xDA]);
        // Single final block of 8 bytes: 01 08 00 F7 FF
        assert_eq!(&buf[z + 2..z + 7], &[0x01, 0x08, 0x00, 0xF7, 0xFF]);
    }
}
