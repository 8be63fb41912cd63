//! CRC-32 and Adler-32 checksums for PNG chunks and the zlib trailer.
//!
//! The CRC table is built at compile time. Adler-32 is streamed one byte at a
//! time because the canvas feeds it through pixel addressing rather than from
//! a contiguous slice.

/// Largest prime below 2^16.
const ADLER_BASE: u32 = 65521;
/// Bytes that can be summed before `s2` may overflow a `u32`.
const ADLER_NMAX: u32 = 5552;

/// Reflected CRC-32 polynomial used by PNG and zlib.
const CRC_POLY: u32 = 0xEDB8_8320;

/// Remainder of one byte value, shifted through all eight bits.
const fn crc_byte_remainder(byte: u8) -> u32 {
    let mut rem = byte as u32;
    let mut bit = 0;
    while bit < 8 {
        let carry = rem & 1;
        rem >>= 1;
        if carry == 1 {
            rem ^= CRC_POLY;
        }
        bit += 1;
    }
    rem
}

const fn make_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < table.len() {
        table[i] = crc_byte_remainder(i as u8);
        i += 1;
    }
    table
}

/// Byte-at-a-time CRC-32 lookup table.
const CRC_TABLE: [u32; 256] = make_crc_table();

/// CRC-32 (PNG/zlib) of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFFFFFF;
    for &byte in data {
        crc = CRC_TABLE[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8);
    }
    crc ^ 0xFFFFFFFF
}

/// Running Adler-32 state.
#[derive(Debug, Clone)]
pub struct Adler32 {
    s1: u32,
    s2: u32,
    /// Bytes left before the next modulo reduction
    remaining: u32,
}

impl Adler32 {
    pub fn new() -> Self {
        Adler32 { s1: 1, s2: 0, remaining: ADLER_NMAX }
    }

    /// Feed one byte.
    #[inline]
    pub fn update(&mut self, byte: u8) {
        self.s1 += byte as u32;
        self.s2 += self.s1;
        self.remaining -= 1;
        if self.remaining == 0 {
            self.s1 %= ADLER_BASE;
            self.s2 %= ADLER_BASE;
            self.remaining = ADLER_NMAX;
        }
    }

    /// Feed a contiguous run of bytes.
    pub fn update_slice(&mut self, data: &[u8]) {
        for &byte in data {
            self.update(byte);
        }
    }

    /// Final checksum, packed as `(s2 << 16) | s1`.
    pub fn finish(&self) -> u32 {
        ((self.s2 % ADLER_BASE) << 16) | (self.s1 % ADLER_BASE)
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot Adler-32 of `data`.
pub fn adler32(data: &[u8]) -> u32 {
    let mut adler = Adler32::new();
    adler.update_slice(data);
    adler.finish()
}
