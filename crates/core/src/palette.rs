//! Bounded, insertion-ordered color palette.
//!
//! Colors are identified by a packed `alpha:red:green:blue` key. The first
//! color seen gets index 0, the next index 1, and so on; indices are never
//! reassigned. Once `depth` colors are known, new colors map to index 0.

use serde::{Deserialize, Serialize};

/// Largest palette an 8-bit index can address.
pub const MAX_PALETTE: usize = 256;

/// An RGB color with an opacity in `0.0..=1.0`.
///
/// A negative opacity is treated as fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    pub const fn transparent() -> Self {
        Rgba { r: 0, g: 0, b: 0, a: 0.0 }
    }

    /// Opacity as a tRNS alpha byte.
    pub fn alpha_byte(&self) -> u8 {
        if self.a < 0.0 {
            255
        } else {
            (self.a * 255.0).round().min(255.0) as u8
        }
    }
}

/// Pack a color into a palette key.
#[inline]
pub const fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Outcome of a palette lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Color was already in the palette.
    Existing(u8),
    /// Color was added at this index.
    Inserted(u8),
    /// Palette is full; the color was not added.
    Exhausted,
}

impl Assignment {
    /// Index to draw with. Exhaustion falls back to 0.
    pub fn index(self) -> u8 {
        match self {
            Assignment::Existing(i) | Assignment::Inserted(i) => i,
            Assignment::Exhausted => 0,
        }
    }
}

/// Insertion-ordered palette keys, scanned linearly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    keys: Vec<u32>,
    capacity: usize,
}

impl Palette {
    /// Create an empty palette holding at most `depth` colors.
    ///
    /// Depths above 256 are clamped since a pixel byte cannot address more.
    pub fn new(depth: u16) -> Self {
        let capacity = (depth as usize).min(MAX_PALETTE);
        Palette { keys: Vec::with_capacity(capacity), capacity }
    }

    /// Rebuild a palette from previously assigned keys.
    pub(crate) fn from_keys(depth: u16, keys: Vec<u32>) -> Self {
        let mut palette = Palette::new(depth);
        palette.keys = keys;
        palette.keys.truncate(palette.capacity);
        palette
    }

    /// Look up `key`, inserting it when there is room.
    pub fn assign(&mut self, key: u32) -> Assignment {
        if let Some(i) = self.lookup(key) {
            return Assignment::Existing(i);
        }
        if self.keys.len() >= self.capacity {
            return Assignment::Exhausted;
        }
        self.keys.push(key);
        Assignment::Inserted((self.keys.len() - 1) as u8)
    }

    /// Index of `key` if already assigned.
    pub fn lookup(&self, key: u32) -> Option<u8> {
        self.keys.iter().position(|&k| k == key).map(|i| i as u8)
    }

    /// Assigned keys in index order.
    pub fn keys(&self) -> &[u32] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.keys.len() >= self.capacity
    }
}
