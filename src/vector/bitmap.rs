//! Bit-packed validity tracking.
//!
//! Layout follows the Arrow validity buffer: bit `i` lives in byte `i / 8`
//! at position `i % 8` (LSB first), and a set bit means the element is
//! valid. Padding bits past `len` are always zero so that
//! `null_count == len - popcount(bits)` holds for the whole buffer.

use serde::{Deserialize, Serialize};

use crate::error::{KolumnError, Result};

/// Number of bytes needed to hold `len` bits.
#[must_use]
pub fn bitmap_byte_len(len: usize) -> usize {
    len.div_ceil(8)
}

/// Null tracker shared by every vector type.
///
/// Deserialization goes through the same checks as [`ValidityBitmap::from_bytes`]
/// and also rejects a stored null count that disagrees with the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBitmap")]
pub struct ValidityBitmap {
    len: usize,
    null_count: usize,
    bits: Vec<u8>,
}

/// Serialized form of [`ValidityBitmap`], before validation.
#[derive(Deserialize)]
struct RawBitmap {
    len: usize,
    null_count: usize,
    bits: Vec<u8>,
}

impl TryFrom<RawBitmap> for ValidityBitmap {
    type Error = KolumnError;

    fn try_from(raw: RawBitmap) -> Result<Self> {
        let bitmap = Self::from_bytes(raw.bits, raw.len)?;
        if bitmap.null_count != raw.null_count {
            return Err(KolumnError::InvalidVector(format!(
                "stored null count {} but buffer holds {} nulls",
                raw.null_count, bitmap.null_count
            )));
        }
        Ok(bitmap)
    }
}

impl ValidityBitmap {
    /// Creates a bitmap with every element valid.
    #[must_use]
    pub fn new_valid(len: usize) -> Self {
        let mut bits = vec![0xFF; bitmap_byte_len(len)];
        clear_padding(&mut bits, len);
        Self {
            len,
            null_count: 0,
            bits,
        }
    }

    /// Creates a bitmap with every element null.
    #[must_use]
    pub fn new_null(len: usize) -> Self {
        Self {
            len,
            null_count: len,
            bits: vec![0; bitmap_byte_len(len)],
        }
    }

    /// Builds a bitmap from per-element validity flags (`true` = valid).
    #[must_use]
    pub fn from_bools(validity: &[bool]) -> Self {
        let mut bits = vec![0u8; bitmap_byte_len(validity.len())];
        let mut null_count = validity.len();
        for (i, &valid) in validity.iter().enumerate() {
            if valid {
                bits[i / 8] |= 1 << (i % 8);
                null_count -= 1;
            }
        }
        Self {
            len: validity.len(),
            null_count,
            bits,
        }
    }

    /// Wraps an existing packed buffer.
    ///
    /// Padding bits past `len` are cleared and the null count is computed
    /// from the buffer contents.
    ///
    /// # Errors
    ///
    /// Returns [`KolumnError::InvalidVector`] if `bits.len() != ceil(len / 8)`.
    pub fn from_bytes(mut bits: Vec<u8>, len: usize) -> Result<Self> {
        if bits.len() != bitmap_byte_len(len) {
            return Err(KolumnError::InvalidVector(format!(
                "validity buffer has {} bytes, expected {} for {} elements",
                bits.len(),
                bitmap_byte_len(len),
                len
            )));
        }
        clear_padding(&mut bits, len);
        Ok(Self::from_computed(bits, len))
    }

    /// Wraps a kernel output buffer, counting nulls from scratch.
    pub(crate) fn from_computed(bits: Vec<u8>, len: usize) -> Self {
        debug_assert_eq!(bits.len(), bitmap_byte_len(len));
        let mut bitmap = Self {
            len,
            null_count: 0,
            bits,
        };
        bitmap.recompute_null_count();
        bitmap
    }

    /// Returns the number of elements tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the bitmap tracks no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the cached null count.
    #[must_use]
    pub fn null_count(&self) -> usize {
        self.null_count
    }

    /// Returns the packed buffer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Returns the packed buffer length in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns whether element `i` is null. Requires `i < len`.
    #[inline]
    #[must_use]
    pub fn is_null(&self, i: usize) -> bool {
        (self.bits[i / 8] >> (i % 8)) & 1 == 0
    }

    /// Returns whether element `i` is valid. Requires `i < len`.
    #[inline]
    #[must_use]
    pub fn is_valid(&self, i: usize) -> bool {
        !self.is_null(i)
    }

    /// Marks element `i` as null. Requires `i < len`.
    #[inline]
    pub fn set_null(&mut self, i: usize) {
        let mask = 1u8 << (i % 8);
        let byte = &mut self.bits[i / 8];
        if *byte & mask != 0 {
            *byte &= !mask;
            self.null_count += 1;
        }
    }

    /// Marks element `i` as valid. Requires `i < len`.
    #[inline]
    pub fn set_not_null(&mut self, i: usize) {
        let mask = 1u8 << (i % 8);
        let byte = &mut self.bits[i / 8];
        if *byte & mask == 0 {
            *byte |= mask;
            self.null_count -= 1;
        }
    }

    /// Recounts nulls from the buffer and refreshes the cached count.
    pub fn recompute_null_count(&mut self) -> usize {
        let ones: usize = self.bits.iter().map(|b| b.count_ones() as usize).sum();
        self.null_count = self.len - ones;
        self.null_count
    }

    /// Returns a copy backed by a newly allocated buffer.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self {
            len: self.len,
            null_count: self.null_count,
            bits: self.bits.to_vec(),
        }
    }

    /// Iterates per-element validity (`true` = valid).
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.is_valid(i))
    }
}

/// Zeroes the bits of the final byte that lie past `len`.
fn clear_padding(bits: &mut [u8], len: usize) {
    let rem = len % 8;
    if rem != 0 {
        if let Some(last) = bits.last_mut() {
            *last &= (1u8 << rem) - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bools() {
        let bitmap = ValidityBitmap::from_bools(&[true, false, true, true, false, true, true, true, false]);
        assert_eq!(bitmap.len(), 9);
        assert_eq!(bitmap.byte_len(), 2);
        assert_eq!(bitmap.null_count(), 3);
        assert_eq!(bitmap.as_bytes(), &[0b1110_1101, 0b0000_0000]);
        assert!(bitmap.is_null(1));
        assert!(bitmap.is_valid(0));
        assert!(bitmap.is_null(8));
    }

    #[test]
    fn test_new_valid_clears_padding() {
        let bitmap = ValidityBitmap::new_valid(10);
        assert_eq!(bitmap.as_bytes(), &[0xFF, 0b0000_0011]);
        assert_eq!(bitmap.null_count(), 0);
    }

    #[test]
    fn test_set_null_and_not_null() {
        let mut bitmap = ValidityBitmap::new_valid(16);
        bitmap.set_null(3);
        bitmap.set_null(3);
        assert_eq!(bitmap.null_count(), 1);
        assert!(bitmap.is_null(3));

        bitmap.set_not_null(3);
        bitmap.set_not_null(3);
        assert_eq!(bitmap.null_count(), 0);
        assert!(bitmap.is_valid(3));
    }

    #[test]
    fn test_recompute_null_count() {
        let mut bitmap = ValidityBitmap::new_null(12);
        assert_eq!(bitmap.recompute_null_count(), 12);
        bitmap.set_not_null(11);
        assert_eq!(bitmap.recompute_null_count(), 11);
    }

    #[test]
    fn test_from_bytes_wrong_length() {
        assert!(ValidityBitmap::from_bytes(vec![0xFF], 9).is_err());
        let bitmap = ValidityBitmap::from_bytes(vec![0xFF, 0xFF], 9).unwrap();
        assert_eq!(bitmap.null_count(), 0);
        assert_eq!(bitmap.as_bytes(), &[0xFF, 0x01]);
    }

    #[test]
    fn test_raw_bitmap_checks() {
        let ok = RawBitmap { len: 9, null_count: 1, bits: vec![0xFF, 0x00] };
        assert_eq!(ValidityBitmap::try_from(ok).unwrap().null_count(), 1);

        let short = RawBitmap { len: 9, null_count: 0, bits: vec![0xFF] };
        assert!(ValidityBitmap::try_from(short).is_err());

        let miscounted = RawBitmap { len: 8, null_count: 0, bits: vec![0x0F] };
        assert!(matches!(
            ValidityBitmap::try_from(miscounted),
            Err(KolumnError::InvalidVector(_))
        ));
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let original = ValidityBitmap::new_valid(8);
        let mut copy = original.deep_copy();
        copy.set_null(0);
        assert!(original.is_valid(0));
        assert_eq!(original.null_count(), 0);
        assert_eq!(copy.null_count(), 1);
    }

    #[test]
    fn test_empty_bitmap() {
        let bitmap = ValidityBitmap::from_bools(&[]);
        assert!(bitmap.is_empty());
        assert_eq!(bitmap.byte_len(), 0);
        assert_eq!(bitmap.null_count(), 0);
    }
}
