//! Bit-packed boolean vectors.

use serde::{Deserialize, Serialize};

use crate::error::{KolumnError, Result};
use crate::types::LogicalType;

use super::bitmap::{bitmap_byte_len, ValidityBitmap};

/// A nullable vector of booleans.
///
/// Values are packed one bit per element with the same LSB-first convention
/// as [`ValidityBitmap`], in a buffer independent of the validity bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBooleanVector")]
pub struct BooleanVector {
    validity: ValidityBitmap,
    data: Vec<u8>,
}

/// Serialized form of [`BooleanVector`], before validation.
#[derive(Deserialize)]
struct RawBooleanVector {
    validity: ValidityBitmap,
    data: Vec<u8>,
}

impl TryFrom<RawBooleanVector> for BooleanVector {
    type Error = KolumnError;

    fn try_from(raw: RawBooleanVector) -> Result<Self> {
        Self::try_from_parts(raw.data, raw.validity)
    }
}

impl BooleanVector {
    /// Creates a vector from values and per-element validity flags.
    ///
    /// # Errors
    ///
    /// Returns [`KolumnError::InvalidVector`] if the slices differ in length.
    pub fn from_bools(values: &[bool], validity: &[bool]) -> Result<Self> {
        if values.len() != validity.len() {
            return Err(KolumnError::InvalidVector(format!(
                "{} values but {} validity flags",
                values.len(),
                validity.len()
            )));
        }
        Ok(Self {
            validity: ValidityBitmap::from_bools(validity),
            data: pack_bits(values),
        })
    }

    /// Creates a vector from packed value bits and a validity bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`KolumnError::InvalidVector`] if `data` is not exactly
    /// `ceil(len / 8)` bytes for the bitmap's length.
    pub fn try_from_parts(data: Vec<u8>, validity: ValidityBitmap) -> Result<Self> {
        if data.len() != bitmap_byte_len(validity.len()) {
            return Err(KolumnError::InvalidVector(format!(
                "value buffer has {} bytes, expected {} for {} elements",
                data.len(),
                bitmap_byte_len(validity.len()),
                validity.len()
            )));
        }
        Ok(Self { validity, data })
    }

    /// Creates a vector with every element valid.
    #[must_use]
    pub fn all_valid(values: &[bool]) -> Self {
        Self {
            validity: ValidityBitmap::new_valid(values.len()),
            data: pack_bits(values),
        }
    }

    /// Returns the logical type.
    #[must_use]
    pub fn logical_type(&self) -> LogicalType {
        LogicalType::Bool
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validity.len()
    }

    /// Returns true if the vector has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validity.is_empty()
    }

    /// Returns the number of null elements.
    #[must_use]
    pub fn null_count(&self) -> usize {
        self.validity.null_count()
    }

    /// Returns whether element `i` is null.
    #[must_use]
    pub fn is_null(&self, i: usize) -> bool {
        self.validity.is_null(i)
    }

    /// Returns the validity bitmap.
    #[must_use]
    pub fn validity(&self) -> &ValidityBitmap {
        &self.validity
    }

    /// Returns the packed value bits.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the stored bit for element `i`, ignoring validity.
    #[inline]
    #[must_use]
    pub fn value(&self, i: usize) -> bool {
        (self.data[i / 8] >> (i % 8)) & 1 == 1
    }

    /// Returns element `i`, or `None` when it is null or out of range.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<bool> {
        if i >= self.len() || self.is_null(i) {
            return None;
        }
        Some(self.value(i))
    }

    /// Iterates elements with nulls as `None`.
    pub fn iter(&self) -> impl Iterator<Item = Option<bool>> + '_ {
        (0..self.len()).map(|i| self.validity.is_valid(i).then(|| self.value(i)))
    }

    /// Returns a copy backed by newly allocated buffers.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self {
            validity: self.validity.deep_copy(),
            data: self.data.to_vec(),
        }
    }
}

impl FromIterator<Option<bool>> for BooleanVector {
    fn from_iter<I: IntoIterator<Item = Option<bool>>>(iter: I) -> Self {
        let mut values = Vec::new();
        let mut validity = Vec::new();
        for item in iter {
            validity.push(item.is_some());
            values.push(item.unwrap_or(false));
        }
        Self {
            validity: ValidityBitmap::from_bools(&validity),
            data: pack_bits(&values),
        }
    }
}

fn pack_bits(values: &[bool]) -> Vec<u8> {
    let mut bits = vec![0u8; bitmap_byte_len(values.len())];
    for (i, &v) in values.iter().enumerate() {
        if v {
            bits[i / 8] |= 1 << (i % 8);
        }
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bools() {
        let v = BooleanVector::from_bools(
            &[true, false, true, true, false, false, true, false, true],
            &[true, true, false, true, true, true, true, true, true],
        )
        .unwrap();
        assert_eq!(v.len(), 9);
        assert_eq!(v.null_count(), 1);
        assert_eq!(v.data(), &[0b0100_1101, 0b0000_0001]);
        assert_eq!(v.get(0), Some(true));
        assert_eq!(v.get(1), Some(false));
        assert_eq!(v.get(2), None);
        assert!(v.value(2));
    }

    #[test]
    fn test_from_options() {
        let v: BooleanVector = vec![Some(false), None, Some(true)].into_iter().collect();
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![Some(false), None, Some(true)]);
    }

    #[test]
    fn test_mismatched_lengths() {
        assert!(BooleanVector::from_bools(&[true], &[]).is_err());
    }

    #[test]
    fn test_try_from_parts_checks_byte_length() {
        let v = BooleanVector::try_from_parts(vec![0b101], ValidityBitmap::new_valid(3)).unwrap();
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![Some(true), Some(false), Some(true)]);
        assert!(BooleanVector::try_from_parts(vec![], ValidityBitmap::new_valid(3)).is_err());
        assert!(BooleanVector::try_from_parts(vec![0, 0], ValidityBitmap::new_valid(3)).is_err());
    }
}
