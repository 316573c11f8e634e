//! Offset-encoded variable-length string vectors.

use serde::{Deserialize, Serialize};

use crate::error::{KolumnError, Result};
use crate::types::LogicalType;

use super::bitmap::ValidityBitmap;

/// A nullable vector of byte strings.
///
/// All payloads live back to back in one buffer. `offsets` has `len + 1`
/// non-decreasing entries starting at 0 and ending at `data.len()`, and
/// element `i` is `data[offsets[i]..offsets[i + 1]]`. Payloads are usually
/// UTF-8 but nothing here requires it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStringVector")]
pub struct StringVector {
    validity: ValidityBitmap,
    data: Vec<u8>,
    offsets: Vec<i64>,
}

/// Serialized form of [`StringVector`], before validation.
#[derive(Deserialize)]
struct RawStringVector {
    validity: ValidityBitmap,
    data: Vec<u8>,
    offsets: Vec<i64>,
}

impl TryFrom<RawStringVector> for StringVector {
    type Error = KolumnError;

    fn try_from(raw: RawStringVector) -> Result<Self> {
        Self::try_from_parts(raw.data, raw.offsets, raw.validity)
    }
}

impl StringVector {
    /// Creates a vector from a batch of strings and per-element validity flags.
    ///
    /// # Errors
    ///
    /// Returns [`KolumnError::InvalidVector`] if the slices differ in length.
    pub fn from_strings<S: AsRef<[u8]>>(values: &[S], validity: &[bool]) -> Result<Self> {
        if values.len() != validity.len() {
            return Err(KolumnError::InvalidVector(format!(
                "{} strings but {} validity flags",
                values.len(),
                validity.len()
            )));
        }
        let (data, offsets) = pack_strings(values);
        Ok(Self {
            validity: ValidityBitmap::from_bools(validity),
            data,
            offsets,
        })
    }

    /// Creates a vector with every element valid.
    #[must_use]
    pub fn all_valid<S: AsRef<[u8]>>(values: &[S]) -> Self {
        let (data, offsets) = pack_strings(values);
        Self {
            validity: ValidityBitmap::new_valid(values.len()),
            data,
            offsets,
        }
    }

    /// Creates a vector from raw components, checking the offset invariants.
    ///
    /// # Errors
    ///
    /// Returns [`KolumnError::InvalidVector`] if the offsets do not start at
    /// zero, decrease anywhere, do not end at `data.len()`, or do not match
    /// the validity length.
    pub fn try_from_parts(data: Vec<u8>, offsets: Vec<i64>, validity: ValidityBitmap) -> Result<Self> {
        if offsets.len() != validity.len() + 1 {
            return Err(KolumnError::InvalidVector(format!(
                "{} offsets for {} elements",
                offsets.len(),
                validity.len()
            )));
        }
        if offsets[0] != 0 {
            return Err(KolumnError::InvalidVector(format!(
                "first offset is {}, expected 0",
                offsets[0]
            )));
        }
        if let Some(pos) = offsets.windows(2).position(|w| w[1] < w[0]) {
            return Err(KolumnError::InvalidVector(format!(
                "offsets decrease at element {pos}"
            )));
        }
        let last = offsets[offsets.len() - 1];
        if last != data.len() as i64 {
            return Err(KolumnError::InvalidVector(format!(
                "last offset is {last}, payload holds {} bytes",
                data.len()
            )));
        }
        Ok(Self::from_parts(data, offsets, validity))
    }

    pub(crate) fn from_parts(data: Vec<u8>, offsets: Vec<i64>, validity: ValidityBitmap) -> Self {
        debug_assert_eq!(offsets.len(), validity.len() + 1);
        debug_assert_eq!(offsets.last().copied(), Some(data.len() as i64));
        Self {
            validity,
            data,
            offsets,
        }
    }

    /// Returns the logical type.
    #[must_use]
    pub fn logical_type(&self) -> LogicalType {
        LogicalType::String
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns true if the vector has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
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

    /// Returns the concatenated payload buffer.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the offset buffer (`len + 1` entries).
    #[must_use]
    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    /// Returns the payload bytes of element `i`, ignoring validity.
    #[inline]
    #[must_use]
    pub fn value(&self, i: usize) -> &[u8] {
        &self.data[self.offsets[i] as usize..self.offsets[i + 1] as usize]
    }

    /// Returns element `i`, or `None` when it is null or out of range.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&[u8]> {
        if i >= self.len() || self.is_null(i) {
            return None;
        }
        Some(self.value(i))
    }

    /// Returns element `i` as UTF-8, or `None` when null or not valid UTF-8.
    #[must_use]
    pub fn get_str(&self, i: usize) -> Option<&str> {
        self.get(i).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Iterates elements with nulls as `None`.
    pub fn iter(&self) -> impl Iterator<Item = Option<&[u8]>> + '_ {
        (0..self.len()).map(|i| self.validity.is_valid(i).then(|| self.value(i)))
    }

    /// Returns a copy backed by newly allocated buffers.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self {
            validity: self.validity.deep_copy(),
            data: self.data.to_vec(),
            offsets: self.offsets.to_vec(),
        }
    }
}

impl<'a> FromIterator<Option<&'a [u8]>> for StringVector {
    fn from_iter<I: IntoIterator<Item = Option<&'a [u8]>>>(iter: I) -> Self {
        let mut data = Vec::new();
        let mut offsets = vec![0i64];
        let mut validity = Vec::new();
        for item in iter {
            validity.push(item.is_some());
            if let Some(bytes) = item {
                data.extend_from_slice(bytes);
            }
            offsets.push(data.len() as i64);
        }
        Self::from_parts(data, offsets, ValidityBitmap::from_bools(&validity))
    }
}

fn pack_strings<S: AsRef<[u8]>>(values: &[S]) -> (Vec<u8>, Vec<i64>) {
    let total: usize = values.iter().map(|s| s.as_ref().len()).sum();
    let mut data = Vec::with_capacity(total);
    let mut offsets = Vec::with_capacity(values.len() + 1);
    offsets.push(0);
    for s in values {
        data.extend_from_slice(s.as_ref());
        offsets.push(data.len() as i64);
    }
    (data, offsets)
}
