//! Fixed-width numeric vectors.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::{KolumnError, Result};
use crate::types::LogicalType;

use super::bitmap::ValidityBitmap;

mod private {
    pub trait Sealed {}
}

/// Element types a [`NumericVector`] can hold.
///
/// The set is closed: signed and unsigned integers of width 8/16/32/64 plus
/// `f32` and `f64`. Integer arithmetic wraps on overflow.
pub trait NumericType:
    private::Sealed + Copy + Default + PartialEq + PartialOrd + Debug + Send + Sync + 'static
{
    /// Logical type of a vector holding this element type.
    const LOGICAL_TYPE: LogicalType;

    /// Elementwise addition.
    fn add(self, rhs: Self) -> Self;
    /// Elementwise subtraction.
    fn sub(self, rhs: Self) -> Self;
    /// Elementwise multiplication.
    fn mul(self, rhs: Self) -> Self;
    /// Elementwise division. Integer callers must rule out a zero divisor.
    fn div(self, rhs: Self) -> Self;
    /// Real-valued exponentiation, truncated back to `Self`.
    fn pow(self, rhs: Self) -> Self;
    /// Returns true for the additive identity.
    fn is_zero(self) -> bool;
    /// Lossy widening to `f64`.
    fn to_f64(self) -> f64;
    /// Conversion from `f64`, truncating toward zero and saturating at the
    /// type bounds.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_integer_type {
    ($($ty:ty => $logical:ident),* $(,)?) => {
        $(
            impl private::Sealed for $ty {}

            impl NumericType for $ty {
                const LOGICAL_TYPE: LogicalType = LogicalType::$logical;

                #[inline]
                fn add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                #[inline]
                fn sub(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }

                #[inline]
                fn mul(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }

                #[inline]
                fn div(self, rhs: Self) -> Self {
                    self.wrapping_div(rhs)
                }

                #[inline]
                fn pow(self, rhs: Self) -> Self {
                    Self::from_f64(self.to_f64().powf(rhs.to_f64()))
                }

                #[inline]
                fn is_zero(self) -> bool {
                    self == 0
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as Self
                }
            }
        )*
    };
}

macro_rules! impl_float_type {
    ($($ty:ty => $logical:ident),* $(,)?) => {
        $(
            impl private::Sealed for $ty {}

            impl NumericType for $ty {
                const LOGICAL_TYPE: LogicalType = LogicalType::$logical;

                #[inline]
                fn add(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline]
                fn sub(self, rhs: Self) -> Self {
                    self - rhs
                }

                #[inline]
                fn mul(self, rhs: Self) -> Self {
                    self * rhs
                }

                #[inline]
                fn div(self, rhs: Self) -> Self {
                    self / rhs
                }

                #[inline]
                fn pow(self, rhs: Self) -> Self {
                    self.powf(rhs)
                }

                #[inline]
                fn is_zero(self) -> bool {
                    self == 0.0
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    f64::from(self)
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as Self
                }
            }
        )*
    };
}

impl_integer_type!(
    u8 => UInt8,
    i8 => Int8,
    u16 => UInt16,
    i16 => Int16,
    u32 => UInt32,
    i32 => Int32,
    u64 => UInt64,
    i64 => Int64,
);

impl_float_type!(f32 => Float32, f64 => Float64);

/// A nullable vector of fixed-width numbers.
///
/// `Date` and `Timestamp` columns reuse this layout with `i32` day counts
/// and `i64` second counts respectively; only the logical type differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawNumericVector<T>",
    bound(deserialize = "T: NumericType + Deserialize<'de>")
)]
pub struct NumericVector<T> {
    logical_type: LogicalType,
    validity: ValidityBitmap,
    data: Vec<T>,
}

/// Serialized form of [`NumericVector`], before validation.
#[derive(Deserialize)]
struct RawNumericVector<T> {
    logical_type: LogicalType,
    validity: ValidityBitmap,
    data: Vec<T>,
}

impl<T: NumericType> TryFrom<RawNumericVector<T>> for NumericVector<T> {
    type Error = KolumnError;

    fn try_from(raw: RawNumericVector<T>) -> Result<Self> {
        let tag_fits = raw.logical_type == T::LOGICAL_TYPE
            || matches!(
                (raw.logical_type, T::LOGICAL_TYPE),
                (LogicalType::Date, LogicalType::Int32)
                    | (LogicalType::Timestamp, LogicalType::Int64)
            );
        if !tag_fits {
            return Err(KolumnError::InvalidVector(format!(
                "logical type {} cannot hold {} values",
                raw.logical_type,
                T::LOGICAL_TYPE
            )));
        }
        Self::with_logical_type(raw.logical_type, raw.data, raw.validity)
    }
}

impl<T: NumericType> NumericVector<T> {
    /// Creates a vector from values and a validity bitmap of the same length.
    ///
    /// # Errors
    ///
    /// Returns [`KolumnError::InvalidVector`] if the lengths differ.
    pub fn new(data: Vec<T>, validity: ValidityBitmap) -> Result<Self> {
        Self::with_logical_type(T::LOGICAL_TYPE, data, validity)
    }

    /// Creates a vector from values and per-element validity flags.
    ///
    /// # Errors
    ///
    /// Returns [`KolumnError::InvalidVector`] if the lengths differ.
    pub fn from_values(data: Vec<T>, validity: &[bool]) -> Result<Self> {
        Self::new(data, ValidityBitmap::from_bools(validity))
    }

    /// Creates a vector with every element valid.
    #[must_use]
    pub fn all_valid(data: Vec<T>) -> Self {
        let validity = ValidityBitmap::new_valid(data.len());
        Self::from_parts(T::LOGICAL_TYPE, data, validity)
    }

    pub(crate) fn with_logical_type(
        logical_type: LogicalType,
        data: Vec<T>,
        validity: ValidityBitmap,
    ) -> Result<Self> {
        if data.len() != validity.len() {
            return Err(KolumnError::InvalidVector(format!(
                "{} values but validity tracks {} elements",
                data.len(),
                validity.len()
            )));
        }
        Ok(Self::from_parts(logical_type, data, validity))
    }

    pub(crate) fn from_parts(
        logical_type: LogicalType,
        data: Vec<T>,
        validity: ValidityBitmap,
    ) -> Self {
        debug_assert_eq!(data.len(), validity.len());
        Self {
            logical_type,
            validity,
            data,
        }
    }

    /// Returns the logical type.
    #[must_use]
    pub fn logical_type(&self) -> LogicalType {
        self.logical_type
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the vector has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
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

    /// Returns the raw values, including the unspecified contents of null slots.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Returns element `i`, or `None` when it is null or out of range.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<T> {
        if i >= self.len() || self.is_null(i) {
            return None;
        }
        Some(self.data[i])
    }

    /// Iterates elements with nulls as `None`.
    pub fn iter(&self) -> impl Iterator<Item = Option<T>> + '_ {
        self.data
            .iter()
            .zip(self.validity.iter())
            .map(|(&v, valid)| valid.then_some(v))
    }

    /// Returns a copy backed by newly allocated buffers.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self {
            logical_type: self.logical_type,
            validity: self.validity.deep_copy(),
            data: self.data.to_vec(),
        }
    }
}

impl NumericVector<i32> {
    /// Creates a date vector from day counts since 1970-01-01.
    ///
    /// # Errors
    ///
    /// Returns [`KolumnError::InvalidVector`] if the lengths differ.
    pub fn dates(days: Vec<i32>, validity: ValidityBitmap) -> Result<Self> {
        Self::with_logical_type(LogicalType::Date, days, validity)
    }
}

impl NumericVector<i64> {
    /// Creates a timestamp vector from seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`KolumnError::InvalidVector`] if the lengths differ.
    pub fn timestamps(seconds: Vec<i64>, validity: ValidityBitmap) -> Result<Self> {
        Self::with_logical_type(LogicalType::Timestamp, seconds, validity)
    }
}

impl<T: NumericType> FromIterator<Option<T>> for NumericVector<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        let mut data = Vec::new();
        let mut validity = Vec::new();
        for item in iter {
            validity.push(item.is_some());
            data.push(item.unwrap_or_default());
        }
        Self::from_parts(T::LOGICAL_TYPE, data, ValidityBitmap::from_bools(&validity))
    }
}
