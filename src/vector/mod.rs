//! Nullable column vectors.
//!
//! Every vector owns its buffers exclusively and carries a
//! [`ValidityBitmap`]. [`Vector`] closes the set of layouts behind one enum
//! exposing the capabilities all of them share.

mod bitmap;
mod boolean;
mod column;
mod numeric;
mod string;

pub use bitmap::{bitmap_byte_len, ValidityBitmap};
pub use boolean::BooleanVector;
pub use column::Column;
pub use numeric::{NumericType, NumericVector};
pub use string::StringVector;

use serde::{Deserialize, Serialize};

use crate::types::LogicalType;

/// Any vector layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Vector {
    UInt8(NumericVector<u8>),
    Int8(NumericVector<i8>),
    UInt16(NumericVector<u16>),
    Int16(NumericVector<i16>),
    UInt32(NumericVector<u32>),
    Int32(NumericVector<i32>),
    UInt64(NumericVector<u64>),
    Int64(NumericVector<i64>),
    Float32(NumericVector<f32>),
    Float64(NumericVector<f64>),
    Bool(BooleanVector),
    String(StringVector),
    /// Days since 1970-01-01.
    Date(NumericVector<i32>),
    /// Seconds since the Unix epoch.
    Timestamp(NumericVector<i64>),
}

macro_rules! for_each_vector {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            Vector::UInt8($v) => $body,
            Vector::Int8($v) => $body,
            Vector::UInt16($v) => $body,
            Vector::Int16($v) => $body,
            Vector::UInt32($v) => $body,
            Vector::Int32($v) => $body,
            Vector::UInt64($v) => $body,
            Vector::Int64($v) => $body,
            Vector::Float32($v) => $body,
            Vector::Float64($v) => $body,
            Vector::Bool($v) => $body,
            Vector::String($v) => $body,
            Vector::Date($v) => $body,
            Vector::Timestamp($v) => $body,
        }
    };
}

impl Vector {
    /// Returns the logical type.
    #[must_use]
    pub fn logical_type(&self) -> LogicalType {
        for_each_vector!(self, v => v.logical_type())
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        for_each_vector!(self, v => v.len())
    }

    /// Returns true if the vector has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of null elements.
    #[must_use]
    pub fn null_count(&self) -> usize {
        for_each_vector!(self, v => v.null_count())
    }

    /// Returns whether element `i` is null.
    #[must_use]
    pub fn is_null(&self, i: usize) -> bool {
        for_each_vector!(self, v => v.is_null(i))
    }

    /// Returns the validity bitmap.
    #[must_use]
    pub fn validity(&self) -> &ValidityBitmap {
        for_each_vector!(self, v => v.validity())
    }

    /// Returns a copy backed by newly allocated buffers.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        match self {
            Vector::UInt8(v) => Vector::UInt8(v.deep_copy()),
            Vector::Int8(v) => Vector::Int8(v.deep_copy()),
            Vector::UInt16(v) => Vector::UInt16(v.deep_copy()),
            Vector::Int16(v) => Vector::Int16(v.deep_copy()),
            Vector::UInt32(v) => Vector::UInt32(v.deep_copy()),
            Vector::Int32(v) => Vector::Int32(v.deep_copy()),
            Vector::UInt64(v) => Vector::UInt64(v.deep_copy()),
            Vector::Int64(v) => Vector::Int64(v.deep_copy()),
            Vector::Float32(v) => Vector::Float32(v.deep_copy()),
            Vector::Float64(v) => Vector::Float64(v.deep_copy()),
            Vector::Bool(v) => Vector::Bool(v.deep_copy()),
            Vector::String(v) => Vector::String(v.deep_copy()),
            Vector::Date(v) => Vector::Date(v.deep_copy()),
            Vector::Timestamp(v) => Vector::Timestamp(v.deep_copy()),
        }
    }
}

macro_rules! impl_from_numeric {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<NumericVector<$ty>> for Vector {
                fn from(v: NumericVector<$ty>) -> Self {
                    Vector::$variant(v)
                }
            }
        )*
    };
}

impl_from_numeric!(
    u8 => UInt8,
    i8 => Int8,
    u16 => UInt16,
    i16 => Int16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
);

impl From<NumericVector<i32>> for Vector {
    fn from(v: NumericVector<i32>) -> Self {
        match v.logical_type() {
            LogicalType::Date => Vector::Date(v),
            _ => Vector::Int32(v),
        }
    }
}

impl From<NumericVector<i64>> for Vector {
    fn from(v: NumericVector<i64>) -> Self {
        match v.logical_type() {
            LogicalType::Timestamp => Vector::Timestamp(v),
            _ => Vector::Int64(v),
        }
    }
}

impl From<BooleanVector> for Vector {
    fn from(v: BooleanVector) -> Self {
        Vector::Bool(v)
    }
}

impl From<StringVector> for Vector {
    fn from(v: StringVector) -> Self {
        Vector::String(v)
    }
}
