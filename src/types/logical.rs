//! `LogicalType` definition.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical column types supported by kolumn vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    /// Boolean, bit-packed.
    Bool,
    /// 8-bit unsigned integer.
    UInt8,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit unsigned integer.
    UInt16,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit unsigned integer.
    UInt32,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// Variable-length byte string.
    String,
    /// Date (stored as days since epoch).
    Date,
    /// Timestamp (stored as seconds since epoch).
    Timestamp,
}

impl LogicalType {
    /// Returns the display name of the type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            LogicalType::Bool => "BOOL",
            LogicalType::UInt8 => "UINT8",
            LogicalType::Int8 => "INT8",
            LogicalType::UInt16 => "UINT16",
            LogicalType::Int16 => "INT16",
            LogicalType::UInt32 => "UINT32",
            LogicalType::Int32 => "INT32",
            LogicalType::UInt64 => "UINT64",
            LogicalType::Int64 => "INT64",
            LogicalType::Float32 => "FLOAT32",
            LogicalType::Float64 => "FLOAT64",
            LogicalType::String => "STRING",
            LogicalType::Date => "DATE",
            LogicalType::Timestamp => "TIMESTAMP",
        }
    }

    /// Returns the number of bits one element occupies, or `None` for
    /// variable-width types.
    #[must_use]
    pub fn bit_width(&self) -> Option<usize> {
        match self {
            LogicalType::Bool => Some(1),
            LogicalType::UInt8 | LogicalType::Int8 => Some(8),
            LogicalType::UInt16 | LogicalType::Int16 => Some(16),
            LogicalType::UInt32 | LogicalType::Int32 | LogicalType::Float32 | LogicalType::Date => {
                Some(32)
            }
            LogicalType::UInt64
            | LogicalType::Int64
            | LogicalType::Float64
            | LogicalType::Timestamp => Some(64),
            LogicalType::String => None,
        }
    }

    /// Returns whether this type supports arithmetic kernels.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            LogicalType::UInt8
                | LogicalType::Int8
                | LogicalType::UInt16
                | LogicalType::Int16
                | LogicalType::UInt32
                | LogicalType::Int32
                | LogicalType::UInt64
                | LogicalType::Int64
                | LogicalType::Float32
                | LogicalType::Float64
        )
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
