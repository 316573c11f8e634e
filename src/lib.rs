//! kolumn - nullable columnar vectors with parallel compute kernels.
//!
//! Vectors own their buffers and a [`ValidityBitmap`]. Kernels in
//! [`compute`] read shared inputs, split fresh outputs into disjoint chunks
//! and fill them on a bounded worker pool. [`io`] and [`inference`] turn
//! delimited text into typed [`Column`]s.

pub mod compute;
pub mod config;
pub mod error;
pub mod inference;
pub mod interop;
pub mod io;
pub mod types;
pub mod vector;

pub use compute::{ChunkPlanner, ChunkRange, ComputeContext};
pub use config::{default_num_workers, set_default_num_workers, ComputeConfig};
pub use error::{KolumnError, Result};
pub use inference::{ColumnInference, ColumnSchema, FieldParser, InferredType, Schema};
pub use io::{infer_schema, read_columns, CsvReadConfig};
pub use types::LogicalType;
pub use vector::{
    BooleanVector, Column, NumericType, NumericVector, StringVector, ValidityBitmap, Vector,
};
