//! Logical type definitions for kolumn.

mod logical;

pub use logical::LogicalType;
