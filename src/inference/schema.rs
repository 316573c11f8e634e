use serde::{Deserialize, Serialize};

use super::classify::InferredType;
use super::parse::FieldParser;
use crate::types::LogicalType;

/// Inference outcome for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub inferred_type: InferredType,
    pub parser: FieldParser,
}

impl ColumnSchema {
    /// Logical type of the vector this column parses into.
    #[must_use]
    pub fn logical_type(&self) -> LogicalType {
        self.parser.logical_type()
    }
}

/// Inferred schema of a delimited file, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnSchema>,
}

impl Schema {
    #[must_use]
    pub fn new(columns: Vec<ColumnSchema>) -> Self {
        Self { columns }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
