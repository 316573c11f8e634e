//! Named columns.

use serde::{Deserialize, Serialize};

use super::Vector;

/// A vector paired with the name of the source column it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Column values.
    pub vector: Vector,
}

impl Column {
    /// Creates a new column.
    #[must_use]
    pub fn new(name: impl Into<String>, vector: Vector) -> Self {
        Column {
            name: name.into(),
            vector,
        }
    }

    /// Returns the number of values in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vector.len()
    }

    /// Returns true if the column is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }
}
