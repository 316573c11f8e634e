use serde::{Deserialize, Serialize};

use crate::error::{KolumnError, Result};

/// Configuration for reading delimited text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvReadConfig {
    /// Field separator (default: `b','`).
    pub delimiter: u8,
    /// Record terminator. `None` accepts `\n`, `\r` and `\r\n` (default: `None`).
    pub terminator: Option<u8>,
    /// Quote character (default: `b'"'`).
    pub quote: u8,
    /// Whether the first record holds column names (default: true).
    pub has_header: bool,
    /// Number of records sampled for type inference (default: 1000).
    pub infer_rows: usize,
    /// Tally sample shards on the rayon pool and merge them (default: true).
    pub parallel_inference: bool,
}

impl Default for CsvReadConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            terminator: None,
            quote: b'"',
            has_header: true,
            infer_rows: 1000,
            parallel_inference: true,
        }
    }
}

impl CsvReadConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_terminator(mut self, terminator: u8) -> Self {
        self.terminator = Some(terminator);
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    #[must_use]
    pub fn with_infer_rows(mut self, infer_rows: usize) -> Self {
        self.infer_rows = infer_rows;
        self
    }

    #[must_use]
    pub fn with_parallel_inference(mut self, parallel: bool) -> Self {
        self.parallel_inference = parallel;
        self
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `infer_rows` is 0
    /// - `delimiter` equals `quote` or `terminator`
    pub fn validate(&self) -> Result<()> {
        if self.infer_rows == 0 {
            return Err(KolumnError::ValidationError(
                "infer_rows must be at least 1".to_string(),
            ));
        }
        if self.delimiter == self.quote {
            return Err(KolumnError::ValidationError(
                "delimiter and quote must differ".to_string(),
            ));
        }
        if self.terminator == Some(self.delimiter) {
            return Err(KolumnError::ValidationError(
                "delimiter and terminator must differ".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn build_reader<R: std::io::Read>(&self, rdr: R) -> csv::Reader<R> {
        let terminator = self.terminator.map_or(csv::Terminator::CRLF, csv::Terminator::Any);
        csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .terminator(terminator)
            .quote(self.quote)
            .has_headers(self.has_header)
            .flexible(false)
            .from_reader(rdr)
    }
}
