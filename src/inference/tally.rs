//! Per-column vote tallies and the type decision policy.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classify::{classify, InferredType};
use super::parse::FieldParser;
use super::schema::ColumnSchema;

const CANDIDATES: usize = InferredType::ALL.len();

/// Running inference state for one column.
///
/// Fields are fed in with [`ColumnInference::observe`]. Partial tallies built
/// on separate shards combine with [`ColumnInference::merge`], and
/// [`ColumnInference::finish`] turns the tally into a [`ColumnSchema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInference {
    name: String,
    counts: [u64; CANDIDATES],
    sample_count: u64,
    min_len: usize,
    max_len: usize,
    total_len: u64,
}

impl ColumnInference {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            counts: [0; CANDIDATES],
            sample_count: 0,
            min_len: usize::MAX,
            max_len: 0,
            total_len: 0,
        }
    }

    /// Classifies one field and records its vote and length.
    pub fn observe(&mut self, field: &[u8]) {
        self.record(classify(field), field.len());
    }

    /// Records a vote for `inferred` from a field of `len` bytes.
    pub fn record(&mut self, inferred: InferredType, len: usize) {
        self.counts[inferred.index()] += 1;
        self.sample_count += 1;
        self.min_len = self.min_len.min(len);
        self.max_len = self.max_len.max(len);
        self.total_len += len as u64;
    }

    /// Combines two tallies of the same column.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (count, extra) in self.counts.iter_mut().zip(other.counts) {
            *count += extra;
        }
        self.sample_count += other.sample_count;
        self.min_len = self.min_len.min(other.min_len);
        self.max_len = self.max_len.max(other.max_len);
        self.total_len += other.total_len;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Votes recorded for `inferred`.
    #[must_use]
    pub fn count(&self, inferred: InferredType) -> u64 {
        self.counts[inferred.index()]
    }

    /// Share of samples that voted for `inferred`, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self, inferred: InferredType) -> f64 {
        if self.sample_count == 0 {
            return 0.0;
        }
        self.count(inferred) as f64 / self.sample_count as f64
    }

    #[must_use]
    pub fn min_len(&self) -> Option<usize> {
        (self.sample_count > 0).then_some(self.min_len)
    }

    #[must_use]
    pub fn max_len(&self) -> Option<usize> {
        (self.sample_count > 0).then_some(self.max_len)
    }

    #[must_use]
    pub fn mean_len(&self) -> Option<f64> {
        (self.sample_count > 0).then(|| self.total_len as f64 / self.sample_count as f64)
    }

    /// Applies the decision policy to the current tally.
    ///
    /// - no samples: text
    /// - top candidate holds at least 3/4 of the votes and is not null: top
    /// - top holds at least 1/2 and is not null: float if the top two are
    ///   integer and float with the runner-up at 1/4 or more, otherwise top
    /// - otherwise: text
    ///
    /// Equal shares rank in [`InferredType::ALL`] order.
    #[must_use]
    pub fn decide(&self) -> InferredType {
        let Some((top, runner_up)) = self.ranked() else {
            return InferredType::Text;
        };
        let top_count = self.count(top);

        if top == InferredType::Null || !self.holds_share(top_count, 1, 2) {
            return InferredType::Text;
        }
        if self.holds_share(top_count, 3, 4) {
            return top;
        }
        if let Some(second) = runner_up {
            let numeric_pair = matches!(
                (top, second),
                (InferredType::Integer, InferredType::Float)
                    | (InferredType::Float, InferredType::Integer)
            );
            if numeric_pair && self.holds_share(self.count(second), 1, 4) {
                return InferredType::Float;
            }
        }
        top
    }

    /// Decides the column type and selects its parser.
    #[must_use]
    pub fn finish(self) -> ColumnSchema {
        let inferred_type = self.decide();
        let parser = FieldParser::for_type(inferred_type, self.max_len().unwrap_or(0));
        debug!(
            column = %self.name,
            samples = self.sample_count,
            %inferred_type,
            share = self.fraction(inferred_type),
            ?parser,
            "inferred column type"
        );
        ColumnSchema {
            name: self.name,
            inferred_type,
            parser,
        }
    }

    /// Top two candidates by vote count, earlier candidates winning ties.
    fn ranked(&self) -> Option<(InferredType, Option<InferredType>)> {
        let mut first: Option<InferredType> = None;
        let mut second: Option<InferredType> = None;
        for candidate in InferredType::ALL {
            let count = self.count(candidate);
            if count == 0 {
                continue;
            }
            if first.map_or(true, |top| count > self.count(top)) {
                second = first;
                first = Some(candidate);
            } else if second.map_or(true, |next| count > self.count(next)) {
                second = Some(candidate);
            }
        }
        first.map(|top| (top, second))
    }

    /// `count / sample_count >= numerator / denominator`, computed exactly.
    fn holds_share(&self, count: u64, numerator: u64, denominator: u64) -> bool {
        count * denominator >= self.sample_count * numerator
    }
}

/// Merges two per-column tally lists position by position.
#[must_use]
pub fn merge_columns(left: Vec<ColumnInference>, right: Vec<ColumnInference>) -> Vec<ColumnInference> {
    if left.is_empty() {
        return right;
    }
    if right.is_empty() {
        return left;
    }
    left.into_iter()
        .zip(right)
        .map(|(l, r)| l.merge(r))
        .collect()
}
