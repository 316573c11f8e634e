//! Chunk planning for fork-join kernels.
//!
//! A plan splits `[0, n)` into exactly `workers` contiguous ranges. Every
//! range but the last has the same length `S = floor(n / (workers * 8)) * 8`,
//! so each one starts and stops on a validity-bitmap byte boundary and no
//! two workers ever touch the same bitmap byte. The last range absorbs the
//! remainder. When `S == 0` the leading ranges are empty and the last range
//! covers everything.

use std::ops::Range;

/// A half-open range of element indices owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    /// First index (inclusive).
    pub start: usize,
    /// Last index (exclusive).
    pub stop: usize,
}

impl ChunkRange {
    /// Creates a new range.
    #[must_use]
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    /// Returns the number of elements in the range.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    /// Returns true if the range is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// Returns the range as a `Range<usize>`.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.stop
    }

    /// Returns the validity-bitmap bytes covering this range.
    ///
    /// `start` is always byte aligned; `stop` is byte aligned for every range
    /// but the last, which is clamped to the bitmap's true byte length.
    #[must_use]
    pub fn byte_range(&self, bitmap_len: usize) -> Range<usize> {
        let start = (self.start / 8).min(bitmap_len);
        let stop = self.stop.div_ceil(8).min(bitmap_len);
        start..stop
    }
}

/// Splits index domains into per-worker [`ChunkRange`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlanner {
    workers: usize,
}

impl ChunkPlanner {
    /// Creates a planner for `workers` workers (at least one).
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Returns the number of ranges each plan contains.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns the base chunk size for `n` elements.
    #[must_use]
    pub fn chunk_size(&self, n: usize) -> usize {
        n / (self.workers * 8) * 8
    }

    /// Plans `[0, n)`.
    #[must_use]
    pub fn plan(&self, n: usize) -> Vec<ChunkRange> {
        let size = self.chunk_size(n);
        let last = self.workers - 1;
        (0..self.workers)
            .map(|k| {
                let start = k * size;
                let stop = if k == last { n } else { start + size };
                ChunkRange::new(start, stop)
            })
            .collect()
    }
}

/// Splits `buf` into one mutable sub-slice per range.
///
/// Ranges must be ordered and non-overlapping; bytes between ranges are
/// skipped. The returned slices are disjoint borrows of the same buffer and
/// can be handed to different workers.
///
/// # Panics
///
/// Panics if the ranges overlap, are out of order, or exceed `buf`.
pub fn split_disjoint_mut<T, I>(buf: &mut [T], ranges: I) -> Vec<&mut [T]>
where
    I: IntoIterator<Item = Range<usize>>,
{
    let mut rest = buf;
    let mut consumed = 0;
    let mut parts = Vec::new();
    for range in ranges {
        assert!(
            range.start >= consumed && range.start <= range.end,
            "chunk ranges must be ordered and disjoint"
        );
        let tail = std::mem::take(&mut rest);
        let (_, tail) = tail.split_at_mut(range.start - consumed);
        let (part, tail) = tail.split_at_mut(range.end - range.start);
        parts.push(part);
        rest = tail;
        consumed = range.end;
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(plan: &[ChunkRange], n: usize) {
        let mut expected = 0;
        for chunk in plan {
            assert_eq!(chunk.start, expected);
            assert!(chunk.stop >= chunk.start);
            expected = chunk.stop;
        }
        assert_eq!(expected, n);
    }

    #[test]
    fn test_plan_even_split() {
        let plan = ChunkPlanner::new(4).plan(64);
        assert_eq!(
            plan,
            vec![
                ChunkRange::new(0, 16),
                ChunkRange::new(16, 32),
                ChunkRange::new(32, 48),
                ChunkRange::new(48, 64),
            ]
        );
    }

    #[test]
    fn test_plan_last_absorbs_remainder() {
        let plan = ChunkPlanner::new(3).plan(100);
        // floor(100 / 24) * 8 = 32
        assert_eq!(plan[0], ChunkRange::new(0, 32));
        assert_eq!(plan[1], ChunkRange::new(32, 64));
        assert_eq!(plan[2], ChunkRange::new(64, 100));
        assert_covers(&plan, 100);
    }

    #[test]
    fn test_plan_small_input() {
        let plan = ChunkPlanner::new(8).plan(10);
        assert_eq!(plan.len(), 8);
        assert!(plan[..7].iter().all(ChunkRange::is_empty));
        assert_eq!(plan[7], ChunkRange::new(0, 10));
        assert_covers(&plan, 10);
    }

    #[test]
    fn test_plan_empty_input() {
        let plan = ChunkPlanner::new(4).plan(0);
        assert!(plan.iter().all(ChunkRange::is_empty));
        assert_covers(&plan, 0);
    }

    #[test]
    fn test_zero_workers_clamped() {
        let plan = ChunkPlanner::new(0).plan(5);
        assert_eq!(plan, vec![ChunkRange::new(0, 5)]);
    }

    #[test]
    fn test_byte_ranges() {
        let plan = ChunkPlanner::new(3).plan(100);
        let bitmap_len = 13;
        assert_eq!(plan[0].byte_range(bitmap_len), 0..4);
        assert_eq!(plan[1].byte_range(bitmap_len), 4..8);
        assert_eq!(plan[2].byte_range(bitmap_len), 8..13);

        let plan = ChunkPlanner::new(4).plan(3);
        assert_eq!(plan[0].byte_range(1), 0..0);
        assert_eq!(plan[3].byte_range(1), 0..1);
    }

    #[test]
    fn test_split_disjoint_mut() {
        let mut buf = [0u8; 10];
        let parts = split_disjoint_mut(&mut buf, vec![0..3, 3..3, 5..10]);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 3);
        assert!(parts[1].is_empty());
        assert_eq!(parts[2].len(), 5);
        for part in parts {
            part.fill(1);
        }
        assert_eq!(buf, [1, 1, 1, 0, 0, 1, 1, 1, 1, 1]);
    }

    #[test]
    #[should_panic(expected = "ordered and disjoint")]
    fn test_split_rejects_overlap() {
        let mut buf = [0u8; 10];
        let _ = split_disjoint_mut(&mut buf, vec![0..5, 4..6]);
    }
}
