//! Property tests for bitmaps, chunk plans and kernel determinism.

use proptest::prelude::*;

use kolumn::compute::{self, ChunkPlanner, ComputeContext};
use kolumn::{ComputeConfig, NumericVector, StringVector, ValidityBitmap};

// =============================================================================
// Test Data Strategies
// =============================================================================

/// Values paired with validity flags of the same length.
fn nullable_i32(max_len: usize) -> impl Strategy<Value = (Vec<i32>, Vec<bool>)> {
    prop::collection::vec((any::<i32>(), prop::bool::weighted(0.8)), 0..max_len)
        .prop_map(|pairs| pairs.into_iter().unzip())
}

/// Short byte strings paired with validity flags.
fn nullable_strings(max_len: usize) -> impl Strategy<Value = (Vec<Vec<u8>>, Vec<bool>)> {
    prop::collection::vec(
        (prop::collection::vec(any::<u8>(), 0..12), prop::bool::weighted(0.8)),
        0..max_len,
    )
    .prop_map(|pairs| pairs.into_iter().unzip())
}

fn ctx(workers: usize) -> ComputeContext {
    ComputeContext::new(ComputeConfig::new().with_num_workers(workers)).unwrap()
}

// =============================================================================
// Validity Bitmap
// =============================================================================

mod bitmap_properties {
    use super::*;

    proptest! {
        #[test]
        fn bools_round_trip(flags in prop::collection::vec(any::<bool>(), 0..300)) {
            let bitmap = ValidityBitmap::from_bools(&flags);
            let restored: Vec<bool> = bitmap.iter().collect();
            prop_assert_eq!(&restored, &flags);
            prop_assert_eq!(bitmap.null_count(), flags.iter().filter(|v| !**v).count());
            prop_assert_eq!(bitmap.byte_len(), flags.len().div_ceil(8));
        }

        #[test]
        fn bytes_round_trip(flags in prop::collection::vec(any::<bool>(), 0..300)) {
            let bitmap = ValidityBitmap::from_bools(&flags);
            let rebuilt = ValidityBitmap::from_bytes(bitmap.as_bytes().to_vec(), flags.len()).unwrap();
            prop_assert_eq!(rebuilt, bitmap);
        }

        #[test]
        fn set_null_keeps_count(flags in prop::collection::vec(any::<bool>(), 1..200), pick in any::<prop::sample::Index>()) {
            let mut bitmap = ValidityBitmap::from_bools(&flags);
            let i = pick.index(flags.len());
            bitmap.set_null(i);
            prop_assert!(bitmap.is_null(i));
            let mut recount = bitmap.clone();
            prop_assert_eq!(recount.recompute_null_count(), bitmap.null_count());
        }
    }
}

// =============================================================================
// Chunk Planner
// =============================================================================

mod chunk_properties {
    use super::*;

    proptest! {
        #[test]
        fn plan_covers_domain(n in 0usize..10_000, workers in 1usize..64) {
            let plan = ChunkPlanner::new(workers).plan(n);
            prop_assert_eq!(plan.len(), workers);
            prop_assert_eq!(plan[0].start, 0);
            prop_assert_eq!(plan[workers - 1].stop, n);
            for pair in plan.windows(2) {
                prop_assert_eq!(pair[0].stop, pair[1].start);
            }
            for chunk in &plan[..workers - 1] {
                prop_assert_eq!(chunk.start % 8, 0);
                prop_assert_eq!(chunk.stop % 8, 0);
            }
        }

        #[test]
        fn byte_ranges_are_disjoint(n in 0usize..10_000, workers in 1usize..64) {
            let plan = ChunkPlanner::new(workers).plan(n);
            let bitmap_len = n.div_ceil(8);
            let mut covered = 0;
            for chunk in &plan {
                let bytes = chunk.byte_range(bitmap_len);
                prop_assert_eq!(bytes.start, covered);
                covered = bytes.end;
            }
            prop_assert_eq!(covered, bitmap_len);
        }
    }
}

// =============================================================================
// Kernels
// =============================================================================

mod kernel_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn numeric_workers_agree((values, validity) in nullable_i32(600), workers in 2usize..12, lit in any::<i32>()) {
            let x = NumericVector::from_values(values, &validity).unwrap();
            let single = compute::add_literal(&ctx(1), &x, lit).unwrap();
            let multi = compute::add_literal(&ctx(workers), &x, lit).unwrap();
            prop_assert_eq!(multi, single);
        }

        #[test]
        fn binary_null_is_and((a, va) in nullable_i32(300), (b, vb) in nullable_i32(300)) {
            let n = a.len().min(b.len());
            let x = NumericVector::from_values(a[..n].to_vec(), &va[..n]).unwrap();
            let y = NumericVector::from_values(b[..n].to_vec(), &vb[..n]).unwrap();
            let out = compute::multiply(&ctx(3), &x, &y).unwrap();
            for i in 0..n {
                prop_assert_eq!(out.is_null(i), !(va[i] && vb[i]));
            }
        }

        #[test]
        fn string_offsets_stay_consistent((values, validity) in nullable_strings(200), workers in 1usize..9) {
            let x = StringVector::from_strings(&values, &validity).unwrap();
            let y = compute::to_upper(&ctx(workers), &x).unwrap();
            let out = compute::concat(&ctx(workers), &x, &y, b"::").unwrap();

            let offsets = out.offsets();
            prop_assert_eq!(offsets.len(), values.len() + 1);
            prop_assert_eq!(offsets[0], 0);
            prop_assert_eq!(offsets[values.len()] as usize, out.data().len());
            prop_assert!(offsets.windows(2).all(|w| w[0] <= w[1]));

            let single = compute::concat(&ctx(1), &x, &y, b"::").unwrap();
            prop_assert_eq!(out, single);
        }
    }
}
