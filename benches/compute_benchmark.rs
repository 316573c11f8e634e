//! Kernel throughput benchmarks.
//!
//! Measures numeric and string kernels across worker counts on vectors with
//! roughly 10% nulls.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kolumn::compute::{self, ComputeContext};
use kolumn::{ComputeConfig, NumericVector, StringVector};
use rand::{Rng, SeedableRng};

const LEN: usize = 1 << 20;
const WORKERS: [usize; 4] = [1, 2, 4, 8];

fn random_f64(len: usize) -> NumericVector<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let data: Vec<f64> = (0..len).map(|_| rng.gen_range(-1e6..1e6)).collect();
    let validity: Vec<bool> = (0..len).map(|_| rng.gen_bool(0.9)).collect();
    NumericVector::from_values(data, &validity).expect("matching lengths")
}

fn random_strings(len: usize) -> StringVector {
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    let values: Vec<String> = (0..len)
        .map(|_| {
            let n = rng.gen_range(0..24);
            (0..n).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
        })
        .collect();
    let validity: Vec<bool> = (0..len).map(|_| rng.gen_bool(0.9)).collect();
    StringVector::from_strings(&values, &validity).expect("matching lengths")
}

fn context(workers: usize) -> ComputeContext {
    ComputeContext::new(ComputeConfig::new().with_num_workers(workers)).expect("build context")
}

fn bench_numeric(c: &mut Criterion) {
    let mut group = c.benchmark_group("numeric_kernels");
    let x = random_f64(LEN);
    let y = random_f64(LEN);
    group.throughput(Throughput::Elements(LEN as u64));

    for workers in WORKERS {
        let ctx = context(workers);
        group.bench_with_input(BenchmarkId::new("add", workers), &workers, |b, _| {
            b.iter(|| compute::add(&ctx, black_box(&x), black_box(&y)).expect("add"));
        });
        group.bench_with_input(BenchmarkId::new("multiply_literal", workers), &workers, |b, _| {
            b.iter(|| compute::multiply_literal(&ctx, black_box(&x), 1.5).expect("multiply"));
        });
    }
    group.finish();
}

fn bench_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_kernels");
    let x = random_strings(LEN / 4);
    group.throughput(Throughput::Bytes(x.data().len() as u64));

    for workers in WORKERS {
        let ctx = context(workers);
        group.bench_with_input(BenchmarkId::new("add_prefix", workers), &workers, |b, _| {
            b.iter(|| compute::add_prefix(&ctx, black_box(&x), b"pre_").expect("prefix"));
        });
        group.bench_with_input(BenchmarkId::new("concat", workers), &workers, |b, _| {
            b.iter(|| compute::concat(&ctx, black_box(&x), black_box(&x), b",").expect("concat"));
        });
        group.bench_with_input(BenchmarkId::new("to_upper", workers), &workers, |b, _| {
            b.iter(|| compute::to_upper(&ctx, black_box(&x)).expect("upper"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_numeric, bench_string);
criterion_main!(benches);
