//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use varnorm::model::StudyEntry;
use varnorm::{NormalizerConfig, VariantNormalizer, VariantRecord};

fn multi_allelic_batch(size: i64) -> Vec<VariantRecord> {
    (0..size)
        .map(|i| {
            VariantRecord::new("1", 1_000 + i * 10, "ACTCGTA", "ATTCGA,ACTCCTA,A").with_study(
                StudyEntry::new("s", ["GT", "PL"])
                    .with_sample("S1", ["1/2", "1,2,3,4,5,6,7,8,9,10"])
                    .with_sample("S2", ["0/3", "10,9,8,7,6,5,4,3,2,1"]),
            )
        })
        .collect()
}

fn benchmark_normalize(c: &mut Criterion) {
    let normalizer = VariantNormalizer::new(NormalizerConfig::default().with_reference_blocks(true));
    let mut group = c.benchmark_group("normalize");
    for size in [100, 1_000] {
        let records = multi_allelic_batch(size);
        group.bench_with_input(BenchmarkId::new("sequential", size), &records, |b, records| {
            b.iter(|| black_box(normalizer.normalize(records)));
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &records, |b, records| {
            b.iter(|| black_box(normalizer.normalize_par(records)));
        });
    }
    group.finish();
}

fn benchmark_mnv(c: &mut Criterion) {
    let normalizer = VariantNormalizer::new(NormalizerConfig::default().with_mnv_decomposition(true));
    let record = VariantRecord::new("1", 100, "ACTCGTAAACGTTGCA", "ATTCGAAACGATGGA");
    c.bench_function("decompose_complex_substitution", |b| {
        b.iter(|| black_box(normalizer.normalize_record(black_box(&record))));
    });
}

criterion_group!(benches, benchmark_normalize, benchmark_mnv);
criterion_main!(benches);
