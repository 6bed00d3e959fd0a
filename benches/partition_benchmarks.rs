//! Criterion benchmarks for counting and partitioned streaming.
//!
//! Run with: `cargo bench`
//!
//! Corpora are generated into a temporary directory; each benchmark measures
//! one full pass over the file.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use kfold::partitioning::delimited::count_entries;
use kfold::Partitioner;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Write `sentences` CoNLL-like records separated by blank lines.
fn write_corpus(dir: &tempfile::TempDir, sentences: usize) -> PathBuf {
    let path = dir.path().join(format!("corpus_{}.conll", sentences));
    let file = std::fs::File::create(&path).unwrap();
    let mut out = BufWriter::new(file);
    for i in 0..sentences {
        for t in 0..8 {
            writeln!(out, "token{}_{} NN B-NP", i, t).unwrap();
        }
        writeln!(out).unwrap();
    }
    out.flush().unwrap();
    path
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_count_entries(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let mut group = c.benchmark_group("count_entries");

    for sentences in [1_000, 10_000, 50_000] {
        let path = write_corpus(&dir, sentences);
        group.bench_with_input(BenchmarkId::from_parameter(sentences), &path, |b, path| {
            b.iter(|| {
                let file = std::io::BufReader::new(std::fs::File::open(path).unwrap());
                black_box(count_entries(file, "\n\n").unwrap())
            });
        });
    }
    group.finish();
}

fn bench_stream_parts(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_corpus(&dir, 10_000);
    let mut group = c.benchmark_group("each_entry_in_parts");

    for granularity in [1, 10, 100] {
        let partitioner = Partitioner::with_options(&path, "\n\n", granularity).unwrap();
        partitioner.num_entries().unwrap();

        group.bench_with_input(
            BenchmarkId::new("granularity", granularity),
            &partitioner,
            |b, partitioner| {
                b.iter(|| {
                    let last = partitioner
                        .each_entry_in_parts(10)
                        .unwrap()
                        .map(|item| item.unwrap().0)
                        .last();
                    black_box(last)
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_count_entries, bench_stream_parts);
criterion_main!(benches);
