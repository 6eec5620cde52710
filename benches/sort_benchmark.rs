//! Performance benchmarks for FileSorter
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

/// Create a test file of the specified size
fn create_test_file(dir: &std::path::Path, name: &str, size: usize) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();

    let chunk_size = 64 * 1024;
    let chunk: Vec<u8> = (0..chunk_size).map(|i| (i % 256) as u8).collect();
    let mut remaining = size;

    while remaining > 0 {
        let to_write = remaining.min(chunk_size);
        file.write_all(&chunk[..to_write]).unwrap();
        remaining -= to_write;
    }

    path
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn bench_sort_small_files(c: &mut Criterion) {
    let src_dir = TempDir::new().unwrap();
    let extensions = ["txt", "csv", "json", "log"];

    // 400 small files over four extensions
    for i in 0..400 {
        let ext = extensions[i % extensions.len()];
        create_test_file(src_dir.path(), &format!("file_{}.{}", i, ext), 1024);
    }

    let rt = runtime();
    let mut group = c.benchmark_group("sort_400_small_files");

    for max_concurrent in [1usize, 16, 64] {
        group.bench_with_input(
            BenchmarkId::new("max_concurrent", max_concurrent),
            &max_concurrent,
            |b, &max_concurrent| {
                b.iter(|| {
                    let dst_dir = TempDir::new().unwrap();
                    let config = filesorter::SortConfig {
                        source: src_dir.path().to_path_buf(),
                        destination: dst_dir.path().to_path_buf(),
                        max_concurrent,
                        ..Default::default()
                    };
                    let engine = filesorter::SortEngine::new(config);
                    black_box(rt.block_on(engine.execute()).unwrap())
                });
            },
        );
    }

    group.finish();
}

fn bench_copy_large_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_file_copy");
    let rt = runtime();

    for size in [1024 * 1024, 10 * 1024 * 1024].iter() {
        let src_dir = TempDir::new().unwrap();
        let dst_dir = TempDir::new().unwrap();

        let src_file = create_test_file(src_dir.path(), "large.bin", *size);
        let dst_file = dst_dir.path().join("large.bin");

        group.throughput(Throughput::Bytes(*size as u64));
        for atomic in [true, false] {
            let label = if atomic { "atomic" } else { "in_place" };
            group.bench_with_input(
                BenchmarkId::new(label, humansize::format_size(*size as u64, humansize::BINARY)),
                size,
                |b, _| {
                    let copier = filesorter::fs::FileCopier::new(filesorter::fs::CopyOptions {
                        atomic,
                        ..Default::default()
                    });
                    b.iter(|| black_box(rt.block_on(copier.copy(&src_file, &dst_file)).unwrap()));
                },
            );
        }
    }

    group.finish();
}

fn bench_directory_walk(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();

    for i in 0..10 {
        let subdir = dir.path().join(format!("subdir_{}", i));
        std::fs::create_dir_all(&subdir).unwrap();

        for j in 0..100 {
            create_test_file(&subdir, &format!("file_{}.txt", j), 128);
        }
    }

    c.bench_function("walk_1000_files", |b| {
        b.iter(|| {
            let walker = filesorter::fs::Walker::default();
            black_box(walker.walk(dir.path()))
        });
    });
}

criterion_group!(
    benches,
    bench_sort_small_files,
    bench_copy_large_file,
    bench_directory_walk
);

criterion_main!(benches);
