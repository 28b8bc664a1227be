use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use oxihuff::compress::{self, CompressOptions};
use oxihuff::huffman::{FrequencyTable, build_tree};
use std::fs;
use std::path::Path;

/// Text-like data: `alphabet` symbols with a geometric-ish skew.
fn gen_data(size: usize, alphabet: u8, seed: u64) -> Vec<u8> {
    let mut s = seed;
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        let r = (s >> 33) as u32;
        // Lower symbols are picked more often.
        let sym = (r % alphabet as u32).min((r >> 8) % alphabet as u32);
        out.push(sym as u8);
    }
    out
}

fn write_ratio_snapshot() {
    let mut csv = String::from("alphabet,input_bytes,artifact_bytes,ratio\n");
    for alphabet in [2u8, 16, 64, 255] {
        let data = gen_data(1024 * 1024, alphabet, 123);
        let artifact = compress::compress(&data).unwrap();
        let ratio = artifact.len() as f64 / data.len() as f64;
        csv.push_str(&format!("{alphabet},{},{},{}\n", data.len(), artifact.len(), ratio));
    }
    let out_dir = Path::new("target/criterion/custom_reports");
    let _ = fs::create_dir_all(out_dir);
    let _ = fs::write(out_dir.join("ratio_snapshot.csv"), csv);
}

fn bench_compress_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("compress_speed_mb_s");
    for size in [64 * 1024usize, 1024 * 1024, 8 * 1024 * 1024] {
        let data = gen_data(size, 64, 1);
        g.throughput(Throughput::Bytes(size as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let artifact = compress::compress(black_box(&data)).unwrap();
                black_box(artifact);
            });
        });
    }
    g.finish();
}

fn bench_decompress_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("decompress_speed_mb_s");
    for size in [64 * 1024usize, 1024 * 1024, 8 * 1024 * 1024] {
        let data = gen_data(size, 64, 2);
        let artifact = compress::compress(&data).unwrap();
        g.throughput(Throughput::Bytes(size as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let out = compress::decompress(black_box(&artifact)).unwrap();
                black_box(out);
            });
        });
    }
    g.finish();
}

fn bench_ratio_vs_alphabet(c: &mut Criterion) {
    write_ratio_snapshot();
    let mut g = c.benchmark_group("compression_ratio_vs_alphabet");
    for alphabet in [2u8, 16, 64, 255] {
        let data = gen_data(256 * 1024, alphabet, 3);
        g.bench_with_input(
            BenchmarkId::from_parameter(alphabet),
            &alphabet,
            |b, _| {
                b.iter(|| {
                    let artifact = compress::compress(&data).unwrap();
                    let ratio = artifact.len() as f64 / data.len() as f64;
                    black_box(ratio);
                });
            },
        );
    }
    g.finish();
}

fn bench_tree_build(c: &mut Criterion) {
    let mut g = c.benchmark_group("tree_build");
    for alphabet in [16u8, 255] {
        let freq = FrequencyTable::from_bytes(&gen_data(64 * 1024, alphabet, 4));
        g.bench_with_input(BenchmarkId::from_parameter(alphabet), &freq, |b, freq| {
            b.iter(|| black_box(build_tree(black_box(freq)).unwrap()));
        });
    }
    g.finish();
}

fn bench_improve_tree(c: &mut Criterion) {
    let data = gen_data(1024 * 1024, 255, 5);
    c.bench_function("compress_with_improve_tree", |b| {
        let opts = CompressOptions { improve_tree: true };
        b.iter(|| black_box(compress::compress_with_options(&data, &opts).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_compress_speed,
    bench_decompress_speed,
    bench_ratio_vs_alphabet,
    bench_tree_build,
    bench_improve_tree
);
criterion_main!(benches);
