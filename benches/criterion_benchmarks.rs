use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use std::fs;
use std::path::Path;
use treebench::codec::ZstdPatchCodec;
use treebench::{BlockCodec, CodecKind, CodecLevels, CodecSet, DeltaCodec, Harness, HarnessConfig};

fn gen_data(size: usize, seed: u64) -> Vec<u8> {
    let mut s = seed;
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        out.push((s >> 33) as u8);
    }
    out
}

/// Text-like data: a small random alphabet, so every codec has something to find.
fn gen_text(size: usize, seed: u64) -> Vec<u8> {
    gen_data(size, seed)
        .into_iter()
        .map(|b| b"etaoin shrdlu\n"[(b % 14) as usize])
        .collect()
}

fn mutate(base: &[u8], stride: usize) -> Vec<u8> {
    let mut out = base.to_vec();
    for i in (0..out.len()).step_by(stride.max(1)) {
        out[i] = out[i].wrapping_add(1);
    }
    out
}

fn write_ratio_snapshot() {
    let data = gen_text(1024 * 1024, 123);
    let mut csv = String::from("codec,level,output_bytes,input_bytes,ratio\n");
    for level in [1u32, 3, 6, 9] {
        let set = CodecSet::from_levels(&CodecLevels {
            gzip: level,
            deflate: level,
            brotli: level,
            zstd: level,
            delta: level,
        });
        for kind in CodecKind::ALL {
            let out = set.block(kind).encode_bytes(&data).unwrap();
            let ratio = out.len() as f64 / data.len() as f64;
            csv.push_str(&format!("{kind},{level},{},{},{ratio}\n", out.len(), data.len()));
        }
    }
    let out_dir = Path::new("target/criterion/custom_reports");
    let _ = fs::create_dir_all(out_dir);
    let _ = fs::write(out_dir.join("ratio_snapshot.csv"), csv);
}

fn bench_block_encode(c: &mut Criterion) {
    write_ratio_snapshot();
    let set = CodecSet::default();
    let mut g = c.benchmark_group("block_encode_mb_s");
    for size in [64 * 1024usize, 1024 * 1024] {
        let data = gen_text(size, 1);
        g.throughput(Throughput::Bytes(size as u64));
        for kind in CodecKind::ALL {
            g.bench_with_input(BenchmarkId::new(kind.name(), size), &data, |b, data| {
                b.iter(|| black_box(set.block(kind).encode_bytes(black_box(data)).unwrap()));
            });
        }
    }
    g.finish();
}

fn bench_block_decode(c: &mut Criterion) {
    let set = CodecSet::default();
    let mut g = c.benchmark_group("block_decode_mb_s");
    let size = 1024 * 1024usize;
    let data = gen_text(size, 2);
    g.throughput(Throughput::Bytes(size as u64));
    for kind in CodecKind::ALL {
        let encoded = set.block(kind).encode_bytes(&data).unwrap();
        g.bench_with_input(BenchmarkId::from_parameter(kind), &encoded, |b, encoded| {
            b.iter(|| black_box(set.block(kind).decode_bytes(black_box(encoded)).unwrap()));
        });
    }
    g.finish();
}

fn bench_delta(c: &mut Criterion) {
    let codec = ZstdPatchCodec::default();
    let mut g = c.benchmark_group("zstd_patch_delta");
    for size in [64 * 1024usize, 1024 * 1024] {
        let base = gen_data(size, 3);
        let target = mutate(&base, 1024);
        let delta = codec.encode_bytes(&base, &target).unwrap();
        g.throughput(Throughput::Bytes(size as u64));
        g.bench_with_input(BenchmarkId::new("encode", size), &size, |b, _| {
            b.iter(|| black_box(codec.encode_bytes(black_box(&base), black_box(&target)).unwrap()));
        });
        g.bench_with_input(BenchmarkId::new("apply", size), &size, |b, _| {
            b.iter(|| black_box(codec.apply_bytes(black_box(&base), black_box(&delta)).unwrap()));
        });
    }
    g.finish();
}

fn bench_harness_tree(c: &mut Criterion) {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    for i in 0..16u64 {
        fs::write(src.join(format!("file-{i:02}.txt")), gen_text(64 * 1024, i)).unwrap();
    }

    let mut g = c.benchmark_group("harness_tree_16x64k");
    g.throughput(Throughput::Bytes(16 * 64 * 1024));
    for kind in CodecKind::ALL {
        g.bench_function(BenchmarkId::new("compress", kind), |b| {
            b.iter_batched(
                || Harness::new(HarnessConfig::with_base_dir(tmp.path())),
                |mut harness| black_box(harness.run_compression(kind, Some(&src)).unwrap()),
                BatchSize::SmallInput,
            );
        });
    }

    let mut warm = Harness::new(HarnessConfig::with_base_dir(tmp.path()));
    warm.run_compression(CodecKind::Zstd, Some(&src)).unwrap();
    g.bench_function("cached_lookup", |b| {
        b.iter(|| black_box(warm.run_compression(CodecKind::Zstd, Some(&src)).unwrap()));
    });
    g.finish();
}

criterion_group!(
    benches,
    bench_block_encode,
    bench_block_decode,
    bench_delta,
    bench_harness_tree
);
criterion_main!(benches);
