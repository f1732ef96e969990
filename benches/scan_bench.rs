use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use zonescan::lexer::{Token, Tokenizer};

// ---------------------------------------------------------------------------
// Synthetic zone file generators
// ---------------------------------------------------------------------------

/// Dense A/AAAA-shaped records, one per line, no grouping or escaping — the
/// throughput-optimistic case the 1 GB/s design target (spec §1) targets.
fn dense_records(count: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(count * 32);
    for i in 0..count {
        out.extend_from_slice(
            format!("host{i} 3600 IN A 192.0.2.{}\n", i % 256).as_bytes(),
        );
    }
    out
}

/// A single record whose RDATA is one long parenthesized, multi-line group
/// (e.g. a large SOA or a KEY record), exercising grouping/line suppression
/// (§4.6) over many blocks.
fn grouped_record(interior_lines: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(interior_lines * 16 + 32);
    out.extend_from_slice(b"example.com. 3600 IN TYPE65280 \\# 0 (\n");
    for _ in 0..interior_lines {
        out.extend_from_slice(b"  deadbeef\n");
    }
    out.extend_from_slice(b")\n");
    out
}

/// A single very long quoted TXT-style token, exercising the quoted-region
/// carry path across many block boundaries.
fn long_quoted_string(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len + 32);
    out.extend_from_slice(b"txt.example.com. IN TXT \"");
    out.extend(std::iter::repeat(b'x').take(len));
    out.extend_from_slice(b"\"\n");
    out
}

/// Records whose owner names are heavily backslash-escaped, exercising
/// `find_escaped`'s carry path (§4.2) on (almost) every byte.
fn heavily_escaped(count: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(count * 48);
    for i in 0..count {
        out.extend_from_slice(format!("a\\.b{i}\\;c IN TYPE1 \\# 0\n").as_bytes());
    }
    out
}

fn drain(input: &[u8]) -> usize {
    let mut tok = Tokenizer::open_str("bench", input, true);
    let mut count = 0usize;
    loop {
        match tok.lex().unwrap() {
            Token::EndOfFile => break,
            _ => count += 1,
        }
    }
    count
}

fn bench_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_records");
    for &count in &[1_000usize, 10_000, 100_000] {
        let input = dense_records(count);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| black_box(drain(input)));
        });
    }
    group.finish();
}

fn bench_grouped(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouped_record");
    for &lines in &[100usize, 1_000, 10_000] {
        let input = grouped_record(lines);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &input, |b, input| {
            b.iter(|| black_box(drain(input)));
        });
    }
    group.finish();
}

fn bench_long_quoted(c: &mut Criterion) {
    let mut group = c.benchmark_group("long_quoted_string");
    for &len in &[1_000usize, 100_000, 1_000_000] {
        let input = long_quoted_string(len);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &input, |b, input| {
            b.iter(|| black_box(drain(input)));
        });
    }
    group.finish();
}

fn bench_heavily_escaped(c: &mut Criterion) {
    let mut group = c.benchmark_group("heavily_escaped");
    for &count in &[1_000usize, 10_000] {
        let input = heavily_escaped(count);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| black_box(drain(input)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_dense,
    bench_grouped,
    bench_long_quoted,
    bench_heavily_escaped
);
criterion_main!(benches);
