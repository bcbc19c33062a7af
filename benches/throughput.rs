//! Throughput benchmarks for the streaming adapters.
//!
//! Each group pushes a 1 MiB input through a reader or writer adapter over
//! the bundled data, for the single-byte, Big5 and UTF-8 codecs.

use std::io::{self, Read, Write};

use charset_stream::{Charsets, resource};
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

const INPUT_SIZE: usize = 1 << 20;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn charsets() -> Charsets {
    Charsets::builder().loader(resource::builtin()).build()
}

/// Every byte value, repeated.
fn latin1_bytes() -> Vec<u8> {
    (0..=255u8).cycle().take(INPUT_SIZE).collect()
}

/// Valid Big5 pairs with some ASCII in between.
fn big5_bytes() -> Vec<u8> {
    let mut out = Vec::with_capacity(INPUT_SIZE);
    let mut lead = 0xA4u8;
    while out.len() < INPUT_SIZE {
        out.extend_from_slice(&[lead, 0xA1, lead, 0x40, b' ', b'x']);
        lead = if lead == 0xC5 { 0xA4 } else { lead + 1 };
    }
    out.truncate(INPUT_SIZE);
    out
}

fn utf8_text() -> Vec<u8> {
    "Mixed text: ascii, Ünïcödé, 中文字符, emoji 🦀. "
        .repeat(INPUT_SIZE / 48)
        .into_bytes()
}

fn decode(charsets: &Charsets, name: &str, data: &[u8]) -> usize {
    let mut reader = charsets.new_reader(name, data).unwrap();
    io::copy(&mut reader, &mut io::sink()).unwrap() as usize
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_decode(c: &mut Criterion) {
    let charsets = charsets();
    let latin1 = latin1_bytes();
    let big5 = big5_bytes();
    let utf8 = utf8_text();

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(INPUT_SIZE as u64));

    group.bench_function("latin1", |b| {
        b.iter(|| black_box(decode(&charsets, "latin1", black_box(&latin1))));
    });

    group.bench_function("big5", |b| {
        b.iter(|| black_box(decode(&charsets, "big5", black_box(&big5))));
    });

    group.bench_function("utf8", |b| {
        b.iter(|| black_box(decode(&charsets, "utf-8", black_box(&utf8))));
    });

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let charsets = charsets();
    let latin1_text = {
        let mut text = Vec::new();
        decode_into(&charsets, "latin1", &latin1_bytes(), &mut text);
        text
    };
    let utf8 = utf8_text();

    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Bytes(INPUT_SIZE as u64));

    group.bench_function("latin1", |b| {
        b.iter(|| {
            let mut writer = charsets
                .new_writer("latin1", Vec::with_capacity(INPUT_SIZE))
                .unwrap();
            for chunk in latin1_text.chunks(8192) {
                writer.write_all(chunk).unwrap();
            }
            black_box(writer.into_inner().unwrap())
        });
    });

    group.bench_function("utf8", |b| {
        b.iter(|| {
            let mut writer = charsets
                .new_writer("utf-8", Vec::with_capacity(utf8.len()))
                .unwrap();
            for chunk in utf8.chunks(8192) {
                writer.write_all(chunk).unwrap();
            }
            black_box(writer.into_inner().unwrap())
        });
    });

    group.finish();
}

fn decode_into(charsets: &Charsets, name: &str, data: &[u8], out: &mut Vec<u8>) {
    let mut reader = charsets.new_reader(name, data).unwrap();
    reader.read_to_end(out).unwrap();
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
