//! Measures header parsing and record decoding speed.

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use plyfile::{Point, Property, Reader, RecordSink};


/// A sink that just puts all decoded values into the `black_box`.
struct NullSink;

impl RecordSink for NullSink {
    fn set_property(&mut self, name: &str, value: Property) {
        black_box((name, value));
    }
}

/// Generates an in-memory point cloud with `n` points (three `float`
/// coordinates and an RGB `uchar` color each).
fn gen_cloud(n: u32) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"ply\n");
    data.extend_from_slice(b"format binary_little_endian 1.0\n");
    data.extend_from_slice(b"comment generated benchmark input\n");
    data.extend_from_slice(format!("element vertex {}\n", n).as_bytes());
    for name in &["x", "y", "z"] {
        data.extend_from_slice(format!("property float {}\n", name).as_bytes());
    }
    for name in &["red", "green", "blue"] {
        data.extend_from_slice(format!("property uchar {}\n", name).as_bytes());
    }
    data.extend_from_slice(b"end_header\n");

    for i in 0..n {
        data.extend_from_slice(&(i as f32 * 0.25).to_le_bytes());
        data.extend_from_slice(&(i as f32 * -0.5).to_le_bytes());
        data.extend_from_slice(&(i as f32).to_le_bytes());
        data.extend_from_slice(&[(i % 256) as u8; 3]);
    }

    data
}

fn parse_header(c: &mut Criterion) {
    let data = gen_cloud(1_000);

    c.bench_function("parse_header", |b| {
        b.iter(|| Reader::new(Cursor::new(black_box(&data[..]))).unwrap())
    });
}

fn read_cloud(c: &mut Criterion) {
    let data = gen_cloud(10_000);

    c.bench_function("read_10k_null_sink", |b| {
        b.iter(|| {
            let mut reader = Reader::new(Cursor::new(&data[..])).unwrap();
            let mut elem = reader.element_reader("vertex").unwrap();
            let mut sink = NullSink;
            while elem.read_next(&mut sink).is_ok() {}
        })
    });

    c.bench_function("read_10k_points", |b| {
        b.iter(|| {
            let mut reader = Reader::new(Cursor::new(&data[..])).unwrap();
            let mut elem = reader.element_reader("vertex").unwrap();
            let mut points = Vec::with_capacity(elem.total_count() as usize);
            let mut point = Point::default();
            while elem.read_next(&mut point).is_ok() {
                points.push(point);
            }
            black_box(points)
        })
    });
}


criterion_group!(benches, parse_header, read_cloud);
criterion_main!(benches);
