//! Benchmark for the YUV to RGBA conversion hot path.

use camera_preview::{FrameConverter, Orientation, PixelFormat, PreviewSize, RawFrame};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_frame(format: PixelFormat, width: u32, height: u32) -> RawFrame {
    let len = format.frame_len(width, height);
    let bytes: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
    RawFrame::new(bytes, 1)
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    for format in [PixelFormat::Nv21, PixelFormat::Yv12] {
        let converter = FrameConverter::new(
            PreviewSize::new(640, 480),
            format,
            Orientation::Deg90,
        )
        .unwrap();
        let frame = synthetic_frame(format, 640, 480);

        group.bench_function(format!("{format:?}_640x480"), |b| {
            b.iter(|| converter.convert(black_box(&frame)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
