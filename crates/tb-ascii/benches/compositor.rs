use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tb_ascii::compositor::AsciiConverter;
use tb_core::config::{AsciiConfig, CellLayout};
use tb_core::frame::PixelBuffer;

fn gradient(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_rows(width, height, |y, row| {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            px.copy_from_slice(&[(x % 256) as u8, (y % 256) as u8, 128, 255]);
        }
    })
}

fn bench_convert(c: &mut Criterion) {
    let frame = gradient(1280, 720);
    let mut group = c.benchmark_group("ascii_convert");
    for px in [8u32, 12, 24] {
        let converter = AsciiConverter::new(&AsciiConfig {
            layout: CellLayout::FontSize(px),
            ..AsciiConfig::default()
        });
        group.bench_function(format!("font_{px}px_1280x720"), |b| {
            b.iter(|| converter.convert(black_box(&frame)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
