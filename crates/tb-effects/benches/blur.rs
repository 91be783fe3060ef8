use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tb_core::frame::PixelBuffer;
use tb_effects::blur::gaussian_blur;

fn bench_blur(c: &mut Criterion) {
    let frame = PixelBuffer::from_rows(640, 480, |y, row| {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            px.copy_from_slice(&[(x % 256) as u8, (y % 256) as u8, 64, 255]);
        }
    });
    let mut group = c.benchmark_group("gaussian_blur");
    for radius in [1.0, 2.0, 5.0] {
        group.bench_function(format!("r{radius}_640x480"), |b| {
            b.iter(|| gaussian_blur(black_box(&frame), radius, 5.0));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_blur);
criterion_main!(benches);
