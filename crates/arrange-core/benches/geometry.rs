//! Benchmarks for rectangle and matrix helpers used on every pointer move.

use arrange_core::geometry::{Matrix2D, Rect};
use arrange_core::math::Vec2;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_rect_transformed(c: &mut Criterion) {
    let rect = Rect::new(12.0, 40.0, 200.0, 48.0);
    let matrix = Matrix2D::translation(4.0, -3.0).then(&Matrix2D::scale(1.5, 1.5));

    c.bench_function("rect_transformed", |b| {
        b.iter(|| black_box(rect).transformed(black_box(&matrix), rect.center()))
    });
}

fn bench_matrix_chain(c: &mut Criterion) {
    let chain: Vec<Matrix2D> = (0..8)
        .map(|i| Matrix2D::translation(i as f32, 1.0).then(&Matrix2D::scale(1.01, 0.99)))
        .collect();

    c.bench_function("matrix_chain_8", |b| {
        b.iter(|| {
            chain
                .iter()
                .fold(Matrix2D::IDENTITY, |acc, m| acc.then(black_box(m)))
                .transform_point(Vec2::new(3.0, 4.0))
        })
    });
}

criterion_group!(benches, bench_rect_transformed, bench_matrix_chain);
criterion_main!(benches);
