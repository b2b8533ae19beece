//! Benchmarks for swap decisions and whole fallback drags

use arrange::swap::{SwapInput, swap_direction};
use arrange::{Platform, SortableOptions, SortableSystem};
use arrange_core::geometry::Rect;
use arrange_test_utils::{ListFixture, Pointer};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn bench_swap_direction(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap_direction");
    let target = Rect::new(0.0, 40.0, 100.0, 40.0);
    let base = SwapInput {
        pointer: 0.0,
        target_rect: target,
        vertical: true,
        swap_threshold: 1.0,
        inverted_swap_threshold: 1.0,
        invert_swap: false,
        is_last_target: false,
        target_move_distance: 0.0,
        past_first_invert_threshold: false,
        last_direction: 0,
        insert_direction: 1,
    };

    group.bench_function("regular", |b| {
        b.iter(|| {
            let mut swaps = 0;
            for y in 40..80 {
                let input = SwapInput {
                    pointer: black_box(y as f32),
                    ..base
                };
                swaps += swap_direction(&input).direction as i32;
            }
            swaps
        });
    });

    group.bench_function("inverted_after_swap", |b| {
        b.iter(|| {
            let mut swaps = 0;
            for y in 40..80 {
                let input = SwapInput {
                    pointer: black_box(y as f32),
                    swap_threshold: 0.5,
                    is_last_target: true,
                    target_move_distance: 10.0,
                    last_direction: 1,
                    ..base
                };
                swaps += swap_direction(&input).direction as i32;
            }
            swaps
        });
    });

    group.finish();
}

fn bench_fallback_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("fallback_drag");

    for size in [10, 100, 500] {
        group.throughput(Throughput::Elements(size as u64));
        let ids: Vec<String> = (0..size).map(|i| format!("item-{}", i)).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();

        group.bench_with_input(BenchmarkId::new("first_to_last", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let (doc, lists) = ListFixture::new()
                        .viewport(200.0, size as f32 * 40.0 + 100.0)
                        .list("ul", &ids)
                        .build();
                    let mut system = SortableSystem::new(doc, Platform::headless());
                    system
                        .create(lists[0].element, SortableOptions::new())
                        .expect("register list");
                    (system, lists)
                },
                |(mut system, lists)| {
                    let list = &lists[0];
                    Pointer::mouse().fallback_drag(&mut system, list.center(0), list.center(size - 1));
                    system
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_swap_direction, bench_fallback_drag);
criterion_main!(benches);
