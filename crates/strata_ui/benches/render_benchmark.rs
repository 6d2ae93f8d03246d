//! # UI Rebuild Benchmark
//!
//! Measures the cost of a full draw-list rebuild and of an input update
//! over a populated tree.
//!
//! Run with: `cargo bench --package strata_ui`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use strata_core::{Color, Dim2};
use strata_ui::{Button, Context, ElementDesc, Label, MouseButton, UiConfig};

/// Builds a grid of `count` buttons, each holding a label.
#[allow(clippy::cast_precision_loss)]
fn populated_context(count: usize) -> Context {
    let mut ctx = Context::new(UiConfig { display_width: 1920, display_height: 1080, ..UiConfig::default() });
    for i in 0..count {
        let (col, row) = ((i % 64) as f32, (i / 64) as f32);
        let button = ctx.create(
            ElementDesc::default()
                .with_position(Dim2::px(col * 30.0, row * 20.0))
                .with_size(Dim2::px(28.0, 18.0))
                .with_hovered_color(Color::rgb(0.2, 0.8, 0.4)),
            Button::new(),
        );
        let label_desc = ElementDesc::default().with_size(Dim2::FILL).with_color(Color::TRANSPARENT);
        let label = ctx.create(label_desc, Label::new("x"));
        ctx.add_to_root(button).expect("attach button");
        ctx.tree_mut().add_child(button, label).expect("attach label");
    }
    ctx
}

fn bench_full_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_rebuild");

    for count in [100, 1_000, 4_000] {
        let mut ctx = populated_context(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                ctx.set_dirty();
                black_box(ctx.render())
            });
        });
    }

    group.finish();
}

fn bench_clean_render(c: &mut Criterion) {
    let mut ctx = populated_context(1_000);
    ctx.render();
    c.bench_function("clean_render_1000", |b| b.iter(|| black_box(ctx.render())));
}

fn bench_input_update(c: &mut Criterion) {
    let mut ctx = populated_context(1_000);
    let mut x = 0.0_f32;
    c.bench_function("input_update_1000", |b| {
        b.iter(|| {
            x = (x + 7.0) % 1920.0;
            ctx.input_mut().set_mouse_pos(x, 100.0);
            ctx.input_mut().set_mouse_button(MouseButton::Left, x < 960.0);
            black_box(ctx.update())
        });
    });
}

criterion_group!(benches, bench_full_rebuild, bench_clean_render, bench_input_update);
criterion_main!(benches);
