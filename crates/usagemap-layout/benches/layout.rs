//! Benchmarks for treemap layout.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use usagemap_core::Size;
use usagemap_layout::{RawNode, TreemapLayout, UsageTree, ValueMode};

fn wide_tree(groups: usize, leaves: usize) -> UsageTree {
    let children = (0..groups)
        .map(|g| {
            RawNode::branch(
                &format!("app-{g}"),
                (0..leaves)
                    .map(|l| RawNode::leaf(&format!("window-{l}"), ((g * 31 + l * 17) % 997 + 1) as u64))
                    .collect(),
            )
        })
        .collect();
    UsageTree::from_raw(&RawNode::branch("AppUsage", children)).expect("valid tree")
}

fn bench_first_layout(c: &mut Criterion) {
    let tree = wide_tree(20, 50);
    c.bench_function("layout_1000_leaves", |b| {
        b.iter(|| {
            let mut engine = TreemapLayout::new();
            let map = engine
                .layout(black_box(&tree), &ValueMode::Size, Size::new(1280.0, 720.0))
                .expect("layout");
            black_box(map.len());
        });
    });
}

fn bench_sticky_relayout(c: &mut Criterion) {
    let tree = wide_tree(20, 50);
    let mut engine = TreemapLayout::new();
    engine
        .layout(&tree, &ValueMode::Size, Size::new(1280.0, 720.0))
        .expect("layout");
    c.bench_function("sticky_relayout_1000_leaves", |b| {
        b.iter(|| {
            let map = engine
                .layout(black_box(&tree), &ValueMode::Count, Size::new(1280.0, 720.0))
                .expect("layout");
            black_box(map.len());
        });
    });
}

criterion_group!(benches, bench_first_layout, bench_sticky_relayout);
criterion_main!(benches);
