//! Benchmarks for the hot paths of a drag session.
//!
//! Measures:
//! - Layout of a fresh tree
//! - Drop target resolution while the pointer moves
//! - Writing and reading a layout stream

use berth_core::geometry::Rect;
use berth_core::math::Vec2;
use berth_docking::{Direction, DockingTree, WindowId};
use berth_test_utils::NameSerializer;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Alternating splits with a tab window of three views at every leaf.
fn build_tree(leaves: usize) -> (DockingTree<()>, Vec<WindowId>) {
    let mut tree = DockingTree::new();
    let mut views = Vec::new();
    let mut last = None;

    for i in 0..leaves {
        let tabs: Vec<WindowId> = (0..3)
            .map(|t| tree.create_view(format!("View {}.{}", i, t), ()))
            .collect();
        views.extend(&tabs);
        let tab = tree.create_tab_window(&tabs).unwrap();
        match last {
            None => tree.set_root_window(Some(tab)).unwrap(),
            Some(previous) => {
                let direction = if i % 2 == 0 {
                    Direction::Right
                } else {
                    Direction::Down
                };
                tree.split(previous, tab, direction, 0.5).unwrap();
            }
        }
        last = Some(tab);
    }

    tree.set_bounds(Rect::new(0.0, 0.0, 1920.0, 1080.0));
    (tree, views)
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("docking/layout");

    for leaves in [4, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(leaves), &leaves, |b, &count| {
            let (mut tree, _) = build_tree(count);
            b.iter(|| {
                tree.set_bounds(Rect::new(0.0, 0.0, 1920.0, 1080.0));
                tree.layout();
                black_box(tree.main_area());
            });
        });
    }

    group.finish();
}

fn bench_resolve_drop(c: &mut Criterion) {
    let mut group = c.benchmark_group("docking/resolve_drop");

    for leaves in [4, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(leaves), &leaves, |b, &count| {
            let (mut tree, views) = build_tree(count);
            tree.layout();
            let dragged = views[0];
            let points: Vec<Vec2> = (0..32)
                .map(|i| Vec2::new(60.0 * i as f32, 33.0 * i as f32))
                .collect();

            b.iter(|| {
                for &point in &points {
                    if let Some(target) = tree.resolve_drop(point, dragged) {
                        tree.abort_drop(&target);
                        black_box(target);
                    }
                }
            });
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("docking/serialize");

    for leaves in [4, 16, 64] {
        let (tree, _) = build_tree(leaves);
        let bytes = tree.write(&NameSerializer::new(), true).unwrap();

        group.bench_with_input(BenchmarkId::new("write", leaves), &tree, |b, tree| {
            b.iter(|| black_box(tree.write(&NameSerializer::new(), true).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("read", leaves), &bytes, |b, bytes| {
            b.iter(|| {
                let mut copy: DockingTree<()> = DockingTree::new();
                copy.read(bytes.clone(), &mut NameSerializer::new(), true)
                    .unwrap();
                black_box(copy.window_count());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_layout, bench_resolve_drop, bench_serialize);
criterion_main!(benches);
