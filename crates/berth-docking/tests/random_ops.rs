//! Random operation sequences must never leave the tree in an invalid state.

use berth_core::geometry::Rect;
use berth_core::math::Vec2;
use berth_docking::{Direction, DockingTree, DropAction, DropTarget, WindowId, WindowType};
use berth_test_utils::{LayoutShape, NameSerializer, assert_invariants};
use proptest::prelude::*;

const VIEWS: usize = 6;

#[derive(Debug, Clone)]
enum Op {
    Split {
        target: usize,
        with: usize,
        direction: Direction,
    },
    Tabify {
        target: usize,
        with: usize,
    },
    InsertTab {
        target: usize,
        with: usize,
        index: usize,
    },
    Close(usize),
    Minimize(usize, Option<Direction>),
    Restore(usize),
    Select(usize),
    Drag {
        view: usize,
        x: f32,
        y: f32,
    },
    Reload,
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    let view = 0..VIEWS;
    prop_oneof![
        (view.clone(), view.clone(), direction()).prop_map(|(target, with, direction)| {
            Op::Split {
                target,
                with,
                direction,
            }
        }),
        (view.clone(), view.clone()).prop_map(|(target, with)| Op::Tabify { target, with }),
        (view.clone(), view.clone(), 0..4usize)
            .prop_map(|(target, with, index)| Op::InsertTab { target, with, index }),
        view.clone().prop_map(Op::Close),
        (view.clone(), prop::option::of(direction()))
            .prop_map(|(view, direction)| Op::Minimize(view, direction)),
        view.clone().prop_map(Op::Restore),
        view.clone().prop_map(Op::Select),
        (view, 0.0f32..800.0, 0.0f32..600.0).prop_map(|(view, x, y)| Op::Drag { view, x, y }),
        Just(Op::Reload),
    ]
}

struct Harness {
    tree: DockingTree<()>,
    views: Vec<WindowId>,
}

impl Harness {
    fn new() -> Self {
        let mut tree = DockingTree::new();
        let views: Vec<WindowId> = (0..VIEWS)
            .map(|i| tree.create_view(format!("V{}", i), ()))
            .collect();
        tree.set_root_window(Some(views[0])).unwrap();
        tree.set_bounds(Rect::new(0.0, 0.0, 800.0, 600.0));
        Self { tree, views }
    }

    fn apply(&mut self, op: &Op) {
        let tree = &mut self.tree;
        let views = &self.views;
        match *op {
            Op::Split {
                target,
                with,
                direction,
            } => {
                let _ = tree.split(views[target], views[with], direction, 0.5);
            }
            Op::Tabify { target, with } => {
                let drop = DropTarget {
                    window: views[target],
                    action: DropAction::Tabify {
                        target: views[target],
                    },
                    preview: Rect::ZERO,
                };
                let _ = tree.do_drop(&drop, views[with]);
            }
            Op::InsertTab {
                target,
                with,
                index,
            } => {
                if let Some(parent) = tree.parent(views[target])
                    && matches!(
                        tree.window_type(parent),
                        Some(WindowType::Tab | WindowType::Bar)
                    )
                {
                    let _ = tree.insert_tab(parent, views[with], index);
                }
            }
            Op::Close(view) => {
                let _ = tree.close(views[view]);
            }
            Op::Minimize(view, direction) => {
                let _ = tree.minimize(views[view], direction);
            }
            Op::Restore(view) => {
                let _ = tree.restore(views[view]);
            }
            Op::Select(view) => {
                let _ = tree.select_window(views[view]);
            }
            Op::Drag { view, x, y } => {
                let window = views[view];
                tree.layout();
                let start = tree
                    .bounds(window)
                    .map_or(Vec2::ZERO, |bounds| bounds.center());
                if tree.on_mouse_pressed(window, start) {
                    let point = Vec2::new(x, y);
                    tree.on_mouse_dragged(window, point);
                    let _ = tree.on_mouse_released(window, point);
                }
                assert!(!tree.is_dragging());
                assert_eq!(tree.active_mover(), None);
            }
            Op::Reload => {
                let before = LayoutShape::capture(tree);
                let bytes = tree.write(&NameSerializer::new(), true).unwrap();
                let mut serializer = views
                    .iter()
                    .enumerate()
                    .fold(NameSerializer::new(), |serializer, (i, &view)| {
                        serializer.register(format!("V{}", i), view)
                    });
                tree.read(bytes, &mut serializer, true).unwrap();
                assert_eq!(LayoutShape::capture(tree), before);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    #[test]
    fn random_ops_keep_tree_valid(ops in prop::collection::vec(op(), 1..80)) {
        let mut harness = Harness::new();

        for op in &ops {
            harness.apply(op);
            assert_invariants(&harness.tree);
            for &view in &harness.views {
                prop_assert!(harness.tree.contains(view));
            }
        }
    }
}

#[test]
fn test_replay_tab_emptied_by_split() {
    let ops = [
        Op::Tabify { target: 3, with: 4 },
        Op::Restore(3),
        Op::Close(3),
        Op::Split {
            target: 1,
            with: 4,
            direction: Direction::Up,
        },
    ];
    let mut harness = Harness::new();
    for op in &ops {
        harness.apply(op);
        assert_invariants(&harness.tree);
    }
    assert_eq!(harness.tree.root_window(), Some(harness.views[0]));
}
