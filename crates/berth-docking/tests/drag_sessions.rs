//! Press, drag and release sequences driven the way a host toolkit would.

use berth_core::geometry::Rect;
use berth_core::math::Vec2;
use berth_docking::{
    ConfigOverrides, Direction, DockingTree, DragCursor, DragOutcome, DropAction, KeyCode,
    MoverState, WindowId,
};
use berth_test_utils::{LayoutShape, TreeShape, assert_invariants};

/// A on the left, tab window [B, C] on the right, laid out in 400x300.
fn split_with_tabs() -> (DockingTree<()>, WindowId, WindowId, WindowId) {
    let mut tree = DockingTree::new();
    let a = tree.create_view("A", ());
    let b = tree.create_view("B", ());
    let c = tree.create_view("C", ());
    tree.set_root_window(Some(a)).unwrap();
    let tab = tree.create_tab_window(&[b, c]).unwrap();
    tree.split(a, tab, Direction::Right, 0.5).unwrap();
    tree.select_window(c).unwrap();
    tree.set_bounds(Rect::new(0.0, 0.0, 400.0, 300.0));
    tree.layout();
    (tree, a, b, c)
}

#[test]
fn test_drag_tab_out_onto_view_edge() {
    let (mut tree, a, _, c) = split_with_tabs();
    assert!(tree.on_mouse_pressed(c, Vec2::new(300.0, 150.0)));
    assert_eq!(
        tree.on_mouse_dragged(c, Vec2::new(5.0, 150.0)),
        Some(DragCursor::Accept)
    );
    assert_eq!(tree.node(c).unwrap().mover().state(), MoverState::Dragging);
    assert_eq!(tree.drag_delta(), Some(Vec2::new(-295.0, 0.0)));
    assert_eq!(
        tree.drag_target().map(|target| target.action),
        Some(DropAction::Split {
            target: a,
            direction: Direction::Left
        })
    );

    tree.on_mouse_released(c, Vec2::new(5.0, 150.0)).unwrap();
    assert_invariants(&tree);
    assert!(tree.node(c).unwrap().mover().is_idle());
    assert_eq!(
        LayoutShape::capture(&tree).window,
        Some(TreeShape::split(
            true,
            0.5,
            TreeShape::split(true, 0.5, TreeShape::view("C"), TreeShape::view("A")),
            TreeShape::tab(0, vec![TreeShape::view("B")]),
        ))
    );
}

#[test]
fn test_drag_from_bar_onto_empty_root() {
    let mut tree: DockingTree<()> = DockingTree::new();
    let a = tree.create_view("A", ());
    tree.set_root_window(Some(a)).unwrap();
    tree.minimize(a, Some(Direction::Left)).unwrap();
    let bar = tree.window_bar(Direction::Left);
    tree.set_selected_tab(bar, Some(0)).unwrap();
    tree.set_bounds(Rect::new(0.0, 0.0, 800.0, 600.0));
    tree.layout();
    assert_eq!(tree.root_window(), None);

    // The slide-out content covers x in 22..222.
    assert!(tree.on_mouse_pressed(a, Vec2::new(100.0, 300.0)));
    tree.on_mouse_dragged(a, Vec2::new(600.0, 300.0));
    let target = *tree.drag_target().unwrap();
    assert_eq!(target.action, DropAction::SetRoot);
    assert_eq!(target.window, tree.root());
    assert_eq!(target.preview, tree.main_area());

    let outcome = tree.on_mouse_released(a, Vec2::new(600.0, 300.0)).unwrap();
    assert_eq!(outcome, DragOutcome::Dropped(target));
    assert_invariants(&tree);
    assert_eq!(tree.root_window(), Some(a));
    assert!(!tree.is_minimized(a));
}

#[test]
fn test_rejected_drag_shows_label_and_abandons() {
    let mut tree: DockingTree<()> = DockingTree::new();
    let a = tree.create_view("A", ());
    tree.set_root_window(Some(a)).unwrap();
    tree.set_bounds(Rect::new(0.0, 0.0, 400.0, 300.0));
    tree.layout();
    let before = LayoutShape::capture(&tree);

    assert!(tree.on_mouse_pressed(a, Vec2::new(100.0, 100.0)));
    assert_eq!(
        tree.on_mouse_dragged(a, Vec2::new(200.0, 150.0)),
        Some(DragCursor::Reject)
    );
    let overlay = tree.overlay().unwrap();
    assert!(overlay.highlight.is_none());
    let label = overlay.label.as_ref().unwrap();
    assert_eq!(label.title, "A");
    assert_eq!(label.position, Vec2::new(200.0, 150.0));

    assert_eq!(
        tree.on_mouse_released(a, Vec2::new(200.0, 150.0)).unwrap(),
        DragOutcome::Abandoned
    );
    assert!(tree.overlay().unwrap().is_empty());
    assert_eq!(LayoutShape::capture(&tree), before);
}

#[test]
fn test_second_press_refused_during_drag() {
    let (mut tree, a, b, c) = split_with_tabs();
    assert!(tree.on_mouse_pressed(c, Vec2::new(300.0, 150.0)));
    assert!(!tree.on_mouse_pressed(a, Vec2::new(100.0, 150.0)));
    tree.on_mouse_dragged(c, Vec2::new(100.0, 150.0));
    assert_eq!(tree.active_mover(), Some(c));

    // Motion reported for another window does not move the drag.
    assert_eq!(tree.on_mouse_dragged(b, Vec2::new(5.0, 5.0)), None);
    assert_eq!(tree.drag_delta(), Some(Vec2::new(-200.0, 0.0)));
}

#[test]
fn test_abort_key_from_window_overrides() {
    let (mut tree, _, _, c) = split_with_tabs();
    let overrides = ConfigOverrides {
        abort_drag_key: Some(KeyCode(81)),
        ..ConfigOverrides::default()
    };
    tree.set_overrides(c, overrides).unwrap();
    let before = LayoutShape::capture(&tree);

    assert!(tree.on_mouse_pressed(c, Vec2::new(300.0, 150.0)));
    tree.on_mouse_dragged(c, Vec2::new(5.0, 150.0));
    assert_eq!(tree.on_key_pressed(KeyCode::ESCAPE), DragOutcome::Ignored);
    assert!(tree.is_dragging());
    assert_eq!(tree.on_key_pressed(KeyCode(81)), DragOutcome::Aborted);

    assert!(!tree.is_dragging());
    assert!(tree.overlay().unwrap().is_empty());
    assert_eq!(
        tree.on_mouse_released(c, Vec2::new(5.0, 150.0)).unwrap(),
        DragOutcome::Ignored
    );
    assert_eq!(LayoutShape::capture(&tree), before);
}

#[test]
fn test_leaving_strip_clears_placeholder() {
    let (mut tree, a, _, c) = split_with_tabs();
    let tab = tree.parent(c).unwrap();

    assert!(tree.on_mouse_pressed(a, Vec2::new(100.0, 150.0)));
    // Over the tab strip of the right-hand tab window.
    tree.on_mouse_dragged(a, Vec2::new(205.0, 10.0));
    assert!(tree.tab_strip(tab).unwrap().drag_tab().is_some());

    // Over the same tab window's content: still accepted, without a placeholder.
    tree.on_mouse_dragged(a, Vec2::new(300.0, 150.0));
    assert_eq!(
        tree.drag_target().map(|target| target.action),
        Some(DropAction::InsertTab {
            tab_window: tab,
            index: 2
        })
    );
    assert!(tree.tab_strip(tab).unwrap().drag_tab().is_none());
}

#[test]
fn test_double_click_restores_minimized() {
    let (mut tree, a, _, _) = split_with_tabs();
    assert!(!tree.on_double_click(a).unwrap());

    tree.minimize(a, Some(Direction::Up)).unwrap();
    assert!(tree.on_double_click(a).unwrap());
    assert_invariants(&tree);
    assert!(!tree.is_minimized(a));

    tree.config_mut().double_click_restores_window = false;
    tree.minimize(a, None).unwrap();
    assert!(tree.is_minimized(a));
    assert!(!tree.on_double_click(a).unwrap());
}
