//! Docking Demo - Scripted drag session on a headless docking tree
//!
//! This example drives a docking tree the way a host toolkit would:
//! - Builds an editor-style layout of splits and tab windows
//! - Feeds pointer events frame by frame and prints the drop preview
//! - Minimizes a panel, then restores it with a double click
//! - Saves the layout and loads it into a fresh tree
//!
//! Run with `RUST_LOG=trace` to see every tree edit.

use berth_core::geometry::Rect;
use berth_core::logging;
use berth_core::math::Vec2;
use berth_core::profiling::{ProfilingBackend, init_profiling, new_frame};
use berth_docking::{
    Direction, DockingEvent, DockingTree, DragOutcome, PopupMenuItem, StandardPopupMenuFactory,
    WindowId, WindowKind,
};
use berth_test_utils::NameSerializer;

/// Panel content the host would render.
#[derive(Debug, Default)]
struct Panel {
    lines: usize,
}

fn dump(tree: &DockingTree<Panel>, window: WindowId, depth: usize) {
    let Some(node) = tree.get(window) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let bounds = node
        .bounds()
        .map(|b| format!(" @ {:.0},{:.0} {:.0}x{:.0}", b.x, b.y, b.width, b.height))
        .unwrap_or_default();

    match node.kind() {
        WindowKind::View(view) => {
            println!("{}{} ({} lines){}", indent, view.title, view.content.lines, bounds)
        }
        WindowKind::Split(split) => println!(
            "{}Split {} {:.2}{}",
            indent,
            if split.horizontal { "|" } else { "-" },
            split.divider_location,
            bounds
        ),
        WindowKind::Tab(strip) => {
            println!("{}Tabs [{}] selected {:?}{}", indent, node.title(), strip.selected(), bounds)
        }
        WindowKind::Bar(bar) if tree.child_count(window) > 0 => {
            println!("{}{:?} bar{}", indent, bar.direction, bounds)
        }
        WindowKind::Bar(_) => return,
        WindowKind::Root(_) => println!("{}Root{}", indent, bounds),
    }
    for child in tree.child_windows(window) {
        dump(tree, child, depth + 1);
    }
}

fn print_events(tree: &mut DockingTree<Panel>) {
    for event in tree.drain_events() {
        match event {
            DockingEvent::TitleChanged { .. } => {}
            event => println!("  event: {:?}", event),
        }
    }
}

fn main() {
    logging::init();
    init_profiling(ProfilingBackend::InProcess);

    let mut tree: DockingTree<Panel> = DockingTree::new();
    tree.set_popup_menu_factory(Some(Box::new(StandardPopupMenuFactory)));

    let editor = tree.create_view("Editor", Panel { lines: 120 });
    let outline = tree.create_view("Outline", Panel { lines: 14 });
    let files = tree.create_view("Files", Panel { lines: 32 });
    let console = tree.create_view("Console", Panel { lines: 8 });
    let problems = tree.create_view("Problems", Panel { lines: 3 });

    tree.set_root_window(Some(editor)).unwrap();
    let sidebar = tree.create_tab_window(&[files, outline]).unwrap();
    tree.split(editor, sidebar, Direction::Left, 0.25).unwrap();
    let bottom = tree.create_tab_window(&[console, problems]).unwrap();
    tree.split(editor, bottom, Direction::Down, 0.7).unwrap();
    tree.select_window(problems).unwrap();
    tree.set_bounds(Rect::new(0.0, 0.0, 1280.0, 800.0));
    tree.layout();

    println!("Initial layout:");
    dump(&tree, tree.root(), 1);
    print_events(&mut tree);

    // Drag "Problems" out of the bottom tabs onto the right edge of the editor.
    let editor_bounds = tree.bounds(editor).unwrap_or_default();
    let target = Vec2::new(editor_bounds.right() - 4.0, editor_bounds.center().y);
    let start = tree.bounds(problems).unwrap_or_default().center();
    tree.on_mouse_pressed(problems, start);
    for step in 1..=4 {
        new_frame();
        let point = start.lerp(target, step as f32 / 4.0);
        let cursor = tree.on_mouse_dragged(problems, point);
        let preview = tree.drag_target().map(|target| (target.action, target.preview));
        println!("Frame {}: {:?} {:?}", step, cursor, preview);
    }
    match tree.on_mouse_released(problems, target).unwrap() {
        DragOutcome::Dropped(drop) => println!("Dropped: {:?}", drop.action),
        outcome => println!("Drag ended: {:?}", outcome),
    }
    tree.run_idle();
    tree.run_idle();
    tree.layout();

    println!("\nAfter drag:");
    dump(&tree, tree.root(), 1);
    print_events(&mut tree);

    // Minimize Outline from its popup menu, then double click it back.
    if let Some(menu) = tree.popup_menu(outline) {
        println!("\nPopup for Outline: {:?}", menu.items);
    }
    tree.activate_menu_item(outline, &PopupMenuItem::Minimize)
        .unwrap();
    tree.layout();
    println!("\nAfter minimize:");
    dump(&tree, tree.root(), 1);
    print_events(&mut tree);

    tree.on_double_click(outline).unwrap();
    tree.layout();
    println!("\nAfter restore:");
    dump(&tree, tree.root(), 1);
    print_events(&mut tree);

    // Save and load into a fresh tree; panels are recreated from their titles.
    let bytes = tree.write(&NameSerializer::new(), true).unwrap();
    let mut loaded: DockingTree<Panel> = DockingTree::new();
    loaded.read(bytes.clone(), &mut NameSerializer::new(), true)
        .unwrap();
    loaded.set_bounds(Rect::new(0.0, 0.0, 1280.0, 800.0));
    loaded.layout();
    println!("\nLoaded from {} bytes:", bytes.len());
    dump(&loaded, loaded.root(), 1);
}
