//! Test utilities for Berth docking trees.
//!
//! # Overview
//!
//! - [`NameSerializer`] - View serializer keyed by title that records its calls
//! - [`TreeShape`] / [`LayoutShape`] - Structural snapshots that compare trees
//!   independently of window handles
//! - [`assert_invariants`] - Structural checks to run after every operation
//!
//! # Example
//!
//! ```rust
//! use berth_docking::{Direction, DockingTree};
//! use berth_test_utils::{LayoutShape, NameSerializer, TreeShape, assert_invariants};
//!
//! let mut tree: DockingTree<()> = DockingTree::new();
//! let a = tree.create_view("A", ());
//! let b = tree.create_view("B", ());
//! tree.set_root_window(Some(a)).unwrap();
//! tree.split(a, b, Direction::Right, 0.5).unwrap();
//! assert_invariants(&tree);
//!
//! let serializer = NameSerializer::new();
//! let bytes = tree.write(&serializer, false).unwrap();
//! assert_eq!(serializer.count_writes(), 2);
//!
//! let mut copy: DockingTree<()> = DockingTree::new();
//! copy.read(bytes, &mut NameSerializer::new(), false).unwrap();
//! assert_eq!(LayoutShape::capture(&copy), LayoutShape::capture(&tree));
//! assert_eq!(
//!     TreeShape::capture(&copy, copy.root_window().unwrap()),
//!     TreeShape::split(true, 0.5, TreeShape::view("A"), TreeShape::view("B")),
//! );
//! ```

mod serializer;
mod shape;

pub use serializer::{NameSerializer, SerializerCall};
pub use shape::{BarShape, LayoutShape, TreeShape};

use berth_core::alloc::HashSet;
use berth_docking::{DockingTree, WindowId, WindowType};

/// Panic unless the tree is structurally valid.
///
/// Beyond [`DockingTree::validate`], checks that every window is reachable from
/// at most one container and that no attached split or tab window is empty.
pub fn assert_invariants<C>(tree: &DockingTree<C>) {
    if let Err(err) = tree.validate() {
        panic!("invalid docking tree: {}", err);
    }

    let mut seen = HashSet::new();
    for (id, node) in tree.windows() {
        for child in tree.child_windows(id) {
            assert!(seen.insert(child), "{} listed by more than one container", child);
            assert_eq!(
                tree.parent(child),
                Some(id),
                "{} does not point back at {}",
                child,
                id
            );
        }

        if tree.is_attached(id) {
            match node.window_type() {
                WindowType::Split => {
                    assert_eq!(tree.child_count(id), 2, "attached split {} is not full", id)
                }
                WindowType::Tab => {
                    assert!(tree.child_count(id) > 0, "attached tab window {} is empty", id);
                    assert!(
                        tree.tab_strip(id).and_then(|strip| strip.selected()).is_some(),
                        "tab window {} has no selection",
                        id
                    );
                }
                _ => {}
            }
        }
    }
}

/// The view titled `title`.
///
/// # Panics
///
/// If no view has that title.
pub fn view_named<C>(tree: &DockingTree<C>, title: &str) -> WindowId {
    tree.windows()
        .find(|(_, node)| node.window_type() == WindowType::View && node.title() == title)
        .map(|(id, _)| id)
        .unwrap_or_else(|| panic!("no view titled {:?}", title))
}
