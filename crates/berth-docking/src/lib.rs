//! Berth Docking - window tree and drag/drop re-layout engine
//!
//! This crate arranges application views inside a docking area:
//! - **Split** windows placing two children side by side or stacked
//! - **Tab** windows showing one of several children
//! - **Window bars** on the four edges holding minimized windows
//! - **Drag and drop** re-layout with live previews
//! - **Locations** remembering where a window was, so it can be restored
//! - **Layout streams** saving and loading the arrangement
//!
//! Every mutation runs in a transaction that prunes empty and redundant
//! containers when it ends, so the tree is always a valid arrangement.
//!
//! ## Quick Start
//!
//! ```rust
//! use berth_docking::{Direction, DockingTree};
//! use berth_core::geometry::Rect;
//!
//! let mut tree: DockingTree<&str> = DockingTree::new();
//! let editor = tree.create_view("Editor", "editor");
//! let console = tree.create_view("Console", "console");
//!
//! tree.set_root_window(Some(editor)).unwrap();
//! tree.split(editor, console, Direction::Down, 0.7).unwrap();
//! tree.minimize(console, None).unwrap();
//!
//! tree.set_bounds(Rect::new(0.0, 0.0, 1280.0, 720.0));
//! tree.layout();
//! assert!(tree.is_minimized(console));
//! tree.restore(console).unwrap();
//! assert!(!tree.is_minimized(console));
//! ```

pub mod config;
pub mod drag;
pub mod drop;
pub mod error;
pub mod events;
pub mod focus;
pub mod layout;
pub mod location;
pub mod node;
pub mod optimize;
mod ops;
pub mod popup;
pub mod serialize;
pub mod tab_strip;
pub mod tree;
pub mod types;

pub use config::{ConfigOverrides, DockingConfig};
pub use drag::{DragCursor, DragLabel, DragOutcome, DragOverlay, MoverState, WindowMover};
pub use drop::{DropAction, DropTarget, split_direction};
pub use error::{DockError, DockResult};
pub use events::DockingEvent;
pub use focus::FOCUS_RESTORE_HOPS;
pub use location::WindowLocation;
pub use node::{BarData, RootData, SplitData, View, WindowKind, WindowNode, WindowType};
pub use optimize::OptimizeGuard;
pub use popup::{PopupMenu, PopupMenuFactory, PopupMenuItem, StandardPopupMenuFactory};
pub use serialize::{LAYOUT_VERSION, MAX_NESTING_DEPTH, ViewSerializer, ViewSource};
pub use tab_strip::{DragTab, TabStrip};
pub use tree::DockingTree;
pub use types::{Direction, KeyCode, WindowFlags, WindowId};
