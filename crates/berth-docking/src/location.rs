//! Restorable window positions.
//!
//! A [`WindowLocation`] is captured whenever a window leaves its parent and is
//! consumed by [`DockingTree::restore`]. Each level describes the window relative
//! to something that may still exist (a sibling, a tab window), and `parent`
//! describes where the container itself sat, giving a fallback chain when the
//! container has since been pruned.

use crate::error::DockResult;
use crate::node::{WindowKind, WindowType};
use crate::tree::DockingTree;
use crate::types::{Direction, WindowId};

/// Where a window used to be.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WindowLocation {
    /// Nowhere.
    #[default]
    Null,
    /// The root's only slot.
    Root,
    /// On the `direction` side of `sibling` in a split with `divider`.
    Split {
        sibling: WindowId,
        direction: Direction,
        divider: f32,
        parent: Box<WindowLocation>,
    },
    /// Tab `index` of a tab window or window bar.
    Tab {
        tab_window: WindowId,
        index: usize,
        parent: Box<WindowLocation>,
    },
}

impl WindowLocation {
    pub fn is_null(&self) -> bool {
        matches!(self, WindowLocation::Null)
    }

    /// Location of the container at this level, if any.
    pub fn parent(&self) -> Option<&WindowLocation> {
        match self {
            WindowLocation::Split { parent, .. } | WindowLocation::Tab { parent, .. } => {
                Some(parent)
            }
            _ => None,
        }
    }

    /// Window this level refers to.
    pub fn reference(&self) -> Option<WindowId> {
        match self {
            WindowLocation::Split { sibling, .. } => Some(*sibling),
            WindowLocation::Tab { tab_window, .. } => Some(*tab_window),
            _ => None,
        }
    }

    /// Number of levels in the fallback chain, excluding `Null`.
    pub fn depth(&self) -> usize {
        match self {
            WindowLocation::Null => 0,
            WindowLocation::Root => 1,
            WindowLocation::Split { parent, .. } | WindowLocation::Tab { parent, .. } => {
                1 + parent.depth()
            }
        }
    }
}

impl<C> DockingTree<C> {
    /// Describe where `window` currently sits.
    ///
    /// Each container describes the child relative to its siblings; the result for
    /// the container itself becomes the parent level.
    pub fn window_location(&self, window: WindowId) -> WindowLocation {
        let Some(parent) = self.parent(window) else {
            return WindowLocation::Null;
        };
        let Some(node) = self.get(parent) else {
            return WindowLocation::Null;
        };

        match &node.kind {
            WindowKind::Root(root) if root.window == Some(window) => WindowLocation::Root,
            WindowKind::Root(_) | WindowKind::View(_) => WindowLocation::Null,
            WindowKind::Split(split) => {
                let is_left = split.left == Some(window);
                let sibling = if is_left { split.right } else { split.left };
                match sibling {
                    Some(sibling) => {
                        let direction = match (split.horizontal, is_left) {
                            (true, true) => Direction::Left,
                            (true, false) => Direction::Right,
                            (false, true) => Direction::Up,
                            (false, false) => Direction::Down,
                        };
                        WindowLocation::Split {
                            sibling,
                            direction,
                            divider: split.divider_location,
                            parent: Box::new(self.window_location(parent)),
                        }
                    }
                    None => self.window_location(parent),
                }
            }
            WindowKind::Tab(strip) => match strip.index_of(window) {
                Some(index) => WindowLocation::Tab {
                    tab_window: parent,
                    index,
                    parent: Box::new(self.window_location(parent)),
                },
                None => WindowLocation::Null,
            },
            WindowKind::Bar(bar) => match bar.strip.index_of(window) {
                Some(index) => WindowLocation::Tab {
                    tab_window: parent,
                    index,
                    parent: Box::new(WindowLocation::Null),
                },
                None => WindowLocation::Null,
            },
        }
    }

    /// Try to put `window` at `location`, walking the fallback chain.
    ///
    /// Levels whose reference was disposed or is no longer attached are skipped.
    /// Returns false when no level could take the window.
    pub(crate) fn apply_location(&mut self, location: &WindowLocation, window: WindowId) -> DockResult<bool> {
        let mut level = Some(location);
        while let Some(current) = level {
            if self.apply_location_level(current, window)? {
                return Ok(true);
            }
            level = current.parent();
        }
        Ok(false)
    }

    fn apply_location_level(&mut self, location: &WindowLocation, window: WindowId) -> DockResult<bool> {
        match location {
            WindowLocation::Null => Ok(false),
            WindowLocation::Root => {
                if self.root_window().is_some() {
                    return Ok(false);
                }
                Ok(self.set_root_window(Some(window)).is_ok())
            }
            WindowLocation::Split {
                sibling,
                direction,
                divider,
                ..
            } => {
                if *sibling == window
                    || !self.is_attached(*sibling)
                    || self.is_ancestor(window, *sibling)
                {
                    return Ok(false);
                }
                Ok(self.split(*sibling, window, *direction, *divider).is_ok())
            }
            WindowLocation::Tab {
                tab_window, index, ..
            } => {
                let is_tab_window = matches!(
                    self.get(*tab_window).map(|node| &node.kind),
                    Some(WindowKind::Tab(_) | WindowKind::Bar(_))
                );
                if !is_tab_window
                    || !self.is_attached(*tab_window)
                    || self.is_ancestor(window, *tab_window)
                {
                    return Ok(false);
                }
                let index = (*index).min(self.child_count(*tab_window));
                if self.insert_tab(*tab_window, window, index).is_err() {
                    return Ok(false);
                }
                // A window put back into a tab window comes back selected.
                if self.window_type(*tab_window) == Some(WindowType::Tab) {
                    self.select_window(window)?;
                }
                Ok(true)
            }
        }
    }
}
