//! Drop target resolution.
//!
//! While a window is dragged, the window under the pointer is asked whether it
//! accepts the drop; if not, its parent is asked, and so on up to the root. The
//! first window that accepts describes what would happen as a [`DropAction`]
//! and where the result would appear as a preview rectangle.

use berth_core::geometry::Rect;
use berth_core::math::Vec2;
use berth_core::profiling::profile_function;

use crate::error::{DockError, DockResult};
use crate::events::DockingEvent;
use crate::layout::{split_panels, transpose};
use crate::node::{WindowKind, WindowType};
use crate::tab_strip::{DragTab, TabStrip};
use crate::tree::DockingTree;
use crate::types::{Direction, WindowId};

/// Mutation a drop performs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropAction {
    /// Split `target`, putting the dragged window on the `direction` side.
    Split {
        target: WindowId,
        direction: Direction,
    },
    /// Insert the dragged window into a tab window or window bar.
    InsertTab { tab_window: WindowId, index: usize },
    /// Put the dragged window in a tab window together with `target`.
    Tabify { target: WindowId },
    /// Make the dragged window the root's top-level window.
    SetRoot,
}

/// A window that accepted a drop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget {
    /// The acceptor.
    pub window: WindowId,
    pub action: DropAction,
    /// Where the dropped window would appear.
    pub preview: Rect,
}

/// Edge of `bounds` a drop at `point` would split towards, or `None` for the centre.
///
/// The edge with the smallest distance relative to the bounds' size wins; on a
/// tie the order is up, down, left, right. The point counts as an edge drop when
/// it is closer than `edge_distance` pixels or `edge_fraction` of the size to
/// that edge.
pub fn split_direction(
    bounds: Rect,
    point: Vec2,
    edge_distance: f32,
    edge_fraction: f32,
) -> Option<Direction> {
    // Guard against zero-area bounds (avoid division by zero)
    if bounds.is_empty() {
        return None;
    }

    let pixels = |direction: Direction| match direction {
        Direction::Up => point.y - bounds.y,
        Direction::Down => bounds.bottom() - point.y,
        Direction::Left => point.x - bounds.x,
        Direction::Right => bounds.right() - point.x,
    };
    let relative = |direction: Direction| {
        let extent = if direction.is_horizontal() {
            bounds.width
        } else {
            bounds.height
        };
        pixels(direction) / extent
    };

    let mut best = Direction::Up;
    for direction in Direction::ALL {
        if relative(direction) < relative(best) {
            best = direction;
        }
    }

    (pixels(best) < edge_distance || relative(best) < edge_fraction).then_some(best)
}

/// Half of `bounds` on the `direction` side.
pub fn split_preview(bounds: Rect, direction: Direction) -> Rect {
    let half_width = bounds.width / 2.0;
    let half_height = bounds.height / 2.0;
    match direction {
        Direction::Left => Rect::new(bounds.x, bounds.y, half_width, bounds.height),
        Direction::Right => Rect::new(bounds.x + half_width, bounds.y, half_width, bounds.height),
        Direction::Up => Rect::new(bounds.x, bounds.y, bounds.width, half_height),
        Direction::Down => Rect::new(bounds.x, bounds.y + half_height, bounds.width, half_height),
    }
}

impl<C> DockingTree<C> {
    /// Ask `window` whether it accepts `dragged` dropped at `point`.
    ///
    /// Tab windows and window bars that accept a drop on their strip show a
    /// placeholder tab until [`Self::abort_drop`] or [`Self::do_drop`].
    pub fn accept_drop(&mut self, window: WindowId, point: Vec2, dragged: WindowId) -> Option<DropTarget> {
        if dragged == window || self.is_ancestor(dragged, window) {
            return None;
        }
        self.check_movable(dragged).ok()?;

        let target = match self.window_type(window)? {
            WindowType::View => self.accept_on_view(window, point),
            WindowType::Tab => self.accept_on_tab(window, point, dragged),
            WindowType::Bar => self.accept_on_bar(window, point, dragged),
            WindowType::Split => self.accept_on_split(window, point, dragged),
            WindowType::Root => self.root_window().is_none().then(|| DropTarget {
                window,
                action: DropAction::SetRoot,
                preview: self.main_area(),
            }),
        };
        if let Some(target) = &target {
            tracing::trace!("{} accepts {} as {:?}", window, dragged, target.action);
        }
        target
    }

    fn accept_on_view(&self, window: WindowId, point: Vec2) -> Option<DropTarget> {
        // Tabs are handled by their tab window or bar.
        if let Some(parent) = self.parent(window)
            && matches!(self.window_type(parent), Some(WindowType::Tab | WindowType::Bar))
        {
            return None;
        }

        let bounds = self.bounds(window)?;
        let config = self.effective_config(window);
        let target = match split_direction(
            bounds,
            point,
            config.edge_split_distance,
            config.edge_split_fraction,
        ) {
            Some(direction) => DropTarget {
                window,
                action: DropAction::Split {
                    target: window,
                    direction,
                },
                preview: split_preview(bounds, direction),
            },
            None => DropTarget {
                window,
                action: DropAction::Tabify { target: window },
                preview: bounds,
            },
        };
        Some(target)
    }

    fn accept_on_tab(&mut self, window: WindowId, point: Vec2, dragged: WindowId) -> Option<DropTarget> {
        let count = self.child_count(window);
        if count == 1 && self.parent(dragged) == Some(window) {
            return None;
        }
        let bounds = self.bounds(window)?;

        if let Some(target) = self.accept_on_strip(window, point, dragged) {
            return Some(target);
        }

        let config = self.effective_config(window);
        let content = self.tab_content_bounds(window).unwrap_or(bounds);
        let target = match split_direction(
            content,
            point,
            config.edge_split_distance,
            config.edge_split_fraction,
        ) {
            Some(direction) => DropTarget {
                window,
                action: DropAction::Split {
                    target: window,
                    direction,
                },
                preview: split_preview(bounds, direction),
            },
            None => DropTarget {
                window,
                action: DropAction::InsertTab {
                    tab_window: window,
                    index: count,
                },
                preview: content,
            },
        };
        Some(target)
    }

    fn accept_on_bar(&mut self, window: WindowId, point: Vec2, dragged: WindowId) -> Option<DropTarget> {
        if let Some(target) = self.accept_on_strip(window, point, dragged) {
            return Some(target);
        }

        // Pointer over the expanded content.
        let selected = self.tab_strip(window)?.selected_window()?;
        let content = self.bounds(selected)?;
        if !content.contains(point) {
            return None;
        }
        Some(DropTarget {
            window,
            action: DropAction::InsertTab {
                tab_window: window,
                index: self.child_count(window),
            },
            preview: self.bounds(window).unwrap_or(content),
        })
    }

    /// Accept a drop on the tab strip of a tab window or window bar, showing a
    /// placeholder tab at the insertion point.
    fn accept_on_strip(&mut self, window: WindowId, point: Vec2, dragged: WindowId) -> Option<DropTarget> {
        let strip_rect = self.tab_strip_bounds(window)?;
        let local = self.strip_point(window, point);
        if !strip_rect.contains(local) {
            return None;
        }

        let widths = self.tab_widths(window);
        let spacing = self.effective_config(window).tab_spacing;
        let title = self.title(dragged).unwrap_or_default().to_owned();
        let is_bar = self.window_type(window) == Some(WindowType::Bar);

        let strip = self.get_mut(window)?.kind.strip_mut()?;
        let index = strip.insertion_point(local, strip_rect, &widths, spacing);
        strip.set_drag_tab(Some(DragTab { index, title }));
        let marker = strip
            .drop_indicator_bounds(strip_rect, &widths, spacing)
            .unwrap_or(strip_rect);
        let preview = if is_bar {
            transpose(marker)
        } else {
            marker
        };

        Some(DropTarget {
            window,
            action: DropAction::InsertTab {
                tab_window: window,
                index,
            },
            preview,
        })
    }

    /// Thirds are taken along the split's axis: left, middle and right for a
    /// side-by-side split, top, middle and bottom for a stacked one. The divider
    /// lies in the middle third, so a drop on it tabifies the child whose panel
    /// reaches the pointer first.
    fn accept_on_split(&self, window: WindowId, point: Vec2, dragged: WindowId) -> Option<DropTarget> {
        let split = self.split_data(window)?;
        let bounds = self.bounds(window)?;
        let fraction = if split.horizontal {
            (point.x - bounds.x) / bounds.width
        } else {
            (point.y - bounds.y) / bounds.height
        };
        if !fraction.is_finite() {
            return None;
        }

        let outer = match (split.horizontal, fraction) {
            (true, f) if f < 1.0 / 3.0 => Some(Direction::Left),
            (true, f) if f > 2.0 / 3.0 => Some(Direction::Right),
            (false, f) if f < 1.0 / 3.0 => Some(Direction::Up),
            (false, f) if f > 2.0 / 3.0 => Some(Direction::Down),
            _ => None,
        };
        if let Some(direction) = outer {
            return Some(DropTarget {
                window,
                action: DropAction::Split {
                    target: window,
                    direction,
                },
                preview: split_preview(bounds, direction),
            });
        }

        // Middle third: tabify the child on the pointer's side of the divider.
        let (first, second) = split_panels(bounds, split.horizontal, split.divider_location, 0.0);
        let child = if first.contains(point) {
            split.left.or(split.right)
        } else if second.contains(point) {
            split.right.or(split.left)
        } else {
            None
        }?;
        if child == dragged {
            return None;
        }
        Some(DropTarget {
            window,
            action: DropAction::Tabify { target: child },
            preview: self.bounds(child).unwrap_or(bounds),
        })
    }

    /// Acceptor for `dragged` at `point`.
    ///
    /// Starts at the deepest visible window under the pointer, outside the
    /// dragged subtree, and walks up the parent chain until a window accepts.
    pub fn resolve_drop(&mut self, point: Vec2, dragged: WindowId) -> Option<DropTarget> {
        profile_function!();

        let mut current = self.window_at(point, Some(dragged));
        while let Some(window) = current {
            if let Some(target) = self.accept_drop(window, point, dragged) {
                return Some(target);
            }
            current = self.parent(window);
        }
        None
    }

    /// Remove the preview state of a drop that will not happen.
    pub fn abort_drop(&mut self, target: &DropTarget) {
        if let Some(strip) = self
            .get_mut(target.window)
            .and_then(|node| node.kind.strip_mut())
        {
            strip.set_drag_tab(None);
        }
        if let Some(root) = self.root_data_mut() {
            root.overlay.clear();
        }
    }

    /// Perform a drop in one transaction.
    ///
    /// A window dropped into a tab window is selected, and focus is restored to
    /// the dropped window after the host has settled.
    pub fn do_drop(&mut self, target: &DropTarget, dragged: WindowId) -> DockResult<()> {
        self.abort_drop(target);

        let mut tx = self.begin_transaction();
        match target.action {
            DropAction::Split { target, direction } => {
                tx.split(target, dragged, direction, 0.5)?;
            }
            DropAction::InsertTab { tab_window, index } => {
                tx.insert_tab(tab_window, dragged, index)?;
                if tx.window_type(tab_window) == Some(WindowType::Tab) {
                    tx.select_window(dragged)?;
                }
            }
            DropAction::Tabify { target } => tx.tabify(target, dragged)?,
            DropAction::SetRoot => tx.set_root_window(Some(dragged))?,
        }
        tx.restore_focus(dragged);
        tracing::debug!("Dropped {} on {}: {:?}", dragged, target.window, target.action);
        Ok(())
    }

    /// Put `window` into a tab window with `target`, selected.
    ///
    /// A tab window target just gains a tab; anything else is wrapped in a new
    /// tab window that takes its place.
    fn tabify(&mut self, target: WindowId, window: WindowId) -> DockResult<()> {
        self.check_movable(window)?;
        if window == target || self.is_ancestor(window, target) {
            return Err(DockError::AncestorDrop { window, target });
        }
        if self.window_type(target) == Some(WindowType::Tab) {
            self.add_tab(target, window)?;
            return self.select_window(window);
        }
        self.check_movable(target)?;

        let mut tx = self.begin_optimize(target);
        tx.detach_for_move(window)?;
        let tab = tx.alloc(WindowKind::Tab(TabStrip::new()));
        if let Some(parent) = tx.parent(target) {
            tx.raw_replace(parent, target, tab)?;
        }
        tx.raw_insert_tab(tab, target, 0)?;
        tx.raw_insert_tab(tab, window, 1)?;
        tx.set_selected_tab(tab, Some(1))?;
        tx.fire_title_changed(tab);
        tx.emit(DockingEvent::WindowAdded { parent: tab, window });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

    #[test]
    fn test_split_direction_edges() {
        assert_eq!(
            split_direction(BOUNDS, Vec2::new(5.0, 50.0), 16.0, 0.25),
            Some(Direction::Left)
        );
        assert_eq!(
            split_direction(BOUNDS, Vec2::new(95.0, 50.0), 16.0, 0.25),
            Some(Direction::Right)
        );
        assert_eq!(
            split_direction(BOUNDS, Vec2::new(50.0, 10.0), 16.0, 0.25),
            Some(Direction::Up)
        );
        assert_eq!(
            split_direction(BOUNDS, Vec2::new(50.0, 90.0), 16.0, 0.25),
            Some(Direction::Down)
        );
        assert_eq!(split_direction(BOUNDS, Vec2::new(50.0, 50.0), 16.0, 0.25), None);
    }

    #[test]
    fn test_split_direction_tie_prefers_up() {
        // Equidistant from the top and left edges.
        assert_eq!(
            split_direction(BOUNDS, Vec2::new(10.0, 10.0), 16.0, 0.25),
            Some(Direction::Up)
        );
        assert_eq!(
            split_direction(BOUNDS, Vec2::new(90.0, 90.0), 16.0, 0.25),
            Some(Direction::Down)
        );
        assert_eq!(
            split_direction(BOUNDS, Vec2::new(10.0, 90.0), 16.0, 0.25),
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_split_direction_pixel_distance_on_large_bounds() {
        let wide = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        // 1.2% away, caught by the pixel distance alone.
        assert_eq!(
            split_direction(wide, Vec2::new(12.0, 500.0), 16.0, 0.0),
            Some(Direction::Left)
        );
        assert_eq!(split_direction(wide, Vec2::new(20.0, 500.0), 16.0, 0.0), None);
        assert_eq!(split_direction(Rect::ZERO, Vec2::ZERO, 16.0, 0.25), None);
    }

    #[test]
    fn test_split_preview_halves() {
        assert_eq!(
            split_preview(BOUNDS, Direction::Right),
            Rect::new(50.0, 0.0, 50.0, 100.0)
        );
        assert_eq!(
            split_preview(BOUNDS, Direction::Up),
            Rect::new(0.0, 0.0, 100.0, 50.0)
        );
    }

    fn laid_out(tree: &mut DockingTree<()>) {
        tree.set_bounds(Rect::new(0.0, 0.0, 400.0, 300.0));
        tree.layout();
    }

    #[test]
    fn test_view_edge_and_centre() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        tree.set_root_window(Some(a)).unwrap();
        laid_out(&mut tree);

        let edge = tree.resolve_drop(Vec2::new(395.0, 150.0), b).unwrap();
        assert_eq!(
            edge.action,
            DropAction::Split {
                target: a,
                direction: Direction::Right
            }
        );
        let centre = tree.resolve_drop(Vec2::new(200.0, 150.0), b).unwrap();
        assert_eq!(centre.action, DropAction::Tabify { target: a });
    }

    #[test]
    fn test_rejects_self_and_ancestor() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        tree.set_root_window(Some(a)).unwrap();
        let split = tree.split(a, b, Direction::Right, 0.5).unwrap();
        laid_out(&mut tree);

        assert!(tree.accept_drop(a, Vec2::new(10.0, 10.0), a).is_none());
        assert!(tree.accept_drop(a, Vec2::new(10.0, 10.0), split).is_none());
        // The root is occupied, so nothing outside the split accepts it either.
        assert!(tree.resolve_drop(Vec2::new(10.0, 150.0), split).is_none());
    }

    #[test]
    fn test_empty_root_accepts_set_root() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        laid_out(&mut tree);

        let target = tree.resolve_drop(Vec2::new(100.0, 100.0), a).unwrap();
        assert_eq!(target.window, tree.root());
        assert_eq!(target.action, DropAction::SetRoot);

        tree.do_drop(&target, a).unwrap();
        assert_eq!(tree.root_window(), Some(a));
    }

    #[test]
    fn test_tab_strip_drop_shows_placeholder() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let c = tree.create_view("C", ());
        let tab = tree.create_tab_window(&[a, b]).unwrap();
        tree.set_root_window(Some(tab)).unwrap();
        laid_out(&mut tree);

        let target = tree.resolve_drop(Vec2::new(1.0, 5.0), c).unwrap();
        assert_eq!(
            target.action,
            DropAction::InsertTab {
                tab_window: tab,
                index: 0
            }
        );
        assert_eq!(tree.tab_strip(tab).unwrap().drag_tab().map(|t| t.index), Some(0));

        tree.abort_drop(&target);
        assert!(tree.tab_strip(tab).unwrap().drag_tab().is_none());

        let target = tree.resolve_drop(Vec2::new(1.0, 5.0), c).unwrap();
        tree.do_drop(&target, c).unwrap();
        assert_eq!(tree.child_windows(tab), vec![c, a, b]);
        assert_eq!(tree.tab_strip(tab).unwrap().selected_window(), Some(c));
        assert!(tree.tab_strip(tab).unwrap().drag_tab().is_none());
    }

    #[test]
    fn test_tab_refuses_its_sole_child() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let tab = tree.create_tab_window(&[a]).unwrap();
        tree.set_root_window(Some(b)).unwrap();
        tree.split(b, tab, Direction::Right, 0.5).unwrap();
        laid_out(&mut tree);

        assert!(tree.accept_drop(tab, Vec2::new(300.0, 5.0), a).is_none());
    }

    #[test]
    fn test_tabify_wraps_target() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        tree.set_root_window(Some(a)).unwrap();
        laid_out(&mut tree);

        let target = tree.resolve_drop(Vec2::new(200.0, 150.0), b).unwrap();
        tree.do_drop(&target, b).unwrap();

        let tab = tree.root_window().unwrap();
        assert_eq!(tree.window_type(tab), Some(WindowType::Tab));
        assert_eq!(tree.child_windows(tab), vec![a, b]);
        assert_eq!(tree.tab_strip(tab).unwrap().selected_window(), Some(b));
        assert!(tree.has_pending_focus());
        tree.validate().unwrap();
    }

    #[test]
    fn test_split_middle_third_tabifies_child() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let c = tree.create_view("C", ());
        tree.set_root_window(Some(a)).unwrap();
        let split = tree.split(a, b, Direction::Right, 0.5).unwrap();
        laid_out(&mut tree);

        let target = tree.accept_drop(split, Vec2::new(180.0, 150.0), c).unwrap();
        assert_eq!(target.action, DropAction::Tabify { target: a });
        let target = tree.accept_drop(split, Vec2::new(20.0, 150.0), c).unwrap();
        assert_eq!(
            target.action,
            DropAction::Split {
                target: split,
                direction: Direction::Left
            }
        );
    }

    #[test]
    fn test_drop_on_divider_tabifies_nearest_child() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let c = tree.create_view("C", ());
        tree.set_root_window(Some(a)).unwrap();
        let split = tree.split(a, b, Direction::Right, 0.5).unwrap();
        laid_out(&mut tree);

        // The 4px divider covers x in 198..202 and belongs to neither child.
        assert_eq!(tree.window_at(Vec2::new(200.0, 150.0), Some(c)), Some(split));
        let target = tree.resolve_drop(Vec2::new(200.0, 150.0), c).unwrap();
        assert_eq!(target.window, split);
        assert_eq!(target.action, DropAction::Tabify { target: a });
        let target = tree.resolve_drop(Vec2::new(201.0, 150.0), c).unwrap();
        assert_eq!(target.action, DropAction::Tabify { target: b });

        // Stacked splits use top, middle and bottom thirds.
        tree.set_root_window(None).unwrap();
        let d = tree.create_view("D", ());
        tree.set_root_window(Some(c)).unwrap();
        let stacked = tree.split(c, d, Direction::Down, 0.5).unwrap();
        laid_out(&mut tree);
        let target = tree.accept_drop(stacked, Vec2::new(200.0, 10.0), a).unwrap();
        assert_eq!(
            target.action,
            DropAction::Split {
                target: stacked,
                direction: Direction::Up
            }
        );
        let target = tree.accept_drop(stacked, Vec2::new(200.0, 150.0), a).unwrap();
        assert_eq!(target.action, DropAction::Tabify { target: c });
    }

    #[test]
    fn test_drop_sibling_onto_edge_collapses_old_split() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        tree.set_root_window(Some(a)).unwrap();
        tree.split(a, b, Direction::Right, 0.5).unwrap();
        laid_out(&mut tree);

        // Drag B onto the top edge of A.
        let target = tree.resolve_drop(Vec2::new(100.0, 5.0), b).unwrap();
        assert_eq!(
            target.action,
            DropAction::Split {
                target: a,
                direction: Direction::Up
            }
        );
        tree.do_drop(&target, b).unwrap();

        let root_window = tree.root_window().unwrap();
        let data = tree.split_data(root_window).unwrap();
        assert!(!data.horizontal);
        assert_eq!((data.left, data.right), (Some(b), Some(a)));
        tree.validate().unwrap();
    }
}
