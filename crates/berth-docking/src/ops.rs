//! Structural operations on the docking tree.
//!
//! Every public operation runs inside an optimize transaction and leaves the tree
//! consistent when it returns. The `raw_*` helpers do single edits without
//! opening a transaction and are only used by operations that already hold one.

use crate::error::{DockError, DockResult};
use crate::events::DockingEvent;
use crate::location::WindowLocation;
use crate::node::{BarData, SplitData, View, WindowKind, WindowType};
use crate::tab_strip::TabStrip;
use crate::tree::DockingTree;
use crate::types::{Direction, WindowFlags, WindowId};

impl<C> DockingTree<C> {
    // -----------------------------------------------------------------------
    // Creation and disposal
    // -----------------------------------------------------------------------

    /// Create a detached view.
    pub fn create_view(&mut self, title: impl Into<String>, content: C) -> WindowId {
        self.create_view_with_icon(title, None, content)
    }

    pub fn create_view_with_icon(
        &mut self,
        title: impl Into<String>,
        icon: Option<String>,
        content: C,
    ) -> WindowId {
        let id = self.alloc(WindowKind::View(View {
            title: title.into(),
            icon,
            content,
        }));
        tracing::trace!("Created view {}", id);
        id
    }

    /// Create a detached tab window holding `windows`, the first one selected.
    pub fn create_tab_window(&mut self, windows: &[WindowId]) -> DockResult<WindowId> {
        for (i, &window) in windows.iter().enumerate() {
            self.check_movable(window)?;
            if windows[..i].contains(&window) {
                return Err(DockError::InvalidLayout(format!(
                    "window {} listed twice",
                    window
                )));
            }
        }

        let tab = self.alloc(WindowKind::Tab(TabStrip::new()));
        let mut tx = self.begin_transaction();
        for (index, &window) in windows.iter().enumerate() {
            tx.detach_for_move(window)?;
            tx.raw_insert_tab(tab, window, index)?;
        }
        tx.fire_title_changed(tab);
        tracing::debug!("Created tab window {} with {} tabs", tab, windows.len());
        Ok(tab)
    }

    /// Create a detached split of `left` and `right`.
    pub fn create_split_window(
        &mut self,
        left: WindowId,
        right: WindowId,
        horizontal: bool,
        divider_location: f32,
    ) -> DockResult<WindowId> {
        self.check_movable(left)?;
        self.check_movable(right)?;
        if left == right || self.is_ancestor(left, right) {
            return Err(DockError::AncestorDrop {
                window: left,
                target: right,
            });
        }
        if self.is_ancestor(right, left) {
            return Err(DockError::AncestorDrop {
                window: right,
                target: left,
            });
        }

        let split = self.alloc(WindowKind::Split(SplitData::new(horizontal, divider_location)));
        let mut tx = self.begin_transaction();
        tx.detach_for_move(left)?;
        tx.detach_for_move(right)?;
        tx.set_split_children(split, Some(left), Some(right))?;
        tx.fire_title_changed(split);
        tracing::debug!("Created split window {}", split);
        Ok(split)
    }

    /// Dispose a detached view.
    pub fn dispose_view(&mut self, view: WindowId) -> DockResult<()> {
        if self.node(view)?.window_type() != WindowType::View {
            return Err(DockError::InvalidWindowType(view));
        }
        self.dispose_window(view)
    }

    /// Dispose a detached window and its whole subtree.
    pub fn dispose_window(&mut self, window: WindowId) -> DockResult<()> {
        self.check_movable(window)?;
        if self.parent(window).is_some() {
            return Err(DockError::ViewStillAttached(window));
        }
        for id in self.subtree(window) {
            self.dispose(id);
        }
        tracing::debug!("Disposed {}", window);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Split, close, restore, minimize
    // -----------------------------------------------------------------------

    /// Wrap `window` and `with` in a new split placed where `window` was.
    ///
    /// `with` ends on the `direction` side and `divider_location` is the new
    /// split's divider. When `window` is the only tab of a tab window, the tab
    /// window is split instead. Returns the new split.
    pub fn split(
        &mut self,
        window: WindowId,
        with: WindowId,
        direction: Direction,
        divider_location: f32,
    ) -> DockResult<WindowId> {
        self.check_movable(window)?;
        self.check_movable(with)?;
        if with == window || self.is_ancestor(with, window) {
            return Err(DockError::AncestorDrop {
                window: with,
                target: window,
            });
        }

        let target = self.content_window(window);
        let mut tx = self.begin_optimize(target);
        tx.detach_for_move(with)?;

        let split = tx.alloc(WindowKind::Split(SplitData::new(
            direction.is_horizontal(),
            divider_location,
        )));
        if let Some(parent) = tx.parent(target) {
            tx.raw_replace(parent, target, split)?;
        }
        let (left, right) = if direction.is_before() {
            (with, target)
        } else {
            (target, with)
        };
        tx.set_split_children(split, Some(left), Some(right))?;
        tx.fire_title_changed(split);
        tx.emit(DockingEvent::WindowAdded {
            parent: split,
            window: with,
        });
        tracing::debug!(
            "Split {} with {} towards {:?} at {:.2}",
            target,
            with,
            direction,
            divider_location
        );
        Ok(split)
    }

    /// Window to operate on in place of `window`: its tab window when it is that
    /// tab window's only tab.
    pub fn content_window(&self, window: WindowId) -> WindowId {
        match self.parent(window) {
            Some(parent)
                if self.window_type(parent) == Some(WindowType::Tab)
                    && self.child_count(parent) == 1 =>
            {
                parent
            }
            _ => window,
        }
    }

    /// Close `window`, remembering where it was.
    pub fn close(&mut self, window: WindowId) -> DockResult<()> {
        self.check_movable(window)?;
        if !self.flags(window).contains(WindowFlags::CLOSABLE) {
            return Err(DockError::NotPermitted {
                window,
                operation: "close",
            });
        }
        let Some(parent) = self.parent(window) else {
            return Ok(());
        };

        let mut tx = self.begin_optimize(parent);
        tx.remove_child_window(parent, window)?;

        if let Some(focused) = tx.focused_view()
            && (focused == window || tx.is_ancestor(window, focused))
        {
            if let Some(root) = tx.root_data_mut() {
                root.focused_view = None;
            }
            tx.emit(DockingEvent::ViewFocusChanged {
                previous: Some(focused),
                focused: None,
            });
        }
        tx.emit(DockingEvent::WindowClosed(window));
        tracing::debug!("Closed {}", window);
        Ok(())
    }

    /// Put `window` back where it was.
    ///
    /// A minimized window is taken out of its bar first; a window already docked
    /// in the main area is left alone. If no level of the remembered location
    /// resolves, the window is placed at the root, splitting the current root
    /// window if there is one.
    pub fn restore(&mut self, window: WindowId) -> DockResult<()> {
        self.check_movable(window)?;

        if let Some(bar) = self.containing_bar(window) {
            let top = if self.parent(window) == Some(bar) {
                window
            } else {
                self.ancestors(window)
                    .into_iter()
                    .find(|&ancestor| self.parent(ancestor) == Some(bar))
                    .unwrap_or(window)
            };

            let mut tx = self.begin_optimize(bar);
            tx.raw_remove(bar, top)?;
            tx.fire_title_changed(bar);
            tx.emit(DockingEvent::WindowRemoved {
                parent: bar,
                window: top,
            });
            let location = tx.node(top)?.last_location.clone();
            tx.place_restored(top, &location)?;
            tx.emit(DockingEvent::WindowRestored(top));
            tracing::debug!("Restored minimized {}", top);
            return Ok(());
        }

        if self.is_attached(window) {
            return Ok(());
        }

        let top = self.detached_top(window);
        let location = self.node(top)?.last_location.clone();
        let root = self.root();
        let mut tx = self.begin_optimize(root);
        tx.place_restored(top, &location)?;
        tx.emit(DockingEvent::WindowRestored(top));
        tracing::debug!("Restored {}", top);
        Ok(())
    }

    fn place_restored(&mut self, window: WindowId, location: &WindowLocation) -> DockResult<()> {
        if self.apply_location(location, window)? {
            return Ok(());
        }
        if !location.is_null() {
            tracing::warn!(
                "Location of {} no longer resolves, restoring at the root",
                window
            );
        }
        match self.root_window() {
            None => self.set_root_window(Some(window)),
            Some(root_window) => self
                .split(root_window, window, Direction::Right, 0.5)
                .map(|_| ()),
        }
    }

    /// Move `window` into a window bar.
    ///
    /// Without an explicit direction the window's previous bar is used, then the
    /// bar nearest to the window (enabled bars first). The bar is enabled.
    pub fn minimize(&mut self, window: WindowId, direction: Option<Direction>) -> DockResult<()> {
        self.check_movable(window)?;
        if !self.flags(window).contains(WindowFlags::MINIMIZABLE) {
            return Err(DockError::NotPermitted {
                window,
                operation: "minimize",
            });
        }

        let direction = direction
            .or(self.node(window)?.last_minimized_direction)
            .unwrap_or_else(|| self.nearest_bar_direction(window));
        let bar = self.window_bar(direction);

        if self.parent(window) == Some(bar) {
            return self.set_window_bar_enabled(direction, true);
        }

        let mut tx = self.begin_optimize(bar);
        tx.detach_for_move(window)?;
        let index = tx.child_count(bar);
        tx.raw_insert_tab(bar, window, index)?;
        tx.mark_minimized(bar, window, direction)?;
        tx.fire_title_changed(bar);
        tx.emit(DockingEvent::WindowAdded {
            parent: bar,
            window,
        });
        tracing::debug!("Minimized {} to {:?}", window, direction);
        Ok(())
    }

    fn mark_minimized(&mut self, bar: WindowId, window: WindowId, direction: Direction) -> DockResult<()> {
        if let WindowKind::Bar(data) = &mut self.node_mut(bar)?.kind {
            data.enabled = true;
        }
        self.node_mut(window)?.last_minimized_direction = Some(direction);
        self.emit(DockingEvent::WindowMinimized { window, direction });
        Ok(())
    }

    fn nearest_bar_direction(&self, window: WindowId) -> Direction {
        let Some(bounds) = self.bounds(window) else {
            return Direction::Left;
        };
        let area = self.main_area();
        let center = bounds.center();
        let distance = |direction: Direction| match direction {
            Direction::Up => center.y - area.y,
            Direction::Down => area.bottom() - center.y,
            Direction::Left => center.x - area.x,
            Direction::Right => area.right() - center.x,
        };

        let enabled: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&direction| self.is_window_bar_enabled(direction))
            .collect();
        let candidates = if enabled.is_empty() {
            Direction::ALL.to_vec()
        } else {
            enabled
        };

        candidates
            .into_iter()
            .fold(None, |best: Option<(Direction, f32)>, direction| {
                let d = distance(direction);
                match best {
                    Some((_, best_d)) if best_d <= d => best,
                    _ => Some((direction, d)),
                }
            })
            .map_or(Direction::Left, |(direction, _)| direction)
    }

    // -----------------------------------------------------------------------
    // Child edits
    // -----------------------------------------------------------------------

    /// Replace child `old` of `parent` with `new`.
    ///
    /// # Panics
    ///
    /// If `parent` is a view.
    pub fn replace_child_window(
        &mut self,
        parent: WindowId,
        old: WindowId,
        new: WindowId,
    ) -> DockResult<()> {
        self.assert_container(parent)?;
        self.check_movable(new)?;
        if self.parent(old) != Some(parent) {
            return Err(DockError::NotAChild { parent, child: old });
        }
        if new == parent || self.is_ancestor(new, parent) {
            return Err(DockError::AncestorDrop {
                window: new,
                target: parent,
            });
        }
        if new == old {
            return Ok(());
        }

        let mut tx = self.begin_optimize(parent);
        tx.detach_for_move(new)?;
        tx.raw_replace(parent, old, new)?;
        tx.fire_title_changed(parent);
        tx.emit(DockingEvent::WindowRemoved { parent, window: old });
        tx.emit(DockingEvent::WindowAdded { parent, window: new });
        Ok(())
    }

    /// Detach `child` from `parent`, remembering its location.
    ///
    /// Removal from a window bar keeps the location captured when the window was
    /// minimized.
    ///
    /// # Panics
    ///
    /// If `parent` is a view.
    pub fn remove_child_window(&mut self, parent: WindowId, child: WindowId) -> DockResult<()> {
        let parent_type = self.assert_container(parent)?;
        self.node(child)?;
        if self.parent(child) != Some(parent) {
            return Err(DockError::NotAChild { parent, child });
        }

        let location = (parent_type != WindowType::Bar).then(|| self.window_location(child));
        let mut tx = self.begin_optimize(parent);
        tx.raw_remove(parent, child)?;
        if let Some(location) = location {
            tx.node_mut(child)?.last_location = location;
        }
        tx.fire_title_changed(parent);
        tx.emit(DockingEvent::WindowRemoved {
            parent,
            window: child,
        });
        tracing::trace!("Removed {} from {}", child, parent);
        Ok(())
    }

    /// Append `window` as the last tab of `tab_window`.
    pub fn add_tab(&mut self, tab_window: WindowId, window: WindowId) -> DockResult<()> {
        self.insert_tab(tab_window, window, usize::MAX)
    }

    /// Insert `window` at insertion point `index` of a tab window or window bar.
    ///
    /// A window that already is a tab of `tab_window` is moved. Inserting into a
    /// window bar minimizes the window there.
    pub fn insert_tab(&mut self, tab_window: WindowId, window: WindowId, index: usize) -> DockResult<()> {
        match self.node(tab_window)?.window_type() {
            WindowType::Tab | WindowType::Bar => {}
            _ => return Err(DockError::InvalidWindowType(tab_window)),
        }
        self.check_movable(window)?;
        if window == tab_window || self.is_ancestor(window, tab_window) {
            return Err(DockError::AncestorDrop {
                window,
                target: tab_window,
            });
        }

        let mut tx = self.begin_optimize(tab_window);
        if tx.parent(window) == Some(tab_window) {
            let moved = tx
                .node_mut(tab_window)?
                .kind
                .strip_mut()
                .and_then(|strip| {
                    let from = strip.index_of(window)?;
                    strip.reorder(from, index)
                });
            if moved.is_some() {
                tx.layout_dirty = true;
                tx.fire_title_changed(tab_window);
            }
            return Ok(());
        }

        tx.detach_for_move(window)?;
        let index = tx.raw_insert_tab(tab_window, window, index)?;
        let bar_direction = tx
            .get(tab_window)
            .and_then(|node| node.as_bar())
            .map(|bar| bar.direction);
        if let Some(direction) = bar_direction {
            tx.mark_minimized(tab_window, window, direction)?;
        }
        tx.fire_title_changed(tab_window);
        tx.emit(DockingEvent::WindowAdded {
            parent: tab_window,
            window,
        });
        tracing::trace!("Inserted {} into {} at {}", window, tab_window, index);
        Ok(())
    }

    /// Select a tab. Only window bars may be left without a selection.
    pub fn set_selected_tab(&mut self, tab_window: WindowId, index: Option<usize>) -> DockResult<()> {
        let is_bar = match self.node(tab_window)?.window_type() {
            WindowType::Tab => false,
            WindowType::Bar => true,
            _ => return Err(DockError::InvalidWindowType(tab_window)),
        };
        let count = self.child_count(tab_window);
        if index.is_none() && !is_bar && count > 0 {
            return Err(DockError::InvalidLayout(format!(
                "tab window {} must keep a selection",
                tab_window
            )));
        }
        if let Some(index) = index
            && index >= count
        {
            return Err(DockError::InvalidLayout(format!(
                "tab index {} out of range for {}",
                index, tab_window
            )));
        }

        let changed = self
            .node_mut(tab_window)?
            .kind
            .strip_mut()
            .and_then(|strip| strip.select(index))
            .is_some();
        if changed {
            self.layout_dirty = true;
            self.emit(DockingEvent::TabSelected { tab_window, index });
            if let Some(selected) = self.tab_strip(tab_window).and_then(TabStrip::selected_window) {
                self.restore_focus(selected);
            }
        }
        Ok(())
    }

    /// Select the tab holding `window` in its parent tab window or bar.
    pub fn select_window(&mut self, window: WindowId) -> DockResult<()> {
        let parent = self.parent(window).ok_or(DockError::WindowNotFound(window))?;
        let index = self
            .tab_strip(parent)
            .and_then(|strip| strip.index_of(window))
            .ok_or(DockError::InvalidWindowType(parent))?;
        self.set_selected_tab(parent, Some(index))
    }

    /// Set a split's divider location, clamped to `[0, 1]`.
    pub fn set_divider_location(&mut self, split: WindowId, location: f32) -> DockResult<()> {
        match &mut self.node_mut(split)?.kind {
            WindowKind::Split(data) => data.divider_location = location.clamp(0.0, 1.0),
            _ => return Err(DockError::InvalidWindowType(split)),
        }
        self.layout_dirty = true;
        Ok(())
    }

    /// Replace the root's top-level window. The previous one is detached.
    pub fn set_root_window(&mut self, window: Option<WindowId>) -> DockResult<()> {
        if let Some(window) = window {
            self.check_movable(window)?;
        }
        let root = self.root();
        let current = self.root_window();
        if current == window {
            return Ok(());
        }

        let mut tx = self.begin_optimize(root);
        if let Some(current) = current {
            tx.remove_child_window(root, current)?;
        }
        if let Some(window) = window {
            tx.detach_for_move(window)?;
            if let Some(data) = tx.root_data_mut() {
                data.window = Some(window);
            }
            tx.node_mut(window)?.parent = Some(root);
            tx.emit(DockingEvent::WindowAdded {
                parent: root,
                window,
            });
        }
        tx.layout_dirty = true;
        tx.fire_title_changed(root);
        Ok(())
    }

    pub fn is_window_bar_enabled(&self, direction: Direction) -> bool {
        self.get(self.window_bar(direction))
            .and_then(|node| node.as_bar())
            .is_some_and(|bar| bar.enabled)
    }

    pub fn set_window_bar_enabled(&mut self, direction: Direction, enabled: bool) -> DockResult<()> {
        let bar = self.window_bar(direction);
        if let WindowKind::Bar(data) = &mut self.node_mut(bar)?.kind {
            data.enabled = enabled;
        }
        self.layout_dirty = true;
        Ok(())
    }

    /// Set the slide-out content size of a window bar.
    pub fn set_bar_content_size(&mut self, direction: Direction, size: f32) -> DockResult<()> {
        let bar = self.window_bar(direction);
        if let WindowKind::Bar(data) = &mut self.node_mut(bar)?.kind {
            data.content_size = size.max(0.0);
        }
        self.layout_dirty = true;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Raw edits
    // -----------------------------------------------------------------------

    /// Windows that can be moved around: everything except the root and bars.
    pub(crate) fn check_movable(&self, window: WindowId) -> DockResult<()> {
        match self.node(window)?.window_type() {
            WindowType::Root | WindowType::Bar => Err(DockError::RootWindowOperation(window)),
            _ => Ok(()),
        }
    }

    fn assert_container(&self, parent: WindowId) -> DockResult<WindowType> {
        let window_type = self.node(parent)?.window_type();
        assert!(
            window_type != WindowType::View,
            "view {} has no child windows",
            parent
        );
        Ok(window_type)
    }

    /// Detach `window` from wherever it is, remembering its location.
    pub(crate) fn detach_for_move(&mut self, window: WindowId) -> DockResult<()> {
        match self.parent(window) {
            Some(parent) => self.remove_child_window(parent, window),
            None => Ok(()),
        }
    }

    pub(crate) fn raw_remove(&mut self, parent: WindowId, child: WindowId) -> DockResult<usize> {
        let node = self.node_mut(parent)?;
        let index = match &mut node.kind {
            WindowKind::View(_) => panic!("view {} has no child windows", parent),
            WindowKind::Split(split) => {
                let index = if split.left == Some(child) { 0 } else { 1 };
                let slot = split
                    .slot_mut(child)
                    .ok_or(DockError::NotAChild { parent, child })?;
                *slot = None;
                index
            }
            WindowKind::Tab(strip) | WindowKind::Bar(BarData { strip, .. }) => {
                let index = strip
                    .index_of(child)
                    .ok_or(DockError::NotAChild { parent, child })?;
                strip.remove(index);
                index
            }
            WindowKind::Root(root) => {
                if root.window == Some(child) {
                    root.window = None;
                    0
                } else if root.bars.contains(&child) {
                    return Err(DockError::RootWindowOperation(child));
                } else {
                    return Err(DockError::NotAChild { parent, child });
                }
            }
        };
        if node.last_focused_child == Some(child) {
            node.last_focused_child = None;
        }
        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = None;
        }
        self.layout_dirty = true;
        Ok(index)
    }

    pub(crate) fn raw_replace(&mut self, parent: WindowId, old: WindowId, new: WindowId) -> DockResult<()> {
        let node = self.node_mut(parent)?;
        match &mut node.kind {
            WindowKind::View(_) => panic!("view {} has no child windows", parent),
            WindowKind::Split(split) => {
                *split
                    .slot_mut(old)
                    .ok_or(DockError::NotAChild { parent, child: old })? = Some(new);
            }
            WindowKind::Tab(strip) | WindowKind::Bar(BarData { strip, .. }) => {
                let index = strip
                    .index_of(old)
                    .ok_or(DockError::NotAChild { parent, child: old })?;
                strip.replace(index, new);
            }
            WindowKind::Root(root) => {
                if root.window == Some(old) {
                    root.window = Some(new);
                } else if root.bars.contains(&old) {
                    return Err(DockError::RootWindowOperation(old));
                } else {
                    return Err(DockError::NotAChild { parent, child: old });
                }
            }
        }
        if node.last_focused_child == Some(old) {
            node.last_focused_child = Some(new);
        }
        if let Some(old_node) = self.get_mut(old) {
            old_node.parent = None;
        }
        self.node_mut(new)?.parent = Some(parent);
        self.layout_dirty = true;
        Ok(())
    }

    pub(crate) fn raw_insert_tab(&mut self, tab_window: WindowId, window: WindowId, index: usize) -> DockResult<usize> {
        let node = self.node_mut(tab_window)?;
        let select_if_empty = node.window_type() == WindowType::Tab;
        let strip = node
            .kind
            .strip_mut()
            .ok_or(DockError::InvalidWindowType(tab_window))?;
        let index = strip.insert(index, window, select_if_empty);
        self.node_mut(window)?.parent = Some(tab_window);
        self.layout_dirty = true;
        Ok(index)
    }

    pub(crate) fn set_split_children(
        &mut self,
        split: WindowId,
        left: Option<WindowId>,
        right: Option<WindowId>,
    ) -> DockResult<()> {
        match &mut self.node_mut(split)?.kind {
            WindowKind::Split(data) => {
                data.left = left;
                data.right = right;
            }
            _ => return Err(DockError::InvalidWindowType(split)),
        }
        for child in left.into_iter().chain(right) {
            self.node_mut(child)?.parent = Some(split);
        }
        self.layout_dirty = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_root_view() -> (DockingTree<()>, WindowId) {
        let mut tree = DockingTree::new();
        let a = tree.create_view("A", ());
        tree.set_root_window(Some(a)).unwrap();
        (tree, a)
    }

    #[test]
    fn test_split_right_places_with_on_the_right() {
        let (mut tree, a) = tree_with_root_view();
        let b = tree.create_view("B", ());
        let split = tree.split(a, b, Direction::Right, 0.5).unwrap();

        let data = tree.split_data(split).unwrap();
        assert!(data.horizontal);
        assert_eq!(data.left, Some(a));
        assert_eq!(data.right, Some(b));
        assert!((data.divider_location - 0.5).abs() < f32::EPSILON);
        assert_eq!(tree.root_window(), Some(split));
    }

    #[test]
    fn test_split_up_places_with_on_top() {
        let (mut tree, a) = tree_with_root_view();
        let b = tree.create_view("B", ());
        let split = tree.split(a, b, Direction::Up, 0.25).unwrap();

        let data = tree.split_data(split).unwrap();
        assert!(!data.horizontal);
        assert_eq!(data.left, Some(b));
        assert_eq!(data.right, Some(a));
    }

    #[test]
    fn test_split_rejects_self_and_ancestors() {
        let (mut tree, a) = tree_with_root_view();
        let b = tree.create_view("B", ());
        let split = tree.split(a, b, Direction::Right, 0.5).unwrap();

        assert!(matches!(
            tree.split(a, a, Direction::Left, 0.5),
            Err(DockError::AncestorDrop { .. })
        ));
        assert!(matches!(
            tree.split(a, split, Direction::Left, 0.5),
            Err(DockError::AncestorDrop { .. })
        ));
        let root = tree.root();
        assert_eq!(
            tree.split(a, root, Direction::Left, 0.5),
            Err(DockError::RootWindowOperation(root))
        );
    }

    #[test]
    fn test_split_sole_tab_splits_tab_window() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let tab = tree.create_tab_window(&[a]).unwrap();
        tree.set_root_window(Some(tab)).unwrap();

        let split = tree.split(a, b, Direction::Down, 0.5).unwrap();
        assert_eq!(tree.child_windows(split), vec![tab, b]);
        assert_eq!(tree.parent(a), Some(tab));
    }

    #[test]
    fn test_remove_child_records_tab_location() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let c = tree.create_view("C", ());
        let tab = tree.create_tab_window(&[a, b, c]).unwrap();
        tree.set_root_window(Some(tab)).unwrap();
        tree.set_selected_tab(tab, Some(1)).unwrap();

        tree.remove_child_window(tab, b).unwrap();

        assert_eq!(tree.child_windows(tab), vec![a, c]);
        assert_eq!(tree.tab_strip(tab).unwrap().selected_window(), Some(c));
        assert!(matches!(
            tree.get(b).unwrap().last_location(),
            WindowLocation::Tab { tab_window, index: 1, .. } if *tab_window == tab
        ));
    }

    #[test]
    #[should_panic(expected = "has no child windows")]
    fn test_child_mutation_on_view_panics() {
        let (mut tree, a) = tree_with_root_view();
        let b = tree.create_view("B", ());
        let _ = tree.remove_child_window(a, b);
    }

    #[test]
    fn test_close_requires_flag() {
        let (mut tree, a) = tree_with_root_view();
        tree.set_flags(a, WindowFlags::all() - WindowFlags::CLOSABLE).unwrap();
        assert_eq!(
            tree.close(a),
            Err(DockError::NotPermitted {
                window: a,
                operation: "close"
            })
        );
        assert_eq!(tree.root_window(), Some(a));
    }

    #[test]
    fn test_close_and_restore_at_root() {
        let (mut tree, a) = tree_with_root_view();
        tree.close(a).unwrap();
        assert_eq!(tree.root_window(), None);
        assert_eq!(tree.get(a).unwrap().last_location(), &WindowLocation::Root);

        tree.restore(a).unwrap();
        assert_eq!(tree.root_window(), Some(a));
    }

    #[test]
    fn test_restore_without_location_splits_root() {
        let (mut tree, a) = tree_with_root_view();
        let b = tree.create_view("B", ());
        tree.restore(b).unwrap();

        let split = tree.root_window().unwrap();
        let data = tree.split_data(split).unwrap();
        assert_eq!((data.left, data.right), (Some(a), Some(b)));
        assert!(data.horizontal);
    }

    #[test]
    fn test_minimize_and_restore() {
        let (mut tree, a) = tree_with_root_view();
        let b = tree.create_view("B", ());
        tree.split(a, b, Direction::Right, 0.4).unwrap();

        tree.minimize(b, Some(Direction::Right)).unwrap();
        let bar = tree.window_bar(Direction::Right);
        assert!(tree.is_minimized(b));
        assert_eq!(tree.parent(b), Some(bar));
        assert!(tree.is_window_bar_enabled(Direction::Right));
        assert_eq!(tree.root_window(), Some(a));

        tree.restore(b).unwrap();
        assert!(!tree.is_minimized(b));
        let split = tree.root_window().unwrap();
        let data = tree.split_data(split).unwrap();
        assert_eq!((data.left, data.right), (Some(a), Some(b)));
        assert!((data.divider_location - 0.4).abs() < 1e-6);
        assert!(tree.child_windows(bar).is_empty());
    }

    #[test]
    fn test_minimize_uses_last_direction() {
        let (mut tree, a) = tree_with_root_view();
        tree.minimize(a, Some(Direction::Down)).unwrap();
        tree.restore(a).unwrap();
        tree.minimize(a, None).unwrap();
        assert_eq!(tree.parent(a), Some(tree.window_bar(Direction::Down)));
    }

    #[test]
    fn test_insert_existing_tab_reorders() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let c = tree.create_view("C", ());
        let tab = tree.create_tab_window(&[a, b, c]).unwrap();
        tree.set_root_window(Some(tab)).unwrap();

        tree.insert_tab(tab, a, 3).unwrap();
        assert_eq!(tree.child_windows(tab), vec![b, c, a]);
        assert_eq!(tree.title(tab), Some("B, C, A"));
    }

    #[test]
    fn test_set_selected_tab_validation() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let tab = tree.create_tab_window(&[a, b]).unwrap();

        assert!(tree.set_selected_tab(tab, None).is_err());
        assert!(tree.set_selected_tab(tab, Some(2)).is_err());
        assert_eq!(tree.set_selected_tab(a, Some(0)), Err(DockError::InvalidWindowType(a)));

        tree.set_selected_tab(tab, Some(1)).unwrap();
        assert!(tree.drain_events().contains(&DockingEvent::TabSelected {
            tab_window: tab,
            index: Some(1)
        }));
    }

    #[test]
    fn test_dispose_requires_detached() {
        let (mut tree, a) = tree_with_root_view();
        assert_eq!(tree.dispose_view(a), Err(DockError::ViewStillAttached(a)));
        tree.close(a).unwrap();
        tree.dispose_view(a).unwrap();
        assert!(!tree.contains(a));
        assert_eq!(tree.restore(a), Err(DockError::WindowNotFound(a)));
    }

    #[test]
    fn test_divider_is_clamped() {
        let (mut tree, a) = tree_with_root_view();
        let b = tree.create_view("B", ());
        let split = tree.split(a, b, Direction::Left, 0.5).unwrap();
        tree.set_divider_location(split, 3.0).unwrap();
        assert_eq!(tree.split_data(split).unwrap().divider_location, 1.0);
        assert_eq!(
            tree.set_divider_location(a, 0.5),
            Err(DockError::InvalidWindowType(a))
        );
    }
}
