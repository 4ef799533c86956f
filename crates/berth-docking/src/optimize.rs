//! Batched structural edits.
//!
//! A logical operation (dragging one view onto another, say) is several raw
//! edits: detach, create a container, attach, and so on. Each public mutation
//! opens an [`OptimizeGuard`]; nested guards just deepen the transaction. When the
//! outermost guard drops, the affected part of the tree is pruned once, post-order:
//!
//! - a split with one child is replaced by that child, with none it is removed;
//! - a tab window with no children is removed;
//! - a tab window with one child is unwrapped when its parent already shows
//!   titles (tab window or window bar) or the child is a split or tab window;
//! - with recursive tabs disabled, a tab window inside a tab window is flattened
//!   into it.
//!
//! Pruning a container re-checks its parent, so collapses cascade upwards past
//! the window the pass started from. Pruned containers are disposed. Events raised during the transaction are
//! released afterwards.

use std::ops::{Deref, DerefMut};

use crate::node::{WindowKind, WindowType};
use crate::tree::DockingTree;
use crate::types::WindowId;

#[derive(Debug, Default)]
pub(crate) struct Transaction {
    pub(crate) depth: u32,
    pending: Vec<WindowId>,
}

/// Scoped transaction over a [`DockingTree`].
///
/// Dereferences to the tree, so further mutations (including nested
/// transactions) go through the guard.
pub struct OptimizeGuard<'a, C> {
    tree: &'a mut DockingTree<C>,
}

impl<C> Deref for OptimizeGuard<'_, C> {
    type Target = DockingTree<C>;

    fn deref(&self) -> &Self::Target {
        self.tree
    }
}

impl<C> DerefMut for OptimizeGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.tree
    }
}

impl<C> Drop for OptimizeGuard<'_, C> {
    fn drop(&mut self) {
        self.tree.end_optimize();
    }
}

impl<C> DockingTree<C> {
    /// Open a transaction that re-optimizes around `window` when it ends.
    pub fn begin_optimize(&mut self, window: WindowId) -> OptimizeGuard<'_, C> {
        if !self.transaction.pending.contains(&window) {
            self.transaction.pending.push(window);
        }
        self.begin_transaction()
    }

    /// Open a transaction without marking any window for optimization.
    pub fn begin_transaction(&mut self) -> OptimizeGuard<'_, C> {
        self.transaction.depth += 1;
        if let Some(root) = self.root_data_mut() {
            root.ignore_focus_changes += 1;
        }
        OptimizeGuard { tree: self }
    }

    /// Whether a transaction is open.
    pub fn in_transaction(&self) -> bool {
        self.transaction.depth > 0
    }

    fn end_optimize(&mut self) {
        if let Some(root) = self.root_data_mut() {
            root.ignore_focus_changes = root.ignore_focus_changes.saturating_sub(1);
        }
        self.transaction.depth = self.transaction.depth.saturating_sub(1);
        if self.transaction.depth > 0 {
            return;
        }

        // Hold the depth while pruning so the pass's own events are batched too.
        self.transaction.depth = 1;
        let pending = std::mem::take(&mut self.transaction.pending);
        self.run_optimize(pending);
        self.transaction.depth = 0;
        self.layout_dirty = true;

        let nodes = &self.nodes;
        self.events.flush(|window| nodes.contains_key(&window));

        #[cfg(debug_assertions)]
        if let Err(err) = self.validate() {
            panic!("Docking tree invalid after transaction: {}", err);
        }
    }

    fn run_optimize(&mut self, pending: Vec<WindowId>) {
        let (attached, detached): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .filter(|&window| self.contains(window))
            .partition(|&window| self.is_attached(window));

        if let Some(ancestor) = self.common_ancestor(&attached) {
            tracing::trace!("Optimizing layout below {}", ancestor);
            self.optimize_window_layout(ancestor);
        }

        let mut tops: Vec<WindowId> = Vec::new();
        for window in detached {
            let top = self.detached_top(window);
            if !tops.contains(&top) {
                tops.push(top);
            }
        }
        for top in tops {
            if self.contains(top) {
                self.optimize_window_layout(top);
            }
        }
    }

    /// Lowest window that is an ancestor of (or equal to) every window in `windows`.
    fn common_ancestor(&self, windows: &[WindowId]) -> Option<WindowId> {
        let chain_of = |window: WindowId| {
            let mut chain = self.ancestors(window);
            chain.reverse();
            chain.push(window);
            chain
        };

        let (&first, rest) = windows.split_first()?;
        let mut common = chain_of(first);
        for &window in rest {
            let chain = chain_of(window);
            let shared = common
                .iter()
                .zip(chain.iter())
                .take_while(|(a, b)| a == b)
                .count();
            common.truncate(shared);
        }
        common.last().copied()
    }

    /// Prune `window`'s subtree bottom-up.
    pub(crate) fn optimize_window_layout(&mut self, window: WindowId) {
        for child in self.child_windows(window) {
            if self.contains(child) {
                self.optimize_window_layout(child);
            }
        }
        self.optimize_node(window);
    }

    fn optimize_node(&mut self, window: WindowId) {
        let Some(node) = self.get(window) else {
            return;
        };
        let parent = node.parent;

        match &node.kind {
            WindowKind::Split(split) => match split.children().collect::<Vec<_>>()[..] {
                [] => self.prune(window, parent, None),
                [only] => self.prune(window, parent, Some(only)),
                _ => {}
            },
            WindowKind::Tab(strip) => {
                let children = strip.tabs().to_vec();
                let parent_type = parent.and_then(|parent| self.window_type(parent));

                if children.is_empty() {
                    self.prune(window, parent, None);
                } else if let Some(parent) = parent
                    && parent_type == Some(WindowType::Tab)
                    && !self.effective_config(window).recursive_tabs_enabled
                {
                    self.flatten_tab(window, parent);
                } else if let [only] = children[..]
                    && parent.is_some()
                {
                    let parent_shows_titles =
                        matches!(parent_type, Some(WindowType::Tab | WindowType::Bar));
                    let child_has_own_title = matches!(
                        self.window_type(only),
                        Some(WindowType::Split | WindowType::Tab)
                    );
                    if parent_shows_titles || child_has_own_title {
                        self.prune(window, parent, Some(only));
                    }
                }
            }
            _ => {}
        }
    }

    /// Take `window` out of the tree, putting `replacement` (one of its children)
    /// in its place, and dispose it.
    fn prune(&mut self, window: WindowId, parent: Option<WindowId>, replacement: Option<WindowId>) {
        tracing::trace!(
            "Pruning {} (replacement {:?})",
            window,
            replacement.map(|r| r.to_string())
        );

        let result = match (parent, replacement) {
            (Some(parent), Some(child)) => self.raw_replace(parent, window, child),
            (Some(parent), None) => self.raw_remove(parent, window).map(|_| ()),
            (None, Some(child)) => {
                if let Some(node) = self.get_mut(child) {
                    node.parent = None;
                }
                Ok(())
            }
            (None, None) => Ok(()),
        };
        if let Err(err) = result {
            tracing::warn!("Failed to prune {}: {}", window, err);
            return;
        }

        self.dispose(window);

        if let Some(parent) = parent {
            self.fire_title_changed(parent);
            // The replacement now sits under a different parent; its own rule may apply.
            if let Some(child) = replacement {
                self.optimize_node(child);
            }
            // The parent lost a child or changed its child's kind, so it may be
            // degenerate now even if it was already visited.
            self.optimize_node(parent);
        }
    }

    /// Move every tab of `window` into its parent tab window, in place.
    fn flatten_tab(&mut self, window: WindowId, parent: WindowId) {
        let Some(strip) = self.get_mut(window).and_then(|node| node.kind.strip_mut()) else {
            return;
        };
        let selected_child = strip.selected_window();
        let children = strip.take_all();

        let Some(parent_strip) = self.get_mut(parent).and_then(|node| node.kind.strip_mut()) else {
            return;
        };
        let was_selected = parent_strip.selected_window() == Some(window);
        let Some(index) = parent_strip.index_of(window) else {
            return;
        };
        parent_strip.remove(index);
        for (offset, &child) in children.iter().enumerate() {
            parent_strip.insert(index + offset, child, true);
        }
        if was_selected
            && let Some(selected) = selected_child.and_then(|child| parent_strip.index_of(child))
        {
            parent_strip.select(Some(selected));
        }

        for child in children {
            if let Some(node) = self.get_mut(child) {
                node.parent = Some(parent);
            }
        }
        tracing::trace!("Flattened tab window {} into {}", window, parent);
        self.dispose(window);
        self.fire_title_changed(parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn test_nested_guards_optimize_once_at_end() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        tree.set_root_window(Some(a)).unwrap();
        let split = tree.split(a, b, Direction::Right, 0.5).unwrap();

        {
            let mut outer = tree.begin_optimize(split);
            assert!(outer.in_transaction());
            outer.remove_child_window(split, b).unwrap();
            // Still a one-child split until the outermost guard drops.
            assert_eq!(outer.window_type(split), Some(WindowType::Split));
            {
                let inner = outer.begin_optimize(split);
                assert_eq!(inner.root_data().unwrap().ignore_focus_changes, 2);
            }
            assert!(outer.contains(split));
        }

        assert!(!tree.in_transaction());
        assert!(!tree.contains(split));
        assert_eq!(tree.root_window(), Some(a));
        assert_eq!(tree.root_data().unwrap().ignore_focus_changes, 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid after transaction")]
    fn test_unpruned_edit_fails_validation() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        tree.set_root_window(Some(a)).unwrap();
        let split = tree.split(a, b, Direction::Right, 0.5).unwrap();

        // A raw edit outside any pending window is never pruned.
        let mut tx = tree.begin_transaction();
        tx.raw_remove(split, b).unwrap();
    }

    #[test]
    fn test_emptied_tab_prunes_parent_split() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        tree.set_root_window(Some(a)).unwrap();
        let tab = tree.create_tab_window(&[b]).unwrap();
        let split = tree.split(a, tab, Direction::Right, 0.5).unwrap();

        // Only the tab window is marked; its split collapses with it.
        tree.remove_child_window(tab, b).unwrap();
        assert!(!tree.contains(tab));
        assert!(!tree.contains(split));
        assert_eq!(tree.root_window(), Some(a));
        tree.validate().unwrap();
    }

    #[test]
    fn test_single_view_tab_kept_under_split() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let c = tree.create_view("C", ());
        let tab = tree.create_tab_window(&[a, b]).unwrap();
        tree.set_root_window(Some(tab)).unwrap();
        tree.split(tab, c, Direction::Left, 0.5).unwrap();

        tree.close(b).unwrap();
        assert_eq!(tree.child_windows(tab), vec![a]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_tab_with_split_child_is_unwrapped() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let c = tree.create_view("C", ());
        let tab = tree.create_tab_window(&[a, c]).unwrap();
        tree.set_root_window(Some(tab)).unwrap();

        // Splitting `a` inside the tab leaves [split(a, b), c]; closing `c`
        // leaves a tab around a split, which is unwrapped.
        let split = tree.split(a, b, Direction::Down, 0.5).unwrap();
        tree.close(c).unwrap();

        assert!(!tree.contains(tab));
        assert_eq!(tree.root_window(), Some(split));
        tree.validate().unwrap();
    }

    #[test]
    fn test_nested_tab_flattened_without_recursive_tabs() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let c = tree.create_view("C", ());
        let d = tree.create_view("D", ());
        let outer = tree.create_tab_window(&[a, b]).unwrap();
        tree.set_root_window(Some(outer)).unwrap();
        let inner = tree.create_tab_window(&[c, d]).unwrap();

        tree.insert_tab(outer, inner, 1).unwrap();

        assert!(!tree.contains(inner));
        assert_eq!(tree.child_windows(outer), vec![a, c, d, b]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_nested_tab_kept_with_recursive_tabs() {
        let mut tree: DockingTree<()> = DockingTree::new();
        tree.config_mut().recursive_tabs_enabled = true;
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let c = tree.create_view("C", ());
        let d = tree.create_view("D", ());
        let outer = tree.create_tab_window(&[a, b]).unwrap();
        tree.set_root_window(Some(outer)).unwrap();
        let inner = tree.create_tab_window(&[c, d]).unwrap();

        tree.add_tab(outer, inner).unwrap();

        assert!(tree.contains(inner));
        assert_eq!(tree.child_windows(outer), vec![a, b, inner]);
        assert_eq!(tree.title(outer), Some("A, B, C, D"));
    }

    #[test]
    fn test_detached_split_pruned_after_close() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let c = tree.create_view("C", ());
        tree.set_root_window(Some(a)).unwrap();
        let split = tree.split(a, b, Direction::Right, 0.5).unwrap();

        // Replacing the root window detaches the split; taking `a` out of it
        // leaves a detached one-child split.
        tree.set_root_window(Some(c)).unwrap();
        tree.remove_child_window(split, a).unwrap();

        assert!(!tree.contains(split));
        assert_eq!(tree.parent(b), None);
        assert_eq!(tree.root_window(), Some(c));
    }
}
