//! Focus tracking and deferred focus restoration.
//!
//! The host reports focus changes through [`DockingTree::on_view_focus_gained`].
//! While a transaction is open those reports are ignored, since moving windows
//! around makes the host toolkit drop and regain focus on its own.
//!
//! [`DockingTree::restore_focus`] does not focus immediately: the host swaps
//! content asynchronously, so the request waits two idle cycles
//! ([`DockingTree::run_idle`]) before it resolves to a view.

use crate::events::DockingEvent;
use crate::node::WindowKind;
use crate::tree::DockingTree;
use crate::types::WindowId;

/// Idle cycles a focus request waits before it runs.
pub const FOCUS_RESTORE_HOPS: u8 = 2;

#[derive(Debug, Clone, Copy)]
struct FocusTask {
    window: WindowId,
    hops_left: u8,
}

#[derive(Debug, Default)]
pub(crate) struct FocusQueue {
    tasks: Vec<FocusTask>,
}

impl FocusQueue {
    fn schedule(&mut self, window: WindowId) {
        self.tasks.retain(|task| task.window != window);
        self.tasks.push(FocusTask {
            window,
            hops_left: FOCUS_RESTORE_HOPS,
        });
    }

    /// Advance every task by one hop and return the ones that are due.
    fn advance(&mut self) -> Vec<WindowId> {
        let mut due = Vec::new();
        self.tasks.retain_mut(|task| {
            task.hops_left = task.hops_left.saturating_sub(1);
            if task.hops_left == 0 {
                due.push(task.window);
                false
            } else {
                true
            }
        });
        due
    }

    fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<C> DockingTree<C> {
    /// The view that last gained focus.
    pub fn focused_view(&self) -> Option<WindowId> {
        self.root_data().and_then(|root| root.focused_view)
    }

    /// Host callback: `view` gained keyboard focus.
    ///
    /// Records the view on the root and as the last focused child of every
    /// ancestor, and selects the tab holding it in each ancestor tab window.
    pub fn on_view_focus_gained(&mut self, view: WindowId) {
        let Some(root) = self.root_data() else {
            return;
        };
        if root.ignore_focus_changes > 0 {
            tracing::trace!("Ignoring focus change to {} during transaction", view);
            return;
        }
        let previous = root.focused_view;
        if self.view(view).is_none() || !self.is_attached(view) {
            return;
        }

        let mut child = view;
        for ancestor in self.ancestors(view) {
            let Some(node) = self.get_mut(ancestor) else {
                break;
            };
            node.last_focused_child = Some(child);
            if let WindowKind::Tab(strip) = &mut node.kind
                && let Some(index) = strip.index_of(child)
                && strip.select(Some(index)).is_some()
            {
                self.layout_dirty = true;
                self.emit(DockingEvent::TabSelected {
                    tab_window: ancestor,
                    index: Some(index),
                });
            }
            child = ancestor;
        }

        if let Some(root) = self.root_data_mut() {
            root.focused_view = Some(view);
        }
        if previous != Some(view) {
            tracing::trace!("Focus moved to {}", view);
            self.emit(DockingEvent::ViewFocusChanged {
                previous,
                focused: Some(view),
            });
        }
    }

    /// Request focus for the view `window` resolves to, after two idle cycles.
    pub fn restore_focus(&mut self, window: WindowId) {
        self.focus_tasks.schedule(window);
    }

    /// Whether focus requests are waiting for idle cycles.
    pub fn has_pending_focus(&self) -> bool {
        !self.focus_tasks.is_empty()
    }

    /// Host callback: the UI thread went idle.
    pub fn run_idle(&mut self) {
        for window in self.focus_tasks.advance() {
            if let Some(view) = self.focus_target(window) {
                self.emit(DockingEvent::FocusRequested(view));
                self.on_view_focus_gained(view);
            }
        }
    }

    /// View that should receive focus when `window` is focused: descend through
    /// selected tabs and last focused children.
    pub fn focus_target(&self, window: WindowId) -> Option<WindowId> {
        let mut current = window;
        loop {
            let node = self.get(current)?;
            let remembered = node
                .last_focused_child
                .filter(|&child| self.parent(child) == Some(current));
            current = match &node.kind {
                WindowKind::View(_) => return Some(current),
                WindowKind::Tab(strip) => strip.selected_window().or(remembered)?,
                WindowKind::Bar(bar) => bar.strip.selected_window().or(remembered)?,
                WindowKind::Split(split) => remembered.or(split.left).or(split.right)?,
                WindowKind::Root(root) => remembered.filter(|_| root.window.is_some()).or(root.window)?,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn test_focus_records_ancestors_and_selects_tab() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let c = tree.create_view("C", ());
        let tab = tree.create_tab_window(&[a, b]).unwrap();
        tree.set_root_window(Some(tab)).unwrap();
        let split = tree.split(tab, c, Direction::Right, 0.5).unwrap();
        tree.drain_events();

        tree.on_view_focus_gained(b);

        assert_eq!(tree.focused_view(), Some(b));
        assert_eq!(tree.tab_strip(tab).unwrap().selected_window(), Some(b));
        assert_eq!(tree.get(tab).unwrap().last_focused_child(), Some(b));
        assert_eq!(tree.get(split).unwrap().last_focused_child(), Some(tab));
        let events = tree.drain_events();
        assert!(events.contains(&DockingEvent::ViewFocusChanged {
            previous: None,
            focused: Some(b)
        }));
    }

    #[test]
    fn test_focus_ignored_inside_transaction() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        tree.set_root_window(Some(a)).unwrap();
        let root = tree.root();
        {
            let mut tx = tree.begin_optimize(root);
            tx.on_view_focus_gained(a);
        }
        assert_eq!(tree.focused_view(), None);
        tree.on_view_focus_gained(a);
        assert_eq!(tree.focused_view(), Some(a));
    }

    #[test]
    fn test_restore_focus_waits_two_idle_cycles() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        tree.set_root_window(Some(a)).unwrap();
        let split = tree.split(a, b, Direction::Down, 0.5).unwrap();
        tree.on_view_focus_gained(b);
        tree.on_view_focus_gained(a);
        assert_eq!(tree.get(split).unwrap().last_focused_child(), Some(a));
        tree.drain_events();

        tree.restore_focus(b);
        tree.run_idle();
        assert!(tree.has_pending_focus());
        assert_eq!(tree.focused_view(), Some(a));

        tree.run_idle();
        assert!(!tree.has_pending_focus());
        assert_eq!(tree.focused_view(), Some(b));
        assert!(tree.drain_events().contains(&DockingEvent::FocusRequested(b)));
    }

    #[test]
    fn test_focus_target_descends_selected_tab() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let tab = tree.create_tab_window(&[a, b]).unwrap();
        tree.set_root_window(Some(tab)).unwrap();
        tree.set_selected_tab(tab, Some(1)).unwrap();

        assert_eq!(tree.focus_target(tree.root()), Some(b));
        assert_eq!(tree.focus_target(a), Some(a));
    }
}
