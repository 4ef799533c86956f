//! The docking arena.

use berth_core::alloc::HashSet;
use berth_core::geometry::Rect;
use indexmap::IndexMap;

use crate::config::{ConfigOverrides, DockingConfig};
use crate::drag::{DragOverlay, WindowDragger};
use crate::error::{DockError, DockResult};
use crate::events::{DockingEvent, EventQueue};
use crate::focus::FocusQueue;
use crate::node::{BarData, RootData, SplitData, View, WindowKind, WindowNode, WindowType};
use crate::optimize::Transaction;
use crate::popup::{PopupMenu, PopupMenuFactory};
use crate::tab_strip::TabStrip;
use crate::types::{Direction, WindowFlags, WindowId};

/// Window tree of one docking area.
///
/// Nodes live in an arena addressed by [`WindowId`]. Each node stores its
/// parent's handle and containers own their children's handles, so there are no
/// reference cycles. A tree always has exactly one root window with four window
/// bars; everything else is created by the application or by the engine.
pub struct DockingTree<C> {
    pub(crate) nodes: IndexMap<WindowId, WindowNode<C>>,
    next_id: WindowId,
    root: WindowId,
    pub(crate) config: DockingConfig,
    pub(crate) transaction: Transaction,
    pub(crate) events: EventQueue,
    pub(crate) focus_tasks: FocusQueue,
    pub(crate) dragger: Option<WindowDragger>,
    pub(crate) area: Rect,
    pub(crate) layout_dirty: bool,
    popup_factory: Option<Box<dyn PopupMenuFactory<C>>>,
}

impl<C> DockingTree<C> {
    pub fn new() -> Self {
        Self::with_config(DockingConfig::default())
    }

    pub fn with_config(config: DockingConfig) -> Self {
        let root = WindowId::first();
        let mut tree = Self {
            nodes: IndexMap::new(),
            next_id: root.next(),
            root,
            config,
            transaction: Transaction::default(),
            events: EventQueue::default(),
            focus_tasks: FocusQueue::default(),
            dragger: None,
            area: Rect::ZERO,
            layout_dirty: true,
            popup_factory: None,
        };

        let bars = Direction::ALL.map(|direction| {
            tree.alloc(WindowKind::Bar(BarData {
                strip: TabStrip::new(),
                direction,
                enabled: false,
                content_size: tree.config.bar_content_size,
            }))
        });
        tree.nodes.insert(
            root,
            WindowNode::new(WindowKind::Root(RootData {
                window: None,
                bars,
                focused_view: None,
                ignore_focus_changes: 0,
                overlay: DragOverlay::default(),
            })),
        );
        for bar in bars {
            if let Some(node) = tree.nodes.get_mut(&bar) {
                node.parent = Some(root);
            }
        }
        tracing::debug!("Created docking tree with root {}", root);
        tree
    }

    pub(crate) fn alloc(&mut self, kind: WindowKind<C>) -> WindowId {
        let id = self.next_id;
        self.next_id = id.next();
        self.nodes.insert(id, WindowNode::new(kind));
        id
    }

    /// Remove a node from the arena. Children are left untouched.
    pub(crate) fn dispose(&mut self, id: WindowId) {
        if self.nodes.shift_remove(&id).is_some() {
            tracing::trace!("Disposed window {}", id);
            if let Some(root) = self.root_data_mut()
                && root.focused_view == Some(id)
            {
                root.focused_view = None;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// The root window.
    pub fn root(&self) -> WindowId {
        self.root
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowNode<C>> {
        self.nodes.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: WindowId) -> Option<&mut WindowNode<C>> {
        self.nodes.get_mut(&id)
    }

    pub fn node(&self, id: WindowId) -> DockResult<&WindowNode<C>> {
        self.nodes.get(&id).ok_or(DockError::WindowNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: WindowId) -> DockResult<&mut WindowNode<C>> {
        self.nodes.get_mut(&id).ok_or(DockError::WindowNotFound(id))
    }

    pub fn window_type(&self, id: WindowId) -> Option<WindowType> {
        self.get(id).map(WindowNode::window_type)
    }

    /// All windows in the arena, attached or not.
    pub fn windows(&self) -> impl Iterator<Item = (WindowId, &WindowNode<C>)> {
        self.nodes.iter().map(|(&id, node)| (id, node))
    }

    pub fn window_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn parent(&self, id: WindowId) -> Option<WindowId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Child windows in order. The root lists its window followed by the bars.
    pub fn child_windows(&self, id: WindowId) -> Vec<WindowId> {
        self.get(id).map(|node| node.kind.children()).unwrap_or_default()
    }

    /// Number of children, not counting the root's bars.
    pub fn child_count(&self, id: WindowId) -> usize {
        match self.get(id).map(|node| &node.kind) {
            Some(WindowKind::Root(root)) => usize::from(root.window.is_some()),
            Some(kind) => kind.children().len(),
            None => 0,
        }
    }

    pub fn child_index(&self, parent: WindowId, child: WindowId) -> Option<usize> {
        self.child_windows(parent).iter().position(|&c| c == child)
    }

    /// Top-level window of the main area.
    pub fn root_window(&self) -> Option<WindowId> {
        self.root_data().and_then(|root| root.window)
    }

    /// The window bar on `direction`'s edge.
    pub fn window_bar(&self, direction: Direction) -> WindowId {
        self.root_data()
            .map(|root| root.bars[direction.index()])
            .unwrap_or(self.root)
    }

    pub(crate) fn root_data(&self) -> Option<&RootData> {
        self.get(self.root).and_then(WindowNode::as_root)
    }

    pub(crate) fn root_data_mut(&mut self) -> Option<&mut RootData> {
        match self.nodes.get_mut(&self.root).map(|node| &mut node.kind) {
            Some(WindowKind::Root(root)) => Some(root),
            _ => None,
        }
    }

    pub fn view(&self, id: WindowId) -> Option<&View<C>> {
        self.get(id).and_then(WindowNode::as_view)
    }

    pub fn view_mut(&mut self, id: WindowId) -> Option<&mut View<C>> {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(WindowKind::View(view)) => Some(view),
            _ => None,
        }
    }

    pub fn split_data(&self, id: WindowId) -> Option<&SplitData> {
        self.get(id).and_then(WindowNode::as_split)
    }

    pub fn tab_strip(&self, id: WindowId) -> Option<&TabStrip> {
        self.get(id).and_then(WindowNode::strip)
    }

    pub fn title(&self, id: WindowId) -> Option<&str> {
        self.get(id).map(WindowNode::title)
    }

    pub fn bounds(&self, id: WindowId) -> Option<Rect> {
        self.get(id).and_then(WindowNode::bounds)
    }

    // -----------------------------------------------------------------------
    // Ancestry
    // -----------------------------------------------------------------------

    /// Parent chain of `id`, nearest first, excluding `id`.
    pub fn ancestors(&self, id: WindowId) -> Vec<WindowId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent(parent);
        }
        chain
    }

    /// Whether `ancestor` is a strict ancestor of `window`.
    pub fn is_ancestor(&self, ancestor: WindowId, window: WindowId) -> bool {
        let mut current = self.parent(window);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Whether the parent chain of `id` ends at the root.
    pub fn is_attached(&self, id: WindowId) -> bool {
        id == self.root || self.is_ancestor(self.root, id)
    }

    /// Whether `id` sits inside a window bar.
    pub fn is_minimized(&self, id: WindowId) -> bool {
        self.containing_bar(id).is_some()
    }

    /// Window bar `id` is minimized in, if any.
    pub fn containing_bar(&self, id: WindowId) -> Option<WindowId> {
        self.ancestors(id)
            .into_iter()
            .find(|&ancestor| self.window_type(ancestor) == Some(WindowType::Bar))
    }

    /// Topmost detached ancestor of `id` (or `id` itself).
    pub(crate) fn detached_top(&self, id: WindowId) -> WindowId {
        self.ancestors(id).last().copied().unwrap_or(id)
    }

    /// `id` and all its descendants, pre-order.
    pub fn subtree(&self, id: WindowId) -> Vec<WindowId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            let children = self.child_windows(current);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Tree-wide defaults.
    pub fn config(&self) -> &DockingConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut DockingConfig {
        self.layout_dirty = true;
        &mut self.config
    }

    /// Defaults overlaid with the overrides of every ancestor, nearest last.
    pub fn effective_config(&self, id: WindowId) -> DockingConfig {
        let mut chain: Vec<&ConfigOverrides> = Vec::new();
        if let Some(node) = self.get(id) {
            chain.push(&node.overrides);
        }
        for ancestor in self.ancestors(id) {
            if let Some(node) = self.get(ancestor) {
                chain.push(&node.overrides);
            }
        }
        chain.reverse();
        ConfigOverrides::resolve(&self.config, chain)
    }

    pub fn set_overrides(&mut self, id: WindowId, overrides: ConfigOverrides) -> DockResult<()> {
        self.node_mut(id)?.overrides = overrides;
        self.layout_dirty = true;
        Ok(())
    }

    pub fn flags(&self, id: WindowId) -> WindowFlags {
        self.get(id).map(WindowNode::flags).unwrap_or_else(WindowFlags::empty)
    }

    pub fn set_flags(&mut self, id: WindowId, flags: WindowFlags) -> DockResult<()> {
        self.node_mut(id)?.flags = flags;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Titles
    // -----------------------------------------------------------------------

    /// Change a view's title and propagate it to its ancestors.
    pub fn set_title(&mut self, view: WindowId, title: impl Into<String>) -> DockResult<()> {
        let title = title.into();
        let exists = self.contains(view);
        match self.view_mut(view) {
            Some(data) => data.title = title,
            None if exists => return Err(DockError::InvalidWindowType(view)),
            None => return Err(DockError::WindowNotFound(view)),
        }
        self.fire_title_changed(view);
        Ok(())
    }

    fn compute_title(&self, id: WindowId) -> String {
        match self.get(id).map(|node| &node.kind) {
            Some(WindowKind::View(view)) => view.title.clone(),
            Some(WindowKind::Root(root)) => root
                .window
                .and_then(|window| self.title(window))
                .unwrap_or_default()
                .to_string(),
            Some(kind) => kind
                .children()
                .iter()
                .filter_map(|&child| self.title(child))
                .collect::<Vec<_>>()
                .join(", "),
            None => String::new(),
        }
    }

    /// Recompute the title of `id` and every ancestor, raising
    /// [`DockingEvent::TitleChanged`] where it changed.
    pub(crate) fn fire_title_changed(&mut self, id: WindowId) {
        let mut current = Some(id);
        while let Some(window) = current {
            let title = self.compute_title(window);
            let Some(node) = self.get_mut(window) else {
                break;
            };
            if node.title != title {
                node.title = title.clone();
                self.emit(DockingEvent::TitleChanged { window, title });
            }
            current = self.parent(window);
        }
    }

    // -----------------------------------------------------------------------
    // Events and popup menus
    // -----------------------------------------------------------------------

    pub(crate) fn emit(&mut self, event: DockingEvent) {
        let in_transaction = self.transaction.depth > 0;
        self.events.push(event, in_transaction);
    }

    /// Take every event released so far.
    pub fn drain_events(&mut self) -> Vec<DockingEvent> {
        self.events.drain()
    }

    pub fn set_popup_menu_factory(&mut self, factory: Option<Box<dyn PopupMenuFactory<C>>>) {
        self.popup_factory = factory;
    }

    /// Context menu for `window`, as produced by the installed factory.
    pub fn popup_menu(&self, window: WindowId) -> Option<PopupMenu> {
        let factory = self.popup_factory.as_ref()?;
        if !self.contains(window) {
            return None;
        }
        factory.popup_menu(self, window)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Check the structural invariants of the attached tree.
    ///
    /// Every child lists its container as parent exactly once, no attached split
    /// has fewer than two children, no attached tab window is empty, and a
    /// one-tab tab window only wraps a view under a container that does not show
    /// titles.
    pub fn validate(&self) -> DockResult<()> {
        let mut seen = HashSet::new();
        for id in self.subtree(self.root) {
            if !seen.insert(id) {
                return Err(DockError::InvalidLayout(format!(
                    "window {} is reachable twice",
                    id
                )));
            }
            let node = self.node(id)?;
            for child in node.kind.children() {
                let child_node = self.node(child)?;
                if child_node.parent != Some(id) {
                    return Err(DockError::InvalidLayout(format!(
                        "window {} is listed by {} but its parent is {:?}",
                        child, id, child_node.parent
                    )));
                }
            }

            match &node.kind {
                WindowKind::Split(split) if split.child_count() < 2 => {
                    return Err(DockError::InvalidLayout(format!(
                        "split {} has {} children",
                        id,
                        split.child_count()
                    )));
                }
                WindowKind::Tab(strip) => {
                    if strip.is_empty() {
                        return Err(DockError::InvalidLayout(format!("tab window {} is empty", id)));
                    }
                    if strip.selected().is_none() {
                        return Err(DockError::InvalidLayout(format!(
                            "tab window {} has no selection",
                            id
                        )));
                    }
                    if strip.len() == 1 {
                        let child_is_view =
                            self.window_type(strip.tabs()[0]) == Some(WindowType::View);
                        let parent_shows_titles = node
                            .parent
                            .and_then(|parent| self.get(parent))
                            .is_some_and(|parent| parent.kind.shows_titles());
                        if !child_is_view || parent_shows_titles {
                            return Err(DockError::InvalidLayout(format!(
                                "tab window {} should have been unwrapped",
                                id
                            )));
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl<C> Default for DockingTree<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for DockingTree<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockingTree")
            .field("root", &self.root)
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_has_root_and_bars() {
        let tree: DockingTree<()> = DockingTree::new();
        assert_eq!(tree.window_type(tree.root()), Some(WindowType::Root));
        assert_eq!(tree.root_window(), None);
        for direction in Direction::ALL {
            let bar = tree.window_bar(direction);
            assert_eq!(tree.window_type(bar), Some(WindowType::Bar));
            assert_eq!(tree.parent(bar), Some(tree.root()));
            assert!(tree.is_attached(bar));
        }
        assert_eq!(tree.window_count(), 5);
        tree.validate().unwrap();
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        tree.dispose_view(a).unwrap();
        let b = tree.create_view("B", ());
        assert_ne!(a, b);
        assert!(!tree.contains(a));
        assert!(tree.node(a).is_err());
    }

    #[test]
    fn test_titles_join_children() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        let tab = tree.create_tab_window(&[a, b]).unwrap();
        tree.set_root_window(Some(tab)).unwrap();

        assert_eq!(tree.title(tab), Some("A, B"));
        assert_eq!(tree.title(tree.root()), Some("A, B"));

        tree.set_title(b, "Beta").unwrap();
        assert_eq!(tree.title(tab), Some("A, Beta"));
        assert_eq!(tree.set_title(tab, "x"), Err(DockError::InvalidWindowType(tab)));

        let gone = tree.create_view("Gone", ());
        tree.dispose_view(gone).unwrap();
        assert_eq!(tree.set_title(gone, "x"), Err(DockError::WindowNotFound(gone)));
    }

    #[test]
    fn test_effective_config_uses_ancestors() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        tree.set_root_window(Some(a)).unwrap();
        let split = tree.split(a, b, Direction::Right, 0.5).unwrap();

        tree.set_overrides(
            split,
            ConfigOverrides {
                edge_split_distance: Some(40.0),
                ..Default::default()
            },
        )
        .unwrap();
        tree.set_overrides(
            b,
            ConfigOverrides {
                edge_split_distance: Some(2.0),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(tree.effective_config(a).edge_split_distance, 40.0);
        assert_eq!(tree.effective_config(b).edge_split_distance, 2.0);
        assert_eq!(
            tree.effective_config(tree.root()).edge_split_distance,
            tree.config().edge_split_distance
        );
    }

    #[test]
    fn test_ancestry_queries() {
        let mut tree: DockingTree<()> = DockingTree::new();
        let a = tree.create_view("A", ());
        let b = tree.create_view("B", ());
        tree.set_root_window(Some(a)).unwrap();
        let split = tree.split(a, b, Direction::Down, 0.5).unwrap();

        assert!(tree.is_ancestor(split, a));
        assert!(tree.is_ancestor(tree.root(), a));
        assert!(!tree.is_ancestor(a, a));
        assert_eq!(tree.ancestors(b), vec![split, tree.root()]);
        assert_eq!(tree.subtree(split), vec![split, a, b]);
        assert!(!tree.is_minimized(a));
    }
}
