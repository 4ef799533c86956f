//! Window nodes stored in the docking arena.

use berth_core::geometry::Rect;

use crate::config::ConfigOverrides;
use crate::drag::{DragOverlay, WindowMover};
use crate::location::WindowLocation;
use crate::tab_strip::TabStrip;
use crate::types::{Direction, WindowFlags, WindowId};

/// Kind of a window, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowType {
    View,
    Split,
    Tab,
    Bar,
    Root,
}

/// Leaf window wrapping application content.
#[derive(Debug, Clone)]
pub struct View<C> {
    pub title: String,
    pub icon: Option<String>,
    pub content: C,
}

/// Two windows separated by a divider.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitData {
    pub left: Option<WindowId>,
    pub right: Option<WindowId>,
    /// Children sit side by side (the divider is vertical).
    pub horizontal: bool,
    /// Fraction of the split axis given to the left/top child.
    pub divider_location: f32,
}

impl SplitData {
    pub fn new(horizontal: bool, divider_location: f32) -> Self {
        Self {
            left: None,
            right: None,
            horizontal,
            divider_location: divider_location.clamp(0.0, 1.0),
        }
    }

    pub fn children(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.left.iter().chain(self.right.iter()).copied()
    }

    pub fn child_count(&self) -> usize {
        self.children().count()
    }

    pub(crate) fn slot_mut(&mut self, child: WindowId) -> Option<&mut Option<WindowId>> {
        if self.left == Some(child) {
            Some(&mut self.left)
        } else if self.right == Some(child) {
            Some(&mut self.right)
        } else {
            None
        }
    }
}

/// Minimized windows docked to one edge of the root.
#[derive(Debug, Clone, PartialEq)]
pub struct BarData {
    pub strip: TabStrip,
    pub direction: Direction,
    pub enabled: bool,
    /// Size of the slide-out content area in pixels.
    pub content_size: f32,
}

/// State owned by the tree's single root window.
#[derive(Debug, Clone, PartialEq)]
pub struct RootData {
    pub window: Option<WindowId>,
    /// Window bars indexed by [`Direction::index`].
    pub bars: [WindowId; 4],
    pub focused_view: Option<WindowId>,
    /// Focus events are ignored while this is non-zero.
    pub ignore_focus_changes: u32,
    pub overlay: DragOverlay,
}

/// Variant payload of a window.
#[derive(Debug, Clone)]
pub enum WindowKind<C> {
    View(View<C>),
    Split(SplitData),
    Tab(TabStrip),
    Bar(BarData),
    Root(RootData),
}

impl<C> WindowKind<C> {
    pub fn window_type(&self) -> WindowType {
        match self {
            WindowKind::View(_) => WindowType::View,
            WindowKind::Split(_) => WindowType::Split,
            WindowKind::Tab(_) => WindowType::Tab,
            WindowKind::Bar(_) => WindowType::Bar,
            WindowKind::Root(_) => WindowType::Root,
        }
    }

    /// Child windows in order. The root lists its window followed by the bars.
    pub fn children(&self) -> Vec<WindowId> {
        match self {
            WindowKind::View(_) => Vec::new(),
            WindowKind::Split(split) => split.children().collect(),
            WindowKind::Tab(strip) => strip.tabs().to_vec(),
            WindowKind::Bar(bar) => bar.strip.tabs().to_vec(),
            WindowKind::Root(root) => root.window.iter().chain(root.bars.iter()).copied().collect(),
        }
    }

    /// Tab strip of a tab window or window bar.
    pub fn strip(&self) -> Option<&TabStrip> {
        match self {
            WindowKind::Tab(strip) => Some(strip),
            WindowKind::Bar(bar) => Some(&bar.strip),
            _ => None,
        }
    }

    pub fn strip_mut(&mut self) -> Option<&mut TabStrip> {
        match self {
            WindowKind::Tab(strip) => Some(strip),
            WindowKind::Bar(bar) => Some(&mut bar.strip),
            _ => None,
        }
    }

    /// Whether children of this window show their own titles as tabs.
    pub fn shows_titles(&self) -> bool {
        matches!(self, WindowKind::Tab(_) | WindowKind::Bar(_))
    }
}

/// A node in the docking arena.
#[derive(Debug, Clone)]
pub struct WindowNode<C> {
    pub(crate) kind: WindowKind<C>,
    pub(crate) parent: Option<WindowId>,
    pub(crate) last_location: WindowLocation,
    pub(crate) last_focused_child: Option<WindowId>,
    pub(crate) last_minimized_direction: Option<Direction>,
    pub(crate) flags: WindowFlags,
    pub(crate) overrides: ConfigOverrides,
    pub(crate) title: String,
    pub(crate) bounds: Option<Rect>,
    pub(crate) mover: WindowMover,
}

impl<C> WindowNode<C> {
    pub(crate) fn new(kind: WindowKind<C>) -> Self {
        let title = match &kind {
            WindowKind::View(view) => view.title.clone(),
            _ => String::new(),
        };
        Self {
            kind,
            parent: None,
            last_location: WindowLocation::Null,
            last_focused_child: None,
            last_minimized_direction: None,
            flags: WindowFlags::default(),
            overrides: ConfigOverrides::default(),
            title,
            bounds: None,
            mover: WindowMover::default(),
        }
    }

    pub fn kind(&self) -> &WindowKind<C> {
        &self.kind
    }

    pub fn window_type(&self) -> WindowType {
        self.kind.window_type()
    }

    pub fn parent(&self) -> Option<WindowId> {
        self.parent
    }

    pub fn last_location(&self) -> &WindowLocation {
        &self.last_location
    }

    pub fn last_focused_child(&self) -> Option<WindowId> {
        self.last_focused_child
    }

    pub fn last_minimized_direction(&self) -> Option<Direction> {
        self.last_minimized_direction
    }

    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    pub fn overrides(&self) -> &ConfigOverrides {
        &self.overrides
    }

    /// Display title. Containers join their children's titles with ", ".
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Bounds from the last layout pass, `None` when not visible.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn mover(&self) -> &WindowMover {
        &self.mover
    }

    pub fn as_view(&self) -> Option<&View<C>> {
        match &self.kind {
            WindowKind::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_split(&self) -> Option<&SplitData> {
        match &self.kind {
            WindowKind::Split(split) => Some(split),
            _ => None,
        }
    }

    pub fn as_bar(&self) -> Option<&BarData> {
        match &self.kind {
            WindowKind::Bar(bar) => Some(bar),
            _ => None,
        }
    }

    pub fn as_root(&self) -> Option<&RootData> {
        match &self.kind {
            WindowKind::Root(root) => Some(root),
            _ => None,
        }
    }

    /// Tab strip of a tab window or window bar.
    pub fn strip(&self) -> Option<&TabStrip> {
        self.kind.strip()
    }
}
