//! Handle-independent snapshots of a docking tree.

use berth_docking::{Direction, DockingTree, WindowId, WindowKind};

/// Structure of a window subtree, with views identified by title.
///
/// Divider locations are kept in thousandths so float noise does not matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeShape {
    View(String),
    Split {
        horizontal: bool,
        divider_permille: i32,
        left: Option<Box<TreeShape>>,
        right: Option<Box<TreeShape>>,
    },
    Tab {
        selected: Option<usize>,
        tabs: Vec<TreeShape>,
    },
    /// A root or window bar showing up inside a subtree.
    Other,
}

impl TreeShape {
    pub fn view(title: &str) -> Self {
        TreeShape::View(title.to_owned())
    }

    pub fn split(horizontal: bool, divider: f32, left: TreeShape, right: TreeShape) -> Self {
        TreeShape::Split {
            horizontal,
            divider_permille: permille(divider),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    pub fn tab(selected: usize, tabs: Vec<TreeShape>) -> Self {
        TreeShape::Tab {
            selected: Some(selected),
            tabs,
        }
    }

    /// Snapshot the subtree under `window`.
    pub fn capture<C>(tree: &DockingTree<C>, window: WindowId) -> Self {
        let Some(node) = tree.get(window) else {
            return TreeShape::Other;
        };
        let capture_child = |child: Option<WindowId>| {
            child.map(|child| Box::new(TreeShape::capture(tree, child)))
        };

        match node.kind() {
            WindowKind::View(view) => TreeShape::View(view.title.clone()),
            WindowKind::Split(split) => TreeShape::Split {
                horizontal: split.horizontal,
                divider_permille: permille(split.divider_location),
                left: capture_child(split.left),
                right: capture_child(split.right),
            },
            WindowKind::Tab(strip) => TreeShape::Tab {
                selected: strip.selected(),
                tabs: strip
                    .tabs()
                    .iter()
                    .map(|&tab| TreeShape::capture(tree, tab))
                    .collect(),
            },
            WindowKind::Bar(_) | WindowKind::Root(_) => TreeShape::Other,
        }
    }

    /// Titles of the views in this subtree, in order.
    pub fn titles(&self) -> Vec<String> {
        match self {
            TreeShape::View(title) => vec![title.clone()],
            TreeShape::Split { left, right, .. } => left
                .iter()
                .chain(right.iter())
                .flat_map(|child| child.titles())
                .collect(),
            TreeShape::Tab { tabs, .. } => tabs.iter().flat_map(TreeShape::titles).collect(),
            TreeShape::Other => Vec::new(),
        }
    }
}

fn permille(divider: f32) -> i32 {
    (divider * 1000.0).round() as i32
}

/// Snapshot of one window bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarShape {
    pub enabled: bool,
    pub selected: Option<usize>,
    pub tabs: Vec<TreeShape>,
}

/// Snapshot of a whole tree: the root window plus the four bars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutShape {
    pub window: Option<TreeShape>,
    /// Up, down, left, right.
    pub bars: Vec<BarShape>,
}

impl LayoutShape {
    pub fn capture<C>(tree: &DockingTree<C>) -> Self {
        let bars = Direction::ALL
            .into_iter()
            .map(|direction| {
                let bar = tree.window_bar(direction);
                let strip = tree.tab_strip(bar);
                BarShape {
                    enabled: tree.is_window_bar_enabled(direction),
                    selected: strip.and_then(|strip| strip.selected()),
                    tabs: tree
                        .child_windows(bar)
                        .into_iter()
                        .map(|child| TreeShape::capture(tree, child))
                        .collect(),
                }
            })
            .collect();

        LayoutShape {
            window: tree
                .root_window()
                .map(|window| TreeShape::capture(tree, window)),
            bars,
        }
    }

    pub fn bar(&self, direction: Direction) -> &BarShape {
        &self.bars[direction.index()]
    }
}
