//! Geometry of the docking tree.
//!
//! Bounds are recomputed lazily: structural edits and configuration changes mark
//! the layout dirty, and [`DockingTree::layout`] recomputes every visible
//! window's bounds from the area given to [`DockingTree::set_bounds`].

use berth_core::geometry::Rect;
use berth_core::math::Vec2;
use berth_core::profiling::profile_function;

use crate::node::WindowKind;
use crate::tree::DockingTree;
use crate::types::{Direction, WindowId};

/// Split `rect` into the two panels of a split window.
///
/// `ratio` is the fraction of the split axis given to the first panel; the
/// divider is centred on that position.
pub fn split_panels(rect: Rect, horizontal: bool, ratio: f32, divider_size: f32) -> (Rect, Rect) {
    let half = divider_size / 2.0;

    if horizontal {
        let split_x = rect.width * ratio;
        let first = Rect::new(rect.x, rect.y, (split_x - half).max(0.0), rect.height);
        let second = Rect::new(
            rect.x + split_x + half,
            rect.y,
            (rect.width - split_x - half).max(0.0),
            rect.height,
        );
        (first, second)
    } else {
        let split_y = rect.height * ratio;
        let first = Rect::new(rect.x, rect.y, rect.width, (split_y - half).max(0.0));
        let second = Rect::new(
            rect.x,
            rect.y + split_y + half,
            rect.width,
            (rect.height - split_y - half).max(0.0),
        );
        (first, second)
    }
}

/// Bounds of the divider of a split window laid out in `rect`.
pub fn divider_rect(rect: Rect, horizontal: bool, ratio: f32, divider_size: f32) -> Rect {
    if horizontal {
        let x = rect.x + rect.width * ratio - divider_size / 2.0;
        Rect::new(x, rect.y, divider_size, rect.height)
    } else {
        let y = rect.y + rect.height * ratio - divider_size / 2.0;
        Rect::new(rect.x, y, rect.width, divider_size)
    }
}

/// Swap the axes of a rectangle. Vertical window bars lay their tabs out along y.
pub(crate) fn transpose(rect: Rect) -> Rect {
    Rect::new(rect.y, rect.x, rect.height, rect.width)
}

impl<C> DockingTree<C> {
    /// Set the area the tree is laid out in.
    pub fn set_bounds(&mut self, area: Rect) {
        if area != self.area {
            self.area = area;
            self.layout_dirty = true;
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn is_layout_dirty(&self) -> bool {
        self.layout_dirty
    }

    /// Recompute bounds if anything changed since the last pass.
    pub fn layout(&mut self) {
        if !self.layout_dirty {
            return;
        }
        profile_function!();

        for node in self.nodes.values_mut() {
            node.bounds = None;
        }
        let root = self.root();
        let area = self.area;
        self.set_window_bounds(root, area);

        let main = self.main_area();
        for direction in Direction::ALL {
            let bar = self.window_bar(direction);
            let Some(node) = self.get(bar) else {
                continue;
            };
            let Some(data) = node.as_bar() else {
                continue;
            };
            if !data.enabled {
                continue;
            }
            let bar_rect = self.bar_rect(direction);
            let content_size = data.content_size;
            let selected = data.strip.selected_window();
            self.set_window_bounds(bar, bar_rect);

            if let Some(child) = selected {
                let content = match direction {
                    Direction::Left => {
                        Rect::new(main.x, main.y, content_size.min(main.width), main.height)
                    }
                    Direction::Right => {
                        let width = content_size.min(main.width);
                        Rect::new(main.right() - width, main.y, width, main.height)
                    }
                    Direction::Up => {
                        Rect::new(main.x, main.y, main.width, content_size.min(main.height))
                    }
                    Direction::Down => {
                        let height = content_size.min(main.height);
                        Rect::new(main.x, main.bottom() - height, main.width, height)
                    }
                };
                self.layout_window(child, content);
            }
        }

        if let Some(window) = self.root_window() {
            self.layout_window(window, main);
        }
        self.layout_dirty = false;
    }

    fn set_window_bounds(&mut self, window: WindowId, rect: Rect) {
        if let Some(node) = self.get_mut(window) {
            node.bounds = Some(rect);
        }
    }

    fn bar_size(&self, direction: Direction) -> f32 {
        if self.is_window_bar_enabled(direction) {
            self.effective_config(self.window_bar(direction))
                .window_bar_size
        } else {
            0.0
        }
    }

    /// Strip occupied by an enabled window bar.
    fn bar_rect(&self, direction: Direction) -> Rect {
        let area = self.area;
        let up = self.bar_size(Direction::Up).min(area.height);
        let down = self.bar_size(Direction::Down).min(area.height - up);
        let middle_height = (area.height - up - down).max(0.0);
        match direction {
            Direction::Up => Rect::new(area.x, area.y, area.width, up),
            Direction::Down => Rect::new(area.x, area.bottom() - down, area.width, down),
            Direction::Left => {
                let size = self.bar_size(Direction::Left).min(area.width);
                Rect::new(area.x, area.y + up, size, middle_height)
            }
            Direction::Right => {
                let size = self.bar_size(Direction::Right).min(area.width);
                Rect::new(area.right() - size, area.y + up, size, middle_height)
            }
        }
    }

    /// Area left for the root window once enabled bars have taken their strips.
    pub fn main_area(&self) -> Rect {
        let area = self.area;
        let up = self.bar_size(Direction::Up);
        let down = self.bar_size(Direction::Down);
        let left = self.bar_size(Direction::Left);
        let right = self.bar_size(Direction::Right);
        Rect::new(
            area.x + left,
            area.y + up,
            (area.width - left - right).max(0.0),
            (area.height - up - down).max(0.0),
        )
    }

    fn layout_window(&mut self, window: WindowId, rect: Rect) {
        self.set_window_bounds(window, rect);
        let Some(node) = self.get(window) else {
            return;
        };

        match &node.kind {
            WindowKind::Split(split) => {
                let (left, right) = (split.left, split.right);
                let divider_size = self.effective_config(window).divider_size;
                match (left, right) {
                    (Some(left), Some(right)) => {
                        let (first, second) =
                            split_panels(rect, split.horizontal, split.divider_location, divider_size);
                        self.layout_window(left, first);
                        self.layout_window(right, second);
                    }
                    (Some(only), None) | (None, Some(only)) => self.layout_window(only, rect),
                    (None, None) => {}
                }
            }
            WindowKind::Tab(strip) => {
                let selected = strip.selected_window();
                let strip_height = self.effective_config(window).tab_bar_height.min(rect.height);
                let content = Rect::new(
                    rect.x,
                    rect.y + strip_height,
                    rect.width,
                    rect.height - strip_height,
                );
                let widths = self.tab_widths(window);
                let spacing = self.effective_config(window).tab_spacing;
                if let Some(strip) = self.get_mut(window).and_then(|node| node.kind.strip_mut()) {
                    strip.clamp_scroll(rect.width, &widths, spacing);
                }
                if let Some(child) = selected {
                    self.layout_window(child, content);
                }
            }
            _ => {}
        }
    }

    /// Tab strip rectangle of a tab window or window bar.
    ///
    /// For vertical window bars the strip is returned transposed, so tab
    /// geometry can always be computed along x.
    pub fn tab_strip_bounds(&self, window: WindowId) -> Option<Rect> {
        let node = self.get(window)?;
        let bounds = node.bounds?;
        match &node.kind {
            WindowKind::Tab(_) => {
                let height = self.effective_config(window).tab_bar_height.min(bounds.height);
                Some(Rect::new(bounds.x, bounds.y, bounds.width, height))
            }
            WindowKind::Bar(bar) if !bar.direction.is_horizontal() => Some(bounds),
            WindowKind::Bar(_) => Some(transpose(bounds)),
            _ => None,
        }
    }

    /// Content rectangle of a tab window, below its strip.
    pub fn tab_content_bounds(&self, window: WindowId) -> Option<Rect> {
        let bounds = self.bounds(window)?;
        let strip = self.tab_strip_bounds(window)?;
        Some(Rect::new(
            bounds.x,
            bounds.y + strip.height,
            bounds.width,
            (bounds.height - strip.height).max(0.0),
        ))
    }

    /// Estimated tab widths of a tab window or window bar.
    pub fn tab_widths(&self, window: WindowId) -> Vec<f32> {
        let config = self.effective_config(window);
        self.child_windows(window)
            .into_iter()
            .map(|child| config.estimate_tab_width(self.title(child).unwrap_or_default()))
            .collect()
    }

    /// Point in the coordinate space of [`Self::tab_strip_bounds`].
    pub(crate) fn strip_point(&self, window: WindowId, point: Vec2) -> Vec2 {
        match self.get(window).and_then(|node| node.as_bar()) {
            Some(bar) if bar.direction.is_horizontal() => Vec2::new(point.y, point.x),
            _ => point,
        }
    }

    /// Tab index under `point` in a tab window or window bar.
    pub fn tab_at(&self, window: WindowId, point: Vec2) -> Option<usize> {
        let strip_rect = self.tab_strip_bounds(window)?;
        let strip = self.tab_strip(window)?;
        let spacing = self.effective_config(window).tab_spacing;
        strip.hit_test_tab(
            self.strip_point(window, point),
            strip_rect,
            &self.tab_widths(window),
            spacing,
        )
    }

    /// Divider rectangle of a split window.
    pub fn divider_bounds(&self, split: WindowId) -> Option<Rect> {
        let node = self.get(split)?;
        let data = node.as_split()?;
        let bounds = node.bounds?;
        Some(divider_rect(
            bounds,
            data.horizontal,
            data.divider_location,
            self.effective_config(split).divider_size,
        ))
    }

    /// Deepest visible window containing `point`, ignoring the subtree of `skip`.
    ///
    /// Expanded window bar content is searched first since it overlays the main
    /// area. Uses the bounds of the last layout pass.
    pub fn window_at(&self, point: Vec2, skip: Option<WindowId>) -> Option<WindowId> {
        profile_function!();

        for direction in Direction::ALL {
            let selected = self
                .tab_strip(self.window_bar(direction))
                .and_then(|strip| strip.selected_window());
            if let Some(child) = selected
                && let Some(hit) = self.descend(child, point, skip)
            {
                return Some(hit);
            }
        }
        for direction in Direction::ALL {
            let bar = self.window_bar(direction);
            if self.bounds(bar).is_some_and(|bounds| bounds.contains(point)) {
                return Some(bar);
            }
        }
        if let Some(window) = self.root_window()
            && let Some(hit) = self.descend(window, point, skip)
        {
            return Some(hit);
        }
        let root = self.root();
        self.bounds(root)
            .filter(|bounds| bounds.contains(point))
            .map(|_| root)
    }

    fn descend(&self, window: WindowId, point: Vec2, skip: Option<WindowId>) -> Option<WindowId> {
        if Some(window) == skip {
            return None;
        }
        let node = self.get(window)?;
        if !node.bounds?.contains(point) {
            return None;
        }
        let visible_children = match &node.kind {
            WindowKind::Split(split) => split.children().collect(),
            WindowKind::Tab(strip) => strip.selected_window().into_iter().collect(),
            _ => Vec::new(),
        };
        visible_children
            .into_iter()
            .find_map(|child| self.descend(child, point, skip))
            .or(Some(window))
    }
}
