//! Ordered tab list shared by tab windows and window bars.

use berth_core::geometry::Rect;
use berth_core::math::Vec2;

use crate::types::WindowId;

/// Width of the insertion marker drawn for a placeholder tab.
pub const DROP_INDICATOR_WIDTH: f32 = 2.0;

/// Placeholder previewing where a dragged window would be inserted.
///
/// Never a real child: it only carries the insertion point and the title to show.
#[derive(Debug, Clone, PartialEq)]
pub struct DragTab {
    /// Insertion point between tabs, in `[0, tab_count]`.
    pub index: usize,
    /// Title of the dragged window.
    pub title: String,
}

/// Ordered children with a selection.
///
/// A tab window always has a selection while non-empty; a window bar may be
/// collapsed (`selected == None`) while holding tabs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabStrip {
    tabs: Vec<WindowId>,
    selected: Option<usize>,
    drag_tab: Option<DragTab>,
    /// Horizontal scroll offset of the strip in pixels.
    pub scroll_offset: f32,
}

impl TabStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[WindowId] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<WindowId> {
        self.tabs.get(index).copied()
    }

    pub fn index_of(&self, window: WindowId) -> Option<usize> {
        self.tabs.iter().position(|&tab| tab == window)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_window(&self) -> Option<WindowId> {
        self.selected.and_then(|index| self.get(index))
    }

    /// Select a tab. Out of range indices are ignored.
    ///
    /// Returns the previous selection if it changed.
    pub fn select(&mut self, index: Option<usize>) -> Option<Option<usize>> {
        if let Some(index) = index
            && index >= self.tabs.len()
        {
            return None;
        }
        if index == self.selected {
            return None;
        }
        Some(std::mem::replace(&mut self.selected, index))
    }

    /// Insert a tab, clamping `index` to `[0, len]`.
    ///
    /// Keeps the same tab selected. `select_if_empty` selects the first tab
    /// inserted into an empty strip.
    pub fn insert(&mut self, index: usize, window: WindowId, select_if_empty: bool) -> usize {
        let index = index.min(self.tabs.len());
        self.tabs.insert(index, window);

        match self.selected {
            Some(selected) if index <= selected => self.selected = Some(selected + 1),
            None if select_if_empty && self.tabs.len() == 1 => self.selected = Some(0),
            _ => {}
        }
        index
    }

    /// Remove the tab at `index`.
    ///
    /// The selection stays on the same tab, or moves to the tab that took the
    /// removed one's place (the previous one when the last tab was removed).
    pub fn remove(&mut self, index: usize) -> Option<WindowId> {
        if index >= self.tabs.len() {
            return None;
        }
        let window = self.tabs.remove(index);

        if let Some(selected) = self.selected {
            if self.tabs.is_empty() {
                self.selected = None;
            } else if selected >= self.tabs.len() {
                self.selected = Some(self.tabs.len() - 1);
            } else if selected > index {
                self.selected = Some(selected - 1);
            }
        }
        Some(window)
    }

    /// Replace the tab at `index`, keeping the selection.
    pub fn replace(&mut self, index: usize, window: WindowId) -> Option<WindowId> {
        let slot = self.tabs.get_mut(index)?;
        Some(std::mem::replace(slot, window))
    }

    /// Move the tab at `from_index` to the insertion point `to_insertion`.
    ///
    /// Insertion points sit between tabs: tab `i` occupies the space between
    /// points `i` and `i + 1`. Returns the new index, or `None` if nothing moved.
    pub fn reorder(&mut self, from_index: usize, to_insertion: usize) -> Option<usize> {
        if from_index >= self.tabs.len() {
            return None;
        }

        let is_moving_left = to_insertion < from_index;
        let is_moving_right = to_insertion > from_index + 1;
        if !is_moving_left && !is_moving_right {
            return None;
        }

        let window = self.tabs.remove(from_index);
        let insert_index = if to_insertion > from_index {
            (to_insertion - 1).min(self.tabs.len())
        } else {
            to_insertion
        };
        self.tabs.insert(insert_index, window);

        if let Some(selected) = self.selected {
            self.selected = Some(if selected == from_index {
                insert_index
            } else if selected > from_index && selected <= insert_index {
                selected - 1
            } else if selected < from_index && selected >= insert_index {
                selected + 1
            } else {
                selected
            });
        }
        Some(insert_index)
    }

    /// Remove every tab, returning them in order.
    pub fn take_all(&mut self) -> Vec<WindowId> {
        self.selected = None;
        std::mem::take(&mut self.tabs)
    }

    pub fn drag_tab(&self) -> Option<&DragTab> {
        self.drag_tab.as_ref()
    }

    pub fn set_drag_tab(&mut self, drag_tab: Option<DragTab>) {
        self.drag_tab = drag_tab;
    }

    /// Bounds of tab `index` inside `strip`, given per-tab widths.
    pub fn tab_bounds(&self, index: usize, strip: Rect, widths: &[f32], spacing: f32) -> Option<Rect> {
        let width = *widths.get(index)?;
        let x = strip.x - self.scroll_offset
            + widths[..index].iter().map(|w| w + spacing).sum::<f32>();
        Some(Rect::new(x, strip.y, width, strip.height))
    }

    /// Index of the tab under `pos`.
    pub fn hit_test_tab(&self, pos: Vec2, strip: Rect, widths: &[f32], spacing: f32) -> Option<usize> {
        if pos.y < strip.y || pos.y > strip.bottom() {
            return None;
        }
        (0..widths.len()).find(|&index| {
            self.tab_bounds(index, strip, widths, spacing)
                .is_some_and(|tab| pos.x >= tab.x && pos.x <= tab.right())
        })
    }

    /// Insertion point closest to `pos`.
    pub fn insertion_point(&self, pos: Vec2, strip: Rect, widths: &[f32], spacing: f32) -> usize {
        let mut closest_index = 0;
        let mut closest_dist = f32::MAX;

        for index in 0..=widths.len() {
            let insertion_x = if index == 0 {
                strip.x - self.scroll_offset
            } else {
                self.tab_bounds(index - 1, strip, widths, spacing)
                    .map_or(strip.x, |prev| prev.right())
            };

            let dist = (pos.x - insertion_x).abs();
            if dist < closest_dist {
                closest_dist = dist;
                closest_index = index;
            }
        }
        closest_index
    }

    /// Marker rectangle for the placeholder tab, if one is showing.
    pub fn drop_indicator_bounds(&self, strip: Rect, widths: &[f32], spacing: f32) -> Option<Rect> {
        let drag_tab = self.drag_tab.as_ref()?;
        let x = if drag_tab.index == 0 {
            strip.x - self.scroll_offset
        } else {
            self.tab_bounds(drag_tab.index - 1, strip, widths, spacing)
                .map_or(strip.x, |prev| prev.right())
        };
        Some(Rect::new(x, strip.y, DROP_INDICATOR_WIDTH, strip.height))
    }

    /// Clamp the scroll offset so the strip never scrolls past its tabs.
    pub fn clamp_scroll(&mut self, available_width: f32, widths: &[f32], spacing: f32) {
        let total: f32 = widths.iter().map(|w| w + spacing).sum::<f32>() - spacing.max(0.0);
        let max = (total - available_width).max(0.0);
        self.scroll_offset = self.scroll_offset.clamp(0.0, max);
    }
}
