//! Docking configuration and per-window overrides.
//!
//! The tree holds one [`DockingConfig`] with the defaults. Any window may carry a
//! [`ConfigOverrides`]; the effective configuration of a window is the defaults
//! overlaid with the overrides of every ancestor from the root down, so the nearest
//! override wins.

use crate::types::KeyCode;

/// Default edge split distance in pixels.
pub const DEFAULT_EDGE_SPLIT_DISTANCE: f32 = 16.0;

/// Default edge split fraction (25% of width/height).
pub const DEFAULT_EDGE_SPLIT_FRACTION: f32 = 0.25;

/// Default divider size in pixels.
pub const DEFAULT_DIVIDER_SIZE: f32 = 4.0;

/// Default tab bar height in pixels.
pub const DEFAULT_TAB_BAR_HEIGHT: f32 = 22.0;

/// Default tab padding in pixels.
pub const DEFAULT_TAB_PADDING: f32 = 8.0;

/// Default window bar thickness in pixels.
pub const DEFAULT_WINDOW_BAR_SIZE: f32 = 22.0;

/// Default slide-out content size of a window bar in pixels.
pub const DEFAULT_BAR_CONTENT_SIZE: f32 = 200.0;

/// Drag threshold in pixels before a press turns into a drag.
pub const DRAG_THRESHOLD: f32 = 5.0;

/// Approximate glyph width as a fraction of the font size.
pub(crate) const CHAR_WIDTH_FACTOR: f32 = 0.6;

/// Engine-wide docking configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DockingConfig {
    /// Pointer closer than this many pixels to an edge splits on that edge.
    pub edge_split_distance: f32,
    /// Pointer closer than this fraction of width/height to an edge splits on that edge.
    pub edge_split_fraction: f32,
    /// Key that cancels an active drag.
    pub abort_drag_key: KeyCode,
    /// Whether a tab window may appear as a tab of another tab window.
    pub recursive_tabs_enabled: bool,
    /// Whether double clicking a minimized window's tab restores it.
    pub double_click_restores_window: bool,
    /// Width of split dividers in pixels.
    pub divider_size: f32,
    /// Height of tab strips in pixels.
    pub tab_bar_height: f32,
    /// Horizontal padding inside each tab in pixels.
    pub tab_padding: f32,
    /// Gap between adjacent tabs in pixels.
    pub tab_spacing: f32,
    /// Font size used to estimate tab widths.
    pub tab_font_size: f32,
    /// Thickness of an enabled window bar in pixels.
    pub window_bar_size: f32,
    /// Content size given to newly created window bars.
    pub bar_content_size: f32,
    /// Pointer travel before a press becomes a drag.
    pub drag_threshold: f32,
}

impl Default for DockingConfig {
    fn default() -> Self {
        Self {
            edge_split_distance: DEFAULT_EDGE_SPLIT_DISTANCE,
            edge_split_fraction: DEFAULT_EDGE_SPLIT_FRACTION,
            abort_drag_key: KeyCode::ESCAPE,
            recursive_tabs_enabled: false,
            double_click_restores_window: true,
            divider_size: DEFAULT_DIVIDER_SIZE,
            tab_bar_height: DEFAULT_TAB_BAR_HEIGHT,
            tab_padding: DEFAULT_TAB_PADDING,
            tab_spacing: 0.0,
            tab_font_size: 11.0,
            window_bar_size: DEFAULT_WINDOW_BAR_SIZE,
            bar_content_size: DEFAULT_BAR_CONTENT_SIZE,
            drag_threshold: DRAG_THRESHOLD,
        }
    }
}

impl DockingConfig {
    /// Set the edge split distance in pixels.
    pub fn edge_split_distance(mut self, distance: f32) -> Self {
        self.edge_split_distance = distance.max(0.0);
        self
    }

    /// Set the edge split fraction (clamped to 0.0-0.5).
    pub fn edge_split_fraction(mut self, fraction: f32) -> Self {
        self.edge_split_fraction = fraction.clamp(0.0, 0.5);
        self
    }

    /// Set the abort-drag key.
    pub fn abort_drag_key(mut self, key: KeyCode) -> Self {
        self.abort_drag_key = key;
        self
    }

    /// Allow or forbid tab windows inside tab windows.
    pub fn recursive_tabs_enabled(mut self, enabled: bool) -> Self {
        self.recursive_tabs_enabled = enabled;
        self
    }

    /// Enable or disable restore on double click.
    pub fn double_click_restores_window(mut self, enabled: bool) -> Self {
        self.double_click_restores_window = enabled;
        self
    }

    /// Set the divider size.
    pub fn divider_size(mut self, size: f32) -> Self {
        self.divider_size = size.max(0.0);
        self
    }

    /// Set the tab bar height.
    pub fn tab_bar_height(mut self, height: f32) -> Self {
        self.tab_bar_height = height.max(0.0);
        self
    }

    /// Set the tab spacing.
    pub fn tab_spacing(mut self, spacing: f32) -> Self {
        self.tab_spacing = spacing;
        self
    }

    /// Set the window bar thickness.
    pub fn window_bar_size(mut self, size: f32) -> Self {
        self.window_bar_size = size.max(0.0);
        self
    }

    /// Set the drag threshold.
    pub fn drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold.max(0.0);
        self
    }

    /// Estimated pixel width of a tab showing `title`.
    pub fn estimate_tab_width(&self, title: &str) -> f32 {
        let char_width = self.tab_font_size * CHAR_WIDTH_FACTOR;
        title.chars().count() as f32 * char_width + self.tab_padding * 2.0
    }
}

/// Per-window configuration overrides. Unset fields inherit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub edge_split_distance: Option<f32>,
    pub edge_split_fraction: Option<f32>,
    pub abort_drag_key: Option<KeyCode>,
    pub recursive_tabs_enabled: Option<bool>,
    pub double_click_restores_window: Option<bool>,
    pub divider_size: Option<f32>,
    pub tab_bar_height: Option<f32>,
    pub tab_spacing: Option<f32>,
    pub window_bar_size: Option<f32>,
    pub drag_threshold: Option<f32>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no field is overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay the set fields onto `config`.
    pub fn apply_to(&self, config: &mut DockingConfig) {
        if let Some(v) = self.edge_split_distance {
            config.edge_split_distance = v;
        }
        if let Some(v) = self.edge_split_fraction {
            config.edge_split_fraction = v;
        }
        if let Some(v) = self.abort_drag_key {
            config.abort_drag_key = v;
        }
        if let Some(v) = self.recursive_tabs_enabled {
            config.recursive_tabs_enabled = v;
        }
        if let Some(v) = self.double_click_restores_window {
            config.double_click_restores_window = v;
        }
        if let Some(v) = self.divider_size {
            config.divider_size = v;
        }
        if let Some(v) = self.tab_bar_height {
            config.tab_bar_height = v;
        }
        if let Some(v) = self.tab_spacing {
            config.tab_spacing = v;
        }
        if let Some(v) = self.window_bar_size {
            config.window_bar_size = v;
        }
        if let Some(v) = self.drag_threshold {
            config.drag_threshold = v;
        }
    }

    /// Resolve a chain of overrides ordered from the outermost scope inwards.
    pub fn resolve<'a>(
        defaults: &DockingConfig,
        chain: impl IntoIterator<Item = &'a ConfigOverrides>,
    ) -> DockingConfig {
        let mut config = defaults.clone();
        for overrides in chain {
            overrides.apply_to(&mut config);
        }
        config
    }
}
