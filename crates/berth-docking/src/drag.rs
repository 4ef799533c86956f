//! Pointer-driven window dragging.
//!
//! Every window carries a [`WindowMover`] that tracks the press/drag state of its
//! drag handle (a tab or title bar in the host). Once the pointer has moved far
//! enough, a [`WindowDragger`] session is created on the tree; it resolves the
//! acceptor under the pointer on every motion and keeps the preview overlay on
//! the root up to date.

use berth_core::geometry::Rect;
use berth_core::math::Vec2;

use crate::drop::DropTarget;
use crate::error::DockResult;
use crate::tree::DockingTree;
use crate::types::{KeyCode, WindowFlags, WindowId};

/// Drag state of one window's handle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MoverState {
    #[default]
    Idle,
    /// Pressed but not moved past the drag threshold yet.
    Pressed { start: Vec2 },
    Dragging,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowMover {
    state: MoverState,
}

impl WindowMover {
    pub fn state(&self) -> MoverState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == MoverState::Idle
    }

    pub fn is_dragging(&self) -> bool {
        self.state == MoverState::Dragging
    }
}

/// Cursor the host should show while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragCursor {
    Accept,
    Reject,
}

/// Floating title shown at the pointer when nothing accepts the drop.
#[derive(Debug, Clone, PartialEq)]
pub struct DragLabel {
    pub title: String,
    pub position: Vec2,
}

/// Preview drawn over the docking area while dragging.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DragOverlay {
    /// Where the dragged window would end up.
    pub highlight: Option<Rect>,
    pub label: Option<DragLabel>,
}

impl DragOverlay {
    pub fn is_empty(&self) -> bool {
        self.highlight.is_none() && self.label.is_none()
    }

    pub fn clear(&mut self) {
        self.highlight = None;
        self.label = None;
    }
}

/// An active drag session.
#[derive(Debug, Clone)]
pub(crate) struct WindowDragger {
    window: WindowId,
    start: Vec2,
    current: Vec2,
    target: Option<DropTarget>,
    cursor: DragCursor,
}

/// How a press/drag/release sequence ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// The window was dropped on an acceptor.
    Dropped(DropTarget),
    /// Released where nothing accepts the window.
    Abandoned,
    /// Cancelled with the abort key.
    Aborted,
    /// Released before the drag threshold was reached.
    Clicked,
    /// Nothing was being dragged.
    Ignored,
}

impl<C> DockingTree<C> {
    /// Press on `window`'s drag handle.
    ///
    /// Returns false if the window cannot be dragged or another drag is in
    /// progress.
    pub fn on_mouse_pressed(&mut self, window: WindowId, point: Vec2) -> bool {
        if self.dragger.is_some() || self.active_mover().is_some() {
            return false;
        }
        if self.check_movable(window).is_err()
            || !self.flags(window).contains(WindowFlags::DRAG_ENABLED)
            || !self.is_attached(window)
        {
            return false;
        }
        let Some(node) = self.get_mut(window) else {
            return false;
        };
        node.mover.state = MoverState::Pressed { start: point };
        tracing::trace!("Pressed {} at {:?}", window, point);
        true
    }

    /// Pointer motion while `window`'s handle is pressed.
    ///
    /// Returns the cursor to show once the drag has started.
    pub fn on_mouse_dragged(&mut self, window: WindowId, point: Vec2) -> Option<DragCursor> {
        let state = self.get(window)?.mover.state;
        match state {
            MoverState::Idle => return None,
            MoverState::Pressed { start } => {
                let threshold = self.effective_config(window).drag_threshold;
                if (point - start).length() < threshold {
                    return None;
                }
                self.get_mut(window)?.mover.state = MoverState::Dragging;
                self.dragger = Some(WindowDragger {
                    window,
                    start,
                    current: point,
                    target: None,
                    cursor: DragCursor::Reject,
                });
                tracing::debug!("Started dragging {}", window);
            }
            MoverState::Dragging => {}
        }

        let previous = match self.dragger.as_mut() {
            Some(dragger) if dragger.window == window => {
                dragger.current = point;
                dragger.target.take()
            }
            _ => return None,
        };

        // The acceptor re-installs its placeholder if the pointer is still on it.
        if let Some(previous) = previous {
            self.abort_drop(&previous);
        }
        self.layout();
        let target = self.resolve_drop(point, window);

        let (overlay, cursor) = match &target {
            Some(target) => (
                DragOverlay {
                    highlight: Some(target.preview),
                    label: None,
                },
                DragCursor::Accept,
            ),
            None => (
                DragOverlay {
                    highlight: None,
                    label: Some(DragLabel {
                        title: self.title(window).unwrap_or_default().to_owned(),
                        position: point,
                    }),
                },
                DragCursor::Reject,
            ),
        };
        if let Some(root) = self.root_data_mut() {
            root.overlay = overlay;
        }
        if let Some(dragger) = self.dragger.as_mut() {
            dragger.target = target;
            dragger.cursor = cursor;
        }
        Some(cursor)
    }

    /// Release `window`'s handle at `point`.
    pub fn on_mouse_released(&mut self, window: WindowId, point: Vec2) -> DockResult<DragOutcome> {
        let Some(state) = self.get(window).map(|node| node.mover.state) else {
            return Ok(DragOutcome::Ignored);
        };
        match state {
            MoverState::Idle => return Ok(DragOutcome::Ignored),
            MoverState::Pressed { .. } => {
                self.node_mut(window)?.mover.state = MoverState::Idle;
                return Ok(DragOutcome::Clicked);
            }
            MoverState::Dragging => {}
        }

        if self
            .dragger
            .as_ref()
            .is_some_and(|dragger| dragger.current != point)
        {
            self.on_mouse_dragged(window, point);
        }
        self.node_mut(window)?.mover.state = MoverState::Idle;
        let target = self.dragger.take().and_then(|dragger| dragger.target);

        match target {
            Some(target) => {
                self.do_drop(&target, window)?;
                Ok(DragOutcome::Dropped(target))
            }
            None => {
                if let Some(root) = self.root_data_mut() {
                    root.overlay.clear();
                }
                tracing::debug!("Abandoned drag of {}", window);
                Ok(DragOutcome::Abandoned)
            }
        }
    }

    /// Key press during a press or drag. The abort key cancels it.
    pub fn on_key_pressed(&mut self, key: KeyCode) -> DragOutcome {
        let Some(window) = self.active_mover() else {
            return DragOutcome::Ignored;
        };
        if key != self.effective_config(window).abort_drag_key {
            return DragOutcome::Ignored;
        }

        if let Some(target) = self.dragger.take().and_then(|dragger| dragger.target) {
            self.abort_drop(&target);
        }
        if let Some(root) = self.root_data_mut() {
            root.overlay.clear();
        }
        if let Some(node) = self.get_mut(window) {
            node.mover.state = MoverState::Idle;
        }
        tracing::debug!("Aborted drag of {}", window);
        DragOutcome::Aborted
    }

    /// Double click on `window`'s handle. Restores a minimized window when
    /// configured to. Returns whether anything happened.
    pub fn on_double_click(&mut self, window: WindowId) -> DockResult<bool> {
        if !self.effective_config(window).double_click_restores_window
            || !self.is_minimized(window)
            || !self.flags(window).contains(WindowFlags::RESTORABLE)
        {
            return Ok(false);
        }
        self.restore(window)?;
        Ok(true)
    }

    /// Window whose handle is pressed or dragged.
    pub fn active_mover(&self) -> Option<WindowId> {
        if let Some(dragger) = &self.dragger {
            return Some(dragger.window);
        }
        self.nodes
            .iter()
            .find(|(_, node)| !node.mover.is_idle())
            .map(|(&id, _)| id)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragger.is_some()
    }

    pub fn drag_cursor(&self) -> Option<DragCursor> {
        self.dragger.as_ref().map(|dragger| dragger.cursor)
    }

    /// Current acceptor of the active drag.
    pub fn drag_target(&self) -> Option<&DropTarget> {
        self.dragger.as_ref()?.target.as_ref()
    }

    /// Pointer travel of the active drag.
    pub fn drag_delta(&self) -> Option<Vec2> {
        self.dragger
            .as_ref()
            .map(|dragger| dragger.current - dragger.start)
    }

    /// Preview overlay to draw over the docking area.
    pub fn overlay(&self) -> Option<&DragOverlay> {
        self.root_data().map(|root| &root.overlay)
    }
}
