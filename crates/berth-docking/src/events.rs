//! Notifications raised by the docking tree.
//!
//! Events raised while a transaction is open are held back and released when the
//! outermost transaction ends, so the host sees one consolidated batch per
//! operation.

use crate::types::{Direction, WindowId};

/// Something the host may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum DockingEvent {
    WindowAdded { parent: WindowId, window: WindowId },
    WindowRemoved { parent: WindowId, window: WindowId },
    WindowClosed(WindowId),
    WindowMinimized { window: WindowId, direction: Direction },
    WindowRestored(WindowId),
    TitleChanged { window: WindowId, title: String },
    TabSelected { tab_window: WindowId, index: Option<usize> },
    ViewFocusChanged { previous: Option<WindowId>, focused: Option<WindowId> },
    /// The host should move keyboard focus to this view.
    FocusRequested(WindowId),
}

impl DockingEvent {
    /// Window the event is primarily about.
    pub fn window(&self) -> Option<WindowId> {
        match self {
            DockingEvent::WindowAdded { window, .. }
            | DockingEvent::WindowRemoved { window, .. }
            | DockingEvent::WindowMinimized { window, .. }
            | DockingEvent::TitleChanged { window, .. } => Some(*window),
            DockingEvent::WindowClosed(window)
            | DockingEvent::WindowRestored(window)
            | DockingEvent::FocusRequested(window) => Some(*window),
            DockingEvent::TabSelected { tab_window, .. } => Some(*tab_window),
            DockingEvent::ViewFocusChanged { focused, .. } => *focused,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    pending: Vec<DockingEvent>,
    ready: Vec<DockingEvent>,
}

impl EventQueue {
    pub(crate) fn push(&mut self, event: DockingEvent, in_transaction: bool) {
        if in_transaction {
            self.pending.push(event);
        } else {
            self.ready.push(event);
        }
    }

    /// Release held events.
    ///
    /// Only the last title change per window survives, and events about windows
    /// for which `alive` returns false are dropped when they are title changes.
    pub(crate) fn flush(&mut self, alive: impl Fn(WindowId) -> bool) {
        let pending = std::mem::take(&mut self.pending);
        let mut seen_titles = Vec::new();
        let mut kept: Vec<DockingEvent> = Vec::with_capacity(pending.len());

        for event in pending.into_iter().rev() {
            if let DockingEvent::TitleChanged { window, .. } = &event {
                if !alive(*window) || seen_titles.contains(window) {
                    continue;
                }
                seen_titles.push(*window);
            }
            kept.push(event);
        }
        kept.reverse();
        self.ready.extend(kept);
    }

    pub(crate) fn drain(&mut self) -> Vec<DockingEvent> {
        std::mem::take(&mut self.ready)
    }
}
