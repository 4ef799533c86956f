//! Error types for docking operations and layout streams.

use crate::types::WindowId;

/// Errors returned by docking operations.
///
/// Structural misuse that can only come from a bug (mutating the children of a
/// view) panics instead of returning one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockError {
    /// Window handle does not resolve (never existed or already disposed).
    WindowNotFound(WindowId),
    /// Window is not of the kind the operation needs.
    InvalidWindowType(WindowId),
    /// The dragged/inserted window is the target itself or one of its ancestors.
    AncestorDrop {
        window: WindowId,
        target: WindowId,
    },
    /// The window's flags forbid the operation.
    NotPermitted {
        window: WindowId,
        operation: &'static str,
    },
    /// `child` is not a child of `parent`.
    NotAChild { parent: WindowId, child: WindowId },
    /// Root windows and window bars cannot be moved, closed or minimized.
    RootWindowOperation(WindowId),
    /// A view must be detached before it can be disposed.
    ViewStillAttached(WindowId),
    /// Layout stream was written by a newer engine.
    UnsupportedVersion { found: i32, supported: i32 },
    /// Unknown window type tag in a layout stream.
    InvalidTypeTag(i32),
    /// Unknown location tag in a layout stream.
    InvalidLocationTag(i32),
    /// Layout stream ended in the middle of a record.
    UnexpectedEndOfStream,
    /// Layout stream is well-formed but describes an impossible tree.
    InvalidLayout(String),
    /// The view serializer failed.
    View(String),
}

impl std::fmt::Display for DockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DockError::WindowNotFound(id) => write!(f, "Window {} not found", id),
            DockError::InvalidWindowType(id) => {
                write!(f, "Window {} is not the expected type", id)
            }
            DockError::AncestorDrop { window, target } => write!(
                f,
                "Window {} cannot be docked into its own subtree at {}",
                window, target
            ),
            DockError::NotPermitted { window, operation } => {
                write!(f, "Window {} does not allow {}", window, operation)
            }
            DockError::NotAChild { parent, child } => {
                write!(f, "Window {} is not a child of {}", child, parent)
            }
            DockError::RootWindowOperation(id) => {
                write!(f, "Window {} is a root or window bar", id)
            }
            DockError::ViewStillAttached(id) => write!(f, "View {} is still attached", id),
            DockError::UnsupportedVersion { found, supported } => write!(
                f,
                "Layout version {} is newer than supported version {}",
                found, supported
            ),
            DockError::InvalidTypeTag(tag) => write!(f, "Invalid window type tag {}", tag),
            DockError::InvalidLocationTag(tag) => write!(f, "Invalid location tag {}", tag),
            DockError::UnexpectedEndOfStream => write!(f, "Unexpected end of layout stream"),
            DockError::InvalidLayout(msg) => write!(f, "Invalid layout: {}", msg),
            DockError::View(msg) => write!(f, "View serializer error: {}", msg),
        }
    }
}

impl std::error::Error for DockError {}

/// Result type for docking operations.
pub type DockResult<T> = Result<T, DockError>;
