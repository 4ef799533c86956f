//! Shared types for the docking engine.

use std::fmt;
use std::num::NonZeroU64;

/// Stable handle of a window in a [`DockingTree`](crate::DockingTree).
///
/// Handles are never reused, so a handle to a disposed window simply stops
/// resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(NonZeroU64);

impl WindowId {
    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub(crate) const fn first() -> Self {
        Self(NonZeroU64::MIN)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Raw numeric value, mostly useful for logging.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static_assertions::assert_eq_size!(WindowId, Option<WindowId>);

/// Edge direction, used for splits, window bars and minimizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in tie-break order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Whether a split towards this direction places windows side by side.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Whether a window placed in this direction becomes the left/top child.
    pub fn is_before(self) -> bool {
        matches!(self, Direction::Left | Direction::Up)
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Position in [`Direction::ALL`], also the stream encoding.
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Host key code, compared against the configured abort-drag key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const ESCAPE: KeyCode = KeyCode(27);
}

bitflags::bitflags! {
    /// Per-window capabilities.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u8 {
        const CLOSABLE = 1 << 0;
        const MINIMIZABLE = 1 << 1;
        const RESTORABLE = 1 << 2;
        const DRAG_ENABLED = 1 << 3;
    }
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self::all()
    }
}
