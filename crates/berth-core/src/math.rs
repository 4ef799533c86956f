/// Vector math re-exported from [`glam`].
///
/// Pointer positions, drag deltas and rectangle corners are all [`Vec2`]s.
///
/// ```
/// use berth_core::math::Vec2;
///
/// let press = Vec2::new(10.0, 20.0);
/// let now = Vec2::new(13.0, 24.0);
/// assert_eq!((now - press).length(), 5.0);
/// ```
///
/// [`glam`]: https://docs.rs/glam
pub use glam::{Vec2, vec2};
