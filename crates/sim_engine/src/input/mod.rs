//! Input management system
//!
//! The core never talks to a window or device directly. The host samples
//! its pointer device once per frame, runs the raw state through a
//! [`PointerTracker`] to detect press edges, and hands the resulting
//! [`PointerSnapshot`] to the world before `update`.

use crate::foundation::math::Vec2;

/// Raw pointer state as sampled from the host's input device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// Last absolute pointer position in world coordinates
    pub position: Vec2,

    /// Whether the primary button is currently held down
    pub primary_down: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            primary_down: false,
        }
    }
}

/// Edge-triggered pointer state for a single frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSnapshot {
    /// Last absolute pointer position in world coordinates
    pub position: Vec2,

    /// True only on the frame the primary button transitioned to down
    pub primary_pressed: bool,
}

/// Tracks pointer button transitions across frames
///
/// Feed it the raw state once per frame; it reports press edges rather
/// than level state, so a held button latches a command only once.
#[derive(Debug, Default)]
pub struct PointerTracker {
    was_down: bool,
}

impl PointerTracker {
    /// Create a new tracker with no button history
    pub fn new() -> Self {
        Self::default()
    }

    /// Update with this frame's raw state and produce an edge snapshot
    pub fn update(&mut self, state: PointerState) -> PointerSnapshot {
        let pressed = state.primary_down && !self.was_down;
        self.was_down = state.primary_down;
        PointerSnapshot {
            position: state.position,
            primary_pressed: pressed,
        }
    }
}
