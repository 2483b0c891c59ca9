//! Lane model: three fixed tracks mapped to world x-coordinates.

use serde::{Deserialize, Serialize};

use crate::consts::LANE_XS;

/// Leftmost lane index
pub const LANE_MIN: i8 = -1;
/// Rightmost lane index
pub const LANE_MAX: i8 = 1;

/// Discrete lane the player occupies.
///
/// The index stays inside [LANE_MIN, LANE_MAX]; movement clamps at the
/// bounds rather than wrapping, so the coordinate lookup never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    index: i8,
}

impl Default for Lane {
    fn default() -> Self {
        Self::center()
    }
}

impl Lane {
    /// The center lane
    pub fn center() -> Self {
        Self { index: 0 }
    }

    pub fn index(&self) -> i8 {
        self.index
    }

    /// Shift one lane left; no-op at the left bound
    pub fn move_left(&mut self) {
        if self.index > LANE_MIN {
            self.index -= 1;
        }
    }

    /// Shift one lane right; no-op at the right bound
    pub fn move_right(&mut self) {
        if self.index < LANE_MAX {
            self.index += 1;
        }
    }

    /// World x-coordinate of this lane
    pub fn x(&self) -> f32 {
        LANE_XS[(self.index - LANE_MIN) as usize]
    }
}
