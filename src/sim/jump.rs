//! Two-phase scripted jump: linear ascent, then linear descent.
//!
//! Phase-elapsed time is carried as state and advanced by the same frame
//! tick as the rest of the simulation, so the arc is frame-rate independent
//! and a session reset fully clears any jump in flight.

use serde::{Deserialize, Serialize};

use crate::consts::{JUMP_DOWN_DURATION, JUMP_HEIGHT, JUMP_UP_DURATION, PLAYER_GROUND_Y};
use crate::lerp;

/// Jump controller state. At most one jump is in progress at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum JumpState {
    #[default]
    Grounded,
    Ascending {
        elapsed: f32,
    },
    Descending {
        elapsed: f32,
    },
}

impl JumpState {
    /// Whether a new jump request would be accepted
    pub fn can_jump(&self) -> bool {
        matches!(self, JumpState::Grounded)
    }

    /// Begin a jump. Requests while airborne are ignored; returns whether
    /// the request was accepted.
    pub fn request(&mut self) -> bool {
        if !self.can_jump() {
            return false;
        }
        *self = JumpState::Ascending { elapsed: 0.0 };
        true
    }

    /// Advance the jump by `dt` seconds and return the player's height.
    ///
    /// Leftover frame time at the apex rolls into the descent, so the total
    /// airborne time is exactly JUMP_UP_DURATION + JUMP_DOWN_DURATION no
    /// matter how the frames land. Completing the descent snaps the height
    /// back to PLAYER_GROUND_Y exactly and re-arms the jump guard.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let peak = PLAYER_GROUND_Y + JUMP_HEIGHT;

        if let JumpState::Ascending { elapsed } = *self {
            let elapsed = elapsed + dt;
            if elapsed < JUMP_UP_DURATION {
                *self = JumpState::Ascending { elapsed };
                return lerp(PLAYER_GROUND_Y, peak, elapsed / JUMP_UP_DURATION);
            }
            *self = JumpState::Descending {
                elapsed: elapsed - JUMP_UP_DURATION,
            };
            return self.settle_descent(peak);
        }

        if let JumpState::Descending { elapsed } = *self {
            *self = JumpState::Descending {
                elapsed: elapsed + dt,
            };
            return self.settle_descent(peak);
        }

        PLAYER_GROUND_Y
    }

    /// Height for the stored descent time, snapping to the ground when the
    /// phase completes.
    fn settle_descent(&mut self, peak: f32) -> f32 {
        if let JumpState::Descending { elapsed } = *self {
            if elapsed < JUMP_DOWN_DURATION {
                return lerp(peak, PLAYER_GROUND_Y, elapsed / JUMP_DOWN_DURATION);
            }
            *self = JumpState::Grounded;
        }
        PLAYER_GROUND_Y
    }
}
