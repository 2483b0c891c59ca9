//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timestep supplied by the caller (variable, clamped)
//! - Seeded RNG only
//! - Stable obstacle ordering
//! - No rendering or platform dependencies

pub mod collision;
pub mod jump;
pub mod lane;
pub mod state;
pub mod tick;

pub use collision::{overlaps_depth, overlaps_lane, overlaps_vertically, player_hits_obstacle};
pub use jump::JumpState;
pub use lane::Lane;
pub use state::{GamePhase, GameState, Obstacle, ObstacleView, Player, RenderSnapshot};
pub use tick::{TickInput, tick};
