//! Axis-aligned overlap tests between the player and cube obstacles.
//!
//! Each axis is tested independently; all three must overlap in the same
//! frame for a hit.

use super::state::{Obstacle, Player};
use crate::consts::{PLAYER_HALF_DEPTH, PLAYER_HALF_WIDTH, PLAYER_HEIGHT_MARGIN};

/// Lane-axis overlap: |dx| < obstacle half-width + player margin
#[inline]
pub fn overlaps_lane(player: &Player, obstacle: &Obstacle) -> bool {
    (obstacle.pos.x - player.pos.x).abs() < obstacle.half_extent() + PLAYER_HALF_WIDTH
}

/// Depth-axis overlap: |dz| < obstacle half-depth + player margin
#[inline]
pub fn overlaps_depth(player: &Player, obstacle: &Obstacle) -> bool {
    (obstacle.pos.z - player.pos.z).abs() < obstacle.half_extent() + PLAYER_HALF_DEPTH
}

/// Vertical overlap: the player is still inside the obstacle's vertical
/// extent.
///
/// One-sided: only the player's lower bound is tested, so climbing above
/// size + margin is the only escape.
#[inline]
pub fn overlaps_vertically(player: &Player, obstacle: &Obstacle) -> bool {
    player.pos.y < obstacle.size + PLAYER_HEIGHT_MARGIN
}

/// Full three-axis test
pub fn player_hits_obstacle(player: &Player, obstacle: &Obstacle) -> bool {
    overlaps_lane(player, obstacle)
        && overlaps_depth(player, obstacle)
        && overlaps_vertically(player, obstacle)
}
