//! Game state and core simulation types
//!
//! Everything a frame mutates lives in one explicit session struct; the
//! state serializes for boundary snapshots and determinism checks.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::jump::JumpState;
use super::lane::Lane;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Waiting for the start command
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Run ended by a collision
    GameOver,
}

/// The player's avatar.
///
/// x follows the lane, y follows the jump controller, z stays at the origin
/// (the world scrolls instead).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec3::new(0.0, PLAYER_GROUND_Y, 0.0),
        }
    }
}

/// A cube obstacle approaching the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Cubic edge length
    pub size: f32,
    /// World position; y is fixed at size/2 so the cube sits on the track
    pub pos: Vec3,
    /// Randomized once at creation; desynchronizes approach speeds
    pub speed_mult: f32,
}

impl Obstacle {
    /// Half of the cube edge
    pub fn half_extent(&self) -> f32 {
        self.size / 2.0
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed; drives the spawn RNG stream
    pub seed: u64,
    pub phase: GamePhase,
    /// Raw score; floored by `display_score` for presentation
    pub score: f32,
    /// Units per second obstacles approach, before the per-instance multiplier
    pub world_speed: f32,
    /// Seconds between spawn events
    pub spawn_interval: f32,
    /// Accumulates toward the next spawn; resets to 0 when it fires
    pub spawn_timer: f32,
    /// World scroll offset (camera-follow z)
    pub camera_z: f32,
    /// Seconds spent Running this session
    pub run_time: f32,
    pub lane: Lane,
    pub jump: JumpState,
    pub player: Player,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Spawn events so far; indexes the per-spawn RNG stream
    spawn_count: u32,
    /// Next obstacle ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh Idle session with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Idle,
            score: 0.0,
            world_speed: WORLD_SPEED_START,
            spawn_interval: SPAWN_INTERVAL_START,
            spawn_timer: 0.0,
            camera_z: CAMERA_START_Z,
            run_time: 0.0,
            lane: Lane::center(),
            jump: JumpState::Grounded,
            player: Player::default(),
            obstacles: Vec::new(),
            spawn_count: 0,
            next_id: 1,
        }
    }

    /// Reinitialize every mutable field, keeping the run seed. Clears any
    /// jump in flight along with the rest of the session.
    pub fn reset(&mut self) {
        *self = Self::new(self.seed);
    }

    /// Allocate the next obstacle ID
    fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn one obstacle ahead of the camera: a uniformly random lane, an
    /// edge length in [OBSTACLE_SIZE_MIN, OBSTACLE_SIZE_MAX) and a speed
    /// multiplier in [SPEED_MULT_MIN, SPEED_MULT_MAX).
    ///
    /// Each spawn draws from its own seed-derived PCG stream, so a run
    /// replays identically from its seed.
    pub fn spawn_obstacle(&mut self) {
        let stream = (self.spawn_count as u64)
            .wrapping_mul(2654435761)
            .wrapping_add(self.seed);
        let mut rng = Pcg32::seed_from_u64(stream);
        self.spawn_count += 1;

        let lane_x = LANE_XS[rng.random_range(0..LANE_XS.len())];
        let size = rng.random_range(OBSTACLE_SIZE_MIN..OBSTACLE_SIZE_MAX);
        let speed_mult = rng.random_range(SPEED_MULT_MIN..SPEED_MULT_MAX);

        let id = self.next_obstacle_id();
        self.obstacles.push(Obstacle {
            id,
            size,
            pos: Vec3::new(lane_x, size / 2.0, self.camera_z - SPAWN_AHEAD),
            speed_mult,
        });
    }

    /// Score as shown to the player
    pub fn display_score(&self) -> u32 {
        self.score.floor() as u32
    }

    /// Per-frame view handed to the presentation layer
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            player: self.player.pos.to_array(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    pos: o.pos.to_array(),
                    size: o.size,
                })
                .collect(),
            score: self.display_score(),
            camera_z: self.camera_z,
            game_over: self.phase == GamePhase::GameOver,
        }
    }
}

/// Obstacle fields the renderer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub pos: [f32; 3],
    pub size: f32,
}

/// Serializable frame output for the host page's renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub player: [f32; 3],
    pub obstacles: Vec<ObstacleView>,
    pub score: u32,
    pub camera_z: f32,
    pub game_over: bool,
}
