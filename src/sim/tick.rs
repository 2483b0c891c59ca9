//! Per-frame simulation step
//!
//! One call advances the whole session by the frame delta supplied by the
//! render loop: lane and jump input, spawning, obstacle motion, collision,
//! the difficulty ramp, and the camera scroll all move inside this step.

use super::collision::player_hits_obstacle;
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Input edges for a single frame.
///
/// Each flag is latched by the entry point when the key/button fires and
/// cleared after the tick consumes it.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub start: bool,
    pub reset: bool,
}

/// Advance the session by one frame.
///
/// `dt` is elapsed seconds since the previous frame, clamped to
/// MAX_FRAME_DT to bound catch-up after a stalled tab.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = dt.clamp(0.0, MAX_FRAME_DT);

    // Reset is honored from any phase
    if input.reset {
        state.reset();
        return;
    }

    match state.phase {
        GamePhase::Idle => {
            if input.start {
                state.phase = GamePhase::Running;
                log::info!("session started (seed {})", state.seed);
            }
            return;
        }
        GamePhase::GameOver => return,
        GamePhase::Running => {}
    }

    state.run_time += dt;

    // Lane input, then recompute x from the lane mapping
    if input.move_left {
        state.lane.move_left();
    }
    if input.move_right {
        state.lane.move_right();
    }
    state.player.pos.x = state.lane.x();

    // Jump: requests while airborne are no-ops; advancing owns player y
    if input.jump {
        state.jump.request();
    }
    state.player.pos.y = state.jump.advance(dt);

    // Spawner: each firing also ramps difficulty (event-driven, per spawn)
    state.spawn_timer += dt;
    if state.spawn_timer >= state.spawn_interval {
        state.spawn_timer = 0.0;
        state.spawn_obstacle();
        state.spawn_interval =
            (state.spawn_interval - SPAWN_INTERVAL_STEP).max(SPAWN_INTERVAL_MIN);
        state.world_speed += WORLD_SPEED_STEP;
    }

    // Advance, recycle, collide. Reverse index order keeps removal safe
    // mid-traversal and preserves the survivors' relative order.
    let despawn_z = state.camera_z + DESPAWN_MARGIN;
    let mut collided = false;
    for i in (0..state.obstacles.len()).rev() {
        let step = state.world_speed * state.obstacles[i].speed_mult * dt;
        state.obstacles[i].pos.z += step;

        if state.obstacles[i].pos.z > despawn_z {
            state.obstacles.remove(i);
            state.score += POINTS_PER_PASS;
            continue;
        }

        if player_hits_obstacle(&state.player, &state.obstacles[i]) {
            collided = true;
        }
    }

    if collided {
        state.phase = GamePhase::GameOver;
        log::info!("game over at score {}", state.display_score());
    }

    // Camera-follow scroll
    state.camera_z -= state.world_speed * CAMERA_SCROLL_FACTOR * dt;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use glam::Vec3;
    use proptest::prelude::*;

    /// Typical frame delta used throughout the tests
    const FRAME: f32 = 0.016;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, 0.0);
        assert_eq!(state.phase, GamePhase::Running);
        state
    }

    fn obstacle_at(x: f32, z: f32, size: f32, speed_mult: f32) -> Obstacle {
        Obstacle {
            id: 99,
            size,
            pos: Vec3::new(x, size / 2.0, z),
            speed_mult,
        }
    }

    #[test]
    fn idle_ignores_simulation_input() {
        let mut state = GameState::new(1);
        let input = TickInput {
            move_left: true,
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.player.pos.x, 0.0);
        assert!(state.jump.can_jump());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.run_time, 0.0);
    }

    #[test]
    fn start_command_begins_running() {
        let state = running_state(1);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn game_over_ignores_simulation_input() {
        let mut state = running_state(1);
        state.phase = GamePhase::GameOver;
        let before = state.clone();
        let input = TickInput {
            move_right: true,
            jump: true,
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.pos, before.player.pos);
        assert_eq!(state.score, before.score);
        assert_eq!(state.camera_z, before.camera_z);
    }

    #[test]
    fn lane_input_moves_player_x() {
        let mut state = running_state(1);
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &left, FRAME);
        assert_eq!(state.player.pos.x, -3.0);

        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        tick(&mut state, &right, FRAME);
        tick(&mut state, &right, FRAME);
        assert_eq!(state.player.pos.x, 3.0);
        // Clamped at the bound
        tick(&mut state, &right, FRAME);
        assert_eq!(state.player.pos.x, 3.0);
    }

    #[test]
    fn spawn_fires_at_exact_interval() {
        // A frame landing exactly on the interval boundary must fire
        let step = 0.0625;
        let mut state = running_state(7);
        state.spawn_timer = state.spawn_interval - step;
        tick(&mut state, &TickInput::default(), step);

        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.spawn_timer, 0.0);
        assert!((state.world_speed - (WORLD_SPEED_START + WORLD_SPEED_STEP)).abs() < 1e-6);
        assert!(
            (state.spawn_interval - (SPAWN_INTERVAL_START - SPAWN_INTERVAL_STEP)).abs() < 1e-6
        );
    }

    #[test]
    fn no_spawn_before_the_interval() {
        let mut state = running_state(7);
        let mut elapsed = 0.0;
        while elapsed + FRAME < SPAWN_INTERVAL_START - FRAME {
            tick(&mut state, &TickInput::default(), FRAME);
            elapsed += FRAME;
        }
        assert!(state.obstacles.is_empty());
        assert_eq!(state.world_speed, WORLD_SPEED_START);
    }

    #[test]
    fn spawned_obstacles_stay_within_documented_ranges() {
        let mut state = running_state(42);
        for _ in 0..50 {
            state.spawn_obstacle();
        }
        for o in &state.obstacles {
            assert!((OBSTACLE_SIZE_MIN..OBSTACLE_SIZE_MAX).contains(&o.size));
            assert!((SPEED_MULT_MIN..SPEED_MULT_MAX).contains(&o.speed_mult));
            assert!(LANE_XS.contains(&o.pos.x));
            assert_eq!(o.pos.y, o.size / 2.0);
            assert_eq!(o.pos.z, state.camera_z - SPAWN_AHEAD);
        }
        // IDs are unique and ascending
        for pair in state.obstacles.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[test]
    fn spawns_replay_identically_from_the_seed() {
        let mut a = running_state(1234);
        let mut b = running_state(1234);
        for _ in 0..10 {
            a.spawn_obstacle();
            b.spawn_obstacle();
        }
        assert_eq!(a.obstacles, b.obstacles);
    }

    #[test]
    fn passed_obstacle_is_recycled_and_scored() {
        let mut state = running_state(5);
        // In a side lane, one step short of the despawn threshold
        let z = state.camera_z + DESPAWN_MARGIN - 0.01;
        state.obstacles.push(obstacle_at(3.0, z, 1.0, 1.0));
        tick(&mut state, &TickInput::default(), FRAME);

        assert!(state.obstacles.is_empty());
        assert_eq!(state.display_score(), 10);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn score_counts_each_pass_exactly_once() {
        let mut state = running_state(5);
        let near = state.camera_z + DESPAWN_MARGIN - 0.01;
        state.obstacles.push(obstacle_at(3.0, near, 1.0, 1.0));
        state.obstacles.push(obstacle_at(-3.0, -60.0, 1.0, 1.0));
        tick(&mut state, &TickInput::default(), FRAME);

        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.display_score(), 10);

        // The survivor scores nothing while still live
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.display_score(), 10);
    }

    #[test]
    fn dead_center_approach_ends_the_run() {
        let mut state = running_state(9);
        state.obstacles.push(obstacle_at(0.0, -2.0, 1.0, 1.0));

        let mut frames = 0;
        while state.phase == GamePhase::Running && frames < 200 {
            tick(&mut state, &TickInput::default(), FRAME);
            frames += 1;
        }
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn jump_clears_an_overlapping_obstacle() {
        // The cube passes under the player while the jump is airborne
        let mut state = running_state(9);
        state.obstacles.push(obstacle_at(0.0, -1.25, 1.0, 0.6));

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, 0.1);
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), 0.1);
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.player.pos.y, PLAYER_GROUND_Y);

        // Control: the same approach without jumping is fatal
        let mut grounded = running_state(9);
        grounded.obstacles.push(obstacle_at(0.0, -1.25, 1.0, 0.6));
        for _ in 0..6 {
            tick(&mut grounded, &TickInput::default(), 0.1);
        }
        assert_eq!(grounded.phase, GamePhase::GameOver);
    }

    #[test]
    fn collision_outcome_is_order_independent() {
        let scene = [
            obstacle_at(-3.0, -40.0, 1.2, 0.5),
            obstacle_at(0.0, -0.5, 1.0, 0.3),
            obstacle_at(3.0, -15.0, 0.8, 1.2),
        ];

        let permutations: Vec<Vec<Obstacle>> = vec![
            scene.to_vec(),
            scene.iter().rev().copied().collect(),
            vec![scene[1], scene[2], scene[0]],
        ];
        for (id, perm) in permutations.iter().enumerate() {
            let mut state = running_state(3);
            state.obstacles = perm.clone();
            tick(&mut state, &TickInput::default(), FRAME);
            assert_eq!(
                state.phase,
                GamePhase::GameOver,
                "permutation {id} diverged"
            );
        }
    }

    #[test]
    fn reset_restores_initial_constants() {
        let mut state = running_state(11);
        // Let the session ramp up, drift, and spawn for a while
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &left, FRAME);
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), 0.1);
        }
        assert!(!state.obstacles.is_empty());

        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &reset, FRAME);

        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0.0);
        assert_eq!(state.world_speed, WORLD_SPEED_START);
        assert_eq!(state.spawn_interval, SPAWN_INTERVAL_START);
        assert_eq!(state.spawn_timer, 0.0);
        assert_eq!(state.run_time, 0.0);
        assert_eq!(state.lane.index(), 0);
        assert_eq!(state.camera_z, CAMERA_START_Z);
        assert_eq!(state.player.pos, Vec3::new(0.0, PLAYER_GROUND_Y, 0.0));
    }

    #[test]
    fn reset_mid_jump_clears_the_jump() {
        let mut state = running_state(11);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, 0.1);
        assert!(!state.jump.can_jump());
        assert!(state.player.pos.y > PLAYER_GROUND_Y);

        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &reset, FRAME);
        assert!(state.jump.can_jump());
        assert_eq!(state.player.pos.y, PLAYER_GROUND_Y);

        // A restarted session is not disturbed by the old jump
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, 0.0);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), FRAME);
            assert_eq!(state.player.pos.y, PLAYER_GROUND_Y);
        }
    }

    #[test]
    fn camera_scrolls_forward_while_running() {
        let mut state = running_state(2);
        let before = state.camera_z;
        tick(&mut state, &TickInput::default(), FRAME);
        assert!(state.camera_z < before);
    }

    #[test]
    fn oversized_frame_delta_is_clamped() {
        let mut state = running_state(2);
        tick(&mut state, &TickInput::default(), 5.0);
        assert!((state.spawn_timer - MAX_FRAME_DT).abs() < 1e-6);
        assert!((state.run_time - MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn sessions_with_equal_seeds_replay_identically() {
        let script = [
            TickInput {
                move_left: true,
                ..Default::default()
            },
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                move_right: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        let mut a = running_state(777);
        let mut b = running_state(777);
        for frame in 0..600 {
            let input = &script[frame % script.len()];
            tick(&mut a, input, 0.02);
            tick(&mut b, input, 0.02);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score, b.score);
        assert_eq!(a.camera_z, b.camera_z);
        assert_eq!(a.obstacles, b.obstacles);
    }

    proptest! {
        #[test]
        fn difficulty_ramp_is_monotone(
            dts in proptest::collection::vec(1e-3f32..0.1, 1..400),
        ) {
            let mut state = running_state(31);
            let mut last_speed = state.world_speed;
            let mut last_interval = state.spawn_interval;
            let mut last_score = state.score;
            for dt in dts {
                tick(&mut state, &TickInput::default(), dt);
                prop_assert!(state.world_speed >= last_speed);
                prop_assert!(state.spawn_interval <= last_interval);
                prop_assert!(state.spawn_interval >= SPAWN_INTERVAL_MIN - 1e-6);
                prop_assert!(state.score >= last_score);
                last_speed = state.world_speed;
                last_interval = state.spawn_interval;
                last_score = state.score;
            }
        }
    }
}
