//! Fixed-step simulation tick
//!
//! Advances a single-player session by one frame. The order inside a running
//! frame is fixed so that collisions are always checked against this frame's
//! positions.

use super::collision::{collides, out_of_bounds};
use super::state::{GameEvent, GamePhase, GameState};

/// Amplitude (px) and rate of the idle bob on the title screen
const IDLE_BOB_AMPLITUDE: f32 = 6.0;
const IDLE_BOB_RATE: f32 = 0.15;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap requested this frame
    pub jump: bool,
    /// Idle/demo mode - the built-in pilot decides when to flap
    pub autopilot: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    let wants_jump = input.jump
        || (input.autopilot
            && (state.phase == GamePhase::NotStarted || autopilot_wants_jump(state)));

    match state.phase {
        GamePhase::Ended => return,
        GamePhase::Dying => {
            death_step(state);
            return;
        }
        GamePhase::NotStarted => {
            if !wants_jump {
                idle_step(state);
                return;
            }
            log::info!("run started (seed {})", state.world.settings.seed);
            state.phase = GamePhase::Running;
        }
        GamePhase::Running => {}
    }

    running_step(state, wants_jump);
}

/// Title screen: only the ground scrolls and the actor bobs in place
fn idle_step(state: &mut GameState) {
    let world = &mut state.world;
    world.frame += 1;
    world.ground.advance(world.settings.scroll_speed);

    let phase = world.frame as f32 * IDLE_BOB_RATE;
    state.actor.pos.y = world.settings.actor_start_y + phase.sin() * IDLE_BOB_AMPLITUDE;
}

fn running_step(state: &mut GameState, wants_jump: bool) {
    let world = &mut state.world;
    let actor = &mut state.actor;
    let speed = world.settings.scroll_speed;
    let pipe_width = world.sprites.pipe_width();

    world.frame += 1;

    // 1. Input
    if wants_jump && actor.can_jump() {
        actor.jump();
        state.events.push(GameEvent::Flapped);
    }

    // 2. Actor physics
    actor.tick();
    actor.refresh_silhouette(&world.sprites.actor);

    // 3. Ground
    world.ground.advance(speed);

    // 4. Interval spawning
    if world.spawner.on_frame() {
        let x = world.spawner.spawn_x;
        world.spawn_obstacle(x);
    }

    // 5. Gates, oldest first
    let mut cleared = false;
    for obstacle in world.obstacles.iter_mut() {
        obstacle.advance(speed);

        if obstacle.has_passed(actor.pos.x) {
            world.score += 1;
            cleared = true;
            state.events.push(GameEvent::Scored { score: world.score });
            log::debug!("cleared gate {} (score {})", obstacle.id, world.score);
        }

        if !actor.disabled && collides(actor, obstacle, &world.sprites) {
            actor.disable();
            state.events.push(GameEvent::Collided);
            log::info!("hit gate {} at frame {}", obstacle.id, world.frame);
        }
    }

    // 6. Retire off-screen gates
    world.obstacles.retain(|o| !o.is_off_screen(pipe_width));
    if cleared && world.spawner.spawns_on_pass() {
        let x = world.spawner.spawn_x;
        world.spawn_obstacle(x);
    }

    // 7. Ground / ceiling
    if !actor.disabled && out_of_bounds(actor, world.settings.ground_line) {
        actor.disable();
        state.events.push(GameEvent::Collided);
        log::info!("left the playfield at frame {} (y={:.1})", world.frame, actor.pos.y);
    }

    // 8. Hand over to the death animation
    if actor.disabled {
        state.phase = GamePhase::Dying;
    }
}

/// One step of the forced fall after a collision
pub fn death_step(state: &mut GameState) {
    if state.phase != GamePhase::Dying {
        return;
    }
    let ground_line = state.world.settings.ground_line;
    let actor = &mut state.actor;

    actor.fall_collided();
    actor.refresh_silhouette(&state.world.sprites.actor);

    if actor.bottom() >= ground_line {
        actor.pos.y = ground_line - actor.silhouette().height() as f32 / 2.0;
        state.phase = GamePhase::Ended;
        state.events.push(GameEvent::Landed);
        log::info!(
            "run ended: score {} after {} frames",
            state.world.score,
            state.world.frame
        );
    }
}

/// Built-in pilot: flap whenever the actor sinks below the middle of the
/// next opening (slightly biased toward the lower piece).
pub fn autopilot_wants_jump(state: &GameState) -> bool {
    let actor = &state.actor;
    let world = &state.world;

    let target = match world.nearest_obstacle(actor.pos.x) {
        Some(gate) => gate.gate_center + gate.gate_half_gap * 0.3,
        None => world.settings.ground_line * 0.5,
    };
    actor.pos.y > target && actor.vertical_velocity >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::{JumpPolicy, Settings, SpawnPolicy};
    use crate::sim::Sprites;
    use crate::sim::state::Obstacle;

    fn state_with(settings: Settings) -> GameState {
        GameState::new(settings, Sprites::procedural())
    }

    fn jump() -> TickInput {
        TickInput {
            jump: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_not_started_to_running() {
        let mut state = state_with(Settings::default());
        assert_eq!(state.phase, GamePhase::NotStarted);

        // Tick without input - should stay idle and not fall
        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert!((state.actor.pos.y - ACTOR_START_Y).abs() <= IDLE_BOB_AMPLITUDE);
        assert!(state.world.obstacles.is_empty());

        tick(&mut state, &jump());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.actor.vertical_velocity, JUMP_FORCE + GRAVITY);
        assert_eq!(state.drain_events(), vec![GameEvent::Flapped]);
    }

    #[test]
    fn test_velocity_reaches_terminal() {
        let mut state = state_with(Settings {
            wait_for_first_flap: false,
            ..Default::default()
        });
        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
            assert!(state.actor.vertical_velocity <= MAX_FALL_SPEED);
        }
        assert_eq!(state.actor.vertical_velocity, MAX_FALL_SPEED);
    }

    #[test]
    fn test_interval_spawning() {
        let mut state = state_with(Settings {
            wait_for_first_flap: false,
            gravity: 0.0,
            spawn_policy: SpawnPolicy::Interval { frames: 10 },
            ..Default::default()
        });
        for _ in 0..9 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.world.obstacles.is_empty());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.world.obstacles.len(), 1);
        // Spawned at the spawn point and moved once in the same frame
        assert_eq!(state.world.obstacles[0].x, SCREEN_WIDTH + SPAWN_OFFSET - SCROLL_SPEED);
    }

    #[test]
    fn test_clean_pass_scores_once() {
        let mut state = state_with(Settings {
            wait_for_first_flap: false,
            gravity: 0.0,
            spawn_policy: SpawnPolicy::Interval { frames: u32::MAX },
            ..Default::default()
        });
        state
            .world
            .obstacles
            .push(Obstacle::new(99, 600.0, ACTOR_START_Y, GATE_GAP / 2.0));

        for _ in 0..200 {
            tick(&mut state, &TickInput::default());
            assert_eq!(state.phase, GamePhase::Running);
        }
        assert_eq!(state.score(), 1);
        let events = state.drain_events();
        assert_eq!(events, vec![GameEvent::Scored { score: 1 }]);
        // Fully scrolled off and retired
        assert!(state.world.obstacles.is_empty());
    }

    #[test]
    fn test_gate_collision_disables_actor() {
        let mut state = state_with(Settings {
            wait_for_first_flap: false,
            gravity: 0.0,
            spawn_policy: SpawnPolicy::Interval { frames: u32::MAX },
            ..Default::default()
        });
        // Opening far above the actor
        state.world.obstacles.push(Obstacle::new(1, 300.0, 150.0, 70.0));

        let mut frames = 0;
        while state.phase == GamePhase::Running {
            tick(&mut state, &TickInput::default());
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(state.phase, GamePhase::Dying);
        assert!(state.actor.disabled);
        assert!(state.drain_events().contains(&GameEvent::Collided));

        // Jumps are ignored while dying
        tick(&mut state, &jump());
        assert!(!state.drain_events().contains(&GameEvent::Flapped));
    }

    #[test]
    fn test_ground_death_runs_to_end() {
        let mut state = state_with(Settings {
            wait_for_first_flap: false,
            ..Default::default()
        });

        let mut frames = 0;
        while state.phase == GamePhase::Running {
            tick(&mut state, &TickInput::default());
            frames += 1;
        }
        assert!(state.actor.disabled);
        assert!(out_of_bounds(&state.actor, GROUND_LINE));
        assert!(frames < 90, "no gate should have spawned yet");

        while state.running() {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.actor.bottom(), GROUND_LINE);
        assert_eq!(state.actor.rotation_angle, MAX_DOWN_ROTATION);
        let events = state.drain_events();
        assert_eq!(events, vec![GameEvent::Collided, GameEvent::Landed]);
    }

    #[test]
    fn test_ceiling_death() {
        let mut state = state_with(Settings {
            wait_for_first_flap: false,
            jump_policy: JumpPolicy::Always,
            ..Default::default()
        });
        while state.phase == GamePhase::Running {
            tick(&mut state, &jump());
        }
        assert!(state.actor.pos.y < 0.0);
        assert!(state.actor.disabled);
        assert_eq!(state.phase, GamePhase::Dying);

        while state.running() {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.actor.bottom(), GROUND_LINE);
    }

    #[test]
    fn test_ended_is_terminal() {
        let mut state = state_with(Settings {
            wait_for_first_flap: false,
            ..Default::default()
        });
        while state.running() {
            tick(&mut state, &TickInput::default());
        }
        let y = state.actor.pos.y;
        let frame = state.world.frame;
        tick(&mut state, &jump());
        assert_eq!(state.actor.pos.y, y);
        assert_eq!(state.world.frame, frame);
    }

    #[test]
    fn test_on_pass_spawns_next_gate() {
        let mut state = state_with(Settings {
            wait_for_first_flap: false,
            gravity: 0.0,
            spawn_policy: SpawnPolicy::OnPass,
            ..Default::default()
        });
        // Replace the random first gate with one centred on the actor
        state.world.obstacles[0].gate_center = ACTOR_START_Y;
        assert_eq!(state.world.obstacles.len(), 1);

        while state.score() == 0 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.world.obstacles.len(), 2);
        assert_eq!(state.world.obstacles[1].x, SCREEN_WIDTH + SPAWN_OFFSET);
    }

    #[test]
    fn test_determinism() {
        let settings = Settings {
            seed: 99999,
            wait_for_first_flap: false,
            spawn_policy: SpawnPolicy::Interval { frames: 20 },
            ..Default::default()
        };
        let mut state1 = state_with(settings.clone());
        let mut state2 = state_with(settings);

        for frame in 0..120 {
            let input = TickInput {
                jump: frame % 7 == 0,
                ..Default::default()
            };
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        assert_eq!(state1.world.frame, state2.world.frame);
        assert_eq!(state1.actor.pos, state2.actor.pos);
        assert_eq!(state1.world.obstacles.len(), state2.world.obstacles.len());
        for (a, b) in state1.world.obstacles.iter().zip(&state2.world.obstacles) {
            assert_eq!(a.gate_center, b.gate_center);
        }
    }

    #[test]
    fn test_autopilot_starts_and_flaps() {
        let mut state = state_with(Settings::default());
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut state, &input);
        }
        assert_ne!(state.phase, GamePhase::NotStarted);
        let flaps = state
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::Flapped)
            .count();
        assert!(flaps > 1);
    }
}
