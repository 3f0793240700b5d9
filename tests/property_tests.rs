use proptest::prelude::*;

use flappy_core::consts::*;
use flappy_core::settings::GateJitter;
use flappy_core::sim::{Actor, Ground, Kinematics, Obstacle, Sprites, World, collides};
use flappy_core::{JumpPolicy, Settings};

fn policy() -> impl Strategy<Value = JumpPolicy> {
    prop_oneof![Just(JumpPolicy::Always), Just(JumpPolicy::WhenFalling)]
}

fn actor_with(policy: JumpPolicy, sprites: &Sprites) -> Actor {
    let settings = Settings {
        jump_policy: policy,
        ..Default::default()
    };
    Actor::new(ACTOR_START_X, ACTOR_START_Y, Kinematics::from(&settings), &sprites.actor)
}

proptest! {
    #[test]
    fn velocity_and_rotation_stay_clamped(
        policy in policy(),
        jumps in prop::collection::vec(any::<bool>(), 1..300),
    ) {
        let sprites = Sprites::procedural();
        let mut actor = actor_with(policy, &sprites);
        for jump in jumps {
            if jump {
                actor.jump();
            }
            actor.tick();
            prop_assert!(actor.vertical_velocity >= JUMP_FORCE);
            prop_assert!(actor.vertical_velocity <= MAX_FALL_SPEED);
            prop_assert!(actor.rotation_angle >= MAX_DOWN_ROTATION);
            prop_assert!(actor.rotation_angle <= MAX_UP_ROTATION);
            prop_assert_eq!(actor.pos.x, ACTOR_START_X);
        }
    }

    #[test]
    fn guarded_jump_is_idempotent(v in JUMP_FORCE..=MAX_FALL_SPEED) {
        let sprites = Sprites::procedural();
        let mut once = actor_with(JumpPolicy::WhenFalling, &sprites);
        once.vertical_velocity = v;
        let mut twice = once.clone();

        once.jump();
        twice.jump();
        twice.jump();
        prop_assert_eq!(once.vertical_velocity, twice.vertical_velocity);
    }

    #[test]
    fn disabled_actor_ignores_jumps(policy in policy(), v in JUMP_FORCE..=MAX_FALL_SPEED) {
        let sprites = Sprites::procedural();
        let mut actor = actor_with(policy, &sprites);
        actor.vertical_velocity = v;
        actor.disable();
        actor.jump();
        prop_assert_eq!(actor.vertical_velocity, v);
    }

    #[test]
    fn gates_are_always_legal(
        seed in any::<u64>(),
        gap in 60.0f32..250.0,
        jitter in prop::option::of((0.0f32..=1.0, 0.0f32..200.0)),
    ) {
        let settings = Settings {
            seed,
            gate_gap: gap,
            gate_jitter: jitter.map(|(probability, max_offset)| GateJitter { probability, max_offset }),
            ..Default::default()
        };
        let sprites = Sprites::procedural();
        let clearance = sprites.gate_clearance();
        let mut world = World::new(settings, sprites);
        for _ in 0..50 {
            world.spawn_obstacle(SCREEN_WIDTH);
        }
        for gate in &world.obstacles {
            prop_assert!(gate.top_extent() < gate.bottom_extent());
            prop_assert!((gate.bottom_extent() - gate.top_extent() - gap).abs() < 1e-3);
            prop_assert!(gate.top_extent() >= clearance - 1e-3);
            prop_assert!(gate.bottom_extent() + clearance <= GROUND_LINE + 1e-3);
        }
    }

    #[test]
    fn a_gate_is_passed_at_most_once(
        start in -200.0f32..900.0,
        speed in 0.5f32..20.0,
        steps in 1usize..400,
    ) {
        let mut gate = Obstacle::new(1, start, 400.0, 70.0);
        let mut passes = 0;
        for _ in 0..steps {
            gate.advance(speed);
            if gate.has_passed(ACTOR_START_X) {
                passes += 1;
            }
        }
        prop_assert!(passes <= 1);
        prop_assert_eq!(passes == 1, gate.x < ACTOR_START_X);
    }

    #[test]
    fn ground_tiles_cover_the_screen(speed in 0.5f32..20.0, steps in 1usize..2000) {
        let mut ground = Ground::new(GROUND_LINE, GROUND_TILE_WIDTH);
        for _ in 0..steps {
            ground.advance(speed);
            let left = ground.tiles[0].min(ground.tiles[1]);
            let right = ground.tiles[0].max(ground.tiles[1]);
            // Rounding drift from thousands of subtractions stays well below a pixel
            prop_assert!((right - left - GROUND_TILE_WIDTH).abs() < 0.5);
            prop_assert!(left <= 0.5);
            prop_assert!(left > -GROUND_TILE_WIDTH);
        }
    }

    #[test]
    fn collision_depends_only_on_current_positions(
        y in 50.0f32..650.0,
        detour in 50.0f32..650.0,
        gate_x in 150.0f32..300.0,
        center in 200.0f32..550.0,
    ) {
        let sprites = Sprites::procedural();
        let gate = Obstacle::new(1, gate_x, center, GATE_GAP / 2.0);
        let mut actor = actor_with(JumpPolicy::WhenFalling, &sprites);

        actor.pos.y = y;
        let before = collides(&actor, &gate, &sprites);
        actor.pos.y = detour;
        let _ = collides(&actor, &gate, &sprites);
        actor.pos.y = y;
        prop_assert_eq!(collides(&actor, &gate, &sprites), before);
    }
}
