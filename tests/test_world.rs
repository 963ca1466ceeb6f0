use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use dungeon_escape::entities::{Door, DoorType, Input, Projectile};
use dungeon_escape::geometry;
use dungeon_escape::monster::{Monster, MonsterKind};
use dungeon_escape::world::{monster_for_stage, World, DOOR_SIZE, MAX_STAGE};

fn make_world() -> World {
    World::new(960.0, 640.0, StdRng::seed_from_u64(42))
}

/// A world stripped of its spawned layout so a single mechanism can be
/// tested without door transitions or monster collisions interfering.
fn bare_world() -> World {
    let mut world = make_world();
    world.doors.clear();
    world.monsters.clear();
    world.projectiles.clear();
    world
}

fn no_input() -> HashSet<Input> {
    HashSet::new()
}

fn inputs(list: &[Input]) -> HashSet<Input> {
    list.iter().copied().collect()
}

// ── Construction & resize ─────────────────────────────────────────────────────

#[test]
fn new_clamps_room_to_minimum() {
    let world = World::new(100.0, 100.0, StdRng::seed_from_u64(1));
    assert_eq!(world.width, 400.0);
    assert_eq!(world.height, 300.0);
}

#[test]
fn new_centers_player_and_starts_at_stage_one() {
    let world = make_world();
    assert_eq!(world.stage, 1);
    assert_eq!(world.player.x, 480.0 - world.player.size / 2.0);
    assert_eq!(world.player.y, 320.0 - world.player.size / 2.0);
}

#[test]
fn resize_clamps_recenters_and_rebuilds_layout() {
    let mut world = make_world();
    world.projectiles.push(Projectile::new(5.0, 5.0, 1.0, 0.0, 3.2));
    world.resize(50.0, 50.0);
    assert_eq!(world.width, 400.0);
    assert_eq!(world.height, 300.0);
    assert_eq!(world.player.x, 200.0 - world.player.size / 2.0);
    assert!(world.projectiles.is_empty());
    assert!(!world.doors.is_empty());
    assert_eq!(world.monsters.len(), 1);
}

// ── Door layout ───────────────────────────────────────────────────────────────

#[test]
fn layout_has_exactly_one_pass_and_one_back_door() {
    for seed in 0..20 {
        let world = World::new(960.0, 640.0, StdRng::seed_from_u64(seed));
        let pass = world
            .doors
            .iter()
            .filter(|d| d.door_type == DoorType::Pass)
            .count();
        let back = world
            .doors
            .iter()
            .filter(|d| d.door_type == DoorType::Back)
            .count();
        assert!(world.doors.len() <= 6);
        assert_eq!(pass, 1, "seed {seed}");
        assert_eq!(back, 1, "seed {seed}");
    }
}

#[test]
fn door_centers_respect_minimum_pairwise_distance() {
    for seed in 0..20 {
        let world = World::new(960.0, 640.0, StdRng::seed_from_u64(seed));
        let min_dist = DOOR_SIZE + 10.0;
        for (i, a) in world.doors.iter().enumerate() {
            for b in world.doors.iter().skip(i + 1) {
                let dist =
                    geometry::distance(a.center_x(), a.center_y(), b.center_x(), b.center_y());
                assert!(dist >= min_dist, "seed {seed}: {dist} < {min_dist}");
            }
        }
    }
}

#[test]
fn doors_lie_fully_inside_the_room() {
    let world = make_world();
    for door in &world.doors {
        assert!(door.x >= 0.0 && door.x + door.size <= world.width);
        assert!(door.y >= 0.0 && door.y + door.size <= world.height);
    }
}

// ── Stage → monster mapping ───────────────────────────────────────────────────

#[test]
fn stage_monster_roster() {
    assert_eq!(monster_for_stage(1), MonsterKind::Warp);
    assert_eq!(monster_for_stage(2), MonsterKind::Stun);
    assert_eq!(monster_for_stage(3), MonsterKind::Shooter);
    assert_eq!(monster_for_stage(4), MonsterKind::Stun);
    assert_eq!(monster_for_stage(5), MonsterKind::Warp);
    assert_eq!(monster_for_stage(6), MonsterKind::Shooter);
}

#[test]
fn unmapped_stage_falls_back_to_stun() {
    assert_eq!(monster_for_stage(0), MonsterKind::Stun);
    assert_eq!(monster_for_stage(7), MonsterKind::Stun);
    assert_eq!(monster_for_stage(999), MonsterKind::Stun);
}

#[test]
fn spawn_places_single_monster_at_a_room_corner() {
    let world = make_world();
    assert_eq!(world.monsters.len(), 1);
    let monster = &world.monsters[0];
    assert_eq!(monster.kind, MonsterKind::Warp); // stage 1
    let corners = [
        (50.0, 50.0),
        (910.0, 50.0),
        (50.0, 590.0),
        (910.0, 590.0),
    ];
    assert!(corners.contains(&(monster.x, monster.y)));
}

// ── Stage transitions ─────────────────────────────────────────────────────────

#[test]
fn advance_stage_increments_and_posts_message() {
    let mut world = bare_world();
    world.stage = 2;
    world.current_time = 5.0;
    world.advance_stage();
    assert_eq!(world.stage, 3);
    assert_eq!(world.active_message(), Some("Stage 3"));
    assert_eq!(world.message_until, 7.5);
    assert!(world.projectiles.is_empty());
    assert_eq!(world.player.x, 480.0 - world.player.size / 2.0);
}

#[test]
fn advance_stage_wraps_at_max_and_posts_win() {
    let mut world = bare_world();
    world.stage = MAX_STAGE;
    world.advance_stage();
    assert_eq!(world.stage, 1);
    assert_eq!(world.active_message(), Some("You Win!"));
}

#[test]
fn regress_stage_decrements() {
    let mut world = bare_world();
    world.stage = 3;
    world.regress_stage();
    assert_eq!(world.stage, 2);
    assert_eq!(world.active_message(), Some("Stage 2"));
}

#[test]
fn regress_stage_floors_at_one() {
    let mut world = bare_world();
    world.regress_stage();
    assert_eq!(world.stage, 1);
    assert_eq!(world.active_message(), Some("Stage 1"));
}

#[test]
fn advance_respawns_layout_for_new_stage() {
    let mut world = bare_world();
    world.advance_stage();
    assert_eq!(world.stage, 2);
    assert!(!world.doors.is_empty());
    assert_eq!(world.monsters.len(), 1);
    assert_eq!(world.monsters[0].kind, MonsterKind::Stun);
}

// ── Door interactions ─────────────────────────────────────────────────────────

#[test]
fn pass_door_overlap_advances_stage() {
    let mut world = bare_world();
    world
        .doors
        .push(Door::new(world.player.x, world.player.y, DOOR_SIZE, DoorType::Pass));
    world.update(0.033, &no_input(), 0.1);
    assert_eq!(world.stage, 2);
}

#[test]
fn back_door_overlap_regresses_stage() {
    let mut world = bare_world();
    world.stage = 4;
    world
        .doors
        .push(Door::new(world.player.x, world.player.y, DOOR_SIZE, DoorType::Back));
    world.update(0.033, &no_input(), 0.1);
    assert_eq!(world.stage, 3);
}

#[test]
fn only_first_overlapping_door_acts() {
    // A Normal door stored before a Pass door absorbs the interaction.
    let mut world = bare_world();
    let (px, py) = (world.player.x, world.player.y);
    world.doors.push(Door::new(px, py, DOOR_SIZE, DoorType::Normal));
    world.doors.push(Door::new(px, py, DOOR_SIZE, DoorType::Pass));
    world.update(0.033, &no_input(), 0.1);
    assert_eq!(world.stage, 1);
}

#[test]
fn death_suppresses_door_interaction_in_same_frame() {
    // Projectile kills the player this frame; the overlapping Pass door
    // must not fire afterwards.
    let mut world = bare_world();
    world
        .doors
        .push(Door::new(world.player.x, world.player.y, DOOR_SIZE, DoorType::Pass));
    world
        .projectiles
        .push(Projectile::new(world.player.center_x(), world.player.center_y(), 0.0, 0.0, 0.0));
    world.update(0.033, &no_input(), 0.1);
    assert!(world.dead);
    assert_eq!(world.stage, 1);
}

// ── Death & respawn ───────────────────────────────────────────────────────────

#[test]
fn trigger_death_sets_state_and_clears_projectiles() {
    let mut world = bare_world();
    world.current_time = 3.0;
    world.projectiles.push(Projectile::new(1.0, 1.0, 1.0, 0.0, 3.2));
    world.trigger_death();
    assert!(world.dead);
    assert_eq!(world.death_started_at, 3.0);
    assert!(world.projectiles.is_empty());
    assert_eq!(world.active_message(), Some("You Died"));
}

#[test]
fn trigger_death_is_idempotent() {
    let mut world = bare_world();
    world.current_time = 3.0;
    world.trigger_death();
    let started = world.death_started_at;
    let until = world.message_until;
    world.trigger_death();
    assert_eq!(world.death_started_at, started);
    assert_eq!(world.message_until, until);
}

#[test]
fn respawn_waits_the_full_delay() {
    let mut world = bare_world();
    world.stage = 4;
    world.update(0.033, &no_input(), 2.0);
    world.trigger_death();
    world.update(0.033, &no_input(), 2.9);
    assert!(world.dead);
    assert_eq!(world.stage, 4);
}

#[test]
fn respawn_resets_world_at_exactly_the_delay() {
    let mut world = bare_world();
    world.stage = 4;
    world.update(0.033, &no_input(), 2.0);
    world.trigger_death();
    world.update(0.033, &no_input(), 3.0);
    assert!(!world.dead);
    assert_eq!(world.stage, 1);
    assert!(world.projectiles.is_empty());
    assert_eq!(world.player.x, 480.0 - world.player.size / 2.0);
    assert_eq!(world.active_message(), Some("Respawned"));
    assert_eq!(world.monsters.len(), 1);
}

#[test]
fn monster_contact_kills_the_player() {
    let mut world = bare_world();
    let mut monster = Monster::new(MonsterKind::Stun, 0.0, 0.0);
    monster.x = world.player.center_x();
    monster.y = world.player.center_y();
    world.monsters.push(monster);
    world.update(0.033, &no_input(), 0.1);
    assert!(world.dead);
}

// ── Player movement ───────────────────────────────────────────────────────────

#[test]
fn single_direction_moves_at_base_speed() {
    let mut world = bare_world();
    let x0 = world.player.x;
    world.update(0.033, &inputs(&[Input::Right]), 0.1);
    assert_eq!(world.player.x, x0 + 8.0);
}

#[test]
fn diagonal_movement_is_normalized() {
    let mut world = bare_world();
    let (x0, y0) = (world.player.x, world.player.y);
    world.update(0.033, &inputs(&[Input::Right, Input::Down]), 0.1);
    let step = 8.0 / 2f64.sqrt();
    assert!((world.player.x - (x0 + step)).abs() < 1e-9);
    assert!((world.player.y - (y0 + step)).abs() < 1e-9);
}

#[test]
fn opposite_inputs_cancel() {
    let mut world = bare_world();
    let x0 = world.player.x;
    world.update(0.033, &inputs(&[Input::Left, Input::Right]), 0.1);
    assert_eq!(world.player.x, x0);
}

#[test]
fn movement_clamps_to_room_bounds() {
    let mut world = bare_world();
    world.player.x = 0.0;
    world.player.y = 0.0;
    world.update(0.033, &inputs(&[Input::Left, Input::Up]), 0.1);
    assert_eq!(world.player.x, 0.0);
    assert_eq!(world.player.y, 0.0);

    world.player.x = world.width;
    world.update(0.033, &inputs(&[Input::Right]), 0.2);
    assert_eq!(world.player.x, world.width - world.player.size);
}

#[test]
fn stun_freezes_movement_until_expiry() {
    let mut world = bare_world();
    world.player.stunned_until = 1.0;
    let x0 = world.player.x;
    world.update(0.033, &inputs(&[Input::Right]), 0.5);
    assert_eq!(world.player.x, x0);
    assert_eq!(world.player.speed, 0.0);

    world.update(0.033, &inputs(&[Input::Right]), 1.0);
    assert_eq!(world.player.x, x0 + 8.0);
    assert_eq!(world.player.speed, world.player.base_speed);
}

#[test]
fn dead_player_cannot_move() {
    let mut world = bare_world();
    world.update(0.033, &no_input(), 0.1);
    world.trigger_death();
    let x0 = world.player.x;
    world.update(0.033, &inputs(&[Input::Right]), 0.2);
    assert_eq!(world.player.x, x0);
}

#[test]
fn player_square_stays_inside_room_over_many_frames() {
    let mut world = bare_world();
    let held = inputs(&[Input::Right, Input::Down]);
    for frame in 0..200 {
        world.update(0.033, &held, frame as f64 * 0.033);
        assert!(world.player.x >= 0.0);
        assert!(world.player.y >= 0.0);
        assert!(world.player.x + world.player.size <= world.width);
        assert!(world.player.y + world.player.size <= world.height);
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[test]
fn projectile_advances_by_prescaled_velocity() {
    let mut world = bare_world();
    world.projectiles.push(Projectile::new(0.0, 0.0, 1.0, 0.0, 3.2));
    world.player.x = 900.0; // out of harm's way
    world.update(0.033, &no_input(), 0.1);
    assert_eq!(world.projectiles.len(), 1);
    assert_eq!(world.projectiles[0].x, 3.2);
}

#[test]
fn projectile_pruned_past_ten_px_margin() {
    // 960-wide room: kept while x <= 970, pruned beyond.
    let mut world = bare_world();
    world.player.y = 600.0;
    world.projectiles.push(Projectile::new(968.0, 10.0, 1.0, 0.0, 3.2));
    world.update(0.033, &no_input(), 0.1);
    assert!(world.projectiles.is_empty());
}

#[test]
fn projectile_hit_triggers_death() {
    let mut world = bare_world();
    world.projectiles.push(Projectile::new(
        world.player.center_x() - 3.2,
        world.player.center_y(),
        1.0,
        0.0,
        3.2,
    ));
    world.update(0.033, &no_input(), 0.1);
    assert!(world.dead);
    assert!(world.projectiles.is_empty());
    assert_eq!(world.active_message(), Some("You Died"));
}

// ── Messages ──────────────────────────────────────────────────────────────────

#[test]
fn message_expires_after_duration() {
    let mut world = bare_world();
    world.current_time = 1.0;
    world.advance_stage(); // posts "Stage 2" until 3.5
    assert_eq!(world.active_message(), Some("Stage 2"));

    world.current_time = 3.4;
    assert_eq!(world.active_message(), Some("Stage 2"));
    world.current_time = 3.5;
    assert_eq!(world.active_message(), None);
}
