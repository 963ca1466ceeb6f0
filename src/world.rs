//! World orchestrator — owns every entity and advances them in a fixed
//! per-frame pipeline: player movement, monsters, projectiles, doors,
//! respawn.  A hit this frame triggers death before door interactions are
//! evaluated, and death suppresses them for the rest of the frame.
//!
//! All randomness flows through the `StdRng` handed to the constructor, so
//! callers control determinism (tests use a seeded RNG).

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::Rng;

use crate::entities::{Door, DoorType, Input, Player, Projectile};
use crate::geometry;
use crate::monster::{Monster, MonsterKind};

pub const MAX_STAGE: u32 = 6;
pub const DOOR_SIZE: f64 = 30.0;
pub const RESPAWN_DELAY: f64 = 1.0;
pub const MESSAGE_DURATION: f64 = 2.5;

pub const MIN_WIDTH: f64 = 400.0;
pub const MIN_HEIGHT: f64 = 300.0;

const PLAYER_SIZE: f64 = 20.0;
const PLAYER_SPEED: f64 = 8.0;

/// Door placement: attempt budget for rejection sampling and the corner
/// inset for the stage monster.
const DOOR_COUNT: usize = 6;
const PLACEMENT_ATTEMPTS: u32 = 2000;
const CORNER_INSET: f64 = 50.0;

pub struct World {
    pub rng: StdRng,
    pub width: f64,
    pub height: f64,
    pub stage: u32,
    pub current_time: f64,
    pub dead: bool,
    pub death_started_at: f64,
    pub message: Option<String>,
    pub message_until: f64,
    pub player: Player,
    pub doors: Vec<Door>,
    pub monsters: Vec<Monster>,
    pub projectiles: Vec<Projectile>,
}

impl World {
    /// Build a world for the given room size (clamped to the minimum
    /// playable area) and spawn the first stage layout.
    pub fn new(width: f64, height: f64, rng: StdRng) -> World {
        let width = width.max(MIN_WIDTH);
        let height = height.max(MIN_HEIGHT);
        let player = Player::new(
            width / 2.0 - PLAYER_SIZE / 2.0,
            height / 2.0 - PLAYER_SIZE / 2.0,
            PLAYER_SIZE,
            PLAYER_SPEED,
        );
        let mut world = World {
            rng,
            width,
            height,
            stage: 1,
            current_time: 0.0,
            dead: false,
            death_started_at: -10.0,
            message: None,
            message_until: -1.0,
            player,
            doors: Vec::new(),
            monsters: Vec::new(),
            projectiles: Vec::new(),
        };
        world.spawn_doors();
        world
    }

    /// Advance one simulation tick.  `now_seconds` is a monotonically
    /// increasing clock supplied by the host; the engine never reads a wall
    /// clock itself.
    pub fn update(&mut self, dt: f64, inputs: &HashSet<Input>, now_seconds: f64) {
        self.current_time = now_seconds;
        self.update_player_movement(dt, inputs);
        self.update_monsters();
        self.update_projectiles();
        self.handle_door_interactions();
        self.handle_respawn();
    }

    /// Viewport change: clamp to minimums, recenter the player and rebuild
    /// the whole stage layout.  A hard reset of stage content, not merely a
    /// bounds change.
    pub fn resize(&mut self, new_width: f64, new_height: f64) {
        self.width = new_width.max(MIN_WIDTH);
        self.height = new_height.max(MIN_HEIGHT);
        self.center_player();
        self.spawn_doors();
    }

    /// The current message, only while it has not expired.
    pub fn active_message(&self) -> Option<&str> {
        if self.current_time < self.message_until {
            self.message.as_deref()
        } else {
            None
        }
    }

    fn post_message(&mut self, text: &str) {
        self.message = Some(text.to_string());
        self.message_until = self.current_time + MESSAGE_DURATION;
    }

    fn center_player(&mut self) {
        self.player.x = self.width / 2.0 - self.player.size / 2.0;
        self.player.y = self.height / 2.0 - self.player.size / 2.0;
    }

    // ── Pipeline steps ────────────────────────────────────────────────────────

    fn update_player_movement(&mut self, _dt: f64, inputs: &HashSet<Input>) {
        let stunned = self.player.is_stunned(self.current_time);
        let can_move = !self.dead && !stunned;
        self.player.speed = if can_move { self.player.base_speed } else { 0.0 };

        let mut dx: f64 = 0.0;
        let mut dy: f64 = 0.0;

        if can_move {
            if inputs.contains(&Input::Up) {
                dy -= 1.0;
            }
            if inputs.contains(&Input::Down) {
                dy += 1.0;
            }
            if inputs.contains(&Input::Left) {
                dx -= 1.0;
            }
            if inputs.contains(&Input::Right) {
                dx += 1.0;
            }
        }

        // Normalize so diagonals are no faster than straight moves.
        if dx != 0.0 || dy != 0.0 {
            let length = dx.hypot(dy);
            dx = dx / length * self.player.speed;
            dy = dy / length * self.player.speed;
        }

        self.player.x = geometry::clamp(self.player.x + dx, 0.0, self.width - self.player.size);
        self.player.y = geometry::clamp(self.player.y + dy, 0.0, self.height - self.player.size);
    }

    fn update_monsters(&mut self) {
        // Monsters borrow the world mutably (player, projectiles, RNG), so
        // the list is detached for the duration of the pass.
        let mut monsters = std::mem::take(&mut self.monsters);
        for monster in &mut monsters {
            monster.update(self);
            if !self.dead && monster.collides_with_player(&self.player) {
                self.trigger_death();
            }
        }
        self.monsters = monsters;
    }

    fn update_projectiles(&mut self) {
        let mut hit = false;
        for projectile in &mut self.projectiles {
            projectile.update();
            if !self.dead && projectile.hits_player(&self.player) {
                hit = true;
            }
        }
        if hit {
            self.trigger_death();
        }
        let (width, height) = (self.width, self.height);
        self.projectiles.retain(|p| !p.out_of_bounds(width, height));
    }

    fn handle_door_interactions(&mut self) {
        if self.dead {
            return;
        }

        // First overlapping door in storage order wins; at most one door
        // acts per frame.
        let action = self
            .doors
            .iter()
            .find(|door| door.overlaps_player(&self.player))
            .map(|door| door.door_type);

        match action {
            Some(DoorType::Pass) => self.advance_stage(),
            Some(DoorType::Back) => self.regress_stage(),
            Some(DoorType::Normal) | None => {}
        }
    }

    fn handle_respawn(&mut self) {
        if !self.dead {
            return;
        }
        if self.current_time - self.death_started_at >= RESPAWN_DELAY {
            self.dead = false;
            self.stage = 1;
            self.projectiles.clear();
            self.post_message("Respawned");
            self.center_player();
            self.spawn_doors();
        }
    }

    // ── Stage & death transitions ─────────────────────────────────────────────

    /// Idempotent: a second hit in the same tick changes nothing.
    pub fn trigger_death(&mut self) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.death_started_at = self.current_time;
        self.projectiles.clear();
        self.post_message("You Died");
    }

    pub fn advance_stage(&mut self) {
        if self.stage < MAX_STAGE {
            self.stage += 1;
            self.post_message(&format!("Stage {}", self.stage));
        } else {
            self.stage = 1;
            self.post_message("You Win!");
        }
        self.projectiles.clear();
        self.center_player();
        self.spawn_doors();
    }

    pub fn regress_stage(&mut self) {
        if self.stage > 1 {
            self.stage -= 1;
        }
        self.post_message(&format!("Stage {}", self.stage));
        self.center_player();
        self.projectiles.clear();
        self.spawn_doors();
    }

    // ── Layout generation ─────────────────────────────────────────────────────

    /// Rebuild the stage layout: up to 6 doors via rejection sampling plus
    /// the stage's single monster.  Exhausting the attempt budget silently
    /// yields fewer doors.
    pub fn spawn_doors(&mut self) {
        self.doors.clear();
        self.monsters.clear();
        self.projectiles.clear();

        let min_dist = DOOR_SIZE + 10.0;
        let mut attempts = 0;
        while self.doors.len() < DOOR_COUNT && attempts < PLACEMENT_ATTEMPTS {
            attempts += 1;
            let x = self.rng.gen_range(0.0..self.width - DOOR_SIZE);
            let y = self.rng.gen_range(0.0..self.height - DOOR_SIZE);
            let cx = x + DOOR_SIZE / 2.0;
            let cy = y + DOOR_SIZE / 2.0;

            let too_close = self
                .doors
                .iter()
                .any(|door| geometry::distance(cx, cy, door.center_x(), door.center_y()) < min_dist);
            if too_close {
                continue;
            }

            let door_type = match self.doors.len() {
                0 => DoorType::Pass,
                1 => DoorType::Back,
                _ => DoorType::Normal,
            };
            self.doors.push(Door::new(x, y, DOOR_SIZE, door_type));
        }

        self.spawn_monster();
    }

    fn spawn_monster(&mut self) {
        let corners = [
            (CORNER_INSET, CORNER_INSET),
            (self.width - CORNER_INSET, CORNER_INSET),
            (CORNER_INSET, self.height - CORNER_INSET),
            (self.width - CORNER_INSET, self.height - CORNER_INSET),
        ];
        let (mx, my) = corners[self.rng.gen_range(0..corners.len())];
        self.monsters.push(Monster::new(monster_for_stage(self.stage), mx, my));
    }
}

/// Fixed stage roster; unmapped stage numbers fall back to Stun rather
/// than failing.
pub fn monster_for_stage(stage: u32) -> MonsterKind {
    match stage {
        2 | 4 => MonsterKind::Stun,
        1 | 5 => MonsterKind::Warp,
        3 | 6 => MonsterKind::Shooter,
        _ => MonsterKind::Stun,
    }
}
