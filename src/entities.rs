//! Game entity types — data plus tiny geometric helpers, no AI logic.

use crate::geometry;

/// One of the four directional flags the host frame loop can report as held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
}

// ── Player ────────────────────────────────────────────────────────────────────

/// The single player square.  Position is the top-left corner.
#[derive(Clone, Debug)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub base_speed: f64,
    /// Per-frame speed actually applied; forced to 0 while dead or stunned.
    pub speed: f64,
    /// Absolute timestamp until which movement is disabled by a stun pulse.
    pub stunned_until: f64,
}

impl Player {
    pub fn new(x: f64, y: f64, size: f64, speed: f64) -> Player {
        Player {
            x,
            y,
            size,
            base_speed: speed,
            speed,
            stunned_until: 0.0,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.size / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.size / 2.0
    }

    pub fn is_stunned(&self, now: f64) -> bool {
        now < self.stunned_until
    }
}

// ── Doors ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorType {
    /// Advances the stage counter.
    Pass,
    /// Regresses the stage counter (floored at stage 1).
    Back,
    /// Inert.
    Normal,
}

/// An immutable axis-aligned square region.  Created fresh by every layout
/// spawn, never mutated afterwards.
#[derive(Clone, Debug)]
pub struct Door {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub door_type: DoorType,
}

impl Door {
    pub fn new(x: f64, y: f64, size: f64, door_type: DoorType) -> Door {
        Door {
            x,
            y,
            size,
            door_type,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.size / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.size / 2.0
    }

    pub fn overlaps_player(&self, player: &Player) -> bool {
        geometry::rects_overlap(
            player.x,
            player.y,
            player.size,
            player.size,
            self.x,
            self.y,
            self.size,
            self.size,
        )
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Straight-line constant-velocity shot fired by the Shooter monster.
/// Velocity is pre-scaled at creation; `update` adds it once per call.
#[derive(Clone, Debug)]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
}

impl Projectile {
    pub fn new(x: f64, y: f64, dir_x: f64, dir_y: f64, speed: f64) -> Projectile {
        Projectile {
            x,
            y,
            vx: dir_x * speed,
            vy: dir_y * speed,
            radius: 4.0,
        }
    }

    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    pub fn hits_player(&self, player: &Player) -> bool {
        geometry::distance(self.x, self.y, player.center_x(), player.center_y())
            < self.radius + player.size / 2.0
    }

    /// Out of the room by more than a 10px margin on any side.
    pub fn out_of_bounds(&self, width: f64, height: f64) -> bool {
        self.x < -10.0 || self.x > width + 10.0 || self.y < -10.0 || self.y > height + 10.0
    }
}
