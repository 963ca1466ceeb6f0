//! Monster AI — three variants, each a small state machine keyed off the
//! absolute world clock rather than frame counters.
//!
//! All variants share the same shape: chase the player until a per-variant
//! cooldown elapses, freeze for a fixed skill delay, perform the skill, then
//! resume chasing.  `dt` is deliberately not consumed here: transitions
//! compare `now - phase start` against fixed durations, and the chase step
//! advances a constant distance per call.

use rand::Rng;

use crate::entities::{Player, Projectile};
use crate::geometry;
use crate::world::World;

pub const MONSTER_RADIUS: f64 = 18.0;

/// Pre-skill pause shared by all variants: movement frozen, nothing fired yet.
pub const SKILL_DELAY: f64 = 1.0;

pub const PULSE_COOLDOWN: f64 = 2.5;
pub const PULSE_DURATION: f64 = 0.5;
pub const PULSE_RADIUS: f64 = 150.0;
pub const STUN_DURATION: f64 = 0.9;

pub const WARP_COOLDOWN: f64 = 5.0;
pub const TELEGRAPH_TIME: f64 = 0.6;
pub const WARP_OFFSET: f64 = 140.0;
/// Warp targets are clamped this far inside the room bounds.
pub const WARP_INSET: f64 = 40.0;

pub const FIRE_COOLDOWN: f64 = 1.5;
pub const PROJECTILE_SPEED: f64 = 3.2;
pub const VOLLEY_SPREAD_DEG: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonsterKind {
    Stun,
    Warp,
    Shooter,
}

/// Current step of a monster's skill cycle.  `Telegraphing` is only ever
/// entered by the Warp variant; the others go straight from `Delaying` back
/// to `Chasing` when their skill resolves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Chasing,
    Delaying {
        since: f64,
    },
    Telegraphing {
        since: f64,
        target_x: f64,
        target_y: f64,
    },
}

#[derive(Clone, Debug)]
pub struct Monster {
    pub kind: MonsterKind,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub speed: f64,
    pub phase: Phase,
    /// Timestamp of the last completed skill: pulse start for Stun, warp
    /// landing for Warp, volley discharge for Shooter.
    pub last_skill: f64,
}

impl Monster {
    pub fn new(kind: MonsterKind, x: f64, y: f64) -> Monster {
        let (speed, last_skill) = match kind {
            MonsterKind::Stun => (1.0, -10.0),
            MonsterKind::Warp => (1.1, -10.0),
            MonsterKind::Shooter => (0.9, 0.0),
        };
        Monster {
            kind,
            x,
            y,
            radius: MONSTER_RADIUS,
            speed,
            phase: Phase::Chasing,
            last_skill,
        }
    }

    /// Advance one frame.  The world supplies the clock, the player, the
    /// projectile list and the RNG; collision with the player is checked by
    /// the caller afterwards.
    pub fn update(&mut self, world: &mut World) {
        match self.kind {
            MonsterKind::Stun => self.update_stun(world),
            MonsterKind::Warp => self.update_warp(world),
            MonsterKind::Shooter => self.update_shooter(world),
        }
    }

    /// One frame of constant-speed movement straight toward the target.
    fn chase(&mut self, target_x: f64, target_y: f64) {
        let dx = target_x - self.x;
        let dy = target_y - self.y;
        let dist = dx.hypot(dy);
        if dist < 1e-6 {
            return;
        }
        self.x += dx / dist * self.speed;
        self.y += dy / dist * self.speed;
    }

    pub fn collides_with_player(&self, player: &Player) -> bool {
        geometry::distance(self.x, self.y, player.center_x(), player.center_y())
            < self.radius + player.size / 2.0
    }

    // ── Stun ──────────────────────────────────────────────────────────────────

    fn update_stun(&mut self, world: &mut World) {
        let now = world.current_time;

        if let Phase::Delaying { since } = self.phase {
            if now - since >= SKILL_DELAY {
                self.phase = Phase::Chasing;
                self.last_skill = now;
            }
            return;
        }

        if now - self.last_skill >= PULSE_COOLDOWN {
            self.phase = Phase::Delaying { since: now };
            return;
        }

        let px = world.player.center_x();
        let py = world.player.center_y();
        self.chase(px, py);

        // Pulse window: the first PULSE_DURATION seconds after the delay
        // resolves.  Re-stunning extends the deadline, never shortens it.
        if now - self.last_skill <= PULSE_DURATION
            && geometry::distance(self.x, self.y, px, py) <= PULSE_RADIUS
        {
            world.player.stunned_until = world.player.stunned_until.max(now + STUN_DURATION);
        }
    }

    // ── Warp ──────────────────────────────────────────────────────────────────

    fn update_warp(&mut self, world: &mut World) {
        let now = world.current_time;

        match self.phase {
            Phase::Telegraphing {
                since,
                target_x,
                target_y,
            } => {
                if now - since >= TELEGRAPH_TIME {
                    self.x = target_x;
                    self.y = target_y;
                    self.phase = Phase::Chasing;
                    self.last_skill = now;
                }
            }
            Phase::Delaying { since } => {
                if now - since >= SKILL_DELAY {
                    let px = world.player.center_x();
                    let py = world.player.center_y();
                    let ox = world.rng.gen_range(-1.0..1.0) * WARP_OFFSET;
                    let oy = world.rng.gen_range(-1.0..1.0) * WARP_OFFSET;
                    self.phase = Phase::Telegraphing {
                        since: now,
                        target_x: geometry::clamp(px + ox, WARP_INSET, world.width - WARP_INSET),
                        target_y: geometry::clamp(py + oy, WARP_INSET, world.height - WARP_INSET),
                    };
                }
            }
            Phase::Chasing => {
                if now - self.last_skill >= WARP_COOLDOWN {
                    self.phase = Phase::Delaying { since: now };
                } else {
                    self.chase(world.player.center_x(), world.player.center_y());
                }
            }
        }
    }

    // ── Shooter ───────────────────────────────────────────────────────────────

    fn update_shooter(&mut self, world: &mut World) {
        let now = world.current_time;

        if let Phase::Delaying { since } = self.phase {
            if now - since >= SKILL_DELAY {
                self.phase = Phase::Chasing;
                self.last_skill = now;
                self.fire_volley(world);
            }
            return;
        }

        if now - self.last_skill >= FIRE_COOLDOWN {
            self.phase = Phase::Delaying { since: now };
            return;
        }

        self.chase(world.player.center_x(), world.player.center_y());
    }

    /// Three projectiles at the player's current bearing and ±20°.
    fn fire_volley(&self, world: &mut World) {
        let bearing = (world.player.center_y() - self.y).atan2(world.player.center_x() - self.x);
        let spread = VOLLEY_SPREAD_DEG.to_radians();
        for angle in [bearing - spread, bearing, bearing + spread] {
            world
                .projectiles
                .push(Projectile::new(self.x, self.y, angle.cos(), angle.sin(), PROJECTILE_SPEED));
        }
    }

    // ── Transient visual state for the renderer ───────────────────────────────

    pub fn is_delaying(&self) -> bool {
        matches!(self.phase, Phase::Delaying { .. })
    }

    /// Progress (0..=1) through the Stun variant's active pulse window, if
    /// one is currently visible.
    pub fn pulse_progress(&self, now: f64) -> Option<f64> {
        if self.kind != MonsterKind::Stun {
            return None;
        }
        let elapsed = now - self.last_skill;
        if (0.0..=PULSE_DURATION).contains(&elapsed) {
            Some((elapsed / PULSE_DURATION).min(1.0))
        } else {
            None
        }
    }

    /// Warp destination and telegraph progress (0..=1) while telegraphing.
    pub fn telegraph(&self, now: f64) -> Option<(f64, f64, f64)> {
        match self.phase {
            Phase::Telegraphing {
                since,
                target_x,
                target_y,
            } => {
                let progress = ((now - since) / TELEGRAPH_TIME).clamp(0.0, 1.0);
                Some((target_x, target_y, progress))
            }
            _ => None,
        }
    }
}
