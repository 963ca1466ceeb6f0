//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! world; no simulation logic is performed.  World coordinates are in
//! pixels and are mapped onto terminal cells with a fixed scale, so one
//! 80×24 terminal covers a 960×576 room.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::entities::{DoorType, Player, Projectile};
use crate::geometry;
use crate::monster::{Monster, MonsterKind};
use crate::world::World;

/// World pixels covered by one terminal cell.
pub const CELL_W: f64 = 12.0;
pub const CELL_H: f64 = 24.0;

/// Doors farther than this from the player's center are not drawn.
const DOOR_LIGHT_RADIUS: f64 = 150.0;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLAYER: Color = Color::White;
const C_PLAYER_STUNNED: Color = Color::Blue;
const C_DOOR_PASS: Color = Color::Green;
const C_DOOR_BACK: Color = Color::Red;
const C_DOOR_NORMAL: Color = Color::DarkGrey;
const C_MONSTER_STUN: Color = Color::Cyan;
const C_MONSTER_WARP: Color = Color::Magenta;
const C_MONSTER_SHOOTER: Color = Color::DarkYellow;
const C_PROJECTILE: Color = Color::Red;
const C_HUD: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

fn col(x: f64) -> u16 {
    (x / CELL_W).max(0.0) as u16
}

fn row(y: f64) -> u16 {
    (y / CELL_H).max(0.0) as u16
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_doors(out, world)?;
    for monster in &world.monsters {
        draw_monster(out, monster, world.current_time)?;
    }
    for projectile in &world.projectiles {
        draw_projectile(out, projectile)?;
    }
    draw_player(out, &world.player, world.current_time)?;
    draw_hud(out, world)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, row(world.height).saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_doors<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    let px = world.player.center_x();
    let py = world.player.center_y();
    for door in &world.doors {
        // Doors light up only near the player.
        if geometry::distance(px, py, door.center_x(), door.center_y()) > DOOR_LIGHT_RADIUS {
            continue;
        }
        let (color, glyph) = match door.door_type {
            DoorType::Pass => (C_DOOR_PASS, "▐█▌"),
            DoorType::Back => (C_DOOR_BACK, "▐█▌"),
            DoorType::Normal => (C_DOOR_NORMAL, "▐▒▌"),
        };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(cursor::MoveTo(col(door.x), row(door.center_y())))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn draw_monster<W: Write>(out: &mut W, monster: &Monster, now: f64) -> std::io::Result<()> {
    let color = match monster.kind {
        MonsterKind::Stun => C_MONSTER_STUN,
        MonsterKind::Warp => C_MONSTER_WARP,
        MonsterKind::Shooter => C_MONSTER_SHOOTER,
    };
    out.queue(style::SetForegroundColor(color))?;

    let glyph = if monster.is_delaying() { "(‥)" } else { "(◉)" };
    out.queue(cursor::MoveTo(col(monster.x).saturating_sub(1), row(monster.y)))?;
    out.queue(Print(glyph))?;

    // Expanding stun pulse ring
    if let Some(progress) = monster.pulse_progress(now) {
        let reach = crate::monster::PULSE_RADIUS * (0.5 + 0.5 * progress);
        for (dx, dy) in [(-reach, 0.0), (reach, 0.0), (0.0, -reach), (0.0, reach)] {
            out.queue(cursor::MoveTo(col(monster.x + dx), row(monster.y + dy)))?;
            out.queue(Print("◦"))?;
        }
    }

    // Dashed marker at the warp destination
    if let Some((tx, ty, _progress)) = monster.telegraph(now) {
        out.queue(cursor::MoveTo(col(tx).saturating_sub(1), row(ty)))?;
        out.queue(Print("╌◌╌"))?;
    }

    Ok(())
}

fn draw_projectile<W: Write>(out: &mut W, projectile: &Projectile) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_PROJECTILE))?;
    out.queue(cursor::MoveTo(col(projectile.x), row(projectile.y)))?;
    out.queue(Print("•"))?;
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, player: &Player, now: f64) -> std::io::Result<()> {
    let color = if player.is_stunned(now) {
        C_PLAYER_STUNNED
    } else {
        C_PLAYER
    };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col(player.x), row(player.center_y())))?;
    out.queue(Print("▓▓"))?;
    Ok(())
}

// ── HUD (top rows) ────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!("Stage: {}", world.stage)))?;

    let mut line = 1;
    if world.player.is_stunned(world.current_time) {
        out.queue(cursor::MoveTo(1, line))?;
        out.queue(style::SetForegroundColor(C_MONSTER_STUN))?;
        out.queue(Print("Stunned"))?;
        line += 1;
    }
    if world.dead {
        out.queue(cursor::MoveTo(1, line))?;
        out.queue(style::SetForegroundColor(Color::Red))?;
        out.queue(Print("You Died"))?;
        line += 1;
    }
    if let Some(message) = world.active_message() {
        out.queue(cursor::MoveTo(1, line))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(message))?;
    }

    out.queue(cursor::MoveTo(1, row(world.height).saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("↑ ↓ ← → / W A S D : Move   Q : Quit"))?;
    Ok(())
}
