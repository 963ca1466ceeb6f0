//! Dungeon Escape — world-simulation engine.
//!
//! The engine owns all game entities and advances them deterministically
//! given `(dt, active inputs, now seconds)`.  It never reads a wall clock
//! or terminal itself; the binary's frame loop supplies both and draws
//! from the engine's public state afterwards.

pub mod display;
pub mod entities;
pub mod geometry;
pub mod monster;
pub mod world;
