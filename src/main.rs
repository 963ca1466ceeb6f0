use std::collections::{HashMap, HashSet};
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use dungeon_escape::display::{self, CELL_H, CELL_W};
use dungeon_escape::entities::Input;
use dungeon_escape::world::World;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// The set of directional inputs currently live, combining arrow keys and
/// WASD.  This is the per-frame input snapshot the engine consumes.
fn active_inputs(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> HashSet<Input> {
    let bindings: &[(Input, &[KeyCode])] = &[
        (Input::Up, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]),
        (Input::Down, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]),
        (Input::Left, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
        (Input::Right, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
    ];

    let mut inputs = HashSet::new();
    for (input, keys) in bindings {
        if keys.iter().any(|key| is_held(key_frame, key, frame)) {
            inputs.insert(*input);
        }
    }
    inputs
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which keys are still "fresh"
/// (within `HOLD_WINDOW` frames) and feed the whole set to the engine, so
/// diagonals work with no interference between keys.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after `HOLD_WINDOW` frames of
///   silence.
fn game_loop<W: Write>(
    out: &mut W,
    world: &mut World,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut elapsed_seconds: f64 = 0.0;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            match event {
                Event::Key(KeyEvent {
                    code, kind, modifiers, ..
                }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code.clone(), frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            _ => {}
                        }
                    }
                    // Repeat: refresh timestamp so key stays "held"
                    KeyEventKind::Repeat => {
                        key_frame.insert(code.clone(), frame);
                    }
                    // Release: remove key immediately (keyboard-enhancement path)
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Resize(cols, rows) => {
                    world.resize(cols as f64 * CELL_W, rows as f64 * CELL_H);
                }
                _ => {}
            }
        }

        // ── Advance the simulation ────────────────────────────────────────────
        let dt = last_frame.elapsed().as_secs_f64();
        last_frame = Instant::now();
        elapsed_seconds += dt;

        let inputs = active_inputs(&key_frame, frame);
        world.update(dt, &inputs, elapsed_seconds);

        display::render(out, world)?;

        let frame_time = frame_start.elapsed();
        if frame_time < FRAME {
            thread::sleep(FRAME - frame_time);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let (cols, rows) = terminal::size()?;
    let mut world = World::new(
        cols as f64 * CELL_W,
        rows as f64 * CELL_H,
        StdRng::from_entropy(),
    );

    let result = game_loop(&mut out, &mut world, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
