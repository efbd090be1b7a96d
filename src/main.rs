//! Starfall entry point: terminal lifecycle, input handling, and the
//! fixed-rate frame loop.
//!
//! Input model: a dedicated thread blocks on `event::read()` and forwards
//! events over a channel so the frame loop never blocks on I/O.  Each frame
//! drains the channel into a `key_frame` map recording when every key was
//! last seen (held-key detection) plus edge flags for fire/restart/quit,
//! then applies movement, shooting, one simulation tick, and one render.

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use starfall::compute::{
    init_state, move_player_left, move_player_right, player_shoot, reset_game, tick,
};
use starfall::display::{self, Theme};
use starfall::entities::GameStatus;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── CLI options ───────────────────────────────────────────────────────────────

struct Options {
    /// Fall back to the plain-ASCII glyph set.
    ascii: bool,
    /// Fixed RNG seed for reproducible sessions.
    seed: Option<u64>,
}

fn parse_args() -> Options {
    let mut opts = Options {
        ascii: false,
        seed: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ascii" => opts.ascii = true,
            "--seed" => opts.seed = args.next().and_then(|s| s.parse().ok()),
            _ => {}
        }
    }
    opts
}

// ── Title screen ──────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_title<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    theme: &Theme,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "S T A R F A L L";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let lines: &[(&str, Color)] = &[
        ("Destroy the descending enemies before they overwhelm you.", Color::White),
        ("Enemy kill: +100   Falling pickup: +50", Color::DarkGrey),
        ("Stages advance at 1000 / 2000 / 3000 points; enemies get faster.", Color::DarkGrey),
        ("", Color::White),
        ("[SPACE] Start   [Q] Quit", Color::Yellow),
    ];
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = cy.saturating_sub(3) + i as u16;
        out.queue(cursor::MoveTo(
            cx.saturating_sub(msg.chars().count() as u16 / 2),
            row,
        ))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    out.queue(cursor::MoveTo(
        cx.saturating_sub(theme.hint.chars().count() as u16 / 2),
        cy + 4,
    ))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(theme.hint))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            })) => match code {
                KeyCode::Char(' ') | KeyCode::Enter => return Ok(MenuResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit), // input thread gone
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.  Restart after game over happens in place.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    theme: &Theme,
) -> Result<()> {
    let clock = Instant::now();
    let mut state = init_state();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    info!("game started");

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let now_ms = clock.elapsed().as_millis() as u64;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        let mut fire_pressed = false;
        let mut restart_pressed = false;
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                // Press: record key + handle edge-triggered actions
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char(' ') => {
                            if state.status == GameStatus::GameOver {
                                restart_pressed = true;
                            } else {
                                fire_pressed = true;
                            }
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if state.status == GameStatus::GameOver =>
                        {
                            restart_pressed = true;
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Apply the input snapshot ──────────────────────────────────────────
        if state.status == GameStatus::Playing {
            let left = is_held(&key_frame, &KeyCode::Left, frame)
                || is_held(&key_frame, &KeyCode::Char('a'), frame)
                || is_held(&key_frame, &KeyCode::Char('A'), frame);
            let right = is_held(&key_frame, &KeyCode::Right, frame)
                || is_held(&key_frame, &KeyCode::Char('d'), frame)
                || is_held(&key_frame, &KeyCode::Char('D'), frame);

            if left {
                state = move_player_left(&state);
            }
            if right {
                state = move_player_right(&state);
            }
            if fire_pressed {
                state = player_shoot(&state, now_ms);
            }
        } else if restart_pressed {
            state = reset_game(&state);
            info!("game restarted");
        }

        // ── Advance the simulation one tick ───────────────────────────────────
        let prev_stage = state.stage;
        let was_playing = state.status == GameStatus::Playing;
        state = tick(&state, now_ms, rng);
        if state.stage != prev_stage {
            info!("stage {} reached at score {}", state.stage, state.score);
        }
        if was_playing && state.status == GameStatus::GameOver {
            info!("game over, final score {}", state.score);
        }

        let (width, height) = terminal::size().unwrap_or((80, 24));
        display::render(out, &state, theme, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    simple_logging::log_to_file("starfall.log", log::LevelFilter::Info)
        .context("failed to open log file")?;

    let opts = parse_args();
    info!(
        "starfall starting (ascii={}, seed={:?})",
        opts.ascii, opts.seed
    );

    let theme = if opts.ascii {
        Theme::ascii()
    } else {
        Theme::unicode()
    };
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
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

    let result = run(&mut out, &rx, &mut rng, &theme);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("starfall exiting");
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    theme: &Theme,
) -> Result<()> {
    match show_title(out, rx, theme)? {
        MenuResult::Quit => Ok(()),
        MenuResult::Start => game_loop(out, rx, rng, theme),
    }
}
