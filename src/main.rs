mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use swarm_defender::assets::{load_textures, Textures};
use swarm_defender::clock::FrameClock;
use swarm_defender::compute::{init_round, tick};
use swarm_defender::config::{GameConfig, Overrides};
use swarm_defender::entities::{RoundOutcome, RoundState, RoundStatus};
use swarm_defender::input::{Key, KeyTracker};
use swarm_defender::Result;

/// Swarm Defender - hold off a marching enemy swarm in your terminal
#[derive(Parser, Debug)]
#[command(name = "swarm_defender")]
#[command(about = "Terminal arcade shooter against a marching enemy swarm")]
struct Args {
    /// TOML config file (defaults are used for anything it leaves out)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Random seed for a reproducible round
    #[arg(long)]
    seed: Option<u64>,

    /// Directory with the PNG art assets
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Where to write the log (stdout belongs to the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// What a raw terminal event means to the game.
enum Signal {
    Press(Key),
    Repeat(Key),
    Release(Key),
    Close,
    Redraw,
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Key::Escape),
        KeyCode::Enter => Some(Key::Enter),
        _ => None,
    }
}

fn classify(ev: Event) -> Option<Signal> {
    match ev {
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) if modifiers.contains(KeyModifiers::CONTROL) => Some(Signal::Close),
        Event::Key(KeyEvent { code, kind, .. }) => {
            let key = map_key(code)?;
            Some(match kind {
                KeyEventKind::Press => Signal::Press(key),
                KeyEventKind::Repeat => Signal::Repeat(key),
                KeyEventKind::Release => Signal::Release(key),
            })
        }
        Event::Resize(..) => Some(Signal::Redraw),
        _ => None,
    }
}

// ── Modal screens ─────────────────────────────────────────────────────────────

enum Choice {
    Play,
    Quit,
}

/// Block until Enter (play) or Escape / close (quit).  `draw` repaints the
/// screen and is called again whenever the terminal is resized.
fn wait_for_choice<W, F>(out: &mut W, rx: &mpsc::Receiver<Event>, mut draw: F) -> Result<Choice>
where
    W: Write,
    F: FnMut(&mut W) -> std::io::Result<()>,
{
    draw(&mut *out)?;
    loop {
        let Ok(ev) = rx.recv() else {
            return Ok(Choice::Quit);
        };
        match classify(ev) {
            Some(Signal::Press(Key::Enter)) => return Ok(Choice::Play),
            Some(Signal::Press(Key::Escape)) | Some(Signal::Close) => return Ok(Choice::Quit),
            Some(Signal::Redraw) => draw(&mut *out)?,
            _ => {}
        }
    }
}

// ── Round loop ────────────────────────────────────────────────────────────────

/// Runs one round until it ends and returns the final state.
///
/// Every frame: drain pending events into the key tracker, measure dt,
/// tick the round, draw.  Held keys follow the tracker's hold window so
/// terminals without release events still get smooth movement.
fn play_round<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    textures: &Textures,
    rng: &mut ChaCha8Rng,
) -> Result<RoundState> {
    let frame_budget = Duration::from_millis(config.frame_ms);
    let mut state = init_round(config, textures);
    let mut keys = KeyTracker::default();
    let mut clock = FrameClock::new();

    loop {
        let frame_start = Instant::now();
        keys.begin_frame();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        loop {
            match rx.try_recv() {
                Ok(ev) => match classify(ev) {
                    Some(Signal::Press(key)) => keys.press(key),
                    Some(Signal::Repeat(key)) => keys.repeat(key),
                    Some(Signal::Release(key)) => keys.release(key),
                    Some(Signal::Close) => keys.close(),
                    Some(Signal::Redraw) | None => {}
                },
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    keys.close();
                    break;
                }
            }
        }

        let dt = clock.restart().min(config.max_dt);
        state = tick(&state, &keys.tick_input(), dt, rng);

        if state.status != RoundStatus::Running {
            return Ok(state);
        }
        display::render(out, &state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    textures: &Textures,
    seed: u64,
) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    if let Choice::Quit = wait_for_choice(out, rx, |o| display::draw_start_screen(o, seed))? {
        return Ok(());
    }

    loop {
        let state = play_round(out, rx, config, textures, &mut rng)?;
        let outcome = match state.status {
            RoundStatus::Ended(RoundOutcome::Quit) | RoundStatus::Running => return Ok(()),
            RoundStatus::Ended(outcome) => outcome,
        };

        match wait_for_choice(out, rx, |o| display::draw_end_screen(o, &state, outcome))? {
            Choice::Play => info!("replaying"),
            Choice::Quit => return Ok(()),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("swarm_defender=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    config.apply(Overrides {
        seed: args.seed,
        assets_dir: args.assets.clone(),
        log_file: args.log_file.clone(),
    });
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging(&config.log_file)?;

    // Art is loaded before touching the terminal; a missing asset is fatal.
    let textures = load_textures(config.assets_dir.as_deref()).map_err(|e| {
        error!("{e}");
        e
    })?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, "Swarm Defender starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    if !keyboard_enhanced {
        warn!("terminal has no key release events, using hold window");
    }

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config, &textures, seed);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!("{e}");
    }
    info!("Swarm Defender exiting");
    result
}
