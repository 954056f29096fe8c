use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::{info, warn};

use arcade_cabinet::config::{self, Config};
use arcade_cabinet::display::{self, MenuChoice, MENU_CHOICES};
use arcade_cabinet::engine::Screen;
use arcade_cabinet::input::{KeyTracker, KNIGHT_KEYS, SLUG_KEYS, SNAKE_KEYS};
use arcade_cabinet::scores::{FileScoreStore, ScoreStore, SNAKE_HIGH_KEY};
use arcade_cabinet::{knight, slug, snake};

// ── Logging ───────────────────────────────────────────────────────────────────

/// stdout is the game surface, so logs go to `config.log_file`.
fn init_tracing(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("opening log file {}", config.log_file.display()))?;
    let writer = Mutex::new(file);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
    Ok(())
}

// ── Input plumbing ────────────────────────────────────────────────────────────

enum Exit {
    Menu,
    Quit,
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Feeds every pending key event to `tracker` without blocking. Q leaves the
/// game, Ctrl-C leaves the cabinet.
fn drain_input(rx: &mpsc::Receiver<Event>, tracker: &mut KeyTracker) -> Option<Exit> {
    while let Ok(ev) = rx.try_recv() {
        let Event::Key(key) = ev else {
            continue;
        };
        if key.kind == KeyEventKind::Press {
            if is_ctrl_c(&key) {
                return Some(Exit::Quit);
            }
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                return Some(Exit::Menu);
            }
        }
        tracker.record(&key);
    }
    None
}

fn pace(frame_start: Instant, frame: Duration) {
    let elapsed = frame_start.elapsed();
    if elapsed < frame {
        thread::sleep(frame - elapsed);
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

fn snake_best(store: &FileScoreStore) -> u32 {
    store.load(SNAKE_HIGH_KEY).unwrap_or_else(|err| {
        warn!(error = %err, "could not read snake high score");
        0
    })
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    store: &FileScoreStore,
) -> Result<MenuChoice> {
    let best = snake_best(store);
    let mut selected = 0usize;

    loop {
        display::render_menu(out, selected, best, terminal::size()?)?;

        // Block until the user makes a choice
        let Ok(ev) = rx.recv() else {
            return Ok(MenuChoice::Quit);
        };
        let Event::Key(key) = ev else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if is_ctrl_c(&key) {
            return Ok(MenuChoice::Quit);
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                selected = (selected + MENU_CHOICES.len() - 1) % MENU_CHOICES.len();
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                selected = (selected + 1) % MENU_CHOICES.len();
            }
            KeyCode::Char('1') => return Ok(MenuChoice::Knight),
            KeyCode::Char('2') => return Ok(MenuChoice::RunAndGun),
            KeyCode::Char('3') => return Ok(MenuChoice::Snake),
            KeyCode::Enter | KeyCode::Char(' ') => return Ok(MENU_CHOICES[selected]),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(MenuChoice::Quit);
            }
            _ => {}
        }
    }
}

// ── Game loops ────────────────────────────────────────────────────────────────

fn knight_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &Config,
) -> Result<Exit> {
    let mut rng = thread_rng();
    let mut tracker = KeyTracker::new(KNIGHT_KEYS, config.hold_window);
    let mut state = knight::new_state();

    loop {
        let frame_start = Instant::now();
        if let Some(exit) = drain_input(rx, &mut tracker) {
            return Ok(exit);
        }
        let input = tracker.snapshot();
        state = knight::update(&state, &input, &mut rng);
        display::render_knight(out, &state, terminal::size()?)?;
        pace(frame_start, config.frame());
    }
}

fn slug_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &Config,
) -> Result<Exit> {
    let mut rng = thread_rng();
    let mut tracker = KeyTracker::new(SLUG_KEYS, config.hold_window);
    let mut state = slug::new_state();

    loop {
        let frame_start = Instant::now();
        if let Some(exit) = drain_input(rx, &mut tracker) {
            return Ok(exit);
        }
        let input = tracker.snapshot();
        state = slug::update(&state, &input, &mut rng);
        display::render_slug(out, &state, terminal::size()?)?;
        pace(frame_start, config.frame());
    }
}

/// Input is read every frame; the snake itself moves on its own interval.
fn snake_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &Config,
    store: &mut FileScoreStore,
) -> Result<Exit> {
    let mut rng = thread_rng();
    let mut tracker = KeyTracker::new(SNAKE_KEYS, config.hold_window);
    let mut state = snake::new_state(config.snake.clone(), snake_best(store));
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        if let Some(exit) = drain_input(rx, &mut tracker) {
            return Ok(exit);
        }
        let input = tracker.snapshot();
        state = snake::update(&state, &input, &mut rng);

        if state.screen != Screen::Playing {
            last_tick = Instant::now();
        } else if snake::is_tick_due(&state, last_tick.elapsed().as_millis() as u64) {
            last_tick = Instant::now();
            let before = state.screen.clone();
            state = snake::tick(&state, &mut rng);
            if before != Screen::GameOver && state.screen == Screen::GameOver {
                if let Ok(best) = snake::persist_high_score(&state, store) {
                    state.high_score = best;
                }
            }
        }

        display::render_snake(out, &state, terminal::size()?)?;
        pace(frame_start, config.frame());
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    let config = config::load()?;
    init_tracing(&config)?;
    info!(frame_ms = config.frame_ms, score_dir = %config.score_dir.display(), "cabinet starting");

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
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

    let result = run(&mut out, &rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        tracing::error!(error = %err, "cabinet exited with error");
    }
    info!("cabinet closed");
    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, config: &Config) -> Result<()> {
    let mut store = FileScoreStore::new(config.score_dir.clone());

    loop {
        let choice = show_menu(out, rx, &store)?;
        info!(game = choice.label(), "menu selection");
        let exit = match choice {
            MenuChoice::Quit => break,
            MenuChoice::Knight => knight_loop(out, rx, config)?,
            MenuChoice::RunAndGun => slug_loop(out, rx, config)?,
            MenuChoice::Snake => snake_loop(out, rx, config, &mut store)?,
        };
        if let Exit::Quit = exit {
            break;
        }
    }
    Ok(())
}
