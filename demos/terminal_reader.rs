//! Terminal Reader: speed-read a Markdown file one chunk at a time.
//!
//! Usage: `cargo run --example terminal_reader -- <file.md> [settings.toml]`
//!
//! Keys: space play/pause, ←/→ seek 10 tokens, n/p next/previous landmark,
//! s stop, q or Escape quit. Set `RUST_LOG=cadence=debug` for engine logs
//! on stderr.

use anyhow::{Context, Result};
use cadence::{Chunk, Document, EngineState, PacingSettings, PlaybackEvent, Player};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Restores the terminal even when the reader bails out early.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(stdout: &mut Stdout) -> Result<Self> {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

fn load_settings(path: Option<&String>) -> PacingSettings {
    let Some(path) = path else {
        return PacingSettings::default();
    };
    match PacingSettings::from_file(path) {
        Ok(settings) => settings,
        Err(error) => {
            warn!(%error, "falling back to default settings");
            PacingSettings::default()
        }
    }
}

fn draw(stdout: &mut Stdout, chunk: &Chunk, state: EngineState, progress: f64) -> Result<()> {
    let (columns, rows) = terminal::size()?;
    let middle = rows / 2;
    let text = chunk.display_text();
    let text_start = columns.saturating_sub(u16::try_from(text.chars().count()).unwrap_or(columns)) / 2;

    queue!(
        stdout,
        Clear(ClearType::All),
        MoveTo(1, 1),
        Print(chunk.breadcrumb.trail(usize::from(columns.saturating_sub(2))).dim()),
        MoveTo(text_start, middle),
        Print(text.bold()),
        MoveTo(1, rows.saturating_sub(2)),
        Print(format!("{state:?}  {:>5.1}%", progress * 100.0).dim()),
    )?;
    stdout.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = args.first().context("usage: terminal_reader <file.md> [settings.toml]")?;
    let source = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let settings = load_settings(args.get(1));
    info!(wpm = settings.wpm, chunk_size = settings.chunk_size, "starting reader");

    let player = Player::spawn(Arc::new(settings)).context("spawning playback thread")?;
    player.load_markdown(source, None);
    player.play();

    let mut stdout = io::stdout();
    let guard = TerminalGuard::enter(&mut stdout)?;

    let mut document = Document::default();
    let mut state = EngineState::Idle;
    let mut last_chunk: Option<Chunk> = None;

    'reader: loop {
        let mut dirty = false;
        while let Ok(event) = player.events().try_recv() {
            dirty = true;
            match event {
                PlaybackEvent::Loaded(loaded) => document = loaded,
                PlaybackEvent::StateChanged(next) => state = next,
                PlaybackEvent::Chunk(chunk) => last_chunk = Some(chunk),
                PlaybackEvent::Completed => info!("reached the end"),
            }
        }

        if let Some(chunk) = last_chunk.as_ref().filter(|_| dirty) {
            let shown = chunk.start_index + chunk.tokens.len();
            #[allow(clippy::cast_precision_loss)]
            let progress = if document.is_empty() {
                0.0
            } else {
                shown as f64 / document.len() as f64
            };
            draw(&mut stdout, chunk, state, progress)?;
        }

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break 'reader,
            KeyCode::Char(' ') => {
                if state == EngineState::Playing {
                    player.pause();
                } else {
                    player.play();
                }
            }
            KeyCode::Char('s') => player.stop(),
            KeyCode::Left => player.seek(-10),
            KeyCode::Right => player.seek(10),
            KeyCode::Char('n') | KeyCode::Char('p') => {
                let Some(status) = player.status() else {
                    warn!("playback thread did not answer");
                    continue;
                };
                let current = status.current_index;
                let target = if key.code == KeyCode::Char('n') {
                    document.next_landmark(current)
                } else {
                    document.previous_landmark(current.saturating_sub(1))
                };
                if let Some(landmark) = target {
                    let delta = isize::try_from(landmark.token_index).unwrap_or(isize::MAX)
                        - isize::try_from(current).unwrap_or(isize::MAX);
                    player.seek(delta);
                }
            }
            _ => {}
        }
    }

    drop(guard);
    player.join();
    Ok(())
}
