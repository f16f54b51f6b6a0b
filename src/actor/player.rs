//! Player Actor: dedicated thread that drives a [`PacingEngine`] in real time.
//!
//! The thread owns the engine. Controllers send [`PlaybackCommand`]s, the
//! pending tick is a one-shot timer inside `select!`, and the renderer reads
//! [`PlaybackEvent`]s from [`Player::events`]. The timer is rebuilt from the
//! engine's deadline on every iteration, so a cancelled tick simply never
//! gets a timer.

use super::engine::PacingEngine;
use super::messages::{PlaybackCommand, PlaybackEvent, PlaybackStatus};
use crate::clock::{Clock, SystemClock};
use crate::pacing::PacingSettings;
use crossbeam_channel::{at, bounded, never, select, unbounded, Receiver, Sender};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Configuration for the playback actor.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Capacity of the command channel.
    pub command_capacity: usize,
    /// How long [`Player::status`] waits for a reply.
    pub status_timeout: Duration,
    /// Name of the playback thread.
    pub thread_name: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command_capacity: 64,
            status_timeout: Duration::from_millis(250),
            thread_name: "cadence-playback".to_string(),
        }
    }
}

/// Handle to the playback thread.
pub struct Player {
    /// Handle to the playback thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Command sender.
    commands: Sender<PlaybackCommand>,
    /// Event receiver for the renderer.
    events: Receiver<PlaybackEvent>,
    /// Status reply timeout.
    status_timeout: Duration,
}

impl Player {
    /// Spawn a player with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the playback thread.
    pub fn spawn(settings: Arc<PacingSettings>) -> io::Result<Self> {
        Self::with_config(settings, PlayerConfig::default())
    }

    /// Spawn a player with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the playback thread.
    pub fn with_config(settings: Arc<PacingSettings>, config: PlayerConfig) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let (command_tx, command_rx) = bounded::<PlaybackCommand>(config.command_capacity);
        // Unbounded so a slow renderer never parks the playback thread.
        let (event_tx, event_rx) = unbounded::<PlaybackEvent>();

        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || {
                let engine = PacingEngine::new(settings, event_tx);
                Self::run_loop(engine, &command_rx, &shutdown_clone);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
            commands: command_tx,
            events: event_rx,
            status_timeout: config.status_timeout,
        })
    }

    /// Receiver for chunks, state changes and completion.
    #[inline]
    pub const fn events(&self) -> &Receiver<PlaybackEvent> {
        &self.events
    }

    /// Load marker-normalized text.
    pub fn load(&self, text: impl Into<String>, start_index: Option<usize>) {
        self.send(PlaybackCommand::Load {
            text: text.into(),
            start_index,
        });
    }

    /// Load Markdown source.
    pub fn load_markdown(&self, source: impl Into<String>, start_index: Option<usize>) {
        self.send(PlaybackCommand::LoadMarkdown {
            source: source.into(),
            start_index,
        });
    }

    /// Start or resume playback.
    pub fn play(&self) {
        self.send(PlaybackCommand::Play);
    }

    /// Suspend playback.
    pub fn pause(&self) {
        self.send(PlaybackCommand::Pause);
    }

    /// Rewind and end the session.
    pub fn stop(&self) {
        self.send(PlaybackCommand::Stop);
    }

    /// Move by a signed number of tokens.
    pub fn seek(&self, delta: isize) {
        self.send(PlaybackCommand::Seek(delta));
    }

    /// Replace the settings snapshot.
    pub fn update_settings(&self, settings: Arc<PacingSettings>) {
        self.send(PlaybackCommand::UpdateSettings(settings));
    }

    /// Query the engine's getters.
    ///
    /// `None` when the thread does not answer within the status timeout.
    pub fn status(&self) -> Option<PlaybackStatus> {
        let (reply_tx, reply_rx) = bounded(1);
        self.commands
            .send_timeout(PlaybackCommand::Status(reply_tx), self.status_timeout)
            .ok()?;
        reply_rx.recv_timeout(self.status_timeout).ok()
    }

    /// Signal the playback thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        let _ = self.commands.try_send(PlaybackCommand::Shutdown);
    }

    /// Wait for the playback thread to finish.
    ///
    /// Undelivered events are discarded.
    pub fn join(mut self) {
        self.shutdown();
        drop(std::mem::replace(&mut self.events, never()));
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn send(&self, command: PlaybackCommand) {
        // Thread gone means shutdown already happened.
        let _ = self.commands.send(command);
    }

    /// Main playback loop.
    fn run_loop(
        mut engine: PacingEngine<SystemClock>,
        commands: &Receiver<PlaybackCommand>,
        shutdown: &Arc<AtomicBool>,
    ) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            let timer = engine
                .next_deadline()
                .map_or_else(never, |due| at(engine.clock().instant_at(due)));

            select! {
                recv(commands) -> command => match command {
                    Ok(command) => {
                        if !Self::handle(&mut engine, command) {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                recv(timer) -> _ => {
                    engine.poll();
                }
            }
        }
        debug!("playback thread exiting");
    }

    /// Apply one command. Returns `false` on shutdown.
    fn handle<C: Clock>(engine: &mut PacingEngine<C>, command: PlaybackCommand) -> bool {
        match command {
            PlaybackCommand::Load { text, start_index } => engine.load(&text, start_index),
            PlaybackCommand::LoadMarkdown { source, start_index } => {
                engine.load_markdown(&source, start_index);
            }
            PlaybackCommand::Play => engine.play(),
            PlaybackCommand::Pause => engine.pause(),
            PlaybackCommand::Stop => engine.stop(),
            PlaybackCommand::Seek(delta) => engine.seek(delta),
            PlaybackCommand::UpdateSettings(settings) => engine.update_settings(settings),
            PlaybackCommand::Status(reply) => {
                let _ = reply.send(engine.status());
            }
            PlaybackCommand::Shutdown => return false,
        }
        true
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.shutdown();
    }
}
