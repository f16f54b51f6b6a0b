//! Pacing Engine: the playback state machine.
//!
//! The engine owns the loaded [`Document`], the playback position and the
//! single pending tick. It never sleeps: a driver (the playback actor, or a
//! test stepping a [`ManualClock`](crate::ManualClock)) asks for the next
//! deadline and calls [`PacingEngine::poll`] once it has passed.
//!
//! ```text
//!            load()           play()
//!   Idle ──────────▶ Loaded ─────────▶ Playing ──▶ Completed
//!                      ▲    ◀─ stop() ─  │  ▲          │
//!                      │        pause()  ▼  │ play()   │ play()
//!                      └──── stop() ─── Paused         ▼
//!                                                   Playing (new session)
//! ```
//!
//! Every scheduled tick carries a fresh token. Pausing, stopping, seeking
//! and loading drop the pending tick, and a tick fired with a stale token
//! does nothing, so at most one emission is ever outstanding.

use super::messages::{Chunk, EngineState, PlaybackEvent, PlaybackStatus};
use crate::clock::{Clock, SystemClock};
use crate::pacing::delay::chunk_delay_ms;
use crate::pacing::estimate::{self, delay_from_ms};
use crate::pacing::{PacingSettings, RampState};
use crate::structure::{BreadcrumbContext, Document, Landmark};
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// The single outstanding emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTick {
    /// Cancellation token; only the matching token may fire.
    pub token: u64,
    /// Clock reading at which the tick is due.
    pub due: Duration,
}

/// Position and session timers for the loaded document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackState {
    /// Index of the next token to emit.
    pub current_index: usize,
    /// Clock reading when the session started.
    pub session_start: Option<Duration>,
    /// Total paused time in this session.
    pub paused_accumulated: Duration,
    /// Clock reading when playback last paused or completed.
    pub last_pause: Option<Duration>,
    /// Ticks emitted in this session.
    pub tokens_consumed: u64,
}

impl PlaybackState {
    /// Fresh state positioned at `index`.
    pub fn at(index: usize) -> Self {
        Self {
            current_index: index,
            ..Self::default()
        }
    }

    /// Played time at `now`, pauses excluded.
    pub fn played(&self, now: Duration) -> Duration {
        let Some(start) = self.session_start else {
            return Duration::ZERO;
        };
        self.last_pause
            .unwrap_or(now)
            .saturating_sub(start)
            .saturating_sub(self.paused_accumulated)
    }
}

/// The playback state machine.
pub struct PacingEngine<C: Clock = SystemClock> {
    /// Time source.
    clock: C,
    /// Current settings snapshot.
    settings: Arc<PacingSettings>,
    /// Loaded tokens and landmarks.
    document: Document,
    /// Lifecycle state.
    state: EngineState,
    /// Position and timers.
    playback: PlaybackState,
    /// Outstanding emission, if any.
    pending: Option<PendingTick>,
    /// Next cancellation token to hand out.
    next_token: u64,
    /// Renderer channel.
    events: Sender<PlaybackEvent>,
}

impl PacingEngine<SystemClock> {
    /// Create an engine on the system clock.
    pub fn new(settings: Arc<PacingSettings>, events: Sender<PlaybackEvent>) -> Self {
        Self::with_clock(SystemClock::new(), settings, events)
    }
}

impl<C: Clock> PacingEngine<C> {
    /// Create an engine on a custom clock.
    ///
    /// `events` should be unbounded; a bounded channel that fills up loses
    /// events instead of stalling playback.
    pub fn with_clock(clock: C, settings: Arc<PacingSettings>, events: Sender<PlaybackEvent>) -> Self {
        Self {
            clock,
            settings,
            document: Document::default(),
            state: EngineState::Idle,
            playback: PlaybackState::default(),
            pending: None,
            next_token: 0,
            events,
        }
    }

    /// Load marker-normalized text.
    pub fn load(&mut self, text: &str, start_index: Option<usize>) {
        self.load_document(Document::from_text(text), start_index);
    }

    /// Load Markdown source.
    pub fn load_markdown(&mut self, source: &str, start_index: Option<usize>) {
        self.load_document(Document::from_markdown(source), start_index);
    }

    /// Replace the document wholesale and reset playback.
    ///
    /// `start_index` is clamped into the document. An empty document leaves
    /// the engine `Idle`.
    pub fn load_document(&mut self, document: Document, start_index: Option<usize>) {
        self.cancel();
        let start = start_index
            .unwrap_or(0)
            .min(document.len().saturating_sub(1));

        debug!(
            tokens = document.len(),
            landmarks = document.landmarks().len(),
            start,
            "document loaded"
        );

        self.document = document;
        self.playback = PlaybackState::at(start);
        self.emit(PlaybackEvent::Loaded(self.document.clone()));
        let next = if self.document.is_empty() {
            EngineState::Idle
        } else {
            EngineState::Loaded
        };
        self.transition(next);
    }

    /// Start or resume playback.
    pub fn play(&mut self) {
        let now = self.clock.now();
        match self.state {
            EngineState::Idle | EngineState::Playing => return,
            EngineState::Completed => {
                self.playback = PlaybackState::at(0);
                self.playback.session_start = Some(now);
            }
            EngineState::Loaded => {
                if self.playback.session_start.is_none() {
                    self.playback.session_start = Some(now);
                    self.playback.tokens_consumed = 0;
                }
            }
            EngineState::Paused => {
                if let Some(paused_at) = self.playback.last_pause.take() {
                    self.playback.paused_accumulated += now.saturating_sub(paused_at);
                }
                if self.playback.session_start.is_none() {
                    self.playback.session_start = Some(now);
                }
            }
        }

        self.transition(EngineState::Playing);
        self.tick();
    }

    /// Suspend playback, keeping the position.
    pub fn pause(&mut self) {
        if self.state != EngineState::Playing {
            return;
        }
        self.cancel();
        self.playback.last_pause = Some(self.clock.now());
        self.transition(EngineState::Paused);
    }

    /// Rewind to the start and end the session.
    pub fn stop(&mut self) {
        self.cancel();
        self.playback = PlaybackState::at(0);
        let next = if self.document.is_empty() {
            EngineState::Idle
        } else {
            EngineState::Loaded
        };
        self.transition(next);
    }

    /// Move by `delta` tokens, clamped into the document.
    ///
    /// While playing, the pending tick is replaced by an immediate emission
    /// from the new position. Otherwise a preview chunk is shown without
    /// scheduling anything.
    pub fn seek(&mut self, delta: isize) {
        if self.document.is_empty() {
            return;
        }
        let last = self.document.len() - 1;
        let target = self.playback.current_index.saturating_add_signed(delta).min(last);
        debug!(from = self.playback.current_index, to = target, "seek");

        match self.state {
            EngineState::Idle => {}
            EngineState::Playing => {
                self.cancel();
                self.playback.current_index = target;
                self.tick();
            }
            EngineState::Loaded | EngineState::Paused => {
                self.playback.current_index = target;
                self.preview();
            }
            EngineState::Completed => {
                self.playback.current_index = target;
                self.transition(EngineState::Paused);
                self.preview();
            }
        }
    }

    /// Swap the settings snapshot; the next tick uses it.
    pub fn update_settings(&mut self, settings: Arc<PacingSettings>) {
        debug!(wpm = settings.wpm, chunk_size = settings.chunk_size, "settings updated");
        self.settings = settings;
    }

    /// Fire the pending tick if `token` still identifies it.
    ///
    /// Returns `false` for stale or cancelled ticks.
    pub fn fire(&mut self, token: u64) -> bool {
        match self.pending {
            Some(pending) if pending.token == token && self.state == EngineState::Playing => {
                self.pending = None;
                self.tick();
                true
            }
            _ => false,
        }
    }

    /// Fire the pending tick if its deadline has passed.
    pub fn poll(&mut self) -> bool {
        match self.pending {
            Some(pending) if pending.due <= self.clock.now() => self.fire(pending.token),
            _ => false,
        }
    }

    /// Deadline of the pending tick.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.map(|pending| pending.due)
    }

    /// The pending tick, if any.
    pub const fn pending(&self) -> Option<PendingTick> {
        self.pending
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Position and session timers.
    pub const fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Index of the next token to emit.
    pub const fn current_index(&self) -> usize {
        self.playback.current_index
    }

    /// The loaded document.
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Landmarks of the loaded document.
    pub fn landmarks(&self) -> &Arc<[Landmark]> {
        self.document.landmarks()
    }

    /// Settings snapshot in use.
    pub const fn settings(&self) -> &Arc<PacingSettings> {
        &self.settings
    }

    /// The engine's clock.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Breadcrumb at the current position.
    pub fn breadcrumb(&self) -> BreadcrumbContext {
        self.document.breadcrumb(self.playback.current_index)
    }

    /// Fraction of tokens already emitted.
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_fraction(&self) -> f64 {
        if self.document.is_empty() {
            return 0.0;
        }
        self.playback.current_index as f64 / self.document.len() as f64
    }

    /// Played time in the current session, pauses excluded.
    pub fn elapsed(&self) -> Duration {
        self.playback.played(self.clock.now())
    }

    /// Played seconds in the current session.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Estimated time to the end from the current position.
    pub fn remaining(&self) -> Duration {
        estimate::remaining(
            self.document.tokens(),
            self.playback.current_index,
            &self.settings,
            self.ramp_state(),
        )
    }

    /// Estimated seconds to the end.
    pub fn remaining_seconds(&self) -> f64 {
        self.remaining().as_secs_f64()
    }

    /// Effective rate right now, including the acceleration ramp.
    pub fn current_wpm(&self) -> f64 {
        self.ramp_state().effective_wpm(&self.settings)
    }

    /// All getters at once.
    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: self.state,
            current_index: self.playback.current_index,
            token_count: self.document.len(),
            progress: self.progress_fraction(),
            elapsed_secs: self.elapsed_seconds(),
            remaining_secs: self.remaining_seconds(),
            wpm: self.current_wpm(),
        }
    }

    fn ramp_state(&self) -> RampState {
        RampState::new(self.playback.tokens_consumed, self.elapsed())
    }

    /// Emit the chunk at the current position and schedule the next one.
    fn tick(&mut self) {
        let now = self.clock.now();
        let len = self.document.len();
        let start = self.playback.current_index;
        if start >= len {
            self.complete(now);
            return;
        }

        let end = (start + self.settings.effective_chunk_size()).min(len);
        let tokens = self.document.tokens()[start..end].to_vec();
        let ramp = self.ramp_state();
        let delay = delay_from_ms(chunk_delay_ms(&tokens, &self.settings, &ramp));
        let is_final = end >= len;

        trace!(index = start, delay_ms = delay.as_millis(), is_final, "tick");

        self.emit(PlaybackEvent::Chunk(Chunk {
            start_index: start,
            tokens,
            breadcrumb: self.document.breadcrumb(start),
            is_final,
            delay: Some(delay),
        }));

        self.playback.current_index = end;
        self.playback.tokens_consumed += 1;

        if is_final {
            self.complete(now);
        } else {
            self.schedule(now + delay);
        }
    }

    /// Show the chunk at the current position without advancing.
    fn preview(&self) {
        let len = self.document.len();
        let start = self.playback.current_index.min(len);
        let end = (start + self.settings.effective_chunk_size()).min(len);
        self.emit(PlaybackEvent::Chunk(Chunk {
            start_index: start,
            tokens: self.document.tokens()[start..end].to_vec(),
            breadcrumb: self.document.breadcrumb(start),
            is_final: end >= len,
            delay: None,
        }));
    }

    fn complete(&mut self, now: Duration) {
        self.cancel();
        self.playback.last_pause = Some(now);
        self.transition(EngineState::Completed);
        self.emit(PlaybackEvent::Completed);
    }

    fn schedule(&mut self, due: Duration) {
        let token = self.next_token;
        self.next_token = self.next_token.wrapping_add(1);
        self.pending = Some(PendingTick { token, due });
    }

    fn cancel(&mut self) {
        self.pending = None;
    }

    fn transition(&mut self, next: EngineState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "state change");
            self.state = next;
            self.emit(PlaybackEvent::StateChanged(next));
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        // Never waits on the renderer. A full or closed channel drops the event.
        if let Err(err) = self.events.try_send(event) {
            trace!(disconnected = err.is_disconnected(), "event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crossbeam_channel::{unbounded, Receiver};

    const TEN: &str = "zero one two three four five six seven eight nine";

    fn engine_with(settings: PacingSettings) -> (PacingEngine<ManualClock>, ManualClock, Receiver<PlaybackEvent>) {
        let clock = ManualClock::new();
        let (tx, rx) = unbounded();
        let engine = PacingEngine::with_clock(clock.clone(), Arc::new(settings), tx);
        (engine, clock, rx)
    }

    fn plain_settings() -> PacingSettings {
        PacingSettings::default()
            .with_wpm(600.0)
            .with_slow_start(false)
            .with_micropauses(false)
    }

    fn chunks(rx: &Receiver<PlaybackEvent>) -> Vec<Chunk> {
        rx.try_iter()
            .filter_map(|event| match event {
                PlaybackEvent::Chunk(chunk) => Some(chunk),
                _ => None,
            })
            .collect()
    }

    /// Advance the clock to each deadline until nothing is pending.
    fn run_to_end(engine: &mut PacingEngine<ManualClock>, clock: &ManualClock) {
        while let Some(due) = engine.next_deadline() {
            clock.set(due);
            assert!(engine.poll());
        }
    }

    #[test]
    fn test_load_transitions_to_loaded() {
        let (mut engine, _, rx) = engine_with(plain_settings());
        assert_eq!(engine.state(), EngineState::Idle);
        engine.load(TEN, None);
        assert_eq!(engine.state(), EngineState::Loaded);
        assert_eq!(engine.document().len(), 10);
        assert!(matches!(rx.try_recv(), Ok(PlaybackEvent::Loaded(_))));
    }

    #[test]
    fn test_empty_load_stays_idle() {
        let (mut engine, _, _) = engine_with(plain_settings());
        engine.load("  \n\t ", Some(4));
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.current_index(), 0);
        assert!((engine.progress_fraction()).abs() < f64::EPSILON);
        assert_eq!(engine.remaining(), Duration::ZERO);
        assert_eq!(engine.elapsed(), Duration::ZERO);
        engine.play();
        assert_eq!(engine.state(), EngineState::Idle);
        engine.seek(3);
        assert_eq!(engine.current_index(), 0);
    }

    #[test]
    fn test_load_clamps_start_index() {
        let (mut engine, _, _) = engine_with(plain_settings());
        engine.load(TEN, Some(9999));
        assert_eq!(engine.current_index(), 9);
    }

    #[test]
    fn test_seek_round_trip() {
        let (mut engine, _, _) = engine_with(plain_settings());
        engine.load(TEN, Some(3));
        engine.seek(5);
        assert_eq!(engine.current_index(), 8);
        engine.seek(-5);
        assert_eq!(engine.current_index(), 3);
    }

    #[test]
    fn test_seek_clamps() {
        let (mut engine, _, _) = engine_with(plain_settings());
        engine.load(TEN, None);
        engine.seek(-4);
        assert_eq!(engine.current_index(), 0);
        engine.seek(100);
        assert_eq!(engine.current_index(), 9);
    }

    #[test]
    fn test_paused_seek_previews_without_scheduling() {
        let (mut engine, _, rx) = engine_with(plain_settings());
        engine.load(TEN, None);
        rx.try_iter().for_each(drop);

        engine.seek(2);
        let shown = chunks(&rx);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].start_index, 2);
        assert!(shown[0].delay.is_none());
        assert!(engine.pending().is_none());
        assert_eq!(engine.current_index(), 2);
    }

    #[test]
    fn test_playback_emits_in_order_and_completes() {
        let (mut engine, clock, rx) = engine_with(plain_settings());
        engine.load(TEN, None);
        engine.play();
        run_to_end(&mut engine, &clock);

        let emitted = chunks(&rx);
        let indices: Vec<usize> = emitted.iter().map(|c| c.start_index).collect();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
        assert!(emitted.last().is_some_and(|c| c.is_final));
        assert!(emitted[..9].iter().all(|c| !c.is_final));
        assert_eq!(engine.state(), EngineState::Completed);
        assert!(engine.pending().is_none());
        assert!((engine.progress_fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completion_signal_follows_final_chunk() {
        let (mut engine, clock, rx) = engine_with(plain_settings());
        engine.load("just two", None);
        engine.play();
        run_to_end(&mut engine, &clock);

        let events: Vec<PlaybackEvent> = rx.try_iter().collect();
        let final_pos = events
            .iter()
            .position(|e| matches!(e, PlaybackEvent::Chunk(c) if c.is_final))
            .unwrap();
        let done_pos = events
            .iter()
            .position(|e| matches!(e, PlaybackEvent::Completed))
            .unwrap();
        assert!(done_pos > final_pos);
    }

    #[test]
    fn test_chunk_size_groups_tokens() {
        let (mut engine, clock, rx) = engine_with(plain_settings().with_chunk_size(3));
        engine.load(TEN, None);
        engine.play();
        run_to_end(&mut engine, &clock);

        let sizes: Vec<usize> = chunks(&rx).iter().map(|c| c.tokens.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3, 1]);
    }

    #[test]
    fn test_tick_waits_for_deadline() {
        let (mut engine, clock, _) = engine_with(plain_settings());
        engine.load(TEN, None);
        engine.play();
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.next_deadline(), Some(Duration::from_millis(100)));

        clock.advance(Duration::from_millis(50));
        assert!(!engine.poll());
        assert_eq!(engine.current_index(), 1);

        clock.advance(Duration::from_millis(50));
        assert!(engine.poll());
        assert_eq!(engine.current_index(), 2);
    }

    #[test]
    fn test_stale_token_does_not_fire() {
        let (mut engine, clock, _) = engine_with(plain_settings());
        engine.load(TEN, None);
        engine.play();
        let stale = engine.pending().unwrap().token;

        engine.seek(3);
        let fresh = engine.pending().unwrap().token;
        assert_ne!(stale, fresh);

        clock.advance(Duration::from_secs(1));
        assert!(!engine.fire(stale));
        assert!(engine.fire(fresh));
    }

    #[test]
    fn test_pause_cancels_pending_tick() {
        let (mut engine, clock, _) = engine_with(plain_settings());
        engine.load(TEN, None);
        engine.play();
        engine.pause();
        assert_eq!(engine.state(), EngineState::Paused);
        assert!(engine.pending().is_none());

        clock.advance(Duration::from_secs(5));
        assert!(!engine.poll());
        assert_eq!(engine.current_index(), 1);
    }

    #[test]
    fn test_playing_seek_reschedules_from_new_position() {
        let (mut engine, _, rx) = engine_with(plain_settings());
        engine.load(TEN, None);
        engine.play();
        rx.try_iter().for_each(drop);

        engine.seek(4);
        let shown = chunks(&rx);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].start_index, 5);
        assert_eq!(engine.current_index(), 6);
        assert!(engine.pending().is_some());
    }

    #[test]
    fn test_stop_resets_session() {
        let (mut engine, clock, _) = engine_with(plain_settings());
        engine.load(TEN, Some(4));
        engine.play();
        clock.advance(Duration::from_millis(100));
        engine.poll();
        engine.stop();

        assert_eq!(engine.state(), EngineState::Loaded);
        assert_eq!(engine.current_index(), 0);
        assert!(engine.pending().is_none());
        assert_eq!(*engine.playback(), PlaybackState::at(0));
        assert_eq!(engine.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_elapsed_excludes_pauses() {
        let (mut engine, clock, _) = engine_with(plain_settings());
        engine.load(TEN, None);
        engine.play();
        clock.advance(Duration::from_millis(100));
        engine.poll();
        clock.advance(Duration::from_millis(50));
        engine.pause();
        clock.advance(Duration::from_secs(10));
        assert_eq!(engine.elapsed(), Duration::from_millis(150));

        engine.play();
        clock.advance(Duration::from_millis(30));
        assert_eq!(engine.elapsed(), Duration::from_millis(180));
    }

    #[test]
    fn test_slow_start_resets_each_session() {
        let settings = PacingSettings::default()
            .with_wpm(600.0)
            .with_micropauses(false);
        let (mut engine, clock, rx) = engine_with(settings);
        engine.load(TEN, None);
        engine.play();
        clock.advance(Duration::from_millis(200));
        engine.poll();
        engine.stop();
        engine.play();

        let delays: Vec<Duration> = chunks(&rx).iter().filter_map(|c| c.delay).collect();
        assert_eq!(delays.len(), 3);
        assert_eq!(delays[0], Duration::from_millis(200));
        assert_eq!(delays[2], Duration::from_millis(200));
        assert!(delays[1] < delays[0]);
    }

    #[test]
    fn test_pause_resume_keeps_session() {
        let settings = PacingSettings::default()
            .with_wpm(600.0)
            .with_micropauses(false);
        let (mut engine, _, rx) = engine_with(settings);
        engine.load(TEN, None);
        engine.play();
        engine.pause();
        engine.play();

        let delays: Vec<Duration> = chunks(&rx).iter().filter_map(|c| c.delay).collect();
        assert_eq!(engine.playback().tokens_consumed, 2);
        assert!(delays[1] < delays[0]);
    }

    #[test]
    fn test_acceleration_drives_current_wpm() {
        let settings = plain_settings().with_acceleration(200.0, 600.0, 30.0);
        let (mut engine, clock, _) = engine_with(settings);
        engine.load(&"w ".repeat(500), None);
        assert!((engine.current_wpm() - 200.0).abs() < 1e-9);

        engine.play();
        engine.pause();
        clock.advance(Duration::from_secs(100));
        engine.play();
        clock.advance(Duration::from_secs(15));
        assert!((engine.current_wpm() - 400.0).abs() < 1e-6);

        clock.advance(Duration::from_secs(25));
        assert!((engine.current_wpm() - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_matches_emitted_delays() {
        let settings = PacingSettings::default().with_wpm(450.0);
        let (mut engine, clock, rx) = engine_with(settings);
        engine.load("[H1]Intro\nFirst, a list: 1. one; 2. two!\n\nIndeed, extraordinarily long.", None);

        let estimate = engine.remaining_seconds();
        engine.play();
        run_to_end(&mut engine, &clock);

        let emitted: f64 = chunks(&rx)
            .iter()
            .filter_map(|c| c.delay)
            .map(|d| d.as_secs_f64())
            .sum();
        assert!((emitted - estimate).abs() < 1e-3);
        assert_eq!(engine.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_breadcrumb_travels_with_chunk() {
        let (mut engine, clock, rx) = engine_with(plain_settings());
        engine.load("[H1]A\nx\n[H2]B\ny\n[H1]C\nz", None);
        engine.play();
        run_to_end(&mut engine, &clock);

        let crumbs: Vec<Vec<String>> = chunks(&rx)
            .iter()
            .map(|c| c.breadcrumb.labels().into_iter().map(String::from).collect())
            .collect();
        assert_eq!(crumbs[1], vec!["A"]);
        assert_eq!(crumbs[3], vec!["A", "B"]);
        assert_eq!(crumbs[5], vec!["C"]);
    }

    #[test]
    fn test_play_after_completion_restarts() {
        let (mut engine, clock, _) = engine_with(plain_settings());
        engine.load("a b", None);
        engine.play();
        run_to_end(&mut engine, &clock);
        assert_eq!(engine.state(), EngineState::Completed);

        engine.play();
        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.playback().tokens_consumed, 1);
    }

    #[test]
    fn test_seek_from_completed_pauses() {
        let (mut engine, clock, _) = engine_with(plain_settings());
        engine.load("a b c", None);
        engine.play();
        run_to_end(&mut engine, &clock);

        engine.seek(-2);
        assert_eq!(engine.state(), EngineState::Paused);
        assert_eq!(engine.current_index(), 1);
        engine.play();
        assert_eq!(engine.state(), EngineState::Playing);
    }

    #[test]
    fn test_settings_update_applies_next_tick() {
        let (mut engine, clock, rx) = engine_with(plain_settings());
        engine.load(TEN, None);
        engine.play();
        let due = engine.next_deadline();

        engine.update_settings(Arc::new(plain_settings().with_wpm(300.0)));
        assert_eq!(engine.next_deadline(), due);

        clock.advance(Duration::from_millis(100));
        engine.poll();
        let delays: Vec<Duration> = chunks(&rx).iter().filter_map(|c| c.delay).collect();
        assert_eq!(delays, vec![Duration::from_millis(100), Duration::from_millis(200)]);
    }

    #[test]
    fn test_status_snapshot() {
        let (mut engine, _, _) = engine_with(plain_settings());
        engine.load(TEN, Some(5));
        let status = engine.status();
        assert_eq!(status.state, EngineState::Loaded);
        assert_eq!(status.current_index, 5);
        assert_eq!(status.token_count, 10);
        assert!((status.progress - 0.5).abs() < f64::EPSILON);
        assert!((status.remaining_secs - 0.5).abs() < 1e-6);
        assert!((status.wpm - 600.0).abs() < f64::EPSILON);
    }
}
