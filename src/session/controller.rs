//! The session controller.
//!
//! Inbound presentation events (`on_tile_selected`, `on_start_game_requested`,
//! `on_restart_requested`) and virtual time (`advance`) are the only ways
//! state changes. Every pause is a scheduled task tagged with the session
//! that created it; a task whose session is gone is dropped unseen.

use log::{debug, info, warn};

use super::{Phase, ResumeOutcome};
use crate::board::{BoardGenerator, TileId, TileState};
use crate::cards::CardCatalog;
use crate::core::{Difficulty, GameError, GameRng, GameRngState, GameSettings, Result};
use crate::engine::{IgnoreReason, MatchEngine, PairOutcome, SelectOutcome};
use crate::persistence::{self, RestoredGame, Snapshot, SnapshotStore};
use crate::presentation::{Cue, Presenter};
use crate::schedule::{ScheduledTask, Scheduler, SessionId, TaskKind};
use crate::score::{format_elapsed, ScoreModel};

#[derive(Clone, Debug)]
struct Session {
    id: SessionId,
    difficulty_index: usize,
    difficulty: Difficulty,
    engine: MatchEngine,
}

/// Owns the live game and drives it.
///
/// ## Example
///
/// ```
/// use memory_match::cards::CardCatalog;
/// use memory_match::core::GameSettings;
/// use memory_match::persistence::MemoryStore;
/// use memory_match::presentation::NullPresenter;
/// use memory_match::session::{Phase, SessionController};
///
/// let mut controller = SessionController::new(
///     GameSettings::default(),
///     CardCatalog::numbered(20),
///     MemoryStore::new(),
///     NullPresenter,
///     42,
/// )
/// .unwrap();
///
/// controller.on_start_game_requested(0).unwrap();
/// assert_eq!(controller.phase(), Phase::InitialReveal);
///
/// controller.advance(2_000);
/// assert_eq!(controller.phase(), Phase::Active);
/// ```
pub struct SessionController<S, P> {
    settings: GameSettings,
    catalog: CardCatalog,
    store: S,
    presenter: P,
    rng: GameRng,
    scheduler: Scheduler,
    session: Option<Session>,
    phase: Phase,
    last_session: SessionId,
}

impl<S: SnapshotStore, P: Presenter> SessionController<S, P> {
    /// Create a controller with no game loaded.
    pub fn new(
        settings: GameSettings,
        catalog: CardCatalog,
        store: S,
        presenter: P,
        seed: u64,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            catalog,
            store,
            presenter,
            rng: GameRng::new(seed),
            scheduler: Scheduler::new(),
            session: None,
            phase: Phase::NotStarted,
            last_session: SessionId::default(),
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|session| session.id)
    }

    #[must_use]
    pub fn difficulty_index(&self) -> Option<usize> {
        self.session.as_ref().map(|session| session.difficulty_index)
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<&Difficulty> {
        self.session.as_ref().map(|session| &session.difficulty)
    }

    #[must_use]
    pub fn engine(&self) -> Option<&MatchEngine> {
        self.session.as_ref().map(|session| &session.engine)
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// The catalog may change between runs; restores check against it.
    pub fn catalog_mut(&mut self) -> &mut CardCatalog {
        &mut self.catalog
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Position of the layout RNG. Restoring it replays the same boards.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    pub fn restore_rng(&mut self, state: &GameRngState) {
        self.rng = GameRng::from_state(state);
    }

    /// Settled snapshot of the current game.
    #[must_use]
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.session
            .as_ref()
            .map(|session| persistence::capture(session.difficulty_index, &session.engine))
    }

    // === Inbound events ===

    pub fn on_tile_selected(&mut self, tile: TileId) -> SelectOutcome {
        self.select_tile(tile)
    }

    pub fn on_start_game_requested(&mut self, difficulty_index: usize) -> Result<()> {
        self.start_new_game(difficulty_index)
    }

    pub fn on_restart_requested(&mut self) -> Result<()> {
        self.restart()
    }

    // === Lifecycle ===

    /// Start a fresh game on the given preset.
    ///
    /// The board is generated before anything is torn down, so a bad
    /// selector or an undersized catalog leaves the current game as it was.
    pub fn start_new_game(&mut self, difficulty_index: usize) -> Result<()> {
        let difficulty = self.settings.difficulty(difficulty_index)?.clone();
        // The fork only sticks once generation succeeds.
        let mut layout_rng = self.rng.clone();
        let mut game_rng = layout_rng.fork();
        let board = BoardGenerator::new(&mut game_rng).generate(&difficulty, &self.catalog)?;
        self.rng = layout_rng;

        self.teardown();
        self.delete_snapshot();

        let id = self.next_session_id();
        let mut engine = MatchEngine::new(board, ScoreModel::new(self.settings.scoring.clone()));
        for tile in engine.reveal_all() {
            self.presenter.show_tile_face(tile);
        }
        present_counters(&mut self.presenter, &engine);

        info!("new game {} on {}", id, difficulty);
        self.session = Some(Session {
            id,
            difficulty_index,
            difficulty,
            engine,
        });
        self.phase = Phase::InitialReveal;
        self.scheduler.schedule(
            id,
            TaskKind::EndInitialPeek,
            self.settings.timings.initial_peek_ms,
        );
        Ok(())
    }

    /// Replace the current game with a snapshot.
    ///
    /// Input is enabled at once and the timer resumes. A rejected snapshot
    /// leaves the current game untouched.
    pub fn resume_from_snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        let RestoredGame {
            difficulty_index,
            difficulty,
            mut engine,
        } = persistence::restore(
            snapshot,
            &self.settings,
            &self.catalog,
            self.settings.scoring.clone(),
        )?;

        self.teardown();
        let id = self.next_session_id();

        for tile in engine.board().iter() {
            match tile.state() {
                TileState::Hidden => self.presenter.conceal_tile(tile.id),
                TileState::Revealed => self.presenter.show_tile_face(tile.id),
                TileState::Matched => self.presenter.mark_tile_matched(tile.id),
            }
        }
        present_counters(&mut self.presenter, &engine);
        engine.score_mut().start_timer();

        info!(
            "resumed {} on {}: {}/{} pairs, score {}",
            id,
            difficulty,
            engine.matches_found(),
            engine.total_matches_needed(),
            engine.score().score()
        );
        self.session = Some(Session {
            id,
            difficulty_index,
            difficulty,
            engine,
        });
        self.phase = Phase::Active;
        self.schedule_periodic(id);
        // Two or more stored open tiles resolve right away.
        self.begin_next_pair();
        Ok(())
    }

    /// Resume from the configured slot.
    ///
    /// A snapshot that cannot be decoded or no longer fits the settings or
    /// catalog is deleted and replaced by a fresh game.
    pub fn resume_saved(&mut self) -> Result<ResumeOutcome> {
        let Some(bytes) = self.store.read(&self.settings.save_slot)? else {
            return Ok(ResumeOutcome::NoSnapshot);
        };

        let (error, stored_difficulty) = match persistence::decode(&bytes, self.settings.encoding) {
            Ok(snapshot) => match self.resume_from_snapshot(&snapshot) {
                Ok(()) => return Ok(ResumeOutcome::Resumed),
                Err(e) => (e, Some(snapshot.difficulty)),
            },
            Err(e) => (e, None),
        };
        if !error.is_recoverable_load_failure() {
            return Err(error);
        }

        warn!("discarding saved game: {}", error);
        self.delete_snapshot();
        let difficulty_index = stored_difficulty
            .filter(|&index| index < self.settings.difficulties.len())
            .unwrap_or(self.settings.default_difficulty);
        self.start_new_game(difficulty_index)?;
        Ok(ResumeOutcome::FellBack {
            difficulty_index,
            reason: error.to_string(),
        })
    }

    /// New game on the current preset, or the default one if none is loaded.
    pub fn restart(&mut self) -> Result<()> {
        let index = self
            .difficulty_index()
            .unwrap_or(self.settings.default_difficulty);
        self.start_new_game(index)
    }

    /// Drop the current game. The stored snapshot is kept.
    pub fn reset(&mut self) {
        if let Some(id) = self.session_id() {
            info!("reset {}", id);
        }
        self.teardown();
    }

    /// Write a snapshot now.
    pub fn save_now(&mut self) -> Result<()> {
        if !self.phase.in_progress() {
            return Err(GameError::NoActiveSession);
        }
        self.write_snapshot()
    }

    // === Input ===

    /// Forward a selection to the engine if input is enabled.
    pub fn select_tile(&mut self, tile: TileId) -> SelectOutcome {
        if !self.phase.accepts_input() {
            debug!("ignoring {} during {:?}", tile, self.phase);
            return SelectOutcome::Ignored(IgnoreReason::InputLocked);
        }
        let Some(session) = self.session.as_mut() else {
            return SelectOutcome::Ignored(IgnoreReason::InputLocked);
        };

        let outcome = session.engine.select_tile(tile);
        match outcome {
            SelectOutcome::Revealed { tile, .. } => {
                self.presenter.show_tile_face(tile);
                self.presenter.play_cue(Cue::Flip);
                self.begin_next_pair();
            }
            SelectOutcome::Ignored(reason) => {
                debug!("ignoring {}: {:?}", tile, reason);
            }
        }
        outcome
    }

    // === Virtual time ===

    /// Advance virtual time and run every continuation that falls due,
    /// including ones scheduled along the way.
    ///
    /// Returns how many continuations ran against the live session.
    pub fn advance(&mut self, elapsed_ms: u64) -> usize {
        let target = self.scheduler.now_ms().saturating_add(elapsed_ms);
        let mut fired = 0;
        while let Some(task) = self.scheduler.pop_due(target) {
            if self.dispatch(task) {
                fired += 1;
            }
        }
        self.scheduler.settle_at(target);
        fired
    }

    fn dispatch(&mut self, task: ScheduledTask) -> bool {
        if self.session_id() != Some(task.session) {
            debug!("dropping stale {:?} for {}", task.kind, task.session);
            return false;
        }
        match task.kind {
            TaskKind::EndInitialPeek => self.end_initial_peek(),
            TaskKind::EndInspection => self.end_inspection(),
            TaskKind::FlipBack => self.end_flip_back(),
            TaskKind::TimerTick => self.timer_tick(task.session),
            TaskKind::Autosave => self.autosave(task.session),
        }
        true
    }

    fn end_initial_peek(&mut self) {
        if self.phase != Phase::InitialReveal {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for tile in session.engine.conceal_all() {
            self.presenter.conceal_tile(tile);
        }
        session.engine.score_mut().start_timer();
        let id = session.id;
        self.phase = Phase::Active;
        self.schedule_periodic(id);
    }

    fn end_inspection(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let id = session.id;
        let Some(outcome) = session.engine.finish_inspection() else {
            return;
        };
        let score = session.engine.score();
        self.presenter
            .update_score_display(score.score(), score.combo_streak());

        match outcome {
            PairOutcome::Matched {
                pair, game_over, ..
            } => {
                for tile in pair {
                    self.presenter.mark_tile_matched(tile);
                }
                self.presenter.play_cue(Cue::Match);
                if game_over {
                    self.finish_game();
                } else {
                    self.begin_next_pair();
                }
            }
            PairOutcome::Mismatched { pair } => {
                debug!("{} and {} do not match", pair[0], pair[1]);
                self.presenter.play_cue(Cue::Mismatch);
                self.scheduler.schedule(
                    id,
                    TaskKind::FlipBack,
                    self.settings.timings.miss_flip_back_ms,
                );
            }
        }
    }

    fn end_flip_back(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(pair) = session.engine.finish_flip_back() {
            for tile in pair {
                self.presenter.conceal_tile(tile);
            }
        }
        self.begin_next_pair();
    }

    /// Start judging the next queued pair, or settle back to `Active`.
    fn begin_next_pair(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(pair) = session.engine.begin_resolution() {
            debug!("resolving {} and {}", pair[0], pair[1]);
            self.presenter
                .update_turns_display(session.engine.score().turns());
            self.phase = Phase::Resolving;
            self.scheduler.schedule(
                session.id,
                TaskKind::EndInspection,
                self.settings.timings.inspect_pause_ms,
            );
        } else if session.engine.pending().is_none() && !session.engine.is_game_over() {
            self.phase = Phase::Active;
        }
    }

    fn finish_game(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let id = session.id;
        let score = session.engine.score();
        info!(
            "game over on {}: score {} in {} turns, {}",
            session.difficulty,
            score.score(),
            score.turns(),
            format_elapsed(score.elapsed_seconds())
        );

        self.phase = Phase::GameOver;
        self.scheduler.cancel_session(id);
        self.delete_snapshot();
        self.presenter.on_game_over();
        self.presenter.play_cue(Cue::GameOver);
    }

    fn timer_tick(&mut self, id: SessionId) {
        if self.phase == Phase::GameOver {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            if session.engine.score_mut().tick() {
                let text = format_elapsed(session.engine.score().elapsed_seconds());
                self.presenter.update_timer_display(&text);
            }
        }
        self.scheduler
            .schedule(id, TaskKind::TimerTick, self.settings.timings.timer_tick_ms);
    }

    fn autosave(&mut self, id: SessionId) {
        if self.phase == Phase::Active {
            if let Err(e) = self.write_snapshot() {
                warn!("autosave failed: {}", e);
            }
        } else {
            debug!("skipping autosave during {:?}", self.phase);
        }
        self.scheduler.schedule(
            id,
            TaskKind::Autosave,
            self.settings.timings.autosave_interval_ms,
        );
    }

    fn schedule_periodic(&mut self, id: SessionId) {
        let timings = &self.settings.timings;
        self.scheduler
            .schedule(id, TaskKind::TimerTick, timings.timer_tick_ms);
        self.scheduler
            .schedule(id, TaskKind::Autosave, timings.autosave_interval_ms);
    }

    // === Persistence ===

    fn write_snapshot(&mut self) -> Result<()> {
        let session = self.session.as_ref().ok_or(GameError::NoActiveSession)?;
        let snapshot = persistence::capture(session.difficulty_index, &session.engine);
        let bytes = persistence::encode(&snapshot, self.settings.encoding)?;
        self.store.write(&self.settings.save_slot, &bytes)?;
        debug!(
            "saved {} ({} bytes, {} turns)",
            session.id,
            bytes.len(),
            snapshot.turns
        );
        Ok(())
    }

    fn delete_snapshot(&mut self) {
        if let Err(e) = self.store.delete(&self.settings.save_slot) {
            warn!("could not delete saved game: {}", e);
        }
    }

    fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            let cancelled = self.scheduler.cancel_session(session.id);
            debug!("tore down {} ({} tasks cancelled)", session.id, cancelled);
        }
        self.phase = Phase::NotStarted;
    }

    fn next_session_id(&mut self) -> SessionId {
        self.last_session = self.last_session.next();
        self.last_session
    }
}

fn present_counters<P: Presenter>(presenter: &mut P, engine: &MatchEngine) {
    let score = engine.score();
    presenter.update_score_display(score.score(), score.combo_streak());
    presenter.update_turns_display(score.turns());
    presenter.update_timer_display(&format_elapsed(score.elapsed_seconds()));
}
