//! Outbound interface to the presentation layer.
//!
//! Rendering, animation and audio live outside this crate. The session
//! controller reports what changed through [`Presenter`]; the presentation
//! layer reports back only tile selections and start/restart requests.

use serde::{Deserialize, Serialize};

use crate::board::TileId;

/// Sound cues the presentation layer may play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    Flip,
    Match,
    Mismatch,
    GameOver,
}

/// Receiver of state changes.
///
/// Calls arrive in program order on the thread that drives the session.
pub trait Presenter {
    /// Turn a tile face up.
    fn show_tile_face(&mut self, tile: TileId);

    /// Turn a tile face down.
    fn conceal_tile(&mut self, tile: TileId);

    /// Show a tile as permanently matched.
    fn mark_tile_matched(&mut self, tile: TileId);

    fn update_score_display(&mut self, score: u64, combo: u32);

    fn update_turns_display(&mut self, turns: u32);

    /// `text` is `MM:SS`.
    fn update_timer_display(&mut self, text: &str);

    fn on_game_over(&mut self);

    /// Play a sound cue. Silent by default.
    fn play_cue(&mut self, _cue: Cue) {}
}

/// Presenter that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn show_tile_face(&mut self, _tile: TileId) {}
    fn conceal_tile(&mut self, _tile: TileId) {}
    fn mark_tile_matched(&mut self, _tile: TileId) {}
    fn update_score_display(&mut self, _score: u64, _combo: u32) {}
    fn update_turns_display(&mut self, _turns: u32) {}
    fn update_timer_display(&mut self, _text: &str) {}
    fn on_game_over(&mut self) {}
}

/// One recorded presenter call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationEvent {
    ShowTileFace(TileId),
    ConcealTile(TileId),
    MarkTileMatched(TileId),
    Score { score: u64, combo: u32 },
    Turns(u32),
    Timer(String),
    GameOver,
    Cue(Cue),
}

/// Presenter that records every call, for headless runs and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    events: Vec<PresentationEvent>,
}

impl RecordingPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[PresentationEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<PresentationEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of recorded events equal to `event`.
    #[must_use]
    pub fn count(&self, event: &PresentationEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    /// Most recent timer text, if any.
    #[must_use]
    pub fn last_timer(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            PresentationEvent::Timer(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Presenter for RecordingPresenter {
    fn show_tile_face(&mut self, tile: TileId) {
        self.events.push(PresentationEvent::ShowTileFace(tile));
    }

    fn conceal_tile(&mut self, tile: TileId) {
        self.events.push(PresentationEvent::ConcealTile(tile));
    }

    fn mark_tile_matched(&mut self, tile: TileId) {
        self.events.push(PresentationEvent::MarkTileMatched(tile));
    }

    fn update_score_display(&mut self, score: u64, combo: u32) {
        self.events.push(PresentationEvent::Score { score, combo });
    }

    fn update_turns_display(&mut self, turns: u32) {
        self.events.push(PresentationEvent::Turns(turns));
    }

    fn update_timer_display(&mut self, text: &str) {
        self.events.push(PresentationEvent::Timer(text.to_string()));
    }

    fn on_game_over(&mut self) {
        self.events.push(PresentationEvent::GameOver);
    }

    fn play_cue(&mut self, cue: Cue) {
        self.events.push(PresentationEvent::Cue(cue));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_presenter() {
        let mut presenter = RecordingPresenter::new();
        presenter.show_tile_face(TileId::new(1));
        presenter.update_timer_display("00:01");
        presenter.update_timer_display("00:02");
        presenter.play_cue(Cue::Flip);

        assert_eq!(presenter.events().len(), 4);
        assert_eq!(presenter.last_timer(), Some("00:02"));
        assert_eq!(presenter.count(&PresentationEvent::Cue(Cue::Flip)), 1);

        let drained = presenter.drain();
        assert_eq!(drained[0], PresentationEvent::ShowTileFace(TileId::new(1)));
        assert!(presenter.events().is_empty());
    }

    #[test]
    fn test_null_presenter_default_cue() {
        let mut presenter = NullPresenter;
        presenter.play_cue(Cue::GameOver);
        presenter.on_game_over();
    }
}
