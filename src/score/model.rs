//! Score model: turns, points, combo streak and elapsed time.
//!
//! Every operation is a pure function of the current state and the fixed
//! [`ScoreConfig`], so a restored snapshot scores exactly like the game it
//! was taken from.

use serde::{Deserialize, Serialize};

/// Scoring parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Points for a match with no combo.
    pub base_points: u32,

    /// Multiplier increase per consecutive match (default 1.0).
    pub combo_step: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            base_points: 1,
            combo_step: 1.0,
        }
    }
}

impl ScoreConfig {
    #[must_use]
    pub fn new(base_points: u32, combo_step: f64) -> Self {
        Self {
            base_points,
            combo_step,
        }
    }

    /// Multiplier for a given streak: `1 + (streak - 1) * combo_step`.
    ///
    /// A streak of zero (no match yet) has multiplier 1.
    #[must_use]
    pub fn multiplier(&self, combo_streak: u32) -> f64 {
        1.0 + f64::from(combo_streak.saturating_sub(1)) * self.combo_step
    }

    /// Points awarded for the match that brings the streak to `combo_streak`.
    ///
    /// Halves round to even.
    #[must_use]
    pub fn points_for(&self, combo_streak: u32) -> u64 {
        let points = f64::from(self.base_points) * self.multiplier(combo_streak);
        points.round_ties_even().max(0.0) as u64
    }
}

/// The persisted part of the score.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Resolved pairs, matched or not.
    pub turns: u32,
    pub score: u64,
    /// Consecutive matches since the last miss.
    pub combo_streak: u32,
    pub elapsed_seconds: f64,
}

/// Live score of one game.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreModel {
    config: ScoreConfig,
    state: ScoreState,
    timer_running: bool,
}

impl ScoreModel {
    /// Fresh score, timer stopped.
    #[must_use]
    pub fn new(config: ScoreConfig) -> Self {
        Self {
            config,
            state: ScoreState::default(),
            timer_running: false,
        }
    }

    /// Score restored verbatim from a snapshot, timer stopped.
    #[must_use]
    pub fn restore(config: ScoreConfig, state: ScoreState) -> Self {
        Self {
            config,
            state,
            timer_running: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    #[must_use]
    pub fn turns(&self) -> u32 {
        self.state.turns
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.state.score
    }

    #[must_use]
    pub fn combo_streak(&self) -> u32 {
        self.state.combo_streak
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.state.elapsed_seconds
    }

    /// Multiplier that applied to the most recent match.
    #[must_use]
    pub fn current_multiplier(&self) -> f64 {
        self.config.multiplier(self.state.combo_streak)
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    /// Count one resolved pair.
    ///
    /// Counters saturate; a restored state may already sit at the limit.
    pub fn record_turn(&mut self) {
        self.state.turns = self.state.turns.saturating_add(1);
    }

    /// Extend the streak and add its points. Returns the points earned.
    pub fn record_match(&mut self) -> u64 {
        self.state.combo_streak = self.state.combo_streak.saturating_add(1);
        let points = self.config.points_for(self.state.combo_streak);
        self.state.score = self.state.score.saturating_add(points);
        log::info!(
            "points: {} (base {}, multiplier {:.1}), total {}",
            points,
            self.config.base_points,
            self.current_multiplier(),
            self.state.score
        );
        points
    }

    /// Break the streak.
    pub fn record_miss(&mut self) {
        self.state.combo_streak = 0;
    }

    pub fn start_timer(&mut self) {
        self.timer_running = true;
    }

    pub fn stop_timer(&mut self) {
        self.timer_running = false;
    }

    /// Add one second if the timer runs. Returns whether time advanced.
    pub fn tick(&mut self) -> bool {
        if !self.timer_running {
            return false;
        }
        self.state.elapsed_seconds += 1.0;
        true
    }
}

/// `MM:SS` text for the timer display.
///
/// ```
/// use memory_match::score::format_elapsed;
///
/// assert_eq!(format_elapsed(0.0), "00:00");
/// assert_eq!(format_elapsed(125.0), "02:05");
/// ```
#[must_use]
pub fn format_elapsed(elapsed_seconds: f64) -> String {
    let total = elapsed_seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier() {
        let config = ScoreConfig::default();
        assert_eq!(config.multiplier(0), 1.0);
        assert_eq!(config.multiplier(1), 1.0);
        assert_eq!(config.multiplier(2), 2.0);
        assert_eq!(config.multiplier(4), 4.0);

        let half = ScoreConfig::new(10, 0.5);
        assert_eq!(half.multiplier(3), 2.0);
        assert_eq!(half.points_for(2), 15);
    }

    #[test]
    fn test_points_round_half_to_even() {
        // 1 * 1.5 = 1.5 -> 2, 1 * 2.5 = 2.5 -> 2
        let config = ScoreConfig::new(1, 0.5);
        assert_eq!(config.points_for(2), 2);
        assert_eq!(config.points_for(4), 2);
    }

    #[test]
    fn test_combo_sequence() {
        let mut model = ScoreModel::new(ScoreConfig::default());

        let earned: Vec<_> = (0..4).map(|_| model.record_match()).collect();
        assert_eq!(earned, vec![1, 2, 3, 4]);
        assert_eq!(model.score(), 10);
        assert_eq!(model.combo_streak(), 4);

        model.record_miss();
        assert_eq!(model.combo_streak(), 0);
        assert_eq!(model.record_match(), 1);
        assert_eq!(model.score(), 11);
    }

    #[test]
    fn test_turns_are_independent_of_outcome() {
        let mut model = ScoreModel::new(ScoreConfig::default());
        model.record_turn();
        model.record_miss();
        model.record_turn();
        model.record_match();
        assert_eq!(model.turns(), 2);
    }

    #[test]
    fn test_tick_requires_running_timer() {
        let mut model = ScoreModel::new(ScoreConfig::default());
        assert!(!model.tick());
        assert_eq!(model.elapsed_seconds(), 0.0);

        model.start_timer();
        assert!(model.tick());
        assert!(model.tick());
        assert_eq!(model.elapsed_seconds(), 2.0);

        model.stop_timer();
        assert!(!model.tick());
        assert_eq!(model.elapsed_seconds(), 2.0);
    }

    #[test]
    fn test_restore_continues_streak() {
        let state = ScoreState {
            turns: 5,
            score: 6,
            combo_streak: 3,
            elapsed_seconds: 42.0,
        };
        let mut model = ScoreModel::restore(ScoreConfig::default(), state.clone());

        assert_eq!(model.state(), &state);
        assert!(!model.timer_running());
        assert_eq!(model.current_multiplier(), 3.0);
        assert_eq!(model.record_match(), 4);
    }

    #[test]
    fn test_counters_saturate_at_limits() {
        let state = ScoreState {
            turns: u32::MAX,
            score: u64::MAX - 1,
            combo_streak: u32::MAX,
            elapsed_seconds: 0.0,
        };
        let mut model = ScoreModel::restore(ScoreConfig::default(), state);

        model.record_turn();
        model.record_match();
        assert_eq!(model.turns(), u32::MAX);
        assert_eq!(model.combo_streak(), u32::MAX);
        assert_eq!(model.score(), u64::MAX);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(59.9), "00:59");
        assert_eq!(format_elapsed(60.0), "01:00");
        assert_eq!(format_elapsed(3599.0), "59:59");
        assert_eq!(format_elapsed(6000.0), "100:00");
    }

    #[test]
    fn test_score_state_serialization() {
        let state = ScoreState {
            turns: 2,
            score: 3,
            combo_streak: 2,
            elapsed_seconds: 17.0,
        };
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: ScoreState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
