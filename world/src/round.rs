//! Round progression counters and the intro countdown.

use std::{collections::VecDeque, sync::Arc};

use arena_survival_core::{EnemyProfile, GamePhase, WavePlan};

/// First value shown by the intro countdown.
pub(crate) const INTRO_COUNTDOWN_FROM: u32 = 3;

/// Outcome of advancing the intro countdown by one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IntroStep {
    /// Show the provided countdown value.
    Show(u32),
    /// The countdown completed; the first wave may be requested.
    Finished,
}

#[derive(Debug)]
pub(crate) struct RoundState {
    pub(crate) phase: GamePhase,
    pub(crate) round: u32,
    pub(crate) score: u32,
    pub(crate) total_enemies: u32,
    pub(crate) enemies_killed: u32,
    pub(crate) intro_active: bool,
    pub(crate) countdown: Option<u32>,
    pub(crate) waiting_for_wave: bool,
    pub(crate) awaiting_plan: bool,
    pub(crate) pending_spawns: VecDeque<Arc<EnemyProfile>>,
    pub(crate) score_submitted: bool,
}

impl RoundState {
    pub(crate) fn new() -> Self {
        Self {
            phase: GamePhase::Menu,
            round: 0,
            score: 0,
            total_enemies: 0,
            enemies_killed: 0,
            intro_active: false,
            countdown: None,
            waiting_for_wave: false,
            awaiting_plan: false,
            pending_spawns: VecDeque::new(),
            score_submitted: false,
        }
    }

    /// Clears every counter while keeping the current phase.
    pub(crate) fn reset(&mut self) {
        let phase = self.phase;
        *self = Self::new();
        self.phase = phase;
    }

    /// Counts a kill and returns the new score.
    pub(crate) fn record_kill(&mut self) -> u32 {
        self.score = self.score.saturating_add(1);
        self.enemies_killed = self
            .enemies_killed
            .saturating_add(1)
            .min(self.total_enemies);
        self.score
    }

    /// Accepts a plan for the round following the current one.
    pub(crate) fn install_plan(&mut self, round: u32, plan: WavePlan) -> bool {
        if !self.awaiting_plan || round != self.next_round() {
            return false;
        }
        self.round = round;
        self.total_enemies = u32::try_from(plan.len()).unwrap_or(u32::MAX);
        self.enemies_killed = 0;
        self.awaiting_plan = false;
        self.waiting_for_wave = false;
        self.pending_spawns = plan.into();
        true
    }

    pub(crate) fn next_round(&self) -> u32 {
        self.round.saturating_add(1)
    }

    /// Reports whether the round is over and no wave is being prepared.
    pub(crate) fn is_cleared(&self, live_enemies: usize) -> bool {
        self.phase == GamePhase::Playing
            && self.round > 0
            && live_enemies == 0
            && self.pending_spawns.is_empty()
            && !self.intro_active
            && !self.waiting_for_wave
            && !self.awaiting_plan
    }

    pub(crate) fn advance_countdown(&mut self) -> IntroStep {
        match self.countdown {
            None => {
                self.countdown = Some(INTRO_COUNTDOWN_FROM);
                IntroStep::Show(INTRO_COUNTDOWN_FROM)
            }
            Some(value) if value > 1 => {
                self.countdown = Some(value - 1);
                IntroStep::Show(value - 1)
            }
            Some(_) => {
                self.countdown = None;
                self.intro_active = false;
                IntroStep::Finished
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(count: usize) -> WavePlan {
        (0..count)
            .map(|_| Arc::new(EnemyProfile::normal()))
            .collect()
    }

    #[test]
    fn countdown_runs_three_two_one() {
        let mut state = RoundState::new();
        state.intro_active = true;
        let steps: Vec<IntroStep> = (0..4).map(|_| state.advance_countdown()).collect();
        assert_eq!(
            steps,
            vec![
                IntroStep::Show(3),
                IntroStep::Show(2),
                IntroStep::Show(1),
                IntroStep::Finished
            ]
        );
        assert!(!state.intro_active);
    }

    #[test]
    fn plans_are_accepted_only_for_the_requested_round() {
        let mut state = RoundState::new();
        assert!(!state.install_plan(1, plan(2)));
        state.awaiting_plan = true;
        assert!(!state.install_plan(2, plan(2)));
        assert!(state.install_plan(1, plan(2)));
        assert_eq!(state.round, 1);
        assert_eq!(state.total_enemies, 2);
        assert_eq!(state.pending_spawns.len(), 2);
        assert!(!state.install_plan(2, plan(2)));
    }

    #[test]
    fn kills_never_exceed_round_total() {
        let mut state = RoundState::new();
        state.awaiting_plan = true;
        assert!(state.install_plan(1, plan(1)));
        assert_eq!(state.record_kill(), 1);
        assert_eq!(state.record_kill(), 2);
        assert_eq!(state.enemies_killed, 1);
    }

    #[test]
    fn clear_detection_waits_for_spawns_and_grace() {
        let mut state = RoundState::new();
        state.phase = GamePhase::Playing;
        assert!(!state.is_cleared(0));
        state.awaiting_plan = true;
        assert!(state.install_plan(1, plan(1)));
        assert!(!state.is_cleared(0));
        let _ = state.pending_spawns.pop_front();
        assert!(!state.is_cleared(1));
        assert!(state.is_cleared(0));
        state.waiting_for_wave = true;
        assert!(!state.is_cleared(0));
    }

    #[test]
    fn reset_keeps_phase() {
        let mut state = RoundState::new();
        state.phase = GamePhase::Playing;
        state.score = 12;
        state.reset();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
    }
}
