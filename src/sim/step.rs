/// Intents and the tick: all session mutation lives here.
///
/// Four intents drive the phase machine:
///   1. `start_game` — Setup/Finished → Playing (refused on an empty deck)
///   2. `decide`     — Playing, first decision only; stops the countdown
///   3. `advance`    — Feedback → next scenario, or Finished after the last
///   4. `reset_game` — any phase → Setup
///
/// `step` runs once per fixed-interval tick and only acts in Playing:
/// undecided it drives the countdown (expiry → feedback with no decision),
/// decided it drives the reveal delay.
///
/// Decision vs. timeout is serialized by the single loop thread. The first
/// to commit moves the phase and the loser fails its guard: a late decide
/// lands after the phase already left Playing, and an expiry after decide
/// is impossible because decide stops the countdown synchronously.

use crate::domain::rules;
use crate::domain::scenario::Choice;
use crate::domain::timer::Countdown;
use super::event::GameEvent;
use super::session::{Phase, SessionState};

/// Countdown seconds at or below which per-second warning events fire.
pub const LOW_TIME_SECS: u32 = 5;

// ══════════════════════════════════════════════════════════════
// Intents
// ══════════════════════════════════════════════════════════════

/// Begin a session on the active deck. No-op outside Setup/Finished.
/// An empty deck refuses the start and leaves a warning on screen.
pub fn start_game(s: &mut SessionState) -> Vec<GameEvent> {
    let mut events = vec![];
    if s.phase != Phase::Setup && s.phase != Phase::Finished {
        return events;
    }
    if s.deck.scenarios.is_empty() {
        s.set_message("This deck has no scenarios", 30);
        return events;
    }
    s.score = 0;
    s.round = 1;
    s.new_best = false;
    begin_scenario(s, 0);
    s.phase = Phase::Playing;
    events.push(GameEvent::GameStarted);
    events
}

/// Lock in an answer for the current scenario. Only the first decision
/// per scenario counts; anything later (second press, press after
/// timeout) fails the guard and changes nothing.
pub fn decide(s: &mut SessionState, choice: Choice) -> Vec<GameEvent> {
    let mut events = vec![];
    if s.phase != Phase::Playing || s.decision.is_some() {
        return events;
    }
    // Stop before scoring: once a decision exists the countdown can
    // never fire for this scenario.
    s.countdown.stop();
    s.decision = Some(choice);
    let correct = match s.scenario() {
        Some(sc) => rules::is_correct(s.decision, sc.correct),
        None => false,
    };
    if correct {
        s.score += rules::DECISION_REWARD;
    }
    events.push(GameEvent::DecisionLocked { correct });
    s.reveal_left = s.timing.reveal_ticks;
    if s.reveal_left == 0 {
        enter_feedback(s, &mut events);
    }
    events
}

/// Leave feedback: load the next scenario, or finish after the last one.
pub fn advance(s: &mut SessionState) -> Vec<GameEvent> {
    let mut events = vec![];
    if s.phase != Phase::Feedback {
        return events;
    }
    if s.is_last_scenario() {
        s.countdown.stop();
        s.phase = Phase::Finished;
        events.push(GameEvent::GameFinished { score: s.score });
        return events;
    }
    let next = s.current + 1;
    begin_scenario(s, next);
    s.phase = Phase::Playing;
    events.push(GameEvent::ScenarioAdvanced { index: next });
    if next == rules::round_midpoint(s.scenario_count()) {
        s.round += 1;
        events.push(GameEvent::RoundStarted { round: s.round });
    }
    events
}

/// Back to the setup screen from anywhere. Deck and deck list survive;
/// everything session-scoped is cleared.
pub fn reset_game(s: &mut SessionState) -> Vec<GameEvent> {
    s.countdown = Countdown::new(s.timing.round_ticks);
    s.phase = Phase::Setup;
    s.current = 0;
    s.score = 0;
    s.round = 1;
    s.decision = None;
    s.timed_out = false;
    s.reveal_left = 0;
    s.new_best = false;
    s.message.clear();
    s.message_timer = 0;
    vec![]
}

// ══════════════════════════════════════════════════════════════
// Tick
// ══════════════════════════════════════════════════════════════

/// Advance the session by one tick. Does nothing outside Playing.
pub fn step(s: &mut SessionState) -> Vec<GameEvent> {
    let mut events = vec![];
    if s.phase != Phase::Playing {
        return events;
    }

    if s.message_timer > 0 {
        s.message_timer -= 1;
        if s.message_timer == 0 {
            s.message.clear();
        }
    }

    if s.decision.is_none() {
        resolve_countdown(s, &mut events);
    } else {
        resolve_reveal(s, &mut events);
    }
    events
}

/// Tick the countdown; expiry is feedback with no decision.
fn resolve_countdown(s: &mut SessionState, events: &mut Vec<GameEvent>) {
    let before = s.secs_remaining();
    if s.countdown.tick() {
        s.timed_out = true;
        events.push(GameEvent::TimeExpired);
        enter_feedback(s, events);
        return;
    }
    let after = s.secs_remaining();
    if after < before && after > 0 && after <= LOW_TIME_SECS {
        events.push(GameEvent::CountdownLow { secs_left: after });
    }
}

/// Count down the post-decision reveal delay.
fn resolve_reveal(s: &mut SessionState, events: &mut Vec<GameEvent>) {
    if s.reveal_left > 0 {
        s.reveal_left -= 1;
    }
    if s.reveal_left == 0 {
        enter_feedback(s, events);
    }
}

// ══════════════════════════════════════════════════════════════
// Shared transitions
// ══════════════════════════════════════════════════════════════

/// Load scenario `index` and arm the countdown at full duration.
fn begin_scenario(s: &mut SessionState, index: usize) {
    s.current = index;
    s.decision = None;
    s.timed_out = false;
    s.reveal_left = 0;
    s.countdown.start(s.timing.round_ticks);
}

fn enter_feedback(s: &mut SessionState, events: &mut Vec<GameEvent>) {
    s.phase = Phase::Feedback;
    s.reveal_left = 0;
    events.push(GameEvent::FeedbackRevealed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::deck;

    /// Session on the six builtin scenarios with compact test timing:
    /// whole-second ticks, 45-tick countdown, 2-tick reveal.
    fn session() -> SessionState {
        let mut s = SessionState::new();
        s.deck = deck::builtin_deck();
        s.timing.tick_rate_ms = 1000;
        s.timing.round_ticks = 45;
        s.timing.reveal_ticks = 2;
        s
    }

    fn correct_choice(s: &SessionState) -> Choice {
        s.scenario().unwrap().correct
    }

    fn wrong_choice(s: &SessionState) -> Choice {
        match correct_choice(s) {
            Choice::Delegate => Choice::Human,
            Choice::Human => Choice::Delegate,
        }
    }

    /// Step until feedback shows (bounded so a broken machine fails fast).
    fn run_to_feedback(s: &mut SessionState) {
        for _ in 0..1000 {
            if s.phase == Phase::Feedback {
                return;
            }
            step(s);
        }
        panic!("never reached feedback");
    }

    #[test]
    fn full_correct_run_scores_max() {
        let mut s = session();
        start_game(&mut s);
        assert_eq!(s.phase, Phase::Playing);
        for _ in 0..6 {
            let c = correct_choice(&s);
            decide(&mut s, c);
            run_to_feedback(&mut s);
            assert!(s.is_correct());
            advance(&mut s);
        }
        assert_eq!(s.phase, Phase::Finished);
        assert_eq!(s.score, 600);
        assert_eq!(s.accuracy_percent(), 100);
        assert_eq!(s.round, 2);
    }

    #[test]
    fn single_scenario_walkthrough() {
        // The canonical sequence: start, answer scenario 0 correctly,
        // advance. One reward, still round 1, index moved to 1.
        let mut s = session();
        start_game(&mut s);
        assert_eq!(s.countdown.remaining(), 45);

        let c = correct_choice(&s);
        decide(&mut s, c);
        assert_eq!(s.score, 100);
        assert_eq!(s.phase, Phase::Playing); // reveal delay still running
        assert!(!s.feedback_visible());

        run_to_feedback(&mut s);
        advance(&mut s);
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.current, 1);
        assert_eq!(s.round, 1);
        assert_eq!(s.countdown.remaining(), 45);
    }

    #[test]
    fn reveal_delay_is_exact() {
        let mut s = session();
        start_game(&mut s);
        let c = correct_choice(&s);
        decide(&mut s, c);
        step(&mut s); // reveal 2→1
        assert_eq!(s.phase, Phase::Playing);
        step(&mut s); // reveal 1→0, feedback
        assert_eq!(s.phase, Phase::Feedback);
    }

    #[test]
    fn decide_locks_first_choice() {
        let mut s = session();
        start_game(&mut s);
        let wrong = wrong_choice(&s);
        let right = correct_choice(&s);
        decide(&mut s, wrong);
        assert_eq!(s.decision, Some(wrong));
        assert_eq!(s.score, 0);

        // Second decision, even a different one, changes nothing.
        let events = decide(&mut s, right);
        assert!(events.is_empty());
        assert_eq!(s.decision, Some(wrong));
        assert_eq!(s.score, 0);
        assert!(!s.is_correct());
    }

    #[test]
    fn score_awarded_exactly_once() {
        let mut s = session();
        start_game(&mut s);
        let c = correct_choice(&s);
        decide(&mut s, c);
        assert_eq!(s.score, 100);
        decide(&mut s, c);
        decide(&mut s, c);
        assert_eq!(s.score, 100);
    }

    #[test]
    fn expiry_is_incorrect_and_final() {
        let mut s = session();
        start_game(&mut s);
        for _ in 0..45 {
            step(&mut s);
        }
        assert_eq!(s.phase, Phase::Feedback);
        assert!(s.timed_out);
        assert_eq!(s.decision, None);
        assert!(!s.is_correct());
        assert_eq!(s.countdown.remaining(), 0);

        // A decision arriving after expiry is a no-op.
        let events = decide(&mut s, Choice::Delegate);
        assert!(events.is_empty());
        assert_eq!(s.decision, None);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn countdown_clamps_at_zero() {
        let mut s = session();
        start_game(&mut s);
        for _ in 0..200 {
            step(&mut s);
        }
        assert_eq!(s.countdown.remaining(), 0);
        assert_eq!(s.phase, Phase::Feedback);
    }

    #[test]
    fn decide_wins_race_with_expiry() {
        let mut s = session();
        start_game(&mut s);
        for _ in 0..44 {
            step(&mut s);
        }
        assert_eq!(s.countdown.remaining(), 1);

        // Decision lands on the same iteration the timer would fire.
        let c = correct_choice(&s);
        decide(&mut s, c);
        assert_eq!(s.score, 100);

        // The stopped countdown can no longer expire.
        let events = step(&mut s);
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::TimeExpired)));
        run_to_feedback(&mut s);
        assert!(!s.timed_out);
        assert!(s.is_correct());
    }

    #[test]
    fn round_bumps_past_midpoint() {
        let mut s = session();
        start_game(&mut s);
        // Scenarios 0, 1, 2 are round 1; landing on index 3 starts round 2.
        for expect_round in [1u32, 1, 2, 2, 2] {
            let c = correct_choice(&s);
            decide(&mut s, c);
            run_to_feedback(&mut s);
            advance(&mut s);
            assert_eq!(s.round, expect_round);
        }
        assert_eq!(s.current, 5);
    }

    #[test]
    fn reset_from_every_phase() {
        // From Playing.
        let mut s = session();
        start_game(&mut s);
        let c = correct_choice(&s);
        decide(&mut s, c);
        reset_game(&mut s);
        assert_reset(&s);

        // From Feedback.
        start_game(&mut s);
        let w = wrong_choice(&s);
        decide(&mut s, w);
        run_to_feedback(&mut s);
        reset_game(&mut s);
        assert_reset(&s);

        // From Finished.
        start_game(&mut s);
        for _ in 0..6 {
            let c = correct_choice(&s);
            decide(&mut s, c);
            run_to_feedback(&mut s);
            advance(&mut s);
        }
        assert_eq!(s.phase, Phase::Finished);
        reset_game(&mut s);
        assert_reset(&s);
    }

    fn assert_reset(s: &SessionState) {
        assert_eq!(s.phase, Phase::Setup);
        assert_eq!(s.score, 0);
        assert_eq!(s.round, 1);
        assert_eq!(s.current, 0);
        assert_eq!(s.decision, None);
        assert!(!s.timed_out);
        assert!(!s.countdown.is_running());
    }

    #[test]
    fn start_refused_on_empty_deck() {
        let mut s = SessionState::new();
        let events = start_game(&mut s);
        assert!(events.is_empty());
        assert_eq!(s.phase, Phase::Setup);
        assert!(!s.message.is_empty());
    }

    #[test]
    fn restart_clears_previous_session() {
        let mut s = session();
        start_game(&mut s);
        let c = correct_choice(&s);
        decide(&mut s, c);
        run_to_feedback(&mut s);
        advance(&mut s);
        assert_eq!(s.score, 100);

        // Finished sessions restart clean via start_game.
        reset_game(&mut s);
        start_game(&mut s);
        assert_eq!(s.score, 0);
        assert_eq!(s.round, 1);
        assert_eq!(s.current, 0);
        assert_eq!(s.phase, Phase::Playing);
    }

    #[test]
    fn low_time_events_per_second_boundary() {
        let mut s = session();
        s.timing.round_ticks = 8;
        start_game(&mut s);

        let mut lows = vec![];
        let mut expired = false;
        for _ in 0..20 {
            for e in step(&mut s) {
                match e {
                    GameEvent::CountdownLow { secs_left } => lows.push(secs_left),
                    GameEvent::TimeExpired => expired = true,
                    _ => {}
                }
            }
        }
        assert_eq!(lows, vec![5, 4, 3, 2, 1]);
        assert!(expired);
    }

    #[test]
    fn intents_ignored_in_wrong_phase() {
        let mut s = session();
        // advance/decide do nothing in Setup.
        assert!(advance(&mut s).is_empty());
        assert!(decide(&mut s, Choice::Human).is_empty());
        assert_eq!(s.phase, Phase::Setup);

        start_game(&mut s);
        // advance does nothing while Playing.
        assert!(advance(&mut s).is_empty());
        assert_eq!(s.phase, Phase::Playing);
        // start does nothing while Playing.
        assert!(start_game(&mut s).is_empty());
    }
}
