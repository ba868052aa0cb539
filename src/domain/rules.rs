/// Scoring and timing rules — truth-table driven.
///
/// Pure functions over small inputs — no session state, no side effects.
/// The state machine in `sim::step` calls these; the renderer calls the
/// display helpers.
///
/// ## Verdict Truth Table
/// ┌──────────────────────────────┬───────────┐
/// │ Condition                     │ Correct?  │
/// ├──────────────────────────────┼───────────┤
/// │ decision = None (timeout)     │ NO        │
/// │ decision = Some(c), c matches │ YES       │
/// │ decision = Some(c), no match  │ NO        │
/// └──────────────────────────────┴───────────┘
///
/// ## Urgency Zone Table (remaining vs duration)
/// ┌──────────────────────────────┬───────────┐
/// │ Condition                     │ Zone      │
/// ├──────────────────────────────┼───────────┤
/// │ remaining > 2/3 of duration   │ Calm      │
/// │ remaining > 1/3 of duration   │ Wary      │
/// │ otherwise                     │ Critical  │
/// └──────────────────────────────┴───────────┘
use super::scenario::Choice;

/// Points for a correct decision. Awarded at most once per scenario.
pub const DECISION_REWARD: u32 = 100;

// ── Verdict ──

/// Was the recorded decision right? Timeout (no decision) is never correct.
pub fn is_correct(decision: Option<Choice>, correct: Choice) -> bool {
    decision == Some(correct)
}

// ── Score math ──

/// Best possible score for a deck of `count` scenarios.
pub fn max_score(count: usize) -> u32 {
    count as u32 * DECISION_REWARD
}

/// Final accuracy as a rounded percentage. 0 for an empty deck.
pub fn accuracy_percent(score: u32, count: usize) -> u32 {
    let max = max_score(count);
    if max == 0 {
        return 0;
    }
    (score * 100 + max / 2) / max
}

// ── Rounds ──

/// Scenario index at which the session enters round 2.
/// The round bumps when `advance` lands exactly on this index.
pub fn round_midpoint(count: usize) -> usize {
    (count + 1) / 2
}

// ── Timer urgency ──

/// Display urgency of the countdown; drives timer color and low-time blips.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerZone {
    Calm,
    Wary,
    Critical,
}

/// Zone for the remaining/duration pair. See truth table above.
/// Integer-exact: the boundary values themselves fall into the lower zone.
pub fn timer_zone(remaining: u32, duration: u32) -> TimerZone {
    if remaining * 3 > duration * 2 {
        TimerZone::Calm
    } else if remaining * 3 > duration {
        TimerZone::Wary
    } else {
        TimerZone::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_table() {
        assert!(is_correct(Some(Choice::Delegate), Choice::Delegate));
        assert!(is_correct(Some(Choice::Human), Choice::Human));
        assert!(!is_correct(Some(Choice::Human), Choice::Delegate));
        assert!(!is_correct(Some(Choice::Delegate), Choice::Human));
        assert!(!is_correct(None, Choice::Delegate));
        assert!(!is_correct(None, Choice::Human));
    }

    #[test]
    fn accuracy_rounds_to_nearest() {
        assert_eq!(accuracy_percent(600, 6), 100);
        assert_eq!(accuracy_percent(0, 6), 0);
        assert_eq!(accuracy_percent(300, 6), 50);
        // 250/600 = 41.67% → 42
        assert_eq!(accuracy_percent(250, 6), 42);
        // 100/300 = 33.33% → 33
        assert_eq!(accuracy_percent(100, 3), 33);
        // Empty deck never divides by zero.
        assert_eq!(accuracy_percent(0, 0), 0);
    }

    #[test]
    fn midpoint_even_and_odd() {
        assert_eq!(round_midpoint(6), 3);
        assert_eq!(round_midpoint(5), 3);
        assert_eq!(round_midpoint(2), 1);
        assert_eq!(round_midpoint(1), 1);
    }

    #[test]
    fn timer_zones_at_45s_boundaries() {
        // For a 45-unit timer the bands fall at >30 calm, >15 wary.
        assert_eq!(timer_zone(45, 45), TimerZone::Calm);
        assert_eq!(timer_zone(31, 45), TimerZone::Calm);
        assert_eq!(timer_zone(30, 45), TimerZone::Wary);
        assert_eq!(timer_zone(16, 45), TimerZone::Wary);
        assert_eq!(timer_zone(15, 45), TimerZone::Critical);
        assert_eq!(timer_zone(0, 45), TimerZone::Critical);
    }

    #[test]
    fn timer_zones_scale_with_duration() {
        // Same thirds in tick units (450 ticks = 45 s at 100 ms/tick).
        assert_eq!(timer_zone(301, 450), TimerZone::Calm);
        assert_eq!(timer_zone(300, 450), TimerZone::Wary);
        assert_eq!(timer_zone(150, 450), TimerZone::Critical);
    }
}
