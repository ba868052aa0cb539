/// SessionState: the complete snapshot of one game session.
///
/// ## Phase machine
///
/// ```text
/// Setup ──start──▶ Playing ──decide/timeout──▶ Feedback ──advance──▶ Playing (next)
///   ▲  ◀─select──▶ DeckSelect                      │
///   └────────────────reset───────────────────── Finished ◀─advance (last)
/// ```
///
/// Within `Playing`, "undecided" vs "decided" is carried by `decision`:
/// `None` while the countdown runs, `Some` during the short reveal delay.
/// Timeout is feedback with no decision (`timed_out` set, `decision` None);
/// there is no separate phase for it.
///
/// All mutation goes through the intent functions in `sim::step`; the
/// renderer only reads.

use crate::config::TimingConfig;
use crate::domain::rules::{self, TimerZone};
use crate::domain::scenario::{Choice, Scenario};
use crate::domain::timer::Countdown;
use crate::sim::deck::{Deck, DeckInfo};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Setup,
    DeckSelect,
    Playing,
    Feedback,
    Finished,
}

pub struct SessionState {
    // ── Deck ──
    /// Active scenario deck. Never mutated during a session.
    pub deck: Deck,
    pub active_deck_path: String, // filesystem path, or "__builtin__"

    // ── Core state machine ──
    pub phase: Phase,
    /// Index into `deck.scenarios`; valid while Playing or Feedback.
    pub current: usize,
    pub score: u32,
    pub round: u32,
    pub countdown: Countdown,
    /// Set at most once per scenario; cleared by advance/reset.
    pub decision: Option<Choice>,
    pub timed_out: bool,
    /// Ticks left between a locked decision and feedback.
    pub reveal_left: u32,

    // ── Timing config ──
    pub timing: TimingConfig,

    // ── Records ──
    pub best_score: u32,
    pub new_best: bool,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
    pub anim_tick: u32,

    // ── Deck select ──
    pub deck_list: Vec<DeckInfo>,
    pub deck_cursor: usize,
    pub deck_scroll: usize,
}

// ── Construction ──

impl SessionState {
    pub fn new() -> Self {
        SessionState {
            deck: Deck::empty(),
            active_deck_path: String::from("__builtin__"),
            phase: Phase::Setup,
            current: 0,
            score: 0,
            round: 1,
            countdown: Countdown::new(0),
            decision: None,
            timed_out: false,
            reveal_left: 0,
            timing: TimingConfig {
                tick_rate_ms: 100,
                round_ticks: 450,
                reveal_ticks: 5,
            },
            best_score: 0,
            new_best: false,
            message: String::new(),
            message_timer: 0,
            anim_tick: 0,
            deck_list: vec![],
            deck_cursor: 0,
            deck_scroll: 0,
        }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }
}

// ── Derived queries (read-only, used by renderer and step) ──

impl SessionState {
    pub fn scenario_count(&self) -> usize {
        self.deck.scenarios.len()
    }

    /// Current scenario, or None when the index is out of range
    /// (empty deck, or phases that carry no scenario).
    pub fn scenario(&self) -> Option<&Scenario> {
        self.deck.scenarios.get(self.current)
    }

    /// Verdict for the current scenario. Timeout reads as incorrect.
    pub fn is_correct(&self) -> bool {
        match self.scenario() {
            Some(s) => rules::is_correct(self.decision, s.correct),
            None => false,
        }
    }

    pub fn is_last_scenario(&self) -> bool {
        self.current + 1 >= self.scenario_count()
    }

    pub fn feedback_visible(&self) -> bool {
        self.phase == Phase::Feedback
    }

    /// Remaining countdown as whole display seconds (ceiling).
    pub fn secs_remaining(&self) -> u32 {
        let tps = self.timing.ticks_per_sec();
        (self.countdown.remaining() + tps - 1) / tps
    }

    pub fn timer_fraction(&self) -> f32 {
        self.countdown.fraction()
    }

    pub fn timer_zone(&self) -> TimerZone {
        rules::timer_zone(self.countdown.remaining(), self.countdown.duration())
    }

    pub fn max_score(&self) -> u32 {
        rules::max_score(self.scenario_count())
    }

    pub fn accuracy_percent(&self) -> u32 {
        rules::accuracy_percent(self.score, self.scenario_count())
    }
}
