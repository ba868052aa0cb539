/// Events emitted by the state machine.
/// The presentation layer consumes these for sound and record keeping.

#[derive(Clone, Debug)]
#[allow(dead_code)]
pub enum GameEvent {
    GameStarted,
    /// A decision was locked in; `correct` is the verdict.
    DecisionLocked { correct: bool },
    /// The reveal delay elapsed (or time ran out) and feedback is showing.
    FeedbackRevealed,
    /// The countdown hit zero with no decision made.
    TimeExpired,
    /// Countdown entered its final seconds; one per second boundary.
    CountdownLow { secs_left: u32 },
    ScenarioAdvanced { index: usize },
    /// The session crossed the deck midpoint into a new round.
    RoundStarted { round: u32 },
    GameFinished { score: u32 },
}
