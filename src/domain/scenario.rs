/// Scenario data: the immutable decision prompts a session walks through.
/// Content lives in decks (embedded or TOML files); nothing here does I/O.

/// The two answers a player can give.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Choice {
    /// Hand the task to AI.
    Delegate,
    /// Keep the task with a person.
    Human,
}

impl Choice {
    /// Short label for buttons and feedback lines.
    pub fn label(&self) -> &'static str {
        match self {
            Choice::Delegate => "DELEGATE to AI",
            Choice::Human => "Keep HUMAN",
        }
    }
}

/// One decision prompt with its known correct answer and feedback text.
/// Never mutated after deck load; the session only holds an index into
/// the deck's scenario list.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub id: u32,
    pub category: String,
    pub prompt: String,
    pub correct: Choice,
    pub feedback_correct: String,
    pub feedback_incorrect: String,
    /// Extra flavor line shown only on a wrong decision.
    pub flavor_wrong: String,
}

impl Scenario {
    pub fn new(
        id: u32,
        category: &str,
        prompt: &str,
        correct: Choice,
        feedback_correct: &str,
        feedback_incorrect: &str,
        flavor_wrong: &str,
    ) -> Self {
        Scenario {
            id,
            category: category.to_string(),
            prompt: prompt.to_string(),
            correct,
            feedback_correct: feedback_correct.to_string(),
            feedback_incorrect: feedback_incorrect.to_string(),
            flavor_wrong: flavor_wrong.to_string(),
        }
    }

    /// Feedback text for a given outcome.
    pub fn feedback(&self, correct: bool) -> &str {
        if correct {
            &self.feedback_correct
        } else {
            &self.feedback_incorrect
        }
    }
}
