/// Deck loader: scenario decks from the built-in set or TOML files.
///
/// ## Sources (priority order):
///   1. Built-in embedded deck (the stock workshop set)
///   2. `<decks_dir>/*.toml` files under the usual search dirs
///
/// ## Deck file format:
///   ```toml
///   name = "My Deck"
///   author = "someone"
///   description = "What this deck covers"
///
///   [[scenario]]
///   category = "Teacher Task"
///   prompt = "The situation to judge."
///   correct = "delegate"            # "delegate"/"ai" or "human"/"keep"
///   feedback_correct = "Shown on the right answer."
///   feedback_incorrect = "Shown on the wrong answer (and on timeout)."
///   flavor_wrong = "Optional joke shown under wrong answers."
///   ```
///
/// Scenario `id` is optional and defaults to the position in the file.
/// Files that fail to parse are skipped during scan; a deck that fails to
/// load at switch time falls back to the built-in deck.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::GameConfig;
use crate::domain::scenario::{Choice, Scenario};
use crate::sim::session::SessionState;

/// Sentinel path for the embedded deck.
pub const BUILTIN_PATH: &str = "__builtin__";

/// An ordered, immutable scenario sequence with its metadata.
#[derive(Clone, Debug)]
pub struct Deck {
    pub name: String,
    pub author: String,
    pub description: String,
    pub scenarios: Vec<Scenario>,
}

impl Deck {
    pub fn empty() -> Self {
        Deck {
            name: String::new(),
            author: String::new(),
            description: String::new(),
            scenarios: vec![],
        }
    }
}

/// Info about a deck, displayed in the deck selector.
#[derive(Clone, Debug)]
pub struct DeckInfo {
    pub name: String,
    pub author: String,
    pub description: String,
    pub scenario_count: usize,
    pub path: String, // filesystem path, or "__builtin__"
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Scan for available decks: built-in + `*.toml` under the deck dirs.
pub fn scan_decks(config: &GameConfig) -> Vec<DeckInfo> {
    let mut decks = vec![];

    let builtin = builtin_deck();
    decks.push(DeckInfo {
        name: builtin.name.clone(),
        author: builtin.author.clone(),
        description: builtin.description.clone(),
        scenario_count: builtin.scenarios.len(),
        path: BUILTIN_PATH.to_string(),
    });

    for base in &deck_search_dirs() {
        let dir = base.join(&config.decks_dir);
        if !dir.is_dir() {
            continue;
        }
        let entries = match std::fs::read_dir(&dir) {
            Ok(e) => e,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map_or(false, |e| e == "toml") {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    if let Some(info) = parse_deck_info(&content, &path) {
                        // The same dir can appear under two bases.
                        if !decks.iter().any(|d| d.path == info.path) {
                            decks.push(info);
                        }
                    }
                }
            }
        }
    }

    decks
}

/// Make a deck the active one, loading its scenarios.
pub fn switch_deck(s: &mut SessionState, info: &DeckInfo) {
    s.active_deck_path = info.path.clone();
    s.deck = load_deck(&info.path);
}

/// Load a deck by path. Anything unreadable falls back to the built-in.
pub fn load_deck(path: &str) -> Deck {
    if path == BUILTIN_PATH {
        return builtin_deck();
    }
    if let Ok(content) = std::fs::read_to_string(path) {
        if let Some(deck) = parse_deck(&content) {
            return deck;
        }
    }
    builtin_deck()
}

// ══════════════════════════════════════════════════════════════
// TOML parsing
// ══════════════════════════════════════════════════════════════

#[derive(Deserialize)]
struct TomlDeck {
    #[serde(default)]
    name: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    description: String,
    #[serde(default, rename = "scenario")]
    scenarios: Vec<TomlScenario>,
}

#[derive(Deserialize)]
struct TomlScenario {
    #[serde(default)]
    id: Option<u32>,
    category: String,
    prompt: String,
    correct: String,
    #[serde(default)]
    feedback_correct: String,
    #[serde(default)]
    feedback_incorrect: String,
    #[serde(default)]
    flavor_wrong: String,
}

/// Parse a whole deck. None on TOML errors or when no scenario survives.
fn parse_deck(content: &str) -> Option<Deck> {
    let raw: TomlDeck = toml::from_str(content).ok()?;

    let mut scenarios = vec![];
    for (i, ts) in raw.scenarios.into_iter().enumerate() {
        // Scenarios with an unknown `correct` value are dropped, not fatal.
        let correct = match parse_choice(&ts.correct) {
            Some(c) => c,
            None => continue,
        };
        scenarios.push(Scenario {
            id: ts.id.unwrap_or(i as u32 + 1),
            category: ts.category,
            prompt: ts.prompt,
            correct,
            feedback_correct: ts.feedback_correct,
            feedback_incorrect: ts.feedback_incorrect,
            flavor_wrong: ts.flavor_wrong,
        });
    }
    if scenarios.is_empty() {
        return None;
    }

    Some(Deck {
        name: raw.name,
        author: raw.author,
        description: raw.description,
        scenarios,
    })
}

/// Scan-time parse of a deck file into selector info.
fn parse_deck_info(content: &str, path: &Path) -> Option<DeckInfo> {
    let deck = parse_deck(content)?;
    let name = if deck.name.is_empty() {
        path.file_stem().unwrap_or_default().to_string_lossy().to_string()
    } else {
        deck.name
    };
    Some(DeckInfo {
        name,
        author: deck.author,
        description: deck.description,
        scenario_count: deck.scenarios.len(),
        path: path.to_string_lossy().to_string(),
    })
}

fn parse_choice(s: &str) -> Option<Choice> {
    match s.to_ascii_lowercase().as_str() {
        "delegate" | "ai" => Some(Choice::Delegate),
        "human" | "keep" => Some(Choice::Human),
        _ => None,
    }
}

/// Search dirs for deck directories: exe dir, CWD, XDG, system.
fn deck_search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Exe directory (resolve symlinks)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. CWD
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/delegate-this)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/delegate-this");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data (/usr/share/delegate-this)
    let sys = PathBuf::from("/usr/share/delegate-this");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

// ══════════════════════════════════════════════════════════════
// Built-in deck
// ══════════════════════════════════════════════════════════════

/// The six stock workshop scenarios for school leaders.
pub fn builtin_deck() -> Deck {
    Deck {
        name: "School Leaders".to_string(),
        author: "Workshop Set".to_string(),
        description: "The AI Decision Game for School Leaders".to_string(),
        scenarios: vec![
            Scenario::new(
                1,
                "Teacher Task",
                "Ms. Johnson needs to create 25 different math word problems \
                 about fractions for tomorrow's worksheet.",
                Choice::Delegate,
                "Smart choice! AI can generate varied practice problems \
                 efficiently, letting Ms. Johnson focus on reviewing them and \
                 planning instruction.",
                "Oops! This is perfect for AI - generating problem variations \
                 saves hours and lets teachers focus on pedagogy.",
                "Ms. Johnson stayed up until 2 AM writing 'Sally has 3/4 of a \
                 pizza...' for the 23rd time!",
            ),
            Scenario::new(
                2,
                "Student Support",
                "A student asks if AI can help them understand why their \
                 answer to a chemistry problem is wrong.",
                Choice::Delegate,
                "Great! AI can provide step-by-step explanations and catch \
                 conceptual gaps, supporting learning perfectly.",
                "This is actually ideal for AI - it can give patient, \
                 detailed explanations that help students learn from mistakes.",
                "The student is still staring at their wrong answer, wondering \
                 if osmosis will help it become correct!",
            ),
            Scenario::new(
                3,
                "Leadership Decision",
                "The principal needs to decide which three teachers should \
                 receive extra professional development support this year.",
                Choice::Human,
                "Absolutely right! This requires human judgment about \
                 individual teachers, relationships, and professional growth \
                 needs.",
                "Yikes! AI doesn't know your teachers personally or understand \
                 the nuanced professional relationships involved.",
                "AI just recommended sending the three teachers with the most \
                 vowels in their names to training!",
            ),
            Scenario::new(
                4,
                "Student Assessment",
                "Determining which students in the class are struggling with \
                 reading comprehension and need additional support.",
                Choice::Human,
                "Exactly! This requires teacher observation, understanding of \
                 individual students, and professional assessment skills.",
                "This needs human expertise! Teachers observe student \
                 behavior, engagement, and individual needs that AI can't \
                 assess.",
                "AI analyzed typing speed and concluded that slow typers need \
                 reading help. Plot twist: some are just careful!",
            ),
            Scenario::new(
                5,
                "Content Creation",
                "Creating a template email to send to parents about the \
                 upcoming science fair.",
                Choice::Delegate,
                "Perfect delegation! AI can draft professional communication \
                 templates that you can personalize and review.",
                "This is ideal for AI! It can create professional \
                 communication drafts, saving time for more important work.",
                "Three hours later, you're still trying to decide between \
                 'Dear Parents' and 'Greetings, Guardians'!",
            ),
            Scenario::new(
                6,
                "Curriculum Planning",
                "Deciding which novel to teach in 9th grade English based on \
                 your specific students' interests and maturity levels.",
                Choice::Human,
                "Spot on! This requires deep knowledge of your students, \
                 community context, and professional curriculum judgment.",
                "This needs your expertise! You know your students' \
                 backgrounds, interests, and what will engage them \
                 effectively.",
                "AI recommended 'War and Peace' because it has the most pages \
                 and therefore must be the most educational!",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
name = "Test Deck"
author = "tester"
description = "two scenarios"

[[scenario]]
category = "Alpha"
prompt = "First prompt."
correct = "delegate"
feedback_correct = "yes"
feedback_incorrect = "no"
flavor_wrong = "ha"

[[scenario]]
id = 9
category = "Beta"
prompt = "Second prompt."
correct = "human"
"#;

    #[test]
    fn parses_well_formed_deck() {
        let deck = parse_deck(SAMPLE).unwrap();
        assert_eq!(deck.name, "Test Deck");
        assert_eq!(deck.scenarios.len(), 2);
        assert_eq!(deck.scenarios[0].correct, Choice::Delegate);
        assert_eq!(deck.scenarios[1].correct, Choice::Human);
        // Omitted feedback fields default to empty.
        assert!(deck.scenarios[1].feedback_correct.is_empty());
    }

    #[test]
    fn ids_default_to_position() {
        let deck = parse_deck(SAMPLE).unwrap();
        assert_eq!(deck.scenarios[0].id, 1);
        assert_eq!(deck.scenarios[1].id, 9); // explicit id wins
    }

    #[test]
    fn rejects_broken_toml() {
        assert!(parse_deck("name = [unclosed").is_none());
    }

    #[test]
    fn drops_unknown_choice_values() {
        let deck = parse_deck(
            r#"
name = "Mixed"

[[scenario]]
category = "A"
prompt = "ok"
correct = "maybe"

[[scenario]]
category = "B"
prompt = "ok"
correct = "KEEP"
"#,
        )
        .unwrap();
        // The "maybe" scenario is dropped; case-insensitive "KEEP" survives.
        assert_eq!(deck.scenarios.len(), 1);
        assert_eq!(deck.scenarios[0].correct, Choice::Human);
    }

    #[test]
    fn deck_with_no_usable_scenarios_fails() {
        assert!(parse_deck("name = \"empty\"").is_none());
    }

    #[test]
    fn builtin_deck_is_playable() {
        let deck = builtin_deck();
        assert_eq!(deck.scenarios.len(), 6);
        // Balanced set: 3 delegate, 3 keep-human.
        let delegates = deck
            .scenarios
            .iter()
            .filter(|s| s.correct == Choice::Delegate)
            .count();
        assert_eq!(delegates, 3);
    }

    #[test]
    fn deck_info_name_falls_back_to_file_stem() {
        let info = parse_deck_info(
            "[[scenario]]\ncategory=\"A\"\nprompt=\"p\"\ncorrect=\"ai\"\n",
            Path::new("/tmp/my-deck.toml"),
        )
        .unwrap();
        assert_eq!(info.name, "my-deck");
        assert_eq!(info.scenario_count, 1);
    }
}
