/// Best-score records, one entry per deck.
///
/// Stored as `scores.toml` in the first writable data dir (exe dir for
/// portable installs, XDG data home otherwise). Records are a convenience
/// only: every I/O failure here is silently tolerated and the game plays
/// on without them.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const RECORDS_FILE: &str = "scores.toml";

#[derive(Default, Serialize, Deserialize)]
pub struct Records {
    /// Deck path (or the built-in sentinel) → best final score.
    #[serde(default)]
    best: BTreeMap<String, u32>,
}

impl Records {
    /// Load records, or empty ones when the file is missing or broken.
    pub fn load() -> Self {
        let path = data_dir().join(RECORDS_FILE);
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Records::default(),
        }
    }

    /// Best recorded score for a deck; 0 when none exists.
    pub fn best_for(&self, deck_path: &str) -> u32 {
        self.best.get(deck_path).copied().unwrap_or(0)
    }

    /// Note a finished score. Persists and returns true on a new best.
    pub fn record(&mut self, deck_path: &str, score: u32) -> bool {
        if score == 0 || score <= self.best_for(deck_path) {
            return false;
        }
        self.best.insert(deck_path.to_string(), score);
        self.save();
        true
    }

    fn save(&self) {
        if let Ok(content) = toml::to_string(self) {
            let _ = std::fs::write(data_dir().join(RECORDS_FILE), content);
        }
    }
}

fn data_dir() -> PathBuf {
    // 1. Try exe directory (works for local/portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // Check if writable (system installs like /usr/games/ won't be)
            let test_path = parent.join(".write_test_delegate_this");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home (~/.local/share/delegate-this) for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/delegate-this");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. Fallback to CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
