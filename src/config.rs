/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub gamepad: GamepadConfig,
    pub decks_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Milliseconds per simulation tick.
    pub tick_rate_ms: u64,
    /// Countdown duration per scenario, in ticks (450 = 45 s at 100 ms).
    pub round_ticks: u32,
    /// Ticks between locking a decision and showing feedback.
    pub reveal_ticks: u32,
}

impl TimingConfig {
    /// Ticks per display second; at least 1 for very slow tick rates.
    pub fn ticks_per_sec(&self) -> u32 {
        ((1000 / self.tick_rate_ms.max(1)) as u32).max(1)
    }

    /// Countdown duration in whole display seconds.
    pub fn round_secs(&self) -> u32 {
        self.round_ticks / self.ticks_per_sec()
    }
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub delegate: Vec<String>,
    pub keep: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_round_ticks")]
    round_ticks: u32,
    #[serde(default = "default_reveal_ticks")]
    reveal_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_delegate")]
    delegate: Vec<String>,
    #[serde(default = "default_keep")]
    keep: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_decks_dir")]
    decks_dir: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 100 }
fn default_round_ticks() -> u32 { 450 }  // 45 s per scenario
fn default_reveal_ticks() -> u32 { 5 }   // 500 ms reveal pause

fn default_delegate() -> Vec<String> { vec!["A".into(), "R1".into()] }
fn default_keep() -> Vec<String> { vec!["B".into(), "L1".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_decks_dir() -> String { "decks".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            round_ticks: default_round_ticks(),
            reveal_ticks: default_reveal_ticks(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            delegate: default_delegate(),
            keep: default_keep(),
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            decks_dir: default_decks_dir(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        GameConfig::from_toml(toml_cfg)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        GameConfig {
            timing: TimingConfig {
                tick_rate_ms: toml_cfg.timing.tick_rate_ms,
                round_ticks: toml_cfg.timing.round_ticks,
                reveal_ticks: toml_cfg.timing.reveal_ticks,
            },
            gamepad: GamepadConfig {
                delegate: toml_cfg.gamepad.delegate,
                keep: toml_cfg.gamepad.keep,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
            },
            decks_dir: PathBuf::from(toml_cfg.general.decks_dir),
        }
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so /usr/bin/delegate-this → /usr/games/delegate-this
        // still finds data relative to the real binary.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
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

    // 4. System data directory (/usr/share/delegate-this)
    let sys = PathBuf::from("/usr/share/delegate-this");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    // 5. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_give_45_second_rounds() {
        let cfg = GameConfig::from_toml(TomlConfig::default());
        assert_eq!(cfg.timing.tick_rate_ms, 100);
        assert_eq!(cfg.timing.round_ticks, 450);
        assert_eq!(cfg.timing.reveal_ticks, 5);
        assert_eq!(cfg.timing.ticks_per_sec(), 10);
        assert_eq!(cfg.timing.round_secs(), 45);
        assert_eq!(cfg.decks_dir, PathBuf::from("decks"));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let toml_cfg: TomlConfig =
            toml::from_str("[timing]\nround_ticks = 300\n").unwrap();
        let cfg = GameConfig::from_toml(toml_cfg);
        assert_eq!(cfg.timing.round_ticks, 300);
        assert_eq!(cfg.timing.tick_rate_ms, 100);
        assert_eq!(cfg.gamepad.confirm, vec!["Start".to_string()]);
    }

    #[test]
    fn ticks_per_sec_never_zero() {
        let slow = TimingConfig { tick_rate_ms: 2000, round_ticks: 10, reveal_ticks: 1 };
        assert_eq!(slow.ticks_per_sec(), 1);
    }
}
