/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::scenario::Choice;
use sim::deck;
use sim::event::GameEvent;
use sim::records::Records;
use sim::session::{Phase, SessionState};
use sim::step;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();

    let mut session = SessionState::new();
    session.timing = config.timing.clone();
    session.deck = deck::builtin_deck();
    step::reset_game(&mut session);

    // Pre-load deck list for the setup/deck-select screens
    session.deck_list = deck::scan_decks(&config);

    let mut records = Records::load();
    session.best_score = records.best_for(&session.active_deck_path);

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut session, &mut records, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Should I Delegate This?");
    if session.best_score > 0 {
        println!("Best Score: {}", session.best_score);
    }
}

fn game_loop(
    session: &mut SessionState,
    records: &mut Records,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.timing.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(session, records, sound, &kb, &gp, config) {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            let events = step::step(session);
            process_events(session, records, sound, &events);

            // Blink/animation clock runs in every phase
            session.anim_tick = session.anim_tick.wrapping_add(1);

            // Message decay outside Playing (step handles it there)
            if session.phase != Phase::Playing && session.message_timer > 0 {
                session.message_timer -= 1;
                if session.message_timer == 0 {
                    session.message.clear();
                }
            }

            last_tick = Instant::now();
        }

        renderer.render(session)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// React to simulation events: record keeping first, then sound.
fn process_events(
    session: &mut SessionState,
    records: &mut Records,
    sound: Option<&SoundEngine>,
    events: &[GameEvent],
) {
    for event in events {
        match event {
            GameEvent::GameFinished { score } => {
                session.new_best = records.record(&session.active_deck_path, *score);
                session.best_score = records.best_for(&session.active_deck_path);
            }
            GameEvent::RoundStarted { round } => {
                session.set_message(&format!("Round {} begins!", round), 25);
            }
            _ => {}
        }
    }

    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::GameStarted => sfx.play_start(),
            GameEvent::DecisionLocked { .. } => sfx.play_lock(),
            GameEvent::FeedbackRevealed => {
                // Timeout reveals are voiced by TimeExpired instead.
                if !session.timed_out {
                    if session.is_correct() {
                        sfx.play_correct();
                    } else {
                        sfx.play_wrong();
                    }
                }
            }
            GameEvent::TimeExpired => sfx.play_time_up(),
            GameEvent::CountdownLow { secs_left } => sfx.play_countdown_tick(*secs_left),
            GameEvent::ScenarioAdvanced { .. } => sfx.play_advance(),
            GameEvent::GameFinished { .. } => {
                if session.new_best {
                    sfx.play_best();
                } else {
                    sfx.play_fanfare();
                }
            }
            GameEvent::RoundStarted { .. } => {}
        }
    }
}

// ── Key Constants ──

const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_DELEGATE: &[KeyCode] = &[KeyCode::Char('d'), KeyCode::Char('D'), KeyCode::Char('1'), KeyCode::Left];
const KEYS_KEEP: &[KeyCode] = &[KeyCode::Char('h'), KeyCode::Char('H'), KeyCode::Char('2'), KeyCode::Right];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Deck entries shown at once in the selector (3 rows each).
const DECKS_VISIBLE: usize = 8;

/// Open the deck select screen (F3).
fn open_deck_select(session: &mut SessionState, config: &GameConfig) {
    session.deck_list = deck::scan_decks(config);
    // Position cursor on the currently active deck
    session.deck_cursor = session.deck_list.iter()
        .position(|d| d.path == session.active_deck_path)
        .unwrap_or(0);
    session.deck_scroll = 0;
    session.phase = Phase::DeckSelect;
    session.anim_tick = 0;
}

fn handle_meta(
    session: &mut SessionState,
    records: &mut Records,
    sound: Option<&SoundEngine>,
    kb: &InputState,
    gp: &GamepadState,
    config: &GameConfig,
) -> bool {
    let confirm = kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed();
    let esc = kb.any_pressed(&[KeyCode::Esc]) || gp.cancel_pressed();

    match session.phase {
        // ── Setup ──
        Phase::Setup => {
            if confirm {
                let events = step::start_game(session);
                process_events(session, records, sound, &events);
            } else if kb.any_pressed(&[KeyCode::F(3)]) {
                open_deck_select(session, config);
            } else if kb.any_pressed(KEYS_QUIT) || esc {
                return true;
            }
        }

        // ── Deck Select (F3 filer) ──
        Phase::DeckSelect => {
            let total = session.deck_list.len();
            if total == 0 {
                session.phase = Phase::Setup;
                return false;
            }

            if kb.any_pressed(&[KeyCode::Up]) || gp.up_pressed() {
                if session.deck_cursor > 0 {
                    session.deck_cursor -= 1;
                    if session.deck_cursor < session.deck_scroll {
                        session.deck_scroll = session.deck_cursor;
                    }
                }
            } else if kb.any_pressed(&[KeyCode::Down]) || gp.down_pressed() {
                if session.deck_cursor + 1 < total {
                    session.deck_cursor += 1;
                    if session.deck_cursor >= session.deck_scroll + DECKS_VISIBLE {
                        session.deck_scroll = session.deck_cursor - DECKS_VISIBLE + 1;
                    }
                }
            } else if kb.any_pressed(&[KeyCode::PageUp]) {
                session.deck_cursor = session.deck_cursor.saturating_sub(DECKS_VISIBLE);
                if session.deck_cursor < session.deck_scroll {
                    session.deck_scroll = session.deck_cursor;
                }
            } else if kb.any_pressed(&[KeyCode::PageDown]) {
                session.deck_cursor = (session.deck_cursor + DECKS_VISIBLE).min(total.saturating_sub(1));
                if session.deck_cursor >= session.deck_scroll + DECKS_VISIBLE {
                    session.deck_scroll = session.deck_cursor - DECKS_VISIBLE + 1;
                }
            } else if confirm {
                // Switch to selected deck
                let info = session.deck_list[session.deck_cursor].clone();
                deck::switch_deck(session, &info);
                session.best_score = records.best_for(&session.active_deck_path);
                session.phase = Phase::Setup;
                session.set_message(&format!("Deck: {}", info.name), 60);
            } else if esc {
                session.phase = Phase::Setup;
            }
        }

        // ── Playing ──
        Phase::Playing => {
            if kb.any_pressed(KEYS_DELEGATE) || gp.delegate_pressed() || gp.left_pressed() {
                let events = step::decide(session, Choice::Delegate);
                process_events(session, records, sound, &events);
            } else if kb.any_pressed(KEYS_KEEP) || gp.keep_pressed() || gp.right_pressed() {
                let events = step::decide(session, Choice::Human);
                process_events(session, records, sound, &events);
            } else if esc {
                step::reset_game(session);
            }
        }

        // ── Feedback ──
        Phase::Feedback => {
            if confirm {
                let events = step::advance(session);
                process_events(session, records, sound, &events);
            } else if esc {
                step::reset_game(session);
            }
        }

        // ── Finished ──
        Phase::Finished => {
            if confirm {
                let events = step::start_game(session);
                process_events(session, records, sound, &events);
            } else if esc {
                step::reset_game(session);
            } else if kb.any_pressed(KEYS_QUIT) {
                return true;
            }
        }
    }

    false
}
