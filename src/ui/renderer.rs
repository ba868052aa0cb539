/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::rules::{self, TimerZone};
use crate::domain::scenario::Choice;
use crate::sim::deck::BUILTIN_PATH;
use crate::sim::session::{Phase, SessionState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells.
    ///
    /// On VTE-based Linux terminals the inter-row gap pixels take the
    /// background color of the last Clear rather than the cell color.
    /// Using the SAME explicit RGB for `Clear(ClearType::All)` and for
    /// every cell background keeps the gaps invisible.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    /// Normalize bg: Color::Reset becomes BASE_BG so that every cell gets
    /// an explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg: Self::norm_bg(bg) }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width { break; }
            self.set(cx, y, Cell::new(ch, fg, bg));
            cx += 1;
        }
    }

    /// Fill a full row with a background color.
    fn fill_row(&mut self, y: usize, fg: Color, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', fg, bg));
        }
    }
}

// ── Word wrap ──

/// Greedy word wrap. Words longer than `width` are hard-split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let wlen = word.chars().count();
        if wlen > width {
            // Flush the current line, then chop the oversized word.
            if !cur.is_empty() {
                lines.push(std::mem::take(&mut cur));
            }
            let mut chunk = String::new();
            for ch in word.chars() {
                if chunk.chars().count() == width {
                    lines.push(std::mem::take(&mut chunk));
                }
                chunk.push(ch);
            }
            cur = chunk;
            continue;
        }
        let cur_len = cur.chars().count();
        if cur.is_empty() {
            cur.push_str(word);
        } else if cur_len + 1 + wlen <= width {
            cur.push(' ');
            cur.push_str(word);
        } else {
            lines.push(std::mem::take(&mut cur));
            cur.push_str(word);
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

fn zone_color(zone: TimerZone) -> Color {
    match zone {
        TimerZone::Calm => Color::Rgb { r: 80, g: 255, b: 80 },
        TimerZone::Wary => Color::Rgb { r: 255, g: 220, b: 50 },
        TimerZone::Critical => Color::Rgb { r: 255, g: 60, b: 60 },
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back differs from front everywhere.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, s: &SessionState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Detect phase change: clear for a clean transition
        let phase_changed = self.last_phase != Some(s.phase);
        if phase_changed {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(s.phase);
        }

        // Build front buffer
        self.front.clear();

        match s.phase {
            Phase::Setup => self.compose_setup(s),
            Phase::DeckSelect => self.compose_deck_select(s),
            Phase::Playing => self.compose_playing(s),
            Phase::Feedback => self.compose_feedback(s),
            Phase::Finished => self.compose_finished(s),
        }

        self.compose_message_bar(s);

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame.
        // IMPORTANT: no ResetColor here. It resets to the terminal's native
        // default, which may differ from BASE_BG and cause line artifacts.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell == prev {
                    need_move = true;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;

                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Shared layout helpers ──

    /// Centered content column: (left edge, width).
    fn column(&self) -> (usize, usize) {
        let w = self.front.width.saturating_sub(4).min(66).max(20);
        let x0 = self.front.width.saturating_sub(w) / 2;
        (x0, w)
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let x = self.front.width.saturating_sub(s.chars().count()) / 2;
        self.front.put_str(x, y, s, fg, bg);
    }

    /// Bottom message bar, shared by all screens.
    fn compose_message_bar(&mut self, s: &SessionState) {
        if s.message.is_empty() {
            return;
        }
        let row = self.front.height.saturating_sub(1);
        let bg = Color::Rgb { r: 200, g: 180, b: 50 };
        self.front.fill_row(row, Color::Black, bg);
        let msg = format!(" ◈ {} ", s.message);
        self.front.put_str(0, row, &msg, Color::Black, bg);
    }

    // ── Setup screen ──

    fn compose_setup(&mut self, s: &SessionState) {
        let gold = Color::Rgb { r: 255, g: 200, b: 50 };
        let hi = Color::Rgb { r: 80, g: 255, b: 80 };
        let cyan = Color::Rgb { r: 100, g: 200, b: 255 };
        let dim = Color::DarkGrey;

        let title = [
            r" ___          _                       _           ___ ",
            r"|   \   ___  | |  ___   __ _   __ _  | |_   ___  |__ \",
            r"| |) | / -_) | | / -_) / _` | / _` | |  _| / -_)   /_/",
            r"|___/  \___| |_| \___| \__, | \__,_|  \__| \___|  (_) ",
            r"                       |___/                           ",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_str(2, 1 + i, line, gold, Color::Reset);
        }

        self.put_centered(7, "S H O U L D   I   D E L E G A T E   T H I S ?", gold, Color::Reset);

        let subtitle = if s.deck.description.is_empty() {
            s.deck.name.clone()
        } else {
            s.deck.description.clone()
        };
        self.put_centered(9, &subtitle, cyan, Color::Reset);

        // How-to-play box
        let (x0, _) = self.column();
        let how_base = 12;
        let secs = s.timing.round_secs();
        let how = [
            format!("Each scenario has {} seconds to decide", secs),
            "Discuss as a group and make your choice".to_string(),
            "Earn points for good delegation decisions".to_string(),
            "Learn from immediate feedback and fun examples".to_string(),
        ];
        self.front.put_str(x0, how_base, "How to Play:", gold, Color::Reset);
        for (i, line) in how.iter().enumerate() {
            let bullet = format!("  · {}", line);
            self.front.put_str(x0, how_base + 1 + i, &bullet, Color::White, Color::Reset);
        }

        // Menu
        let menu_base = how_base + how.len() + 2;
        self.front.put_str(x0, menu_base, "ENTER   Start Game", hi, Color::Reset);
        self.front.put_str(x0, menu_base + 1, "  F3    Choose Deck", cyan, Color::Reset);
        self.front.put_str(x0, menu_base + 2, "  Q     Quit", Color::White, Color::Reset);

        // Active deck and best score
        let deck_info = format!("◈ {}  ({} scenarios)", s.deck.name, s.scenario_count());
        self.front.put_str(x0, menu_base + 4, &deck_info, dim, Color::Reset);
        if s.best_score > 0 {
            let best = format!("◈ Best score: {} / {}", s.best_score, s.max_score());
            self.front.put_str(x0, menu_base + 5, &best, gold, Color::Reset);
        }
    }

    // ── Deck select screen ──

    fn compose_deck_select(&mut self, s: &SessionState) {
        let gold = Color::Rgb { r: 255, g: 200, b: 50 };
        let hi = Color::Rgb { r: 80, g: 255, b: 80 };
        let cyan = Color::Rgb { r: 100, g: 200, b: 255 };
        let normal = Color::White;
        let dim = Color::DarkGrey;
        let cursor_bg = Color::Rgb { r: 20, g: 50, b: 60 };
        let active_fg = Color::Rgb { r: 255, g: 180, b: 80 };

        // Header
        self.front.put_str(2, 1, "╔══════════════════════════════════════════╗", gold, Color::Reset);
        self.front.put_str(2, 2, "║             DECK  SELECT                 ║", gold, Color::Reset);
        self.front.put_str(2, 3, "╚══════════════════════════════════════════╝", gold, Color::Reset);

        // Active deck indicator
        let active_str = format!("  Active: {}", s.deck.name);
        self.front.put_str(2, 5, &active_str, active_fg, Color::Reset);

        // Deck list, 3 rows per entry
        let list_top = 7;
        let visible = 8_usize.min(self.front.height.saturating_sub(list_top + 8) / 3);
        let total = s.deck_list.len();
        let scroll = s.deck_scroll;

        if scroll > 0 {
            self.front.put_str(2, list_top - 1, "    ▲ ▲ ▲", dim, Color::Reset);
        }

        for i in 0..visible {
            let idx = scroll + i;
            if idx >= total { break; }
            let row = list_top + i * 3;
            if row + 2 >= self.front.height { break; }

            let deck = &s.deck_list[idx];
            let is_selected = idx == s.deck_cursor;
            let is_active = deck.path == s.active_deck_path;

            let marker = if is_active { "★" } else { " " };
            let name_line = format!("{}  {}", marker, deck.name);
            let count_str = format!("{} scenarios", deck.scenario_count);

            if is_selected {
                let blink = (s.anim_tick / 5) % 2 == 0;
                let arrow = if blink { "▸" } else { " " };

                for r in row..=(row + 2).min(self.front.height - 1) {
                    for x in 0..56.min(self.front.width) {
                        self.front.set(x, r, Cell::new(' ', normal, cursor_bg));
                    }
                }

                self.front.put_str(1, row, arrow, hi, cursor_bg);
                let name_fg = if is_active { active_fg } else { hi };
                self.front.put_str(2, row, &name_line, name_fg, cursor_bg);
                self.front.put_str(44, row, &count_str, cyan, cursor_bg);

                if !deck.author.is_empty() {
                    let author_str = format!("     by {}", deck.author);
                    self.front.put_str(2, row + 1, &author_str, normal, cursor_bg);
                }
                if !deck.description.is_empty() {
                    let desc: String = if deck.description.chars().count() > 50 {
                        let head: String = deck.description.chars().take(47).collect();
                        format!("     {}...", head)
                    } else {
                        format!("     {}", deck.description)
                    };
                    self.front.put_str(2, row + 2, &desc, dim, cursor_bg);
                }
            } else {
                let name_fg = if is_active { active_fg } else { normal };
                self.front.put_str(3, row, &name_line, name_fg, Color::Reset);
                self.front.put_str(44, row, &count_str, dim, Color::Reset);
                if !deck.author.is_empty() {
                    let author_str = format!("     by {}", deck.author);
                    self.front.put_str(3, row + 1, &author_str, dim, Color::Reset);
                }
            }
        }

        if scroll + visible < total {
            let ind_row = list_top + visible * 3;
            if ind_row < self.front.height {
                self.front.put_str(2, ind_row, "    ▼ ▼ ▼", dim, Color::Reset);
            }
        }

        // Detail line for the selected deck
        let detail_row = list_top + visible * 3 + 2;
        if detail_row < self.front.height && s.deck_cursor < total {
            let deck = &s.deck_list[s.deck_cursor];
            let path_display = if deck.path == BUILTIN_PATH {
                "(built-in)".to_string()
            } else {
                std::path::Path::new(&deck.path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string()
            };
            let detail = format!("  Source: {}", path_display);
            self.front.put_str(2, detail_row, &detail, dim, Color::Reset);
        }

        // Footer
        let footer_row = self.front.height.saturating_sub(2);
        if footer_row > list_top {
            self.front.put_str(2, footer_row, "  ENTER: Select Deck   ↑↓: Browse   ESC: Back", dim, Color::Reset);
            let hint = "  Place .toml files in decks/ to add scenario decks";
            if footer_row + 1 < self.front.height {
                self.front.put_str(2, footer_row + 1, hint, Color::Rgb { r: 80, g: 80, b: 100 }, Color::Reset);
            }
        }
    }

    // ── Playing / feedback frame (header + timer + scenario card) ──

    /// Compose the parts shared by Playing and Feedback. Returns the first
    /// free row below the scenario card.
    fn compose_scenario_frame(&mut self, s: &SessionState) -> usize {
        let hud_bg = Color::Rgb { r: 20, g: 20, b: 60 };
        let card_bg = Color::Rgb { r: 32, g: 32, b: 50 };
        let cyan = Color::Rgb { r: 100, g: 200, b: 255 };

        // ── HUD row ──
        self.front.fill_row(0, Color::White, hud_bg);
        let hud = format!(
            " Should I Delegate This?  │  Round {} · Scenario {} of {}",
            s.round, s.current + 1, s.scenario_count(),
        );
        self.front.put_str(0, 0, &hud, Color::White, hud_bg);
        let score_str = format!("{} points ", s.score);
        let sx = self.front.width.saturating_sub(score_str.chars().count());
        self.front.put_str(sx, 0, &score_str, Color::Rgb { r: 255, g: 220, b: 50 }, hud_bg);

        // ── Timer ──
        let (x0, col_w) = self.column();
        let zone = zone_color(s.timer_zone());
        let secs_str = format!("{}s", s.secs_remaining());
        self.put_centered(2, &secs_str, zone, Color::Reset);

        let filled = (s.timer_fraction() * col_w as f32).round() as usize;
        let filled = filled.min(col_w);
        for i in 0..col_w {
            let (ch, fg) = if i < filled {
                ('█', zone)
            } else {
                ('░', Color::Rgb { r: 60, g: 60, b: 75 })
            };
            self.front.set(x0 + i, 3, Cell::new(ch, fg, Color::Reset));
        }

        // ── Scenario card ──
        let mut y = 5;
        if let Some(sc) = s.scenario() {
            let tag = format!(" {} ", sc.category);
            self.front.put_str(x0, y, &tag, Color::Black, cyan);
            y += 2;

            let lines = wrap_text(&sc.prompt, col_w.saturating_sub(4));
            for _ in 0..lines.len() + 2 {
                if y >= self.front.height { break; }
                for x in x0..x0 + col_w {
                    self.front.set(x, y, Cell::new(' ', Color::White, card_bg));
                }
                y += 1;
            }
            let text_top = y.saturating_sub(lines.len() + 1);
            for (i, line) in lines.iter().enumerate() {
                self.front.put_str(x0 + 2, text_top + i, line, Color::White, card_bg);
            }
        }

        y + 1
    }

    fn compose_playing(&mut self, s: &SessionState) {
        let y = self.compose_scenario_frame(s);
        let (x0, col_w) = self.column();
        let dim = Color::DarkGrey;

        match s.decision {
            None => {
                // ── Decision buttons ──
                let half = col_w.saturating_sub(2) / 2;
                let delegate_bg = Color::Rgb { r: 30, g: 120, b: 50 };
                let human_bg = Color::Rgb { r: 150, g: 45, b: 45 };

                for r in y..(y + 3).min(self.front.height) {
                    for x in x0..x0 + half {
                        self.front.set(x, r, Cell::new(' ', Color::White, delegate_bg));
                    }
                    for x in x0 + half + 2..x0 + col_w {
                        self.front.set(x, r, Cell::new(' ', Color::White, human_bg));
                    }
                }
                let d_label = format!("[D]  {}", Choice::Delegate.label());
                let h_label = format!("[H]  {}", Choice::Human.label());
                let dx = x0 + half.saturating_sub(d_label.chars().count()) / 2;
                let hx = x0 + half + 2 + half.saturating_sub(h_label.chars().count()) / 2;
                self.front.put_str(dx, y + 1, &d_label, Color::White, delegate_bg);
                self.front.put_str(hx, y + 1, &h_label, Color::White, human_bg);

                let help_row = self.front.height.saturating_sub(2);
                let help = " D/←: Delegate   H/→: Keep human   ESC: Restart  │  Pad: A/R1: Delegate  B/L1: Keep";
                self.front.put_str(0, help_row, help, dim, Color::Reset);
            }
            Some(choice) => {
                // ── Decision locked, reveal pending ──
                let fg = if s.is_correct() {
                    Color::Rgb { r: 80, g: 255, b: 80 }
                } else {
                    Color::Rgb { r: 255, g: 60, b: 60 }
                };
                let chosen = format!("You chose: {}", choice.label());
                self.put_centered(y + 1, &chosen, fg, Color::Reset);
                self.put_centered(y + 3, "Revealing results...", dim, Color::Reset);
            }
        }
    }

    fn compose_feedback(&mut self, s: &SessionState) {
        let mut y = self.compose_scenario_frame(s);
        let (x0, col_w) = self.column();
        let green = Color::Rgb { r: 80, g: 255, b: 80 };
        let red = Color::Rgb { r: 255, g: 60, b: 60 };
        let dim = Color::DarkGrey;

        let correct = s.is_correct();
        let (bar_fg, panel_bg) = if correct {
            (green, Color::Rgb { r: 20, g: 45, b: 25 })
        } else {
            (red, Color::Rgb { r: 50, g: 22, b: 22 })
        };

        let header = if s.timed_out {
            "Time's up!".to_string()
        } else if correct {
            format!("Correct! +{} points", rules::DECISION_REWARD)
        } else {
            "Not quite right".to_string()
        };

        let scenario = match s.scenario() {
            Some(sc) => sc,
            None => return,
        };
        let body = wrap_text(scenario.feedback(correct), col_w.saturating_sub(5));
        let flavor = if !correct && !scenario.flavor_wrong.is_empty() {
            wrap_text(&scenario.flavor_wrong, col_w.saturating_sub(8))
        } else {
            Vec::new()
        };

        // ── Feedback panel with a left accent bar ──
        let flavor_rows = if flavor.is_empty() { 0 } else { flavor.len() + 1 };
        let panel_h = 2 + body.len() + flavor_rows + 1;
        for r in y..(y + panel_h).min(self.front.height) {
            self.front.set(x0, r, Cell::new('▌', bar_fg, panel_bg));
            for x in x0 + 1..x0 + col_w {
                self.front.set(x, r, Cell::new(' ', Color::White, panel_bg));
            }
        }
        self.front.put_str(x0 + 3, y, &header, bar_fg, panel_bg);
        for (i, line) in body.iter().enumerate() {
            self.front.put_str(x0 + 3, y + 2 + i, line, Color::White, panel_bg);
        }
        if !flavor.is_empty() {
            let fy = y + 2 + body.len() + 1;
            let flavor_fg = Color::Rgb { r: 255, g: 220, b: 50 };
            for (i, line) in flavor.iter().enumerate() {
                self.front.set(x0 + 3, fy + i, Cell::new('▌', flavor_fg, panel_bg));
                self.front.put_str(x0 + 5, fy + i, line, Color::Rgb { r: 220, g: 220, b: 200 }, panel_bg);
            }
        }
        y += panel_h + 1;

        // ── Continue prompt ──
        let blink = (s.anim_tick / 5) % 2 == 0;
        if blink {
            let prompt = if s.is_last_scenario() {
                "▸▸▸ ENTER: See Final Results ◂◂◂"
            } else {
                "▸▸▸ ENTER: Next Scenario ◂◂◂"
            };
            self.put_centered(y + 1, prompt, green, Color::Reset);
        }

        let help_row = self.front.height.saturating_sub(2);
        self.front.put_str(0, help_row, " ENTER/SPACE: Continue   ESC: Restart", dim, Color::Reset);
    }

    // ── Finished screen ──

    fn compose_finished(&mut self, s: &SessionState) {
        let gold = Color::Rgb { r: 255, g: 220, b: 50 };
        let green = Color::Rgb { r: 80, g: 255, b: 80 };
        let dim = Color::DarkGrey;

        let box_art = [
            "╔══════════════════════════════════╗",
            "║       ★  GAME  COMPLETE  ★       ║",
            "╚══════════════════════════════════╝",
        ];
        for (i, l) in box_art.iter().enumerate() {
            self.put_centered(2 + i, l, gold, Color::Reset);
        }

        let score = format!("{} / {} points", s.score, s.max_score());
        self.put_centered(6, &score, Color::Rgb { r: 100, g: 200, b: 255 }, Color::Reset);
        let accuracy = format!("{}% Delegation Accuracy", s.accuracy_percent());
        self.put_centered(7, &accuracy, Color::White, Color::Reset);

        if s.new_best {
            let blink = (s.anim_tick / 4) % 2 == 0;
            if blink {
                self.put_centered(9, "★ NEW BEST SCORE! ★", gold, Color::Reset);
            }
        } else if s.best_score > 0 {
            let best = format!("Best: {}", s.best_score);
            self.put_centered(9, &best, dim, Color::Reset);
        }

        // Key principles recap
        let (x0, _) = self.column();
        let base = 11;
        self.front.put_str(x0, base, "Key Delegation Principles:", green, Color::Reset);
        let principles = [
            "· Good for AI:  content generation, variations, drafts,",
            "                formatting, research",
            "· Keep human:   student assessment, personal decisions,",
            "                curriculum choices based on your context",
            "· Remember:     AI is a powerful tool, but professional",
            "                judgment is irreplaceable",
        ];
        for (i, line) in principles.iter().enumerate() {
            self.front.put_str(x0 + 2, base + 1 + i, line, Color::White, Color::Reset);
        }

        let menu_row = base + principles.len() + 2;
        self.put_centered(menu_row, "▸ ENTER: Play Again    ESC: Back to Setup", green, Color::Reset);
        self.put_centered(menu_row + 2, "Ready for the next workshop activity?", dim, Color::Reset);
    }
}

// ══════════════════════════════════════════════════════════════
//  Tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::wrap_text;

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 15);
        assert!(lines.iter().all(|l| l.chars().count() <= 15));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn splits_oversized_words() {
        let lines = wrap_text("a Donaudampfschifffahrt b", 8);
        assert!(lines.iter().all(|l| l.chars().count() <= 8));
        assert_eq!(lines.concat().replace(' ', ""), "aDonaudampfschifffahrtb");
    }

    #[test]
    fn empty_text_yields_no_lines() {
        assert!(wrap_text("", 20).is_empty());
        assert!(wrap_text("   ", 20).is_empty());
    }

    #[test]
    fn exact_fit_stays_on_one_line() {
        let lines = wrap_text("twelve chars", 12);
        assert_eq!(lines, vec!["twelve chars"]);
    }
}
