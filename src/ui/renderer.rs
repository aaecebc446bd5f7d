/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Glyph)
///   2. Compare each glyph with `back` buffer (previous frame)
///   3. Only emit terminal commands for glyphs that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Read-only with respect to the world: nothing here mutates game state.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Cell, Occupant, PickupKind, Role};
use crate::sim::world::{Phase, WorldState};

// ── Glyph: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    /// Explicit dark background for every terminal cell, so the gaps between
    /// rows match the cell color on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Glyph = Glyph { ch: ' ', fg: Color::White, bg: Glyph::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Glyph = Glyph { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Glyph::BASE_BG,
            other => other,
        };
        Glyph { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Glyphs ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Glyph::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Glyph::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Glyph::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, g: Glyph) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = g;
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Glyph::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Glyph::new(' ', Color::White, bg));
        }
    }
}

// ── Renderer ──

/// Each maze cell is two terminal columns wide so the board looks square.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const WALL_FG: Color = Color::Rgb { r: 40, g: 60, b: 200 };
const VULNERABLE_FG: Color = Color::Rgb { r: 60, g: 90, b: 255 };

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
            SetBackgroundColor(Glyph::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Glyph::INVALID);

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

    /// Draw one frame. `message` is the status line shown under the maze.
    pub fn render(&mut self, world: &WorldState, message: &str) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Glyph::INVALID);
            queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))?;
        }

        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Glyph::INVALID);
            queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.front.clear();
        self.compose_hud(world);
        self.compose_maze(world);
        self.compose_footer(world, message);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed glyphs ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Glyph::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal's own.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Glyph::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let g = self.front.get(x, y);
                if g == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if g.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(g.fg))?;
                    last_fg = g.fg;
                }
                if g.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(g.bg))?;
                    last_bg = g.bg;
                }
                queue!(self.writer, Print(g.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, w: &WorldState) {
        let hud = format!(
            " Score:{:<7}  Lives:{}  Mode:{:<10}  Left:{:<4}",
            w.score,
            w.lives,
            w.mode.mode().label(),
            w.pickups_remaining,
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    fn compose_maze(&mut self, w: &WorldState) {
        for row in 0..w.grid.height() {
            let y = MAP_ROW + row;
            if y >= self.front.height { break; }
            for col in 0..w.grid.width() {
                let x = col * CELL_W;
                if x + 1 >= self.front.width { break; }
                let (left, right) = cell_glyphs(w, Cell::new(row, col));
                self.front.set(x, y, left);
                self.front.set(x + 1, y, right);
            }
        }
    }

    fn compose_footer(&mut self, w: &WorldState, message: &str) {
        let msg_row = MAP_ROW + w.grid.height() + 1;
        let help_row = msg_row + 2;

        let banner = match w.phase {
            Phase::Playing => None,
            Phase::GameOver => Some((" GAME OVER   r: restart   q: quit ", Color::Rgb { r: 255, g: 60, b: 60 })),
            Phase::GameWon => Some((" MAZE CLEARED   r: restart   q: quit ", Color::Rgb { r: 80, g: 255, b: 80 })),
        };
        match banner {
            Some((text, fg)) => self.front.put_str(0, msg_row, text, fg, Color::Reset),
            None if !message.is_empty() => {
                let msg = format!(" {} ", message);
                self.front.put_str(0, msg_row, &msg, Color::Black, Color::Rgb { r: 200, g: 180, b: 50 });
            }
            None => {}
        }

        let help = " Arrows/WASD/HJKL: move   q/Esc: quit";
        self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
    }
}

/// The two terminal columns for one maze cell. Player over agent over
/// pickup over floor.
fn cell_glyphs(w: &WorldState, cell: Cell) -> (Glyph, Glyph) {
    let blank = Glyph::BLANK;

    if w.grid.is_wall(cell) {
        let g = Glyph::new('█', WALL_FG, Color::Reset);
        return (g, g);
    }
    if w.player.cell == cell {
        return (Glyph::new('@', Color::Yellow, Color::Reset), blank);
    }

    let occupants = w.grid.occupants_at(cell);
    let agent = occupants.iter().find_map(|o| match o {
        Occupant::Agent(role) => Some(*role),
        Occupant::Pickup(_) => None,
    });
    if let Some(role) = agent {
        let fg = if w.mode.is_vulnerable() && w.agent(role).is_roaming() {
            VULNERABLE_FG
        } else {
            role_color(role)
        };
        return (Glyph::new('M', fg, Color::Reset), blank);
    }

    let pickup = occupants.iter().find_map(|o| match o {
        Occupant::Pickup(kind) => Some(*kind),
        Occupant::Agent(_) => None,
    });
    match pickup {
        Some(PickupKind::Dot) => (Glyph::new('·', Color::White, Color::Reset), blank),
        Some(PickupKind::Energizer) => (Glyph::new('●', Color::White, Color::Reset), blank),
        None => (blank, blank),
    }
}

fn role_color(role: Role) -> Color {
    match role {
        Role::A => Color::Red,
        Role::B => Color::Magenta,
        Role::C => Color::Cyan,
        Role::D => Color::Rgb { r: 255, g: 160, b: 40 },
    }
}
