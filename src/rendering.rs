use std::io::{self, Write};
use log::info;
use crossterm::{
    cursor::MoveTo,
    execute,
};

use crate::constants::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::entities::{AvatarPose, Facing};
use crate::types::Rect;

/// What an entity looks like this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Visual {
    Avatar { facing: Facing, pose: AvatarPose, inverted: bool },
    Beam,
    Hostile { look: u8, disabled: bool },
    Projectile { color: u8, inactive: bool },
    Explosion { flipped: bool },
    Shield,
    EmpBurst,
    GravityField,
}

/// Drawable target the simulation paints onto once per tick.
pub trait Canvas {
    fn blit(&mut self, visual: Visual, rect: &Rect);
    fn draw_score(&mut self, score: u32);
}

const HOSTILE_GLYPHS: [char; 3] = ['W', 'M', 'H'];
const PROJECTILE_GLYPHS: [char; 6] = ['o', 'O', '0', '@', '*', '+'];

fn avatar_glyph(facing: Facing, pose: AvatarPose) -> char {
    match pose {
        AvatarPose::Victory => '!',
        AvatarPose::Defeat => 'X',
        AvatarPose::Facing => match (facing.dx, facing.dy) {
            (1, 0) => '>',
            (-1, 0) => '<',
            (0, -1) => '^',
            (0, 1) => 'v',
            (1, -1) | (-1, 1) => '/',
            _ => '\u{005C}',
        },
    }
}

// --- GameGrid: the play field scaled down to terminal cells ---
pub struct GameGrid {
    pub grid: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn set_char(&mut self, x: u16, y: u16, c: char) {
        if y < self.height && x < self.width {
            self.grid[y as usize][x as usize] = c;
        }
    }

    pub fn write_str(&mut self, x: u16, y: u16, s: &str) {
        for (i, c) in s.chars().enumerate() {
            self.set_char(x.saturating_add(i as u16), y, c);
        }
    }

    pub fn clear(&mut self) {
        self.grid = vec![vec![' '; self.width as usize]; self.height as usize];
    }

    pub fn row(&self, y: u16) -> String {
        self.grid[y as usize].iter().collect()
    }

    /// Inclusive cell span covered by a field-space rectangle. Always at least one cell.
    fn cell_span(&self, rect: &Rect) -> (u16, u16, u16, u16) {
        let sx = self.width as f64 / FIELD_WIDTH;
        let sy = self.height as f64 / FIELD_HEIGHT;
        let to_cell = |v: f64, max: u16| -> u16 { v.max(0.0).min(max.saturating_sub(1) as f64) as u16 };
        let x0 = to_cell((rect.left() * sx).floor(), self.width);
        let y0 = to_cell((rect.top() * sy).floor(), self.height);
        let x1 = to_cell((rect.right() * sx).ceil() - 1.0, self.width).max(x0);
        let y1 = to_cell((rect.bottom() * sy).ceil() - 1.0, self.height).max(y0);
        (x0, y0, x1, y1)
    }

    pub fn fill_rect(&mut self, rect: &Rect, c: char) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (x0, y0, x1, y1) = self.cell_span(rect);
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set_char(x, y, c);
            }
        }
    }

    /// Outline only, so overlays covering the whole field leave the action visible.
    pub fn frame_rect(&mut self, rect: &Rect, c: char) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (x0, y0, x1, y1) = self.cell_span(rect);
        for x in x0..=x1 {
            self.set_char(x, y0, c);
            self.set_char(x, y1, c);
        }
        for y in y0..=y1 {
            self.set_char(x0, y, c);
            self.set_char(x1, y, c);
        }
    }

    /// Writes every field row to `target`, top to bottom.
    pub fn render(&self, target: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            target.execute_move_to(MoveTo(0, y))?;
            write!(target, "{}", self.row(y))?;
        }
        Ok(())
    }
}

impl Canvas for GameGrid {
    fn blit(&mut self, visual: Visual, rect: &Rect) {
        match visual {
            Visual::Avatar { facing, pose, inverted } => {
                self.fill_rect(rect, avatar_glyph(facing, pose));
                if inverted {
                    self.frame_rect(rect, '@');
                }
            }
            Visual::Beam => self.fill_rect(rect, '='),
            Visual::Hostile { disabled: true, .. } => self.fill_rect(rect, 'x'),
            Visual::Hostile { look, .. } => {
                self.fill_rect(rect, HOSTILE_GLYPHS[look as usize % HOSTILE_GLYPHS.len()])
            }
            Visual::Projectile { inactive: true, .. } => self.fill_rect(rect, '.'),
            Visual::Projectile { color, .. } => {
                self.fill_rect(rect, PROJECTILE_GLYPHS[color as usize % PROJECTILE_GLYPHS.len()])
            }
            Visual::Explosion { flipped } => self.fill_rect(rect, if flipped { '#' } else { '%' }),
            Visual::Shield => self.fill_rect(rect, '|'),
            Visual::EmpBurst => self.frame_rect(rect, '~'),
            Visual::GravityField => self.frame_rect(rect, ':'),
        }
    }

    fn draw_score(&mut self, score: u32) {
        let y = self.height.saturating_sub(2);
        self.write_str(1, y, &format!("Score: {}", score));
    }
}

// --- Output targets a finished grid is presented to ---

/// In-memory terminal for headless rounds. Each presented frame is dumped to the log.
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    pub cursor_x: u16,
    pub cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn write_char(&mut self, c: char) {
        if self.cursor_y < self.height && self.cursor_x < self.width {
            self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
        }
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            self.write_char(c);
            self.cursor_x = self.cursor_x.saturating_add(1);
        }
    }

    pub fn row(&self, y: u16) -> String {
        self.buffer[y as usize].iter().collect()
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for y in 0..self.height {
            info!("{}", self.row(y));
        }
        info!("---------------------");
    }
}

impl Write for ScreenBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        self.write_str(&s);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The real terminal or the headless screen. Terminal-only commands are dropped when headless.
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn execute_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(command.0, command.1);
                Ok(())
            },
        }
    }

    pub fn execute_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()),
        }
    }

    pub fn is_headless(&self) -> bool {
        matches!(self, OutputTarget::ScreenBuffer(_))
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => sb.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(sb) => sb.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vector2D;

    #[test]
    fn test_full_field_fills_every_cell() {
        let mut grid = GameGrid::new(11, 6);
        grid.fill_rect(&Rect::field(), '#');
        assert!(grid.grid.iter().all(|row| row.iter().all(|&c| c == '#')));
    }

    #[test]
    fn test_tiny_rect_still_visible() {
        let mut grid = GameGrid::new(11, 6);
        grid.fill_rect(&Rect::new(Vector2D::new(555.0, 300.0), 1.0, 1.0), '*');
        let stars: usize = grid.grid.iter().map(|row| row.iter().filter(|&&c| c == '*').count()).sum();
        assert_eq!(stars, 1);
    }

    #[test]
    fn test_offscreen_rect_is_clamped() {
        let mut grid = GameGrid::new(11, 6);
        grid.fill_rect(&Rect::new(Vector2D::new(-500.0, -500.0), 10.0, 10.0), 'o');
        assert_eq!(grid.grid[0][0], 'o');
    }

    #[test]
    fn test_overlay_is_outline_only() {
        let mut grid = GameGrid::new(11, 6);
        grid.blit(Visual::GravityField, &Rect::field());
        assert_eq!(grid.grid[0][0], ':');
        assert_eq!(grid.grid[3][5], ' ');
    }

    #[test]
    fn test_score_readout() {
        let mut grid = GameGrid::new(20, 6);
        grid.draw_score(42);
        assert!(grid.row(4).starts_with(" Score: 42"));
    }

    #[test]
    fn test_screen_buffer_write() {
        let mut target = OutputTarget::ScreenBuffer(ScreenBuffer::new(10, 2));
        target.execute_move_to(MoveTo(2, 1)).unwrap();
        write!(target, "hi").unwrap();
        if let OutputTarget::ScreenBuffer(sb) = &target {
            assert_eq!(sb.row(1), "  hi      ");
        } else {
            unreachable!();
        }
    }
}
