//! Text renderer for terminals and logs
//!
//! Scales the canvas down to a character grid and stamps each entity's box
//! into it. Later layers overwrite earlier ones: enemies, missiles, ship.

use super::{RenderSink, Snapshot};
use crate::sim::{Rect, format_time};

const ENEMY_GLYPHS: [char; 4] = ['W', 'M', 'V', 'v'];
const SHIP_GLYPH: char = 'A';
const PLAYER_MISSILE_GLYPH: char = '|';
const ENEMY_MISSILE_GLYPH: char = '!';
const EMPTY: char = ' ';

/// Rasterizes snapshots into lines of text
#[derive(Debug, Clone)]
pub struct AsciiRenderer {
    columns: usize,
    rows: usize,
    canvas_width: f32,
    canvas_height: f32,
    /// Last rendered frame, HUD line first
    frame: Vec<String>,
}

impl AsciiRenderer {
    pub fn new(columns: usize, rows: usize, canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            canvas_width,
            canvas_height,
            frame: Vec::new(),
        }
    }

    /// Last rendered frame
    pub fn frame(&self) -> &[String] {
        &self.frame
    }

    /// Render a snapshot to text lines (HUD line, then the playfield)
    pub fn render(&self, snapshot: &Snapshot) -> Vec<String> {
        let mut grid = vec![vec![EMPTY; self.columns]; self.rows];

        for enemy in &snapshot.enemies {
            let glyph = ENEMY_GLYPHS[(enemy.row as usize).min(ENEMY_GLYPHS.len() - 1)];
            self.stamp(&mut grid, &enemy.rect(), glyph);
        }
        for missile in &snapshot.player_missiles {
            self.stamp(&mut grid, &missile.rect(), PLAYER_MISSILE_GLYPH);
        }
        for missile in &snapshot.enemy_missiles {
            self.stamp(&mut grid, &missile.rect(), ENEMY_MISSILE_GLYPH);
        }
        self.stamp(&mut grid, &snapshot.ship.rect(), SHIP_GLYPH);

        let hud = format!(
            "score {:>4}  lives {}  time {}",
            snapshot.score,
            snapshot.lives,
            format_time(snapshot.time_left)
        );

        std::iter::once(hud)
            .chain(grid.into_iter().map(|row| row.into_iter().collect()))
            .collect()
    }

    /// Fill the cells a rect covers. Every visible rect marks at least one cell.
    fn stamp(&self, grid: &mut [Vec<char>], rect: &Rect, glyph: char) {
        let sx = self.columns as f32 / self.canvas_width;
        let sy = self.rows as f32 / self.canvas_height;

        if rect.right() <= 0.0
            || rect.bottom() <= 0.0
            || rect.left() >= self.canvas_width
            || rect.top() >= self.canvas_height
        {
            return;
        }

        let cell = |v: f32, scale: f32, max: usize| ((v * scale).floor().max(0.0) as usize).min(max - 1);
        let x0 = cell(rect.left(), sx, self.columns);
        let x1 = cell(rect.right(), sx, self.columns).max(x0);
        let y0 = cell(rect.top(), sy, self.rows);
        let y1 = cell(rect.bottom(), sy, self.rows).max(y0);

        for row in &mut grid[y0..=y1] {
            for c in &mut row[x0..=x1] {
                *c = glyph;
            }
        }
    }
}

impl RenderSink for AsciiRenderer {
    fn draw(&mut self, snapshot: &Snapshot) {
        self.frame = self.render(snapshot);
    }
}
