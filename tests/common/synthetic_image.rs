//! Synthetic photographs of printed crosswords.
#![allow(dead_code)]

use crossword_grid::GrayscaleImage;

pub const PAPER: u8 = 225;
pub const CELL_WHITE: u8 = 245;
pub const INK: u8 = 30;

/// Layout of a printed grid and how it sits in the photograph.
#[derive(Clone, Debug)]
pub struct GridPhoto {
    pub width: usize,
    pub height: usize,
    pub rows: usize,
    pub cols: usize,
    /// Cell pitch in pixels.
    pub cell: f32,
    /// Thickness of the inner grid lines.
    pub line: f32,
    /// Thickness of the outer border, drawn outside the cell area.
    pub border: f32,
    /// Rotation of the printed grid in degrees (positive turns clockwise on
    /// screen, matching `crossword_grid::warp`).
    pub rotation_deg: f32,
    /// Column index whose top border gets a 1 px paper gap.
    pub border_gap_col: Option<usize>,
}

impl GridPhoto {
    pub fn crossword(rows: usize, cols: usize) -> Self {
        Self {
            width: 360,
            height: 360,
            rows,
            cols,
            cell: 40.0,
            line: 4.0,
            border: 6.0,
            rotation_deg: 0.0,
            border_gap_col: None,
        }
    }

    pub fn rotated(mut self, deg: f32) -> Self {
        self.rotation_deg = deg;
        self
    }

    pub fn with_border_gap(mut self, col: usize) -> Self {
        self.border_gap_col = Some(col);
        self
    }

    fn center(&self) -> (f32, f32) {
        (
            (self.width as f32 - 1.0) * 0.5,
            (self.height as f32 - 1.0) * 0.5,
        )
    }

    /// Photo coordinates of grid point `(u, v)` (origin at the top-left cell
    /// corner, before rotation).
    pub fn to_photo(&self, u: f32, v: f32) -> (f32, f32) {
        let (cx, cy) = self.center();
        let dx = u - self.cols as f32 * self.cell * 0.5;
        let dy = v - self.rows as f32 * self.cell * 0.5;
        let (s, c) = self.rotation_deg.to_radians().sin_cos();
        (cx + c * dx - s * dy, cy + s * dx + c * dy)
    }

    fn to_grid(&self, x: f32, y: f32) -> (f32, f32) {
        let (cx, cy) = self.center();
        let (dx, dy) = (x - cx, y - cy);
        let (s, c) = self.rotation_deg.to_radians().sin_cos();
        (
            c * dx + s * dy + self.cols as f32 * self.cell * 0.5,
            -s * dx + c * dy + self.rows as f32 * self.cell * 0.5,
        )
    }

    fn on_inner_line(&self, t: f32, n: usize) -> bool {
        let half = self.line * 0.5;
        (1..n).any(|k| (t - k as f32 * self.cell).abs() < half)
    }

    fn value_at(&self, u: f32, v: f32, black: &dyn Fn(usize, usize) -> bool) -> f32 {
        let (gw, gh) = (self.cols as f32 * self.cell, self.rows as f32 * self.cell);
        let b = self.border;
        if u < -b || v < -b || u >= gw + b || v >= gh + b {
            return PAPER as f32;
        }
        if u < 0.0 || v < 0.0 || u >= gw || v >= gh {
            return INK as f32;
        }
        let r = ((v / self.cell) as usize).min(self.rows - 1);
        let c = ((u / self.cell) as usize).min(self.cols - 1);
        if black(r, c) || self.on_inner_line(u, self.cols) || self.on_inner_line(v, self.rows) {
            INK as f32
        } else {
            CELL_WHITE as f32
        }
    }

    /// Render with 2×2 supersampling.
    pub fn render(&self, black: impl Fn(usize, usize) -> bool) -> GrayscaleImage {
        const OFFSETS: [f32; 2] = [-0.25, 0.25];
        let mut img = GrayscaleImage::filled(self.width, self.height, PAPER);
        for y in 0..self.height {
            for x in 0..self.width {
                let mut acc = 0.0;
                for oy in OFFSETS {
                    for ox in OFFSETS {
                        let (u, v) = self.to_grid(x as f32 + ox, y as f32 + oy);
                        acc += self.value_at(u, v, &black);
                    }
                }
                img.set(x, y, (acc / 4.0).round() as u8);
            }
        }
        if let Some(col) = self.border_gap_col {
            // One photo column of paper straight through the top border.
            let (gx, gy) = self.to_photo((col as f32 + 0.5) * self.cell, -self.border * 0.5);
            let x = gx.round() as usize;
            let reach = self.border as isize;
            for dy in -reach..=reach {
                let y = (gy.round() as isize + dy) as usize;
                img.set(x, y, PAPER);
            }
        }
        img
    }
}

pub fn checkerboard(r: usize, c: usize) -> bool {
    (r + c) % 2 == 0
}
