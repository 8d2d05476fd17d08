//! Renderer — the deterministic rasterizer.
//!
//! Takes `FrameDescription`s (from the controller) and produces cell
//! `Frame`s for the player: a full grid first, cell-level diffs after that.
//!
//! Rasterization is pure. The only state kept is the previous grid, used
//! for diffing. The renderer knows nothing about time or motion.

pub mod font;
pub mod measure;

use crate::types::{
    Cell, CellChange, Color, DrawOp, Frame, FrameDescription, ResolvedScene, Style,
};
use measure::{BitmapMeasure, CellMetrics};

/// Fill characters for the glow layers, back-to-front.
const LAYER_CHARS: [char; 3] = ['░', '▒', '█'];

pub struct Renderer {
    metrics: CellMetrics,
    prev_grid: Option<Vec<Vec<Cell>>>,
}

impl Renderer {
    pub fn new(metrics: CellMetrics) -> Self {
        Self {
            metrics,
            prev_grid: None,
        }
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// Forget the previous grid so the next frame is emitted in full.
    pub fn invalidate(&mut self) {
        self.prev_grid = None;
    }

    /// Render a frame description onto a `cols × rows` canvas.
    ///
    /// The first frame (and the first after `invalidate`) is a full frame.
    /// Subsequent frames are diffs against the previous one.
    pub fn render(&mut self, frame: &FrameDescription, cols: u16, rows: u16) -> Frame {
        let scene = self.resolve(frame, cols, rows);
        let grid = Self::rasterize(&scene, &frame.background);
        let out = match &self.prev_grid {
            Some(prev) if same_shape(prev, &grid) => Frame::Diff {
                changes: Self::diff(prev, &grid),
            },
            _ => Frame::Full {
                cells: grid.clone(),
            },
        };
        self.prev_grid = Some(grid);
        out
    }

    /// Turn a frame description into draw operations, one z-level per layer.
    ///
    /// Glyph dots are sampled at cell centres to find the core cells. A layer
    /// with a blur radius spreads those cells by an ellipse of that radius;
    /// a zero radius paints the core cells alone.
    pub fn resolve(&self, frame: &FrameDescription, cols: u16, rows: u16) -> ResolvedScene {
        let core = self.core_cells(frame);
        let (w, h) = (cols as usize, rows as usize);
        let mut ops = Vec::new();

        for (z, (layer, &ch)) in frame.layers.iter().zip(LAYER_CHARS.iter()).enumerate() {
            let rx = (layer.blur_radius / self.metrics.width_px).round().max(0.0) as i64;
            let ry = (layer.blur_radius / self.metrics.height_px).round().max(0.0) as i64;
            let mut mask = vec![false; w * h];

            for &(cx, cy) in &core {
                for dy in -ry..=ry {
                    for dx in -rx..=rx {
                        if !inside_ellipse(dx, dy, rx, ry) {
                            continue;
                        }
                        let (x, y) = (cx + dx, cy + dy);
                        if x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h {
                            mask[y as usize * w + x as usize] = true;
                        }
                    }
                }
            }

            let style = Style {
                fg: Some(layer.color.clone()),
                bg: Some(frame.background.clone()),
                bold: false,
                dim: z == 0,
            };
            for (i, _) in mask.iter().enumerate().filter(|(_, on)| **on) {
                ops.push(DrawOp {
                    x: (i % w) as u16,
                    y: (i / w) as u16,
                    ch,
                    style: style.clone(),
                    z_order: z as i32,
                });
            }
        }

        ResolvedScene {
            width: cols,
            height: rows,
            ops,
        }
    }

    /// Cells (possibly off-canvas) whose centre falls on a filled glyph dot.
    fn core_cells(&self, frame: &FrameDescription) -> Vec<(i64, i64)> {
        let bitmap = font::bitmap(&frame.text);
        let dot = BitmapMeasure::dot_size(frame.font_size);
        let (cw, ch) = (self.metrics.width_px, self.metrics.height_px);
        if dot <= 0.0 || cw <= 0.0 || ch <= 0.0 {
            return Vec::new();
        }

        let origin = frame.position;
        let x0 = (origin.x / cw).floor() as i64;
        let x1 = ((origin.x + frame.extent.width) / cw).ceil() as i64;
        let y0 = (origin.y / ch).floor() as i64;
        let y1 = ((origin.y + frame.extent.height) / ch).ceil() as i64;

        let mut cells = Vec::new();
        for cy in y0..y1 {
            let py = ((cy as f64 + 0.5) * ch - origin.y) / dot;
            if py < 0.0 {
                continue;
            }
            let Some(row) = bitmap.get(py as usize) else {
                continue;
            };
            for cx in x0..x1 {
                let px = ((cx as f64 + 0.5) * cw - origin.x) / dot;
                if px >= 0.0 && row.get(px as usize).copied().unwrap_or(false) {
                    cells.push((cx, cy));
                }
            }
        }
        cells
    }

    /// Rasterize a resolved scene onto a fixed-size cell grid painted with
    /// `background`.
    ///
    /// Draw operations are sorted by z-order so that higher z values
    /// paint over lower ones.
    fn rasterize(scene: &ResolvedScene, background: &Color) -> Vec<Vec<Cell>> {
        let w = scene.width as usize;
        let h = scene.height as usize;
        let blank = Cell {
            ch: ' ',
            style: Style {
                bg: Some(background.clone()),
                ..Style::default()
            },
        };
        let mut grid = vec![vec![blank; w]; h];

        let mut ops: Vec<_> = scene.ops.iter().collect();
        ops.sort_by_key(|op| op.z_order);

        for op in ops {
            let x = op.x as usize;
            let y = op.y as usize;
            if x < w && y < h {
                grid[y][x] = Cell {
                    ch: op.ch,
                    style: op.style.clone(),
                };
            }
        }

        grid
    }

    /// Compute a cell-level diff between two grids.
    fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: next_cell.clone(),
                    });
                }
            }
        }
        changes
    }
}

fn same_shape(a: &[Vec<Cell>], b: &[Vec<Cell>]) -> bool {
    a.len() == b.len() && a.first().map(Vec::len) == b.first().map(Vec::len)
}

fn inside_ellipse(dx: i64, dy: i64, rx: i64, ry: i64) -> bool {
    let term = |d: i64, r: i64| {
        if r == 0 {
            if d == 0 { 0.0 } else { f64::INFINITY }
        } else {
            (d as f64 / r as f64).powi(2)
        }
    };
    term(dx, rx) + term(dy, ry) <= 1.0
}
