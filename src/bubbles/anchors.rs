use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::util::{reseed, stable_pair};

pub const GRID_MARGIN: f32 = 24.0;
const JITTER_CELL_FRACTION: f32 = 0.15;
const ANCHOR_JITTER_SALT: u64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridShape {
    pub cols: usize,
    pub rows: usize,
}

pub fn grid_shape(count: usize) -> GridShape {
    if count == 0 {
        return GridShape { cols: 0, rows: 0 };
    }

    let cols = ((count as f64).sqrt().ceil() as usize).max(1);
    GridShape {
        cols,
        rows: count.div_ceil(cols),
    }
}

#[derive(Clone, Debug)]
pub struct AnchorGrid {
    count: usize,
    viewport: Rect,
    shape: GridShape,
    inner: Rect,
    cell: Vec2,
    ranked_cells: Vec<usize>,
}

impl AnchorGrid {
    pub fn layout(count: usize, viewport: Rect) -> Self {
        let shape = grid_shape(count);

        let inset = viewport.shrink(GRID_MARGIN);
        let inner = if inset.width() > 0.0 && inset.height() > 0.0 {
            inset
        } else {
            viewport
        };

        let cols = shape.cols.max(1);
        let rows = shape.rows.max(1);
        let cell = vec2(inner.width() / cols as f32, inner.height() / rows as f32);

        let center = inner.center();
        let mut ranked_cells = (0..shape.cols * shape.rows).collect::<Vec<_>>();
        ranked_cells.sort_by(|a, b| {
            let distance_a = cell_center(inner, cell, cols, *a).distance_sq(center);
            let distance_b = cell_center(inner, cell, cols, *b).distance_sq(center);
            distance_a.total_cmp(&distance_b).then_with(|| a.cmp(b))
        });

        Self {
            count,
            viewport,
            shape,
            inner,
            cell,
            ranked_cells,
        }
    }

    pub fn matches(&self, count: usize, viewport: Rect) -> bool {
        self.count == count && self.viewport == viewport
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn cell_size(&self) -> Vec2 {
        self.cell
    }

    pub fn anchor_for(&self, rank: usize, seed: u64) -> Pos2 {
        let cell_index = self.ranked_cells.get(rank).copied().unwrap_or(0);
        let center = cell_center(self.inner, self.cell, self.shape.cols.max(1), cell_index);

        let (jitter_x, jitter_y) = stable_pair(reseed(seed, ANCHOR_JITTER_SALT));
        center + vec2(jitter_x * self.cell.x, jitter_y * self.cell.y) * JITTER_CELL_FRACTION
    }
}

fn cell_center(inner: Rect, cell: Vec2, cols: usize, cell_index: usize) -> Pos2 {
    let row = cell_index / cols;
    let col = cell_index % cols;
    pos2(
        inner.left() + ((col as f32) + 0.5) * cell.x,
        inner.top() + ((row as f32) + 0.5) * cell.y,
    )
}
