//! Per-room wall tile layer
//!
//! Each placed room owns a mutable grid over its bounds holding the wall
//! ring. Carving erases cells under a paired door's footprint; erasing an
//! already-absent cell is a no-op, so carving is idempotent.

use serde::{Deserialize, Serialize};

use crate::geometry::{GridPos, Rect};

/// Mutable wall-tile grid covering one room's bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallLayer {
    origin: GridPos,
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl WallLayer {
    /// A solid one-cell ring around the interior of `bounds`
    pub fn ring(bounds: Rect) -> Self {
        let width = bounds.width();
        let height = bounds.height();
        let mut cells = vec![false; (width * height) as usize];

        for y in 0..height {
            for x in 0..width {
                let edge = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                if edge {
                    cells[(y * width + x) as usize] = true;
                }
            }
        }

        Self {
            origin: bounds.origin(),
            width,
            height,
            cells,
        }
    }

    fn index(&self, world: GridPos) -> Option<usize> {
        let local = world - self.origin;
        if local.x < 0 || local.y < 0 || local.x >= self.width || local.y >= self.height {
            return None;
        }
        Some((local.y * self.width + local.x) as usize)
    }

    /// Is there a wall cell at this world position?
    pub fn is_wall(&self, world: GridPos) -> bool {
        self.index(world).is_some_and(|i| self.cells[i])
    }

    /// Erase the wall cell at `world`. Returns whether a cell was present.
    /// Positions outside the layer or already empty are a no-op.
    pub fn erase_cell(&mut self, world: GridPos) -> bool {
        match self.index(world) {
            Some(i) if self.cells[i] => {
                self.cells[i] = false;
                true
            }
            _ => false,
        }
    }

    /// Erase every wall cell under `area`, returning how many were present
    pub fn erase_rect(&mut self, area: &Rect) -> usize {
        area.cells().filter(|&pos| self.erase_cell(pos)).count()
    }

    /// Number of wall cells still standing
    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
