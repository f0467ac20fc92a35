//! Mapping between layout grid cells and pixel space.

use glam::Vec2;
use loop_quest_core::GridCell;

/// Square grid anchored at a pixel origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    origin: Vec2,
    cell_size: f32,
}

impl Grid {
    /// Creates a grid whose cell (0, 0) starts at `origin`.
    #[must_use]
    pub const fn new(origin: Vec2, cell_size: f32) -> Self {
        Self { origin, cell_size }
    }

    /// Pixel position of cell (0, 0)'s top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Side length of one cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Pixel centre of the provided cell.
    #[must_use]
    pub fn center(&self, cell: GridCell) -> Vec2 {
        let half = self.cell_size / 2.0;
        self.origin
            + Vec2::new(
                cell.x() as f32 * self.cell_size + half,
                cell.y() as f32 * self.cell_size + half,
            )
    }

    /// Cell that contains the provided pixel position.
    #[must_use]
    pub fn cell_of(&self, position: Vec2) -> GridCell {
        let local = (position - self.origin) / self.cell_size;
        GridCell::new(local.x.floor() as i32, local.y.floor() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_sit_half_a_cell_inside() {
        let grid = Grid::new(Vec2::new(800.0, 450.0), 44.0);
        assert_eq!(grid.center(GridCell::new(0, 0)), Vec2::new(822.0, 472.0));
        assert_eq!(grid.center(GridCell::new(-1, 2)), Vec2::new(778.0, 560.0));
    }

    #[test]
    fn cell_of_inverts_center() {
        let grid = Grid::new(Vec2::new(800.0, 450.0), 44.0);
        for cell in [
            GridCell::new(0, 0),
            GridCell::new(-3, 7),
            GridCell::new(12, -5),
        ] {
            assert_eq!(grid.cell_of(grid.center(cell)), cell);
        }
    }
}
