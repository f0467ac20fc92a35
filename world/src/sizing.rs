//! Converts a requested perimeter length into rectangle dimensions.

use crate::GenerationError;

/// Width and height of a rectangle measured in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RectDims {
    cols: i32,
    rows: i32,
}

impl RectDims {
    /// Creates dimensions from a column and row count.
    #[must_use]
    pub const fn new(cols: i32, rows: i32) -> Self {
        Self { cols, rows }
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> i32 {
        self.cols
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of tiles on the perimeter.
    #[must_use]
    pub const fn perimeter(&self) -> usize {
        (2 * self.cols + 2 * self.rows - 4) as usize
    }

    const fn skew(&self) -> i32 {
        (self.cols - self.rows).abs()
    }
}

/// Rounds an odd tile count up to the next even number.
#[must_use]
pub const fn even_tile_count(tiles: usize) -> usize {
    tiles + tiles % 2
}

/// Finds the most square rectangle whose perimeter holds exactly `tiles` tiles.
///
/// Rows are scanned upward from 2 and the first strict improvement in
/// `|cols - rows|` wins, so 8 maps to 3x3 and 10 to 4 columns by 3 rows.
pub fn rect_dims_for_perimeter(tiles: usize) -> Result<RectDims, GenerationError> {
    let unsizeable = GenerationError::UnsizeableLoop { tiles };
    let n = i32::try_from(tiles).map_err(|_| unsizeable.clone())?;

    let mut best: Option<RectDims> = None;
    for rows in 2..=n {
        let twice_cols = n - 2 * rows + 4;
        if twice_cols < 4 {
            break;
        }
        if twice_cols % 2 != 0 {
            continue;
        }
        let candidate = RectDims::new(twice_cols / 2, rows);
        let better = match best {
            Some(current) => candidate.skew() < current.skew(),
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }
    best.ok_or(unsizeable)
}
