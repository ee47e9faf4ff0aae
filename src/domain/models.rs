use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};

/// Number of rows and columns in the table. The table never resizes.
pub const GRID_SIZE: usize = 16;

/// Fixed-size numeric table, row-major, zero-initialized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    cells: [[f64; GRID_SIZE]; GRID_SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            cells: [[0.0; GRID_SIZE]; GRID_SIZE],
        }
    }
}

impl Grid {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.cells[row][col] = value;
    }

    pub fn rows(&self) -> &[[f64; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Replaces every value at once.
    pub fn replace(&mut self, cells: [[f64; GRID_SIZE]; GRID_SIZE]) {
        self.cells = cells;
    }

    pub fn sum(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }
}

/// An inclusive, axis-aligned rectangle of cells.
///
/// # Examples
///
/// ```
/// use tmap::domain::Selection;
///
/// let sel = Selection::spanning((4, 1), (2, 3));
/// assert_eq!((sel.top, sel.bottom, sel.left, sel.right), (2, 4, 1, 3));
/// assert_eq!(sel.rows(), 3);
/// assert!(sel.contains(3, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl Selection {
    /// Builds a selection, rejecting inverted or out-of-range bounds.
    pub fn new(top: usize, bottom: usize, left: usize, right: usize) -> DomainResult<Self> {
        if top > bottom || left > right || bottom >= GRID_SIZE || right >= GRID_SIZE {
            return Err(DomainError::InvalidSelection { top, bottom, left, right });
        }
        Ok(Self { top, bottom, left, right })
    }

    /// Builds the rectangle spanned by two corners given in any order.
    /// Coordinates past the table edge are clamped onto it.
    pub fn spanning(a: (usize, usize), b: (usize, usize)) -> Self {
        let last = GRID_SIZE - 1;
        Self {
            top: a.0.min(b.0).min(last),
            bottom: a.0.max(b.0).min(last),
            left: a.1.min(b.1).min(last),
            right: a.1.max(b.1).min(last),
        }
    }

    pub fn cell(row: usize, col: usize) -> Self {
        Self::spanning((row, col), (row, col))
    }

    pub fn rows(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn cols(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.rows() == 1 && self.cols() == 1
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.top..=self.bottom).contains(&row) && (self.left..=self.right).contains(&col)
    }

    /// All (row, col) pairs, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let (left, right) = (self.left, self.right);
        (self.top..=self.bottom).flat_map(move |row| (left..=right).map(move |col| (row, col)))
    }
}

/// Text and background color shown for one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayValue {
    pub text: String,
    pub color: (u8, u8, u8),
}

impl DisplayValue {
    /// Projects a numeric value. Green falls linearly with the value and
    /// saturates at both ends; red and blue are fixed.
    pub fn project(value: f64, color_scale: f64) -> Self {
        let green = (255.0 - value * color_scale).trunc().clamp(0.0, 255.0);
        // NaN survives clamp; `as` maps it to 0.
        Self {
            text: format!("{:.2}", value),
            color: (255, green as u8, 128),
        }
    }
}

/// Largest filter sigma accepted from a settings file.
pub const MAX_SIGMA: f64 = 64.0;

/// Most decimals the value prompt can round to.
pub const MAX_PROMPT_DECIMALS: u32 = 15;

/// User-adjustable editor settings, stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub step: f64,
    pub sigma: f64,
    pub color_scale: f64,
    pub prompt_min: f64,
    pub prompt_max: f64,
    pub prompt_decimals: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            step: 0.01,
            sigma: 0.5,
            color_scale: 96.0,
            prompt_min: -65535.0,
            prompt_max: 65535.0,
            prompt_decimals: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_starts_zeroed() {
        let grid = Grid::default();
        assert!(grid.rows().iter().flatten().all(|v| *v == 0.0));
        assert_eq!(grid.rows().len(), GRID_SIZE);
    }

    #[test]
    fn test_selection_new_rejects_bad_bounds() {
        assert!(Selection::new(0, 15, 0, 15).is_ok());
        assert_eq!(
            Selection::new(3, 2, 0, 0),
            Err(DomainError::InvalidSelection { top: 3, bottom: 2, left: 0, right: 0 })
        );
        assert!(Selection::new(0, 0, 5, 4).is_err());
        assert!(Selection::new(0, 16, 0, 0).is_err());
    }

    #[test]
    fn test_selection_cells_order() {
        let sel = Selection::new(1, 2, 3, 4).unwrap();
        let cells: Vec<_> = sel.cells().collect();
        assert_eq!(cells, vec![(1, 3), (1, 4), (2, 3), (2, 4)]);
        assert!(Selection::cell(7, 7).is_single_cell());
    }

    #[test]
    fn test_selection_spanning_clamps() {
        let sel = Selection::spanning((20, 0), (3, 99));
        assert_eq!(sel, Selection { top: 3, bottom: 15, left: 0, right: 15 });
    }

    #[test]
    fn test_display_text() {
        assert_eq!(DisplayValue::project(0.0, 96.0).text, "0.00");
        assert_eq!(DisplayValue::project(3.14159, 96.0).text, "3.14");
        assert_eq!(DisplayValue::project(-1.005, 96.0).text, "-1.00");
    }

    #[test]
    fn test_display_color_ramp() {
        assert_eq!(DisplayValue::project(0.0, 96.0).color, (255, 255, 128));
        assert_eq!(DisplayValue::project(1.0, 96.0).color, (255, 159, 128));
        assert_eq!(DisplayValue::project(-5.0, 96.0).color, (255, 255, 128));
        assert_eq!(DisplayValue::project(255.0 / 96.0, 96.0).color.1, 0);
        assert_eq!(DisplayValue::project(100.0, 96.0).color.1, 0);
        assert_eq!(DisplayValue::project(f64::NAN, 96.0).color.1, 0);

        let mut last = 255u8;
        for step in 0..30 {
            let green = DisplayValue::project(step as f64 * 0.1, 96.0).color.1;
            assert!(green <= last);
            last = green;
        }
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.step, 0.01);
        assert_eq!(settings.sigma, 0.5);
        assert_eq!(settings.color_scale, 96.0);
    }
}
