//! Editing operations on the table.
//!
//! The [`Editor`] owns the grid and is the only way to change it. Every
//! operation runs to completion and leaves the grid in a consistent state;
//! the display is recomputed from the grid afterwards and never written back.

use super::errors::{DomainError, DomainResult};
use super::models::{DisplayValue, GRID_SIZE, Grid, MAX_SIGMA, Selection};
use tracing::debug;

/// Kernel radius is `truncate * sigma` rounded, as in common n-d image filters.
const GAUSSIAN_TRUNCATE: f64 = 4.0;

/// Parses text typed into a cell.
///
/// Anything that is not a number becomes 0.0. This is the editing policy,
/// not an error.
///
/// # Examples
///
/// ```
/// use tmap::domain::parse_edit;
///
/// assert_eq!(parse_edit("3.14"), 3.14);
/// assert_eq!(parse_edit(" 2 "), 2.0);
/// assert_eq!(parse_edit("abc"), 0.0);
/// ```
pub fn parse_edit(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(0.0)
}

/// Grid plus the operations allowed on it.
///
/// # Examples
///
/// ```
/// use tmap::domain::{Editor, Selection};
///
/// let mut editor = Editor::default();
/// let row = Selection::new(0, 0, 0, 4).unwrap();
/// editor.set(Selection::cell(0, 4), 4.0);
/// editor.interpolate(row).unwrap();
/// assert_eq!(editor.grid().get(0, 2), 2.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Editor {
    grid: Grid,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Puts back a grid captured earlier, used by undo/redo.
    pub fn restore(&mut self, grid: Grid) {
        self.grid = grid;
    }

    pub fn set(&mut self, selection: Selection, value: f64) {
        debug!(?selection, value, "set");
        for (row, col) in selection.cells() {
            self.grid.set(row, col, value);
        }
    }

    pub fn increment(&mut self, selection: Selection, delta: f64) {
        debug!(?selection, delta, "increment");
        for (row, col) in selection.cells() {
            self.grid.set(row, col, self.grid.get(row, col) + delta);
        }
    }

    pub fn decrement(&mut self, selection: Selection, delta: f64) {
        debug!(?selection, delta, "decrement");
        for (row, col) in selection.cells() {
            self.grid.set(row, col, self.grid.get(row, col) - delta);
        }
    }

    pub fn clear(&mut self, selection: Selection) {
        self.set(selection, 0.0);
    }

    /// Copies `values` into the selection element-wise.
    ///
    /// `values` must have exactly `selection.rows()` rows of
    /// `selection.cols()` values each; otherwise nothing is written.
    pub fn assign_block(&mut self, selection: Selection, values: &[Vec<f64>]) -> DomainResult<()> {
        let expected = (selection.rows(), selection.cols());
        let actual = (values.len(), values.first().map_or(0, Vec::len));
        if actual != expected || values.iter().any(|row| row.len() != expected.1) {
            return Err(DomainError::BlockShapeMismatch { expected, actual });
        }

        for (row, col) in selection.cells() {
            self.grid
                .set(row, col, values[row - selection.top][col - selection.left]);
        }
        Ok(())
    }

    /// Fills the selection by linear interpolation between its corner values.
    ///
    /// A single cell is left alone. A single row or column interpolates
    /// between its two ends; anything larger is bilinear over the four corners.
    pub fn interpolate(&mut self, selection: Selection) -> DomainResult<()> {
        if selection.is_single_cell() {
            return Ok(());
        }
        debug!(?selection, "interpolate");

        let Selection { top, bottom, left, right } = selection;
        let top_left = self.grid.get(top, left);
        let top_right = self.grid.get(top, right);
        let bottom_left = self.grid.get(bottom, left);
        let bottom_right = self.grid.get(bottom, right);

        let block: Vec<Vec<f64>> = if selection.rows() == 1 {
            vec![linear_span(top_left, top_right, left, right)]
        } else if selection.cols() == 1 {
            linear_span(top_left, bottom_left, top, bottom)
                .into_iter()
                .map(|value| vec![value])
                .collect()
        } else {
            (top..=bottom)
                .map(|row| {
                    let ty = fraction(row, top, bottom);
                    (left..=right)
                        .map(|col| {
                            let tx = fraction(col, left, right);
                            let upper = lerp(top_left, top_right, tx);
                            let lower = lerp(bottom_left, bottom_right, tx);
                            lerp(upper, lower, ty)
                        })
                        .collect()
                })
                .collect()
        };

        self.assign_block(selection, &block)
    }

    /// Smooths the whole grid with a Gaussian kernel of the given sigma.
    ///
    /// Rows are filtered first, then columns, with half-sample symmetric
    /// reflection at the edges. The grid is replaced in one step.
    /// Sigma above [`MAX_SIGMA`] is treated as [`MAX_SIGMA`].
    pub fn filter(&mut self, sigma: f64) {
        if !(sigma > 0.0) {
            return;
        }
        let sigma = sigma.min(MAX_SIGMA);
        debug!(sigma, "filter");

        let kernel = gaussian_kernel(sigma);
        let source = *self.grid.rows();

        let mut pass = [[0.0; GRID_SIZE]; GRID_SIZE];
        for (row, out) in pass.iter_mut().enumerate() {
            for (col, value) in out.iter_mut().enumerate() {
                *value = convolve_at(&kernel, row, |r| source[r][col]);
            }
        }

        let mut smoothed = [[0.0; GRID_SIZE]; GRID_SIZE];
        for (row, out) in smoothed.iter_mut().enumerate() {
            for (col, value) in out.iter_mut().enumerate() {
                *value = convolve_at(&kernel, col, |c| pass[row][c]);
            }
        }

        self.grid.replace(smoothed);
    }

    pub fn display(&self, row: usize, col: usize, color_scale: f64) -> DisplayValue {
        DisplayValue::project(self.grid.get(row, col), color_scale)
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

fn fraction(index: usize, lo: usize, hi: usize) -> f64 {
    (index - lo) as f64 / (hi - lo) as f64
}

/// One value per index in `lo..=hi`, running from `from` to `to`.
fn linear_span(from: f64, to: f64, lo: usize, hi: usize) -> Vec<f64> {
    let slope = (to - from) / (hi - lo) as f64;
    (lo..=hi).map(|i| from + slope * (i - lo) as f64).collect()
}

fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as isize;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x * x) as f64 / (sigma * sigma)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Maps any index onto `0..GRID_SIZE` by mirroring: `d c b a | a b c d | d c b a`.
fn reflect(index: isize) -> usize {
    let n = GRID_SIZE as isize;
    let period = index.rem_euclid(2 * n);
    if period < n { period as usize } else { (2 * n - 1 - period) as usize }
}

fn convolve_at(kernel: &[f64], center: usize, sample: impl Fn(usize) -> f64) -> f64 {
    let radius = (kernel.len() / 2) as isize;
    kernel
        .iter()
        .enumerate()
        .map(|(k, weight)| weight * sample(reflect(center as isize + k as isize - radius)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_parse_edit() {
        assert_eq!(parse_edit("abc"), 0.0);
        assert_eq!(parse_edit("3.14"), 3.14);
        assert_eq!(parse_edit(""), 0.0);
        assert_eq!(parse_edit("-2.5"), -2.5);
        assert_eq!(parse_edit("1e2"), 100.0);
    }

    #[test]
    fn test_set_and_clear() {
        let mut editor = Editor::new();
        let sel = Selection::new(1, 3, 2, 5).unwrap();
        editor.set(sel, 7.5);
        assert_eq!(editor.grid().get(2, 4), 7.5);
        assert_eq!(editor.grid().get(0, 0), 0.0);
        assert_eq!(editor.grid().get(4, 2), 0.0);

        editor.clear(sel);
        for (row, col) in sel.cells() {
            assert_eq!(editor.display(row, col, 96.0).text, "0.00");
        }
    }

    #[test]
    fn test_increment_then_decrement_restores() {
        let mut editor = Editor::new();
        let sel = Selection::new(0, 4, 0, 4).unwrap();
        editor.set(Selection::new(0, 1, 0, 1).unwrap(), 1.37);

        let before = *editor.grid();
        editor.increment(sel, 0.01);
        assert!(close(editor.grid().get(4, 4), 0.01));
        editor.decrement(sel, 0.01);

        for (row, col) in sel.cells() {
            assert!(close(editor.grid().get(row, col), before.get(row, col)));
        }
    }

    #[test]
    fn test_assign_block_checks_shape() {
        let mut editor = Editor::new();
        let sel = Selection::new(0, 1, 0, 2).unwrap();

        let short = vec![vec![1.0, 2.0, 3.0]];
        assert_eq!(
            editor.assign_block(sel, &short),
            Err(DomainError::BlockShapeMismatch { expected: (2, 3), actual: (1, 3) })
        );

        let ragged = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0]];
        assert!(editor.assign_block(sel, &ragged).is_err());
        assert_eq!(editor.grid(), &Grid::default());

        let block = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        editor.assign_block(sel, &block).unwrap();
        assert_eq!(editor.grid().get(1, 2), 6.0);
        assert_eq!(editor.grid().get(0, 1), 2.0);
    }

    #[test]
    fn test_interpolate_single_cell_is_noop() {
        let mut editor = Editor::new();
        editor.set(Selection::new(0, 15, 0, 15).unwrap(), 3.0);
        editor.set(Selection::cell(5, 5), 9.0);
        let before = *editor.grid();

        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                editor.interpolate(Selection::cell(row, col)).unwrap();
            }
        }
        assert_eq!(editor.grid(), &before);
    }

    #[test]
    fn test_interpolate_row() {
        let mut editor = Editor::new();
        editor.set(Selection::cell(3, 2), 1.0);
        editor.set(Selection::cell(3, 7), 6.0);
        editor.set(Selection::cell(3, 4), 100.0);

        editor.interpolate(Selection::new(3, 3, 2, 7).unwrap()).unwrap();
        for col in 2..=7 {
            assert!(close(editor.grid().get(3, col), (col - 1) as f64));
        }
        assert_eq!(editor.grid().get(3, 8), 0.0);
        assert_eq!(editor.grid().get(2, 4), 0.0);
    }

    #[test]
    fn test_interpolate_column() {
        let mut editor = Editor::new();
        editor.set(Selection::cell(0, 9), 2.0);
        editor.set(Selection::cell(4, 9), -2.0);

        editor.interpolate(Selection::new(0, 4, 9, 9).unwrap()).unwrap();
        let expected = [2.0, 1.0, 0.0, -1.0, -2.0];
        for (row, want) in expected.iter().enumerate() {
            assert!(close(editor.grid().get(row, 9), *want));
        }
    }

    #[test]
    fn test_interpolate_bilinear() {
        let mut editor = Editor::new();
        let (a, b, c, d) = (1.0, 5.0, -3.0, 11.0);
        editor.set(Selection::cell(2, 3), a);
        editor.set(Selection::cell(2, 8), b);
        editor.set(Selection::cell(6, 3), c);
        editor.set(Selection::cell(6, 8), d);

        let sel = Selection::new(2, 6, 3, 8).unwrap();
        editor.interpolate(sel).unwrap();

        for (row, col) in sel.cells() {
            let tx = (col - 3) as f64 / 5.0;
            let ty = (row - 2) as f64 / 4.0;
            let want = a * (1.0 - tx) * (1.0 - ty)
                + b * tx * (1.0 - ty)
                + c * (1.0 - tx) * ty
                + d * tx * ty;
            assert!(close(editor.grid().get(row, col), want), "cell ({row}, {col})");
        }
        assert_eq!(editor.grid().get(2, 3), a);
        assert_eq!(editor.grid().get(6, 8), d);
    }

    #[test]
    fn test_gaussian_kernel_shape() {
        let kernel = gaussian_kernel(0.5);
        assert_eq!(kernel.len(), 5);
        assert!(close(kernel.iter().sum::<f64>(), 1.0));
        assert!(close(kernel[0], kernel[4]));
        assert!(kernel[2] > kernel[1] && kernel[1] > kernel[0]);
    }

    #[test]
    fn test_reflect_indices() {
        assert_eq!(reflect(-1), 0);
        assert_eq!(reflect(-2), 1);
        assert_eq!(reflect(16), 15);
        assert_eq!(reflect(17), 14);
        assert_eq!(reflect(7), 7);
    }

    #[test]
    fn test_filter_block() {
        let mut editor = Editor::new();
        editor.set(Selection::new(2, 4, 2, 4).unwrap(), 5.0);
        editor.filter(0.5);

        let grid = editor.grid();
        // Axis weights for sigma 0.5, radius 2.
        let raw = [(-8.0f64).exp(), (-2.0f64).exp(), 1.0];
        let total = raw[0] * 2.0 + raw[1] * 2.0 + raw[2];
        let (w2, w1, w0) = (raw[0] / total, raw[1] / total, raw[2] / total);

        // The outer taps of the center land on the zero ring around the block.
        assert!(close(grid.get(3, 3), 5.0 * (w0 + 2.0 * w1).powi(2)));
        assert!(close(grid.get(2, 3), 5.0 * (w0 + w1 + w2) * (w0 + 2.0 * w1)));
        assert!(close(grid.get(2, 2), 5.0 * (w0 + w1 + w2).powi(2)));
        assert!(close(grid.get(1, 1), 5.0 * (w1 + w2).powi(2)));
        assert!(close(grid.get(0, 0), 5.0 * w2 * w2));
        assert_eq!(grid.get(10, 10), 0.0);

        assert!(grid.get(3, 3) > grid.get(2, 3));
        assert!(grid.get(2, 3) > grid.get(2, 2));
        assert!(grid.get(3, 3) < 5.0);
        assert!(close(grid.sum(), 45.0));
    }

    #[test]
    fn test_filter_reflects_at_edges() {
        let mut editor = Editor::new();
        editor.set(Selection::new(0, 15, 0, 15).unwrap(), 2.0);
        editor.filter(0.5);
        for (row, col) in Selection::new(0, 15, 0, 15).unwrap().cells() {
            assert!(close(editor.grid().get(row, col), 2.0));
        }
    }

    #[test]
    fn test_filter_huge_sigma_is_capped() {
        let mut editor = Editor::new();
        editor.set(Selection::cell(0, 0), 256.0);
        editor.filter(1e18);
        let grid = editor.grid();
        assert!(close(grid.sum(), 256.0));
        assert!(grid.get(0, 0) < 256.0);
        assert!(grid.get(15, 15) > 0.0);
    }

    #[test]
    fn test_filter_non_positive_sigma_is_noop() {
        let mut editor = Editor::new();
        editor.set(Selection::cell(4, 4), 1.0);
        let before = *editor.grid();
        editor.filter(0.0);
        editor.filter(-1.0);
        assert_eq!(editor.grid(), &before);
    }
}
