//! Dense similarity matrices.

use arcmap_model::{ArcmapError, Result};

/// Row-major `|source| x |target|` matrix of similarity scores.
///
/// Higher means more related. Scores from different strategies are not on a
/// common scale, so thresholds only make sense per strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Builds a matrix from row-major values.
    ///
    /// # Errors
    ///
    /// [`ArcmapError::InvalidArgument`] when the value count does not match
    /// the shape or a value is NaN.
    pub fn new(rows: usize, cols: usize, values: Vec<f32>) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(ArcmapError::invalid_argument(format!(
                "similarity matrix of shape {rows}x{cols} needs {} values, got {}",
                rows * cols,
                values.len()
            )));
        }
        if let Some(position) = values.iter().position(|v| v.is_nan()) {
            return Err(ArcmapError::invalid_argument(format!(
                "similarity matrix contains NaN at row {}, column {}",
                position / cols.max(1),
                position % cols.max(1)
            )));
        }
        Ok(Self { rows, cols, values })
    }

    /// Builds a matrix from one vector per source row.
    pub fn from_rows(cols: usize, rows: Vec<Vec<f32>>) -> Result<Self> {
        let row_count = rows.len();
        let mut values = Vec::with_capacity(row_count * cols);
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(ArcmapError::invalid_argument(format!(
                    "similarity row {idx} has {} columns, expected {cols}",
                    row.len()
                )));
            }
            values.extend(row);
        }
        Self::new(row_count, cols, values)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.cols;
        &self.values[start..start + self.cols]
    }

    /// Target indices of `row` ordered by descending similarity.
    ///
    /// The sort is stable: equal scores keep target order.
    pub fn ranked(&self, row: usize) -> Vec<usize> {
        let scores = self.row(row);
        let mut order: Vec<usize> = (0..self.cols).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_value_count() {
        let err = SimilarityMatrix::new(2, 2, vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, ArcmapError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_nan() {
        let err = SimilarityMatrix::new(1, 2, vec![0.1, f32::NAN]).unwrap_err();
        assert!(matches!(err, ArcmapError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = SimilarityMatrix::from_rows(2, vec![vec![0.1, 0.2], vec![0.3]]).unwrap_err();
        assert!(matches!(err, ArcmapError::InvalidArgument(_)));
    }

    #[test]
    fn ranked_is_descending_and_stable() {
        let m = SimilarityMatrix::from_rows(4, vec![vec![0.2, 0.9, 0.2, 0.5]]).unwrap();
        assert_eq!(m.ranked(0), vec![1, 3, 0, 2]);
        assert_eq!(m.get(0, 1), Some(0.9));
        assert_eq!(m.get(1, 0), None);
    }
}
