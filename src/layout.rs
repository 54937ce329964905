use nalgebra::DMatrix;

use crate::design::PlotAssignment;
use crate::error::DesignError;

/// Traversal order used to place the assignment sequence on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutOrder {
    /// Fill left to right, top to bottom.
    #[default]
    RowMajor,
    /// Fill top to bottom, left to right. The usual RCBD rendering, where
    /// each column holds one block.
    ColumnMajor,
}

/// One grid cell of the field map.
///
/// # Fields
///
/// * `plot` - The plot id placed in this cell
/// * `row` / `col` - 1-based grid coordinates
/// * `treatment_code` - Numeric code of the treatment on this plot
/// * `label` - Display label, plot id followed by treatment name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutCell {
    pub plot: u32,
    pub row: usize,
    pub col: usize,
    pub treatment_code: u32,
    pub label: String,
}

/// The spatial arrangement of a randomized design: a `rows x cols` matrix of
/// plot ids plus one labelled cell per plot. Derived from an assignment
/// sequence; regenerate it if the grid shape changes.
#[derive(Debug, Clone, Default)]
pub struct FieldLayout {
    pub plots: DMatrix<u32>,
    pub cells: Vec<LayoutCell>,
}

impl FieldLayout {
    /// Maps the assignment sequence, in the order the randomizer produced
    /// it, onto a `rows x cols` grid.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` when `rows * cols` differs from the number of
    /// assignments.
    pub fn from_assignments(
        assignments: &[PlotAssignment],
        rows: usize,
        cols: usize,
        order: LayoutOrder,
    ) -> Result<Self, DesignError> {
        if rows * cols != assignments.len() {
            return Err(DesignError::ShapeMismatch {
                rows,
                cols,
                plots: assignments.len(),
            });
        }

        let mut plots = DMatrix::zeros(rows, cols);
        let mut cells = Vec::with_capacity(assignments.len());
        for (index, assignment) in assignments.iter().enumerate() {
            let (row, col) = match order {
                LayoutOrder::RowMajor => (index / cols, index % cols),
                LayoutOrder::ColumnMajor => (index % rows, index / rows),
            };
            plots[(row, col)] = assignment.plot;
            cells.push(LayoutCell {
                plot: assignment.plot,
                row: row + 1,
                col: col + 1,
                treatment_code: assignment.treatment.code,
                label: format!("{} {}", assignment.plot, assignment.treatment.name),
            });
        }

        Ok(Self { plots, cells })
    }

    pub fn nrows(&self) -> usize {
        self.plots.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.plots.ncols()
    }
}
