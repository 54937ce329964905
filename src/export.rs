use std::fmt::Display;
use std::path::Path;

use csv::Writer;
use plotters::prelude::*;
use tracing::info;

use crate::design::PlotAssignment;
use crate::error::DesignError;
use crate::layout::FieldLayout;

/// Writes the assignment table as CSV, one row per plot, overwriting any
/// existing file. Column order is stable: plot, block, treatment code,
/// treatment name, then one column per factor named in `factor_names`.
pub fn write_table(
    path: &Path,
    assignments: &[PlotAssignment],
    factor_names: &[String],
) -> Result<(), DesignError> {
    let mut writer = Writer::from_path(path)?;

    let mut header = vec![
        "plot".to_string(),
        "block".to_string(),
        "treatment_code".to_string(),
        "treatment".to_string(),
    ];
    header.extend(factor_names.iter().cloned());
    writer.write_record(&header)?;

    for assignment in assignments {
        let mut record = vec![
            assignment.plot.to_string(),
            assignment.block.to_string(),
            assignment.treatment.code.to_string(),
            assignment.treatment.name.clone(),
        ];
        record.extend(assignment.treatment.levels.iter().map(|l| l.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = assignments.len(), "wrote assignment table");
    Ok(())
}

/// Renders the field map as a PNG: one rectangle per grid cell, colored by
/// treatment code and labelled with the cell label. Takes the layout
/// explicitly, so rendering never depends on a previously drawn figure.
pub fn render_map(
    path: &Path,
    layout: &FieldLayout,
    width: u32,
    height: u32,
) -> Result<(), DesignError> {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let areas = root.split_evenly((layout.nrows(), layout.ncols()));
    for cell in &layout.cells {
        let area = &areas[(cell.row - 1) * layout.ncols() + (cell.col - 1)];
        let (w, h) = area.dim_in_pixel();

        let fill = Palette99::pick(cell.treatment_code as usize).mix(0.55);
        area.fill(&fill).map_err(render_err)?;
        area.draw(&Rectangle::new(
            [(0, 0), (w as i32 - 1, h as i32 - 1)],
            BLACK,
        ))
        .map_err(render_err)?;
        area.draw(&Text::new(
            cell.label.clone(),
            (6, h as i32 / 2 - 7),
            ("sans-serif", 14),
        ))
        .map_err(render_err)?;
    }
    root.present().map_err(render_err)?;

    info!(path = %path.display(), cells = layout.cells.len(), "rendered field map");
    Ok(())
}

fn render_err(e: impl Display) -> DesignError {
    DesignError::Render(e.to_string())
}
