use derive_builder::UninitializedFieldError;
use thiserror::Error;

/// Errors raised by design construction, layout mapping and export.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error("invalid design: {0}")]
    InvalidDesign(String),

    #[error("grid shape {rows}x{cols} does not fit {plots} plots")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        plots: usize,
    },

    #[error("duplicate treatment id: {0}")]
    DuplicateTreatmentId(String),

    #[error("required field not set: {0}")]
    MissingField(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("table export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("map rendering failed: {0}")]
    Render(String),
}

impl From<UninitializedFieldError> for DesignError {
    fn from(e: UninitializedFieldError) -> Self {
        DesignError::MissingField(e.field_name().to_string())
    }
}
