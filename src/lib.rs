pub mod design;
pub mod error;
pub mod export;
pub mod layout;
pub mod treatment;

pub use design::{Design, DesignBuilder, DesignKind, PlotAssignment};
pub use error::DesignError;
pub use layout::{FieldLayout, LayoutCell, LayoutOrder};
pub use treatment::{Factor, Factorial, FactorialBuilder, Treatment};

/// Randomizes a factorial treatment structure in one call.
///
/// # Arguments
///
/// * `factorial` - The factorial treatment structure to expand and randomize
/// * `reps` - Number of replicates (blocks for RCBD)
/// * `kind` - Randomization scheme, `Crd` or `Rcbd`
/// * `seed` - Seed for the deterministic RNG stream; identical inputs and
///   seed reproduce the assignment exactly
///
/// # Returns
///
/// The ordered plot assignment sequence: by plot id for CRD, by block then
/// within-block position for RCBD.
///
/// # Errors
///
/// Returns `InvalidDesign` for an empty treatment set or zero replicates and
/// `DuplicateTreatmentId` when the expanded treatments collide.
pub fn randomize_factorial(
    factorial: &Factorial,
    reps: usize,
    kind: DesignKind,
    seed: u64,
) -> Result<Vec<PlotAssignment>, DesignError> {
    let design = DesignBuilder::default()
        .treatments(factorial.treatments())
        .reps(reps)
        .kind(kind)
        .seed(seed)
        .build()?;
    Ok(design.randomize())
}
