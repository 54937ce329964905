use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use pretty_print_nalgebra::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fieldgen::{
    export, DesignBuilder, DesignKind, FactorialBuilder, FieldLayout, LayoutOrder,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Crd,
    Rcbd,
}

impl From<Kind> for DesignKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Crd => DesignKind::Crd,
            Kind::Rcbd => DesignKind::Rcbd,
        }
    }
}

/// Randomize a nitrogen x potassium factorial field trial and export the
/// assignment table and field map.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Randomization scheme
    #[arg(long, value_enum, default_value = "rcbd")]
    design: Kind,

    /// Number of replicates (blocks for RCBD)
    #[arg(long, default_value_t = 4)]
    reps: usize,

    /// RNG seed; the same seed reproduces the same assignment
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Grid rows; defaults to reps for CRD and the treatment count for RCBD
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns; defaults to the treatment count for CRD and reps for RCBD
    #[arg(long)]
    cols: Option<usize>,

    /// Output path for the assignment table
    #[arg(long, default_value = "assignment.csv")]
    table: PathBuf,

    /// Output path for the field map image
    #[arg(long, default_value = "field_map.png")]
    map: PathBuf,

    /// Field map image width in pixels
    #[arg(long, default_value_t = 900)]
    map_width: u32,

    /// Field map image height in pixels
    #[arg(long, default_value_t = 500)]
    map_height: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let kind = DesignKind::from(args.design);

    let factorial = FactorialBuilder::default()
        .factor("nitrogen", "N", &[0, 100, 200])
        .factor("potassium", "K", &[0, 30, 60])
        .build()?;
    let treatments = factorial.treatments();
    let k = treatments.len();

    let design = DesignBuilder::default()
        .treatments(treatments)
        .reps(args.reps)
        .kind(kind)
        .seed(args.seed)
        .build()?;
    let assignments = design.randomize();
    info!(?kind, seed = args.seed, plots = assignments.len(), "assignment complete");

    // CRD reads row by row; RCBD puts one block per column.
    let (rows, cols, order) = match kind {
        DesignKind::Crd => (
            args.rows.unwrap_or(args.reps),
            args.cols.unwrap_or(k),
            LayoutOrder::RowMajor,
        ),
        DesignKind::Rcbd => (
            args.rows.unwrap_or(k),
            args.cols.unwrap_or(args.reps),
            LayoutOrder::ColumnMajor,
        ),
    };
    let layout = FieldLayout::from_assignments(&assignments, rows, cols, order)?;
    println!("plot layout: {}", pretty_print!(&layout.plots));

    export::write_table(&args.table, &assignments, &factorial.factor_names())?;
    export::render_map(&args.map, &layout, args.map_width, args.map_height)?;

    Ok(())
}
