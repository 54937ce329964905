use derive_builder::Builder;
use nalgebra::DVector;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::DesignError;
use crate::treatment::{validate_unique, Treatment};

/// The randomization scheme applied to the treatment set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignKind {
    /// Completely Randomized Design: no grouping constraint, any plot may
    /// receive any treatment replicate.
    Crd,
    /// Randomized Complete Block Design: each block receives one full,
    /// independently randomized replicate of all treatments.
    Rcbd,
}

/// One plot's assignment in a randomized design.
///
/// # Fields
///
/// * `plot` - Unique plot id; sequential `1..k*r` for CRD,
///   `block*100 + position` for RCBD
/// * `block` - 1-based block index for RCBD, replicate index for CRD
/// * `treatment` - The treatment applied to this plot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotAssignment {
    pub plot: u32,
    pub block: u32,
    pub treatment: Treatment,
}

/// A randomizable field-trial design. Immutable once built; every
/// randomization is a pure function of the design and its seed.
#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate", error = "DesignError"))]
pub struct Design {
    treatments: Vec<Treatment>,

    #[builder(default = "1")]
    reps: usize,

    kind: DesignKind,

    #[builder(default = "0")]
    seed: u64,
}

impl DesignBuilder {
    fn validate(&self) -> Result<(), DesignError> {
        if let Some(treatments) = &self.treatments {
            if treatments.is_empty() {
                return Err(DesignError::InvalidDesign(
                    "treatment set is empty".to_string(),
                ));
            }
            validate_unique(treatments)?;
        }
        if self.reps == Some(0) {
            return Err(DesignError::InvalidDesign(
                "replication count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Design {
    pub fn treatments(&self) -> &[Treatment] {
        &self.treatments
    }

    pub fn reps(&self) -> usize {
        self.reps
    }

    pub fn kind(&self) -> DesignKind {
        self.kind
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn plot_count(&self) -> usize {
        self.treatments.len() * self.reps
    }

    /// Randomizes the design with a ChaCha stream seeded from `seed`.
    /// Identical designs and seeds reproduce the assignment exactly.
    pub fn randomize(&self) -> Vec<PlotAssignment> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.randomize_with(&mut rng)
    }

    /// Randomizes the design drawing all permutations from `rng`. The RNG is
    /// the only source of randomness, so any seeded generator gives a
    /// reproducible assignment.
    pub fn randomize_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<PlotAssignment> {
        let assignments = match self.kind {
            DesignKind::Crd => self.randomize_crd(rng),
            DesignKind::Rcbd => self.randomize_rcbd(rng),
        };
        debug!(
            kind = ?self.kind,
            treatments = self.treatments.len(),
            reps = self.reps,
            plots = assignments.len(),
            "randomized design"
        );
        assignments
    }

    /// CRD: rows are laid out treatment-major (every replicate of treatment
    /// 1, then treatment 2, ...) and the plot-number column `1..k*r` is
    /// shuffled once over them, a single uniform permutation over all plots.
    /// Output is ordered by plot id.
    fn randomize_crd<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<PlotAssignment> {
        let total = self.plot_count();
        let mut plot_ids: Vec<u32> = (1..=total as u32).collect();
        plot_ids.shuffle(rng);

        let mut assignments: Vec<PlotAssignment> = self
            .treatments
            .iter()
            .flat_map(|t| (1..=self.reps as u32).map(move |rep| (t, rep)))
            .zip(plot_ids)
            .map(|((treatment, rep), plot)| PlotAssignment {
                plot,
                block: rep,
                treatment: treatment.clone(),
            })
            .collect();
        assignments.sort_by_key(|a| a.plot);
        assignments
    }

    /// RCBD: each block draws an independent permutation of the treatment
    /// list from the shared RNG stream. Plot ids encode block and within
    /// block position as `block*100 + position`, position 1-based in
    /// permutation order.
    fn randomize_rcbd<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<PlotAssignment> {
        let k = self.treatments.len();
        let mut order: Vec<usize> = (0..k).collect();
        let mut assignments = Vec::with_capacity(self.plot_count());
        for block in 1..=self.reps as u32 {
            order.shuffle(rng);
            for (position, &treatment_idx) in order.iter().enumerate() {
                assignments.push(PlotAssignment {
                    plot: block * 100 + position as u32 + 1,
                    block,
                    treatment: self.treatments[treatment_idx].clone(),
                });
            }
        }
        assignments
    }

    /// Tallies how many plots each treatment received, in treatment-set
    /// order. Every entry equals `reps` for a complete assignment.
    pub fn replication_counts(&self, assignments: &[PlotAssignment]) -> DVector<usize> {
        let mut counts = DVector::zeros(self.treatments.len());
        for assignment in assignments {
            if let Some(i) = self
                .treatments
                .iter()
                .position(|t| t.code == assignment.treatment.code)
            {
                counts[i] += 1;
            }
        }
        counts
    }
}
