use derive_builder::Builder;

use crate::error::DesignError;

/// A treatment: one combination of factor levels applied to a plot.
///
/// # Fields
///
/// * `code` - Sequential numeric code, unique within the treatment set
/// * `name` - Display label, e.g. `N100-K30`
/// * `levels` - The factor levels that compose the treatment, in factor order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Treatment {
    pub code: u32,
    pub name: String,
    pub levels: Vec<i64>,
}

/// A single experimental factor with its candidate levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factor {
    pub name: String,
    pub label: String,
    pub levels: Vec<i64>,
}

/// A full-factorial treatment structure: the cross product of all factor
/// levels, one treatment per combination.
#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate", error = "DesignError"))]
pub struct Factorial {
    factors: Vec<Factor>,
}

impl FactorialBuilder {
    /// Appends a factor. `label` is the short tag used in treatment names
    /// (e.g. `N` for nitrogen), `name` the long form used as a table header.
    pub fn factor(&mut self, name: &str, label: &str, levels: &[i64]) -> &mut Self {
        self.factors.get_or_insert_with(Vec::new).push(Factor {
            name: name.to_string(),
            label: label.to_string(),
            levels: levels.to_vec(),
        });
        self
    }

    fn validate(&self) -> Result<(), DesignError> {
        let Some(factors) = &self.factors else {
            return Ok(());
        };
        if factors.is_empty() {
            return Err(DesignError::InvalidDesign(
                "factorial needs at least one factor".to_string(),
            ));
        }
        for factor in factors {
            if factor.levels.is_empty() {
                return Err(DesignError::InvalidDesign(format!(
                    "factor {} has no levels",
                    factor.name
                )));
            }
        }
        Ok(())
    }
}

impl Factorial {
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Long factor names in factor order, for use as table column headers.
    pub fn factor_names(&self) -> Vec<String> {
        self.factors.iter().map(|f| f.name.clone()).collect()
    }

    /// Expands the cross product of all factor levels into the treatment
    /// set. Combinations are generated in lexicographic order of the factor
    /// level lists and coded sequentially from 1.
    pub fn treatments(&self) -> Vec<Treatment> {
        let mut combos: Vec<Vec<i64>> = vec![vec![]];
        for factor in &self.factors {
            combos = combos
                .iter()
                .flat_map(|prefix| {
                    factor.levels.iter().map(move |&level| {
                        let mut next = prefix.clone();
                        next.push(level);
                        next
                    })
                })
                .collect();
        }

        combos
            .into_iter()
            .enumerate()
            .map(|(i, levels)| {
                let name = self
                    .factors
                    .iter()
                    .zip(levels.iter())
                    .map(|(f, level)| format!("{}{}", f.label, level))
                    .collect::<Vec<_>>()
                    .join("-");
                Treatment {
                    code: i as u32 + 1,
                    name,
                    levels,
                }
            })
            .collect()
    }
}

/// Checks that treatment codes and names are unique across the set.
pub fn validate_unique(treatments: &[Treatment]) -> Result<(), DesignError> {
    for (i, a) in treatments.iter().enumerate() {
        for b in &treatments[i + 1..] {
            if a.code == b.code {
                return Err(DesignError::DuplicateTreatmentId(a.code.to_string()));
            }
            if a.name == b.name {
                return Err(DesignError::DuplicateTreatmentId(a.name.clone()));
            }
        }
    }
    Ok(())
}
