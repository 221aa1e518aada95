//! Compatibility evaluation between cases and the control pool
//!
//! For each case the pool is narrowed by every match condition in order:
//! exact conditions keep controls whose cell equals the case's cell, range
//! conditions keep controls whose numeric value lies within the tolerance,
//! bounds inclusive. Columns referenced by range conditions are parsed once
//! for the whole pool up front, so a non-numeric control cell fails fast.

use log::info;
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::algorithm::matching::criteria::{MatchCondition, MatchMode};
use crate::algorithm::matching::types::CompatibilityMap;
use crate::error::{MatchError, Result};
use crate::metadata::MetadataTable;
use crate::utils::progress;

/// Pre-resolved view of one match condition against a table
#[derive(Debug)]
enum ResolvedCondition {
    /// Column position for identity comparison
    Exact { column: usize },
    /// Column position, tolerance, and the pool's pre-parsed numeric values
    Range {
        column: usize,
        tolerance: f64,
        pool_values: Vec<f64>,
    },
}

/// Evaluates per-case compatible-control sets under the configured conditions
#[derive(Debug)]
pub struct CompatibilityEvaluator<'a> {
    table: &'a MetadataTable,
    conditions: &'a [MatchCondition],
    /// Control pool row indices, in input order
    pool: Vec<usize>,
    resolved: Vec<ResolvedCondition>,
}

impl<'a> CompatibilityEvaluator<'a> {
    /// Below this case count, evaluation always runs sequentially
    pub const PARALLEL_THRESHOLD: usize = 1000;

    /// Build an evaluator over a control pool.
    ///
    /// Every pool cell of every range-condition column is parsed here;
    /// the first cell that is not numeric aborts with `ColumnType`.
    pub fn new(
        table: &'a MetadataTable,
        conditions: &'a [MatchCondition],
        pool: Vec<usize>,
    ) -> Result<Self> {
        let mut resolved = Vec::with_capacity(conditions.len());
        for condition in conditions {
            let column = table.column_position(&condition.column)?;
            resolved.push(match condition.mode {
                MatchMode::Exact => ResolvedCondition::Exact { column },
                MatchMode::Range { tolerance } => {
                    let mut pool_values = Vec::with_capacity(pool.len());
                    for &row in &pool {
                        let cell = table.cell(row, column);
                        let value =
                            cell.trim()
                                .parse::<f64>()
                                .map_err(|_| MatchError::ColumnType {
                                    column: condition.column.clone(),
                                    value: cell.to_string(),
                                })?;
                        pool_values.push(value);
                    }
                    ResolvedCondition::Range {
                        column,
                        tolerance,
                        pool_values,
                    }
                }
            });
        }

        Ok(Self {
            table,
            conditions,
            pool,
            resolved,
        })
    }

    /// Control pool row indices, in input order
    #[must_use]
    pub fn pool(&self) -> &[usize] {
        &self.pool
    }

    /// Compatible controls for one case, as table row indices in pool order
    pub fn compatible_controls(&self, case_row: usize) -> Result<Vec<usize>> {
        // Positions into the pool, narrowed per condition
        let mut survivors: SmallVec<[usize; 32]> = (0..self.pool.len()).collect();

        for (condition, resolved) in self.conditions.iter().zip(&self.resolved) {
            if survivors.is_empty() {
                break;
            }
            match resolved {
                ResolvedCondition::Exact { column } => {
                    let case_value = self.table.cell(case_row, *column);
                    survivors
                        .retain(|position| self.table.cell(self.pool[*position], *column) == case_value);
                }
                ResolvedCondition::Range {
                    column,
                    tolerance,
                    pool_values,
                } => {
                    let raw = self.table.cell(case_row, *column);
                    let case_value =
                        raw.trim()
                            .parse::<f64>()
                            .map_err(|_| MatchError::InvalidNumber {
                                column: condition.column.clone(),
                                value: raw.to_string(),
                            })?;
                    let low = case_value - tolerance;
                    let high = case_value + tolerance;
                    survivors.retain(|position| {
                        let value = pool_values[*position];
                        value >= low && value <= high
                    });
                }
            }
        }

        Ok(survivors.iter().map(|&position| self.pool[position]).collect())
    }

    /// Build the full compatibility map for the given cases.
    ///
    /// With `use_parallel` and at least [`Self::PARALLEL_THRESHOLD`] cases,
    /// evaluation is sharded across threads; per-case results are collected
    /// positionally, so the map is identical to a sequential run.
    pub fn build_map(
        &self,
        cases: &[usize],
        use_parallel: bool,
        show_progress: bool,
    ) -> Result<CompatibilityMap> {
        let pb = show_progress.then(|| {
            progress::create_main_progress_bar(cases.len() as u64, Some("Evaluating compatibility"))
        });

        let sets: Result<Vec<Vec<usize>>> =
            if use_parallel && cases.len() >= Self::PARALLEL_THRESHOLD {
                info!(
                    "Using parallel compatibility evaluation for {} cases ({} threads)",
                    cases.len(),
                    rayon::current_num_threads()
                );
                cases
                    .par_iter()
                    .map(|&case_row| {
                        let set = self.compatible_controls(case_row)?;
                        if let Some(pb) = &pb {
                            pb.inc(1);
                        }
                        Ok(set)
                    })
                    .collect()
            } else {
                cases
                    .iter()
                    .map(|&case_row| {
                        let set = self.compatible_controls(case_row)?;
                        if let Some(pb) = &pb {
                            pb.inc(1);
                        }
                        Ok(set)
                    })
                    .collect()
            };
        let controls = sets?;

        if let Some(pb) = &pb {
            progress::finish_progress_bar(pb, Some("Compatibility evaluation complete"));
        }

        Ok(CompatibilityMap {
            cases: cases.to_vec(),
            controls,
        })
    }
}
