//! Parameter sweeps over lists of instances and over noise magnitudes.
//!
//! The per-instance sweeps run in parallel; each instance still runs its
//! own scan sequentially. An instance that cannot accommodate a reduction
//! is logged and left out of the table.

use log::{info, warn};
use rayon::prelude::*;

use crate::error::{HintLweError, Result};
use crate::estimator::{HardnessOracle, SecurityEstimate};
use crate::flooding::{
    hint_lwe_flooding_noise, log_total_noise, precision_loss, rescaling_noise, FloodingStrategy,
    HintLeakage,
};
use crate::params::presets::{
    reference_instance, REFERENCE_DECISION_KAPPA_PRIME, REFERENCE_DECISION_SIGMA_PRIME_SQ,
    REFERENCE_ORIGINAL_SECURITY, REFERENCE_SEARCH_KAPPA_PRIME, REFERENCE_SEARCH_SIGMA_PRIME_SQ,
};
use crate::params::{LweInstance, SweepParams};
use crate::reduction::inverse::{
    hint_lwe_decision_normalised_noise_flooding, hint_lwe_search_normalised_noise_flooding,
    normalised_bits, FloodingTarget,
};
use crate::reduction::{hint_lwe_security, ReductionResult, ReductionStrategy};

/// Keep feasible rows, log and drop infeasible ones, stop on anything else.
fn keep_feasible(instance: &LweInstance, outcome: Result<ReductionResult>) -> Result<Option<ReductionResult>> {
    match outcome {
        Ok(row) => Ok(Some(row)),
        Err(e @ HintLweError::Infeasible { .. }) => {
            warn!("{}: {}", instance, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn paired<'a>(
    instances: &'a [LweInstance],
    baselines: &'a [SecurityEstimate],
) -> Result<Vec<(&'a LweInstance, f64)>> {
    if instances.len() != baselines.len() {
        return Err(HintLweError::InvalidParam(format!(
            "{} instances but {} baseline estimates",
            instances.len(),
            baselines.len()
        )));
    }
    instances
        .iter()
        .zip(baselines)
        .map(|(instance, baseline)| {
            if instance.logn != baseline.logn {
                return Err(HintLweError::InvalidParam(format!(
                    "baseline for logn={} paired with {}",
                    baseline.logn, instance
                )));
            }
            Ok((instance, baseline.bits))
        })
        .collect()
}

/// Run one reduction strategy over every instance, each paired with its
/// baseline estimate. The search strategy ignores the baselines.
pub fn reduction_sweep<O>(
    oracle: &O,
    instances: &[LweInstance],
    baselines: &[SecurityEstimate],
    strategy: ReductionStrategy,
) -> Result<Vec<ReductionResult>>
where
    O: HardnessOracle + ?Sized,
{
    info!("{} sweep over {} instances", strategy.name(), instances.len());
    let rows = paired(instances, baselines)?
        .into_par_iter()
        .map(|(instance, original)| {
            keep_feasible(instance, hint_lwe_security(oracle, strategy, instance, original))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(rows.into_iter().flatten().collect())
}

/// A reduction sized for a target, with its flooding relative to the noise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloodingRow {
    pub reduction: ReductionResult,
    /// Extra bits of precision the flooding costs.
    pub normalised_bits: f64,
}

fn with_normalised(instance: &LweInstance, reduction: ReductionResult, target: &FloodingTarget) -> FloodingRow {
    let normalised = reduction
        .flooding_stddev_bits
        .map(|bits| normalised_bits(instance, bits, target.rescaled_noise_log2))
        .unwrap_or(f64::NAN);
    FloodingRow {
        reduction,
        normalised_bits: normalised,
    }
}

/// Inverse decision search over every instance.
pub fn decision_normalised_sweep<O>(
    oracle: &O,
    instances: &[LweInstance],
    baselines: &[SecurityEstimate],
    loss: u32,
    target: &FloodingTarget,
) -> Result<Vec<FloodingRow>>
where
    O: HardnessOracle + ?Sized,
{
    let rows = paired(instances, baselines)?
        .into_par_iter()
        .map(|(instance, original)| -> Result<Option<FloodingRow>> {
            let outcome = hint_lwe_decision_normalised_noise_flooding(oracle, instance, original, loss, target);
            Ok(keep_feasible(instance, outcome)?.map(|row| with_normalised(instance, row, target)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(rows.into_iter().flatten().collect())
}

/// Inverse search-reduction search over every instance.
pub fn search_normalised_sweep<O>(
    oracle: &O,
    instances: &[LweInstance],
    max_hints: u32,
    target: &FloodingTarget,
) -> Result<Vec<FloodingRow>>
where
    O: HardnessOracle + ?Sized,
{
    let rows = instances
        .par_iter()
        .map(|instance| -> Result<Option<FloodingRow>> {
            let outcome = hint_lwe_search_normalised_noise_flooding(oracle, instance, max_hints, target);
            Ok(keep_feasible(instance, outcome)?.map(|row| with_normalised(instance, row, target)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(rows.into_iter().flatten().collect())
}

/// How one column of a noise table is computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoiseColumn {
    /// Flooding on the total noise, ignoring hints.
    Generic(FloodingStrategy),
    /// Hint-aware flooding for a reduction with residual variance sigma'^2,
    /// applied to the rescaled noise alone.
    HintLwe {
        strategy: FloodingStrategy,
        sigma_prime_sq: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseRow {
    /// log2 of the rescaled noise bound.
    pub magnitude: u32,
    /// log2 of the flooding standard deviation.
    pub absolute: f64,
    /// Extra bits of precision lost to flooding.
    pub additional: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoiseTable {
    pub name: &'static str,
    pub rows: Vec<NoiseRow>,
}

/// A decryption-query experiment: fixed instance and target, flooding
/// tabulated against the rescaled noise magnitude.
#[derive(Clone, Debug, PartialEq)]
pub struct DecryptionExperiment {
    pub instance: LweInstance,
    /// Security the decryption game must keep.
    pub target: f64,
    pub queries: f64,
    pub max_rescaled_noise: u32,
    pub columns: Vec<(&'static str, NoiseColumn)>,
}

impl DecryptionExperiment {
    /// log2 of the rescaling noise: beyond it the rescaled noise dominates.
    pub fn crossover_point(&self) -> f64 {
        rescaling_noise(self.instance.ring_degree(), self.instance.secret_sigma).log2()
    }

    fn column_value(&self, column: &NoiseColumn, magnitude: f64, log_e: f64) -> Result<f64> {
        match *column {
            NoiseColumn::Generic(strategy) => strategy.flooding_noise(log_e, self.target),
            NoiseColumn::HintLwe {
                strategy,
                sigma_prime_sq,
            } => {
                let leakage = HintLeakage {
                    queries: self.queries,
                    ring_degree: self.instance.ring_degree(),
                    sigma_prime_sq,
                    sigma_sq: self.instance.secret_variance(),
                };
                hint_lwe_flooding_noise(strategy, &leakage, magnitude, self.target)
            }
        }
    }

    /// One table per column, rows for magnitudes 1..=max_rescaled_noise.
    pub fn run(&self) -> Result<Vec<NoiseTable>> {
        let n = self.instance.ring_degree();
        self.columns
            .iter()
            .map(|&(name, column)| -> Result<NoiseTable> {
                let rows = (1..=self.max_rescaled_noise)
                    .map(|magnitude| -> Result<NoiseRow> {
                        let log_e = log_total_noise(n, self.instance.secret_sigma, magnitude as f64);
                        let absolute = self.column_value(&column, magnitude as f64, log_e)?;
                        Ok(NoiseRow {
                            magnitude,
                            absolute,
                            additional: precision_loss(self.instance.logn, absolute, log_e),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(NoiseTable { name, rows })
            })
            .collect()
    }
}

/// IND-CPA-D flooding on the reference instance: the decision reduction at
/// l = 4 and a game losing log2(12) more bits.
pub fn ind_cpa_d_experiment(params: &SweepParams) -> Result<DecryptionExperiment> {
    let target = REFERENCE_DECISION_KAPPA_PRIME - params.decision_loss as f64 - 12f64.log2();
    Ok(DecryptionExperiment {
        instance: reference_instance()?,
        target,
        queries: params.queries,
        max_rescaled_noise: params.max_rescaled_noise,
        columns: vec![
            (
                "prior",
                NoiseColumn::Generic(FloodingStrategy::Prior {
                    queries: params.queries,
                }),
            ),
            ("bit_security", NoiseColumn::Generic(FloodingStrategy::BitSecurity)),
            (
                "hint_lwe",
                NoiseColumn::HintLwe {
                    strategy: FloodingStrategy::BitSecurity,
                    sigma_prime_sq: REFERENCE_DECISION_SIGMA_PRIME_SQ,
                },
            ),
        ],
    })
}

/// Key recovery under decryption queries on the reference instance: the
/// search reduction, one bit of loss for the union bound.
pub fn kr_d_experiment(params: &SweepParams) -> Result<DecryptionExperiment> {
    let target = REFERENCE_SEARCH_KAPPA_PRIME - 1.0;
    Ok(DecryptionExperiment {
        instance: reference_instance()?,
        target,
        queries: params.queries,
        max_rescaled_noise: params.max_rescaled_noise,
        columns: vec![
            (
                "bit_security",
                NoiseColumn::Generic(FloodingStrategy::UnionBound {
                    queries: params.queries,
                    original_security: REFERENCE_ORIGINAL_SECURITY,
                }),
            ),
            (
                "hint_lwe",
                NoiseColumn::HintLwe {
                    strategy: FloodingStrategy::UnionBound {
                        queries: params.queries,
                        original_security: target + 1.0,
                    },
                    sigma_prime_sq: REFERENCE_SEARCH_SIGMA_PRIME_SQ,
                },
            ),
        ],
    })
}
