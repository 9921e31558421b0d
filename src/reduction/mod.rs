//! Security of HintLWE through the reductions from LWE.
//!
//! A reduction trades a narrower secret for hint tolerance: HintLWE with
//! secret width sigma_s is as hard as LWE with residual secret variance
//! sigma'^2, minus a loss l. The residual variance itself depends on the
//! security level being claimed, so the searches enumerate a bounded range
//! of candidates in a fixed order and return the first one that holds.
//! Each candidate must pass two tests:
//!
//! * width: sigma'^2 < sigma_s^2 / 2, checked without calling the oracle;
//! * hardness: LWE with secret width sigma' is secure enough to carry the
//!   claim.
//!
//! The scans are sequential by construction: their order is the tie-break.

pub mod inverse;

use std::f64::consts::{LN_2, PI};

use log::{debug, info};

use crate::error::{HintLweError, Result};
use crate::estimator::HardnessOracle;
use crate::params::LweInstance;

/// Highest candidate the decision scan starts from when the baseline
/// estimate is infinite.
pub const SCAN_CAP: u32 = 1024;

/// Which reduction to search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReductionStrategy {
    /// Corollary 1: fixed loss, descending scan over kappa'.
    Decision { loss: u32 },
    /// Corollary 2: ascending scan over the loss l in 1..=max_hints.
    Search { max_hints: u32 },
}

impl ReductionStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ReductionStrategy::Decision { .. } => "decision",
            ReductionStrategy::Search { .. } => "search",
        }
    }
}

/// One row of the reduction tables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReductionResult {
    pub logn: u32,
    /// Loss l of the reduction.
    pub hints: u32,
    /// HintLWE security kappa' the reduction certifies.
    pub derived_security: f64,
    /// Residual secret variance sigma'^2.
    pub residual_secret_variance: f64,
    /// log2 of the flooding standard deviation, once computed.
    pub flooding_stddev_bits: Option<f64>,
}

impl ReductionResult {
    pub fn with_flooding(mut self, bits: f64) -> Self {
        self.flooding_stddev_bits = Some(bits);
        self
    }
}

/// Residual secret variance of the decision reduction claiming `kappa_prime`.
pub fn decision_residual_variance(logn: u32, kappa_prime: f64) -> f64 {
    let tail = (((kappa_prime + 2.0) / 2.0).exp2() + 1.0).ln();
    (4f64.ln() + logn as f64 * LN_2 + tail) / (PI * PI)
}

/// Residual secret variance of the search reduction with loss `hints`.
pub fn search_residual_variance(logn: u32, hints: u32) -> f64 {
    let tail = (-(-(hints as f64) / 2.0).exp2()).ln_1p();
    (4f64.ln() + logn as f64 * LN_2 - tail) / (PI * PI)
}

/// Width rule shared by every reduction: sigma'^2 < sigma_s^2 / 2.
pub fn accommodates(instance: &LweInstance, variance: f64) -> bool {
    variance < instance.variance_budget()
}

/// Estimated security of `instance` with its secret narrowed to variance `variance`.
pub(crate) fn residual_security<O>(oracle: &O, instance: &LweInstance, variance: f64) -> Result<f64>
where
    O: HardnessOracle + ?Sized,
{
    let narrowed = instance.with_secret_sigma(variance.sqrt())?;
    let bits = oracle.estimate(&narrowed);
    debug!("{} with sigma'^2 = {:.6}: {:.3} bits", instance, variance, bits);
    Ok(bits)
}

/// Exclusive upper end of the descending kappa' scan: floor(original).
pub(crate) fn scan_upper(original_kappa: f64) -> Result<u32> {
    if original_kappa.is_nan() {
        return Err(HintLweError::InvalidParam("baseline security is NaN".into()));
    }
    if original_kappa <= 0.0 {
        return Ok(0);
    }
    Ok(original_kappa.floor().min(SCAN_CAP as f64) as u32)
}

/// Residual variance of an accepted decision candidate, or None.
fn decision_candidate<O>(
    oracle: &O,
    instance: &LweInstance,
    kappa_prime: u32,
    loss: u32,
) -> Result<Option<f64>>
where
    O: HardnessOracle + ?Sized,
{
    let variance = decision_residual_variance(instance.logn, kappa_prime as f64);
    if !accommodates(instance, variance) {
        return Ok(None);
    }
    let kappa = residual_security(oracle, instance, variance)?;
    if kappa_prime as f64 <= kappa - loss as f64 {
        Ok(Some(variance))
    } else {
        Ok(None)
    }
}

/// Acceptance predicate of the decision reduction at one candidate.
pub fn decision_accepts<O>(oracle: &O, instance: &LweInstance, kappa_prime: u32, loss: u32) -> Result<bool>
where
    O: HardnessOracle + ?Sized,
{
    Ok(decision_candidate(oracle, instance, kappa_prime, loss)?.is_some())
}

/// Tightest HintLWE (decision) security of `instance` (Corollary 1).
///
/// Candidates run from floor(original) - 1 down to 0; the first that passes
/// both tests is the largest feasible kappa'.
pub fn hint_lwe_decision_security<O>(
    oracle: &O,
    instance: &LweInstance,
    original_kappa: f64,
    loss: u32,
) -> Result<ReductionResult>
where
    O: HardnessOracle + ?Sized,
{
    for kappa_prime in (0..scan_upper(original_kappa)?).rev() {
        if let Some(variance) = decision_candidate(oracle, instance, kappa_prime, loss)? {
            info!(
                "{}: decision reduction kappa' = {}, sigma'^2 = {:.6}",
                instance, kappa_prime, variance
            );
            return Ok(ReductionResult {
                logn: instance.logn,
                hints: loss,
                derived_security: kappa_prime as f64,
                residual_secret_variance: variance,
                flooding_stddev_bits: None,
            });
        }
    }
    Err(HintLweError::Infeasible {
        logn: instance.logn,
        log_q: instance.log_q,
        hint: "try increasing sigma_s",
    })
}

/// Tightest HintLWE (search) security of `instance` (Corollary 2).
///
/// The loss l is scanned upwards; the first l whose residual variance fits
/// the secret gives kappa' = estimate - l.
pub fn hint_lwe_search_security<O>(oracle: &O, instance: &LweInstance, max_hints: u32) -> Result<ReductionResult>
where
    O: HardnessOracle + ?Sized,
{
    for hints in 1..=max_hints {
        let variance = search_residual_variance(instance.logn, hints);
        if !accommodates(instance, variance) {
            continue;
        }
        let kappa_prime = residual_security(oracle, instance, variance)? - hints as f64;
        info!(
            "{}: search reduction l = {}, kappa' = {:.3}, sigma'^2 = {:.6}",
            instance, hints, kappa_prime, variance
        );
        return Ok(ReductionResult {
            logn: instance.logn,
            hints,
            derived_security: kappa_prime,
            residual_secret_variance: variance,
            flooding_stddev_bits: None,
        });
    }
    Err(HintLweError::Infeasible {
        logn: instance.logn,
        log_q: instance.log_q,
        hint: "increase sigma_s or l_max",
    })
}

/// Run the reduction search selected by `strategy`.
///
/// `original_kappa` is only read by the decision reduction.
pub fn hint_lwe_security<O>(
    oracle: &O,
    strategy: ReductionStrategy,
    instance: &LweInstance,
    original_kappa: f64,
) -> Result<ReductionResult>
where
    O: HardnessOracle + ?Sized,
{
    match strategy {
        ReductionStrategy::Decision { loss } => {
            hint_lwe_decision_security(oracle, instance, original_kappa, loss)
        }
        ReductionStrategy::Search { max_hints } => hint_lwe_search_security(oracle, instance, max_hints),
    }
}
