//! Inverse searches: fix the security the decryption game has to keep and
//! look for the tightest reduction that still leaves one bit of flooding
//! loss above it, then size the flooding noise for that reduction.
//!
//! Boundary comparisons use `achieved - required >= -BOUNDARY_TOLERANCE`.

use log::info;

use crate::error::{HintLweError, Result};
use crate::estimator::HardnessOracle;
use crate::flooding::{
    hint_lwe_flooding_noise, log_total_noise, precision_loss, FloodingStrategy, HintLeakage,
    BOUNDARY_TOLERANCE,
};
use crate::params::LweInstance;
use crate::reduction::{
    accommodates, decision_residual_variance, residual_security, scan_upper, search_residual_variance,
    ReductionResult,
};

/// What the flooding has to achieve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloodingTarget {
    /// Bit security kappa_t the decryption game must retain.
    pub security: f64,
    /// Number of decryption queries t.
    pub queries: f64,
    /// log2 of the rescaled noise bound the flooding covers.
    pub rescaled_noise_log2: f64,
}

impl FloodingTarget {
    pub fn new(security: f64, queries: f64, rescaled_noise_log2: f64) -> Result<Self> {
        if !security.is_finite() || security < 0.0 {
            return Err(HintLweError::InvalidParam(format!(
                "target security must be finite and non-negative, got {}",
                security
            )));
        }
        if !queries.is_finite() || queries < 1.0 {
            return Err(HintLweError::InvalidParam(format!(
                "number of queries must be >= 1, got {}",
                queries
            )));
        }
        if !rescaled_noise_log2.is_finite() {
            return Err(HintLweError::InvalidParam("rescaled noise bound must be finite".into()));
        }
        Ok(Self {
            security,
            queries,
            rescaled_noise_log2,
        })
    }
}

/// Flooding noise for a reduction certifying `kappa_prime` with residual
/// variance `variance`.
fn flooding_for(
    instance: &LweInstance,
    kappa_prime: f64,
    variance: f64,
    target: &FloodingTarget,
) -> Result<f64> {
    let leakage = HintLeakage {
        queries: target.queries,
        ring_degree: instance.ring_degree(),
        sigma_prime_sq: variance,
        sigma_sq: instance.secret_variance(),
    };
    if !kappa_prime.is_finite() {
        // the union bound vanishes as the loss grows without bound
        return leakage.variance_term();
    }
    let strategy = FloodingStrategy::UnionBound {
        queries: target.queries,
        original_security: kappa_prime,
    };
    hint_lwe_flooding_noise(strategy, &leakage, target.rescaled_noise_log2, target.security)
}

/// Flooding width relative to the noise it hides: the extra bits of
/// precision it costs.
pub fn normalised_bits(instance: &LweInstance, flooding_bits: f64, rescaled_noise_log2: f64) -> f64 {
    let log_e = log_total_noise(instance.ring_degree(), instance.secret_sigma, rescaled_noise_log2);
    precision_loss(instance.logn, flooding_bits, log_e)
}

/// Decision reduction sized for a fixed target: the largest kappa' in
/// [ceil(kappa_t + 1), floor(original) - 1] the reduction supports.
pub fn hint_lwe_decision_normalised_noise_flooding<O>(
    oracle: &O,
    instance: &LweInstance,
    original_kappa: f64,
    loss: u32,
    target: &FloodingTarget,
) -> Result<ReductionResult>
where
    O: HardnessOracle + ?Sized,
{
    let upper = scan_upper(original_kappa)?;
    let lower = (target.security + 1.0 - BOUNDARY_TOLERANCE).ceil().max(0.0) as u32;

    for kappa_prime in (lower..upper).rev() {
        let variance = decision_residual_variance(instance.logn, kappa_prime as f64);
        if !accommodates(instance, variance) {
            continue;
        }
        let kappa = residual_security(oracle, instance, variance)?;
        let difference = (kappa - loss as f64) - kappa_prime as f64;
        if difference >= -BOUNDARY_TOLERANCE {
            let flooding = flooding_for(instance, kappa_prime as f64, variance, target)?;
            info!(
                "{}: decision kappa' = {} for target {}, flooding 2^{:.3}",
                instance, kappa_prime, target.security, flooding
            );
            return Ok(ReductionResult {
                logn: instance.logn,
                hints: loss,
                derived_security: kappa_prime as f64,
                residual_secret_variance: variance,
                flooding_stddev_bits: None,
            }
            .with_flooding(flooding));
        }
    }
    Err(HintLweError::Infeasible {
        logn: instance.logn,
        log_q: instance.log_q,
        hint: "no decision reduction clears the target; increase sigma_s",
    })
}

/// Search reduction sized for a fixed target: the smallest loss l whose
/// kappa' = kappa - l stays at least one bit above kappa_t.
pub fn hint_lwe_search_normalised_noise_flooding<O>(
    oracle: &O,
    instance: &LweInstance,
    max_hints: u32,
    target: &FloodingTarget,
) -> Result<ReductionResult>
where
    O: HardnessOracle + ?Sized,
{
    for hints in 1..=max_hints {
        let variance = search_residual_variance(instance.logn, hints);
        if !accommodates(instance, variance) {
            continue;
        }
        let kappa_prime = residual_security(oracle, instance, variance)? - hints as f64;
        let difference = kappa_prime - target.security - 1.0;
        if difference >= -BOUNDARY_TOLERANCE {
            let flooding = flooding_for(instance, kappa_prime, variance, target)?;
            info!(
                "{}: search l = {}, kappa' = {:.3} for target {}, flooding 2^{:.3}",
                instance, hints, kappa_prime, target.security, flooding
            );
            return Ok(ReductionResult {
                logn: instance.logn,
                hints,
                derived_security: kappa_prime,
                residual_secret_variance: variance,
                flooding_stddev_bits: None,
            }
            .with_flooding(flooding));
        }
    }
    Err(HintLweError::Infeasible {
        logn: instance.logn,
        log_q: instance.log_q,
        hint: "no search reduction clears the target; increase sigma_s or l_max",
    })
}
