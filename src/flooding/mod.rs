//! Noise-flooding requirements.
//!
//! All quantities are log2 of a standard deviation (or of a 2-norm bound).
//! `log_e` is the log of the total noise bound E the flooding has to hide,
//! `target` is the bit security the decryption-query game must retain.

use std::f64::consts::{E, PI};

use crate::error::{HintLweError, Result};

/// Slack allowed on boundary comparisons that sit exactly on a feasibility
/// edge (achieved - required >= -BOUNDARY_TOLERANCE).
pub const BOUNDARY_TOLERANCE: f64 = 1e-10;

/// Flooding from the prior art: a flat union bound over t queries.
pub fn prior_flooding_noise(queries: f64, log_e: f64, target: f64) -> f64 {
    log_e + target / 2.0 + (64.0 * queries).log2() / 2.0
}

/// Flooding from the bit-security argument (Theorem 3).
pub fn bit_security_flooding_noise(log_e: f64, target: f64) -> f64 {
    log_e + target / 2.0 + 4f64.log2() / 2.0
}

/// Flooding with the union bound taken over all t queries and all loss
/// levels (Section 6.3). The loss `original - target` must be at least one
/// bit, up to [`BOUNDARY_TOLERANCE`].
pub fn union_bound_flooding_noise(queries: f64, log_e: f64, original: f64, target: f64) -> Result<f64> {
    let loss = original - target;
    if !(loss - 1.0 >= -BOUNDARY_TOLERANCE) {
        return Err(HintLweError::LossTooSmall(loss));
    }
    Ok((2.0 * original * queries * E.log2()).log2() / 2.0 + log_e - loss.log2())
}

/// The three flooding bounds, selectable per experiment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FloodingStrategy {
    Prior { queries: f64 },
    BitSecurity,
    UnionBound { queries: f64, original_security: f64 },
}

impl FloodingStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            FloodingStrategy::Prior { .. } => "prior",
            FloodingStrategy::BitSecurity => "bit_security",
            FloodingStrategy::UnionBound { .. } => "union_bound",
        }
    }

    pub fn flooding_noise(&self, log_e: f64, target: f64) -> Result<f64> {
        match *self {
            FloodingStrategy::Prior { queries } => Ok(prior_flooding_noise(queries, log_e, target)),
            FloodingStrategy::BitSecurity => Ok(bit_security_flooding_noise(log_e, target)),
            FloodingStrategy::UnionBound {
                queries,
                original_security,
            } => union_bound_flooding_noise(queries, log_e, original_security, target),
        }
    }
}

/// Worst-case bound on |[A]_q / q|_2^2 (canonical norm in the ring setting).
pub fn worst_case_ata(n: f64) -> f64 {
    let x = 2.0 * n / PI;
    x * x + 1.0
}

/// Flooding needed to hide the hints leaked by t decryptions when the secret
/// variance drops from `sigma_sq` to `sigma_prime_sq`.
pub fn hint_variance_term(queries: f64, ata_bound: f64, sigma_prime_sq: f64, sigma_sq: f64) -> Result<f64> {
    let slack = 1.0 / (2.0 * sigma_prime_sq) - 1.0 / sigma_sq;
    if !(slack > 0.0) {
        return Err(HintLweError::InvalidParam(format!(
            "secret variance {} leaves no room for residual variance {}",
            sigma_sq, sigma_prime_sq
        )));
    }
    if !(queries >= 1.0) || !(ata_bound > 0.0) {
        return Err(HintLweError::InvalidParam(format!(
            "need t >= 1 and a positive hint bound, got t={}, bound={}",
            queries, ata_bound
        )));
    }
    // natural log on the slack, as in the published figures
    Ok((queries.log2() + ata_bound.log2() - slack.ln()) / 2.0)
}

/// What a HintLWE reduction leaks per decryption.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HintLeakage {
    pub queries: f64,
    pub ring_degree: f64,
    /// Residual secret variance sigma'^2 of the reduction.
    pub sigma_prime_sq: f64,
    /// Variance of the original secret.
    pub sigma_sq: f64,
}

impl HintLeakage {
    pub fn variance_term(&self) -> Result<f64> {
        hint_variance_term(
            self.queries,
            worst_case_ata(self.ring_degree),
            self.sigma_prime_sq,
            self.sigma_sq,
        )
    }
}

/// Flooding for the HintLWE route: enough to cover both the hint channel
/// and the generic decryption channel on the rescaled noise.
pub fn hint_lwe_flooding_noise(
    strategy: FloodingStrategy,
    leakage: &HintLeakage,
    rescaled_noise_bound: f64,
    target: f64,
) -> Result<f64> {
    let hint = leakage.variance_term()?;
    let generic = strategy.flooding_noise(rescaled_noise_bound, target)?;
    Ok(generic.max(hint))
}

/// 2-norm bound on the rescaling noise ([A]_q s - [b]_q) / q.
pub fn rescaling_noise(n: f64, secret_sigma: f64) -> f64 {
    worst_case_ata(n).sqrt() * n.sqrt() * secret_sigma + 0.5
}

/// log2 of the total noise bound when the rescaled noise is 2^magnitude.
pub fn log_total_noise(n: f64, secret_sigma: f64, rescaled_magnitude: f64) -> f64 {
    (rescaled_magnitude.exp2() + rescaling_noise(n, secret_sigma)).log2()
}

/// Extra bits of precision lost to flooding: sqrt(n) * sigma / |error|_2.
pub fn precision_loss(logn: u32, log_sigma: f64, log_total_noise: f64) -> f64 {
    logn as f64 / 2.0 + log_sigma - log_total_noise
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: f64 = 8192.0;
    const SIGMA_SQ: f64 = 3.19 * 3.19;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_crossover_point() {
        assert!(close(rescaling_noise(N, 3.19).log2(), 20.5220608000984));
    }

    #[test]
    fn test_ind_cpa_d_first_row() {
        let log_e = log_total_noise(N, 3.19, 1.0);
        let target = 112.0 - 4.0 - 12f64.log2();
        assert!(close(target, 104.415037499279));

        let prior = prior_flooding_noise(64.0, log_e, target);
        assert!(close(prior, 78.7295814659711));
        assert!(close(precision_loss(13, prior, log_e), 64.7075187496394));
        assert!(close(bit_security_flooding_noise(log_e, target), 73.7295814659711));

        let leakage = HintLeakage {
            queries: 64.0,
            ring_degree: N,
            sigma_prime_sq: 5.05659547963317,
            sigma_sq: SIGMA_SQ,
        };
        let hint = hint_lwe_flooding_noise(FloodingStrategy::BitSecurity, &leakage, 1.0, target).unwrap();
        assert!(close(hint, 54.2075187496394));
    }

    #[test]
    fn test_kr_d_first_row() {
        let log_e = log_total_noise(N, 3.19, 1.0);
        let target = 126.198049311874 - 1.0;
        let bits = union_bound_flooding_noise(64.0, log_e, 128.193639623478, target).unwrap();
        assert!(close(bits, 26.2046960108318));

        let leakage = HintLeakage {
            queries: 64.0,
            ring_degree: N,
            sigma_prime_sq: 1.17787445304450,
            sigma_sq: SIGMA_SQ,
        };
        let strategy = FloodingStrategy::UnionBound {
            queries: 64.0,
            original_security: target + 1.0,
        };
        let low = hint_lwe_flooding_noise(strategy, &leakage, 1.0, target).unwrap();
        assert!(close(low, 15.9085894304852));
        assert!(close(precision_loss(13, low, log_e), 1.88652671415356));
        // past the crossover the generic term dominates
        let high = hint_lwe_flooding_noise(strategy, &leakage, 9.0, target).unwrap();
        assert!(close(high, 16.2541560864811));
    }

    #[test]
    fn test_hint_lwe_is_max_of_terms() {
        let fixtures = [
            (64.0, 5.05659547963317, 1.0, 104.415037499279),
            (64.0, 5.05659547963317, 30.0, 104.415037499279),
            (1024.0, 1.17787445304450, 12.0, 80.0),
            (2.0, 0.5, 40.0, 128.0),
        ];
        for (queries, sigma_prime_sq, bound, target) in fixtures {
            let leakage = HintLeakage {
                queries,
                ring_degree: N,
                sigma_prime_sq,
                sigma_sq: SIGMA_SQ,
            };
            let strategy = FloodingStrategy::BitSecurity;
            let got = hint_lwe_flooding_noise(strategy, &leakage, bound, target).unwrap();
            let hint = hint_variance_term(queries, worst_case_ata(N), sigma_prime_sq, SIGMA_SQ).unwrap();
            let generic = bit_security_flooding_noise(bound, target);
            assert!(close(got, hint.max(generic)));
        }
    }

    #[test]
    fn test_flooding_is_pure() {
        let strategies = [
            FloodingStrategy::Prior { queries: 64.0 },
            FloodingStrategy::BitSecurity,
            FloodingStrategy::UnionBound {
                queries: 64.0,
                original_security: 128.0,
            },
        ];
        for strategy in strategies {
            let a = strategy.flooding_noise(30.0, 110.0).unwrap();
            let b = strategy.flooding_noise(30.0, 110.0).unwrap();
            assert_eq!(a.to_bits(), b.to_bits(), "{}", strategy.name());
        }
    }

    #[test]
    fn test_union_bound_needs_a_bit_of_loss() {
        assert!(matches!(
            union_bound_flooding_noise(64.0, 20.0, 128.0, 127.5),
            Err(HintLweError::LossTooSmall(_))
        ));
        assert!(union_bound_flooding_noise(64.0, 20.0, 128.0, 127.0).is_ok());
    }

    #[test]
    fn test_hint_term_rejects_wide_residual() {
        // sigma'^2 >= sigma^2 / 2: nothing left to flood
        assert!(hint_variance_term(64.0, worst_case_ata(N), SIGMA_SQ / 2.0, SIGMA_SQ).is_err());
    }

    #[test]
    fn test_union_bound_beats_prior() {
        let prior = prior_flooding_noise(64.0, 20.0, 100.0);
        let union = union_bound_flooding_noise(64.0, 20.0, 128.0, 100.0).unwrap();
        assert!(union < prior);
    }
}
