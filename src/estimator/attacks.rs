//! Individual lattice attacks on LWE with a Gaussian secret.
//!
//! Every attack embeds the instance with the secret scaled by
//! nu = max(1, sigma_e / sigma_s), so a narrow secret is balanced against the
//! error. The number of samples is unbounded. The primal attacks pick the
//! embedding dimension in closed form for each block size. The dual attack
//! optimises it over a grid m_k = 2n * k / steps.

use std::f64::consts::{E, PI};
use std::time::Instant;

use crate::error::{HintLweError, Result};
use crate::estimator::cost::{log2_add, HermiteTable, RedCostModel};
use crate::estimator::Attack;
use crate::params::LweInstance;

/// Number of sieve outputs per call, 2^(0.2075 beta); reused as dual vectors.
const SIEVE_OUTPUT_EXPONENT: f64 = 0.2075;

/// Shared inputs of one attack run.
pub struct AttackContext<'a> {
    pub model: RedCostModel,
    pub table: &'a HermiteTable,
    pub sample_steps: u32,
    pub deadline: Option<Instant>,
}

impl AttackContext<'_> {
    fn check_deadline(&self, attack: Attack) -> Result<()> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                Err(HintLweError::AttackTimeout(attack.name()))
            }
            _ => Ok(()),
        }
    }
}

/// log-scale geometry of the rescaled embedding.
#[derive(Clone, Copy, Debug)]
struct Embedding {
    /// Secret dimension.
    n: f64,
    log_q: f64,
    log_sigma_e: f64,
    /// log2 of the secret scaling factor nu.
    log_nu: f64,
}

impl Embedding {
    fn new(instance: &LweInstance) -> Self {
        Self {
            n: instance.ring_degree(),
            log_q: instance.log_q as f64,
            log_sigma_e: instance.error_sigma.log2(),
            log_nu: (instance.error_sigma / instance.secret_sigma).log2().max(0.0),
        }
    }

    /// Same instance after `guessed` secret coordinates have been fixed.
    fn without(&self, guessed: f64) -> Self {
        Self {
            n: self.n - guessed,
            ..*self
        }
    }

    fn samples(&self, steps: u32) -> impl Iterator<Item = f64> {
        let n = self.n;
        (1..=steps).map(move |k| (2.0 * n * k as f64 / steps as f64).floor().max(1.0))
    }

    /// Primal dimension d = n + m + 1 maximising the GSA norm of the last
    /// Gram-Schmidt vectors after BKZ with root-Hermite factor 2^log_delta.
    /// The number of samples is capped at 2 sqrt(n log q / log delta).
    fn primal_dimension(&self, log_delta: f64) -> f64 {
        let cap = 2.0 * (self.n * self.log_q / log_delta).sqrt().ceil();
        let stationary = ((self.log_q * (self.n + 1.0) - self.n * self.log_nu).max(0.0) / log_delta).sqrt();
        stationary.clamp(self.n + 1.0, self.n + cap + 1.0).round()
    }

    /// log2 Vol(L)^(1/d) of the d-dimensional primal embedding.
    fn primal_log_volume(&self, d: f64) -> f64 {
        ((d - self.n - 1.0) * self.log_q + self.n * self.log_nu) / d
    }
}

fn finish(attack: Attack, best: f64) -> Result<f64> {
    if best.is_finite() {
        Ok(best)
    } else {
        Err(HintLweError::AttackFailed {
            attack: attack.name(),
            reason: "no block size in range solves the instance".into(),
        })
    }
}

/// Primal attack solving the embedded uSVP instance with BKZ alone.
///
/// Succeeds with block size beta once the projection of the planted vector,
/// sigma_e * sqrt(beta - 1), drops below the GSA length of b*_{d-beta}.
pub fn primal_usvp(instance: &LweInstance, ctx: &AttackContext<'_>) -> Result<f64> {
    let emb = Embedding::new(instance);

    for beta in ctx.table.betas(f64::INFINITY) {
        ctx.check_deadline(Attack::PrimalUsvp)?;
        let b = beta as f64;
        let log_delta = ctx.table.get(beta);
        let d = emb.primal_dimension(log_delta);
        if b > d {
            break;
        }
        let lhs = emb.log_sigma_e + 0.5 * (b - 1.0).log2();
        let rhs = (2.0 * b - d - 1.0) * log_delta + emb.primal_log_volume(d);
        if lhs <= rhs {
            return Ok(ctx.model.bkz_cost(b, d));
        }
    }

    finish(Attack::PrimalUsvp, f64::INFINITY)
}

/// Dual distinguishing attack.
///
/// A short dual vector of length l = delta^d * (q / nu)^(n/d) turns each
/// sample into a Gaussian of width l * sigma_e mod q, whose advantage is
/// exp(-2 pi^2 (l sigma_e / q)^2). Sieving yields 2^(0.2075 beta) such
/// vectors per reduction, the rest are paid for by repetition.
pub fn dual_distinguish(instance: &LweInstance, ctx: &AttackContext<'_>) -> Result<f64> {
    let emb = Embedding::new(instance);
    let mut best = f64::INFINITY;

    for m in emb.samples(ctx.sample_steps) {
        ctx.check_deadline(Attack::DualDistinguish)?;
        let d = emb.n + m;
        let log_vol = emb.n / d * (emb.log_q - emb.log_nu);

        for beta in ctx.table.betas(d) {
            let b = beta as f64;
            let log_len = d * ctx.table.get(beta) + log_vol;
            let log_rel_width = log_len + emb.log_sigma_e - emb.log_q;
            // advantage underflows; larger blocks give shorter vectors
            if log_rel_width > 16.0 {
                continue;
            }
            let log_samples = 4.0 * PI * PI * (2.0 * log_rel_width).exp2() * E.log2();
            let repetitions = (log_samples - SIEVE_OUTPUT_EXPONENT * b).max(0.0);
            best = best.min(ctx.model.bkz_cost(b, d) + repetitions);
            // no repetitions left: larger blocks only cost more
            if repetitions == 0.0 {
                break;
            }
        }
    }

    finish(Attack::DualDistinguish, best)
}

/// Cheapest primal BDD decoding of `emb`, paying `guess_bits` extra for
/// every final sieve call.
fn bdd_cost(emb: &Embedding, guess_bits: f64, attack: Attack, ctx: &AttackContext<'_>) -> Result<f64> {
    let log_gh_const = 0.5 * (2.0 * PI * E).log2();
    let mut best = f64::INFINITY;

    for beta in ctx.table.betas(f64::INFINITY) {
        ctx.check_deadline(attack)?;
        let b = beta as f64;
        let log_delta = ctx.table.get(beta);
        let d = emb.primal_dimension(log_delta);
        if b > d {
            break;
        }
        // smallest eta with sigma_e * sqrt(eta) below the Gaussian heuristic
        // of the last eta GSA vectors
        let eta = (d + (emb.log_sigma_e + log_gh_const - emb.primal_log_volume(d)) / log_delta)
            .ceil()
            .max(b);
        if eta > d {
            continue;
        }
        let cost = log2_add(
            ctx.model.bkz_cost(b, d),
            guess_bits + ctx.model.svp_cost(eta),
        );
        best = best.min(cost);
    }
    Ok(best)
}

/// Primal attack: BKZ-beta followed by one sieve in dimension eta >= beta.
pub fn primal_bdd(instance: &LweInstance, ctx: &AttackContext<'_>) -> Result<f64> {
    let emb = Embedding::new(instance);
    let best = bdd_cost(&emb, 0.0, Attack::PrimalBdd, ctx)?;
    finish(Attack::PrimalBdd, best)
}

/// Numbers of guessed coordinates the hybrid tries: 0, 1, 2, 4, ... up to n / 2.
fn guess_counts(n: f64) -> impl Iterator<Item = f64> {
    let half = (n / 2.0).floor();
    std::iter::once(0.0).chain(
        (0..)
            .map(|k: i32| 2f64.powi(k))
            .take_while(move |&zeta| zeta <= half),
    )
}

/// Primal hybrid without meet-in-the-middle and without Babai: exhaustively
/// guess zeta secret coordinates, then BDD on the remaining n - zeta.
pub fn primal_hybrid(instance: &LweInstance, ctx: &AttackContext<'_>) -> Result<f64> {
    let emb = Embedding::new(instance);
    // entropy of one discrete Gaussian coordinate
    let entropy = (instance.secret_sigma * (2.0 * PI * E).sqrt()).log2().max(0.0);
    let mut best = f64::INFINITY;

    for zeta in guess_counts(emb.n) {
        let cost = bdd_cost(&emb.without(zeta), zeta * entropy, Attack::PrimalHybrid, ctx)?;
        best = best.min(cost);
    }

    finish(Attack::PrimalHybrid, best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(table: &HermiteTable) -> AttackContext<'_> {
        AttackContext {
            model: RedCostModel::Matzov,
            table,
            sample_steps: 16,
            deadline: None,
        }
    }

    #[test]
    fn test_usvp_reference_range() {
        let table = HermiteTable::default();
        let inst = LweInstance::new(10, 28, 3.19, 3.19).unwrap();
        let bits = primal_usvp(&inst, &ctx(&table)).unwrap();
        assert!(bits > 100.0 && bits < 170.0, "uSVP cost {}", bits);
    }

    #[test]
    fn test_dual_reference_range() {
        let table = HermiteTable::default();
        let c = ctx(&table);
        let strong = LweInstance::new(10, 28, 3.19, 3.19).unwrap();
        let weak = LweInstance::new(10, 40, 3.19, 3.19).unwrap();
        let bits = dual_distinguish(&strong, &c).unwrap();
        assert!(bits > 100.0 && bits < 170.0, "dual cost {}", bits);
        assert!(dual_distinguish(&weak, &c).unwrap() < bits);
    }

    #[test]
    fn test_larger_modulus_is_weaker() {
        let table = HermiteTable::default();
        let c = ctx(&table);
        let strong = LweInstance::new(10, 28, 3.19, 3.19).unwrap();
        let weak = LweInstance::new(10, 40, 3.19, 3.19).unwrap();
        assert!(primal_usvp(&weak, &c).unwrap() < primal_usvp(&strong, &c).unwrap());
        assert!(primal_bdd(&weak, &c).unwrap() < primal_bdd(&strong, &c).unwrap());
    }

    #[test]
    fn test_narrow_secret_is_weaker() {
        let table = HermiteTable::default();
        let c = ctx(&table);
        let wide = LweInstance::new(10, 28, 3.19, 3.19).unwrap();
        let narrow = wide.with_secret_sigma(1.0).unwrap();
        let attacks: [fn(&LweInstance, &AttackContext<'_>) -> Result<f64>; 3] =
            [primal_usvp, dual_distinguish, primal_bdd];
        for attack in attacks {
            assert!(attack(&narrow, &c).unwrap() <= attack(&wide, &c).unwrap());
        }
    }

    #[test]
    fn test_hybrid_tracks_bdd() {
        let table = HermiteTable::default();
        let c = ctx(&table);
        for (logn, log_q) in [(10, 28), (12, 108)] {
            let inst = LweInstance::new(logn, log_q, 3.19, 3.19).unwrap();
            let bdd = primal_bdd(&inst, &c).unwrap();
            let hybrid = primal_hybrid(&inst, &c).unwrap();
            // zeta = 0 is plain BDD, a few guesses cost at most a few bits
            assert!(hybrid <= bdd, "hybrid {} above bdd {}", hybrid, bdd);
            assert!(hybrid > bdd - 3.0, "hybrid {} far below bdd {}", hybrid, bdd);
        }
    }

    #[test]
    fn test_guess_counts() {
        let counts: Vec<f64> = guess_counts(1024.0).collect();
        assert_eq!(counts.first(), Some(&0.0));
        assert_eq!(counts.last(), Some(&512.0));
        assert_eq!(counts.len(), 11);
    }

    #[test]
    fn test_primal_dimension_stays_in_range() {
        let table = HermiteTable::default();
        let emb = Embedding::new(&LweInstance::new(13, 216, 3.19, 3.19).unwrap());
        for beta in [40, 334, 1000] {
            let d = emb.primal_dimension(table.get(beta));
            assert!(d >= emb.n + 1.0, "beta {} gave d = {}", beta, d);
        }
        // far too small a modulus for any samples to help
        let tiny = Embedding::new(&LweInstance::new(11, 4, 3.19, 3.19).unwrap());
        assert_eq!(tiny.primal_dimension(table.get(60)), tiny.n + 1.0);
    }

    #[test]
    fn test_unsolvable_instance_fails() {
        // q far too small relative to the error: no block size helps
        let table = HermiteTable::new(200);
        let inst = LweInstance::new(11, 4, 3.19, 3.19).unwrap();
        assert!(matches!(
            primal_usvp(&inst, &ctx(&table)),
            Err(HintLweError::AttackFailed { .. })
        ));
    }

    #[test]
    fn test_expired_deadline_times_out() {
        let table = HermiteTable::new(200);
        let inst = LweInstance::new(10, 28, 3.19, 3.19).unwrap();
        let c = AttackContext {
            deadline: Some(Instant::now()),
            ..ctx(&table)
        };
        assert!(matches!(
            primal_hybrid(&inst, &c),
            Err(HintLweError::AttackTimeout(_))
        ));
    }
}
