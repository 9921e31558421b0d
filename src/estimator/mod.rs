//! Lattice hardness oracle.
//!
//! The searches in [`crate::reduction`] only see the [`HardnessOracle`]
//! trait: an estimated attack cost in bits for one LWE instance. The crate
//! ships [`LatticeEstimator`], which takes the minimum over a fixed set of
//! named attacks and silently skips attacks that fail or run out of time.
//! Tests plug in closures with a synthetic cost.

pub mod attacks;
pub mod cost;

use std::time::{Duration, Instant};

use log::debug;

use crate::error::Result;
use crate::estimator::attacks::AttackContext;
use crate::estimator::cost::{HermiteTable, RedCostModel, BETA_MAX};
use crate::params::LweInstance;

/// Estimated attack cost, in bits, for an LWE instance.
///
/// `f64::INFINITY` means no attack produced a finite cost and is treated as
/// more secure than any target.
pub trait HardnessOracle: Sync {
    fn estimate(&self, instance: &LweInstance) -> f64;
}

impl<F> HardnessOracle for F
where
    F: Fn(&LweInstance) -> f64 + Sync,
{
    fn estimate(&self, instance: &LweInstance) -> f64 {
        self(instance)
    }
}

/// Baseline security of one instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecurityEstimate {
    pub logn: u32,
    pub bits: f64,
}

impl SecurityEstimate {
    pub fn is_finite(&self) -> bool {
        self.bits.is_finite()
    }
}

/// The attacks the estimator tries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attack {
    PrimalUsvp,
    DualDistinguish,
    PrimalBdd,
    /// Only run for small dimensions, see [`EstimatorConfig::hybrid_max_logn`].
    PrimalHybrid,
}

impl Attack {
    /// Attacks tried on every instance.
    pub const STANDARD: [Attack; 3] = [Attack::PrimalUsvp, Attack::DualDistinguish, Attack::PrimalBdd];

    pub fn name(&self) -> &'static str {
        match self {
            Attack::PrimalUsvp => "primal_usvp",
            Attack::DualDistinguish => "dual",
            Attack::PrimalBdd => "primal_bdd",
            Attack::PrimalHybrid => "primal_hybrid",
        }
    }

    pub fn cost(&self, instance: &LweInstance, ctx: &AttackContext<'_>) -> Result<f64> {
        match self {
            Attack::PrimalUsvp => attacks::primal_usvp(instance, ctx),
            Attack::DualDistinguish => attacks::dual_distinguish(instance, ctx),
            Attack::PrimalBdd => attacks::primal_bdd(instance, ctx),
            Attack::PrimalHybrid => attacks::primal_hybrid(instance, ctx),
        }
    }
}

/// Estimator settings.
#[derive(Clone, Debug, PartialEq)]
pub struct EstimatorConfig {
    pub cost_model: RedCostModel,
    /// Wall-clock budget of a single attack; an attack over budget is skipped.
    pub attack_timeout: Option<Duration>,
    /// The primal hybrid is only tried when logn is at most this.
    pub hybrid_max_logn: u32,
    /// Resolution of the sample-count grid of the dual attack.
    pub sample_steps: u32,
    pub max_beta: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            cost_model: RedCostModel::Matzov,
            attack_timeout: Some(Duration::from_secs(120)),
            hybrid_max_logn: 14,
            sample_steps: 64,
            max_beta: BETA_MAX,
        }
    }
}

impl EstimatorConfig {
    pub fn with_cost_model(mut self, model: RedCostModel) -> Self {
        self.cost_model = model;
        self
    }

    pub fn with_attack_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attack_timeout = timeout;
        self
    }

    pub fn with_hybrid_max_logn(mut self, logn: u32) -> Self {
        self.hybrid_max_logn = logn;
        self
    }

    pub fn with_sample_steps(mut self, steps: u32) -> Self {
        self.sample_steps = steps.max(1);
        self
    }

    pub fn with_max_beta(mut self, beta: u32) -> Self {
        self.max_beta = beta;
        self
    }
}

/// Native lattice estimator: min over the configured attacks.
#[derive(Clone, Debug)]
pub struct LatticeEstimator {
    config: EstimatorConfig,
    table: HermiteTable,
}

impl LatticeEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        let table = HermiteTable::new(config.max_beta);
        Self { config, table }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Attacks tried on `instance`.
    pub fn attacks_for(&self, instance: &LweInstance) -> Vec<Attack> {
        let mut attacks = Attack::STANDARD.to_vec();
        if instance.logn <= self.config.hybrid_max_logn {
            attacks.push(Attack::PrimalHybrid);
        }
        attacks
    }

    /// Run every applicable attack and report each outcome.
    pub fn estimate_attacks(&self, instance: &LweInstance) -> Vec<(Attack, Result<f64>)> {
        self.attacks_for(instance)
            .into_iter()
            .map(|attack| {
                let ctx = AttackContext {
                    model: self.config.cost_model,
                    table: &self.table,
                    sample_steps: self.config.sample_steps,
                    deadline: self
                        .config
                        .attack_timeout
                        .and_then(|timeout| Instant::now().checked_add(timeout)),
                };
                (attack, attack.cost(instance, &ctx))
            })
            .collect()
    }
}

impl Default for LatticeEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}

impl HardnessOracle for LatticeEstimator {
    fn estimate(&self, instance: &LweInstance) -> f64 {
        let mut min_cost = f64::INFINITY;
        for (attack, outcome) in self.estimate_attacks(instance) {
            match outcome {
                Ok(cost) => {
                    debug!("{} {}: {:.3} bits", instance, attack.name(), cost);
                    min_cost = min_cost.min(cost);
                }
                Err(e) => debug!("{} {}: skipped ({})", instance, attack.name(), e),
            }
        }
        min_cost
    }
}
