//! # hintlwe: security of LWE with hints
//!
//! Bit-security estimates for HintLWE and the noise flooding needed to keep
//! decryption queries safe (IND-CPA-D and key recovery under decryption).
//!
//! A HintLWE instance is reduced to plain LWE with a narrower secret. The
//! crate searches for the tightest such reduction against a lattice
//! hardness oracle, then sizes the flooding noise with one of three
//! bounds, optionally taking the hint channel into account.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hintlwe::prelude::*;
//!
//! let estimator = LatticeEstimator::default();
//! let instance = hintlwe::params::presets::reference_instance().unwrap();
//!
//! let original = estimator.estimate(&instance);
//! let decision = hint_lwe_decision_security(&estimator, &instance, original, 4).unwrap();
//! let search = hint_lwe_search_security(&estimator, &instance, 128).unwrap();
//! println!("{} {}", decision.derived_security, search.derived_security);
//! ```

pub mod error;
pub mod params;
pub mod estimator;
pub mod reduction;
pub mod flooding;
pub mod sweep;
pub mod report;
pub mod logging;

/// Convenient re-exports for common types and functions.
pub mod prelude {
    pub use crate::error::{HintLweError, Result};
    pub use crate::params::{LweInstance, SweepParams, SweepParamsBuilder};
    pub use crate::estimator::{
        Attack, EstimatorConfig, HardnessOracle, LatticeEstimator, SecurityEstimate,
    };
    pub use crate::estimator::cost::RedCostModel;
    pub use crate::reduction::{
        ReductionResult, ReductionStrategy,
        hint_lwe_security, hint_lwe_decision_security, hint_lwe_search_security,
    };
    pub use crate::reduction::inverse::{
        FloodingTarget,
        hint_lwe_decision_normalised_noise_flooding, hint_lwe_search_normalised_noise_flooding,
    };
    pub use crate::flooding::{
        FloodingStrategy, HintLeakage,
        prior_flooding_noise, bit_security_flooding_noise, union_bound_flooding_noise,
        hint_lwe_flooding_noise,
    };
    pub use crate::sweep::{DecryptionExperiment, FloodingRow, NoiseTable};
}
