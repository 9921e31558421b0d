//! Baseline LWE security of parameter sets.
//!
//! Thin layer over a [`HardnessOracle`]: the bit security of each instance
//! with its own secret width, used as the starting point of the decision
//! reduction search.

use log::{info, warn};
use rayon::prelude::*;

use crate::estimator::{HardnessOracle, SecurityEstimate};
use crate::params::LweInstance;

/// Estimate the security level (in bits) of every instance.
///
/// Instances are independent, so they are estimated in parallel; the output
/// keeps the input order.
pub fn original_bit_security_levels<O>(oracle: &O, instances: &[LweInstance]) -> Vec<SecurityEstimate>
where
    O: HardnessOracle + ?Sized,
{
    instances
        .par_iter()
        .map(|instance| {
            let estimate = SecurityEstimate {
                logn: instance.logn,
                bits: oracle.estimate(instance),
            };
            if estimate.is_finite() {
                info!("{}: baseline security {:.3} bits", instance, estimate.bits);
            } else {
                warn!("{}: no attack gave a finite cost", instance);
            }
            estimate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::presets::he_standard_gaussian_128;

    #[test]
    fn test_levels_keep_order() {
        let oracle = |inst: &LweInstance| 100.0 + inst.logn as f64;
        let table = he_standard_gaussian_128().unwrap();
        let levels = original_bit_security_levels(&oracle, &table);
        assert_eq!(levels.len(), table.len());
        for (level, inst) in levels.iter().zip(&table) {
            assert_eq!(level.logn, inst.logn);
            assert_eq!(level.bits, 100.0 + inst.logn as f64);
        }
    }

    #[test]
    fn test_infinite_levels_are_kept() {
        let oracle = |_: &LweInstance| f64::INFINITY;
        let table = he_standard_gaussian_128().unwrap();
        let levels = original_bit_security_levels(&oracle, &table);
        assert_eq!(levels.len(), table.len());
        assert!(levels.iter().all(|level| !level.is_finite()));
    }
}
