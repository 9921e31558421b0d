use crate::error::Result;
use crate::params::LweInstance;

/// Gaussian width used for both secret and error in the HE Standard tables.
pub const HE_STANDARD_SIGMA: f64 = 3.19;

/// (logn, logQ) pairs of the 128-bit "Gaussian" column of Table 5.2 of the
/// HE Community Guidelines.
pub const HE_STANDARD_128_GAUSSIAN: &[(u32, u32)] = &[
    (10, 28),
    (11, 55),
    (12, 108),
    (13, 216),
    (14, 432),
    (15, 870),
    (16, 1749),
    (17, 3525),
];

/// Baseline LWE security of the reference instance (lattice-estimator, MATZOV).
pub const REFERENCE_ORIGINAL_SECURITY: f64 = 128.193639623478;

/// Tightest decision-reduction HintLWE security for the reference instance (l = 4).
pub const REFERENCE_DECISION_KAPPA_PRIME: f64 = 112.0;
pub const REFERENCE_DECISION_SIGMA_PRIME_SQ: f64 = 5.05659547963317;

/// Tightest search-reduction HintLWE security for the reference instance (l = 1).
pub const REFERENCE_SEARCH_KAPPA_PRIME: f64 = 126.198049311874;
pub const REFERENCE_SEARCH_SIGMA_PRIME_SQ: f64 = 1.17787445304450;

/// The eight 128-bit parameter sets of the HE Standard, Gaussian secret and error.
pub fn he_standard_gaussian_128() -> Result<Vec<LweInstance>> {
    HE_STANDARD_128_GAUSSIAN
        .iter()
        .map(|&(logn, log_q)| LweInstance::new(logn, log_q, HE_STANDARD_SIGMA, HE_STANDARD_SIGMA))
        .collect()
}

/// n = 2^13, log Q = 216: the parameter set the decryption-security experiments use.
pub fn reference_instance() -> Result<LweInstance> {
    LweInstance::new(13, 216, HE_STANDARD_SIGMA, HE_STANDARD_SIGMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = he_standard_gaussian_128().unwrap();
        assert_eq!(table.len(), 8);
        assert_eq!(table[3], reference_instance().unwrap());
        assert!(table.windows(2).all(|w| w[0].logn + 1 == w[1].logn));
    }
}
