//! Printing results as literal mappings, one table per line.

use std::fmt::Display;

use crate::estimator::SecurityEstimate;
use crate::reduction::ReductionResult;
use crate::sweep::{DecryptionExperiment, FloodingRow, NoiseTable};

/// `[(k0, v0), (k1, v1), ...]`
pub fn mapping<K, V, I>(entries: I) -> String
where
    K: Display,
    V: Display,
    I: IntoIterator<Item = (K, V)>,
{
    let body = entries
        .into_iter()
        .map(|(k, v)| format!("({}, {})", k, v))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", body)
}

pub fn baseline_levels(levels: &[SecurityEstimate]) -> String {
    mapping(levels.iter().map(|e| (e.logn, e.bits)))
}

/// logn -> kappa'
pub fn derived_security(rows: &[ReductionResult]) -> String {
    mapping(rows.iter().map(|r| (r.logn, r.derived_security)))
}

/// logn -> sigma'^2
pub fn residual_variance(rows: &[ReductionResult]) -> String {
    mapping(rows.iter().map(|r| (r.logn, r.residual_secret_variance)))
}

/// logn -> l
pub fn hints(rows: &[ReductionResult]) -> String {
    mapping(rows.iter().map(|r| (r.logn, r.hints)))
}

pub fn flooding(rows: &[FloodingRow]) -> String {
    mapping(
        rows.iter()
            .filter_map(|r| r.reduction.flooding_stddev_bits.map(|bits| (r.reduction.logn, bits))),
    )
}

pub fn normalised_flooding(rows: &[FloodingRow]) -> String {
    mapping(rows.iter().map(|r| (r.reduction.logn, r.normalised_bits)))
}

/// Two lines: magnitude -> absolute flooding, magnitude -> extra precision bits.
pub fn noise_table(table: &NoiseTable) -> (String, String) {
    (
        mapping(table.rows.iter().map(|r| (r.magnitude, r.absolute))),
        mapping(table.rows.iter().map(|r| (r.magnitude, r.additional))),
    )
}

/// Full printout of a decryption experiment: target, crossover point, then
/// absolute and additional noise per column.
pub fn experiment(exp: &DecryptionExperiment, tables: &[NoiseTable]) -> String {
    let mut out = format!("# noise flooding to achieve a security level of {}\n", exp.target);
    out += &format!(
        "# cross over point (rescaling noise = rescaled noise) at {}\n",
        exp.crossover_point()
    );
    out += "# absolute noise:\n";
    for table in tables {
        out += &format!("#\t{}: {}\n", table.name, noise_table(table).0);
    }
    out += "# additional noise:\n";
    for table in tables {
        out += &format!("#\t{}: {}\n", table.name, noise_table(table).1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SweepParams;
    use crate::sweep::{ind_cpa_d_experiment, NoiseRow};

    #[test]
    fn test_mapping_format() {
        assert_eq!(mapping(Vec::<(u32, f64)>::new()), "[]");
        assert_eq!(mapping([(10, 1.5), (11, 2.0)]), "[(10, 1.5), (11, 2)]");
    }

    #[test]
    fn test_reduction_tables() {
        let rows = [ReductionResult {
            logn: 13,
            hints: 4,
            derived_security: 112.0,
            residual_secret_variance: 5.25,
            flooding_stddev_bits: None,
        }];
        assert_eq!(derived_security(&rows), "[(13, 112)]");
        assert_eq!(residual_variance(&rows), "[(13, 5.25)]");
        assert_eq!(hints(&rows), "[(13, 4)]");
    }

    #[test]
    fn test_noise_table_lines() {
        let table = NoiseTable {
            name: "prior",
            rows: vec![NoiseRow {
                magnitude: 1,
                absolute: 78.5,
                additional: 64.25,
            }],
        };
        let (absolute, additional) = noise_table(&table);
        assert_eq!(absolute, "[(1, 78.5)]");
        assert_eq!(additional, "[(1, 64.25)]");
    }

    #[test]
    fn test_experiment_lists_every_column() {
        let exp = ind_cpa_d_experiment(&SweepParams::default()).unwrap();
        let tables = exp.run().unwrap();
        let text = experiment(&exp, &tables);
        assert!(text.starts_with("# noise flooding to achieve a security level of 104.41"));
        for name in ["prior", "bit_security", "hint_lwe"] {
            assert_eq!(text.matches(&format!("#\t{}: [(1, ", name)).count(), 2);
        }
    }
}
