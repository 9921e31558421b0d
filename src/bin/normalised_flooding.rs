use hintlwe::estimator::LatticeEstimator;
use hintlwe::logging;
use hintlwe::params::presets::he_standard_gaussian_128;
use hintlwe::params::security::original_bit_security_levels;
use hintlwe::params::SweepParamsBuilder;
use hintlwe::reduction::inverse::FloodingTarget;
use hintlwe::report;
use hintlwe::sweep::{decision_normalised_sweep, search_normalised_sweep};
use log::info;

type AppResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const TARGET_SECURITY: f64 = 120.0;
/// Just below the crossover point of the reference instance.
const RESCALED_NOISE_LOG2: f64 = 20.0;

fn main() -> AppResult<()> {
    logging::init()?;
    let params = SweepParamsBuilder::new().build()?;
    let estimator = LatticeEstimator::default();
    let instances = he_standard_gaussian_128()?;
    info!("estimating with the {} cost model", estimator.config().cost_model.name());
    let levels = original_bit_security_levels(&estimator, &instances);

    let target = FloodingTarget::new(TARGET_SECURITY, params.queries, RESCALED_NOISE_LOG2)?;
    println!("# flooding for a target security of {}", target.security);

    let decision = decision_normalised_sweep(&estimator, &instances, &levels, params.decision_loss, &target)?;
    let reductions: Vec<_> = decision.iter().map(|row| row.reduction).collect();
    println!("decision_kappa_primes={}", report::derived_security(&reductions));
    println!("decision_flooding={}", report::flooding(&decision));
    println!("decision_normalised={}", report::normalised_flooding(&decision));
    println!();

    let search = search_normalised_sweep(&estimator, &instances, params.max_hints, &target)?;
    let reductions: Vec<_> = search.iter().map(|row| row.reduction).collect();
    println!("search_kappa_primes={}", report::derived_security(&reductions));
    println!("search_hints={}", report::hints(&reductions));
    println!("search_flooding={}", report::flooding(&search));
    println!("search_normalised={}", report::normalised_flooding(&search));
    Ok(())
}
