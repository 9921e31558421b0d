use hintlwe::estimator::LatticeEstimator;
use hintlwe::logging;
use hintlwe::params::presets::he_standard_gaussian_128;
use hintlwe::params::security::original_bit_security_levels;
use hintlwe::params::SweepParamsBuilder;
use hintlwe::reduction::ReductionStrategy;
use hintlwe::report;
use hintlwe::sweep::reduction_sweep;
use log::info;

type AppResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn main() -> AppResult<()> {
    logging::init()?;
    let params = SweepParamsBuilder::new().build()?;
    let estimator = LatticeEstimator::default();
    let instances = he_standard_gaussian_128()?;
    info!("estimating with the {} cost model", estimator.config().cost_model.name());

    let levels = original_bit_security_levels(&estimator, &instances);
    println!("# original_security_levels={}", report::baseline_levels(&levels));
    println!();

    let strategy = ReductionStrategy::Decision { loss: params.decision_loss };
    let decision = reduction_sweep(&estimator, &instances, &levels, strategy)?;
    println!("decision_kappa_primes={}", report::derived_security(&decision));
    println!("decision_sigma_primes={}", report::residual_variance(&decision));
    println!();

    let strategy = ReductionStrategy::Search { max_hints: params.max_hints };
    let search = reduction_sweep(&estimator, &instances, &levels, strategy)?;
    println!("search_kappa_primes={}", report::derived_security(&search));
    println!("search_sigma_primes={}", report::residual_variance(&search));
    println!("search_hints={}", report::hints(&search));
    Ok(())
}
