use hintlwe::logging;
use hintlwe::params::SweepParamsBuilder;
use hintlwe::report;
use hintlwe::sweep::ind_cpa_d_experiment;

type AppResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn main() -> AppResult<()> {
    logging::init()?;
    let params = SweepParamsBuilder::new().build()?;
    let experiment = ind_cpa_d_experiment(&params)?;
    let tables = experiment.run()?;
    print!("{}", report::experiment(&experiment, &tables));
    Ok(())
}
