pub mod security;
pub mod presets;

use std::fmt;

use crate::error::{HintLweError, Result};

/// One concrete (R)LWE parameterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LweInstance {
    /// log2 of the ring/lattice dimension n.
    pub logn: u32,
    /// log2 of the ciphertext modulus Q.
    pub log_q: u32,
    /// Standard deviation of the discrete Gaussian secret.
    pub secret_sigma: f64,
    /// Standard deviation of the discrete Gaussian error.
    pub error_sigma: f64,
}

impl LweInstance {
    pub fn new(logn: u32, log_q: u32, secret_sigma: f64, error_sigma: f64) -> Result<Self> {
        if logn == 0 || logn > 30 {
            return Err(HintLweError::InvalidParam(format!(
                "logn must be in [1, 30], got {}",
                logn
            )));
        }
        if log_q == 0 {
            return Err(HintLweError::InvalidParam("logQ must be positive".into()));
        }
        check_sigma("secret sigma", secret_sigma)?;
        check_sigma("error sigma", error_sigma)?;

        Ok(Self {
            logn,
            log_q,
            secret_sigma,
            error_sigma,
        })
    }

    /// Same instance with a narrower (or wider) secret.
    pub fn with_secret_sigma(&self, secret_sigma: f64) -> Result<Self> {
        Self::new(self.logn, self.log_q, secret_sigma, self.error_sigma)
    }

    /// Lattice dimension n = 2^logn.
    pub fn ring_degree(&self) -> f64 {
        (self.logn as f64).exp2()
    }

    pub fn secret_variance(&self) -> f64 {
        self.secret_sigma * self.secret_sigma
    }

    /// Largest residual secret variance a hint reduction may leave: sigma_s^2 / 2.
    pub fn variance_budget(&self) -> f64 {
        self.secret_variance() / 2.0
    }
}

impl fmt::Display for LweInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.logn, self.log_q, self.secret_sigma, self.error_sigma
        )
    }
}

fn check_sigma(what: &str, sigma: f64) -> Result<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(HintLweError::InvalidParam(format!(
            "{} must be finite and positive, got {}",
            what, sigma
        )));
    }
    Ok(())
}

/// Settings shared by the parameter sweeps.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepParams {
    /// Tightness loss l of the decision reduction.
    pub decision_loss: u32,
    /// Upper end of the hint-loss range scanned by the search reduction.
    pub max_hints: u32,
    /// Number of decryption queries t.
    pub queries: f64,
    /// Rescaled-noise magnitudes 1..=max_rescaled_noise are tabulated.
    pub max_rescaled_noise: u32,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            decision_loss: 4,
            max_hints: 128,
            queries: 64.0,
            max_rescaled_noise: 40,
        }
    }
}

/// Builder for SweepParams.
pub struct SweepParamsBuilder {
    decision_loss: u32,
    max_hints: u32,
    queries: f64,
    max_rescaled_noise: u32,
}

impl SweepParamsBuilder {
    pub fn new() -> Self {
        let defaults = SweepParams::default();
        Self {
            decision_loss: defaults.decision_loss,
            max_hints: defaults.max_hints,
            queries: defaults.queries,
            max_rescaled_noise: defaults.max_rescaled_noise,
        }
    }

    pub fn decision_loss(mut self, l: u32) -> Self {
        self.decision_loss = l;
        self
    }

    pub fn max_hints(mut self, l_max: u32) -> Self {
        self.max_hints = l_max;
        self
    }

    pub fn queries(mut self, t: f64) -> Self {
        self.queries = t;
        self
    }

    pub fn max_rescaled_noise(mut self, magnitude: u32) -> Self {
        self.max_rescaled_noise = magnitude;
        self
    }

    pub fn build(self) -> Result<SweepParams> {
        if self.max_hints == 0 {
            return Err(HintLweError::InvalidParam("l_max must be >= 1".into()));
        }
        if !self.queries.is_finite() || self.queries < 1.0 {
            return Err(HintLweError::InvalidParam(format!(
                "number of queries must be >= 1, got {}",
                self.queries
            )));
        }
        if self.max_rescaled_noise == 0 {
            return Err(HintLweError::InvalidParam(
                "max rescaled noise magnitude must be >= 1".into(),
            ));
        }

        Ok(SweepParams {
            decision_loss: self.decision_loss,
            max_hints: self.max_hints,
            queries: self.queries,
            max_rescaled_noise: self.max_rescaled_noise,
        })
    }
}

impl Default for SweepParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_validation() {
        assert!(LweInstance::new(13, 216, 3.19, 3.19).is_ok());
        assert!(LweInstance::new(0, 216, 3.19, 3.19).is_err());
        assert!(LweInstance::new(13, 0, 3.19, 3.19).is_err());
        assert!(LweInstance::new(13, 216, 0.0, 3.19).is_err());
        assert!(LweInstance::new(13, 216, 3.19, -1.0).is_err());
        assert!(LweInstance::new(13, 216, f64::NAN, 3.19).is_err());
    }

    #[test]
    fn test_variance_budget() {
        let inst = LweInstance::new(13, 216, 3.19, 3.19).unwrap();
        assert!((inst.variance_budget() - 5.08805).abs() < 1e-9);
        assert_eq!(inst.ring_degree(), 8192.0);
    }

    #[test]
    fn test_builder_defaults() {
        let params = SweepParamsBuilder::new().build().unwrap();
        assert_eq!(params, SweepParams::default());
        assert_eq!(params.decision_loss, 4);
        assert_eq!(params.max_hints, 128);

        assert!(SweepParamsBuilder::new().max_hints(0).build().is_err());
        assert!(SweepParamsBuilder::new().queries(0.5).build().is_err());
    }
}
