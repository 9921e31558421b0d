use thiserror::Error;

#[derive(Debug, Error)]
pub enum HintLweError {
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    #[error("attack {attack} failed: {reason}")]
    AttackFailed { attack: &'static str, reason: String },

    #[error("attack {0} exceeded its time budget")]
    AttackTimeout(&'static str),

    #[error("parameters (logn={logn}, logQ={log_q}) do not accommodate the reduction: {hint}")]
    Infeasible {
        logn: u32,
        log_q: u32,
        hint: &'static str,
    },

    #[error("flooding loss must be at least 1 bit, got {0}")]
    LossTooSmall(f64),
}

pub type Result<T> = std::result::Result<T, HintLweError>;
