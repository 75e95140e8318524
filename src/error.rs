use thiserror::Error;

/// Errors produced while configuring or running battle simulations.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid {stat} {value}: {reason}")]
    InvalidStat {
        stat: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("unit '{unit}' has non-positive effective speed {speed}")]
    InvalidSpeed { unit: String, speed: f64 },

    #[error("aggregation requires at least one trial")]
    NoTrials,

    #[error("unknown kit '{0}'")]
    UnknownKit(String),

    #[error("failed to read profile {path}: {source}")]
    ProfileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile {path}: {message}")]
    ProfileParse { path: String, message: String },

    #[error("failed to export damage rows: {0}")]
    Export(#[from] csv::Error),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to gather entropy for seeding: {0}")]
    Entropy(getrandom::Error),
}

pub type SimResult<T> = Result<T, SimError>;
