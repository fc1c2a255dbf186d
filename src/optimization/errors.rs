use argmin::core::{ArgminError, Error};

use crate::forecasting::errors::HWError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Bounds ----
    /// Lower and upper bound vectors have different lengths.
    BoundsLengthMismatch {
        lower: usize,
        upper: usize,
    },

    /// A search box needs at least one dimension.
    EmptyBounds,

    /// Bound pair must be finite with lower < upper.
    InvalidBounds {
        index: usize,
        lower: f64,
        upper: f64,
        reason: &'static str,
    },

    // ---- Starting point ----
    /// Starting point dimension does not match the box.
    StartDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Starting point coordinate lies outside the box.
    StartOutOfBounds {
        index: usize,
        value: f64,
    },

    // ---- DEOptions ----
    /// Population multiplier must be positive.
    InvalidPopulationSize {
        size: usize,
        reason: &'static str,
    },
    /// Mutation (dither) range must satisfy 0 <= lower <= upper <= 2.
    InvalidMutation {
        lower: f64,
        upper: f64,
        reason: &'static str,
    },
    /// Crossover probability must lie in [0, 1].
    InvalidCrossover {
        value: f64,
        reason: &'static str,
    },
    /// Convergence tolerance must be finite and non-negative.
    InvalidTolerance {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// Time budget must be non-zero.
    InvalidTimeBudget,

    // ---- NelderMeadOptions ----
    /// Initial simplex step must be finite and positive.
    InvalidSimplexStep {
        step: f64,
        reason: &'static str,
    },

    /// Invalid search strategy name.
    InvalidStrategy {
        name: String,
        reason: &'static str,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Search outcome ----
    /// Best point must be finite.
    InvalidXHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Solver finished without recording a best point.
    MissingBestParam,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Model errors ----
    /// Objective evaluation failed inside the forecasting stack.
    Model {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Bounds ----
            OptError::BoundsLengthMismatch { lower, upper } => {
                write!(f, "Bounds length mismatch: {lower} lower vs {upper} upper")
            }
            OptError::EmptyBounds => {
                write!(f, "Search box must have at least one dimension")
            }
            OptError::InvalidBounds { index, lower, upper, reason } => {
                write!(f, "Invalid bounds at index {index}: [{lower}, {upper}]: {reason}")
            }

            // ---- Starting point ----
            OptError::StartDimMismatch { expected, found } => {
                write!(f, "Starting point dimension mismatch: expected {expected}, found {found}")
            }
            OptError::StartOutOfBounds { index, value } => {
                write!(f, "Starting point coordinate {index} = {value} lies outside the box")
            }

            // ---- DEOptions ----
            OptError::InvalidPopulationSize { size, reason } => {
                write!(f, "Invalid population size {size}: {reason}")
            }
            OptError::InvalidMutation { lower, upper, reason } => {
                write!(f, "Invalid mutation range ({lower}, {upper}): {reason}")
            }
            OptError::InvalidCrossover { value, reason } => {
                write!(f, "Invalid crossover probability {value}: {reason}")
            }
            OptError::InvalidTolerance { tol, reason } => {
                write!(f, "Invalid convergence tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::InvalidTimeBudget => {
                write!(f, "Time budget must be greater than zero")
            }

            // ---- NelderMeadOptions ----
            OptError::InvalidSimplexStep { step, reason } => {
                write!(f, "Invalid initial simplex step {step}: {reason}")
            }
            OptError::InvalidStrategy { name, reason } => {
                write!(f, "Invalid search strategy '{name}': {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Search outcome ----
            OptError::InvalidXHat { index, value, reason } => {
                write!(f, "Invalid best point at index {index}: {value}: {reason}")
            }
            OptError::MissingBestParam => {
                write!(f, "Missing best point (x hat)")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Model errors ----
            OptError::Model { text } => {
                write!(f, "Objective evaluation failed: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised by our own adapter travel through argmin boxed; recover them first.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<HWError> for OptError {
    fn from(err: HWError) -> Self {
        OptError::Model { text: err.to_string() }
    }
}

impl From<OptError> for HWError {
    fn from(err: OptError) -> Self {
        HWError::OptimizationFailed { status: err.to_string() }
    }
}
