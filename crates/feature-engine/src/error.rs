//! Engine Error Types

use symbolic_repr::ReprError;
use thiserror::Error;

/// Fatal errors raised before or around an extraction run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A declared dependency has no registered extractor
    #[error("Feature '{dependent}' depends on unregistered feature '{missing}'")]
    UnknownDependency { dependent: String, missing: String },

    /// The dependency graph contains a cycle
    #[error("Cyclic feature dependency: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// Two extractors share a name
    #[error("Feature '{0}' is registered more than once")]
    DuplicateFeature(String),

    /// Descriptor metadata is unusable
    #[error("Invalid descriptor for feature '{feature}': {reason}")]
    InvalidDescriptor { feature: String, reason: String },

    /// Dependency names and offsets disagree in length
    #[error("Feature '{feature}' declares {names} dependencies but {offsets} offsets")]
    OffsetCountMismatch {
        feature: String,
        names: usize,
        offsets: usize,
    },

    /// A feature requested for extraction is not registered
    #[error("Unknown feature requested: '{0}'")]
    UnknownFeature(String),

    /// Configuration could not be loaded or is out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// Window planning or representation building failed
    #[error(transparent)]
    Representation(#[from] ReprError),
}

/// Failures while computing a single (feature, window) cell.
///
/// These never abort a run; the engine logs them and stores the sentinel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Returned vector length disagrees with the descriptor
    #[error("Dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Inputs are structurally insufficient for the formula
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Any other failure raised by an extractor
    #[error("Extraction failed: {0}")]
    Runtime(String),
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::Config(err.to_string())
    }
}
