//! Feature Extraction Engine
//!
//! Runs interdependent feature extractors over a symbolic music piece and
//! its analysis windows. Extractors declare the features they read and at
//! which window offset; the resolver orders them so every dependency is
//! computed first, and the engine fills a [`FeatureMatrix`] with one row per
//! window (or a single row for whole-piece features).
//!
//! ```ignore
//! let registry = FeatureRegistry::new().with(MyFeature::new())?;
//! let engine = ExtractionEngine::from_config(&registry, &ExtractionConfig::default())?;
//! let extraction = engine.run(&sequence, &provider)?;
//! ```

mod config;
mod descriptor;
mod diagnostics;
mod engine;
mod error;
mod extractor;
mod logging;
mod matrix;
mod registry;
mod resolver;
pub mod statistics;

#[cfg(test)]
mod testing;

pub use config::{ExtractionConfig, WindowingConfig};
pub use descriptor::FeatureDescriptor;
pub use diagnostics::{CellDiagnostic, DiagnosticKind};
pub use engine::{Extraction, ExtractionEngine, WindowContext};
pub use error::{EngineError, FeatureError};
pub use extractor::{sentinel, Dependency, DependencyValues, FeatureExtractor, SENTINEL_VALUE};
pub use logging::{init_json_logging, init_logging};
pub use matrix::{FeatureColumn, FeatureMatrix};
pub use registry::FeatureRegistry;
pub use resolver::{resolve, ExecutionPlan, ResolvedDependency};
