//! Feature Extractor Plugin Contract

use crate::descriptor::FeatureDescriptor;
use crate::error::{EngineError, FeatureError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use symbolic_repr::{IntermediateRepresentation, NoteSequence};

/// Value stored for a cell whose feature could not be computed
pub const SENTINEL_VALUE: f64 = -1.0;

/// Sentinel vector of the given length
pub fn sentinel(dimensions: usize) -> Vec<f64> {
    vec![SENTINEL_VALUE; dimensions]
}

/// A named dependency read at a window offset relative to the current window
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    name: String,
    offset: i32,
}

impl Dependency {
    pub fn new(name: impl Into<String>, offset: i32) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }

    /// Dependency on the same window being computed
    pub fn current(name: impl Into<String>) -> Self {
        Self::new(name, 0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 0 = same window, negative = earlier window, positive = later window
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Pair parallel name/offset lists.
    ///
    /// Missing offsets mean every dependency reads the current window.
    pub fn aligned(
        feature: &str,
        names: &[&str],
        offsets: Option<&[i32]>,
    ) -> Result<Vec<Dependency>, EngineError> {
        match offsets {
            None => Ok(names.iter().map(|name| Dependency::current(*name)).collect()),
            Some(offsets) if offsets.len() == names.len() => Ok(names
                .iter()
                .zip(offsets)
                .map(|(name, offset)| Dependency::new(*name, *offset))
                .collect()),
            Some(offsets) => Err(EngineError::OffsetCountMismatch {
                feature: feature.to_string(),
                names: names.len(),
                offsets: offsets.len(),
            }),
        }
    }
}

/// Dependency vectors handed to [`FeatureExtractor::compute`], indexed in
/// declaration order
#[derive(Debug, Clone, Default)]
pub struct DependencyValues<'a> {
    values: Vec<Cow<'a, [f64]>>,
    available: Vec<bool>,
}

impl<'a> DependencyValues<'a> {
    /// No dependencies
    pub fn none() -> Self {
        Self::default()
    }

    /// Owned, fully available values (for driving extractors directly)
    pub fn from_vectors(vectors: Vec<Vec<f64>>) -> Self {
        let available = vec![true; vectors.len()];
        Self {
            values: vectors.into_iter().map(Cow::Owned).collect(),
            available,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            available: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push_available(&mut self, values: &'a [f64]) {
        self.values.push(Cow::Borrowed(values));
        self.available.push(true);
    }

    /// Record an out-of-range dependency as a zero vector
    pub(crate) fn push_unavailable(&mut self, dimensions: usize) {
        self.values.push(Cow::Owned(vec![0.0; dimensions]));
        self.available.push(false);
    }

    /// Vector of the i-th dependency (zeros if it was out of range)
    pub fn get(&self, index: usize) -> Option<&[f64]> {
        self.values.get(index).map(|v| v.as_ref())
    }

    /// Like [`get`](Self::get), failing with a descriptive error
    pub fn require(&self, index: usize) -> Result<&[f64], FeatureError> {
        self.get(index).ok_or_else(|| {
            FeatureError::InsufficientData(format!("dependency {} was not supplied", index))
        })
    }

    /// False when the engine substituted the zero default
    pub fn is_available(&self, index: usize) -> bool {
        self.available.get(index).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A single feature. Implementations must be pure functions of their inputs:
/// the engine calls the same instance for every window, possibly from
/// several threads at once.
pub trait FeatureExtractor: Send + Sync {
    fn descriptor(&self) -> &FeatureDescriptor;

    /// Declared dependencies in order; empty when the feature has none
    fn dependencies(&self) -> &[Dependency] {
        &[]
    }

    /// Dependency names and offsets as parallel lists
    fn dependency_lists(&self) -> (Vec<&str>, Vec<i32>) {
        self.dependencies()
            .iter()
            .map(|d| (d.name(), d.offset()))
            .unzip()
    }

    /// Compute one vector of `descriptor().dimensions()` values.
    ///
    /// `dependencies.get(i)` is the value of the i-th declared dependency at
    /// its offset. Degenerate inputs should yield [`SENTINEL_VALUE`] entries
    /// rather than an error.
    fn compute(
        &self,
        sequence: &NoteSequence,
        representation: &IntermediateRepresentation,
        dependencies: &DependencyValues<'_>,
    ) -> Result<Vec<f64>, FeatureError>;
}
