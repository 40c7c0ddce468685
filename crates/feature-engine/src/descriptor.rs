//! Feature Descriptors

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Immutable metadata for one feature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    name: String,
    description: String,
    is_sequential: bool,
    dimensions: usize,
    code: Option<String>,
}

impl FeatureDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        is_sequential: bool,
        dimensions: usize,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            is_sequential,
            dimensions,
            code: None,
        }
    }

    /// Attach a stable catalogue code (e.g. "R-25")
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Unique feature name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the feature is computed once per analysis window
    pub fn is_sequential(&self) -> bool {
        self.is_sequential
    }

    /// Length of every vector this feature produces
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Check the invariants the engine relies on
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.name.trim().is_empty() {
            return Err(EngineError::InvalidDescriptor {
                feature: self.name.clone(),
                reason: "name is empty".to_string(),
            });
        }
        if self.dimensions == 0 {
            return Err(EngineError::InvalidDescriptor {
                feature: self.name.clone(),
                reason: "dimensions must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_accessors() {
        let descriptor = FeatureDescriptor::new("Mean Rhythmic Value", "Mean duration", true, 1)
            .with_code("R-25");
        assert_eq!(descriptor.name(), "Mean Rhythmic Value");
        assert!(descriptor.is_sequential());
        assert_eq!(descriptor.dimensions(), 1);
        assert_eq!(descriptor.code(), Some("R-25"));
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn test_invalid_descriptors() {
        assert!(FeatureDescriptor::new("", "x", true, 1).validate().is_err());
        assert!(matches!(
            FeatureDescriptor::new("Empty", "x", true, 0).validate(),
            Err(EngineError::InvalidDescriptor { .. })
        ));
    }
}
