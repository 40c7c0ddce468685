//! Feature Registry
//!
//! Extractors are constructed up front and inserted explicitly; registration
//! order is kept and used as the tie-break for execution order.

use crate::error::EngineError;
use crate::extractor::FeatureExtractor;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Registered extractors in registration order
#[derive(Clone, Default)]
pub struct FeatureRegistry {
    extractors: Vec<Arc<dyn FeatureExtractor>>,
    index: HashMap<String, usize>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extractor
    pub fn register<E>(&mut self, extractor: E) -> Result<&mut Self, EngineError>
    where
        E: FeatureExtractor + 'static,
    {
        self.register_shared(Arc::new(extractor))
    }

    /// Register an already shared extractor
    pub fn register_shared(
        &mut self,
        extractor: Arc<dyn FeatureExtractor>,
    ) -> Result<&mut Self, EngineError> {
        let descriptor = extractor.descriptor();
        descriptor.validate()?;

        let name = descriptor.name().to_string();
        if self.index.contains_key(&name) {
            return Err(EngineError::DuplicateFeature(name));
        }

        debug!(
            "Registered feature '{}' ({} dependencies)",
            name,
            extractor.dependencies().len()
        );
        self.index.insert(name, self.extractors.len());
        self.extractors.push(extractor);
        Ok(self)
    }

    /// Builder-style registration
    pub fn with<E>(mut self, extractor: E) -> Result<Self, EngineError>
    where
        E: FeatureExtractor + 'static,
    {
        self.register(extractor)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn FeatureExtractor>> {
        self.index.get(name).map(|&i| &self.extractors[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All extractors in registration order
    pub fn extractors(&self) -> &[Arc<dyn FeatureExtractor>] {
        &self.extractors
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.extractors.iter().map(|e| e.descriptor().name())
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Extractors needed to compute `names`: the requested features plus
    /// everything they transitively depend on, in registration order.
    ///
    /// An empty request selects every registered feature. Dependencies that
    /// are not registered are left for the resolver to report.
    pub fn select<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<Arc<dyn FeatureExtractor>>, EngineError> {
        if names.is_empty() {
            return Ok(self.extractors.clone());
        }

        let mut selected = vec![false; self.extractors.len()];
        let mut stack = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let &idx = self
                .index
                .get(name)
                .ok_or_else(|| EngineError::UnknownFeature(name.to_string()))?;
            stack.push(idx);
        }

        while let Some(idx) = stack.pop() {
            if selected[idx] {
                continue;
            }
            selected[idx] = true;
            for dependency in self.extractors[idx].dependencies() {
                if let Some(&dep_idx) = self.index.get(dependency.name()) {
                    stack.push(dep_idx);
                }
            }
        }

        let chosen: Vec<_> = self
            .extractors
            .iter()
            .zip(selected)
            .filter(|(_, keep)| *keep)
            .map(|(e, _)| Arc::clone(e))
            .collect();

        info!(
            "Selected {} features ({} requested, {} registered)",
            chosen.len(),
            names.len(),
            self.extractors.len()
        );
        Ok(chosen)
    }
}

impl std::fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureRegistry")
            .field("features", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestFeature;

    fn registry() -> FeatureRegistry {
        FeatureRegistry::new()
            .with(TestFeature::constant("A", 1.0))
            .unwrap()
            .with(TestFeature::constant("B", 2.0).depends_on("A", 0))
            .unwrap()
            .with(TestFeature::constant("C", 3.0))
            .unwrap()
            .with(TestFeature::constant("D", 4.0).depends_on("B", -1))
            .unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = registry();
        assert_eq!(registry.len(), 4);
        assert!(registry.contains("C"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = registry();
        let err = registry.register(TestFeature::constant("A", 9.0)).unwrap_err();
        assert_eq!(err, EngineError::DuplicateFeature("A".to_string()));
    }

    #[test]
    fn test_invalid_descriptor_rejected() {
        let mut registry = FeatureRegistry::new();
        let result = registry.register(TestFeature::constant("Zero", 0.0).with_dimensions(0));
        assert!(matches!(result, Err(EngineError::InvalidDescriptor { .. })));
    }

    #[test]
    fn test_select_pulls_in_dependencies() {
        let registry = registry();
        let selected = registry.select(&["D"]).unwrap();
        let names: Vec<_> = selected.iter().map(|e| e.descriptor().name()).collect();
        assert_eq!(names, vec!["A", "B", "D"]);
    }

    #[test]
    fn test_select_empty_means_all() {
        let registry = registry();
        let none: [&str; 0] = [];
        assert_eq!(registry.select(&none).unwrap().len(), 4);
    }

    #[test]
    fn test_select_unknown() {
        let registry = registry();
        assert_eq!(
            registry.select(&["Nope"]).err(),
            Some(EngineError::UnknownFeature("Nope".to_string()))
        );
    }
}
