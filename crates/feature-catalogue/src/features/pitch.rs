use feature_engine::statistics::max_value;
use feature_engine::{
    sentinel, DependencyValues, FeatureDescriptor, FeatureError, FeatureExtractor,
};
use symbolic_repr::{IntermediateRepresentation, NoteSequence};

/// Fraction of Note Ons belonging to the most common pitch class
#[derive(Debug, Clone)]
pub struct MostCommonPitchClassPrevalence {
    descriptor: FeatureDescriptor,
}

impl MostCommonPitchClassPrevalence {
    pub const NAME: &'static str = "Most Common Pitch Class Prevalence";

    pub fn new() -> Self {
        Self {
            descriptor: FeatureDescriptor::new(
                Self::NAME,
                "Fraction of Note Ons corresponding to the most common pitch class.",
                true,
                1,
            ),
        }
    }
}

impl Default for MostCommonPitchClassPrevalence {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for MostCommonPitchClassPrevalence {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn compute(
        &self,
        _sequence: &NoteSequence,
        representation: &IntermediateRepresentation,
        _dependencies: &DependencyValues<'_>,
    ) -> Result<Vec<f64>, FeatureError> {
        Ok(max_value(&representation.pitch_class_histogram)
            .map(|max| vec![max.max(0.0)])
            .unwrap_or_else(|| sentinel(1)))
    }
}
