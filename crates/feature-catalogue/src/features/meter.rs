//! Meter features read from time signature metadata

use feature_engine::{
    sentinel, DependencyValues, FeatureDescriptor, FeatureError, FeatureExtractor,
};
use symbolic_repr::{IntermediateRepresentation, NoteSequence};

/// 1.0 if the initial meter is compound, 0.0 if simple
#[derive(Debug, Clone)]
pub struct CompoundOrSimpleMeter {
    descriptor: FeatureDescriptor,
}

impl CompoundOrSimpleMeter {
    pub const NAME: &'static str = "Compound Or Simple Meter";

    pub fn new() -> Self {
        Self {
            descriptor: FeatureDescriptor::new(
                Self::NAME,
                "Set to 1 if the initial meter is compound (numerator of time signature is \
                 greater than or equal to 6 and is evenly divisible by 3) and to 0 if it is \
                 simple (if the above condition is not fulfilled).",
                true,
                1,
            )
            .with_code("R-32"),
        }
    }
}

impl Default for CompoundOrSimpleMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for CompoundOrSimpleMeter {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn compute(
        &self,
        _sequence: &NoteSequence,
        representation: &IntermediateRepresentation,
        _dependencies: &DependencyValues<'_>,
    ) -> Result<Vec<f64>, FeatureError> {
        let compound = representation
            .metadata
            .time_signature_numerators
            .first()
            .map_or(false, |&n| n >= 6 && n % 3 == 0);
        Ok(vec![if compound { 1.0 } else { 0.0 }])
    }
}

/// Numerator and denominator of the first time signature in the piece
#[derive(Debug, Clone)]
pub struct InitialTimeSignature {
    descriptor: FeatureDescriptor,
}

impl InitialTimeSignature {
    pub const NAME: &'static str = "Initial Time Signature";

    pub fn new() -> Self {
        Self {
            descriptor: FeatureDescriptor::new(
                Self::NAME,
                "A feature array with two elements. The first is the numerator of the first \
                 occurring time signature and the second is the denominator.",
                false,
                2,
            ),
        }
    }
}

impl Default for InitialTimeSignature {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for InitialTimeSignature {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn compute(
        &self,
        _sequence: &NoteSequence,
        representation: &IntermediateRepresentation,
        _dependencies: &DependencyValues<'_>,
    ) -> Result<Vec<f64>, FeatureError> {
        let metadata = &representation.metadata;
        match (
            metadata.time_signature_numerators.first(),
            metadata.time_signature_denominators.first(),
        ) {
            (Some(&numerator), Some(&denominator)) => {
                Ok(vec![f64::from(numerator), f64::from(denominator)])
            }
            _ => Ok(sentinel(2)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symbolic_repr::Metadata;

    fn with_signature(numerators: Vec<u32>, denominators: Vec<u32>) -> IntermediateRepresentation {
        IntermediateRepresentation {
            metadata: Metadata {
                time_signature_numerators: numerators,
                time_signature_denominators: denominators,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn meter(representation: &IntermediateRepresentation) -> f64 {
        CompoundOrSimpleMeter::new()
            .compute(&NoteSequence::default(), representation, &DependencyValues::none())
            .unwrap()[0]
    }

    #[test]
    fn test_compound_meters() {
        assert_eq!(meter(&with_signature(vec![6], vec![8])), 1.0);
        assert_eq!(meter(&with_signature(vec![12, 4], vec![8, 4])), 1.0);
    }

    #[test]
    fn test_simple_meters() {
        assert_eq!(meter(&with_signature(vec![3], vec![4])), 0.0);
        assert_eq!(meter(&with_signature(vec![4, 6], vec![4, 8])), 0.0);
        assert_eq!(meter(&with_signature(vec![8], vec![8])), 0.0);
    }

    #[test]
    fn test_no_time_signature_is_simple() {
        assert_eq!(meter(&IntermediateRepresentation::default()), 0.0);
    }

    #[test]
    fn test_initial_time_signature() {
        let values = InitialTimeSignature::new()
            .compute(
                &NoteSequence::default(),
                &with_signature(vec![3, 4], vec![4, 4]),
                &DependencyValues::none(),
            )
            .unwrap();
        assert_eq!(values, vec![3.0, 4.0]);
        assert!(!InitialTimeSignature::new().descriptor().is_sequential());
    }

    #[test]
    fn test_initial_time_signature_missing() {
        let values = InitialTimeSignature::new()
            .compute(
                &NoteSequence::default(),
                &IntermediateRepresentation::default(),
                &DependencyValues::none(),
            )
            .unwrap();
        assert_eq!(values, vec![-1.0, -1.0]);
    }
}
