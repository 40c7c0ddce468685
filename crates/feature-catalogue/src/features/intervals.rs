//! Vertical interval features

use feature_engine::statistics::wrap_histogram;
use feature_engine::{
    Dependency, DependencyValues, FeatureDescriptor, FeatureError, FeatureExtractor,
};
use symbolic_repr::{IntermediateRepresentation, NoteSequence, PITCH_CLASS_COUNT};

const UNISON: usize = 0;
const PERFECT_FOURTH: usize = 5;
const PERFECT_FIFTH: usize = 7;

/// Vertical intervals folded into one octave, as fractions of all intervals
#[derive(Debug, Clone)]
pub struct WrappedVerticalIntervalHistogram {
    descriptor: FeatureDescriptor,
}

impl WrappedVerticalIntervalHistogram {
    pub const NAME: &'static str = "Wrapped Vertical Interval Histogram";

    pub fn new() -> Self {
        Self {
            descriptor: FeatureDescriptor::new(
                Self::NAME,
                "Fraction of vertical intervals at each interval class, with octaves folded together.",
                true,
                PITCH_CLASS_COUNT,
            ),
        }
    }
}

impl Default for WrappedVerticalIntervalHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for WrappedVerticalIntervalHistogram {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn compute(
        &self,
        _sequence: &NoteSequence,
        representation: &IntermediateRepresentation,
        _dependencies: &DependencyValues<'_>,
    ) -> Result<Vec<f64>, FeatureError> {
        let mut wrapped =
            wrap_histogram(&representation.vertical_interval_histogram, PITCH_CLASS_COUNT);
        let total: f64 = wrapped.iter().sum();
        if total > 0.0 {
            wrapped.iter_mut().for_each(|v| *v /= total);
        }
        Ok(wrapped)
    }
}

/// Unisons, fourths, and fifths as a fraction of all vertical intervals
#[derive(Debug, Clone)]
pub struct PerfectVerticalIntervals {
    descriptor: FeatureDescriptor,
    dependencies: Vec<Dependency>,
}

impl PerfectVerticalIntervals {
    pub const NAME: &'static str = "Perfect Vertical Intervals";

    pub fn new() -> Self {
        Self {
            descriptor: FeatureDescriptor::new(
                Self::NAME,
                "Fraction of all vertical intervals that are perfect intervals.",
                true,
                1,
            )
            .with_code("C-20"),
            dependencies: vec![Dependency::current(WrappedVerticalIntervalHistogram::NAME)],
        }
    }
}

impl Default for PerfectVerticalIntervals {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for PerfectVerticalIntervals {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    fn compute(
        &self,
        _sequence: &NoteSequence,
        _representation: &IntermediateRepresentation,
        dependencies: &DependencyValues<'_>,
    ) -> Result<Vec<f64>, FeatureError> {
        let histogram = dependencies.require(0)?;
        if histogram.len() < PITCH_CLASS_COUNT {
            return Err(FeatureError::DimensionMismatch {
                expected: PITCH_CLASS_COUNT,
                actual: histogram.len(),
            });
        }
        Ok(vec![
            histogram[UNISON] + histogram[PERFECT_FOURTH] + histogram[PERFECT_FIFTH],
        ])
    }
}
