//! Rhythm features

use feature_engine::statistics::mean;
use feature_engine::{
    sentinel, DependencyValues, FeatureDescriptor, FeatureError, FeatureExtractor,
};
use symbolic_repr::{IntermediateRepresentation, NoteSequence};

#[derive(Debug, Clone)]
pub struct MeanRhythmicValue {
    descriptor: FeatureDescriptor,
}

impl MeanRhythmicValue {
    pub const NAME: &'static str = "Mean Rhythmic Value";

    pub fn new() -> Self {
        Self {
            descriptor: FeatureDescriptor::new(
                Self::NAME,
                "The mean rhythmic value of the music, in quarter note units. Includes both \
                 pitched and unpitched notes and is not influenced by tempo.",
                true,
                1,
            )
            .with_code("R-25"),
        }
    }
}

impl Default for MeanRhythmicValue {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for MeanRhythmicValue {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn compute(
        &self,
        _sequence: &NoteSequence,
        representation: &IntermediateRepresentation,
        _dependencies: &DependencyValues<'_>,
    ) -> Result<Vec<f64>, FeatureError> {
        Ok(mean(&representation.rhythmic_values)
            .map(|m| vec![m])
            .unwrap_or_else(|| sentinel(1)))
    }
}

/// Ratio between the bin labels of the two strongest beat histogram peaks
#[derive(Debug, Clone)]
pub struct HarmonicityOfTwoStrongestRhythmicPulses {
    descriptor: FeatureDescriptor,
}

impl HarmonicityOfTwoStrongestRhythmicPulses {
    pub const NAME: &'static str = "Harmonicity of Two Strongest Rhythmic Pulses";

    pub fn new() -> Self {
        Self {
            descriptor: FeatureDescriptor::new(
                Self::NAME,
                "The bin label of the higher (in terms of bin label) of the two beat bins of \
                 the peaks with the highest frequency divided by the bin label of the lower.",
                true,
                1,
            ),
        }
    }
}

impl Default for HarmonicityOfTwoStrongestRhythmicPulses {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for HarmonicityOfTwoStrongestRhythmicPulses {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn compute(
        &self,
        _sequence: &NoteSequence,
        representation: &IntermediateRepresentation,
        _dependencies: &DependencyValues<'_>,
    ) -> Result<Vec<f64>, FeatureError> {
        let histogram = &representation.beat_histogram;

        // Both labels start at 1 so an empty or flat histogram yields 1/1.
        // Strict comparison keeps the first bin on ties.
        let mut max = 0.0;
        let mut max_index = 1usize;
        for (bin, &value) in histogram.iter().enumerate() {
            if value > max {
                max = value;
                max_index = bin;
            }
        }

        let mut second = 0.0;
        let mut second_index = 1usize;
        for (bin, &value) in histogram.iter().enumerate() {
            if value > second && bin != max_index {
                second = value;
                second_index = bin;
            }
        }

        let (high, low) = if max_index > second_index {
            (max_index, second_index)
        } else {
            (second_index, max_index)
        };
        if low == 0 {
            return Err(FeatureError::InsufficientData(
                "strongest pulse falls in bin 0".to_string(),
            ));
        }
        // Bin labels divide as integers
        Ok(vec![(high / low) as f64])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn harmonicity(histogram: Vec<f64>) -> Result<Vec<f64>, FeatureError> {
        let representation = IntermediateRepresentation {
            beat_histogram: histogram,
            ..Default::default()
        };
        HarmonicityOfTwoStrongestRhythmicPulses::new().compute(
            &NoteSequence::default(),
            &representation,
            &DependencyValues::none(),
        )
    }

    #[test]
    fn test_mean_rhythmic_value() {
        let representation = IntermediateRepresentation {
            rhythmic_values: vec![1.0, 0.5, 0.5, 2.0],
            ..Default::default()
        };
        let values = MeanRhythmicValue::new()
            .compute(&NoteSequence::default(), &representation, &DependencyValues::none())
            .unwrap();
        assert_eq!(values, vec![1.0]);
    }

    #[test]
    fn test_mean_rhythmic_value_without_notes() {
        let values = MeanRhythmicValue::new()
            .compute(
                &NoteSequence::default(),
                &IntermediateRepresentation::default(),
                &DependencyValues::none(),
            )
            .unwrap();
        assert_eq!(values, vec![-1.0]);
    }

    #[test]
    fn test_higher_label_over_lower() {
        assert_eq!(harmonicity(vec![0.1, 0.9, 0.3, 0.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_labels_divide_as_integers() {
        let mut histogram = vec![0.0; 200];
        histogram[60] = 0.8;
        histogram[140] = 0.5;
        assert_eq!(harmonicity(histogram).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_first_bin_wins_ties() {
        let mut histogram = vec![0.0; 10];
        histogram[3] = 0.5;
        histogram[6] = 0.5;
        histogram[9] = 0.5;
        assert_eq!(harmonicity(histogram).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_empty_histogram() {
        assert_eq!(harmonicity(Vec::new()).unwrap(), vec![1.0]);
        assert_eq!(harmonicity(vec![0.0; 8]).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_peak_in_bin_zero_is_an_error() {
        assert!(harmonicity(vec![0.9, 0.4]).is_err());
    }

    proptest! {
        #[test]
        fn harmonicity_is_a_whole_ratio(histogram in prop::collection::vec(0.0f64..1.0, 0..64)) {
            if let Ok(values) = harmonicity(histogram) {
                prop_assert!(values[0] >= 1.0);
                prop_assert_eq!(values[0], values[0].trunc());
            }
        }
    }
}
