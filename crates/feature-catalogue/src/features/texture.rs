//! Texture features built on per-channel statistics

use feature_engine::statistics::mean;
use feature_engine::{
    sentinel, DependencyValues, FeatureDescriptor, FeatureError, FeatureExtractor,
};
use symbolic_repr::{IntermediateRepresentation, NoteSequence, PERCUSSION_CHANNEL};

#[derive(Debug, Clone)]
pub struct RelativeNoteDensityOfHighestLine {
    descriptor: FeatureDescriptor,
}

impl RelativeNoteDensityOfHighestLine {
    pub const NAME: &'static str = "Relative Note Density of Highest Line";

    pub fn new() -> Self {
        Self {
            descriptor: FeatureDescriptor::new(
                Self::NAME,
                "Number of Note Ons in the channel with the highest average pitch divided by \
                 the average number of Note Ons in all channels that contain at least one note.",
                true,
                1,
            ),
        }
    }
}

impl Default for RelativeNoteDensityOfHighestLine {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for RelativeNoteDensityOfHighestLine {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn compute(
        &self,
        _sequence: &NoteSequence,
        representation: &IntermediateRepresentation,
        _dependencies: &DependencyValues<'_>,
    ) -> Result<Vec<f64>, FeatureError> {
        // Percussion has no pitch line
        let pitched = || {
            representation
                .channel_statistics
                .iter()
                .enumerate()
                .filter(|(channel, _)| *channel != PERCUSSION_CHANNEL)
                .map(|(_, stats)| stats)
        };

        let mut highest: Option<(f64, u32)> = None;
        for stats in pitched().filter(|s| s.average_pitch != 0.0) {
            match highest {
                Some((pitch, _)) if stats.average_pitch <= pitch => {}
                _ => highest = Some((stats.average_pitch, stats.note_ons)),
            }
        }

        let active: Vec<f64> = pitched()
            .filter(|s| s.note_ons != 0)
            .map(|s| f64::from(s.note_ons))
            .collect();

        match (highest, mean(&active)) {
            (Some((_, note_ons)), Some(average)) => Ok(vec![f64::from(note_ons) / average]),
            _ => Ok(sentinel(1)),
        }
    }
}
