//! Chord-based features

use feature_engine::{
    sentinel, Dependency, DependencyValues, FeatureDescriptor, FeatureError, FeatureExtractor,
};
use symbolic_repr::{IntermediateRepresentation, NoteSequence};

/// Chord categories, in histogram bin order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordType {
    TwoPitchClass,
    MinorTriad,
    MajorTriad,
    AugmentedTriad,
    DiminishedTriad,
    DominantSeventh,
    MajorSeventh,
    MinorSeventh,
    OtherFourNote,
    Complex,
    Other,
}

impl ChordType {
    pub const COUNT: usize = 11;

    /// Histogram bin of this chord type
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Fraction of all chords falling in each [`ChordType`]
#[derive(Debug, Clone)]
pub struct ChordTypes {
    descriptor: FeatureDescriptor,
}

impl ChordTypes {
    pub const NAME: &'static str = "Chord Types";

    pub fn new() -> Self {
        Self {
            descriptor: FeatureDescriptor::new(
                Self::NAME,
                "Fraction of all simultaneous pitch-class groupings that are of each chord type.",
                true,
                ChordType::COUNT,
            ),
        }
    }
}

impl Default for ChordTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for ChordTypes {
    fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    fn compute(
        &self,
        _sequence: &NoteSequence,
        representation: &IntermediateRepresentation,
        _dependencies: &DependencyValues<'_>,
    ) -> Result<Vec<f64>, FeatureError> {
        let histogram = &representation.chord_type_histogram;
        let mut counts: Vec<f64> = (0..ChordType::COUNT)
            .map(|i| histogram.get(i).copied().unwrap_or(0.0))
            .collect();

        let total: f64 = counts.iter().sum();
        if total > 0.0 {
            counts.iter_mut().for_each(|c| *c /= total);
        }
        Ok(counts)
    }
}

/// Minor triads divided by major triads
#[derive(Debug, Clone)]
pub struct MinorMajorTriadRatio {
    descriptor: FeatureDescriptor,
    dependencies: Vec<Dependency>,
}

impl MinorMajorTriadRatio {
    pub const NAME: &'static str = "Minor Major Triad Ratio";

    pub fn new() -> Self {
        Self {
            descriptor: FeatureDescriptor::new(
                Self::NAME,
                "Number of minor triads divided by number of major triads.",
                true,
                1,
            ),
            dependencies: vec![Dependency::current(ChordTypes::NAME)],
        }
    }
}

impl Default for MinorMajorTriadRatio {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for MinorMajorTriadRatio {
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
        let chords = dependencies.require(0)?;
        let bin = |chord: ChordType| {
            chords.get(chord.index()).copied().ok_or_else(|| FeatureError::DimensionMismatch {
                expected: ChordType::COUNT,
                actual: chords.len(),
            })
        };
        let minor = bin(ChordType::MinorTriad)?;
        let major = bin(ChordType::MajorTriad)?;

        // No major triads: the ratio is undefined
        if major == 0.0 {
            return Ok(sentinel(1));
        }
        Ok(vec![minor / major])
    }
}
