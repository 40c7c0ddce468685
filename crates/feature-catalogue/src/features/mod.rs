mod chords;
mod intervals;
mod meter;
mod pitch;
mod rhythm;
mod texture;

pub use chords::{ChordType, ChordTypes, MinorMajorTriadRatio};
pub use intervals::{PerfectVerticalIntervals, WrappedVerticalIntervalHistogram};
pub use meter::{CompoundOrSimpleMeter, InitialTimeSignature};
pub use pitch::MostCommonPitchClassPrevalence;
pub use rhythm::{HarmonicityOfTwoStrongestRhythmicPulses, MeanRhythmicValue};
pub use texture::RelativeNoteDensityOfHighestLine;
