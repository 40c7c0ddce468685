//! Feature Catalogue
//!
//! Built-in extractors over the intermediate representation, and a registry
//! holding all of them.

mod features;

pub use features::*;

use feature_engine::{EngineError, FeatureRegistry};
use tracing::debug;

/// Registry with every built-in feature, in catalogue order
pub fn default_registry() -> Result<FeatureRegistry, EngineError> {
    let registry = FeatureRegistry::new()
        .with(ChordTypes::new())?
        .with(MinorMajorTriadRatio::new())?
        .with(WrappedVerticalIntervalHistogram::new())?
        .with(PerfectVerticalIntervals::new())?
        .with(CompoundOrSimpleMeter::new())?
        .with(InitialTimeSignature::new())?
        .with(MeanRhythmicValue::new())?
        .with(MostCommonPitchClassPrevalence::new())?
        .with(HarmonicityOfTwoStrongestRhythmicPulses::new())?
        .with(RelativeNoteDensityOfHighestLine::new())?;

    debug!("Default registry holds {} features", registry.len());
    Ok(registry)
}
