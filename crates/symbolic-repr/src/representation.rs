//! Intermediate Representation
//!
//! Precomputed statistics that feature extractors read. Building them from a
//! note sequence is the job of a [`RepresentationProvider`]; this crate only
//! fixes their shape.

use crate::error::ReprError;
use crate::sequence::NoteSequence;
use crate::window::WindowPlan;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Piece-level metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Time signature numerators in order of appearance
    pub time_signature_numerators: Vec<u32>,
    /// Time signature denominators in order of appearance
    pub time_signature_denominators: Vec<u32>,
    /// Tempo markings in beats per minute, in order of appearance
    pub tempos_bpm: Vec<f64>,
}

/// Aggregate statistics for one MIDI channel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelStatistics {
    /// Total Note Ons
    pub note_ons: u32,
    /// Total time notes were held (seconds)
    pub total_duration_secs: f64,
    /// Average melodic leap (semitones)
    pub average_melodic_leap: f64,
    /// Average velocity
    pub average_velocity: f64,
    /// Average MIDI pitch (0 when the channel is silent)
    pub average_pitch: f64,
}

/// Statistics for a whole piece or a single analysis window
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IntermediateRepresentation {
    pub metadata: Metadata,
    /// Normalized Note On counts per pitch class (12 bins)
    pub pitch_class_histogram: Vec<f64>,
    /// Rhythmic pulse strengths indexed by beats per minute
    pub beat_histogram: Vec<f64>,
    /// Vertical interval counts indexed by semitones (unwrapped)
    pub vertical_interval_histogram: Vec<f64>,
    /// Chord counts indexed by chord type
    pub chord_type_histogram: Vec<f64>,
    /// Per-channel aggregates, one entry per MIDI channel
    pub channel_statistics: Vec<ChannelStatistics>,
    /// Rhythmic value of each note in quarter-note units
    pub rhythmic_values: Vec<f64>,
}

/// Builds intermediate representations from note sequences
pub trait RepresentationProvider {
    fn represent(&self, sequence: &NoteSequence) -> Result<IntermediateRepresentation, ReprError>;
}

/// A note sequence paired with its precomputed representation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    pub sequence: NoteSequence,
    pub representation: IntermediateRepresentation,
}

impl Segment {
    pub fn new(sequence: NoteSequence, representation: IntermediateRepresentation) -> Self {
        Self {
            sequence,
            representation,
        }
    }

    /// Build a segment by running the provider over `sequence`
    pub fn represent(
        sequence: NoteSequence,
        provider: &dyn RepresentationProvider,
    ) -> Result<Self, ReprError> {
        let representation = provider.represent(&sequence)?;
        Ok(Self::new(sequence, representation))
    }
}

/// Slice `sequence` along `plan` and build one segment per window
pub fn segment_windows(
    sequence: &NoteSequence,
    plan: &WindowPlan,
    provider: &dyn RepresentationProvider,
) -> Result<Vec<Segment>, ReprError> {
    plan.windows()
        .iter()
        .map(|window| {
            let slice = sequence.slice(window.start_secs, window.end_secs);
            debug!(
                "Window {} [{:.2}s, {:.2}s): {} notes",
                window.index,
                window.start_secs,
                window.end_secs,
                slice.len()
            );
            Segment::represent(slice, provider)
        })
        .collect()
}
