//! Symbolic Music Representation
//!
//! Provides the parsed note sequence, analysis window planning, and the
//! intermediate statistics that feature extractors read.

mod error;
mod representation;
mod sequence;
mod window;

pub use error::ReprError;
pub use representation::{
    segment_windows, ChannelStatistics, IntermediateRepresentation, Metadata,
    RepresentationProvider, Segment,
};
pub use sequence::{NoteEvent, NoteSequence};
pub use window::{Window, WindowPlan};

/// Number of MIDI channels tracked in channel statistics
pub const CHANNEL_COUNT: usize = 16;

/// Zero-based index of the General MIDI percussion channel (channel 10)
pub const PERCUSSION_CHANNEL: usize = 9;

/// Number of pitch classes in a wrapped histogram
pub const PITCH_CLASS_COUNT: usize = 12;
