//! Parsed Note Sequence

use serde::{Deserialize, Serialize};

/// A single sounding note, timed in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NoteEvent {
    pub start_secs: f64,
    pub duration_secs: f64,
    pub pitch: u8,
    pub velocity: u8,
    pub channel: u8,
}

impl NoteEvent {
    /// Time at which the note stops sounding
    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.duration_secs
    }
}

/// Ordered note events of a whole piece or of one analysis window
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NoteSequence {
    notes: Vec<NoteEvent>,
    duration_secs: f64,
}

impl NoteSequence {
    /// Build a sequence, sorting notes by onset. Duration is the latest note end.
    pub fn from_notes(mut notes: Vec<NoteEvent>) -> Self {
        notes.sort_by(|a, b| a.start_secs.total_cmp(&b.start_secs));
        let duration_secs = notes.iter().map(NoteEvent::end_secs).fold(0.0, f64::max);
        Self {
            notes,
            duration_secs,
        }
    }

    /// Override the duration (e.g. trailing silence after the last note)
    pub fn with_duration(mut self, duration_secs: f64) -> Self {
        self.duration_secs = duration_secs.max(0.0);
        self
    }

    /// Notes in onset order
    pub fn notes(&self) -> &[NoteEvent] {
        &self.notes
    }

    /// Piece length in seconds
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes whose onset lies in `[start_secs, end_secs)`.
    ///
    /// The slice keeps absolute note times; its duration is the span of the
    /// requested interval.
    pub fn slice(&self, start_secs: f64, end_secs: f64) -> NoteSequence {
        let notes = self
            .notes
            .iter()
            .filter(|n| n.start_secs >= start_secs && n.start_secs < end_secs)
            .copied()
            .collect();
        NoteSequence {
            notes,
            duration_secs: (end_secs - start_secs).max(0.0),
        }
    }
}
