//! Analysis Window Planning

use crate::error::ReprError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One analysis window, in seconds from the start of the piece
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub index: usize,
    pub start_secs: f64,
    pub end_secs: f64,
}

impl Window {
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// Fixed-length, optionally overlapping windows covering a piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowPlan {
    windows: Vec<Window>,
    window_size_secs: f64,
    overlap: f64,
}

impl WindowPlan {
    /// Plan windows over `total_secs`.
    ///
    /// Windows start at zero and advance by `window_size_secs * (1 - overlap)`.
    /// The last window is clipped to the end of the piece.
    pub fn new(total_secs: f64, window_size_secs: f64, overlap: f64) -> Result<Self, ReprError> {
        if !total_secs.is_finite() || total_secs < 0.0 {
            return Err(ReprError::InvalidDuration(total_secs));
        }
        if !window_size_secs.is_finite() || window_size_secs <= 0.0 {
            return Err(ReprError::InvalidWindowSize(window_size_secs));
        }
        if !overlap.is_finite() || !(0.0..1.0).contains(&overlap) {
            return Err(ReprError::InvalidOverlap(overlap));
        }

        let step = window_size_secs * (1.0 - overlap);
        let mut windows = Vec::new();
        let mut index = 0;
        loop {
            // Multiply rather than accumulate so long pieces do not drift
            let start_secs = index as f64 * step;
            if start_secs >= total_secs {
                break;
            }
            windows.push(Window {
                index,
                start_secs,
                end_secs: (start_secs + window_size_secs).min(total_secs),
            });
            index += 1;
        }

        debug!(
            "Planned {} windows of {}s (overlap {}) over {}s",
            windows.len(),
            window_size_secs,
            overlap,
            total_secs
        );

        Ok(Self {
            windows,
            window_size_secs,
            overlap,
        })
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn window_size_secs(&self) -> f64 {
        self.window_size_secs
    }

    pub fn overlap(&self) -> f64 {
        self.overlap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_non_overlapping_windows() {
        let plan = WindowPlan::new(25.0, 10.0, 0.0).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.windows()[0].start_secs, 0.0);
        assert_eq!(plan.windows()[1].start_secs, 10.0);
        // Last window is clipped
        assert_eq!(plan.windows()[2].end_secs, 25.0);
        assert_eq!(plan.windows()[2].duration_secs(), 5.0);
    }

    #[test]
    fn test_overlapping_windows() {
        let plan = WindowPlan::new(20.0, 10.0, 0.5).unwrap();
        let starts: Vec<f64> = plan.windows().iter().map(|w| w.start_secs).collect();
        assert_eq!(starts, vec![0.0, 5.0, 10.0, 15.0]);
    }

    #[test]
    fn test_short_piece_has_single_window() {
        let plan = WindowPlan::new(3.0, 10.0, 0.0).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.windows()[0].end_secs, 3.0);
    }

    #[test]
    fn test_empty_piece_has_no_windows() {
        let plan = WindowPlan::new(0.0, 10.0, 0.0).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            WindowPlan::new(10.0, 0.0, 0.0),
            Err(ReprError::InvalidWindowSize(0.0))
        );
        assert_eq!(
            WindowPlan::new(10.0, 5.0, 1.0),
            Err(ReprError::InvalidOverlap(1.0))
        );
        assert!(WindowPlan::new(10.0, 5.0, -0.1).is_err());
    }

    #[test]
    fn test_invalid_duration() {
        assert_eq!(
            WindowPlan::new(f64::INFINITY, 10.0, 0.0),
            Err(ReprError::InvalidDuration(f64::INFINITY))
        );
        assert_eq!(
            WindowPlan::new(-1.0, 10.0, 0.0),
            Err(ReprError::InvalidDuration(-1.0))
        );
        assert!(matches!(
            WindowPlan::new(f64::NAN, 10.0, 0.0),
            Err(ReprError::InvalidDuration(d)) if d.is_nan()
        ));
    }

    proptest! {
        #[test]
        fn windows_cover_piece(total in 0.1f64..500.0, size in 0.5f64..30.0, overlap in 0.0f64..0.9) {
            let plan = WindowPlan::new(total, size, overlap).unwrap();
            prop_assert!(!plan.is_empty());
            prop_assert_eq!(plan.windows()[0].start_secs, 0.0);
            let last = plan.windows()[plan.len() - 1];
            prop_assert!((last.end_secs - total).abs() < 1e-9 || last.end_secs <= total);
            for (i, w) in plan.windows().iter().enumerate() {
                prop_assert_eq!(w.index, i);
                prop_assert!(w.end_secs > w.start_secs);
                prop_assert!(w.duration_secs() <= size + 1e-9);
            }
        }
    }
}
