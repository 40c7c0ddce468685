//! Per-cell extraction diagnostics

use serde::{Deserialize, Serialize};
use std::fmt;

/// What degraded a (feature, window) cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A dependency offset fell outside the window range; zeros were supplied
    UnavailableDependency { dependency: String, offset: i32 },
    /// The extractor returned the wrong number of values; sentinel stored
    DimensionMismatch { expected: usize, actual: usize },
    /// The extractor failed or panicked; sentinel stored
    Runtime { message: String },
}

impl DiagnosticKind {
    /// Whether the cell holds the sentinel instead of a computed value
    pub fn is_failure(&self) -> bool {
        !matches!(self, DiagnosticKind::UnavailableDependency { .. })
    }
}

/// A diagnostic record for one cell. `window` is `None` for the overall pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDiagnostic {
    pub feature: String,
    pub window: Option<usize>,
    pub kind: DiagnosticKind,
}

impl fmt::Display for CellDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.window {
            Some(window) => write!(f, "'{}' window {}: ", self.feature, window)?,
            None => write!(f, "'{}' overall: ", self.feature)?,
        }
        match &self.kind {
            DiagnosticKind::UnavailableDependency { dependency, offset } => write!(
                f,
                "dependency '{}' at offset {} unavailable, using zeros",
                dependency, offset
            ),
            DiagnosticKind::DimensionMismatch { expected, actual } => write!(
                f,
                "expected {} values, got {}; stored sentinel",
                expected, actual
            ),
            DiagnosticKind::Runtime { message } => {
                write!(f, "{}; stored sentinel", message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diagnostic = CellDiagnostic {
            feature: "Delta".to_string(),
            window: Some(0),
            kind: DiagnosticKind::UnavailableDependency {
                dependency: "Base".to_string(),
                offset: -1,
            },
        };
        assert_eq!(
            diagnostic.to_string(),
            "'Delta' window 0: dependency 'Base' at offset -1 unavailable, using zeros"
        );
        assert!(!diagnostic.kind.is_failure());
    }

    #[test]
    fn test_overall_display() {
        let diagnostic = CellDiagnostic {
            feature: "Meter".to_string(),
            window: None,
            kind: DiagnosticKind::Runtime {
                message: "boom".to_string(),
            },
        };
        assert_eq!(diagnostic.to_string(), "'Meter' overall: boom; stored sentinel");
        assert!(diagnostic.kind.is_failure());
    }
}
