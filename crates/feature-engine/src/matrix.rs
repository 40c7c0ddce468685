//! Feature Matrix

use crate::descriptor::FeatureDescriptor;
use serde::{Deserialize, Serialize};

/// All values of one feature: one row per window, or a single overall row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureColumn {
    descriptor: FeatureDescriptor,
    rows: Vec<Vec<f64>>,
}

impl FeatureColumn {
    pub fn descriptor(&self) -> &FeatureDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Extraction output, in execution order. Read-only once returned by the
/// engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureMatrix {
    total_windows: usize,
    columns: Vec<FeatureColumn>,
}

impl FeatureMatrix {
    pub(crate) fn new(total_windows: usize) -> Self {
        Self {
            total_windows,
            columns: Vec::new(),
        }
    }

    pub(crate) fn push_column(&mut self, descriptor: FeatureDescriptor, rows: Vec<Vec<f64>>) {
        self.columns.push(FeatureColumn { descriptor, rows });
    }

    /// Number of analysis windows in the run (0 for overall-only runs)
    pub fn total_windows(&self) -> usize {
        self.total_windows
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&FeatureColumn> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Value of `name` at row `window` (row 0 for overall values)
    pub fn get(&self, name: &str, window: usize) -> Option<&[f64]> {
        self.column(name).and_then(|c| c.row(window))
    }

    /// Descriptors of every feature in the matrix, for downstream writers
    pub fn descriptors(&self) -> impl Iterator<Item = &FeatureDescriptor> {
        self.columns.iter().map(FeatureColumn::descriptor)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> FeatureMatrix {
        let mut matrix = FeatureMatrix::new(2);
        matrix.push_column(
            FeatureDescriptor::new("Windowed", "", true, 1),
            vec![vec![1.0], vec![2.0]],
        );
        matrix.push_column(
            FeatureDescriptor::new("Overall", "", false, 2),
            vec![vec![3.0, 4.0]],
        );
        matrix
    }

    #[test]
    fn test_lookup() {
        let matrix = matrix();
        assert_eq!(matrix.get("Windowed", 1), Some(&[2.0][..]));
        assert_eq!(matrix.get("Overall", 0), Some(&[3.0, 4.0][..]));
        assert_eq!(matrix.get("Overall", 1), None);
        assert_eq!(matrix.get("Missing", 0), None);
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.total_windows(), 2);
    }

    #[test]
    fn test_serializes_with_descriptors() {
        let json = serde_json::to_value(matrix()).unwrap();
        assert_eq!(json["columns"][0]["descriptor"]["name"], "Windowed");
        assert_eq!(json["columns"][1]["rows"][0][1], 4.0);
    }
}
