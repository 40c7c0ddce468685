//! Windowed Extraction Engine
//!
//! Drives an [`ExecutionPlan`] over the whole piece and over every analysis
//! window, resolving offset dependencies against values already computed in
//! the same pass. Failures are isolated per cell: the cell gets the
//! sentinel, a diagnostic is recorded, and the run continues.

use crate::config::{ExtractionConfig, WindowingConfig};
use crate::diagnostics::{CellDiagnostic, DiagnosticKind};
use crate::error::{EngineError, FeatureError};
use crate::extractor::{sentinel, DependencyValues};
use crate::matrix::FeatureMatrix;
use crate::registry::FeatureRegistry;
use crate::resolver::{resolve, ExecutionPlan, ResolvedDependency};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use symbolic_repr::{
    segment_windows, IntermediateRepresentation, NoteSequence, RepresentationProvider, Segment,
    WindowPlan,
};
use tracing::{debug, info, warn};

/// The inputs of one cell computation
#[derive(Debug, Clone, Copy)]
pub struct WindowContext<'a> {
    pub window_index: usize,
    pub total_windows: usize,
    pub sequence: &'a NoteSequence,
    pub representation: &'a IntermediateRepresentation,
}

impl<'a> WindowContext<'a> {
    fn new(window_index: usize, total_windows: usize, segment: &'a Segment) -> Self {
        Self {
            window_index,
            total_windows,
            sequence: &segment.sequence,
            representation: &segment.representation,
        }
    }
}

/// Result of an extraction run
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub matrix: FeatureMatrix,
    /// Degraded cells, ordered by execution order and then window
    pub diagnostics: Vec<CellDiagnostic>,
}

impl Extraction {
    /// Diagnostics for cells that hold the sentinel
    pub fn failures(&self) -> impl Iterator<Item = &CellDiagnostic> {
        self.diagnostics.iter().filter(|d| d.kind.is_failure())
    }
}

/// Values computed during one pass, indexed by plan position then window
struct ValueTable {
    cells: Vec<Vec<Option<Vec<f64>>>>,
}

impl ValueTable {
    fn new(features: usize, windows: usize) -> Self {
        Self {
            cells: vec![vec![None; windows]; features],
        }
    }

    fn get(&self, position: usize, window: usize) -> Option<&[f64]> {
        self.cells[position].get(window)?.as_deref()
    }

    fn set(&mut self, position: usize, window: usize, values: Vec<f64>) {
        self.cells[position][window] = Some(values);
    }

    fn take_column(&mut self, position: usize, dimensions: usize) -> Vec<Vec<f64>> {
        std::mem::take(&mut self.cells[position])
            .into_iter()
            .map(|cell| cell.unwrap_or_else(|| sentinel(dimensions)))
            .collect()
    }
}

struct CellOutcome {
    values: Vec<f64>,
    diagnostics: Vec<CellDiagnostic>,
}

/// Diagnostics tagged with (plan position, window) for deterministic ordering
type TaggedDiagnostics = Vec<(usize, usize, CellDiagnostic)>;

/// Runs a resolved set of extractors over a piece
#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    plan: ExecutionPlan,
    windowing: WindowingConfig,
    parallel: bool,
}

impl ExtractionEngine {
    /// Engine over an already resolved plan, sequential scheduling
    pub fn new(plan: ExecutionPlan) -> Self {
        Self {
            plan,
            windowing: WindowingConfig::default(),
            parallel: false,
        }
    }

    /// Select, resolve, and configure from `config`
    pub fn from_config(
        registry: &FeatureRegistry,
        config: &ExtractionConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let selected = registry.select(config.enabled_features.as_slice())?;
        let plan = resolve(&selected)?;
        Ok(Self {
            plan,
            windowing: config.windowing.clone(),
            parallel: config.parallel,
        })
    }

    /// Compute independent windows of each feature on the rayon pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    /// Plan windows, build segments through `provider`, and extract.
    ///
    /// With windowing disabled this is [`extract_overall`](Self::extract_overall).
    pub fn run(
        &self,
        sequence: &NoteSequence,
        provider: &dyn RepresentationProvider,
    ) -> Result<Extraction, EngineError> {
        let overall = Segment::represent(sequence.clone(), provider)?;
        if !self.windowing.enabled {
            return Ok(self.extract_overall(&overall));
        }

        let plan = WindowPlan::new(
            sequence.duration_secs(),
            self.windowing.window_size_secs,
            self.windowing.overlap,
        )?;
        let windows = segment_windows(sequence, &plan, provider)?;
        Ok(self.extract(&overall, &windows))
    }

    /// Non-sequential features once over `overall`, sequential features once
    /// per entry of `windows`.
    pub fn extract(&self, overall: &Segment, windows: &[Segment]) -> Extraction {
        info!(
            "Extracting {} features over {} windows (parallel: {})",
            self.plan.len(),
            windows.len(),
            self.parallel
        );

        let members = self.overall_members();
        let (mut overall_table, overall_diagnostics) = self.overall_pass(&members, overall);
        let (mut window_table, window_diagnostics) = self.windowed_pass(windows, &overall_table);

        let mut matrix = FeatureMatrix::new(windows.len());
        for (position, extractor) in self.plan.extractors().iter().enumerate() {
            let descriptor = extractor.descriptor();
            let table = if descriptor.is_sequential() {
                &mut window_table
            } else {
                &mut overall_table
            };
            let rows = table.take_column(position, descriptor.dimensions());
            matrix.push_column(descriptor.clone(), rows);
        }

        // Scratch values of sequential features evaluated in the overall
        // pass are not reported
        let diagnostics = overall_diagnostics
            .into_iter()
            .filter(|(position, _, _)| !self.plan.descriptor(*position).is_sequential())
            .chain(window_diagnostics)
            .map(|(_, _, diagnostic)| diagnostic)
            .collect();

        self.finish(matrix, diagnostics)
    }

    /// Every feature, sequential or not, once over the whole piece
    pub fn extract_overall(&self, overall: &Segment) -> Extraction {
        info!("Extracting {} features over the whole piece", self.plan.len());

        let members = vec![true; self.plan.len()];
        let (mut table, diagnostics) = self.overall_pass(&members, overall);

        let mut matrix = FeatureMatrix::new(0);
        for (position, extractor) in self.plan.extractors().iter().enumerate() {
            let descriptor = extractor.descriptor();
            matrix.push_column(
                descriptor.clone(),
                table.take_column(position, descriptor.dimensions()),
            );
        }

        let diagnostics = diagnostics.into_iter().map(|(_, _, d)| d).collect();
        self.finish(matrix, diagnostics)
    }

    fn finish(&self, matrix: FeatureMatrix, diagnostics: Vec<CellDiagnostic>) -> Extraction {
        let extraction = Extraction {
            matrix,
            diagnostics,
        };
        let failures = extraction.failures().count();
        info!(
            "Extraction complete: {} features, {} degraded cells ({} failed)",
            extraction.matrix.len(),
            extraction.diagnostics.len(),
            failures
        );
        extraction
    }

    /// Non-sequential features plus everything they transitively depend on
    fn overall_members(&self) -> Vec<bool> {
        let mut members: Vec<bool> = (0..self.plan.len())
            .map(|p| !self.plan.descriptor(p).is_sequential())
            .collect();
        // Dependencies always sit at lower positions
        for position in (0..self.plan.len()).rev() {
            if members[position] {
                for dep in self.plan.dependencies_of(position) {
                    members[dep.position] = true;
                }
            }
        }
        members
    }

    /// Sequential features that read a later window, directly or through
    /// another sequential feature
    fn forward_flags(&self) -> Vec<bool> {
        let mut forward = vec![false; self.plan.len()];
        for position in 0..self.plan.len() {
            if !self.plan.descriptor(position).is_sequential() {
                continue;
            }
            forward[position] = self.plan.dependencies_of(position).iter().any(|dep| {
                forward[dep.position]
                    || (dep.offset > 0 && self.plan.descriptor(dep.position).is_sequential())
            });
        }
        forward
    }

    fn overall_pass(&self, members: &[bool], segment: &Segment) -> (ValueTable, TaggedDiagnostics) {
        let mut table = ValueTable::new(self.plan.len(), 1);
        let mut diagnostics = Vec::new();
        let context = WindowContext::new(0, 1, segment);

        for position in (0..self.plan.len()).filter(|&p| members[p]) {
            let outcome = self.compute_cell(position, context, &table, None);
            table.set(position, 0, outcome.values);
            diagnostics.extend(outcome.diagnostics.into_iter().map(|d| (position, 0, d)));
        }
        (table, diagnostics)
    }

    fn windowed_pass(
        &self,
        windows: &[Segment],
        overall: &ValueTable,
    ) -> (ValueTable, TaggedDiagnostics) {
        let total = windows.len();
        let mut table = ValueTable::new(self.plan.len(), total);
        let mut diagnostics = Vec::new();
        let sequential: Vec<usize> = (0..self.plan.len())
            .filter(|&p| self.plan.descriptor(p).is_sequential())
            .collect();

        if self.parallel {
            // Every dependency of a feature precedes it in the plan, so all
            // of its windows are complete before the feature starts
            for &position in &sequential {
                let outcomes: Vec<CellOutcome> = windows
                    .par_iter()
                    .enumerate()
                    .map(|(w, segment)| {
                        let context = WindowContext::new(w, total, segment);
                        self.compute_cell(position, context, &table, Some(overall))
                    })
                    .collect();
                for (w, outcome) in outcomes.into_iter().enumerate() {
                    table.set(position, w, outcome.values);
                    diagnostics.extend(outcome.diagnostics.into_iter().map(|d| (position, w, d)));
                }
            }
        } else {
            let forward = self.forward_flags();
            let (look_ahead, base): (Vec<usize>, Vec<usize>) =
                sequential.into_iter().partition(|&p| forward[p]);
            debug!(
                "Windowed pass: {} window-major features, {} look-ahead features",
                base.len(),
                look_ahead.len()
            );

            for (w, segment) in windows.iter().enumerate() {
                let context = WindowContext::new(w, total, segment);
                for &position in &base {
                    let outcome = self.compute_cell(position, context, &table, Some(overall));
                    table.set(position, w, outcome.values);
                    diagnostics.extend(outcome.diagnostics.into_iter().map(|d| (position, w, d)));
                }
            }

            // Look-ahead features run once every window of their inputs exists
            for &position in &look_ahead {
                for (w, segment) in windows.iter().enumerate() {
                    let context = WindowContext::new(w, total, segment);
                    let outcome = self.compute_cell(position, context, &table, Some(overall));
                    table.set(position, w, outcome.values);
                    diagnostics.extend(outcome.diagnostics.into_iter().map(|d| (position, w, d)));
                }
            }
        }

        // Same ordering regardless of schedule; stable within a cell
        diagnostics.sort_by_key(|(position, window, _)| (*position, *window));
        (table, diagnostics)
    }

    /// Value of `dep` as seen from `window`. `overall` is set during the
    /// windowed pass and supplies non-sequential dependencies.
    fn lookup<'t>(
        &self,
        dep: ResolvedDependency,
        context: WindowContext<'_>,
        table: &'t ValueTable,
        overall: Option<&'t ValueTable>,
    ) -> Option<&'t [f64]> {
        if let Some(overall) = overall {
            if !self.plan.descriptor(dep.position).is_sequential() {
                return if dep.offset == 0 {
                    overall.get(dep.position, 0)
                } else {
                    None
                };
            }
        }

        let target = context.window_index as i64 + dep.offset as i64;
        if target < 0 || target >= context.total_windows as i64 {
            return None;
        }
        table.get(dep.position, target as usize)
    }

    fn compute_cell(
        &self,
        position: usize,
        context: WindowContext<'_>,
        table: &ValueTable,
        overall: Option<&ValueTable>,
    ) -> CellOutcome {
        let extractor = &self.plan.extractors()[position];
        let descriptor = extractor.descriptor();
        let window = overall.map(|_| context.window_index);
        let mut diagnostics = Vec::new();

        let resolved = self.plan.dependencies_of(position);
        let mut dependencies = DependencyValues::with_capacity(resolved.len());
        for (dep, declared) in resolved.iter().zip(extractor.dependencies()) {
            match self.lookup(*dep, context, table, overall) {
                Some(values) => dependencies.push_available(values),
                None => {
                    dependencies.push_unavailable(self.plan.descriptor(dep.position).dimensions());
                    let diagnostic = CellDiagnostic {
                        feature: descriptor.name().to_string(),
                        window,
                        kind: DiagnosticKind::UnavailableDependency {
                            dependency: declared.name().to_string(),
                            offset: declared.offset(),
                        },
                    };
                    debug!("{}", diagnostic);
                    diagnostics.push(diagnostic);
                }
            }
        }

        let result = catch_unwind(AssertUnwindSafe(|| {
            extractor.compute(context.sequence, context.representation, &dependencies)
        }));

        let expected = descriptor.dimensions();
        let failure = match result {
            Ok(Ok(values)) if values.len() == expected => {
                return CellOutcome {
                    values,
                    diagnostics,
                }
            }
            Ok(Ok(values)) => DiagnosticKind::DimensionMismatch {
                expected,
                actual: values.len(),
            },
            Ok(Err(FeatureError::DimensionMismatch { expected, actual })) => {
                DiagnosticKind::DimensionMismatch { expected, actual }
            }
            Ok(Err(err)) => DiagnosticKind::Runtime {
                message: err.to_string(),
            },
            Err(payload) => DiagnosticKind::Runtime {
                message: format!("Extractor panicked: {}", panic_message(payload.as_ref())),
            },
        };

        let diagnostic = CellDiagnostic {
            feature: descriptor.name().to_string(),
            window,
            kind: failure,
        };
        warn!("{}", diagnostic);
        diagnostics.push(diagnostic);

        CellOutcome {
            values: sentinel(expected),
            diagnostics,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
