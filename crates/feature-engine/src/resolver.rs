//! Dependency Graph Resolver
//!
//! Builds a directed graph over the enabled extractors (edge = "depends on",
//! weight = window offset), validates it, and produces the execution order.
//!
//! Ordering is a depth-first post-order that walks extractors in
//! registration order and dependencies in declaration order, so features
//! with no relationship between them keep their registration order and the
//! result is reproducible across runs. Offsets do not influence ordering.

use crate::descriptor::FeatureDescriptor;
use crate::error::EngineError;
use crate::extractor::FeatureExtractor;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// A dependency edge resolved to a position in the execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDependency {
    /// Position of the dependency in [`ExecutionPlan::extractors`]
    pub position: usize,
    pub offset: i32,
}

/// Validated, topologically ordered extractors
#[derive(Clone)]
pub struct ExecutionPlan {
    extractors: Vec<Arc<dyn FeatureExtractor>>,
    dependencies: Vec<Vec<ResolvedDependency>>,
    positions: HashMap<String, usize>,
}

impl ExecutionPlan {
    /// Extractors in execution order
    pub fn extractors(&self) -> &[Arc<dyn FeatureExtractor>] {
        &self.extractors
    }

    /// Dependencies of the extractor at `position`, in declaration order
    pub fn dependencies_of(&self, position: usize) -> &[ResolvedDependency] {
        &self.dependencies[position]
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn descriptor(&self, position: usize) -> &FeatureDescriptor {
        self.extractors[position].descriptor()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.extractors.iter().map(|e| e.descriptor().name())
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl std::fmt::Debug for ExecutionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionPlan")
            .field("order", &self.names().collect::<Vec<_>>())
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Validate `extractors` (given in registration order) and order them so
/// every extractor follows everything it depends on.
pub fn resolve(extractors: &[Arc<dyn FeatureExtractor>]) -> Result<ExecutionPlan, EngineError> {
    let mut graph: DiGraph<usize, i32> = DiGraph::with_capacity(extractors.len(), 0);
    let mut by_name: HashMap<&str, NodeIndex> = HashMap::with_capacity(extractors.len());

    for (i, extractor) in extractors.iter().enumerate() {
        let descriptor = extractor.descriptor();
        descriptor.validate()?;
        let node = graph.add_node(i);
        if by_name.insert(descriptor.name(), node).is_some() {
            return Err(EngineError::DuplicateFeature(descriptor.name().to_string()));
        }
    }

    for (i, extractor) in extractors.iter().enumerate() {
        let (names, offsets) = extractor.dependency_lists();
        if names.len() != offsets.len() {
            return Err(EngineError::OffsetCountMismatch {
                feature: extractor.descriptor().name().to_string(),
                names: names.len(),
                offsets: offsets.len(),
            });
        }
        for dependency in extractor.dependencies() {
            let &target = by_name.get(dependency.name()).ok_or_else(|| {
                EngineError::UnknownDependency {
                    dependent: extractor.descriptor().name().to_string(),
                    missing: dependency.name().to_string(),
                }
            })?;
            graph.add_edge(NodeIndex::new(i), target, dependency.offset());
        }
    }

    let mut marks = vec![Mark::Unvisited; extractors.len()];
    let mut path = Vec::new();
    let mut order = Vec::with_capacity(extractors.len());
    for node in graph.node_indices() {
        if marks[node.index()] == Mark::Unvisited {
            visit(&graph, node, &mut marks, &mut path, &mut order)
                .map_err(|cycle| cycle_error(extractors, &graph, cycle))?;
        }
    }

    let ordered: Vec<Arc<dyn FeatureExtractor>> = order
        .iter()
        .map(|&node| Arc::clone(&extractors[graph[node]]))
        .collect();
    let positions: HashMap<String, usize> = ordered
        .iter()
        .enumerate()
        .map(|(pos, e)| (e.descriptor().name().to_string(), pos))
        .collect();
    let dependencies = ordered
        .iter()
        .map(|e| {
            e.dependencies()
                .iter()
                .map(|d| ResolvedDependency {
                    position: positions[d.name()],
                    offset: d.offset(),
                })
                .collect()
        })
        .collect();

    let plan = ExecutionPlan {
        extractors: ordered,
        dependencies,
        positions,
    };
    info!(
        "Resolved {} features with {} dependency edges",
        plan.len(),
        graph.edge_count()
    );
    debug!("Execution order: {:?}", plan.names().collect::<Vec<_>>());
    Ok(plan)
}

/// Depth-first post-order. On a back edge, returns the nodes of the cycle
/// with the repeated node at both ends.
fn visit(
    graph: &DiGraph<usize, i32>,
    node: NodeIndex,
    marks: &mut [Mark],
    path: &mut Vec<NodeIndex>,
    order: &mut Vec<NodeIndex>,
) -> Result<(), Vec<NodeIndex>> {
    marks[node.index()] = Mark::InProgress;
    path.push(node);

    // petgraph yields outgoing edges newest first; restore declaration order
    let mut edges: Vec<_> = graph.edges(node).map(|e| (e.id(), e.target())).collect();
    edges.sort_by_key(|(id, _)| id.index());

    for (_, target) in edges {
        match marks[target.index()] {
            Mark::Done => {}
            Mark::InProgress => {
                let start = path.iter().position(|&n| n == target).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(target);
                return Err(cycle);
            }
            Mark::Unvisited => visit(graph, target, marks, path, order)?,
        }
    }

    path.pop();
    marks[node.index()] = Mark::Done;
    order.push(node);
    Ok(())
}

fn cycle_error(
    extractors: &[Arc<dyn FeatureExtractor>],
    graph: &DiGraph<usize, i32>,
    cycle: Vec<NodeIndex>,
) -> EngineError {
    EngineError::CyclicDependency {
        cycle: cycle
            .into_iter()
            .map(|node| extractors[graph[node]].descriptor().name().to_string())
            .collect(),
    }
}
