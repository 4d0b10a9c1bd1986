//! Dependency Analyzer
//!
//! Infers inter-entity relationships from textual back-references: every
//! string parameter value containing a `{identifier}` reference yields one
//! `references` edge from the parameter to the named entity. Single
//! additive pass, O(parameters). No cycle detection here — dependencies
//! may legitimately form cycles, and downstream consumers decide whether
//! that matters; `DependencyGraph::is_cyclic` exists for them.

use std::collections::HashMap;
use std::sync::OnceLock;

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use regex::Regex;

use crate::model::{Dependency, DependencyKind, Parameter};

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_.]*)\}").expect("reference pattern is valid")
    })
}

pub struct DependencyAnalyzer;

impl DependencyAnalyzer {
    /// Emit one edge per `{reference}` found in a string parameter value.
    pub fn analyze(parameters: &[Parameter]) -> Vec<Dependency> {
        let mut dependencies = Vec::new();
        for param in parameters {
            let Some(value) = param.value.as_str() else {
                continue;
            };
            for caps in reference_re().captures_iter(value) {
                dependencies.push(Dependency {
                    from: param.id.clone(),
                    to: caps[1].to_string(),
                    kind: DependencyKind::References,
                });
            }
        }
        dependencies
    }
}

/// Directed graph view over analyzer edges, for consumers that want to
/// query reachability or cycles.
pub struct DependencyGraph {
    graph: DiGraph<String, DependencyKind>,
    indices: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn from_dependencies(dependencies: &[Dependency]) -> Self {
        let mut graph = DiGraph::new();
        let mut indices: HashMap<String, NodeIndex> = HashMap::new();
        for dep in dependencies {
            let from = *indices
                .entry(dep.from.clone())
                .or_insert_with(|| graph.add_node(dep.from.clone()));
            let to = *indices
                .entry(dep.to.clone())
                .or_insert_with(|| graph.add_node(dep.to.clone()));
            graph.add_edge(from, to, dep.kind);
        }
        Self { graph, indices }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Entities the given entity points at.
    pub fn references_of(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Entities pointing at the given entity.
    pub fn dependents_of(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Incoming)
    }

    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&str> {
        let Some(&index) = self.indices.get(id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(index, direction)
            .map(|n| self.graph[n].as_str())
            .collect()
    }
}
