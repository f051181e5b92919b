//! Attribute-weighted transition graph.
//!
//! A small undirected graph for tracking entity state transitions, used by
//! demo and test code around the kernel — the kernel itself never touches
//! it. Nodes carry arbitrary [`Value`] attributes, edges carry named float
//! attributes (such as `cost`), and any edge attribute can serve as the
//! weight for a lowest-cost path query.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};

use eddy_core::Value;

/// Errors from transition-graph queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// A named node is not in the graph.
    UnknownNode {
        /// The missing node's id.
        id: String,
    },
    /// No path connects the two nodes.
    NoPath {
        /// Start node id.
        from: String,
        /// Goal node id.
        to: String,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { id } => write!(f, "unknown node '{id}'"),
            Self::NoPath { from, to } => write!(f, "no path from '{from}' to '{to}'"),
        }
    }
}

impl Error for GraphError {}

/// Attributes attached to a node.
pub type NodeAttrs = IndexMap<String, Value>;
/// Named float attributes attached to an edge.
pub type EdgeAttrs = IndexMap<String, f64>;

struct NodeData {
    id: String,
    attrs: NodeAttrs,
}

/// An undirected graph of named nodes with attribute-weighted edges.
#[derive(Default)]
pub struct TransitionGraph {
    graph: UnGraph<NodeData, EdgeAttrs>,
    index: IndexMap<String, NodeIndex>,
}

impl TransitionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with attributes. Re-adding an id replaces its attributes.
    pub fn add_node(&mut self, id: &str, attrs: NodeAttrs) {
        match self.index.get(id) {
            Some(&ix) => self.graph[ix].attrs = attrs,
            None => {
                let ix = self.graph.add_node(NodeData { id: id.to_string(), attrs });
                self.index.insert(id.to_string(), ix);
            }
        }
    }

    /// Add an undirected edge with attributes, creating missing endpoints
    /// with empty attribute sets.
    pub fn add_edge(&mut self, from: &str, to: &str, attrs: EdgeAttrs) {
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        self.graph.add_edge(a, b, attrs);
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        match self.index.get(id) {
            Some(&ix) => ix,
            None => {
                let ix = self.graph.add_node(NodeData {
                    id: id.to_string(),
                    attrs: NodeAttrs::new(),
                });
                self.index.insert(id.to_string(), ix);
                ix
            }
        }
    }

    /// The attributes of `id`, if the node exists.
    pub fn node_attrs(&self, id: &str) -> Option<&NodeAttrs> {
        self.index.get(id).map(|&ix| &self.graph[ix].attrs)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// The lowest-cost node path from `from` to `to`, weighting each edge
    /// by its `attribute` value.
    ///
    /// Edges lacking the attribute cost 1.0. Returns the node ids along the
    /// path, endpoints included.
    pub fn lowest_cost_path_by(
        &self,
        attribute: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<String>, GraphError> {
        let start = self.resolve(from)?;
        let goal = self.resolve(to)?;

        let result = astar(
            &self.graph,
            start,
            |n| n == goal,
            |e| e.weight().get(attribute).copied().unwrap_or(1.0),
            |_| 0.0,
        );

        match result {
            Some((_cost, path)) => Ok(path
                .into_iter()
                .map(|ix| self.graph[ix].id.clone())
                .collect()),
            None => Err(GraphError::NoPath {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }

    fn resolve(&self, id: &str) -> Result<NodeIndex, GraphError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode { id: id.to_string() })
    }
}
