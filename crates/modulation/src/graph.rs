//! Common-chord graph over the 34 keys
//!
//! Each key is a node carrying its diatonic triads (without the supertonic
//! in major). Two keys are joined when they share triads; the shared set is
//! the edge weight. The parallel major/minor pair on one tonic is joined by
//! the union of their triads instead, for modal mixture. Node indices follow
//! the canonical key order, so sorting indices sorts keys.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::OnceLock;

use notation::{Key, KeyMode, Triad};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::info;

static GRAPH: OnceLock<ModulationGraph> = OnceLock::new();

/// A key and the triads it offers for pivoting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyNode {
    pub key: Key,
    pub triads: BTreeSet<Triad>,
}

impl KeyNode {
    pub fn new(key: Key) -> Self {
        let triads = key
            .triads()
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !(key.mode == KeyMode::Major && *i == 1))
            .map(|(_, triad)| triad)
            .collect();
        Self { key, triads }
    }
}

/// Serializable view of one edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeSnapshot {
    pub from: Key,
    pub to: Key,
    pub shared: Vec<Triad>,
}

pub struct ModulationGraph {
    inner: UnGraph<KeyNode, Vec<Triad>>,
    index_map: HashMap<Key, NodeIndex>,
}

impl ModulationGraph {
    /// Build the graph from scratch
    pub fn build() -> Self {
        let mut inner = UnGraph::new_undirected();
        let mut index_map = HashMap::new();
        for key in Key::all() {
            let index = inner.add_node(KeyNode::new(key));
            index_map.insert(key, index);
        }

        let indices: Vec<NodeIndex> = inner.node_indices().collect();
        for (i, &a) in indices.iter().enumerate() {
            for &b in &indices[i + 1..] {
                let (left, right) = (&inner[a], &inner[b]);
                let shared: Vec<Triad> = if left.key.tonic == right.key.tonic {
                    left.triads.union(&right.triads).copied().collect()
                } else {
                    left.triads.intersection(&right.triads).copied().collect()
                };
                if !shared.is_empty() {
                    inner.add_edge(a, b, shared);
                }
            }
        }

        info!(
            nodes = inner.node_count(),
            edges = inner.edge_count(),
            "built modulation graph"
        );
        Self { inner, index_map }
    }

    /// Process-wide graph, built on first use
    pub fn shared() -> &'static ModulationGraph {
        GRAPH.get_or_init(Self::build)
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn index_of(&self, key: &Key) -> Option<NodeIndex> {
        self.index_map.get(key).copied()
    }

    pub fn node(&self, key: &Key) -> Option<&KeyNode> {
        self.inner.node_weight(self.index_of(key)?)
    }

    pub fn node_at(&self, index: NodeIndex) -> Option<&KeyNode> {
        self.inner.node_weight(index)
    }

    /// Triads shared by two keys, `None` when they are not adjacent
    pub fn shared_triads(&self, a: &Key, b: &Key) -> Option<&[Triad]> {
        let edge = self.inner.find_edge(self.index_of(a)?, self.index_of(b)?)?;
        self.inner.edge_weight(edge).map(|t| t.as_slice())
    }

    /// Neighbour indices in canonical key order
    pub fn neighbor_indices(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.inner.neighbors(index).collect();
        neighbors.sort();
        neighbors
    }

    /// Adjacent keys with their shared triads, in canonical key order
    pub fn neighbors(&self, key: &Key) -> Vec<(Key, &[Triad])> {
        let Some(index) = self.index_of(key) else {
            return vec![];
        };
        let mut neighbors: Vec<(NodeIndex, Key, &[Triad])> = self
            .inner
            .edges(index)
            .map(|e| {
                let other = if e.source() == index { e.target() } else { e.source() };
                (other, self.inner[other].key, e.weight().as_slice())
            })
            .collect();
        neighbors.sort_by_key(|(other, _, _)| *other);
        neighbors
            .into_iter()
            .map(|(_, key, shared)| (key, shared))
            .collect()
    }

    /// Every key reachable from `key`, excluding itself, in discovery order
    pub fn reachable(&self, key: &Key) -> Vec<Key> {
        let Some(start) = self.index_of(key) else {
            return vec![];
        };

        let mut result = Vec::new();
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(index) = queue.pop_front() {
            for neighbor in self.neighbor_indices(index) {
                if visited.insert(neighbor) {
                    result.push(self.inner[neighbor].key);
                    queue.push_back(neighbor);
                }
            }
        }

        result
    }

    /// All edges, lower canonical key first, ordered by that key
    pub fn edges(&self) -> Vec<EdgeSnapshot> {
        let mut edges: Vec<EdgeSnapshot> = self
            .inner
            .edge_references()
            .map(|e| {
                let (a, b) = (e.source().min(e.target()), e.source().max(e.target()));
                EdgeSnapshot {
                    from: self.inner[a].key,
                    to: self.inner[b].key,
                    shared: e.weight().clone(),
                }
            })
            .collect();
        edges.sort_by_key(|e| (e.from.ordinal(), e.to.ordinal()));
        edges
    }
}
