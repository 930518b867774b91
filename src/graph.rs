// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! The graph helper shared by every rule in [`crate::rules`] (§4.D: "All
//! graph constructions share a common helper").
//!
//! [`DungeonGraph`] is built once per evaluated level and handed to each
//! rule by shared reference; it is never mutated after construction, so no
//! synchronization is required even when rules run in parallel (§5).

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::model::{Level, NodeId};

/// Configuration for how the graph is built from a [`Level`].
///
/// `corridors_as_nodes` resolves the Open Question of spec.md §9: whether
/// corridors count as nodes for degree-based rules, or only as edges. The
/// spec prefers treating them as first-class nodes; this is the default.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphOptions {
    pub corridors_as_nodes: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        GraphOptions {
            corridors_as_nodes: true,
        }
    }
}

/// The undirected, deduplicated adjacency graph of a single level (§4.D
/// common helper), plus precomputed entrance/exit.
#[derive(Clone, Debug)]
pub struct DungeonGraph {
    nodes: Vec<NodeId>,
    adjacency: HashMap<NodeId, HashSet<NodeId>>,
    /// Deduplicated undirected edge count (I2: duplicate edges collapsed).
    edge_count: usize,
    entrance: Option<NodeId>,
    exit: Option<NodeId>,
}

impl DungeonGraph {
    /// Builds the graph from a level's rooms, corridors, and connections.
    /// `entrance`/`exit` should already have been resolved by
    /// [`crate::inference`] before this is called.
    pub fn build(
        level: &Level,
        options: GraphOptions,
        entrance: Option<NodeId>,
        exit: Option<NodeId>,
    ) -> Self {
        let mut nodes: Vec<NodeId> = level
            .rooms
            .iter()
            .map(|r| NodeId::Room(r.id.clone()))
            .collect();
        if options.corridors_as_nodes {
            nodes.extend(level.corridors.iter().map(|c| NodeId::Corridor(c.id.clone())));
        }

        let resolve = |raw_id: &str| -> Option<NodeId> {
            if level.rooms.iter().any(|r| r.id == raw_id) {
                Some(NodeId::Room(raw_id.to_string()))
            } else if options.corridors_as_nodes && level.corridors.iter().any(|c| c.id == raw_id)
            {
                Some(NodeId::Corridor(raw_id.to_string()))
            } else {
                None
            }
        };

        let mut adjacency: HashMap<NodeId, HashSet<NodeId>> =
            nodes.iter().cloned().map(|n| (n, HashSet::new())).collect();
        let mut edge_count = 0usize;
        let mut seen_edges: HashSet<(NodeId, NodeId)> = HashSet::new();

        for conn in &level.connections {
            let (Some(a), Some(b)) = (resolve(&conn.from_room), resolve(&conn.to_room)) else {
                continue;
            };
            if a == b {
                continue;
            }
            let key = if a < b { (a.clone(), b.clone()) } else { (b.clone(), a.clone()) };
            if seen_edges.insert(key) {
                edge_count += 1;
            }
            adjacency.entry(a.clone()).or_default().insert(b.clone());
            adjacency.entry(b).or_default().insert(a);
        }

        DungeonGraph {
            nodes,
            adjacency,
            edge_count,
            entrance,
            exit,
        }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn degree(&self, node: &NodeId) -> usize {
        self.adjacency.get(node).map_or(0, |s| s.len())
    }

    pub fn neighbors(&self, node: &NodeId) -> impl Iterator<Item = &NodeId> {
        self.adjacency.get(node).into_iter().flatten()
    }

    pub fn entrance(&self) -> Option<&NodeId> {
        self.entrance.as_ref()
    }

    pub fn exit(&self) -> Option<&NodeId> {
        self.exit.as_ref()
    }

    /// Unweighted BFS distances from `start` to every node reachable from
    /// it. The start node has distance 0.
    pub fn bfs_distances(&self, start: &NodeId) -> HashMap<NodeId, usize> {
        let mut distances = HashMap::new();
        if !self.adjacency.contains_key(start) {
            return distances;
        }
        let mut queue = VecDeque::new();
        distances.insert(start.clone(), 0);
        queue.push_back(start.clone());
        while let Some(current) = queue.pop_front() {
            let d = distances[&current];
            for neighbor in self.neighbors(&current) {
                if !distances.contains_key(neighbor) {
                    distances.insert(neighbor.clone(), d + 1);
                    queue.push_back(neighbor.clone());
                }
            }
        }
        distances
    }

    /// The connected components of the graph, as sets of node ids.
    pub fn connected_components(&self) -> Vec<HashSet<NodeId>> {
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut components = Vec::new();
        for node in &self.nodes {
            if visited.contains(node) {
                continue;
            }
            let reached = self.bfs_distances(node);
            let component: HashSet<NodeId> = reached.into_keys().collect();
            visited.extend(component.iter().cloned());
            components.push(component);
        }
        components
    }

    /// Cyclomatic number `μ = E − V + C` (§4.D.6, glossary).
    pub fn cyclomatic_number(&self) -> i64 {
        let v = self.node_count() as i64;
        let e = self.edge_count() as i64;
        let c = self.connected_components().len() as i64;
        e - v + c
    }

    /// BFS distance plus the number of distinct shortest paths to each
    /// reachable node, used by path_diversity (§4.D.7). Standard
    /// shortest-path-counting BFS: a node's count accumulates the counts
    /// of every predecessor at distance `d - 1`.
    pub fn bfs_distances_and_path_counts(&self, start: &NodeId) -> HashMap<NodeId, (usize, u64)> {
        let mut result = HashMap::new();
        if !self.adjacency.contains_key(start) {
            return result;
        }
        result.insert(start.clone(), (0, 1u64));
        let mut queue = VecDeque::new();
        queue.push_back(start.clone());
        while let Some(current) = queue.pop_front() {
            let (d, count) = result[&current];
            for neighbor in self.neighbors(&current) {
                match result.get(neighbor) {
                    None => {
                        result.insert(neighbor.clone(), (d + 1, count));
                        queue.push_back(neighbor.clone());
                    }
                    Some(&(nd, ncount)) if nd == d + 1 => {
                        result.insert(neighbor.clone(), (nd, ncount + count));
                    }
                    _ => {}
                }
            }
        }
        result
    }
}
