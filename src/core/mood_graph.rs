/// Mood graph — a fixed weighted undirected graph over mood categories,
/// queried for shortest tonal distances between narratives.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use thiserror::Error;

use crate::schema::event::Mood;

/// Distance reported for moods with no path from the start vertex.
pub const UNREACHABLE: u32 = u32::MAX;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoodGraphError {
    #[error("mood {0:?} is not a vertex of the mood graph")]
    NotFound(Mood),
    #[error("edge {a:?} -> {b:?} references a mood that is not a vertex")]
    UnknownEndpoint { a: Mood, b: Mood },
    #[error("edge {a:?} -> {b:?} has zero distance")]
    ZeroDistance { a: Mood, b: Mood },
}

/// A weighted edge between two moods, as authored in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoodEdge {
    pub a: Mood,
    pub b: Mood,
    pub distance: u32,
}

/// Result of a single-source shortest-path query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    start: Mood,
    distances: FxHashMap<Mood, u32>,
}

impl DistanceMap {
    pub fn start(&self) -> Mood {
        self.start
    }

    /// Distance to `mood`, or [`UNREACHABLE`] if no path exists.
    pub fn get(&self, mood: Mood) -> Result<u32, MoodGraphError> {
        self.distances
            .get(&mood)
            .copied()
            .ok_or(MoodGraphError::NotFound(mood))
    }

    pub fn is_reachable(&self, mood: Mood) -> bool {
        matches!(self.get(mood), Ok(d) if d != UNREACHABLE)
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// Immutable after construction; rebuild to change.
#[derive(Debug, Clone, Default)]
pub struct MoodGraph {
    vertices: Vec<Mood>,
    edges: Vec<MoodEdge>,
    adjacency: FxHashMap<Mood, Vec<(Mood, u32)>>,
}

impl MoodGraph {
    /// Build the graph. Duplicate vertices collapse to one; duplicate edges
    /// (same endpoints and distance) collapse to one. Adjacency is recorded
    /// in both directions.
    pub fn build(vertices: &[Mood], edges: &[MoodEdge]) -> Result<MoodGraph, MoodGraphError> {
        let mut unique_vertices = Vec::with_capacity(vertices.len());
        let mut adjacency: FxHashMap<Mood, Vec<(Mood, u32)>> = FxHashMap::default();
        for &mood in vertices {
            if !adjacency.contains_key(&mood) {
                adjacency.insert(mood, Vec::new());
                unique_vertices.push(mood);
            }
        }

        let mut seen: FxHashSet<MoodEdge> = FxHashSet::default();
        let mut unique_edges = Vec::with_capacity(edges.len());
        for &edge in edges {
            if !adjacency.contains_key(&edge.a) || !adjacency.contains_key(&edge.b) {
                return Err(MoodGraphError::UnknownEndpoint { a: edge.a, b: edge.b });
            }
            if edge.distance == 0 {
                return Err(MoodGraphError::ZeroDistance { a: edge.a, b: edge.b });
            }
            if !seen.insert(edge) {
                continue;
            }
            unique_edges.push(edge);

            if let Some(list) = adjacency.get_mut(&edge.a) {
                list.push((edge.b, edge.distance));
            }
            if let Some(list) = adjacency.get_mut(&edge.b) {
                list.push((edge.a, edge.distance));
            }
        }

        tracing::debug!(
            vertices = unique_vertices.len(),
            edges = unique_edges.len(),
            "built mood graph"
        );

        Ok(MoodGraph {
            vertices: unique_vertices,
            edges: unique_edges,
            adjacency,
        })
    }

    pub fn vertices(&self) -> &[Mood] {
        &self.vertices
    }

    pub fn edges(&self) -> &[MoodEdge] {
        &self.edges
    }

    pub fn contains(&self, mood: Mood) -> bool {
        self.adjacency.contains_key(&mood)
    }

    /// Neighbors of `mood` with the connecting edge distance.
    pub fn neighbors(&self, mood: Mood) -> Result<&[(Mood, u32)], MoodGraphError> {
        self.adjacency
            .get(&mood)
            .map(Vec::as_slice)
            .ok_or(MoodGraphError::NotFound(mood))
    }

    /// Dijkstra from `start` over every vertex.
    ///
    /// Neighbors are pushed without checking whether they are already final;
    /// stale entries are dropped when popped.
    pub fn shortest_distances(&self, start: Mood) -> Result<DistanceMap, MoodGraphError> {
        if !self.contains(start) {
            return Err(MoodGraphError::NotFound(start));
        }

        let mut distances: FxHashMap<Mood, u32> =
            self.vertices.iter().map(|&m| (m, UNREACHABLE)).collect();
        let mut finalized: FxHashSet<Mood> = FxHashSet::default();
        let mut frontier = BinaryHeap::new();
        distances.insert(start, 0);
        frontier.push(Reverse((0u32, start)));

        while finalized.len() < self.vertices.len() {
            let Some(Reverse((distance, mood))) = frontier.pop() else {
                break;
            };
            if !finalized.insert(mood) {
                continue;
            }
            if let Some(best) = distances.get_mut(&mood) {
                *best = (*best).min(distance);
            }
            for &(neighbor, weight) in self.neighbors(mood)? {
                frontier.push(Reverse((distance.saturating_add(weight), neighbor)));
            }
        }

        Ok(DistanceMap { start, distances })
    }

    /// True when every vertex is reachable from every other.
    pub fn is_connected(&self) -> bool {
        let Some(&first) = self.vertices.first() else {
            return true;
        };
        match self.shortest_distances(first) {
            Ok(map) => self.vertices.iter().all(|&m| map.is_reachable(m)),
            Err(_) => false,
        }
    }
}
