/// Social graph — Erdős–Rényi-style random edges between cast members,
/// and the mapping from edge distance to a social relationship.

use rand::rngs::StdRng;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::character::Character;
use crate::schema::relationship::{SocialEdge, SocialRelationship, SocialTie};

#[derive(Debug, Error, PartialEq)]
pub enum SocialGraphError {
    #[error("maximum edge distance must be at least 1")]
    InvalidMaxDistance,
    #[error("edge threshold {0} is outside 0.0..=1.0")]
    InvalidThreshold(f32),
    #[error("edge {a}-{b} references a character outside the cast of {cast_size}")]
    VertexOutOfRange { a: usize, b: usize, cast_size: usize },
}

/// Shares of each social relationship, consumed in declaration order.
/// Whatever the first four leave over goes to `Enemy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialWeights {
    pub neighbor: f32,
    pub family: f32,
    pub coworker: f32,
    pub friend: f32,
    /// Informational; enemies take the residual share.
    #[serde(default)]
    pub enemy: f32,
}

impl Default for SocialWeights {
    fn default() -> Self {
        Self {
            neighbor: 0.25,
            family: 0.15,
            coworker: 0.2,
            friend: 0.2,
            enemy: 0.2,
        }
    }
}

/// Undirected social graph over cast indices. The edge list is the source of
/// truth; adjacency is always derived from it and therefore symmetric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialGraph {
    vertex_count: usize,
    max_distance: u32,
    edges: Vec<SocialEdge>,
}

impl SocialGraph {
    /// Sample edges for `vertex_count` characters.
    ///
    /// Pairs are visited with `i` then `j` ascending over the full square,
    /// skipping self pairs and pairs already joined. Each visited pair draws
    /// once; a draw below `edge_threshold` creates an edge whose distance
    /// scales with how close the draw came to the threshold.
    pub fn build(
        vertex_count: usize,
        edge_threshold: f32,
        max_distance: u32,
        rng: &mut StdRng,
    ) -> Result<SocialGraph, SocialGraphError> {
        if max_distance < 1 {
            return Err(SocialGraphError::InvalidMaxDistance);
        }
        if !(0.0..=1.0).contains(&edge_threshold) {
            return Err(SocialGraphError::InvalidThreshold(edge_threshold));
        }

        let mut connected: FxHashSet<(usize, usize)> = FxHashSet::default();
        let mut edges = Vec::new();

        for i in 0..vertex_count {
            for j in 0..vertex_count {
                if i == j || connected.contains(&(i.min(j), i.max(j))) {
                    continue;
                }

                let draw: f32 = rng.gen();
                if draw < edge_threshold {
                    let edge = SocialEdge {
                        a: i,
                        b: j,
                        distance: edge_distance(draw, edge_threshold, max_distance),
                    };
                    connected.insert(edge.key());
                    edges.push(edge);
                }
            }
        }

        tracing::info!(
            characters = vertex_count,
            edge_threshold,
            edges = edges.len(),
            "generated social relationships"
        );

        Ok(SocialGraph {
            vertex_count,
            max_distance,
            edges,
        })
    }

    /// Assemble a graph from an existing edge list, e.g. a saved cast.
    pub fn from_edges(
        vertex_count: usize,
        max_distance: u32,
        edges: Vec<SocialEdge>,
    ) -> Result<SocialGraph, SocialGraphError> {
        if max_distance < 1 {
            return Err(SocialGraphError::InvalidMaxDistance);
        }
        if let Some(bad) = edges
            .iter()
            .find(|e| e.a >= vertex_count || e.b >= vertex_count)
        {
            return Err(SocialGraphError::VertexOutOfRange {
                a: bad.a,
                b: bad.b,
                cast_size: vertex_count,
            });
        }
        Ok(SocialGraph {
            vertex_count,
            max_distance,
            edges,
        })
    }

    pub fn edges(&self) -> &[SocialEdge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn max_distance(&self) -> u32 {
        self.max_distance
    }

    /// Symmetric adjacency view: for each vertex, `(neighbor, distance)`
    /// in edge-list order.
    pub fn adjacency(&self) -> Vec<Vec<(usize, u32)>> {
        let mut adjacency = vec![Vec::new(); self.vertex_count];
        for edge in &self.edges {
            adjacency[edge.a].push((edge.b, edge.distance));
            adjacency[edge.b].push((edge.a, edge.distance));
        }
        adjacency
    }

    pub fn degree(&self, vertex: usize) -> usize {
        self.edges.iter().filter(|e| e.touches(vertex)).count()
    }
}

/// `round(draw / threshold * max_distance)` clamped to `1..=max_distance`.
fn edge_distance(draw: f32, threshold: f32, max_distance: u32) -> u32 {
    let alpha = draw / threshold;
    let scaled = (alpha * max_distance as f32).round() as u32;
    scaled.clamp(1, max_distance)
}

/// Map an edge distance onto a relationship. `distance / max_distance` is
/// matched against consecutive inclusive intervals sized by the weights, in
/// the order neighbor, family, coworker, friend; anything beyond is enemy.
pub fn classify(distance: u32, max_distance: u32, weights: &SocialWeights) -> SocialRelationship {
    let p = distance as f32 / max_distance.max(1) as f32;

    let bands = [
        (weights.neighbor, SocialRelationship::Neighbor),
        (weights.family, SocialRelationship::Family),
        (weights.coworker, SocialRelationship::Coworker),
        (weights.friend, SocialRelationship::Friend),
    ];

    let mut start = 0.0;
    for (share, relationship) in bands {
        let end = start + share;
        if p >= start && p <= end {
            return relationship;
        }
        start = end;
    }
    SocialRelationship::Enemy
}

/// Classify every edge and append a tie to both endpoints, each naming the
/// other character.
pub fn apply_social_ties(
    characters: &mut [Character],
    graph: &SocialGraph,
    weights: &SocialWeights,
) -> Result<(), SocialGraphError> {
    for edge in graph.edges() {
        if edge.a >= characters.len() || edge.b >= characters.len() {
            return Err(SocialGraphError::VertexOutOfRange {
                a: edge.a,
                b: edge.b,
                cast_size: characters.len(),
            });
        }
        let relationship = classify(edge.distance, graph.max_distance(), weights);
        let name_a = characters[edge.a].name().to_string();
        let name_b = characters[edge.b].name().to_string();

        characters[edge.a].social.push(SocialTie {
            partner: name_b,
            relationship,
        });
        characters[edge.b].social.push(SocialTie {
            partner: name_a,
            relationship,
        });
    }
    Ok(())
}
