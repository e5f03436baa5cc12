use serde::{Deserialize, Serialize};

/// Category of a social bond, derived from a social-graph edge distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocialRelationship {
    Neighbor,
    Family,
    Coworker,
    Friend,
    Enemy,
}

/// One side of a social bond, held by a character and naming the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialTie {
    pub partner: String,
    pub relationship: SocialRelationship,
}

/// An undirected, weighted edge between two cast members, by cast index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocialEdge {
    pub a: usize,
    pub b: usize,
    /// In `1..=max_distance`.
    pub distance: u32,
}

impl SocialEdge {
    /// The unordered pair this edge connects, smaller index first.
    pub fn key(&self) -> (usize, usize) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }

    pub fn touches(&self, vertex: usize) -> bool {
        self.a == vertex || self.b == vertex
    }
}
