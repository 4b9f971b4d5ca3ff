//! Ordered, tolerance-deduplicated input point sets.

use crate::utils::types::{coincident, Vertex2, VertexIdx, EPSILON};

/// An ordered sequence of unique 2D vertices.
///
/// Insertion order is preserved because it is the incremental-insertion order
/// of the triangulation, which shapes the exact triangle decomposition (never
/// its Delaunay validity). No two stored vertices are equal under the set's
/// tolerance; [`push`](Self::push) merges a duplicate into the vertex it
/// matches instead of storing it twice.
///
/// ```
/// use deltri::PointSet;
///
/// let mut points = PointSet::new(None);
/// assert!(points.push([0.0, 0.0]));
/// assert!(points.push([1.0, 0.0]));
/// assert!(!points.push([1e-12, 0.0])); // merged with the first vertex
/// assert_eq!(points.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PointSet {
    vertices: Vec<Vertex2>,
    epsilon: f64,
}

impl Default for PointSet {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PointSet {
    #[must_use]
    pub fn new(epsilon: Option<f64>) -> Self {
        Self {
            vertices: Vec::new(),
            epsilon: epsilon.unwrap_or(EPSILON),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize, epsilon: Option<f64>) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            epsilon: epsilon.unwrap_or(EPSILON),
        }
    }

    /// Builds a set from a vertex slice, merging duplicates along the way.
    #[must_use]
    pub fn from_vertices(vertices: &[Vertex2], epsilon: Option<f64>) -> Self {
        let mut set = Self::with_capacity(vertices.len(), epsilon);
        for &v in vertices {
            set.push(v);
        }
        set
    }

    /// Appends a vertex, unless it coincides with a stored one within the
    /// set's tolerance. Returns whether the vertex was actually added.
    ///
    /// Tolerance equality cannot be hashed, so the duplicate check is a
    /// linear scan.
    pub fn push(&mut self, v: Vertex2) -> bool {
        if self.position(&v).is_some() {
            return false;
        }
        self.vertices.push(v);
        true
    }

    /// Index of the stored vertex coinciding with `v`, if any.
    #[must_use]
    pub fn position(&self, v: &Vertex2) -> Option<VertexIdx> {
        self.vertices
            .iter()
            .position(|stored| coincident(stored, v, self.epsilon))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vertex2] {
        &self.vertices
    }

    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }
}
