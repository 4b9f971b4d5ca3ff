// Type aliases for data values.
pub type Vertex2 = [f64; 2];
pub type Triangle2 = [Vertex2; 3];

// Type aliases for data indices.
// This is to know, when a function accepts or returns a usize, what it is for.
pub type VertexIdx = usize;
pub type TriIdx = usize;

/// A triangle referencing its corner vertices by index, in CCW order.
pub type IndexedTriangle = [VertexIdx; 3];
/// A directed edge referencing its endpoint vertices by index.
pub type IndexedEdge = [VertexIdx; 2];

/// Default tolerance for vertex equality and degeneracy classification.
///
/// Sessions at unusual coordinate scales should pass their own epsilon to
/// [`PointSet::new`](crate::PointSet::new) and
/// [`Triangulation::build`](crate::Triangulation::build) instead.
pub const EPSILON: f64 = 1e-9;

/// Tolerance-based vertex equality: `|Δx| ≤ eps ∧ |Δy| ≤ eps`.
#[must_use]
pub fn coincident(a: &Vertex2, b: &Vertex2, eps: f64) -> bool {
    (a[0] - b[0]).abs() <= eps && (a[1] - b[1]).abs() <= eps
}

/// Squared euclidean distance between two vertices.
#[must_use]
pub fn dist_sq(a: &Vertex2, b: &Vertex2) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    dx * dx + dy * dy
}
