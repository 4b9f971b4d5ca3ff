use crate::utils::types::VertexIdx;
use thiserror::Error;

/// Errors surfaced by the triangulation engine.
///
/// Every error is fatal for the call that produced it; the engine never
/// retries and never returns a partially built mesh.
#[derive(Debug, Error)]
pub enum TriangulationError {
    /// The point set was empty, there is nothing to triangulate.
    #[error("Needs at least 1 vertex to compute a 2D triangulation!")]
    NoInput,

    /// All input points are collinear within tolerance, no triangle can be formed.
    #[error("All points are aligned, i.e. could not find 3 non-aligned points!")]
    DegenerateInput,

    /// A required boundary edge could not be enforced by diagonal flips.
    #[error("Required edge [{}, {}] could not be legalized: {reason}", edge[0], edge[1])]
    ConstraintViolation {
        edge: [VertexIdx; 2],
        reason: &'static str,
    },

    /// A circumcircle computation hit a singular configuration that no
    /// fallback bisector pairing resolved.
    #[error("Numerical degeneracy: {0}")]
    NumericalDegeneracy(String),
}
