//! # Deltri
//!
//! An implementation of 2D delaunay triangulation via incremental insertion, with
//! edge legalization for constrained cross-section meshes.

pub use error::TriangulationError;
pub use pointset::PointSet;
pub use triangulation::Triangulation;
pub use trimesh::{EdgeKey, TriMesh};
pub use utils::types::{IndexedEdge, IndexedTriangle, Triangle2, Vertex2, VertexIdx, EPSILON};

mod error;
mod pointset;
pub mod predicates;
mod supertri;
pub mod triangulation;
pub mod trimesh;
mod utils;
