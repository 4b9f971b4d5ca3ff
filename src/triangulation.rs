//! Incremental 2D Delaunay triangulation.

use log::error;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    error::TriangulationError,
    pointset::PointSet,
    predicates::{self, Orientation},
    supertri,
    trimesh::{EdgeKey, TriMesh},
    utils::types::{dist_sq, IndexedEdge, IndexedTriangle, TriIdx, Triangle2, Vertex2, VertexIdx},
};

/// A 2D Delaunay triangulation built by incremental insertion into an
/// enclosing triangle.
///
/// [`build`](Self::build) seeds the mesh with a synthetic triangle around all
/// input vertices and inserts the vertices one by one, in input order. Each
/// insertion removes the triangles whose circumcircle contains the new vertex
/// and re-fans the cavity. The synthetic corners stay in the mesh until
/// [`extract`](Self::extract) filters out every triangle attached to them.
///
/// ```
/// use deltri::{PointSet, Triangulation};
///
/// let points = PointSet::from_vertices(
///     &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
///     None,
/// );
///
/// let triangulation = Triangulation::build(&points, None)?;
/// assert_eq!(triangulation.extract().len(), 2);
/// # Ok::<(), deltri::TriangulationError>(())
/// ```
pub struct Triangulation {
    pub mesh: TriMesh,
    /// Input vertices first, then the three synthetic corners.
    points: Vec<Vertex2>,
    num_input: usize,
    epsilon: f64,
    time_searching: u128,
    time_meshing: u128,
    time_legalizing: u128,
}

impl Triangulation {
    /// Triangulates a point set.
    ///
    /// `epsilon` overrides the tolerance the predicates run with; by default
    /// the point set's own tolerance is used. Vertices are inserted in the
    /// order the set stores them.
    pub fn build(points: &PointSet, epsilon: Option<f64>) -> Result<Self, TriangulationError> {
        let epsilon = epsilon.unwrap_or(points.epsilon());
        let input = points.vertices();

        if input.is_empty() {
            return Err(TriangulationError::NoInput);
        }
        if input.len() >= 3 && all_collinear(input, epsilon) {
            return Err(TriangulationError::DegenerateInput);
        }

        let now = std::time::Instant::now();
        let enclosing = supertri::super_triangle(input, epsilon)?;

        let mut triangulation = Self {
            mesh: TriMesh::new(),
            points: input.to_vec(),
            num_input: input.len(),
            epsilon,
            time_searching: 0,
            time_meshing: 0,
            time_legalizing: 0,
        };

        let s = triangulation.num_input;
        triangulation.points.extend_from_slice(&enclosing);
        triangulation.mesh.add_tri([s, s + 1, s + 2]);

        log::trace!(
            "Enclosing triangle inserted in {:.4} µs",
            now.elapsed().as_micros()
        );
        log::debug!("Inserting {} vertices", s);

        for v_idx in 0..s {
            triangulation.insert(v_idx)?;
        }

        triangulation.log_time();

        Ok(triangulation)
    }

    /// Inserts one vertex: collect the triangles whose circumcircle contains
    /// it, carve out that cavity and re-fan its boundary around the vertex.
    fn insert(&mut self, v_idx: VertexIdx) -> Result<(), TriangulationError> {
        let v = self.points[v_idx];

        let now = std::time::Instant::now();
        let mut bad_tris = Vec::new();
        for (tri_idx, tri) in self.mesh.iter_alive() {
            let t = self.coords(tri);
            if predicates::in_circumcircle(&t, &v, self.epsilon)? {
                bad_tris.push((tri_idx, tri));
            }
        }
        self.time_searching += now.elapsed().as_micros();

        if bad_tris.is_empty() {
            return Err(TriangulationError::NumericalDegeneracy(format!(
                "vertex {v_idx} at {v:?} falls in no circumcircle, the mesh cannot grow around it"
            )));
        }

        let now = std::time::Instant::now();
        let bad_idxs: Vec<TriIdx> = bad_tris.iter().map(|&(idx, _)| idx).collect();

        // The cavity boundary consists of the directed edges owned by exactly
        // one bad triangle. Directed edges of ccw triangles keep the fan ccw.
        let mut boundary = Vec::new();
        for &(tri_idx, tri) in &bad_tris {
            for (u, w) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let shared_with_bad = self
                    .mesh
                    .edge_owners(EdgeKey::new(u, w))
                    .iter()
                    .any(|&owner| owner != tri_idx && bad_idxs.contains(&owner));
                if !shared_with_bad {
                    boundary.push([u, w]);
                }
            }
        }

        for idx in bad_idxs {
            self.mesh.remove_tri(idx);
        }
        for [u, w] in boundary {
            self.mesh.add_tri([u, w, v_idx]);
        }
        self.time_meshing += now.elapsed().as_micros();

        Ok(())
    }

    /// Forces the given edges into the triangulation by flipping the
    /// diagonals that cross them.
    ///
    /// Each required edge is restored by repeatedly flipping a flippable
    /// diagonal that properly crosses the segment, until the edge itself
    /// appears in the mesh. The result is generally no longer Delaunay. An
    /// edge that cannot be produced this way, e.g. because a third vertex
    /// lies on the segment, fails with
    /// [`ConstraintViolation`](TriangulationError::ConstraintViolation).
    pub fn legalize_edges(&mut self, edges: &[IndexedEdge]) -> Result<(), TriangulationError> {
        let now = std::time::Instant::now();

        for &edge in edges {
            let [a, b] = edge;
            if a >= self.num_input || b >= self.num_input {
                return Err(TriangulationError::ConstraintViolation {
                    edge,
                    reason: "vertex index out of range",
                });
            }
            if a == b {
                return Err(TriangulationError::ConstraintViolation {
                    edge,
                    reason: "edge endpoints coincide",
                });
            }

            let required = EdgeKey::new(a, b);
            let mut budget = 4 * (self.mesh.num_tris() + self.mesh.num_deleted_tris()).max(16);

            while !self.mesh.has_edge(required) {
                if budget == 0 {
                    return Err(TriangulationError::ConstraintViolation {
                        edge,
                        reason: "no legal flip sequence",
                    });
                }
                budget -= 1;

                let crossing = self.crossing_diagonals(a, b);
                if crossing.is_empty() {
                    return Err(TriangulationError::ConstraintViolation {
                        edge,
                        reason: "not reachable by edge flips",
                    });
                }

                let mut flipped = false;
                for key in crossing {
                    if self.try_flip(key) {
                        flipped = true;
                        break;
                    }
                }
                if !flipped {
                    return Err(TriangulationError::ConstraintViolation {
                        edge,
                        reason: "all crossing diagonals are locked",
                    });
                }
            }
        }

        self.time_legalizing += now.elapsed().as_micros();
        self.log_time();

        Ok(())
    }

    /// The interior diagonals properly crossed by the open segment `a -> b`,
    /// in index order.
    fn crossing_diagonals(&self, a: VertexIdx, b: VertexIdx) -> Vec<EdgeKey> {
        let va = self.points[a];
        let vb = self.points[b];

        let mut crossing = Vec::new();
        for (_, tri) in self.mesh.iter_alive() {
            for (u, w) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                if u == a || u == b || w == a || w == b {
                    continue;
                }
                let key = EdgeKey::new(u, w);
                if self.mesh.edge_owners(key).len() == 2
                    && properly_crosses(&va, &vb, &self.points[u], &self.points[w], self.epsilon)
                {
                    crossing.push(key);
                }
            }
        }
        crossing.sort_unstable();
        crossing.dedup();
        crossing
    }

    /// Replaces the diagonal of the quadrilateral around `key` with the
    /// opposite one. Returns false when the flip is not possible, i.e. the
    /// edge is on the boundary or the quadrilateral is not strictly convex.
    fn try_flip(&mut self, key: EdgeKey) -> bool {
        let [t1_idx, t2_idx] = match self.mesh.edge_owners(key) {
            &[t1, t2] => [t1, t2],
            _ => return false,
        };
        let (t1, t2) = match (self.mesh.tri(t1_idx), self.mesh.tri(t2_idx)) {
            (Some(t1), Some(t2)) => (t1, t2),
            _ => return false,
        };

        let EdgeKey(c, d) = key;
        let x = match t1.iter().copied().find(|&v| v != c && v != d) {
            Some(x) => x,
            None => return false,
        };
        let y = match t2.iter().copied().find(|&v| v != c && v != d) {
            Some(y) => y,
            None => return false,
        };
        if x == y {
            return false;
        }

        // The flip is only valid if the new diagonal crosses the old one.
        if !properly_crosses(
            &self.points[x],
            &self.points[y],
            &self.points[c],
            &self.points[d],
            self.epsilon,
        ) {
            return false;
        }

        // Orient the shared edge as t1 walks it, so both replacements stay ccw.
        let (c, d) = if t1 == [c, d, x] || t1 == [d, x, c] || t1 == [x, c, d] {
            (c, d)
        } else {
            (d, c)
        };

        self.mesh.remove_tri(t1_idx);
        self.mesh.remove_tri(t2_idx);
        self.mesh.add_tri([x, y, d]);
        self.mesh.add_tri([y, x, c]);

        true
    }

    /// The triangles between input vertices only, in creation order. Every
    /// triangle attached to a synthetic corner is dropped.
    #[must_use]
    pub fn extract(&self) -> Vec<IndexedTriangle> {
        self.mesh
            .iter_alive()
            .filter(|(_, tri)| tri.iter().all(|&v| v < self.num_input))
            .map(|(_, tri)| tri)
            .collect()
    }

    /// Whether the undirected edge is currently part of the mesh.
    #[must_use]
    pub fn has_edge(&self, edge: IndexedEdge) -> bool {
        self.mesh.has_edge(EdgeKey::new(edge[0], edge[1]))
    }

    /// Check if the triangulation is Delaunay w.r.t. the empty circumcircle
    /// property.
    ///
    /// Returns if the check passed and to what degree. A triangle counts as
    /// violated when some vertex lies inside its circumcircle by more than
    /// the tolerance, so vertices sitting on the circle do not count.
    pub fn is_delaunay(&self) -> Result<(bool, f64), TriangulationError> {
        let mut delaunay = true;
        let mut num_violated_tris = 0;

        let num_slots = self.mesh.num_tris() + self.mesh.num_deleted_tris();

        for tri_idx in 0..num_slots {
            let tri = match self.mesh.tri(tri_idx) {
                Some(tri) => tri,
                None => continue,
            };
            let t = self.coords(tri);

            let circle = match predicates::circumcircle(&t, self.epsilon)? {
                Some(circle) => circle,
                None => {
                    error!("Flat triangle: {tri:?}");
                    delaunay = false;
                    num_violated_tris += 1;
                    continue;
                }
            };

            for (v_idx, v) in self.points.iter().enumerate() {
                if tri.contains(&v_idx) {
                    continue;
                }
                if dist_sq(&circle.center, v) < circle.radius_sq - self.epsilon {
                    delaunay = false;
                    num_violated_tris += 1;
                    break;
                }
            }
        }

        Ok((
            delaunay,
            1.0 - num_violated_tris as f64 / num_slots as f64,
        ))
    }

    /// Checks the Delaunay property in a parallel manner using `rayon`s
    /// `par_iter()`.
    ///
    /// This can significantly reduce the runtime of this predicate.
    #[must_use]
    pub fn par_is_delaunay(&self) -> f64 {
        let num_slots = self.mesh.num_tris() + self.mesh.num_deleted_tris();

        let num_violated_tris: f64 = (0..num_slots)
            .into_par_iter()
            .map(|tri_idx| {
                let tri = match self.mesh.tri(tri_idx) {
                    Some(tri) => tri,
                    None => return 0.0,
                };
                let t = self.coords(tri);

                let circle = match predicates::circumcircle(&t, self.epsilon).unwrap() {
                    Some(circle) => circle,
                    None => return 1.0,
                };

                let violation = self.points.iter().enumerate().find(|&(v_idx, v)| {
                    !tri.contains(&v_idx)
                        && dist_sq(&circle.center, v) < circle.radius_sq - self.epsilon
                });

                if violation.is_some() {
                    1.0
                } else {
                    0.0
                }
            })
            .sum();

        1.0 - num_violated_tris / num_slots as f64
    }

    pub fn is_sound(&self) -> bool {
        if self.mesh.is_sound() {
            true
        } else {
            error!("Triangulation is not sound!");
            false
        }
    }

    /// The input vertices, without the synthetic corners.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex2] {
        &self.points[..self.num_input]
    }

    #[must_use]
    pub const fn num_vertices(&self) -> usize {
        self.num_input
    }

    /// The number of live triangles, including the ones attached to the
    /// synthetic corners.
    #[must_use]
    pub const fn num_tris(&self) -> usize {
        self.mesh.num_tris()
    }

    #[must_use]
    pub const fn num_deleted_tris(&self) -> usize {
        self.mesh.num_deleted_tris()
    }

    /// Get the triangle mesh, as reference.
    #[must_use]
    pub const fn mesh(&self) -> &TriMesh {
        &self.mesh
    }

    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn coords(&self, tri: [VertexIdx; 3]) -> Triangle2 {
        tri.map(|idx| self.points[idx])
    }

    fn log_time(&self) {
        log::debug!("-------------------------------------------");
        log::debug!("Time elapsed:");
        log::debug!("Circumcircle searches computed in {} μs", self.time_searching);
        log::debug!("Cavity meshing computed in {} μs", self.time_meshing);
        log::debug!("Edge legalization computed in {} μs", self.time_legalizing);
    }
}

fn all_collinear(vertices: &[Vertex2], eps: f64) -> bool {
    let (v0, v1) = (&vertices[0], &vertices[1]);
    vertices[2..]
        .iter()
        .all(|v| predicates::orientation(v0, v1, v, eps) == Orientation::Collinear)
}

/// Whether the open segments `a -> b` and `u -> w` cross in a single interior
/// point. Touching configurations count as not crossing.
fn properly_crosses(a: &Vertex2, b: &Vertex2, u: &Vertex2, w: &Vertex2, eps: f64) -> bool {
    let o1 = predicates::orientation(a, b, u, eps);
    let o2 = predicates::orientation(a, b, w, eps);
    let o3 = predicates::orientation(u, w, a, eps);
    let o4 = predicates::orientation(u, w, b, eps);

    if o1 == Orientation::Collinear
        || o2 == Orientation::Collinear
        || o3 == Orientation::Collinear
        || o4 == Orientation::Collinear
    {
        return false;
    }
    o1 != o2 && o3 != o4
}
