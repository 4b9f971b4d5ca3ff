//! Bounding super-triangle construction.
//!
//! The incremental algorithm needs one triangle that strictly encloses every
//! input point before the first insertion. The construction is axis-aligned
//! (no trigonometry): a right triangle whose legs are the summed extents of
//! the margin-expanded bounding box, so the box sits strictly under the
//! hypotenuse.

use crate::error::TriangulationError;
use crate::utils::types::{coincident, Triangle2, Vertex2};

/// Margin and sizing factor, one eighth of the governing extent.
const MARGIN_FACTOR: f64 = 0.125;

/// Builds a triangle strictly enclosing all `vertices` (CCW).
///
/// # Errors
///
/// [`TriangulationError::NoInput`] for an empty slice, and
/// [`TriangulationError::NumericalDegeneracy`] when the margin could not
/// separate a synthetic corner from the input (only possible for point sets
/// whose whole extent is near the tolerance).
pub fn super_triangle(vertices: &[Vertex2], eps: f64) -> Result<Triangle2, TriangulationError> {
    let tri = match vertices {
        [] => return Err(TriangulationError::NoInput),
        [p] => single_point_triangle(p, eps),
        _ => bounding_box_triangle(vertices, eps),
    };

    // Synthetic vertices are identified by index later on, so a coincident
    // real point would not corrupt extraction, but it would starve the
    // circumcircle tests of their margin. Reject it outright.
    for v in vertices {
        for s in &tri {
            if coincident(v, s, eps) {
                return Err(TriangulationError::NumericalDegeneracy(format!(
                    "input vertex {v:?} coincides with bounding-triangle vertex {s:?}"
                )));
            }
        }
    }

    Ok(tri)
}

/// A small triangle centered on a lone point, sized to a fraction of the
/// point's coordinate magnitude, or to unit scale for points near the origin.
fn single_point_triangle(p: &Vertex2, eps: f64) -> Triangle2 {
    let mut k = p[0].abs().max(p[1].abs()) * MARGIN_FACTOR;
    if k <= eps {
        k = 1.0;
    }

    [
        [p[0] - k, p[1] - k],
        [p[0] + k, p[1] - k],
        [p[0], p[1] + k],
    ]
}

fn bounding_box_triangle(vertices: &[Vertex2], eps: f64) -> Triangle2 {
    let (mut v_min, mut v_max) = find_min_max(vertices);

    let size = [v_max[0] - v_min[0], v_max[1] - v_min[1]];
    let mut k = size[0].min(size[1]) * MARGIN_FACTOR;
    if k <= eps {
        // flat bounding box (axis-aligned or collinear input), the margin
        // must stay strictly positive
        k = size[0].max(size[1]) * MARGIN_FACTOR;
    }

    v_min = [v_min[0] - k, v_min[1] - k];
    v_max = [v_max[0] + k, v_max[1] + k];
    let sz = [v_max[0] - v_min[0], v_max[1] - v_min[1]];

    [
        v_min,
        [v_min[0] + sz[0] + sz[1], v_min[1]],
        [v_min[0], v_min[1] + sz[0] + sz[1]],
    ]
}

// Finds the minimum and maximum x and y values of the vertices
fn find_min_max(vertices: &[Vertex2]) -> (Vertex2, Vertex2) {
    let mut v_min = vertices[0];
    let mut v_max = vertices[0];

    for vertex in vertices {
        if v_min[0] > vertex[0] {
            v_min[0] = vertex[0];
        }
        if v_min[1] > vertex[1] {
            v_min[1] = vertex[1];
        }
        if v_max[0] < vertex[0] {
            v_max[0] = vertex[0];
        }
        if v_max[1] < vertex[1] {
            v_max[1] = vertex[1];
        }
    }
    (v_min, v_max)
}
