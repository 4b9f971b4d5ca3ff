//! Geometric predicates: orientation tests and in-circumcircle tests.
//!
//! All predicates are stateless pure functions over `f64` coordinates with an
//! explicit tolerance, so parallel triangulation sessions can share them
//! without locking. Degenerate (collinear) triangles never error here; they
//! simply have no circumcircle. A configuration that defeats every bisector
//! fallback while *not* being collinear is surfaced as
//! [`TriangulationError::NumericalDegeneracy`].

use crate::error::TriangulationError;
use crate::utils::types::{dist_sq, Triangle2, Vertex2};

/// Orientation of an ordered vertex triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Ccw,
    Cw,
    Collinear,
}

/// A circumcircle, kept in squared-radius form so containment tests never
/// need a square root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circumcircle {
    pub center: Vertex2,
    pub radius_sq: f64,
}

/// The perpendicular-bisector pairings used to intersect a circumcenter,
/// tried in this order. A near-horizontal ("flat", `|Δy| ≤ eps`) edge has a
/// vertical bisector, which the general two-slope formula cannot express, so
/// the flat cases get their own pairing.
#[derive(Debug, Clone, Copy)]
enum BisectorStrategy {
    /// Edge ab is flat: vertical bisector of ab meets the sloped bisector of bc.
    FlatAb,
    /// Edge bc is flat: vertical bisector of bc meets the sloped bisector of ab.
    FlatBc,
    /// Neither edge is flat: intersect both sloped bisectors.
    Sloped,
}

impl BisectorStrategy {
    const ORDER: [Self; 3] = [Self::FlatAb, Self::FlatBc, Self::Sloped];

    /// Applies the strategy to triangle `(a, b, c)`, returning the
    /// circumcenter, or `None` when the strategy's guard does not hold.
    fn center(self, a: &Vertex2, b: &Vertex2, c: &Vertex2, eps: f64) -> Option<Vertex2> {
        let dy_ab = (a[1] - b[1]).abs();
        let dy_bc = (b[1] - c[1]).abs();

        match self {
            Self::FlatAb => {
                if dy_ab > eps || dy_bc <= eps {
                    return None;
                }
                let m_bc = -(c[0] - b[0]) / (c[1] - b[1]);
                let mid_bc = midpoint(b, c);
                let xc = (a[0] + b[0]) / 2.0;
                let yc = m_bc * (xc - mid_bc[0]) + mid_bc[1];
                Some([xc, yc])
            }
            Self::FlatBc => {
                if dy_bc > eps || dy_ab <= eps {
                    return None;
                }
                let m_ab = -(b[0] - a[0]) / (b[1] - a[1]);
                let mid_ab = midpoint(a, b);
                let xc = (b[0] + c[0]) / 2.0;
                let yc = m_ab * (xc - mid_ab[0]) + mid_ab[1];
                Some([xc, yc])
            }
            Self::Sloped => {
                if dy_ab <= eps || dy_bc <= eps {
                    return None;
                }
                let m_ab = -(b[0] - a[0]) / (b[1] - a[1]);
                let m_bc = -(c[0] - b[0]) / (c[1] - b[1]);
                if (m_ab - m_bc).abs() <= eps {
                    // parallel bisectors, the edges are (near) collinear
                    return None;
                }
                let mid_ab = midpoint(a, b);
                let mid_bc = midpoint(b, c);
                let xc = (m_ab * mid_ab[0] - m_bc * mid_bc[0] + mid_bc[1] - mid_ab[1])
                    / (m_ab - m_bc);
                // evaluate y on the steeper edge's bisector for stability
                let yc = if dy_ab > dy_bc {
                    m_ab * (xc - mid_ab[0]) + mid_ab[1]
                } else {
                    m_bc * (xc - mid_bc[0]) + mid_bc[1]
                };
                Some([xc, yc])
            }
        }
    }
}

fn midpoint(a: &Vertex2, b: &Vertex2) -> Vertex2 {
    [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]
}

/// Orientation of `c` relative to the directed line `a -> b`.
///
/// The sign of the cross product of `(b - a)` and `(c - a)`; a magnitude of
/// at most `eps` classifies as [`Orientation::Collinear`].
#[must_use]
pub fn orientation(a: &Vertex2, b: &Vertex2, c: &Vertex2, eps: f64) -> Orientation {
    let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
    if cross.abs() <= eps {
        Orientation::Collinear
    } else if cross > 0.0 {
        Orientation::Ccw
    } else {
        Orientation::Cw
    }
}

/// Signed area of a triangle; positive for CCW winding.
#[must_use]
pub fn signed_area(t: &Triangle2) -> f64 {
    let [a, b, c] = t;
    ((b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])) / 2.0
}

/// Computes the circumcircle of a triangle via perpendicular-bisector
/// intersection, trying the singular-avoiding pairings in fixed order.
///
/// Returns `Ok(None)` for a triangle that is collinear within `eps` (it has
/// no circumcircle), and an error when no pairing applies even though the
/// triangle is not collinear.
pub fn circumcircle(
    t: &Triangle2,
    eps: f64,
) -> Result<Option<Circumcircle>, TriangulationError> {
    let [a, b, c] = t;

    for strategy in BisectorStrategy::ORDER {
        if let Some(center) = strategy.center(a, b, c, eps) {
            // the radius is measured from vertex b, which both bisectors share
            let radius_sq = dist_sq(&center, b);
            return Ok(Some(Circumcircle { center, radius_sq }));
        }
    }

    match orientation(a, b, c, eps) {
        Orientation::Collinear => Ok(None),
        _ => Err(TriangulationError::NumericalDegeneracy(format!(
            "no bisector pairing resolves the circumcircle of {t:?}"
        ))),
    }
}

/// Whether `p` lies in the circumcircle of `t`.
///
/// Compares squared radial distances; a point within `eps` of the boundary
/// counts as inside, which biases co-circular configurations toward
/// insertion. A collinear triangle contains nothing.
pub fn in_circumcircle(
    t: &Triangle2,
    p: &Vertex2,
    eps: f64,
) -> Result<bool, TriangulationError> {
    match circumcircle(t, eps)? {
        Some(cc) => Ok(dist_sq(&cc.center, p) - cc.radius_sq <= eps),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::types::EPSILON;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_orientation() {
        let a = [0.0, 0.0];
        let b = [1.0, 0.0];
        assert_eq!(orientation(&a, &b, &[0.0, 1.0], EPSILON), Orientation::Ccw);
        assert_eq!(orientation(&a, &b, &[0.0, -1.0], EPSILON), Orientation::Cw);
        assert_eq!(
            orientation(&a, &b, &[2.0, 0.0], EPSILON),
            Orientation::Collinear
        );
        assert_eq!(
            orientation(&a, &b, &[0.5, 1e-12], EPSILON),
            Orientation::Collinear
        );
    }

    #[test]
    fn test_signed_area() {
        let ccw = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let cw = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]];
        assert_approx_eq!(signed_area(&ccw), 0.5);
        assert_approx_eq!(signed_area(&cw), -0.5);
    }

    #[test]
    fn test_circumcircle_flat_ab() {
        // ab is horizontal, so its bisector is the vertical x = 0.5
        let t = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let cc = circumcircle(&t, EPSILON).unwrap().unwrap();
        assert_approx_eq!(cc.center[0], 0.5);
        assert_approx_eq!(cc.center[1], 0.5);
        assert_approx_eq!(cc.radius_sq, 0.5);
    }

    #[test]
    fn test_circumcircle_flat_bc() {
        let t = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0]];
        let cc = circumcircle(&t, EPSILON).unwrap().unwrap();
        assert_approx_eq!(cc.center[0], 0.5);
        assert_approx_eq!(cc.center[1], 0.5);
        assert_approx_eq!(cc.radius_sq, 0.5);
    }

    #[test]
    fn test_circumcircle_sloped() {
        let t = [[0.0, 0.0], [2.0, 1.0], [0.0, 2.0]];
        let cc = circumcircle(&t, EPSILON).unwrap().unwrap();
        assert_approx_eq!(cc.center[0], 0.75);
        assert_approx_eq!(cc.center[1], 1.0);
        assert_approx_eq!(cc.radius_sq, 1.5625);
        // all three vertices are equidistant from the center
        for v in &t {
            assert_approx_eq!(dist_sq(&cc.center, v), cc.radius_sq);
        }
    }

    #[test]
    fn test_circumcircle_collinear() {
        let horizontal = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        assert!(circumcircle(&horizontal, EPSILON).unwrap().is_none());

        let diagonal = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
        assert!(circumcircle(&diagonal, EPSILON).unwrap().is_none());
    }

    #[test]
    fn test_circumcircle_singular_is_surfaced() {
        // both edges flat within eps, yet the triple is not collinear: the
        // wide x-span pushes the cross product far above eps
        let t = [[0.0, 0.0], [1e6, 1e-10], [2e6, 0.0]];
        let result = circumcircle(&t, EPSILON);
        assert!(matches!(
            result,
            Err(TriangulationError::NumericalDegeneracy(_))
        ));
    }

    #[test]
    fn test_in_circumcircle() {
        let t = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        assert!(in_circumcircle(&t, &[0.5, 0.5], EPSILON).unwrap());
        assert!(!in_circumcircle(&t, &[2.0, 2.0], EPSILON).unwrap());
        assert!(!in_circumcircle(&t, &[-0.3, -0.3], EPSILON).unwrap());
    }

    #[test]
    fn test_boundary_counts_inside() {
        // (1, 1) lies exactly on the circle through the right triangle
        let t = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        assert!(in_circumcircle(&t, &[1.0, 1.0], EPSILON).unwrap());
    }

    #[test]
    fn test_collinear_triangle_contains_nothing() {
        let t = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        assert!(!in_circumcircle(&t, &[1.0, 0.0], EPSILON).unwrap());
        assert!(!in_circumcircle(&t, &[1.0, -5.0], EPSILON).unwrap());
    }

    #[test]
    fn test_own_vertex_not_strictly_inside() {
        // a vertex sits on its own circumcircle, never strictly inside it
        let t = [[0.0, 0.0], [2.0, 1.0], [0.0, 2.0]];
        let cc = circumcircle(&t, EPSILON).unwrap().unwrap();
        for v in &t {
            assert!(dist_sq(&cc.center, v) >= cc.radius_sq - EPSILON);
        }
    }
}
