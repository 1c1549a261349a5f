//////////////////////////////////////////////////////////////////////
// a single arm of the tiling: a sequence of triangles where each one
// is the previous one rotated by A about its C vertex, shrunk by s,
// and slid along so that its C vertex sits on the previous B vertex

use crate::errors::*;
use crate::geometry::TriangleGeometry;
use crate::{Point2d, Rotation2d, Similarity2d};

//////////////////////////////////////////////////////////////////////
// triangle with vertices stored by role: p_c is adjacent to angle C
// (opposite side c), and so on. all transforms are defined on roles,
// so vertex order matters.

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Triangle {
    pub p_c: Point2d,
    pub p_b: Point2d,
    pub p_a: Point2d,
}

impl Triangle {

    pub fn new(p_c: Point2d, p_b: Point2d, p_a: Point2d) -> Self {
        Triangle { p_c: p_c, p_b: p_b, p_a: p_a }
    }

    // starting triangle with C at the origin and side b along +x
    pub fn initial(geom: &TriangleGeometry) -> Self {

        let c = geom.angles.c;

        Triangle::new(Point2d::origin(),
                      Point2d::new(geom.sides.a * c.cos(), geom.sides.a * c.sin()),
                      Point2d::new(geom.sides.b, 0.0))

    }

    // (C, B, A) order, matching the rendering collaborator
    pub fn vertices(&self) -> [Point2d; 3] {
        [self.p_c, self.p_b, self.p_a]
    }

    // apply f to each vertex, preserving roles
    pub fn map<F: Fn(&Point2d) -> Point2d>(&self, f: F) -> Self {
        Triangle::new(f(&self.p_c), f(&self.p_b), f(&self.p_a))
    }

    // lengths of sides (a, b, c), opposite (p_a, p_b, p_c)
    pub fn side_lengths(&self) -> (f64, f64, f64) {
        ((self.p_b - self.p_c).norm(),
         (self.p_a - self.p_c).norm(),
         (self.p_a - self.p_b).norm())
    }

}

//////////////////////////////////////////////////////////////////////
// rotation by -angle, i.e. clockwise in a y-up frame:
//
//   x' =  x cos + y sin
//   y' = -x sin + y cos
//
// used for both the per-step transform and arm replication

pub fn clockwise(angle: f64) -> Rotation2d {
    Rotation2d::new(-angle)
}

// the next triangle in the sequence: move C to the origin, rotate
// clockwise by A, scale by s, then move C onto the old B vertex
pub fn next_triangle(tri: &Triangle, angle_a: f64, s: f64) -> Triangle {

    let step = Similarity2d::new(tri.p_b.coords, -angle_a, s);

    tri.map(|p| &step * (p - tri.p_c.coords))

}

//////////////////////////////////////////////////////////////////////

#[derive(Debug, PartialEq, Clone)]
pub struct ArmSequence {
    pub triangles: Vec<Triangle>,
}

impl ArmSequence {

    // build an arm of length triangles starting from the
    // initial triangle for this geometry
    pub fn build(geom: &TriangleGeometry, length: usize) -> Result<Self> {

        if length == 0 {
            bail!(ErrorKind::InsufficientSequenceLength(length, geom.depth()));
        }

        let mut triangles = Vec::with_capacity(length);
        let mut tri = Triangle::initial(geom);

        triangles.push(tri);

        for _ in 1..length {
            tri = next_triangle(&tri, geom.angles.a, geom.s);
            triangles.push(tri);
        }

        tracing::debug!(length = length, first = ?triangles[0].side_lengths(),
                        last = ?tri.side_lengths(), "built arm");

        Ok(ArmSequence { triangles: triangles })

    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn first(&self) -> &Triangle {
        &self.triangles[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    pub fn map<F: Fn(&Point2d) -> Point2d>(&self, f: F) -> Self {
        ArmSequence {
            triangles: self.triangles.iter().map(|t| t.map(&f)).collect()
        }
    }

}

impl std::ops::Index<usize> for ArmSequence {
    type Output = Triangle;

    fn index(&self, i: usize) -> &Triangle {
        &self.triangles[i]
    }
}
