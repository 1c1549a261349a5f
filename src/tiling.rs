//////////////////////////////////////////////////////////////////////
// full tiling: m copies of one arm, each rotated a further 2pi/m and
// hung off the previous arm at its anchor triangle

use crate::arm::{clockwise, ArmSequence};
use crate::errors::*;
use crate::geometry::{TilingParameters, TriangleGeometry};
use crate::{Matrix2d, Point2d, Similarity2d, Vec2d, PI};

//////////////////////////////////////////////////////////////////////
// Rect2d type has lower-left p0 and upper-right p1

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect2d {
    pub p0: Point2d,
    pub p1: Point2d
}

impl Rect2d {

    // empty rectangle has p0 > p1
    pub fn empty() -> Self {

        let p0 = Point2d::new(f64::MAX, f64::MAX);
        let p1 = -p0;

        Rect2d { p0: p0, p1: p1 }

    }

    pub fn new(p0: Point2d, p1: Point2d) -> Self {
        Rect2d { p0: p0, p1: p1 }
    }

    // expand this rect to include the given point
    pub fn expand(&mut self, p: &Point2d) {
        self.p0 = self.p0.inf(p);
        self.p1 = self.p1.sup(p);
    }

    // grow by frac of the current dimensions on every side
    pub fn padded(&self, frac: f64) -> Self {
        let pad = frac * self.dims();
        Rect2d::new(self.p0 - pad, self.p1 + pad)
    }

    pub fn dims(&self) -> Vec2d {
        self.p1 - self.p0
    }

    pub fn center(&self) -> Point2d {
        self.p0 + 0.5*(self.p1 - self.p0)
    }

}

//////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct Tiling {
    pub geometry: TriangleGeometry,
    pub arms: Vec<ArmSequence>,
}

impl Tiling {

    // solve the geometry, build one arm of length triangles, then
    // replicate it. all parameter errors surface before any
    // coordinates are computed.
    pub fn generate(params: &TilingParameters, length: usize) -> Result<Self> {

        let geometry = TriangleGeometry::solve(params)?;

        let n = geometry.depth();

        if length < n {
            bail!(ErrorKind::InsufficientSequenceLength(length, n));
        }

        let arm = ArmSequence::build(&geometry, length)?;

        Self::assemble(geometry, arm)

    }

    // arm 0 is kept as is; arm i is a copy of arm 0 rotated by
    // i*2pi/m about its first A vertex, which is then placed on the
    // B vertex of triangle n-1 in arm i-1
    pub fn assemble(geometry: TriangleGeometry, arm: ArmSequence) -> Result<Self> {

        let n = geometry.depth();
        let m = geometry.arms();

        if arm.len() < n {
            bail!(ErrorKind::InsufficientSequenceLength(arm.len(), n));
        }

        let anchor_idx = geometry.anchor_index();
        let origin = arm.first().p_a;
        let theta_m = 2.0 * PI / (m as f64);

        let mut arms = Vec::with_capacity(m);
        arms.push(arm);

        for i in 1..m {

            let rot = clockwise(theta_m * (i as f64));
            let anchor = arms[i-1][anchor_idx].p_b;

            let next = arms[0].map(|p| anchor + rot * (p - origin));

            arms.push(next);

        }

        tracing::info!(arms = m, length = arms[0].len(), s = geometry.s,
                       "assembled tiling");

        Ok(Tiling { geometry: geometry, arms: arms })

    }

    pub fn num_arms(&self) -> usize {
        self.arms.len()
    }

    // (arm index, arm) pairs; the index drives per-arm colors
    pub fn iter(&self) -> impl Iterator<Item=(usize, &ArmSequence)> {
        self.arms.iter().enumerate()
    }

    pub fn bounds(&self) -> Rect2d {

        let mut rect = Rect2d::empty();

        for arm in &self.arms {
            for tri in arm.iter() {
                for p in tri.vertices().iter() {
                    rect.expand(p);
                }
            }
        }

        rect

    }

    // rigid motion taking arm i onto arm i+1 (and the last arm back
    // onto arm 0): the same map that placed arm 1
    pub fn arm_to_arm(&self) -> Similarity2d {

        let theta_m = 2.0 * PI / (self.num_arms() as f64);
        let rot = clockwise(theta_m);

        let arm = &self.arms[0];
        let origin = arm.first().p_a;
        let anchor = arm[self.geometry.anchor_index()].p_b;

        let t = anchor.coords - rot * origin.coords;

        Similarity2d::new(t, -theta_m, 1.0)

    }

    // fixed point of arm_to_arm, i.e. the point the arms wind around
    pub fn center(&self) -> Option<Point2d> {

        let xform = self.arm_to_arm();

        let rot = xform.isometry.rotation.to_rotation_matrix();
        let t = xform.isometry.translation.vector;

        let lhs = Matrix2d::identity() - rot.matrix();

        lhs.try_inverse().map(|inv| Point2d::from(inv * t))

    }

}
