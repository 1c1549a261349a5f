//////////////////////////////////////////////////////////////////////
// triangle geometry for logarithmic tilings
//
// the tiling is built from one triangle with angles (A, B, C) and
// sides (a, b, c) opposite them, normalized so that c = 1. the
// general case picks C and derives A from the number of transforms
// n it takes to close back on the starting triangle; the regular
// case (n = 1) picks A and derives C from the arm count.

use crate::errors::*;
use crate::roots::ScalingPolynomial;
use crate::{DEG, PI};

//////////////////////////////////////////////////////////////////////
// caller-supplied parameters, immutable once built

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TilingParameters {

    // corner angle C (radians), recursion depth n, arm count m
    General { c: f64, n: usize, m: usize },

    // angle A (radians), arm count m; depth is always 1
    Regular { a: f64, m: usize }

}

impl TilingParameters {

    pub fn general(c: f64, n: usize, m: usize) -> Self {
        TilingParameters::General { c: c, n: n, m: m }
    }

    pub fn regular(a: f64, m: usize) -> Self {
        TilingParameters::Regular { a: a, m: m }
    }

    pub fn general_degrees(c_deg: f64, n: usize, m: usize) -> Self {
        Self::general(c_deg * DEG, n, m)
    }

    pub fn regular_degrees(a_deg: f64, m: usize) -> Self {
        Self::regular(a_deg * DEG, m)
    }

    pub fn depth(&self) -> usize {
        match *self {
            TilingParameters::General { n, .. } => n,
            TilingParameters::Regular { .. } => 1
        }
    }

    pub fn arms(&self) -> usize {
        match *self {
            TilingParameters::General { m, .. } => m,
            TilingParameters::Regular { m, .. } => m
        }
    }

    // same parameters with the free angle (C or A) replaced
    pub fn with_free_angle(&self, angle: f64) -> Self {
        match *self {
            TilingParameters::General { n, m, .. } => Self::general(angle, n, m),
            TilingParameters::Regular { m, .. } => Self::regular(angle, m)
        }
    }

    // the angle the caller chose, C or A
    pub fn free_angle(&self) -> f64 {
        match *self {
            TilingParameters::General { c, .. } => c,
            TilingParameters::Regular { a, .. } => a
        }
    }

}

//////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleAngles {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl TriangleAngles {

    // every angle must lie strictly inside (0, pi)
    fn validate(&self) -> Result<()> {

        debug_assert!((self.sum() - PI).abs() < 1e-9);

        for &(name, value) in &[("A", self.a), ("B", self.b), ("C", self.c)] {
            if !(value > 0.0 && value < PI) {
                bail!(ErrorKind::InvalidAngle(name, value));
            }
        }

        Ok(())

    }

    pub fn sum(&self) -> f64 {
        self.a + self.b + self.c
    }

}

// side lengths opposite A, B, C; c is always 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideRatios {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl SideRatios {

    // law of sines
    fn from_angles(angles: &TriangleAngles) -> Self {

        let sin_c = angles.c.sin();

        SideRatios {
            a: angles.a.sin() / sin_c,
            b: angles.b.sin() / sin_c,
            c: 1.0
        }

    }

}

//////////////////////////////////////////////////////////////////////
// everything derived from a set of TilingParameters

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleGeometry {
    pub params: TilingParameters,
    pub angles: TriangleAngles,
    pub sides:  SideRatios,
    pub s:      f64,         // scaling factor per transform step
}

impl TriangleGeometry {

    pub fn solve(params: &TilingParameters) -> Result<Self> {

        let m = params.arms();

        if m < 3 {
            bail!(ErrorKind::InvalidArmCount(m));
        }

        let theta_m = 2.0 * PI / (m as f64);

        let (a, c) = match *params {

            TilingParameters::General { c, n, .. } => {

                if n < 2 {
                    bail!(ErrorKind::DegenerateParameter(n));
                }

                ((theta_m - PI + c) / ((n - 1) as f64), c)

            }

            TilingParameters::Regular { a, .. } => (a, PI - theta_m)

        };

        let angles = TriangleAngles { a: a, b: PI - (a + c), c: c };

        angles.validate()?;

        let sides = SideRatios::from_angles(&angles);

        let n = params.depth();

        let s = ScalingPolynomial::new(sides.a, sides.b, n).unique_unit_root()?;

        tracing::debug!(A = angles.a / DEG, B = angles.b / DEG, C = angles.c / DEG,
                        a = sides.a, b = sides.b, s = s, "solved triangle");

        Ok(TriangleGeometry {
            params: *params,
            angles: angles,
            sides: sides,
            s: s
        })

    }

    pub fn depth(&self) -> usize {
        self.params.depth()
    }

    pub fn arms(&self) -> usize {
        self.params.arms()
    }

    // index of the triangle in each arm that anchors the next arm
    pub fn anchor_index(&self) -> usize {
        self.depth() - 1
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(x: f64, y: f64, tol: f64) {
        assert!((x - y).abs() < tol, "{:} != {:} (tol {:})", x, y, tol);
    }

    #[test]
    fn general_angles_for_figure_15c() {

        let g = TriangleGeometry::solve(&TilingParameters::general(120.0 * DEG, 3, 5)).unwrap();

        // A = (72 - 180 + 120) / 2
        assert_close(g.angles.a, 6.0 * DEG, 1e-12);
        assert_close(g.angles.b, 54.0 * DEG, 1e-12);
        assert_close(g.angles.c, 120.0 * DEG, 1e-12);
        assert_close(g.angles.sum(), PI, 1e-9);

        assert_eq!(g.sides.c, 1.0);
        assert_close(g.sides.a, (6.0 * DEG).sin() / (120.0 * DEG).sin(), 1e-12);
        assert_close(g.sides.b, (54.0 * DEG).sin() / (120.0 * DEG).sin(), 1e-12);

        assert!(g.s > 0.0 && g.s < 1.0);
        assert_close(g.sides.a * g.s.powi(3) + g.sides.b * g.s - 1.0, 0.0, 1e-12);

    }

    #[test]
    fn regular_pentagon_angles() {

        let g = TriangleGeometry::solve(&TilingParameters::regular(30.0 * DEG, 5)).unwrap();

        assert_close(g.angles.c, 108.0 * DEG, 1e-12);
        assert_close(g.angles.b, 42.0 * DEG, 1e-12);
        assert_close(g.angles.sum(), PI, 1e-9);
        assert_eq!(g.depth(), 1);
        assert_eq!(g.anchor_index(), 0);

        // linear case: s = 1 / (a + b)
        assert_close(g.s, 1.0 / (g.sides.a + g.sides.b), 1e-12);

    }

    #[test]
    fn angle_sum_holds_across_sweep() {

        for c_deg in 95..170 {
            if let Ok(g) = TriangleGeometry::solve(&TilingParameters::general((c_deg as f64) * DEG, 3, 5)) {
                assert_close(g.angles.sum(), PI, 1e-9);
                let p = ScalingPolynomial::new(g.sides.a, g.sides.b, 3);
                assert_close(p.eval(g.s), 0.0, 1e-9);
            }
        }

    }

    #[test]
    fn depth_one_is_degenerate_for_general_solver() {
        match TriangleGeometry::solve(&TilingParameters::general(120.0 * DEG, 1, 5)) {
            Err(Error(ErrorKind::DegenerateParameter(1), _)) => {},
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn negative_derived_angle_is_invalid() {
        // A = (72 - 180 + 90) / 2 < 0
        match TriangleGeometry::solve(&TilingParameters::general(90.0 * DEG, 3, 5)) {
            Err(Error(ErrorKind::InvalidAngle("A", _), _)) => {},
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn regular_angle_too_large_is_invalid() {
        // A + C >= 180 leaves no room for B
        match TriangleGeometry::solve(&TilingParameters::regular(80.0 * DEG, 5)) {
            Err(Error(ErrorKind::InvalidAngle("B", _), _)) => {},
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn too_few_arms() {
        match TriangleGeometry::solve(&TilingParameters::regular(30.0 * DEG, 2)) {
            Err(Error(ErrorKind::InvalidArmCount(2), _)) => {},
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn free_angle_swap_keeps_variant() {
        let p = TilingParameters::regular_degrees(30.0, 5).with_free_angle(20.0 * DEG);
        assert_eq!(p, TilingParameters::regular(20.0 * DEG, 5));
        assert_eq!(p.depth(), 1);
        assert_close(p.free_angle(), 20.0 * DEG, 1e-15);
    }

}
