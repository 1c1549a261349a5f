//////////////////////////////////////////////////////////////////////
// real roots of the scaling polynomial
//
//   f(s) = a*s^n + b*s - 1
//
// restricted to the open interval (0, 1). f' is monotonic on [0, 1]
// for any n >= 1 so f has at most one turning point there; we split
// at the turning point (if any) and bisect each monotonic piece that
// brackets a sign change.

use crate::errors::*;

// bisection stops when the bracket is this narrow
const BISECT_TOL: f64 = 1e-15;
const BISECT_MAX_ITER: usize = 200;

// roots closer than this are the same (double) root
const ROOT_MERGE_TOL: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingPolynomial {
    pub a: f64,
    pub b: f64,
    pub degree: usize,
}

impl ScalingPolynomial {

    pub fn new(a: f64, b: f64, degree: usize) -> Self {
        ScalingPolynomial { a: a, b: b, degree: degree }
    }

    pub fn eval(&self, s: f64) -> f64 {
        self.a * s.powi(self.degree as i32) + self.b * s - 1.0
    }

    pub fn derivative(&self, s: f64) -> f64 {
        let n = self.degree as f64;
        if self.degree == 0 {
            0.0
        } else {
            n * self.a * s.powi(self.degree as i32 - 1) + self.b
        }
    }

    // location of f' = 0 strictly inside (0, 1), if there is one
    fn turning_point(&self) -> Option<f64> {

        let d0 = self.derivative(0.0);
        let d1 = self.derivative(1.0);

        // same strict sign at both ends of a monotonic f' means f is
        // strictly monotonic on the whole interval
        if d0 * d1 >= 0.0 || self.degree < 2 {
            return None;
        }

        let n = self.degree as f64;
        let t = (-self.b / (n * self.a)).powf(1.0 / (n - 1.0));

        if t > 0.0 && t < 1.0 {
            Some(t)
        } else {
            None
        }

    }

    // bisect on [lo, hi], which must bracket a sign change
    fn bisect(&self, mut lo: f64, mut hi: f64) -> f64 {

        let mut flo = self.eval(lo);

        for _ in 0..BISECT_MAX_ITER {

            if hi - lo < BISECT_TOL {
                break;
            }

            let mid = 0.5 * (lo + hi);
            let fmid = self.eval(mid);

            if fmid == 0.0 {
                return mid;
            }

            if (fmid < 0.0) == (flo < 0.0) {
                lo = mid;
                flo = fmid;
            } else {
                hi = mid;
            }

        }

        0.5 * (lo + hi)

    }

    // all distinct real roots in the open interval (0, 1), ascending
    pub fn roots_in_unit_interval(&self) -> Vec<f64> {

        let mut knots = vec![0.0];

        if let Some(t) = self.turning_point() {
            knots.push(t);
        }

        knots.push(1.0);

        let mut roots: Vec<f64> = Vec::new();

        for w in knots.windows(2) {

            let (lo, hi) = (w[0], w[1]);
            let (flo, fhi) = (self.eval(lo), self.eval(hi));

            let root = if flo == 0.0 {
                Some(lo)
            } else if fhi == 0.0 {
                Some(hi)
            } else if (flo < 0.0) != (fhi < 0.0) {
                Some(self.bisect(lo, hi))
            } else {
                None
            };

            if let Some(r) = root {

                let is_interior = r > 0.0 && r < 1.0;
                let is_new = roots.last().map_or(true, |&p| (r - p).abs() > ROOT_MERGE_TOL);

                if is_interior && is_new {
                    roots.push(r);
                }

            }

        }

        roots

    }

    // the unique root in (0, 1), or an error if there are zero or several
    pub fn unique_unit_root(&self) -> Result<f64> {

        let roots = self.roots_in_unit_interval();

        tracing::debug!(a = self.a, b = self.b, n = self.degree,
                        ?roots, "scaling polynomial roots in (0, 1)");

        match roots.as_slice() {
            [s] => Ok(*s),
            _ => bail!(ErrorKind::NoValidScalingFactor(roots.len()))
        }

    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_case_has_closed_form() {
        // n = 1: (a + b) s = 1
        let p = ScalingPolynomial::new(0.75, 0.5, 1);
        let s = p.unique_unit_root().unwrap();
        assert!((s - 0.8).abs() < 1e-12);
    }

    #[test]
    fn cubic_root_satisfies_polynomial() {
        let p = ScalingPolynomial::new(0.3, 0.9, 3);
        let s = p.unique_unit_root().unwrap();
        assert!(s > 0.0 && s < 1.0);
        assert!(p.eval(s).abs() < 1e-12);
    }

    #[test]
    fn no_root_when_polynomial_stays_negative() {
        // a + b < 1 means f(1) < 0 and f is increasing
        let p = ScalingPolynomial::new(0.2, 0.3, 4);
        assert!(p.roots_in_unit_interval().is_empty());
        match p.unique_unit_root() {
            Err(Error(ErrorKind::NoValidScalingFactor(0), _)) => {},
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn two_roots_are_rejected() {
        // f(s) = -4 s^2 + 4.1 s - 1 has roots 0.4 and 0.625
        let p = ScalingPolynomial::new(-4.0, 4.1, 2);
        let roots = p.roots_in_unit_interval();
        assert_eq!(roots.len(), 2);
        assert!((roots[0] - 0.4).abs() < 1e-9);
        assert!((roots[1] - 0.625).abs() < 1e-9);
        match p.unique_unit_root() {
            Err(Error(ErrorKind::NoValidScalingFactor(2), _)) => {},
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn root_on_boundary_is_excluded() {
        // a + b = 1 puts the only root at s = 1
        let p = ScalingPolynomial::new(0.5, 0.5, 2);
        assert!(p.roots_in_unit_interval().is_empty());
    }

}
