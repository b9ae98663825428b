use nalgebra::Vector3;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Evaluates all complex spherical harmonics `Y_l^m`, `m = -l..=l`, of one degree.
///
/// Uses the Condon–Shortley phase and orthonormal normalization, with the polar
/// angle measured from `+z` and the azimuth from `+x`. Output slot `m + l`
/// holds `Y_l^m`.
///
/// The recurrences run on fully normalized associated Legendre functions, so no
/// factorial ratio is ever formed and high degrees stay finite.
#[derive(Debug, Clone, PartialEq)]
pub struct SphericalHarmonicEvaluator {
    l: u32,
}

impl SphericalHarmonicEvaluator {
    pub fn new(l: u32) -> Self {
        Self { l }
    }

    pub fn degree(&self) -> u32 {
        self.l
    }

    /// Number of orders `m`, i.e. `2l + 1`.
    pub fn len(&self) -> usize {
        2 * self.l as usize + 1
    }

    pub fn evaluate(&self, direction: &Vector3<f64>) -> Vec<Complex64> {
        let mut out = vec![Complex64::new(0.0, 0.0); self.len()];
        self.evaluate_into(direction, &mut out);
        out
    }

    /// Writes `Y_l^m(direction)` into `out[m + l]`.
    ///
    /// `direction` need not be normalized. The zero vector is treated as `+z`.
    pub fn evaluate_into(&self, direction: &Vector3<f64>, out: &mut [Complex64]) {
        debug_assert_eq!(out.len(), self.len());
        let l = self.l as usize;

        let r = direction.norm();
        let (cos_theta, sin_theta, phi) = if r > 0.0 {
            let cos_theta = (direction.z / r).clamp(-1.0, 1.0);
            let sin_theta = (direction.x.hypot(direction.y) / r).min(1.0);
            (cos_theta, sin_theta, direction.y.atan2(direction.x))
        } else {
            (1.0, 0.0, 0.0)
        };

        // Normalized diagonal P̄_m^m, starting from P̄_0^0 = 1/sqrt(4π).
        let mut p_mm = 0.5 / PI.sqrt();
        for m in 0..=l {
            if m > 0 {
                p_mm *= -((2 * m + 1) as f64 / (2 * m) as f64).sqrt() * sin_theta;
            }
            let p_lm = normalized_legendre_from_diagonal(l, m, cos_theta, p_mm);
            let y = Complex64::from_polar(p_lm, m as f64 * phi);

            out[l + m] = y;
            if m > 0 {
                let sign = if m % 2 == 0 { 1.0 } else { -1.0 };
                out[l - m] = y.conj() * sign;
            }
        }
    }
}

/// Normalized `P̄_l^m(x)` from the diagonal seed `P̄_m^m(x)` by the three-term
/// recurrence in `l` at fixed `m`.
#[inline]
fn normalized_legendre_from_diagonal(l: usize, m: usize, x: f64, p_mm: f64) -> f64 {
    if l == m {
        return p_mm;
    }
    let mut p_prev = p_mm;
    let mut p_curr = ((2 * m + 3) as f64).sqrt() * x * p_mm;
    let m2 = (m * m) as f64;
    for ll in (m + 2)..=l {
        let l2 = (ll * ll) as f64;
        let prev2 = ((ll - 1) * (ll - 1)) as f64;
        let a = ((4.0 * l2 - 1.0) / (l2 - m2)).sqrt();
        let b = ((prev2 - m2) / (4.0 * prev2 - 1.0)).sqrt();
        let p_next = a * (x * p_curr - b * p_prev);
        p_prev = p_curr;
        p_curr = p_next;
    }
    p_curr
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn complex_approx_equal(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < TOLERANCE
    }

    fn at(values: &[Complex64], l: i64, m: i64) -> Complex64 {
        values[(m + l) as usize]
    }

    #[test]
    fn degree_zero_is_constant() {
        let evaluator = SphericalHarmonicEvaluator::new(0);
        let ylm = evaluator.evaluate(&Vector3::new(0.3, -1.2, 0.5));
        assert_eq!(ylm.len(), 1);
        assert!(complex_approx_equal(
            ylm[0],
            Complex64::new(0.5 / PI.sqrt(), 0.0)
        ));
    }

    #[test]
    fn degree_one_matches_closed_form() {
        let dir = Vector3::<f64>::new(1.0, 2.0, -0.5);
        let r = dir.norm();
        let (cos_t, sin_t, phi) = (dir.z / r, dir.x.hypot(dir.y) / r, dir.y.atan2(dir.x));
        let ylm = SphericalHarmonicEvaluator::new(1).evaluate(&dir);

        let y10 = Complex64::new((3.0 / (4.0 * PI)).sqrt() * cos_t, 0.0);
        let y11 = Complex64::from_polar(-(3.0 / (8.0 * PI)).sqrt() * sin_t, phi);
        let y1m1 = Complex64::from_polar((3.0 / (8.0 * PI)).sqrt() * sin_t, -phi);

        assert!(complex_approx_equal(at(&ylm, 1, 0), y10));
        assert!(complex_approx_equal(at(&ylm, 1, 1), y11));
        assert!(complex_approx_equal(at(&ylm, 1, -1), y1m1));
    }

    #[test]
    fn degree_two_sectoral_matches_closed_form() {
        let dir = Vector3::<f64>::new(-0.4, 0.7, 0.2);
        let r = dir.norm();
        let (sin_t, phi) = (dir.x.hypot(dir.y) / r, dir.y.atan2(dir.x));
        let ylm = SphericalHarmonicEvaluator::new(2).evaluate(&dir);

        let y22 =
            Complex64::from_polar(0.25 * (15.0 / (2.0 * PI)).sqrt() * sin_t * sin_t, 2.0 * phi);
        assert!(complex_approx_equal(at(&ylm, 2, 2), y22));
    }

    #[test]
    fn negative_orders_follow_conjugation_symmetry() {
        let l = 6;
        let evaluator = SphericalHarmonicEvaluator::new(l as u32);
        let ylm = evaluator.evaluate(&Vector3::new(0.1, 0.8, -0.3));
        for m in 1..=l {
            let sign = if m % 2 == 0 { 1.0 } else { -1.0 };
            assert!(complex_approx_equal(
                at(&ylm, l, -m),
                at(&ylm, l, m).conj() * sign
            ));
        }
    }

    #[test]
    fn squared_magnitudes_satisfy_addition_theorem() {
        for l in [1u32, 4, 6, 8, 12] {
            let evaluator = SphericalHarmonicEvaluator::new(l);
            for dir in [
                Vector3::new(0.3, -0.2, 0.9),
                Vector3::new(-1.0, 0.0, 0.0),
                Vector3::new(0.5, 0.5, -0.7),
            ] {
                let sum: f64 = evaluator.evaluate(&dir).iter().map(|y| y.norm_sqr()).sum();
                let expected = (2 * l + 1) as f64 / (4.0 * PI);
                assert!((sum - expected).abs() < 1e-10, "l = {l}, dir = {dir:?}");
            }
        }
    }

    #[test]
    fn high_degrees_stay_finite_and_normalized() {
        for l in [100u32, 160] {
            let evaluator = SphericalHarmonicEvaluator::new(l);
            for dir in [
                Vector3::new(0.3, -0.2, 0.9),
                Vector3::new(-1.0, 0.0, 0.0),
                Vector3::new(0.5, 0.5, -0.7),
            ] {
                let ylm = evaluator.evaluate(&dir);
                assert!(ylm.iter().all(|y| y.re.is_finite() && y.im.is_finite()));
                let sum: f64 = ylm.iter().map(|y| y.norm_sqr()).sum();
                let expected = (2 * l + 1) as f64 / (4.0 * PI);
                assert!((sum - expected).abs() < 1e-9, "l = {l}, dir = {dir:?}");
            }
        }
    }

    #[test]
    fn poles_are_finite_and_axially_symmetric() {
        let l = 6;
        let evaluator = SphericalHarmonicEvaluator::new(l as u32);
        let norm = ((2 * l + 1) as f64 / (4.0 * PI)).sqrt();

        let north = evaluator.evaluate(&Vector3::new(0.0, 0.0, 2.0));
        let south = evaluator.evaluate(&Vector3::new(0.0, 0.0, -1.0));
        for m in -l..=l {
            let y_north = at(&north, l, m);
            let y_south = at(&south, l, m);
            assert!(y_north.re.is_finite() && y_north.im.is_finite());
            assert!(y_south.re.is_finite() && y_south.im.is_finite());
            if m == 0 {
                assert!(complex_approx_equal(y_north, Complex64::new(norm, 0.0)));
                assert!(complex_approx_equal(y_south, Complex64::new(norm, 0.0)));
            } else {
                assert!(y_north.norm() < TOLERANCE);
                assert!(y_south.norm() < TOLERANCE);
            }
        }
    }

    #[test]
    fn zero_vector_is_treated_as_north_pole() {
        let evaluator = SphericalHarmonicEvaluator::new(3);
        assert_eq!(
            evaluator.evaluate(&Vector3::zeros()),
            evaluator.evaluate(&Vector3::z())
        );
    }

    #[test]
    fn evaluation_ignores_direction_length() {
        let evaluator = SphericalHarmonicEvaluator::new(5);
        let short = evaluator.evaluate(&Vector3::new(0.2, 0.1, -0.4));
        let long = evaluator.evaluate(&Vector3::new(2.0, 1.0, -4.0));
        for (a, b) in short.iter().zip(long.iter()) {
            assert!(complex_approx_equal(*a, *b));
        }
    }
}
