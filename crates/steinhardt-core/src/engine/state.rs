use num_complex::Complex64;

/// Per-particle `q_lm` vectors stored contiguously, `2l + 1` entries per particle.
#[derive(Debug, Clone, PartialEq)]
pub struct QlmField {
    width: usize,
    values: Vec<Complex64>,
}

impl QlmField {
    pub fn zeros(num_particles: usize, l: u32) -> Self {
        let width = 2 * l as usize + 1;
        Self {
            width,
            values: vec![Complex64::new(0.0, 0.0); num_particles * width],
        }
    }

    /// Number of orders per particle (`2l + 1`).
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn num_particles(&self) -> usize {
        self.values.len() / self.width
    }

    pub fn particle(&self, index: usize) -> &[Complex64] {
        &self.values[index * self.width..(index + 1) * self.width]
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.values
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Complex64] {
        &mut self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Complex64]> {
        self.values.chunks(self.width)
    }

    /// Component-wise mean over all particles; zeros for an empty field.
    pub fn mean(&self) -> Vec<Complex64> {
        let mut sum = vec![Complex64::new(0.0, 0.0); self.width];
        for q in self.iter() {
            for (acc, value) in sum.iter_mut().zip(q) {
                *acc += value;
            }
        }
        let n = self.num_particles();
        if n > 0 {
            let inv = 1.0 / n as f64;
            sum.iter_mut().for_each(|acc| *acc *= inv);
        }
        sum
    }
}

/// A single order-parameter value: real for `Q_l`, complex for `W_l`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderValue {
    Real(f64),
    Complex(Complex64),
}

impl OrderValue {
    pub fn re(&self) -> f64 {
        match self {
            OrderValue::Real(v) => *v,
            OrderValue::Complex(v) => v.re,
        }
    }

    pub fn to_complex(&self) -> Complex64 {
        match self {
            OrderValue::Real(v) => Complex64::new(*v, 0.0),
            OrderValue::Complex(v) => *v,
        }
    }
}

/// Per-particle order-parameter values aligned with the input positions.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderValues {
    Real(Vec<f64>),
    Complex(Vec<Complex64>),
}

impl OrderValues {
    pub fn len(&self) -> usize {
        match self {
            OrderValues::Real(v) => v.len(),
            OrderValues::Complex(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<OrderValue> {
        match self {
            OrderValues::Real(v) => v.get(index).copied().map(OrderValue::Real),
            OrderValues::Complex(v) => v.get(index).copied().map(OrderValue::Complex),
        }
    }

    pub fn as_real(&self) -> Option<&[f64]> {
        match self {
            OrderValues::Real(v) => Some(v),
            OrderValues::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&[Complex64]> {
        match self {
            OrderValues::Real(_) => None,
            OrderValues::Complex(v) => Some(v),
        }
    }

    pub fn real_parts(&self) -> Vec<f64> {
        match self {
            OrderValues::Real(v) => v.clone(),
            OrderValues::Complex(v) => v.iter().map(|c| c.re).collect(),
        }
    }

    /// Arithmetic mean over particles, as a complex number; zero when empty.
    pub fn mean(&self) -> Complex64 {
        let n = self.len();
        if n == 0 {
            return Complex64::new(0.0, 0.0);
        }
        let sum: Complex64 = match self {
            OrderValues::Real(v) => Complex64::new(v.iter().sum(), 0.0),
            OrderValues::Complex(v) => v.iter().sum(),
        };
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_allocates_one_row_per_particle() {
        let field = QlmField::zeros(5, 3);
        assert_eq!(field.width(), 7);
        assert_eq!(field.num_particles(), 5);
        assert_eq!(field.particle(4).len(), 7);
        let zero = Complex64::new(0.0, 0.0);
        assert!(field.as_slice().iter().all(|c| *c == zero));
    }

    #[test]
    fn mean_averages_each_order_over_particles() {
        let mut field = QlmField::zeros(2, 1);
        field.as_mut_slice()[0] = Complex64::new(1.0, 2.0);
        field.as_mut_slice()[3] = Complex64::new(3.0, -2.0);
        field.as_mut_slice()[5] = Complex64::new(4.0, 0.0);

        let mean = field.mean();
        assert_eq!(
            mean,
            vec![
                Complex64::new(2.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(2.0, 0.0)
            ]
        );
    }

    #[test]
    fn mean_of_empty_field_is_zero() {
        let field = QlmField::zeros(0, 2);
        assert_eq!(field.num_particles(), 0);
        assert!(field.mean().iter().all(|c| *c == Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn order_values_expose_variant_specific_views() {
        let real = OrderValues::Real(vec![1.0, 3.0]);
        assert_eq!(real.len(), 2);
        assert_eq!(real.as_real(), Some(&[1.0, 3.0][..]));
        assert!(real.as_complex().is_none());
        assert_eq!(real.mean(), Complex64::new(2.0, 0.0));
        assert_eq!(real.get(1), Some(OrderValue::Real(3.0)));
        assert_eq!(real.get(2), None);

        let complex =
            OrderValues::Complex(vec![Complex64::new(1.0, 1.0), Complex64::new(-3.0, 1.0)]);
        assert_eq!(complex.real_parts(), vec![1.0, -3.0]);
        assert_eq!(complex.mean(), Complex64::new(-1.0, 1.0));
        assert_eq!(complex.get(0).map(|v| v.re()), Some(1.0));
    }

    #[test]
    fn order_value_converts_to_complex() {
        assert_eq!(OrderValue::Real(2.5).to_complex(), Complex64::new(2.5, 0.0));
        assert_eq!(OrderValue::Complex(Complex64::new(0.0, 1.0)).re(), 0.0);
    }
}
