use nalgebra::Vector3;

/// A directed bond from particle `source` to particle `neighbor`.
///
/// `displacement` is the minimum-image vector pointing from the source to the
/// neighbor, and `distance` is its length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    pub source: usize,
    pub neighbor: usize,
    pub displacement: Vector3<f64>,
    pub distance: f64,
}

impl Bond {
    pub fn new(source: usize, neighbor: usize, displacement: Vector3<f64>) -> Self {
        Self {
            source,
            neighbor,
            displacement,
            distance: displacement.norm(),
        }
    }

    /// Unit vector along the bond, or `None` for a zero-length bond.
    #[inline]
    pub fn direction(&self) -> Option<Vector3<f64>> {
        if self.distance > 0.0 {
            Some(self.displacement / self.distance)
        } else {
            None
        }
    }
}
