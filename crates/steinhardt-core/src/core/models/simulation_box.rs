use nalgebra::{Matrix3, Point3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum BoxError {
    #[error("Box length L{axis} must be positive and finite, got {value}")]
    InvalidLength { axis: char, value: f64 },
    #[error("Tilt factor {name} must be finite, got {value}")]
    InvalidTilt { name: &'static str, value: f64 },
}

/// Edge lengths and dimensionless tilt factors of a periodic cell.
///
/// The cell vectors are `a = (Lx, 0, 0)`, `b = (xy·Ly, Ly, 0)` and
/// `c = (xz·Lz, yz·Lz, Lz)`, and the cell is centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxDimensions {
    pub lx: f64,
    pub ly: f64,
    pub lz: f64,
    pub xy: f64,
    pub xz: f64,
    pub yz: f64,
}

/// The geometric services the order-parameter engine consumes from a periodic box.
pub trait PeriodicGeometry {
    /// Shortest periodic displacement pointing from `from` to `to`.
    fn minimum_image(&self, from: &Point3<f64>, to: &Point3<f64>) -> Vector3<f64>;

    fn dimensions(&self) -> BoxDimensions;

    fn is_2d(&self) -> bool;

    /// Fractional coordinates of `point`, with the primary cell mapped onto `[0, 1)`.
    fn to_fractional(&self, point: &Point3<f64>) -> Vector3<f64>;

    /// Distances between opposite faces of the cell along each lattice direction.
    ///
    /// For a 2D box the `z` entry is infinite.
    fn perpendicular_widths(&self) -> Vector3<f64>;
}

/// A (possibly triclinic) periodic simulation cell.
///
/// Two boxes compare equal when all lengths, tilt factors and the 2D flag match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationBox {
    dimensions: BoxDimensions,
    is_2d: bool,
    h: Matrix3<f64>,
}

impl SimulationBox {
    pub fn new(
        lx: f64,
        ly: f64,
        lz: f64,
        xy: f64,
        xz: f64,
        yz: f64,
        is_2d: bool,
    ) -> Result<Self, BoxError> {
        check_length('x', lx)?;
        check_length('y', ly)?;
        if !is_2d {
            check_length('z', lz)?;
        }
        check_tilt("xy", xy)?;
        check_tilt("xz", xz)?;
        check_tilt("yz", yz)?;

        // A 2D cell has no extent or tilt along z.
        let dimensions = if is_2d {
            BoxDimensions {
                lx,
                ly,
                lz: 0.0,
                xy,
                xz: 0.0,
                yz: 0.0,
            }
        } else {
            BoxDimensions {
                lx,
                ly,
                lz,
                xy,
                xz,
                yz,
            }
        };

        let lz_eff = if is_2d { 1.0 } else { lz };
        let h = Matrix3::new(
            lx,
            dimensions.xy * ly,
            dimensions.xz * lz_eff,
            0.0,
            ly,
            dimensions.yz * lz_eff,
            0.0,
            0.0,
            lz_eff,
        );

        Ok(Self {
            dimensions,
            is_2d,
            h,
        })
    }

    pub fn cube(length: f64) -> Result<Self, BoxError> {
        Self::new(length, length, length, 0.0, 0.0, 0.0, false)
    }

    pub fn orthorhombic(lx: f64, ly: f64, lz: f64) -> Result<Self, BoxError> {
        Self::new(lx, ly, lz, 0.0, 0.0, 0.0, false)
    }

    pub fn square(length: f64) -> Result<Self, BoxError> {
        Self::new(length, length, 0.0, 0.0, 0.0, 0.0, true)
    }

    pub fn volume(&self) -> f64 {
        if self.is_2d {
            self.dimensions.lx * self.dimensions.ly
        } else {
            self.dimensions.lx * self.dimensions.ly * self.dimensions.lz
        }
    }

    /// Maps a point back into the primary cell.
    pub fn wrap(&self, point: &Point3<f64>) -> Point3<f64> {
        let mut s = self.to_fractional(point);
        s.x -= s.x.floor();
        s.y -= s.y.floor();
        if self.is_2d {
            s.z = 0.5;
        } else {
            s.z -= s.z.floor();
        }
        self.from_fractional(&s)
    }

    fn from_fractional(&self, s: &Vector3<f64>) -> Point3<f64> {
        let centered = Vector3::new(s.x - 0.5, s.y - 0.5, s.z - 0.5);
        Point3::from(self.h * centered)
    }

    // The cell matrix is upper triangular with a positive diagonal, so back
    // substitution always succeeds.
    fn solve_cell(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let h = &self.h;
        let sz = v.z / h[(2, 2)];
        let sy = (v.y - h[(1, 2)] * sz) / h[(1, 1)];
        let sx = (v.x - h[(0, 1)] * sy - h[(0, 2)] * sz) / h[(0, 0)];
        Vector3::new(sx, sy, sz)
    }
}

impl PeriodicGeometry for SimulationBox {
    fn minimum_image(&self, from: &Point3<f64>, to: &Point3<f64>) -> Vector3<f64> {
        let mut s = self.solve_cell(&(to - from));
        s.x -= s.x.round();
        s.y -= s.y.round();
        if self.is_2d {
            s.z = 0.0;
        } else {
            s.z -= s.z.round();
        }
        self.h * s
    }

    fn dimensions(&self) -> BoxDimensions {
        self.dimensions
    }

    fn is_2d(&self) -> bool {
        self.is_2d
    }

    fn to_fractional(&self, point: &Point3<f64>) -> Vector3<f64> {
        let mut s = self.solve_cell(&point.coords);
        s.add_scalar_mut(0.5);
        s
    }

    fn perpendicular_widths(&self) -> Vector3<f64> {
        let a = self.h.column(0).into_owned();
        let b = self.h.column(1).into_owned();
        let c = self.h.column(2).into_owned();
        let volume = a.dot(&b.cross(&c)).abs();

        let width_x = volume / b.cross(&c).norm();
        let width_y = volume / c.cross(&a).norm();
        let width_z = if self.is_2d {
            f64::INFINITY
        } else {
            volume / a.cross(&b).norm()
        };
        Vector3::new(width_x, width_y, width_z)
    }
}

fn check_length(axis: char, value: f64) -> Result<(), BoxError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BoxError::InvalidLength { axis, value })
    }
}

fn check_tilt(name: &'static str, value: f64) -> Result<(), BoxError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BoxError::InvalidTilt { name, value })
    }
}
