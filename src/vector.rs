// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Vectors, state vectors, and rotation matrices.
//!
//! Position/velocity vectors are thin wrappers around `[f64; 3]` carrying a
//! [`Time`] stamp for later frame transforms, following the same p-vector
//! shape as the teacher's raw arrays but promoted to a named type since
//! callers here pass vectors across many frames and need the timestamp to
//! travel with them.

use crate::error::AstroError;
use crate::time::Time;

/// A position vector in astronomical units, stamped with the time it was
/// computed for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: Time,
}

impl Vector {
    pub fn new(x: f64, y: f64, z: f64, t: Time) -> Self {
        Self { x, y, z, t }
    }

    pub fn zero(t: Time) -> Self {
        Self::new(0.0, 0.0, 0.0, t)
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(a: [f64; 3], t: Time) -> Self {
        Self::new(a[0], a[1], a[2], t)
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector) -> Vector {
        Vector::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
            self.t,
        )
    }

    /// Angle between two vectors, in degrees, clamping the cosine into
    /// `[-1, 1]` before calling `acos` to absorb floating-point overshoot.
    ///
    /// Fails with [`AstroError::BadVector`] if either vector's length is
    /// below `1e-8`.
    pub fn angle_between(&self, other: &Vector) -> Result<f64, AstroError> {
        let la = self.length();
        let lb = other.length();
        if la < 1e-8 || lb < 1e-8 {
            return Err(AstroError::BadVector { function: "angle_between" });
        }
        let mut cos_angle = self.dot(other) / (la * lb);
        cos_angle = cos_angle.clamp(-1.0, 1.0);
        Ok(cos_angle.acos() * crate::constants::RAD2DEG)
    }
}

impl std::ops::Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.t)
    }
}

impl std::ops::Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.t)
    }
}

impl std::ops::Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, s: f64) -> Vector {
        Vector::new(self.x * s, self.y * s, self.z * s, self.t)
    }
}

impl std::ops::Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        self * -1.0
    }
}

/// A position/velocity pair (AU, AU/day) stamped with a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    pub t: Time,
}

impl StateVector {
    pub fn new(x: f64, y: f64, z: f64, vx: f64, vy: f64, vz: f64, t: Time) -> Self {
        Self { x, y, z, vx, vy, vz, t }
    }

    pub fn position(&self) -> Vector {
        Vector::new(self.x, self.y, self.z, self.t)
    }

    pub fn velocity(&self) -> Vector {
        Vector::new(self.vx, self.vy, self.vz, self.t)
    }

    pub fn from_position_velocity(p: Vector, v: Vector) -> Self {
        Self::new(p.x, p.y, p.z, v.x, v.y, v.z, p.t)
    }
}

impl std::ops::Add for StateVector {
    type Output = StateVector;
    fn add(self, rhs: StateVector) -> StateVector {
        StateVector::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.vx + rhs.vx,
            self.vy + rhs.vy,
            self.vz + rhs.vz,
            self.t,
        )
    }
}

impl std::ops::Sub for StateVector {
    type Output = StateVector;
    fn sub(self, rhs: StateVector) -> StateVector {
        StateVector::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.vx - rhs.vx,
            self.vy - rhs.vy,
            self.vz - rhs.vz,
            self.t,
        )
    }
}

/// A 3x3 orthonormal rotation matrix between two reference frames.
///
/// Rows are stored outer-to-inner exactly like the teacher's raw
/// `[[f64; 3]; 3]` r-matrices; this wrapper adds the compose/invert/pivot
/// operations spec's data model calls for directly on the type instead of
/// leaving them as free functions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationMatrix {
    pub rot: [[f64; 3]; 3],
}

impl RotationMatrix {
    pub fn new(rot: [[f64; 3]; 3]) -> Self {
        Self { rot }
    }

    pub fn identity() -> Self {
        Self::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Transpose: for an orthonormal rotation this is also the inverse.
    pub fn inverse(&self) -> RotationMatrix {
        let r = &self.rot;
        RotationMatrix::new([
            [r[0][0], r[1][0], r[2][0]],
            [r[0][1], r[1][1], r[2][1]],
            [r[0][2], r[1][2], r[2][2]],
        ])
    }

    /// Compose two rotations: `self` applied after `other`, i.e.
    /// `C = self * other` in matrix-multiplication order (right-to-left
    /// application: a vector is first rotated by `other`, then by `self`).
    pub fn combine(&self, other: &RotationMatrix) -> RotationMatrix {
        let a = &self.rot;
        let b = &other.rot;
        let mut c = [[0.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                let mut w = 0.0;
                for (k, a_row) in a.iter().enumerate() {
                    w += a_row[i] * b[k][j];
                }
                c[i][j] = w;
            }
        }
        RotationMatrix::new(c)
    }

    /// Post-rotate about one of the three principal axes (0=x, 1=y, 2=z) by
    /// `angle_deg` degrees. Fails with [`AstroError::BadAxis`] for any other
    /// axis index.
    pub fn pivot(&self, axis: i32, angle_deg: f64) -> Result<RotationMatrix, AstroError> {
        if !(0..=2).contains(&axis) {
            return Err(AstroError::BadAxis { axis });
        }
        let (i, j) = match axis {
            0 => (1, 2),
            1 => (2, 0),
            _ => (0, 1),
        };
        let angle = angle_deg * crate::constants::DEG2RAD;
        let (s, c) = angle.sin_cos();
        let mut rot = [[0.0; 3]; 3];
        for k in 0..3 {
            rot[i][k] = c * self.rot[i][k] - s * self.rot[j][k];
            rot[j][k] = s * self.rot[i][k] + c * self.rot[j][k];
            rot[axis as usize][k] = self.rot[axis as usize][k];
        }
        Ok(RotationMatrix::new(rot))
    }

    pub fn rotate_vector(&self, v: Vector) -> Vector {
        let p = v.as_array();
        let mut out = [0.0; 3];
        for (row, out_elem) in self.rot.iter().zip(out.iter_mut()) {
            *out_elem = row[0] * p[0] + row[1] * p[1] + row[2] * p[2];
        }
        Vector::from_array(out, v.t)
    }

    pub fn rotate_state(&self, s: StateVector) -> StateVector {
        let p = self.rotate_vector(s.position());
        let v = self.rotate_vector(s.velocity());
        StateVector::from_position_velocity(p, v)
    }

    /// Verify `R * R^T == I` within `tol` (element-wise). Used by tests to
    /// check the orthogonality invariant every rotation must satisfy.
    pub fn is_orthonormal(&self, tol: f64) -> bool {
        let rt = self.inverse();
        let product = self.combine(&rt);
        let id = RotationMatrix::identity();
        for i in 0..3 {
            for j in 0..3 {
                if (product.rot[i][j] - id.rot[i][j]).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

/// Spherical coordinates: latitude/longitude in degrees, distance in AU.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub lat: f64,
    pub lon: f64,
    pub dist: f64,
}

impl Spherical {
    pub fn new(lat: f64, lon: f64, dist: f64) -> Self {
        Self { lat, lon, dist }
    }

    pub fn to_vector(&self, t: Time) -> Vector {
        let lat = self.lat * crate::constants::DEG2RAD;
        let lon = self.lon * crate::constants::DEG2RAD;
        let (slat, clat) = lat.sin_cos();
        let (slon, clon) = lon.sin_cos();
        Vector::new(
            self.dist * clat * clon,
            self.dist * clat * slon,
            self.dist * slat,
            t,
        )
    }

    pub fn from_vector(v: Vector) -> Self {
        let xy = (v.x * v.x + v.y * v.y).sqrt();
        let dist = v.length();
        let lon = if xy == 0.0 { 0.0 } else { crate::misc::normalize_degrees(v.y.atan2(v.x) * crate::constants::RAD2DEG) };
        let lat = if dist == 0.0 { 0.0 } else { v.z.atan2(xy) * crate::constants::RAD2DEG };
        Spherical::new(lat, lon, dist)
    }
}

/// Equatorial coordinates: right ascension (sidereal hours, `[0, 24)`),
/// declination (degrees), distance (AU), and the equivalent Cartesian
/// vector in the frame the angles were computed in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Equatorial {
    pub ra: f64,
    pub dec: f64,
    pub dist: f64,
    pub vec: Vector,
}

impl Equatorial {
    pub fn from_vector(v: Vector) -> Self {
        let sph = Spherical::from_vector(v);
        Equatorial { ra: sph.lon / 15.0, dec: sph.lat, dist: sph.dist, vec: v }
    }

    pub fn to_vector(&self) -> Vector {
        self.vec
    }
}

/// Ecliptic coordinates: Cartesian vector plus latitude/longitude (degrees,
/// longitude normalized to `[0, 360)`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EclipticCoordinates {
    pub vec: Vector,
    pub elat: f64,
    pub elon: f64,
}

impl EclipticCoordinates {
    pub fn from_vector(v: Vector) -> Self {
        let sph = Spherical::from_vector(v);
        EclipticCoordinates { vec: v, elat: sph.lat, elon: sph.lon }
    }
}

/// Horizontal (topocentric) coordinates for an observer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HorizontalCoordinates {
    pub azimuth: f64,
    pub altitude: f64,
    pub ra: f64,
    pub dec: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Time;

    fn t() -> Time {
        Time::from_ut(0.0)
    }

    #[test]
    fn angle_between_orthogonal_is_90() {
        let a = Vector::new(1.0, 0.0, 0.0, t());
        let b = Vector::new(0.0, 1.0, 0.0, t());
        assert!((a.angle_between(&b).unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn angle_between_rejects_zero_vector() {
        let a = Vector::zero(t());
        let b = Vector::new(1.0, 0.0, 0.0, t());
        assert!(a.angle_between(&b).is_err());
    }

    #[test]
    fn identity_is_orthonormal() {
        assert!(RotationMatrix::identity().is_orthonormal(1e-15));
    }

    #[test]
    fn pivot_then_inverse_is_identity() {
        let r = RotationMatrix::identity().pivot(2, 37.0).unwrap().pivot(0, 12.0).unwrap();
        let combined = r.combine(&r.inverse());
        let id = RotationMatrix::identity();
        for i in 0..3 {
            for j in 0..3 {
                assert!((combined.rot[i][j] - id.rot[i][j]).abs() < 1e-13);
            }
        }
    }

    #[test]
    fn pivot_rejects_bad_axis() {
        assert!(RotationMatrix::identity().pivot(3, 10.0).is_err());
    }

    #[test]
    fn spherical_round_trip() {
        let sph = Spherical::new(30.0, 45.0, 2.0);
        let v = sph.to_vector(t());
        let back = Spherical::from_vector(v);
        assert!((back.lat - sph.lat).abs() < 1e-9);
        assert!((back.lon - sph.lon).abs() < 1e-9);
        assert!((back.dist - sph.dist).abs() < 1e-9);
    }
}
