// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Precession: the secular rotation of the mean equator and equinox.
//!
//! Equatorial precession as three Euler angles (`zeta_A`, `z_A`, `theta_A`),
//! the IAU 2006 (P03) polynomials from Capitaine et al. (2003) / Hilton et
//! al. (2006), reused unchanged from their `eraP06e` form.

use crate::constants::ARCSEC2RAD;
use crate::time::julian_centuries_tt;
use crate::vector::RotationMatrix;

/// The three 323-Euler-angle equatorial precession angles (radians) at `tt`
/// (days past J2000.0): `zeta_A`, `z_A`, `theta_A`.
pub fn precession_angles(tt: f64) -> (f64, f64, f64) {
    let t = julian_centuries_tt(tt);

    #[rustfmt::skip]
    let zetaa = (2.650545
        + (2306.083227
        + (0.2988499
        + (0.01801828
        + (-0.000005971
        + -0.0000003173 * t) * t) * t) * t) * t) * ARCSEC2RAD;

    #[rustfmt::skip]
    let za = (-2.650545
        + (2306.077181
        + (1.0927348
        + (0.01826837
        + (-0.000028596
        + -0.0000002904 * t) * t) * t) * t) * t) * ARCSEC2RAD;

    #[rustfmt::skip]
    let thetaa = (2004.191903
        + (-0.4294934
        + (-0.04182264
        + (-0.000007089
        + -0.0000001274 * t) * t) * t) * t) * t * ARCSEC2RAD;

    (zetaa, za, thetaa)
}

/// Precession rotation matrix: J2000.0 mean equator/equinox -> mean
/// equator/equinox of date `tt`. Built as the classical 323 Euler sequence
/// `R_z(-z_A) . R_y(theta_A) . R_z(-zeta_A)`.
pub fn precession_matrix(tt: f64) -> RotationMatrix {
    let (zetaa, za, thetaa) = precession_angles(tt);
    let rad2deg = crate::constants::RAD2DEG;

    let r = RotationMatrix::identity();
    let r = r.pivot(2, -zetaa * rad2deg).unwrap();
    let r = r.pivot(1, thetaa * rad2deg).unwrap();
    r.pivot(2, -za * rad2deg).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precession_matrix_is_identity_at_j2000() {
        let r = precession_matrix(0.0);
        let i = RotationMatrix::identity();
        for row in 0..3 {
            for col in 0..3 {
                assert!((r.rot[row][col] - i.rot[row][col]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn precession_matrix_is_orthonormal_away_from_epoch() {
        let r = precession_matrix(36525.0 * 2.0);
        assert!(r.is_orthonormal(1e-10));
    }

    #[test]
    fn precession_angles_grow_with_time() {
        let (zetaa, _, _) = precession_angles(36525.0);
        assert!(zetaa > 0.0);
    }
}
