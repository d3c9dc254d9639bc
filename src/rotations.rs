// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Rotation constructors between the named reference frames: equatorial
//! J2000 (EQJ), equatorial of date (EQD), ecliptic J2000 (ECL), horizontal
//! (HOR), and galactic (GAL).
//!
//! Each `rotation_a_b` pairs with the identically-named `rotation_b_a`
//! (its transpose, via [`RotationMatrix::inverse`]) the same way the
//! teacher's `vectors_and_matrices` primitives compose: build the forward
//! transform from precession/nutation/sidereal building blocks, then invert
//! for the reverse.

use crate::earth_rotation::{greenwich_apparent_sidereal_time, Observer};
use crate::nutation::nutation_matrix;
use crate::precession::precession_matrix;
use crate::time::Time;
use crate::vector::RotationMatrix;

/// J2000.0 mean obliquity of the ecliptic, degrees (IAU 2006, `eps0`).
const J2000_MEAN_OBLIQUITY_DEG: f64 = 23.4392911;

/// Equatorial J2000 -> ecliptic J2000: a fixed rotation about the x-axis by
/// the J2000 mean obliquity.
pub fn rotation_eqj_ecl() -> RotationMatrix {
    RotationMatrix::identity().pivot(0, -J2000_MEAN_OBLIQUITY_DEG).unwrap()
}

pub fn rotation_ecl_eqj() -> RotationMatrix {
    rotation_eqj_ecl().inverse()
}

/// Equatorial J2000 -> equatorial of date `t`: precession to the mean
/// equator of date followed by nutation to the true equator of date.
pub fn rotation_eqj_eqd(t: Time) -> RotationMatrix {
    let precession = precession_matrix(t.tt);
    let nutation = nutation_matrix(t.tt);
    nutation.combine(&precession)
}

pub fn rotation_eqd_eqj(t: Time) -> RotationMatrix {
    rotation_eqj_eqd(t).inverse()
}

/// Equatorial of date -> horizontal, for an observer at `t`. Built directly
/// from the observer's zenith/north/west unit vectors expressed in the
/// equatorial-of-date frame (the same spherical geometry the teacher's
/// `azel_to_hadec`/`hadec_to_azel` formulas encode, expressed here as a full
/// change-of-basis matrix instead of a pair of angle formulas).
pub fn rotation_eqd_hor(observer: Observer, t: Time) -> RotationMatrix {
    let lat = observer.latitude_deg * crate::constants::DEG2RAD;
    let lst = greenwich_apparent_sidereal_time(t) + observer.longitude_deg * crate::constants::DEG2RAD;

    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lst, cos_lst) = lst.sin_cos();

    let zenith = [cos_lat * cos_lst, cos_lat * sin_lst, sin_lat];
    let north = [-sin_lat * cos_lst, -sin_lat * sin_lst, cos_lat];
    let west = [sin_lst, -cos_lst, 0.0];

    RotationMatrix::new([north, west, zenith])
}

pub fn rotation_hor_eqd(observer: Observer, t: Time) -> RotationMatrix {
    rotation_eqd_hor(observer, t).inverse()
}

/// Equatorial J2000 -> horizontal, for an observer at `t`: compose
/// EQJ->EQD with EQD->HOR.
pub fn rotation_eqj_hor(observer: Observer, t: Time) -> RotationMatrix {
    rotation_eqd_hor(observer, t).combine(&rotation_eqj_eqd(t))
}

pub fn rotation_hor_eqj(observer: Observer, t: Time) -> RotationMatrix {
    rotation_eqj_hor(observer, t).inverse()
}

/// Equatorial J2000 -> galactic (IAU 1958 pole). The fixed matrix published
/// for the J2000 equatorial-to-galactic transform (north galactic pole at
/// RA 192.85948 deg, Dec 27.12825 deg, ascending node longitude 32.93192
/// deg).
pub fn rotation_eqj_gal() -> RotationMatrix {
    RotationMatrix::new([
        [-0.0548755604, -0.8734370902, -0.4838350155],
        [0.4941094279, -0.4448296300, 0.7469822445],
        [-0.8676661490, -0.1980763734, 0.4559837762],
    ])
}

pub fn rotation_gal_eqj() -> RotationMatrix {
    rotation_eqj_gal().inverse()
}

/// Ecliptic J2000 -> equatorial of date.
pub fn rotation_ecl_eqd(t: Time) -> RotationMatrix {
    rotation_eqj_eqd(t).combine(&rotation_ecl_eqj())
}

pub fn rotation_eqd_ecl(t: Time) -> RotationMatrix {
    rotation_ecl_eqd(t).inverse()
}

/// Ecliptic J2000 -> horizontal, for an observer at `t`.
pub fn rotation_ecl_hor(observer: Observer, t: Time) -> RotationMatrix {
    rotation_eqj_hor(observer, t).combine(&rotation_ecl_eqj())
}

pub fn rotation_hor_ecl(observer: Observer, t: Time) -> RotationMatrix {
    rotation_ecl_hor(observer, t).inverse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eqj_ecl_round_trips() {
        let fwd = rotation_eqj_ecl();
        let back = rotation_ecl_eqj();
        let id = fwd.combine(&back);
        let expect = RotationMatrix::identity();
        for i in 0..3 {
            for j in 0..3 {
                assert!((id.rot[i][j] - expect.rot[i][j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn eqj_ecl_maps_summer_solstice_direction_onto_ecliptic_y_axis() {
        let eps = J2000_MEAN_OBLIQUITY_DEG * crate::constants::DEG2RAD;
        let t = Time::from_ut(0.0);
        let v_eq = crate::vector::Vector::new(0.0, eps.cos(), eps.sin(), t);
        let v_ecl = rotation_eqj_ecl().rotate_vector(v_eq);
        assert!((v_ecl.x).abs() < 1e-9);
        assert!((v_ecl.y - 1.0).abs() < 1e-9);
        assert!((v_ecl.z).abs() < 1e-9);
    }

    #[test]
    fn eqj_gal_is_orthonormal() {
        assert!(rotation_eqj_gal().is_orthonormal(1e-9));
    }

    #[test]
    fn eqj_eqd_is_orthonormal() {
        let t = Time::from_calendar(2024, 3, 20, 12, 0, 0.0).unwrap();
        assert!(rotation_eqj_eqd(t).is_orthonormal(1e-9));
    }

    #[test]
    fn eqd_hor_is_orthonormal() {
        let t = Time::from_calendar(2024, 3, 20, 12, 0, 0.0).unwrap();
        let obs = Observer::new(40.0, -105.0, 1.6);
        assert!(rotation_eqd_hor(obs, t).is_orthonormal(1e-9));
    }

    #[test]
    fn eqj_hor_inverse_round_trips() {
        let t = Time::from_calendar(2024, 3, 20, 12, 0, 0.0).unwrap();
        let obs = Observer::new(40.0, -105.0, 1.6);
        let fwd = rotation_eqj_hor(obs, t);
        let back = rotation_hor_eqj(obs, t);
        let id = fwd.combine(&back);
        let expect = RotationMatrix::identity();
        for i in 0..3 {
            for j in 0..3 {
                assert!((id.rot[i][j] - expect.rot[i][j]).abs() < 1e-9);
            }
        }
    }
}
