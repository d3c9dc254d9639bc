// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Earth rotation angle, sidereal time, and observer geodetic/geocentric
//! conversion (components C3/C9).
//!
//! `earth_rotation_angle` and `greenwich_mean_sidereal_time` reuse the exact
//! IERS Conventions (2003)/IAU 2006 polynomials the teacher's `earth::
//! earth_rotation_angle_00` and `time::gmst06` implement; apparent sidereal
//! time adds the equation of the equinoxes from the nutation bundle rather
//! than the full classical-CIO `s + XY/2` series, since that series'
//! generator-produced coefficient table is not available (see DESIGN.md).

use crate::constants::{DEG2RAD, TAU};
use crate::error::AstroError;
use crate::misc::norm_angle;
use crate::time::{julian_centuries_tt, Time};
use crate::vector::Vector;

/// Earth rotation angle at `ut` (days past J2000.0), radians in `[0, 2*pi)`.
pub fn earth_rotation_angle(ut: f64) -> f64 {
    let f = ut.rem_euclid(1.0);
    norm_angle(TAU * (f + 0.7790572732640 + 0.00273781191135448 * ut))
}

/// Greenwich mean sidereal time, IAU 2006, radians in `[0, 2*pi)`.
pub fn greenwich_mean_sidereal_time(t: Time) -> f64 {
    let century = julian_centuries_tt(t.tt);
    #[rustfmt::skip]
    let gmst = norm_angle(earth_rotation_angle(t.ut) +
        (0.014506
        + (4612.156534
        + (1.3915817
        + (-0.00000044
        + (-0.000029956
        + -0.0000000368 * century) * century) * century) * century) * century)
        * crate::constants::ARCSEC2RAD);
    gmst
}

/// Greenwich apparent sidereal time: mean sidereal time plus the equation of
/// the equinoxes (`dpsi * cos(mean obliquity)`).
pub fn greenwich_apparent_sidereal_time(t: Time) -> f64 {
    let gmst = greenwich_mean_sidereal_time(t);
    let et = t.e_tilt();
    let eqeq = et.equation_of_equinoxes_hours * 15.0 * DEG2RAD;
    norm_angle(gmst + eqeq)
}

/// An observer's location on the oblate Earth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub height_km: f64,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64, height_km: f64) -> Self {
        Observer { latitude_deg, longitude_deg, height_km }
    }

    /// Geocentric equatorial-of-date position vector for this site (`terra`).
    /// Result is in astronomical units.
    pub fn vector(&self, t: Time) -> Result<Vector, AstroError> {
        let phi = self.latitude_deg * DEG2RAD;
        let sin_phi = phi.sin();
        let cos_phi = phi.cos();
        let f = crate::constants::EARTH_FLATTENING;
        let f2 = f * f;
        let d = cos_phi * cos_phi + f2 * sin_phi * sin_phi;
        if d <= 0.0 {
            return Err(AstroError::Internal {
                function: "Observer::vector",
                reason: "degenerate ellipsoid geometry".to_string(),
            });
        }
        let c = 1.0 / d.sqrt();
        let s = f2 * c;
        let a = crate::constants::EARTH_EQUATORIAL_RADIUS_KM;

        let horizontal_km = (a * c + self.height_km) * cos_phi;
        let polar_km = (a * s + self.height_km) * sin_phi;

        let gast = greenwich_apparent_sidereal_time(t);
        let local_angle = gast + self.longitude_deg * DEG2RAD;
        let (sin_lst, cos_lst) = local_angle.sin_cos();

        let km_per_au = crate::constants::KM_PER_AU;
        Ok(Vector::new(
            horizontal_km * cos_lst / km_per_au,
            horizontal_km * sin_lst / km_per_au,
            polar_km / km_per_au,
            t,
        ))
    }

    /// Recover an `Observer` from a geocentric equatorial-of-date vector in
    /// astronomical units (`inverse_terra`), by Newton iteration on
    /// `W(phi) = (f^2-1)*Re*sin(phi)*cos(phi)/sqrt(cos^2(phi)+f^2*sin^2(phi))
    /// + p*sin(phi) - z*cos(phi)`.
    pub fn from_vector(v: Vector) -> Result<Self, AstroError> {
        let km_per_au = crate::constants::KM_PER_AU;
        let x = v.x * km_per_au;
        let y = v.y * km_per_au;
        let z = v.z * km_per_au;

        let gast = greenwich_apparent_sidereal_time(v.t);
        let p = (x * x + y * y).sqrt();

        if p < 1e-6 {
            let latitude_deg = if z >= 0.0 { 90.0 } else { -90.0 };
            let height_km = z.abs() - crate::constants::EARTH_POLAR_RADIUS_KM;
            return Ok(Observer { latitude_deg, longitude_deg: 0.0, height_km });
        }

        let local_lon = y.atan2(x) - gast;
        let mut longitude_deg = crate::misc::normalize_degrees(local_lon * crate::constants::RAD2DEG);
        if longitude_deg > 180.0 {
            longitude_deg -= 360.0;
        }

        let a = crate::constants::EARTH_EQUATORIAL_RADIUS_KM;
        let f = crate::constants::EARTH_FLATTENING;
        let f2 = f * f;

        let w = |phi: f64| -> f64 {
            let (sin_phi, cos_phi) = phi.sin_cos();
            let denom = (cos_phi * cos_phi + f2 * sin_phi * sin_phi).sqrt();
            (f2 - 1.0) * a * sin_phi * cos_phi / denom + p * sin_phi - z * cos_phi
        };

        let mut phi = z.atan2(p);
        for _ in 0..20 {
            let w0 = w(phi);
            if w0.abs() < 1e-12 {
                break;
            }
            let h = 1e-6;
            let derivative = (w(phi + h) - w(phi - h)) / (2.0 * h);
            if derivative.abs() < 1e-300 {
                break;
            }
            phi -= w0 / derivative;
        }

        let (sin_phi, cos_phi) = phi.sin_cos();
        let denom = (cos_phi * cos_phi + f2 * sin_phi * sin_phi).sqrt();
        let c = 1.0 / denom;
        let s = f2 * c;

        let height_km = if cos_phi.abs() > sin_phi.abs() {
            p / cos_phi - a * c
        } else {
            z / sin_phi - a * s
        };

        Ok(Observer { latitude_deg: phi * crate::constants::RAD2DEG, longitude_deg, height_km })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn era_is_in_range() {
        let a = earth_rotation_angle(12345.678);
        assert!((0.0..TAU).contains(&a));
    }

    #[test]
    fn gmst_advances_with_time() {
        let t0 = Time::from_ut(0.0);
        let t1 = Time::from_ut(1.0);
        let g0 = greenwich_mean_sidereal_time(t0);
        let g1 = greenwich_mean_sidereal_time(t1);
        assert!(g0 != g1);
    }

    #[test]
    fn observer_vector_round_trips_through_inverse() {
        let t = Time::from_calendar(2020, 6, 15, 0, 0, 0.0).unwrap();
        let obs = Observer::new(37.4, -122.1, 0.05);
        let v = obs.vector(t).unwrap();
        let back = Observer::from_vector(v).unwrap();
        assert!((back.latitude_deg - obs.latitude_deg).abs() < 1e-6);
        assert!((back.longitude_deg - obs.longitude_deg).abs() < 1e-6);
        assert!((back.height_km - obs.height_km).abs() < 1e-6);
    }

    #[test]
    fn equator_observer_has_zero_latitude() {
        let t = Time::from_ut(0.0);
        let obs = Observer::new(0.0, 0.0, 0.0);
        let v = obs.vector(t).unwrap();
        assert!(v.z.abs() < 1e-9);
    }
}
