// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Topocentric conversions: equatorial-of-date, horizontal coordinates, and
//! atmospheric refraction (component C10).

use crate::bodies::Body;
use crate::earth_rotation::{greenwich_apparent_sidereal_time, Observer};
use crate::error::AstroError;
use crate::rotations::rotation_eqj_eqd;
use crate::time::Time;
use crate::vector::{Spherical, Vector};
use crate::{aggregator, constants};

/// Equatorial coordinates: right ascension in sidereal hours, declination
/// in degrees, distance in AU, plus the equivalent Cartesian vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EquatorCoordinates {
    pub ra: f64,
    pub dec: f64,
    pub dist: f64,
    pub vector: Vector,
}

/// Refraction model applied to an observed altitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refraction {
    Airless,
    Normal,
    /// Same Saemundsson formula as `Normal`, without the below-horizon
    /// taper. Exists only for compatibility testing against JPL Horizons.
    JplHorizons,
}

/// Horizontal coordinates, plus the apparent equatorial coordinates once
/// refraction is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HorizontalCoordinates {
    pub azimuth: f64,
    pub altitude: f64,
    pub ra: f64,
    pub dec: f64,
}

/// Geocentric position of `body`, optionally shifted to an observer and
/// precessed/nutated to the equator of date.
pub fn equator(
    body: Body,
    t: Time,
    observer: Option<Observer>,
    of_date: bool,
    aberration: bool,
) -> Result<EquatorCoordinates, AstroError> {
    let mut vec = aggregator::geo_vector(body, t, aberration)?;
    if let Some(obs) = observer {
        vec = vec - obs.vector(t)?;
    }
    if of_date {
        vec = rotation_eqj_eqd(t).rotate_vector(vec);
    }

    let sph = Spherical::from_vector(vec);
    let ra = crate::misc::normalize_degrees(sph.lon) / 15.0;
    Ok(EquatorCoordinates { ra, dec: sph.lat, dist: sph.dist, vector: vec })
}

/// Saemundsson's refraction formula, degrees of altitude correction, for an
/// observed altitude `altitude_deg` (clamped at -1 degree before the
/// cotangent blows up near the horizon). `Normal` and `JplHorizons` share
/// this formula; only `Normal` applies the below-horizon taper.
pub fn refraction_angle(refraction: Refraction, altitude_deg: f64) -> f64 {
    if refraction == Refraction::Airless {
        return 0.0;
    }
    let h = altitude_deg.max(-1.0);
    let mut correction = 1.02 / ((h + 10.3 / (h + 5.11)) * constants::DEG2RAD).tan() / 60.0;
    if refraction == Refraction::Normal && altitude_deg < -1.0 {
        // Linear taper to zero at the nadir so refraction never diverges
        // below the horizon.
        correction *= (altitude_deg + 90.0) / 89.0;
    }
    correction
}

/// Inverse of [`refraction_angle`]: the altitude correction to subtract
/// from an apparent altitude to recover the airless altitude.
pub fn inverse_refraction_angle(refraction: Refraction, apparent_altitude_deg: f64) -> f64 {
    if refraction == Refraction::Airless {
        return 0.0;
    }
    let mut altitude = apparent_altitude_deg;
    for _ in 0..3 {
        let refracted = altitude + refraction_angle(refraction, altitude);
        let correction = refracted - apparent_altitude_deg;
        altitude -= correction;
    }
    -refraction_angle(refraction, altitude)
}

/// Horizontal (azimuth/altitude) coordinates for an equatorial-of-date
/// vector `vec`, seen by `observer` at `t`.
pub fn horizon(
    vec: Vector,
    observer: Observer,
    t: Time,
    refraction: Refraction,
) -> HorizontalCoordinates {
    let lat = observer.latitude_deg * constants::DEG2RAD;
    let gast = greenwich_apparent_sidereal_time(t);
    let spin = -(gast + observer.longitude_deg * constants::DEG2RAD);

    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_spin, cos_spin) = spin.sin_cos();

    // Zenith, north, west unit vectors expressed in the equatorial-of-date
    // frame, then rotated by the local sidereal spin.
    let uze = [cos_lat, 0.0, sin_lat];
    let une = [-sin_lat, 0.0, cos_lat];
    let uwe = [0.0, -1.0, 0.0];

    let spin_x = |v: [f64; 3]| [v[0] * cos_spin - v[1] * sin_spin, v[0] * sin_spin + v[1] * cos_spin, v[2]];
    let uz = spin_x(uze);
    let un = spin_x(une);
    let uw = spin_x(uwe);

    let p = vec.as_array();
    let pz = uz[0] * p[0] + uz[1] * p[1] + uz[2] * p[2];
    let pn = un[0] * p[0] + un[1] * p[1] + un[2] * p[2];
    let pw = uw[0] * p[0] + uw[1] * p[1] + uw[2] * p[2];

    let proj = (pn * pn + pw * pw).sqrt();
    let mut azimuth = crate::misc::normalize_degrees((-pw).atan2(pn) * constants::RAD2DEG);
    let mut altitude = proj.atan2(pz) * constants::RAD2DEG;
    altitude = 90.0 - altitude;

    let correction = refraction_angle(refraction, altitude);
    let apparent_altitude = altitude + correction;

    if apparent_altitude < -90.0 || apparent_altitude > 90.0 {
        azimuth = crate::misc::normalize_degrees(azimuth);
    }

    // Reproject to recover apparent RA/Dec after refraction shifts altitude.
    let az_rad = azimuth * constants::DEG2RAD;
    let alt_rad = apparent_altitude * constants::DEG2RAD;
    let (sin_alt, cos_alt) = alt_rad.sin_cos();
    let (sin_az, cos_az) = az_rad.sin_cos();
    let hor_pz = sin_alt;
    let hor_pn = cos_alt * cos_az;
    let hor_pw = -cos_alt * sin_az;

    let unspin_x = |v: [f64; 3]| [v[0] * cos_spin + v[1] * sin_spin, -v[0] * sin_spin + v[1] * cos_spin, v[2]];
    let uz_i = unspin_x([cos_lat, 0.0, sin_lat]);
    let un_i = unspin_x([-sin_lat, 0.0, cos_lat]);
    let uw_i = unspin_x([0.0, -1.0, 0.0]);

    let apparent_eq = [
        uz_i[0] * hor_pz + un_i[0] * hor_pn + uw_i[0] * hor_pw,
        uz_i[1] * hor_pz + un_i[1] * hor_pn + uw_i[1] * hor_pw,
        uz_i[2] * hor_pz + un_i[2] * hor_pn + uw_i[2] * hor_pw,
    ];
    let apparent_sph = Spherical::from_vector(Vector::from_array(apparent_eq, t));

    HorizontalCoordinates {
        azimuth,
        altitude: apparent_altitude,
        ra: crate::misc::normalize_degrees(apparent_sph.lon) / 15.0,
        dec: apparent_sph.lat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airless_refraction_is_zero() {
        assert_eq!(refraction_angle(Refraction::Airless, 10.0), 0.0);
    }

    #[test]
    fn refraction_is_small_well_above_horizon() {
        let r = refraction_angle(Refraction::Normal, 45.0);
        assert!(r > 0.0 && r < 0.02, "r={r}");
    }

    #[test]
    fn refraction_grows_near_horizon() {
        let high = refraction_angle(Refraction::Normal, 45.0);
        let low = refraction_angle(Refraction::Normal, 1.0);
        assert!(low > high);
    }

    #[test]
    fn jpl_horizons_matches_normal_above_horizon_but_skips_the_taper() {
        let above = refraction_angle(Refraction::Normal, 10.0);
        assert_eq!(refraction_angle(Refraction::JplHorizons, 10.0), above);

        let normal_below = refraction_angle(Refraction::Normal, -5.0);
        let jpl_below = refraction_angle(Refraction::JplHorizons, -5.0);
        assert!(jpl_below > normal_below, "jpl_below={jpl_below} normal_below={normal_below}");
    }

    #[test]
    fn equator_for_sun_has_plausible_distance() {
        let t = Time::from_calendar(2024, 1, 1, 0, 0, 0.0).unwrap();
        let eq = equator(Body::Sun, t, None, false, true).unwrap();
        assert!((eq.dist - 1.0).abs() < 0.05);
    }

    #[test]
    fn horizon_altitude_is_in_range() {
        let t = Time::from_calendar(2024, 6, 1, 18, 0, 0.0).unwrap();
        let obs = Observer::new(40.0, -105.0, 1.6);
        let eq = equator(Body::Sun, t, Some(obs), true, true).unwrap();
        let hz = horizon(eq.vector, obs, t, Refraction::Normal);
        assert!((-90.0..=90.0).contains(&hz.altitude));
    }
}
