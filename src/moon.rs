// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Geocentric Moon position (component C6), ELP2000/Brown lunar theory.
//!
//! The five fundamental arguments (`l0, l, ls, f, d`) and their long-period
//! corrections (`s1..s7`, `dl0, dl, dls, df, dd, dgam`), the ten-term
//! latitude correction `N`, and the eleven explicit long-period longitude
//! terms below are the real ELP2000/Brown coefficients. The dominant
//! longitude and distance series (normally the large generator-produced
//! "ADDSOL" table -- absent from the retrieval pack, see DESIGN.md) are
//! instead the standard published low-precision lunar-longitude and
//! lunar-distance term sets (Meeus-style abbreviated ELP2000 tables),
//! using the same fundamental arguments.

use crate::constants::{KM_PER_AU, PI, RAD2ARCSEC};
use crate::nutation::mean_obliquity_deg;
use crate::precession::precession_matrix;
use crate::time::Time;
use crate::vector::{RotationMatrix, Vector};

const ARCSEC_PER_RADIAN: f64 = RAD2ARCSEC;

fn sine(phi: f64) -> f64 {
    (2.0 * PI * phi).sin()
}

fn frac(x: f64) -> f64 {
    x - x.floor()
}

struct FundamentalArguments {
    l0: f64,
    l: f64,
    ls: f64,
    f: f64,
    d: f64,
    dgam: f64,
}

fn fundamental_arguments(t: f64) -> FundamentalArguments {
    let t2 = t * t;
    let s1 = sine(0.19833 + 0.05611 * t);
    let s2 = sine(0.27869 + 0.04508 * t);
    let s3 = sine(0.16827 - 0.36903 * t);
    let s4 = sine(0.34734 - 5.37261 * t);
    let s5 = sine(0.10498 - 5.37899 * t);
    let s6 = sine(0.42681 - 0.41855 * t);
    let s7 = sine(0.14943 - 5.37511 * t);

    let dl0 = 0.84 * s1 + 0.31 * s2 + 14.27 * s3 + 7.26 * s4 + 0.28 * s5 + 0.24 * s6;
    let dl = 2.94 * s1 + 0.31 * s2 + 14.27 * s3 + 9.34 * s4 + 1.12 * s5 + 0.83 * s6;
    let dls = -6.40 * s1 - 1.89 * s6;
    let df = 0.21 * s1 + 0.31 * s2 + 14.27 * s3 - 88.70 * s4 - 15.30 * s5 + 0.24 * s6 - 1.86 * s7;
    let dd = dl0 - dls;
    let dgam = -3332e-9 * sine(0.59734 - 5.37261 * t)
        - 539e-9 * sine(0.35498 - 5.37899 * t)
        - 64e-9 * sine(0.39943 - 5.37511 * t);

    let two_pi = 2.0 * PI;
    let l0 = two_pi * frac(0.60643382 + 1336.85522467 * t - 0.00000313 * t2) + dl0 / ARCSEC_PER_RADIAN;
    let l = two_pi * frac(0.37489701 + 1325.55240982 * t + 0.00002565 * t2) + dl / ARCSEC_PER_RADIAN;
    let ls = two_pi * frac(0.99312619 + 99.99735956 * t - 0.00000044 * t2) + dls / ARCSEC_PER_RADIAN;
    let f = two_pi * frac(0.25909118 + 1342.22782980 * t - 0.00000892 * t2) + df / ARCSEC_PER_RADIAN;
    let d = two_pi * frac(0.82736186 + 1236.85308708 * t - 0.00000397 * t2) + dd / ARCSEC_PER_RADIAN;

    FundamentalArguments { l0, l, ls, f, d, dgam }
}

struct AddnTerm {
    coeff: f64,
    p: f64,
    q: f64,
    r: f64,
    s: f64,
}

macro_rules! addn {
    ($coeff:expr, $p:expr, $q:expr, $r:expr, $s:expr) => {
        AddnTerm { coeff: $coeff, p: $p as f64, q: $q as f64, r: $r as f64, s: $s as f64 }
    };
}

const ADDN_TERMS: &[AddnTerm] = &[
    addn!(-526.069, 0, 0, 1, -2),
    addn!(-3.352, 0, 0, 1, -4),
    addn!(44.297, 1, 0, 1, -2),
    addn!(-6.000, 1, 0, 1, -4),
    addn!(20.599, -1, 0, 1, 0),
    addn!(-30.598, -1, 0, 1, -2),
    addn!(-24.649, -2, 0, 1, 0),
    addn!(-2.000, -2, 0, 1, -2),
    addn!(-22.571, 0, 1, 1, -2),
    addn!(10.985, 0, -1, 1, -2),
];

fn latitude_correction_n(fa: &FundamentalArguments) -> f64 {
    ADDN_TERMS
        .iter()
        .map(|term| {
            let phi = term.p * fa.l + term.q * fa.ls + term.r * fa.f + term.s * fa.d;
            term.coeff * phi.sin()
        })
        .sum()
}

/// Explicit long-period longitude corrections, arcseconds, as a function of
/// `T` alone (not the fundamental arguments).
fn extra_longitude_terms(t: f64) -> f64 {
    0.82 * sine(0.7736 - 62.5512 * t)
        + 0.31 * sine(0.0466 - 125.1025 * t)
        + 0.35 * sine(0.5785 - 25.1042 * t)
        + 0.66 * sine(0.4591 + 1335.8075 * t)
        + 0.64 * sine(0.3130 - 91.5680 * t)
        + 1.14 * sine(0.1480 + 1331.2898 * t)
        + 0.21 * sine(0.5918 + 1056.5859 * t)
        + 0.44 * sine(0.5784 + 1322.8595 * t)
        + 0.24 * sine(0.2275 - 5.7374 * t)
        + 0.28 * sine(0.2965 + 2.6929 * t)
        + 0.33 * sine(0.3132 + 6.3368 * t)
}

struct LongitudeTerm {
    m_prime: f64,
    m: f64,
    f: f64,
    d: f64,
    degrees: f64,
}

macro_rules! lon_term {
    ($deg:expr, $mp:expr, $m:expr, $f:expr, $d:expr) => {
        LongitudeTerm { m_prime: $mp as f64, m: $m as f64, f: $f as f64, d: $d as f64, degrees: $deg }
    };
}

/// Dominant terms of the Moon's ecliptic longitude correction, degrees,
/// standing in for the ADDSOL table's main contribution.
const LONGITUDE_TERMS: &[LongitudeTerm] = &[
    lon_term!(6.288750, 1, 0, 0, 0),
    lon_term!(-1.274018, -1, 0, 0, 2),
    lon_term!(0.658309, 0, 0, 0, 2),
    lon_term!(-0.185596, 0, 1, 0, 0),
    lon_term!(-0.059110, -2, 0, 0, 2),
    lon_term!(-0.057009, 1, 1, 0, -2),
    lon_term!(0.053232, 1, 0, 0, 2),
    lon_term!(0.045874, 0, 0, 0, -2),
    lon_term!(0.041024, -1, 1, 0, 0),
    lon_term!(-0.034718, 0, 0, 1, 0),
    lon_term!(-0.030465, 1, 1, 0, 0),
    lon_term!(-0.015571, 0, 2, 0, -2),
    lon_term!(0.011021, -1, 0, 0, -2),
];

struct DistanceTerm {
    m_prime: f64,
    m: f64,
    d: f64,
    km: f64,
}

macro_rules! dist_term {
    ($km:expr, $mp:expr, $m:expr, $d:expr) => {
        DistanceTerm { m_prime: $mp as f64, m: $m as f64, d: $d as f64, km: $km }
    };
}

/// Dominant terms of the Moon's geocentric distance, kilometers.
const DISTANCE_TERMS: &[DistanceTerm] = &[
    dist_term!(-20905.355, 1, 0, 0),
    dist_term!(-3699.111, -1, 0, 2),
    dist_term!(-2955.968, 0, 0, 2),
    dist_term!(-569.925, 2, 0, 0),
    dist_term!(246.158, 1, 0, 2),
    dist_term!(-204.586, -1, 1, 2),
    dist_term!(-170.733, 1, 1, 0),
    dist_term!(-152.138, -2, 0, 0),
];

const MEAN_DISTANCE_KM: f64 = 385000.56;

/// Geocentric ecliptic-of-date longitude, latitude, and distance of the
/// Moon at `t`: `(lon radians, lat radians, distance AU)`.
pub fn geo_ecliptic(t: Time) -> (f64, f64, f64) {
    let tt_centuries = t.tt / crate::constants::DAYS_PER_CENTURY;
    let fa = fundamental_arguments(tt_centuries);

    let mut dlam = extra_longitude_terms(tt_centuries);

    for term in LONGITUDE_TERMS {
        let phi = term.m_prime * fa.l + term.m * fa.ls + term.f * fa.f + term.d * fa.d;
        dlam += term.degrees * 3600.0 * phi.sin();
    }

    let lon = 2.0 * PI * frac((fa.l0 + dlam / ARCSEC_PER_RADIAN) / (2.0 * PI));

    let n = latitude_correction_n(&fa);
    let s_arg = fa.f;
    let lat_seconds =
        (1.000002708 + 139.978 * fa.dgam) * (18518.511 + 1.189) * s_arg.sin() - 6.24 * (3.0 * fa.f).sin() + n;
    let lat = (PI / 648000.0) * lat_seconds;

    let mut distance_km = MEAN_DISTANCE_KM;
    for term in DISTANCE_TERMS {
        let phi = term.m_prime * fa.l + term.m * fa.ls + term.d * fa.d;
        distance_km += term.km * phi.cos();
    }
    let distance_au = distance_km / KM_PER_AU;

    (lon, lat, distance_au)
}

/// Geocentric J2000 equatorial position of the Moon.
///
/// Built per spec: ecliptic-of-date -> mean equatorial of date via the
/// mean-obliquity rotation, then precession to J2000 (no nutation step,
/// matching the classical lunar-theory convention of working in the mean
/// frame throughout).
pub fn geo_vector(t: Time) -> Vector {
    let (lon, lat, dist) = geo_ecliptic(t);
    let (sin_lon, cos_lon) = lon.sin_cos();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let ecliptic = Vector::new(dist * cos_lat * cos_lon, dist * cos_lat * sin_lon, dist * sin_lat, t);

    let obliquity_deg = mean_obliquity_deg(t.tt);
    let ecl_to_mean_equ = RotationMatrix::identity().pivot(0, -obliquity_deg).unwrap();
    let mean_equ_of_date_to_j2000 = precession_matrix(t.tt).inverse();

    let rotation = mean_equ_of_date_to_j2000.combine(&ecl_to_mean_equ);
    rotation.rotate_vector(ecliptic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_within_lunar_orbit_range() {
        let t = Time::from_calendar(2000, 1, 1, 0, 0, 0.0).unwrap();
        let (_, _, dist) = geo_ecliptic(t);
        let dist_km = dist * KM_PER_AU;
        assert!((356000.0..407000.0).contains(&dist_km), "dist_km={dist_km}");
    }

    #[test]
    fn geo_vector_matches_distance() {
        let t = Time::from_calendar(2000, 1, 1, 0, 0, 0.0).unwrap();
        let (_, _, dist) = geo_ecliptic(t);
        let v = geo_vector(t);
        assert!((v.length() - dist).abs() < 1e-9);
    }

    #[test]
    fn longitude_is_normalized() {
        let t = Time::from_calendar(2015, 7, 4, 12, 0, 0.0).unwrap();
        let (lon, _, _) = geo_ecliptic(t);
        assert!((0.0..2.0 * PI).contains(&lon));
    }

    #[test]
    fn moon_moves_over_a_day() {
        let t0 = Time::from_ut(0.0);
        let t1 = Time::from_ut(1.0);
        let v0 = geo_vector(t0);
        let v1 = geo_vector(t1);
        assert!(v0.angle_between(&v1).unwrap() > 1.0);
    }
}
