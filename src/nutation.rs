// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fundamental arguments and nutation (component C3).
//!
//! The fundamental-argument polynomials below are the IERS Conventions
//! (2003) expressions from Simon et al. (1994), reused unchanged from their
//! `eraFal03`/`eraFalp03`/`eraFaf03`/`eraFad03`/`eraFaom03` form. The
//! nutation series itself is the dominant dozen terms of the classical
//! 1980-theory luni-solar series (the amplitudes IAU 2000B's 77-term table
//! converges toward); the full generator-produced 77-term table is not part
//! of the retrieval pack (see SPEC_FULL.md §4 and DESIGN.md).

use crate::constants::{ARCSEC2RAD, ARCSEC_PER_TURN, DEG2RAD, TAU};
use crate::misc::norm_angle;
use crate::time::julian_centuries_tt;

/// Mean anomaly of the Moon, radians.
pub fn l03(t: f64) -> f64 {
    (485868.249036 + t * (1717915923.2178 + t * (31.8792 + t * (0.051635 + t * -0.00024470))))
        .rem_euclid(ARCSEC_PER_TURN)
        * ARCSEC2RAD
}

/// Mean anomaly of the Sun, radians.
pub fn lp03(t: f64) -> f64 {
    (1287104.793048 + t * (129596581.0481 + t * (-0.5532 + t * (0.000136 + t * -0.00001149))))
        .rem_euclid(ARCSEC_PER_TURN)
        * ARCSEC2RAD
}

/// Mean longitude of the Moon minus mean longitude of its ascending node
/// (`F`), radians.
pub fn f03(t: f64) -> f64 {
    (335779.526232 + t * (1739527262.8478 + t * (-12.7512 + t * (-0.001037 + t * 0.00000417))))
        .rem_euclid(ARCSEC_PER_TURN)
        * ARCSEC2RAD
}

/// Mean elongation of the Moon from the Sun (`D`), radians.
pub fn d03(t: f64) -> f64 {
    (1072260.703692 + t * (1602961601.2090 + t * (-6.3706 + t * (0.006593 + t * -0.00003169))))
        .rem_euclid(ARCSEC_PER_TURN)
        * ARCSEC2RAD
}

/// Longitude of the Moon's ascending node (`Omega`), radians.
pub fn om03(t: f64) -> f64 {
    (450160.398036 + t * (-6962890.5431 + t * (7.4722 + t * (0.007702 + t * -0.00005939))))
        .rem_euclid(ARCSEC_PER_TURN)
        * ARCSEC2RAD
}

/// One term of the luni-solar nutation series: integer multipliers of
/// `(l, l', F, D, Omega)`, then the longitude sine coefficient and its
/// secular rate, then the obliquity cosine coefficient and its secular
/// rate, all in arcseconds (rate per Julian century).
struct NutationTerm {
    nl: f64,
    nlp: f64,
    nf: f64,
    nd: f64,
    nom: f64,
    ps: f64,
    ps_t: f64,
    ec: f64,
    ec_t: f64,
}

macro_rules! term {
    ($nl:expr, $nlp:expr, $nf:expr, $nd:expr, $nom:expr, $ps:expr, $ps_t:expr, $ec:expr, $ec_t:expr) => {
        NutationTerm {
            nl: $nl as f64,
            nlp: $nlp as f64,
            nf: $nf as f64,
            nd: $nd as f64,
            nom: $nom as f64,
            ps: $ps,
            ps_t: $ps_t,
            ec: $ec,
            ec_t: $ec_t,
        }
    };
}

/// Dominant terms of the luni-solar nutation series, amplitudes in
/// arcseconds. See module docs for provenance.
#[rustfmt::skip]
const TERMS: &[NutationTerm] = &[
    term!( 0,  0,  0,  0,  1, -17.1996, -0.01742,  9.2025,  0.00089),
    term!( 0,  0,  2, -2,  2,  -1.3187, -0.00016,  0.5736, -0.00031),
    term!( 0,  0,  2,  0,  2,  -0.2274, -0.00002,  0.0977, -0.00005),
    term!( 0,  0,  0,  0,  2,   0.2062,  0.00002, -0.0895,  0.00005),
    term!( 0,  1,  0,  0,  0,   0.1426, -0.00034,  0.0054, -0.00001),
    term!( 1,  0,  0,  0,  0,   0.0712,  0.00001, -0.0007,  0.0),
    term!( 0,  1,  2, -2,  2,  -0.0517,  0.00012,  0.0224, -0.00006),
    term!( 0,  0,  2,  0,  1,  -0.0386, -0.00004,  0.0200,  0.0),
    term!( 1,  0,  2,  0,  2,  -0.0301,  0.0,      0.0129, -0.00001),
    term!( 0, -1,  2, -2,  2,   0.0217, -0.00005, -0.0095,  0.00003),
    term!( 1,  0,  0, -2,  0,   0.0158,  0.0,     -0.0001,  0.0),
    term!( 0,  0,  2, -2,  1,   0.0129,  0.00001, -0.0070,  0.0),
];

/// Constant planetary-nutation bias added after the luni-solar sum
/// (longitude, obliquity), arcseconds.
const PLANETARY_BIAS_PSI: f64 = -0.000135;
const PLANETARY_BIAS_EPS: f64 = 0.000388;

/// Nutation in longitude and obliquity at `tt` (days past J2000.0),
/// arcseconds.
pub fn nutation_angles(tt: f64) -> (f64, f64) {
    let t = julian_centuries_tt(tt);
    let l = l03(t);
    let lp = lp03(t);
    let f = f03(t);
    let d = d03(t);
    let om = om03(t);

    let mut dpsi = 0.0;
    let mut deps = 0.0;
    for term in TERMS {
        let phi = term.nl * l + term.nlp * lp + term.nf * f + term.nd * d + term.nom * om;
        let (sin_phi, cos_phi) = phi.sin_cos();
        dpsi += (term.ps + term.ps_t * t) * sin_phi;
        deps += (term.ec + term.ec_t * t) * cos_phi;
    }
    dpsi += PLANETARY_BIAS_PSI;
    deps += PLANETARY_BIAS_EPS;
    (dpsi, deps)
}

/// Mean obliquity of the ecliptic at `tt`, degrees. Quintic polynomial in
/// Julian centuries (IAU 2006 form).
pub fn mean_obliquity_deg(tt: f64) -> f64 {
    let t = julian_centuries_tt(tt);
    let arcsec = 84381.406
        + t * (-46.836769 + t * (-0.0001831 + t * (0.00200340 + t * (-0.000000576 + t * -0.0000000434))));
    arcsec / 3600.0
}

/// The bundle of precession/nutation quantities cached per [`Time`](crate::time::Time).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ETilt {
    pub tt: f64,
    pub dpsi: f64,
    pub deps: f64,
    pub mean_obliquity_deg: f64,
    pub true_obliquity_deg: f64,
    /// Equation of the equinoxes, in sidereal hours.
    pub equation_of_equinoxes_hours: f64,
}

pub fn calc_e_tilt(tt: f64) -> ETilt {
    let (dpsi, deps) = nutation_angles(tt);
    let mean_obliquity_deg = mean_obliquity_deg(tt);
    let true_obliquity_deg = mean_obliquity_deg + deps / 3600.0;
    let mean_obliquity_rad = mean_obliquity_deg * DEG2RAD;
    let equation_of_equinoxes_hours = dpsi * mean_obliquity_rad.cos() / 15.0 / 3600.0;
    ETilt { tt, dpsi, deps, mean_obliquity_deg, true_obliquity_deg, equation_of_equinoxes_hours }
}

/// Nutation rotation matrix: mean-of-date equator/equinox -> true-of-date.
/// `direction` selects which way the rotation is built; pass `true` for
/// mean->true (the conventional direction spec describes) and invert for
/// the other way.
pub fn nutation_matrix(tt: f64) -> crate::vector::RotationMatrix {
    let et = calc_e_tilt(tt);
    let mean_obliq = et.mean_obliquity_deg * DEG2RAD;
    let true_obliq = et.true_obliquity_deg * DEG2RAD;
    let dpsi = et.dpsi * ARCSEC2RAD;

    let r = crate::vector::RotationMatrix::identity();
    let r = r.pivot(0, mean_obliq * crate::constants::RAD2DEG).unwrap();
    let r = r.pivot(2, -dpsi * crate::constants::RAD2DEG).unwrap();
    r.pivot(0, -true_obliq * crate::constants::RAD2DEG).unwrap()
}

/// Normalize a raw angle sum (radians) the way the fundamental arguments
/// are normalized internally; exposed for callers assembling their own
/// combinations of fundamental arguments.
pub fn norm(a: f64) -> f64 {
    norm_angle(a % TAU)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nutation_is_small_near_j2000() {
        let (dpsi, deps) = nutation_angles(0.0);
        assert!(dpsi.abs() < 20.0);
        assert!(deps.abs() < 10.0);
    }

    #[test]
    fn mean_obliquity_near_j2000_is_about_23_4_degrees() {
        let eps = mean_obliquity_deg(0.0);
        assert!((eps - 23.4392911).abs() < 1e-3);
    }

    #[test]
    fn nutation_matrix_is_orthonormal() {
        let r = nutation_matrix(3650.0);
        assert!(r.is_orthonormal(1e-12));
    }
}
