// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Body-to-theory dispatch, light-time iteration, and barycenter assembly
//! (component C9).

use crate::bodies::Body;
use crate::constants::{C_AUDAY, EARTH_MOON_MASS_RATIO, gm};
use crate::error::AstroError;
use crate::time::Time;
use crate::vector::Vector;
use crate::{moon, pluto, vsop87};

fn earth_helio_vector(t: Time) -> Vector {
    vsop87::helio_vector(Body::Earth, t).expect("Earth is a VSOP-modeled body")
}

/// Heliocentric J2000 equatorial position of `body` at `t`.
pub fn helio_vector(body: Body, t: Time) -> Result<Vector, AstroError> {
    match body {
        Body::Sun => Ok(Vector::zero(t)),
        Body::Moon => Ok(earth_helio_vector(t) + moon::geo_vector(t)),
        Body::Emb => {
            let earth = earth_helio_vector(t);
            let geo_moon = moon::geo_vector(t);
            Ok(earth + geo_moon * (1.0 / (1.0 + EARTH_MOON_MASS_RATIO)))
        }
        Body::Ssb => barycenter_offset(t).map(|offset| Vector::zero(t) - offset),
        Body::Mercury | Body::Venus | Body::Earth | Body::Mars | Body::Jupiter | Body::Saturn
        | Body::Uranus | Body::Neptune => vsop87::helio_vector(body, t),
        Body::Pluto => Ok(pluto::helio_vector(t)),
    }
}

/// Position of the Sun relative to the solar-system barycenter, i.e. the
/// offset that must be subtracted from a heliocentric vector to make it
/// barycentric: `-Sum(GM_i / GM_total) * r_i` over Jupiter..Neptune.
fn barycenter_offset(t: Time) -> Result<Vector, AstroError> {
    let gm_total = gm::SUN + gm::JUPITER + gm::SATURN + gm::URANUS + gm::NEPTUNE;
    let mut offset = Vector::zero(t);
    for (body, body_gm) in [
        (Body::Jupiter, gm::JUPITER),
        (Body::Saturn, gm::SATURN),
        (Body::Uranus, gm::URANUS),
        (Body::Neptune, gm::NEPTUNE),
    ] {
        let r = vsop87::helio_vector(body, t)?;
        offset = offset + r * (body_gm / gm_total);
    }
    Ok(offset)
}

/// Solar-system barycentric position of `body` at `t`: the major-body
/// barycentric correction combined with a heliocentric vector.
pub fn bary_state(body: Body, t: Time) -> Result<Vector, AstroError> {
    let offset = barycenter_offset(t)?;
    let helio = helio_vector(body, t)?;
    Ok(helio - offset)
}

/// Geocentric J2000 equatorial position of `body` at `t`, with optional
/// light-time and aberration correction.
pub fn geo_vector(body: Body, t: Time, aberration: bool) -> Result<Vector, AstroError> {
    if body == Body::Earth {
        return Ok(Vector::zero(t));
    }
    if body == Body::Moon {
        return Ok(moon::geo_vector(t));
    }

    let mut ltime = t;
    for _ in 0..10 {
        let helio_body = helio_vector(body, ltime)?;
        let earth_time = if aberration { ltime } else { t };
        let earth = earth_helio_vector(earth_time);
        let vec = helio_body - earth;
        let dist = vec.length();
        let new_ltime = Time::from_tt(t.tt - dist / C_AUDAY);
        let delta = (new_ltime.tt - ltime.tt).abs();
        ltime = new_ltime;
        if delta < 1e-9 {
            let helio_body = helio_vector(body, ltime)?;
            let earth_time = if aberration { ltime } else { t };
            let earth = earth_helio_vector(earth_time);
            return Ok(helio_body - earth);
        }
    }
    Err(AstroError::NoConverge { function: "geo_vector" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earth_geo_vector_is_zero() {
        let t = Time::from_ut(0.0);
        let v = geo_vector(Body::Earth, t, false).unwrap();
        assert_eq!(v.length(), 0.0);
    }

    #[test]
    fn sun_geo_vector_is_near_one_au() {
        let t = Time::from_calendar(2024, 1, 1, 0, 0, 0.0).unwrap();
        let v = geo_vector(Body::Sun, t, false).unwrap();
        assert!((v.length() - 1.0).abs() < 0.05);
    }

    #[test]
    fn mars_geo_vector_converges() {
        let t = Time::from_calendar(2024, 6, 1, 0, 0, 0.0).unwrap();
        let v = geo_vector(Body::Mars, t, true).unwrap();
        assert!(v.length() > 0.3);
    }

    #[test]
    fn ssb_is_close_to_the_sun() {
        let t = Time::from_calendar(2024, 1, 1, 0, 0, 0.0).unwrap();
        let v = helio_vector(Body::Ssb, t).unwrap();
        assert!(v.length() < 0.02, "ssb offset too large: {}", v.length());
    }
}
