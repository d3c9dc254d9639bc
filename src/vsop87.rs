// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Truncated VSOP87-shaped planetary position series (component C5).
//!
//! Each planet's heliocentric ecliptic longitude/latitude/radius is a
//! [`Series`]: a list of polynomial levels in `t` (Julian millennia past
//! J2000), each level a sum of `amplitude * cos(phase + frequency * t)`
//! terms, matching the shape of the real VSOP87 tables. The full
//! generator-produced term tables are not available to this crate (see
//! DESIGN.md); the series below are instead built from each planet's
//! published J2000 mean orbital elements, truncated to the secular
//! (mean-motion) term plus the leading eccentricity/inclination
//! correction -- a first-order approximation of the same Poisson-series
//! shape, not the full multi-thousand-term theory.

use crate::bodies::Body;
use crate::constants::{DAYS_PER_MILLENNIUM, DEG2RAD, TAU};
use crate::error::AstroError;
use crate::misc::norm_angle;
use crate::time::Time;
use crate::vector::{StateVector, Vector};
use crate::vsop87_data::{self, Elements};

#[derive(Clone, Copy, Debug)]
pub struct Term {
    pub amplitude: f64,
    pub phase: f64,
    pub frequency: f64,
}

/// One longitude/latitude/radius series: `levels[s]` holds the degree-`s`
/// terms, evaluated as `t^s * sum_k amplitude_k * cos(phase_k + freq_k * t)`.
#[derive(Clone, Debug, Default)]
pub struct Series {
    pub levels: Vec<Vec<Term>>,
}

impl Series {
    pub fn evaluate(&self, t: f64) -> f64 {
        let mut total = 0.0;
        let mut tp = 1.0;
        for level in &self.levels {
            let mut level_sum = 0.0;
            for term in level {
                level_sum += term.amplitude * (term.phase + term.frequency * t).cos();
            }
            total += tp * level_sum;
            tp *= t;
        }
        total
    }

    /// `d/dt` of [`Series::evaluate`], by the product rule on each
    /// `t^s * f_s(t)` level.
    pub fn derivative(&self, t: f64) -> f64 {
        let mut total = 0.0;
        let mut tp = 1.0;
        let mut tp_prev = 0.0;
        for (s, level) in self.levels.iter().enumerate() {
            let mut level_value = 0.0;
            let mut level_deriv = 0.0;
            for term in level {
                let phase = term.phase + term.frequency * t;
                level_value += term.amplitude * phase.cos();
                level_deriv += -term.amplitude * term.frequency * phase.sin();
            }
            total += (s as f64) * tp_prev * level_value + tp * level_deriv;
            tp_prev = tp;
            tp *= t;
        }
        total
    }
}

struct PlanetSeries {
    lon: Series,
    lat: Series,
    rad: Series,
}

fn build_series(elements: &Elements) -> PlanetSeries {
    let n = TAU * DAYS_PER_MILLENNIUM / elements.period_days;
    let l0 = elements.l0_deg * DEG2RAD;
    let varpi = elements.long_perihelion_deg * DEG2RAD;
    let omega = elements.omega_deg * DEG2RAD;
    let i = elements.i_deg * DEG2RAD;
    let e = elements.e;
    let a = elements.a;

    let mean_anomaly_phase = l0 - varpi;

    let lon = Series {
        levels: vec![
            vec![
                Term { amplitude: l0, phase: 0.0, frequency: 0.0 },
                Term { amplitude: 2.0 * e, phase: mean_anomaly_phase, frequency: n },
            ],
            vec![Term { amplitude: n, phase: 0.0, frequency: 0.0 }],
        ],
    };

    let lat = Series {
        levels: vec![vec![Term {
            amplitude: i.sin(),
            phase: l0 - omega,
            frequency: n,
        }]],
    };

    let rad = Series {
        levels: vec![vec![
            Term { amplitude: a, phase: 0.0, frequency: 0.0 },
            Term { amplitude: -a * e, phase: mean_anomaly_phase, frequency: n },
        ]],
    };

    PlanetSeries { lon, lat, rad }
}

fn elements_for(body: Body) -> Option<&'static Elements> {
    match body {
        Body::Mercury => Some(&vsop87_data::MERCURY),
        Body::Venus => Some(&vsop87_data::VENUS),
        Body::Earth => Some(&vsop87_data::EARTH),
        Body::Mars => Some(&vsop87_data::MARS),
        Body::Jupiter => Some(&vsop87_data::JUPITER),
        Body::Saturn => Some(&vsop87_data::SATURN),
        Body::Uranus => Some(&vsop87_data::URANUS),
        Body::Neptune => Some(&vsop87_data::NEPTUNE),
        _ => None,
    }
}

/// Fixed small rotation from the VSOP87 dynamical-ecliptic J2000 frame to
/// the FK5/J2000 equatorial frame: the mean-obliquity rotation plus a
/// microarcsecond-level frame-bias correction.
fn ecliptic_to_equatorial_j2000(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let xe = x + 0.000000440360 * y - 0.000000190919 * z;
    let ye = -0.000000479966 * x + 0.917482137087 * y - 0.397776982902 * z;
    let ze = 0.397776982902 * y + 0.917482137087 * z;
    (xe, ye, ze)
}

/// Heliocentric J2000 equatorial position and velocity for a VSOP-modeled
/// planet (Mercury through Neptune). Returns `InvalidBody` for any other
/// body.
pub fn helio_state(body: Body, t: Time) -> Result<StateVector, AstroError> {
    let elements = elements_for(body)
        .ok_or(AstroError::InvalidBody { function: "vsop87::helio_state", body })?;
    let series = build_series(elements);

    let millennia = t.tt / DAYS_PER_MILLENNIUM;
    let lon = norm_angle(series.lon.evaluate(millennia));
    let lat = series.lat.evaluate(millennia);
    let rad = series.rad.evaluate(millennia);

    let dlon = series.lon.derivative(millennia) / DAYS_PER_MILLENNIUM;
    let dlat = series.lat.derivative(millennia) / DAYS_PER_MILLENNIUM;
    let drad = series.rad.derivative(millennia) / DAYS_PER_MILLENNIUM;

    let (sin_lon, cos_lon) = lon.sin_cos();
    let (sin_lat, cos_lat) = lat.sin_cos();

    let x = rad * cos_lat * cos_lon;
    let y = rad * cos_lat * sin_lon;
    let z = rad * sin_lat;

    let vx = drad * cos_lat * cos_lon - rad * sin_lat * dlat * cos_lon - rad * cos_lat * sin_lon * dlon;
    let vy = drad * cos_lat * sin_lon - rad * sin_lat * dlat * sin_lon + rad * cos_lat * cos_lon * dlon;
    let vz = drad * sin_lat + rad * cos_lat * dlat;

    let (xe, ye, ze) = ecliptic_to_equatorial_j2000(x, y, z);
    let (vxe, vye, vze) = ecliptic_to_equatorial_j2000(vx, vy, vz);

    Ok(StateVector { x: xe, y: ye, z: ze, vx: vxe, vy: vye, vz: vze, t })
}

/// Heliocentric J2000 equatorial position only, discarding velocity.
pub fn helio_vector(body: Body, t: Time) -> Result<Vector, AstroError> {
    Ok(helio_state(body, t)?.position())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earth_distance_is_near_one_au() {
        let t = Time::from_calendar(2024, 1, 1, 0, 0, 0.0).unwrap();
        let v = helio_vector(Body::Earth, t).unwrap();
        let r = v.length();
        assert!((r - 1.0).abs() < 0.05, "r={r}");
    }

    #[test]
    fn jupiter_distance_is_near_semi_major_axis() {
        let t = Time::from_calendar(2024, 1, 1, 0, 0, 0.0).unwrap();
        let v = helio_vector(Body::Jupiter, t).unwrap();
        let r = v.length();
        assert!((r - vsop87_data::JUPITER.a).abs() < 1.0, "r={r}");
    }

    #[test]
    fn unsupported_body_is_rejected() {
        assert!(helio_vector(Body::Moon, Time::from_ut(0.0)).is_err());
    }

    #[test]
    fn moves_over_a_day() {
        let t0 = Time::from_ut(0.0);
        let t1 = Time::from_ut(1.0);
        let v0 = helio_vector(Body::Mercury, t0).unwrap();
        let v1 = helio_vector(Body::Mercury, t1).unwrap();
        assert!((v1.x - v0.x).abs() > 1e-6 || (v1.y - v0.y).abs() > 1e-6);
    }
}
