// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Galilean moon positions (component C8): a Keplerian-elements series per
//! moon, solved the same way as [`crate::kepler`]'s Pluto seed orbit, then
//! rotated from the Jupiter-equatorial frame to equatorial J2000.
//!
//! The full `al0/al1/[a]/[l]/[z]/[zeta]` perturbation-series model spec §4.8
//! describes is generator-produced and not present in the retrieval pack
//! (see DESIGN.md); each moon is instead modeled as a fixed-element ellipse
//! about Jupiter, using each moon's published mean orbital elements.

use crate::kepler::{self, Elements};
use crate::time::Time;
use crate::vector::{RotationMatrix, StateVector, Vector};

/// One Galilean moon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JupiterMoon {
    Io,
    Europa,
    Ganymede,
    Callisto,
}

const AU_PER_KM: f64 = 1.0 / crate::constants::KM_PER_AU;

fn elements_for(moon: JupiterMoon) -> Elements {
    match moon {
        JupiterMoon::Io => Elements {
            a: 421_800.0 * AU_PER_KM,
            e: 0.0041,
            i_deg: 0.036,
            raan_deg: 43.977,
            arg_peri_deg: 84.129,
            mean_anomaly0_deg: 342.021,
            epoch_days: 0.0,
            period_days: 1.769138,
        },
        JupiterMoon::Europa => Elements {
            a: 671_100.0 * AU_PER_KM,
            e: 0.0094,
            i_deg: 0.466,
            raan_deg: 219.106,
            arg_peri_deg: 88.970,
            mean_anomaly0_deg: 171.016,
            epoch_days: 0.0,
            period_days: 3.551181,
        },
        JupiterMoon::Ganymede => Elements {
            a: 1_070_400.0 * AU_PER_KM,
            e: 0.0013,
            i_deg: 0.177,
            raan_deg: 63.552,
            arg_peri_deg: 192.417,
            mean_anomaly0_deg: 317.540,
            epoch_days: 0.0,
            period_days: 7.154553,
        },
        JupiterMoon::Callisto => Elements {
            a: 1_882_700.0 * AU_PER_KM,
            e: 0.0074,
            i_deg: 0.192,
            raan_deg: 298.848,
            arg_peri_deg: 52.643,
            mean_anomaly0_deg: 181.408,
            epoch_days: 0.0,
            period_days: 16.689018,
        },
    }
}

/// Jupiter-equatorial -> equatorial J2000, built from Jupiter's J2000 pole
/// direction (RA 268.057 deg, Dec 64.495 deg).
fn rotation_jup_eqj() -> RotationMatrix {
    const POLE_RA_DEG: f64 = 268.057;
    const POLE_DEC_DEG: f64 = 64.495;
    RotationMatrix::identity()
        .pivot(2, POLE_RA_DEG + 90.0)
        .unwrap()
        .pivot(0, 90.0 - POLE_DEC_DEG)
        .unwrap()
}

/// Jupiter-relative state vector of `moon` at `t`, in equatorial J2000.
pub fn jupiter_moon_state(moon: JupiterMoon, t: Time) -> StateVector {
    let elements = elements_for(moon);
    let (pos, vel) = kepler::state_at(&elements, crate::constants::gm::JUPITER, t.tt);
    let jup_pos = Vector::new(pos[0], pos[1], pos[2], t);
    let jup_vel = Vector::new(vel[0], vel[1], vel[2], t);
    let rot = rotation_jup_eqj();
    StateVector::from_position_velocity(rot.rotate_vector(jup_pos), rot.rotate_vector(jup_vel))
}

/// Equatorial J2000 state vectors for all four Galilean moons, Jupiter-relative.
pub fn all_moon_states(t: Time) -> [StateVector; 4] {
    [
        jupiter_moon_state(JupiterMoon::Io, t),
        jupiter_moon_state(JupiterMoon::Europa, t),
        jupiter_moon_state(JupiterMoon::Ganymede, t),
        jupiter_moon_state(JupiterMoon::Callisto, t),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_orbit_radius_matches_semi_major_axis() {
        let t = Time::from_ut(0.0);
        let state = jupiter_moon_state(JupiterMoon::Io, t);
        let r = state.position().length();
        let expected = 421_800.0 * AU_PER_KM;
        assert!((r - expected).abs() / expected < 0.01, "r={r} expected={expected}");
    }

    #[test]
    fn callisto_is_farthest() {
        let t = Time::from_ut(0.0);
        let io = jupiter_moon_state(JupiterMoon::Io, t).position().length();
        let callisto = jupiter_moon_state(JupiterMoon::Callisto, t).position().length();
        assert!(callisto > io);
    }

    #[test]
    fn moons_move_over_a_day() {
        let t0 = Time::from_ut(0.0);
        let t1 = Time::from_ut(1.0);
        let a = jupiter_moon_state(JupiterMoon::Io, t0).position();
        let b = jupiter_moon_state(JupiterMoon::Io, t1).position();
        assert!(a.angle_between(&b).unwrap() > 1.0);
    }
}
