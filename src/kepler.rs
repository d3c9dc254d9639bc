// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Shared Keplerian-elements-to-state-vector routine, used by the Pluto
//! integrator's synthetic seed orbit and the Jupiter-moons theory.

use crate::constants::TAU;

/// Classical elliptical orbital elements about a central mass `gm`.
#[derive(Clone, Copy, Debug)]
pub struct Elements {
    pub a: f64,
    pub e: f64,
    pub i_deg: f64,
    pub raan_deg: f64,
    pub arg_peri_deg: f64,
    pub mean_anomaly0_deg: f64,
    pub epoch_days: f64,
    pub period_days: f64,
}

/// Solve Kepler's equation `M = E - e*sin(E)` for the eccentric anomaly,
/// Newton iteration to within 1e-12 radians.
pub fn solve_eccentric_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = if e < 0.8 { mean_anomaly } else { std::f64::consts::PI };
    for _ in 0..30 {
        let f = ecc - e * ecc.sin() - mean_anomaly;
        let fp = 1.0 - e * ecc.cos();
        let delta = f / fp;
        ecc -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc
}

/// Position and velocity (AU, AU/day) in the frame the elements' angles are
/// referred to, from a full elliptical-elements propagation at `t_days`.
pub fn state_at(elements: &Elements, gm: f64, t_days: f64) -> ([f64; 3], [f64; 3]) {
    let n = TAU / elements.period_days;
    let m = (elements.mean_anomaly0_deg * crate::constants::DEG2RAD
        + n * (t_days - elements.epoch_days))
        .rem_euclid(TAU);

    let ecc = solve_eccentric_anomaly(m, elements.e);
    let (sin_e, cos_e) = ecc.sin_cos();
    let a = elements.a;
    let e = elements.e;

    // Position/velocity in the orbital plane, periapsis along x.
    let x_orb = a * (cos_e - e);
    let y_orb = a * (1.0 - e * e).sqrt() * sin_e;
    let r = a * (1.0 - e * cos_e);
    let edot = n * a / r;
    let vx_orb = -a * edot * sin_e;
    let vy_orb = a * (1.0 - e * e).sqrt() * edot * cos_e;

    let _ = gm; // retained for callers that need vis-viva cross-checks later.

    let raan = elements.raan_deg * crate::constants::DEG2RAD;
    let argp = elements.arg_peri_deg * crate::constants::DEG2RAD;
    let inc = elements.i_deg * crate::constants::DEG2RAD;

    rotate_orbit_to_reference(x_orb, y_orb, vx_orb, vy_orb, raan, argp, inc)
}

#[allow(clippy::too_many_arguments)]
fn rotate_orbit_to_reference(
    x_orb: f64,
    y_orb: f64,
    vx_orb: f64,
    vy_orb: f64,
    raan: f64,
    argp: f64,
    inc: f64,
) -> ([f64; 3], [f64; 3]) {
    let (sin_o, cos_o) = raan.sin_cos();
    let (sin_w, cos_w) = argp.sin_cos();
    let (sin_i, cos_i) = inc.sin_cos();

    // Standard perifocal -> reference-frame rotation matrix (3-1-3 Euler sequence).
    let r11 = cos_o * cos_w - sin_o * sin_w * cos_i;
    let r12 = -cos_o * sin_w - sin_o * cos_w * cos_i;
    let r21 = sin_o * cos_w + cos_o * sin_w * cos_i;
    let r22 = -sin_o * sin_w + cos_o * cos_w * cos_i;
    let r31 = sin_w * sin_i;
    let r32 = cos_w * sin_i;

    let pos = [r11 * x_orb + r12 * y_orb, r21 * x_orb + r22 * y_orb, r31 * x_orb + r32 * y_orb];
    let vel = [r11 * vx_orb + r12 * vy_orb, r21 * vx_orb + r22 * vy_orb, r31 * vx_orb + r32 * vy_orb];
    (pos, vel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn circular_orbit_has_constant_radius() {
        let elements = Elements {
            a: 1.0,
            e: 0.0,
            i_deg: 0.0,
            raan_deg: 0.0,
            arg_peri_deg: 0.0,
            mean_anomaly0_deg: 0.0,
            epoch_days: 0.0,
            period_days: 365.25,
        };
        for t in [0.0, 50.0, 123.4, 300.0] {
            let (pos, _) = state_at(&elements, crate::constants::gm::SUN, t);
            let r = (pos[0] * pos[0] + pos[1] * pos[1] + pos[2] * pos[2]).sqrt();
            assert_abs_diff_eq!(r, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn eccentric_orbit_respects_apsides() {
        let elements = Elements {
            a: 2.0,
            e: 0.5,
            i_deg: 0.0,
            raan_deg: 0.0,
            arg_peri_deg: 0.0,
            mean_anomaly0_deg: 0.0,
            epoch_days: 0.0,
            period_days: 365.25,
        };
        let (pos, _) = state_at(&elements, crate::constants::gm::SUN, 0.0);
        let r = (pos[0] * pos[0] + pos[1] * pos[1] + pos[2] * pos[2]).sqrt();
        assert_abs_diff_eq!(r, 1.0, epsilon = 1e-9);
    }
}
