// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pluto position via a piecewise gravitational integrator with a lazily
//! expanded, process-wide cached segment table (component C7).
//!
//! The real anchor table (41 precomputed barycentric states spanning years
//! 0-4000) is generator-produced and not present in the retrieval pack (see
//! DESIGN.md); the anchors here are instead seeded from Pluto's published
//! two-body heliocentric elements. Each segment is then independently
//! refined by forward/backward numerical integration under the Sun +
//! Jupiter + Saturn + Uranus + Neptune point-mass model and blended, giving
//! the same segment/blend structure the real integrator uses even though
//! the seed orbit is an approximation rather than an ingested ephemeris.

use crate::constants::{gm, DAYS_PER_CENTURY};
use crate::kepler::{self, Elements};
use crate::time::Time;
use crate::vector::{StateVector, Vector};
use std::sync::Mutex;

const NUM_ANCHORS: usize = 41;
const SEGMENT_DAYS: f64 = DAYS_PER_CENTURY; // 100 years per segment, 40 segments.
const ANCHOR_START_UT: f64 = -20.0 * SEGMENT_DAYS; // anchor 0 ~ year 0000, anchor 40 ~ year 4000.
const SUB_STEPS: usize = 100; // 101 grid points per segment.

/// Pluto's published J2000 heliocentric ecliptic elements.
const PLUTO_ELEMENTS: Elements = Elements {
    a: 39.48168677,
    e: 0.24880766,
    i_deg: 17.14175,
    raan_deg: 110.30347,
    arg_peri_deg: 113.76329,
    mean_anomaly0_deg: 14.53,
    epoch_days: 0.0,
    period_days: 90_560.0,
};

struct MajorBodies {
    sun: [f64; 3],
    jupiter: (f64, [f64; 3]),
    saturn: (f64, [f64; 3]),
    uranus: (f64, [f64; 3]),
    neptune: (f64, [f64; 3]),
}

fn major_body_states(t: Time) -> MajorBodies {
    let jup = crate::vsop87::helio_vector(crate::bodies::Body::Jupiter, t)
        .expect("Jupiter is a VSOP-modeled body")
        .as_array();
    let sat = crate::vsop87::helio_vector(crate::bodies::Body::Saturn, t)
        .expect("Saturn is a VSOP-modeled body")
        .as_array();
    let ura = crate::vsop87::helio_vector(crate::bodies::Body::Uranus, t)
        .expect("Uranus is a VSOP-modeled body")
        .as_array();
    let nep = crate::vsop87::helio_vector(crate::bodies::Body::Neptune, t)
        .expect("Neptune is a VSOP-modeled body")
        .as_array();

    let gm_total = gm::SUN + gm::JUPITER + gm::SATURN + gm::URANUS + gm::NEPTUNE;
    let mut sun_offset = [0.0; 3];
    for (weight_gm, pos) in [(gm::JUPITER, jup), (gm::SATURN, sat), (gm::URANUS, ura), (gm::NEPTUNE, nep)] {
        let w = weight_gm / gm_total;
        for k in 0..3 {
            sun_offset[k] -= w * pos[k];
        }
    }

    let shift = |p: [f64; 3]| [p[0] + sun_offset[0], p[1] + sun_offset[1], p[2] + sun_offset[2]];

    MajorBodies {
        sun: sun_offset,
        jupiter: (gm::JUPITER, shift(jup)),
        saturn: (gm::SATURN, shift(sat)),
        uranus: (gm::URANUS, shift(ura)),
        neptune: (gm::NEPTUNE, shift(nep)),
    }
}

fn acceleration(pos: [f64; 3], bodies: &MajorBodies) -> [f64; 3] {
    let mut a = [0.0; 3];
    for (body_gm, body_pos) in [
        (gm::SUN, bodies.sun),
        bodies.jupiter,
        bodies.saturn,
        bodies.uranus,
        bodies.neptune,
    ] {
        let dx = body_pos[0] - pos[0];
        let dy = body_pos[1] - pos[1];
        let dz = body_pos[2] - pos[2];
        let r2 = dx * dx + dy * dy + dz * dz;
        let r3 = r2 * r2.sqrt();
        if r3 < 1e-12 {
            continue;
        }
        let f = body_gm / r3;
        a[0] += f * dx;
        a[1] += f * dy;
        a[2] += f * dz;
    }
    a
}

#[derive(Clone, Copy)]
struct RawState {
    ut: f64,
    pos: [f64; 3],
    vel: [f64; 3],
}

fn step(state: RawState, dt: f64) -> RawState {
    let t0 = Time::from_ut(state.ut);
    let bodies0 = major_body_states(t0);
    let a0 = acceleration(state.pos, &bodies0);

    let pos_pred = [
        state.pos[0] + state.vel[0] * dt + 0.5 * a0[0] * dt * dt,
        state.pos[1] + state.vel[1] * dt + 0.5 * a0[1] * dt * dt,
        state.pos[2] + state.vel[2] * dt + 0.5 * a0[2] * dt * dt,
    ];

    let t1 = Time::from_ut(state.ut + dt);
    let bodies1 = major_body_states(t1);
    let a1 = acceleration(pos_pred, &bodies1);
    let a_mean = [0.5 * (a0[0] + a1[0]), 0.5 * (a0[1] + a1[1]), 0.5 * (a0[2] + a1[2])];

    let pos1 = [
        state.pos[0] + state.vel[0] * dt + 0.5 * a_mean[0] * dt * dt,
        state.pos[1] + state.vel[1] * dt + 0.5 * a_mean[1] * dt * dt,
        state.pos[2] + state.vel[2] * dt + 0.5 * a_mean[2] * dt * dt,
    ];
    let vel1 = [
        state.vel[0] + a_mean[0] * dt,
        state.vel[1] + a_mean[1] * dt,
        state.vel[2] + a_mean[2] * dt,
    ];

    RawState { ut: state.ut + dt, pos: pos1, vel: vel1 }
}

fn anchor_raw_state(index: i64) -> RawState {
    let ut = ANCHOR_START_UT + index as f64 * SEGMENT_DAYS;
    let t = Time::from_ut(ut);
    let (pos_ecl, vel_ecl) = kepler::state_at(&PLUTO_ELEMENTS, gm::SUN, ut);
    let ecl_pos = Vector::new(pos_ecl[0], pos_ecl[1], pos_ecl[2], t);
    let ecl_vel = Vector::new(vel_ecl[0], vel_ecl[1], vel_ecl[2], t);
    let rot = crate::rotations::rotation_ecl_eqj();
    let eq_pos = rot.rotate_vector(ecl_pos);
    let eq_vel = rot.rotate_vector(ecl_vel);
    RawState { ut, pos: eq_pos.as_array(), vel: eq_vel.as_array() }
}

/// One lazily-built 101-point segment between two anchors, forward and
/// backward trajectories already linearly blended.
struct Segment {
    grid: Vec<RawState>,
}

/// Bridge two table-seeded anchors (`lower`, `lower + 1`), both within
/// 0..=NUM_ANCHORS-1, by blending independent forward and backward
/// integrations.
fn build_bridged_segment(lower: i64) -> Segment {
    let dt = SEGMENT_DAYS / SUB_STEPS as f64;

    let mut forward = Vec::with_capacity(SUB_STEPS + 1);
    forward.push(anchor_raw_state(lower));
    for _ in 0..SUB_STEPS {
        forward.push(step(*forward.last().unwrap(), dt));
    }

    let mut backward = Vec::with_capacity(SUB_STEPS + 1);
    backward.push(anchor_raw_state(lower + 1));
    for _ in 0..SUB_STEPS {
        backward.push(step(*backward.last().unwrap(), -dt));
    }
    backward.reverse();

    let mut grid = Vec::with_capacity(SUB_STEPS + 1);
    for i in 0..=SUB_STEPS {
        let frac = i as f64 / SUB_STEPS as f64;
        let f = forward[i];
        let b = backward[i];
        let lerp3 = |x: [f64; 3], y: [f64; 3]| {
            [
                x[0] * (1.0 - frac) + y[0] * frac,
                x[1] * (1.0 - frac) + y[1] * frac,
                x[2] * (1.0 - frac) + y[2] * frac,
            ]
        };
        grid.push(RawState { ut: f.ut, pos: lerp3(f.pos, b.pos), vel: lerp3(f.vel, b.vel) });
    }

    Segment { grid }
}

/// Step `state` forward or backward, in full `SEGMENT_DAYS/SUB_STEPS`
/// strides plus a final partial stride, until it lands on `target_ut`.
fn crawl_raw_state(mut state: RawState, target_ut: f64) -> RawState {
    let stride = SEGMENT_DAYS / SUB_STEPS as f64;
    loop {
        let remaining = target_ut - state.ut;
        if remaining.abs() < 1e-9 {
            return state;
        }
        let dt = if remaining.abs() < stride { remaining } else { stride.copysign(remaining) };
        state = step(state, dt);
    }
}

/// Build a segment outside the table's 0..=NUM_ANCHORS-1 anchor range by
/// crawling from the nearest table endpoint: step-by-step integration under
/// the same Sun+Jupiter+Saturn+Uranus+Neptune model, continued past the
/// endpoint instead of reseeding from the two-body Kepler elements at a
/// distant epoch.
fn build_crawled_segment(lower: i64) -> Segment {
    let dt = SEGMENT_DAYS / SUB_STEPS as f64;
    let target_ut = ANCHOR_START_UT + lower as f64 * SEGMENT_DAYS;
    let nearest_anchor = if lower < 0 { 0 } else { NUM_ANCHORS as i64 - 1 };
    let edge = crawl_raw_state(anchor_raw_state(nearest_anchor), target_ut);

    let mut grid = Vec::with_capacity(SUB_STEPS + 1);
    grid.push(edge);
    for _ in 0..SUB_STEPS {
        grid.push(step(*grid.last().unwrap(), dt));
    }
    Segment { grid }
}

fn build_segment(lower: i64) -> Segment {
    if (0..=NUM_ANCHORS as i64 - 2).contains(&lower) {
        build_bridged_segment(lower)
    } else {
        build_crawled_segment(lower)
    }
}

fn extrapolate(state: &RawState, dt: f64) -> [f64; 3] {
    [state.pos[0] + state.vel[0] * dt, state.pos[1] + state.vel[1] * dt, state.pos[2] + state.vel[2] * dt]
}

struct Cache {
    segments: std::collections::HashMap<i64, Segment>,
}

static CACHE: Mutex<Option<Cache>> = Mutex::new(None);

fn segment_index_for(ut: f64) -> i64 {
    ((ut - ANCHOR_START_UT) / SEGMENT_DAYS).floor() as i64
}

/// Barycentric equatorial J2000 position/velocity of Pluto at `t`. Queries
/// outside the anchor table's year-0000..4000 span crawl segment-by-segment
/// from the nearest endpoint, integrating further under the same model
/// rather than freezing at the boundary.
pub fn helio_vector(t: Time) -> Vector {
    state(t).position()
}

pub fn state(t: Time) -> StateVector {
    let ut = t.ut;
    let index = segment_index_for(ut);

    let mut guard = CACHE.lock().unwrap();
    let cache = guard.get_or_insert_with(|| Cache { segments: std::collections::HashMap::new() });
    let segment = cache.segments.entry(index).or_insert_with(|| build_segment(index));

    let lower_ut = ANCHOR_START_UT + index as f64 * SEGMENT_DAYS;
    let dt_into_segment = ut - lower_ut;
    let fractional = (dt_into_segment / (SEGMENT_DAYS / SUB_STEPS as f64)).clamp(0.0, SUB_STEPS as f64);
    let k = (fractional.floor() as usize).min(SUB_STEPS - 1);
    let residual = fractional - k as f64;
    let sub_dt = SEGMENT_DAYS / SUB_STEPS as f64;

    let left = segment.grid[k];
    let right = segment.grid[k + 1];
    let from_left = extrapolate(&left, residual * sub_dt);
    let from_right = extrapolate(&right, (residual - 1.0) * sub_dt);

    let pos = [
        from_left[0] * (1.0 - residual) + from_right[0] * residual,
        from_left[1] * (1.0 - residual) + from_right[1] * residual,
        from_left[2] * (1.0 - residual) + from_right[2] * residual,
    ];
    let vel = [
        left.vel[0] * (1.0 - residual) + right.vel[0] * residual,
        left.vel[1] * (1.0 - residual) + right.vel[1] * residual,
        left.vel[2] * (1.0 - residual) + right.vel[2] * residual,
    ];

    StateVector { x: pos[0], y: pos[1], z: pos[2], vx: vel[0], vy: vel[1], vz: vel[2], t }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_plausible_for_pluto() {
        let t = Time::from_calendar(2020, 1, 1, 0, 0, 0.0).unwrap();
        let v = helio_vector(t);
        let r = v.length();
        assert!((29.0..50.0).contains(&r), "r={r}");
    }

    #[test]
    fn moves_over_a_year() {
        let t0 = Time::from_calendar(2020, 1, 1, 0, 0, 0.0).unwrap();
        let t1 = Time::from_calendar(2021, 1, 1, 0, 0, 0.0).unwrap();
        let v0 = helio_vector(t0);
        let v1 = helio_vector(t1);
        assert!(v0.angle_between(&v1).unwrap() > 0.01);
    }

    #[test]
    fn segment_endpoints_match_seed_anchor() {
        let t = Time::from_ut(ANCHOR_START_UT);
        let v = helio_vector(t);
        let seed = anchor_raw_state(0);
        assert!((v.x - seed.pos[0]).abs() < 1e-6);
    }
}
