// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Event-search predicates built on [`crate::search`] (component C12):
//! phases, quarters, apsides, elongation, rise/set, seasons, illumination,
//! eclipses, transits, and libration.

use crate::bodies::Body;
use crate::constants::{
    DEG2RAD, EARTH_ECLIPSE_RADIUS_KM, EARTH_EQUATORIAL_RADIUS_KM, EARTH_FLATTENING, EARTH_MEAN_RADIUS_KM,
    KM_PER_AU, MEAN_SYNODIC_MONTH_DAYS, MOON_MEAN_RADIUS_KM, RAD2DEG, SUN_RADIUS_KM,
};
use crate::earth_rotation::{greenwich_apparent_sidereal_time, Observer};
use crate::error::AstroError;
use crate::observer_frame::{equator, horizon, Refraction};
use crate::rotations::{rotation_eqj_ecl, rotation_eqj_eqd};
use crate::search::search;
use crate::time::Time;
use crate::vector::{Spherical, Vector};
use crate::{aggregator, moon};

fn ecliptic_longitude(body: Body, t: Time) -> Result<f64, AstroError> {
    let geo = aggregator::geo_vector(body, t, true)?;
    let ecl = rotation_eqj_ecl().rotate_vector(geo);
    Ok(crate::misc::normalize_degrees(Spherical::from_vector(ecl).lon))
}

fn pair_longitude(body1: Body, body2: Body, t: Time) -> Result<f64, AstroError> {
    let lon1 = ecliptic_longitude(body1, t)?;
    let lon2 = ecliptic_longitude(body2, t)?;
    Ok(crate::misc::normalize_degrees(lon1 - lon2))
}

/// Apparent geocentric ecliptic longitude of the Sun, degrees.
pub fn sun_ecliptic_longitude(t: Time) -> Result<f64, AstroError> {
    ecliptic_longitude(Body::Sun, t)
}

/// Search for the next time the Sun's apparent ecliptic longitude crosses
/// `target_deg`, within `limit_days` of `start`.
pub fn search_sun_longitude(target_deg: f64, start: Time, limit_days: f64) -> Result<Option<Time>, AstroError> {
    let t1 = start;
    let t2 = Time::from_ut(start.ut + limit_days);
    search(
        |t| {
            let lon = sun_ecliptic_longitude(t).unwrap_or(target_deg);
            crate::misc::longitude_offset(lon - target_deg)
        },
        t1,
        t2,
        1.0,
    )
}

/// The Moon's phase angle relative to the Sun: 0 = new, 90 = first quarter,
/// 180 = full, 270 = last quarter.
pub fn moon_phase(t: Time) -> Result<f64, AstroError> {
    pair_longitude(Body::Moon, Body::Sun, t)
}

/// Search for the next time the Moon's phase crosses `target_deg`.
pub fn search_moon_phase(target_deg: f64, start: Time, limit_days: f64) -> Result<Option<Time>, AstroError> {
    let current = moon_phase(start)?;
    let ya = crate::misc::longitude_offset(current - target_deg);
    let estimated_days = -(MEAN_SYNODIC_MONTH_DAYS * ya) / 360.0;
    if estimated_days > limit_days {
        return Ok(None);
    }
    let center = Time::from_ut(start.ut + estimated_days);
    let t1 = Time::from_ut(center.ut - 1.5);
    let t2 = Time::from_ut(center.ut + 1.5);
    search(
        |t| {
            let phase = moon_phase(t).unwrap_or(target_deg);
            crate::misc::longitude_offset(phase - target_deg)
        },
        t1,
        t2,
        1.0,
    )
}

/// A 0-3 quarter index (new, first quarter, full, last quarter) at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoonQuarter {
    pub quarter: u8,
    pub time: Time,
}

pub fn search_moon_quarter(start: Time) -> Result<Option<MoonQuarter>, AstroError> {
    let phase = moon_phase(start)?;
    let current_quarter = (phase / 90.0).floor() as i64;
    let target_quarter = ((current_quarter + 1).rem_euclid(4)) as u8;
    let target_deg = 90.0 * (target_quarter as f64);
    let time = search_moon_phase(target_deg, start, 10.0)?;
    Ok(time.map(|time| MoonQuarter { quarter: target_quarter, time }))
}

pub fn next_moon_quarter(prev: MoonQuarter) -> Result<Option<MoonQuarter>, AstroError> {
    let start = Time::from_ut(prev.time.ut + 6.0);
    let next = search_moon_quarter(start)?;
    if let Some(n) = next {
        debug_assert_eq!((n.quarter as i64 - prev.quarter as i64).rem_euclid(4), 1);
    }
    Ok(next)
}

/// Search for the time `body`'s ecliptic longitude relative to Earth equals
/// `target_deg`, stepping by the body's synodic period.
pub fn search_relative_longitude(body: Body, target_deg: f64, start: Time) -> Result<Option<Time>, AstroError> {
    let synodic = body.synodic_period_days().ok_or(AstroError::InvalidBody {
        function: "search_relative_longitude",
        body,
    })?;

    let mut t = start;
    for _ in 0..50 {
        let current = pair_longitude(body, Body::Sun, t)?;
        let offset = crate::misc::longitude_offset(current - target_deg);
        if offset.abs() * 86400.0 < 1.0 {
            return Ok(Some(t));
        }
        let mut day_adjust = -synodic * offset / 360.0;
        if matches!(body, Body::Mercury | Body::Mars) && offset.abs() < 30.0 {
            day_adjust *= 0.5;
        }
        t = Time::from_ut(t.ut + day_adjust);
        if day_adjust.abs() * 86400.0 < 1.0 {
            return Ok(Some(t));
        }
    }
    Err(AstroError::NoConverge { function: "search_relative_longitude" })
}

/// Whether an elongation event is seen before sunrise (Morning) or after
/// sunset (Evening).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Morning,
    Evening,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElongationEvent {
    pub time: Time,
    pub visibility: Visibility,
    pub elongation_deg: f64,
}

fn elongation_at(body: Body, t: Time) -> Result<f64, AstroError> {
    let eq_body = equator(body, t, None, false, true)?;
    let eq_sun = equator(Body::Sun, t, None, false, true)?;
    eq_body.vector.angle_between(&eq_sun.vector)
}

/// Search for the next maximum-elongation event of Mercury or Venus.
pub fn search_max_elongation(body: Body, start: Time) -> Result<Option<ElongationEvent>, AstroError> {
    let (s1, s2) = match body {
        Body::Mercury => (50.0, 85.0),
        Body::Venus => (40.0, 50.0),
        _ => return Err(AstroError::InvalidBody { function: "search_max_elongation", body }),
    };

    for _ in 0..2 {
        let t1 = search_relative_longitude(body, s1, start)?;
        let t2 = search_relative_longitude(body, s2, start)?;
        let (t1, t2) = match (t1, t2) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };
        let (lo, hi) = if t1.tt < t2.tt { (t1, t2) } else { (t2, t1) };

        let dt = 0.01;
        let slope = |t: Time| -> f64 {
            let a = elongation_at(body, Time::from_ut(t.ut - dt)).unwrap_or(0.0);
            let b = elongation_at(body, Time::from_ut(t.ut + dt)).unwrap_or(0.0);
            -(b - a) / (2.0 * dt)
        };
        if let Some(time) = search(slope, lo, hi, 10.0)? {
            let elongation_deg = elongation_at(body, time)?;
            let rel_lon = pair_longitude(body, Body::Sun, time)?;
            let visibility = if rel_lon < 180.0 { Visibility::Evening } else { Visibility::Morning };
            return Ok(Some(ElongationEvent { time, visibility, elongation_deg }));
        }
    }
    Ok(None)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApsisKind {
    Pericenter,
    Apocenter,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Apsis {
    pub time: Time,
    pub kind: ApsisKind,
    pub distance_au: f64,
}

fn distance_fn(body: Body, t: Time) -> f64 {
    if body == Body::Moon {
        moon::geo_vector(t).length()
    } else {
        aggregator::helio_vector(body, t).map(|v| v.length()).unwrap_or(f64::NAN)
    }
}

fn slope_sign_search(body: Body, t1: Time, t2: Time) -> Result<Option<(Time, ApsisKind)>, AstroError> {
    let dt = 0.001;
    let slope = |t: Time| -> f64 {
        let a = distance_fn(body, Time::from_ut(t.ut - dt));
        let b = distance_fn(body, Time::from_ut(t.ut + dt));
        b - a
    };
    if let Some(time) = search(slope, t1, t2, 60.0)? {
        let before = distance_fn(body, Time::from_ut(time.ut - 1.0));
        let after = distance_fn(body, Time::from_ut(time.ut + 1.0));
        let kind = if after > before { ApsisKind::Pericenter } else { ApsisKind::Apocenter };
        return Ok(Some((time, kind)));
    }
    Ok(None)
}

/// Search for the next lunar apsis (perigee or apogee) after `start`.
pub fn search_lunar_apsis(start: Time) -> Result<Apsis, AstroError> {
    let step_days = MEAN_SYNODIC_MONTH_DAYS / 6.0;
    let mut t1 = start;
    for _ in 0..20 {
        let t2 = Time::from_ut(t1.ut + step_days);
        if let Some((time, kind)) = slope_sign_search(Body::Moon, t1, t2)? {
            let distance_au = distance_fn(Body::Moon, time);
            return Ok(Apsis { time, kind, distance_au });
        }
        t1 = t2;
    }
    Err(AstroError::NoConverge { function: "search_lunar_apsis" })
}

pub fn next_lunar_apsis(prev: Apsis) -> Result<Apsis, AstroError> {
    search_lunar_apsis(Time::from_ut(prev.time.ut + MEAN_SYNODIC_MONTH_DAYS / 4.0))
}

/// Search for the next planetary apsis (perihelion or aphelion).
///
/// Neptune and Pluto orbit too slowly for a slope-sign bracket at a small
/// step to reliably land on one cycle, so they're swept coarsely first: 100
/// samples across 300 degrees of orbital arc centered 30 degrees behind
/// `start`, before refining the bracketing pair.
pub fn search_planet_apsis(body: Body, start: Time) -> Result<Apsis, AstroError> {
    if matches!(body, Body::Neptune | Body::Pluto) {
        return search_planet_apsis_coarse(body, start);
    }
    let period_days = match body {
        Body::Mercury => 87.97,
        Body::Venus => 224.70,
        Body::Earth => 365.26,
        Body::Mars => 686.98,
        Body::Jupiter => 4332.6,
        Body::Saturn => 10759.2,
        Body::Uranus => 30688.5,
        _ => return Err(AstroError::InvalidBody { function: "search_planet_apsis", body }),
    };
    let step_days = period_days / 6.0;
    let mut t1 = start;
    for _ in 0..8 {
        let t2 = Time::from_ut(t1.ut + step_days);
        if let Some((time, kind)) = slope_sign_search(body, t1, t2)? {
            let distance_au = distance_fn(body, time);
            return Ok(Apsis { time, kind, distance_au });
        }
        t1 = t2;
    }
    Err(AstroError::NoConverge { function: "search_planet_apsis" })
}

fn search_planet_apsis_coarse(body: Body, start: Time) -> Result<Apsis, AstroError> {
    let orbital_period_days = if body == Body::Pluto { 90_560.0 } else { 60_182.0 };
    let span_days = orbital_period_days * 300.0 / 360.0;
    let sample_start = Time::from_ut(start.ut - orbital_period_days * 30.0 / 360.0);
    let step = span_days / 100.0;

    let mut best_min = (distance_fn(body, sample_start), sample_start);
    let mut best_max = best_min;
    for i in 1..=100 {
        let t = Time::from_ut(sample_start.ut + step * i as f64);
        let d = distance_fn(body, t);
        if d < best_min.0 {
            best_min = (d, t);
        }
        if d > best_max.0 {
            best_max = (d, t);
        }
    }

    let (extreme_time, kind) = if best_min.1.ut < best_max.1.ut {
        (best_min.1, ApsisKind::Pericenter)
    } else {
        (best_max.1, ApsisKind::Apocenter)
    };
    let t1 = Time::from_ut(extreme_time.ut - step);
    let t2 = Time::from_ut(extreme_time.ut + step);
    if let Some((time, kind)) = slope_sign_search(body, t1, t2)? {
        let distance_au = distance_fn(body, time);
        return Ok(Apsis { time, kind, distance_au });
    }
    Ok(Apsis { time: extreme_time, kind, distance_au: distance_fn(body, extreme_time) })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeasonInfo {
    pub mar_equinox: Time,
    pub jun_solstice: Time,
    pub sep_equinox: Time,
    pub dec_solstice: Time,
}

/// The four seasonal markers for `year`, anchored to the months each
/// reliably falls in.
pub fn seasons(year: i32) -> Result<SeasonInfo, AstroError> {
    let find = |month: u32, day: u32, target_deg: f64| -> Result<Time, AstroError> {
        let anchor = Time::from_calendar(year, month, day, 0, 0, 0.0)
            .map_err(|_| AstroError::Internal { function: "seasons", reason: "bad calendar anchor".into() })?;
        let start = Time::from_ut(anchor.ut - 2.0);
        search_sun_longitude(target_deg, start, 4.0)?
            .ok_or(AstroError::NoConverge { function: "seasons" })
    };
    Ok(SeasonInfo {
        mar_equinox: find(3, 19, 0.0)?,
        jun_solstice: find(6, 19, 90.0)?,
        sep_equinox: find(9, 21, 180.0)?,
        dec_solstice: find(12, 20, 270.0)?,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HourAngleDirection {
    Rise,
    Set,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HourAngleEvent {
    pub time: Time,
    pub altitude_deg: f64,
}

fn body_radius_deg(body: Body, dist_au: f64) -> f64 {
    let radius_km = match body {
        Body::Sun => crate::constants::SUN_RADIUS_KM,
        Body::Moon => crate::constants::MOON_MEAN_RADIUS_KM,
        _ => 0.0,
    };
    if dist_au <= 0.0 {
        return 0.0;
    }
    (radius_km / crate::constants::KM_PER_AU / dist_au).asin() * RAD2DEG
}

fn altitude_error(body: Body, observer: Observer, t: Time, direction: f64) -> Result<f64, AstroError> {
    let eq = equator(body, t, Some(observer), true, true)?;
    let hz = horizon(eq.vector, observer, t, Refraction::Normal);
    let refraction_arcmin = 34.0 / 60.0;
    let radius = body_radius_deg(body, eq.dist);
    Ok(direction * (hz.altitude - (-refraction_arcmin - radius)))
}

/// Search for the next rise (`direction = Rise`) or set (`Set`) of `body`
/// seen by `observer`.
pub fn search_rise_set(
    body: Body,
    observer: Observer,
    direction: HourAngleDirection,
    start: Time,
    limit_days: f64,
) -> Result<Option<Time>, AstroError> {
    let sign = match direction {
        HourAngleDirection::Rise => 1.0,
        HourAngleDirection::Set => -1.0,
    };
    let t1 = start;
    let t2 = Time::from_ut(start.ut + limit_days);
    search(
        |t| altitude_error(body, observer, t, sign).unwrap_or(-1.0),
        t1,
        t2,
        1.0,
    )
}

/// Search for the next time `body`'s altitude seen by `observer` crosses
/// `target_altitude_deg`, ascending if `direction` is `Rise`.
pub fn search_altitude(
    body: Body,
    observer: Observer,
    direction: HourAngleDirection,
    target_altitude_deg: f64,
    start: Time,
    limit_days: f64,
) -> Result<Option<Time>, AstroError> {
    let sign = match direction {
        HourAngleDirection::Rise => 1.0,
        HourAngleDirection::Set => -1.0,
    };
    let t1 = start;
    let t2 = Time::from_ut(start.ut + limit_days);
    search(
        |t| {
            let eq = equator(body, t, Some(observer), true, true).ok();
            let altitude = eq
                .map(|eq| horizon(eq.vector, observer, t, Refraction::Normal).altitude)
                .unwrap_or(-90.0);
            sign * (altitude - target_altitude_deg)
        },
        t1,
        t2,
        1.0,
    )
}

/// Newton-step hour-angle search: find the next time `body` is at hour
/// angle `target_hours` (0 = upper culmination, 12 = lower), seen by
/// `observer`.
pub fn search_hour_angle(
    body: Body,
    observer: Observer,
    target_hours: f64,
    start: Time,
) -> Result<HourAngleEvent, AstroError> {
    let mut t = start;
    for _ in 0..20 {
        let eq = equator(body, t, Some(observer), true, true)?;
        let gast = greenwich_apparent_sidereal_time(t) * RAD2DEG / 15.0;
        let mut hour_angle = (gast + observer.longitude_deg / 15.0 - eq.ra).rem_euclid(24.0);
        hour_angle -= target_hours;
        if hour_angle > 12.0 {
            hour_angle -= 24.0;
        }
        if hour_angle < -12.0 {
            hour_angle += 24.0;
        }
        let delta_sidereal_seconds = hour_angle * 3600.0;
        if delta_sidereal_seconds.abs() < 0.1 {
            let hz = horizon(eq.vector, observer, t, Refraction::Normal);
            return Ok(HourAngleEvent { time: t, altitude_deg: hz.altitude });
        }
        // Sidereal time runs about 1.0027x faster than solar time.
        t = Time::from_ut(t.ut - hour_angle / 24.0 / 1.0027379);
    }
    Err(AstroError::NoConverge { function: "search_hour_angle" })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IlluminationInfo {
    pub time: Time,
    pub phase_angle_deg: f64,
    pub phase_fraction: f64,
    pub helio_dist_au: f64,
    pub geo_dist_au: f64,
    /// Simplified relative-brightness figure, not a calibrated visual
    /// magnitude: the per-body empirical magnitude tables are out of scope.
    pub relative_brightness: f64,
}

/// Phase geometry and a simplified brightness figure for `body` at `t`.
pub fn illumination(body: Body, t: Time) -> Result<IlluminationInfo, AstroError> {
    let geo = aggregator::geo_vector(body, t, true)?;
    let geo_dist_au = geo.length();
    let helio = aggregator::helio_vector(body, t)?;
    let helio_dist_au = helio.length();
    let sun_geo = aggregator::geo_vector(Body::Sun, t, true)?;
    let phase_angle_deg = geo.angle_between(&(sun_geo - geo))?;
    let phase_fraction = (1.0 + (phase_angle_deg * crate::constants::DEG2RAD).cos()) / 2.0;
    let relative_brightness = phase_fraction / (helio_dist_au * helio_dist_au * geo_dist_au * geo_dist_au).max(1e-9);
    Ok(IlluminationInfo { time: t, phase_angle_deg, phase_fraction, helio_dist_au, geo_dist_au, relative_brightness })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LibrationInfo {
    pub elat_deg: f64,
    pub elon_deg: f64,
    pub mlat_deg: f64,
    pub mlon_deg: f64,
    pub dist_km: f64,
    pub diam_deg: f64,
}

/// Lunar libration: the Moon's true ecliptic lat/lon versus its mean
/// (librated) lat/lon as seen from Earth's center.
///
/// `mlat`/`mlon` are the Moon's instantaneous geocentric ecliptic
/// coordinates; `elat`/`elon` are the sub-Earth libration angles, built from
/// the optical component (apparent wobble from the Moon's orbital
/// eccentricity and inclination to its own equator) plus an abbreviated
/// physical-libration correction (the small additional wobble from solar
/// and planetary torques on the Moon's real, non-spherical mass
/// distribution) using the leading term of the published Meeus series
/// rather than its full multi-term expansion (see DESIGN.md).
pub fn libration(t: Time) -> LibrationInfo {
    let (lon, lat, dist_au) = moon::geo_ecliptic(t);
    let mlon_deg = crate::misc::normalize_degrees(lon * RAD2DEG);
    let mlat_deg = lat * RAD2DEG;
    let dist_km = dist_au * KM_PER_AU;
    let diam_deg = 2.0 * (MOON_MEAN_RADIUS_KM / dist_km).asin() * RAD2DEG;

    let tt_centuries = t.tt / crate::constants::DAYS_PER_CENTURY;
    // Mean lunar inclination to the ecliptic (Meeus ch. 53).
    const INC_DEG: f64 = 1.54242;
    let f = (93.272_095 + 483_202.017_538 * tt_centuries).rem_euclid(360.0) * DEG2RAD;
    let omega = (125.044_555 - 1_934.136_185 * tt_centuries).rem_euclid(360.0) * DEG2RAD;

    // Optical libration in longitude/latitude: the angle between the
    // Moon's true orbital plane and its mean Earth-facing axis.
    let w = lon - omega as f64;
    let sin_i = INC_DEG.to_radians().sin();
    let cos_i = INC_DEG.to_radians().cos();
    let a = w.sin() * cos_i - (f - omega).sin() * 0.0;
    let optical_lon_deg = (-a).atan2(w.cos()) * RAD2DEG;
    let optical_lat_deg = (-(w.sin() * sin_i)).asin() * RAD2DEG;

    // Leading term of the physical libration in longitude (rho), arcminutes,
    // from the Moon's free libration driven by Earth's torque.
    let rho_deg = -0.02752 * f.cos();
    let sigma_deg = -0.02245 * f.sin();

    let elon_deg = optical_lon_deg + rho_deg;
    let elat_deg = optical_lat_deg + sigma_deg;

    LibrationInfo { elat_deg, elon_deg, mlat_deg, mlon_deg, dist_km, diam_deg }
}

/// `(u, r, k, p)` shadow-plane quantities (spec.md §4.12's lunar/solar
/// eclipse geometry): `u` is the fractional distance along the shadow axis
/// where `target` projects; `r` is the distance (km) from `target` to the
/// shadow axis; `k`/`p` are the umbra/penumbra radii (km) at that point.
#[derive(Clone, Copy, Debug)]
struct Shadow {
    time: Time,
    u: f64,
    r: f64,
    k: f64,
    p: f64,
    target: Vector,
    dir: Vector,
}

fn calc_shadow(body_radius_km: f64, time: Time, target: Vector, sdir: Vector) -> Shadow {
    let dir_len_sq = sdir.x * sdir.x + sdir.y * sdir.y + sdir.z * sdir.z;
    let u = (sdir.x * target.x + sdir.y * target.y + sdir.z * target.z) / dir_len_sq;
    let dx = u * sdir.x - target.x;
    let dy = u * sdir.y - target.y;
    let dz = u * sdir.z - target.z;
    let r = KM_PER_AU * (dx * dx + dy * dy + dz * dz).sqrt();
    let k = SUN_RADIUS_KM - (1.0 + u) * (SUN_RADIUS_KM - body_radius_km);
    let p = -SUN_RADIUS_KM + (1.0 + u) * (SUN_RADIUS_KM + body_radius_km);
    Shadow { time, u, r, k, p, target, dir: sdir }
}

fn earth_shadow(t: Time) -> Result<Shadow, AstroError> {
    let e = aggregator::helio_vector(Body::Earth, t)?;
    let m = moon::geo_vector(t);
    Ok(calc_shadow(EARTH_ECLIPSE_RADIUS_KM, t, m, e))
}

fn moon_shadow(t: Time) -> Result<Shadow, AstroError> {
    let h = aggregator::helio_vector(Body::Earth, t)?;
    let m = moon::geo_vector(t);
    let lunacentric_earth = Vector::new(-m.x, -m.y, -m.z, t);
    let helio_moon = Vector::new(m.x + h.x, m.y + h.y, m.z + h.z, t);
    Ok(calc_shadow(MOON_MEAN_RADIUS_KM, t, lunacentric_earth, helio_moon))
}

fn local_moon_shadow(t: Time, observer: Observer) -> Result<Shadow, AstroError> {
    let observer_vec = observer.vector(t)?;
    let h = aggregator::helio_vector(Body::Earth, t)?;
    let m = moon::geo_vector(t);
    let o = Vector::new(observer_vec.x - m.x, observer_vec.y - m.y, observer_vec.z - m.z, t);
    let helio_moon = Vector::new(m.x + h.x, m.y + h.y, m.z + h.z, t);
    Ok(calc_shadow(MOON_MEAN_RADIUS_KM, t, o, helio_moon))
}

fn planet_shadow(body: Body, planet_radius_km: f64, t: Time) -> Result<Shadow, AstroError> {
    let g = aggregator::geo_vector(body, t, false)?;
    let e = aggregator::geo_vector(Body::Sun, t, false)?;
    let p = Vector::new(g.x - e.x, g.y - e.y, g.z - e.z, t);
    let earth_from_planet = Vector::new(-g.x, -g.y, -g.z, t);
    Ok(calc_shadow(planet_radius_km, t, earth_from_planet, p))
}

fn shadow_distance_slope<F>(shadow_fn: &F, t: Time) -> f64
where
    F: Fn(Time) -> Result<Shadow, AstroError>,
{
    let dt = 1.0 / 86400.0;
    let r1 = shadow_fn(Time::from_ut(t.ut - dt)).map(|s| s.r).unwrap_or(0.0);
    let r2 = shadow_fn(Time::from_ut(t.ut + dt)).map(|s| s.r).unwrap_or(0.0);
    (r2 - r1) / dt
}

fn peak_shadow<F>(shadow_fn: F, search_center: Time, window_days: f64) -> Result<Shadow, AstroError>
where
    F: Fn(Time) -> Result<Shadow, AstroError>,
{
    let t1 = Time::from_ut(search_center.ut - window_days);
    let t2 = Time::from_ut(search_center.ut + window_days);
    let tx = search(|t| shadow_distance_slope(&shadow_fn, t), t1, t2, 1.0)?
        .ok_or(AstroError::NoConverge { function: "peak_shadow" })?;
    shadow_fn(tx)
}

fn shadow_semi_duration_minutes(center: Time, radius_limit: f64, window_minutes: f64) -> Result<f64, AstroError> {
    let window_days = window_minutes / (24.0 * 60.0);
    let before = Time::from_ut(center.ut - window_days);
    let after = Time::from_ut(center.ut + window_days);
    let t1 = search(|t| -(earth_shadow(t).map(|s| s.r).unwrap_or(radius_limit) - radius_limit), before, center, 1.0)?
        .ok_or(AstroError::NoConverge { function: "shadow_semi_duration_minutes" })?;
    let t2 = search(|t| earth_shadow(t).map(|s| s.r).unwrap_or(radius_limit) - radius_limit, center, after, 1.0)?
        .ok_or(AstroError::NoConverge { function: "shadow_semi_duration_minutes" })?;
    Ok((t2.ut - t1.ut) * (24.0 * 60.0 / 2.0))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EclipseKind {
    Penumbral,
    Partial,
    Annular,
    Total,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LunarEclipseInfo {
    pub kind: EclipseKind,
    pub peak: Time,
    pub sd_penum_minutes: f64,
    pub sd_partial_minutes: f64,
    pub sd_total_minutes: f64,
}

fn moon_ecliptic_latitude_deg(t: Time) -> f64 {
    let (_, lat, _) = moon::geo_ecliptic(t);
    lat * RAD2DEG
}

/// Search for the first lunar eclipse after `start`.
pub fn search_lunar_eclipse(start: Time) -> Result<LunarEclipseInfo, AstroError> {
    const PRUNE_LATITUDE_DEG: f64 = 1.8;
    let mut fmtime = start;
    for _ in 0..12 {
        let fullmoon = search_moon_phase(180.0, fmtime, 40.0)?
            .ok_or(AstroError::NoConverge { function: "search_lunar_eclipse" })?;

        if moon_ecliptic_latitude_deg(fullmoon).abs() < PRUNE_LATITUDE_DEG {
            let shadow = peak_shadow(earth_shadow, fullmoon, 0.03)?;
            if shadow.r < shadow.p + MOON_MEAN_RADIUS_KM {
                let mut kind = EclipseKind::Penumbral;
                let mut sd_total = 0.0;
                let mut sd_partial = 0.0;
                let sd_penum = shadow_semi_duration_minutes(shadow.time, shadow.p + MOON_MEAN_RADIUS_KM, 200.0)?;

                if shadow.r < shadow.k + MOON_MEAN_RADIUS_KM {
                    kind = EclipseKind::Partial;
                    sd_partial = shadow_semi_duration_minutes(shadow.time, shadow.k + MOON_MEAN_RADIUS_KM, sd_penum)?;

                    if shadow.r + MOON_MEAN_RADIUS_KM < shadow.k {
                        kind = EclipseKind::Total;
                        sd_total = shadow_semi_duration_minutes(shadow.time, shadow.k - MOON_MEAN_RADIUS_KM, sd_partial)?;
                    }
                }

                return Ok(LunarEclipseInfo {
                    kind,
                    peak: shadow.time,
                    sd_penum_minutes: sd_penum,
                    sd_partial_minutes: sd_partial,
                    sd_total_minutes: sd_total,
                });
            }
        }
        fmtime = Time::from_ut(fullmoon.ut + 10.0);
    }
    Err(AstroError::NoConverge { function: "search_lunar_eclipse" })
}

pub fn next_lunar_eclipse(prev_peak: Time) -> Result<LunarEclipseInfo, AstroError> {
    search_lunar_eclipse(Time::from_ut(prev_peak.ut + 10.0))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalSolarEclipseInfo {
    pub kind: EclipseKind,
    pub peak: Time,
    pub distance_km: f64,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

fn eclipse_kind_from_umbra(k: f64) -> EclipseKind {
    if k > 0.014 {
        EclipseKind::Total
    } else {
        EclipseKind::Annular
    }
}

/// Intersect the Moon's shadow axis with Earth's oblate geoid (dilating
/// z-coordinates by `1/flattening` so the geoid becomes a sphere), per
/// spec.md §4.12's global-solar-eclipse algorithm.
fn geoid_intersect(shadow: &Shadow) -> GlobalSolarEclipseInfo {
    let mut kind = EclipseKind::Partial;
    let mut latitude_deg = f64::NAN;
    let mut longitude_deg = f64::NAN;

    let rot = rotation_eqj_eqd(shadow.time);
    let v = rot.rotate_vector(shadow.dir);
    let e = rot.rotate_vector(shadow.target);

    let vx = v.x * KM_PER_AU;
    let vy = v.y * KM_PER_AU;
    let vz = v.z * KM_PER_AU / EARTH_FLATTENING;
    let ex = e.x * KM_PER_AU;
    let ey = e.y * KM_PER_AU;
    let ez = e.z * KM_PER_AU / EARTH_FLATTENING;

    let r = EARTH_EQUATORIAL_RADIUS_KM;
    let a = vx * vx + vy * vy + vz * vz;
    let b = -2.0 * (vx * ex + vy * ey + vz * ez);
    let c = ex * ex + ey * ey + ez * ez - r * r;
    let radic = b * b - 4.0 * a * c;

    if radic > 0.0 {
        let u = (-b - radic.sqrt()) / (2.0 * a);
        let px = u * vx - ex;
        let py = u * vy - ey;
        let pz = (u * vz - ez) * EARTH_FLATTENING;

        let proj = (px * px + py * py).sqrt() * (EARTH_FLATTENING * EARTH_FLATTENING);
        latitude_deg = if proj == 0.0 { if pz > 0.0 { 90.0 } else { -90.0 } } else { (pz / proj).atan() * RAD2DEG };

        let gast_deg = greenwich_apparent_sidereal_time(shadow.time) * RAD2DEG;
        longitude_deg = (py.atan2(px) * RAD2DEG - gast_deg) % 360.0;
        if longitude_deg <= -180.0 {
            longitude_deg += 360.0;
        } else if longitude_deg > 180.0 {
            longitude_deg -= 360.0;
        }

        let inv = rot.inverse();
        let o_eqd = Vector::new(px / KM_PER_AU, py / KM_PER_AU, pz / KM_PER_AU, shadow.time);
        let o_eqj = inv.rotate_vector(o_eqd);
        let o = Vector::new(o_eqj.x + shadow.target.x, o_eqj.y + shadow.target.y, o_eqj.z + shadow.target.z, shadow.time);

        const MOON_POLAR_RADIUS_KM: f64 = 1736.0;
        let surface = calc_shadow(MOON_POLAR_RADIUS_KM, shadow.time, o, shadow.dir);
        kind = eclipse_kind_from_umbra(surface.k);
    }

    GlobalSolarEclipseInfo { kind, peak: shadow.time, distance_km: shadow.r, latitude_deg, longitude_deg }
}

/// Search for the first solar eclipse visible anywhere on Earth after `start`.
pub fn search_global_solar_eclipse(start: Time) -> Result<GlobalSolarEclipseInfo, AstroError> {
    const PRUNE_LATITUDE_DEG: f64 = 1.8;
    let mut nmtime = start;
    for _ in 0..12 {
        let newmoon = search_moon_phase(0.0, nmtime, 40.0)?
            .ok_or(AstroError::NoConverge { function: "search_global_solar_eclipse" })?;

        if moon_ecliptic_latitude_deg(newmoon).abs() < PRUNE_LATITUDE_DEG {
            let shadow = peak_shadow(moon_shadow, newmoon, 0.03)?;
            if shadow.r < shadow.p + EARTH_MEAN_RADIUS_KM {
                return Ok(geoid_intersect(&shadow));
            }
        }
        nmtime = Time::from_ut(newmoon.ut + 10.0);
    }
    Err(AstroError::NoConverge { function: "search_global_solar_eclipse" })
}

pub fn next_global_solar_eclipse(prev_peak: Time) -> Result<GlobalSolarEclipseInfo, AstroError> {
    search_global_solar_eclipse(Time::from_ut(prev_peak.ut + 10.0))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EclipseEvent {
    pub time: Time,
    pub sun_altitude_deg: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalSolarEclipseInfo {
    pub kind: EclipseKind,
    pub partial_begin: EclipseEvent,
    pub total_begin: Option<EclipseEvent>,
    pub peak: EclipseEvent,
    pub total_end: Option<EclipseEvent>,
    pub partial_end: EclipseEvent,
}

fn calc_eclipse_event(observer: Observer, t: Time) -> Result<EclipseEvent, AstroError> {
    let eq = equator(Body::Sun, t, Some(observer), true, true)?;
    let hz = horizon(eq.vector, observer, t, Refraction::Normal);
    Ok(EclipseEvent { time: t, sun_altitude_deg: hz.altitude })
}

fn local_eclipse_transition(
    observer: Observer,
    direction: f64,
    metric: impl Fn(&Shadow) -> f64,
    t1: Time,
    t2: Time,
) -> Result<EclipseEvent, AstroError> {
    let tx = search(
        |t| direction * local_moon_shadow(t, observer).map(|s| metric(&s)).unwrap_or(0.0),
        t1,
        t2,
        1.0,
    )?
    .ok_or(AstroError::NoConverge { function: "local_eclipse_transition" })?;
    calc_eclipse_event(observer, tx)
}

fn local_eclipse(shadow: &Shadow, observer: Observer) -> Result<LocalSolarEclipseInfo, AstroError> {
    const PARTIAL_WINDOW: f64 = 0.2;
    const TOTAL_WINDOW: f64 = 0.01;

    let peak = calc_eclipse_event(observer, shadow.time)?;
    let t1 = Time::from_ut(shadow.time.ut - PARTIAL_WINDOW);
    let t2 = Time::from_ut(shadow.time.ut + PARTIAL_WINDOW);
    let partial_begin = local_eclipse_transition(observer, 1.0, |s| s.p - s.r, t1, shadow.time)?;
    let partial_end = local_eclipse_transition(observer, -1.0, |s| s.p - s.r, shadow.time, t2)?;

    let (total_begin, total_end, kind) = if shadow.r < shadow.k.abs() {
        let t1 = Time::from_ut(shadow.time.ut - TOTAL_WINDOW);
        let t2 = Time::from_ut(shadow.time.ut + TOTAL_WINDOW);
        let begin = local_eclipse_transition(observer, 1.0, |s| s.k.abs() - s.r, t1, shadow.time)?;
        let end = local_eclipse_transition(observer, -1.0, |s| s.k.abs() - s.r, shadow.time, t2)?;
        (Some(begin), Some(end), eclipse_kind_from_umbra(shadow.k))
    } else {
        (None, None, EclipseKind::Partial)
    };

    Ok(LocalSolarEclipseInfo { kind, partial_begin, total_begin, peak, total_end, partial_end })
}

/// Search for the first solar eclipse visible to `observer` after `start`.
///
/// Keeps stepping forward moon-by-moon until a visible eclipse is found; a
/// local eclipse (unlike a global one) has no fixed upper bound on how many
/// new moons away it might be, so there's no count here to cap.
pub fn search_local_solar_eclipse(start: Time, observer: Observer) -> Result<LocalSolarEclipseInfo, AstroError> {
    const PRUNE_LATITUDE_DEG: f64 = 1.8;
    let mut nmtime = start;
    loop {
        let newmoon = search_moon_phase(0.0, nmtime, 40.0)?
            .ok_or(AstroError::NoConverge { function: "search_local_solar_eclipse" })?;

        if moon_ecliptic_latitude_deg(newmoon).abs() < PRUNE_LATITUDE_DEG {
            let shadow = peak_shadow(|t| local_moon_shadow(t, observer), newmoon, 0.2)?;
            if shadow.r < shadow.p {
                let eclipse = local_eclipse(&shadow, observer)?;
                if eclipse.partial_begin.sun_altitude_deg > 0.0 || eclipse.partial_end.sun_altitude_deg > 0.0 {
                    return Ok(eclipse);
                }
            }
        }
        nmtime = Time::from_ut(newmoon.ut + 10.0);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitInfo {
    pub start: Time,
    pub peak: Time,
    pub finish: Time,
    pub separation_arcmin: f64,
}

fn angle_from_sun(body: Body, t: Time) -> Result<f64, AstroError> {
    let eq_body = equator(body, t, None, false, true)?;
    let eq_sun = equator(Body::Sun, t, None, false, true)?;
    eq_body.vector.angle_between(&eq_sun.vector)
}

fn planet_transit_boundary(body: Body, planet_radius_km: f64, t1: Time, t2: Time, direction: f64) -> Result<Time, AstroError> {
    search(
        |t| direction * planet_shadow(body, planet_radius_km, t).map(|s| s.r - s.p).unwrap_or(0.0),
        t1,
        t2,
        1.0,
    )?
    .ok_or(AstroError::NoConverge { function: "planet_transit_boundary" })
}

/// Search for the first transit of Mercury or Venus across the Sun's disc
/// after `start`.
pub fn search_transit(body: Body, start: Time) -> Result<TransitInfo, AstroError> {
    const THRESHOLD_ANGLE_DEG: f64 = 0.4;
    const DT_DAYS: f64 = 1.0;
    let planet_radius_km = match body {
        Body::Mercury => 2439.7,
        Body::Venus => 6051.8,
        _ => return Err(AstroError::InvalidBody { function: "search_transit", body }),
    };

    let mut search_time = start;
    for _ in 0..50 {
        let conj = search_relative_longitude(body, 0.0, search_time)?
            .ok_or(AstroError::NoConverge { function: "search_transit" })?;
        let conj_separation = angle_from_sun(body, conj)?;

        if conj_separation < THRESHOLD_ANGLE_DEG {
            let shadow = peak_shadow(|t| planet_shadow(body, planet_radius_km, t), conj, 1.0)?;
            if shadow.r < shadow.p {
                let time_before = Time::from_ut(shadow.time.ut - DT_DAYS);
                let start_t = planet_transit_boundary(body, planet_radius_km, time_before, shadow.time, -1.0)?;
                let time_after = Time::from_ut(shadow.time.ut + DT_DAYS);
                let finish_t = planet_transit_boundary(body, planet_radius_km, shadow.time, time_after, 1.0)?;
                let min_separation = 60.0 * angle_from_sun(body, shadow.time)?;
                return Ok(TransitInfo { start: start_t, peak: shadow.time, finish: finish_t, separation_arcmin: min_separation });
            }
        }
        search_time = Time::from_ut(conj.ut + 10.0);
    }
    Err(AstroError::NoConverge { function: "search_transit" })
}

pub fn next_transit(body: Body, prev_peak: Time) -> Result<TransitInfo, AstroError> {
    search_transit(body, Time::from_ut(prev_peak.ut + 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moon_phase_is_in_range() {
        let t = Time::from_calendar(2024, 1, 1, 0, 0, 0.0).unwrap();
        let phase = moon_phase(t).unwrap();
        assert!((0.0..360.0).contains(&phase));
    }

    #[test]
    fn search_moon_phase_finds_full_moon_near_target() {
        let start = Time::from_calendar(2024, 1, 1, 0, 0, 0.0).unwrap();
        let full = search_moon_phase(180.0, start, 40.0).unwrap().unwrap();
        let phase = moon_phase(full).unwrap();
        assert!(phase < 1.0 || phase > 359.0, "phase={phase}");
    }

    #[test]
    fn seasons_are_ordered_within_year() {
        let info = seasons(2024).unwrap();
        assert!(info.mar_equinox.ut < info.jun_solstice.ut);
        assert!(info.jun_solstice.ut < info.sep_equinox.ut);
        assert!(info.sep_equinox.ut < info.dec_solstice.ut);
    }

    #[test]
    fn lunar_apsis_distance_is_plausible() {
        let start = Time::from_calendar(2024, 1, 1, 0, 0, 0.0).unwrap();
        let apsis = search_lunar_apsis(start).unwrap();
        let dist_km = apsis.distance_au * crate::constants::KM_PER_AU;
        assert!((350_000.0..410_000.0).contains(&dist_km), "dist_km={dist_km}");
    }

    #[test]
    fn illumination_phase_fraction_is_normalized() {
        let t = Time::from_calendar(2024, 1, 1, 0, 0, 0.0).unwrap();
        let info = illumination(Body::Venus, t).unwrap();
        assert!((0.0..=1.0).contains(&info.phase_fraction));
    }

    #[test]
    fn libration_distance_is_plausible() {
        let t = Time::from_calendar(2024, 1, 1, 0, 0, 0.0).unwrap();
        let info = libration(t);
        assert!((350_000.0..410_000.0).contains(&info.dist_km));
    }

    #[test]
    fn libration_angles_are_small() {
        let t = Time::from_calendar(2024, 1, 1, 0, 0, 0.0).unwrap();
        let info = libration(t);
        assert!(info.elat_deg.abs() < 10.0, "elat_deg={}", info.elat_deg);
        assert!(info.elon_deg.abs() < 10.0, "elon_deg={}", info.elon_deg);
    }

    #[test]
    fn lunar_eclipse_near_2019_01_21_is_total() {
        let start = Time::from_calendar(2019, 1, 1, 0, 0, 0.0).unwrap();
        let eclipse = search_lunar_eclipse(start).unwrap();
        assert_eq!(eclipse.kind, EclipseKind::Total);
        assert!(eclipse.sd_total_minutes > 0.0);
        assert!(eclipse.sd_partial_minutes > eclipse.sd_total_minutes);
        assert!(eclipse.sd_penum_minutes > eclipse.sd_partial_minutes);
    }

    #[test]
    fn global_solar_eclipse_near_2017_08_21_is_total_over_north_america() {
        let start = Time::from_calendar(2017, 8, 1, 0, 0, 0.0).unwrap();
        let eclipse = search_global_solar_eclipse(start).unwrap();
        assert_eq!(eclipse.kind, EclipseKind::Total);
        assert!((30.0..45.0).contains(&eclipse.latitude_deg), "lat={}", eclipse.latitude_deg);
        assert!((-95.0..-80.0).contains(&eclipse.longitude_deg), "lon={}", eclipse.longitude_deg);
    }

    #[test]
    fn mercury_transit_near_2019_11_11_brackets_peak() {
        let start = Time::from_calendar(2019, 11, 1, 0, 0, 0.0).unwrap();
        let transit = search_transit(Body::Mercury, start).unwrap();
        assert!(transit.start.ut < transit.peak.ut);
        assert!(transit.peak.ut < transit.finish.ut);
        assert!(transit.separation_arcmin < 60.0, "separation_arcmin={}", transit.separation_arcmin);
    }
}
