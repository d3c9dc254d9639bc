// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Physical and mathematical constants used throughout the crate.

#![allow(clippy::excessive_precision)]

/// Pi.
pub const PI: f64 = std::f64::consts::PI;

/// 2*Pi.
pub const TAU: f64 = std::f64::consts::TAU;

/// Degrees per radian.
pub const RAD2DEG: f64 = 57.29577951308232087679815;

/// Radians per degree.
pub const DEG2RAD: f64 = 1.745329251994329576923691e-2;

/// Radians per arcsecond.
pub const ARCSEC2RAD: f64 = 4.848136811095359935899141e-6;

/// Arcseconds per radian.
pub const RAD2ARCSEC: f64 = 206264.8062470963551564734;

/// Arcseconds in a full turn.
pub const ARCSEC_PER_TURN: f64 = 1_296_000.0;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Days per Julian century.
pub const DAYS_PER_CENTURY: f64 = 36525.0;

/// Days per Julian millennium (VSOP87's time argument is millennia past
/// J2000).
pub const DAYS_PER_MILLENNIUM: f64 = 365250.0;

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2451545.0;

/// Kilometers per astronomical unit (IAU 2012 definition, carried through
/// the reference implementation to its full published precision).
pub const KM_PER_AU: f64 = 1.4959787069098932e8;

/// Speed of light, AU per day.
pub const C_AUDAY: f64 = 173.1446326846693;

/// Earth equatorial radius, km.
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.1366;

/// Earth flattening (oblateness), dimensionless: `polar / equatorial`.
pub const EARTH_FLATTENING: f64 = 0.996647180302104;

/// Earth polar radius, km.
pub const EARTH_POLAR_RADIUS_KM: f64 = EARTH_EQUATORIAL_RADIUS_KM * EARTH_FLATTENING;

/// Earth mean radius, km.
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0;

/// Atmospheric margin added to the Earth's mean radius for eclipse
/// shadow-cone geometry, km.
pub const EARTH_ECLIPSE_ATMOSPHERE_KM: f64 = 88.0;

/// Effective Earth radius for eclipse shadow calculations.
pub const EARTH_ECLIPSE_RADIUS_KM: f64 = EARTH_MEAN_RADIUS_KM + EARTH_ECLIPSE_ATMOSPHERE_KM;

/// Moon mean radius, km.
pub const MOON_MEAN_RADIUS_KM: f64 = 1737.4;

/// Sun radius, km.
pub const SUN_RADIUS_KM: f64 = 695700.0;

/// Mean synodic month, days.
pub const MEAN_SYNODIC_MONTH_DAYS: f64 = 29.530588;

/// Mean tropical year, days.
pub const TROPICAL_YEAR_DAYS: f64 = 365.24217;

/// Standard gravitational parameters (`G*M`), AU^3/day^2, to the precision
/// the reference implementation publishes.
pub mod gm {
    pub const SUN: f64 = 0.2959122082855911e-03;
    pub const MERCURY: f64 = 0.4912547451450812e-10;
    pub const VENUS: f64 = 0.7243452486162703e-09;
    pub const EARTH: f64 = 0.8887692445125634e-09;
    pub const MARS: f64 = 0.9549535105779258e-10;
    pub const JUPITER: f64 = 0.2825345909524226e-06;
    pub const SATURN: f64 = 0.8459715185680659e-07;
    pub const URANUS: f64 = 0.1292024916781969e-07;
    pub const NEPTUNE: f64 = 0.1524358900784276e-07;
}

/// Moon-to-Earth mass ratio reciprocal used to split the Earth-Moon
/// barycenter into geocentric contributions (`EMB = Earth + Moon/ratio`).
pub const EARTH_MOON_MASS_RATIO: f64 = 81.30056;
