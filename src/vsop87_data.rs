// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-planet orbital elements feeding the truncated VSOP87-shaped series
//! in [`crate::vsop87`].
//!
//! The full VSOP87 term tables are machine-generated and not present in
//! the retrieval pack (see DESIGN.md); in their place each planet's
//! longitude/latitude/radius series is built from its standard J2000 mean
//! orbital elements (Standish 1992-style approximate elements) truncated
//! to the leading secular and first-eccentricity/inclination terms.

/// J2000.0 mean orbital elements for one planet.
pub struct Elements {
    /// Semi-major axis, AU.
    pub a: f64,
    /// Eccentricity.
    pub e: f64,
    /// Inclination to the ecliptic, degrees.
    pub i_deg: f64,
    /// Longitude of ascending node, degrees.
    pub omega_deg: f64,
    /// Longitude of perihelion (varpi = omega + argument of perihelion), degrees.
    pub long_perihelion_deg: f64,
    /// Mean longitude at J2000.0, degrees.
    pub l0_deg: f64,
    /// Sidereal orbital period, days.
    pub period_days: f64,
}

pub const MERCURY: Elements = Elements {
    a: 0.38709927,
    e: 0.20563593,
    i_deg: 7.00497902,
    omega_deg: 48.33076593,
    long_perihelion_deg: 29.12703035,
    l0_deg: 252.25032350,
    period_days: 87.9691,
};

pub const VENUS: Elements = Elements {
    a: 0.72333566,
    e: 0.00677672,
    i_deg: 3.39467605,
    omega_deg: 76.67984255,
    long_perihelion_deg: 54.92262463,
    l0_deg: 181.97909950,
    period_days: 224.701,
};

pub const EARTH: Elements = Elements {
    a: 1.00000261,
    e: 0.01671123,
    i_deg: 0.0,
    omega_deg: 0.0,
    long_perihelion_deg: 102.93768193,
    l0_deg: 100.46457166,
    period_days: 365.256,
};

pub const MARS: Elements = Elements {
    a: 1.52371034,
    e: 0.09339410,
    i_deg: 1.84969142,
    omega_deg: 49.55953891,
    long_perihelion_deg: 286.50210865,
    l0_deg: 355.44656795,
    period_days: 686.980,
};

pub const JUPITER: Elements = Elements {
    a: 5.20288700,
    e: 0.04838624,
    i_deg: 1.30439695,
    omega_deg: 100.47390909,
    long_perihelion_deg: 274.25457754,
    l0_deg: 34.39644051,
    period_days: 4332.589,
};

pub const SATURN: Elements = Elements {
    a: 9.53667594,
    e: 0.05386179,
    i_deg: 2.48599187,
    omega_deg: 113.66242448,
    long_perihelion_deg: 338.93645383,
    l0_deg: 50.07571329,
    period_days: 10759.22,
};

pub const URANUS: Elements = Elements {
    a: 19.18916464,
    e: 0.04725744,
    i_deg: 0.77263783,
    omega_deg: 74.01692503,
    long_perihelion_deg: 96.93735127,
    l0_deg: 314.20276625,
    period_days: 30688.5,
};

pub const NEPTUNE: Elements = Elements {
    a: 30.06992276,
    e: 0.00859048,
    i_deg: 1.77004347,
    omega_deg: 131.78422574,
    long_perihelion_deg: 273.18053653,
    l0_deg: 304.22289287,
    period_days: 60182.0,
};
