// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The closed set of bodies this crate knows how to compute.

use crate::constants::{self, gm};

/// A Solar System body (or barycenter) this crate can compute positions for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    /// Earth-Moon barycenter.
    Emb,
    /// Solar System barycenter.
    Ssb,
}

impl Body {
    /// Mean synodic period relative to Earth, in days. `None` for bodies
    /// without a meaningful synodic period from Earth's vantage.
    pub fn synodic_period_days(self) -> Option<f64> {
        match self {
            Body::Moon => Some(constants::MEAN_SYNODIC_MONTH_DAYS),
            Body::Mercury => Some(115.8774),
            Body::Venus => Some(583.9214),
            Body::Mars => Some(779.9361),
            Body::Jupiter => Some(398.8840),
            Body::Saturn => Some(378.0919),
            Body::Uranus => Some(369.6560),
            Body::Neptune => Some(367.4867),
            Body::Sun | Body::Earth | Body::Pluto | Body::Emb | Body::Ssb => None,
        }
    }

    /// Whether this body orbits farther from the Sun than Earth does, and
    /// therefore can reach opposition (as opposed to Mercury/Venus, which
    /// can only reach elongation extrema and transits).
    pub fn is_superior_planet(self) -> bool {
        matches!(
            self,
            Body::Mars | Body::Jupiter | Body::Saturn | Body::Uranus | Body::Neptune | Body::Pluto
        )
    }

    /// Standard gravitational parameter `G*M`, AU^3/day^2, for bodies that
    /// participate in the Pluto integrator's major-body perturbation model.
    pub fn gm(self) -> Option<f64> {
        match self {
            Body::Sun => Some(gm::SUN),
            Body::Mercury => Some(gm::MERCURY),
            Body::Venus => Some(gm::VENUS),
            Body::Earth => Some(gm::EARTH),
            Body::Mars => Some(gm::MARS),
            Body::Jupiter => Some(gm::JUPITER),
            Body::Saturn => Some(gm::SATURN),
            Body::Uranus => Some(gm::URANUS),
            Body::Neptune => Some(gm::NEPTUNE),
            Body::Moon | Body::Pluto | Body::Emb | Body::Ssb => None,
        }
    }
}
