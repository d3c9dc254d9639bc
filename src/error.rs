// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The crate's error taxonomy.
//!
//! Errors are a flat enum rather than a hierarchy: each variant names a
//! distinct failure mode and carries just enough context to explain it.
//! "No qualifying result" (e.g. a search window with no root) is never a
//! member of this enum — those functions return `Option<T>` instead, so the
//! two axes (failure vs. absence) stay orthogonal.

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AstroError {
    #[error("could not parse or validate date/time input: {reason}")]
    DateTimeFormat { reason: String },

    #[error("function {function} does not accept Earth as a body")]
    EarthNotAllowed { function: &'static str },

    #[error("body {body:?} is not valid for {function}")]
    InvalidBody { function: &'static str, body: crate::bodies::Body },

    #[error("vector passed to {function} has length below the zero-vector threshold")]
    BadVector { function: &'static str },

    #[error("axis index {axis} is not one of {{0, 1, 2}} (x, y, z)")]
    BadAxis { axis: i32 },

    #[error("numeric solver in {function} exceeded its iteration budget")]
    NoConverge { function: &'static str },

    #[error("internal invariant violated in {function}: {reason}")]
    Internal { function: &'static str, reason: String },
}

pub type AstroResult<T> = Result<T, AstroError>;
