// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Generic ascending-root finder: bisection seeded by quadratic inverse
//! interpolation (component C11), the shared kernel every event search in
//! [`crate::events`] is built on.

use crate::error::AstroError;
use crate::time::Time;

const MAX_ITERATIONS: u32 = 20;

/// Find the first `t` in `[t1, t2]` where `f` transitions from negative to
/// non-negative, to within `tolerance_seconds` of wall-clock precision.
///
/// Returns `Ok(None)` if `f` never changes sign from negative to
/// non-negative across the window (a legitimate "no event here" result, not
/// a failure). Returns `Err(NoConverge)` if the iteration budget is
/// exceeded without narrowing to tolerance.
pub fn search<F>(mut f: F, t1: Time, t2: Time, tolerance_seconds: f64) -> Result<Option<Time>, AstroError>
where
    F: FnMut(Time) -> f64,
{
    let tol_days = tolerance_seconds / 86400.0;
    let mut t1 = t1;
    let mut t2 = t2;
    let mut f1 = f(t1);
    let mut f2 = f(t2);

    for _ in 0..MAX_ITERATIONS {
        let tmid = midpoint(t1, t2);
        let fmid = f(tmid);

        if (t2.tt - t1.tt).abs() / 2.0 < tol_days {
            return Ok(Some(tmid));
        }

        if let Some((tq, fq, q_df_dt)) = quadratic_inverse_interpolation(t1, f1, tmid, fmid, t2, f2) {
            let error_days = (fq / q_df_dt).abs();
            if error_days < tol_days {
                return Ok(Some(tq));
            }
            let half_interval = (t2.tt - t1.tt).abs() / 2.0;
            if 1.2 * error_days < half_interval / 5.0 {
                let window = 1.2 * error_days;
                let tleft = Time::from_tt(tq.tt - window);
                let tright = Time::from_tt(tq.tt + window);
                if tleft.tt > t1.tt && tright.tt < t2.tt {
                    let fleft = f(tleft);
                    let fright = f(tright);
                    if fleft < 0.0 && fright >= 0.0 {
                        t1 = tleft;
                        f1 = fleft;
                        t2 = tright;
                        f2 = fright;
                        continue;
                    }
                }
            }
        }

        if f1 < 0.0 && fmid >= 0.0 {
            t2 = tmid;
            f2 = fmid;
        } else if fmid < 0.0 && f2 >= 0.0 {
            t1 = tmid;
            f1 = fmid;
        } else {
            return Ok(None);
        }
    }

    Err(AstroError::NoConverge { function: "search" })
}

fn midpoint(t1: Time, t2: Time) -> Time {
    Time::from_ut((t1.ut + t2.ut) / 2.0)
}

/// Fit the parabola through `(t1,f1), (tmid,fmid), (t2,f2)` in normalized
/// `x in [-1, 1]` and return `(root_time, f(root), df/dt at root)` if a
/// unique root exists within the window.
fn quadratic_inverse_interpolation(
    t1: Time,
    f1: f64,
    tmid: Time,
    fmid: f64,
    t2: Time,
    f2: f64,
) -> Option<(Time, f64, f64)> {
    let q = f1;
    let r = fmid;
    let s = f2;
    let half = (t2.tt - t1.tt) / 2.0;
    if half.abs() < 1e-300 {
        return None;
    }

    let x1 = -1.0;
    let x2 = 0.0;
    let x3 = 1.0;
    let (a, b, c) = fit_parabola((x1, q), (x2, r), (x3, s));

    let discriminant = b * b - 4.0 * a * c;
    let x_root = if a.abs() < 1e-20 {
        if b.abs() < 1e-300 {
            return None;
        }
        -c / b
    } else if discriminant < 0.0 {
        return None;
    } else {
        let sqrt_d = discriminant.sqrt();
        let r1 = (-b + sqrt_d) / (2.0 * a);
        let r2 = (-b - sqrt_d) / (2.0 * a);
        let in_range = |x: f64| (-1.0..=1.0).contains(&x);
        match (in_range(r1), in_range(r2)) {
            (true, false) => r1,
            (false, true) => r2,
            _ => return None,
        }
    };

    let slope_x = 2.0 * a * x_root + b;
    if slope_x.abs() < 1e-300 {
        return None;
    }
    let q_df_dt = slope_x / half;
    let tq = Time::from_tt(tmid.tt + x_root * half);
    let fq = a * x_root * x_root + b * x_root + c;
    Some((tq, fq, q_df_dt))
}

fn fit_parabola(p1: (f64, f64), p2: (f64, f64), p3: (f64, f64)) -> (f64, f64, f64) {
    let (x1, y1) = p1;
    let (x2, y2) = p2;
    let (x3, y3) = p3;
    let denom = (x1 - x2) * (x1 - x3) * (x2 - x3);
    let a = (x3 * (y2 - y1) + x2 * (y1 - y3) + x1 * (y3 - y2)) / denom;
    let b = (x3 * x3 * (y1 - y2) + x2 * x2 * (y3 - y1) + x1 * x1 * (y2 - y3)) / denom;
    let c = (x2 * x3 * (x2 - x3) * y1 + x3 * x1 * (x3 - x1) * y2 + x1 * x2 * (x1 - x2) * y3) / denom;
    (a, b, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn finds_a_simple_linear_root() {
        let t1 = Time::from_ut(0.0);
        let t2 = Time::from_ut(10.0);
        let result = search(|t| t.ut - 5.0, t1, t2, 1.0).unwrap();
        let root = result.unwrap();
        assert_abs_diff_eq!(root.ut, 5.0, epsilon = 1.0 / 86400.0);
    }

    #[test]
    fn returns_none_when_no_ascending_root() {
        let t1 = Time::from_ut(0.0);
        let t2 = Time::from_ut(10.0);
        let result = search(|_| -1.0, t1, t2, 1.0).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn finds_root_of_a_curved_function() {
        let t1 = Time::from_ut(-3.0);
        let t2 = Time::from_ut(3.0);
        let result = search(|t| t.ut * t.ut * t.ut - 8.0, t1, t2, 1.0).unwrap();
        let root = result.unwrap();
        assert!((root.ut - 2.0).abs() < 0.01, "root.ut={}", root.ut);
    }
}
