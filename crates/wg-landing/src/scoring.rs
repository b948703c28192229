//! Picking one landing point out of a list of standable candidates.
//!
//! Both selectors are pure: same inputs, same answer, and the first of
//! several fully tied candidates wins so scan order stays meaningful.
//!
//! # Directional weighting
//!
//! With a forward vector `f` (unit, horizontal) and a candidate whose
//! horizontal displacement from the target has unit direction `h`:
//!
//! | `dot = h·f` | weight                          |
//! |-------------|---------------------------------|
//! | `>= 0`      | `1 − dot × FORWARD_BONUS`       |
//! | `< 0`       | `1 + (−dot) × BACK_PENALTY`     |
//! | same cell   | `1 − FORWARD_BONUS`             |
//!
//! clamped below at [`MIN_WEIGHT`].  Cost is `distance² × weight`.
//!
//! The sideways offset from the forward axis is compared before cost, so a
//! spot in line with the marker beats a cheaper one off to the side.

use std::cmp::Ordering;

use wg_core::{Forward, Position};

/// Largest discount for a candidate straight ahead.
pub const FORWARD_BONUS: f64 = 0.4;
/// Largest surcharge for a candidate straight behind.
pub const BACK_PENALTY: f64 = 0.8;
/// Floor on the direction weight.
pub const MIN_WEIGHT: f64 = 0.05;

const EPS: f64 = 1e-9;

/// Compare two floats, treating anything within `EPS` as equal.
#[inline]
fn cmp_eps(a: f64, b: f64) -> Ordering {
    if (a - b).abs() <= EPS {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

// ── Direction-weighted ────────────────────────────────────────────────────────

/// Score of one candidate under a forward hint.  Lower sorts first.
#[derive(Clone, Copy, Debug)]
struct Weighted {
    cost:    f64,
    lateral: f64,
    abs_dy:  f64,
    ahead:   f64,
}

impl Weighted {
    fn of(base: Position, c: Position, forward: Forward) -> Self {
        let (dx, dy, dz) = (c.x - base.x, c.y - base.y, c.z - base.z);
        let dist_sq = dx * dx + dy * dy + dz * dz;
        let horiz = (dx * dx + dz * dz).sqrt();

        let (weight, dot) = if horiz == 0.0 {
            (1.0 - FORWARD_BONUS, 1.0)
        } else {
            let dot = forward.dot(dx / horiz, dz / horiz);
            let w = if dot >= 0.0 {
                1.0 - dot * FORWARD_BONUS
            } else {
                1.0 + (-dot) * BACK_PENALTY
            };
            (w, dot)
        };

        let ahead = dot.max(0.0) * horiz;
        Self {
            cost:    dist_sq * weight.max(MIN_WEIGHT),
            lateral: (horiz * horiz - ahead * ahead).max(0.0).sqrt(),
            abs_dy:  dy.abs(),
            ahead,
        }
    }

    fn rank(&self, other: &Self) -> Ordering {
        cmp_eps(self.lateral, other.lateral)
            .then_with(|| cmp_eps(self.cost, other.cost))
            .then_with(|| cmp_eps(self.abs_dy, other.abs_dy))
            .then_with(|| cmp_eps(other.ahead, self.ahead))
    }
}

/// Choose the candidate closest to the forward axis.
///
/// Equal sideways offsets (within 1e-9) go to the lower direction-weighted
/// cost, then the smaller height change, then the one further ahead.
pub fn choose_weighted(base: Position, candidates: &[Position], forward: Forward) -> Option<Position> {
    let mut best: Option<(Position, Weighted)> = None;
    for &c in candidates {
        let score = Weighted::of(base, c, forward);
        if best.as_ref().is_none_or(|(_, b)| score.rank(b) == Ordering::Less) {
            best = Some((c, score));
        }
    }
    best.map(|(c, _)| c)
}

// ── Plain distance ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
struct Plain {
    dist_sq:   f64,
    abs_dy:    f64,
    manhattan: f64,
    imbalance: f64,
}

impl Plain {
    fn of(base: Position, c: Position) -> Self {
        let (dx, dy, dz) = (c.x - base.x, c.y - base.y, c.z - base.z);
        Self {
            dist_sq:   dx * dx + dy * dy + dz * dz,
            abs_dy:    dy.abs(),
            manhattan: dx.abs() + dz.abs(),
            imbalance: (dx.abs() - dz.abs()).abs(),
        }
    }

    fn rank(&self, other: &Self) -> Ordering {
        cmp_eps(self.dist_sq, other.dist_sq)
            .then_with(|| cmp_eps(self.abs_dy, other.abs_dy))
            .then_with(|| cmp_eps(self.manhattan, other.manhattan))
            .then_with(|| cmp_eps(self.imbalance, other.imbalance))
    }
}

/// Choose the nearest candidate when there is no forward hint.
///
/// Ties go to the smaller height change, then the smaller horizontal
/// Manhattan distance, then the more diagonal-balanced offset.
pub fn choose_by_distance(base: Position, candidates: &[Position]) -> Option<Position> {
    let mut best: Option<(Position, Plain)> = None;
    for &c in candidates {
        let score = Plain::of(base, c);
        if best.as_ref().is_none_or(|(_, b)| score.rank(b) == Ordering::Less) {
            best = Some((c, score));
        }
    }
    best.map(|(c, _)| c)
}
