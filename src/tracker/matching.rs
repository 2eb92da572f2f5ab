//! Cost-minimizing assignment between small detection sets.
//!
//! The matcher enumerates every possible assignment between the previous and
//! current detections and keeps the cheapest one. This is factorial in the set
//! size and only acceptable because callers bound simultaneous detections to a
//! handful (see `TrackerConfig::max_detections`); in exchange it yields the
//! second-best total cost, which the salience diagnostic needs and which a
//! polynomial assignment solver would not report.

use nalgebra::distance;
use ndarray::Array2;
use tracing::error;

use crate::tracker::skeleton::{Anchor, Skeleton, rmse};

/// Outcome of matching a previous detection set against a current one.
#[derive(Debug, Clone)]
pub struct AssignmentResult {
    /// `(previous_index, current_index)` pairs; padding voids are dropped, so
    /// the mapping is injective in both directions.
    pub matches: Vec<(usize, usize)>,
    /// Second-best total cost divided by best total cost. Near 1 means the
    /// match was ambiguous; large means confident. NaN when either side was
    /// empty or only a single candidate assignment existed.
    pub salience: f64,
}

impl AssignmentResult {
    fn empty() -> Self {
        Self {
            matches: Vec::new(),
            salience: f64::NAN,
        }
    }
}

/// Joint-wise RMSE cost matrix between two skeleton sets, previous rows by
/// current columns.
pub fn rmse_distance(previous: &[Skeleton], current: &[Skeleton]) -> Array2<f64> {
    let mut costs = Array2::zeros((previous.len(), current.len()));
    for (i, old) in previous.iter().enumerate() {
        for (j, new) in current.iter().enumerate() {
            costs[[i, j]] = rmse(old, new);
        }
    }
    costs
}

/// Cross-modality cost between a role anchor and a face anchor: Euclidean
/// distance plus a penalty growing with the face detector's own uncertainty.
/// Strictly increasing in distance and strictly decreasing in face confidence.
pub fn cross_modal_cost(
    skeleton_anchor: &Anchor,
    face_anchor: &Anchor,
    uncertainty_weight: f64,
) -> f64 {
    let dist = distance(&skeleton_anchor.position, &face_anchor.position);
    dist + uncertainty_weight * (1.0 - face_anchor.confidence)
}

/// Cross-modal cost matrix, role anchors by face anchors.
pub fn anchor_distance(roles: &[Anchor], faces: &[Anchor], uncertainty_weight: f64) -> Array2<f64> {
    let mut costs = Array2::zeros((roles.len(), faces.len()));
    for (i, role) in roles.iter().enumerate() {
        for (j, face) in faces.iter().enumerate() {
            costs[[i, j]] = cross_modal_cost(role, face, uncertainty_weight);
        }
    }
    costs
}

/// Find the assignment of previous rows to current columns minimizing the total
/// cost.
///
/// The smaller side is padded with void slots that cost nothing and are omitted
/// from the output, so a 2-row by 3-column matrix yields the best 2-of-3
/// assignment rather than a forced 3-way bijection. Candidates are enumerated
/// in lexicographic order over column indices and the first minimum encountered
/// wins, which makes ties deterministic.
pub fn min_cost_assignment(costs: &Array2<f64>) -> AssignmentResult {
    let (n_prev, n_curr) = costs.dim();

    if n_prev == 0 || n_curr == 0 {
        return AssignmentResult::empty();
    }

    // Slots are current-column indices, padded with `None` voids up to the
    // previous-side size so every row gets a slot.
    let mut slots: Vec<Option<usize>> = (0..n_curr).map(Some).collect();
    while slots.len() < n_prev {
        slots.push(None);
    }

    let mut best: Option<Vec<Option<usize>>> = None;
    let mut best_cost = f64::INFINITY;
    let mut second_cost = f64::INFINITY;
    let mut candidates = 0usize;

    let mut used = vec![false; slots.len()];
    let mut prefix = Vec::with_capacity(n_prev);
    enumerate_assignments(&slots, n_prev, &mut used, &mut prefix, &mut |assignment| {
        candidates += 1;

        let mut total = 0.0;
        for (row, slot) in assignment.iter().enumerate() {
            if let Some(col) = slot {
                total += costs[[row, *col]];
            }
        }

        if total < best_cost {
            second_cost = best_cost;
            best_cost = total;
            best = Some(assignment.to_vec());
        } else if total < second_cost {
            second_cost = total;
        }
    });

    let Some(assignment) = best else {
        // Unreachable with non-empty inputs; degrade so the caller treats the
        // frame as having no previous detections.
        error!(
            rows = n_prev,
            cols = n_curr,
            "assignment enumeration produced no candidate"
        );
        return AssignmentResult::empty();
    };

    let salience = if candidates <= 1 {
        f64::NAN
    } else {
        second_cost / best_cost
    };

    let matches = assignment
        .iter()
        .enumerate()
        .filter_map(|(row, slot)| slot.map(|col| (row, col)))
        .collect();

    AssignmentResult { matches, salience }
}

/// Visit every length-`r` arrangement of `slots`, in lexicographic order over
/// slot positions. Padding voids occupy distinct positions, matching the
/// enumeration order the tie-break is defined against.
fn enumerate_assignments(
    slots: &[Option<usize>],
    r: usize,
    used: &mut Vec<bool>,
    prefix: &mut Vec<Option<usize>>,
    visit: &mut impl FnMut(&[Option<usize>]),
) {
    if prefix.len() == r {
        visit(prefix);
        return;
    }

    for idx in 0..slots.len() {
        if used[idx] {
            continue;
        }
        used[idx] = true;
        prefix.push(slots[idx]);
        enumerate_assignments(slots, r, used, prefix, visit);
        prefix.pop();
        used[idx] = false;
    }
}
