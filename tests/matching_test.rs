use dyadtrack_rs::tracker::{
    Anchor, BAD_MATCH_RMSE, Joint, Keypoint, Skeleton, cross_modal_cost, min_cost_assignment,
    rmse, rmse_distance,
};
use ndarray::array;

/// Skeleton with every joint at (x, y) with the given confidence.
fn uniform_skeleton(x: f64, y: f64, confidence: f64) -> Skeleton {
    let mut skeleton = Skeleton::zeroed();
    for joint in Joint::ALL {
        skeleton.set_joint(joint, Keypoint::new(x, y, confidence));
    }
    skeleton
}

#[test]
fn test_rmse_of_identical_skeletons_is_zero() {
    let a = uniform_skeleton(100.0, 100.0, 0.9);
    let b = uniform_skeleton(100.0, 100.0, 0.9);
    assert_eq!(rmse(&a, &b), 0.0);
}

#[test]
fn test_rmse_sentinel_when_no_eligible_joints() {
    // Below the 0.20 confidence threshold on both sides: no joint pair
    // qualifies, and the cost must be the large finite sentinel, not NaN.
    let a = uniform_skeleton(100.0, 100.0, 0.1);
    let b = uniform_skeleton(500.0, 500.0, 0.1);
    let cost = rmse(&a, &b);
    assert_eq!(cost, BAD_MATCH_RMSE);
    assert!(cost.is_finite());
}

#[test]
fn test_rmse_ignores_low_confidence_joints() {
    let mut a = uniform_skeleton(100.0, 100.0, 0.9);
    let b = uniform_skeleton(100.0, 100.0, 0.9);
    // Move the nose far away but mark it unreliable; it must not contribute.
    a.set_joint(Joint::Nose, Keypoint::new(9999.0, 9999.0, 0.05));
    assert_eq!(rmse(&a, &b), 0.0);
}

#[test]
fn test_assignment_is_bijective() {
    let costs = array![[5.0, 1.0, 8.0], [2.0, 9.0, 3.0], [7.0, 6.0, 1.0]];
    let result = min_cost_assignment(&costs);

    assert_eq!(result.matches.len(), 3);
    let mut rows: Vec<usize> = result.matches.iter().map(|(r, _)| *r).collect();
    let mut cols: Vec<usize> = result.matches.iter().map(|(_, c)| *c).collect();
    rows.sort();
    cols.sort();
    rows.dedup();
    cols.dedup();
    assert_eq!(rows.len(), 3);
    assert_eq!(cols.len(), 3);
}

#[test]
fn test_assignment_picks_minimum_total_cost() {
    let costs = array![[1.0, 10.0], [10.0, 1.0]];
    let result = min_cost_assignment(&costs);
    assert_eq!(result.matches, vec![(0, 0), (1, 1)]);
    // Best total is 2, second best 20.
    assert_eq!(result.salience, 10.0);
}

#[test]
fn test_two_of_three_selection() {
    // Two previous entities against three current detections: the spurious
    // middle detection must be dropped, never forced into a 3-way bijection.
    let costs = array![[1.0, 50.0, 40.0], [40.0, 50.0, 1.0]];
    let result = min_cost_assignment(&costs);
    assert_eq!(result.matches.len(), 2);
    assert!(result.matches.contains(&(0, 0)));
    assert!(result.matches.contains(&(1, 2)));
}

#[test]
fn test_excess_previous_side_drops_worst_track() {
    // Three previous rows, one current column: exactly one row matches.
    let costs = array![[5.0], [1.0], [9.0]];
    let result = min_cost_assignment(&costs);
    assert_eq!(result.matches, vec![(1, 0)]);
}

#[test]
fn test_empty_sides_yield_empty_mapping_and_nan_salience() {
    let empty_rows = ndarray::Array2::<f64>::zeros((0, 3));
    let result = min_cost_assignment(&empty_rows);
    assert!(result.matches.is_empty());
    assert!(result.salience.is_nan());

    let empty_cols = ndarray::Array2::<f64>::zeros((2, 0));
    let result = min_cost_assignment(&empty_cols);
    assert!(result.matches.is_empty());
    assert!(result.salience.is_nan());
}

#[test]
fn test_single_candidate_salience_is_nan() {
    let costs = array![[3.0]];
    let result = min_cost_assignment(&costs);
    assert_eq!(result.matches, vec![(0, 0)]);
    assert!(result.salience.is_nan());
}

#[test]
fn test_tie_break_is_deterministic() {
    // Both bijections cost 2.0; the first one in enumeration order must win,
    // every time.
    let costs = array![[1.0, 1.0], [1.0, 1.0]];
    for _ in 0..10 {
        let result = min_cost_assignment(&costs);
        assert_eq!(result.matches, vec![(0, 0), (1, 1)]);
        assert_eq!(result.salience, 1.0);
    }
}

#[test]
fn test_rmse_distance_matrix_shape_and_values() {
    let previous = vec![
        uniform_skeleton(0.0, 0.0, 0.9),
        uniform_skeleton(100.0, 0.0, 0.9),
    ];
    let current = vec![uniform_skeleton(0.0, 0.0, 0.9)];
    let costs = rmse_distance(&previous, &current);
    assert_eq!(costs.dim(), (2, 1));
    assert_eq!(costs[[0, 0]], 0.0);
    assert_eq!(costs[[1, 0]], 100.0);
}

#[test]
fn test_cross_modal_cost_increases_with_distance() {
    let role = Anchor::new(0.0, 0.0, 1.0);
    let near = Anchor::new(10.0, 0.0, 0.8);
    let far = Anchor::new(20.0, 0.0, 0.8);
    assert!(cross_modal_cost(&role, &near, 5.0) < cross_modal_cost(&role, &far, 5.0));
}

#[test]
fn test_cross_modal_cost_decreases_with_confidence() {
    let role = Anchor::new(0.0, 0.0, 1.0);
    let sure = Anchor::new(10.0, 0.0, 0.9);
    let unsure = Anchor::new(10.0, 0.0, 0.3);
    assert!(cross_modal_cost(&role, &sure, 5.0) < cross_modal_cost(&role, &unsure, 5.0));
}
