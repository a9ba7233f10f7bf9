use bevy::math::Vec3;
use bevy_mesh_terrain::{
    Axis, BinError, BoundingBox, DegenerateAxisPolicy, HeightmapBinner, RoundingMode, bin,
};

fn unit_bounds() -> BoundingBox {
    BoundingBox::new(Vec3::ZERO, Vec3::ONE)
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn single_point_fills_exactly_one_cell() {
    let points = [Vec3::new(1.0, 0.3, 0.0)];
    let grid = bin(&points, &unit_bounds(), 4).unwrap();

    // x = 1.0 → column 3, z = 0.0 → row 0
    assert_eq!(grid.get(0, 3), 0.3);
    for row in 0..4 {
        for col in 0..4 {
            if (row, col) != (0, 3) {
                assert_eq!(grid.get(row, col), 0.0, "cell ({row}, {col})");
            }
        }
    }
}

#[test]
fn grid_has_requested_resolution() {
    let grid = bin(&[Vec3::splat(0.5)], &unit_bounds(), 17).unwrap();
    assert_eq!(grid.resolution(), 17);
    assert_eq!(grid.as_slice().len(), 17 * 17);
    assert_eq!(grid.rows().count(), 17);
}

#[test]
fn rows_follow_z_and_columns_follow_x() {
    let points = [Vec3::new(0.0, 0.25, 1.0), Vec3::new(1.0, 0.75, 0.0)];
    let grid = bin(&points, &unit_bounds(), 2).unwrap();
    assert_eq!(grid.get(1, 0), 0.25);
    assert_eq!(grid.get(0, 1), 0.75);
}

#[test]
fn shared_cell_holds_mean_regardless_of_order() {
    let bounds = unit_bounds();
    let mut points = vec![
        Vec3::new(0.5, 0.1, 0.5),
        Vec3::new(0.5, 0.4, 0.5),
        Vec3::new(0.5, 0.7, 0.5),
        Vec3::new(0.5, 1.0, 0.5),
        // Pins the bounds' full extent without touching the centre cell.
        Vec3::new(0.0, 0.0, 0.0),
    ];
    let forward = bin(&points, &bounds, 3).unwrap();
    points.reverse();
    let backward = bin(&points, &bounds, 3).unwrap();

    assert_close(forward.get(1, 1), (0.1 + 0.4 + 0.7 + 1.0) / 4.0);
    assert_close(backward.get(1, 1), forward.get(1, 1));
}

#[test]
fn resolution_one_averages_everything() {
    let points = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(0.2, 0.5, 0.9),
        Vec3::new(0.9, 0.3, 0.1),
    ];
    let grid = bin(&points, &unit_bounds(), 1).unwrap();
    assert_eq!(grid.resolution(), 1);
    assert_close(grid.get(0, 0), (0.0 + 1.0 + 0.5 + 0.3) / 4.0);
}

#[test]
fn worked_example_ties_to_even() {
    let points = [Vec3::ZERO, Vec3::ONE, Vec3::splat(0.5)];
    let grid = HeightmapBinner::new()
        .with_rounding(RoundingMode::TiesToEven)
        .bin(&points, &unit_bounds(), 2)
        .unwrap();

    // 0.5 * (2 - 1) = 0.5 rounds to 0, joining the origin point.
    assert_close(grid.get(0, 0), 0.25);
    assert_close(grid.get(1, 1), 1.0);
    assert_eq!(grid.get(0, 1), 0.0);
    assert_eq!(grid.get(1, 0), 0.0);
}

#[test]
fn worked_example_half_up() {
    let points = [Vec3::ZERO, Vec3::ONE, Vec3::splat(0.5)];
    let grid = HeightmapBinner::new()
        .with_rounding(RoundingMode::HalfUp)
        .bin(&points, &unit_bounds(), 2)
        .unwrap();

    assert_close(grid.get(0, 0), 0.0);
    assert_close(grid.get(1, 1), 0.75);
}

#[test]
fn default_binner_rounds_ties_to_even() {
    let binner = HeightmapBinner::new();
    assert_eq!(binner.rounding(), RoundingMode::TiesToEven);
    assert_eq!(binner.degenerate_policy(), DegenerateAxisPolicy::Reject);
}

#[test]
fn outputs_are_finite_and_normalized() {
    let points: Vec<Vec3> = (0..500)
        .map(|i| {
            let t = i as f32 * 0.37;
            Vec3::new(t.sin() * 40.0, t.cos() * 7.5 + 3.0, (t * 1.3).sin() * 25.0)
        })
        .collect();
    let bounds = BoundingBox::from_points(&points).unwrap();
    let grid = bin(&points, &bounds, 33).unwrap();

    for &h in grid.as_slice() {
        assert!(h.is_finite(), "non-finite height {h}");
        assert!((0.0..=1.0).contains(&h), "height {h} outside [0, 1]");
    }
}

#[test]
fn points_outside_bounds_are_clamped_to_edge_cells() {
    let points = [Vec3::new(-5.0, 0.5, 12.0), Vec3::new(3.0, 0.5, -2.0)];
    let grid = bin(&points, &unit_bounds(), 4).unwrap();
    assert_eq!(grid.get(3, 0), 0.5);
    assert_eq!(grid.get(0, 3), 0.5);
}

#[test]
fn zero_resolution_is_rejected() {
    let err = bin(&[Vec3::ZERO], &unit_bounds(), 0).unwrap_err();
    assert_eq!(
        err,
        BinError::InvalidResolution {
            resolution: 0,
            minimum: 1
        }
    );
}

#[test]
fn flat_mesh_bounds_are_rejected_by_default() {
    let points = [Vec3::new(0.0, 2.0, 0.0), Vec3::new(4.0, 2.0, 4.0)];
    let bounds = BoundingBox::from_points(&points).unwrap();
    let err = bin(&points, &bounds, 8).unwrap_err();
    assert_eq!(err, BinError::DegenerateBounds { axis: Axis::Y });
}

#[test]
fn degenerate_bounds_are_rejected_even_without_points() {
    let bounds = BoundingBox::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0));
    let err = bin(&[], &bounds, 8).unwrap_err();
    assert_eq!(err, BinError::DegenerateBounds { axis: Axis::X });
}

#[test]
fn huge_finite_bounds_are_not_degenerate() {
    let points = [
        Vec3::splat(-3.0e38),
        Vec3::splat(3.0e38),
        Vec3::new(3.0e38, 0.0, -3.0e38),
    ];
    let bounds = BoundingBox::from_points(&points).unwrap();
    assert_eq!(bounds.degenerate_axis(), None);

    let grid = bin(&points, &bounds, 3).unwrap();
    assert_close(grid.get(0, 0), 0.0);
    assert_close(grid.get(2, 2), 1.0);
    assert_close(grid.get(0, 2), 0.5);
    for &h in grid.as_slice() {
        assert!(h.is_finite(), "non-finite height {h}");
    }
}

#[test]
fn huge_finite_bounds_keep_every_axis_under_collapse() {
    let points = [Vec3::splat(-3.0e38), Vec3::splat(3.0e38)];
    let bounds = BoundingBox::from_points(&points).unwrap();
    let grid = HeightmapBinner::new()
        .with_degenerate_policy(DegenerateAxisPolicy::Collapse)
        .bin(&points, &bounds, 2)
        .unwrap();

    assert_close(grid.get(1, 1), 1.0);
    assert_eq!(grid.get(0, 1), 0.0);
}

#[test]
fn collapse_policy_maps_flat_axis_to_zero() {
    let points = [Vec3::new(0.0, 2.0, 0.0), Vec3::new(4.0, 2.0, 4.0)];
    let bounds = BoundingBox::from_points(&points).unwrap();
    let grid = HeightmapBinner::new()
        .with_degenerate_policy(DegenerateAxisPolicy::Collapse)
        .bin(&points, &bounds, 8)
        .unwrap();

    assert!(grid.as_slice().iter().all(|h| *h == 0.0));
}

#[test]
fn collapse_policy_stacks_points_on_a_collapsed_planar_axis() {
    // Every point shares x = 3, so all land in column 0.
    let points = [
        Vec3::new(3.0, 0.0, 0.0),
        Vec3::new(3.0, 1.0, 1.0),
        Vec3::new(3.0, 0.5, 1.0),
    ];
    let bounds = BoundingBox::from_points(&points).unwrap();
    let grid = HeightmapBinner::new()
        .with_degenerate_policy(DegenerateAxisPolicy::Collapse)
        .bin(&points, &bounds, 2)
        .unwrap();

    assert_close(grid.get(0, 0), 0.0);
    assert_close(grid.get(1, 0), 0.75);
    assert_eq!(grid.get(0, 1), 0.0);
    assert_eq!(grid.get(1, 1), 0.0);
}

#[test]
fn collapse_policy_never_produces_non_finite_heights() {
    let bounds = BoundingBox::new(Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY));
    let points = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.0, 9.0)];
    let grid = HeightmapBinner::new()
        .with_degenerate_policy(DegenerateAxisPolicy::Collapse)
        .bin(&points, &bounds, 4)
        .unwrap();

    assert!(grid.as_slice().iter().all(|h| h.is_finite()));
}

#[test]
fn non_finite_points_are_skipped() {
    let points = [
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::new(f32::NAN, 0.9, 0.0),
        Vec3::new(0.0, f32::INFINITY, 0.0),
    ];
    let grid = bin(&points, &unit_bounds(), 2).unwrap();
    assert_eq!(grid.get(0, 0), 0.5);
}

#[test]
fn bounds_from_points_ignores_non_finite_and_empty_sets() {
    assert!(BoundingBox::from_points(&[]).is_none());
    assert!(BoundingBox::from_points(&[Vec3::NAN]).is_none());

    let bounds = BoundingBox::from_points(&[
        Vec3::new(-1.0, 4.0, 2.0),
        Vec3::new(f32::NAN, 100.0, 0.0),
        Vec3::new(3.0, -2.0, 6.0),
    ])
    .unwrap();
    assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 2.0));
    assert_eq!(bounds.max, Vec3::new(3.0, 4.0, 6.0));
    assert_eq!(bounds.extents(), Vec3::new(4.0, 6.0, 4.0));
    assert_eq!(bounds.center(), Vec3::new(1.0, 1.0, 4.0));
    assert_eq!(bounds.degenerate_axis(), None);
}

#[test]
fn to_rows_matches_cell_access() {
    let points = [Vec3::new(0.0, 0.2, 0.0), Vec3::new(1.0, 0.8, 1.0)];
    let grid = bin(&points, &unit_bounds(), 3).unwrap();
    let rows = grid.to_rows();
    assert_eq!(rows.len(), 3);
    for (r, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), 3);
        for (c, &h) in row.iter().enumerate() {
            assert_eq!(h, grid.get(r, c));
        }
    }
    assert_eq!(grid.min_height(), Some(0.0));
    assert_eq!(grid.max_height(), Some(0.8));
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_binning_matches_sequential() {
    let points: Vec<Vec3> = (0..10_000)
        .map(|i| {
            let t = i as f32 * 0.013;
            Vec3::new(t.cos() * 10.0, (t * 3.0).sin(), t.sin() * 10.0)
        })
        .collect();
    let bounds = BoundingBox::from_points(&points).unwrap();
    let binner = HeightmapBinner::new();

    let sequential = binner.bin(&points, &bounds, 64).unwrap();
    let parallel = binner.bin_parallel(&points, &bounds, 64).unwrap();

    for (a, b) in sequential.as_slice().iter().zip(parallel.as_slice()) {
        assert!((a - b).abs() < 1e-5, "sequential {a} vs parallel {b}");
    }
}
