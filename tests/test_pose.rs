use kmodel::pose;
use nalgebra::{Isometry3, Matrix4, Rotation3, Translation3, UnitQuaternion, Vector3, Vector6};

fn rotated(roll: f64, pitch: f64, yaw: f64) -> Matrix4<f64> {
    UnitQuaternion::from_euler_angles(roll, pitch, yaw).to_homogeneous()
}

fn posed() -> Matrix4<f64> {
    Isometry3::from_parts(
        Translation3::new(0.5, 0.1, -0.3),
        UnitQuaternion::from_euler_angles(-0.7, 0.3, 2.0),
    )
    .to_homogeneous()
}

#[test]
fn test_distance() {
    let a = posed();
    assert!(pose::distance(&a, &a, 1.0).abs() < 1e-12);
    assert!(pose::distance(&a, &a, 10.0).abs() < 1e-12);

    let b = rotated(0.0, 0.0, 0.5);
    let identity = Matrix4::identity();
    assert!((pose::distance(&identity, &b, 1.0) - 0.5).abs() < 1e-12);
    assert!((pose::distance(&identity, &b, 4.0) - 1.0).abs() < 1e-12);
    assert!((pose::distance(&a, &b, 2.0) - pose::distance(&b, &a, 2.0)).abs() < 1e-12);
}

#[test]
fn test_exact_delta_round_trip() {
    // rotation only delta on a pose without translation
    let base = rotated(0.2, -0.4, 1.1);
    for delta in &[
        Vector6::new(0.0, 0.0, 0.0, 0.3, 0.0, 0.0),
        Vector6::new(0.0, 0.0, 0.0, -0.2, 0.5, 0.1),
        Vector6::new(0.0, 0.0, 0.0, 0.0, 0.0, -1.2),
    ] {
        let moved = pose::from_delta(&base, delta, false);
        let back = pose::to_delta(&base, &moved, false);
        assert!((back - delta).norm() < 1e-10);
    }

    // translation only delta on any pose
    let base = posed();
    let delta = Vector6::new(0.1, -0.2, 0.3, 0.0, 0.0, 0.0);
    let moved = pose::from_delta(&base, &delta, false);
    assert!((pose::to_delta(&base, &moved, false) - delta).norm() < 1e-12);
}

#[test]
fn test_exact_delta_on_translated_pose() {
    // the delta is applied in front of the base, so its rotation also moves
    // the translation of the base
    let base = posed();
    let delta = Vector6::new(0.1, -0.2, 0.3, 0.2, -0.1, 0.4);
    let moved = pose::from_delta(&base, &delta, false);
    let back = pose::to_delta(&base, &moved, false);

    let rotation = Rotation3::new(Vector3::new(delta[3], delta[4], delta[5]));
    let p = Vector3::new(base[(0, 3)], base[(1, 3)], base[(2, 3)]);
    let v = Vector3::new(delta[0], delta[1], delta[2]);
    let expected = rotation * (v + p) - p;
    assert!((back.fixed_rows::<3>(0) - expected).norm() < 1e-12);
    assert!((back.fixed_rows::<3>(3) - delta.fixed_rows::<3>(3)).norm() < 1e-10);
    assert!((back.fixed_rows::<3>(0) - v).norm() > 1e-2);
}

#[test]
fn test_approximate_delta() {
    let base = posed();
    let delta = Vector6::new(0.01, 0.02, -0.01, 2e-4, -5e-4, 3e-4);
    let approximate = pose::from_delta(&base, &delta, true);
    let exact = pose::from_delta(&base, &Vector6::new(0.0, 0.0, 0.0, delta[3], delta[4], delta[5]), false);
    // rotation blocks agree to first order
    let error = (approximate.fixed_view::<3, 3>(0, 0) - exact.fixed_view::<3, 3>(0, 0)).norm();
    assert!(error < 1e-6);
    let back = pose::to_delta(&base, &approximate, true);
    assert!((back - delta).norm() < 1e-9);
}

#[test]
fn test_skew_delta() {
    let delta = Vector6::new(1.0, 2.0, 3.0, 0.1, 0.2, 0.3);
    let m = pose::from_skew_delta(&delta);
    assert_eq!(pose::skew_delta(&m), delta);
}

#[test]
fn test_denavit_hartenberg() {
    let m: Matrix4<f64> = pose::from_denavit_hartenberg_paul(0.3, -0.6, 0.25, 1.2);
    let dh = pose::to_denavit_hartenberg_paul(&m).unwrap();
    assert!((dh.d - 0.3).abs() < 1e-12);
    assert!((dh.theta + 0.6).abs() < 1e-12);
    assert!((dh.a - 0.25).abs() < 1e-12);
    assert!((dh.alpha - 1.2).abs() < 1e-12);

    // theta of 90 degrees, a is taken from the second column only
    let m = pose::from_denavit_hartenberg_paul(0.0, std::f64::consts::FRAC_PI_2, 0.7, 0.0);
    let dh = pose::to_denavit_hartenberg_paul(&m).unwrap();
    assert!((dh.a - 0.7).abs() < 1e-12);

    assert!(pose::to_denavit_hartenberg_paul(&rotated(0.0, 0.3, 0.0)).is_err());
}
