/// End-to-end inverse kinematics on preset arms through the public API
use dh_ik::{
    ChainIdentifier, DhChain, DhChainElement, DhChainIdentifier, DhParam, IkConfig, IkError,
    InverseKinematicsEngine, RobotConfig,
};
use nalgebra::{Isometry3, Translation3, UnitQuaternion};

fn pose(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::new(x, y, z),
        UnitQuaternion::from_euler_angles(roll, pitch, yaw),
    )
}

#[test]
fn test_puma_wrist_reaches_target_orientation() {
    let config = RobotConfig::puma_560();
    let engine = InverseKinematicsEngine::default();
    let target = pose(0.35, 0.2, 0.3, 0.4, -0.6, 1.1);

    let solution = engine
        .inverse_kinematics_with_error(&target, &[0.0; 6], &config.chain)
        .unwrap();
    println!("PUMA angles: {:?}, error {}", solution.joint_angles, solution.solve_error);

    assert_eq!(solution.joint_angles.len(), 6);
    assert!(solution.joint_angles.iter().all(|a| a.is_finite()));
    assert!(solution.solve_error >= 0.0);

    // The wrist is solved in closed form, so the orientation is exact
    // regardless of how well the position converged
    let reached = config.chain.forward_kinematics(&solution.joint_angles).unwrap();
    let angle = reached.rotation.angle_to(&target.rotation);
    assert!(angle < 1e-6, "orientation off by {} rad", angle);
}

#[test]
fn test_stanford_wrist_reaches_target_orientation() {
    let config = RobotConfig::stanford();
    let target = pose(0.3, -0.4, 0.9, -1.2, 0.3, 0.25);

    let angles = InverseKinematicsEngine::default()
        .inverse_kinematics(&target, &[0.0; 6], &config.chain)
        .unwrap();
    let reached = config.chain.forward_kinematics(&angles).unwrap();

    assert!(reached.rotation.angle_to(&target.rotation) < 1e-6);
}

#[test]
fn test_crx_has_no_analytic_wrist() {
    let config = RobotConfig::crx_10ia();
    let elements = DhChainIdentifier::default().identify_chain(config.chain.convention(), config.chain.links());
    assert!(elements.iter().all(|e| matches!(e, DhChainElement::RevoluteJoint(_))));

    let solution = InverseKinematicsEngine::default()
        .inverse_kinematics_with_error(&pose(600.0, 100.0, 300.0, 0.0, 0.0, 0.0), &[0.0; 6], &config.chain)
        .unwrap();
    assert_eq!(solution.joint_angles.len(), 6);
    assert!(solution.joint_angles.iter().all(|a| a.is_finite()));
}

#[test]
fn test_joint_vector_length_mismatch() {
    let chain = RobotConfig::puma_560().chain;
    let result = InverseKinematicsEngine::default().inverse_kinematics(
        &pose(0.3, 0.0, 0.3, 0.0, 0.0, 0.0),
        &[0.0; 5],
        &chain,
    );

    match result {
        Err(IkError::InvalidArgument(msg)) => assert!(msg.contains("equal size"), "unexpected message: {}", msg),
        other => panic!("expected InvalidArgument, got {:?}", other),
    }
}

#[test]
fn test_unreachable_target_reports_error() {
    // Two pure-rotation links become two default-length bones: 20 units of reach
    let chain = DhChain::standard(vec![DhParam::new(0.0, 0.0, 0.0, 0.0); 2]);
    let target = pose(0.0, 0.0, 50.0, 0.0, 0.0, 0.0);

    let solution = InverseKinematicsEngine::default()
        .inverse_kinematics_with_error(&target, &[0.0; 2], &chain)
        .unwrap();

    // The chain ends up stretched toward the target
    assert!((solution.solve_error - 30.0).abs() < 1e-2, "error was {}", solution.solve_error);
    assert!(solution.joint_angles.iter().all(|a| a.abs() < 0.05), "angles {:?}", solution.joint_angles);
}

#[test]
fn test_engine_from_json_config() {
    let config = IkConfig::from_json_str(r#"{ "default_bone_length": 2.0, "solver": { "max_iterations": 100 } }"#).unwrap();
    let engine = InverseKinematicsEngine::from_config(&config);
    let chain = DhChain::standard(vec![DhParam::new(0.0, 0.0, 0.0, 0.0)]);

    let solution = engine
        .inverse_kinematics_with_error(&pose(0.0, 0.0, 2.0, 0.0, 0.0, 0.0), &[0.0], &chain)
        .unwrap();
    assert!(solution.joint_angles[0].abs() < 1e-9);
    assert!(solution.solve_error < 1e-9);
}

#[test]
fn test_chain_from_json() {
    let json = r#"{
        "convention": "Modified",
        "links": [
            { "d": 0.0, "theta": 0.0, "r": 0.0, "alpha": 0.0 },
            { "d": 0.0, "theta": 0.0, "r": 1.0, "alpha": 0.0 }
        ]
    }"#;
    let chain = DhChain::from_json_str(json).unwrap();
    let angles = InverseKinematicsEngine::default()
        .inverse_kinematics(&pose(5.0, 5.0, 0.0, 0.0, 0.0, 0.0), &[0.0; 2], &chain)
        .unwrap();
    assert_eq!(angles.len(), 2);
}
