use dh_ik::{DhChain, IkConfig, IkError, InverseKinematicsEngine, RobotConfig};
use nalgebra::{Isometry3, Translation3, UnitQuaternion};
use tracing::{info, warn};

/// Parse "x,y,z" into a target position.
fn parse_target(value: &str) -> Result<Translation3<f64>, IkError> {
    let coords = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| IkError::InvalidArgument(format!("Bad target '{}': {}", value, e)))?;

    match coords.as_slice() {
        [x, y, z] => Ok(Translation3::new(*x, *y, *z)),
        _ => Err(IkError::InvalidArgument(format!(
            "Target must be \"x,y,z\", got '{}'",
            value
        ))),
    }
}

fn main() -> Result<(), IkError> {
    tracing_subscriber::fmt::init();

    // Load configuration from environment variables with defaults
    let config = match std::env::var("DH_IK_CONFIG") {
        Ok(path) => IkConfig::from_json_file(&path)?,
        Err(_) => IkConfig::default(),
    };

    let chain = match std::env::var("DH_IK_CHAIN") {
        Ok(path) => {
            info!("Loading chain from {}", path);
            DhChain::from_json_file(&path)?
        }
        Err(_) => {
            info!("DH_IK_CHAIN not set, using the PUMA 560 preset");
            RobotConfig::puma_560().chain
        }
    };

    let target = std::env::var("DH_IK_TARGET").unwrap_or_else(|_| "0.35,0.2,0.3".to_string());
    let target = Isometry3::from_parts(parse_target(&target)?, UnitQuaternion::identity());

    let engine = InverseKinematicsEngine::from_config(&config);
    let current = vec![0.0; chain.len()];
    let solution = engine.inverse_kinematics_with_error(&target, &current, &chain)?;

    if solution.solve_error > config.solver.solve_distance_threshold {
        warn!(
            "Target not reached: residual {:.6} above threshold {}",
            solution.solve_error, config.solver.solve_distance_threshold
        );
    }

    let degrees: Vec<f64> = solution.joint_angles.iter().map(|a| a.to_degrees()).collect();
    info!("Joint angles (deg): {:?}", degrees);

    let json = serde_json::to_string_pretty(&solution)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        let t = parse_target(" 1.0, -2.5,3 ").unwrap();
        assert_eq!(t.vector, nalgebra::Vector3::new(1.0, -2.5, 3.0));
    }

    #[test]
    fn test_parse_target_rejects_bad_input() {
        assert!(parse_target("1.0,2.0").is_err());
        assert!(parse_target("a,b,c").is_err());
    }
}
