// Inverse kinematics for serial arms described by Denavit-Hartenberg parameters

pub mod dh_param;
pub mod chain;
pub mod element;
pub mod classifier;
pub mod wrist;
pub mod solver;
pub mod engine;
pub mod config;
pub mod error;
pub mod robot_config;

pub use chain::DhChain;
pub use classifier::{ChainIdentifier, DhChainIdentifier};
pub use config::IkConfig;
pub use dh_param::{normalize_angle, DhConvention, DhParam, FrameTransformation};
pub use element::{DhChainElement, RevoluteJoint, SphericalWrist};
pub use engine::InverseKinematicsEngine;
pub use error::{ClassifierError, IkError};
pub use robot_config::{RobotConfig, RobotModel};
pub use solver::{BoneChain, BoneChainFactory, FabrikChainFactory, HingeKind, IkSolution, IterativePoseSolver};
pub use wrist::{DhWristSolver, EulerAngles, WristSolver};
