//! Pose to joint angles.
//!
//! The engine solves the whole chain's position with the iterative solver,
//! then replaces the angles of every spherical wrist with the closed-form
//! solution for the target orientation. A wrist that cannot be solved stops
//! the call: guessing an orientation is unsafe on a physical arm, so there is
//! no silent fallback to the iterative angles.

use nalgebra::{Isometry3, Rotation3};
use tracing::{debug, info};

use crate::chain::DhChain;
use crate::classifier::{ChainIdentifier, DhChainIdentifier};
use crate::config::IkConfig;
use crate::element::DhChainElement;
use crate::error::IkError;
use crate::solver::{BoneChainFactory, FabrikChainFactory, IkSolution, IterativePoseSolver};
use crate::wrist::{DhWristSolver, WristSolver};

/// Stateless inverse kinematics solver; safe to share between threads when
/// its parts are.
#[derive(Debug, Clone)]
pub struct InverseKinematicsEngine<I = DhChainIdentifier, W = DhWristSolver, F = FabrikChainFactory> {
    identifier: I,
    wrist_solver: W,
    pose_solver: IterativePoseSolver<F>,
}

impl InverseKinematicsEngine {
    pub fn from_config(config: &IkConfig) -> Self {
        Self::new(
            DhChainIdentifier::new(config.classifier_tolerance),
            DhWristSolver::new(config.wrist_tolerance),
            IterativePoseSolver::new(
                FabrikChainFactory::new(config.solver.clone()),
                config.default_bone_length,
            ),
        )
    }
}

impl Default for InverseKinematicsEngine {
    fn default() -> Self {
        Self::from_config(&IkConfig::default())
    }
}

impl<I, W, F> InverseKinematicsEngine<I, W, F>
where
    I: ChainIdentifier,
    W: WristSolver,
    F: BoneChainFactory,
{
    pub fn new(identifier: I, wrist_solver: W, pose_solver: IterativePoseSolver<F>) -> Self {
        Self {
            identifier,
            wrist_solver,
            pose_solver,
        }
    }

    /// Joint angles that bring the chain's end to `target`.
    pub fn inverse_kinematics(
        &self,
        target: &Isometry3<f64>,
        joint_space_vector: &[f64],
        chain: &DhChain,
    ) -> Result<Vec<f64>, IkError> {
        self.inverse_kinematics_with_error(target, joint_space_vector, chain)
            .map(|solution| solution.joint_angles)
    }

    /// Like [`inverse_kinematics`](Self::inverse_kinematics), also reporting
    /// the position residual. Callers should compare `solve_error` against
    /// their own tolerance; non-convergence is not an error.
    pub fn inverse_kinematics_with_error(
        &self,
        target: &Isometry3<f64>,
        joint_space_vector: &[f64],
        chain: &DhChain,
    ) -> Result<IkSolution, IkError> {
        chain.check_joint_vector(joint_space_vector)?;
        chain.validate()?;

        let elements = self.identifier.identify_chain(chain.convention(), chain.links());
        debug!(
            links = chain.len(),
            elements = elements.len(),
            wrists = elements
                .iter()
                .filter(|e| matches!(e, DhChainElement::SphericalWrist(_)))
                .count(),
            "classified chain"
        );

        let mut solution = self
            .pose_solver
            .solve(&target.translation.vector, chain, joint_space_vector)?;

        let target_rotation = target.rotation.to_rotation_matrix();
        let mut offset = 0;
        for element in &elements {
            if let DhChainElement::SphericalWrist(wrist) = element {
                let end = offset + element.len();
                let desired = self.wrist_rotation(chain, offset..end, &solution.joint_angles, &target_rotation);

                let angles = self
                    .wrist_solver
                    .derive_euler_angles(wrist, chain.convention(), &desired)?;
                let values = self.wrist_solver.joint_values(wrist, chain.convention(), &angles);
                debug!(first_link = offset, ?values, "solved spherical wrist");

                solution.joint_angles[offset..end].copy_from_slice(&values);
            }
            offset += element.len();
        }

        info!(
            links = chain.len(),
            solve_error = solution.solve_error,
            "inverse kinematics solved"
        );
        Ok(solution)
    }

    /// Rotation the links in `wrist` must contribute so that the whole chain,
    /// with every other link at `joint_angles`, reaches `target`.
    fn wrist_rotation(
        &self,
        chain: &DhChain,
        wrist: std::ops::Range<usize>,
        joint_angles: &[f64],
        target: &Rotation3<f64>,
    ) -> Rotation3<f64> {
        let before = chain.frame_between(0..wrist.start, joint_angles).rotation();
        let after = chain.frame_between(wrist.end..chain.len(), joint_angles).rotation();
        before.inverse() * target * after.inverse()
    }
}
