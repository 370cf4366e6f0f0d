//! Adapter between a DH chain and an iterative bone-chain solver.
//!
//! Every DH link becomes one bone. Bone lengths come from the links'
//! translations; the bones themselves are laid out along [`FORWARD_AXIS`] and
//! every joint after the base is a hinge about [`UP_AXIS`] carried along by
//! its parent. DH parameters alone do not say whether a joint acts along the
//! link's `r` or `d` direction, nor what its limits are, so this layout is an
//! approximation of the real arm: it targets the position only, and the
//! angles it reports are the unsigned angles between consecutive bones.

use fabrik::{FabrikChain3D, FabrikConfig, JointConstraint};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chain::DhChain;
use crate::error::IkError;

/// Direction every bone starts in.
pub const FORWARD_AXIS: Vector3<f64> = Vector3::new(1.0, 0.0, 0.0);
/// Hinge axis of every joint after the base.
pub const UP_AXIS: Vector3<f64> = Vector3::new(0.0, 0.0, 1.0);
/// Reference direction the first joint's angle is measured from.
pub const BASE_DIRECTION: Vector3<f64> = Vector3::new(0.0, 0.0, 1.0);

/// How a hinge axis is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HingeKind {
    /// Fixed in the parent bone's frame.
    Local,
    /// Fixed in the world frame.
    Global,
}

/// What the adapter needs from an iterative solver.
pub trait BoneChain {
    fn set_fixed_base_mode(&mut self, fixed: bool);

    /// Start the chain at the origin.
    fn add_first_bone(&mut self, direction: Vector3<f64>, length: f64) -> Result<(), IkError>;

    /// Attach a bone to the end of the chain, rotating about `axis`.
    fn add_hinged_bone(
        &mut self,
        direction: Vector3<f64>,
        length: f64,
        kind: HingeKind,
        axis: Vector3<f64>,
    ) -> Result<(), IkError>;

    /// Residual distance between the chain's end and `target` after solving.
    fn solve_for_target(&mut self, target: &Vector3<f64>) -> f64;

    /// Direction of every bone, base first.
    fn directions(&self) -> Vec<Vector3<f64>>;
}

/// Creates a fresh, empty [`BoneChain`] per solve.
pub trait BoneChainFactory {
    type Chain: BoneChain;

    fn create(&self) -> Self::Chain;
}

impl BoneChain for FabrikChain3D {
    fn set_fixed_base_mode(&mut self, fixed: bool) {
        FabrikChain3D::set_fixed_base_mode(self, fixed);
    }

    fn add_first_bone(&mut self, direction: Vector3<f64>, length: f64) -> Result<(), IkError> {
        FabrikChain3D::add_base_bone(self, Vector3::zeros(), direction, length, JointConstraint::Ball)?;
        Ok(())
    }

    fn add_hinged_bone(
        &mut self,
        direction: Vector3<f64>,
        length: f64,
        kind: HingeKind,
        axis: Vector3<f64>,
    ) -> Result<(), IkError> {
        let constraint = match kind {
            HingeKind::Local => JointConstraint::local_hinge(axis)?,
            HingeKind::Global => JointConstraint::global_hinge(axis)?,
        };
        FabrikChain3D::add_consecutive_bone(self, direction, length, constraint)?;
        Ok(())
    }

    fn solve_for_target(&mut self, target: &Vector3<f64>) -> f64 {
        FabrikChain3D::solve_for_target(self, target)
    }

    fn directions(&self) -> Vec<Vector3<f64>> {
        FabrikChain3D::directions(self)
    }
}

/// Builds [`FabrikChain3D`] chains with a fixed solver configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FabrikChainFactory {
    config: FabrikConfig,
}

impl FabrikChainFactory {
    pub fn new(config: FabrikConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FabrikConfig {
        &self.config
    }
}

impl BoneChainFactory for FabrikChainFactory {
    type Chain = FabrikChain3D;

    fn create(&self) -> FabrikChain3D {
        FabrikChain3D::new(self.config.clone())
    }
}

/// Joint angles and the residual of the solve that produced them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IkSolution {
    /// One angle per link, radians, base first.
    pub joint_angles: Vec<f64>,
    /// Distance between the reached and the requested position. Never negative.
    pub solve_error: f64,
}

/// Solves a DH chain for a target position with an iterative bone solver.
#[derive(Debug, Clone)]
pub struct IterativePoseSolver<F = FabrikChainFactory> {
    factory: F,
    default_bone_length: f64,
}

impl<F: BoneChainFactory> IterativePoseSolver<F> {
    pub const DEFAULT_BONE_LENGTH: f64 = 10.0;

    pub fn new(factory: F, default_bone_length: f64) -> Self {
        Self {
            factory,
            default_bone_length,
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn default_bone_length(&self) -> f64 {
        self.default_bone_length
    }

    /// Solve `chain` so that its end reaches `target`.
    ///
    /// `joint_space_vector` only has to match the chain's length; the solve
    /// always starts from the bones' rest layout.
    pub fn solve(
        &self,
        target: &Vector3<f64>,
        chain: &DhChain,
        joint_space_vector: &[f64],
    ) -> Result<IkSolution, IkError> {
        chain.check_joint_vector(joint_space_vector)?;

        let links = chain.links();
        let Some(last) = links.len().checked_sub(1) else {
            return Ok(IkSolution {
                joint_angles: Vec::new(),
                solve_error: sanitize_error(target.norm()),
            });
        };

        let mut bones = self.factory.create();
        bones.set_fixed_base_mode(true);

        for (index, link) in links.iter().enumerate() {
            // The last link has nothing downstream to measure
            let length = if index == last {
                self.default_bone_length
            } else {
                link.link_length(chain.convention(), self.default_bone_length)
            };

            if index == 0 {
                bones.add_first_bone(FORWARD_AXIS, length)?;
            } else {
                bones.add_hinged_bone(FORWARD_AXIS, length, HingeKind::Local, UP_AXIS)?;
            }
        }

        let residual = bones.solve_for_target(target);
        let directions = bones.directions();
        if directions.len() != links.len() {
            return Err(IkError::Solver(format!(
                "Solver returned {} bone directions for {} links",
                directions.len(),
                links.len()
            )));
        }

        let joint_angles = angles_between(&BASE_DIRECTION, &directions);
        let solve_error = sanitize_error(residual);
        if residual.is_nan() {
            warn!("iterative solver reported a NaN residual");
        }
        debug!(links = links.len(), solve_error, "iterative solve finished");

        Ok(IkSolution {
            joint_angles,
            solve_error,
        })
    }
}

impl Default for IterativePoseSolver<FabrikChainFactory> {
    fn default() -> Self {
        Self::new(FabrikChainFactory::default(), Self::DEFAULT_BONE_LENGTH)
    }
}

/// Angle between each pair of consecutive directions, with `base` in front.
///
/// Degenerate pairs (a zero or non-finite vector) give `0.0`.
pub fn angles_between(base: &Vector3<f64>, directions: &[Vector3<f64>]) -> Vec<f64> {
    std::iter::once(base)
        .chain(directions)
        .zip(directions)
        .map(|(a, b)| {
            let cos = a.dot(b) / (a.norm() * b.norm());
            let angle = cos.clamp(-1.0, 1.0).acos();
            if angle.is_finite() {
                angle
            } else {
                0.0
            }
        })
        .collect()
}

fn sanitize_error(error: f64) -> f64 {
    if error.is_nan() {
        f64::INFINITY
    } else {
        error.max(0.0)
    }
}
