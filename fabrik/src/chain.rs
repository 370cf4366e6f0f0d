//! The bone chain and its iterative solve.
//!
//! Each iteration runs a backward pass (effector to base, dragging every
//! bone toward the target) followed by a forward pass (base to effector,
//! re-anchoring the chain and enforcing joint constraints). The best
//! configuration seen over all iterations is kept.

use nalgebra::{UnitQuaternion, UnitVector3, Vector3};
use tracing::{debug, trace};

use crate::bone::{FabrikBone3D, JointConstraint};
use crate::config::FabrikConfig;
use crate::error::FabrikError;

const MIN_VECTOR_NORM: f64 = 1e-12;

/// An ordered chain of bones from base to end effector.
#[derive(Debug, Clone)]
pub struct FabrikChain3D {
    bones: Vec<FabrikBone3D>,
    fixed_base: bool,
    base_location: Vector3<f64>,
    config: FabrikConfig,
    last_iterations: u32,
}

impl FabrikChain3D {
    pub fn new(config: FabrikConfig) -> Self {
        Self {
            bones: Vec::new(),
            fixed_base: true,
            base_location: Vector3::zeros(),
            config,
            last_iterations: 0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FabrikConfig::default())
    }

    /// When fixed, the base bone's start never moves during a solve.
    pub fn set_fixed_base_mode(&mut self, fixed: bool) {
        self.fixed_base = fixed;
    }

    pub fn is_fixed_base(&self) -> bool {
        self.fixed_base
    }

    pub fn config(&self) -> &FabrikConfig {
        &self.config
    }

    pub fn bones(&self) -> &[FabrikBone3D] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Number of passes used by the most recent solve.
    pub fn last_iterations(&self) -> u32 {
        self.last_iterations
    }

    /// Start the chain with a bone anchored at `start`.
    ///
    /// Any bones already present are discarded.
    pub fn add_base_bone(
        &mut self,
        start: Vector3<f64>,
        direction: Vector3<f64>,
        length: f64,
        constraint: JointConstraint,
    ) -> Result<(), FabrikError> {
        let bone = FabrikBone3D::new(start, direction, length, constraint)?;
        self.bones.clear();
        self.base_location = start;
        self.bones.push(bone);
        Ok(())
    }

    /// Attach a bone to the end of the last bone in the chain.
    pub fn add_consecutive_bone(
        &mut self,
        direction: Vector3<f64>,
        length: f64,
        constraint: JointConstraint,
    ) -> Result<(), FabrikError> {
        let start = self.bones.last().ok_or(FabrikError::EmptyChain)?.end;
        let bone = FabrikBone3D::new(start, direction, length, constraint)?;
        self.bones.push(bone);
        Ok(())
    }

    /// Current unit direction of every bone, base first.
    pub fn directions(&self) -> Vec<Vector3<f64>> {
        self.bones.iter().map(FabrikBone3D::direction).collect()
    }

    pub fn effector_location(&self) -> Option<Vector3<f64>> {
        self.bones.last().map(|bone| bone.end)
    }

    /// Sum of all bone lengths.
    pub fn chain_length(&self) -> f64 {
        self.bones.iter().map(FabrikBone3D::length).sum()
    }

    /// Move the chain so its end effector approaches `target`.
    ///
    /// Returns the distance between the end effector and the target for the
    /// best configuration found. The chain is left in that configuration.
    pub fn solve_for_target(&mut self, target: &Vector3<f64>) -> f64 {
        self.last_iterations = 0;

        let Some(effector) = self.effector_location() else {
            return (target - self.base_location).norm();
        };

        let mut best_distance = (effector - target).norm();
        if best_distance <= self.config.solve_distance_threshold {
            return best_distance;
        }

        let mut best_bones = self.bones.clone();
        let mut last_distance = best_distance;

        for iteration in 0..self.config.max_iterations {
            let distance = self.solve_iteration(target);
            self.last_iterations = iteration + 1;
            trace!(iteration, distance, "fabrik pass");

            if distance < best_distance {
                best_distance = distance;
                best_bones.clone_from(&self.bones);

                if distance <= self.config.solve_distance_threshold {
                    break;
                }
            }

            if (last_distance - distance).abs() < self.config.min_iteration_change {
                debug!(iteration, distance, "fabrik solve stalled");
                break;
            }
            last_distance = distance;
        }

        self.bones = best_bones;
        debug!(
            iterations = self.last_iterations,
            residual = best_distance,
            "fabrik solve finished"
        );
        best_distance
    }

    /// One backward pass followed by one forward pass. Returns the residual.
    fn solve_iteration(&mut self, target: &Vector3<f64>) -> f64 {
        let count = self.bones.len();
        let before = self.directions();

        // Backward: pin the effector to the target and pull each bone after it.
        for i in (0..count).rev() {
            let end = if i == count - 1 {
                *target
            } else {
                self.bones[i + 1].start
            };
            let bone = &mut self.bones[i];
            let toward_start = (bone.start - end)
                .try_normalize(MIN_VECTOR_NORM)
                .unwrap_or_else(|| -bone.direction());
            bone.end = end;
            bone.start = end + toward_start * bone.length();
        }

        // Forward: re-anchor at the base and push each bone outward.
        for i in 0..count {
            let start = match i {
                0 if self.fixed_base => self.base_location,
                0 => self.bones[0].start,
                _ => self.bones[i - 1].end,
            };
            let previous = before[i];
            let desired = (self.bones[i].end - start)
                .try_normalize(MIN_VECTOR_NORM)
                .unwrap_or(previous);
            let direction = self.constrain(i, desired, previous);

            let bone = &mut self.bones[i];
            bone.start = start;
            bone.end = start + direction * bone.length();
        }

        if !self.fixed_base {
            self.base_location = self.bones[0].start;
        }

        (self.bones[count - 1].end - target).norm()
    }

    /// Apply bone `i`'s joint constraint to a desired direction.
    fn constrain(&self, i: usize, desired: Vector3<f64>, previous: Vector3<f64>) -> Vector3<f64> {
        let axis = match self.bones[i].constraint() {
            JointConstraint::Ball => return desired,
            JointConstraint::GlobalHinge(axis) => axis.into_inner(),
            JointConstraint::LocalHinge(axis) if i == 0 => axis.into_inner(),
            JointConstraint::LocalHinge(axis) => {
                let parent = &self.bones[i - 1];
                parent_rotation(&parent.rest_direction(), &parent.direction()) * axis.into_inner()
            }
        };

        project_onto_plane(&desired, &axis)
            .or_else(|| project_onto_plane(&previous, &axis))
            .unwrap_or_else(|| any_perpendicular(&axis))
    }
}

/// Rotation carrying a parent's rest direction onto its current direction.
fn parent_rotation(rest: &UnitVector3<f64>, current: &Vector3<f64>) -> UnitQuaternion<f64> {
    let rest = rest.into_inner();
    UnitQuaternion::rotation_between(&rest, current).unwrap_or_else(|| {
        // Antiparallel: any half turn about an axis perpendicular to rest works
        let axis = UnitVector3::new_normalize(any_perpendicular(&rest));
        UnitQuaternion::from_axis_angle(&axis, std::f64::consts::PI)
    })
}

/// Unit component of `v` perpendicular to `normal`, if any.
fn project_onto_plane(v: &Vector3<f64>, normal: &Vector3<f64>) -> Option<Vector3<f64>> {
    (v - normal * v.dot(normal)).try_normalize(MIN_VECTOR_NORM)
}

fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let helper = if v.z.abs() < 0.9 { Vector3::z() } else { Vector3::x() };
    v.cross(&helper).normalize()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
