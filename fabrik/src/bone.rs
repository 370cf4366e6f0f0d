use nalgebra::{UnitVector3, Vector3};

use crate::error::FabrikError;

const MIN_VECTOR_NORM: f64 = 1e-12;

/// How a bone may rotate about the end of its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointConstraint {
    /// Unconstrained rotation.
    Ball,
    /// Rotation about a fixed world-space axis.
    GlobalHinge(UnitVector3<f64>),
    /// Rotation about an axis attached to the parent bone. The axis is given
    /// in world space for the parent's rest direction and is carried along
    /// as the parent rotates.
    LocalHinge(UnitVector3<f64>),
}

impl JointConstraint {
    pub fn global_hinge(axis: Vector3<f64>) -> Result<Self, FabrikError> {
        Ok(JointConstraint::GlobalHinge(unit(axis, "hinge axis")?))
    }

    pub fn local_hinge(axis: Vector3<f64>) -> Result<Self, FabrikError> {
        Ok(JointConstraint::LocalHinge(unit(axis, "hinge axis")?))
    }
}

/// A rigid segment of fixed length between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct FabrikBone3D {
    pub(crate) start: Vector3<f64>,
    pub(crate) end: Vector3<f64>,
    length: f64,
    rest_direction: UnitVector3<f64>,
    constraint: JointConstraint,
}

impl FabrikBone3D {
    /// Create a bone starting at `start` and pointing along `direction`.
    pub fn new(
        start: Vector3<f64>,
        direction: Vector3<f64>,
        length: f64,
        constraint: JointConstraint,
    ) -> Result<Self, FabrikError> {
        if !length.is_finite() || length <= 0.0 {
            return Err(FabrikError::InvalidLength(length));
        }
        let rest_direction = unit(direction, "bone direction")?;

        Ok(Self {
            start,
            end: start + rest_direction.into_inner() * length,
            length,
            rest_direction,
            constraint,
        })
    }

    pub fn start(&self) -> Vector3<f64> {
        self.start
    }

    pub fn end(&self) -> Vector3<f64> {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn constraint(&self) -> JointConstraint {
        self.constraint
    }

    /// Direction the bone had when it was created.
    pub fn rest_direction(&self) -> UnitVector3<f64> {
        self.rest_direction
    }

    /// Current unit direction from start to end.
    pub fn direction(&self) -> Vector3<f64> {
        (self.end - self.start)
            .try_normalize(MIN_VECTOR_NORM)
            .unwrap_or_else(|| self.rest_direction.into_inner())
    }
}

fn unit(v: Vector3<f64>, what: &'static str) -> Result<UnitVector3<f64>, FabrikError> {
    if !v.iter().all(|c| c.is_finite()) {
        return Err(FabrikError::ZeroVector(what));
    }
    UnitVector3::try_new(v, MIN_VECTOR_NORM).ok_or(FabrikError::ZeroVector(what))
}
