//! Closed-form orientation of a spherical wrist.
//!
//! With its translations dropped, a wrist is
//! `pre * Rz(θa) Rx(t1) Rz(θb) Rx(t2) Rz(θc) * post`, where `pre` and `post`
//! are the twists that sit outside the three joints (they depend on the DH
//! convention) and `t1`, `t2` are the twists between consecutive joint axes.
//! When both inner twists are ±90° this reduces to a Z-Y-Z Euler rotation:
//!
//! ```text
//! Rx(t1) Rz(θb) Rx(t2) = Ry(-sign(sin t1) θb) Rx(t1 + t2)
//! Rx(t1 + t2) Rz(θc)   = Rz(sign(cos(t1 + t2)) θc) Rx(t1 + t2)
//! ```

use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::dh_param::{normalize_angle, DhConvention, DhParam};
use crate::element::SphericalWrist;
use crate::error::ClassifierError;

/// Z-Y-Z Euler angles, `R = Rz(phi) * Ry(theta) * Rz(psi)`, radians.
///
/// `theta` is always in `(0, pi)` for a non-singular orientation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    pub phi: f64,
    pub theta: f64,
    pub psi: f64,
}

impl EulerAngles {
    pub fn new(phi: f64, theta: f64, psi: f64) -> Self {
        Self { phi, theta, psi }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.phi, self.theta, self.psi]
    }

    pub fn to_rotation(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::z_axis(), self.phi)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.theta)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.psi)
    }
}

/// Derives Euler angles for a spherical wrist.
pub trait WristSolver {
    /// Euler angles of the rotation the wrist's joints must produce so that
    /// the three wrist links, together, rotate by `desired`.
    fn derive_euler_angles(
        &self,
        wrist: &SphericalWrist,
        convention: DhConvention,
        desired: &Rotation3<f64>,
    ) -> Result<EulerAngles, ClassifierError>;

    /// Joint values of the three wrist joints for the given Euler angles,
    /// home offsets removed, each in `(-pi, pi]`.
    fn joint_values(&self, wrist: &SphericalWrist, convention: DhConvention, angles: &EulerAngles) -> [f64; 3] {
        let split = WristSplit::new(wrist.params(), convention);
        let [a, b, c] = wrist.params();

        let theta_a = angles.phi;
        let theta_b = -split.t1.sin().signum() * angles.theta;
        let theta_c = (split.t1 + split.t2).cos().signum() * angles.psi;

        [
            normalize_angle(theta_a - a.theta),
            normalize_angle(theta_b - b.theta),
            normalize_angle(theta_c - c.theta),
        ]
    }
}

/// Analytic wrist solver for orthogonal wrists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhWristSolver {
    tolerance: f64,
}

impl DhWristSolver {
    pub const DEFAULT_TOLERANCE: f64 = 1e-6;

    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for DhWristSolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOLERANCE)
    }
}

impl WristSolver for DhWristSolver {
    fn derive_euler_angles(
        &self,
        wrist: &SphericalWrist,
        convention: DhConvention,
        desired: &Rotation3<f64>,
    ) -> Result<EulerAngles, ClassifierError> {
        let params = wrist.params();
        if !params.iter().all(DhParam::is_finite) {
            return Err(ClassifierError::InvalidWrist(
                "wrist has non-finite DH parameters".to_string(),
            ));
        }
        if !desired.matrix().iter().all(|v| v.is_finite()) {
            return Err(ClassifierError::InvalidWrist(
                "desired orientation is not finite".to_string(),
            ));
        }

        let split = WristSplit::new(params, convention);
        for (index, twist) in [split.t1, split.t2].into_iter().enumerate() {
            if (twist.sin().abs() - 1.0).abs() > self.tolerance {
                return Err(ClassifierError::AxesNotOrthogonal(format!(
                    "twist {} of the wrist is {:.6} rad, expected +-pi/2",
                    index + 1,
                    twist
                )));
            }
        }

        let unwind = Rotation3::from_axis_angle(&Vector3::x_axis(), -(split.t1 + split.t2));
        let zyz = split.pre.inverse() * desired * split.post.inverse() * unwind;
        let m = zyz.matrix();

        let sin_theta = m[(0, 2)].hypot(m[(1, 2)]);
        if sin_theta < self.tolerance {
            return Err(ClassifierError::Singular(format!(
                "middle wrist axis is aligned with the outer axes (sin = {:.3e})",
                sin_theta
            )));
        }

        Ok(EulerAngles {
            phi: m[(1, 2)].atan2(m[(0, 2)]),
            theta: sin_theta.atan2(m[(2, 2)]),
            psi: m[(2, 1)].atan2(-m[(2, 0)]),
        })
    }
}

/// The fixed twists around and between the three wrist joints.
struct WristSplit {
    pre: Rotation3<f64>,
    t1: f64,
    t2: f64,
    post: Rotation3<f64>,
}

impl WristSplit {
    fn new(params: &[DhParam; 3], convention: DhConvention) -> Self {
        let [a, b, c] = params;
        let rx = |angle: f64| Rotation3::from_axis_angle(&Vector3::x_axis(), angle);

        match convention {
            DhConvention::Standard => Self {
                pre: Rotation3::identity(),
                t1: a.alpha,
                t2: b.alpha,
                post: rx(c.alpha),
            },
            DhConvention::Modified => Self {
                pre: rx(a.alpha),
                t1: b.alpha,
                t2: c.alpha,
                post: Rotation3::identity(),
            },
        }
    }
}
