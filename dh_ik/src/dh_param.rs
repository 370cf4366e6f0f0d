//! Denavit-Hartenberg link parameters and the homogeneous transforms they
//! describe.

use std::ops::Mul;

use nalgebra::{Isometry3, Matrix4, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Translations shorter than this are treated as zero.
const MIN_LINK_LENGTH: f64 = 1e-9;

/// Ordering of the four elementary motions within one link transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DhConvention {
    /// Classic DH: `Rz(theta) * Tz(d) * Tx(r) * Rx(alpha)`.
    /// Joint `i` rotates about the z axis of frame `i - 1`.
    #[default]
    Standard,
    /// Modified (Craig) DH: `Rx(alpha) * Tx(r) * Rz(theta) * Tz(d)`, where
    /// `r` and `alpha` describe the preceding link. Joint `i` rotates about
    /// the z axis of frame `i`.
    Modified,
}

/// Parameters of a single link.
///
/// | field   | meaning                          |
/// |---------|----------------------------------|
/// | `d`     | offset along the joint axis      |
/// | `theta` | joint angle (home offset)        |
/// | `r`     | link length along the common normal |
/// | `alpha` | twist between consecutive axes   |
///
/// Angles are in radians. For a revolute joint the solved joint value is
/// added to `theta`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DhParam {
    pub d: f64,
    pub theta: f64,
    pub r: f64,
    pub alpha: f64,
}

impl DhParam {
    pub const fn new(d: f64, theta: f64, r: f64, alpha: f64) -> Self {
        Self { d, theta, r, alpha }
    }

    /// Same as [`DhParam::new`] with both angles given in degrees.
    pub fn from_degrees(d: f64, theta_deg: f64, r: f64, alpha_deg: f64) -> Self {
        Self::new(d, theta_deg.to_radians(), r, alpha_deg.to_radians())
    }

    pub fn is_finite(&self) -> bool {
        self.d.is_finite() && self.theta.is_finite() && self.r.is_finite() && self.alpha.is_finite()
    }

    /// Transform of this link at its home angle.
    pub fn frame_transformation(&self, convention: DhConvention) -> FrameTransformation {
        self.frame_transformation_at(convention, 0.0)
    }

    /// Transform of this link with `joint_value` added to `theta`.
    pub fn frame_transformation_at(&self, convention: DhConvention, joint_value: f64) -> FrameTransformation {
        let theta = self.theta + joint_value;
        match convention {
            DhConvention::Standard => FrameTransformation::standard(self.d, theta, self.r, self.alpha),
            DhConvention::Modified => FrameTransformation::modified(self.d, theta, self.r, self.alpha),
        }
    }

    /// Physical length of the link: the distance the link's transform moves
    /// the origin. A link that moves nothing gets `default_length` instead,
    /// so the result is never zero.
    pub fn link_length(&self, convention: DhConvention, default_length: f64) -> f64 {
        let before = Point3::origin();
        let after = self.frame_transformation(convention).transform_point(&before);
        let length = nalgebra::distance(&before, &after);

        if !length.is_finite() || length < MIN_LINK_LENGTH {
            default_length
        } else {
            length
        }
    }
}

/// A 4x4 homogeneous transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransformation(Matrix4<f64>);

impl FrameTransformation {
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self(matrix)
    }

    /// Classic DH link transform.
    pub fn standard(d: f64, theta: f64, r: f64, alpha: f64) -> Self {
        let (st, ct) = theta.sin_cos();
        let (sa, ca) = alpha.sin_cos();

        Self(Matrix4::new(
            ct, -st * ca, st * sa, r * ct,
            st, ct * ca, -ct * sa, r * st,
            0.0, sa, ca, d,
            0.0, 0.0, 0.0, 1.0,
        ))
    }

    /// Modified DH link transform.
    pub fn modified(d: f64, theta: f64, r: f64, alpha: f64) -> Self {
        let (st, ct) = theta.sin_cos();
        let (sa, ca) = alpha.sin_cos();

        Self(Matrix4::new(
            ct, -st, 0.0, r,
            st * ca, ct * ca, -sa, -d * sa,
            st * sa, ct * sa, ca, d * ca,
            0.0, 0.0, 0.0, 1.0,
        ))
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.0
    }

    /// `self` followed by `other`.
    pub fn compose(&self, other: &FrameTransformation) -> FrameTransformation {
        Self(self.0 * other.0)
    }

    /// The translation column.
    pub fn translation(&self) -> Vector3<f64> {
        Vector3::new(self.0[(0, 3)], self.0[(1, 3)], self.0[(2, 3)])
    }

    /// The upper-left 3x3 block.
    pub fn rotation(&self) -> Rotation3<f64> {
        Rotation3::from_matrix_unchecked(self.0.fixed_view::<3, 3>(0, 0).into_owned())
    }

    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.0.transform_point(point)
    }

    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::from(self.translation()),
            UnitQuaternion::from_rotation_matrix(&self.rotation()),
        )
    }
}

impl Default for FrameTransformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for FrameTransformation {
    type Output = FrameTransformation;

    fn mul(self, rhs: FrameTransformation) -> FrameTransformation {
        self.compose(&rhs)
    }
}

/// Wrap an angle into `(-pi, pi]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    let mut normalized = angle % two_pi;
    if normalized > std::f64::consts::PI {
        normalized -= two_pi;
    } else if normalized <= -std::f64::consts::PI {
        normalized += two_pi;
    }
    normalized
}
