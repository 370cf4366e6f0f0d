//! Forward And Backward Reaching Inverse Kinematics (FABRIK) over chains of
//! rigid 3D bones.
//!
//! A [`FabrikChain3D`] is built bone by bone: a base bone anchored at a
//! start location, then consecutive bones attached to the end of the
//! previous one. Each bone carries a [`JointConstraint`] describing how it
//! may rotate relative to its parent.
//!
//! ```rust,ignore
//! use fabrik::{FabrikChain3D, JointConstraint};
//! use nalgebra::Vector3;
//!
//! let mut chain = FabrikChain3D::with_defaults();
//! chain.set_fixed_base_mode(true);
//! chain.add_base_bone(Vector3::zeros(), Vector3::x(), 1.0, JointConstraint::Ball)?;
//! chain.add_consecutive_bone(Vector3::x(), 1.0, JointConstraint::local_hinge(Vector3::z())?)?;
//!
//! let residual = chain.solve_for_target(&Vector3::new(0.5, 1.2, 0.0));
//! ```
//!
//! The solver only targets a position; orientation of the end effector is
//! not constrained.

pub mod bone;
pub mod chain;
pub mod config;
pub mod error;

pub use bone::{FabrikBone3D, JointConstraint};
pub use chain::FabrikChain3D;
pub use config::FabrikConfig;
pub use error::FabrikError;
