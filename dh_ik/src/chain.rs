//! An ordered DH link sequence and its forward kinematics.

use std::ops::Range;

use nalgebra::Isometry3;
use serde::{Deserialize, Serialize};

use crate::dh_param::{DhConvention, DhParam, FrameTransformation};
use crate::error::IkError;

/// A serial chain of links, base first.
///
/// Chains are read-only once built; the solver never mutates them.
///
/// ```json
/// {
///   "convention": "Standard",
///   "links": [
///     { "d": 0.0, "theta": 0.0, "r": 0.4318, "alpha": 0.0 }
///   ]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DhChain {
    #[serde(default)]
    convention: DhConvention,
    links: Vec<DhParam>,
}

impl DhChain {
    pub fn new(convention: DhConvention, links: Vec<DhParam>) -> Self {
        Self { convention, links }
    }

    pub fn standard(links: Vec<DhParam>) -> Self {
        Self::new(DhConvention::Standard, links)
    }

    pub fn modified(links: Vec<DhParam>) -> Self {
        Self::new(DhConvention::Modified, links)
    }

    pub fn from_json_str(json: &str) -> Result<Self, IkError> {
        let chain: DhChain = serde_json::from_str(json)?;
        chain.validate()?;
        Ok(chain)
    }

    pub fn from_json_file(path: &str) -> Result<Self, IkError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| IkError::Config(format!("Failed to read {}: {}", path, e)))?;
        Self::from_json_str(&json)
    }

    /// Every parameter must be finite.
    pub fn validate(&self) -> Result<(), IkError> {
        match self.links.iter().position(|link| !link.is_finite()) {
            Some(index) => Err(IkError::InvalidArgument(format!(
                "Link {} has non-finite DH parameters",
                index
            ))),
            None => Ok(()),
        }
    }

    pub fn convention(&self) -> DhConvention {
        self.convention
    }

    pub fn links(&self) -> &[DhParam] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Fails unless there is exactly one joint value per link.
    pub fn check_joint_vector(&self, joint_values: &[f64]) -> Result<(), IkError> {
        if joint_values.len() != self.links.len() {
            return Err(IkError::InvalidArgument(format!(
                "The joint angles and DH params must have equal size ({} joint values, {} links)",
                joint_values.len(),
                self.links.len()
            )));
        }
        Ok(())
    }

    /// Pose of the last link's frame in the base frame.
    pub fn forward_kinematics(&self, joint_values: &[f64]) -> Result<Isometry3<f64>, IkError> {
        self.check_joint_vector(joint_values)?;
        Ok(self.frame_between(0..self.links.len(), joint_values).to_isometry())
    }

    /// Composed transform of the links in `range`.
    ///
    /// `joint_values` holds one value per link of the whole chain. Links
    /// outside the chain are ignored.
    pub fn frame_between(&self, range: Range<usize>, joint_values: &[f64]) -> FrameTransformation {
        let end = range.end.min(self.links.len()).min(joint_values.len());
        let start = range.start.min(end);

        self.links[start..end]
            .iter()
            .zip(&joint_values[start..end])
            .fold(FrameTransformation::identity(), |acc, (link, &q)| {
                acc * link.frame_transformation_at(self.convention, q)
            })
    }
}
