//! Typed kinematic substructures of a DH chain.

use crate::dh_param::DhParam;

/// A single rotational degree of freedom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevoluteJoint {
    param: DhParam,
}

impl RevoluteJoint {
    pub fn new(param: DhParam) -> Self {
        Self { param }
    }

    pub fn param(&self) -> &DhParam {
        &self.param
    }
}

/// Three consecutive revolute joints whose axes meet at one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalWrist {
    params: [DhParam; 3],
}

impl SphericalWrist {
    pub fn new(params: [DhParam; 3]) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &[DhParam; 3] {
        &self.params
    }
}

/// One classified piece of a chain. Elements own contiguous, ordered
/// copies of the chain's parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DhChainElement {
    RevoluteJoint(RevoluteJoint),
    SphericalWrist(SphericalWrist),
}

impl DhChainElement {
    /// The DH parameters this element covers, in chain order.
    pub fn params(&self) -> &[DhParam] {
        match self {
            DhChainElement::RevoluteJoint(joint) => std::slice::from_ref(&joint.param),
            DhChainElement::SphericalWrist(wrist) => &wrist.params,
        }
    }

    /// Number of links (and joint values) this element covers. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match self {
            DhChainElement::RevoluteJoint(_) => 1,
            DhChainElement::SphericalWrist(_) => 3,
        }
    }
}

impl From<RevoluteJoint> for DhChainElement {
    fn from(joint: RevoluteJoint) -> Self {
        DhChainElement::RevoluteJoint(joint)
    }
}

impl From<SphericalWrist> for DhChainElement {
    fn from(wrist: SphericalWrist) -> Self {
        DhChainElement::SphericalWrist(wrist)
    }
}
