//! Partition a DH parameter sequence into revolute joints and spherical
//! wrists.
//!
//! The scan is greedy and left to right with a three-link lookahead: a
//! window that forms a spherical wrist is always taken as one wrist, even
//! when its links could also be read as three independent joints. Anything
//! unrecognized falls back to single revolute joints, so classification
//! never fails.

use tracing::debug;

use crate::dh_param::{DhConvention, DhParam};
use crate::element::{DhChainElement, RevoluteJoint, SphericalWrist};

/// Splits a chain into typed elements.
pub trait ChainIdentifier {
    /// Returns elements whose parameters, concatenated, equal `dh_params`.
    fn identify_chain(&self, convention: DhConvention, dh_params: &[DhParam]) -> Vec<DhChainElement>;
}

/// Greedy classifier comparing DH parameters against a numeric tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhChainIdentifier {
    tolerance: f64,
}

impl DhChainIdentifier {
    pub const DEFAULT_TOLERANCE: f64 = 1e-6;

    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Whether the three links' joint axes meet at a single point.
    ///
    /// Standard DH, links `(a, b, c)` rotate about `z_{a-1}`, `z_a`, `z_b`:
    /// they are concurrent when `r_a = r_b = 0` and `d_b = 0`.
    ///
    /// Modified DH, links rotate about `z_a`, `z_b`, `z_c`: they are
    /// concurrent when `r_b = r_c = 0` and `d_b = 0`.
    ///
    /// In both cases the two twists between consecutive axes must not be a
    /// multiple of pi, otherwise two axes coincide and the wrist loses a DOF.
    pub fn is_spherical_wrist(&self, convention: DhConvention, window: &[DhParam; 3]) -> bool {
        let [a, b, c] = window;
        if !window.iter().all(DhParam::is_finite) {
            return false;
        }

        let (offsets, twists) = match convention {
            DhConvention::Standard => ([a.r, b.r, b.d], [a.alpha, b.alpha]),
            DhConvention::Modified => ([b.r, c.r, b.d], [b.alpha, c.alpha]),
        };

        offsets.iter().all(|v| v.abs() <= self.tolerance)
            && twists.iter().all(|alpha| alpha.sin().abs() > self.tolerance)
    }
}

impl Default for DhChainIdentifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOLERANCE)
    }
}

impl ChainIdentifier for DhChainIdentifier {
    fn identify_chain(&self, convention: DhConvention, dh_params: &[DhParam]) -> Vec<DhChainElement> {
        let mut elements: Vec<DhChainElement> = Vec::with_capacity(dh_params.len());
        let mut index = 0;

        while index < dh_params.len() {
            let window = dh_params
                .get(index..index + 3)
                .and_then(|slice| <[DhParam; 3]>::try_from(slice).ok());

            if let Some(window) = window {
                if self.is_spherical_wrist(convention, &window) {
                    debug!(first_link = index, "identified spherical wrist");
                    elements.push(SphericalWrist::new(window).into());
                    index += 3;
                    continue;
                }
            }

            elements.push(RevoluteJoint::new(dh_params[index]).into());
            index += 1;
        }

        elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot_config::RobotConfig;

    fn wrist_params() -> [DhParam; 3] {
        [
            DhParam::from_degrees(0.4318, 0.0, 0.0, 90.0),
            DhParam::from_degrees(0.0, 0.0, 0.0, -90.0),
            DhParam::from_degrees(0.05, 0.0, 0.0, 0.0),
        ]
    }

    fn arm_link(r: f64) -> DhParam {
        DhParam::from_degrees(0.0, 0.0, r, 0.0)
    }

    fn flatten(elements: &[DhChainElement]) -> Vec<DhParam> {
        elements.iter().flat_map(|e| e.params().iter().copied()).collect()
    }

    #[test]
    fn empty_chain_gives_empty_classification() {
        let elements = DhChainIdentifier::default().identify_chain(DhConvention::Standard, &[]);
        assert!(elements.is_empty());
    }

    #[test]
    fn short_chains_are_revolute_only() {
        let identifier = DhChainIdentifier::default();
        let wrist = wrist_params();
        for len in 1..3 {
            let elements = identifier.identify_chain(DhConvention::Standard, &wrist[..len]);
            assert_eq!(elements.len(), len);
            assert!(elements.iter().all(|e| matches!(e, DhChainElement::RevoluteJoint(_))));
        }
    }

    #[test]
    fn puma_classifies_as_three_joints_and_wrist() {
        let chain = RobotConfig::puma_560().chain;
        let elements = DhChainIdentifier::default().identify_chain(chain.convention(), chain.links());

        assert_eq!(elements.len(), 4);
        assert!(matches!(elements[0], DhChainElement::RevoluteJoint(_)));
        assert!(matches!(elements[1], DhChainElement::RevoluteJoint(_)));
        assert!(matches!(elements[2], DhChainElement::RevoluteJoint(_)));
        assert!(matches!(elements[3], DhChainElement::SphericalWrist(_)));
        assert_eq!(flatten(&elements), chain.links());
    }

    #[test]
    fn stanford_arm_has_wrist() {
        let chain = RobotConfig::stanford().chain;
        let elements = DhChainIdentifier::default().identify_chain(chain.convention(), chain.links());

        assert_eq!(elements.iter().map(DhChainElement::len).collect::<Vec<_>>(), vec![1, 1, 1, 3]);
    }

    #[test]
    fn offset_wrist_is_not_spherical() {
        let chain = RobotConfig::crx_10ia().chain;
        let elements = DhChainIdentifier::default().identify_chain(chain.convention(), chain.links());

        assert_eq!(elements.len(), 6);
        assert_eq!(flatten(&elements), chain.links());
    }

    #[test]
    fn modified_convention_wrist() {
        // Same geometry as a PUMA wrist, written in modified DH
        let params = [
            DhParam::from_degrees(0.4318, 0.0, 0.0203, -90.0),
            DhParam::from_degrees(0.0, 0.0, 0.0, 90.0),
            DhParam::from_degrees(0.0, 0.0, 0.0, -90.0),
        ];
        let identifier = DhChainIdentifier::default();
        assert!(identifier.is_spherical_wrist(DhConvention::Modified, &params));
        // The r of the first link is irrelevant in modified DH but not in standard
        assert!(!identifier.is_spherical_wrist(DhConvention::Standard, &params));
    }

    #[test]
    fn parallel_axes_are_not_a_wrist() {
        let params = [
            DhParam::from_degrees(0.0, 0.0, 0.0, 0.0),
            DhParam::from_degrees(0.0, 0.0, 0.0, 90.0),
            DhParam::from_degrees(0.0, 0.0, 0.0, 0.0),
        ];
        assert!(!DhChainIdentifier::default().is_spherical_wrist(DhConvention::Standard, &params));
    }

    #[test]
    fn wrist_criterion_respects_tolerance() {
        let mut params = wrist_params();
        params[1].d = 1e-4;
        assert!(!DhChainIdentifier::new(1e-6).is_spherical_wrist(DhConvention::Standard, &params));
        assert!(DhChainIdentifier::new(1e-3).is_spherical_wrist(DhConvention::Standard, &params));
    }

    #[test]
    fn greedy_prefers_wrist_over_three_joints() {
        // Six pure-rotation links with alternating twists: every window is
        // a wrist, so the scan takes two wrists back to back
        let link = |alpha: f64| DhParam::from_degrees(0.0, 0.0, 0.0, alpha);
        let params = [link(90.0), link(-90.0), link(90.0), link(-90.0), link(90.0), link(-90.0)];
        let elements = DhChainIdentifier::default().identify_chain(DhConvention::Standard, &params);

        assert_eq!(elements.len(), 2);
        assert!(elements.iter().all(|e| matches!(e, DhChainElement::SphericalWrist(_))));
    }

    #[test]
    fn wrist_after_arm_links_with_tail() {
        let wrist = wrist_params();
        let params = [arm_link(1.0), wrist[0], wrist[1], wrist[2], arm_link(0.5), arm_link(0.2)];
        let elements = DhChainIdentifier::default().identify_chain(DhConvention::Standard, &params);

        assert_eq!(elements.len(), 4);
        assert!(matches!(elements[1], DhChainElement::SphericalWrist(_)));
        assert_eq!(flatten(&elements), params);
    }

    #[test]
    fn partition_covers_chain_for_many_shapes() {
        let identifier = DhChainIdentifier::default();
        let wrist = wrist_params();
        let pool = [arm_link(1.0), wrist[0], wrist[1], wrist[2], arm_link(0.0)];

        // Deterministic pseudo-random sequences drawn from the pool
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        for len in 0..12 {
            let params: Vec<DhParam> = (0..len)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    pool[(state % pool.len() as u64) as usize]
                })
                .collect();

            let elements = identifier.identify_chain(DhConvention::Standard, &params);
            assert_eq!(flatten(&elements), params);
            assert_eq!(elements.iter().map(DhChainElement::len).sum::<usize>(), len);
        }
    }
}
