//! Preset DH descriptions of common arms
//!
//! PUMA 560 parameters follow the classic (standard) DH table published by
//! Corke and Armstrong-Hélouvry, lengths in meters. The FANUC CRX entries
//! use the modified DH table from "Geometric Approach for Inverse Kinematics
//! of the FANUC CRX Collaborative Robot" (Abbes and Poisson, Robotics 2024,
//! 13, 91), lengths in millimeters.

use serde::{Deserialize, Serialize};

use crate::chain::DhChain;
use crate::dh_param::DhParam;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotModel {
    Puma560,
    Stanford,
    CRX10iA,
    CRX30iA,
}

/// A named arm with its DH chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    pub model: RobotModel,

    /// Maximum reach, in the chain's length unit
    pub max_reach: f64,

    pub chain: DhChain,
}

impl RobotConfig {
    /// PUMA 560, standard DH:
    ///
    /// Link | d       | θ  | r      | α
    /// -----|---------|----|--------|------
    /// L1   | 0       | 0  | 0      | +90°
    /// L2   | 0       | 0  | 0.4318 | 0
    /// L3   | 0.15005 | 0  | 0.0203 | -90°
    /// L4   | 0.4318  | 0  | 0      | +90°
    /// L5   | 0       | 0  | 0      | -90°
    /// L6   | 0       | 0  | 0      | 0
    ///
    /// Links 4 to 6 form a spherical wrist.
    pub fn puma_560() -> Self {
        Self {
            model: RobotModel::Puma560,
            max_reach: 0.8636,
            chain: DhChain::standard(vec![
                DhParam::from_degrees(0.0, 0.0, 0.0, 90.0),
                DhParam::from_degrees(0.0, 0.0, 0.4318, 0.0),
                DhParam::from_degrees(0.15005, 0.0, 0.0203, -90.0),
                DhParam::from_degrees(0.4318, 0.0, 0.0, 90.0),
                DhParam::from_degrees(0.0, 0.0, 0.0, -90.0),
                DhParam::from_degrees(0.0, 0.0, 0.0, 0.0),
            ]),
        }
    }

    /// Stanford arm, standard DH, lengths in meters:
    ///
    /// Link | d     | θ    | r | α
    /// -----|-------|------|---|------
    /// L1   | 0.412 | 0    | 0 | -90°
    /// L2   | 0.154 | 0    | 0 | +90°
    /// L3   | 0.5   | -90° | 0 | 0
    /// L4   | 0     | 0    | 0 | -90°
    /// L5   | 0     | 0    | 0 | +90°
    /// L6   | 0.263 | 0    | 0 | 0
    ///
    /// The prismatic third joint is held at a fixed extension of 0.5 m and
    /// solved as a revolute joint. Links 4 to 6 form a spherical wrist.
    pub fn stanford() -> Self {
        Self {
            model: RobotModel::Stanford,
            max_reach: 1.329,
            chain: DhChain::standard(vec![
                DhParam::from_degrees(0.412, 0.0, 0.0, -90.0),
                DhParam::from_degrees(0.154, 0.0, 0.0, 90.0),
                DhParam::from_degrees(0.5, -90.0, 0.0, 0.0),
                DhParam::from_degrees(0.0, 0.0, 0.0, -90.0),
                DhParam::from_degrees(0.0, 0.0, 0.0, 90.0),
                DhParam::from_degrees(0.263, 0.0, 0.0, 0.0),
            ]),
        }
    }

    /// CRX-10iA, modified DH (Table 2 of the paper):
    ///
    /// Link | r (a_{i-1}) | α_{i-1} | θ_i  | d (r_i)
    /// -----|-------------|---------|------|--------
    /// L1   | 0           | 0       | 0    | 0
    /// L2   | 0           | -90°    | -90° | 0
    /// L3   | 540         | +180°   | 0    | 0
    /// L4   | 0           | -90°    | 0    | -540
    /// L5   | 0           | +90°    | 0    | 150
    /// L6   | 0           | -90°    | 0    | -160
    ///
    /// The wrist is offset (r5, r6), so it is not spherical. The J2/J3
    /// coupling of the FANUC controller is not modelled here.
    pub fn crx_10ia() -> Self {
        Self::crx_scaled(RobotModel::CRX10iA, 1070.0, 1.0)
    }

    /// CRX-30iA, the CRX-10iA table scaled by the reach ratio 1756 / 1070.
    pub fn crx_30ia() -> Self {
        const SCALE_FACTOR: f64 = 1.641121495327103; // 1756 / 1070
        Self::crx_scaled(RobotModel::CRX30iA, 1756.0, SCALE_FACTOR)
    }

    fn crx_scaled(model: RobotModel, max_reach: f64, scale: f64) -> Self {
        Self {
            model,
            max_reach,
            chain: DhChain::modified(vec![
                DhParam::from_degrees(0.0, 0.0, 0.0, 0.0),
                DhParam::from_degrees(0.0, -90.0, 0.0, -90.0),
                DhParam::from_degrees(0.0, 0.0, 540.0 * scale, 180.0),
                DhParam::from_degrees(-540.0 * scale, 0.0, 0.0, -90.0),
                DhParam::from_degrees(150.0 * scale, 0.0, 0.0, 90.0),
                DhParam::from_degrees(-160.0 * scale, 0.0, 0.0, -90.0),
            ]),
        }
    }

    pub fn from_model(model: RobotModel) -> Self {
        match model {
            RobotModel::Puma560 => Self::puma_560(),
            RobotModel::Stanford => Self::stanford(),
            RobotModel::CRX10iA => Self::crx_10ia(),
            RobotModel::CRX30iA => Self::crx_30ia(),
        }
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self::puma_560()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crx_10ia_zero_position() {
        // Without the controller's J2/J3 coupling, zero joints here equal
        // J2 = J3 = 0 on the controller: [700, -150, 540] mm
        let config = RobotConfig::crx_10ia();
        let pose = config.chain.forward_kinematics(&[0.0; 6]).unwrap();
        assert!((pose.translation.x - 700.0).abs() < 1e-6, "X should be ~700mm at zero angles");
        assert!((pose.translation.y - (-150.0)).abs() < 1e-6, "Y should be ~-150mm at zero angles");
        assert!((pose.translation.z - 540.0).abs() < 1e-6, "Z should be ~540mm at zero angles");
    }

    #[test]
    fn test_crx_30ia_is_scaled() {
        let small = RobotConfig::crx_10ia().chain.forward_kinematics(&[0.0; 6]).unwrap();
        let large = RobotConfig::crx_30ia().chain.forward_kinematics(&[0.0; 6]).unwrap();
        let ratio = large.translation.vector.norm() / small.translation.vector.norm();
        assert!((ratio - 1756.0 / 1070.0).abs() < 1e-9);
    }

    #[test]
    fn test_puma_zero_position() {
        // Upper arm along x, forearm offset d4 straight up, shoulder offset d3 along -y
        let pose = RobotConfig::puma_560().chain.forward_kinematics(&[0.0; 6]).unwrap();
        assert!((pose.translation.x - (0.4318 + 0.0203)).abs() < 1e-9);
        assert!((pose.translation.y - (-0.15005)).abs() < 1e-9);
        assert!((pose.translation.z - 0.4318).abs() < 1e-9);
    }

    #[test]
    fn test_stanford_zero_position() {
        // Shoulder offset along y, extension and tool straight up
        let pose = RobotConfig::stanford().chain.forward_kinematics(&[0.0; 6]).unwrap();
        assert!(pose.translation.x.abs() < 1e-9);
        assert!((pose.translation.y - 0.154).abs() < 1e-9);
        assert!((pose.translation.z - (0.412 + 0.5 + 0.263)).abs() < 1e-9);
    }

    #[test]
    fn test_from_model() {
        for model in [RobotModel::Puma560, RobotModel::Stanford, RobotModel::CRX10iA, RobotModel::CRX30iA] {
            let config = RobotConfig::from_model(model);
            assert_eq!(config.model, model);
            assert_eq!(config.chain.len(), 6);
        }
    }
}
