use fabrik::FabrikConfig;
use serde::{Deserialize, Serialize};

use crate::error::IkError;

/// Tunables of the inverse kinematics pipeline.
///
/// ```rust,ignore
/// let config = IkConfig::from_json_str(r#"{ "default_bone_length": 0.05 }"#)?;
/// let engine = InverseKinematicsEngine::from_config(&config);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct IkConfig {
    /// Length given to bones whose link moves nothing, and to the last bone.
    pub default_bone_length: f64,
    /// Tolerance of the spherical wrist test.
    pub classifier_tolerance: f64,
    /// Tolerance of the wrist orthogonality and gimbal lock checks.
    pub wrist_tolerance: f64,
    pub solver: FabrikConfig,
}

impl IkConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.default_bone_length.is_finite() || self.default_bone_length <= 0.0 {
            return Err("Default bone length must be a finite, positive number.".to_string());
        }
        if !self.classifier_tolerance.is_finite() || self.classifier_tolerance < 0.0 {
            return Err("Classifier tolerance must be a finite, non-negative number.".to_string());
        }
        if !self.wrist_tolerance.is_finite() || self.wrist_tolerance < 0.0 {
            return Err("Wrist tolerance must be a finite, non-negative number.".to_string());
        }
        self.solver.validate()
    }

    pub fn from_json_str(json: &str) -> Result<Self, IkError> {
        let config: IkConfig = serde_json::from_str(json)?;
        config.validate().map_err(IkError::Config)?;
        Ok(config)
    }

    pub fn from_json_file(path: &str) -> Result<Self, IkError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| IkError::Config(format!("Failed to read {}: {}", path, e)))?;
        Self::from_json_str(&json)
    }
}

impl Default for IkConfig {
    fn default() -> Self {
        Self {
            default_bone_length: 10.0,
            classifier_tolerance: 1e-6,
            wrist_tolerance: 1e-6,
            solver: FabrikConfig::default(),
        }
    }
}
