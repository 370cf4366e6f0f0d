use serde::{Deserialize, Serialize};

/// Iteration limits for [`FabrikChain3D::solve_for_target`](crate::FabrikChain3D::solve_for_target).
///
/// ```rust,ignore
/// let config = FabrikConfig { max_iterations: 50, ..FabrikConfig::default() };
/// if let Err(e) = config.validate() {
///     println!("Configuration error: {}", e);
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FabrikConfig {
    /// Upper bound on backward/forward passes per solve.
    pub max_iterations: u32,
    /// Residual distance at which the solve stops early.
    pub solve_distance_threshold: f64,
    /// A pass that improves the residual by less than this counts as stalled.
    pub min_iteration_change: f64,
}

impl FabrikConfig {
    pub fn new(max_iterations: u32, solve_distance_threshold: f64, min_iteration_change: f64) -> Self {
        Self {
            max_iterations,
            solve_distance_threshold,
            min_iteration_change,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("Maximum iterations must be greater than 0.".to_string());
        }
        if !self.solve_distance_threshold.is_finite() || self.solve_distance_threshold < 0.0 {
            return Err("Solve distance threshold must be a finite, non-negative number.".to_string());
        }
        if !self.min_iteration_change.is_finite() || self.min_iteration_change < 0.0 {
            return Err("Minimum iteration change must be a finite, non-negative number.".to_string());
        }
        Ok(())
    }
}

impl Default for FabrikConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            solve_distance_threshold: 1e-3,
            min_iteration_change: 1e-5,
        }
    }
}
