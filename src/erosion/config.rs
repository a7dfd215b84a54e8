//! Erosion configuration.

use serde::{Deserialize, Serialize};

use crate::pipeline::ConfigError;

/// Parameters for thermal and hydraulic erosion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionConfig {
    /// Thermal erosion iterations.
    pub thermal_iterations: u32,
    /// Height difference (m) between 4-neighbors above which material moves.
    pub talus: f32,
    /// Fraction of the excess over `talus` moved per iteration (0-1).
    pub thermal_strength: f32,
    /// Cap each cell's total thermal outflow at half its largest excess.
    /// Only changes cells with two or more steep lower neighbors. Without it
    /// spikes overshoot below their neighbors and rough fields can diverge.
    pub limit_outflow: bool,

    /// Run hydraulic erosion after the thermal pass.
    pub hydraulic_enabled: bool,
    /// Number of hydraulic erosion timesteps.
    pub hydraulic_steps: u32,
    /// Rainfall per step (m of water per cell).
    pub rainfall: f32,
    /// Evaporation factor per step (0-1).
    pub evaporation: f32,
    /// Sediment carried per unit of water.
    pub sediment_capacity: f32,
    /// Maximum pickup or deposition per cell per step (m).
    pub max_sediment_transfer: f32,
    /// Fraction of a cell's water that leaves it per step (0-1).
    pub flow_rate: f32,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            thermal_iterations: 25,
            talus: 3.0,
            thermal_strength: 0.3,
            limit_outflow: true,

            hydraulic_enabled: false,
            hydraulic_steps: 60,
            rainfall: 0.02,
            evaporation: 0.02,
            sediment_capacity: 0.05,
            max_sediment_transfer: 0.2,
            flow_rate: 0.5,
        }
    }
}

impl ErosionConfig {
    /// No erosion at all.
    pub fn disabled() -> Self {
        Self {
            thermal_iterations: 0,
            hydraulic_enabled: false,
            ..Self::default()
        }
    }

    /// Thermal relaxation followed by channel carving.
    pub fn with_hydraulic() -> Self {
        Self {
            hydraulic_enabled: true,
            ..Self::default()
        }
    }

    /// Hydraulic steps that will actually run.
    pub fn effective_hydraulic_steps(&self) -> u32 {
        if self.hydraulic_enabled {
            self.hydraulic_steps
        } else {
            0
        }
    }

    /// Total erosion iterations (thermal + hydraulic).
    pub fn total_iterations(&self) -> u32 {
        self.thermal_iterations + self.effective_hydraulic_steps()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fraction = |name: &str, v: f32| {
            if v.is_finite() && (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(ConfigError::InvalidErosion(format!("{name} must be in [0, 1], got {v}")))
            }
        };
        if !self.talus.is_finite() || self.talus < 0.0 {
            return Err(ConfigError::InvalidErosion(format!(
                "talus must be >= 0, got {}",
                self.talus
            )));
        }
        fraction("thermal_strength", self.thermal_strength)?;
        fraction("evaporation", self.evaporation)?;
        fraction("flow_rate", self.flow_rate)?;
        for (name, v) in [
            ("rainfall", self.rainfall),
            ("sediment_capacity", self.sediment_capacity),
            ("max_sediment_transfer", self.max_sediment_transfer),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::InvalidErosion(format!("{name} must be >= 0, got {v}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ErosionConfig::default().validate().is_ok());
        assert!(ErosionConfig::with_hydraulic().validate().is_ok());
        assert_eq!(ErosionConfig::disabled().total_iterations(), 0);
    }

    #[test]
    fn test_hydraulic_disabled_by_default() {
        let config = ErosionConfig::default();
        assert!(!config.hydraulic_enabled);
        assert!(config.limit_outflow);
        assert_eq!(config.total_iterations(), 25);
        assert_eq!(ErosionConfig::with_hydraulic().total_iterations(), 85);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let bad = [
            ErosionConfig { talus: -1.0, ..Default::default() },
            ErosionConfig { thermal_strength: 1.5, ..Default::default() },
            ErosionConfig { evaporation: f32::NAN, ..Default::default() },
            ErosionConfig { rainfall: -0.1, ..Default::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(ConfigError::InvalidErosion(_))));
        }
    }
}
