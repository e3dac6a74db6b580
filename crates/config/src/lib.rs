//! Rocket configuration models and loaders for the rocketry calculator.
//!
//! Front ends hand the simulator a loosely filled [`RocketConfig`] (every field
//! optional). [`RocketConfig::resolve`] applies the documented defaults and
//! validates the result once, producing a [`RocketConfiguration`] that the
//! simulator can trust.

use std::fs::File;
use std::path::{Path, PathBuf};

use rocketry_core::constants::{AIR_DENSITY_SEA_LEVEL, STANDARD_GRAVITY};
use rocketry_core::units::circle_area;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_MASS_KG: f64 = 0.1;
pub const DEFAULT_DIAMETER_M: f64 = 0.05;
pub const DEFAULT_BODY_DRAG_COEFFICIENT: f64 = 0.5;
/// Placeholder canopy size. Far too large for a model rocket, so flights that
/// fall back to it are flagged and front ends ask for confirmation.
pub const DEFAULT_PARACHUTE_DIAMETER_M: f64 = 50.0;
pub const DEFAULT_PARACHUTE_DRAG_COEFFICIENT: f64 = 1.0;
pub const DEFAULT_DEPLOY_DELAY_S: f64 = 5.0;

/// Rocket parameters as supplied by a user or a configuration file.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct RocketConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mass_kg: Option<f64>,
    #[serde(default)]
    pub diameter_m: Option<f64>,
    #[serde(default)]
    pub drag_coefficient: Option<f64>,
    #[serde(default)]
    pub parachute_diameter_m: Option<f64>,
    #[serde(default)]
    pub parachute_drag_coefficient: Option<f64>,
    #[serde(default)]
    pub parachute_deploy_delay_s: Option<f64>,
}

/// Fully resolved rocket parameters in SI base units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocketConfiguration {
    pub name: Option<String>,
    pub mass_kg: f64,
    pub diameter_m: f64,
    pub drag_coefficient: f64,
    pub parachute_diameter_m: f64,
    pub parachute_drag_coefficient: f64,
    pub parachute_deploy_delay_s: f64,
    /// True when the parachute diameter came from [`DEFAULT_PARACHUTE_DIAMETER_M`].
    pub parachute_diameter_defaulted: bool,
}

/// Integration settings shared by every simulation run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    /// Fixed step for the unpowered phases (s).
    pub time_step_s: f64,
    /// Flight-time ceiling after which a run is reported as divergent (s).
    pub max_flight_time_s: f64,
    pub gravity_m_s2: f64,
    pub air_density_kg_m3: f64,
    /// Add the motor's mass (propellant burning off with impulse) to the rocket mass.
    pub include_motor_mass: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            time_step_s: 0.01,
            max_flight_time_s: 36_000.0,
            gravity_m_s2: STANDARD_GRAVITY,
            air_density_kg_m3: AIR_DENSITY_SEA_LEVEL,
            include_motor_mass: false,
        }
    }
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("no rocket configuration found in {}", path.display())]
    Empty { path: PathBuf },
    #[error("invalid value for `{field}`: {value} ({reason})")]
    Invalid {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl RocketConfig {
    /// Overlay every field that is set in `overrides` on top of `self`.
    pub fn merge(self, overrides: RocketConfig) -> RocketConfig {
        RocketConfig {
            name: overrides.name.or(self.name),
            mass_kg: overrides.mass_kg.or(self.mass_kg),
            diameter_m: overrides.diameter_m.or(self.diameter_m),
            drag_coefficient: overrides.drag_coefficient.or(self.drag_coefficient),
            parachute_diameter_m: overrides.parachute_diameter_m.or(self.parachute_diameter_m),
            parachute_drag_coefficient: overrides
                .parachute_drag_coefficient
                .or(self.parachute_drag_coefficient),
            parachute_deploy_delay_s: overrides
                .parachute_deploy_delay_s
                .or(self.parachute_deploy_delay_s),
        }
    }

    /// Apply defaults for missing fields and validate the result.
    pub fn resolve(&self) -> Result<RocketConfiguration, ConfigError> {
        let parachute_diameter_defaulted = self.parachute_diameter_m.is_none();
        let resolved = RocketConfiguration {
            name: self.name.clone(),
            mass_kg: self.mass_kg.unwrap_or(DEFAULT_MASS_KG),
            diameter_m: self.diameter_m.unwrap_or(DEFAULT_DIAMETER_M),
            drag_coefficient: self
                .drag_coefficient
                .unwrap_or(DEFAULT_BODY_DRAG_COEFFICIENT),
            parachute_diameter_m: self
                .parachute_diameter_m
                .unwrap_or(DEFAULT_PARACHUTE_DIAMETER_M),
            parachute_drag_coefficient: self
                .parachute_drag_coefficient
                .unwrap_or(DEFAULT_PARACHUTE_DRAG_COEFFICIENT),
            parachute_deploy_delay_s: self
                .parachute_deploy_delay_s
                .unwrap_or(DEFAULT_DEPLOY_DELAY_S),
            parachute_diameter_defaulted,
        };
        resolved.validate()?;
        if parachute_diameter_defaulted {
            warn!(
                diameter_m = DEFAULT_PARACHUTE_DIAMETER_M,
                "parachute diameter not set; using placeholder default"
            );
        }
        Ok(resolved)
    }
}

impl Default for RocketConfiguration {
    fn default() -> Self {
        Self {
            name: None,
            mass_kg: DEFAULT_MASS_KG,
            diameter_m: DEFAULT_DIAMETER_M,
            drag_coefficient: DEFAULT_BODY_DRAG_COEFFICIENT,
            parachute_diameter_m: DEFAULT_PARACHUTE_DIAMETER_M,
            parachute_drag_coefficient: DEFAULT_PARACHUTE_DRAG_COEFFICIENT,
            parachute_deploy_delay_s: DEFAULT_DEPLOY_DELAY_S,
            parachute_diameter_defaulted: true,
        }
    }
}

impl RocketConfiguration {
    /// Reject values for which the flight physics is undefined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("mass_kg", self.mass_kg)?;
        positive("diameter_m", self.diameter_m)?;
        non_negative("drag_coefficient", self.drag_coefficient)?;
        positive("parachute_diameter_m", self.parachute_diameter_m)?;
        non_negative("parachute_drag_coefficient", self.parachute_drag_coefficient)?;
        non_negative("parachute_deploy_delay_s", self.parachute_deploy_delay_s)?;
        Ok(())
    }

    /// Body frontal area (m²).
    pub fn body_area_m2(&self) -> f64 {
        circle_area(self.diameter_m)
    }

    /// Projected canopy area (m²).
    pub fn parachute_area_m2(&self) -> f64 {
        circle_area(self.parachute_diameter_m)
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("time_step_s", self.time_step_s)?;
        positive("max_flight_time_s", self.max_flight_time_s)?;
        non_negative("gravity_m_s2", self.gravity_m_s2)?;
        non_negative("air_density_kg_m3", self.air_density_kg_m3)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::Invalid {
            field,
            value,
            reason: "must be finite",
        });
    }
    if value <= 0.0 {
        return Err(ConfigError::Invalid {
            field,
            value,
            reason: "must be greater than zero",
        });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::Invalid {
            field,
            value,
            reason: "must be finite",
        });
    }
    if value < 0.0 {
        return Err(ConfigError::Invalid {
            field,
            value,
            reason: "must not be negative",
        });
    }
    Ok(())
}

/// Load rocket configurations from a TOML file, a YAML list, or a directory of TOML files.
pub fn load_rocket_configs<P: AsRef<Path>>(path: P) -> Result<Vec<RocketConfig>, ConfigError> {
    load_records(path)
}

/// Load the first rocket configuration found at `path`.
pub fn load_rocket_config<P: AsRef<Path>>(path: P) -> Result<RocketConfig, ConfigError> {
    let path = path.as_ref();
    load_records::<RocketConfig, _>(path)?
        .into_iter()
        .next()
        .ok_or_else(|| ConfigError::Empty {
            path: path.to_path_buf(),
        })
}

/// Load simulation settings from a TOML file; missing keys keep their defaults.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<SimulationSettings, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_takes_documented_defaults() {
        let resolved = RocketConfig::default().resolve().unwrap();
        assert_eq!(resolved.mass_kg, 0.1);
        assert_eq!(resolved.diameter_m, 0.05);
        assert_eq!(resolved.drag_coefficient, 0.5);
        assert_eq!(resolved.parachute_drag_coefficient, 1.0);
        assert_eq!(resolved.parachute_deploy_delay_s, 5.0);
    }

    #[test]
    fn placeholder_parachute_diameter_is_flagged() {
        // 50 m is not a plausible model-rocket canopy; keep it visible.
        let resolved = RocketConfig::default().resolve().unwrap();
        assert_eq!(resolved.parachute_diameter_m, 50.0);
        assert!(resolved.parachute_diameter_defaulted);

        let explicit = RocketConfig {
            parachute_diameter_m: Some(0.5),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        assert!(!explicit.parachute_diameter_defaulted);
    }

    #[test]
    fn non_positive_mass_is_rejected() {
        let err = RocketConfig {
            mass_kg: Some(0.0),
            ..Default::default()
        }
        .resolve()
        .unwrap_err();
        match err {
            ConfigError::Invalid { field, value, .. } => {
                assert_eq!(field, "mass_kg");
                assert_eq!(value, 0.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_diameter_and_delay_are_rejected() {
        let diameter = RocketConfig {
            diameter_m: Some(-0.01),
            ..Default::default()
        };
        assert!(matches!(
            diameter.resolve(),
            Err(ConfigError::Invalid {
                field: "diameter_m",
                ..
            })
        ));

        let delay = RocketConfig {
            parachute_deploy_delay_s: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(
            delay.resolve(),
            Err(ConfigError::Invalid {
                field: "parachute_deploy_delay_s",
                ..
            })
        ));
    }

    #[test]
    fn nan_values_are_rejected() {
        let cfg = RocketConfig {
            mass_kg: Some(f64::NAN),
            ..Default::default()
        };
        assert!(cfg.resolve().is_err());
    }

    #[test]
    fn merge_prefers_overrides() {
        let base = RocketConfig {
            mass_kg: Some(0.5),
            diameter_m: Some(0.04),
            ..Default::default()
        };
        let merged = base.merge(RocketConfig {
            mass_kg: Some(0.75),
            ..Default::default()
        });
        assert_eq!(merged.mass_kg, Some(0.75));
        assert_eq!(merged.diameter_m, Some(0.04));
    }

    #[test]
    fn loads_toml_and_yaml_records() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("alpha.toml");
        let mut file = File::create(&toml_path).unwrap();
        writeln!(file, "name = \"Alpha\"\nmass_kg = 0.5\nparachute_diameter_m = 0.45").unwrap();

        let cfg = load_rocket_config(&toml_path).unwrap();
        assert_eq!(cfg.name.as_deref(), Some("Alpha"));
        assert_eq!(cfg.mass_kg, Some(0.5));
        assert_eq!(cfg.diameter_m, None);

        let yaml_path = dir.path().join("fleet.yaml");
        let mut file = File::create(&yaml_path).unwrap();
        writeln!(file, "- name: One\n  mass_kg: 0.2\n- name: Two\n  diameter_m: 0.03").unwrap();
        let fleet = load_rocket_configs(&yaml_path).unwrap();
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet[1].diameter_m, Some(0.03));

        let from_dir = load_rocket_configs(dir.path()).unwrap();
        assert_eq!(from_dir.len(), 1);
    }

    #[test]
    fn settings_keep_defaults_for_missing_keys() {
        let settings: SimulationSettings = toml::from_str("time_step_s = 0.005").unwrap();
        assert_eq!(settings.time_step_s, 0.005);
        assert_eq!(settings.max_flight_time_s, 36_000.0);
        assert_eq!(settings.air_density_kg_m3, 1.205);
        assert!(settings.validate().is_ok());

        let bad = SimulationSettings {
            time_step_s: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
