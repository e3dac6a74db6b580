//! Quadratic aerodynamic drag along the vertical axis.

use rocketry_config::RocketConfiguration;

/// Drag coefficient and reference area of whatever is facing the airflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragProfile {
    pub drag_coefficient: f64,
    pub area_m2: f64,
}

impl DragProfile {
    pub fn body(config: &RocketConfiguration) -> Self {
        Self {
            drag_coefficient: config.drag_coefficient,
            area_m2: config.body_area_m2(),
        }
    }

    pub fn parachute(config: &RocketConfiguration) -> Self {
        Self {
            drag_coefficient: config.parachute_drag_coefficient,
            area_m2: config.parachute_area_m2(),
        }
    }

    /// Signed drag force (N). Altitude and velocity share the upward axis, so
    /// the force always carries the opposite sign of `velocity`.
    pub fn force(&self, velocity: f64, air_density: f64) -> f64 {
        if velocity == 0.0 {
            return 0.0;
        }
        -velocity.signum()
            * 0.5
            * self.drag_coefficient
            * air_density
            * velocity
            * velocity
            * self.area_m2
    }
}
