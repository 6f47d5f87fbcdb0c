use crate::errors::SimulationError;

/// How much of a tick a stage can burn at full thrust.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throttle {
    pub percent_thrust: f64,
    pub leftover_time: f64,
}

impl Throttle {
    pub const FULL: Throttle = Throttle {
        percent_thrust: 1.0,
        leftover_time: 0.0,
    };

    /// Fuel-limited throttle for a tick of `delta_time` seconds.
    ///
    /// `percent_thrust = min(fuel / (flow_rate * dt), 1)` and the remainder of
    /// the tick, `dt * (1 - percent_thrust)`, is reported as leftover time.
    /// A tick with no fuel demand runs at full throttle.
    pub fn for_burn(fuel_mass: f64, flow_rate: f64, delta_time: f64) -> Self {
        let demand = flow_rate * delta_time;
        if demand <= 0.0 {
            return Throttle::FULL;
        }

        let percent_thrust = (fuel_mass.max(0.0) / demand).min(1.0);
        Throttle {
            percent_thrust,
            leftover_time: delta_time * (1.0 - percent_thrust),
        }
    }

    pub fn is_limited(&self) -> bool {
        self.percent_thrust < 1.0
    }
}

/// Engine constants of one stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropulsionSystem {
    pub exhaust_velocity: f64,
    pub exhaust_pressure: f64,
    pub exhaust_area: f64,
    pub flow_rate: f64,
}

impl PropulsionSystem {
    pub fn new(exhaust_velocity: f64, exhaust_pressure: f64, exhaust_area: f64, flow_rate: f64) -> Self {
        PropulsionSystem {
            exhaust_velocity,
            exhaust_pressure,
            exhaust_area,
            flow_rate,
        }
    }

    /// Thrust magnitude: the momentum term scales with the throttle, the
    /// pressure term does not.
    pub fn thrust(&self, percent_thrust: f64, ambient_pressure: f64) -> Result<f64, SimulationError> {
        if !(0.0..=1.0).contains(&percent_thrust) {
            return Err(SimulationError::InvalidThrottle(percent_thrust));
        }

        let momentum_thrust = percent_thrust * self.flow_rate * self.exhaust_velocity;
        let pressure_thrust = (ambient_pressure - self.exhaust_pressure) * self.exhaust_area;
        Ok(momentum_thrust + pressure_thrust)
    }
}
