//! Closed-form damped spring integration.
//!
//! Each step solves the spring equation analytically from the current
//! position/velocity over the frame delta, so the result does not drift with
//! frame rate the way explicit Euler integration does.

use std::time::Duration;

/// Frame deltas above this are treated as this long
pub const MAX_STEP: Duration = Duration::from_millis(64);

/// Physical spring parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
    /// Value the spring pulls towards
    pub to_value: f64,
    /// Finish as soon as the target is crossed
    pub overshoot_clamping: bool,
    /// Speed under which the spring may come to rest
    pub rest_speed_threshold: f64,
    /// Distance from target under which the spring may come to rest
    pub rest_displacement_threshold: f64,
}

impl SpringConfig {
    /// Natural critically damped preset driving a 0..1 progress value
    pub fn critically_damped() -> Self {
        let mass = 1.0;
        let stiffness = 100.0;
        Self {
            mass,
            stiffness,
            damping: 2.0 * (mass * stiffness).sqrt(),
            to_value: 1.0,
            overshoot_clamping: false,
            rest_speed_threshold: 0.001,
            rest_displacement_threshold: 0.001,
        }
    }

    /// c / (2 * sqrt(k * m))
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::critically_damped()
    }
}

/// Integrated state of one animated scalar
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpringState {
    pub position: f64,
    pub velocity: f64,
    /// Time the current run has been integrated for
    pub time: Duration,
    pub finished: bool,
}

impl SpringState {
    pub fn at(position: f64) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Advance `state` by `dt` (capped at [`MAX_STEP`]).
///
/// When the spring is slow enough and close enough to its target, the
/// position snaps to the target, velocity drops to zero and `finished` is set.
pub fn step(state: &mut SpringState, config: &SpringConfig, dt: Duration) {
    if state.finished {
        return;
    }

    let dt = dt.min(MAX_STEP);
    let t = dt.as_secs_f64();
    let start = state.position;
    let to = config.to_value;

    let (position, velocity) = if config.stiffness <= 0.0 || config.mass <= 0.0 {
        (state.position, state.velocity)
    } else {
        solve(state.position, state.velocity, config, t)
    };

    state.position = position;
    state.velocity = velocity;
    state.time += dt;

    let overshooting = config.overshoot_clamping
        && config.stiffness > 0.0
        && if start < to { position > to } else { position < to };
    let at_rest_speed = velocity.abs() < config.rest_speed_threshold;
    let at_rest_displacement =
        config.stiffness <= 0.0 || (to - position).abs() < config.rest_displacement_threshold;

    if overshooting || (at_rest_speed && at_rest_displacement) {
        if config.stiffness > 0.0 {
            state.velocity = 0.0;
            state.position = to;
        }
        state.finished = true;
    }
}

/// Position and velocity after `t` seconds starting from `x`/`v`
fn solve(x: f64, v: f64, config: &SpringConfig, t: f64) -> (f64, f64) {
    let to = config.to_value;
    let zeta = config.damping_ratio();
    let omega0 = (config.stiffness / config.mass).sqrt();
    let x0 = to - x;
    let v0 = -v;

    if zeta < 1.0 {
        let omega1 = omega0 * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * omega0 * t).exp();
        let a = (v0 + zeta * omega0 * x0) / omega1;
        let (sin, cos) = (omega1 * t).sin_cos();

        let position = to - envelope * (a * sin + x0 * cos);
        let velocity = zeta * omega0 * envelope * (a * sin + x0 * cos)
            - envelope * (cos * (v0 + zeta * omega0 * x0) - omega1 * x0 * sin);
        (position, velocity)
    } else {
        // Critically damped (over-damped presets are treated the same way)
        let envelope = (-omega0 * t).exp();
        let position = to - envelope * (x0 + (v0 + omega0 * x0) * t);
        let velocity = envelope * (v0 * (t * omega0 - 1.0) + t * x0 * omega0 * omega0);
        (position, velocity)
    }
}
