use crate::telemetry::Vec3;

/// Floor applied to the goal's forward component before its sign is taken.
pub const GOAL_FORWARD_FLOOR: f32 = 0.1;

/// Forward progress (`fp`). Subtracted from the fitness.
#[derive(Debug, Default, Clone)]
pub struct DistanceSampler {
    velocities: Vec<Vec3>,
    goal_velocity: Vec3,
}

/// Direction the goal asks for along z.
///
/// The goal is floored at [`GOAL_FORWARD_FLOOR`] before the sign is taken, so
/// any finite goal maps to +1.
pub fn goal_direction_sign(goal_forward: f32) -> f32 {
    let floored = GOAL_FORWARD_FLOOR.max(goal_forward);
    let sign = floored / floored.abs();
    if sign == 0.0 || sign.is_nan() {
        1.0
    } else {
        sign
    }
}

impl DistanceSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, ticks: usize) {
        self.velocities.reserve(ticks);
    }

    /// Last write wins for the goal.
    pub fn sample(&mut self, actual: Vec3, goal: Vec3) {
        self.velocities.push(actual);
        self.goal_velocity = goal;
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn goal_velocity(&self) -> Vec3 {
        self.goal_velocity
    }

    /// Summed forward velocity in the goal's direction, clamped at zero.
    pub fn evaluate(&self) -> f64 {
        let total_forward: f32 = self.velocities.iter().map(|v| v.z).sum();
        let sign = goal_direction_sign(self.goal_velocity.z);
        (total_forward * sign).max(0.0) as f64
    }
}
