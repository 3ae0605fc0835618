//! Controllers for the go-to behavior

use super::speed_limit::SpeedLimitPolicy;
use crate::common::types::{horizontal_norm, Vec3};

/// Below this horizontal distance to the target the heading is held instead of pointed at it
pub const YAW_HOLD_RADIUS: f64 = 2.0;

/// Inputs of one guidance step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidanceInput {
    pub position: Vec3,
    pub yaw: f64,
    pub target: Vec3,
    pub ignore_yaw: bool,
    pub speed_limit: f64,
}

/// Velocity and heading demand produced by a guidance step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSetpoint {
    pub velocity: Vec3,
    pub yaw: f64,
}

/// Heading to command for a given position error.
///
/// Holds the current heading when yaw is ignored or the target is horizontally close,
/// otherwise faces the horizontal direction of travel.
pub fn select_yaw(error: &Vec3, current_yaw: f64, ignore_yaw: bool) -> f64 {
    if ignore_yaw || horizontal_norm(error) < YAW_HOLD_RADIUS {
        current_yaw
    } else {
        error.y.atan2(error.x)
    }
}

/// Proportional position-error-to-velocity guidance with a bounded speed
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeedGuidance {
    policy: SpeedLimitPolicy,
}

impl SpeedGuidance {
    /// Create a new controller
    pub fn new(policy: SpeedLimitPolicy) -> Self {
        SpeedGuidance { policy }
    }

    pub fn policy(&self) -> SpeedLimitPolicy {
        self.policy
    }

    /// Compute control commands
    pub fn compute(&self, input: &GuidanceInput) -> SpeedSetpoint {
        let error = input.target - input.position;
        SpeedSetpoint {
            velocity: self.policy.apply(error, input.speed_limit),
            yaw: select_yaw(&error, input.yaw, input.ignore_yaw),
        }
    }
}
