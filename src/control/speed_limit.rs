//! Speed limiting policies
//!
//! The raw position error is treated as a velocity request and bounded per axis by the
//! goal's speed limit. A limit of zero means "no limit" under both policies.

use crate::common::types::Vec3;

/// How a velocity request is brought within the speed limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedLimitPolicy {
    /// Clamp each axis independently to `[-limit, limit]`
    #[default]
    PerAxisClamp,
    /// Scale the whole vector once for every axis that exceeds the limit, in x, y, z order.
    ///
    /// When several axes are out of bounds the scale factors multiply, so the result can
    /// end up smaller than a single min-ratio scaling would give.
    SequentialProportional,
}

impl SpeedLimitPolicy {
    /// Policy selected by the `goto_proportional_speed_limit` flag
    pub fn from_proportional_flag(proportional: bool) -> Self {
        if proportional {
            SpeedLimitPolicy::SequentialProportional
        } else {
            SpeedLimitPolicy::PerAxisClamp
        }
    }

    /// Bound `request` by `limit`
    pub fn apply(self, request: Vec3, limit: f64) -> Vec3 {
        let limit = limit.abs();
        match self {
            SpeedLimitPolicy::PerAxisClamp => request.map(|v| clamp_axis(v, limit)),
            SpeedLimitPolicy::SequentialProportional => scale_sequential(request, limit),
        }
    }
}

fn clamp_axis(v: f64, limit: f64) -> f64 {
    if limit == 0.0 || v.abs() <= limit {
        v
    } else {
        limit.copysign(v)
    }
}

fn scale_sequential(request: Vec3, limit: f64) -> Vec3 {
    let mut speed = request;
    for axis in 0..3 {
        if limit == 0.0 || speed[axis] == 0.0 {
            continue;
        }
        if speed[axis].abs() > limit {
            speed *= (limit / speed[axis]).abs();
        }
    }
    speed
}
