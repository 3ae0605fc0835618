//! Guidance law for the go-to behavior
//!
//! Stateless mapping from the position error to a bounded velocity command and a heading.
pub mod controllers;
pub mod speed_limit;

pub use self::controllers::{select_yaw, GuidanceInput, SpeedGuidance, SpeedSetpoint, YAW_HOLD_RADIUS};
pub use self::speed_limit::SpeedLimitPolicy;
