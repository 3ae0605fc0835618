pub mod actuation;
pub mod behaviors;
pub mod common;
pub mod config;
pub mod control;
pub mod lifecycle;
pub mod logging;
pub mod telemetry;

pub use crate::behaviors::{GotoBehavior, GotoGoal, PositionGotoPlugin, SpeedGotoPlugin};
pub use crate::lifecycle::LifecycleNode;
