//! Go-to plugin commanding a position setpoint

use super::execution::{drive, ExecutionContext};
use super::goal::{ActiveGoal, GotoResult};
use super::GotoPlugin;
use crate::actuation::MotionCommand;
use crate::config::{ConfigError, Parameters};
use crate::control::select_yaw;
use async_trait::async_trait;

/// Hands the target straight to the vehicle's position controller, re-sent every tick
#[derive(Debug, Default)]
pub struct PositionGotoPlugin;

impl PositionGotoPlugin {
    pub fn new() -> Self {
        PositionGotoPlugin
    }
}

#[async_trait]
impl GotoPlugin for PositionGotoPlugin {
    fn name(&self) -> &str {
        "goto_plugin_position"
    }

    fn configure(&mut self, _params: &Parameters) -> Result<(), ConfigError> {
        Ok(())
    }

    async fn run_to_completion(&self, goal: &ActiveGoal, ctx: &mut ExecutionContext) -> GotoResult {
        drive(ctx, |telemetry| {
            let error = goal.target - telemetry.position();
            MotionCommand::Position {
                position: goal.target,
                yaw: select_yaw(&error, telemetry.yaw(), goal.ignore_pose_yaw),
                max_speed: goal.speed_limit,
            }
        })
        .await
    }
}
