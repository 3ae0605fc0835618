//! Go-to plugin commanding velocity and heading

use super::execution::{drive, ExecutionContext};
use super::goal::{ActiveGoal, GotoResult};
use super::GotoPlugin;
use crate::actuation::MotionCommand;
use crate::config::{ConfigError, Parameters, GOTO_PROPORTIONAL_SPEED_LIMIT};
use crate::control::{GuidanceInput, SpeedGuidance, SpeedLimitPolicy};
use async_trait::async_trait;
use log::{error, info};

/// Drives the vehicle with bounded velocity commands proportional to the position error
#[derive(Debug, Default)]
pub struct SpeedGotoPlugin {
    guidance: SpeedGuidance,
}

impl SpeedGotoPlugin {
    pub fn new() -> Self {
        SpeedGotoPlugin::default()
    }

    pub fn with_policy(policy: SpeedLimitPolicy) -> Self {
        SpeedGotoPlugin {
            guidance: SpeedGuidance::new(policy),
        }
    }

    pub fn policy(&self) -> SpeedLimitPolicy {
        self.guidance.policy()
    }
}

#[async_trait]
impl GotoPlugin for SpeedGotoPlugin {
    fn name(&self) -> &str {
        "goto_plugin_speed"
    }

    fn configure(&mut self, params: &Parameters) -> Result<(), ConfigError> {
        let proportional = params.get_bool(GOTO_PROPORTIONAL_SPEED_LIMIT).map_err(|e| {
            error!(
                "Launch argument <{}> not defined or malformed: {}",
                GOTO_PROPORTIONAL_SPEED_LIMIT, e
            );
            e
        })?;

        self.guidance = SpeedGuidance::new(SpeedLimitPolicy::from_proportional_flag(proportional));
        info!("Speed limit policy: {:?}", self.guidance.policy());
        Ok(())
    }

    async fn run_to_completion(&self, goal: &ActiveGoal, ctx: &mut ExecutionContext) -> GotoResult {
        let guidance = self.guidance;
        drive(ctx, |telemetry| {
            let setpoint = guidance.compute(&GuidanceInput {
                position: telemetry.position(),
                yaw: telemetry.yaw(),
                target: goal.target,
                ignore_yaw: goal.ignore_pose_yaw,
                speed_limit: goal.speed_limit,
            });
            MotionCommand::Speed {
                velocity: setpoint.velocity,
                yaw: setpoint.yaw,
            }
        })
        .await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn configure_selects_policy() {
        let mut plugin = SpeedGotoPlugin::new();
        assert_eq!(plugin.policy(), SpeedLimitPolicy::PerAxisClamp);

        let mut params = Parameters::new();
        params.set(GOTO_PROPORTIONAL_SPEED_LIMIT, true);
        plugin.configure(&params).unwrap();
        assert_eq!(plugin.policy(), SpeedLimitPolicy::SequentialProportional);
    }

    #[test]
    fn configure_fails_without_flag() {
        let mut plugin = SpeedGotoPlugin::with_policy(SpeedLimitPolicy::SequentialProportional);
        assert!(plugin.configure(&Parameters::new()).is_err());
        assert_eq!(plugin.policy(), SpeedLimitPolicy::SequentialProportional);
    }
}
