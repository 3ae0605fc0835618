//! Behavior server accepting go-to goals and running them on a plugin

use super::execution::{ExecutionContext, TICK_PERIOD};
use super::goal::{
    ActiveGoal, CancelResponse, ExecutionState, GoalHandle, GoalResponse, GotoGoal,
};
use super::{BehaviorError, GotoPlugin};
use crate::actuation::ActuationSink;
use crate::config::{GotoConfig, Parameters};
use crate::lifecycle::{LifecycleError, LifecycleNode, LifecycleNodeBase, State};
use crate::telemetry::{SharedVehicleState, TelemetrySource};
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Server side view of the goal currently executing
struct RunningGoal {
    id: u64,
    cancel: Arc<watch::Sender<bool>>,
    status: watch::Receiver<ExecutionState>,
}

/// Go-to behavior server
pub struct GotoBehavior {
    base: LifecycleNodeBase,
    params: Parameters,
    plugin: Arc<dyn GotoPlugin>,
    telemetry: Arc<SharedVehicleState>,
    actuation: Arc<dyn ActuationSink>,
    config: Option<GotoConfig>,
    /// Speed limit kept across goals, replaced by every nonzero `max_speed`
    desired_speed: f64,
    tick_period: Duration,
    next_goal_id: u64,
    running: Option<RunningGoal>,
}

impl GotoBehavior {
    /// Create a new, unconfigured behavior server
    pub fn new<P: GotoPlugin + 'static>(
        plugin: P,
        params: Parameters,
        telemetry: Arc<SharedVehicleState>,
        actuation: Arc<dyn ActuationSink>,
    ) -> Self {
        GotoBehavior {
            base: LifecycleNodeBase::new("goto_behavior"),
            params,
            plugin: Arc::new(plugin),
            telemetry,
            actuation,
            config: None,
            desired_speed: 0.0,
            tick_period: TICK_PERIOD,
            next_goal_id: 1,
            running: None,
        }
    }

    pub fn plugin_name(&self) -> &str {
        self.plugin.name()
    }

    pub fn state(&self) -> State {
        self.base.get_state()
    }

    /// Speed limit a goal with `max_speed == 0` would get
    pub fn desired_speed(&self) -> f64 {
        self.desired_speed
    }

    /// State of the most recent goal, `Idle` if none was accepted
    pub fn execution_state(&self) -> ExecutionState {
        self.running
            .as_ref()
            .map(|r| *r.status.borrow())
            .unwrap_or(ExecutionState::Idle)
    }

    /// Accept a goal and start executing it.
    ///
    /// A goal still running is cancelled first, and the new one only starts once the old
    /// loop has hovered and exited.
    pub async fn accept_goal(&mut self, goal: GotoGoal) -> Result<GoalHandle, BehaviorError> {
        let config = match (self.base.get_state(), self.config) {
            (State::Active, Some(config)) => config,
            _ => return Err(BehaviorError::NotActive(self.base.name.clone())),
        };

        if !goal.max_speed.is_finite() {
            warn!("Ignoring non-finite max speed {}", goal.max_speed);
        }
        let speed_limit = if goal.max_speed.is_finite() && goal.max_speed != 0.0 {
            goal.max_speed
        } else {
            self.desired_speed
        };
        let active = ActiveGoal {
            id: self.next_goal_id,
            target: goal.target,
            ignore_pose_yaw: goal.ignore_pose_yaw,
            speed_limit,
        };

        if self.plugin.on_accepted(&active) == GoalResponse::Reject {
            return Err(BehaviorError::GoalRejected(self.plugin.name().to_string()));
        }
        self.next_goal_id += 1;
        self.desired_speed = speed_limit;

        self.preempt().await;

        info!(
            "Goal {} accepted: target {:?}, speed limit {}, ignore yaw {}",
            active.id,
            active.target.as_slice(),
            active.speed_limit,
            active.ignore_pose_yaw
        );
        self.telemetry.begin_goal(active.target, config.goal_threshold);

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (status_tx, status_rx) = watch::channel(ExecutionState::Accepted);
        let (feedback_tx, feedback_rx) = watch::channel(None);

        let telemetry: Arc<dyn TelemetrySource> = self.telemetry.clone();
        let mut ctx = ExecutionContext::new(
            telemetry,
            Arc::clone(&self.actuation),
            feedback_tx,
            cancel_rx,
            self.tick_period,
        );
        let plugin = Arc::clone(&self.plugin);
        let task = tokio::spawn(async move {
            status_tx.send_replace(ExecutionState::Running);
            let result = plugin.run_to_completion(&active, &mut ctx).await;
            status_tx.send_replace(if result.goto_success {
                ExecutionState::Succeeded
            } else {
                ExecutionState::Cancelled
            });
            result
        });

        let cancel = Arc::new(cancel_tx);
        self.running = Some(RunningGoal {
            id: active.id,
            cancel: Arc::clone(&cancel),
            status: status_rx.clone(),
        });

        Ok(GoalHandle {
            goal: active,
            cancel,
            status: status_rx,
            feedback: feedback_rx,
            task,
        })
    }

    /// Request cancellation of the running goal, if any
    pub fn cancel_goal(&self) -> CancelResponse {
        match &self.running {
            Some(running) if !running.status.borrow().is_terminal() => {
                let response = self.plugin.on_cancel();
                if response == CancelResponse::Accept {
                    running.cancel.send_replace(true);
                }
                response
            }
            _ => CancelResponse::Reject,
        }
    }

    async fn preempt(&mut self) {
        if let Some(mut previous) = self.running.take() {
            if previous.status.borrow().is_terminal() {
                return;
            }
            info!("Preempting goal {}", previous.id);
            previous.cancel.send_replace(true);
            // An error means the task is gone without reporting, nothing left to wait for
            let _ = previous.status.wait_for(ExecutionState::is_terminal).await;
        }
    }
}

impl LifecycleNode for GotoBehavior {
    fn on_configure(&mut self) -> Result<(), LifecycleError> {
        self.base.require(State::Unconfigured, "configure")?;

        let config = GotoConfig::from_parameters(&self.params).map_err(|e| {
            error!("Cannot configure `{}`: {}", self.base.name, e);
            e
        })?;
        // Only a goal task still running holds another reference
        let plugin = Arc::get_mut(&mut self.plugin).ok_or(LifecycleError::PluginInUse)?;
        plugin.configure(&self.params)?;

        info!(
            "Configuring `{}` with {}: default speed {}, threshold {}",
            self.base.name,
            self.plugin.name(),
            config.default_speed,
            config.goal_threshold
        );
        self.desired_speed = config.default_speed;
        self.config = Some(config);
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_activate(&mut self) -> Result<(), LifecycleError> {
        self.base.require(State::Inactive, "activate")?;
        info!("Activating `{}`", self.base.name);
        self.base.set_state(State::Active);
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<(), LifecycleError> {
        self.base.require(State::Active, "deactivate")?;
        info!("Deactivating `{}`", self.base.name);
        if let Some(running) = &self.running {
            running.cancel.send_replace(true);
        }
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<(), LifecycleError> {
        self.base.require(State::Inactive, "clean up")?;
        info!("Cleaning up `{}`", self.base.name);
        self.config = None;
        self.running = None;
        self.base.set_state(State::Unconfigured);
        Ok(())
    }
}
