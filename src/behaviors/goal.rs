//! Goal, feedback and result types of the go-to behavior

use super::BehaviorError;
use crate::common::types::Vec3;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A go-to request as received from a client
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GotoGoal {
    pub target: Vec3,
    /// Speed limit for this goal, 0 keeps the previous one
    pub max_speed: f64,
    pub ignore_pose_yaw: bool,
}

impl GotoGoal {
    pub fn new(target: Vec3) -> Self {
        GotoGoal {
            target,
            max_speed: 0.0,
            ignore_pose_yaw: false,
        }
    }

    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn ignoring_yaw(mut self) -> Self {
        self.ignore_pose_yaw = true;
        self
    }
}

/// Snapshot of an accepted goal, fixed for the whole execution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveGoal {
    pub id: u64,
    pub target: Vec3,
    pub ignore_pose_yaw: bool,
    /// Speed limit in effect, 0 leaves the velocity request unbounded
    pub speed_limit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalResponse {
    Reject,
    AcceptAndExecute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelResponse {
    Reject,
    Accept,
}

/// Per-tick progress report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GotoFeedback {
    pub actual_distance_to_goal: f64,
    pub actual_speed: f64,
}

/// Final outcome of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GotoResult {
    pub goto_success: bool,
}

/// Execution state of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Idle,
    Accepted,
    Running,
    Succeeded,
    Cancelled,
}

impl ExecutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionState::Succeeded | ExecutionState::Cancelled)
    }
}

/// Client side of an accepted goal
pub struct GoalHandle {
    pub(crate) goal: ActiveGoal,
    pub(crate) cancel: Arc<watch::Sender<bool>>,
    pub(crate) status: watch::Receiver<ExecutionState>,
    pub(crate) feedback: watch::Receiver<Option<GotoFeedback>>,
    pub(crate) task: JoinHandle<GotoResult>,
}

impl GoalHandle {
    pub fn goal(&self) -> &ActiveGoal {
        &self.goal
    }

    pub fn state(&self) -> ExecutionState {
        *self.status.borrow()
    }

    /// Request cancellation. The loop notices it at the top of its next tick.
    ///
    /// Rejected once the goal has finished. Plugin cancel policies are applied by
    /// `GotoBehavior::cancel_goal`.
    pub fn cancel(&self) -> CancelResponse {
        if self.state().is_terminal() {
            return CancelResponse::Reject;
        }
        self.cancel.send_replace(true);
        CancelResponse::Accept
    }

    /// Latest feedback not yet seen, `None` once the goal has finished and the last
    /// report was read. Unread reports are overwritten by newer ones.
    pub async fn next_feedback(&mut self) -> Option<GotoFeedback> {
        self.feedback.changed().await.ok()?;
        *self.feedback.borrow_and_update()
    }

    /// Wait for the goal to finish
    pub async fn result(self) -> Result<GotoResult, BehaviorError> {
        Ok(self.task.await?)
    }
}
