//! Go-to behavior: plugin interface, goal execution and the behavior server

use crate::config::{ConfigError, Parameters};
use async_trait::async_trait;
use thiserror::Error;

pub mod execution;
pub mod goal;
pub mod position;
pub mod server;
pub mod speed;

pub use self::execution::{ExecutionContext, TICK_PERIOD};
pub use self::goal::{
    ActiveGoal, CancelResponse, ExecutionState, GoalHandle, GoalResponse, GotoFeedback, GotoGoal,
    GotoResult,
};
pub use self::position::PositionGotoPlugin;
pub use self::server::GotoBehavior;
pub use self::speed::SpeedGotoPlugin;

/// Errors raised while handling goals
#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("Behavior `{0}` is not active")]
    NotActive(String),

    #[error("Goal rejected by `{0}`")]
    GoalRejected(String),

    #[error("Goal execution aborted: {0}")]
    ExecutionAborted(#[from] tokio::task::JoinError),
}

/// A go-to strategy run by the behavior server
#[async_trait]
pub trait GotoPlugin: Send + Sync {
    /// Get the name of this plugin
    fn name(&self) -> &str;

    /// Read plugin specific parameters
    fn configure(&mut self, params: &Parameters) -> Result<(), ConfigError>;

    fn on_accepted(&self, _goal: &ActiveGoal) -> GoalResponse {
        GoalResponse::AcceptAndExecute
    }

    fn on_cancel(&self) -> CancelResponse {
        CancelResponse::Accept
    }

    /// Run the goal until it is reached or cancelled
    async fn run_to_completion(&self, goal: &ActiveGoal, ctx: &mut ExecutionContext) -> GotoResult;
}
