//! Goal execution loop shared by the go-to plugins

use super::goal::{GotoFeedback, GotoResult};
use crate::actuation::{ActuationSink, MotionCommand};
use crate::telemetry::TelemetrySource;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Loop period (10 Hz)
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Everything a running goal talks to
pub struct ExecutionContext {
    telemetry: Arc<dyn TelemetrySource>,
    actuation: Arc<dyn ActuationSink>,
    feedback: watch::Sender<Option<GotoFeedback>>,
    cancel: watch::Receiver<bool>,
    ticker: Interval,
}

impl ExecutionContext {
    /// Must be called from within a tokio runtime
    pub fn new(
        telemetry: Arc<dyn TelemetrySource>,
        actuation: Arc<dyn ActuationSink>,
        feedback: watch::Sender<Option<GotoFeedback>>,
        cancel: watch::Receiver<bool>,
        period: Duration,
    ) -> Self {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ExecutionContext {
            telemetry,
            actuation,
            feedback,
            cancel,
            ticker,
        }
    }

    pub fn telemetry(&self) -> &dyn TelemetrySource {
        self.telemetry.as_ref()
    }

    pub fn actuation(&self) -> &dyn ActuationSink {
        self.actuation.as_ref()
    }

    pub fn is_canceling(&self) -> bool {
        *self.cancel.borrow()
    }

    pub fn goal_reached(&self) -> bool {
        self.telemetry.goal_reached()
    }

    /// Report distance and speed to the requester
    pub fn publish_feedback(&self) {
        let feedback = GotoFeedback {
            actual_distance_to_goal: self.telemetry.distance_to_goal(),
            actual_speed: self.telemetry.speed(),
        };
        // Latest report wins, the goal keeps running whether or not anyone reads it
        self.feedback.send_replace(Some(feedback));
    }

    /// Suspend until the next tick boundary
    pub async fn wait_next_tick(&mut self) {
        self.ticker.tick().await;
    }
}

/// Drive a goal to completion.
///
/// Each tick, while the goal is not reached: stop on cancellation, otherwise dispatch the
/// command produced by `step`, publish feedback and wait for the next tick. Both exits send
/// a hover command before returning the result.
pub async fn drive<F>(ctx: &mut ExecutionContext, mut step: F) -> GotoResult
where
    F: FnMut(&dyn TelemetrySource) -> MotionCommand,
{
    while !ctx.goal_reached() {
        if ctx.is_canceling() {
            warn!("Goal canceled");
            ctx.actuation().send_hover();
            return GotoResult {
                goto_success: false,
            };
        }

        let command = step(ctx.telemetry());
        debug!("Tick command: {:?}", command);
        ctx.actuation().send(command);
        ctx.publish_feedback();

        ctx.wait_next_tick().await;
    }

    info!("Goal succeeded");
    ctx.actuation().send_hover();
    GotoResult { goto_success: true }
}
