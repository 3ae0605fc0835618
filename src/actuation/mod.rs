//! Motion commands and the sinks that carry them to the vehicle

use crate::common::types::Vec3;
use log::debug;
use tokio::sync::mpsc;

/// Motion reference sent to the vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionCommand {
    /// Velocity with a heading to hold
    Speed { velocity: Vec3, yaw: f64 },
    /// Position setpoint with a heading and a speed bound
    Position { position: Vec3, yaw: f64, max_speed: f64 },
    /// Stop and hold the current position and heading
    Hover,
}

impl MotionCommand {
    pub fn is_hover(&self) -> bool {
        matches!(self, MotionCommand::Hover)
    }
}

/// Fire-and-forget consumer of motion commands
pub trait ActuationSink: Send + Sync {
    fn send(&self, command: MotionCommand);

    fn send_hover(&self) {
        self.send(MotionCommand::Hover);
    }
}

/// Sink forwarding commands over a channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<MotionCommand>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MotionCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelSink { tx }, rx)
    }
}

impl ActuationSink for ChannelSink {
    fn send(&self, command: MotionCommand) {
        if self.tx.send(command).is_err() {
            debug!("Motion command dropped, no receiver: {:?}", command);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn channel_sink_forwards_in_order() {
        let (sink, mut rx) = ChannelSink::new();
        sink.send(MotionCommand::Speed {
            velocity: Vec3::new(1.0, 0.0, 0.0),
            yaw: 0.0,
        });
        sink.send_hover();

        assert!(matches!(rx.try_recv(), Ok(MotionCommand::Speed { .. })));
        assert!(rx.try_recv().unwrap().is_hover());
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.send_hover();
    }
}
