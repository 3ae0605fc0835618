//! Live vehicle state
//!
//! Pose and twist updates arrive from a telemetry feed running concurrently with the goal
//! loop. The state also keeps the distance/speed bookkeeping for the active target, which
//! drives the arrival condition.

use crate::common::types::{yaw_of, Attitude, Vec3};
use std::sync::{Mutex, MutexGuard};

/// Read access to the vehicle state used by the goal loop
pub trait TelemetrySource: Send + Sync {
    fn position(&self) -> Vec3;

    fn yaw(&self) -> f64;

    fn speed(&self) -> f64;

    fn distance_to_goal(&self) -> f64;

    /// True once a measurement taken since the goal began is within the arrival threshold
    fn goal_reached(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
struct VehicleState {
    position: Vec3,
    yaw: f64,
    speed: f64,
    target: Option<Vec3>,
    goal_threshold: f64,
    distance_to_goal: f64,
    distance_measured: bool,
}

/// Vehicle state shared between the telemetry feed and the goal loop
#[derive(Debug, Default)]
pub struct SharedVehicleState {
    inner: Mutex<VehicleState>,
}

impl SharedVehicleState {
    pub fn new() -> Self {
        SharedVehicleState::default()
    }

    /// Start bookkeeping for a new target. Arrival needs a fresh measurement after this.
    pub fn begin_goal(&self, target: Vec3, goal_threshold: f64) {
        let mut state = self.lock();
        state.target = Some(target);
        state.goal_threshold = goal_threshold;
        state.distance_measured = false;
    }

    /// Apply a pose and velocity measurement
    pub fn update(&self, position: Vec3, attitude: &Attitude, velocity: &Vec3) {
        let yaw = yaw_of(attitude);
        let mut state = self.lock();
        state.position = position;
        state.yaw = yaw;
        state.speed = velocity.norm();
        if let Some(target) = state.target {
            state.distance_to_goal = (target - position).norm();
            state.distance_measured = true;
        }
    }

    fn lock(&self) -> MutexGuard<'_, VehicleState> {
        // Plain data, still valid after a panicking writer
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TelemetrySource for SharedVehicleState {
    fn position(&self) -> Vec3 {
        self.lock().position
    }

    fn yaw(&self) -> f64 {
        self.lock().yaw
    }

    fn speed(&self) -> f64 {
        self.lock().speed
    }

    fn distance_to_goal(&self) -> f64 {
        self.lock().distance_to_goal
    }

    fn goal_reached(&self) -> bool {
        let state = self.lock();
        state.distance_measured && state.distance_to_goal.abs() < state.goal_threshold
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn level() -> Attitude {
        Attitude::identity()
    }

    #[test]
    fn update_tracks_pose_and_speed() {
        let state = SharedVehicleState::new();
        let q = Attitude::from_euler_angles(0.0, 0.0, 1.2);
        state.update(Vec3::new(1.0, 2.0, 3.0), &q, &Vec3::new(0.0, 3.0, 4.0));

        assert_eq!(state.position(), Vec3::new(1.0, 2.0, 3.0));
        assert!((state.yaw() - 1.2).abs() < 1e-9);
        assert_eq!(state.speed(), 5.0);
    }

    #[test]
    fn arrival_requires_fresh_measurement() {
        let state = SharedVehicleState::new();
        state.begin_goal(Vec3::new(1.0, 0.0, 0.0), 0.5);
        state.update(Vec3::new(0.9, 0.0, 0.0), &level(), &Vec3::zeros());
        assert!(state.goal_reached());

        // New goal at the current position: not reached until measured again
        state.begin_goal(Vec3::new(0.9, 0.0, 0.0), 0.5);
        assert!(!state.goal_reached());
        state.update(Vec3::new(0.9, 0.0, 0.0), &level(), &Vec3::zeros());
        assert!(state.goal_reached());
    }

    #[test]
    fn distance_outside_threshold_is_not_arrival() {
        let state = SharedVehicleState::new();
        state.begin_goal(Vec3::new(0.0, 0.0, 10.0), 0.3);
        state.update(Vec3::zeros(), &level(), &Vec3::zeros());
        assert_eq!(state.distance_to_goal(), 10.0);
        assert!(!state.goal_reached());
    }

    #[test]
    fn no_target_means_no_arrival() {
        let state = SharedVehicleState::new();
        state.update(Vec3::zeros(), &level(), &Vec3::zeros());
        assert!(!state.goal_reached());
    }
}
