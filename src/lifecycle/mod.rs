//! Lifecycle management for behavior components

use crate::config::ConfigError;
use thiserror::Error;

/// Errors raised by lifecycle transitions
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Cannot {transition} `{node}` while {state:?}")]
    InvalidTransition {
        node: String,
        transition: &'static str,
        state: State,
    },

    #[error("Configuration failed: {0}")]
    Config(#[from] ConfigError),

    #[error("Plugin is still held by a goal")]
    PluginInUse,
}

/// Trait for components that follow a lifecycle pattern
pub trait LifecycleNode: Send + Sync {
    /// Configure the node
    fn on_configure(&mut self) -> Result<(), LifecycleError>;

    /// Activate the node
    fn on_activate(&mut self) -> Result<(), LifecycleError>;

    /// Deactivate the node
    fn on_deactivate(&mut self) -> Result<(), LifecycleError>;

    /// Clean up the node
    fn on_cleanup(&mut self) -> Result<(), LifecycleError>;
}

/// Base implementation for lifecycle nodes
#[derive(Debug)]
pub struct LifecycleNodeBase {
    pub name: String,
    state: State,
}

/// State of a lifecycle node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unconfigured,
    Inactive,
    Active,
}

impl LifecycleNodeBase {
    /// Create a new lifecycle node base
    pub fn new(name: &str) -> Self {
        LifecycleNodeBase {
            name: name.to_string(),
            state: State::Unconfigured,
        }
    }

    /// Get the current state
    pub fn get_state(&self) -> State {
        self.state
    }

    /// Check that the node is in `expected` before running `transition`
    pub fn require(&self, expected: State, transition: &'static str) -> Result<(), LifecycleError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition {
                node: self.name.clone(),
                transition,
                state: self.state,
            })
        }
    }

    /// Set the state
    pub fn set_state(&mut self, state: State) {
        self.state = state;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn require_rejects_other_states() {
        let mut base = LifecycleNodeBase::new("goto");
        assert!(base.require(State::Unconfigured, "configure").is_ok());

        base.set_state(State::Inactive);
        let err = base.require(State::Unconfigured, "configure").unwrap_err();
        assert_eq!(err.to_string(), "Cannot configure `goto` while Inactive");
    }
}
