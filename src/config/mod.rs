//! Typed parameter store for behavior configuration
//!
//! Parameters are flat `name = value` pairs, loaded from a TOML file or set in code. Each
//! component reads the parameters it needs through the typed getters, which fail when a
//! parameter was never declared or holds a value of the wrong type.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;

/// Name of the default cruise speed parameter
pub const GOTO_SPEED: &str = "goto_speed";

/// Name of the arrival distance threshold parameter
pub const GOTO_THRESHOLD: &str = "goto_threshold";

/// Name of the speed limiting policy parameter
pub const GOTO_PROPORTIONAL_SPEED_LIMIT: &str = "goto_proportional_speed_limit";

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parameter <{0}> not defined")]
    NotDeclared(String),

    #[error("Parameter <{name}> malformed: expected {expected}, found {found}")]
    WrongType {
        name: String,
        expected: ParameterKind,
        found: ParameterKind,
    },

    #[error("Cannot load the parameter file: {0}")]
    FileLoad(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    Deserialise(toml::de::Error),
}

/// A single parameter value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
}

/// Type tag of a parameter value, used in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Bool,
    Integer,
    Double,
    String,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterKind::Bool => "bool",
            ParameterKind::Integer => "integer",
            ParameterKind::Double => "double",
            ParameterKind::String => "string",
        };
        f.write_str(s)
    }
}

impl ParameterValue {
    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Bool(_) => ParameterKind::Bool,
            ParameterValue::Integer(_) => ParameterKind::Integer,
            ParameterValue::Double(_) => ParameterKind::Double,
            ParameterValue::String(_) => ParameterKind::String,
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        ParameterValue::Bool(v)
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        ParameterValue::Double(v)
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        ParameterValue::Integer(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        ParameterValue::String(v.to_string())
    }
}

/// A set of named parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    values: HashMap<String, ParameterValue>,
}

impl Parameters {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Parameters::default()
    }

    /// Parse parameters from a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Deserialise)
    }

    /// Load parameters from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = read_to_string(path).map_err(ConfigError::FileLoad)?;
        Self::from_toml_str(&s)
    }

    /// Set (or overwrite) a parameter
    pub fn set<V: Into<ParameterValue>>(&mut self, name: &str, value: V) -> &mut Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, ConfigError> {
        match self.require(name)? {
            ParameterValue::Bool(b) => Ok(*b),
            other => Err(wrong_type(name, ParameterKind::Bool, other)),
        }
    }

    /// Read a double. Integer values are widened.
    pub fn get_double(&self, name: &str) -> Result<f64, ConfigError> {
        match self.require(name)? {
            ParameterValue::Double(d) => Ok(*d),
            ParameterValue::Integer(i) => Ok(*i as f64),
            other => Err(wrong_type(name, ParameterKind::Double, other)),
        }
    }

    fn require(&self, name: &str) -> Result<&ParameterValue, ConfigError> {
        self.values
            .get(name)
            .ok_or_else(|| ConfigError::NotDeclared(name.to_string()))
    }
}

fn wrong_type(name: &str, expected: ParameterKind, found: &ParameterValue) -> ConfigError {
    ConfigError::WrongType {
        name: name.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Configuration shared by every go-to plugin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GotoConfig {
    /// Speed limit used when a goal does not carry its own
    pub default_speed: f64,
    /// Distance to the target below which a goal is complete
    pub goal_threshold: f64,
}

impl GotoConfig {
    pub fn from_parameters(params: &Parameters) -> Result<Self, ConfigError> {
        Ok(GotoConfig {
            default_speed: params.get_double(GOTO_SPEED)?,
            goal_threshold: params.get_double(GOTO_THRESHOLD)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PARAMS: &str = r#"
goto_speed = 1
goto_threshold = 0.3
goto_proportional_speed_limit = true
frame = "earth"
"#;

    #[test]
    fn parses_toml_parameters() {
        let params = Parameters::from_toml_str(PARAMS).unwrap();
        assert_eq!(params.get_bool(GOTO_PROPORTIONAL_SPEED_LIMIT).unwrap(), true);
        assert_eq!(params.get_double(GOTO_SPEED).unwrap(), 1.0);
        assert_eq!(
            params.get("frame"),
            Some(&ParameterValue::String("earth".to_string()))
        );

        let cfg = GotoConfig::from_parameters(&params).unwrap();
        assert_eq!(cfg.goal_threshold, 0.3);
    }

    #[test]
    fn missing_parameter_is_reported() {
        let params = Parameters::new();
        match params.get_bool(GOTO_PROPORTIONAL_SPEED_LIMIT) {
            Err(ConfigError::NotDeclared(name)) => {
                assert_eq!(name, GOTO_PROPORTIONAL_SPEED_LIMIT)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn mistyped_parameter_is_reported() {
        let mut params = Parameters::new();
        params.set(GOTO_PROPORTIONAL_SPEED_LIMIT, "yes");
        match params.get_bool(GOTO_PROPORTIONAL_SPEED_LIMIT) {
            Err(ConfigError::WrongType {
                expected, found, ..
            }) => {
                assert_eq!(expected, ParameterKind::Bool);
                assert_eq!(found, ParameterKind::String);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bad_toml_fails_to_deserialise() {
        assert!(matches!(
            Parameters::from_toml_str("goto_speed = "),
            Err(ConfigError::Deserialise(_))
        ));
    }
}
