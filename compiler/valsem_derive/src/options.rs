//! Derivation options.
//!
//! The host hands options over as string key/value pairs. Only `enabled`
//! is recognized; anything else is an error rather than silently ignored.

use std::str::FromStr;

/// Options for one compilation unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DeriveOptions {
    /// Whether derivation runs at all. Off by default.
    pub enabled: bool,
}

/// A rejected option pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("unknown option `{0}`")]
    Unknown(String),
    #[error("invalid value `{value}` for option `{option}`: expected `true` or `false`")]
    InvalidValue { option: String, value: String },
    #[error("malformed option `{0}`: expected `name=value`")]
    Malformed(String),
}

impl DeriveOptions {
    pub const ENABLED: &'static str = "enabled";

    pub fn enabled() -> Self {
        DeriveOptions { enabled: true }
    }

    /// Apply one `name = value` pair.
    pub fn apply(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        match name {
            Self::ENABLED => {
                self.enabled = bool::from_str(value).map_err(|_| OptionError::InvalidValue {
                    option: name.to_owned(),
                    value: value.to_owned(),
                })?;
                Ok(())
            }
            _ => Err(OptionError::Unknown(name.to_owned())),
        }
    }

    /// Apply a `name=value` string as passed on a command line.
    pub fn apply_pair(&mut self, pair: &str) -> Result<(), OptionError> {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| OptionError::Malformed(pair.to_owned()))?;
        self.apply(name.trim(), value.trim())
    }
}
