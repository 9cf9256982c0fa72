// ABOUTME: Host names from the deployments list.
// ABOUTME: Rejects values that cannot be embedded in ssh:// and http:// URLs.

use serde::{Deserialize, Deserializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("host name cannot be empty")]
    Empty,

    #[error("invalid character in host name '{host}': '{ch}'")]
    InvalidChar { host: String, ch: char },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Host(String);

impl Host {
    pub fn new(value: &str) -> Result<Self, HostError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(HostError::Empty);
        }

        if let Some(ch) = value
            .chars()
            // Ports and IPv6 literals would need bracketing in both URLs
            .find(|c| c.is_whitespace() || matches!(c, '/' | '@' | ':' | '[' | ']' | '\'' | '"'))
        {
            return Err(HostError::InvalidChar {
                host: value.to_string(),
                ch,
            });
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Host {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(&value).map_err(serde::de::Error::custom)
    }
}
