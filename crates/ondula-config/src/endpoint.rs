//! Connection endpoints as written in patch files.
//!
//! An endpoint is `"<node>[:<port>]"`. The port defaults to 0. The node is a
//! block id, or one of the reserved names [`INPUT`] (composite inputs, only
//! valid as a source) and [`OUTPUT`] (composite outputs, only valid as a
//! target).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Reserved node name for the composite's inputs.
pub const INPUT: &str = "input";

/// Reserved node name for the composite's outputs.
pub const OUTPUT: &str = "output";

/// One side of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint {
    /// Block id, [`INPUT`] or [`OUTPUT`].
    pub node: String,
    /// Port on that node.
    pub port: usize,
}

impl Endpoint {
    /// Composite input `port`.
    pub fn input(port: usize) -> Self {
        Self {
            node: INPUT.to_string(),
            port,
        }
    }

    /// Composite output `port`.
    pub fn output(port: usize) -> Self {
        Self {
            node: OUTPUT.to_string(),
            port,
        }
    }

    /// Port `port` of block `id`.
    pub fn block(id: impl Into<String>, port: usize) -> Self {
        Self {
            node: id.into(),
            port,
        }
    }

    /// Returns `true` for the reserved [`INPUT`] node.
    pub fn is_input(&self) -> bool {
        self.node == INPUT
    }

    /// Returns `true` for the reserved [`OUTPUT`] node.
    pub fn is_output(&self) -> bool {
        self.node == OUTPUT
    }
}

/// Returns `true` if `id` may not be used as a block id.
pub fn is_reserved(id: &str) -> bool {
    id == INPUT || id == OUTPUT
}

impl FromStr for Endpoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (node, port) = match s.split_once(':') {
            Some((node, port)) => {
                let port = port.trim().parse::<usize>().map_err(|_| {
                    ConfigError::malformed_endpoint(s, "port is not a non-negative integer")
                })?;
                (node.trim(), port)
            }
            None => (s.trim(), 0),
        };

        if node.is_empty() {
            return Err(ConfigError::malformed_endpoint(s, "missing node name"));
        }
        Ok(Self::block(node, port))
    }
}

impl TryFrom<String> for Endpoint {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.port)
    }
}
