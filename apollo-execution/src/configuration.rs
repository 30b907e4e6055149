//! Execution options.
//!
//! Every field has a default, so an empty YAML document is a valid configuration.

use std::str::FromStr;

use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

/// Default maximum selection nesting depth.
pub(crate) const DEFAULT_MAX_DEPTH: usize = 512;

/// Options applied to every request run by an [`Executor`](crate::Executor).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct Configuration {
    /// Serve the `__schema` and `__type` meta fields on the query root.
    pub introspection: bool,

    /// Request limits.
    pub limits: Limits,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            introspection: true,
            limits: Limits::default(),
        }
    }
}

#[buildstructor::buildstructor]
impl Configuration {
    #[builder(visibility = "pub")]
    fn new(introspection: Option<bool>, max_depth: Option<usize>) -> Self {
        Self {
            introspection: introspection.unwrap_or(true),
            limits: Limits {
                max_depth: max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            },
        }
    }
}

/// Parse configuration from a string in YAML syntax
impl FromStr for Configuration {
    type Err = serde_yaml::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_yaml::from_str(s)
    }
}

/// Limits on the shape of executed operations.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct Limits {
    /// Maximum nesting depth of the executed selection, with fragments expanded.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
