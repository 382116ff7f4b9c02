//! Core error types.
//!
//! Out-of-bounds grid access and rejected moves are not errors here: the grid
//! ignores them and the turn economy answers with `bool`. What remains is loading
//! configuration and the cascade non-termination guard.

use std::path::PathBuf;

/// Failure to read or parse a battle configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON")]
    Parse(#[from] serde_json::Error),
}

/// Internal-consistency failure while resolving a cascade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CascadeError {
    /// The clear/gravity/refill loop did not settle. Only reachable with a
    /// pathological configuration such as a single tile type.
    #[error("cascade did not settle within {limit} iterations")]
    IterationLimit { limit: usize },
}
