//! Error types for configuration and template loading
//!
//! Placement failures are not errors: they are reported through
//! [`PlacementResult`](crate::PlacementResult) with no placed room.

use thiserror::Error;

use crate::direction::Direction;
use crate::template::RoomCategory;

/// Generator configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Template pool loading errors
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template '{template}' declares more than one {direction} socket")]
    DuplicateSocket {
        template: String,
        direction: Direction,
    },

    #[error("Template pool has no {category} template")]
    EmptyPool { category: RoomCategory },
}
