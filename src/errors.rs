// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the sink listener subsystem
//!
//! Nothing here escalates past the listener boundary: engine-reported errors
//! are reduced to log output where they occur and the session continues with
//! whatever resources succeeded.

use std::fmt;

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors reported by the capture engine through the sink interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Buffer preallocation could not be satisfied in full
    AllocationFailed(String),
    /// Any other engine-side fault surfaced through the queue interface
    Engine(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::AllocationFailed(msg) => {
                write!(f, "Buffer allocation failed: {}", msg)
            }
            EngineError::Engine(msg) => write!(f, "Engine error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<String> for EngineError {
    fn from(msg: String) -> Self {
        EngineError::Engine(msg)
    }
}

impl From<&str> for EngineError {
    fn from(msg: &str) -> Self {
        EngineError::Engine(msg.to_string())
    }
}
