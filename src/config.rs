// SPDX-License-Identifier: GPL-3.0-only

//! Sink delivery configuration

use serde::{Deserialize, Serialize};

/// Buffer count meaning "let the engine pick its own preallocation depth"
pub const ENGINE_DEFAULT_BUFFERS: usize = 0;

/// Configuration applied to a sink listener before each connect
///
/// The buffer count is read at connect time only; changing it while a session
/// is live takes effect on the next connect/disconnect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Number of frame buffers the engine should allocate and enqueue up
    /// front for the queue strategy. Zero means no explicit preallocation.
    /// Ignored by the notification strategy, which never buffers.
    pub buffer_count: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            buffer_count: ENGINE_DEFAULT_BUFFERS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_requests_no_preallocation() {
        assert_eq!(SinkConfig::default().buffer_count, ENGINE_DEFAULT_BUFFERS);
    }
}
