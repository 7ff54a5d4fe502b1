// SPDX-License-Identifier: GPL-3.0-only
// Shared types for the sink listener strategies

//! Shared types for sink listeners

use serde::{Deserialize, Serialize};

/// Non-owning view of one captured frame's bytes
///
/// A view is valid only for the duration of a single callback invocation.
/// The underlying memory belongs to the capture engine (or its output queue);
/// consumers must copy anything they want to keep.
#[derive(Clone, Copy)]
pub struct FrameView<'a> {
    data: &'a [u8],
}

impl<'a> FrameView<'a> {
    /// Create a view over engine-owned frame bytes
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Frame content
    pub fn as_slice(&self) -> &[u8] {
        self.data
    }

    /// Length of the frame content in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the view holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Debug for FrameView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameView({} bytes)", self.data.len())
    }
}

/// One consumer callback invocation
#[derive(Debug, Clone, Copy)]
pub enum FrameEvent<'a> {
    /// A captured frame, valid only for the duration of the call
    Frame(FrameView<'a>),
    /// End-of-stream marker: no further frames will arrive this session.
    /// Delivered exactly once per connect/disconnect cycle, always last.
    EndOfStream,
}

impl FrameEvent<'_> {
    /// Check if this event is the end-of-stream marker
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, FrameEvent::EndOfStream)
    }

    /// Frame length in bytes (zero for the end-of-stream marker)
    pub fn len(&self) -> usize {
        match self {
            FrameEvent::Frame(view) => view.len(),
            FrameEvent::EndOfStream => 0,
        }
    }

    /// Check if the event carries no frame bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Application-supplied consumer callback
///
/// Invoked once per delivered frame and exactly once more per session with
/// [`FrameEvent::EndOfStream`]. Session-scoped consumer context travels by
/// closure capture. The queue strategy invokes this from its dequeue thread,
/// hence `Send`.
pub type FrameCallback = Box<dyn FnMut(FrameEvent<'_>) + Send>;

/// Lifecycle state of a sink listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SinkState {
    /// No session; initial and terminal state of every cycle
    #[default]
    Disconnected,
    /// A session is live and frames may be delivered
    Connected,
    /// Shutdown requested; buffered frames are still being flushed
    Draining,
}

impl std::fmt::Display for SinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkState::Disconnected => write!(f, "disconnected"),
            SinkState::Connected => write!(f, "connected"),
            SinkState::Draining => write!(f, "draining"),
        }
    }
}

/// Which delivery strategy a sink uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SinkKind {
    /// Synchronous, unbuffered delivery on the capture thread
    Notification,
    /// Buffered, asynchronous delivery via a dedicated dequeue thread
    Queue,
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkKind::Notification => write!(f, "notification"),
            SinkKind::Queue => write!(f, "queue"),
        }
    }
}

/// Per-session format descriptor handed to `connected` by the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameTypeInfo {
    /// Size in bytes of one frame buffer for this session
    pub buffer_size: usize,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

/// Diagnostic frame counters for one sink listener
///
/// Received is counted by the listener itself; copied/dropped are read back
/// from the engine at disconnect. None of these drive control decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStatistics {
    /// Frames delivered to (or counted past) the consumer callback
    pub frames_received: u64,
    /// Frames the engine copied into sink buffers
    pub frames_copied: u64,
    /// Frames the engine dropped for lack of a free buffer
    pub frames_dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_view_reports_length() {
        let bytes = [0u8; 64];
        let view = FrameView::new(&bytes);
        assert_eq!(view.len(), 64);
        assert!(!view.is_empty());
        assert_eq!(format!("{:?}", view), "FrameView(64 bytes)");
    }

    #[test]
    fn test_end_of_stream_is_empty() {
        let event = FrameEvent::EndOfStream;
        assert!(event.is_end_of_stream());
        assert_eq!(event.len(), 0);
        assert!(event.is_empty());
    }

    #[test]
    fn test_sink_state_default_is_disconnected() {
        assert_eq!(SinkState::default(), SinkState::Disconnected);
        assert_eq!(SinkState::Draining.to_string(), "draining");
    }
}
