// SPDX-License-Identifier: GPL-3.0-only

//! Sink listener subsystem
//!
//! Two alternative strategies for receiving frames from the capture engine,
//! erased behind one engine-facing handle type:
//!
//! ```text
//! ┌──────────────────┐
//! │  Capture engine  │  (external; hardware/driver layer)
//! └────────┬─────────┘
//!          │ connected / frame_received / frames_queued / disconnected
//!          ▼
//! ┌──────────────────┐
//! │    FrameSink     │  ← strategy selector (tagged variant)
//! └────────┬─────────┘
//!          │
//!    ┌─────┴──────────────────┐
//!    ▼                        ▼
//! ┌──────────────┐   ┌────────────────┐
//! │ Notification │   │     Queue      │
//! │  (engine     │   │ (dequeue thread│
//! │   thread)    │   │  + drain)      │
//! └──────┬───────┘   └───────┬────────┘
//!        │                   │
//!        ▼                   ▼
//!      consumer callback (FrameEvent)
//! ```

pub mod notification;
pub mod queue;
pub mod types;

pub use notification::NotificationSinkListener;
pub use queue::QueueSinkListener;
pub use types::{
    FrameCallback, FrameEvent, FrameStatistics, FrameTypeInfo, FrameView, SinkKind, SinkState,
};

use std::sync::Arc;
use tracing::warn;

use crate::config::SinkConfig;
use crate::engine::FrameQueue;

/// Strategy-erased sink handle
///
/// Wraps either listener so that setup code does not need to know which
/// delivery strategy is active. Carries no state of its own; every call is
/// pure dispatch. Strategy-specific entry points are no-ops on the other
/// variant, mirroring the engine contract (the engine only fires the
/// notifications that match the sink type it was given).
pub enum FrameSink {
    /// Synchronous, unbuffered delivery on the capture thread
    Notification(NotificationSinkListener),
    /// Buffered, asynchronous delivery via a dedicated dequeue thread
    Queue(QueueSinkListener),
}

impl From<NotificationSinkListener> for FrameSink {
    fn from(listener: NotificationSinkListener) -> Self {
        FrameSink::Notification(listener)
    }
}

impl From<QueueSinkListener> for FrameSink {
    fn from(listener: QueueSinkListener) -> Self {
        FrameSink::Queue(listener)
    }
}

impl FrameSink {
    /// Which delivery strategy this sink uses
    pub fn kind(&self) -> SinkKind {
        match self {
            FrameSink::Notification(_) => SinkKind::Notification,
            FrameSink::Queue(_) => SinkKind::Queue,
        }
    }

    /// Apply a sink configuration before connect
    ///
    /// The buffer count only means something to the queue strategy; for a
    /// notification sink this does nothing, like the original setup helper.
    pub fn configure(&mut self, config: &SinkConfig) {
        match self {
            FrameSink::Notification(_) => {}
            FrameSink::Queue(listener) => listener.configure(config),
        }
    }

    /// Engine notification: a session has started
    ///
    /// The queue strategy needs the engine's queue handle; the notification
    /// strategy ignores it.
    pub fn connected(&mut self, queue: Option<Arc<dyn FrameQueue>>, info: &FrameTypeInfo) {
        match (self, queue) {
            (FrameSink::Notification(listener), _) => listener.connected(info),
            (FrameSink::Queue(listener), Some(queue)) => listener.connected(queue, info),
            (FrameSink::Queue(_), None) => {
                warn!("queue sink connected without an engine queue handle; ignoring");
            }
        }
    }

    /// Engine notification: one frame is available (notification strategy)
    pub fn frame_received(&mut self, frame: FrameView<'_>) {
        if let FrameSink::Notification(listener) = self {
            listener.frame_received(frame);
        }
    }

    /// Engine notification: the output queue is non-empty (queue strategy)
    pub fn frames_queued(&mut self) {
        if let FrameSink::Queue(listener) = self {
            listener.frames_queued();
        }
    }

    /// Engine notification: the session has ended
    pub fn disconnected(&mut self) {
        match self {
            FrameSink::Notification(listener) => listener.disconnected(),
            FrameSink::Queue(listener) => listener.disconnected(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SinkState {
        match self {
            FrameSink::Notification(listener) => listener.state(),
            FrameSink::Queue(listener) => listener.state(),
        }
    }

    /// Diagnostic counters for the current (or last) session
    pub fn stats(&self) -> FrameStatistics {
        match self {
            FrameSink::Notification(listener) => listener.stats(),
            FrameSink::Queue(listener) => listener.stats(),
        }
    }
}

impl std::fmt::Debug for FrameSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameSink::{}({})", self.kind(), self.state())
    }
}
