// SPDX-License-Identifier: GPL-3.0-only

//! camera-sink - frame-delivery core for camera acquisition
//!
//! This library moves image frames produced by an external capture engine to
//! application code through a consumer callback, decoupling the capture
//! engine's thread from the consumer's processing time.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`sink`]: The sink listener subsystem: the notification (synchronous)
//!   and queue (asynchronous) delivery strategies plus the strategy selector
//! - [`engine`]: The narrow trait interface through which the capture engine
//!   is consumed
//! - [`config`]: Sink configuration (buffer preallocation depth)
//! - [`errors`]: Engine-reported error types
//!
//! # Example
//!
//! ```ignore
//! use camera_sink::{FrameEvent, FrameSink, QueueSinkListener, SinkConfig};
//!
//! let callback = Box::new(|event: FrameEvent<'_>| match event {
//!     FrameEvent::Frame(view) => println!("frame: {} bytes", view.len()),
//!     FrameEvent::EndOfStream => println!("end of acquisition"),
//! });
//! let mut sink = FrameSink::from(QueueSinkListener::new(Some(callback)));
//! sink.configure(&SinkConfig { buffer_count: 3 });
//! // The capture engine then drives connected / frames_queued / disconnected.
//! ```

pub mod config;
pub mod engine;
pub mod errors;
pub mod sink;

// Re-export commonly used types
pub use config::SinkConfig;
pub use engine::{FrameQueue, QueueBuffer, TransferStats};
pub use errors::{EngineError, EngineResult};
pub use sink::{
    FrameCallback, FrameEvent, FrameSink, FrameStatistics, FrameTypeInfo, FrameView,
    NotificationSinkListener, QueueSinkListener, SinkKind, SinkState,
};
