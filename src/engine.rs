// SPDX-License-Identifier: GPL-3.0-only

//! Capture-engine-facing interface
//!
//! The capture engine (hardware/driver layer) is an external collaborator.
//! The sink listeners consume it exclusively through the narrow [`FrameQueue`]
//! trait defined here: querying the output queue, popping and returning
//! buffers, requesting preallocation, and reading cancellation and transfer
//! counters. Engine internals (how frames are produced, how buffers are
//! allocated) stay behind this seam.

use crate::errors::EngineResult;

/// An engine-owned frame buffer handle
///
/// The engine allocates these, fills them with frame content, and hands them
/// out through [`FrameQueue::pop_frame`]. The sink only borrows the bytes for
/// the duration of one callback invocation and must return every popped
/// buffer exactly once via [`FrameQueue::requeue_buffer`].
pub struct QueueBuffer {
    bytes: Box<[u8]>,
}

impl QueueBuffer {
    /// Wrap engine-allocated memory in a buffer handle
    pub fn new(bytes: Box<[u8]>) -> Self {
        Self { bytes }
    }

    /// Frame content of this buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the frame content in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Recover the underlying allocation, for engine-side pool reuse
    pub fn into_bytes(self) -> Box<[u8]> {
        self.bytes
    }
}

impl std::fmt::Debug for QueueBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "QueueBuffer({} bytes)", self.bytes.len())
    }
}

/// Cumulative frame transfer counters maintained by the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    /// Frames the engine copied into sink buffers
    pub frames_copied: u64,
    /// Frames the engine dropped for lack of a free buffer
    pub frames_dropped: u64,
}

/// Engine-side frame queue consumed by the queue sink listener
///
/// Implementations are driver adapters (or test mocks). All methods may be
/// called from the listener's dequeue thread as well as the engine thread,
/// so implementations must be internally synchronized.
pub trait FrameQueue: Send + Sync {
    /// Number of filled buffers currently waiting in the output queue
    fn queued_frames(&self) -> usize;

    /// Pop the oldest filled buffer, if any
    fn pop_frame(&self) -> Option<QueueBuffer>;

    /// Hand a popped buffer back to the engine pool for reuse
    fn requeue_buffer(&self, buffer: QueueBuffer);

    /// Ask the engine to allocate and enqueue `count` empty frame buffers
    ///
    /// Partial grants are reported as an error so the caller can log the
    /// shortfall; the buffers that did succeed remain queued either way.
    fn alloc_and_queue_buffers(&self, count: usize) -> EngineResult<()>;

    /// Whether the engine has requested cancellation of the running session
    fn cancel_requested(&self) -> bool;

    /// Cumulative copied/dropped counters for the running session
    fn transfer_stats(&self) -> TransferStats;
}
