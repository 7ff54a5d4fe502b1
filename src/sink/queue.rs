// SPDX-License-Identifier: GPL-3.0-only

//! Asynchronous queue sink listener
//!
//! The queue strategy decouples callback execution from the capture thread:
//! the engine fills buffers into its output queue and pings `frames_queued`,
//! and a dedicated dequeue thread owned by the listener pops buffers, runs the
//! consumer callback, and returns each buffer to the engine pool.
//!
//! Shutdown protocol: `disconnected` marks the quit flag under the shared
//! lock, wakes every waiter, joins the dequeue thread (the draining phase),
//! flushes any buffers still queued, and only then delivers the end-of-stream
//! marker. Disconnect is synchronous and blocking; there is no partial
//! cancellation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

use super::types::{FrameCallback, FrameEvent, FrameStatistics, FrameTypeInfo, FrameView, SinkState};
use crate::config::SinkConfig;
use crate::engine::{FrameQueue, TransferStats};

/// Callback slot shared between the engine thread and the dequeue thread
type SharedCallback = Arc<Mutex<Option<FrameCallback>>>;

/// State guarded by the session mutex
struct SessionFlags {
    /// Set when the dequeue thread should stop waiting for frames
    quit: bool,
}

/// Wakeup plumbing shared with the dequeue thread
///
/// The quit flag and the condvar share one mutex; every decision that depends
/// on the flag is re-evaluated under that lock after waking.
struct SessionShared {
    flags: Mutex<SessionFlags>,
    wakeup: Condvar,
}

/// Per-session resources, built at connect and torn down at disconnect
struct QueueSession {
    queue: Arc<dyn FrameQueue>,
    shared: Arc<SessionShared>,
    dequeue: Option<JoinHandle<u64>>,
}

/// Asynchronous sink listener with a dedicated dequeue thread
///
/// Engine contract per session: `connected(queue, info)` once, then any
/// number of `frames_queued()` notifications from the capture thread,
/// then exactly one `disconnected()`. At most two threads touch the listener:
/// the engine thread and the listener's own dequeue thread.
pub struct QueueSinkListener {
    callback: SharedCallback,
    buffer_count: usize,
    frames_received: Arc<AtomicU64>,
    last_transfer: TransferStats,
    session: Option<QueueSession>,
}

impl QueueSinkListener {
    /// Create a listener forwarding frames to `callback`
    ///
    /// A listener without a callback is tolerated: frames and the
    /// end-of-stream marker are silently skipped, but still counted.
    pub fn new(callback: Option<FrameCallback>) -> Self {
        Self {
            callback: Arc::new(Mutex::new(callback)),
            buffer_count: 0,
            frames_received: Arc::new(AtomicU64::new(0)),
            last_transfer: TransferStats::default(),
            session: None,
        }
    }

    /// Set the preallocation depth requested from the engine at connect
    ///
    /// Read at connect time only; changing it during a session takes effect
    /// on the next cycle. Zero means no explicit preallocation.
    pub fn set_buffer_count(&mut self, count: usize) {
        self.buffer_count = count;
    }

    /// Currently configured preallocation depth
    pub fn buffer_count(&self) -> usize {
        self.buffer_count
    }

    /// Apply a sink configuration (next connect picks it up)
    pub fn configure(&mut self, config: &SinkConfig) {
        self.set_buffer_count(config.buffer_count);
    }

    /// Engine notification: a session has started
    ///
    /// Records the engine queue handle, requests buffer preallocation if
    /// configured (failure is logged, not fatal), and starts the dequeue
    /// thread. Must be called once per cycle.
    pub fn connected(&mut self, queue: Arc<dyn FrameQueue>, info: &FrameTypeInfo) {
        if self.session.is_some() {
            warn!("queue sink connected while a session is live; ignoring");
            return;
        }
        debug!(
            buffer_size = info.buffer_size,
            width = info.width,
            height = info.height,
            buffer_count = self.buffer_count,
            "queue sink connected"
        );
        self.frames_received.store(0, Ordering::SeqCst);
        self.last_transfer = TransferStats::default();

        if self.buffer_count > 0 {
            if let Err(error) = queue.alloc_and_queue_buffers(self.buffer_count) {
                // Non-fatal: the session proceeds with whatever buffers succeeded.
                warn!(
                    error = %error,
                    requested = self.buffer_count,
                    "frame buffer preallocation fell short"
                );
            }
        }

        let shared = Arc::new(SessionShared {
            flags: Mutex::new(SessionFlags { quit: false }),
            wakeup: Condvar::new(),
        });
        let dequeue = {
            let shared = Arc::clone(&shared);
            let queue = Arc::clone(&queue);
            let callback = Arc::clone(&self.callback);
            let received = Arc::clone(&self.frames_received);
            thread::spawn(move || consume_loop(&shared, queue.as_ref(), &callback, &received))
        };
        self.session = Some(QueueSession {
            queue,
            shared,
            dequeue: Some(dequeue),
        });
    }

    /// Engine notification: the output queue is non-empty
    ///
    /// Re-reads engine-level cancellation into the quit flag and wakes the
    /// dequeue thread. This is the only wakeup path besides shutdown.
    pub fn frames_queued(&mut self) {
        let Some(session) = self.session.as_ref() else {
            debug!("frames_queued outside a session; ignoring");
            return;
        };
        let mut flags = session.shared.flags.lock().unwrap();
        flags.quit = session.queue.cancel_requested();
        session.shared.wakeup.notify_one();
    }

    /// Engine notification: the session has ended
    ///
    /// Blocks until the dequeue thread has exited, flushes any buffers still
    /// queued, delivers the end-of-stream marker, and logs the session's
    /// transfer statistics. Calling this on an already-disconnected listener
    /// is a no-op.
    pub fn disconnected(&mut self) {
        let Some(mut session) = self.session.take() else {
            debug!("queue sink already disconnected; ignoring");
            return;
        };

        // Mark quit under the lock and wake every waiter.
        {
            let mut flags = session.shared.flags.lock().unwrap();
            flags.quit = true;
            session.shared.wakeup.notify_all();
        }

        // Draining: the caller blocks until the dequeue thread has exited.
        if let Some(handle) = session.dequeue.take() {
            match handle.join() {
                Ok(delivered) => debug!(delivered, "dequeue thread joined"),
                Err(e) => warn!("dequeue thread panicked: {:?}", e),
            }
        }

        // Flush whatever is still in the output queue so no received frame
        // is lost even if the dequeue thread exited early.
        let mut drained = 0u64;
        while session.queue.queued_frames() > 0 {
            let Some(buffer) = session.queue.pop_frame() else { break };
            deliver(&self.callback, buffer.as_slice(), &self.frames_received);
            session.queue.requeue_buffer(buffer);
            drained += 1;
        }

        if let Some(callback) = self.callback.lock().unwrap().as_mut() {
            callback(FrameEvent::EndOfStream);
        }

        self.last_transfer = session.queue.transfer_stats();
        info!(
            frames_received = self.frames_received.load(Ordering::SeqCst),
            frames_copied = self.last_transfer.frames_copied,
            frames_dropped = self.last_transfer.frames_dropped,
            drained,
            "queue sink disconnected"
        );
    }

    /// Current lifecycle state
    ///
    /// Draining is reported once quit has been signaled (engine cancellation
    /// observed by `frames_queued`) while the session still exists.
    pub fn state(&self) -> SinkState {
        match &self.session {
            None => SinkState::Disconnected,
            Some(session) => {
                if session.shared.flags.lock().unwrap().quit {
                    SinkState::Draining
                } else {
                    SinkState::Connected
                }
            }
        }
    }

    /// Diagnostic counters for the current (or last) session
    pub fn stats(&self) -> FrameStatistics {
        FrameStatistics {
            frames_received: self.frames_received.load(Ordering::SeqCst),
            frames_copied: self.last_transfer.frames_copied,
            frames_dropped: self.last_transfer.frames_dropped,
        }
    }
}

impl Drop for QueueSinkListener {
    fn drop(&mut self) {
        // A listener dropped mid-session still quiesces its thread, but the
        // normal drain + end-marker protocol only runs through disconnected().
        if let Some(mut session) = self.session.take() {
            debug!("queue sink dropped with a live session; quiescing");
            {
                let mut flags = session.shared.flags.lock().unwrap();
                flags.quit = true;
                session.shared.wakeup.notify_all();
            }
            if let Some(handle) = session.dequeue.take() {
                if handle.join().is_err() {
                    warn!("dequeue thread panicked during drop");
                }
            }
        }
    }
}

impl std::fmt::Debug for QueueSinkListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueSinkListener")
            .field("state", &self.state())
            .field("buffer_count", &self.buffer_count)
            .field("frames_received", &self.frames_received.load(Ordering::SeqCst))
            .finish()
    }
}

/// Run the consumer callback for one popped buffer
fn deliver(callback: &SharedCallback, bytes: &[u8], received: &AtomicU64) {
    received.fetch_add(1, Ordering::SeqCst);
    if let Some(callback) = callback.lock().unwrap().as_mut() {
        callback(FrameEvent::Frame(FrameView::new(bytes)));
    }
}

/// Dequeue thread body
///
/// Waits for "output queue non-empty or quit requested", then pops one buffer,
/// delivers it, and returns it to the engine pool. Returns the number of
/// frames delivered by this thread.
fn consume_loop(
    shared: &SessionShared,
    queue: &dyn FrameQueue,
    callback: &SharedCallback,
    received: &AtomicU64,
) -> u64 {
    debug!("dequeue thread started");
    let mut delivered = 0u64;
    loop {
        {
            let mut flags = shared.flags.lock().unwrap();
            // Condvars wake spuriously; the condition must be re-checked in a
            // loop under the lock, never assumed from the pre-wait value.
            while queue.queued_frames() == 0 && !flags.quit {
                flags = shared.wakeup.wait(flags).unwrap();
            }
            if flags.quit && queue.queued_frames() == 0 {
                break;
            }
        }
        // Pop and deliver outside the lock so the engine thread's
        // frames_queued never blocks on consumer processing time.
        let Some(buffer) = queue.pop_frame() else { continue };
        deliver(callback, buffer.as_slice(), received);
        queue.requeue_buffer(buffer);
        delivered += 1;
    }
    debug!(delivered, "dequeue thread exiting");
    delivered
}
