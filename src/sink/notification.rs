// SPDX-License-Identifier: GPL-3.0-only

//! Synchronous notification sink listener
//!
//! The notification strategy forwards every frame to the consumer callback on
//! the capture engine's own thread: no buffering, no thread creation, at most
//! one frame in flight. The borrowed frame view is invalid the instant the
//! call returns.

use tracing::{debug, info};

use super::types::{FrameCallback, FrameEvent, FrameStatistics, FrameTypeInfo, FrameView, SinkState};

/// Synchronous sink listener delivering frames on the engine thread
///
/// Engine contract per session: `connected(info)`, then zero or more
/// `frame_received(view)`, then exactly one `disconnected()`. All three run on
/// the engine thread.
pub struct NotificationSinkListener {
    callback: Option<FrameCallback>,
    frames_received: u64,
    state: SinkState,
}

impl NotificationSinkListener {
    /// Create a listener forwarding frames to `callback`
    ///
    /// A listener without a callback is tolerated: frames and the end-of-stream
    /// marker are silently skipped, but still counted.
    pub fn new(callback: Option<FrameCallback>) -> Self {
        Self {
            callback,
            frames_received: 0,
            state: SinkState::Disconnected,
        }
    }

    /// Engine notification: a session has started
    ///
    /// Resets the frame counter; no other side effect.
    pub fn connected(&mut self, info: &FrameTypeInfo) {
        debug!(
            buffer_size = info.buffer_size,
            width = info.width,
            height = info.height,
            "notification sink connected"
        );
        self.frames_received = 0;
        self.state = SinkState::Connected;
    }

    /// Engine notification: one frame is available
    ///
    /// Invokes the callback synchronously; the view is not retained.
    pub fn frame_received(&mut self, frame: FrameView<'_>) {
        self.frames_received += 1;
        if let Some(callback) = self.callback.as_mut() {
            callback(FrameEvent::Frame(frame));
        }
    }

    /// Engine notification: the session has ended
    ///
    /// Delivers the end-of-stream marker and logs the session total. Calling
    /// this on an already-disconnected listener is a no-op.
    pub fn disconnected(&mut self) {
        if self.state == SinkState::Disconnected {
            debug!("notification sink already disconnected; ignoring");
            return;
        }
        if let Some(callback) = self.callback.as_mut() {
            callback(FrameEvent::EndOfStream);
        }
        info!(
            frames_received = self.frames_received,
            "notification sink disconnected"
        );
        self.state = SinkState::Disconnected;
    }

    /// Current lifecycle state
    pub fn state(&self) -> SinkState {
        self.state
    }

    /// Diagnostic counters for the current (or last) session
    ///
    /// The notification strategy never buffers, so copied/dropped stay zero.
    pub fn stats(&self) -> FrameStatistics {
        FrameStatistics {
            frames_received: self.frames_received,
            frames_copied: 0,
            frames_dropped: 0,
        }
    }
}

impl std::fmt::Debug for NotificationSinkListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationSinkListener")
            .field("state", &self.state)
            .field("frames_received", &self.frames_received)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_callback(log: &Arc<Mutex<Vec<Option<usize>>>>) -> FrameCallback {
        let log = Arc::clone(log);
        Box::new(move |event| {
            let entry = match event {
                FrameEvent::Frame(view) => Some(view.len()),
                FrameEvent::EndOfStream => None,
            };
            log.lock().unwrap().push(entry);
        })
    }

    #[test]
    fn test_frames_then_single_end_marker() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut listener = NotificationSinkListener::new(Some(recording_callback(&log)));

        listener.connected(&FrameTypeInfo::default());
        for _ in 0..3 {
            listener.frame_received(FrameView::new(&[0u8; 16]));
        }
        listener.disconnected();

        let log = log.lock().unwrap();
        assert_eq!(
            log.as_slice(),
            &[Some(16), Some(16), Some(16), None],
            "three frames then exactly one end marker"
        );
    }

    #[test]
    fn test_counter_resets_per_cycle() {
        let mut listener = NotificationSinkListener::new(None);

        listener.connected(&FrameTypeInfo::default());
        listener.frame_received(FrameView::new(&[0u8; 8]));
        listener.frame_received(FrameView::new(&[0u8; 8]));
        listener.disconnected();
        assert_eq!(listener.stats().frames_received, 2);

        listener.connected(&FrameTypeInfo::default());
        assert_eq!(listener.stats().frames_received, 0);
        listener.frame_received(FrameView::new(&[0u8; 8]));
        listener.disconnected();
        assert_eq!(listener.stats().frames_received, 1);
    }

    #[test]
    fn test_missing_callback_is_tolerated_and_counted() {
        let mut listener = NotificationSinkListener::new(None);
        listener.connected(&FrameTypeInfo::default());
        listener.frame_received(FrameView::new(&[0u8; 32]));
        listener.disconnected();
        assert_eq!(listener.stats().frames_received, 1);
        assert_eq!(listener.state(), SinkState::Disconnected);
    }

    #[test]
    fn test_disconnect_when_disconnected_is_noop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut listener = NotificationSinkListener::new(Some(recording_callback(&log)));

        listener.disconnected();
        assert!(log.lock().unwrap().is_empty(), "no end marker without a session");

        listener.connected(&FrameTypeInfo::default());
        listener.disconnected();
        listener.disconnected();
        assert_eq!(
            log.lock().unwrap().as_slice(),
            &[None::<usize>],
            "one end marker per cycle even with repeated disconnects"
        );
    }
}
