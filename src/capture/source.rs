//! Frame sources
//!
//! The video pipeline is an external collaborator; the session only needs to
//! pull "the current frame" from it on each poll.

use std::collections::VecDeque;

use crate::errors::ScanError;
use crate::types::PixelBuffer;

/// Pull-based access to the live feed.
pub trait FrameSource: Send {
    /// The current frame, or `None` while the feed is not ready yet.
    /// A 0x0 buffer is treated the same as `None`.
    fn current_frame(&mut self) -> Option<PixelBuffer>;

    /// Begin delivering frames
    fn start(&mut self) -> Result<(), ScanError> {
        Ok(())
    }

    /// Stop the feed and release it
    fn stop(&mut self) {}

    fn is_running(&self) -> bool {
        true
    }
}

/// Plays back a fixed list of frames, one per poll, then keeps returning the
/// last one. Frames are only handed out while started.
#[derive(Debug, Default)]
pub struct ReplaySource {
    pending: VecDeque<Option<PixelBuffer>>,
    last: Option<PixelBuffer>,
    running: bool,
}

impl ReplaySource {
    pub fn new<I: IntoIterator<Item = PixelBuffer>>(frames: I) -> Self {
        Self {
            pending: frames.into_iter().map(Some).collect(),
            last: None,
            running: false,
        }
    }

    /// Queue a poll on which the feed is not ready
    pub fn push_not_ready(&mut self) {
        self.pending.push_back(None);
    }

    pub fn push(&mut self, frame: PixelBuffer) {
        self.pending.push_back(Some(frame));
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for ReplaySource {
    fn current_frame(&mut self) -> Option<PixelBuffer> {
        if !self.running {
            return None;
        }
        match self.pending.pop_front() {
            Some(Some(frame)) => {
                self.last = Some(frame.clone());
                Some(frame)
            }
            Some(None) => None,
            None => self.last.clone(),
        }
    }

    fn start(&mut self) -> Result<(), ScanError> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Returns the same frame on every poll while started
#[derive(Debug)]
pub struct StillSource {
    frame: PixelBuffer,
    running: bool,
}

impl StillSource {
    pub fn new(frame: PixelBuffer) -> Self {
        Self {
            frame,
            running: false,
        }
    }
}

impl FrameSource for StillSource {
    fn current_frame(&mut self) -> Option<PixelBuffer> {
        self.running.then(|| self.frame.clone())
    }

    fn start(&mut self) -> Result<(), ScanError> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
