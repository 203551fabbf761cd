//! Single-slot frame handoff.
//!
//! Bounds the work queued between the frame producer and the converter
//! to one frame. When the consumer has not yet drained the previous
//! frame, the new one is dropped and counted, so a slow consumer sheds
//! load deterministically instead of blocking the producer.

use crate::session::RawFrame;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// A one-deep frame slot between producer and consumer.
pub struct FrameSlot {
    tx: Sender<RawFrame>,
    rx: Receiver<RawFrame>,
    dropped: u64,
}

impl FrameSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self { tx, rx, dropped: 0 }
    }

    /// Offers a frame to the slot.
    ///
    /// Returns true if the frame was accepted. When the previous frame
    /// has not been consumed the new frame is dropped and counted, and
    /// this returns false.
    pub fn offer(&mut self, frame: RawFrame) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(frame)) => {
                self.dropped += 1;
                tracing::trace!(
                    sequence = frame.sequence(),
                    dropped = self.dropped,
                    "frame dropped, slot occupied"
                );
                false
            }
            // Both endpoints live in this struct, so the channel can
            // never disconnect; treat it as a drop if it somehow does.
            Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Removes and returns the pending frame, if any.
    pub fn take(&mut self) -> Option<RawFrame> {
        self.rx.try_recv().ok()
    }

    /// Returns the number of frames dropped because the slot was full.
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSlot")
            .field("occupied", &!self.rx.is_empty())
            .field("dropped", &self.dropped)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(sequence: u64) -> RawFrame {
        RawFrame::new(vec![0u8; 6], sequence)
    }

    #[test]
    fn test_offer_take_round_trip() {
        let mut slot = FrameSlot::new();
        assert!(slot.take().is_none());
        assert!(slot.offer(frame(1)));
        assert_eq!(slot.take().unwrap().sequence(), 1);
        assert!(slot.take().is_none());
    }

    #[test]
    fn test_full_slot_drops_newest() {
        let mut slot = FrameSlot::new();
        assert!(slot.offer(frame(1)));
        assert!(!slot.offer(frame(2)));
        assert!(!slot.offer(frame(3)));
        assert_eq!(slot.dropped(), 2);
        // The pending frame is the first one; the late ones were shed
        assert_eq!(slot.take().unwrap().sequence(), 1);
        assert!(slot.offer(frame(4)));
    }
}
