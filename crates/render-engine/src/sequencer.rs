//! Per-surface redraw serialization.
//!
//! Every redraw takes a ticket before it starts. Only the most recently
//! issued ticket may publish its frame; anything older was superseded while
//! it was in flight and is dropped, so a surface never shows a stale or
//! interleaved frame.

use daymap_common::error::{DaymapError, DaymapResult};

/// Why a redraw was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawCause {
    /// Event list or target year changed.
    Data,
    /// Viewport size or device pixel ratio changed.
    Viewport,
}

/// Handle for one in-flight redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    id: u64,
    cause: RedrawCause,
}

impl FrameTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cause(&self) -> RedrawCause {
        self.cause
    }
}

/// Result of publishing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    /// A newer redraw started after this one; its frame was dropped.
    Superseded,
}

/// Issues tickets and holds the last published frame for one surface.
#[derive(Debug)]
pub struct FrameSequencer<F> {
    issued: u64,
    shown: Option<(u64, F)>,
}

impl<F> Default for FrameSequencer<F> {
    fn default() -> Self {
        Self {
            issued: 0,
            shown: None,
        }
    }
}

impl<F> FrameSequencer<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a redraw, superseding any redraw still in flight.
    pub fn begin(&mut self, cause: RedrawCause) -> FrameTicket {
        self.issued += 1;
        tracing::trace!(ticket = self.issued, ?cause, "redraw started");
        FrameTicket {
            id: self.issued,
            cause,
        }
    }

    /// Whether `ticket` is still the newest redraw.
    pub fn is_current(&self, ticket: &FrameTicket) -> bool {
        ticket.id == self.issued
    }

    /// Publish the frame produced for `ticket` unless it was superseded.
    pub fn commit(&mut self, ticket: FrameTicket, frame: F) -> Commit {
        if !self.is_current(&ticket) {
            tracing::debug!(
                ticket = ticket.id,
                newest = self.issued,
                "dropping superseded frame"
            );
            return Commit::Superseded;
        }
        self.shown = Some((ticket.id, frame));
        Commit::Applied
    }

    /// Commit and hand back the published frame, or a render error if the
    /// redraw was superseded.
    pub fn publish(&mut self, ticket: FrameTicket, frame: F) -> DaymapResult<&F> {
        match self.commit(ticket, frame) {
            Commit::Applied => self
                .current()
                .ok_or_else(|| DaymapError::render("published frame is missing")),
            Commit::Superseded => Err(DaymapError::render(format!(
                "redraw {} was superseded by redraw {}",
                ticket.id, self.issued
            ))),
        }
    }

    /// Last published frame.
    pub fn current(&self) -> Option<&F> {
        self.shown.as_ref().map(|(_, frame)| frame)
    }

    /// Ticket id of the last published frame.
    pub fn shown_id(&self) -> Option<u64> {
        self.shown.as_ref().map(|(id, _)| *id)
    }
}
