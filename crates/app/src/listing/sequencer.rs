//! Request sequencing

use std::sync::atomic::{AtomicU64, Ordering};

/// Id of one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Hands out monotonically increasing tickets so only the newest fetch of a
/// view gets applied.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    /// New sequencer; the first ticket is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket, making every earlier one stale.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel).saturating_add(1))
    }

    /// Whether `ticket` is still the newest issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}
