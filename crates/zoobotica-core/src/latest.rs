//! Last-issued-wins slot for overlapping requests.
//!
//! Every outgoing request takes a [`Ticket`]. A completion is stored only if
//! no newer ticket has completed yet, so a slow response to an old request can
//! never overwrite the answer to a newer one.

/// Issue order of a request. Higher is newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Latest<T> {
    issued: u64,
    applied: Option<Ticket>,
    value: Option<T>,
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self {
            issued: 0,
            applied: None,
            value: None,
        }
    }

    /// Register a new outgoing request.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Record the response to `ticket`. Returns whether it was kept.
    pub fn complete(&mut self, ticket: Ticket, value: T) -> bool {
        if self.applied.is_some_and(|applied| applied >= ticket) {
            return false;
        }
        self.applied = Some(ticket);
        self.value = Some(value);
        true
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }
}
