/// Proof that the holder owns the single request slot.
///
/// Deliberately neither `Clone` nor `Copy`: each ticket is handed back exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct BusyTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("another request is already in flight")]
pub struct Busy;

/// Allows at most one request in flight per view.
#[derive(Debug, Default)]
pub struct RequestGuard {
    current: Option<u64>,
    issued: u64,
}

impl RequestGuard {
    pub fn try_acquire(&mut self) -> Result<BusyTicket, Busy> {
        if self.current.is_some() {
            return Err(Busy);
        }

        self.issued += 1;
        self.current = Some(self.issued);
        Ok(BusyTicket(self.issued))
    }

    /// Frees the slot. Returns false when the ticket is no longer the current
    /// one, in which case the caller must discard the result it carries.
    pub fn release(&mut self, ticket: BusyTicket) -> bool {
        if self.current == Some(ticket.0) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Forgets the outstanding ticket, if any.
    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_until_release() {
        let mut guard = RequestGuard::default();

        let ticket = guard.try_acquire().unwrap();
        assert!(guard.is_busy());
        assert_eq!(guard.try_acquire(), Err(Busy));

        assert!(guard.release(ticket));
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_ok());
    }

    #[test]
    fn ticket_from_before_reset_is_stale() {
        let mut guard = RequestGuard::default();
        let stale = guard.try_acquire().unwrap();

        guard.reset();
        let fresh = guard.try_acquire().unwrap();

        assert!(!guard.release(stale));
        assert!(guard.is_busy());
        assert!(guard.release(fresh));
    }
}
