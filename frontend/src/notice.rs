//! Transient success and error messages shown above the expense form.

use std::cell::RefCell;
use std::time::Duration;

use gloo_timers::callback::Timeout;

/// How long a message stays on screen after it was last posted.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Identifies the most recent post. An expiry carrying an older ticket is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeTicket(u64);

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Notices {
    success: Option<String>,
    error: Option<String>,
    generation: u64,
}

impl Notices {
    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.success.is_none() && self.error.is_none()
    }

    pub fn post_success(&mut self, message: &str) -> NoticeTicket {
        self.success = Some(message.to_string());
        self.bump()
    }

    pub fn post_error(&mut self, message: &str) -> NoticeTicket {
        self.error = Some(message.to_string());
        self.bump()
    }

    /// Clears both slots straight away, invalidating any pending expiry.
    pub fn dismiss(&mut self) {
        self.success = None;
        self.error = None;
        self.bump();
    }

    /// Clears both slots if `ticket` belongs to the latest post.
    pub fn expire(&mut self, ticket: NoticeTicket) -> bool {
        if ticket.0 != self.generation {
            return false;
        }

        self.success = None;
        self.error = None;
        true
    }

    fn bump(&mut self) -> NoticeTicket {
        self.generation += 1;
        NoticeTicket(self.generation)
    }
}

/// Runs a callback once after a delay. Arming again cancels the pending callback.
pub trait NoticeTimer {
    fn arm(&self, after: Duration, fire: Box<dyn FnOnce()>);
}

/// Browser timer backed by `setTimeout`.
#[derive(Default)]
pub struct BrowserTimer {
    pending: RefCell<Option<Timeout>>,
}

impl NoticeTimer for BrowserTimer {
    fn arm(&self, after: Duration, fire: Box<dyn FnOnce()>) {
        let millis = u32::try_from(after.as_millis()).unwrap_or(u32::MAX);
        // Dropping the previous `Timeout` calls `clearTimeout` on it.
        self.pending.replace(Some(Timeout::new(millis, fire)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_post_supersedes_older_ticket() {
        let mut notices = Notices::default();

        let first = notices.post_success("saved");
        let second = notices.post_error("failed");

        assert!(!notices.expire(first));
        assert_eq!(notices.success(), Some("saved"));
        assert_eq!(notices.error(), Some("failed"));

        assert!(notices.expire(second));
        assert!(notices.is_empty());
    }

    #[test]
    fn dismiss_clears_and_invalidates_pending_expiry() {
        let mut notices = Notices::default();
        let ticket = notices.post_error("failed");

        notices.dismiss();

        assert!(notices.is_empty());
        assert!(!notices.expire(ticket));
    }

    #[test]
    fn slots_are_overwritten_not_stacked() {
        let mut notices = Notices::default();

        notices.post_success("one");
        notices.post_success("two");

        assert_eq!(notices.success(), Some("two"));
        assert_eq!(notices.error(), None);
    }
}
