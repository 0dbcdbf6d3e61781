//! Debounced query dispatch and stale-response filtering.
//!
//! Keystrokes arm a trailing debounce: only the text present when the window
//! settles is searched. Every provider call gets a [`RequestToken`] from a
//! monotonically increasing counter, and a response is applied only while its
//! token is still the latest of its kind. There is no real cancellation of a
//! provider call; outdated responses are simply dropped when they arrive.

use std::{fmt, time::Duration};

use tokio::time::Instant;
use tracing::trace;

/// Identity of one provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a provider call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Autocomplete suggestions for the text being typed
    Suggest,
    /// Authoritative search for a committed selection
    Submit,
}

/// What a keystroke did to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// A search is due at `deadline` unless more input arrives first.
    Scheduled { deadline: Instant },
    /// The input is empty: nothing is scheduled and the list must be cleared now.
    Cleared,
}

#[derive(Debug)]
struct Pending {
    query: String,
    deadline: Instant,
}

#[derive(Debug)]
pub struct QueryDispatcher {
    delay: Duration,
    pending: Option<Pending>,
    issued: u64,
    latest_suggest: Option<RequestToken>,
    latest_submit: Option<RequestToken>,
}

impl QueryDispatcher {
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            issued: 0,
            latest_suggest: None,
            latest_submit: None,
        }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Register the input text after a qualifying keystroke.
    pub fn input(&mut self, text: &str, now: Instant) -> InputOutcome {
        if text.is_empty() {
            self.cancel();
            return InputOutcome::Cleared;
        }
        let deadline = now + self.delay;
        if let Some(previous) = self.pending.replace(Pending {
            query: text.to_owned(),
            deadline,
        }) {
            trace!(discarded = %previous.query, "Debounce re-armed");
        }
        InputOutcome::Scheduled { deadline }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending query if its window has elapsed.
    pub fn settle(&mut self, now: Instant) -> Option<String> {
        if self.pending.as_ref()?.deadline > now {
            return None;
        }
        self.pending.take().map(|pending| pending.query)
    }

    /// Hand out the token for a new provider call.
    ///
    /// A submit supersedes every outstanding suggestion as well as earlier
    /// submits, and drops any debounce still pending.
    pub fn issue(&mut self, kind: RequestKind) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        match kind {
            RequestKind::Suggest => self.latest_suggest = Some(token),
            RequestKind::Submit => {
                self.pending = None;
                self.latest_suggest = None;
                self.latest_submit = Some(token);
            }
        }
        token
    }

    /// Whether a response for `token` is still the latest of its kind.
    pub fn is_current(&self, token: RequestToken, kind: RequestKind) -> bool {
        let latest = match kind {
            RequestKind::Suggest => self.latest_suggest,
            RequestKind::Submit => self.latest_submit,
        };
        latest == Some(token)
    }

    /// Drop the pending debounce and invalidate outstanding suggestions.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.latest_suggest = None;
    }

    /// Invalidate the outstanding submit so its response is dropped on arrival.
    pub fn cancel_submit(&mut self) {
        if let Some(token) = self.latest_submit.take() {
            trace!(%token, "Submit cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(250);

    #[test]
    fn test_rearm_keeps_latest_text() {
        let start = Instant::now();
        let mut dispatcher = QueryDispatcher::new(DELAY);

        dispatcher.input("P", start);
        dispatcher.input("Pa", start + Duration::from_millis(100));
        let outcome = dispatcher.input("Par", start + Duration::from_millis(200));
        assert_eq!(
            outcome,
            InputOutcome::Scheduled {
                deadline: start + Duration::from_millis(450)
            }
        );

        assert_eq!(dispatcher.settle(start + Duration::from_millis(300)), None);
        assert_eq!(
            dispatcher.settle(start + Duration::from_millis(450)),
            Some("Par".to_owned())
        );
        assert!(!dispatcher.has_pending());
    }

    #[test]
    fn test_empty_input_clears_without_scheduling() {
        let start = Instant::now();
        let mut dispatcher = QueryDispatcher::new(DELAY);

        dispatcher.input("Pa", start);
        let token = dispatcher.issue(RequestKind::Suggest);
        assert_eq!(dispatcher.input("", start), InputOutcome::Cleared);
        assert!(dispatcher.deadline().is_none());
        assert!(!dispatcher.is_current(token, RequestKind::Suggest));
    }

    #[test]
    fn test_tokens_are_monotonic() {
        let mut dispatcher = QueryDispatcher::new(DELAY);
        let first = dispatcher.issue(RequestKind::Suggest);
        let second = dispatcher.issue(RequestKind::Suggest);
        assert!(second > first);
        assert!(!dispatcher.is_current(first, RequestKind::Suggest));
        assert!(dispatcher.is_current(second, RequestKind::Suggest));
    }

    #[test]
    fn test_submit_supersedes_suggestions() {
        let start = Instant::now();
        let mut dispatcher = QueryDispatcher::new(DELAY);

        let suggest = dispatcher.issue(RequestKind::Suggest);
        dispatcher.input("Paris", start);
        let submit = dispatcher.issue(RequestKind::Submit);

        assert!(!dispatcher.is_current(suggest, RequestKind::Suggest));
        assert!(dispatcher.is_current(submit, RequestKind::Submit));
        assert!(!dispatcher.has_pending());

        // Suggestions issued after the submit do not invalidate it.
        let later = dispatcher.issue(RequestKind::Suggest);
        assert!(dispatcher.is_current(later, RequestKind::Suggest));
        assert!(dispatcher.is_current(submit, RequestKind::Submit));
    }

    #[test]
    fn test_cancel_submit_leaves_suggestions() {
        let mut dispatcher = QueryDispatcher::new(DELAY);
        let submit = dispatcher.issue(RequestKind::Submit);
        let suggest = dispatcher.issue(RequestKind::Suggest);

        dispatcher.cancel_submit();
        assert!(!dispatcher.is_current(submit, RequestKind::Submit));
        assert!(dispatcher.is_current(suggest, RequestKind::Suggest));
    }
}
