//! Single-flight request slots
//!
//! Each stage owns one slot. Starting a request while another is pending
//! cancels and replaces it: the slot hands out a fresh token and only a
//! completion carrying the current token is applied.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::debug;

use crate::error::AnalysisError;

/// Tokens are unique across every slot in the process
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestToken(u64);

impl RequestToken {
    fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// What happened to a completion handed back to the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    Applied,
    /// A newer request owns the slot; the result was dropped
    Stale,
}

#[derive(Debug, Clone)]
pub struct RequestSlot<T> {
    in_flight: Option<RequestToken>,
    value: Option<T>,
    error: Option<String>,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self {
            in_flight: None,
            value: None,
            error: None,
        }
    }
}

impl<T> RequestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for a new request.
    ///
    /// Returns the new token and the token it superseded, if any.
    pub fn begin(&mut self) -> (RequestToken, Option<RequestToken>) {
        let token = RequestToken::next();
        let superseded = self.in_flight.replace(token);
        if let Some(old) = superseded {
            debug!("Request {} superseded by {}", old.0, token.0);
        }
        (token, superseded)
    }

    pub fn complete(
        &mut self,
        token: RequestToken,
        result: Result<T, AnalysisError>,
    ) -> SlotOutcome {
        if self.in_flight != Some(token) {
            debug!("Discarding stale result for request {}", token.0);
            return SlotOutcome::Stale;
        }
        self.in_flight = None;
        match result {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
            }
            // A failed run keeps the last good value on screen
            Err(err) => self.error = Some(err.to_string()),
        }
        SlotOutcome::Applied
    }

    /// Store a value directly, abandoning any pending request
    pub fn set(&mut self, value: T) {
        self.in_flight = None;
        self.value = Some(value);
        self.error = None;
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestToken> {
        self.in_flight
    }

    pub fn owns(&self, token: RequestToken) -> bool {
        self.in_flight == Some(token)
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_completion_applies_for_current_token() {
        let mut slot = RequestSlot::new();
        let (token, superseded) = slot.begin();
        assert!(superseded.is_none());
        assert!(slot.is_pending());
        assert_eq!(slot.complete(token, Ok("report")), SlotOutcome::Applied);
        assert!(!slot.is_pending());
        assert_eq!(slot.value(), Some(&"report"));
    }

    #[test]
    fn test_superseded_completion_is_discarded() {
        let mut slot = RequestSlot::new();
        let (first, _) = slot.begin();
        let (second, superseded) = slot.begin();
        assert_eq!(superseded, Some(first));

        assert_eq!(slot.complete(first, Ok("old")), SlotOutcome::Stale);
        assert!(slot.is_pending());
        assert_eq!(slot.value(), None);

        assert_eq!(slot.complete(second, Ok("new")), SlotOutcome::Applied);
        assert_eq!(slot.value(), Some(&"new"));
    }

    #[test]
    fn test_error_keeps_previous_value() {
        let mut slot = RequestSlot::new();
        slot.set("kept");
        let (token, _) = slot.begin();
        let outcome = slot.complete(token, Err(AnalysisError::Unavailable("down".into())));
        assert_eq!(outcome, SlotOutcome::Applied);
        assert_eq!(slot.value(), Some(&"kept"));
        assert_eq!(slot.error(), Some("Analysis service unavailable: down"));
    }

    #[test]
    fn test_set_abandons_pending_request() {
        let mut slot = RequestSlot::new();
        let (token, _) = slot.begin();
        slot.set(1);
        assert!(!slot.owns(token));
        assert_eq!(slot.complete(token, Ok(2)), SlotOutcome::Stale);
        assert_eq!(slot.value(), Some(&1));
    }
}
