//! Image URL validation requests.
//!
//! Applying an image edit issues a request keyed by element and a
//! monotonically increasing sequence number. Only the latest request for an
//! element may commit; completions for superseded or cancelled requests are
//! reported as stale and dropped by the engine.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::doc::{ElementId, ImageEdit};

/// Identifies one validation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationTicket {
    pub element: ElementId,
    pub seq: u64,
}

/// A URL the host must try to load as an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub ticket: ValidationTicket,
    pub url: String,
}

/// How the host's image load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadOutcome {
    Loaded,
    Failed,
}

/// Outstanding validation requests, at most one live request per element.
#[derive(Debug, Default)]
pub struct ImageValidator {
    next_seq: u64,
    pending: HashMap<ElementId, (u64, ImageEdit)>,
}

impl ImageValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request for `element`.
    ///
    /// Returns the request plus the ticket it supersedes, if one was in flight.
    pub fn issue(&mut self, element: ElementId, edit: ImageEdit) -> (ValidationRequest, Option<ValidationTicket>) {
        self.next_seq += 1;
        let seq = self.next_seq;
        let url = edit.src.clone();
        let superseded = self
            .pending
            .insert(element, (seq, edit))
            .map(|(old, _)| ValidationTicket { element, seq: old });
        (ValidationRequest { ticket: ValidationTicket { element, seq }, url }, superseded)
    }

    /// Take the edit for `ticket` if it is still the latest request for its element.
    pub fn resolve(&mut self, ticket: ValidationTicket) -> Option<ImageEdit> {
        match self.pending.get(&ticket.element) {
            Some((seq, _)) if *seq == ticket.seq => self.pending.remove(&ticket.element).map(|(_, edit)| edit),
            _ => None,
        }
    }

    /// Drop any in-flight request for `element`, returning its ticket.
    pub fn cancel(&mut self, element: &ElementId) -> Option<ValidationTicket> {
        self.pending
            .remove(element)
            .map(|(seq, _)| ValidationTicket { element: *element, seq })
    }

    /// The live ticket for `element`, if any.
    #[must_use]
    pub fn pending_for(&self, element: &ElementId) -> Option<ValidationTicket> {
        self.pending
            .get(element)
            .map(|(seq, _)| ValidationTicket { element: *element, seq: *seq })
    }

    #[cfg(test)]
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }
}
