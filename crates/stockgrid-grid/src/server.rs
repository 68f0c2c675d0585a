//! Server-mode page requests
//!
//! Every request gets a sequence number from a [`RequestSequencer`]. Starting
//! a new request aborts the one in flight, and only the response carrying the
//! latest sequence may be applied.

use async_trait::async_trait;
use futures::future::{AbortHandle, AbortRegistration, Abortable};
use serde::{Deserialize, Serialize};
use stockgrid_core::Row;
use tracing::debug;

use crate::filter_types::Predicate;
use crate::pagination::PageMeta;
use crate::sorting::SortState;

/// What the grid asks a server for
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub sequence: u64,
    pub page: usize,
    pub page_size: usize,
    pub filters: Vec<Predicate>,
    pub sort: SortState,
}

/// One page of rows with the server's totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    pub data: Vec<Row>,
    pub meta: PageMeta,
}

/// Source of pages in server mode
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> anyhow::Result<PageResponse>;
}

/// A request handed out by the grid, with the registration that lets a
/// newer request abort it
#[derive(Debug)]
pub struct PendingPageRequest {
    pub request: PageRequest,
    pub registration: AbortRegistration,
}

impl PendingPageRequest {
    pub fn sequence(&self) -> u64 {
        self.request.sequence
    }

    /// Run the fetch; `None` means a newer request aborted this one
    pub async fn fetch(self, fetcher: &dyn PageFetcher) -> Option<anyhow::Result<PageResponse>> {
        fetch_abortable(fetcher, &self.request, self.registration).await
    }
}

/// Run `fetcher` for `request` until it completes or is aborted
pub async fn fetch_abortable(
    fetcher: &dyn PageFetcher,
    request: &PageRequest,
    registration: AbortRegistration,
) -> Option<anyhow::Result<PageResponse>> {
    match Abortable::new(fetcher.fetch_page(request), registration).await {
        Ok(result) => Some(result),
        Err(_aborted) => {
            debug!(sequence = request.sequence, "Page request aborted");
            None
        }
    }
}

/// Hands out increasing sequence numbers and remembers the in-flight request
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
    in_flight: Option<AbortHandle>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort whatever is in flight and start the next sequence
    pub fn begin(&mut self) -> (u64, AbortRegistration) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }
        self.latest += 1;
        let (handle, registration) = AbortHandle::new_pair();
        self.in_flight = Some(handle);
        (self.latest, registration)
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn is_current(&self, sequence: u64) -> bool {
        sequence == self.latest
    }

    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Mark `sequence` finished; returns false for superseded sequences
    pub fn finish(&mut self, sequence: u64) -> bool {
        if !self.is_current(sequence) {
            return false;
        }
        self.in_flight = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_increase() {
        let mut sequencer = RequestSequencer::new();
        let (first, _) = sequencer.begin();
        let (second, _) = sequencer.begin();
        assert!(second > first);
        assert!(sequencer.is_current(second));
        assert!(!sequencer.is_current(first));
    }

    #[test]
    fn test_finish_only_latest() {
        let mut sequencer = RequestSequencer::new();
        let (first, _) = sequencer.begin();
        let (second, _) = sequencer.begin();

        assert!(!sequencer.finish(first));
        assert!(sequencer.has_in_flight());
        assert!(sequencer.finish(second));
        assert!(!sequencer.has_in_flight());
    }
}
