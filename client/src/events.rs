//! Typed notification stream between the orchestrator and UI widgets,
//! backed by a `tokio::sync::broadcast` channel.

use tokio::sync::broadcast;


/// Notifications the orchestrator publishes as state changes settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// Initialization finished and dependent widgets may start querying.
    AppReady,
    /// A normalized result set is available.
    ResultsUpdated,
    /// The viewer's highlighting match map is available.
    MatchesAvailable,
    /// Counts for one facet field were replaced.
    FacetsUpdated { field: String },
    /// Date-facet consumers should recompute against the new context.
    RefreshDateFacets,
    DateFacetsReset,
    DateFacetsReady { key: String },
    /// All filters were cleared; bound UI should drop its selections.
    ResetAllFilters,
    ShowResultDetails,
    HideResultDetails,
    /// A search failed after exhausting its retries.
    SearchFailed { message: String },
}


const DEFAULT_CAPACITY: usize = 64;

/// In-process fan-out bus. Cloning shares the underlying channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SearchEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. With zero subscribers the
    /// event is dropped silently.
    pub fn publish(&self, event: SearchEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        bus.publish(SearchEvent::ResultsUpdated);
        bus.publish(SearchEvent::FacetsUpdated { field: "language".into() });
        assert_eq!(rx.recv().await.unwrap(), SearchEvent::ResultsUpdated);
        assert_eq!(rx.recv().await.unwrap(), SearchEvent::FacetsUpdated { field: "language".into() });
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let bus = EventBus::default();
        bus.publish(SearchEvent::AppReady);
    }
}
