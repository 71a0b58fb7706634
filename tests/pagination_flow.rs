//! Integration tests for the infinite-scroll pagination state machine
//!
//! Pages come from scripted in-memory sources so every transition is
//! deterministic: dedup across pages, end-of-data detection, single-flight
//! fetching, error latching, and discard of responses that outlive a reset.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use moviefeed::error::{ApiError, ApiResult};
use moviefeed::models::Page;
use moviefeed::pagination::{PageItem, PageSource, Paginator};

#[derive(Debug, Clone, PartialEq)]
struct Card {
    id: u64,
    label: String,
}

impl PageItem for Card {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

fn card(id: u64) -> Card {
    Card {
        id,
        label: format!("card-{id}"),
    }
}

fn page(number: u32, total_pages: u32, ids: &[u64]) -> Page<Card> {
    Page {
        page: number,
        results: ids.iter().copied().map(card).collect(),
        total_pages,
        total_results: u64::from(total_pages) * 20,
    }
}

/// A page source that replays scripted responses in call order, optionally
/// holding the first call until a gate fires.
#[derive(Clone)]
struct FakeSource {
    responses: Arc<Mutex<VecDeque<ApiResult<Page<Card>>>>>,
    gate: Arc<Mutex<Option<oneshot::Receiver<()>>>>,
    calls: Arc<Mutex<Vec<u32>>>,
}

impl FakeSource {
    fn scripted(responses: Vec<ApiResult<Page<Card>>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            gate: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn gated(responses: Vec<ApiResult<Page<Card>>>, gate: oneshot::Receiver<()>) -> Self {
        let source = Self::scripted(responses);
        *source.gate.lock().unwrap() = Some(gate);
        source
    }

    fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

impl PageSource for FakeSource {
    type Item = Card;

    async fn fetch_page(&self, page: u32) -> ApiResult<Page<Card>> {
        self.calls.lock().unwrap().push(page);
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ApiError::Network(404)))
    }
}

fn ids(feed: &Paginator<FakeSource>) -> Vec<u64> {
    feed.snapshot().items.iter().map(|c| c.id).collect()
}

#[tokio::test]
async fn duplicate_ids_keep_first_seen_position() {
    // Page 2 repeats id 3 from page 1; the merged list holds it once, where
    // it first appeared.
    let source = FakeSource::scripted(vec![
        Ok(page(1, 2, &[1, 2, 3])),
        Ok(page(2, 2, &[3, 4, 5])),
    ]);
    let feed = Paginator::new(source);

    feed.notify_last_item_visible().await;
    feed.notify_last_item_visible().await;

    assert_eq!(ids(&feed), vec![1, 2, 3, 4, 5]);
    assert!(!feed.has_more());
}

#[tokio::test]
async fn has_more_follows_server_page_count() {
    let source = FakeSource::scripted(vec![
        Ok(page(1, 3, &[1])),
        Ok(page(2, 3, &[2])),
        Ok(page(3, 3, &[3])),
    ]);
    let feed = Paginator::new(source.clone());

    feed.notify_last_item_visible().await;
    assert!(feed.has_more());
    feed.notify_last_item_visible().await;
    assert!(feed.has_more());
    feed.notify_last_item_visible().await;
    assert!(!feed.has_more());

    // Triggers after exhaustion are not honored
    feed.notify_last_item_visible().await;
    feed.notify_last_item_visible().await;
    assert_eq!(source.calls(), vec![1, 2, 3]);
    assert_eq!(ids(&feed), vec![1, 2, 3]);
}

#[tokio::test]
async fn all_duplicate_page_still_advances_the_cursor() {
    // Page 2 brings zero new unique items but the server reports more
    // pages; the cursor must advance or the same page would refetch
    // forever.
    let source = FakeSource::scripted(vec![
        Ok(page(1, 3, &[1, 2])),
        Ok(page(2, 3, &[1, 2])),
        Ok(page(3, 3, &[3])),
    ]);
    let feed = Paginator::new(source.clone());

    feed.notify_last_item_visible().await;
    feed.notify_last_item_visible().await;
    assert_eq!(feed.snapshot().next_page, 3);

    feed.notify_last_item_visible().await;
    assert_eq!(source.calls(), vec![1, 2, 3]);
    assert_eq!(ids(&feed), vec![1, 2, 3]);
}

#[tokio::test]
async fn concurrent_triggers_fetch_once() {
    let (open_gate, gate) = oneshot::channel();
    let source = FakeSource::gated(vec![Ok(page(1, 2, &[1, 2]))], gate);
    let feed = Paginator::new(source.clone());

    let in_flight = tokio::spawn({
        let feed = feed.clone();
        async move { feed.notify_last_item_visible().await }
    });
    // Let the spawned trigger reach the network await while holding the
    // loading flag (current-thread runtime makes this deterministic)
    tokio::task::yield_now().await;
    assert!(feed.is_loading());

    // A second visibility signal while the first is pending is a no-op
    feed.notify_last_item_visible().await;

    open_gate.send(()).expect("fetch should be waiting on the gate");
    in_flight.await.expect("trigger task should not panic");

    assert_eq!(source.calls(), vec![1]);
    assert_eq!(ids(&feed), vec![1, 2]);
    assert!(!feed.is_loading());
}

#[tokio::test]
async fn failure_latches_error_until_rearmed() {
    let source = FakeSource::scripted(vec![
        Err(ApiError::Network(503)),
        Ok(page(1, 2, &[1, 2])),
    ]);
    let feed = Paginator::new(source.clone());

    feed.notify_last_item_visible().await;
    let snapshot = feed.snapshot();
    assert_eq!(snapshot.error, Some(ApiError::Network(503)));
    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.next_page, 1);
    assert!(snapshot.has_more);
    assert!(!snapshot.loading);

    // Visibility signals are disarmed while the error is latched
    feed.notify_last_item_visible().await;
    assert_eq!(source.calls(), vec![1]);

    // An explicit re-arm lets the next signal retry the same page
    feed.rearm();
    feed.notify_last_item_visible().await;
    assert_eq!(source.calls(), vec![1, 1]);
    assert_eq!(ids(&feed), vec![1, 2]);
    assert!(feed.error().is_none());
}

#[tokio::test]
async fn reset_mid_flight_discards_the_stale_response() {
    let (open_gate, gate) = oneshot::channel();
    let stale_source = FakeSource::gated(vec![Ok(page(1, 5, &[1, 2]))], gate);
    let feed = Paginator::new(stale_source.clone());

    let in_flight = tokio::spawn({
        let feed = feed.clone();
        async move { feed.notify_last_item_visible().await }
    });
    tokio::task::yield_now().await;
    assert!(feed.is_loading());

    // The list's query changes while the fetch is pending
    let fresh_source = FakeSource::scripted(vec![Ok(page(1, 1, &[10]))]);
    feed.reset(fresh_source.clone());
    assert!(!feed.is_loading());

    // The stale fetch now resolves and must not be merged
    open_gate.send(()).expect("fetch should be waiting on the gate");
    in_flight.await.expect("trigger task should not panic");
    let snapshot = feed.snapshot();
    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.next_page, 1);

    // The new list loads normally afterwards
    feed.notify_last_item_visible().await;
    assert_eq!(ids(&feed), vec![10]);
    assert_eq!(fresh_source.calls(), vec![1]);
    assert!(!feed.has_more());
}

#[tokio::test]
async fn reset_discards_accumulated_items_and_errors() {
    let source = FakeSource::scripted(vec![
        Ok(page(1, 3, &[1, 2])),
        Err(ApiError::Transport("connection reset".to_string())),
    ]);
    let feed = Paginator::new(source);

    feed.notify_last_item_visible().await;
    feed.notify_last_item_visible().await;
    assert_eq!(feed.len(), 2);
    assert!(feed.error().is_some());

    feed.reset(FakeSource::scripted(vec![Ok(page(1, 1, &[9]))]));
    let snapshot = feed.snapshot();
    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.next_page, 1);
    assert!(snapshot.has_more);
    assert!(snapshot.error.is_none());

    feed.notify_last_item_visible().await;
    assert_eq!(ids(&feed), vec![9]);
}
