//! Infinite-scroll pagination state machine
//!
//! A [`Paginator`] accumulates deduplicated items across pages of one logical
//! list (a category, a search query, a movie's similar titles). It enforces
//! at most one in-flight fetch per instance, advances through pages on
//! viewport-visibility signals, and hard-resets when the list it represents
//! changes. There is no cancellation primitive: a fetch that outlives a
//! reset resolves normally and is discarded by generation check.

use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::client::{DiscoverFilter, MovieListKind, TmdbClient};
use crate::error::{ApiError, ApiResult};
use crate::models::{Movie, Page, Review};

/// An item that can be deduplicated by id.
pub trait PageItem: Clone {
    type Id: Eq + Hash + Clone;

    fn id(&self) -> Self::Id;
}

impl PageItem for Movie {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

impl PageItem for Review {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// Where a paginator's pages come from.
///
/// Production code uses [`MoviePages`]; tests script the trait with in-memory
/// fakes.
pub trait PageSource: Clone + Send + Sync + 'static {
    type Item: PageItem + Send;

    fn fetch_page(&self, page: u32) -> impl Future<Output = ApiResult<Page<Self::Item>>> + Send;
}

/// The parameter that identifies which logical movie list is being paged.
#[derive(Debug, Clone)]
pub enum MovieQuery {
    /// One of the fixed list categories
    List(MovieListKind),
    /// Free-text title search
    Search(String),
    /// Filtered discovery
    Discover(DiscoverFilter),
    /// Titles similar to a movie
    Similar(u64),
    /// Recommendations for a movie
    Recommendations(u64),
}

/// Movie pages served by a [`TmdbClient`] for one query.
#[derive(Debug, Clone)]
pub struct MoviePages {
    client: TmdbClient,
    query: MovieQuery,
}

impl MoviePages {
    pub fn new(client: TmdbClient, query: MovieQuery) -> Self {
        Self { client, query }
    }
}

impl PageSource for MoviePages {
    type Item = Movie;

    async fn fetch_page(&self, page: u32) -> ApiResult<Page<Movie>> {
        match &self.query {
            MovieQuery::List(kind) => self.client.movie_list(*kind, page).await,
            MovieQuery::Search(query) => self.client.search_movies(query, page).await,
            MovieQuery::Discover(filter) => self.client.discover_movies(filter, page).await,
            MovieQuery::Similar(id) => self.client.similar_movies(*id, page).await,
            MovieQuery::Recommendations(id) => self.client.recommendations(*id, page).await,
        }
    }
}

/// A read-only copy of the list state for rendering.
#[derive(Debug, Clone)]
pub struct FeedSnapshot<I> {
    /// Accumulated items, unique by id, in first-seen order
    pub items: Vec<I>,
    /// The page the next trigger will request
    pub next_page: u32,
    /// Whether the server reports more pages
    pub has_more: bool,
    /// Whether a fetch is in flight
    pub loading: bool,
    /// The last failure, if any; cleared by a later success or `rearm`
    pub error: Option<ApiError>,
}

struct FeedState<S: PageSource> {
    source: S,
    items: Vec<S::Item>,
    seen: HashSet<<S::Item as PageItem>::Id>,
    next_page: u32,
    has_more: bool,
    loading: bool,
    error: Option<ApiError>,
    /// Bumped on every reset so responses from a superseded query are
    /// recognizable when they resolve
    generation: u64,
}

impl<S: PageSource> FeedState<S> {
    fn new(source: S) -> Self {
        Self {
            source,
            items: Vec::new(),
            seen: HashSet::new(),
            next_page: 1,
            has_more: true,
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

/// Shared-handle controller for one infinite-scroll list.
///
/// Clones refer to the same instance, so a UI can keep one handle for
/// rendering and hand another to the code that forwards visibility signals.
pub struct Paginator<S: PageSource> {
    state: Arc<Mutex<FeedState<S>>>,
}

impl<S: PageSource> Clone for Paginator<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: PageSource> Paginator<S> {
    /// Creates an idle paginator for the given source, with nothing loaded.
    pub fn new(source: S) -> Self {
        Self {
            state: Arc::new(Mutex::new(FeedState::new(source))),
        }
    }

    // Critical sections never span an await; the fetch future is built from
    // values moved out under the lock.
    fn lock(&self) -> MutexGuard<'_, FeedState<S>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The single fetch trigger, used for both the initial load and scroll
    /// signals on the last rendered item.
    ///
    /// No-op while a fetch is in flight, once the server reported the last
    /// page, or while an error is latched (see [`rearm`](Paginator::rearm)).
    /// On success, new items are appended in server order minus ids already
    /// present; the page cursor advances even when every incoming item was a
    /// duplicate, so a repeating server page cannot re-trigger forever. On
    /// failure the error is latched and nothing else changes.
    pub async fn notify_last_item_visible(&self) {
        let (source, page, generation) = {
            let mut state = self.lock();
            if !state.has_more || state.loading || state.error.is_some() {
                return;
            }
            state.loading = true;
            (state.source.clone(), state.next_page, state.generation)
        };

        debug!(page, "fetching page");
        let result = source.fetch_page(page).await;

        let mut state = self.lock();
        if state.generation != generation {
            // A reset superseded this fetch; the reset already cleared
            // `loading` and a newer fetch may own it now.
            debug!(page, "discarding response from superseded list");
            return;
        }
        state.loading = false;

        match result {
            Ok(response) => {
                let mut added = 0usize;
                for item in response.results {
                    if state.seen.insert(item.id()) {
                        state.items.push(item);
                        added += 1;
                    }
                }
                state.has_more = response.page < response.total_pages;
                state.next_page = page + 1;
                state.error = None;
                debug!(
                    page = response.page,
                    added,
                    total = state.items.len(),
                    has_more = state.has_more,
                    "page merged"
                );
            }
            Err(err) => {
                warn!(page, error = %err, "page fetch failed");
                state.error = Some(err);
            }
        }
    }

    /// Discriminator change: hard reset to an idle list for a new source.
    ///
    /// All accumulated state is discarded. An in-flight fetch for the old
    /// source will resolve against a stale generation and be ignored.
    pub fn reset(&self, source: S) {
        let mut state = self.lock();
        state.source = source;
        state.items.clear();
        state.seen.clear();
        state.next_page = 1;
        state.has_more = true;
        state.loading = false;
        state.error = None;
        state.generation += 1;
    }

    /// Clears a latched error so the next visibility signal retries the
    /// failed page. Retry is an explicit decision, never automatic.
    pub fn rearm(&self) {
        self.lock().error = None;
    }

    /// Copies the current list state for rendering.
    pub fn snapshot(&self) -> FeedSnapshot<S::Item> {
        let state = self.lock();
        FeedSnapshot {
            items: state.items.clone(),
            next_page: state.next_page,
            has_more: state.has_more,
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Whether the server reports more pages.
    pub fn has_more(&self) -> bool {
        self.lock().has_more
    }

    /// The last failure, if one is latched.
    pub fn error(&self) -> Option<ApiError> {
        self.lock().error.clone()
    }

    /// Number of accumulated items.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }
}
