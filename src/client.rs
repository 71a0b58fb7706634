//! TMDB API client with cache-first request handling
//!
//! [`TmdbClient`] wraps a `reqwest::Client`, merges default parameters into
//! every call, and consults a process-wide response cache before touching the
//! network. Clones of a client share the same cache. The client never
//! retries; callers that want a retry loop own it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{self, CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{Credits, Genre, GenreList, Movie, MovieDetail, Page, Review, Video, VideoList};

/// TTL for movie detail, credits and video lookups
const DETAIL_TTL: Duration = Duration::from_secs(600);

/// TTL for the genre catalog, which changes rarely
const GENRES_TTL: Duration = Duration::from_secs(86_400);

/// The movie list categories TMDB exposes as dedicated endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieListKind {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
}

impl MovieListKind {
    /// The endpoint path for this category.
    pub fn path(self) -> &'static str {
        match self {
            MovieListKind::Popular => "/movie/popular",
            MovieListKind::TopRated => "/movie/top_rated",
            MovieListKind::NowPlaying => "/movie/now_playing",
            MovieListKind::Upcoming => "/movie/upcoming",
        }
    }

    /// Parses a user-facing category name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "popular" => Some(MovieListKind::Popular),
            "top-rated" | "top_rated" | "toprated" => Some(MovieListKind::TopRated),
            "now-playing" | "now_playing" | "nowplaying" => Some(MovieListKind::NowPlaying),
            "upcoming" => Some(MovieListKind::Upcoming),
            _ => None,
        }
    }
}

/// Ordered request parameters, built up caller-side.
///
/// Insertion order is preserved for the request itself; cache keys sort the
/// names, so the order here never splits the cache.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any earlier value for the same name.
    pub fn set(mut self, name: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.0.push((name.to_string(), value));
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Filters for the discover endpoint.
#[derive(Debug, Clone, Default)]
pub struct DiscoverFilter {
    /// Sort key, e.g. `popularity.desc`
    pub sort_by: Option<String>,
    /// Genre ids the results must carry
    pub with_genres: Vec<u64>,
    pub year: Option<u16>,
    /// Earliest release date, `YYYY-MM-DD`
    pub release_date_gte: Option<String>,
    /// Latest release date, `YYYY-MM-DD`
    pub release_date_lte: Option<String>,
    pub vote_average_gte: Option<f64>,
    pub vote_average_lte: Option<f64>,
    pub vote_count_gte: Option<u64>,
}

impl DiscoverFilter {
    fn to_params(&self, page: u32) -> Params {
        let mut params = Params::new().set("page", page);
        if let Some(sort_by) = &self.sort_by {
            params = params.set("sort_by", sort_by);
        }
        if !self.with_genres.is_empty() {
            let ids: Vec<String> = self.with_genres.iter().map(u64::to_string).collect();
            params = params.set("with_genres", cache::join_values(&ids));
        }
        if let Some(year) = self.year {
            params = params.set("year", year);
        }
        if let Some(date) = &self.release_date_gte {
            params = params.set("release_date.gte", date);
        }
        if let Some(date) = &self.release_date_lte {
            params = params.set("release_date.lte", date);
        }
        if let Some(rating) = self.vote_average_gte {
            params = params.set("vote_average.gte", rating);
        }
        if let Some(rating) = self.vote_average_lte {
            params = params.set("vote_average.lte", rating);
        }
        if let Some(count) = self.vote_count_gte {
            params = params.set("vote_count.gte", count);
        }
        params
    }
}

/// A movie's detail page data, fetched as one bundle.
#[derive(Debug, Clone)]
pub struct MovieProfile {
    pub detail: MovieDetail,
    pub credits: Credits,
    pub videos: Vec<Video>,
}

/// Client for the TMDB API.
///
/// Cheap to clone; all clones share one configuration and one response
/// cache. Responses are cached as raw JSON so a single store serves every
/// endpoint's shape.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    config: Arc<Config>,
    cache: Arc<Mutex<CacheStore<Value>>>,
}

impl TmdbClient {
    /// Creates a client and its response cache from the given configuration.
    pub fn new(config: Config) -> Self {
        let cache = CacheStore::new(
            config.cache.capacity,
            config.cache.default_ttl,
            config.cache.enabled,
        );
        Self {
            http: reqwest::Client::new(),
            config: Arc::new(config),
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    // The lock is only ever held for a cache operation, never across an
    // await, so a poisoned lock just means a panic elsewhere mid-operation;
    // the cache itself is still structurally sound.
    fn cache(&self) -> MutexGuard<'_, CacheStore<Value>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Issues a GET against the API, consulting the cache first when
    /// `cache_key` is given.
    ///
    /// Caller parameters are merged over the configured defaults (`api_key`,
    /// `language`, `region`); caller values win on conflict. The cache is
    /// populated only on full success, with `ttl` or the store's default.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &Params,
        cache_key: Option<&str>,
        ttl: Option<Duration>,
    ) -> ApiResult<T> {
        if let Some(key) = cache_key {
            // Bind the lookup so the lock guard drops before the match arms
            // take the lock again
            let cached = self.cache().get(key);
            if let Some(value) = cached {
                match serde_json::from_value::<T>(value) {
                    Ok(decoded) => {
                        debug!(key, "cache hit");
                        return Ok(decoded);
                    }
                    Err(err) => {
                        // A bad entry must not wedge the endpoint until TTL
                        warn!(key, error = %err, "cached value failed to decode, refetching");
                        self.cache().delete(key);
                    }
                }
            }
        }

        let url = format!("{}{}", self.config.base_url, endpoint);
        let merged = self.merge_params(params);
        debug!(endpoint, "requesting");

        let response = self
            .http
            .get(&url)
            .query(&merged)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Network(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        let decoded: T = serde_json::from_value(body.clone())?;

        if let Some(key) = cache_key {
            self.cache().set(key, body, ttl);
        }
        Ok(decoded)
    }

    /// Defaults first, then caller parameters, caller winning on conflict.
    fn merge_params(&self, params: &Params) -> Vec<(String, String)> {
        let mut merged = vec![
            ("api_key".to_string(), self.config.api_key.clone()),
            ("language".to_string(), self.config.language.clone()),
            ("region".to_string(), self.config.region.clone()),
        ];
        for (name, value) in params.iter() {
            if let Some(slot) = merged.iter_mut().find(|(n, _)| n == name) {
                slot.1 = value.to_string();
            } else {
                merged.push((name.to_string(), value.to_string()));
            }
        }
        merged
    }

    /// Fetches one page of a movie list category. Cached with the default
    /// TTL.
    pub async fn movie_list(&self, kind: MovieListKind, page: u32) -> ApiResult<Page<Movie>> {
        let params = Params::new().set("page", page);
        let key = cache::build_key(kind.path(), params.iter());
        self.request(kind.path(), &params, Some(&key), None).await
    }

    /// Fetches a movie's full record. Cached for 10 minutes.
    pub async fn movie_detail(&self, id: u64) -> ApiResult<MovieDetail> {
        let endpoint = format!("/movie/{id}");
        let key = cache::build_key(&endpoint, []);
        self.request(&endpoint, &Params::new(), Some(&key), Some(DETAIL_TTL))
            .await
    }

    /// Fetches one page of movies similar to the given one. Cached with the
    /// default TTL.
    pub async fn similar_movies(&self, id: u64, page: u32) -> ApiResult<Page<Movie>> {
        let endpoint = format!("/movie/{id}/similar");
        let params = Params::new().set("page", page);
        let key = cache::build_key(&endpoint, params.iter());
        self.request(&endpoint, &params, Some(&key), None).await
    }

    /// Fetches one page of recommendations for a movie. Not cached.
    pub async fn recommendations(&self, id: u64, page: u32) -> ApiResult<Page<Movie>> {
        let endpoint = format!("/movie/{id}/recommendations");
        let params = Params::new().set("page", page);
        self.request(&endpoint, &params, None, None).await
    }

    /// Searches movies by free-text query. Not cached.
    pub async fn search_movies(&self, query: &str, page: u32) -> ApiResult<Page<Movie>> {
        let params = Params::new().set("query", query).set("page", page);
        self.request("/search/movie", &params, None, None).await
    }

    /// Fetches one page of filtered discovery results. Not cached.
    pub async fn discover_movies(
        &self,
        filter: &DiscoverFilter,
        page: u32,
    ) -> ApiResult<Page<Movie>> {
        let params = filter.to_params(page);
        self.request("/discover/movie", &params, None, None).await
    }

    /// Fetches a movie's cast and crew. Cached for 10 minutes.
    pub async fn movie_credits(&self, id: u64) -> ApiResult<Credits> {
        let endpoint = format!("/movie/{id}/credits");
        let key = cache::build_key(&endpoint, []);
        self.request(&endpoint, &Params::new(), Some(&key), Some(DETAIL_TTL))
            .await
    }

    /// Fetches one page of a movie's reviews. Not cached.
    pub async fn movie_reviews(&self, id: u64, page: u32) -> ApiResult<Page<Review>> {
        let endpoint = format!("/movie/{id}/reviews");
        let params = Params::new().set("page", page);
        self.request(&endpoint, &params, None, None).await
    }

    /// Fetches a movie's videos, unwrapping the envelope. Cached for 10
    /// minutes.
    pub async fn movie_videos(&self, id: u64) -> ApiResult<Vec<Video>> {
        let endpoint = format!("/movie/{id}/videos");
        let key = cache::build_key(&endpoint, []);
        let list: VideoList = self
            .request(&endpoint, &Params::new(), Some(&key), Some(DETAIL_TTL))
            .await?;
        Ok(list.results)
    }

    /// Fetches the genre catalog, unwrapping the envelope. Cached for 24
    /// hours.
    pub async fn genres(&self) -> ApiResult<Vec<Genre>> {
        let endpoint = "/genre/movie/list";
        let key = cache::build_key(endpoint, []);
        let list: GenreList = self
            .request(endpoint, &Params::new(), Some(&key), Some(GENRES_TTL))
            .await?;
        Ok(list.genres)
    }

    /// Fetches everything a detail page needs in one concurrent bundle.
    pub async fn movie_profile(&self, id: u64) -> ApiResult<MovieProfile> {
        let (detail, credits, videos) = futures::join!(
            self.movie_detail(id),
            self.movie_credits(id),
            self.movie_videos(id),
        );
        Ok(MovieProfile {
            detail: detail?,
            credits: credits?,
            videos: videos?,
        })
    }

    /// Builds the CDN URL for an image path, or `None` when the resource has
    /// no image. Placeholder art is the caller's concern.
    pub fn image_url(&self, path: Option<&str>, size: &str) -> Option<String> {
        path.map(|path| format!("{}/{}{}", self.config.image_base_url, size, path))
    }

    /// Snapshot of the shared response cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache().stats()
    }

    /// Removes cached responses whose key matches the predicate, returning
    /// how many were removed.
    pub fn invalidate_matching(&self, pred: impl Fn(&str) -> bool) -> usize {
        self.cache().delete_matching(pred)
    }

    /// Sweeps expired responses out of the cache, returning how many were
    /// removed.
    pub fn purge_expired(&self) -> usize {
        self.cache().purge_expired()
    }

    /// Empties the response cache.
    pub fn clear_cache(&self) {
        self.cache().clear();
    }
}
