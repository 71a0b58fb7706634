//! Wire types for the TMDB API
//!
//! Serde structs for every response shape the crate touches. List endpoints
//! share the [`Page`] envelope; single-item endpoints deserialize into flat
//! resource structs. Fields the API omits for some titles are `Option`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The envelope every paginated list endpoint returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Page number echoed back by the server
    pub page: u32,
    /// Items on this page, in server order
    pub results: Vec<T>,
    /// Total number of pages for this query
    pub total_pages: u32,
    /// Total number of items for this query
    pub total_results: u64,
}

/// A movie as it appears in list results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub original_title: String,
    pub original_language: String,
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    pub adult: bool,
    pub video: bool,
}

/// A genre id/name pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpokenLanguage {
    pub english_name: String,
    pub iso_639_1: String,
    pub name: String,
}

/// The full record returned by the single-movie endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub original_title: String,
    pub original_language: String,
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub popularity: f64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub adult: bool,
    pub budget: u64,
    pub revenue: u64,
    pub status: String,
    pub tagline: Option<String>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
}

/// One cast credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cast {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub order: u32,
    pub profile_path: Option<String>,
    pub credit_id: String,
    #[serde(default)]
    pub popularity: f64,
}

/// One crew credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crew {
    pub id: u64,
    pub name: String,
    pub job: String,
    pub department: String,
    pub profile_path: Option<String>,
    pub credit_id: String,
    #[serde(default)]
    pub popularity: f64,
}

/// Cast and crew for one movie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credits {
    pub id: u64,
    #[serde(default)]
    pub cast: Vec<Cast>,
    #[serde(default)]
    pub crew: Vec<Crew>,
}

/// Reviewer details nested inside a review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub username: String,
    pub name: String,
    pub avatar_path: Option<String>,
    pub rating: Option<f64>,
}

/// One user review. Review ids are strings, unlike movie ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub author_details: ReviewAuthor,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub url: String,
}

/// One trailer, teaser or clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub iso_639_1: String,
    pub iso_3166_1: String,
    pub name: String,
    /// Provider-side identifier, e.g. a YouTube video key
    pub key: String,
    pub site: String,
    pub size: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub official: bool,
    pub published_at: DateTime<Utc>,
}

/// Envelope for the video list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoList {
    pub id: u64,
    pub results: Vec<Video>,
}

/// Envelope for the genre catalog endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}
