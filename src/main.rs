//! moviefeed - browse TMDB movies from the terminal
//!
//! A thin CLI consumer of the library: lists categories page by page,
//! searches, shows a movie's detail bundle, and prints cache statistics.
//! Requires `TMDB_API_KEY` in the environment.

use std::error::Error;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moviefeed::client::MovieListKind;
use moviefeed::pagination::{MoviePages, MovieQuery, Paginator};
use moviefeed::{Config, TmdbClient};

#[derive(Parser, Debug)]
#[command(name = "moviefeed")]
#[command(about = "Browse TMDB movie lists, search and details")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a movie category (popular, top-rated, now-playing, upcoming)
    List {
        /// Category name
        kind: String,
        /// How many pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Search movies by title
    Search {
        /// Free-text query
        query: String,
        /// How many pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show one movie's detail, top cast and videos
    Movie {
        /// TMDB movie id
        id: u64,
    },
    /// List the movie genre catalog
    Genres,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moviefeed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            process::exit(2);
        }
    };
    let client = TmdbClient::new(config);

    if let Err(err) = run(cli.command, &client).await {
        eprintln!("error: {err}");
        process::exit(1);
    }

    print_cache_stats(&client);
}

async fn run(command: Command, client: &TmdbClient) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List { kind, pages } => {
            let kind = MovieListKind::from_str(&kind).ok_or_else(|| {
                format!("unknown category '{kind}' (try popular, top-rated, now-playing, upcoming)")
            })?;
            let feed = Paginator::new(MoviePages::new(client.clone(), MovieQuery::List(kind)));
            load_and_print(&feed, pages).await
        }
        Command::Search { query, pages } => {
            let feed = Paginator::new(MoviePages::new(client.clone(), MovieQuery::Search(query)));
            load_and_print(&feed, pages).await
        }
        Command::Movie { id } => {
            let profile = client.movie_profile(id).await?;
            let detail = &profile.detail;

            println!("{} ({})", detail.title, detail.release_date.as_deref().unwrap_or("unknown"));
            if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
                println!("  {tagline}");
            }
            println!("  rating {:.1} ({} votes)", detail.vote_average, detail.vote_count);
            if let Some(runtime) = detail.runtime {
                println!("  runtime {runtime} min");
            }
            let genres: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
            if !genres.is_empty() {
                println!("  genres: {}", genres.join(", "));
            }
            println!("\n{}", detail.overview);

            if !profile.credits.cast.is_empty() {
                println!("\nTop cast:");
                for member in profile.credits.cast.iter().take(5) {
                    println!("  {} as {}", member.name, member.character);
                }
            }
            if !profile.videos.is_empty() {
                println!("\nVideos:");
                for video in profile.videos.iter().take(3) {
                    println!("  [{}] {} ({})", video.kind, video.name, video.site);
                }
            }
            Ok(())
        }
        Command::Genres => {
            for genre in client.genres().await? {
                println!("{:>5}  {}", genre.id, genre.name);
            }
            Ok(())
        }
    }
}

/// Drives the feed one visibility signal per page, then prints the
/// accumulated list.
async fn load_and_print(feed: &Paginator<MoviePages>, pages: u32) -> Result<(), Box<dyn Error>> {
    for _ in 0..pages {
        feed.notify_last_item_visible().await;
        if let Some(err) = feed.error() {
            return Err(err.into());
        }
        if !feed.has_more() {
            break;
        }
    }

    let snapshot = feed.snapshot();
    for (index, movie) in snapshot.items.iter().enumerate() {
        let year = movie
            .release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .unwrap_or("????");
        println!("{:>3}. {} ({})  {:.1}", index + 1, movie.title, year, movie.vote_average);
    }
    if !snapshot.has_more {
        println!("(end of list)");
    }
    Ok(())
}

fn print_cache_stats(client: &TmdbClient) {
    let stats = client.cache_stats();
    println!(
        "\ncache: {}/{} entries, {} hits, {} misses, {} evictions ({:.0}% hit rate)",
        stats.size,
        stats.capacity,
        stats.hits,
        stats.misses,
        stats.evictions,
        stats.hit_rate() * 100.0
    );
}
