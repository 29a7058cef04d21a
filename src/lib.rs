//! # Brief
//!
//! A command-line RSS/article reader that reads saved articles aloud.
//!
//! ## Architecture
//!
//! ```text
//! FeedSource → Normalizer → Scraper → Store → Workflow → CLI / Shell
//! ```
//!
//! Ids shown to the user are always the dense sequence `1..=N`: every delete
//! renumbers the remaining rows inside the same transaction, and moving a
//! feed rewrites positions so that ids follow them.
//!
//! ## Quick Start
//!
//! ```bash
//! # Subscribe to a feed
//! brief feed add https://blog.rust-lang.org/feed.xml
//!
//! # Pull the three newest entries of every feed
//! brief feed fetch 3 '*'
//!
//! # Read articles 1 to 3 aloud, deleting them afterwards
//! brief article read 1-3 --after-read-delete
//!
//! # Interactive shell
//! brief
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store, the
/// feed source, the scraper and playback.
pub mod app;

/// Command-line interface and interactive shell.
///
/// - `article list|read|open|set-speed|delete|add|export`
/// - `feed list|add|delete|fetch|reorder`
pub mod cli;

/// Configuration loaded from `~/.config/brief/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Subscription`](domain::Subscription): a followed feed and its position
/// - [`Item`](domain::Item): a saved article
/// - [`Collection`](domain::Collection): which of the two a command targets
pub mod domain;

/// Feed entry retrieval over HTTP.
pub mod fetcher;

/// Feed parsing and normalization.
///
/// Converts RSS, Atom and JSON Feed documents into fetch candidates.
pub mod normalizer;

/// Text-to-speech playback and viewer launch.
pub mod playback;

/// Article download and content extraction.
pub mod scraper;

/// Range selector parsing (`1-3,5,*`).
pub mod selection;

/// SQLite persistence with dense ids.
///
/// - [`Store`](store::Store): trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Batch selection, confirmation and delete flow.
pub mod workflow;
