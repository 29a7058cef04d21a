use std::io::Write;
use std::path::Path;

use chrono::Utc;
use url::Url;

use crate::app::{AppContext, BriefError, Result};
use crate::cli::{ArticleCommand, Command, FeedCommand};
use crate::config::Config;
use crate::domain::{Collection, NewItem};
use crate::store::Store;
use crate::workflow::{self, Batch, Confirm};

/// State that lives for one shell session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub speed: f64,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            speed: config.playback.speed,
        }
    }
}

/// Counts reported by `feed fetch` and `article add`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub saved: usize,
    pub already_have: usize,
    pub failed: usize,
}

/// Counts reported by `article read` and `article open`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaySummary {
    pub played: Vec<i64>,
    pub failed: Vec<i64>,
    pub deleted: Vec<i64>,
}

pub async fn execute(
    ctx: &AppContext,
    session: &mut Session,
    command: Command,
    confirm: &mut dyn Confirm,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Article(cmd) => match cmd {
            ArticleCommand::List => list_articles(ctx, out),
            ArticleCommand::Read {
                selection,
                after_read_delete,
            } => read_articles(
                ctx,
                session.speed,
                &selection.join(" "),
                after_read_delete,
                confirm,
                out,
            )
            .await
            .map(|_| ()),
            ArticleCommand::Open { selection } => open_articles(ctx, &selection.join(" "), out)
                .await
                .map(|_| ()),
            ArticleCommand::SetSpeed { value } => set_speed(session, &value, out),
            ArticleCommand::Delete { selection, yes } => {
                delete(ctx, Collection::Items, &selection.join(" "), yes, confirm, out)
            }
            ArticleCommand::Add { urls } => add_articles(ctx, &urls, out).await.map(|_| ()),
            ArticleCommand::Export { selection, output } => {
                export_articles(ctx, &selection.join(" "), output.as_deref(), out)
            }
        },
        Command::Feed(cmd) => match cmd {
            FeedCommand::List => list_feeds(ctx, out),
            FeedCommand::Add { urls } => add_feeds(ctx, &urls, out).await.map(|_| ()),
            FeedCommand::Delete { selection, yes } => delete(
                ctx,
                Collection::Subscriptions,
                &selection.join(" "),
                yes,
                confirm,
                out,
            ),
            FeedCommand::Fetch { count, selection } => {
                fetch(ctx, count as usize, &selection.join(" "), out)
                    .await
                    .map(|_| ())
            }
            FeedCommand::Reorder { from, to } => reorder_feed(ctx, from, to, out),
        },
    }
}

pub fn list_articles(ctx: &AppContext, out: &mut dyn Write) -> Result<()> {
    let items = ctx.store.get_all_items()?;

    if items.is_empty() {
        writeln!(out, "No articles saved yet")?;
        return Ok(());
    }

    for item in items {
        writeln!(
            out,
            "{}. {} (source: {})",
            item.id,
            item.display_title(),
            item.site_name()
        )?;
    }

    Ok(())
}

pub fn list_feeds(ctx: &AppContext, out: &mut dyn Write) -> Result<()> {
    let feeds = ctx.store.get_all_subscriptions()?;

    if feeds.is_empty() {
        writeln!(out, "No RSS feeds added yet")?;
        return Ok(());
    }

    for feed in feeds {
        writeln!(out, "{}. {}", feed.id, feed.source_uri)?;
    }

    Ok(())
}

pub fn delete(
    ctx: &AppContext,
    collection: Collection,
    selection: &str,
    yes: bool,
    confirm: &mut dyn Confirm,
    out: &mut dyn Write,
) -> Result<()> {
    Batch::new(collection, ctx.config.batch.confirm_threshold)
        .assume_yes(yes)
        .delete(&ctx.store, selection, confirm, out)?;
    Ok(())
}

pub fn set_speed(session: &mut Session, value: &str, out: &mut dyn Write) -> Result<()> {
    let speed = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s > 0.0)
        .ok_or_else(|| BriefError::InvalidSpeed(value.to_string()))?;

    session.speed = speed;
    writeln!(out, "Playback speed set to {}x", speed)?;
    Ok(())
}

/// Read the selected articles aloud, one after another. With
/// `after_read_delete`, the articles that played successfully are deleted as
/// one batch once playback is over, so ids stay stable while reading.
pub async fn read_articles(
    ctx: &AppContext,
    speed: f64,
    selection: &str,
    after_read_delete: bool,
    confirm: &mut dyn Confirm,
    out: &mut dyn Write,
) -> Result<PlaySummary> {
    let selected = workflow::select_items(&ctx.store, selection)?;

    let mut summary = PlaySummary::default();
    if selected.rows.is_empty() {
        workflow::report_selection(out, Collection::Items, &selected)?;
        writeln!(out, "No articles available to read.")?;
        return Ok(summary);
    }

    // The delete happens after playback, but the decision is taken up front.
    let mut batch = Batch::new(Collection::Items, ctx.config.batch.confirm_threshold);
    if after_read_delete {
        if !batch.confirm_selection(&selected, confirm, out)? {
            return Ok(summary);
        }
    } else {
        workflow::report_selection(out, Collection::Items, &selected)?;
    }

    let total = selected.rows.len();
    for (idx, item) in selected.rows.iter().enumerate() {
        if !item.has_body() {
            writeln!(out, "Article ID {} content empty", item.id)?;
            continue;
        }

        writeln!(out, "Title: {}", item.display_title())?;
        writeln!(out, "Website: {}", item.site_name())?;
        writeln!(out, "Reading article {} / {} (ID {})...", idx + 1, total, item.id)?;

        match ctx.playback.speak(&item.body, speed).await {
            Ok(()) => summary.played.push(item.id),
            Err(e) => {
                tracing::warn!("Playback failed for article {}: {}", item.id, e);
                writeln!(out, "TTS playback failed for article {}: {}", item.id, e)?;
                summary.failed.push(item.id);
            }
        }
    }

    if after_read_delete {
        let outcome = batch.delete_ids(&ctx.store, &summary.played, out)?;
        summary.deleted = outcome.deleted;
    }

    Ok(summary)
}

pub async fn open_articles(
    ctx: &AppContext,
    selection: &str,
    out: &mut dyn Write,
) -> Result<PlaySummary> {
    let selected = workflow::select_items(&ctx.store, selection)?;
    workflow::report_selection(out, Collection::Items, &selected)?;

    let mut summary = PlaySummary::default();
    if selected.rows.is_empty() {
        writeln!(out, "No articles available to open.")?;
        return Ok(summary);
    }

    for item in &selected.rows {
        match ctx.playback.view(item.display_title(), &item.body).await {
            Ok(()) => {
                writeln!(out, "Opened article {}: {}", item.id, item.display_title())?;
                summary.played.push(item.id);
            }
            Err(e) => {
                writeln!(out, "Failed to open article {}: {}", item.id, e)?;
                summary.failed.push(item.id);
            }
        }
    }

    Ok(summary)
}

pub fn export_articles(
    ctx: &AppContext,
    selection: &str,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<()> {
    let selected = workflow::select_items(&ctx.store, selection)?;
    workflow::report_selection(out, Collection::Items, &selected)?;

    if selected.rows.is_empty() {
        writeln!(out, "No articles to export.")?;
        return Ok(());
    }

    let json = serde_json::to_string_pretty(&selected.rows)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            writeln!(
                out,
                "Exported {} articles to {}",
                selected.rows.len(),
                path.display()
            )?;
        }
        None => writeln!(out, "{}", json)?,
    }

    Ok(())
}

/// Subscribe to each URL whose feed can be fetched and parsed.
pub async fn add_feeds(
    ctx: &AppContext,
    urls: &[String],
    out: &mut dyn Write,
) -> Result<FetchSummary> {
    let mut summary = FetchSummary::default();

    for url in urls {
        if let Err(e) = Url::parse(url).map_err(BriefError::from) {
            writeln!(out, "{} ({})", e, url)?;
            summary.failed += 1;
            continue;
        }

        if ctx.store.exists(Collection::Subscriptions, url)? {
            writeln!(out, "Already have RSS feed: {}", url)?;
            summary.already_have += 1;
            continue;
        }

        if let Err(e) = ctx.feeds.entries(url).await {
            tracing::warn!("Rejected feed {}: {}", url, e);
            writeln!(out, "Could not read feed {}: {}", url, e)?;
            summary.failed += 1;
            continue;
        }

        match ctx.store.add_subscription(url) {
            Ok(id) => {
                writeln!(out, "Added RSS feed: {} (ID {})", url, id)?;
                summary.saved += 1;
            }
            Err(e @ BriefError::DuplicateKey { .. }) => {
                writeln!(out, "{}", e)?;
                summary.already_have += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}

/// Download and store articles directly by URL.
pub async fn add_articles(
    ctx: &AppContext,
    urls: &[String],
    out: &mut dyn Write,
) -> Result<FetchSummary> {
    let mut summary = FetchSummary::default();

    for url in urls {
        if let Err(e) = Url::parse(url).map_err(BriefError::from) {
            writeln!(out, "{} ({})", e, url)?;
            summary.failed += 1;
            continue;
        }
        save_article(ctx, url, url, None, None, &mut summary, out).await?;
    }

    Ok(summary)
}

/// Pull the first `count` entries of every selected feed, in feed order.
pub async fn fetch(
    ctx: &AppContext,
    count: usize,
    selection: &str,
    out: &mut dyn Write,
) -> Result<FetchSummary> {
    let selected = workflow::select_subscriptions(&ctx.store, selection)?;
    workflow::report_selection(out, Collection::Subscriptions, &selected)?;

    let mut summary = FetchSummary::default();
    if selected.rows.is_empty() {
        writeln!(out, "No RSS feeds to fetch from")?;
        return Ok(summary);
    }

    for feed in &selected.rows {
        writeln!(
            out,
            "Fetching {} entries from feed ID {}: {}",
            count, feed.id, feed.source_uri
        )?;

        let entries = match ctx.feeds.entries(&feed.source_uri).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Feed {} failed: {}", feed.source_uri, e);
                writeln!(out, "Failed to fetch feed {}: {}", feed.source_uri, e)?;
                summary.failed += 1;
                continue;
            }
        };

        let saved_before = summary.saved;
        for entry in entries.into_iter().take(count) {
            save_article(
                ctx,
                &entry.link,
                &feed.source_uri,
                entry.title.as_deref(),
                entry.published_hint,
                &mut summary,
                out,
            )
            .await?;
        }

        let new = summary.saved - saved_before;
        if new == 0 {
            writeln!(out, "No new articles were added for this feed.")?;
        } else {
            writeln!(out, "Finished fetching {} new articles for this feed.", new)?;
        }
    }

    Ok(summary)
}

/// Extract and insert one article unless it is already stored. Only storage
/// failures are returned as errors; everything else is reported and counted.
async fn save_article(
    ctx: &AppContext,
    link: &str,
    origin: &str,
    title_hint: Option<&str>,
    published_hint: Option<chrono::NaiveDate>,
    summary: &mut FetchSummary,
    out: &mut dyn Write,
) -> Result<()> {
    if ctx.store.exists(Collection::Items, link)? {
        writeln!(out, "Already have article: {}", link)?;
        summary.already_have += 1;
        return Ok(());
    }

    let extracted = match ctx.scraper.extract(link).await {
        Ok(extracted) => extracted,
        Err(e) => {
            tracing::warn!("Extraction failed for {}: {}", link, e);
            writeln!(out, "Failed to parse article {}: {}", link, e)?;
            summary.failed += 1;
            return Ok(());
        }
    };

    let title = if extracted.title.trim().is_empty() {
        title_hint.unwrap_or(link).to_string()
    } else {
        extracted.title
    };

    let item = NewItem {
        source_uri: link.to_string(),
        title,
        body: extracted.body,
        origin_uri: origin.to_string(),
        fetched_at: Some(Utc::now()),
        published_at: extracted.published.or(published_hint),
    };

    match ctx.store.add_item(&item) {
        Ok(_) => {
            writeln!(out, "Saved article: {}", item.title)?;
            summary.saved += 1;
        }
        Err(BriefError::DuplicateKey { .. }) => {
            writeln!(out, "Already have article: {}", link)?;
            summary.already_have += 1;
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

pub fn reorder_feed(ctx: &AppContext, from: i64, to: i64, out: &mut dyn Write) -> Result<()> {
    ctx.store.move_subscription(from, to)?;
    writeln!(out, "Moved RSS feed {} to position {}", from, to)?;
    Ok(())
}
