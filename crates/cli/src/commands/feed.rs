//! Feed command - published articles with the user's favorite marks

use anyhow::{Context, Result};
use gazette_domain::text::{DEFAULT_EXCERPT_CHARS, excerpt, truncate_title};
use gazette_domain::usecases::FeedSynchronizer;
use serde::Serialize;
use std::path::PathBuf;
use time::OffsetDateTime;

use crate::args::FeedArgs;
use crate::commands::{build_gateway, build_session};
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct FeedEntry {
    id: String,
    title: String,
    slug: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    excerpt: String,
    image_url: Option<String>,
    favorite: bool,
}

pub async fn execute(args: FeedArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let session = build_session(&config);
    let gateway = build_gateway(&config, &session).await?;

    let feed = FeedSynchronizer::new(gateway);
    feed.load_articles()
        .await
        .context("Failed to load articles")?;
    if let Err(e) = feed.load_favorites(&session).await {
        tracing::warn!(error = %e, "Favorites unavailable, showing feed without marks");
    }

    let mut articles = feed.articles();
    if let Some(limit) = args.limit {
        articles.truncate(limit);
    }

    let entries: Vec<FeedEntry> = articles
        .into_iter()
        .map(|article| FeedEntry {
            favorite: feed.is_favorite(&article.id),
            excerpt: excerpt(&article.content, DEFAULT_EXCERPT_CHARS),
            id: article.id,
            title: article.title,
            slug: article.slug,
            created_at: article.created_at,
            image_url: article.image_url,
        })
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize feed")?;
        println!("{}", json);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Aucun article publié.");
        return Ok(());
    }

    for entry in &entries {
        let mark = if entry.favorite { "★" } else { " " };
        println!(
            "{} {}  {}  [{}]",
            mark,
            entry.created_at.date(),
            truncate_title(&entry.title),
            entry.slug
        );
        println!("    {}", entry.excerpt);
        println!("    id: {}", entry.id);
        println!();
    }

    Ok(())
}
