//! Reading list and favorite toggle commands

use anyhow::{Context, Result, bail};
use gazette_domain::routes::{Route, RouteDecision, guard};
use gazette_domain::text::truncate_title;
use gazette_domain::usecases::{FeedSynchronizer, ReadingList, ToggleOutcome};
use gazette_domain::{LoadOutcome, Session};
use std::path::PathBuf;

use crate::args::{FavoriteArgs, FavoritesArgs};
use crate::commands::{build_gateway, build_session};
use crate::config::AppConfig;

fn require_sign_in(session: &Session) -> Result<()> {
    if let RouteDecision::Redirect(target) = guard(&Route::Dashboard, session) {
        bail!("You must sign in first (redirecting to {})", target);
    }
    Ok(())
}

pub async fn execute(args: FavoritesArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let session = build_session(&config);
    require_sign_in(&session)?;
    let gateway = build_gateway(&config, &session).await?;

    let list = ReadingList::new(gateway);
    let outcome = list
        .load(&session)
        .await
        .context("Failed to load reading list")?;
    tracing::debug!(outcome = ?outcome, "Reading list loaded");

    if let Some(article_id) = &args.remove {
        list.remove(&session, article_id)
            .await
            .context("Failed to remove favorite")?;
        tracing::info!(article_id = %article_id, "Removed from reading list");
    }

    let entries = list.entries();

    if args.json {
        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize favorites")?;
        println!("{}", json);
        return Ok(());
    }

    if matches!(outcome, LoadOutcome::Applied(_)) && entries.is_empty() {
        println!("Votre liste de lecture est vide.");
        return Ok(());
    }

    for article in &entries {
        println!(
            "★ {}  {}  [{}]",
            article.created_at.date(),
            truncate_title(&article.title),
            article.slug
        );
    }

    Ok(())
}

pub async fn toggle(args: FavoriteArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let session = build_session(&config);
    require_sign_in(&session)?;
    let gateway = build_gateway(&config, &session).await?;

    let feed = FeedSynchronizer::new(gateway);
    feed.load_favorites(&session)
        .await
        .context("Failed to load favorites")?;

    match feed
        .toggle_favorite(&session, &args.article_id)
        .await
        .context("Failed to toggle favorite")?
    {
        ToggleOutcome::Added => println!("Added {} to favorites", args.article_id),
        ToggleOutcome::Removed => println!("Removed {} from favorites", args.article_id),
        ToggleOutcome::InFlight | ToggleOutcome::Skipped => {
            bail!("Favorite toggle was not applied")
        }
    }

    Ok(())
}
