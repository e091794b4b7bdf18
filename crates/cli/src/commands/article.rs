//! Article and comment commands

use anyhow::{Context, Result, bail};
use gazette_domain::share::{ShareLinks, article_url, share_links};
use gazette_domain::text::render_lines;
use gazette_domain::usecases::{ArticleReader, CommentOutcome, FeedSynchronizer, PageOutcome};
use gazette_domain::{Article, Comment};
use serde::Serialize;
use std::path::PathBuf;

use crate::args::{ArticleArgs, CommentArgs};
use crate::commands::{build_gateway, build_session};
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct ArticleOutput<'a> {
    article: &'a Article,
    comments: &'a [Comment],
    favorite: bool,
    url: String,
    share: ShareLinks,
}

pub async fn execute(args: ArticleArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let session = build_session(&config);
    let gateway = build_gateway(&config, &session).await?;

    let reader = ArticleReader::new(gateway);
    let view = match reader
        .open(&session, &args.slug)
        .await
        .context("Failed to load article")?
    {
        PageOutcome::Loaded(view) => view,
        PageOutcome::Redirect(route) => {
            bail!("Article not found: {} (redirecting to {})", args.slug, route)
        }
    };

    let url = article_url(&config.general.site_url, &view.article.slug);
    let share = share_links(&url, Some(&view.article.title));

    if args.json {
        let output = ArticleOutput {
            article: &view.article,
            comments: &view.comments,
            favorite: view.is_favorited,
            url,
            share,
        };
        let json = serde_json::to_string_pretty(&output).context("Failed to serialize article")?;
        println!("{}", json);
        return Ok(());
    }

    let mark = if view.is_favorited { "★ " } else { "" };
    println!("{}{}", mark, view.article.title);
    println!("{}", view.article.created_at.date());
    if let Some(image_url) = &view.article.image_url {
        println!("Image: {}", image_url);
    }
    println!();

    for line in render_lines(&view.article.content) {
        if line.emphasized {
            println!("\x1b[1m{}\x1b[0m", line.text);
        } else {
            println!("{}", line.text);
        }
    }

    println!();
    println!("Partager: {}", url);
    println!("  Facebook: {}", share.facebook);
    println!("  Twitter:  {}", share.twitter);
    println!("  LinkedIn: {}", share.linkedin);
    println!("  Reddit:   {}", share.reddit);

    println!();
    println!("Commentaires ({})", view.comments.len());
    for comment in &view.comments {
        println!(
            "  [{}] {}: {}",
            comment.created_at.date(),
            comment.user_id,
            comment.content
        );
    }

    Ok(())
}

pub async fn comment(args: CommentArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let session = build_session(&config);
    if !session.is_signed_in() {
        bail!("You must sign in to comment (set session.user_id)");
    }
    let gateway = build_gateway(&config, &session).await?;

    let feed = FeedSynchronizer::new(gateway);
    feed.set_draft(&args.article_id, args.text);

    match feed
        .submit_draft(&session, &args.article_id)
        .await
        .context("Failed to post comment")?
    {
        CommentOutcome::Posted(comment) => {
            println!("Comment posted: {}", comment.id);
            println!(
                "Thread now has {} comment(s)",
                feed.comments(&args.article_id).len()
            );
        }
        CommentOutcome::Skipped => bail!("Comment is empty"),
    }

    Ok(())
}
