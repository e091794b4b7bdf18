//! Admin commands - generation, listing, editing and deletion

use anyhow::{Context, Result, bail};
use gazette_domain::routes::{Route, RouteDecision, guard};
use gazette_domain::text::truncate_title;
use gazette_domain::usecases::{AdminConfig, AdminWorkflow};
use gazette_domain::{ArticlePatch, ArticleStatus, ContentGenerator, Gateway, Session, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::{AdminArgs, AdminCommands};
use crate::commands::{build_gateway, build_generator, build_session};
use crate::config::AppConfig;

type Workflow = AdminWorkflow<dyn Gateway, dyn ContentGenerator, SystemClock>;

pub async fn execute(args: AdminArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let session = build_session(&config);

    if let RouteDecision::Redirect(target) = guard(&Route::Admin, &session) {
        bail!(
            "Admin access required (redirecting to {}); add your email to admin.emails",
            target
        );
    }

    let gateway = build_gateway(&config, &session).await?;

    match args.command {
        AdminCommands::Generate { topic, count } => {
            let generator = build_generator(&config)?;
            let workflow = workflow(&config, gateway, generator);
            generate(&workflow, &session, topic, count).await
        }
        AdminCommands::Recent { json } => {
            let workflow = workflow(&config, gateway, offline_generator());
            recent(&workflow, &session, json).await
        }
        AdminCommands::Edit {
            article_id,
            title,
            content,
            status,
            image_url,
            clear_image,
        } => {
            let status = status
                .map(|s| {
                    ArticleStatus::parse(&s)
                        .with_context(|| format!("Invalid status '{}': use draft or published", s))
                })
                .transpose()?;
            let image_url = if clear_image {
                Some(None)
            } else {
                image_url.map(Some)
            };
            let patch = ArticlePatch {
                title,
                content,
                status,
                image_url,
            };

            let workflow = workflow(&config, gateway, offline_generator());
            let article = workflow
                .update_article(&session, &article_id, &patch)
                .await
                .context("Failed to update article")?;
            println!(
                "Updated {} ({}): {}",
                article.id,
                article.status.as_str(),
                article.title
            );
            Ok(())
        }
        AdminCommands::Delete { article_id } => {
            let workflow = workflow(&config, gateway, offline_generator());
            let removed = workflow
                .delete_article(&session, &article_id)
                .await
                .context("Failed to delete article")?;
            println!(
                "Deleted {} and {} comment(s)",
                article_id, removed
            );
            Ok(())
        }
    }
}

fn workflow(
    config: &AppConfig,
    gateway: Arc<dyn Gateway>,
    generator: Arc<dyn ContentGenerator>,
) -> Workflow {
    let defaults = AdminConfig::default();
    let topics = if config.admin.topics.is_empty() {
        defaults.topics
    } else {
        config.admin.topics.clone()
    };

    AdminWorkflow::new(
        gateway,
        generator,
        Arc::new(SystemClock),
        AdminConfig {
            topics,
            batch_size: config.admin.batch_size,
            recent_limit: config.admin.recent_limit,
            generate_images: config.generation.generate_images,
        },
    )
}

/// Commands that never generate still need a provider to build the workflow
fn offline_generator() -> Arc<dyn ContentGenerator> {
    Arc::new(gazette_adapters::generation::StubGenerator::new())
}

async fn generate(
    workflow: &Workflow,
    session: &Session,
    topic: Option<String>,
    count: Option<usize>,
) -> Result<()> {
    if let Some(topic) = topic {
        let article = workflow
            .generate_and_publish(session, &topic)
            .await
            .context("Article generation failed")?;
        println!("Published {} [{}]", article.title, article.slug);
        println!("  id: {}", article.id);
        return Ok(());
    }

    let report = workflow
        .generate_batch(session, count)
        .await
        .context("Batch generation failed")?;

    for article in &report.published {
        println!("Published {} [{}]", article.title, article.slug);
    }
    for (topic, error) in &report.failed {
        eprintln!("Failed {}: {}", topic, error);
    }

    if report.published.is_empty() {
        bail!("No article was generated");
    }
    Ok(())
}

async fn recent(workflow: &Workflow, session: &Session, json: bool) -> Result<()> {
    let articles = workflow
        .recent_articles(session)
        .await
        .context("Failed to list articles")?;
    let last = workflow
        .last_generation(session)
        .await
        .context("Failed to read generation log")?;

    if json {
        let value = serde_json::json!({
            "last_generation": last.map(|t| t.to_string()),
            "articles": articles,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match last {
        Some(at) => println!("Dernière génération: {}", at),
        None => println!("Aucune génération enregistrée"),
    }
    println!();

    for article in &articles {
        println!(
            "{:<9}  {}  {}  id: {}",
            article.status.as_str(),
            article.created_at.date(),
            truncate_title(&article.title),
            article.id
        );
    }

    Ok(())
}
