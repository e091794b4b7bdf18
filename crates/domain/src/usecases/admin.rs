//! Admin workflow - generate, publish, edit and delete articles

use rand::seq::SliceRandom;
use std::sync::Arc;
use time::OffsetDateTime;

use crate::model::{
    Article, ArticlePatch, ArticleQuery, ArticleStatus, GenerationLogEntry, NewArticle, User,
};
use crate::policy::{AccessDenied, require_admin};
use crate::ports::{Clock, ContentGenerator, Gateway, GatewayError, GenerationError};
use crate::session::Session;
use crate::text::slugify;

/// Topics used by batch generation when none are configured
pub const DEFAULT_TOPICS: [&str; 10] = [
    "Latest Technology Trends in 2025",
    "The Future of Digital Marketing",
    "Sustainable Business Practices",
    "Innovation in AI and Machine Learning",
    "Remote Work Best Practices",
    "Digital Transformation Strategies",
    "Emerging Tech Startups",
    "Cybersecurity Best Practices",
    "Social Media Marketing Trends",
    "Business Leadership in the Digital Age",
];

/// Configuration for the admin workflow
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Pool that batch generation draws topics from
    pub topics: Vec<String>,
    /// Articles per batch run
    pub batch_size: usize,
    /// Rows shown in the recent articles listing
    pub recent_limit: usize,
    /// Whether to request an illustration for each article
    pub generate_images: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
            batch_size: 2,
            recent_limit: 10,
            generate_images: true,
        }
    }
}

/// Errors from admin operations
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Forbidden: {0}")]
    Forbidden(#[from] AccessDenied),
    #[error("Invalid topic '{0}': no usable slug")]
    InvalidTopic(String),
    #[error("Nothing to update")]
    EmptyPatch,
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Report of a batch generation run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub published: Vec<Article>,
    /// Topics that failed, with the error message
    pub failed: Vec<(String, String)>,
}

/// Admin workflow orchestrator
pub struct AdminWorkflow<G, P, Cl>
where
    G: Gateway + ?Sized,
    P: ContentGenerator + ?Sized,
    Cl: Clock + ?Sized,
{
    gateway: Arc<G>,
    generator: Arc<P>,
    clock: Arc<Cl>,
    config: AdminConfig,
}

impl<G, P, Cl> AdminWorkflow<G, P, Cl>
where
    G: Gateway + ?Sized,
    P: ContentGenerator + ?Sized,
    Cl: Clock + ?Sized,
{
    pub fn new(gateway: Arc<G>, generator: Arc<P>, clock: Arc<Cl>, config: AdminConfig) -> Self {
        Self {
            gateway,
            generator,
            clock,
            config,
        }
    }

    /// Generate one article about `topic`, publish it and log the run
    pub async fn generate_and_publish(
        &self,
        session: &Session,
        topic: &str,
    ) -> Result<Article, AdminError> {
        let user = require_admin(session)?;
        let article = self.publish_topic(user, topic).await?;
        self.record_run(1).await;
        Ok(article)
    }

    /// Generate articles for randomly drawn topics.
    ///
    /// Each topic is attempted once; failures are collected and the run is
    /// logged with the number of articles actually published.
    pub async fn generate_batch(
        &self,
        session: &Session,
        count: Option<usize>,
    ) -> Result<BatchReport, AdminError> {
        let user = require_admin(session)?;
        let topics = self.pick_topics(count.unwrap_or(self.config.batch_size));

        tracing::info!(topics = ?topics, "Starting batch generation");

        let mut report = BatchReport::default();
        for topic in topics {
            match self.publish_topic(user, &topic).await {
                Ok(article) => report.published.push(article),
                Err(e) => {
                    tracing::error!(topic = %topic, error = %e, "Failed to generate article");
                    report.failed.push((topic, e.to_string()));
                }
            }
        }

        if !report.published.is_empty() {
            self.record_run(report.published.len() as u32).await;
        }

        Ok(report)
    }

    /// Latest articles of any status
    pub async fn recent_articles(&self, session: &Session) -> Result<Vec<Article>, AdminError> {
        require_admin(session)?;
        Ok(self
            .gateway
            .list_articles(&ArticleQuery::recent(self.config.recent_limit))
            .await?)
    }

    /// When the last generation run happened
    pub async fn last_generation(
        &self,
        session: &Session,
    ) -> Result<Option<OffsetDateTime>, AdminError> {
        require_admin(session)?;
        Ok(self
            .gateway
            .latest_generation()
            .await?
            .map(|entry| entry.generated_at))
    }

    pub async fn update_article(
        &self,
        session: &Session,
        article_id: &str,
        patch: &ArticlePatch,
    ) -> Result<Article, AdminError> {
        require_admin(session)?;
        if patch.is_empty() {
            return Err(AdminError::EmptyPatch);
        }

        let article = self.gateway.update_article(article_id, patch).await?;
        tracing::info!(article_id = %article_id, "Article updated");
        Ok(article)
    }

    /// Delete an article and its comments, comments first.
    ///
    /// Returns the number of comments removed.
    pub async fn delete_article(
        &self,
        session: &Session,
        article_id: &str,
    ) -> Result<u64, AdminError> {
        require_admin(session)?;

        let removed = self.gateway.delete_comments_for_article(article_id).await?;
        self.gateway.delete_article(article_id).await?;

        tracing::info!(
            article_id = %article_id,
            comments_removed = removed,
            "Article deleted"
        );
        Ok(removed)
    }

    /// Write the generation log row. The articles are already published, so
    /// a failure here is only logged.
    async fn record_run(&self, articles_count: u32) {
        let entry = GenerationLogEntry {
            generated_at: self.clock.now(),
            articles_count,
        };
        if let Err(e) = self.gateway.record_generation(&entry).await {
            tracing::warn!(
                articles_count,
                error = %e,
                "Failed to record generation run, articles remain published"
            );
        }
    }

    async fn publish_topic(&self, user: &User, topic: &str) -> Result<Article, AdminError> {
        let topic = topic.trim();
        let slug = slugify(topic);
        if slug.is_empty() {
            return Err(AdminError::InvalidTopic(topic.to_string()));
        }

        let content = self.generator.generate_article(topic).await?;

        let image_url = if self.config.generate_images {
            match self.generator.generate_image(&image_prompt(topic)).await {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(topic = %topic, error = %e, "Image generation failed, publishing without image");
                    None
                }
            }
        } else {
            None
        };

        let article = self
            .gateway
            .insert_article(&NewArticle {
                title: topic.to_string(),
                content,
                slug,
                image_url,
                status: ArticleStatus::Published,
                author_id: Some(user.id.clone()),
            })
            .await?;

        tracing::info!(article_id = %article.id, slug = %article.slug, "Article published");
        Ok(article)
    }

    fn pick_topics(&self, count: usize) -> Vec<String> {
        let mut rng = rand::thread_rng();
        self.config
            .topics
            .choose_multiple(&mut rng, count)
            .cloned()
            .collect()
    }
}

fn image_prompt(topic: &str) -> String {
    format!("Editorial illustration for a blog article about: {}", topic)
}
