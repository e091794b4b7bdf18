//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{
    Article, ArticlePatch, ArticleQuery, Comment, Favorite, FavoriteArticleRow,
    GenerationLogEntry, NewArticle, NewComment,
};

/// Error type for gateway operations
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Database error: {0}")]
    Database(String),
}

/// Port for the `articles` table
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// List articles matching the query, ordered by creation time
    async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, GatewayError>;

    /// Find a published article by slug
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Article>, GatewayError>;

    /// Insert an article and return the stored row
    async fn insert_article(&self, article: &NewArticle) -> Result<Article, GatewayError>;

    /// Apply a patch to an article and return the updated row
    async fn update_article(
        &self,
        article_id: &str,
        patch: &ArticlePatch,
    ) -> Result<Article, GatewayError>;

    /// Delete an article row (comments must already be gone)
    async fn delete_article(&self, article_id: &str) -> Result<(), GatewayError>;
}

/// Port for the `comments` table
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// List comments of an article, oldest first
    async fn list_comments(&self, article_id: &str) -> Result<Vec<Comment>, GatewayError>;

    /// Insert a comment and return the stored row
    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment, GatewayError>;

    /// Delete every comment of an article, returning how many were removed
    async fn delete_comments_for_article(&self, article_id: &str) -> Result<u64, GatewayError>;
}

/// Port for the `favorites` relation
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Article ids favorited by a user
    async fn list_favorite_ids(&self, user_id: &str) -> Result<Vec<String>, GatewayError>;

    /// Favorites of a user joined with their articles
    async fn list_favorite_articles(
        &self,
        user_id: &str,
    ) -> Result<Vec<FavoriteArticleRow>, GatewayError>;

    /// Whether the (user, article) pair exists
    async fn is_favorite(&self, favorite: &Favorite) -> Result<bool, GatewayError>;

    /// Insert the (user, article) pair
    async fn insert_favorite(&self, favorite: &Favorite) -> Result<(), GatewayError>;

    /// Delete the (user, article) pair
    async fn delete_favorite(&self, favorite: &Favorite) -> Result<(), GatewayError>;
}

/// Port for the `auto_generation_log` table
#[async_trait]
pub trait GenerationLog: Send + Sync {
    /// Append a log entry
    async fn record_generation(&self, entry: &GenerationLogEntry) -> Result<(), GatewayError>;

    /// Most recent log entry, if any
    async fn latest_generation(&self) -> Result<Option<GenerationLogEntry>, GatewayError>;
}

/// The full data store gateway
pub trait Gateway: ArticleStore + CommentStore + FavoriteStore + GenerationLog {}

impl<T> Gateway for T where T: ArticleStore + CommentStore + FavoriteStore + GenerationLog + ?Sized {}

/// Error type for generation provider operations
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Provider API error: {0}")]
    Api(String),
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Timeout")]
    Timeout,
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Port for the content generation provider
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate a markdown-like article body about a topic
    async fn generate_article(&self, topic: &str) -> Result<String, GenerationError>;

    /// Generate an illustration and return its URL
    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
