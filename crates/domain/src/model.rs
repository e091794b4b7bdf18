//! Domain models and value objects

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Publication status of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "draft" => Some(ArticleStatus::Draft),
            "published" => Some(ArticleStatus::Published),
            _ => None,
        }
    }
}

/// A stored article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Opaque identifier assigned by the gateway
    pub id: String,
    pub title: String,
    /// Plain text body; lines starting with `# ` or `## ` are headings
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// URL-safe key used by `/article/:slug`
    pub slug: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: ArticleStatus,
}

impl Article {
    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }
}

/// Fields needed to create an article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub status: ArticleStatus,
    /// Author user id, if created from an authenticated session
    #[serde(rename = "user_id", skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
}

/// Partial update applied by an admin edit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticlePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
    /// `Some(None)` clears the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
}

impl ArticlePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.status.is_none()
            && self.image_url.is_none()
    }

    /// Apply the patch to an article in place
    pub fn apply_to(&self, article: &mut Article) {
        if let Some(title) = &self.title {
            article.title = title.clone();
        }
        if let Some(content) = &self.content {
            article.content = content.clone();
        }
        if let Some(status) = self.status {
            article.status = status;
        }
        if let Some(image_url) = &self.image_url {
            article.image_url = image_url.clone();
        }
    }
}

/// A comment on an article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub article_id: String,
    pub user_id: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields needed to create a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub article_id: String,
    pub user_id: String,
    pub content: String,
}

/// A user-scoped bookmark; the (user, article) pair is the identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Favorite {
    pub user_id: String,
    pub article_id: String,
}

impl Favorite {
    pub fn new(user_id: impl Into<String>, article_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            article_id: article_id.into(),
        }
    }
}

/// Raw favorites join row; the embedded article may be missing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteArticleRow {
    pub article_id: String,
    #[serde(rename = "articles", default)]
    pub article: Option<Article>,
}

/// One run of the admin generation workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationLogEntry {
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub articles_count: u32,
}

/// Authorization role carried by a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Reader,
    Admin,
}

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Sort direction for `created_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Article listing query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    /// Only articles with this status (None = any status)
    pub status: Option<ArticleStatus>,
    /// Order by creation time
    pub order: SortOrder,
    /// Maximum rows (None = all)
    pub limit: Option<usize>,
}

impl ArticleQuery {
    /// Published articles, newest first, no limit
    pub fn published() -> Self {
        Self {
            status: Some(ArticleStatus::Published),
            order: SortOrder::Descending,
            limit: None,
        }
    }

    /// Latest articles of any status
    pub fn recent(limit: usize) -> Self {
        Self {
            status: None,
            order: SortOrder::Descending,
            limit: Some(limit),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }
}

/// Result of a refresh operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result replaced local state; carries the number of items
    Applied(usize),
    /// A newer load (or a sign-out) started before this one resolved
    Superseded,
    /// Nothing to load (no signed-in user)
    Skipped,
}
