//! Article page use case - one article by slug with its comment thread

use std::sync::Arc;

use crate::model::{Article, Comment, Favorite, NewComment};
use crate::ports::Gateway;
use crate::routes::Route;
use crate::session::Session;
use crate::usecases::feed::{CommentOutcome, FeedError, ToggleOutcome};

/// Everything the article page displays
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleView {
    pub article: Article,
    pub comments: Vec<Comment>,
    pub is_favorited: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Loaded(ArticleView),
    /// Unknown slug; the caller should navigate here instead
    Redirect(Route),
}

pub struct ArticleReader<G>
where
    G: Gateway + ?Sized,
{
    gateway: Arc<G>,
}

impl<G> ArticleReader<G>
where
    G: Gateway + ?Sized,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Open the published article with this slug
    pub async fn open(&self, session: &Session, slug: &str) -> Result<PageOutcome, FeedError> {
        let article = match self.gateway.find_published_by_slug(slug).await {
            Ok(Some(article)) => article,
            Ok(None) => {
                tracing::info!(slug = %slug, "Unknown article, redirecting home");
                return Ok(PageOutcome::Redirect(Route::Home));
            }
            Err(e) => {
                tracing::error!(slug = %slug, error = %e, "Failed to fetch article");
                return Err(e.into());
            }
        };

        let favorite_check = async {
            match session.user_id() {
                Some(user_id) => {
                    self.gateway
                        .is_favorite(&Favorite::new(user_id, article.id.as_str()))
                        .await
                }
                None => Ok(false),
            }
        };
        let (comments, is_favorited) = futures::join!(
            self.gateway.list_comments(&article.id),
            favorite_check
        );

        let comments = comments.unwrap_or_else(|e| {
            tracing::error!(article_id = %article.id, error = %e, "Failed to load comments");
            Vec::new()
        });
        let is_favorited = is_favorited.unwrap_or_else(|e| {
            tracing::warn!(article_id = %article.id, error = %e, "Failed to check favorite");
            false
        });

        Ok(PageOutcome::Loaded(ArticleView {
            article,
            comments,
            is_favorited,
        }))
    }

    /// Toggle the favorite flag; the view changes only after the gateway succeeds
    pub async fn toggle_favorite(
        &self,
        session: &Session,
        view: &mut ArticleView,
    ) -> Result<ToggleOutcome, FeedError> {
        let Some(user_id) = session.user_id() else {
            return Ok(ToggleOutcome::Skipped);
        };

        let favorite = Favorite::new(user_id, view.article.id.as_str());
        if view.is_favorited {
            self.gateway.delete_favorite(&favorite).await?;
            view.is_favorited = false;
            Ok(ToggleOutcome::Removed)
        } else {
            self.gateway.insert_favorite(&favorite).await?;
            view.is_favorited = true;
            Ok(ToggleOutcome::Added)
        }
    }

    /// Post a comment and re-fetch the thread
    pub async fn add_comment(
        &self,
        session: &Session,
        view: &mut ArticleView,
        text: &str,
    ) -> Result<CommentOutcome, FeedError> {
        let Some(user_id) = session.user_id() else {
            return Ok(CommentOutcome::Skipped);
        };
        if text.trim().is_empty() {
            return Ok(CommentOutcome::Skipped);
        }

        let comment = self
            .gateway
            .insert_comment(&NewComment {
                article_id: view.article.id.clone(),
                user_id: user_id.to_string(),
                content: text.to_string(),
            })
            .await?;

        match self.gateway.list_comments(&view.article.id).await {
            Ok(mut comments) => {
                comments.sort_by_key(|c| c.created_at);
                view.comments = comments;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Comment posted but thread refresh failed");
            }
        }

        Ok(CommentOutcome::Posted(comment))
    }
}
