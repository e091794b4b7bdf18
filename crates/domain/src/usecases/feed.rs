//! Feed synchronizer - published articles, favorite set and comment threads
//!
//! Local state lives behind a `std::sync::Mutex` that is never held across
//! an `.await`. Every load is stamped with an epoch; a result that resolves
//! after a newer load of the same kind (or after `clear_session`) is dropped.
//!
//! Favorite toggles on the same (user, article) pair do not overlap: while a
//! toggle is in flight, further toggles for that pair return
//! [`ToggleOutcome::InFlight`] without contacting the gateway.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::model::{Article, ArticleQuery, Comment, Favorite, LoadOutcome, NewComment};
use crate::ports::{Gateway, GatewayError};
use crate::session::Session;

/// Errors surfaced by the synchronizer
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Result of a favorite toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Another toggle on the same pair has not resolved yet
    InFlight,
    /// No signed-in user
    Skipped,
}

/// Result of posting a comment
#[derive(Debug, Clone, PartialEq)]
pub enum CommentOutcome {
    Posted(Comment),
    /// No signed-in user, or blank text
    Skipped,
}

#[derive(Debug, Default)]
struct FeedState {
    articles: Vec<Article>,
    favorites: HashSet<String>,
    threads: HashMap<String, Vec<Comment>>,
    open_threads: HashSet<String>,
    drafts: HashMap<String, String>,
    pending_toggles: HashSet<(String, String)>,
    articles_epoch: u64,
    favorites_epoch: u64,
    thread_epochs: HashMap<String, u64>,
    session_epoch: u64,
}

/// Client-side view of the feed kept consistent with the gateway
pub struct FeedSynchronizer<G>
where
    G: Gateway + ?Sized,
{
    gateway: Arc<G>,
    state: Mutex<FeedState>,
}

impl<G> FeedSynchronizer<G>
where
    G: Gateway + ?Sized,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            state: Mutex::new(FeedState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch all published articles, newest first.
    ///
    /// On failure the previous list is kept.
    pub async fn load_articles(&self) -> Result<LoadOutcome, FeedError> {
        let epoch = {
            let mut state = self.state();
            state.articles_epoch += 1;
            state.articles_epoch
        };

        let mut articles = match self
            .gateway
            .list_articles(&ArticleQuery::published())
            .await
        {
            Ok(articles) => articles,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load articles, keeping previous list");
                return Err(e.into());
            }
        };

        articles.retain(Article::is_published);
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut state = self.state();
        if state.articles_epoch != epoch {
            tracing::debug!("Discarding superseded article load");
            return Ok(LoadOutcome::Superseded);
        }

        let count = articles.len();
        state.articles = articles;
        tracing::info!(count = count, "Loaded articles");
        Ok(LoadOutcome::Applied(count))
    }

    /// Replace the favorite set with the user's favorites from the gateway
    pub async fn load_favorites(&self, session: &Session) -> Result<LoadOutcome, FeedError> {
        let Some(user_id) = session.user_id() else {
            return Ok(LoadOutcome::Skipped);
        };

        let (epoch, session_epoch) = {
            let mut state = self.state();
            state.favorites_epoch += 1;
            (state.favorites_epoch, state.session_epoch)
        };

        let ids = match self.gateway.list_favorite_ids(user_id).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Failed to load favorites");
                return Err(e.into());
            }
        };

        let mut state = self.state();
        if state.favorites_epoch != epoch || state.session_epoch != session_epoch {
            tracing::debug!(user_id = %user_id, "Discarding superseded favorites load");
            return Ok(LoadOutcome::Superseded);
        }

        state.favorites = ids.into_iter().collect();
        tracing::debug!(user_id = %user_id, count = state.favorites.len(), "Loaded favorites");
        Ok(LoadOutcome::Applied(state.favorites.len()))
    }

    /// Add or remove an article from the user's favorites.
    ///
    /// The local set changes only once the gateway call has succeeded.
    pub async fn toggle_favorite(
        &self,
        session: &Session,
        article_id: &str,
    ) -> Result<ToggleOutcome, FeedError> {
        let Some(user_id) = session.user_id() else {
            return Ok(ToggleOutcome::Skipped);
        };

        let key = (user_id.to_string(), article_id.to_string());
        let (was_favorite, session_epoch) = {
            let mut state = self.state();
            if !state.pending_toggles.insert(key.clone()) {
                tracing::debug!(article_id = %article_id, "Toggle already in flight");
                return Ok(ToggleOutcome::InFlight);
            }
            (state.favorites.contains(article_id), state.session_epoch)
        };
        let pending = PendingToggle {
            state: &self.state,
            key: Some(key),
        };

        let favorite = Favorite::new(user_id, article_id);
        let result = if was_favorite {
            self.gateway.delete_favorite(&favorite).await
        } else {
            self.gateway.insert_favorite(&favorite).await
        };

        let mut state = self.state();
        pending.release(&mut state);

        if let Err(e) = result {
            tracing::warn!(
                article_id = %article_id,
                error = %e,
                "Favorite toggle failed, local state unchanged"
            );
            return Err(e.into());
        }

        let outcome = if was_favorite {
            ToggleOutcome::Removed
        } else {
            ToggleOutcome::Added
        };

        if state.session_epoch == session_epoch {
            match outcome {
                ToggleOutcome::Removed => {
                    state.favorites.remove(article_id);
                }
                _ => {
                    state.favorites.insert(article_id.to_string());
                }
            }
        }

        tracing::info!(article_id = %article_id, outcome = ?outcome, "Toggled favorite");
        Ok(outcome)
    }

    /// Fetch an article's comments, oldest first, replacing the cached thread
    pub async fn load_comments(&self, article_id: &str) -> Result<LoadOutcome, FeedError> {
        let epoch = {
            let mut state = self.state();
            let epoch = state.thread_epochs.entry(article_id.to_string()).or_insert(0);
            *epoch += 1;
            *epoch
        };

        let mut comments = match self.gateway.list_comments(article_id).await {
            Ok(comments) => comments,
            Err(e) => {
                tracing::error!(article_id = %article_id, error = %e, "Failed to load comments");
                return Err(e.into());
            }
        };
        comments.sort_by_key(|c| c.created_at);

        let mut state = self.state();
        if state.thread_epochs.get(article_id) != Some(&epoch) {
            return Ok(LoadOutcome::Superseded);
        }

        let count = comments.len();
        state.threads.insert(article_id.to_string(), comments);
        Ok(LoadOutcome::Applied(count))
    }

    /// Post a comment, clear the article's input buffer and re-fetch the thread
    pub async fn add_comment(
        &self,
        session: &Session,
        article_id: &str,
        text: &str,
    ) -> Result<CommentOutcome, FeedError> {
        let Some(user_id) = session.user_id() else {
            return Ok(CommentOutcome::Skipped);
        };
        if text.trim().is_empty() {
            return Ok(CommentOutcome::Skipped);
        }

        let new_comment = NewComment {
            article_id: article_id.to_string(),
            user_id: user_id.to_string(),
            content: text.to_string(),
        };

        let comment = match self.gateway.insert_comment(&new_comment).await {
            Ok(comment) => comment,
            Err(e) => {
                tracing::warn!(article_id = %article_id, error = %e, "Failed to add comment");
                return Err(e.into());
            }
        };

        self.state().drafts.remove(article_id);
        tracing::info!(article_id = %article_id, comment_id = %comment.id, "Comment posted");

        if let Err(e) = self.load_comments(article_id).await {
            tracing::warn!(error = %e, "Comment posted but thread refresh failed");
        }

        Ok(CommentOutcome::Posted(comment))
    }

    /// Post the buffered draft for an article
    pub async fn submit_draft(
        &self,
        session: &Session,
        article_id: &str,
    ) -> Result<CommentOutcome, FeedError> {
        let text = self.draft(article_id);
        self.add_comment(session, article_id, &text).await
    }

    /// Open or close a comment thread; opening fetches it first.
    ///
    /// Returns whether the thread is now open.
    pub async fn toggle_thread(&self, article_id: &str) -> bool {
        let open = self.state().open_threads.contains(article_id);
        if !open {
            // A failed fetch is already logged; the thread opens on the cached comments
            let _ = self.load_comments(article_id).await;
        }

        let mut state = self.state();
        if open {
            state.open_threads.remove(article_id);
            false
        } else {
            state.open_threads.insert(article_id.to_string());
            true
        }
    }

    /// Forget everything tied to the signed-in user.
    ///
    /// Toggles still in flight keep their marker until their gateway call
    /// resolves; the bumped session epoch stops them touching local state.
    pub fn clear_session(&self) {
        let mut state = self.state();
        state.session_epoch += 1;
        state.favorites.clear();
        state.drafts.clear();
    }

    pub fn set_draft(&self, article_id: &str, text: impl Into<String>) {
        self.state()
            .drafts
            .insert(article_id.to_string(), text.into());
    }

    pub fn draft(&self, article_id: &str) -> String {
        self.state()
            .drafts
            .get(article_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn articles(&self) -> Vec<Article> {
        self.state().articles.clone()
    }

    pub fn favorites(&self) -> HashSet<String> {
        self.state().favorites.clone()
    }

    pub fn is_favorite(&self, article_id: &str) -> bool {
        self.state().favorites.contains(article_id)
    }

    pub fn comments(&self, article_id: &str) -> Vec<Comment> {
        self.state()
            .threads
            .get(article_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_thread_open(&self, article_id: &str) -> bool {
        self.state().open_threads.contains(article_id)
    }
}

/// Clears the in-flight marker even if the toggle future is dropped
struct PendingToggle<'a> {
    state: &'a Mutex<FeedState>,
    key: Option<(String, String)>,
}

impl PendingToggle<'_> {
    fn release(mut self, state: &mut FeedState) {
        if let Some(key) = self.key.take() {
            state.pending_toggles.remove(&key);
        }
    }
}

impl Drop for PendingToggle<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pending_toggles
                .remove(&key);
        }
    }
}
