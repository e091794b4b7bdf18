//! Reading list use case - the signed-in user's favorite articles

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::model::{Article, Favorite, FavoriteArticleRow, LoadOutcome};
use crate::ports::Gateway;
use crate::session::Session;
use crate::usecases::feed::FeedError;

/// The dashboard listing of favorited articles
pub struct ReadingList<G>
where
    G: Gateway + ?Sized,
{
    gateway: Arc<G>,
    entries: Mutex<Vec<Article>>,
}

impl<G> ReadingList<G>
where
    G: Gateway + ?Sized,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            entries: Mutex::new(Vec::new()),
        }
    }

    fn entries_mut(&self) -> MutexGuard<'_, Vec<Article>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the user's favorites with their articles
    pub async fn load(&self, session: &Session) -> Result<LoadOutcome, FeedError> {
        let Some(user_id) = session.user_id() else {
            return Ok(LoadOutcome::Skipped);
        };

        let rows = match self.gateway.list_favorite_articles(user_id).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Failed to load reading list");
                return Err(e.into());
            }
        };

        let articles = resolve_rows(rows);
        let count = articles.len();
        *self.entries_mut() = articles;
        Ok(LoadOutcome::Applied(count))
    }

    /// Remove an article from the user's favorites.
    ///
    /// Returns `false` when there is no signed-in user.
    pub async fn remove(&self, session: &Session, article_id: &str) -> Result<bool, FeedError> {
        let Some(user_id) = session.user_id() else {
            return Ok(false);
        };

        if let Err(e) = self
            .gateway
            .delete_favorite(&Favorite::new(user_id, article_id))
            .await
        {
            tracing::error!(article_id = %article_id, error = %e, "Failed to remove favorite");
            return Err(e.into());
        }

        self.entries_mut().retain(|a| a.id != article_id);
        Ok(true)
    }

    pub fn entries(&self) -> Vec<Article> {
        self.entries_mut().clone()
    }
}

/// Keep join rows whose article is present
fn resolve_rows(rows: Vec<FavoriteArticleRow>) -> Vec<Article> {
    rows.into_iter()
        .filter_map(|row| {
            if row.article.is_none() {
                tracing::debug!(article_id = %row.article_id, "Favorite without article, skipping");
            }
            row.article
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArticleStatus;
    use crate::testing::{FakeGateway, article, reader};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_load_filters_missing_articles() {
        let gateway = Arc::new(FakeGateway::with_articles(vec![article(
            "a1",
            ArticleStatus::Published,
            100,
        )]));
        *gateway.favorites.lock().unwrap() =
            vec![Favorite::new("u1", "a1"), Favorite::new("u1", "gone")];
        let list = ReadingList::new(Arc::clone(&gateway));

        let outcome = list.load(&reader()).await.unwrap();

        assert_eq!(outcome, LoadOutcome::Applied(1));
        assert_eq!(list.entries()[0].id, "a1");
    }

    #[tokio::test]
    async fn test_remove_drops_entry() {
        let gateway = Arc::new(FakeGateway::with_articles(vec![
            article("a1", ArticleStatus::Published, 100),
            article("a2", ArticleStatus::Published, 200),
        ]));
        *gateway.favorites.lock().unwrap() =
            vec![Favorite::new("u1", "a1"), Favorite::new("u1", "a2")];
        let list = ReadingList::new(Arc::clone(&gateway));
        let session = reader();
        list.load(&session).await.unwrap();

        assert!(list.remove(&session, "a1").await.unwrap());

        let ids: Vec<_> = list.entries().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["a2"]);
        assert_eq!(gateway.favorites.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_remove_keeps_entry() {
        let gateway = Arc::new(FakeGateway::with_articles(vec![article(
            "a1",
            ArticleStatus::Published,
            100,
        )]));
        *gateway.favorites.lock().unwrap() = vec![Favorite::new("u1", "a1")];
        let list = ReadingList::new(Arc::clone(&gateway));
        let session = reader();
        list.load(&session).await.unwrap();

        gateway.fail_writes.store(true, Ordering::SeqCst);
        assert!(list.remove(&session, "a1").await.is_err());
        assert_eq!(list.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_anonymous_load_is_skipped() {
        let list = ReadingList::new(Arc::new(FakeGateway::default()));
        let outcome = list.load(&Session::anonymous()).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Skipped);
    }
}
