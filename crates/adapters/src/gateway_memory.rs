//! In-memory gateway for testing and offline mode

use async_trait::async_trait;
use gazette_domain::{
    Article, ArticlePatch, ArticleQuery, ArticleStore, Clock, Comment, CommentStore, Favorite,
    FavoriteArticleRow, FavoriteStore, GatewayError, GenerationLog, GenerationLogEntry,
    NewArticle, NewComment, SortOrder, SystemClock,
};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    articles: Vec<Article>,
    comments: Vec<Comment>,
    favorites: Vec<Favorite>,
    generation_log: Vec<GenerationLogEntry>,
    last_created: Option<OffsetDateTime>,
}

impl Tables {
    /// Creation timestamps are strictly increasing so insertion order survives sorting
    fn next_created_at(&mut self, now: OffsetDateTime) -> OffsetDateTime {
        let created = match self.last_created {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created = Some(created);
        created
    }

    fn has_article(&self, article_id: &str) -> bool {
        self.articles.iter().any(|a| a.id == article_id)
    }
}

/// In-memory gateway with the same constraints as the SQL schema
pub struct InMemoryGateway {
    tables: RwLock<Tables>,
    clock: Arc<dyn Clock>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            clock,
        }
    }

    /// Insert fully-formed articles, keeping their ids and timestamps
    pub fn seed_articles(&self, articles: Vec<Article>) -> Result<(), GatewayError> {
        self.write()?.articles.extend(articles);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, GatewayError> {
        self.tables
            .read()
            .map_err(|e| GatewayError::Database(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, GatewayError> {
        self.tables
            .write()
            .map_err(|e| GatewayError::Database(e.to_string()))
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleStore for InMemoryGateway {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, GatewayError> {
        let tables = self.read()?;
        let mut articles: Vec<Article> = tables
            .articles
            .iter()
            .filter(|a| query.status.is_none_or(|s| a.status == s))
            .cloned()
            .collect();

        articles.sort_by_key(|a| a.created_at);
        if query.order == SortOrder::Descending {
            articles.reverse();
        }
        if let Some(limit) = query.limit {
            articles.truncate(limit);
        }
        Ok(articles)
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Article>, GatewayError> {
        let tables = self.read()?;
        Ok(tables
            .articles
            .iter()
            .find(|a| a.slug == slug && a.is_published())
            .cloned())
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<Article, GatewayError> {
        let now = self.clock.now();
        let mut tables = self.write()?;
        let created_at = tables.next_created_at(now);

        let article = Article {
            id: Uuid::new_v4().to_string(),
            title: article.title.clone(),
            content: article.content.clone(),
            created_at,
            slug: article.slug.clone(),
            image_url: article.image_url.clone(),
            status: article.status,
        };
        tables.articles.push(article.clone());
        Ok(article)
    }

    async fn update_article(
        &self,
        article_id: &str,
        patch: &ArticlePatch,
    ) -> Result<Article, GatewayError> {
        let mut tables = self.write()?;
        let article = tables
            .articles
            .iter_mut()
            .find(|a| a.id == article_id)
            .ok_or_else(|| GatewayError::NotFound(format!("article {}", article_id)))?;

        patch.apply_to(article);
        Ok(article.clone())
    }

    async fn delete_article(&self, article_id: &str) -> Result<(), GatewayError> {
        let mut tables = self.write()?;
        if tables.comments.iter().any(|c| c.article_id == article_id) {
            return Err(GatewayError::Conflict(format!(
                "article {} still has comments",
                article_id
            )));
        }

        tables.articles.retain(|a| a.id != article_id);
        tables.favorites.retain(|f| f.article_id != article_id);
        Ok(())
    }
}

#[async_trait]
impl CommentStore for InMemoryGateway {
    async fn list_comments(&self, article_id: &str) -> Result<Vec<Comment>, GatewayError> {
        let tables = self.read()?;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment, GatewayError> {
        let now = self.clock.now();
        let mut tables = self.write()?;
        if !tables.has_article(&comment.article_id) {
            return Err(GatewayError::NotFound(format!(
                "article {}",
                comment.article_id
            )));
        }

        let created_at = tables.next_created_at(now);
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            article_id: comment.article_id.clone(),
            user_id: comment.user_id.clone(),
            content: comment.content.clone(),
            created_at,
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn delete_comments_for_article(&self, article_id: &str) -> Result<u64, GatewayError> {
        let mut tables = self.write()?;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.article_id != article_id);
        Ok((before - tables.comments.len()) as u64)
    }
}

#[async_trait]
impl FavoriteStore for InMemoryGateway {
    async fn list_favorite_ids(&self, user_id: &str) -> Result<Vec<String>, GatewayError> {
        let tables = self.read()?;
        Ok(tables
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.article_id.clone())
            .collect())
    }

    async fn list_favorite_articles(
        &self,
        user_id: &str,
    ) -> Result<Vec<FavoriteArticleRow>, GatewayError> {
        let tables = self.read()?;
        Ok(tables
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| FavoriteArticleRow {
                article_id: f.article_id.clone(),
                article: tables
                    .articles
                    .iter()
                    .find(|a| a.id == f.article_id)
                    .cloned(),
            })
            .collect())
    }

    async fn is_favorite(&self, favorite: &Favorite) -> Result<bool, GatewayError> {
        Ok(self.read()?.favorites.contains(favorite))
    }

    async fn insert_favorite(&self, favorite: &Favorite) -> Result<(), GatewayError> {
        let mut tables = self.write()?;
        if !tables.has_article(&favorite.article_id) {
            return Err(GatewayError::NotFound(format!(
                "article {}",
                favorite.article_id
            )));
        }
        if tables.favorites.contains(favorite) {
            return Err(GatewayError::Conflict(format!(
                "favorite ({}, {}) already exists",
                favorite.user_id, favorite.article_id
            )));
        }

        tables.favorites.push(favorite.clone());
        Ok(())
    }

    async fn delete_favorite(&self, favorite: &Favorite) -> Result<(), GatewayError> {
        self.write()?.favorites.retain(|f| f != favorite);
        Ok(())
    }
}

#[async_trait]
impl GenerationLog for InMemoryGateway {
    async fn record_generation(&self, entry: &GenerationLogEntry) -> Result<(), GatewayError> {
        self.write()?.generation_log.push(entry.clone());
        Ok(())
    }

    async fn latest_generation(&self) -> Result<Option<GenerationLogEntry>, GatewayError> {
        Ok(self
            .read()?
            .generation_log
            .iter()
            .max_by_key(|e| e.generated_at)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazette_domain::ArticleStatus;

    fn new_article(slug: &str, status: ArticleStatus) -> NewArticle {
        NewArticle {
            title: slug.to_string(),
            content: "Corps".to_string(),
            slug: slug.to_string(),
            image_url: None,
            status,
            author_id: None,
        }
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let gateway = InMemoryGateway::new();
        gateway
            .insert_article(&new_article("first", ArticleStatus::Published))
            .await
            .unwrap();
        gateway
            .insert_article(&new_article("draft", ArticleStatus::Draft))
            .await
            .unwrap();
        gateway
            .insert_article(&new_article("second", ArticleStatus::Published))
            .await
            .unwrap();

        let published = gateway
            .list_articles(&ArticleQuery::published())
            .await
            .unwrap();
        let slugs: Vec<_> = published.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["second", "first"]);

        let oldest = gateway
            .list_articles(&ArticleQuery::recent(1).with_order(SortOrder::Ascending))
            .await
            .unwrap();
        assert_eq!(oldest[0].slug, "first");
    }

    #[tokio::test]
    async fn test_favorite_pair_is_unique() {
        let gateway = InMemoryGateway::new();
        let article = gateway
            .insert_article(&new_article("a", ArticleStatus::Published))
            .await
            .unwrap();
        let favorite = Favorite::new("u1", article.id.as_str());

        gateway.insert_favorite(&favorite).await.unwrap();
        let duplicate = gateway.insert_favorite(&favorite).await;

        assert!(matches!(duplicate, Err(GatewayError::Conflict(_))));
        assert_eq!(gateway.list_favorite_ids("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_requires_comments_gone_and_cascades_favorites() {
        let gateway = InMemoryGateway::new();
        let article = gateway
            .insert_article(&new_article("a", ArticleStatus::Published))
            .await
            .unwrap();
        gateway
            .insert_comment(&NewComment {
                article_id: article.id.clone(),
                user_id: "u1".to_string(),
                content: "Bravo".to_string(),
            })
            .await
            .unwrap();
        gateway
            .insert_favorite(&Favorite::new("u1", article.id.as_str()))
            .await
            .unwrap();

        assert!(matches!(
            gateway.delete_article(&article.id).await,
            Err(GatewayError::Conflict(_))
        ));

        assert_eq!(
            gateway
                .delete_comments_for_article(&article.id)
                .await
                .unwrap(),
            1
        );
        gateway.delete_article(&article.id).await.unwrap();

        assert!(gateway.list_favorite_ids("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_on_missing_article_is_rejected() {
        let gateway = InMemoryGateway::new();
        let result = gateway
            .insert_comment(&NewComment {
                article_id: "missing".to_string(),
                user_id: "u1".to_string(),
                content: "?".to_string(),
            })
            .await;
        assert!(matches!(result, Err(GatewayError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_latest_generation() {
        let gateway = InMemoryGateway::new();
        assert!(gateway.latest_generation().await.unwrap().is_none());

        let older = OffsetDateTime::UNIX_EPOCH + Duration::days(1);
        let newer = OffsetDateTime::UNIX_EPOCH + Duration::days(2);
        for (generated_at, articles_count) in [(newer, 2), (older, 1)] {
            gateway
                .record_generation(&GenerationLogEntry {
                    generated_at,
                    articles_count,
                })
                .await
                .unwrap();
        }

        let latest = gateway.latest_generation().await.unwrap().unwrap();
        assert_eq!(latest.generated_at, newer);
        assert_eq!(latest.articles_count, 2);
    }
}
