//! Fake gateway and fixtures shared by use case tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use time::{Duration, OffsetDateTime};
use tokio::sync::Notify;

use crate::model::{
    Article, ArticlePatch, ArticleQuery, ArticleStatus, Comment, Favorite, FavoriteArticleRow,
    GenerationLogEntry, NewArticle, NewComment, Role, SortOrder, User,
};
use crate::ports::{
    ArticleStore, CommentStore, FavoriteStore, GatewayError, GenerationLog,
};
use crate::session::Session;

pub(crate) fn at(secs: i64) -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH + Duration::seconds(secs)
}

pub(crate) fn article(id: &str, status: ArticleStatus, created_secs: i64) -> Article {
    Article {
        id: id.to_string(),
        title: format!("Article {}", id),
        content: format!("# Article {}\nCorps de l'article.", id),
        created_at: at(created_secs),
        slug: format!("article-{}", id),
        image_url: None,
        status,
    }
}

pub(crate) fn comment(id: &str, article_id: &str, created_secs: i64) -> Comment {
    Comment {
        id: id.to_string(),
        article_id: article_id.to_string(),
        user_id: "u1".to_string(),
        content: format!("Commentaire {}", id),
        created_at: at(created_secs),
    }
}

pub(crate) fn session(user_id: &str, role: Role) -> Session {
    Session::signed_in(User {
        id: user_id.to_string(),
        email: format!("{}@example.fr", user_id),
        role,
    })
}

pub(crate) fn reader() -> Session {
    session("u1", Role::Reader)
}

pub(crate) fn admin() -> Session {
    session("admin", Role::Admin)
}

/// In-process gateway with failure injection and read/write gates
#[derive(Default)]
pub(crate) struct FakeGateway {
    pub articles: Mutex<Vec<Article>>,
    pub comments: Mutex<Vec<Comment>>,
    pub favorites: Mutex<Vec<Favorite>>,
    pub log: Mutex<Vec<GenerationLogEntry>>,
    /// Every mutating call, in order (e.g. "delete_comments:a1")
    pub calls: Mutex<Vec<String>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    /// Fail only generation log writes
    pub fail_log_writes: AtomicBool,
    pub favorite_writes: AtomicUsize,
    read_gate: Mutex<Option<Arc<Notify>>>,
    write_gate: Mutex<Option<Arc<Notify>>>,
    next_id: AtomicUsize,
}

impl FakeGateway {
    pub fn with_articles(articles: Vec<Article>) -> Self {
        let gateway = Self::default();
        *gateway.articles.lock().unwrap() = articles;
        gateway
    }

    /// The next read snapshots its data, then waits for `gate`
    pub fn hold_next_read(&self, gate: Arc<Notify>) {
        *self.read_gate.lock().unwrap() = Some(gate);
    }

    /// The next write waits for `gate` before applying
    pub fn hold_next_write(&self, gate: Arc<Notify>) {
        *self.write_gate.lock().unwrap() = Some(gate);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn read_checkpoint(&self) -> Result<(), GatewayError> {
        let gate = self.read_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(GatewayError::Network("connection refused".to_string()));
        }
        Ok(())
    }

    async fn write_checkpoint(&self, call: String) -> Result<(), GatewayError> {
        let gate = self.write_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GatewayError::Api("write rejected".to_string()));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn next_time(&self) -> OffsetDateTime {
        at(10_000 + self.next_id.load(Ordering::SeqCst) as i64)
    }
}

#[async_trait]
impl ArticleStore for FakeGateway {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, GatewayError> {
        let mut rows: Vec<Article> = self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| query.status.is_none_or(|s| a.status == s))
            .cloned()
            .collect();
        self.read_checkpoint().await?;

        rows.sort_by_key(|a| a.created_at);
        if query.order == SortOrder::Descending {
            rows.reverse();
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Article>, GatewayError> {
        let found = self
            .articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.slug == slug && a.is_published())
            .cloned();
        self.read_checkpoint().await?;
        Ok(found)
    }

    async fn insert_article(&self, new: &NewArticle) -> Result<Article, GatewayError> {
        self.write_checkpoint(format!("insert_article:{}", new.slug))
            .await?;
        let article = Article {
            id: self.next_id("a"),
            title: new.title.clone(),
            content: new.content.clone(),
            created_at: self.next_time(),
            slug: new.slug.clone(),
            image_url: new.image_url.clone(),
            status: new.status,
        };
        self.articles.lock().unwrap().push(article.clone());
        Ok(article)
    }

    async fn update_article(
        &self,
        article_id: &str,
        patch: &ArticlePatch,
    ) -> Result<Article, GatewayError> {
        self.write_checkpoint(format!("update_article:{}", article_id))
            .await?;
        let mut articles = self.articles.lock().unwrap();
        let article = articles
            .iter_mut()
            .find(|a| a.id == article_id)
            .ok_or_else(|| GatewayError::NotFound(article_id.to_string()))?;
        patch.apply_to(article);
        Ok(article.clone())
    }

    async fn delete_article(&self, article_id: &str) -> Result<(), GatewayError> {
        self.write_checkpoint(format!("delete_article:{}", article_id))
            .await?;
        if self
            .comments
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.article_id == article_id)
        {
            return Err(GatewayError::Conflict(format!(
                "article {} still has comments",
                article_id
            )));
        }
        self.articles.lock().unwrap().retain(|a| a.id != article_id);
        self.favorites
            .lock()
            .unwrap()
            .retain(|f| f.article_id != article_id);
        Ok(())
    }
}

#[async_trait]
impl CommentStore for FakeGateway {
    async fn list_comments(&self, article_id: &str) -> Result<Vec<Comment>, GatewayError> {
        let mut rows: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect();
        self.read_checkpoint().await?;
        rows.sort_by_key(|c| c.created_at);
        Ok(rows)
    }

    async fn insert_comment(&self, new: &NewComment) -> Result<Comment, GatewayError> {
        self.write_checkpoint(format!("insert_comment:{}", new.article_id))
            .await?;
        let comment = Comment {
            id: self.next_id("c"),
            article_id: new.article_id.clone(),
            user_id: new.user_id.clone(),
            content: new.content.clone(),
            created_at: self.next_time(),
        };
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn delete_comments_for_article(&self, article_id: &str) -> Result<u64, GatewayError> {
        self.write_checkpoint(format!("delete_comments:{}", article_id))
            .await?;
        let mut comments = self.comments.lock().unwrap();
        let before = comments.len();
        comments.retain(|c| c.article_id != article_id);
        Ok((before - comments.len()) as u64)
    }
}

#[async_trait]
impl FavoriteStore for FakeGateway {
    async fn list_favorite_ids(&self, user_id: &str) -> Result<Vec<String>, GatewayError> {
        let ids = self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.article_id.clone())
            .collect();
        self.read_checkpoint().await?;
        Ok(ids)
    }

    async fn list_favorite_articles(
        &self,
        user_id: &str,
    ) -> Result<Vec<FavoriteArticleRow>, GatewayError> {
        let articles = self.articles.lock().unwrap().clone();
        let rows = self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| FavoriteArticleRow {
                article_id: f.article_id.clone(),
                article: articles.iter().find(|a| a.id == f.article_id).cloned(),
            })
            .collect();
        self.read_checkpoint().await?;
        Ok(rows)
    }

    async fn is_favorite(&self, favorite: &Favorite) -> Result<bool, GatewayError> {
        let found = self.favorites.lock().unwrap().contains(favorite);
        self.read_checkpoint().await?;
        Ok(found)
    }

    async fn insert_favorite(&self, favorite: &Favorite) -> Result<(), GatewayError> {
        self.favorite_writes.fetch_add(1, Ordering::SeqCst);
        self.write_checkpoint(format!("insert_favorite:{}", favorite.article_id))
            .await?;
        let mut favorites = self.favorites.lock().unwrap();
        if favorites.contains(favorite) {
            return Err(GatewayError::Conflict("duplicate favorite".to_string()));
        }
        favorites.push(favorite.clone());
        Ok(())
    }

    async fn delete_favorite(&self, favorite: &Favorite) -> Result<(), GatewayError> {
        self.favorite_writes.fetch_add(1, Ordering::SeqCst);
        self.write_checkpoint(format!("delete_favorite:{}", favorite.article_id))
            .await?;
        self.favorites.lock().unwrap().retain(|f| f != favorite);
        Ok(())
    }
}

#[async_trait]
impl GenerationLog for FakeGateway {
    async fn record_generation(&self, entry: &GenerationLogEntry) -> Result<(), GatewayError> {
        if self.fail_log_writes.load(Ordering::SeqCst) {
            return Err(GatewayError::Api("log table unavailable".to_string()));
        }
        self.write_checkpoint("record_generation".to_string())
            .await?;
        self.log.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn latest_generation(&self) -> Result<Option<GenerationLogEntry>, GatewayError> {
        let latest = self
            .log
            .lock()
            .unwrap()
            .iter()
            .max_by_key(|e| e.generated_at)
            .cloned();
        self.read_checkpoint().await?;
        Ok(latest)
    }
}
