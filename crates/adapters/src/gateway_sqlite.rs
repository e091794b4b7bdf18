//! SQLite gateway implementation

use async_trait::async_trait;
use gazette_domain::{
    Article, ArticlePatch, ArticleQuery, ArticleStatus, ArticleStore, Comment, CommentStore,
    Favorite, FavoriteArticleRow, FavoriteStore, GatewayError, GenerationLog, GenerationLogEntry,
    NewArticle, NewComment,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

type ArticleRow = (
    String,
    String,
    String,
    i64,
    String,
    Option<String>,
    String,
);

const ARTICLE_COLUMNS: &str = "id, title, content, created_at, slug, image_url, status";

/// SQLite-backed gateway
pub struct SqliteGateway {
    pool: SqlitePool,
}

impl SqliteGateway {
    /// Open the database at `db_path`, creating it and its schema if needed
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GatewayError::Database(format!("Failed to create directory: {}", e))
            })?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .map_err(db_error)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(db_error)?;

        let gateway = Self { pool };
        gateway.run_migrations().await?;

        Ok(gateway)
    }

    /// Create an in-memory database (for testing)
    pub async fn in_memory() -> Result<Self, GatewayError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(db_error)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(db_error)?;

        let gateway = Self { pool };
        gateway.run_migrations().await?;

        Ok(gateway)
    }

    async fn run_migrations(&self) -> Result<(), GatewayError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                slug TEXT NOT NULL,
                image_url TEXT,
                status TEXT NOT NULL DEFAULT 'draft',
                user_id TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        // Comments are removed explicitly before their article
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                id TEXT PRIMARY KEY,
                article_id TEXT NOT NULL REFERENCES articles(id),
                user_id TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS favorites (
                user_id TEXT NOT NULL,
                article_id TEXT NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
                created_at INTEGER NOT NULL,
                UNIQUE(user_id, article_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS auto_generation_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                generated_at INTEGER NOT NULL,
                articles_count INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_articles_status_created
            ON articles(status, created_at)
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_comments_article
            ON comments(article_id, created_at)
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn fetch_article(&self, article_id: &str) -> Result<Option<Article>, GatewayError> {
        let row: Option<ArticleRow> = sqlx::query_as(&format!(
            "SELECT {} FROM articles WHERE id = ?",
            ARTICLE_COLUMNS
        ))
        .bind(article_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(article_from_row).transpose()
    }
}

fn db_error(e: sqlx::Error) -> GatewayError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return GatewayError::Conflict(db.message().to_string());
        }
        if db.is_foreign_key_violation() {
            return GatewayError::NotFound(db.message().to_string());
        }
    }
    GatewayError::Database(e.to_string())
}

fn to_nanos(at: OffsetDateTime) -> i64 {
    at.unix_timestamp_nanos() as i64
}

fn from_nanos(nanos: i64) -> Result<OffsetDateTime, GatewayError> {
    OffsetDateTime::from_unix_timestamp_nanos(nanos as i128)
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

fn parse_status(value: &str) -> Result<ArticleStatus, GatewayError> {
    ArticleStatus::parse(value)
        .ok_or_else(|| GatewayError::Decode(format!("Unknown article status: {}", value)))
}

fn article_from_row(row: ArticleRow) -> Result<Article, GatewayError> {
    let (id, title, content, created_at, slug, image_url, status) = row;
    Ok(Article {
        id,
        title,
        content,
        created_at: from_nanos(created_at)?,
        slug,
        image_url,
        status: parse_status(&status)?,
    })
}

#[async_trait]
impl ArticleStore for SqliteGateway {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, GatewayError> {
        let mut sql = format!("SELECT {} FROM articles", ARTICLE_COLUMNS);
        if query.status.is_some() {
            sql.push_str(" WHERE status = ?");
        }
        sql.push_str(&format!(
            " ORDER BY created_at {0}, rowid {0}",
            query.order.as_str().to_uppercase()
        ));
        if query.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut statement = sqlx::query_as::<_, ArticleRow>(&sql);
        if let Some(status) = query.status {
            statement = statement.bind(status.as_str());
        }
        if let Some(limit) = query.limit {
            statement = statement.bind(limit as i64);
        }

        let rows = statement.fetch_all(&self.pool).await.map_err(db_error)?;
        rows.into_iter().map(article_from_row).collect()
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Article>, GatewayError> {
        let row: Option<ArticleRow> = sqlx::query_as(&format!(
            "SELECT {} FROM articles WHERE slug = ? AND status = 'published' LIMIT 1",
            ARTICLE_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(article_from_row).transpose()
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<Article, GatewayError> {
        let id = Uuid::new_v4().to_string();
        let created_at = OffsetDateTime::now_utc();

        sqlx::query(
            r#"
            INSERT INTO articles (id, title, content, created_at, slug, image_url, status, user_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&article.title)
        .bind(&article.content)
        .bind(to_nanos(created_at))
        .bind(&article.slug)
        .bind(&article.image_url)
        .bind(article.status.as_str())
        .bind(&article.author_id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        self.fetch_article(&id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(format!("article {}", id)))
    }

    async fn update_article(
        &self,
        article_id: &str,
        patch: &ArticlePatch,
    ) -> Result<Article, GatewayError> {
        let result = sqlx::query(
            r#"
            UPDATE articles SET
                title = COALESCE(?, title),
                content = COALESCE(?, content),
                status = COALESCE(?, status),
                image_url = CASE WHEN ? THEN ? ELSE image_url END
            WHERE id = ?
            "#,
        )
        .bind(&patch.title)
        .bind(&patch.content)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.image_url.is_some())
        .bind(patch.image_url.clone().flatten())
        .bind(article_id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::NotFound(format!("article {}", article_id)));
        }

        self.fetch_article(article_id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(format!("article {}", article_id)))
    }

    async fn delete_article(&self, article_id: &str) -> Result<(), GatewayError> {
        sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(article_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match db_error(e) {
                // Only remaining comments can block an article delete
                GatewayError::NotFound(msg) => GatewayError::Conflict(msg),
                other => other,
            })?;

        Ok(())
    }
}

#[async_trait]
impl CommentStore for SqliteGateway {
    async fn list_comments(&self, article_id: &str) -> Result<Vec<Comment>, GatewayError> {
        let rows: Vec<(String, String, String, String, i64)> = sqlx::query_as(
            r#"
            SELECT id, article_id, user_id, content, created_at
            FROM comments
            WHERE article_id = ?
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter()
            .map(|(id, article_id, user_id, content, created_at)| {
                Ok(Comment {
                    id,
                    article_id,
                    user_id,
                    content,
                    created_at: from_nanos(created_at)?,
                })
            })
            .collect()
    }

    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment, GatewayError> {
        let id = Uuid::new_v4().to_string();
        let created_at = OffsetDateTime::now_utc();

        sqlx::query(
            r#"
            INSERT INTO comments (id, article_id, user_id, content, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&comment.article_id)
        .bind(&comment.user_id)
        .bind(&comment.content)
        .bind(to_nanos(created_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(Comment {
            id,
            article_id: comment.article_id.clone(),
            user_id: comment.user_id.clone(),
            content: comment.content.clone(),
            created_at: from_nanos(to_nanos(created_at))?,
        })
    }

    async fn delete_comments_for_article(&self, article_id: &str) -> Result<u64, GatewayError> {
        let result = sqlx::query("DELETE FROM comments WHERE article_id = ?")
            .bind(article_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl FavoriteStore for SqliteGateway {
    async fn list_favorite_ids(&self, user_id: &str) -> Result<Vec<String>, GatewayError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT article_id FROM favorites WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn list_favorite_articles(
        &self,
        user_id: &str,
    ) -> Result<Vec<FavoriteArticleRow>, GatewayError> {
        let rows: Vec<(
            String,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<i64>,
            Option<String>,
            Option<String>,
            Option<String>,
        )> = sqlx::query_as(
            r#"
            SELECT f.article_id, a.id, a.title, a.content, a.created_at, a.slug, a.image_url, a.status
            FROM favorites f
            LEFT JOIN articles a ON a.id = f.article_id
            WHERE f.user_id = ?
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter()
            .map(
                |(article_id, id, title, content, created_at, slug, image_url, status)| {
                    let article = match (id, title, content, created_at, slug, status) {
                        (Some(id), Some(title), Some(content), Some(created_at), Some(slug), Some(status)) => {
                            Some(article_from_row((
                                id, title, content, created_at, slug, image_url, status,
                            ))?)
                        }
                        _ => None,
                    };
                    Ok(FavoriteArticleRow {
                        article_id,
                        article,
                    })
                },
            )
            .collect()
    }

    async fn is_favorite(&self, favorite: &Favorite) -> Result<bool, GatewayError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM favorites WHERE user_id = ? AND article_id = ?",
        )
        .bind(&favorite.user_id)
        .bind(&favorite.article_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(count.0 > 0)
    }

    async fn insert_favorite(&self, favorite: &Favorite) -> Result<(), GatewayError> {
        sqlx::query("INSERT INTO favorites (user_id, article_id, created_at) VALUES (?, ?, ?)")
            .bind(&favorite.user_id)
            .bind(&favorite.article_id)
            .bind(to_nanos(OffsetDateTime::now_utc()))
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn delete_favorite(&self, favorite: &Favorite) -> Result<(), GatewayError> {
        sqlx::query("DELETE FROM favorites WHERE user_id = ? AND article_id = ?")
            .bind(&favorite.user_id)
            .bind(&favorite.article_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }
}

#[async_trait]
impl GenerationLog for SqliteGateway {
    async fn record_generation(&self, entry: &GenerationLogEntry) -> Result<(), GatewayError> {
        sqlx::query("INSERT INTO auto_generation_log (generated_at, articles_count) VALUES (?, ?)")
            .bind(to_nanos(entry.generated_at))
            .bind(entry.articles_count as i64)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn latest_generation(&self) -> Result<Option<GenerationLogEntry>, GatewayError> {
        let row: Option<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT generated_at, articles_count
            FROM auto_generation_log
            ORDER BY generated_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(|(generated_at, articles_count)| {
            Ok(GenerationLogEntry {
                generated_at: from_nanos(generated_at)?,
                articles_count: articles_count as u32,
            })
        })
        .transpose()
    }
}
