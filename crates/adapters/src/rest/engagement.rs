//! `comments`, `favorites` and `auto_generation_log` tables

use async_trait::async_trait;
use gazette_domain::{
    Comment, CommentStore, Favorite, FavoriteArticleRow, FavoriteStore, GatewayError,
    GenerationLog, GenerationLogEntry, NewComment,
};
use reqwest::Method;
use serde::Deserialize;

use super::{PREFER, RETURN_MINIMAL, RETURN_REPRESENTATION, RestGateway, eq};

const COMMENTS: &str = "comments";
const FAVORITES: &str = "favorites";
const GENERATION_LOG: &str = "auto_generation_log";

#[derive(Deserialize)]
struct ArticleIdRow {
    article_id: String,
}

#[async_trait]
impl CommentStore for RestGateway {
    async fn list_comments(&self, article_id: &str) -> Result<Vec<Comment>, GatewayError> {
        self.fetch(self.request(Method::GET, COMMENTS).query(&[
            ("select", "*".to_string()),
            ("article_id", eq(article_id)),
            ("order", "created_at.asc".to_string()),
        ]))
        .await
    }

    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment, GatewayError> {
        let rows: Vec<Comment> = self
            .fetch(
                self.request(Method::POST, COMMENTS)
                    .header(PREFER, RETURN_REPRESENTATION)
                    .json(comment),
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::Decode("Insert returned no row".to_string()))
    }

    async fn delete_comments_for_article(&self, article_id: &str) -> Result<u64, GatewayError> {
        let deleted: Vec<serde_json::Value> = self
            .fetch(
                self.request(Method::DELETE, COMMENTS)
                    .query(&[("article_id", eq(article_id)), ("select", "id".to_string())])
                    .header(PREFER, RETURN_REPRESENTATION),
            )
            .await?;

        Ok(deleted.len() as u64)
    }
}

#[async_trait]
impl FavoriteStore for RestGateway {
    async fn list_favorite_ids(&self, user_id: &str) -> Result<Vec<String>, GatewayError> {
        let rows: Vec<ArticleIdRow> = self
            .fetch(self.request(Method::GET, FAVORITES).query(&[
                ("select", "article_id".to_string()),
                ("user_id", eq(user_id)),
            ]))
            .await?;

        Ok(rows.into_iter().map(|r| r.article_id).collect())
    }

    async fn list_favorite_articles(
        &self,
        user_id: &str,
    ) -> Result<Vec<FavoriteArticleRow>, GatewayError> {
        self.fetch(self.request(Method::GET, FAVORITES).query(&[
            (
                "select",
                "article_id,articles(id,title,content,created_at,slug,image_url,status)"
                    .to_string(),
            ),
            ("user_id", eq(user_id)),
        ]))
        .await
    }

    async fn is_favorite(&self, favorite: &Favorite) -> Result<bool, GatewayError> {
        let rows: Vec<ArticleIdRow> = self
            .fetch(self.request(Method::GET, FAVORITES).query(&[
                ("select", "article_id".to_string()),
                ("user_id", eq(&favorite.user_id)),
                ("article_id", eq(&favorite.article_id)),
                ("limit", "1".to_string()),
            ]))
            .await?;

        Ok(!rows.is_empty())
    }

    async fn insert_favorite(&self, favorite: &Favorite) -> Result<(), GatewayError> {
        self.execute(
            self.request(Method::POST, FAVORITES)
                .header(PREFER, RETURN_MINIMAL)
                .json(favorite),
        )
        .await
    }

    async fn delete_favorite(&self, favorite: &Favorite) -> Result<(), GatewayError> {
        self.execute(self.request(Method::DELETE, FAVORITES).query(&[
            ("user_id", eq(&favorite.user_id)),
            ("article_id", eq(&favorite.article_id)),
        ]))
        .await
    }
}

#[async_trait]
impl GenerationLog for RestGateway {
    async fn record_generation(&self, entry: &GenerationLogEntry) -> Result<(), GatewayError> {
        self.execute(
            self.request(Method::POST, GENERATION_LOG)
                .header(PREFER, RETURN_MINIMAL)
                .json(entry),
        )
        .await
    }

    async fn latest_generation(&self) -> Result<Option<GenerationLogEntry>, GatewayError> {
        let rows: Vec<GenerationLogEntry> = self
            .fetch(self.request(Method::GET, GENERATION_LOG).query(&[
                ("select", "generated_at,articles_count".to_string()),
                ("order", "generated_at.desc".to_string()),
                ("limit", "1".to_string()),
            ]))
            .await?;

        Ok(rows.into_iter().next())
    }
}
