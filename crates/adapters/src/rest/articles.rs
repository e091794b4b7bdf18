//! `articles` table

use async_trait::async_trait;
use gazette_domain::{
    Article, ArticlePatch, ArticleQuery, ArticleStatus, ArticleStore, GatewayError, NewArticle,
};
use reqwest::Method;

use super::{PREFER, RETURN_REPRESENTATION, RestGateway, eq};

const TABLE: &str = "articles";

#[async_trait]
impl ArticleStore for RestGateway {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, GatewayError> {
        let mut params = vec![
            ("select", "*".to_string()),
            ("order", format!("created_at.{}", query.order.as_str())),
        ];
        if let Some(status) = query.status {
            params.push(("status", eq(status.as_str())));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        self.fetch(self.request(Method::GET, TABLE).query(&params))
            .await
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Article>, GatewayError> {
        let rows: Vec<Article> = self
            .fetch(self.request(Method::GET, TABLE).query(&[
                ("select", "*".to_string()),
                ("slug", eq(slug)),
                ("status", eq(ArticleStatus::Published.as_str())),
                ("limit", "1".to_string()),
            ]))
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<Article, GatewayError> {
        let rows: Vec<Article> = self
            .fetch(
                self.request(Method::POST, TABLE)
                    .header(PREFER, RETURN_REPRESENTATION)
                    .json(article),
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::Decode("Insert returned no row".to_string()))
    }

    async fn update_article(
        &self,
        article_id: &str,
        patch: &ArticlePatch,
    ) -> Result<Article, GatewayError> {
        let rows: Vec<Article> = self
            .fetch(
                self.request(Method::PATCH, TABLE)
                    .query(&[("id", eq(article_id))])
                    .header(PREFER, RETURN_REPRESENTATION)
                    .json(patch),
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::NotFound(format!("article {}", article_id)))
    }

    async fn delete_article(&self, article_id: &str) -> Result<(), GatewayError> {
        self.execute(
            self.request(Method::DELETE, TABLE)
                .query(&[("id", eq(article_id))]),
        )
        .await
    }
}
