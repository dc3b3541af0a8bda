use sqlx::{PgConnection, Postgres, QueryBuilder};

use super::fetch_page;
use crate::database::{ErrorExt, Result};
use crate::model::article::{ArticleFilter, ArticleStatus, InsertArticle, UpdateArticle};
use crate::model::{Article, ArticleId, ArticleStat, MemberId, PageRequest, Paginated, Sort};

impl Article {
    const SORTABLE: &'static [Sort] = &[Sort::Created, Sort::Updated, Sort::Views, Sort::Likes];

    #[tracing::instrument(skip_all, name = "db.articles.find")]
    pub async fn find(conn: &mut PgConnection, id: ArticleId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.articles.list")]
    pub async fn list(
        conn: &mut PgConnection,
        filter: &ArticleFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Self>> {
        let push_filter = |qb: &mut QueryBuilder<'_, Postgres>| {
            qb.push(" AND status = ")
                .push_bind(filter.status.unwrap_or(ArticleStatus::Active));
            if let Some(member_id) = filter.member_id {
                qb.push(" AND member_id = ").push_bind(member_id);
            }
            if let Some(category) = filter.category {
                qb.push(" AND category = ").push_bind(category);
            }
            if let Some(text) = &filter.text {
                qb.push(" AND title ILIKE ").push_bind(format!("%{text}%"));
            }
        };
        fetch_page(conn, "articles", push_filter, page, Self::SORTABLE).await
    }

    #[tracing::instrument(skip_all, name = "db.articles.adjust_stat")]
    pub async fn adjust_stat(
        conn: &mut PgConnection,
        id: ArticleId,
        stat: ArticleStat,
        delta: i64,
    ) -> Result<Option<Self>> {
        let column = stat.column();
        let sql =
            format!("UPDATE articles SET {column} = {column} + $1 WHERE id = $2 RETURNING *");
        sqlx::query_as::<_, Self>(&sql)
            .bind(delta)
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.articles.remove")]
    pub async fn remove(conn: &mut PgConnection, id: ArticleId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "DELETE FROM articles WHERE id = $1 AND status = 'DELETE' RETURNING *",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}

impl InsertArticle {
    #[tracing::instrument(skip_all, name = "db.articles.insert")]
    pub async fn insert(&self, conn: &mut PgConnection, owner: MemberId) -> Result<Article> {
        sqlx::query_as::<_, Article>(
            r"INSERT INTO articles (member_id, category, title, content, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *",
        )
        .bind(owner)
        .bind(self.category)
        .bind(&self.title)
        .bind(&self.content)
        .bind(&self.image)
        .fetch_one(conn)
        .await
        .into_db_error()
    }
}

impl UpdateArticle {
    #[tracing::instrument(skip_all, name = "db.articles.update")]
    pub async fn update(
        &self,
        conn: &mut PgConnection,
        id: ArticleId,
        owner: Option<MemberId>,
    ) -> Result<Option<Article>> {
        sqlx::query_as::<_, Article>(
            r"UPDATE articles
            SET status = COALESCE($3, status),
                title = COALESCE($4, title),
                content = COALESCE($5, content),
                image = COALESCE($6, image),
                updated = timezone('utc', now())
            WHERE id = $1
                AND status = 'ACTIVE'
                AND ($2::BIGINT IS NULL OR member_id = $2)
            RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(self.status)
        .bind(&self.title)
        .bind(&self.content)
        .bind(&self.image)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}
