use sqlx::{PgConnection, Postgres, QueryBuilder};

use super::fetch_page;
use crate::database::{ErrorExt, Result};
use crate::model::notice::{InsertNotice, NoticeFilter};
use crate::model::{MemberId, Notice, PageRequest, Paginated, Sort};

impl Notice {
    #[tracing::instrument(skip_all, name = "db.notices.list")]
    pub async fn list(
        conn: &mut PgConnection,
        filter: &NoticeFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Self>> {
        let push_filter = |qb: &mut QueryBuilder<'_, Postgres>| {
            if let Some(category) = filter.category {
                qb.push(" AND category = ").push_bind(category);
            }
            if let Some(status) = filter.status {
                qb.push(" AND status = ").push_bind(status);
            }
            if let Some(topic) = filter.topic {
                qb.push(" AND topic = ").push_bind(topic);
            }
        };
        fetch_page(conn, "notices", push_filter, page, &[Sort::Created]).await
    }
}

impl InsertNotice {
    #[tracing::instrument(skip_all, name = "db.notices.insert")]
    pub async fn insert(&self, conn: &mut PgConnection, author: MemberId) -> Result<Notice> {
        sqlx::query_as::<_, Notice>(
            r"INSERT INTO notices (member_id, category, status, topic, title, content)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *",
        )
        .bind(author)
        .bind(self.category)
        .bind(self.status)
        .bind(self.topic)
        .bind(&self.title)
        .bind(&self.content)
        .fetch_one(conn)
        .await
        .into_db_error()
    }
}
