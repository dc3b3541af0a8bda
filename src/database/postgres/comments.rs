use sqlx::{PgConnection, Postgres, QueryBuilder};

use super::fetch_page;
use crate::database::{ErrorExt, Result};
use crate::model::comment::{InsertComment, UpdateComment};
use crate::model::{Comment, CommentId, MemberId, PageRequest, Paginated, Sort, Target};

impl Comment {
    #[tracing::instrument(skip_all, name = "db.comments.list")]
    pub async fn list(
        conn: &mut PgConnection,
        target: Target,
        page: &PageRequest,
    ) -> Result<Paginated<Self>> {
        let push_filter = |qb: &mut QueryBuilder<'_, Postgres>| {
            qb.push(" AND status = 'ACTIVE' AND target_group = ")
                .push_bind(target.group)
                .push(" AND ref_id = ")
                .push_bind(target.id);
        };
        fetch_page(conn, "comments", push_filter, page, &[Sort::Created, Sort::Updated]).await
    }

    #[tracing::instrument(skip_all, name = "db.comments.remove")]
    pub async fn remove(conn: &mut PgConnection, id: CommentId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("DELETE FROM comments WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }
}

impl InsertComment {
    #[tracing::instrument(skip_all, name = "db.comments.insert")]
    pub async fn insert(&self, conn: &mut PgConnection, author: MemberId) -> Result<Comment> {
        sqlx::query_as::<_, Comment>(
            r"INSERT INTO comments (member_id, target_group, ref_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *",
        )
        .bind(author)
        .bind(self.group)
        .bind(self.ref_id)
        .bind(&self.content)
        .fetch_one(conn)
        .await
        .into_db_error()
    }
}

impl UpdateComment {
    #[tracing::instrument(skip_all, name = "db.comments.update")]
    pub async fn update(
        &self,
        conn: &mut PgConnection,
        id: CommentId,
        author: MemberId,
    ) -> Result<Option<Comment>> {
        sqlx::query_as::<_, Comment>(
            r"UPDATE comments
            SET content = COALESCE($3, content),
                status = COALESCE($4, status),
                updated = timezone('utc', now())
            WHERE id = $1 AND member_id = $2 AND status = 'ACTIVE'
            RETURNING *",
        )
        .bind(id)
        .bind(author)
        .bind(&self.content)
        .bind(self.status)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}
