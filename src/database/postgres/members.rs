use sqlx::PgConnection;

use super::fetch_page;
use crate::database::{ErrorExt, Result};
use crate::model::member::{InsertMember, MemberFilter, UpdateMember};
use crate::model::{Member, MemberId, MemberStat, PageRequest, Paginated, Sort};

impl Member {
    const SORTABLE: &'static [Sort] = &[
        Sort::Created,
        Sort::Updated,
        Sort::Views,
        Sort::Likes,
        Sort::Rank,
    ];

    #[tracing::instrument(skip_all, name = "db.members.find")]
    pub async fn find(conn: &mut PgConnection, id: MemberId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.members.list")]
    pub async fn list(
        conn: &mut PgConnection,
        filter: &MemberFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Self>> {
        let push_filter = |qb: &mut sqlx::QueryBuilder<'_, sqlx::Postgres>| {
            if let Some(kind) = filter.kind {
                qb.push(" AND kind = ").push_bind(kind);
            }
            if let Some(status) = filter.status {
                qb.push(" AND status = ").push_bind(status);
            }
            if let Some(text) = &filter.text {
                qb.push(" AND nick ILIKE ").push_bind(format!("%{text}%"));
            }
        };
        fetch_page(conn, "members", push_filter, page, Self::SORTABLE).await
    }

    /// Adds `delta` to a counter in a single statement.
    #[tracing::instrument(skip_all, name = "db.members.adjust_stat")]
    pub async fn adjust_stat(
        conn: &mut PgConnection,
        id: MemberId,
        stat: MemberStat,
        delta: i64,
    ) -> Result<Option<Self>> {
        let column = stat.column();
        let sql = format!("UPDATE members SET {column} = {column} + $1 WHERE id = $2 RETURNING *");
        sqlx::query_as::<_, Self>(&sql)
            .bind(delta)
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }
}

impl InsertMember {
    #[tracing::instrument(skip_all, name = "db.members.insert")]
    pub async fn insert(&self, conn: &mut PgConnection) -> Result<Member> {
        sqlx::query_as::<_, Member>(
            r"INSERT INTO members (nick, full_name, phone, kind, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *",
        )
        .bind(&self.nick)
        .bind(&self.full_name)
        .bind(&self.phone)
        .bind(self.kind)
        .bind(&self.description)
        .fetch_one(conn)
        .await
        .into_db_error()
    }
}

impl UpdateMember {
    #[tracing::instrument(skip_all, name = "db.members.update")]
    pub async fn update(
        &self,
        conn: &mut PgConnection,
        id: MemberId,
        only_active: bool,
    ) -> Result<Option<Member>> {
        sqlx::query_as::<_, Member>(
            r"UPDATE members
            SET nick = COALESCE($2, nick),
                full_name = COALESCE($3, full_name),
                phone = COALESCE($4, phone),
                description = COALESCE($5, description),
                kind = COALESCE($6, kind),
                status = COALESCE($7, status),
                updated = timezone('utc', now())
            WHERE id = $1 AND (NOT $8 OR status = 'ACTIVE')
            RETURNING *",
        )
        .bind(id)
        .bind(&self.nick)
        .bind(&self.full_name)
        .bind(&self.phone)
        .bind(&self.description)
        .bind(self.kind)
        .bind(self.status)
        .bind(only_active)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}
