use sqlx::{PgConnection, Postgres, QueryBuilder};

use super::fetch_page;
use crate::database::{ErrorExt, Result};
use crate::model::{
    Follow, FollowSide, Like, MemberId, PageRequest, Paginated, Sort, Target, TargetGroup, View,
};

impl Like {
    #[tracing::instrument(skip_all, name = "db.likes.find")]
    pub async fn find(
        conn: &mut PgConnection,
        member: MemberId,
        target: Target,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM likes WHERE member_id = $1 AND target_group = $2 AND ref_id = $3",
        )
        .bind(member)
        .bind(target.group)
        .bind(target.id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    /// The unique index on `(member_id, target_group, ref_id)` turns a
    /// duplicate into a conflict.
    #[tracing::instrument(skip_all, name = "db.likes.insert")]
    pub async fn insert(conn: &mut PgConnection, member: MemberId, target: Target) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r"INSERT INTO likes (member_id, target_group, ref_id)
            VALUES ($1, $2, $3)
            RETURNING *",
        )
        .bind(member)
        .bind(target.group)
        .bind(target.id)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.likes.delete")]
    pub async fn delete(
        conn: &mut PgConnection,
        member: MemberId,
        target: Target,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r"DELETE FROM likes
            WHERE member_id = $1 AND target_group = $2 AND ref_id = $3
            RETURNING *",
        )
        .bind(member)
        .bind(target.group)
        .bind(target.id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.likes.list")]
    pub async fn list(
        conn: &mut PgConnection,
        member: MemberId,
        group: TargetGroup,
        page: &PageRequest,
    ) -> Result<Paginated<Self>> {
        let push_filter = |qb: &mut QueryBuilder<'_, Postgres>| {
            qb.push(" AND member_id = ")
                .push_bind(member)
                .push(" AND target_group = ")
                .push_bind(group);
        };
        fetch_page(conn, "likes", push_filter, page, &[Sort::Created]).await
    }
}

impl View {
    /// Returns `None` when the member has seen the target before.
    #[tracing::instrument(skip_all, name = "db.views.insert")]
    pub async fn insert(
        conn: &mut PgConnection,
        member: MemberId,
        target: Target,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r"INSERT INTO views (member_id, target_group, ref_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (member_id, target_group, ref_id) DO NOTHING
            RETURNING *",
        )
        .bind(member)
        .bind(target.group)
        .bind(target.id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.views.list")]
    pub async fn list(
        conn: &mut PgConnection,
        member: MemberId,
        group: TargetGroup,
        page: &PageRequest,
    ) -> Result<Paginated<Self>> {
        let push_filter = |qb: &mut QueryBuilder<'_, Postgres>| {
            qb.push(" AND member_id = ")
                .push_bind(member)
                .push(" AND target_group = ")
                .push_bind(group);
        };
        fetch_page(conn, "views", push_filter, page, &[Sort::Created]).await
    }
}

impl Follow {
    #[tracing::instrument(skip_all, name = "db.follows.insert")]
    pub async fn insert(
        conn: &mut PgConnection,
        follower: MemberId,
        following: MemberId,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r"INSERT INTO follows (follower_id, following_id)
            VALUES ($1, $2)
            RETURNING *",
        )
        .bind(follower)
        .bind(following)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.follows.delete")]
    pub async fn delete(
        conn: &mut PgConnection,
        follower: MemberId,
        following: MemberId,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "DELETE FROM follows WHERE follower_id = $1 AND following_id = $2 RETURNING *",
        )
        .bind(follower)
        .bind(following)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.follows.find")]
    pub async fn find(
        conn: &mut PgConnection,
        follower: MemberId,
        following: MemberId,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM follows WHERE follower_id = $1 AND following_id = $2",
        )
        .bind(follower)
        .bind(following)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.follows.list")]
    pub async fn list(
        conn: &mut PgConnection,
        side: FollowSide,
        member: MemberId,
        page: &PageRequest,
    ) -> Result<Paginated<Self>> {
        let column = match side {
            FollowSide::Followers => "following_id",
            FollowSide::Followings => "follower_id",
        };
        let push_filter = |qb: &mut QueryBuilder<'_, Postgres>| {
            qb.push(format_args!(" AND {column} = ")).push_bind(member);
        };
        fetch_page(conn, "follows", push_filter, page, &[Sort::Created]).await
    }

    #[tracing::instrument(skip_all, name = "db.follows.follower_ids")]
    pub async fn follower_ids(conn: &mut PgConnection, member: MemberId) -> Result<Vec<MemberId>> {
        sqlx::query_scalar::<_, MemberId>(
            "SELECT follower_id FROM follows WHERE following_id = $1 ORDER BY created, id",
        )
        .bind(member)
        .fetch_all(conn)
        .await
        .into_db_error()
    }
}
