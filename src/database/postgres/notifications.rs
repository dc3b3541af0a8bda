use sqlx::PgConnection;

use crate::database::{ErrorExt, Result};
use crate::model::{
    InsertNotification, MemberId, Notification, NotificationId, NotificationStatus,
};

impl Notification {
    #[tracing::instrument(skip_all, name = "db.notifications.list")]
    pub async fn list(
        conn: &mut PgConnection,
        receiver: MemberId,
        status: Option<NotificationStatus>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r"SELECT * FROM notifications
            WHERE receiver_id = $1 AND ($2::notification_status IS NULL OR status = $2)
            ORDER BY created DESC, id DESC",
        )
        .bind(receiver)
        .bind(status)
        .fetch_all(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.notifications.mark_read")]
    pub async fn mark_read(
        conn: &mut PgConnection,
        receiver: MemberId,
        id: NotificationId,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r"UPDATE notifications
            SET status = 'READ',
                updated = CASE WHEN status = 'WAIT' THEN timezone('utc', now()) ELSE updated END
            WHERE id = $1 AND receiver_id = $2
            RETURNING *",
        )
        .bind(id)
        .bind(receiver)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.notifications.mark_all_read")]
    pub async fn mark_all_read(conn: &mut PgConnection, receiver: MemberId) -> Result<Vec<Self>> {
        sqlx::query(
            r"UPDATE notifications
            SET status = 'READ', updated = timezone('utc', now())
            WHERE receiver_id = $1 AND status = 'WAIT'",
        )
        .bind(receiver)
        .execute(&mut *conn)
        .await
        .into_db_error()?;

        Self::list(conn, receiver, None).await
    }

    #[tracing::instrument(skip_all, name = "db.notifications.delete")]
    pub async fn delete(
        conn: &mut PgConnection,
        receiver: MemberId,
        id: NotificationId,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "DELETE FROM notifications WHERE id = $1 AND receiver_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(receiver)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}

impl InsertNotification {
    #[tracing::instrument(skip_all, name = "db.notifications.insert")]
    pub async fn insert(&self, conn: &mut PgConnection) -> Result<Notification> {
        sqlx::query_as::<_, Notification>(
            r"INSERT INTO notifications
                (kind, target_group, title, description, author_id, receiver_id,
                 property_id, article_id, equipment_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *",
        )
        .bind(self.kind)
        .bind(self.group)
        .bind(&self.title)
        .bind(&self.description)
        .bind(self.author_id)
        .bind(self.receiver_id)
        .bind(self.property_id)
        .bind(self.article_id)
        .bind(self.equipment_id)
        .fetch_one(conn)
        .await
        .into_db_error()
    }
}
