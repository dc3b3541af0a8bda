use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::id::{ArticleId, EquipmentId, MemberId, NotificationId, PropertyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "notification_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    Create,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "notification_group", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationGroup {
    Member,
    Property,
    Article,
    Equipment,
    Comment,
}

/// `WAIT` moves to `READ` and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "notification_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Wait,
    Read,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    #[sqlx(rename = "target_group")]
    pub group: NotificationGroup,
    pub status: NotificationStatus,
    pub title: String,
    pub description: Option<String>,
    pub author_id: MemberId,
    pub receiver_id: MemberId,
    pub property_id: Option<PropertyId>,
    pub article_id: Option<ArticleId>,
    pub equipment_id: Option<EquipmentId>,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertNotification {
    pub kind: NotificationKind,
    pub group: NotificationGroup,
    pub title: String,
    pub description: Option<String>,
    pub author_id: MemberId,
    pub receiver_id: MemberId,
    pub property_id: Option<PropertyId>,
    pub article_id: Option<ArticleId>,
    pub equipment_id: Option<EquipmentId>,
}

impl InsertNotification {
    #[must_use]
    pub fn new(
        kind: NotificationKind,
        group: NotificationGroup,
        author_id: MemberId,
        receiver_id: MemberId,
        title: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            group,
            title: title.into(),
            description: None,
            author_id,
            receiver_id,
            property_id: None,
            article_id: None,
            equipment_id: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Redirects the same message to another receiver.
    #[must_use]
    pub fn to(mut self, receiver_id: MemberId) -> Self {
        self.receiver_id = receiver_id;
        self
    }
}
