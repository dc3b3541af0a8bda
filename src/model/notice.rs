use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::id::{MemberId, NoticeId};
use super::page::{Sort, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "notice_category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeCategory {
    Faq,
    Terms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "notice_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeStatus {
    Hold,
    Active,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "notice_topic", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeTopic {
    Property,
    Equipment,
    Payment,
    Buyers,
    Agents,
    Membership,
    Community,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct Notice {
    pub id: NoticeId,
    pub member_id: MemberId,
    pub category: NoticeCategory,
    pub status: NoticeStatus,
    pub topic: NoticeTopic,
    pub title: String,
    pub content: String,
    pub created: NaiveDateTime,
}

impl Notice {
    pub(crate) fn sort_key(&self, _sort: Sort) -> SortKey {
        (0, self.created, self.id.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertNotice {
    pub category: NoticeCategory,
    #[serde(default = "InsertNotice::default_status")]
    pub status: NoticeStatus,
    pub topic: NoticeTopic,
    pub title: String,
    pub content: String,
}

impl InsertNotice {
    const fn default_status() -> NoticeStatus {
        NoticeStatus::Active
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeFilter {
    pub category: Option<NoticeCategory>,
    pub status: Option<NoticeStatus>,
    pub topic: Option<NoticeTopic>,
}

impl NoticeFilter {
    pub(crate) fn matches(&self, notice: &Notice) -> bool {
        self.category.map_or(true, |v| notice.category == v)
            && self.status.map_or(true, |v| notice.status == v)
            && self.topic.map_or(true, |v| notice.topic == v)
    }
}
