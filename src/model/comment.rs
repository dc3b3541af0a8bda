use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::id::{CommentId, MemberId};
use super::member::Member;
use super::page::{Sort, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "comment_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentStatus {
    Active,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub member_id: MemberId,
    #[sqlx(rename = "target_group")]
    pub group: super::TargetGroup,
    /// Id of the commented entity, interpreted through `group`.
    pub ref_id: i64,
    pub content: String,
    pub status: CommentStatus,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

impl Comment {
    pub(crate) fn sort_key(&self, sort: Sort) -> SortKey {
        match sort {
            Sort::Updated => (0, self.updated, self.id.0),
            _ => (0, self.created, self.id.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertComment {
    pub group: super::TargetGroup,
    pub ref_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateComment {
    pub content: Option<String>,
    pub status: Option<CommentStatus>,
}

impl UpdateComment {
    pub(crate) fn apply(&self, comment: &mut Comment) {
        if let Some(content) = &self.content {
            comment.content.clone_from(content);
        }
        if let Some(status) = self.status {
            comment.status = status;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub member: Option<Member>,
}
