//! Records of the like ledger, the view ledger and the follow graph.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::id::{FollowId, LikeId, MemberId, ViewId};
use super::member::Member;
use super::page::{Sort, SortKey};

/// Which kind of entity a like, a view or a comment points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "target_group", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetGroup {
    Member,
    Property,
    Article,
    Equipment,
}

/// A reference to any likeable or viewable entity.
///
/// Entity ids are only unique within their own table, so the group is
/// always part of a target's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Target {
    pub group: TargetGroup,
    pub id: i64,
}

impl Target {
    #[must_use]
    pub fn new(group: TargetGroup, id: impl Into<i64>) -> Self {
        Self {
            group,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn member(id: MemberId) -> Self {
        Self::new(TargetGroup::Member, id.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Like {
    pub id: LikeId,
    pub member_id: MemberId,
    #[sqlx(rename = "target_group")]
    pub group: TargetGroup,
    pub ref_id: i64,
    pub created: NaiveDateTime,
}

impl Like {
    #[must_use]
    pub fn target(&self) -> Target {
        Target::new(self.group, self.ref_id)
    }

    pub(crate) fn sort_key(&self, _sort: Sort) -> SortKey {
        (0, self.created, self.id.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct View {
    pub id: ViewId,
    pub member_id: MemberId,
    #[sqlx(rename = "target_group")]
    pub group: TargetGroup,
    pub ref_id: i64,
    pub created: NaiveDateTime,
}

impl View {
    #[must_use]
    pub fn target(&self) -> Target {
        Target::new(self.group, self.ref_id)
    }

    pub(crate) fn sort_key(&self, _sort: Sort) -> SortKey {
        (0, self.created, self.id.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Follow {
    pub id: FollowId,
    pub follower_id: MemberId,
    pub following_id: MemberId,
    pub created: NaiveDateTime,
}

impl Follow {
    pub(crate) fn sort_key(&self, _sort: Sort) -> SortKey {
        (0, self.created, self.id.0)
    }
}

/// Which end of the follow graph a listing walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowSide {
    /// Edges pointing at the member.
    Followers,
    /// Edges leaving the member.
    Followings,
}

impl FollowSide {
    /// The member on the other end of `edge` from the listed member.
    #[must_use]
    pub fn counterpart(self, edge: &Follow) -> MemberId {
        match self {
            Self::Followers => edge.follower_id,
            Self::Followings => edge.following_id,
        }
    }

    pub(crate) fn matches(self, member: MemberId, edge: &Follow) -> bool {
        match self {
            Self::Followers => edge.following_id == member,
            Self::Followings => edge.follower_id == member,
        }
    }
}

/// An entry of a follower or following listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FollowView {
    #[serde(flatten)]
    pub follow: Follow,
    /// The member on the other end of the edge.
    pub member: Option<Member>,
    pub me_liked: bool,
    pub me_followed: bool,
}
