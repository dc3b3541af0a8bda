use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::id::MemberId;
use super::page::{Sort, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "member_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberKind {
    User,
    Agent,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "member_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Active,
    Block,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct Member {
    pub id: MemberId,
    pub nick: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub kind: MemberKind,
    pub status: MemberStatus,
    pub description: Option<String>,

    pub properties: i64,
    pub equipments: i64,
    pub articles: i64,
    pub followers: i64,
    pub followings: i64,
    pub points: i64,
    pub likes: i64,
    pub views: i64,
    pub comments: i64,
    pub rank: i64,

    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

impl Member {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    /// Deleted members are invisible to everyone but admins.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(self.status, MemberStatus::Active | MemberStatus::Block)
    }

    pub(crate) fn sort_key(&self, sort: Sort) -> SortKey {
        let value = match sort {
            Sort::Views => self.views,
            Sort::Likes => self.likes,
            Sort::Rank => self.rank,
            Sort::Updated => return (0, self.updated, self.id.0),
            Sort::Created | Sort::RentPrice => 0,
        };
        (value, self.created, self.id.0)
    }
}

/// Counters a member owns. They are only ever changed by a signed
/// increment through the counter store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStat {
    Properties,
    Equipments,
    Articles,
    Followers,
    Followings,
    Points,
    Likes,
    Views,
    Comments,
    Rank,
}

impl MemberStat {
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::Equipments => "equipments",
            Self::Articles => "articles",
            Self::Followers => "followers",
            Self::Followings => "followings",
            Self::Points => "points",
            Self::Likes => "likes",
            Self::Views => "views",
            Self::Comments => "comments",
            Self::Rank => "rank",
        }
    }

    pub(crate) fn slot(self, member: &mut Member) -> &mut i64 {
        match self {
            Self::Properties => &mut member.properties,
            Self::Equipments => &mut member.equipments,
            Self::Articles => &mut member.articles,
            Self::Followers => &mut member.followers,
            Self::Followings => &mut member.followings,
            Self::Points => &mut member.points,
            Self::Likes => &mut member.likes,
            Self::Views => &mut member.views,
            Self::Comments => &mut member.comments,
            Self::Rank => &mut member.rank,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertMember {
    pub nick: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    #[serde(default = "InsertMember::default_kind")]
    pub kind: MemberKind,
    pub description: Option<String>,
}

impl InsertMember {
    const fn default_kind() -> MemberKind {
        MemberKind::User
    }

    #[must_use]
    pub fn new(nick: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            nick: nick.into(),
            full_name: None,
            phone: None,
            kind,
            description: None,
        }
    }
}

/// Partial update of a member. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMember {
    pub nick: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    /// Only honored for admin updates.
    pub kind: Option<MemberKind>,
    /// Only honored for admin updates.
    pub status: Option<MemberStatus>,
}

impl UpdateMember {
    pub(crate) fn apply(&self, member: &mut Member) {
        if let Some(nick) = &self.nick {
            member.nick.clone_from(nick);
        }
        if let Some(full_name) = &self.full_name {
            member.full_name = Some(full_name.clone());
        }
        if let Some(phone) = &self.phone {
            member.phone = Some(phone.clone());
        }
        if let Some(description) = &self.description {
            member.description = Some(description.clone());
        }
        if let Some(kind) = self.kind {
            member.kind = kind;
        }
        if let Some(status) = self.status {
            member.status = status;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberFilter {
    pub kind: Option<MemberKind>,
    pub status: Option<MemberStatus>,
    /// Case-insensitive substring of the nick.
    pub text: Option<String>,
}

impl MemberFilter {
    pub(crate) fn matches(&self, member: &Member) -> bool {
        self.kind.map_or(true, |v| member.kind == v)
            && self.status.map_or(true, |v| member.status == v)
            && self
                .text
                .as_deref()
                .map_or(true, |text| super::contains_ignore_case(&member.nick, text))
    }
}

/// A member as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberView {
    #[serde(flatten)]
    pub member: Member,
    pub me_liked: bool,
    pub me_followed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::Token;

    #[test]
    fn enums_use_screaming_case_on_the_wire() {
        serde_test::assert_tokens(
            &MemberKind::Agent,
            &[Token::UnitVariant {
                name: "MemberKind",
                variant: "AGENT",
            }],
        );
        serde_test::assert_tokens(
            &MemberStatus::Block,
            &[Token::UnitVariant {
                name: "MemberStatus",
                variant: "BLOCK",
            }],
        );
    }
}
