//! Persistence models shared by the store implementations and the services.
use serde::{Deserialize, Serialize};

pub mod article;
pub mod comment;
pub mod equipment;
pub mod id;
pub mod member;
pub mod notice;
pub mod notification;
pub mod page;
pub mod property;
pub mod social;

pub use self::article::{Article, ArticleStat, ArticleView};
pub use self::comment::{Comment, CommentView};
pub use self::equipment::{Equipment, EquipmentStat, EquipmentView};
pub use self::id::*;
pub use self::member::{Member, MemberStat, MemberView};
pub use self::notice::Notice;
pub use self::notification::{
    InsertNotification, Notification, NotificationGroup, NotificationKind, NotificationStatus,
};
pub use self::page::{Direction, PageRequest, Paginated, Sort};
pub use self::property::{Property, PropertyStat, PropertyView};
pub use self::social::{Follow, FollowSide, FollowView, Like, Target, TargetGroup, View};

/// Inclusive range used by listing filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Range<T> {
    pub start: T,
    pub end: T,
}

impl<T: PartialOrd> Range<T> {
    pub fn contains(&self, value: &T) -> bool {
        &self.start <= value && value <= &self.end
    }
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
