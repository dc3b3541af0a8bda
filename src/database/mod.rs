//! Persistence layer.
//!
//! Services only ever talk to the [`Data`] trait. [`PgData`] stores
//! everything in Postgres and [`MemoryData`] keeps it in process, which
//! is what tests and database-less deployments run on.
use async_trait::async_trait;
use std::fmt::Debug;

use crate::model::article::{ArticleFilter, InsertArticle, UpdateArticle};
use crate::model::comment::{InsertComment, UpdateComment};
use crate::model::equipment::{EquipmentFilter, InsertEquipment, UpdateEquipment};
use crate::model::member::{InsertMember, MemberFilter, UpdateMember};
use crate::model::notice::{InsertNotice, NoticeFilter};
use crate::model::property::{InsertProperty, PropertyFilter, UpdateProperty};
use crate::model::{
    Article, ArticleId, ArticleStat, Comment, CommentId, Equipment, EquipmentId, EquipmentStat,
    Follow, FollowSide, InsertNotification, Like, Member, MemberId, MemberStat, Notice,
    Notification, NotificationId, NotificationStatus, PageRequest, Paginated, Property,
    PropertyId, PropertyStat, Target, TargetGroup, View,
};

mod error;
pub mod memory;
pub mod postgres;

pub use self::error::*;
pub use self::memory::MemoryData;
pub use self::postgres::{PgData, Pool};

/// Who may update a row and which rows are still updatable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateScope {
    /// Only the owning member, and only while the row is in its
    /// owner-editable state.
    Owner(MemberId),
    /// Any row that is not in its terminal state.
    Admin,
}

impl UpdateScope {
    #[must_use]
    pub fn owner(self) -> Option<MemberId> {
        match self {
            Self::Owner(id) => Some(id),
            Self::Admin => None,
        }
    }
}

#[async_trait]
pub trait Data: Debug + Send + Sync {
    // -- members --
    async fn insert_member(&self, form: &InsertMember) -> Result<Member>;
    async fn find_member(&self, id: MemberId) -> Result<Option<Member>>;
    /// Updates a member. With `only_active`, inactive members are left
    /// untouched and `None` is returned.
    async fn update_member(
        &self,
        id: MemberId,
        form: &UpdateMember,
        only_active: bool,
    ) -> Result<Option<Member>>;
    async fn list_members(
        &self,
        filter: &MemberFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Member>>;
    /// Atomically adds `delta` to a member counter.
    async fn adjust_member_stat(
        &self,
        id: MemberId,
        stat: MemberStat,
        delta: i64,
    ) -> Result<Option<Member>>;

    // -- properties --
    async fn insert_property(&self, owner: MemberId, form: &InsertProperty) -> Result<Property>;
    async fn find_property(&self, id: PropertyId) -> Result<Option<Property>>;
    /// Updates a property that is not deleted yet.
    async fn update_property(
        &self,
        id: PropertyId,
        form: &UpdateProperty,
        scope: UpdateScope,
    ) -> Result<Option<Property>>;
    async fn list_properties(
        &self,
        filter: &PropertyFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Property>>;
    async fn adjust_property_stat(
        &self,
        id: PropertyId,
        stat: PropertyStat,
        delta: i64,
    ) -> Result<Option<Property>>;
    /// Removes a property only if it has been marked as deleted.
    async fn remove_property(&self, id: PropertyId) -> Result<Option<Property>>;

    // -- equipment --
    async fn insert_equipment(&self, owner: MemberId, form: &InsertEquipment)
        -> Result<Equipment>;
    async fn find_equipment(&self, id: EquipmentId) -> Result<Option<Equipment>>;
    /// Owners may only update active equipment, admins anything not retired.
    async fn update_equipment(
        &self,
        id: EquipmentId,
        form: &UpdateEquipment,
        scope: UpdateScope,
    ) -> Result<Option<Equipment>>;
    async fn list_equipment(
        &self,
        filter: &EquipmentFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Equipment>>;
    async fn adjust_equipment_stat(
        &self,
        id: EquipmentId,
        stat: EquipmentStat,
        delta: i64,
    ) -> Result<Option<Equipment>>;
    /// Removes equipment only if it has been retired.
    async fn remove_equipment(&self, id: EquipmentId) -> Result<Option<Equipment>>;

    // -- articles --
    async fn insert_article(&self, owner: MemberId, form: &InsertArticle) -> Result<Article>;
    async fn find_article(&self, id: ArticleId) -> Result<Option<Article>>;
    /// Updates an active article.
    async fn update_article(
        &self,
        id: ArticleId,
        form: &UpdateArticle,
        scope: UpdateScope,
    ) -> Result<Option<Article>>;
    async fn list_articles(
        &self,
        filter: &ArticleFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Article>>;
    async fn adjust_article_stat(
        &self,
        id: ArticleId,
        stat: ArticleStat,
        delta: i64,
    ) -> Result<Option<Article>>;
    /// Removes an article only if it has been marked as deleted.
    async fn remove_article(&self, id: ArticleId) -> Result<Option<Article>>;

    // -- comments --
    async fn insert_comment(&self, author: MemberId, form: &InsertComment) -> Result<Comment>;
    /// Updates an active comment written by `author`.
    async fn update_comment(
        &self,
        id: CommentId,
        author: MemberId,
        form: &UpdateComment,
    ) -> Result<Option<Comment>>;
    /// Active comments of a target.
    async fn list_comments(&self, target: Target, page: &PageRequest)
        -> Result<Paginated<Comment>>;
    async fn remove_comment(&self, id: CommentId) -> Result<Option<Comment>>;

    // -- notices --
    async fn insert_notice(&self, author: MemberId, form: &InsertNotice) -> Result<Notice>;
    async fn list_notices(
        &self,
        filter: &NoticeFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Notice>>;

    // -- like ledger --
    async fn find_like(&self, member: MemberId, target: Target) -> Result<Option<Like>>;
    /// Fails with [`Error::Conflict`] if the like exists already.
    async fn insert_like(&self, member: MemberId, target: Target) -> Result<Like>;
    async fn delete_like(&self, member: MemberId, target: Target) -> Result<Option<Like>>;
    async fn list_likes(
        &self,
        member: MemberId,
        group: TargetGroup,
        page: &PageRequest,
    ) -> Result<Paginated<Like>>;

    // -- view ledger --
    /// Records a view unless one exists already, in which case `None`
    /// is returned and nothing is written.
    async fn insert_view(&self, member: MemberId, target: Target) -> Result<Option<View>>;
    async fn list_views(
        &self,
        member: MemberId,
        group: TargetGroup,
        page: &PageRequest,
    ) -> Result<Paginated<View>>;

    // -- follow graph --
    /// Fails with [`Error::Conflict`] if the edge exists already.
    async fn insert_follow(&self, follower: MemberId, following: MemberId) -> Result<Follow>;
    async fn delete_follow(
        &self,
        follower: MemberId,
        following: MemberId,
    ) -> Result<Option<Follow>>;
    async fn find_follow(&self, follower: MemberId, following: MemberId)
        -> Result<Option<Follow>>;
    async fn list_follows(
        &self,
        side: FollowSide,
        member: MemberId,
        page: &PageRequest,
    ) -> Result<Paginated<Follow>>;
    /// Every follower of a member, oldest edge first.
    async fn follower_ids(&self, member: MemberId) -> Result<Vec<MemberId>>;

    // -- notifications --
    async fn insert_notification(&self, form: &InsertNotification) -> Result<Notification>;
    /// Notifications of a receiver, newest first.
    async fn list_notifications(
        &self,
        receiver: MemberId,
        status: Option<NotificationStatus>,
    ) -> Result<Vec<Notification>>;
    async fn mark_notification_read(
        &self,
        receiver: MemberId,
        id: NotificationId,
    ) -> Result<Option<Notification>>;
    /// Marks every waiting notification of a receiver as read and
    /// returns all of the receiver's notifications, newest first.
    async fn mark_all_notifications_read(&self, receiver: MemberId) -> Result<Vec<Notification>>;
    async fn delete_notification(
        &self,
        receiver: MemberId,
        id: NotificationId,
    ) -> Result<Option<Notification>>;
}
