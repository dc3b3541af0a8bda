use async_trait::async_trait;

use super::PgData;
use crate::database::{Data, Result, UpdateScope};
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

#[async_trait]
impl Data for PgData {
    async fn insert_member(&self, form: &InsertMember) -> Result<Member> {
        let mut conn = self.write().await?;
        form.insert(&mut conn).await
    }

    async fn find_member(&self, id: MemberId) -> Result<Option<Member>> {
        let mut conn = self.read().await?;
        Member::find(&mut conn, id).await
    }

    async fn update_member(
        &self,
        id: MemberId,
        form: &UpdateMember,
        only_active: bool,
    ) -> Result<Option<Member>> {
        let mut conn = self.write().await?;
        form.update(&mut conn, id, only_active).await
    }

    async fn list_members(
        &self,
        filter: &MemberFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Member>> {
        let mut conn = self.read().await?;
        Member::list(&mut conn, filter, page).await
    }

    async fn adjust_member_stat(
        &self,
        id: MemberId,
        stat: MemberStat,
        delta: i64,
    ) -> Result<Option<Member>> {
        let mut conn = self.write().await?;
        Member::adjust_stat(&mut conn, id, stat, delta).await
    }

    async fn insert_property(&self, owner: MemberId, form: &InsertProperty) -> Result<Property> {
        let mut conn = self.write().await?;
        form.insert(&mut conn, owner).await
    }

    async fn find_property(&self, id: PropertyId) -> Result<Option<Property>> {
        let mut conn = self.read().await?;
        Property::find(&mut conn, id).await
    }

    async fn update_property(
        &self,
        id: PropertyId,
        form: &UpdateProperty,
        scope: UpdateScope,
    ) -> Result<Option<Property>> {
        let mut conn = self.write().await?;
        form.update(&mut conn, id, scope.owner()).await
    }

    async fn list_properties(
        &self,
        filter: &PropertyFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Property>> {
        let mut conn = self.read().await?;
        Property::list(&mut conn, filter, page).await
    }

    async fn adjust_property_stat(
        &self,
        id: PropertyId,
        stat: PropertyStat,
        delta: i64,
    ) -> Result<Option<Property>> {
        let mut conn = self.write().await?;
        Property::adjust_stat(&mut conn, id, stat, delta).await
    }

    async fn remove_property(&self, id: PropertyId) -> Result<Option<Property>> {
        let mut conn = self.write().await?;
        Property::remove(&mut conn, id).await
    }

    async fn insert_equipment(
        &self,
        owner: MemberId,
        form: &InsertEquipment,
    ) -> Result<Equipment> {
        let mut conn = self.write().await?;
        form.insert(&mut conn, owner).await
    }

    async fn find_equipment(&self, id: EquipmentId) -> Result<Option<Equipment>> {
        let mut conn = self.read().await?;
        Equipment::find(&mut conn, id).await
    }

    async fn update_equipment(
        &self,
        id: EquipmentId,
        form: &UpdateEquipment,
        scope: UpdateScope,
    ) -> Result<Option<Equipment>> {
        let mut conn = self.write().await?;
        form.update(&mut conn, id, scope.owner()).await
    }

    async fn list_equipment(
        &self,
        filter: &EquipmentFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Equipment>> {
        let mut conn = self.read().await?;
        Equipment::list(&mut conn, filter, page).await
    }

    async fn adjust_equipment_stat(
        &self,
        id: EquipmentId,
        stat: EquipmentStat,
        delta: i64,
    ) -> Result<Option<Equipment>> {
        let mut conn = self.write().await?;
        Equipment::adjust_stat(&mut conn, id, stat, delta).await
    }

    async fn remove_equipment(&self, id: EquipmentId) -> Result<Option<Equipment>> {
        let mut conn = self.write().await?;
        Equipment::remove(&mut conn, id).await
    }

    async fn insert_article(&self, owner: MemberId, form: &InsertArticle) -> Result<Article> {
        let mut conn = self.write().await?;
        form.insert(&mut conn, owner).await
    }

    async fn find_article(&self, id: ArticleId) -> Result<Option<Article>> {
        let mut conn = self.read().await?;
        Article::find(&mut conn, id).await
    }

    async fn update_article(
        &self,
        id: ArticleId,
        form: &UpdateArticle,
        scope: UpdateScope,
    ) -> Result<Option<Article>> {
        let mut conn = self.write().await?;
        form.update(&mut conn, id, scope.owner()).await
    }

    async fn list_articles(
        &self,
        filter: &ArticleFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Article>> {
        let mut conn = self.read().await?;
        Article::list(&mut conn, filter, page).await
    }

    async fn adjust_article_stat(
        &self,
        id: ArticleId,
        stat: ArticleStat,
        delta: i64,
    ) -> Result<Option<Article>> {
        let mut conn = self.write().await?;
        Article::adjust_stat(&mut conn, id, stat, delta).await
    }

    async fn remove_article(&self, id: ArticleId) -> Result<Option<Article>> {
        let mut conn = self.write().await?;
        Article::remove(&mut conn, id).await
    }

    async fn insert_comment(&self, author: MemberId, form: &InsertComment) -> Result<Comment> {
        let mut conn = self.write().await?;
        form.insert(&mut conn, author).await
    }

    async fn update_comment(
        &self,
        id: CommentId,
        author: MemberId,
        form: &UpdateComment,
    ) -> Result<Option<Comment>> {
        let mut conn = self.write().await?;
        form.update(&mut conn, id, author).await
    }

    async fn list_comments(
        &self,
        target: Target,
        page: &PageRequest,
    ) -> Result<Paginated<Comment>> {
        let mut conn = self.read().await?;
        Comment::list(&mut conn, target, page).await
    }

    async fn remove_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        let mut conn = self.write().await?;
        Comment::remove(&mut conn, id).await
    }

    async fn insert_notice(&self, author: MemberId, form: &InsertNotice) -> Result<Notice> {
        let mut conn = self.write().await?;
        form.insert(&mut conn, author).await
    }

    async fn list_notices(
        &self,
        filter: &NoticeFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Notice>> {
        let mut conn = self.read().await?;
        Notice::list(&mut conn, filter, page).await
    }

    // The ledgers are read right before they are written, so they
    // always go to the primary to avoid replica lag.
    async fn find_like(&self, member: MemberId, target: Target) -> Result<Option<Like>> {
        let mut conn = self.write().await?;
        Like::find(&mut conn, member, target).await
    }

    async fn insert_like(&self, member: MemberId, target: Target) -> Result<Like> {
        let mut conn = self.write().await?;
        Like::insert(&mut conn, member, target).await
    }

    async fn delete_like(&self, member: MemberId, target: Target) -> Result<Option<Like>> {
        let mut conn = self.write().await?;
        Like::delete(&mut conn, member, target).await
    }

    async fn list_likes(
        &self,
        member: MemberId,
        group: TargetGroup,
        page: &PageRequest,
    ) -> Result<Paginated<Like>> {
        let mut conn = self.read().await?;
        Like::list(&mut conn, member, group, page).await
    }

    async fn insert_view(&self, member: MemberId, target: Target) -> Result<Option<View>> {
        let mut conn = self.write().await?;
        View::insert(&mut conn, member, target).await
    }

    async fn list_views(
        &self,
        member: MemberId,
        group: TargetGroup,
        page: &PageRequest,
    ) -> Result<Paginated<View>> {
        let mut conn = self.read().await?;
        View::list(&mut conn, member, group, page).await
    }

    async fn insert_follow(&self, follower: MemberId, following: MemberId) -> Result<Follow> {
        let mut conn = self.write().await?;
        Follow::insert(&mut conn, follower, following).await
    }

    async fn delete_follow(
        &self,
        follower: MemberId,
        following: MemberId,
    ) -> Result<Option<Follow>> {
        let mut conn = self.write().await?;
        Follow::delete(&mut conn, follower, following).await
    }

    async fn find_follow(
        &self,
        follower: MemberId,
        following: MemberId,
    ) -> Result<Option<Follow>> {
        let mut conn = self.write().await?;
        Follow::find(&mut conn, follower, following).await
    }

    async fn list_follows(
        &self,
        side: FollowSide,
        member: MemberId,
        page: &PageRequest,
    ) -> Result<Paginated<Follow>> {
        let mut conn = self.read().await?;
        Follow::list(&mut conn, side, member, page).await
    }

    async fn follower_ids(&self, member: MemberId) -> Result<Vec<MemberId>> {
        let mut conn = self.read().await?;
        Follow::follower_ids(&mut conn, member).await
    }

    async fn insert_notification(&self, form: &InsertNotification) -> Result<Notification> {
        let mut conn = self.write().await?;
        form.insert(&mut conn).await
    }

    async fn list_notifications(
        &self,
        receiver: MemberId,
        status: Option<NotificationStatus>,
    ) -> Result<Vec<Notification>> {
        let mut conn = self.read().await?;
        Notification::list(&mut conn, receiver, status).await
    }

    async fn mark_notification_read(
        &self,
        receiver: MemberId,
        id: NotificationId,
    ) -> Result<Option<Notification>> {
        let mut conn = self.write().await?;
        Notification::mark_read(&mut conn, receiver, id).await
    }

    async fn mark_all_notifications_read(&self, receiver: MemberId) -> Result<Vec<Notification>> {
        let mut conn = self.write().await?;
        Notification::mark_all_read(&mut conn, receiver).await
    }

    async fn delete_notification(
        &self,
        receiver: MemberId,
        id: NotificationId,
    ) -> Result<Option<Notification>> {
        let mut conn = self.write().await?;
        Notification::delete(&mut conn, receiver, id).await
    }
}
