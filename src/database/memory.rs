use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use error_stack::Report;
use tokio::sync::RwLock;

use super::{Data, Error, Result, UpdateScope};
use crate::model::article::{ArticleFilter, ArticleStatus, InsertArticle, UpdateArticle};
use crate::model::comment::{CommentStatus, InsertComment, UpdateComment};
use crate::model::equipment::{
    EquipmentFilter, EquipmentStatus, InsertEquipment, UpdateEquipment,
};
use crate::model::member::{InsertMember, MemberFilter, MemberStatus, UpdateMember};
use crate::model::notice::{InsertNotice, NoticeFilter};
use crate::model::property::{InsertProperty, PropertyFilter, PropertyStatus, UpdateProperty};
use crate::model::{
    Article, ArticleId, ArticleStat, Comment, CommentId, Equipment, EquipmentId, EquipmentStat,
    Follow, FollowId, FollowSide, InsertNotification, Like, LikeId, Member, MemberId, MemberStat,
    Notice, NoticeId, Notification, NotificationId, NotificationStatus, PageRequest, Paginated,
    Property, PropertyId, PropertyStat, Target, TargetGroup, View, ViewId,
};

/// Keeps every table in process behind a single lock.
///
/// Each operation takes the lock once, so every counter adjustment and
/// every check-then-insert is atomic with respect to other callers.
#[derive(Debug, Default)]
pub struct MemoryData {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    sequence: i64,
    members: Vec<Member>,
    properties: Vec<Property>,
    equipment: Vec<Equipment>,
    articles: Vec<Article>,
    comments: Vec<Comment>,
    notices: Vec<Notice>,
    likes: Vec<Like>,
    views: Vec<View>,
    follows: Vec<Follow>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }
}

impl MemoryData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (NaiveDateTime, i64)) {
    rows.sort_by_key(|row| std::cmp::Reverse(key(row)));
}

#[async_trait]
impl Data for MemoryData {
    #[tracing::instrument(skip_all, name = "db.members.insert")]
    async fn insert_member(&self, form: &InsertMember) -> Result<Member> {
        let mut tables = self.tables.write().await;
        if tables.members.iter().any(|v| v.nick == form.nick) {
            return Err(Report::new(Error::Conflict));
        }

        let created = now();
        let member = Member {
            id: MemberId(tables.next_id()),
            nick: form.nick.clone(),
            full_name: form.full_name.clone(),
            phone: form.phone.clone(),
            kind: form.kind,
            status: MemberStatus::Active,
            description: form.description.clone(),
            properties: 0,
            equipments: 0,
            articles: 0,
            followers: 0,
            followings: 0,
            points: 0,
            likes: 0,
            views: 0,
            comments: 0,
            rank: 0,
            created,
            updated: created,
        };
        tables.members.push(member.clone());
        Ok(member)
    }

    async fn find_member(&self, id: MemberId) -> Result<Option<Member>> {
        let tables = self.tables.read().await;
        Ok(tables.members.iter().find(|v| v.id == id).cloned())
    }

    #[tracing::instrument(skip_all, name = "db.members.update")]
    async fn update_member(
        &self,
        id: MemberId,
        form: &UpdateMember,
        only_active: bool,
    ) -> Result<Option<Member>> {
        let mut tables = self.tables.write().await;
        if let Some(nick) = &form.nick {
            if tables.members.iter().any(|v| v.id != id && &v.nick == nick) {
                return Err(Report::new(Error::Conflict));
            }
        }

        let Some(member) = tables
            .members
            .iter_mut()
            .find(|v| v.id == id && (!only_active || v.is_active()))
        else {
            return Ok(None);
        };

        form.apply(member);
        member.updated = now();
        Ok(Some(member.clone()))
    }

    async fn list_members(
        &self,
        filter: &MemberFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Member>> {
        let tables = self.tables.read().await;
        let rows = tables
            .members
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        Ok(page.apply(rows, Member::sort_key))
    }

    #[tracing::instrument(skip_all, name = "db.members.adjust_stat")]
    async fn adjust_member_stat(
        &self,
        id: MemberId,
        stat: MemberStat,
        delta: i64,
    ) -> Result<Option<Member>> {
        let mut tables = self.tables.write().await;
        Ok(tables.members.iter_mut().find(|v| v.id == id).map(|member| {
            *stat.slot(member) += delta;
            member.clone()
        }))
    }

    #[tracing::instrument(skip_all, name = "db.properties.insert")]
    async fn insert_property(&self, owner: MemberId, form: &InsertProperty) -> Result<Property> {
        let mut tables = self.tables.write().await;
        let created = now();
        let property = Property {
            id: PropertyId(tables.next_id()),
            member_id: owner,
            kind: form.kind,
            status: PropertyStatus::Active,
            location: form.location,
            address: form.address.clone(),
            title: form.title.clone(),
            rent_price: form.rent_price,
            square: form.square,
            description: form.description.clone(),
            views: 0,
            likes: 0,
            comments: 0,
            rank: 0,
            rented_at: None,
            deleted_at: None,
            created,
            updated: created,
        };
        tables.properties.push(property.clone());
        Ok(property)
    }

    async fn find_property(&self, id: PropertyId) -> Result<Option<Property>> {
        let tables = self.tables.read().await;
        Ok(tables.properties.iter().find(|v| v.id == id).cloned())
    }

    #[tracing::instrument(skip_all, name = "db.properties.update")]
    async fn update_property(
        &self,
        id: PropertyId,
        form: &UpdateProperty,
        scope: UpdateScope,
    ) -> Result<Option<Property>> {
        let mut tables = self.tables.write().await;
        let Some(property) = tables.properties.iter_mut().find(|v| {
            v.id == id
                && v.status != PropertyStatus::Delete
                && scope.owner().map_or(true, |owner| v.member_id == owner)
        }) else {
            return Ok(None);
        };

        form.apply(property);
        property.updated = now();
        Ok(Some(property.clone()))
    }

    async fn list_properties(
        &self,
        filter: &PropertyFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Property>> {
        let tables = self.tables.read().await;
        let rows = tables
            .properties
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        Ok(page.apply(rows, Property::sort_key))
    }

    #[tracing::instrument(skip_all, name = "db.properties.adjust_stat")]
    async fn adjust_property_stat(
        &self,
        id: PropertyId,
        stat: PropertyStat,
        delta: i64,
    ) -> Result<Option<Property>> {
        let mut tables = self.tables.write().await;
        Ok(tables.properties.iter_mut().find(|v| v.id == id).map(|property| {
            *stat.slot(property) += delta;
            property.clone()
        }))
    }

    #[tracing::instrument(skip_all, name = "db.properties.remove")]
    async fn remove_property(&self, id: PropertyId) -> Result<Option<Property>> {
        let mut tables = self.tables.write().await;
        let position = tables
            .properties
            .iter()
            .position(|v| v.id == id && v.status == PropertyStatus::Delete);
        Ok(position.map(|index| tables.properties.remove(index)))
    }

    #[tracing::instrument(skip_all, name = "db.equipment.insert")]
    async fn insert_equipment(
        &self,
        owner: MemberId,
        form: &InsertEquipment,
    ) -> Result<Equipment> {
        let mut tables = self.tables.write().await;
        let created = now();
        let equipment = Equipment {
            id: EquipmentId(tables.next_id()),
            member_id: owner,
            kind: form.kind,
            status: EquipmentStatus::Active,
            condition: form.condition,
            title: form.title.clone(),
            rent_price: form.rent_price,
            description: form.description.clone(),
            views: 0,
            likes: 0,
            comments: 0,
            rank: 0,
            rented_at: None,
            retired_at: None,
            maintained_at: None,
            created,
            updated: created,
        };
        tables.equipment.push(equipment.clone());
        Ok(equipment)
    }

    async fn find_equipment(&self, id: EquipmentId) -> Result<Option<Equipment>> {
        let tables = self.tables.read().await;
        Ok(tables.equipment.iter().find(|v| v.id == id).cloned())
    }

    #[tracing::instrument(skip_all, name = "db.equipment.update")]
    async fn update_equipment(
        &self,
        id: EquipmentId,
        form: &UpdateEquipment,
        scope: UpdateScope,
    ) -> Result<Option<Equipment>> {
        let mut tables = self.tables.write().await;
        let Some(equipment) = tables.equipment.iter_mut().find(|v| {
            v.id == id
                && match scope {
                    UpdateScope::Owner(owner) => {
                        v.member_id == owner && v.status == EquipmentStatus::Active
                    }
                    UpdateScope::Admin => v.status != EquipmentStatus::Retired,
                }
        }) else {
            return Ok(None);
        };

        form.apply(equipment);
        equipment.updated = now();
        Ok(Some(equipment.clone()))
    }

    async fn list_equipment(
        &self,
        filter: &EquipmentFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Equipment>> {
        let tables = self.tables.read().await;
        let rows = tables
            .equipment
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        Ok(page.apply(rows, Equipment::sort_key))
    }

    #[tracing::instrument(skip_all, name = "db.equipment.adjust_stat")]
    async fn adjust_equipment_stat(
        &self,
        id: EquipmentId,
        stat: EquipmentStat,
        delta: i64,
    ) -> Result<Option<Equipment>> {
        let mut tables = self.tables.write().await;
        Ok(tables.equipment.iter_mut().find(|v| v.id == id).map(|equipment| {
            *stat.slot(equipment) += delta;
            equipment.clone()
        }))
    }

    #[tracing::instrument(skip_all, name = "db.equipment.remove")]
    async fn remove_equipment(&self, id: EquipmentId) -> Result<Option<Equipment>> {
        let mut tables = self.tables.write().await;
        let position = tables
            .equipment
            .iter()
            .position(|v| v.id == id && v.status == EquipmentStatus::Retired);
        Ok(position.map(|index| tables.equipment.remove(index)))
    }

    #[tracing::instrument(skip_all, name = "db.articles.insert")]
    async fn insert_article(&self, owner: MemberId, form: &InsertArticle) -> Result<Article> {
        let mut tables = self.tables.write().await;
        let created = now();
        let article = Article {
            id: ArticleId(tables.next_id()),
            member_id: owner,
            category: form.category,
            status: ArticleStatus::Active,
            title: form.title.clone(),
            content: form.content.clone(),
            image: form.image.clone(),
            views: 0,
            likes: 0,
            comments: 0,
            created,
            updated: created,
        };
        tables.articles.push(article.clone());
        Ok(article)
    }

    async fn find_article(&self, id: ArticleId) -> Result<Option<Article>> {
        let tables = self.tables.read().await;
        Ok(tables.articles.iter().find(|v| v.id == id).cloned())
    }

    #[tracing::instrument(skip_all, name = "db.articles.update")]
    async fn update_article(
        &self,
        id: ArticleId,
        form: &UpdateArticle,
        scope: UpdateScope,
    ) -> Result<Option<Article>> {
        let mut tables = self.tables.write().await;
        let Some(article) = tables.articles.iter_mut().find(|v| {
            v.id == id
                && v.status == ArticleStatus::Active
                && scope.owner().map_or(true, |owner| v.member_id == owner)
        }) else {
            return Ok(None);
        };

        form.apply(article);
        article.updated = now();
        Ok(Some(article.clone()))
    }

    async fn list_articles(
        &self,
        filter: &ArticleFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Article>> {
        let tables = self.tables.read().await;
        let rows = tables
            .articles
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        Ok(page.apply(rows, Article::sort_key))
    }

    #[tracing::instrument(skip_all, name = "db.articles.adjust_stat")]
    async fn adjust_article_stat(
        &self,
        id: ArticleId,
        stat: ArticleStat,
        delta: i64,
    ) -> Result<Option<Article>> {
        let mut tables = self.tables.write().await;
        Ok(tables.articles.iter_mut().find(|v| v.id == id).map(|article| {
            *stat.slot(article) += delta;
            article.clone()
        }))
    }

    #[tracing::instrument(skip_all, name = "db.articles.remove")]
    async fn remove_article(&self, id: ArticleId) -> Result<Option<Article>> {
        let mut tables = self.tables.write().await;
        let position = tables
            .articles
            .iter()
            .position(|v| v.id == id && v.status == ArticleStatus::Delete);
        Ok(position.map(|index| tables.articles.remove(index)))
    }

    #[tracing::instrument(skip_all, name = "db.comments.insert")]
    async fn insert_comment(&self, author: MemberId, form: &InsertComment) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        let created = now();
        let comment = Comment {
            id: CommentId(tables.next_id()),
            member_id: author,
            group: form.group,
            ref_id: form.ref_id,
            content: form.content.clone(),
            status: CommentStatus::Active,
            created,
            updated: created,
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    #[tracing::instrument(skip_all, name = "db.comments.update")]
    async fn update_comment(
        &self,
        id: CommentId,
        author: MemberId,
        form: &UpdateComment,
    ) -> Result<Option<Comment>> {
        let mut tables = self.tables.write().await;
        let Some(comment) = tables.comments.iter_mut().find(|v| {
            v.id == id && v.member_id == author && v.status == CommentStatus::Active
        }) else {
            return Ok(None);
        };

        form.apply(comment);
        comment.updated = now();
        Ok(Some(comment.clone()))
    }

    async fn list_comments(
        &self,
        target: Target,
        page: &PageRequest,
    ) -> Result<Paginated<Comment>> {
        let tables = self.tables.read().await;
        let rows = tables
            .comments
            .iter()
            .filter(|v| {
                v.group == target.group
                    && v.ref_id == target.id
                    && v.status == CommentStatus::Active
            })
            .cloned()
            .collect();
        Ok(page.apply(rows, Comment::sort_key))
    }

    #[tracing::instrument(skip_all, name = "db.comments.remove")]
    async fn remove_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        let mut tables = self.tables.write().await;
        let position = tables.comments.iter().position(|v| v.id == id);
        Ok(position.map(|index| tables.comments.remove(index)))
    }

    #[tracing::instrument(skip_all, name = "db.notices.insert")]
    async fn insert_notice(&self, author: MemberId, form: &InsertNotice) -> Result<Notice> {
        let mut tables = self.tables.write().await;
        let notice = Notice {
            id: NoticeId(tables.next_id()),
            member_id: author,
            category: form.category,
            status: form.status,
            topic: form.topic,
            title: form.title.clone(),
            content: form.content.clone(),
            created: now(),
        };
        tables.notices.push(notice.clone());
        Ok(notice)
    }

    async fn list_notices(
        &self,
        filter: &NoticeFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Notice>> {
        let tables = self.tables.read().await;
        let rows = tables
            .notices
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        Ok(page.apply(rows, Notice::sort_key))
    }

    async fn find_like(&self, member: MemberId, target: Target) -> Result<Option<Like>> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .find(|v| v.member_id == member && v.target() == target)
            .cloned())
    }

    #[tracing::instrument(skip_all, name = "db.likes.insert")]
    async fn insert_like(&self, member: MemberId, target: Target) -> Result<Like> {
        let mut tables = self.tables.write().await;
        if tables
            .likes
            .iter()
            .any(|v| v.member_id == member && v.target() == target)
        {
            return Err(Report::new(Error::Conflict));
        }

        let like = Like {
            id: LikeId(tables.next_id()),
            member_id: member,
            group: target.group,
            ref_id: target.id,
            created: now(),
        };
        tables.likes.push(like.clone());
        Ok(like)
    }

    #[tracing::instrument(skip_all, name = "db.likes.delete")]
    async fn delete_like(&self, member: MemberId, target: Target) -> Result<Option<Like>> {
        let mut tables = self.tables.write().await;
        let position = tables
            .likes
            .iter()
            .position(|v| v.member_id == member && v.target() == target);
        Ok(position.map(|index| tables.likes.remove(index)))
    }

    async fn list_likes(
        &self,
        member: MemberId,
        group: TargetGroup,
        page: &PageRequest,
    ) -> Result<Paginated<Like>> {
        let tables = self.tables.read().await;
        let rows = tables
            .likes
            .iter()
            .filter(|v| v.member_id == member && v.group == group)
            .cloned()
            .collect();
        Ok(page.apply(rows, Like::sort_key))
    }

    #[tracing::instrument(skip_all, name = "db.views.insert")]
    async fn insert_view(&self, member: MemberId, target: Target) -> Result<Option<View>> {
        let mut tables = self.tables.write().await;
        if tables
            .views
            .iter()
            .any(|v| v.member_id == member && v.target() == target)
        {
            return Ok(None);
        }

        let view = View {
            id: ViewId(tables.next_id()),
            member_id: member,
            group: target.group,
            ref_id: target.id,
            created: now(),
        };
        tables.views.push(view.clone());
        Ok(Some(view))
    }

    async fn list_views(
        &self,
        member: MemberId,
        group: TargetGroup,
        page: &PageRequest,
    ) -> Result<Paginated<View>> {
        let tables = self.tables.read().await;
        let rows = tables
            .views
            .iter()
            .filter(|v| v.member_id == member && v.group == group)
            .cloned()
            .collect();
        Ok(page.apply(rows, View::sort_key))
    }

    #[tracing::instrument(skip_all, name = "db.follows.insert")]
    async fn insert_follow(&self, follower: MemberId, following: MemberId) -> Result<Follow> {
        let mut tables = self.tables.write().await;
        if tables
            .follows
            .iter()
            .any(|v| v.follower_id == follower && v.following_id == following)
        {
            return Err(Report::new(Error::Conflict));
        }

        let follow = Follow {
            id: FollowId(tables.next_id()),
            follower_id: follower,
            following_id: following,
            created: now(),
        };
        tables.follows.push(follow.clone());
        Ok(follow)
    }

    #[tracing::instrument(skip_all, name = "db.follows.delete")]
    async fn delete_follow(
        &self,
        follower: MemberId,
        following: MemberId,
    ) -> Result<Option<Follow>> {
        let mut tables = self.tables.write().await;
        let position = tables
            .follows
            .iter()
            .position(|v| v.follower_id == follower && v.following_id == following);
        Ok(position.map(|index| tables.follows.remove(index)))
    }

    async fn find_follow(
        &self,
        follower: MemberId,
        following: MemberId,
    ) -> Result<Option<Follow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .find(|v| v.follower_id == follower && v.following_id == following)
            .cloned())
    }

    async fn list_follows(
        &self,
        side: FollowSide,
        member: MemberId,
        page: &PageRequest,
    ) -> Result<Paginated<Follow>> {
        let tables = self.tables.read().await;
        let rows = tables
            .follows
            .iter()
            .filter(|v| side.matches(member, v))
            .cloned()
            .collect();
        Ok(page.apply(rows, Follow::sort_key))
    }

    async fn follower_ids(&self, member: MemberId) -> Result<Vec<MemberId>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .filter(|v| v.following_id == member)
            .map(|v| v.follower_id)
            .collect())
    }

    #[tracing::instrument(skip_all, name = "db.notifications.insert")]
    async fn insert_notification(&self, form: &InsertNotification) -> Result<Notification> {
        let mut tables = self.tables.write().await;
        let known = |id: MemberId| tables.members.iter().any(|v| v.id == id);
        if !known(form.author_id) || !known(form.receiver_id) {
            return Err(Report::new(Error::MissingReference));
        }

        let created = now();
        let notification = Notification {
            id: NotificationId(tables.next_id()),
            kind: form.kind,
            group: form.group,
            status: NotificationStatus::Wait,
            title: form.title.clone(),
            description: form.description.clone(),
            author_id: form.author_id,
            receiver_id: form.receiver_id,
            property_id: form.property_id,
            article_id: form.article_id,
            equipment_id: form.equipment_id,
            created,
            updated: created,
        };
        tables.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_notifications(
        &self,
        receiver: MemberId,
        status: Option<NotificationStatus>,
    ) -> Result<Vec<Notification>> {
        let tables = self.tables.read().await;
        let mut rows = tables
            .notifications
            .iter()
            .filter(|v| v.receiver_id == receiver && status.map_or(true, |s| v.status == s))
            .cloned()
            .collect::<Vec<_>>();
        newest_first(&mut rows, |v| (v.created, v.id.0));
        Ok(rows)
    }

    #[tracing::instrument(skip_all, name = "db.notifications.mark_read")]
    async fn mark_notification_read(
        &self,
        receiver: MemberId,
        id: NotificationId,
    ) -> Result<Option<Notification>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .notifications
            .iter_mut()
            .find(|v| v.id == id && v.receiver_id == receiver)
            .map(|notification| {
                if notification.status == NotificationStatus::Wait {
                    notification.status = NotificationStatus::Read;
                    notification.updated = now();
                }
                notification.clone()
            }))
    }

    #[tracing::instrument(skip_all, name = "db.notifications.mark_all_read")]
    async fn mark_all_notifications_read(&self, receiver: MemberId) -> Result<Vec<Notification>> {
        let mut tables = self.tables.write().await;
        let updated = now();
        let mut rows = Vec::new();
        for notification in tables
            .notifications
            .iter_mut()
            .filter(|v| v.receiver_id == receiver)
        {
            if notification.status == NotificationStatus::Wait {
                notification.status = NotificationStatus::Read;
                notification.updated = updated;
            }
            rows.push(notification.clone());
        }
        newest_first(&mut rows, |v| (v.created, v.id.0));
        Ok(rows)
    }

    #[tracing::instrument(skip_all, name = "db.notifications.delete")]
    async fn delete_notification(
        &self,
        receiver: MemberId,
        id: NotificationId,
    ) -> Result<Option<Notification>> {
        let mut tables = self.tables.write().await;
        let position = tables
            .notifications
            .iter()
            .position(|v| v.id == id && v.receiver_id == receiver);
        Ok(position.map(|index| tables.notifications.remove(index)))
    }
}
