//! Notification fan-out.
//!
//! Notifications are sent after the mutation that caused them has
//! already succeeded, so a failed delivery never fails the mutation. It
//! is logged and counted in the returned [`Delivery`] instead.
use crate::model::{
    Article, Comment, Equipment, InsertNotification, Member, MemberId, NotificationGroup,
    NotificationKind, Property, TargetGroup,
};
use crate::App;

/// Outcome of a fan-out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub failed: usize,
}

impl Delivery {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Sends notifications one after another, in order.
async fn deliver(app: &App, forms: impl IntoIterator<Item = InsertNotification>) -> Delivery {
    let mut delivery = Delivery::default();
    for form in forms {
        match app.data.insert_notification(&form).await {
            Ok(..) => delivery.delivered += 1,
            Err(error) => {
                tracing::warn!(
                    ?error,
                    kind = ?form.kind,
                    receiver = %form.receiver_id,
                    "could not deliver notification"
                );
                delivery.failed += 1;
            }
        }
    }
    delivery
}

/// An entity that was just created.
#[derive(Debug, Clone, Copy)]
pub enum Created<'a> {
    Property(&'a Property),
    Equipment(&'a Equipment),
    Article(&'a Article),
}

impl Created<'_> {
    fn notification(self, author: &Member) -> InsertNotification {
        let kind = NotificationKind::Create;
        match self {
            Self::Property(property) => {
                let mut form = InsertNotification::new(
                    kind,
                    NotificationGroup::Property,
                    author.id,
                    author.id,
                    format!("{} created a new property: {}", author.nick, property.title),
                )
                .description("Check out the new property.");
                form.property_id = Some(property.id);
                form
            }
            Self::Equipment(equipment) => {
                let mut form = InsertNotification::new(
                    kind,
                    NotificationGroup::Equipment,
                    author.id,
                    author.id,
                    format!("{} created a new equipment: {}", author.nick, equipment.title),
                )
                .description("Check the new equipment.");
                form.equipment_id = Some(equipment.id);
                form
            }
            Self::Article(article) => {
                let mut form = InsertNotification::new(
                    kind,
                    NotificationGroup::Article,
                    author.id,
                    author.id,
                    format!("{} created a new article: {}", author.nick, article.title),
                )
                .description("Check the new article.");
                form.article_id = Some(article.id);
                form
            }
        }
    }
}

/// Tells every follower of `author` about a new entity.
#[tracing::instrument(skip_all, name = "services.notifications.followers_of_create", fields(
    author.id = %author.id,
))]
pub async fn notify_followers_of_create(
    app: &App,
    author: &Member,
    created: Created<'_>,
) -> Delivery {
    let followers = match app.data.follower_ids(author.id).await {
        Ok(followers) => followers,
        Err(error) => {
            tracing::warn!(?error, "could not load followers, skipping notifications");
            return Delivery::default();
        }
    };

    let template = created.notification(author);
    deliver(app, followers.into_iter().map(|id| template.clone().to(id))).await
}

/// An entity that was just liked.
#[derive(Debug, Clone, Copy)]
pub enum Liked<'a> {
    Member(&'a Member),
    Property(&'a Property),
    Article(&'a Article),
    Equipment(&'a Equipment),
}

impl Liked<'_> {
    #[must_use]
    pub fn owner(self) -> MemberId {
        match self {
            Self::Member(member) => member.id,
            Self::Property(property) => property.member_id,
            Self::Article(article) => article.member_id,
            Self::Equipment(equipment) => equipment.member_id,
        }
    }

    fn notification(self, liker: &Member) -> InsertNotification {
        let nick = &liker.nick;
        let (group, title) = match self {
            Self::Member(..) => (NotificationGroup::Member, format!("{nick} liked you!")),
            Self::Property(v) => (
                NotificationGroup::Property,
                format!("{nick} liked your {} property!", v.title),
            ),
            Self::Article(v) => (
                NotificationGroup::Article,
                format!("{nick} liked your {} board article!", v.title),
            ),
            Self::Equipment(v) => (
                NotificationGroup::Equipment,
                format!("{nick} liked your {} equipment!", v.title),
            ),
        };

        let mut form =
            InsertNotification::new(NotificationKind::Like, group, liker.id, self.owner(), title)
                .description("Check out the new like.");

        match self {
            Self::Property(v) => form.property_id = Some(v.id),
            Self::Article(v) => form.article_id = Some(v.id),
            Self::Equipment(v) => form.equipment_id = Some(v.id),
            Self::Member(..) => {}
        }
        form
    }
}

/// Tells the owner about a like. Unlikes (`modifier` of `-1`) are silent.
#[tracing::instrument(skip(app, liker, liked), name = "services.notifications.like")]
pub async fn notify_on_like(
    app: &App,
    liker: &Member,
    liked: Liked<'_>,
    modifier: i64,
) -> Delivery {
    if modifier != 1 {
        return Delivery::default();
    }
    deliver(app, [liked.notification(liker)]).await
}

/// Tells `receiver`, the owner of the commented entity, about a comment.
#[tracing::instrument(skip_all, name = "services.notifications.comment", fields(
    comment.id = %comment.id,
))]
pub async fn notify_on_comment(
    app: &App,
    author: &Member,
    comment: &Comment,
    receiver: MemberId,
) -> Delivery {
    let mut form = InsertNotification::new(
        NotificationKind::Comment,
        NotificationGroup::Comment,
        author.id,
        receiver,
        format!("{} commented: {}!", author.nick, comment.content),
    )
    .description("Check out the new comment.");

    match comment.group {
        TargetGroup::Property => form.property_id = Some(comment.ref_id.into()),
        TargetGroup::Article => form.article_id = Some(comment.ref_id.into()),
        TargetGroup::Equipment => form.equipment_id = Some(comment.ref_id.into()),
        TargetGroup::Member => {}
    }

    deliver(app, [form]).await
}

#[tracing::instrument(skip_all, name = "services.notifications.follow")]
pub async fn notify_on_follow(app: &App, follower: &Member, following: MemberId) -> Delivery {
    let form = InsertNotification::new(
        NotificationKind::Follow,
        NotificationGroup::Member,
        follower.id,
        following,
        format!("{} started following you", follower.nick),
    )
    .description("Check your new follower.");

    deliver(app, [form]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NotificationStatus;
    use crate::test_utils;

    #[tokio::test]
    async fn unlike_sends_nothing() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let bob = test_utils::members::register(&app, "bob").await;

        let delivery = notify_on_like(&app, &alice, Liked::Member(&bob), -1).await;
        assert_eq!(delivery, Delivery::default());

        let delivery = notify_on_like(&app, &alice, Liked::Member(&bob), 1).await;
        assert_eq!(delivery.delivered, 1);

        let list = app.data.list_notifications(bob.id, None).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "alice liked you!");
        assert_eq!(list[0].kind, NotificationKind::Like);
        assert_eq!(list[0].status, NotificationStatus::Wait);
    }

    #[tokio::test]
    async fn failed_delivery_is_counted_not_raised() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;

        let delivery = notify_on_follow(&app, &alice, MemberId(9999)).await;
        assert_eq!(delivery.delivered, 0);
        assert_eq!(delivery.failed, 1);
        assert!(!delivery.is_complete());
    }

    #[tokio::test]
    async fn create_without_followers_is_a_no_op() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let article = app
            .data
            .insert_article(alice.id, &test_utils::forms::article("hello"))
            .await
            .unwrap();

        let delivery = notify_followers_of_create(&app, &alice, Created::Article(&article)).await;
        assert_eq!(delivery, Delivery::default());
    }
}
