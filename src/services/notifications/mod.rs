mod fanout;

pub use self::fanout::{
    notify_followers_of_create, notify_on_comment, notify_on_follow, notify_on_like, Created,
    Delivery, Liked,
};

use crate::error::{Error, ErrorCategory, Result};
use crate::model::{Notification, NotificationId, NotificationStatus};
use crate::{Actor, App};

/// The actor's notifications, newest first.
#[derive(Debug, Default)]
pub struct GetNotifications {
    pub status: Option<NotificationStatus>,
}

impl GetNotifications {
    #[tracing::instrument(skip_all, name = "services.notifications.list")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Vec<Notification>> {
        let receiver = actor.require()?;
        Ok(app.data.list_notifications(receiver, self.status).await?)
    }
}

#[derive(Debug)]
pub struct MarkNotificationRead {
    pub id: NotificationId,
}

impl MarkNotificationRead {
    #[tracing::instrument(skip_all, name = "services.notifications.mark_read")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Notification> {
        let receiver = actor.require()?;
        app.data
            .mark_notification_read(receiver, self.id)
            .await?
            .ok_or_else(|| Error::new(ErrorCategory::NotFound))
    }
}

#[derive(Debug)]
pub struct MarkAllNotificationsRead;

impl MarkAllNotificationsRead {
    #[tracing::instrument(skip_all, name = "services.notifications.mark_all_read")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Vec<Notification>> {
        let receiver = actor.require()?;
        Ok(app.data.mark_all_notifications_read(receiver).await?)
    }
}

#[derive(Debug)]
pub struct DeleteNotification {
    pub id: NotificationId,
}

impl DeleteNotification {
    #[tracing::instrument(skip_all, name = "services.notifications.delete")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Notification> {
        let receiver = actor.require()?;
        app.data
            .delete_notification(receiver, self.id)
            .await?
            .ok_or_else(|| Error::new(ErrorCategory::RemoveFailed).with_message("Delete failed!"))
    }
}
