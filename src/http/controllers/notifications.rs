use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::Error;
use crate::model::{NotificationId, NotificationStatus};
use crate::services::notifications::{
    DeleteNotification, GetNotifications, MarkAllNotificationsRead, MarkNotificationRead,
};
use crate::{Actor, App};

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<NotificationStatus>,
}

#[tracing::instrument(skip(app))]
pub async fn list(
    app: web::Data<App>,
    actor: Actor,
    query: web::Query<StatusQuery>,
) -> Result<HttpResponse, Error> {
    let request = GetNotifications {
        status: query.into_inner().status,
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn mark_read(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<NotificationId>,
) -> Result<HttpResponse, Error> {
    let request = MarkNotificationRead {
        id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn mark_all_read(app: web::Data<App>, actor: Actor) -> Result<HttpResponse, Error> {
    let updated = MarkAllNotificationsRead.perform(&app, &actor).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[tracing::instrument(skip(app))]
pub async fn delete(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<NotificationId>,
) -> Result<HttpResponse, Error> {
    let request = DeleteNotification {
        id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}
