use actix_web::{web, HttpResponse};

use crate::error::Error;
use crate::model::comment::{InsertComment, UpdateComment};
use crate::model::{CommentId, PageRequest, Target, TargetGroup};
use crate::services::comments::{CreateComment, GetComments, UpdateCommentContent};
use crate::{Actor, App};

#[tracing::instrument(skip(app))]
pub async fn create(
    app: web::Data<App>,
    actor: Actor,
    form: web::Json<InsertComment>,
) -> Result<HttpResponse, Error> {
    let request = CreateComment {
        form: form.into_inner(),
    };
    Ok(HttpResponse::Created().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn update(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<CommentId>,
    form: web::Json<UpdateComment>,
) -> Result<HttpResponse, Error> {
    let request = UpdateCommentContent {
        id: path.into_inner(),
        form: form.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn list(
    app: web::Data<App>,
    path: web::Path<(TargetGroup, i64)>,
    page: web::Query<PageRequest>,
) -> Result<HttpResponse, Error> {
    let (group, ref_id) = path.into_inner();
    let request = GetComments {
        target: Target::new(group, ref_id),
        page: page.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app).await?))
}
