use actix_web::{web, HttpResponse};

use super::ListInput;
use crate::error::Error;
use crate::model::notice::{InsertNotice, NoticeFilter};
use crate::services::notices::{CreateNotice, GetNotices};
use crate::{Actor, App};

#[tracing::instrument(skip(app))]
pub async fn create(
    app: web::Data<App>,
    actor: Actor,
    form: web::Json<InsertNotice>,
) -> Result<HttpResponse, Error> {
    let request = CreateNotice {
        form: form.into_inner(),
    };
    Ok(HttpResponse::Created().json(request.perform(&app, &actor).await?))
}

/// Notices are public, so no actor is taken here.
#[tracing::instrument(skip(app))]
pub async fn search(
    app: web::Data<App>,
    input: web::Json<ListInput<NoticeFilter>>,
) -> Result<HttpResponse, Error> {
    let input = input.into_inner();
    let request = GetNotices {
        filter: input.search,
        page: input.page,
    };
    Ok(HttpResponse::Ok().json(request.perform(&app).await?))
}
