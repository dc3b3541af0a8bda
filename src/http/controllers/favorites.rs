use actix_web::{web, HttpResponse};

use crate::error::Error;
use crate::model::PageRequest;
use crate::services::favorites::{GetFavorites, GetVisited};
use crate::{Actor, App};

#[tracing::instrument(skip(app))]
pub async fn liked(
    app: web::Data<App>,
    actor: Actor,
    page: web::Query<PageRequest>,
) -> Result<HttpResponse, Error> {
    let request = GetFavorites {
        page: page.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn visited(
    app: web::Data<App>,
    actor: Actor,
    page: web::Query<PageRequest>,
) -> Result<HttpResponse, Error> {
    let request = GetVisited {
        page: page.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}
