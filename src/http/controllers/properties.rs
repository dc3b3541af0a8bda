use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::ListInput;
use crate::error::Error;
use crate::model::property::{InsertProperty, PropertyFilter, PropertyStatus, UpdateProperty};
use crate::model::PropertyId;
use crate::services::properties::{
    CreateProperty, GetAgentProperties, GetProperties, GetProperty, LikeProperty,
    UpdatePropertyListing,
};
use crate::{Actor, App};

#[derive(Debug, Default, Deserialize)]
pub struct AgentPropertySearch {
    pub status: Option<PropertyStatus>,
}

#[tracing::instrument(skip(app))]
pub async fn create(
    app: web::Data<App>,
    actor: Actor,
    form: web::Json<InsertProperty>,
) -> Result<HttpResponse, Error> {
    let request = CreateProperty {
        form: form.into_inner(),
    };
    Ok(HttpResponse::Created().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn get(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<PropertyId>,
) -> Result<HttpResponse, Error> {
    let request = GetProperty {
        id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn update(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<PropertyId>,
    form: web::Json<UpdateProperty>,
) -> Result<HttpResponse, Error> {
    let request = UpdatePropertyListing {
        id: path.into_inner(),
        form: form.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn search(
    app: web::Data<App>,
    actor: Actor,
    input: web::Json<ListInput<PropertyFilter>>,
) -> Result<HttpResponse, Error> {
    let input = input.into_inner();
    let request = GetProperties {
        filter: input.search,
        page: input.page,
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn mine(
    app: web::Data<App>,
    actor: Actor,
    input: web::Json<ListInput<AgentPropertySearch>>,
) -> Result<HttpResponse, Error> {
    let input = input.into_inner();
    let request = GetAgentProperties {
        status: input.search.status,
        page: input.page,
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn like(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<PropertyId>,
) -> Result<HttpResponse, Error> {
    let request = LikeProperty {
        id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}
