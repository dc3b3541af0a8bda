use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::ListInput;
use crate::error::Error;
use crate::model::equipment::{EquipmentFilter, EquipmentStatus, InsertEquipment, UpdateEquipment};
use crate::model::EquipmentId;
use crate::services::equipment::{
    CreateEquipment, GetAgentEquipments, GetEquipment, GetEquipments, LikeEquipment,
    UpdateEquipmentListing,
};
use crate::{Actor, App};

#[derive(Debug, Default, Deserialize)]
pub struct AgentEquipmentSearch {
    pub status: Option<EquipmentStatus>,
}

#[tracing::instrument(skip(app))]
pub async fn create(
    app: web::Data<App>,
    actor: Actor,
    form: web::Json<InsertEquipment>,
) -> Result<HttpResponse, Error> {
    let request = CreateEquipment {
        form: form.into_inner(),
    };
    Ok(HttpResponse::Created().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn get(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<EquipmentId>,
) -> Result<HttpResponse, Error> {
    let request = GetEquipment {
        id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn update(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<EquipmentId>,
    form: web::Json<UpdateEquipment>,
) -> Result<HttpResponse, Error> {
    let request = UpdateEquipmentListing {
        id: path.into_inner(),
        form: form.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn search(
    app: web::Data<App>,
    actor: Actor,
    input: web::Json<ListInput<EquipmentFilter>>,
) -> Result<HttpResponse, Error> {
    let input = input.into_inner();
    let request = GetEquipments {
        filter: input.search,
        page: input.page,
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn mine(
    app: web::Data<App>,
    actor: Actor,
    input: web::Json<ListInput<AgentEquipmentSearch>>,
) -> Result<HttpResponse, Error> {
    let input = input.into_inner();
    let request = GetAgentEquipments {
        status: input.search.status,
        page: input.page,
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn like(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<EquipmentId>,
) -> Result<HttpResponse, Error> {
    let request = LikeEquipment {
        id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}
