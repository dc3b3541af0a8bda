use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::ListInput;
use crate::error::Error;
use crate::model::member::{InsertMember, UpdateMember};
use crate::model::{MemberId, PageRequest};
use crate::services::follows::{GetFollowers, GetFollowings, Subscribe, Unsubscribe};
use crate::services::members::{CreateMember, GetAgents, GetMember, LikeMember, UpdateMemberProfile};
use crate::{Actor, App};

#[derive(Debug, Default, Deserialize)]
pub struct AgentSearch {
    pub text: Option<String>,
}

#[tracing::instrument(skip(app))]
pub async fn create(
    app: web::Data<App>,
    actor: Actor,
    form: web::Json<InsertMember>,
) -> Result<HttpResponse, Error> {
    let request = CreateMember {
        form: form.into_inner(),
    };
    let member = request.perform(&app, &actor).await?;
    Ok(HttpResponse::Created().json(member))
}

#[tracing::instrument(skip(app))]
pub async fn get(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<MemberId>,
) -> Result<HttpResponse, Error> {
    let request = GetMember {
        target: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn update(
    app: web::Data<App>,
    actor: Actor,
    form: web::Json<UpdateMember>,
) -> Result<HttpResponse, Error> {
    let request = UpdateMemberProfile {
        form: form.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn agents(
    app: web::Data<App>,
    actor: Actor,
    input: web::Json<ListInput<AgentSearch>>,
) -> Result<HttpResponse, Error> {
    let input = input.into_inner();
    let request = GetAgents {
        text: input.search.text,
        page: input.page,
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn like(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<MemberId>,
) -> Result<HttpResponse, Error> {
    let request = LikeMember {
        target: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn subscribe(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<MemberId>,
) -> Result<HttpResponse, Error> {
    let request = Subscribe {
        target: path.into_inner(),
    };
    Ok(HttpResponse::Created().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn unsubscribe(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<MemberId>,
) -> Result<HttpResponse, Error> {
    let request = Unsubscribe {
        target: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn followers(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<MemberId>,
    page: web::Query<PageRequest>,
) -> Result<HttpResponse, Error> {
    let request = GetFollowers {
        member: path.into_inner(),
        page: page.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn followings(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<MemberId>,
    page: web::Query<PageRequest>,
) -> Result<HttpResponse, Error> {
    let request = GetFollowings {
        member: path.into_inner(),
        page: page.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}
