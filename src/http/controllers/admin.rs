//! Routes reserved to administrators. The role check itself happens in
//! the services.
use actix_web::{web, HttpResponse};

use super::ListInput;
use crate::error::Error;
use crate::model::article::{ArticleFilter, UpdateArticle};
use crate::model::equipment::{EquipmentFilter, UpdateEquipment};
use crate::model::member::{MemberFilter, UpdateMember};
use crate::model::property::{PropertyFilter, UpdateProperty};
use crate::model::{ArticleId, CommentId, EquipmentId, MemberId, PropertyId};
use crate::services::articles::{GetAllArticlesByAdmin, RemoveArticleByAdmin, UpdateArticleByAdmin};
use crate::services::comments::RemoveCommentByAdmin;
use crate::services::equipment::{
    GetAllEquipmentsByAdmin, RemoveEquipmentByAdmin, UpdateEquipmentByAdmin,
};
use crate::services::members::{GetAllMembersByAdmin, UpdateMemberByAdmin};
use crate::services::properties::{
    GetAllPropertiesByAdmin, RemovePropertyByAdmin, UpdatePropertyByAdmin,
};
use crate::{Actor, App};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/members/search", web::post().to(search_members))
        .route("/members/{id}", web::put().to(update_member))
        .route("/properties/search", web::post().to(search_properties))
        .route("/properties/{id}", web::put().to(update_property))
        .route("/properties/{id}", web::delete().to(remove_property))
        .route("/equipment/search", web::post().to(search_equipments))
        .route("/equipment/{id}", web::put().to(update_equipment))
        .route("/equipment/{id}", web::delete().to(remove_equipment))
        .route("/articles/search", web::post().to(search_articles))
        .route("/articles/{id}", web::put().to(update_article))
        .route("/articles/{id}", web::delete().to(remove_article))
        .route("/comments/{id}", web::delete().to(remove_comment));
}

#[tracing::instrument(skip(app))]
async fn search_members(
    app: web::Data<App>,
    actor: Actor,
    input: web::Json<ListInput<MemberFilter>>,
) -> Result<HttpResponse, Error> {
    let input = input.into_inner();
    let request = GetAllMembersByAdmin {
        filter: input.search,
        page: input.page,
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
async fn update_member(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<MemberId>,
    form: web::Json<UpdateMember>,
) -> Result<HttpResponse, Error> {
    let request = UpdateMemberByAdmin {
        target: path.into_inner(),
        form: form.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
async fn search_properties(
    app: web::Data<App>,
    actor: Actor,
    input: web::Json<ListInput<PropertyFilter>>,
) -> Result<HttpResponse, Error> {
    let input = input.into_inner();
    let request = GetAllPropertiesByAdmin {
        filter: input.search,
        page: input.page,
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
async fn update_property(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<PropertyId>,
    form: web::Json<UpdateProperty>,
) -> Result<HttpResponse, Error> {
    let request = UpdatePropertyByAdmin {
        id: path.into_inner(),
        form: form.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
async fn remove_property(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<PropertyId>,
) -> Result<HttpResponse, Error> {
    let request = RemovePropertyByAdmin {
        id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
async fn search_equipments(
    app: web::Data<App>,
    actor: Actor,
    input: web::Json<ListInput<EquipmentFilter>>,
) -> Result<HttpResponse, Error> {
    let input = input.into_inner();
    let request = GetAllEquipmentsByAdmin {
        filter: input.search,
        page: input.page,
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
async fn update_equipment(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<EquipmentId>,
    form: web::Json<UpdateEquipment>,
) -> Result<HttpResponse, Error> {
    let request = UpdateEquipmentByAdmin {
        id: path.into_inner(),
        form: form.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
async fn remove_equipment(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<EquipmentId>,
) -> Result<HttpResponse, Error> {
    let request = RemoveEquipmentByAdmin {
        id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
async fn search_articles(
    app: web::Data<App>,
    actor: Actor,
    input: web::Json<ListInput<ArticleFilter>>,
) -> Result<HttpResponse, Error> {
    let input = input.into_inner();
    let request = GetAllArticlesByAdmin {
        filter: input.search,
        page: input.page,
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
async fn update_article(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<ArticleId>,
    form: web::Json<UpdateArticle>,
) -> Result<HttpResponse, Error> {
    let request = UpdateArticleByAdmin {
        id: path.into_inner(),
        form: form.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
async fn remove_article(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<ArticleId>,
) -> Result<HttpResponse, Error> {
    let request = RemoveArticleByAdmin {
        id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
async fn remove_comment(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<CommentId>,
) -> Result<HttpResponse, Error> {
    let request = RemoveCommentByAdmin {
        id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}
