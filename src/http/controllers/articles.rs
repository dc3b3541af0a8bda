use actix_web::{web, HttpResponse};

use super::ListInput;
use crate::error::Error;
use crate::model::article::{ArticleFilter, InsertArticle, UpdateArticle};
use crate::model::ArticleId;
use crate::services::articles::{
    CreateArticle, GetArticle, GetArticles, LikeArticle, UpdateBoardArticle,
};
use crate::{Actor, App};

#[tracing::instrument(skip(app))]
pub async fn create(
    app: web::Data<App>,
    actor: Actor,
    form: web::Json<InsertArticle>,
) -> Result<HttpResponse, Error> {
    let request = CreateArticle {
        form: form.into_inner(),
    };
    Ok(HttpResponse::Created().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn get(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<ArticleId>,
) -> Result<HttpResponse, Error> {
    let request = GetArticle {
        id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn update(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<ArticleId>,
    form: web::Json<UpdateArticle>,
) -> Result<HttpResponse, Error> {
    let request = UpdateBoardArticle {
        id: path.into_inner(),
        form: form.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn search(
    app: web::Data<App>,
    actor: Actor,
    input: web::Json<ListInput<ArticleFilter>>,
) -> Result<HttpResponse, Error> {
    let input = input.into_inner();
    let request = GetArticles {
        filter: input.search,
        page: input.page,
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}

#[tracing::instrument(skip(app))]
pub async fn like(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<ArticleId>,
) -> Result<HttpResponse, Error> {
    let request = LikeArticle {
        id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(request.perform(&app, &actor).await?))
}
