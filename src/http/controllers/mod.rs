use actix_web::web;
use serde::Deserialize;

use crate::model::PageRequest;

pub mod admin;
pub mod articles;
pub mod comments;
pub mod equipment;
pub mod favorites;
pub mod members;
pub mod notices;
pub mod notifications;
pub mod properties;

/// Body of every listing route: paging at the top level and the
/// filters under `search`.
#[derive(Debug, Default, Deserialize)]
pub struct ListInput<F> {
    #[serde(flatten)]
    pub page: PageRequest,
    #[serde(default)]
    pub search: F,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/members")
            .route("", web::post().to(members::create))
            .route("/me", web::put().to(members::update))
            .route("/agents", web::post().to(members::agents))
            .route("/{id}", web::get().to(members::get))
            .route("/{id}/like", web::post().to(members::like))
            .route("/{id}/follow", web::post().to(members::subscribe))
            .route("/{id}/follow", web::delete().to(members::unsubscribe))
            .route("/{id}/followers", web::get().to(members::followers))
            .route("/{id}/followings", web::get().to(members::followings)),
    )
    .service(
        web::scope("/properties")
            .route("", web::post().to(properties::create))
            .route("/search", web::post().to(properties::search))
            .route("/mine", web::post().to(properties::mine))
            .route("/{id}", web::get().to(properties::get))
            .route("/{id}", web::put().to(properties::update))
            .route("/{id}/like", web::post().to(properties::like)),
    )
    .service(
        web::scope("/equipment")
            .route("", web::post().to(equipment::create))
            .route("/search", web::post().to(equipment::search))
            .route("/mine", web::post().to(equipment::mine))
            .route("/{id}", web::get().to(equipment::get))
            .route("/{id}", web::put().to(equipment::update))
            .route("/{id}/like", web::post().to(equipment::like)),
    )
    .service(
        web::scope("/articles")
            .route("", web::post().to(articles::create))
            .route("/search", web::post().to(articles::search))
            .route("/{id}", web::get().to(articles::get))
            .route("/{id}", web::put().to(articles::update))
            .route("/{id}/like", web::post().to(articles::like)),
    )
    .service(
        web::scope("/comments")
            .route("", web::post().to(comments::create))
            .route("/{id}", web::put().to(comments::update))
            .route("/{group}/{ref_id}", web::get().to(comments::list)),
    )
    .service(
        web::scope("/notices")
            .route("", web::post().to(notices::create))
            .route("/search", web::post().to(notices::search)),
    )
    .service(
        web::scope("/notifications")
            .route("", web::get().to(notifications::list))
            .route("/read", web::put().to(notifications::mark_all_read))
            .route("/{id}/read", web::put().to(notifications::mark_read))
            .route("/{id}", web::delete().to(notifications::delete)),
    )
    .service(
        web::scope("/favorites")
            .route("/liked", web::get().to(favorites::liked))
            .route("/visited", web::get().to(favorites::visited)),
    )
    .service(web::scope("/admin").configure(admin::configure));
}
