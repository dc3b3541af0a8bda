use actix_web::{web, HttpServer};
use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::{config, App};

pub mod actor;
pub mod controllers;
pub mod util;

#[derive(Debug, Error)]
#[error("Could not start the VenueHub server")]
pub struct StartServerError;

/// Registers the extractor configs and every route under `/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(util::json_config())
        .app_data(util::query_config())
        .app_data(util::path_config())
        .service(web::scope("/v1").configure(controllers::configure));
}

#[tracing::instrument(skip_all, name = "server.run", fields(
    server.ip = %config.ip,
    server.port = %config.port,
    workers = %config.workers,
))]
pub async fn serve(config: config::Server) -> Result<(), StartServerError> {
    let (ip, port, workers) = (config.ip, config.port, config.workers);
    let app = App::new(config)
        .await
        .change_context(StartServerError)?;

    let server = HttpServer::new(move || {
        actix_web::App::new()
            .app_data(web::Data::new(app.clone()))
            .wrap(TracingLogger::<util::QuieterRootSpanBuilder>::new())
            .configure(configure)
    })
    .workers(workers)
    .bind((ip, port))
    .change_context(StartServerError)
    .attach_printable("could not bind server with address and port")?;

    info!("VenueHub server is listening at http://{ip}:{port}");
    server.run().await.change_context(StartServerError)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use serde_json::json;

    use super::*;
    use crate::http::actor::MEMBER_ID_HEADER;
    use crate::model::member::MemberKind;
    use crate::services::properties::CreateProperty;
    use crate::test_utils;

    #[actix_web::test]
    async fn serves_the_versioned_api() {
        let app = test_utils::build_test_app();
        let agent = test_utils::members::register_as(&app, "seller", MemberKind::Agent).await;
        let service = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::new(app.clone()))
                .configure(configure),
        )
        .await;

        let property = CreateProperty {
            form: test_utils::forms::property("Harbor loft"),
        }
        .perform(&app, &test_utils::members::actor(&agent))
        .await
        .unwrap();

        let req = TestRequest::get()
            .uri(&format!("/v1/properties/{}", property.id))
            .insert_header((MEMBER_ID_HEADER, agent.id.to_string()))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::post()
            .uri("/v1/properties/search")
            .set_json(json!({ "page": 1, "limit": 10 }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(body["total"], json!(1));
    }

    #[actix_web::test]
    async fn anonymous_writes_are_rejected() {
        let app = test_utils::build_test_app();
        let service = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::new(app))
                .configure(configure),
        )
        .await;

        let req = TestRequest::post()
            .uri("/v1/articles")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert!(resp.status().is_client_error());

        let req = TestRequest::get()
            .uri("/v1/members/1")
            .insert_header((MEMBER_ID_HEADER, "not-a-number"))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
