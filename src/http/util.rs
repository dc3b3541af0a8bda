use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{web, Error as ActixError};
use tracing::{Level, Span};
use tracing_actix_web::{DefaultRootSpanBuilder, RootSpanBuilder};

use crate::error::{Error, ErrorCategory};

/// Request spans at `DEBUG` so they stay out of production logs.
pub struct QuieterRootSpanBuilder;

impl RootSpanBuilder for QuieterRootSpanBuilder {
    fn on_request_start(request: &ServiceRequest) -> Span {
        tracing_actix_web::root_span!(level = Level::DEBUG, request)
    }

    fn on_request_end<B: MessageBody>(span: Span, outcome: &Result<ServiceResponse<B>, ActixError>) {
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}

fn invalid_request(message: String) -> ActixError {
    Error::new(ErrorCategory::InvalidRequest)
        .with_message(message)
        .into()
}

/// Malformed bodies answer in the same shape as every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| invalid_request(err.to_string()))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| invalid_request(err.to_string()))
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| invalid_request(err.to_string()))
}
