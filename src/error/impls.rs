use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::Report;

use super::{Error, ErrorCategory};
use crate::database;

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.category {
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::CreateFailed
            | ErrorCategory::UpdateFailed
            | ErrorCategory::RemoveFailed
            | ErrorCategory::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCategory::SelfSubscriptionDenied | ErrorCategory::NotAllowed => {
                StatusCode::FORBIDDEN
            }
            ErrorCategory::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCategory::ReadonlyMode => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        if self.category == ErrorCategory::Internal {
            tracing::error!(error = ?self, "internal error occurred");
        }
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

impl From<Report<database::Error>> for Error {
    fn from(value: Report<database::Error>) -> Self {
        match value.current_context() {
            database::Error::Readonly => Error::from_report(ErrorCategory::ReadonlyMode, value),
            database::Error::Conflict => Error::from_report(ErrorCategory::CreateFailed, value),
            database::Error::MissingReference => {
                Error::from_report(ErrorCategory::NotFound, value)
            }
            _ => Error::from_report(ErrorCategory::Internal, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn maps_categories_to_status_codes() {
        let cases = [
            (ErrorCategory::NotFound, StatusCode::NOT_FOUND),
            (ErrorCategory::CreateFailed, StatusCode::BAD_REQUEST),
            (ErrorCategory::SelfSubscriptionDenied, StatusCode::FORBIDDEN),
            (ErrorCategory::Unauthorized, StatusCode::UNAUTHORIZED),
            (ErrorCategory::ReadonlyMode, StatusCode::SERVICE_UNAVAILABLE),
            (ErrorCategory::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (category, status) in cases {
            assert_eq!(Error::new(category).status_code(), status);
        }
    }

    #[test]
    fn database_conflict_becomes_create_failed() {
        let error = Error::from(Report::new(database::Error::Conflict));
        assert_eq!(error.category(), ErrorCategory::CreateFailed);

        let error = Error::from(Report::new(database::Error::Readonly));
        assert_eq!(error.category(), ErrorCategory::ReadonlyMode);

        let error = Error::from(Report::new(database::Error::UnhealthyPool));
        assert_eq!(error.category(), ErrorCategory::Internal);
    }
}
