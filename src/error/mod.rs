use error_stack::{Context, Report};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;
use tracing_error::SpanTrace;

mod impls;

pub type Result<T> = std::result::Result<T, Error>;

/// Category of a failed operation. This is what clients see and
/// branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Internal,
    NotFound,
    CreateFailed,
    UpdateFailed,
    RemoveFailed,
    SelfSubscriptionDenied,
    NotAllowed,
    InvalidRequest,
    Unauthorized,
    ReadonlyMode,
}

impl ErrorCategory {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Internal => "Something went wrong!",
            Self::NotFound => "No data is found!",
            Self::CreateFailed => "Create is failed!",
            Self::UpdateFailed => "Update is failed!",
            Self::RemoveFailed => "Remove failed!",
            Self::SelfSubscriptionDenied => "You can not subscribe yourself!",
            Self::NotAllowed => "You cannot make a request",
            Self::InvalidRequest => "Bad request",
            Self::Unauthorized => "You are not authenticated, please login first!",
            Self::ReadonlyMode => "Service is currently in read-only mode",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Every report carried by [`Error`] ends in this context so that
/// reports of different origins can live in the same type.
#[derive(Debug, Error)]
#[error("service operation failed")]
pub struct ServiceFailure;

pub struct Error {
    category: ErrorCategory,
    message: Option<Cow<'static, str>>,
    report: Report<ServiceFailure>,
    trace: SpanTrace,
}

impl Error {
    #[must_use]
    pub fn from_context(category: ErrorCategory, context: impl Context) -> Self {
        Self::from_report(category, Report::new(context))
    }

    #[must_use]
    pub fn from_report(category: ErrorCategory, report: Report<impl Context>) -> Self {
        Self {
            category,
            message: None,
            report: report.change_context(ServiceFailure),
            trace: SpanTrace::capture(),
        }
    }

    /// Shorthand for errors whose category says it all.
    #[must_use]
    pub fn new(category: ErrorCategory) -> Self {
        #[derive(Debug, Error)]
        #[error("{0}")]
        struct Plain(ErrorCategory);
        Self::from_context(category, Plain(category))
    }
}

impl Error {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    /// Client facing message. Defaults to the category's message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.category.message())
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn change_category(mut self, category: ErrorCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn downcast_ref<F: Context>(&self) -> Option<&F> {
        self.report.downcast_ref::<F>()
    }

    #[must_use]
    pub fn report(&self) -> &Report<ServiceFailure> {
        &self.report
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("category", &self.category)
            .field("message", &self.message())
            .field("report", &self.report)
            .field("trace", &self.trace)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message())?;
        writeln!(f, "{:?}", self.report)?;
        fmt::Display::fmt(&self.trace, f)
    }
}

/// Wire form of an [`Error`].
#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorBody<'a> {
    #[serde(rename = "type")]
    pub category: ErrorCategory,
    #[serde(borrow)]
    pub message: Cow<'a, str>,
}

impl Error {
    #[must_use]
    pub fn body(&self) -> ErrorBody<'_> {
        ErrorBody {
            category: self.category,
            message: Cow::Borrowed(self.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::Token;

    #[test]
    fn category_uses_snake_case() {
        serde_test::assert_tokens(
            &ErrorCategory::SelfSubscriptionDenied,
            &[Token::UnitVariant {
                name: "ErrorCategory",
                variant: "self_subscription_denied",
            }],
        );
    }

    #[test]
    fn body_defaults_to_category_message() {
        let error = Error::new(ErrorCategory::NotFound);
        serde_test::assert_ser_tokens(
            &error.body(),
            &[
                Token::Struct {
                    name: "ErrorBody",
                    len: 2,
                },
                Token::Str("type"),
                Token::UnitVariant {
                    name: "ErrorCategory",
                    variant: "not_found",
                },
                Token::Str("message"),
                Token::Str("No data is found!"),
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn custom_message_overrides_default() {
        let error = Error::new(ErrorCategory::RemoveFailed).with_message("Delete failed!");
        assert_eq!(error.message(), "Delete failed!");
        assert_eq!(error.category(), ErrorCategory::RemoveFailed);
    }
}
