use crate::error::{Error, ErrorCategory};
use crate::App;

use std::fmt::Debug;

pub mod forms;
pub mod members;

/// Builds an app backed by a fresh in-memory store.
#[must_use]
pub fn build_test_app() -> App {
    crate::logging::init_for_tests();
    App::for_tests()
}

pub trait TestResultExt {
    /// Serializes the error into its wire form.
    ///
    /// ## Panics
    /// It will panic if the result is [`Ok`].
    fn expect_error_json(self) -> serde_json::Value;

    /// ## Panics
    /// It will panic if the result is [`Ok`].
    fn expect_error_category(self) -> ErrorCategory;
}

impl<T: Debug> TestResultExt for std::result::Result<T, Error> {
    fn expect_error_json(self) -> serde_json::Value {
        match self {
            Ok(okay) => panic!("unexpected value Ok({okay:?}), expected error"),
            Err(error) => serde_json::to_value(error.body()).unwrap(),
        }
    }

    fn expect_error_category(self) -> ErrorCategory {
        match self {
            Ok(okay) => panic!("unexpected value Ok({okay:?}), expected error"),
            Err(error) => error.category(),
        }
    }
}
