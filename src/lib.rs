pub mod actor;
pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod logging;
pub mod model;
pub mod services;
pub mod util;

#[cfg(test)]
mod test_utils;

pub use actor::Actor;
pub use app::App;
