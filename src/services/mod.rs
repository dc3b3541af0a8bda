//! Every operation the API offers is a request struct here with a
//! `perform` method taking the [`App`](crate::App) and the acting
//! member.
//!
//! Mutations run their steps in order: the entity write, then the
//! counter adjustments, then notification fan-out. The steps are not
//! wrapped in a transaction.
pub mod articles;
pub mod comments;
pub mod equipment;
pub mod favorites;
pub mod follows;
pub mod likes;
pub mod members;
pub mod notices;
pub mod notifications;
pub mod properties;
pub mod stats;
pub mod views;

mod util;
