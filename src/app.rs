use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::config;
use crate::database::{Data, MemoryData, PgData};

#[derive(Debug, Clone)]
pub struct App {
    pub config: Arc<config::Server>,
    pub data: Arc<dyn Data>,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
    #[tracing::instrument(skip_all)]
    pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
        let data: Arc<dyn Data> = match cfg.db.as_ref() {
            Some(db) => Arc::new(PgData::connect(db).await.change_context(AppError)?),
            None => {
                tracing::warn!("no database is configured, data is kept in memory only");
                Arc::new(MemoryData::new())
            }
        };

        Ok(Self::with_data(cfg, data))
    }

    #[must_use]
    pub fn with_data(cfg: config::Server, data: Arc<dyn Data>) -> Self {
        Self {
            config: Arc::new(cfg),
            data,
        }
    }

    /// An app backed by a fresh in-memory store.
    #[must_use]
    pub fn for_tests() -> Self {
        Self::with_data(config::Server::for_tests(), Arc::new(MemoryData::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    static_assertions::assert_impl_all!(App: Send, Sync, Clone);
}
