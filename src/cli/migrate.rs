use clap::Parser;
use error_stack::{Report, Result, ResultExt};
use thiserror::Error;
use venuehub::config::Server as Config;
use venuehub::database::PgData;

#[derive(Debug, Error)]
#[error("Could not migrate the database")]
pub struct MigrateError;

/// Apply pending database migrations
#[derive(Debug, Parser)]
pub struct MigrateCommand {}

pub fn run(_args: MigrateCommand) -> Result<(), MigrateError> {
    let config = Config::load().change_context(MigrateError)?;
    let Some(db) = config.db else {
        return Err(Report::new(MigrateError).attach_printable("no database is configured"));
    };

    venuehub::logging::init(&config.logging).change_context(MigrateError)?;
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .change_context(MigrateError)
        .attach_printable("could not build tokio runtime")?
        .block_on(async move {
            let data = PgData::connect(&db).await.change_context(MigrateError)?;
            data.migrate().await.change_context(MigrateError)
        })
}
