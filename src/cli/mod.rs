use clap::Parser;
use error_stack::{Result, ResultExt};
use thiserror::Error;

mod migrate;
mod server;

#[derive(Debug, Error)]
#[error("VenueHub command failed")]
pub struct CliError;

/// Command line options for VenueHub.
#[derive(Debug, Parser)]
#[command(about = "Utility suite for the VenueHub backend", version, long_about)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

impl Cli {
    pub fn run(self) -> Result<(), CliError> {
        match self.subcommand {
            Subcommand::Server(args) => self::server::run(args).change_context(CliError),
            Subcommand::Migrate(args) => self::migrate::run(args).change_context(CliError),
        }
    }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    Server(self::server::ServerCommand),
    Migrate(self::migrate::MigrateCommand),
}
