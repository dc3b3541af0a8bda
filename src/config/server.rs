use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;

use super::{InvalidValue, Logging, ParseError};
use crate::util::figment::FigmentErrorAttachable;

#[derive(Debug, Deserialize)]
pub struct Server {
    /// **Environment variable**: `VENUEHUB_IP`
    #[serde(default = "Server::default_ip")]
    pub ip: IpAddr,
    /// **Environment variable**: `VENUEHUB_PORT`
    #[serde(default = "Server::default_port")]
    pub port: u16,
    /// Amount of HTTP workers. Defaults to the available cores,
    /// capped at 4.
    ///
    /// **Environment variable**: `VENUEHUB_WORKERS`
    #[serde(default = "Server::default_workers")]
    pub workers: usize,
    /// Without a database section the server keeps everything in
    /// memory, which is only useful for development.
    #[serde(default)]
    pub db: Option<super::Database>,
    #[serde(default)]
    pub logging: Logging,
}

impl Server {
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment()
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config.validate().change_context(ParseError)?;
        Ok(config)
    }

    /// In-memory configuration with defaults everywhere.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            ip: Self::default_ip(),
            port: Self::default_port(),
            workers: 1,
            db: None,
            logging: Logging::default(),
        }
    }

    fn validate(&self) -> std::result::Result<(), InvalidValue> {
        if self.workers == 0 {
            return Err(InvalidValue {
                field: "workers",
                reason: "must be at least 1",
            });
        }
        if let Some(db) = self.db.as_ref() {
            db.validate()?;
        }
        Ok(())
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "venuehub.toml";
    const DEFAULT_PORT: u16 = 8080;
    const MAX_DEFAULT_WORKERS: usize = 4;

    const fn default_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    const fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    fn default_workers() -> usize {
        std::thread::available_parallelism()
            .map_or(1, NonZeroUsize::get)
            .min(Self::MAX_DEFAULT_WORKERS)
    }

    /// Creates the [`Figment`] the server configuration is loaded
    /// from. Exposed to the crate for tests.
    ///
    /// [`Figment`]: figment::Figment
    pub(crate) fn figment() -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            // Fields with underscores in their names have to be mapped
            // by hand, everything else splits on `_`.
            .merge(Env::prefixed("VENUEHUB_").map(|v| match v.as_str() {
                "DB_PRIMARY_MIN_IDLE" => "db.primary.min_idle".into(),
                "DB_PRIMARY_POOL_SIZE" => "db.primary.pool_size".into(),

                "DB_REPLICA_MIN_IDLE" => "db.replica.min_idle".into(),
                "DB_REPLICA_POOL_SIZE" => "db.replica.pool_size".into(),

                "DB_ENFORCE_TLS" => "db.enforce_tls".into(),
                "DB_TIMEOUT_SECS" => "db.timeout_secs".into(),

                _ => v.as_str().replace('_', ".").into(),
            }))
            // Environment variable aliases
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL"])
                    .map(|_| "db.primary.url".into()),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingStyle;
    use figment::Jail;
    use std::num::{NonZeroU32, NonZeroU64};

    #[test]
    fn env_aliases() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "postgres://localhost/venuehub");

            jail.set_env("VENUEHUB_DB_PRIMARY_MIN_IDLE", "100");
            jail.set_env("VENUEHUB_DB_PRIMARY_POOL_SIZE", "100");

            jail.set_env("VENUEHUB_DB_REPLICA_URL", "postgres://replica/venuehub");
            jail.set_env("VENUEHUB_DB_REPLICA_MIN_IDLE", "589");
            jail.set_env("VENUEHUB_DB_REPLICA_POOL_SIZE", "589");

            jail.set_env("VENUEHUB_DB_ENFORCE_TLS", "false");
            jail.set_env("VENUEHUB_DB_TIMEOUT_SECS", "3030");
            jail.set_env("VENUEHUB_LOGGING_STYLE", "json");

            let config: Server = Server::figment().extract()?;
            let db = config.db.as_ref().unwrap();
            assert_eq!(db.primary.url, "postgres://localhost/venuehub");
            assert_eq!(db.primary.min_idle, NonZeroU32::new(100));
            assert_eq!(db.primary.pool_size, NonZeroU32::new(100).unwrap());

            let replica = db.replica.as_ref().unwrap();
            assert_eq!(replica.url, "postgres://replica/venuehub");
            assert_eq!(replica.min_idle, NonZeroU32::new(589));
            assert_eq!(replica.pool_size, NonZeroU32::new(589).unwrap());

            assert!(!db.enforce_tls);
            assert_eq!(db.timeout_secs, NonZeroU64::new(3030).unwrap());
            assert_eq!(config.logging.style, LoggingStyle::Json);
            assert!(config.validate().is_ok());

            Ok(())
        });
    }

    #[test]
    fn reads_config_file_and_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "venuehub.toml",
                r#"
                port = 9000

                [logging]
                style = "full"
                targets = "venuehub=trace"
                "#,
            )?;

            let config: Server = Server::figment().extract()?;
            assert_eq!(config.port, 9000);
            assert_eq!(config.ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
            assert!(config.workers >= 1);
            assert!(config.db.is_none());
            assert_eq!(config.logging.style, LoggingStyle::Full);
            assert_eq!(config.logging.targets.as_deref(), Some("venuehub=trace"));

            Ok(())
        });
    }

    #[test]
    fn rejects_invalid_database_url() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "hello world!");

            let config: Server = Server::figment().extract()?;
            assert!(config.validate().is_err());

            Ok(())
        });
    }
}
