use error_stack::{Report, ResultExt};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow, PgSslMode};
use sqlx::{FromRow, PgConnection, Postgres, QueryBuilder};
use std::{str::FromStr, time::Duration};

use super::{Error, ErrorExt, ErrorExt2, Result};
use crate::config;
use crate::model::{PageRequest, Paginated, Sort};

mod articles;
mod comments;
mod equipment;
mod members;
mod notices;
mod notifications;
mod properties;
mod social;
mod store;

pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Postgres>;

#[derive(Clone)]
pub struct Pool {
    pool: sqlx::PgPool,
}

impl Pool {
    pub(crate) async fn new(
        global_cfg: &config::Database,
        pool_cfg: &config::DbPoolConfig,
    ) -> Result<Self> {
        let mut pool_opts = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(global_cfg.timeout_secs.get()))
            .max_connections(pool_cfg.pool_size.get());

        if let Some(min_idle) = pool_cfg.min_idle {
            pool_opts = pool_opts.min_connections(min_idle.get());
        }

        let mut connect_opts =
            PgConnectOptions::from_str(&pool_cfg.url).change_context(Error::InvalidUrl)?;

        if global_cfg.enforce_tls {
            connect_opts = connect_opts.ssl_mode(PgSslMode::Prefer);
        }

        let pool = Self {
            pool: pool_opts.connect_lazy_with(connect_opts),
        };

        match pool.wait_until_healthy().await {
            Ok(..) => {}
            Err(err) if err.is_unhealthy() => {
                tracing::warn!("database is not reachable yet, connecting lazily");
            }
            Err(err) => return Err(err),
        }

        Ok(pool)
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.pool.fmt(f)
    }
}

impl Pool {
    #[inline(always)]
    pub fn connections(&self) -> u32 {
        self.pool.size()
    }

    #[inline(always)]
    pub fn is_healthy(&self) -> bool {
        self.connections() > 0
    }

    #[tracing::instrument(name = "db.connect", skip(self))]
    pub async fn get(&self) -> Result<PoolConnection> {
        if let Some(inner) = self.pool.try_acquire() {
            Ok(inner)
        } else if !self.is_healthy() {
            Err(Error::UnhealthyPool.into())
        } else {
            let result = self.pool.acquire().await;
            result.map_err(|e| Report::new(Error::Internal(e)))
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn wait_until_healthy(&self) -> Result<()> {
        match self.pool.acquire().await {
            Ok(..) => Ok(()),
            Err(e) if !self.is_healthy() => Err(e).change_context(Error::UnhealthyPool),
            Err(err) => Err(Report::new(Error::Internal(err))),
        }
    }
}

/// Postgres backed store. Writes always go to the primary pool; reads
/// prefer the replica and fall back to the primary when the replica is
/// unhealthy.
#[derive(Debug, Clone)]
pub struct PgData {
    primary: Pool,
    replica: Option<Pool>,
}

impl PgData {
    #[tracing::instrument(skip_all, name = "db.connect_all")]
    pub async fn connect(cfg: &config::Database) -> Result<Self> {
        let primary = Pool::new(cfg, &cfg.primary).await?;
        let replica = match cfg.replica.as_ref() {
            Some(replica) => Some(Pool::new(cfg, replica).await?),
            None => None,
        };
        Ok(Self { primary, replica })
    }

    /// Applies every pending migration to the primary database.
    #[tracing::instrument(skip_all, name = "db.migrate")]
    pub async fn migrate(&self) -> Result<()> {
        let mut conn = self.write().await?;
        sqlx::migrate!("./migrations")
            .run(&mut *conn)
            .await
            .change_context(Error::Migration)
    }

    async fn write(&self) -> Result<PoolConnection> {
        self.primary.get().await
    }

    async fn read(&self) -> Result<PoolConnection> {
        if let Some(replica) = self.replica.as_ref() {
            match replica.get().await {
                Ok(conn) => return Ok(conn),
                Err(err) if err.is_unhealthy() => {
                    tracing::warn!("replica database is unhealthy, reading from primary");
                }
                Err(err) => return Err(err),
            }
        }
        self.primary.get().await
    }
}

/// Columns a listing may be ordered by. Anything else falls back to
/// the creation time.
fn order_column(sort: Sort, sortable: &[Sort]) -> &'static str {
    if !sortable.contains(&sort) {
        return "created";
    }
    match sort {
        Sort::Created => "created",
        Sort::Updated => "updated",
        Sort::Views => "views",
        Sort::Likes => "likes",
        Sort::Rank => "rank",
        Sort::RentPrice => "rent_price",
    }
}

fn push_order(qb: &mut QueryBuilder<'_, Postgres>, page: &PageRequest, sortable: &[Sort]) {
    let direction = page.direction.as_sql();
    let column = order_column(page.sort, sortable);

    qb.push(format_args!(" ORDER BY {column} {direction}"));
    if !matches!(column, "created" | "updated") {
        qb.push(format_args!(", created {direction}"));
    }
    qb.push(format_args!(", id {direction} LIMIT "));
    qb.push_bind(i64::from(page.limit));
    qb.push(" OFFSET ");
    qb.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
}

/// Runs a filtered listing twice: once for the total and once for the
/// requested page. `filter` appends `AND ...` clauses.
async fn fetch_page<T>(
    conn: &mut PgConnection,
    table: &str,
    filter: impl Fn(&mut QueryBuilder<'_, Postgres>),
    page: &PageRequest,
    sortable: &[Sort],
) -> Result<Paginated<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {table} WHERE TRUE"));
    filter(&mut qb);
    let total = qb
        .build_query_scalar::<i64>()
        .fetch_one(&mut *conn)
        .await
        .into_db_error()?;

    let mut qb = QueryBuilder::new(format!("SELECT * FROM {table} WHERE TRUE"));
    filter(&mut qb);
    push_order(&mut qb, page, sortable);
    let list = qb.build_query_as::<T>().fetch_all(conn).await.into_db_error()?;

    Ok(Paginated {
        list,
        total: u64::try_from(total).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;

    #[test]
    fn unsupported_sort_falls_back_to_created() {
        assert_eq!(order_column(Sort::RentPrice, &[Sort::Views]), "created");
        assert_eq!(order_column(Sort::Views, &[Sort::Views]), "views");
    }

    #[test]
    fn page_order_has_stable_tie_breakers() {
        let page = PageRequest::new(3, 20).sorted(Sort::Likes, Direction::Asc);
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM properties WHERE TRUE");
        push_order(&mut qb, &page, &[Sort::Likes]);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM properties WHERE TRUE ORDER BY likes ASC, created ASC, id ASC LIMIT $1 OFFSET $2"
        );
    }
}
