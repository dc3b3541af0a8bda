use sqlx::{PgConnection, Postgres, QueryBuilder};

use super::fetch_page;
use crate::database::{ErrorExt, Result};
use crate::model::property::{InsertProperty, PropertyFilter, PropertyStatus, UpdateProperty};
use crate::model::{MemberId, PageRequest, Paginated, Property, PropertyId, PropertyStat, Sort};

impl Property {
    const SORTABLE: &'static [Sort] = &[
        Sort::Created,
        Sort::Updated,
        Sort::Views,
        Sort::Likes,
        Sort::Rank,
        Sort::RentPrice,
    ];

    #[tracing::instrument(skip_all, name = "db.properties.find")]
    pub async fn find(conn: &mut PgConnection, id: PropertyId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.properties.list")]
    pub async fn list(
        conn: &mut PgConnection,
        filter: &PropertyFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Self>> {
        let push_filter = |qb: &mut QueryBuilder<'_, Postgres>| {
            match filter.status {
                Some(status) => qb.push(" AND status = ").push_bind(status),
                None => qb.push(" AND status <> ").push_bind(PropertyStatus::Delete),
            };
            if let Some(member_id) = filter.member_id {
                qb.push(" AND member_id = ").push_bind(member_id);
            }
            if !filter.locations.is_empty() {
                qb.push(" AND location IN (");
                let mut list = qb.separated(", ");
                for location in &filter.locations {
                    list.push_bind(*location);
                }
                list.push_unseparated(")");
            }
            if !filter.kinds.is_empty() {
                qb.push(" AND kind IN (");
                let mut list = qb.separated(", ");
                for kind in &filter.kinds {
                    list.push_bind(*kind);
                }
                list.push_unseparated(")");
            }
            if let Some(prices) = filter.prices {
                qb.push(" AND rent_price BETWEEN ")
                    .push_bind(prices.start)
                    .push(" AND ")
                    .push_bind(prices.end);
            }
            if let Some(squares) = filter.squares {
                qb.push(" AND square BETWEEN ")
                    .push_bind(squares.start)
                    .push(" AND ")
                    .push_bind(squares.end);
            }
            if let Some(period) = filter.period {
                qb.push(" AND created BETWEEN ")
                    .push_bind(period.start)
                    .push(" AND ")
                    .push_bind(period.end);
            }
            if let Some(text) = &filter.text {
                qb.push(" AND title ILIKE ").push_bind(format!("%{text}%"));
            }
        };
        fetch_page(conn, "properties", push_filter, page, Self::SORTABLE).await
    }

    #[tracing::instrument(skip_all, name = "db.properties.adjust_stat")]
    pub async fn adjust_stat(
        conn: &mut PgConnection,
        id: PropertyId,
        stat: PropertyStat,
        delta: i64,
    ) -> Result<Option<Self>> {
        let column = stat.column();
        let sql =
            format!("UPDATE properties SET {column} = {column} + $1 WHERE id = $2 RETURNING *");
        sqlx::query_as::<_, Self>(&sql)
            .bind(delta)
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.properties.remove")]
    pub async fn remove(conn: &mut PgConnection, id: PropertyId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "DELETE FROM properties WHERE id = $1 AND status = 'DELETE' RETURNING *",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}

impl InsertProperty {
    #[tracing::instrument(skip_all, name = "db.properties.insert")]
    pub async fn insert(&self, conn: &mut PgConnection, owner: MemberId) -> Result<Property> {
        sqlx::query_as::<_, Property>(
            r"INSERT INTO properties
                (member_id, kind, location, address, title, rent_price, square, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *",
        )
        .bind(owner)
        .bind(self.kind)
        .bind(self.location)
        .bind(&self.address)
        .bind(&self.title)
        .bind(self.rent_price)
        .bind(self.square)
        .bind(&self.description)
        .fetch_one(conn)
        .await
        .into_db_error()
    }
}

impl UpdateProperty {
    /// Only rows that are not deleted yet are updated. An owner scope
    /// additionally restricts the update to the owner's rows.
    #[tracing::instrument(skip_all, name = "db.properties.update")]
    pub async fn update(
        &self,
        conn: &mut PgConnection,
        id: PropertyId,
        owner: Option<MemberId>,
    ) -> Result<Option<Property>> {
        sqlx::query_as::<_, Property>(
            r"UPDATE properties
            SET kind = COALESCE($3, kind),
                status = COALESCE($4, status),
                location = COALESCE($5, location),
                address = COALESCE($6, address),
                title = COALESCE($7, title),
                rent_price = COALESCE($8, rent_price),
                square = COALESCE($9, square),
                description = COALESCE($10, description),
                rented_at = COALESCE($11, rented_at),
                deleted_at = COALESCE($12, deleted_at),
                updated = timezone('utc', now())
            WHERE id = $1
                AND status <> 'DELETE'
                AND ($2::BIGINT IS NULL OR member_id = $2)
            RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(self.kind)
        .bind(self.status)
        .bind(self.location)
        .bind(&self.address)
        .bind(&self.title)
        .bind(self.rent_price)
        .bind(self.square)
        .bind(&self.description)
        .bind(self.rented_at)
        .bind(self.deleted_at)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}
