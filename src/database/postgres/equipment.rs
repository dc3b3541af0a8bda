use sqlx::{PgConnection, Postgres, QueryBuilder};

use super::fetch_page;
use crate::database::{ErrorExt, Result};
use crate::model::equipment::{
    EquipmentFilter, EquipmentStatus, InsertEquipment, UpdateEquipment,
};
use crate::model::{
    Equipment, EquipmentId, EquipmentStat, MemberId, PageRequest, Paginated, Sort,
};

impl Equipment {
    const SORTABLE: &'static [Sort] = &[
        Sort::Created,
        Sort::Updated,
        Sort::Views,
        Sort::Likes,
        Sort::Rank,
        Sort::RentPrice,
    ];

    #[tracing::instrument(skip_all, name = "db.equipment.find")]
    pub async fn find(conn: &mut PgConnection, id: EquipmentId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.equipment.list")]
    pub async fn list(
        conn: &mut PgConnection,
        filter: &EquipmentFilter,
        page: &PageRequest,
    ) -> Result<Paginated<Self>> {
        let push_filter = |qb: &mut QueryBuilder<'_, Postgres>| {
            match filter.status {
                Some(status) => qb.push(" AND status = ").push_bind(status),
                None => qb.push(" AND status <> ").push_bind(EquipmentStatus::Retired),
            };
            if let Some(member_id) = filter.member_id {
                qb.push(" AND member_id = ").push_bind(member_id);
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
        fetch_page(conn, "equipment", push_filter, page, Self::SORTABLE).await
    }

    #[tracing::instrument(skip_all, name = "db.equipment.adjust_stat")]
    pub async fn adjust_stat(
        conn: &mut PgConnection,
        id: EquipmentId,
        stat: EquipmentStat,
        delta: i64,
    ) -> Result<Option<Self>> {
        let column = stat.column();
        let sql =
            format!("UPDATE equipment SET {column} = {column} + $1 WHERE id = $2 RETURNING *");
        sqlx::query_as::<_, Self>(&sql)
            .bind(delta)
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.equipment.remove")]
    pub async fn remove(conn: &mut PgConnection, id: EquipmentId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "DELETE FROM equipment WHERE id = $1 AND status = 'RETIRED' RETURNING *",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}

impl InsertEquipment {
    #[tracing::instrument(skip_all, name = "db.equipment.insert")]
    pub async fn insert(&self, conn: &mut PgConnection, owner: MemberId) -> Result<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r"INSERT INTO equipment (member_id, kind, condition, title, rent_price, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *",
        )
        .bind(owner)
        .bind(self.kind)
        .bind(self.condition)
        .bind(&self.title)
        .bind(self.rent_price)
        .bind(&self.description)
        .fetch_one(conn)
        .await
        .into_db_error()
    }
}

impl UpdateEquipment {
    /// With an owner, only that owner's active equipment is updated.
    /// Without one, anything that is not retired is.
    #[tracing::instrument(skip_all, name = "db.equipment.update")]
    pub async fn update(
        &self,
        conn: &mut PgConnection,
        id: EquipmentId,
        owner: Option<MemberId>,
    ) -> Result<Option<Equipment>> {
        sqlx::query_as::<_, Equipment>(
            r"UPDATE equipment
            SET kind = COALESCE($3, kind),
                status = COALESCE($4, status),
                condition = COALESCE($5, condition),
                title = COALESCE($6, title),
                rent_price = COALESCE($7, rent_price),
                description = COALESCE($8, description),
                rented_at = COALESCE($9, rented_at),
                retired_at = COALESCE($10, retired_at),
                maintained_at = COALESCE($11, maintained_at),
                updated = timezone('utc', now())
            WHERE id = $1
                AND (
                    ($2::BIGINT IS NULL AND status <> 'RETIRED')
                    OR (member_id = $2 AND status = 'ACTIVE')
                )
            RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(self.kind)
        .bind(self.status)
        .bind(self.condition)
        .bind(&self.title)
        .bind(self.rent_price)
        .bind(&self.description)
        .bind(self.rented_at)
        .bind(self.retired_at)
        .bind(self.maintained_at)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}
