//! PostgreSQL-backed `InventoryRepository` implementation.
//!
//! Detailed listings left-join the categories table so deleted categories
//! simply yield a null name instead of dropping the item.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::inventory::{InventoryItem, InventoryItemView, ItemSummary};
use crate::domain::ports::{InventoryRepository, InventoryRepositoryError, ItemChanges};
use crate::domain::EmailAddress;

use super::diesel_helpers::{collect_rows, DbError};
use super::models::{InventoryRow, InventoryUpdate, ItemSummaryRow, NewInventoryRow};
use super::pool::DbPool;
use super::schema::{categories, inventory};

/// Diesel-backed implementation of the `InventoryRepository` port.
#[derive(Clone)]
pub struct DieselInventoryRepository {
    pool: DbPool,
}

impl DieselInventoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_db(error: DbError) -> InventoryRepositoryError {
    match error {
        DbError::Connection(message) => InventoryRepositoryError::connection(message),
        DbError::Unique(message) => InventoryRepositoryError::duplicate_code(message),
        DbError::Query(message) => InventoryRepositoryError::query(message),
    }
}

fn pool_err(error: super::pool::PoolError) -> InventoryRepositoryError {
    map_db(DbError::from_pool(error))
}

fn diesel_err(error: diesel::result::Error) -> InventoryRepositoryError {
    map_db(DbError::from_diesel(error))
}

fn view_from(
    (row, category_name): (InventoryRow, Option<String>),
) -> Result<InventoryItemView, String> {
    Ok(InventoryItemView {
        item: row.into_domain()?,
        category_name,
    })
}

#[async_trait]
impl InventoryRepository for DieselInventoryRepository {
    async fn insert(&self, item: &InventoryItem) -> Result<(), InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::insert_into(inventory::table)
            .values(&NewInventoryRow {
                id: item.id,
                product_name: &item.product_name,
                brand: item.brand.as_deref(),
                model: item.model.as_deref(),
                serial_code: &item.serial_code,
                product_code: &item.product_code,
                assigned_user_email: item
                    .assigned_user_email
                    .as_ref()
                    .map(EmailAddress::as_str),
                category_id: item.category_id,
                location: item.location.as_deref(),
                notes: item.notes.as_deref(),
                purchase_date: item.purchase_date,
                warranty_end_date: item.warranty_end_date,
                assignment_date: item.assignment_date,
                unassignment_date: item.unassignment_date,
                status: item.status.as_str(),
                added_by_email: item.added_by_email.as_str(),
                created_at: item.created_at,
                updated_at: item.updated_at,
            })
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &ItemChanges,
    ) -> Result<bool, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let updated = diesel::update(inventory::table.filter(inventory::id.eq(id)))
            .set(&InventoryUpdate {
                product_name: &changes.product_name,
                brand: changes.brand.as_deref(),
                model: changes.model.as_deref(),
                serial_code: &changes.serial_code,
                product_code: &changes.product_code,
                assigned_user_email: changes
                    .assigned_user_email
                    .as_ref()
                    .map(EmailAddress::as_str),
                category_id: changes.category_id,
                location: changes.location.as_deref(),
                notes: changes.notes.as_deref(),
                purchase_date: changes.purchase_date,
                warranty_end_date: changes.warranty_end_date,
                assignment_date: changes.assignment_date,
                unassignment_date: changes.unassignment_date,
                status: changes.status.as_str(),
                updated_at: changes.updated_at,
            })
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let deleted = diesel::delete(inventory::table.filter(inventory::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(deleted > 0)
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<InventoryItem>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let row: Option<InventoryRow> = inventory::table
            .filter(inventory::id.eq(id))
            .select(InventoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_err)?;
        row.map(|row| {
            row.into_domain()
                .map_err(|msg| map_db(DbError::invalid_row(msg)))
        })
        .transpose()
    }

    async fn list_detailed(&self) -> Result<Vec<InventoryItemView>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let rows: Vec<(InventoryRow, Option<String>)> = inventory::table
            .left_join(categories::table)
            .select((InventoryRow::as_select(), categories::name.nullable()))
            .order_by(inventory::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;
        collect_rows(rows.into_iter().map(view_from)).map_err(map_db)
    }

    async fn assigned_to(
        &self,
        user: &EmailAddress,
    ) -> Result<Vec<InventoryItemView>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let rows: Vec<(InventoryRow, Option<String>)> = inventory::table
            .left_join(categories::table)
            .filter(inventory::assigned_user_email.eq(user.as_str()))
            .select((InventoryRow::as_select(), categories::name.nullable()))
            .order_by(inventory::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;
        collect_rows(rows.into_iter().map(view_from)).map_err(map_db)
    }

    async fn active_assigned_to(
        &self,
        user: &EmailAddress,
    ) -> Result<Vec<ItemSummary>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let rows: Vec<ItemSummaryRow> = inventory::table
            .filter(
                inventory::assigned_user_email
                    .eq(user.as_str())
                    .and(inventory::status.eq("active")),
            )
            .select(ItemSummaryRow::as_select())
            .order_by(inventory::product_name.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(rows.into_iter().map(ItemSummaryRow::into_domain).collect())
    }

    async fn summaries_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<ItemSummary>, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let rows: Vec<ItemSummaryRow> = inventory::table
            .filter(inventory::id.eq_any(ids))
            .select(ItemSummaryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_err)?;
        Ok(rows.into_iter().map(ItemSummaryRow::into_domain).collect())
    }

    async fn clear_assignments_for(
        &self,
        user: &EmailAddress,
    ) -> Result<u64, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let cleared = diesel::update(
            inventory::table.filter(inventory::assigned_user_email.eq(user.as_str())),
        )
        .set((
            inventory::assigned_user_email.eq(None::<String>),
            inventory::unassignment_date.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)
        .await
        .map_err(diesel_err)?;
        Ok(cleared as u64)
    }

    async fn count_in_category(
        &self,
        category_id: Uuid,
    ) -> Result<i64, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        inventory::table
            .filter(inventory::category_id.eq(category_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_err)
    }
}
