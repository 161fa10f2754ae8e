use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use medinfo_core::models::item::{Item, ItemType, NewItem};

use crate::error::DbError;
use crate::to_timestamp;

const ITEM_COLUMNS: &str = "id, created_at, COALESCE(name, '') AS name, \
     COALESCE(type, '') AS item_type, COALESCE(aiReasons, '') AS ai_reasons, \
     COALESCE(docReason, '') AS doc_reason, COALESCE(presId, 0) AS pres_id";

#[derive(FromRow)]
struct ItemRow {
    id: i64,
    created_at: NaiveDateTime,
    name: String,
    item_type: String,
    ai_reasons: String,
    doc_reason: String,
    pres_id: i64,
}

impl TryFrom<ItemRow> for Item {
    type Error = DbError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let item_type = row
            .item_type
            .parse::<ItemType>()
            .map_err(|e| DbError::Decode(format!("item {}: {e}", row.id)))?;
        Ok(Item {
            id: row.id,
            created_at: to_timestamp(row.created_at)?,
            name: row.name,
            item_type,
            ai_reasons: row.ai_reasons,
            doc_reason: row.doc_reason,
            pres_id: row.pres_id,
        })
    }
}

fn collect_items(rows: Vec<ItemRow>) -> Result<Vec<Item>, DbError> {
    rows.into_iter().map(Item::try_from).collect()
}

pub async fn insert_item(pool: &PgPool, pres_id: i64, item: &NewItem) -> Result<Item, DbError> {
    let sql = format!(
        "INSERT INTO items (presId, name, type, aiReasons, docReason) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {ITEM_COLUMNS}"
    );
    sqlx::query_as::<_, ItemRow>(&sql)
        .bind(pres_id)
        .bind(&item.name)
        .bind(item.item_type.as_str())
        .bind(&item.ai_reasons)
        .bind(&item.doc_reason)
        .fetch_one(pool)
        .await?
        .try_into()
}

/// Insert all items for one prescription in a single statement.
///
/// An empty slice issues no query.
pub async fn insert_items_bulk(
    pool: &PgPool,
    pres_id: i64,
    items: &[NewItem],
) -> Result<Vec<Item>, DbError> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO items (presId, name, type, aiReasons, docReason) ");
    builder.push_values(items, |mut row, item| {
        row.push_bind(pres_id)
            .push_bind(&item.name)
            .push_bind(item.item_type.as_str())
            .push_bind(&item.ai_reasons)
            .push_bind(&item.doc_reason);
    });
    builder.push(" RETURNING ");
    builder.push(ITEM_COLUMNS);

    let rows = builder
        .build_query_as::<ItemRow>()
        .fetch_all(pool)
        .await?;
    collect_items(rows)
}

pub async fn get_item(pool: &PgPool, id: i64) -> Result<Item, DbError> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1");
    sqlx::query_as::<_, ItemRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("item {id}")))?
        .try_into()
}

pub async fn list_prescription_items(pool: &PgPool, pres_id: i64) -> Result<Vec<Item>, DbError> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE presId = $1 ORDER BY id");
    let rows = sqlx::query_as::<_, ItemRow>(&sql)
        .bind(pres_id)
        .fetch_all(pool)
        .await?;
    collect_items(rows)
}

/// Items for several prescriptions at once, ordered by prescription then id.
pub async fn list_items_for_prescriptions(
    pool: &PgPool,
    pres_ids: &[i64],
) -> Result<Vec<Item>, DbError> {
    if pres_ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM items WHERE presId = ANY($1) ORDER BY presId, id"
    );
    let rows = sqlx::query_as::<_, ItemRow>(&sql)
        .bind(pres_ids)
        .fetch_all(pool)
        .await?;
    collect_items(rows)
}

/// Record the doctor's note on an item, the only mutable item field.
/// Surrounding whitespace is dropped.
pub async fn update_doc_reason(pool: &PgPool, id: i64, doc_reason: &str) -> Result<Item, DbError> {
    let sql = format!("UPDATE items SET docReason = $2 WHERE id = $1 RETURNING {ITEM_COLUMNS}");
    sqlx::query_as::<_, ItemRow>(&sql)
        .bind(id)
        .bind(doc_reason.trim())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("item {id}")))?
        .try_into()
}
