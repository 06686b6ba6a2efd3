//! Product store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed create/read/update/count/scan APIs over `products` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Product::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Scans are ordered by `id ASC`.
//! - The stored `available` flag never flips from 0 back to 1.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::product::{Product, ProductId, ProductValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    price,
    available
FROM products";

/// The one SQL rendering of the visibility predicate.
const VISIBLE_FILTER_SQL: &str = "available = 1";

/// Bound parameters per `IN (...)` lookup; stays under SQLite's variable limit.
const MAX_IDS_PER_QUERY: usize = 500;

const REQUIRED_COLUMNS: &[&str] = &["id", "name", "price", "available", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for product persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ProductValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("product not found: {0}")]
    NotFound(ProductId),
    #[error("invalid persisted product data: {0}")]
    InvalidData(String),
    #[error("connection is not migrated: expected schema {expected_version}, found {actual_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for scanning products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListQuery {
    pub include_unavailable: bool,
    pub limit: Option<u32>,
    pub offset: u64,
}

/// Record store capability used by catalog services.
pub trait ProductStore {
    /// Inserts a new record and returns its store-assigned id.
    fn create_product(&self, product: &Product) -> RepoResult<ProductId>;
    /// Persists name/price/availability for an existing record.
    fn update_product(&self, product: &Product) -> RepoResult<()>;
    fn get_product(
        &self,
        id: ProductId,
        include_unavailable: bool,
    ) -> RepoResult<Option<Product>>;
    fn count_products(&self, include_unavailable: bool) -> RepoResult<u64>;
    fn list_products(&self, query: &ProductListQuery) -> RepoResult<Vec<Product>>;
    /// Returns records whose id is in `ids`. Duplicate ids yield one record.
    fn find_products_by_ids(
        &self,
        ids: &[ProductId],
        include_unavailable: bool,
    ) -> RepoResult<Vec<Product>>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when schema version does not match this binary.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema is incomplete.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProductStore for SqliteProductRepository<'_> {
    fn create_product(&self, product: &Product) -> RepoResult<ProductId> {
        product.validate()?;

        self.conn.execute(
            "INSERT INTO products (name, price, available) VALUES (?1, ?2, ?3);",
            params![
                product.name.as_str(),
                product.price.to_string(),
                bool_to_int(product.available),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_product(&self, product: &Product) -> RepoResult<()> {
        product.validate()?;

        // MIN keeps a concurrent soft delete from being undone by a stale write.
        let changed = self.conn.execute(
            "UPDATE products
             SET
                name = ?1,
                price = ?2,
                available = MIN(available, ?3),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![
                product.name.as_str(),
                product.price.to_string(),
                bool_to_int(product.available),
                product.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(product.id));
        }

        Ok(())
    }

    fn get_product(
        &self,
        id: ProductId,
        include_unavailable: bool,
    ) -> RepoResult<Option<Product>> {
        let mut sql = format!("{PRODUCT_SELECT_SQL} WHERE id = ?1");
        if !include_unavailable {
            sql.push_str(&format!(" AND {VISIBLE_FILTER_SQL}"));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn count_products(&self, include_unavailable: bool) -> RepoResult<u64> {
        let mut sql = "SELECT COUNT(*) FROM products".to_string();
        if !include_unavailable {
            sql.push_str(&format!(" WHERE {VISIBLE_FILTER_SQL}"));
        }

        let count = self.conn.query_row(&sql, [], |row| row.get::<_, i64>(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative product count `{count}`")))
    }

    fn list_products(&self, query: &ProductListQuery) -> RepoResult<Vec<Product>> {
        let mut sql = format!("{PRODUCT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_unavailable {
            sql.push_str(&format!(" AND {VISIBLE_FILTER_SQL}"));
        }

        sql.push_str(" ORDER BY id ASC");

        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);
        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(offset));
            }
        } else if offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(offset));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }

    fn find_products_by_ids(
        &self,
        ids: &[ProductId],
        include_unavailable: bool,
    ) -> RepoResult<Vec<Product>> {
        let mut unique_ids = ids.to_vec();
        unique_ids.sort_unstable();
        unique_ids.dedup();

        let mut products = Vec::new();
        for chunk in unique_ids.chunks(MAX_IDS_PER_QUERY) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let mut sql = format!("{PRODUCT_SELECT_SQL} WHERE id IN ({placeholders})");
            if !include_unavailable {
                sql.push_str(&format!(" AND {VISIBLE_FILTER_SQL}"));
            }
            sql.push_str(" ORDER BY id ASC");

            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(chunk.iter()))?;
            while let Some(row) = rows.next()? {
                products.push(parse_product_row(row)?);
            }
        }

        Ok(products)
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'products'
        );",
        [],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable("products"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(products);")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "products",
                column,
            });
        }
    }

    Ok(())
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let price_text: String = row.get("price")?;
    let price = Decimal::from_str(&price_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid price value `{price_text}` in products.price"))
    })?;

    let available = match row.get::<_, i64>("available")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid available value `{other}` in products.available"
            )));
        }
    };

    let product = Product {
        id: row.get("id")?,
        name: row.get("name")?,
        price,
        available,
    };
    product.validate().map_err(|err| {
        RepoError::InvalidData(format!("product {} violates field rules: {err}", product.id))
    })?;
    Ok(product)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
