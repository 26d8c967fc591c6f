//! SQLite database layer (embedded, no external dependencies)

use anyhow::{Context, Result};
use ledger_types::{
    Customer, CustomerId, NewCustomer, NewPurchase, Purchase, PurchaseChanges, PurchaseId,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Connection factory for the ledger database.
///
/// Every statement checks a connection out of the pool for its own duration,
/// so multi-statement sequences (existence check then write) are not atomic.
pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    /// Open the database file, creating it if missing. Foreign keys are
    /// enforced on every pooled connection so the purchase cascade works.
    /// Rollback journal mode keeps all persisted state in the one file.
    pub async fn connect(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        if let Some(parent) = std::path::Path::new(database_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Delete)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        tracing::info!("SQLite connection established");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Create both tables if absent. Safe to run on every startup.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clientes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nome TEXT NOT NULL,
                endereco TEXT
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .context("Failed to create table clientes")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS compras (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cliente_id INTEGER NOT NULL,
                descricao TEXT NOT NULL,
                valor_compra REAL NOT NULL,
                valor_venda REAL NOT NULL,
                pago BOOLEAN NOT NULL DEFAULT 0,
                data TEXT NOT NULL,
                FOREIGN KEY (cliente_id) REFERENCES clientes(id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .context("Failed to create table compras")?;

        tracing::info!("Database schema ready");
        Ok(())
    }

    // Customer operations
    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        let rows: Vec<CustomerRow> = sqlx::query_as(
            r#"
            SELECT id, nome, endereco FROM clientes ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn customer_exists(&self, id: CustomerId) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM clientes WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.is_some())
    }

    pub async fn create_customer(&self, customer: &NewCustomer) -> Result<CustomerId> {
        let result = sqlx::query(
            r#"
            INSERT INTO clientes (nome, endereco)
            VALUES (?1, ?2)
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.address)
        .execute(&*self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update_customer(&self, id: CustomerId, customer: &NewCustomer) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE clientes SET nome = ?1, endereco = ?2
            WHERE id = ?3
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.address)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    /// Purchases owned by the customer go with it through the cascade.
    pub async fn delete_customer(&self, id: CustomerId) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM clientes WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    // Purchase operations
    pub async fn list_purchases_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Purchase>> {
        let rows: Vec<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, cliente_id, descricao, valor_compra, valor_venda, pago, data
            FROM compras WHERE cliente_id = ?1
            ORDER BY id
            "#,
        )
        .bind(customer_id)
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn purchase_exists(&self, id: PurchaseId) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM compras WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.is_some())
    }

    pub async fn get_purchase(&self, id: PurchaseId) -> Result<Option<Purchase>> {
        let row: Option<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, cliente_id, descricao, valor_compra, valor_venda, pago, data
            FROM compras WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    pub async fn create_purchase(&self, purchase: &NewPurchase, created_at: &str) -> Result<PurchaseId> {
        let result = sqlx::query(
            r#"
            INSERT INTO compras (cliente_id, descricao, valor_compra, valor_venda, data)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(purchase.customer_id)
        .bind(&purchase.description)
        .bind(purchase.purchase_value)
        .bind(purchase.sale_value)
        .bind(created_at)
        .execute(&*self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update_purchase(&self, id: PurchaseId, changes: &PurchaseChanges) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE compras SET descricao = ?1, valor_compra = ?2, valor_venda = ?3
            WHERE id = ?4
            "#,
        )
        .bind(&changes.description)
        .bind(changes.purchase_value)
        .bind(changes.sale_value)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    /// Flip `pago` in place. Callers read the new value back with
    /// [`Database::purchase_paid`]; the two steps are not isolated.
    pub async fn toggle_purchase_paid(&self, id: PurchaseId) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE compras SET pago = NOT pago WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    pub async fn purchase_paid(&self, id: PurchaseId) -> Result<Option<bool>> {
        let paid: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT pago FROM compras WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(paid)
    }

    pub async fn delete_purchase(&self, id: PurchaseId) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM compras WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    #[cfg(test)]
    pub async fn count_purchases(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM compras")
            .fetch_one(&*self.pool)
            .await?;
        Ok(count)
    }

    /// Breaks the schema so that every purchase query fails.
    #[cfg(test)]
    pub async fn drop_purchases_table(&self) -> Result<()> {
        sqlx::query("DROP TABLE compras")
            .execute(&*self.pool)
            .await?;
        Ok(())
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    nome: String,
    endereco: Option<String>,
}

impl From<CustomerRow> for Customer {
    fn from(r: CustomerRow) -> Self {
        Customer {
            id: r.id,
            name: r.nome,
            address: r.endereco,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PurchaseRow {
    id: i64,
    cliente_id: i64,
    descricao: String,
    valor_compra: f64,
    valor_venda: f64,
    pago: bool,
    data: String,
}

impl From<PurchaseRow> for Purchase {
    fn from(r: PurchaseRow) -> Self {
        Purchase {
            id: r.id,
            customer_id: r.cliente_id,
            description: r.descricao,
            purchase_value: r.valor_compra,
            sale_value: r.valor_venda,
            paid: r.pago,
            created_at: r.data,
        }
    }
}
