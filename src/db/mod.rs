use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::config::Config;
use crate::error::StoreError;
use crate::models::{Bill, NewBill};
use crate::session::Session;
use crate::store::{BillStore, ReceiptFile, UploadedFile};

/// Postgres-backed bill store, scoped to the logged-in user.
pub struct Database {
    pool: PgPool,
    upload_dir: PathBuf,
    email: String,
}

impl Database {
    /// Connect, apply the schema and scope every query to the session's user
    pub async fn new(config: &Config, session: &Session) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(config.database_url())
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database schema is up to date");

        Ok(Self {
            pool,
            upload_dir: PathBuf::from(&config.upload_dir),
            email: session.email().to_string(),
        })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BillStore for Database {
    async fn list_bills(&self) -> Result<Option<Vec<Bill>>, StoreError> {
        let bills = sqlx::query_as::<_, Bill>("SELECT * FROM bills WHERE email = $1")
            .bind(&self.email)
            .fetch_all(self.get_pool())
            .await?;

        tracing::debug!(count = bills.len(), "bills loaded");
        Ok(Some(bills))
    }

    async fn create_bill(&self, bill: NewBill) -> Result<Bill, StoreError> {
        let id = Uuid::new_v4().simple().to_string();

        let created = sqlx::query_as::<_, Bill>(
            r#"
            INSERT INTO bills (id, type, name, date, amount, vat, pct, commentary, file_url, file_name, status, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&bill.bill_type)
        .bind(&bill.name)
        .bind(&bill.date)
        .bind(bill.amount)
        .bind(bill.vat)
        .bind(bill.pct)
        .bind(&bill.commentary)
        .bind(&bill.file_url)
        .bind(&bill.file_name)
        .bind(bill.status.as_str())
        .bind(&bill.email)
        .fetch_one(self.get_pool())
        .await?;

        tracing::info!(id = %created.id, "bill created");
        Ok(created)
    }

    async fn upload_file(&self, file: ReceiptFile) -> Result<UploadedFile, StoreError> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let key = Uuid::new_v4().simple().to_string();
        let stored_name = match file.extension() {
            Some(ext) => format!("{}.{}", key, ext),
            None => key.clone(),
        };
        let path = self.upload_dir.join(stored_name);
        tokio::fs::write(&path, &file.bytes).await?;

        tracing::info!(file = %file.name, key = %key, content_type = %file.content_type, "receipt uploaded");
        Ok(UploadedFile {
            file_url: path.to_string_lossy().into_owned(),
            file_key: key,
        })
    }
}
