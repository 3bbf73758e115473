use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ngtax_core::{
    CalculationKind, CalculationRepository, NewCalculation, RepositoryError, SavedCalculation,
};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::{debug, info};

const SELECT_CALCULATION: &str =
    "SELECT id, kind, owner_id, label, input_json, result_json, created_at FROM calculation";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens (creating if missing) the database at `connection_string`.
    ///
    /// Accepts a bare file path, a `sqlite:` URL or `:memory:`. An in-memory
    /// database lives only as long as its single pooled connection.
    pub async fn new(connection_string: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(connection_string)
            .map_err(|e| RepositoryError::Configuration(e.to_string()))?
            .create_if_missing(true);

        let in_memory = connection_string.contains(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 4 })
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        info!(connection_string, "opened SQLite calculation store");
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(format!("migration failed: {e}")))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn row_to_calculation(row: &SqliteRow) -> Result<SavedCalculation, RepositoryError> {
    let kind: String = row.try_get("kind").map_err(db_err)?;
    let kind = CalculationKind::parse(&kind)
        .ok_or_else(|| RepositoryError::Database(format!("unknown calculation kind '{kind}'")))?;

    let input_json: String = row.try_get("input_json").map_err(db_err)?;
    let result_json: String = row.try_get("result_json").map_err(db_err)?;

    Ok(SavedCalculation {
        id: row.try_get("id").map_err(db_err)?,
        kind,
        owner_id: row.try_get("owner_id").map_err(db_err)?,
        label: row.try_get("label").map_err(db_err)?,
        input: serde_json::from_str(&input_json)?,
        result: serde_json::from_str(&result_json)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {}", e)))?,
    })
}

#[async_trait]
impl CalculationRepository for SqliteRepository {
    async fn save_calculation(
        &self,
        calc: NewCalculation,
    ) -> Result<SavedCalculation, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO calculation (kind, owner_id, label, input_json, result_json, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(calc.kind.as_str())
        .bind(&calc.owner_id)
        .bind(&calc.label)
        .bind(serde_json::to_string(&calc.input)?)
        .bind(serde_json::to_string(&calc.result)?)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let id = result.last_insert_rowid();
        debug!(id, kind = %calc.kind, owner = %calc.owner_id, "calculation saved");
        self.get_calculation(id).await
    }

    async fn get_calculation(
        &self,
        id: i64,
    ) -> Result<SavedCalculation, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_CALCULATION} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_calculation(&row)
    }

    async fn list_calculations(
        &self,
        owner_id: &str,
        kind: Option<CalculationKind>,
    ) -> Result<Vec<SavedCalculation>, RepositoryError> {
        let rows = match kind {
            Some(kind) => {
                sqlx::query(&format!(
                    "{SELECT_CALCULATION} WHERE owner_id = ? AND kind = ?
                     ORDER BY created_at DESC, id DESC"
                ))
                .bind(owner_id)
                .bind(kind.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "{SELECT_CALCULATION} WHERE owner_id = ? ORDER BY created_at DESC, id DESC"
                ))
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_err)?;

        rows.iter().map(row_to_calculation).collect()
    }

    async fn delete_calculation(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM calculation WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        debug!(id, "calculation deleted");
        Ok(())
    }
}
