//! SQL implementation of the access code ledger

use crate::error::DbError;
use crate::repositories::access_code::AccessCodeLedger;
use crate::DbClient;
use sqlx::Row;
use tracing::{debug, error, info};

/// SQL-backed access code ledger
#[derive(Debug, Clone)]
pub struct SqlAccessCodeLedger {
    db_client: DbClient,
}

impl SqlAccessCodeLedger {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl AccessCodeLedger for SqlAccessCodeLedger {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing access_codes schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS access_codes (
                code TEXT PRIMARY KEY,
                used INTEGER NOT NULL DEFAULT 0
            )
        "#;

        self.db_client.execute(query).await?;

        info!("access_codes schema initialized");
        Ok(())
    }

    async fn insert_code(&self, code: &str) -> Result<bool, DbError> {
        let existing = sqlx::query("SELECT code FROM access_codes WHERE code = $1")
            .bind(code)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to look up access code: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        if existing.is_some() {
            debug!("Skipping duplicate access code");
            return Ok(false);
        }

        sqlx::query("INSERT INTO access_codes (code, used) VALUES ($1, 0)")
            .bind(code)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to insert access code: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(true)
    }

    async fn verify(&self, code: &str) -> Result<bool, DbError> {
        let row = sqlx::query("SELECT used FROM access_codes WHERE code = $1")
            .bind(code)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to verify access code: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        // Unknown code and already-used code are indistinguishable here.
        match row {
            Some(row) => {
                let used: i32 = row.try_get("used").unwrap_or(1);
                Ok(used == 0)
            }
            None => Ok(false),
        }
    }

    async fn consume(&self, code: &str) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE access_codes SET used = 1 WHERE code = $1")
            .bind(code)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to consume access code: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            debug!("Consume was a no-op: code unknown");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ledger() -> SqlAccessCodeLedger {
        let client = DbClient::from_url("sqlite::memory:").await.unwrap();
        let ledger = SqlAccessCodeLedger::new(client);
        ledger.init_schema().await.unwrap();
        ledger
    }

    #[tokio::test]
    async fn verify_then_consume_is_one_shot() {
        let ledger = ledger().await;
        assert!(ledger.insert_code("alpha").await.unwrap());

        assert!(ledger.verify("alpha").await.unwrap());
        // verify does not mutate
        assert!(ledger.verify("alpha").await.unwrap());

        ledger.consume("alpha").await.unwrap();
        assert!(!ledger.verify("alpha").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_and_used_codes_are_indistinguishable() {
        let ledger = ledger().await;
        assert!(ledger.insert_code("beta").await.unwrap());
        ledger.consume("beta").await.unwrap();

        assert_eq!(
            ledger.verify("beta").await.unwrap(),
            ledger.verify("no-such-code").await.unwrap()
        );
    }

    #[tokio::test]
    async fn consume_is_idempotent() {
        let ledger = ledger().await;
        assert!(ledger.insert_code("gamma").await.unwrap());

        ledger.consume("gamma").await.unwrap();
        ledger.consume("gamma").await.unwrap();
        // consuming an unknown code is a no-op too
        ledger.consume("never-issued").await.unwrap();

        assert!(!ledger.verify("gamma").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_codes_are_skipped() {
        let ledger = ledger().await;
        assert!(ledger.insert_code("delta").await.unwrap());
        assert!(!ledger.insert_code("delta").await.unwrap());
    }
}
