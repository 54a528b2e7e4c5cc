//! # Settings Repository
//!
//! Key/value business configuration.
//!
//! The ledger only interprets the two tax rate keys; everything else
//! (contact details, social links) passes through the generic get/set for
//! the web layer to use.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use arbor_core::{
    TaxRate, TaxRates, DEFAULT_FEDERAL_TAX_BPS, DEFAULT_PROVINCIAL_TAX_BPS,
    SETTING_FEDERAL_TAX_RATE, SETTING_PROVINCIAL_TAX_RATE,
};

/// Repository for settings database operations.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Gets a setting value by key.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Sets a setting value (insert or update).
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now();

        debug!(key = %key, "Updating setting");

        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Reads the jurisdiction tax rates.
    ///
    /// The keys hold decimal percent strings (`"5"`, `"8.25"`). An absent
    /// or unparsable value falls back to the jurisdiction default
    /// (5% federal, 8% provincial) rather than failing checkout.
    pub async fn tax_rates(&self) -> DbResult<TaxRates> {
        let federal = self
            .get(SETTING_FEDERAL_TAX_RATE)
            .await?
            .and_then(|value| TaxRate::from_percent_str(&value))
            .unwrap_or(TaxRate::from_bps(DEFAULT_FEDERAL_TAX_BPS));

        let provincial = self
            .get(SETTING_PROVINCIAL_TAX_RATE)
            .await?
            .and_then(|value| TaxRate::from_percent_str(&value))
            .unwrap_or(TaxRate::from_bps(DEFAULT_PROVINCIAL_TAX_BPS));

        Ok(TaxRates {
            federal,
            provincial,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_set_roundtrip() {
        let db = test_db().await;
        let repo = db.settings();

        assert_eq!(repo.get("contact_email").await.unwrap(), None);

        repo.set("contact_email", "sales@arbor.example").await.unwrap();
        assert_eq!(
            repo.get("contact_email").await.unwrap().as_deref(),
            Some("sales@arbor.example")
        );

        // Upsert overwrites.
        repo.set("contact_email", "support@arbor.example")
            .await
            .unwrap();
        assert_eq!(
            repo.get("contact_email").await.unwrap().as_deref(),
            Some("support@arbor.example")
        );
    }

    #[tokio::test]
    async fn test_tax_rates_default_when_absent() {
        let db = test_db().await;

        let rates = db.settings().tax_rates().await.unwrap();
        assert_eq!(rates.federal.bps(), 500); // "5"
        assert_eq!(rates.provincial.bps(), 800); // "8"
    }

    #[tokio::test]
    async fn test_tax_rates_read_from_settings() {
        let db = test_db().await;
        let repo = db.settings();

        repo.set(SETTING_FEDERAL_TAX_RATE, "5").await.unwrap();
        repo.set(SETTING_PROVINCIAL_TAX_RATE, "9.975").await.unwrap();

        let rates = repo.tax_rates().await.unwrap();
        assert_eq!(rates.federal.bps(), 500);
        assert_eq!(rates.provincial.bps(), 998); // 9.975% rounds to 998 bps
    }

    #[tokio::test]
    async fn test_tax_rates_fall_back_on_garbage() {
        let db = test_db().await;
        let repo = db.settings();

        repo.set(SETTING_FEDERAL_TAX_RATE, "not-a-number")
            .await
            .unwrap();
        repo.set(SETTING_PROVINCIAL_TAX_RATE, "-3").await.unwrap();

        let rates = repo.tax_rates().await.unwrap();
        assert_eq!(rates.federal.bps(), 500);
        assert_eq!(rates.provincial.bps(), 800);
    }
}
