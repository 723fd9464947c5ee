//! `system_settings` key/value rows
//!
//! Callers should go through typed loaders (`ranking::policy::ResetPolicy`)
//! instead of reading keys ad hoc.

use std::collections::HashMap;

use sqlx::PgExecutor;

/// Wall-clock time of the last reset; the check-in service keys its
/// "virtual day" off this value.
pub const LAST_RESET_DATETIME: &str = "last_reset_datetime";
/// `HH:MM` local time at which the in-process scheduler fires
pub const RESET_TIME: &str = "reset_time";

pub async fn get<'e>(
    executor: impl PgExecutor<'e>,
    key: &str,
) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT setting_value FROM system_settings WHERE setting_key = $1")
            .bind(key)
            .fetch_optional(executor)
            .await?;
    Ok(row.map(|(v,)| v))
}

/// All settings whose key starts with `prefix`
pub async fn get_prefixed<'e>(
    executor: impl PgExecutor<'e>,
    prefix: &str,
) -> Result<HashMap<String, String>, sqlx::Error> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT setting_key, setting_value FROM system_settings WHERE starts_with(setting_key, $1)",
    )
    .bind(prefix)
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().collect())
}

pub async fn upsert<'e>(
    executor: impl PgExecutor<'e>,
    key: &str,
    value: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO system_settings (setting_key, setting_value, updated_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (setting_key)
        DO UPDATE SET setting_value = EXCLUDED.setting_value, updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}
