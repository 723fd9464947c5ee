//! Roulette spin history

use sqlx::PgConnection;

/// Delete spins created in `[start, end)` (Unix millis). Returns rows deleted.
pub async fn purge_between(
    conn: &mut PgConnection,
    start: i64,
    end: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM spin_history WHERE created_at >= $1 AND created_at < $2")
        .bind(start)
        .bind(end)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
