//! User ranking queries

use sqlx::{PgConnection, PgExecutor};

/// Ranking row read before points are zeroed
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RankedUser {
    pub id: i64,
    pub name: String,
    pub pix_key: Option<String>,
    pub daily_points: i64,
}

/// Minimal user lookup for admin/test endpoints
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub pix_key: Option<String>,
}

/// Top `limit` users by daily points, locked until the reset commits.
///
/// Ties go to the earlier account, then the lower id.
pub async fn top_ranked(conn: &mut PgConnection, limit: i64) -> Result<Vec<RankedUser>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, name, pix_key, daily_points
        FROM users
        WHERE daily_points > 0
        ORDER BY daily_points DESC, created_at ASC, id ASC
        LIMIT $1
        FOR UPDATE
        "#,
    )
    .bind(limit)
    .fetch_all(conn)
    .await
}

/// Zero every non-zero ranking score. Returns the number of users touched.
pub async fn zero_daily_points(conn: &mut PgConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET daily_points = 0 WHERE daily_points > 0")
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn find_summary<'e>(
    executor: impl PgExecutor<'e>,
    user_id: i64,
) -> Result<Option<UserSummary>, sqlx::Error> {
    sqlx::query_as("SELECT id, name, email, pix_key FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
}
