//! SQLite persistence for extracted profiles.
//!
//! One row per session, last write wins. The profile document is stored as
//! its JSON text: the schema is model-defined and open-ended, so columns per
//! field would fight every prompt adjustment.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::profile::{Profile, ProfileRow};

/// Saves the profile for a session, replacing any earlier document saved
/// under the same session id.
pub async fn upsert_profile(
    pool: &SqlitePool,
    session_id: Uuid,
    profile: &Profile,
) -> Result<(), sqlx::Error> {
    let profile_json =
        serde_json::to_string(profile).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    sqlx::query(
        r#"
        INSERT INTO student_profiles (session_id, profile_json, created_at)
        VALUES ($1, $2, $3)
        ON CONFLICT(session_id) DO UPDATE SET
            profile_json = excluded.profile_json,
            created_at = excluded.created_at
        "#,
    )
    .bind(session_id.to_string())
    .bind(profile_json)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Loads the saved profile row for a session, if one exists.
pub async fn fetch_profile(
    pool: &SqlitePool,
    session_id: Uuid,
) -> Result<Option<ProfileRow>, sqlx::Error> {
    let row: Option<ProfileRow> = sqlx::query_as(
        "SELECT id, session_id, profile_json, created_at FROM student_profiles WHERE session_id = $1",
    )
    .bind(session_id.to_string())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        // A single connection keeps the in-memory database alive and shared
        // for the whole test.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_schema(&pool).await.unwrap();
        pool
    }

    fn profile_with_interest(interest: &str) -> Profile {
        serde_json::from_value(json!({
            "interesses_principais": interest,
            "hard_skills_mencionadas_ou_desejadas": ["Python"],
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_and_fetch_round_trip() {
        let pool = test_pool().await;
        let session_id = Uuid::new_v4();
        let profile = profile_with_interest("robótica");

        upsert_profile(&pool, session_id, &profile).await.unwrap();

        let row = fetch_profile(&pool, session_id).await.unwrap().unwrap();
        assert_eq!(row.session_id, session_id.to_string());

        let loaded: Profile = serde_json::from_str(&row.profile_json).unwrap();
        assert_eq!(
            loaded.get("interesses_principais").and_then(|v| v.as_str()),
            Some("robótica")
        );
    }

    #[tokio::test]
    async fn test_second_save_replaces_the_first() {
        let pool = test_pool().await;
        let session_id = Uuid::new_v4();

        upsert_profile(&pool, session_id, &profile_with_interest("jogos"))
            .await
            .unwrap();
        upsert_profile(&pool, session_id, &profile_with_interest("dados"))
            .await
            .unwrap();

        let row = fetch_profile(&pool, session_id).await.unwrap().unwrap();
        assert!(row.profile_json.contains("dados"));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM student_profiles")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_unknown_session_has_no_row() {
        let pool = test_pool().await;
        assert!(fetch_profile(&pool, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sessions_do_not_collide() {
        let pool = test_pool().await;
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        upsert_profile(&pool, first, &profile_with_interest("segurança"))
            .await
            .unwrap();
        upsert_profile(&pool, second, &profile_with_interest("front-end"))
            .await
            .unwrap();

        let row = fetch_profile(&pool, first).await.unwrap().unwrap();
        assert!(row.profile_json.contains("segurança"));
    }
}
