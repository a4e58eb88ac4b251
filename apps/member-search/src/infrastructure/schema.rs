use sqlx::PgPool;

use crate::domain::errors::RepositoryResult;

const SCHEMA_STATEMENTS: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS members (
        id BIGSERIAL PRIMARY KEY,
        username TEXT,
        age INTEGER NOT NULL,
        team_id BIGINT REFERENCES teams (id)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_members_team_id ON members (team_id)
    "#,
];

/// Creates the `teams` and `members` tables if they do not exist yet
pub async fn ensure_schema(pool: &PgPool) -> RepositoryResult<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database schema ready");
    Ok(())
}
