use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::repositories::TeamRepository;
use crate::domain::team::Team;

/// PostgreSQL implementation of TeamRepository
pub struct PostgresTeamRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: i64,
    name: String,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team::from_persistence(row.id, row.name)
    }
}

impl PostgresTeamRepository {
    /// Creates a new PostgresTeamRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn save(&self, team: &Team) -> RepositoryResult<Team> {
        if let Some(id) = team.id() {
            return Err(RepositoryError::AlreadyPersisted { entity: "Team", id });
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO teams (name)
            VALUES ($1)
            RETURNING id
            "#,
        )
        .bind(team.name())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(team_id = id, name = team.name(), "Saved team");
        Ok(Team::from_persistence(id, team.name().to_string()))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, name
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Team::from))
    }

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, name
            FROM teams
            WHERE name = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Team::from))
    }
}
