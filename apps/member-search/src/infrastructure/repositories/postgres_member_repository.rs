use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::member::Member;
use crate::domain::repositories::{MemberQueryRepository, MemberRepository};
use crate::domain::search::{
    AgeStatistics, MemberFilter, MemberQuery, MemberTeamView, TeamAgeAverage,
};

use super::member_sql::{push_filter, push_order_by, push_window, select_view, MEMBER_TEAM_VIEW};

/// PostgreSQL implementation of the member repositories
///
/// Entity reads and writes go straight to `members`. View queries are built
/// at runtime with `sqlx::QueryBuilder` over the member/team left join.
pub struct PostgresMemberRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: i64,
    username: Option<String>,
    age: i32,
    team_id: Option<i64>,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Member::from_persistence(row.id, row.username, row.age, row.team_id)
    }
}

impl PostgresMemberRepository {
    /// Creates a new PostgresMemberRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn save(&self, member: &Member) -> RepositoryResult<Member> {
        if let Some(id) = member.id() {
            return Err(RepositoryError::AlreadyPersisted { entity: "Member", id });
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO members (username, age, team_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(member.username())
        .bind(member.age())
        .bind(member.team_id())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let missing_team =
                matches!(&e, sqlx::Error::Database(db) if db.is_foreign_key_violation());
            match member.team_id() {
                Some(team_id) if missing_team => RepositoryError::TeamNotFound(team_id),
                _ => RepositoryError::Database(e),
            }
        })?;

        tracing::debug!(member_id = id, "Saved member");
        Ok(Member::from_persistence(
            id,
            member.username().map(str::to_string),
            member.age(),
            member.team_id(),
        ))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Member::from))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            WHERE username = $1
            ORDER BY id
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn find_by_team(&self, team_id: i64) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            WHERE team_id = $1
            ORDER BY id
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }
}

#[async_trait]
impl MemberQueryRepository for PostgresMemberRepository {
    async fn fetch_views(&self, query: &MemberQuery) -> RepositoryResult<Vec<MemberTeamView>> {
        let mut qb = select_view();
        push_filter(&mut qb, &query.filter);
        push_order_by(&mut qb, &query.sort);
        push_window(&mut qb, query.offset, query.limit);

        tracing::debug!(sql = qb.sql(), "Fetching member views");
        let views = qb
            .build_query_as::<MemberTeamView>()
            .fetch_all(&self.pool)
            .await?;

        Ok(views)
    }

    async fn count_views(&self, filter: &MemberFilter) -> RepositoryResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM (");
        qb.push(MEMBER_TEAM_VIEW);
        qb.push(") AS v");
        push_filter(&mut qb, filter);

        tracing::debug!(sql = qb.sql(), "Counting member views");
        let total: i64 = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(total.max(0) as u64)
    }

    async fn fetch_views_with_total(
        &self,
        query: &MemberQuery,
    ) -> RepositoryResult<(Vec<MemberTeamView>, u64)> {
        // The count lives outside the windowed subquery so an offset past the
        // last row still reports the real total.
        let mut qb = QueryBuilder::<Postgres>::new("WITH filtered AS (");
        qb.push("SELECT v.member_id, v.username, v.age, v.team_id, v.team_name FROM (");
        qb.push(MEMBER_TEAM_VIEW);
        qb.push(") AS v");
        push_filter(&mut qb, &query.filter);
        qb.push(") SELECT (SELECT COUNT(*) FROM filtered) AS total_count, ");
        qb.push("COALESCE((SELECT json_agg(p");
        push_order_by(&mut qb, &query.sort);
        qb.push(") FROM (SELECT * FROM filtered");
        push_order_by(&mut qb, &query.sort);
        push_window(&mut qb, query.offset, query.limit);
        qb.push(") AS p), '[]'::json) AS content");

        tracing::debug!(sql = qb.sql(), "Fetching member views with total");
        let row = qb.build().fetch_one(&self.pool).await?;

        let total: i64 = row.try_get("total_count")?;
        let content: serde_json::Value = row.try_get("content")?;
        let views: Vec<MemberTeamView> = serde_json::from_value(content)?;

        Ok((views, total.max(0) as u64))
    }

    async fn age_statistics(&self) -> RepositoryResult<AgeStatistics> {
        let stats = sqlx::query_as::<_, AgeStatistics>(
            r#"
            SELECT
                COUNT(*) AS "count",
                SUM(age)::BIGINT AS "sum",
                AVG(age)::FLOAT8 AS "average",
                MAX(age) AS "max",
                MIN(age) AS "min"
            FROM members
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn average_age_by_team(&self) -> RepositoryResult<Vec<TeamAgeAverage>> {
        let rows = sqlx::query_as::<_, TeamAgeAverage>(
            r#"
            SELECT
                t.name AS team_name,
                AVG(m.age)::FLOAT8 AS average_age
            FROM members m
            INNER JOIN teams t ON t.id = m.team_id
            GROUP BY t.name
            ORDER BY t.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
