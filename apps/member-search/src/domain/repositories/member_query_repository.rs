use async_trait::async_trait;

use crate::domain::errors::RepositoryResult;
use crate::domain::search::{
    AgeStatistics, MemberFilter, MemberQuery, MemberTeamView, TeamAgeAverage,
};

/// Read-side store interface over the member/team left join
#[async_trait]
pub trait MemberQueryRepository: Send + Sync {
    /// Rows matching the query's filter, ordered and windowed as requested
    async fn fetch_views(&self, query: &MemberQuery) -> RepositoryResult<Vec<MemberTeamView>>;

    /// Number of rows matching the filter, ignoring any window
    async fn count_views(&self, filter: &MemberFilter) -> RepositoryResult<u64>;

    /// Windowed rows plus the unwindowed total, in a single round trip
    async fn fetch_views_with_total(
        &self,
        query: &MemberQuery,
    ) -> RepositoryResult<(Vec<MemberTeamView>, u64)>;

    /// Count, sum, average, max and min of every member's age
    async fn age_statistics(&self) -> RepositoryResult<AgeStatistics>;

    /// Average age per team, ordered by team name; teamless members excluded
    async fn average_age_by_team(&self) -> RepositoryResult<Vec<TeamAgeAverage>>;
}
