use crate::domain::errors::RepositoryResult;
use crate::domain::repositories::MemberQueryRepository;

use super::condition::MemberSearchCondition;
use super::page::{Page, PageRequest, Sort};
use super::predicate::MemberFilter;
use super::projection::{AgeStatistics, MemberTeamView, TeamAgeAverage};
use super::query::MemberQuery;

/// Member search over the member/team left join
///
/// Turns a [`MemberSearchCondition`] into a [`MemberQuery`] and runs it
/// against the repository handle it was built with. The service keeps no
/// state between calls: every call composes a fresh filter and issues fresh
/// queries, so one instance can serve concurrent callers.
///
/// Two pagination strategies are offered:
/// - [`search_page_simple`](Self::search_page_simple) asks the store for
///   content and total in one round trip, always paying for the count.
/// - [`search_page_complex`](Self::search_page_complex) fetches the content
///   first and only issues the count query when the total cannot be
///   derived from the content itself.
pub struct MemberSearchService<R> {
    repository: R,
}

impl<R> MemberSearchService<R>
where
    R: MemberQueryRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Every member joined with its team, unfiltered and unpaginated
    pub async fn find_all(&self) -> RepositoryResult<Vec<MemberTeamView>> {
        self.repository.fetch_views(&MemberQuery::default()).await
    }

    /// Members matching the condition, in store order
    pub async fn search(
        &self,
        condition: &MemberSearchCondition,
    ) -> RepositoryResult<Vec<MemberTeamView>> {
        self.search_sorted(condition, Sort::unsorted()).await
    }

    /// Members matching the condition, ordered by `sort`
    pub async fn search_sorted(
        &self,
        condition: &MemberSearchCondition,
        sort: Sort,
    ) -> RepositoryResult<Vec<MemberTeamView>> {
        let query = MemberQuery::new(MemberFilter::from_condition(condition)).sorted(sort);
        tracing::debug!(predicates = query.filter.predicates().len(), "Searching members");

        self.repository.fetch_views(&query).await
    }

    /// One page of matching members; content and total in a single round trip
    pub async fn search_page_simple(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
    ) -> RepositoryResult<Page<MemberTeamView>> {
        let query = MemberQuery::new(MemberFilter::from_condition(condition)).paged(request);
        tracing::debug!(
            offset = request.offset(),
            size = request.size(),
            "Searching member page with combined count"
        );

        let (content, total) = self.repository.fetch_views_with_total(&query).await?;
        Ok(Page::new(content, request, total))
    }

    /// One page of matching members; the count query runs only when needed
    ///
    /// On the first page (offset 0), a result shorter than the page size is
    /// the complete result and its length is reported as the total without a
    /// count query.
    pub async fn search_page_complex(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
    ) -> RepositoryResult<Page<MemberTeamView>> {
        let filter = MemberFilter::from_condition(condition);
        let query = MemberQuery::new(filter.clone()).paged(request);
        tracing::debug!(
            offset = request.offset(),
            size = request.size(),
            "Searching member page with deferred count"
        );

        let content = self.repository.fetch_views(&query).await?;
        Page::from_count_supplier(content, request, || self.repository.count_views(&filter)).await
    }

    /// Count, sum, average, max and min of member ages
    pub async fn age_statistics(&self) -> RepositoryResult<AgeStatistics> {
        self.repository.age_statistics().await
    }

    /// Average member age per team, ordered by team name
    pub async fn average_age_by_team(&self) -> RepositoryResult<Vec<TeamAgeAverage>> {
        self.repository.average_age_by_team().await
    }
}
