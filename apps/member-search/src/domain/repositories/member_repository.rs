use async_trait::async_trait;

use crate::domain::errors::RepositoryResult;
use crate::domain::member::Member;

/// Repository trait for member entities
///
/// Plain entity access. Joined, filtered and paginated reads live on
/// [`MemberQueryRepository`](super::MemberQueryRepository).
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Persist a new member and return it with its generated id
    ///
    /// Fails if the member already has an id or references an unknown team.
    async fn save(&self, member: &Member) -> RepositoryResult<Member>;

    /// Find a member by ID
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Member>>;

    /// All members, ordered by id
    async fn find_all(&self) -> RepositoryResult<Vec<Member>>;

    /// Members with exactly this username, ordered by id
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Vec<Member>>;

    /// Members currently belonging to the team, ordered by id
    async fn find_by_team(&self, team_id: i64) -> RepositoryResult<Vec<Member>>;
}
