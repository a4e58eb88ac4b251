use async_trait::async_trait;

use crate::domain::errors::RepositoryResult;
use crate::domain::team::Team;

/// Repository trait for teams
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Persist a new team and return it with its generated id
    async fn save(&self, team: &Team) -> RepositoryResult<Team>;

    /// Find a team by its ID
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Team>>;

    /// Find a team by its exact name
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Team>>;
}
