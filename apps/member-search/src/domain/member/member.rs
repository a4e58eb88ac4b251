use serde::{Deserialize, Serialize};

use crate::domain::team::Team;

/// Member entity
///
/// A member belongs to at most one team. The reference is held as the
/// team's id, so only a persisted team can be assigned.
///
/// # Invariants
/// - `team_id`, when present, points at a team that has been saved
/// - `id` is assigned by the store, never by the caller
/// - fields are fixed after construction; only the store produces changed state
///
/// # Example
/// ```
/// use member_search::domain::member::Member;
/// use member_search::domain::team::Team;
///
/// let team = Team::from_persistence(1, "teamA".to_string());
/// let member = Member::new(Some("member1".to_string()), 10, Some(&team))
///     .expect("valid member");
///
/// assert_eq!(member.username(), Some("member1"));
/// assert_eq!(member.team_id(), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    id: Option<i64>,
    username: Option<String>,
    age: i32,
    team_id: Option<i64>,
}

impl Member {
    /// Creates a new, not yet persisted member
    ///
    /// # Arguments
    /// * `username` - Optional username
    /// * `age` - Age in years
    /// * `team` - Team to join, must already be saved
    ///
    /// # Returns
    /// * `Err(String)` - If the team has no identity yet
    pub fn new(username: Option<String>, age: i32, team: Option<&Team>) -> Result<Self, String> {
        let team_id = team.map(Self::persisted_team_id).transpose()?;

        Ok(Self {
            id: None,
            username,
            age,
            team_id,
        })
    }

    /// Reconstructs a member from stored state
    pub fn from_persistence(
        id: i64,
        username: Option<String>,
        age: i32,
        team_id: Option<i64>,
    ) -> Self {
        Self {
            id: Some(id),
            username,
            age,
            team_id,
        }
    }

    fn persisted_team_id(team: &Team) -> Result<i64, String> {
        team.id()
            .ok_or_else(|| format!("Team '{}' must be saved before members can join", team.name()))
    }

    // ===== Getters =====

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn team_id(&self) -> Option<i64> {
        self.team_id
    }
}
