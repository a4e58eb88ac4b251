use serde::{Deserialize, Serialize};

/// Team entity
///
/// A team only knows its own identity and name. The members belonging to a
/// team are resolved at query time through `MemberRepository::find_by_team`;
/// a team never owns the lifetime of its members.
///
/// # Example
/// ```
/// use member_search::domain::team::Team;
///
/// let team = Team::new("teamA").expect("valid team");
/// assert_eq!(team.name(), "teamA");
/// assert!(team.id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: Option<i64>,
    name: String,
}

impl Team {
    /// Creates a new, not yet persisted team
    ///
    /// # Returns
    /// * `Ok(Team)` - Team without an identity
    /// * `Err(String)` - If the name is blank
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Team name cannot be empty".to_string());
        }

        Ok(Self { id: None, name })
    }

    /// Reconstructs a team from stored state
    pub fn from_persistence(id: i64, name: String) -> Self {
        Self { id: Some(id), name }
    }

    /// Returns the store-assigned id, `None` until saved
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
