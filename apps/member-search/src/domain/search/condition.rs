use serde::{Deserialize, Serialize};

/// Search criteria for members
///
/// Every field is optional. A field that is absent (or a blank string)
/// applies no filter on its dimension.
///
/// # Example
/// ```
/// use member_search::domain::search::MemberSearchCondition;
///
/// let condition = MemberSearchCondition::default()
///     .with_age_goe(10)
///     .with_age_loe(30);
///
/// assert_eq!(condition.age_goe, Some(10));
/// assert!(condition.username.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSearchCondition {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "teamName")]
    pub team_name: Option<String>,
    /// Inclusive lower bound on age
    #[serde(default, alias = "ageGoe")]
    pub age_goe: Option<i32>,
    /// Inclusive upper bound on age
    #[serde(default, alias = "ageLoe")]
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    pub fn with_age_goe(mut self, age_goe: i32) -> Self {
        self.age_goe = Some(age_goe);
        self
    }

    pub fn with_age_loe(mut self, age_loe: i32) -> Self {
        self.age_loe = Some(age_loe);
        self
    }
}
