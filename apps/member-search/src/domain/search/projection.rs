use serde::{Deserialize, Serialize};

use crate::domain::member::Member;
use crate::domain::team::Team;

/// Flattened, read-only view of a member joined with its team
///
/// Produced by left-join queries: a member without a team still yields a
/// row, with `team_id` and `team_name` set to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberTeamView {
    pub member_id: i64,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
}

impl MemberTeamView {
    /// Joins a stored member with its (optional) team
    pub fn join(member_id: i64, member: &Member, team: Option<&Team>) -> Self {
        Self {
            member_id,
            username: member.username().map(str::to_string),
            age: member.age(),
            team_id: team.and_then(Team::id),
            team_name: team.map(|t| t.name().to_string()),
        }
    }
}

/// Aggregates over the age of every member
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AgeStatistics {
    pub count: i64,
    pub sum: Option<i64>,
    pub average: Option<f64>,
    pub max: Option<i32>,
    pub min: Option<i32>,
}

/// Average member age of a single team
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct TeamAgeAverage {
    pub team_name: String,
    pub average_age: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_without_team_leaves_team_fields_empty() {
        let member = Member::from_persistence(4, Some("member4".to_string()), 40, None);
        let view = MemberTeamView::join(4, &member, None);

        assert_eq!(view.member_id, 4);
        assert_eq!(view.team_id, None);
        assert_eq!(view.team_name, None);
    }

    #[test]
    fn join_with_team_copies_team_fields() {
        let team = Team::from_persistence(2, "teamB".to_string());
        let member = Member::from_persistence(3, Some("member3".to_string()), 30, Some(2));
        let view = MemberTeamView::join(3, &member, Some(&team));

        assert_eq!(view.team_id, Some(2));
        assert_eq!(view.team_name.as_deref(), Some("teamB"));
        assert_eq!(view.username.as_deref(), Some("member3"));
    }
}
