use super::condition::MemberSearchCondition;
use super::projection::MemberTeamView;

/// A single filter over the member/team join
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberPredicate {
    /// `username = value`
    UsernameEq(String),
    /// `team_name = value`
    TeamNameEq(String),
    /// `age >= bound`
    AgeGoe(i32),
    /// `age <= bound`
    AgeLoe(i32),
}

impl MemberPredicate {
    /// Evaluates the predicate against one joined row
    ///
    /// A `NULL` column never satisfies an equality, matching SQL semantics.
    pub fn matches(&self, view: &MemberTeamView) -> bool {
        match self {
            MemberPredicate::UsernameEq(username) => {
                view.username.as_deref() == Some(username.as_str())
            }
            MemberPredicate::TeamNameEq(team_name) => {
                view.team_name.as_deref() == Some(team_name.as_str())
            }
            MemberPredicate::AgeGoe(bound) => view.age >= *bound,
            MemberPredicate::AgeLoe(bound) => view.age <= *bound,
        }
    }
}

fn has_text(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn username_eq(username: Option<&str>) -> Option<MemberPredicate> {
    has_text(username).map(|u| MemberPredicate::UsernameEq(u.to_string()))
}

pub fn team_name_eq(team_name: Option<&str>) -> Option<MemberPredicate> {
    has_text(team_name).map(|t| MemberPredicate::TeamNameEq(t.to_string()))
}

pub fn age_goe(age_goe: Option<i32>) -> Option<MemberPredicate> {
    age_goe.map(MemberPredicate::AgeGoe)
}

pub fn age_loe(age_loe: Option<i32>) -> Option<MemberPredicate> {
    age_loe.map(MemberPredicate::AgeLoe)
}

/// Builds one optional predicate per condition field
///
/// The array order is fixed: username, team name, lower bound, upper bound.
/// Absent or blank fields yield `None`.
pub fn build_predicates(condition: &MemberSearchCondition) -> [Option<MemberPredicate>; 4] {
    [
        username_eq(condition.username.as_deref()),
        team_name_eq(condition.team_name.as_deref()),
        age_goe(condition.age_goe),
        age_loe(condition.age_loe),
    ]
}

/// Conjunction of member predicates
///
/// An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    predicates: Vec<MemberPredicate>,
}

impl MemberFilter {
    /// Filter that matches everything
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// AND-reduces the present predicates, skipping `None` entries
    pub fn all_of<I>(predicates: I) -> Self
    where
        I: IntoIterator<Item = Option<MemberPredicate>>,
    {
        Self {
            predicates: predicates.into_iter().flatten().collect(),
        }
    }

    pub fn from_condition(condition: &MemberSearchCondition) -> Self {
        Self::all_of(build_predicates(condition))
    }

    pub fn predicates(&self) -> &[MemberPredicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, view: &MemberTeamView) -> bool {
        self.predicates.iter().all(|p| p.matches(view))
    }
}
