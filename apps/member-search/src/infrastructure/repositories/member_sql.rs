// SQL rendering for member/team view queries
// Every predicate value is bound, never interpolated

use sqlx::{Postgres, QueryBuilder};

use crate::domain::search::{
    Direction, MemberFilter, MemberPredicate, NullHandling, Sort, SortField,
};

/// Left join of members onto teams, flattened to view columns
pub(crate) const MEMBER_TEAM_VIEW: &str = r#"
    SELECT
        m.id AS member_id,
        m.username,
        m.age,
        t.id AS team_id,
        t.name AS team_name
    FROM members m
    LEFT JOIN teams t ON t.id = m.team_id
"#;

/// Starts `SELECT <view columns> FROM (<join>) AS v`
pub(crate) fn select_view<'args>() -> QueryBuilder<'args, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT v.member_id, v.username, v.age, v.team_id, v.team_name FROM (",
    );
    qb.push(MEMBER_TEAM_VIEW);
    qb.push(") AS v");
    qb
}

/// Appends ` WHERE p1 AND p2 ...` over the `v` alias; nothing when unfiltered
pub(crate) fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &MemberFilter) {
    for (i, predicate) in filter.predicates().iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        match predicate {
            MemberPredicate::UsernameEq(username) => {
                qb.push("v.username = ").push_bind(username.clone());
            }
            MemberPredicate::TeamNameEq(team_name) => {
                qb.push("v.team_name = ").push_bind(team_name.clone());
            }
            MemberPredicate::AgeGoe(bound) => {
                qb.push("v.age >= ").push_bind(*bound);
            }
            MemberPredicate::AgeLoe(bound) => {
                qb.push("v.age <= ").push_bind(*bound);
            }
        }
    }
}

/// Appends ` ORDER BY ...` with unqualified view column names
pub(crate) fn push_order_by(qb: &mut QueryBuilder<'_, Postgres>, sort: &Sort) {
    if sort.is_unsorted() {
        return;
    }

    qb.push(" ORDER BY ");
    let mut keys = qb.separated(", ");
    for order in sort.orders() {
        let column = match order.field {
            SortField::MemberId => "member_id",
            SortField::Username => "username",
            SortField::Age => "age",
            SortField::TeamName => "team_name",
        };
        let direction = match order.direction {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        };
        let nulls = match order.nulls {
            NullHandling::Native => "",
            NullHandling::NullsFirst => " NULLS FIRST",
            NullHandling::NullsLast => " NULLS LAST",
        };
        keys.push(format!("{column} {direction}{nulls}"));
    }
}

/// Appends ` LIMIT $n OFFSET $m` for whichever bounds are set
pub(crate) fn push_window(
    qb: &mut QueryBuilder<'_, Postgres>,
    offset: Option<u64>,
    limit: Option<u64>,
) {
    if let Some(limit) = limit {
        qb.push(" LIMIT ").push_bind(to_sql_bigint(limit));
    }
    if let Some(offset) = offset {
        qb.push(" OFFSET ").push_bind(to_sql_bigint(offset));
    }
}

fn to_sql_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
