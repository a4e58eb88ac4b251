//! Shared fixtures for integration tests

#![allow(dead_code)]

use member_search::domain::member::Member;
use member_search::domain::repositories::{MemberRepository, TeamRepository};
use member_search::domain::team::Team;

/// Teams and members created by [`seed_members`]
pub struct Seeded {
    pub team_a: Team,
    pub team_b: Team,
    pub members: Vec<Member>,
}

/// teamA: member1 (10), member2 (20); teamB: member3 (30), member4 (40)
pub async fn seed_members<T, M>(teams: &T, members: &M) -> Seeded
where
    T: TeamRepository,
    M: MemberRepository,
{
    let team_a = teams
        .save(&Team::new("teamA").expect("valid team"))
        .await
        .expect("Failed to save teamA");
    let team_b = teams
        .save(&Team::new("teamB").expect("valid team"))
        .await
        .expect("Failed to save teamB");

    let mut saved = Vec::new();
    for (username, age, team) in [
        ("member1", 10, &team_a),
        ("member2", 20, &team_a),
        ("member3", 30, &team_b),
        ("member4", 40, &team_b),
    ] {
        let member = Member::new(Some(username.to_string()), age, Some(team)).expect("valid member");
        saved.push(members.save(&member).await.expect("Failed to save member"));
    }

    Seeded {
        team_a,
        team_b,
        members: saved,
    }
}

/// Saves a member that belongs to no team
pub async fn save_teamless<M: MemberRepository>(members: &M, username: Option<&str>, age: i32) -> Member {
    let member = Member::new(username.map(str::to_string), age, None).expect("valid member");
    members.save(&member).await.expect("Failed to save member")
}
