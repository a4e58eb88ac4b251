use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::member::Member;
use crate::domain::repositories::{MemberQueryRepository, MemberRepository, TeamRepository};
use crate::domain::search::{
    AgeStatistics, MemberFilter, MemberQuery, MemberTeamView, TeamAgeAverage,
};
use crate::domain::team::Team;

/// Number of view queries issued against an [`InMemoryStore`], by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    pub fetches: usize,
    pub counts: usize,
    pub combined: usize,
}

#[derive(Debug, Default)]
struct Tables {
    teams: BTreeMap<i64, Team>,
    members: BTreeMap<i64, Member>,
    next_team_id: i64,
    next_member_id: i64,
}

impl Tables {
    /// Left join of every member onto its team, in member id order
    fn joined_views(&self) -> Vec<MemberTeamView> {
        self.members
            .iter()
            .map(|(id, member)| {
                let team = member.team_id().and_then(|team_id| self.teams.get(&team_id));
                MemberTeamView::join(*id, member, team)
            })
            .collect()
    }

    fn filtered_views(&self, filter: &MemberFilter) -> Vec<MemberTeamView> {
        self.joined_views()
            .into_iter()
            .filter(|view| filter.matches(view))
            .collect()
    }
}

#[derive(Debug, Default)]
struct Counters {
    fetches: AtomicUsize,
    counts: AtomicUsize,
    combined: AtomicUsize,
}

/// In-process store implementing every repository trait
///
/// Behaves like the PostgreSQL adapter (left join, native null ordering,
/// offset/limit windows) without a database. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    counters: Arc<Counters>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of how many view queries have been issued so far
    pub fn query_stats(&self) -> QueryStats {
        QueryStats {
            fetches: self.counters.fetches.load(Ordering::Relaxed),
            counts: self.counters.counts.load(Ordering::Relaxed),
            combined: self.counters.combined.load(Ordering::Relaxed),
        }
    }
}

fn apply_query(mut views: Vec<MemberTeamView>, query: &MemberQuery) -> Vec<MemberTeamView> {
    if !query.sort.is_unsorted() {
        views.sort_by(|a, b| query.sort.compare(a, b));
    }

    let offset = query
        .offset
        .map_or(0, |offset| usize::try_from(offset).unwrap_or(usize::MAX));
    let limit = query
        .limit
        .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));

    views.into_iter().skip(offset).take(limit).collect()
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn save(&self, team: &Team) -> RepositoryResult<Team> {
        if let Some(id) = team.id() {
            return Err(RepositoryError::AlreadyPersisted { entity: "Team", id });
        }

        let mut tables = self.tables.write().await;
        tables.next_team_id += 1;
        let id = tables.next_team_id;
        let saved = Team::from_persistence(id, team.name().to_string());
        tables.teams.insert(id, saved.clone());

        tracing::debug!(team_id = id, name = team.name(), "Saved team");
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Team>> {
        Ok(self.tables.read().await.teams.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Team>> {
        let tables = self.tables.read().await;
        Ok(tables.teams.values().find(|t| t.name() == name).cloned())
    }
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn save(&self, member: &Member) -> RepositoryResult<Member> {
        if let Some(id) = member.id() {
            return Err(RepositoryError::AlreadyPersisted { entity: "Member", id });
        }

        let mut tables = self.tables.write().await;
        if let Some(team_id) = member.team_id() {
            if !tables.teams.contains_key(&team_id) {
                return Err(RepositoryError::TeamNotFound(team_id));
            }
        }

        tables.next_member_id += 1;
        let id = tables.next_member_id;
        let saved = Member::from_persistence(
            id,
            member.username().map(str::to_string),
            member.age(),
            member.team_id(),
        );
        tables.members.insert(id, saved.clone());

        tracing::debug!(member_id = id, "Saved member");
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Member>> {
        Ok(self.tables.read().await.members.get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Member>> {
        Ok(self.tables.read().await.members.values().cloned().collect())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Vec<Member>> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .values()
            .filter(|m| m.username() == Some(username))
            .cloned()
            .collect())
    }

    async fn find_by_team(&self, team_id: i64) -> RepositoryResult<Vec<Member>> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .values()
            .filter(|m| m.team_id() == Some(team_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MemberQueryRepository for InMemoryStore {
    async fn fetch_views(&self, query: &MemberQuery) -> RepositoryResult<Vec<MemberTeamView>> {
        self.counters.fetches.fetch_add(1, Ordering::Relaxed);
        let tables = self.tables.read().await;
        Ok(apply_query(tables.filtered_views(&query.filter), query))
    }

    async fn count_views(&self, filter: &MemberFilter) -> RepositoryResult<u64> {
        self.counters.counts.fetch_add(1, Ordering::Relaxed);
        let tables = self.tables.read().await;
        Ok(tables.filtered_views(filter).len() as u64)
    }

    async fn fetch_views_with_total(
        &self,
        query: &MemberQuery,
    ) -> RepositoryResult<(Vec<MemberTeamView>, u64)> {
        self.counters.combined.fetch_add(1, Ordering::Relaxed);
        let tables = self.tables.read().await;
        let views = tables.filtered_views(&query.filter);
        let total = views.len() as u64;

        Ok((apply_query(views, query), total))
    }

    async fn age_statistics(&self) -> RepositoryResult<AgeStatistics> {
        let tables = self.tables.read().await;
        let ages: Vec<i32> = tables.members.values().map(Member::age).collect();

        let count = ages.len() as i64;
        let sum = (count > 0).then(|| ages.iter().map(|&age| i64::from(age)).sum::<i64>());

        Ok(AgeStatistics {
            count,
            sum,
            average: sum.map(|sum| sum as f64 / count as f64),
            max: ages.iter().copied().max(),
            min: ages.iter().copied().min(),
        })
    }

    async fn average_age_by_team(&self) -> RepositoryResult<Vec<TeamAgeAverage>> {
        let tables = self.tables.read().await;
        let mut by_team: BTreeMap<&str, (i64, i64)> = BTreeMap::new();

        for member in tables.members.values() {
            let Some(team) = member.team_id().and_then(|id| tables.teams.get(&id)) else {
                continue;
            };
            let entry = by_team.entry(team.name()).or_default();
            entry.0 += i64::from(member.age());
            entry.1 += 1;
        }

        Ok(by_team
            .into_iter()
            .map(|(team_name, (sum, count))| TeamAgeAverage {
                team_name: team_name.to_string(),
                average_age: sum as f64 / count as f64,
            })
            .collect())
    }
}
