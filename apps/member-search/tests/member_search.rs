//! Search and pagination behaviour against the in-memory store
//!
//! These tests cover predicate composition, left-join semantics, both page
//! strategies and the count-query short-circuit.

mod common;

use async_trait::async_trait;
use member_search::domain::errors::{RepositoryError, RepositoryResult};
use member_search::domain::repositories::{
    MemberQueryRepository, MemberRepository, TeamRepository,
};
use member_search::domain::search::{
    AgeStatistics, MemberFilter, MemberQuery, MemberSearchCondition, MemberSearchService,
    MemberTeamView, Order, PageRequest, Sort, SortField, TeamAgeAverage,
};
use member_search::infrastructure::repositories::{InMemoryStore, QueryStats};

use common::{save_teamless, seed_members};

async fn seeded_service() -> MemberSearchService<InMemoryStore> {
    let store = InMemoryStore::new();
    seed_members(&store, &store).await;
    MemberSearchService::new(store)
}

fn usernames(views: &[MemberTeamView]) -> Vec<&str> {
    views
        .iter()
        .map(|v| v.username.as_deref().unwrap_or("<null>"))
        .collect()
}

fn sorted_by_id(mut views: Vec<MemberTeamView>) -> Vec<MemberTeamView> {
    views.sort_by_key(|v| v.member_id);
    views
}

#[tokio::test]
async fn test_empty_condition_returns_every_member_including_teamless() {
    let store = InMemoryStore::new();
    seed_members(&store, &store).await;
    save_teamless(&store, Some("loner"), 50).await;
    let service = MemberSearchService::new(store);

    let result = service
        .search(&MemberSearchCondition::default())
        .await
        .expect("search should succeed");

    assert_eq!(result.len(), 5);
    let loner = result
        .iter()
        .find(|v| v.username.as_deref() == Some("loner"))
        .expect("teamless member should be present");
    assert_eq!(loner.team_id, None);
    assert_eq!(loner.team_name, None);

    assert_eq!(result, service.find_all().await.unwrap());
}

#[tokio::test]
async fn test_single_field_conditions_match_reference_filter() {
    let service = seeded_service().await;
    let all = service.find_all().await.unwrap();

    type Reference = Box<dyn Fn(&MemberTeamView) -> bool>;
    let cases: Vec<(MemberSearchCondition, Reference)> = vec![
        (
            MemberSearchCondition::default().with_username("member2"),
            Box::new(|v: &MemberTeamView| v.username.as_deref() == Some("member2")),
        ),
        (
            MemberSearchCondition::default().with_team_name("teamA"),
            Box::new(|v: &MemberTeamView| v.team_name.as_deref() == Some("teamA")),
        ),
        (
            MemberSearchCondition::default().with_age_goe(25),
            Box::new(|v: &MemberTeamView| v.age >= 25),
        ),
        (
            MemberSearchCondition::default().with_age_loe(25),
            Box::new(|v: &MemberTeamView| v.age <= 25),
        ),
        (
            MemberSearchCondition::default().with_username("nobody"),
            Box::new(|_: &MemberTeamView| false),
        ),
    ];

    for (condition, reference) in cases {
        let expected: Vec<MemberTeamView> = all.iter().filter(|v| reference(v)).cloned().collect();
        let actual = service.search(&condition).await.unwrap();
        assert_eq!(sorted_by_id(actual), expected, "condition {:?}", condition);
    }
}

#[tokio::test]
async fn test_age_bounds_are_inclusive() {
    let service = seeded_service().await;

    let lower = service
        .search(&MemberSearchCondition::default().with_age_goe(40))
        .await
        .unwrap();
    assert_eq!(usernames(&lower), vec!["member4"]);

    let upper = service
        .search(&MemberSearchCondition::default().with_age_loe(10))
        .await
        .unwrap();
    assert_eq!(usernames(&upper), vec!["member1"]);
}

#[tokio::test]
async fn test_age_range_returns_three_members() {
    let service = seeded_service().await;
    let condition = MemberSearchCondition::default()
        .with_age_goe(10)
        .with_age_loe(30);

    let result = service.search(&condition).await.unwrap();

    let mut ages: Vec<i32> = result.iter().map(|v| v.age).collect();
    ages.sort_unstable();
    assert_eq!(ages, vec![10, 20, 30]);
}

#[tokio::test]
async fn test_team_name_returns_team_b_members() {
    let service = seeded_service().await;
    let condition = MemberSearchCondition::default().with_team_name("teamB");

    let result = sorted_by_id(service.search(&condition).await.unwrap());

    assert_eq!(usernames(&result), vec!["member3", "member4"]);
    assert!(result.iter().all(|v| v.team_name.as_deref() == Some("teamB")));
}

#[tokio::test]
async fn test_blank_strings_apply_no_filter() {
    let service = seeded_service().await;
    let condition = MemberSearchCondition::default()
        .with_username("  ")
        .with_team_name("");

    let result = service.search(&condition).await.unwrap();
    assert_eq!(result.len(), 4);
}

#[tokio::test]
async fn test_inverted_age_bounds_return_empty_result() {
    let service = seeded_service().await;
    let condition = MemberSearchCondition::default()
        .with_age_goe(30)
        .with_age_loe(20);

    let result = service.search(&condition).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_complex_page_skips_count_when_first_page_is_complete() {
    let service = seeded_service().await;
    let request = PageRequest::new(0, 10).unwrap();

    let page = service
        .search_page_complex(&MemberSearchCondition::default(), &request)
        .await
        .unwrap();

    assert_eq!(page.content().len(), 4);
    assert_eq!(page.total(), 4);
    assert_eq!(
        service.repository().query_stats(),
        QueryStats {
            fetches: 1,
            counts: 0,
            combined: 0,
        }
    );
}

#[tokio::test]
async fn test_complex_page_counts_when_first_page_is_full() {
    let service = seeded_service().await;
    let request = PageRequest::new(0, 2).unwrap();

    let page = service
        .search_page_complex(&MemberSearchCondition::default(), &request)
        .await
        .unwrap();

    assert_eq!(page.content().len(), 2);
    assert_eq!(page.total(), 4);
    assert_eq!(service.repository().query_stats().counts, 1);
}

#[tokio::test]
async fn test_simple_page_sorted_by_username_desc() {
    let service = seeded_service().await;
    let request = PageRequest::new(1, 2)
        .unwrap()
        .with_sort(Sort::by([Order::desc(SortField::Username)]));

    let page = service
        .search_page_simple(&MemberSearchCondition::default(), &request)
        .await
        .unwrap();

    assert_eq!(usernames(page.content()), vec!["member3", "member2"]);
    assert_eq!(page.total(), 4);
    assert_eq!(page.offset(), 1);
    assert_eq!(page.size(), 2);
    assert_eq!(service.repository().query_stats().combined, 1);
}

#[tokio::test]
async fn test_simple_and_complex_pages_agree() {
    let service = seeded_service().await;
    let by_name = Sort::by([Order::asc(SortField::Username)]);

    let conditions = [
        MemberSearchCondition::default(),
        MemberSearchCondition::default().with_team_name("teamA"),
        MemberSearchCondition::default().with_age_goe(20),
        MemberSearchCondition::default().with_age_goe(50),
    ];
    let windows = [(0, 1), (0, 2), (0, 10), (1, 2), (2, 2), (3, 5), (8, 2)];

    for condition in &conditions {
        for (offset, size) in windows {
            let request = PageRequest::new(offset, size)
                .unwrap()
                .with_sort(by_name.clone());

            let simple = service.search_page_simple(condition, &request).await.unwrap();
            let complex = service.search_page_complex(condition, &request).await.unwrap();

            assert_eq!(
                simple, complex,
                "condition {:?}, offset {}, size {}",
                condition, offset, size
            );
        }
    }
}

#[tokio::test]
async fn test_offset_past_last_row_returns_empty_content_with_total() {
    let service = seeded_service().await;
    let request = PageRequest::new(10, 2).unwrap();
    let condition = MemberSearchCondition::default();

    let simple = service.search_page_simple(&condition, &request).await.unwrap();
    let complex = service.search_page_complex(&condition, &request).await.unwrap();

    for page in [simple, complex] {
        assert!(page.content().is_empty());
        assert_eq!(page.total(), 4);
        assert!(!page.has_next());
    }
}

#[tokio::test]
async fn test_sort_by_age_desc_then_username_nulls_last() {
    let service = seeded_service().await;
    let store = service.repository();
    save_teamless(store, None, 100).await;
    save_teamless(store, Some("member5"), 100).await;
    save_teamless(store, Some("member6"), 100).await;

    let sort = Sort::by([Order::desc(SortField::Age)])
        .and(Order::asc(SortField::Username).nulls_last());
    let result = service
        .search_sorted(&MemberSearchCondition::default().with_age_goe(100), sort)
        .await
        .unwrap();

    assert_eq!(usernames(&result), vec!["member5", "member6", "<null>"]);
}

#[tokio::test]
async fn test_age_statistics_and_team_averages() {
    let service = seeded_service().await;

    let stats = service.age_statistics().await.unwrap();
    assert_eq!(stats.count, 4);
    assert_eq!(stats.sum, Some(100));
    assert_eq!(stats.average, Some(25.0));
    assert_eq!(stats.max, Some(40));
    assert_eq!(stats.min, Some(10));

    save_teamless(service.repository(), Some("loner"), 99).await;
    let averages = service.average_age_by_team().await.unwrap();
    let pairs: Vec<(&str, f64)> = averages
        .iter()
        .map(|a| (a.team_name.as_str(), a.average_age))
        .collect();
    assert_eq!(pairs, vec![("teamA", 15.0), ("teamB", 35.0)]);
}

#[tokio::test]
async fn test_entity_lookups() {
    let store = InMemoryStore::new();
    let seeded = seed_members(&store, &store).await;

    let member1 = &seeded.members[0];
    let found = MemberRepository::find_by_id(&store, member1.id().unwrap())
        .await
        .unwrap();
    assert_eq!(found.as_ref(), Some(member1));

    let by_name = store.find_by_username("member1").await.unwrap();
    assert_eq!(by_name, vec![member1.clone()]);

    let team_b_id = seeded.team_b.id().unwrap();
    let team_b_members = store.find_by_team(team_b_id).await.unwrap();
    assert_eq!(team_b_members.len(), 2);
    assert!(team_b_members.iter().all(|m| m.team_id() == Some(team_b_id)));

    let team_a = store.find_by_name("teamA").await.unwrap();
    assert_eq!(team_a, Some(seeded.team_a.clone()));
    assert_eq!(
        TeamRepository::find_by_id(&store, 999).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_sort_by_team_name_places_teamless_rows_natively() {
    let store = InMemoryStore::new();
    seed_members(&store, &store).await;
    save_teamless(&store, Some("loner"), 50).await;
    let service = MemberSearchService::new(store);
    let everyone = MemberSearchCondition::default();

    let ascending = service
        .search_sorted(
            &everyone,
            Sort::by([Order::asc(SortField::TeamName)]).and(Order::asc(SortField::MemberId)),
        )
        .await
        .unwrap();
    assert_eq!(
        usernames(&ascending),
        vec!["member1", "member2", "member3", "member4", "loner"]
    );

    let descending = service
        .search_sorted(
            &everyone,
            Sort::by([Order::desc(SortField::TeamName)]).and(Order::asc(SortField::MemberId)),
        )
        .await
        .unwrap();
    assert_eq!(
        usernames(&descending),
        vec!["loner", "member3", "member4", "member1", "member2"]
    );
}

#[tokio::test]
async fn test_saved_member_keeps_team_assigned_at_construction() {
    let store = InMemoryStore::new();
    let seeded = seed_members(&store, &store).await;
    let member1 = &seeded.members[0];

    let resave = MemberRepository::save(&store, member1).await;
    assert!(matches!(
        resave,
        Err(RepositoryError::AlreadyPersisted { entity: "Member", .. })
    ));

    let stored = MemberRepository::find_by_id(&store, member1.id().unwrap())
        .await
        .unwrap()
        .expect("member should exist");
    assert_eq!(stored.team_id(), seeded.team_a.id());

    let team_b_rows = MemberSearchService::new(store)
        .search(&MemberSearchCondition::default().with_team_name("teamB"))
        .await
        .unwrap();
    assert_eq!(usernames(&team_b_rows), vec!["member3", "member4"]);
}

/// Store whose view queries fail; `fetch_views` can be allowed to succeed
struct UnavailableStore {
    rows: Vec<MemberTeamView>,
    fetch_succeeds: bool,
}

impl UnavailableStore {
    fn unavailable() -> RepositoryError {
        RepositoryError::Database(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl MemberQueryRepository for UnavailableStore {
    async fn fetch_views(&self, _query: &MemberQuery) -> RepositoryResult<Vec<MemberTeamView>> {
        if self.fetch_succeeds {
            Ok(self.rows.clone())
        } else {
            Err(Self::unavailable())
        }
    }

    async fn count_views(&self, _filter: &MemberFilter) -> RepositoryResult<u64> {
        Err(Self::unavailable())
    }

    async fn fetch_views_with_total(
        &self,
        _query: &MemberQuery,
    ) -> RepositoryResult<(Vec<MemberTeamView>, u64)> {
        Err(Self::unavailable())
    }

    async fn age_statistics(&self) -> RepositoryResult<AgeStatistics> {
        Err(Self::unavailable())
    }

    async fn average_age_by_team(&self) -> RepositoryResult<Vec<TeamAgeAverage>> {
        Err(Self::unavailable())
    }
}

fn row(member_id: i64) -> MemberTeamView {
    MemberTeamView {
        member_id,
        username: Some(format!("member{}", member_id)),
        age: 10,
        team_id: None,
        team_name: None,
    }
}

#[tokio::test]
async fn test_simple_page_propagates_store_failure() {
    let service = MemberSearchService::new(UnavailableStore {
        rows: Vec::new(),
        fetch_succeeds: false,
    });
    let request = PageRequest::new(0, 10).unwrap();

    let result = service
        .search_page_simple(&MemberSearchCondition::default(), &request)
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    ));
}

#[tokio::test]
async fn test_complex_page_propagates_fetch_failure() {
    let service = MemberSearchService::new(UnavailableStore {
        rows: Vec::new(),
        fetch_succeeds: false,
    });
    let request = PageRequest::new(0, 10).unwrap();

    let result = service
        .search_page_complex(&MemberSearchCondition::default(), &request)
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    ));
}

#[tokio::test]
async fn test_complex_page_propagates_count_failure() {
    let service = MemberSearchService::new(UnavailableStore {
        rows: vec![row(1), row(2)],
        fetch_succeeds: true,
    });
    // A full page forces the count query, which fails.
    let request = PageRequest::new(0, 2).unwrap();

    let result = service
        .search_page_complex(&MemberSearchCondition::default(), &request)
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    ));
}
