use std::error::Error;

use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use member_search::config::Config;
use member_search::domain::member::Member;
use member_search::domain::repositories::{
    MemberQueryRepository, MemberRepository, TeamRepository,
};
use member_search::domain::search::{
    MemberSearchCondition, MemberSearchService, Order, PageRequest, Sort, SortField,
};
use member_search::domain::team::Team;
use member_search::infrastructure::repositories::{
    InMemoryStore, PostgresMemberRepository, PostgresTeamRepository,
};
use member_search::infrastructure::schema::ensure_schema;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    if let Err(e) = run(&config).await {
        tracing::error!("Member search failed: {}", e);
        return Err(e);
    }

    Ok(())
}

async fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await?;
            tracing::info!("Database connected successfully");

            ensure_schema(&pool).await?;

            let teams = PostgresTeamRepository::new(pool.clone());
            let members = PostgresMemberRepository::new(pool);
            seed_sample_data(&teams, &members).await?;

            report(MemberSearchService::new(members), config.page_size).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            let store = InMemoryStore::new();
            seed_sample_data(&store, &store).await?;

            report(MemberSearchService::new(store), config.page_size).await
        }
    }
}

/// Inserts teamA/teamB with four members, unless members already exist
async fn seed_sample_data<T, M>(teams: &T, members: &M) -> Result<(), Box<dyn Error>>
where
    T: TeamRepository,
    M: MemberRepository,
{
    if !members.find_all().await?.is_empty() {
        tracing::info!("Members already present, skipping sample data");
        return Ok(());
    }

    let team_a = teams.save(&Team::new("teamA")?).await?;
    let team_b = teams.save(&Team::new("teamB")?).await?;

    let roster = [
        ("member1", 10, &team_a),
        ("member2", 20, &team_a),
        ("member3", 30, &team_b),
        ("member4", 40, &team_b),
    ];
    for (username, age, team) in roster {
        members
            .save(&Member::new(Some(username.to_string()), age, Some(team))?)
            .await?;
    }

    tracing::info!("Sample data inserted");
    Ok(())
}

async fn report<R>(service: MemberSearchService<R>, page_size: u64) -> Result<(), Box<dyn Error>>
where
    R: MemberQueryRepository,
{
    print_json("all members", &service.find_all().await?)?;

    let by_age = MemberSearchCondition::default()
        .with_age_goe(10)
        .with_age_loe(30);
    print_json("age 10..=30", &service.search(&by_age).await?)?;

    let by_team = MemberSearchCondition::default().with_team_name("teamB");
    print_json("teamB", &service.search(&by_team).await?)?;

    let request = PageRequest::new(0, page_size)?
        .with_sort(Sort::by([Order::desc(SortField::Username)]));
    let everyone = MemberSearchCondition::default();
    print_json(
        "page (combined count)",
        &service.search_page_simple(&everyone, &request).await?,
    )?;
    print_json(
        "page (deferred count)",
        &service.search_page_complex(&everyone, &request).await?,
    )?;

    print_json("age statistics", &service.age_statistics().await?)?;
    print_json("average age by team", &service.average_age_by_team().await?)?;

    Ok(())
}

fn print_json<T: Serialize>(label: &str, value: &T) -> Result<(), Box<dyn Error>> {
    println!("== {}\n{}", label, serde_json::to_string_pretty(value)?);
    Ok(())
}
