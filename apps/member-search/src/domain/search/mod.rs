// Member search module
// Search criteria, predicate composition, pagination and the search service

pub mod condition;
pub mod page;
pub mod predicate;
pub mod projection;
pub mod query;
pub mod service;

pub use condition::MemberSearchCondition;
pub use page::{Direction, NullHandling, Order, Page, PageRequest, Sort, SortField};
pub use predicate::{build_predicates, MemberFilter, MemberPredicate};
pub use projection::{AgeStatistics, MemberTeamView, TeamAgeAverage};
pub use query::MemberQuery;
pub use service::MemberSearchService;
