use super::page::{PageRequest, Sort};
use super::predicate::MemberFilter;

/// A read query over the member/team left join
///
/// Carries the filter, the ordering and an optional offset/limit window.
/// Stores translate it into whatever their engine executes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberQuery {
    pub filter: MemberFilter,
    pub sort: Sort,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl MemberQuery {
    pub fn new(filter: MemberFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Applies the window and ordering of a page request
    pub fn paged(mut self, request: &PageRequest) -> Self {
        self.sort = request.sort().clone();
        self.offset = Some(request.offset());
        self.limit = Some(request.size());
        self
    }
}
