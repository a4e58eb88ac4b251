use std::cmp::Ordering;
use std::future::Future;

use serde::Serialize;

use super::projection::MemberTeamView;

/// Columns of the member/team view that can be sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    MemberId,
    Username,
    Age,
    TeamName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Placement of `NULL` values within a sort
///
/// `Native` follows PostgreSQL: nulls sort as if larger than any value, so
/// they come last ascending and first descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullHandling {
    #[default]
    Native,
    NullsFirst,
    NullsLast,
}

/// One sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub field: SortField,
    pub direction: Direction,
    pub nulls: NullHandling,
}

impl Order {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
            nulls: NullHandling::Native,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
            nulls: NullHandling::Native,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = NullHandling::NullsFirst;
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = NullHandling::NullsLast;
        self
    }

    /// Whether nulls end up before non-null values for this key
    pub fn places_nulls_first(&self) -> bool {
        match self.nulls {
            NullHandling::NullsFirst => true,
            NullHandling::NullsLast => false,
            NullHandling::Native => self.direction == Direction::Desc,
        }
    }

    /// Compares two rows on this key
    pub fn compare(&self, a: &MemberTeamView, b: &MemberTeamView) -> Ordering {
        match self.field {
            SortField::MemberId => self.compare_values(Some(a.member_id), Some(b.member_id)),
            SortField::Username => {
                self.compare_values(a.username.as_deref(), b.username.as_deref())
            }
            SortField::Age => self.compare_values(Some(a.age), Some(b.age)),
            SortField::TeamName => {
                self.compare_values(a.team_name.as_deref(), b.team_name.as_deref())
            }
        }
    }

    fn compare_values<T: Ord>(&self, a: Option<T>, b: Option<T>) -> Ordering {
        let nulls_first = self.places_nulls_first();
        match (a, b) {
            (Some(a), Some(b)) => match self.direction {
                Direction::Asc => a.cmp(&b),
                Direction::Desc => b.cmp(&a),
            },
            (None, None) => Ordering::Equal,
            (None, Some(_)) if nulls_first => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) if nulls_first => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
        }
    }
}

/// Ordered list of sort keys; empty means "no ordering imposed"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            orders: orders.into_iter().collect(),
        }
    }

    pub fn and(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    /// Lexicographic comparison over every key
    pub fn compare(&self, a: &MemberTeamView, b: &MemberTeamView) -> Ordering {
        self.orders
            .iter()
            .map(|order| order.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Requested content window
///
/// `offset` is a row offset, not a page number. Use [`PageRequest::of_page`]
/// to address pages by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    offset: u64,
    size: u64,
    sort: Sort,
}

impl PageRequest {
    /// # Returns
    /// * `Err(String)` - If `size` is zero
    pub fn new(offset: u64, size: u64) -> Result<Self, String> {
        if size == 0 {
            return Err("Page size must be at least 1".to_string());
        }

        Ok(Self {
            offset,
            size,
            sort: Sort::unsorted(),
        })
    }

    /// Request for the zero-based page `page` of `size` rows
    pub fn of_page(page: u64, size: u64) -> Result<Self, String> {
        Self::new(page.saturating_mul(size), size)
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }
}

/// A window of content plus pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    content: Vec<T>,
    offset: u64,
    size: u64,
    total: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total: u64) -> Self {
        Self {
            content,
            offset: request.offset(),
            size: request.size(),
            total,
        }
    }

    /// Builds a page, running `count` only when the total is not already known
    ///
    /// When the request starts at offset 0 and returned fewer rows than the
    /// page size, the content is the whole result and its length is the total.
    /// Any other offset always runs the count.
    pub async fn from_count_supplier<F, Fut, E>(
        content: Vec<T>,
        request: &PageRequest,
        count: F,
    ) -> Result<Self, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<u64, E>>,
    {
        let fetched = content.len() as u64;
        if request.offset() == 0 && fetched < request.size() {
            tracing::debug!(total = fetched, "First page is complete, skipping count query");
            return Ok(Self::new(content, request, fetched));
        }

        let total = count().await?;
        Ok(Self::new(content, request, total))
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.size.max(1))
    }

    pub fn has_next(&self) -> bool {
        self.offset.saturating_add(self.content.len() as u64) < self.total
    }

    pub fn is_first(&self) -> bool {
        self.offset == 0
    }
}
