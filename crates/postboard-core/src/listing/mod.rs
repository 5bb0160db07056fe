//! Post listing query builder.
//!
//! Turns a client `ListingRequest` into normalized `QueryOptions`, and turns
//! the rows the store returns into a `PageResult`:
//!
//! 1. Pagination is on iff `skip` and `take` are both numbers. The store is
//!    asked for `take + 1` rows; getting the extra row back means more remain.
//! 2. A non-empty `filter` matches title OR body, case-insensitively.
//! 3. `orderBy` must name a known key and direction, else newest first.
//!
//! Malformed input never errors; it degrades to "no pagination" / "default sort".

pub mod options;

pub use options::{fold_case, FilterOptions, PaginationOptions, QueryOptions, SortOptions};

use postboard_types::listing::{ListingRequest, PageCursor, PageResult};
use postboard_types::post::{Post, PostId};

/// Anything that can serve as a page item: it must expose the id used as the
/// next-page cursor.
pub trait Identified {
    fn cursor_id(&self) -> PostId;
}

impl Identified for Post {
    fn cursor_id(&self) -> PostId {
        self.id
    }
}

/// A fully interpreted listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPlan {
    /// The client's pagination, kept to shape the page after the fetch.
    pub pagination: Option<PaginationOptions>,
    /// What to send to the store.
    pub options: QueryOptions,
}

impl ListingPlan {
    pub fn from_request(request: &ListingRequest) -> Self {
        let pagination = PaginationOptions::from_request(request);
        let filter = FilterOptions::from_request(request);
        let order_by = SortOptions::from_request(request);

        let options = QueryOptions::merge(pagination.as_ref(), filter, order_by);
        tracing::debug!(?options, "post listing query");

        Self { pagination, options }
    }

    /// Shape raw store rows into a page. See [`shape_page`].
    pub fn shape<T: Identified>(&self, rows: Vec<T>) -> PageResult<T> {
        shape_page(self.pagination.as_ref(), rows)
    }
}

/// Build a page from the rows returned for a (possibly paginated) query.
///
/// With pagination, receiving fewer than `take + 1` rows ends the listing;
/// receiving the full `take + 1` drops the over-fetched row and reports
/// `count = take`. Without pagination everything is returned and `end` is set.
pub fn shape_page<T: Identified>(
    pagination: Option<&PaginationOptions>,
    mut rows: Vec<T>,
) -> PageResult<T> {
    let received = rows.len() as u64;

    let (end, count) = match pagination {
        Some(page) => {
            let wanted = page.take.max(0) as u64;
            let asked = page.fetch_limit().max(0) as u64;
            tracing::debug!(wanted, asked, received, "post listing page");

            if received < asked {
                (true, received)
            } else {
                rows.truncate(rows.len().saturating_sub(1));
                (false, wanted)
            }
        }
        None => (true, received),
    };

    let cursor = PageCursor {
        id: rows.last().map(Identified::cursor_id),
    };

    PageResult {
        items: rows,
        count,
        end,
        cursor,
    }
}
