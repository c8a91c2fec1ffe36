//! Page-number pagination over an in-memory collection.
//!
//! Slicing and page metadata come from `paginator-rs`; [`Page`] flattens its
//! [`PaginatorResponse`] into the `page_obj` shape the templates read.
//!
//! ```rust
//! use htmx_patterns::pagination::Paginator;
//!
//! let paginator = Paginator::new((1..=25).collect::<Vec<_>>(), 10);
//! let page = paginator.get_page(Some("3")).unwrap();
//! assert_eq!(page.object_list, vec![21, 22, 23, 24, 25]);
//! assert!(!page.has_next);
//!
//! // Out of range and garbage input never fail
//! assert_eq!(paginator.get_page(Some("99")).unwrap().number, 3);
//! assert_eq!(paginator.get_page(Some("abc")).unwrap().number, 1);
//! ```

use paginator_rs::{
    PaginationParams, PaginatorError, PaginatorResponse, PaginatorResponseMeta, PaginatorResult,
    PaginatorTrait,
};
use serde::Serialize;

/// Largest page size `paginator-rs` accepts
pub const MAX_PER_PAGE: u32 = 100;

/// Splits a collection into pages of `per_page` items.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    per_page: u32,
}

/// One page of results, ready to go into a template context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    /// 1-based page number
    pub number: u32,
    pub num_pages: u32,
    pub count: u32,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u32>,
    pub previous_page_number: Option<u32>,
    /// 1-based index of the first item on the page (0 when empty)
    pub start_index: u32,
    /// 1-based index of the last item on the page (0 when empty)
    pub end_index: u32,
}

impl<T> From<PaginatorResponse<T>> for Page<T> {
    fn from(response: PaginatorResponse<T>) -> Self {
        let PaginatorResponse { data, meta } = response;
        let number = meta.page;
        // an empty collection still has one (empty) page
        let num_pages = meta.total_pages.unwrap_or(1).max(1);
        let len = u32::try_from(data.len()).unwrap_or(u32::MAX);
        let (start_index, end_index) = if len == 0 {
            (0, 0)
        } else {
            let start = (number - 1) * meta.per_page + 1;
            (start, start + len - 1)
        };

        Page {
            object_list: data,
            number,
            num_pages,
            count: meta.total.unwrap_or(0),
            has_next: meta.has_next,
            has_previous: meta.has_prev,
            next_page_number: meta.has_next.then_some(number + 1),
            previous_page_number: meta.has_prev.then_some(number - 1),
            start_index,
            end_index,
        }
    }
}

impl<T: Clone + Serialize> Paginator<T> {
    /// `per_page` is clamped to `1..=MAX_PER_PAGE`.
    pub fn new(items: Vec<T>, per_page: usize) -> Self {
        let per_page = u32::try_from(per_page).unwrap_or(MAX_PER_PAGE);
        Self {
            items,
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn count(&self) -> u32 {
        u32::try_from(self.items.len()).unwrap_or(u32::MAX)
    }

    /// Number of pages; an empty collection still has one (empty) page.
    pub fn num_pages(&self) -> u32 {
        self.count().div_ceil(self.per_page).max(1)
    }

    /// Page for a raw `page` parameter: missing or non-numeric means page 1,
    /// numbers outside `1..=num_pages` are clamped into range, however large.
    ///
    /// # Errors
    ///
    /// Only if `paginator-rs` rejects the clamped parameters.
    pub fn get_page(&self, raw: Option<&str>) -> PaginatorResult<Page<T>> {
        let number = parse_page_number(raw.unwrap_or_default()).clamp(1, self.num_pages());
        let params = paginator_rs::Paginator::new()
            .page(number)
            .per_page(self.per_page)
            .build();
        self.paginate(&params).map(Page::from)
    }
}

impl<T: Clone + Serialize> PaginatorTrait<T> for Paginator<T> {
    fn paginate(&self, params: &PaginationParams) -> PaginatorResult<PaginatorResponse<T>> {
        if params.page < 1 {
            return Err(PaginatorError::InvalidPage(params.page));
        }
        if params.per_page < 1 || params.per_page > MAX_PER_PAGE {
            return Err(PaginatorError::InvalidPerPage(params.per_page));
        }

        let offset = params.offset() as usize;
        let end = offset
            .saturating_add(params.limit() as usize)
            .min(self.items.len());
        let data = self
            .items
            .get(offset..end)
            .map(<[T]>::to_vec)
            .unwrap_or_default();

        Ok(PaginatorResponse {
            data,
            meta: PaginatorResponseMeta::new(params.page, params.per_page, self.count()),
        })
    }
}

/// Integer value of a page parameter, saturated to `0..=u32::MAX`.
/// Anything that is not an integer reads as page 1.
fn parse_page_number(raw: &str) -> u32 {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 1;
    }
    if negative {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}
