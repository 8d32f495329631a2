//! Page-number pagination for public listings.
//!
//! Links carry `category` and `page` as query parameters; page 1 never
//! carries `page`, so its canonical URL is the bare listing path.

use std::ops::RangeInclusive;

use url::form_urlencoded;

/// Width of the numbered-page window.
pub const PAGE_WINDOW: u32 = 5;

/// Inputs for [`build_pagination`].
///
/// `page` is expected to be clamped to `[1, total_pages]` already. `has_next`
/// comes from the data layer's over-fetch and may disagree with a stale
/// `total_pages`; it alone decides the next link.
#[derive(Debug, Clone, Copy)]
pub struct PaginationInput<'a> {
    pub page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub base_path: &'a str,
    pub category: Option<&'a str>,
}

/// A single pagination link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub page: u32,
    pub href: String,
    pub enabled: bool,
    pub current: bool,
}

/// Previous, next and numbered links for one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub previous: PageLink,
    pub next: PageLink,
    pub pages: Vec<PageLink>,
}

impl Pagination {
    /// Page numbers in the window, in order.
    pub fn window(&self) -> Vec<u32> {
        self.pages.iter().map(|link| link.page).collect()
    }
}

/// Compute the link set for a listing page.
pub fn build_pagination(input: &PaginationInput<'_>) -> Pagination {
    let total_pages = input.total_pages.max(1);
    let page = input.page.clamp(1, total_pages);
    let category = input.category.filter(|value| !value.is_empty());
    let link = |target: u32, enabled: bool, current: bool| PageLink {
        page: target,
        href: page_href(input.base_path, category, target),
        enabled,
        current,
    };

    let previous = if page > 1 {
        link(page - 1, true, false)
    } else {
        link(1, false, false)
    };
    let next = link(page.saturating_add(1), input.has_next, false);
    let pages = page_window(page, total_pages)
        .map(|number| link(number, true, number == page))
        .collect();

    Pagination {
        previous,
        next,
        pages,
    }
}

/// Numbered window of [`PAGE_WINDOW`] pages around `page`.
///
/// Centred where possible; near either end it shifts to stay inside
/// `[1, total_pages]` and keep its width.
pub fn page_window(page: u32, total_pages: u32) -> RangeInclusive<u32> {
    let total_pages = total_pages.max(1);
    let half = PAGE_WINDOW / 2;
    let last_start = total_pages.saturating_sub(PAGE_WINDOW - 1).max(1);
    let start = page.saturating_sub(half).max(1).min(last_start);
    let end = (start + PAGE_WINDOW - 1).min(total_pages);
    start..=end
}

/// Link to `page` of `base_path`, keeping the category filter.
pub fn page_href(base_path: &str, category: Option<&str>, page: u32) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(category) = category.filter(|value| !value.is_empty()) {
        query.append_pair("category", category);
    }
    if page > 1 {
        query.append_pair("page", &page.to_string());
    }
    let query = query.finish();
    if query.is_empty() {
        base_path.to_string()
    } else {
        format!("{base_path}?{query}")
    }
}

/// Parse a `page` query value leniently: anything unusable means page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(1)
        .max(1)
}

/// Number of pages needed for `total` items, never less than one.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = total.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(page: u32, total_pages: u32, has_next: bool) -> PaginationInput<'static> {
        PaginationInput {
            page,
            total_pages,
            has_next,
            base_path: "/videos",
            category: None,
        }
    }

    #[test]
    fn window_near_start() {
        let pagination = build_pagination(&input(3, 10, true));
        assert_eq!(pagination.window(), vec![1, 2, 3, 4, 5]);
        assert!(pagination.previous.enabled);
        assert!(pagination.next.enabled);
    }

    #[test]
    fn window_centres_on_page() {
        assert_eq!(page_window(6, 10), 4..=8);
    }

    #[test]
    fn last_page_disables_next_and_ends_window() {
        let pagination = build_pagination(&input(10, 10, false));
        assert!(!pagination.next.enabled);
        assert_eq!(pagination.window(), vec![6, 7, 8, 9, 10]);
        assert_eq!(pagination.next.href, "/videos?page=11");
    }

    #[test]
    fn first_page_disables_previous() {
        let pagination = build_pagination(&input(1, 4, true));
        assert!(!pagination.previous.enabled);
        assert_eq!(pagination.previous.href, "/videos");
        assert_eq!(pagination.window(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn few_pages_cover_everything() {
        assert_eq!(page_window(2, 3), 1..=3);
        assert_eq!(page_window(1, 1), 1..=1);
        assert_eq!(page_window(1, 0), 1..=1);
    }

    #[test]
    fn next_follows_has_next_not_total() {
        // Stale total from the count query; the over-fetch saw another page.
        let pagination = build_pagination(&input(4, 4, true));
        assert!(pagination.next.enabled);
        assert_eq!(pagination.next.page, 5);
    }

    #[test]
    fn current_page_is_marked() {
        let pagination = build_pagination(&input(2, 3, true));
        let current: Vec<u32> = pagination
            .pages
            .iter()
            .filter(|link| link.current)
            .map(|link| link.page)
            .collect();
        assert_eq!(current, vec![2]);
    }

    #[test]
    fn page_one_has_no_page_param() {
        assert_eq!(page_href("/audio", None, 1), "/audio");
        assert_eq!(page_href("/audio", None, 2), "/audio?page=2");
        assert_eq!(page_href("/audio", Some("story"), 1), "/audio?category=story");
        assert_eq!(
            page_href("/audio", Some("story"), 3),
            "/audio?category=story&page=3"
        );
    }

    #[test]
    fn category_is_encoded_and_empty_is_dropped() {
        assert_eq!(
            page_href("/videos", Some("kort & lank"), 2),
            "/videos?category=kort+%26+lank&page=2"
        );
        assert_eq!(page_href("/videos", Some(""), 2), "/videos?page=2");
    }

    #[test]
    fn links_keep_category() {
        let pagination = build_pagination(&PaginationInput {
            category: Some("film"),
            ..input(2, 5, true)
        });
        assert_eq!(pagination.previous.href, "/videos?category=film");
        assert_eq!(pagination.next.href, "/videos?category=film&page=3");
    }

    #[test]
    fn parse_page_is_lenient() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-2")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 12), 1);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(100, 10), 10);
    }
}
