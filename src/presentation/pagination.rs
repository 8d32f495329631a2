//! Pagination markup for htmx-driven listings.

use crate::application::pagination::{PageLink, Pagination};

use super::html::escape_html;

const PREVIOUS_LABEL: &str = "← Vorige";
const NEXT_LABEL: &str = "Volgende →";

/// Target the list swaps into; matches the `media-list` wrapper id.
const HX_TARGET: &str = "#media-list";

/// Render previous/next links around the numbered window.
pub fn render_pagination(pagination: &Pagination) -> String {
    let previous = nav_link(&pagination.previous, PREVIOUS_LABEL);
    let next = nav_link(&pagination.next, NEXT_LABEL);
    let pages: String = pagination.pages.iter().map(number_link).collect();

    format!(
        concat!(
            r#"<div class="mt-6 mb-10 px-2 sm:px-0">"#,
            r#"<div class="grid grid-cols-3 items-center gap-6">"#,
            r#"<div class="justify-self-start">{previous}</div>"#,
            r#"<div class="justify-self-center"><div class="flex items-center gap-2">{pages}</div></div>"#,
            r#"<div class="justify-self-end">{next}</div>"#,
            "</div></div>"
        ),
        previous = previous,
        pages = pages,
        next = next,
    )
}

fn nav_link(link: &PageLink, label: &str) -> String {
    let state = if link.enabled {
        "hover:underline"
    } else {
        "pointer-events-none opacity-40"
    };
    anchor(
        &format!("inline-flex items-center gap-2 text-sm font-semibold text-teal-700 {state}"),
        &link.href,
        label,
    )
}

fn number_link(link: &PageLink) -> String {
    let state = if link.current {
        "bg-teal-700 text-white"
    } else {
        "text-teal-700 hover:bg-teal-50"
    };
    anchor(
        &format!(
            "inline-flex h-9 w-9 items-center justify-center rounded-full text-sm font-semibold {state}"
        ),
        &link.href,
        &link.page.to_string(),
    )
}

fn anchor(class: &str, href: &str, label: &str) -> String {
    let href = escape_html(href);
    format!(
        r#"<a class="{class}" href="{href}" hx-get="{href}" hx-target="{HX_TARGET}" hx-swap="outerHTML" hx-push-url="true">{label}</a>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pagination::{PaginationInput, build_pagination};

    fn render(page: u32, total_pages: u32, has_next: bool, category: Option<&str>) -> String {
        render_pagination(&build_pagination(&PaginationInput {
            page,
            total_pages,
            has_next,
            base_path: "/videos",
            category,
        }))
    }

    #[test]
    fn links_target_the_media_list() {
        let html = render(2, 3, true, None);
        assert!(html.contains(r##"hx-target="#media-list""##));
        assert!(html.contains(r#"hx-swap="outerHTML""#));
        assert!(html.contains(r#"href="/videos?page=3" hx-get="/videos?page=3""#));
    }

    #[test]
    fn disabled_previous_on_first_page() {
        let html = render(1, 3, true, None);
        assert!(html.contains(
            r#"text-teal-700 pointer-events-none opacity-40" href="/videos" hx-get="/videos""#
        ));
        assert!(html.contains(PREVIOUS_LABEL));
    }

    #[test]
    fn current_page_is_highlighted() {
        let html = render(2, 3, true, None);
        assert!(html.contains(r#"bg-teal-700 text-white" href="/videos?page=2""#));
        assert_eq!(html.matches("bg-teal-700 text-white").count(), 1);
    }

    #[test]
    fn hrefs_are_attribute_escaped() {
        let html = render(2, 3, true, Some("a&b"));
        assert!(html.contains("/videos?category=a%26b&amp;page=3"));
    }
}
