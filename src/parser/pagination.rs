use std::sync::LazyLock;

use scraper::Selector;

use super::PageDocument;

const PAGE_ATTR: &str = "data-ci-pagination-page";

static PAGE_LINK_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("ul.pagination li.page-item a.page-link[data-ci-pagination-page]").unwrap()
});

/// Highest page number advertised by the pagination controls, or 1 when there are none.
pub fn extract_max_page(doc: &PageDocument) -> u32 {
    doc.html()
        .select(&PAGE_LINK_SEL)
        .filter_map(|a| a.attr(PAGE_ATTR))
        .filter_map(|v| v.trim().parse::<u32>().ok())
        .fold(1, u32::max)
}
