pub mod pagination;
pub mod table;

use scraper::Html;

/// A fetched listing page, parsed once and handed to the extractors.
pub struct PageDocument {
    html: Html,
}

impl PageDocument {
    pub fn parse(body: &str) -> Self {
        PageDocument {
            html: Html::parse_document(body),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}

/// Text of an element with each text node trimmed and empty nodes dropped.
pub fn stripped_text(el: scraper::ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .concat()
}
