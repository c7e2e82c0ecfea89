use std::sync::LazyLock;

use scraper::Selector;
use tracing::{debug, warn};

use super::{stripped_text, PageDocument};
use crate::record::CourtRecord;

// Whole class attribute must match; extra or reordered classes are a different table.
static TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"table[class="table-responsive table-striped"]"#).unwrap()
});
static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tbody tr").unwrap());
static CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

const CELLS_PER_ROW: usize = 4;

/// Pull every court row out of the listing table.
///
/// A page without the table yields nothing (and a warning). Rows whose cell
/// count is not exactly four are skipped.
pub fn extract_records(doc: &PageDocument) -> Vec<CourtRecord> {
    let Some(table) = doc.html().select(&TABLE_SEL).next() else {
        warn!("Table not found on the page.");
        return Vec::new();
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in table.select(&ROW_SEL) {
        let cells: Vec<String> = row.select(&CELL_SEL).map(stripped_text).collect();
        match <[String; CELLS_PER_ROW]>::try_from(cells) {
            Ok([court_name, superior_court, province, publication_count]) => {
                records.push(CourtRecord::new(
                    court_name,
                    superior_court,
                    province,
                    publication_count,
                ));
            }
            Err(_) => skipped += 1,
        }
    }

    debug!("Extracted {} rows ({} skipped)", records.len(), skipped);
    records
}

// ── Tests ──
