use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::fetcher::PageSource;
use crate::parser::{pagination, table};
use crate::record::CourtRecord;
use crate::settings::Settings;
use crate::writer;

/// Outcome of one scrape run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_total: u32,
    pub pages_failed: u32,
    pub records: usize,
    /// Set only when a file was written.
    pub output: Option<PathBuf>,
}

/// URL of listing page `page` (1-based). Page 1 is the bare base URL.
pub fn page_url(base: &str, page: u32) -> String {
    if page > 1 {
        format!("{}?&page={}", base, page)
    } else {
        base.to_string()
    }
}

/// Fetch every listing page, collect the court rows, and write them out.
///
/// A failed first fetch ends the run with nothing written. Later page failures
/// are skipped. Only write errors are returned as `Err`.
pub fn run(source: &dyn PageSource, settings: &Settings) -> Result<RunSummary> {
    let base = settings.base_url.as_str();

    let first = match source.fetch(base) {
        Ok(doc) => doc,
        Err(e) => {
            error!("Could not fetch the listing, nothing to do: {}", e);
            return Ok(RunSummary::default());
        }
    };
    let max_page = pagination::extract_max_page(&first);
    drop(first);
    info!("Listing has {} page(s)", max_page);

    let mut all: Vec<CourtRecord> = Vec::new();
    let mut pages_failed = 0;

    for page in 1..=max_page {
        let url = page_url(base, page);
        info!("Scraping page: {}", url);
        match source.fetch(&url) {
            Ok(doc) => all.extend(table::extract_records(&doc)),
            Err(_) => {
                warn!("Failed to fetch content for page {}", page);
                pages_failed += 1;
            }
        }
    }

    let mut summary = RunSummary {
        pages_total: max_page,
        pages_failed,
        records: all.len(),
        output: None,
    };

    if all.is_empty() {
        info!("No data extracted.");
        return Ok(summary);
    }

    writer::write_records(&all, &settings.output)?;
    info!("Data saved to {}", settings.output.display());
    summary.output = Some(settings.output.clone());
    Ok(summary)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use crate::parser::PageDocument;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::Path;

    const BASE: &str = "https://example.test/pengadilan.html";

    /// Serves canned pages; unknown URLs fail like an exhausted fetch.
    struct FakeSource {
        pages: HashMap<String, String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn new(pages: &[(&str, &str)]) -> Self {
            FakeSource {
                pages: pages
                    .iter()
                    .map(|(u, b)| (u.to_string(), b.to_string()))
                    .collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageSource for FakeSource {
        fn fetch(&self, url: &str) -> Result<PageDocument, FetchError> {
            self.calls.borrow_mut().push(url.to_string());
            match self.pages.get(url) {
                Some(body) => Ok(PageDocument::parse(body)),
                None => {
                    let err = reqwest::blocking::Client::new()
                        .get("not a url")
                        .build()
                        .unwrap_err();
                    Err(FetchError::Exhausted {
                        url: url.to_string(),
                        attempts: 1,
                        last: Box::new(FetchError::Http(err)),
                    })
                }
            }
        }
    }

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn settings(output: &Path) -> Settings {
        Settings {
            base_url: BASE.to_string(),
            output: output.to_path_buf(),
            timeout_secs: 1,
            max_attempts: 1,
            backoff_base_ms: 0,
            backoff_max_ms: 0,
            log_filter: "info".to_string(),
        }
    }

    #[test]
    fn page_urls() {
        assert_eq!(page_url(BASE, 1), BASE);
        assert_eq!(page_url(BASE, 2), format!("{}?&page=2", BASE));
        assert_eq!(page_url(BASE, 17), format!("{}?&page=17", BASE));
    }

    #[test]
    fn two_pages_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("data").join("daftar_pengadilan.csv");
        let p1 = fixture("listing_page1");
        let p2 = fixture("listing_page2");
        let page2_url = page_url(BASE, 2);
        let source = FakeSource::new(&[(BASE, p1.as_str()), (page2_url.as_str(), p2.as_str())]);

        let summary = run(&source, &settings(&out)).unwrap();

        assert_eq!(summary.pages_total, 2);
        assert_eq!(summary.pages_failed, 0);
        assert_eq!(summary.records, 5);
        assert_eq!(summary.output.as_deref(), Some(out.as_path()));

        let text = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[0],
            "Nama Pengadilan,Pengadilan Tinggi,Provinsi,Jumlah Putusan / Publikasi"
        );
        assert_eq!(lines[1], "PN Banda Aceh,PT Banda Aceh,Aceh,12.408");
        assert_eq!(lines[3], "PN Padang,PT Padang,Sumatera Barat,9.877");
        assert_eq!(lines[5], "\"PN Bandung, Kelas IA Khusus\",PT Bandung,Jawa Barat,27.540");

        // first page is fetched once for pagination, then again in the loop
        assert_eq!(*source.calls.borrow(), vec![BASE.to_string(), BASE.to_string(), page2_url]);
    }

    #[test]
    fn failed_initial_fetch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("data").join("daftar_pengadilan.csv");
        let source = FakeSource::new(&[]);

        let summary = run(&source, &settings(&out)).unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(!out.exists());
        assert_eq!(source.calls.borrow().len(), 1);
    }

    #[test]
    fn failed_later_page_keeps_partial_results() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("daftar.csv");
        let p1 = fixture("listing_page1");
        let source = FakeSource::new(&[(BASE, p1.as_str())]);

        let summary = run(&source, &settings(&out)).unwrap();

        assert_eq!(summary.pages_total, 2);
        assert_eq!(summary.pages_failed, 1);
        assert_eq!(summary.records, 3);
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn no_rows_means_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("daftar.csv");
        let empty = fixture("no_table");
        let source = FakeSource::new(&[(BASE, empty.as_str())]);

        let summary = run(&source, &settings(&out)).unwrap();

        assert_eq!(summary.pages_total, 1);
        assert_eq!(summary.records, 0);
        assert!(summary.output.is_none());
        assert!(!out.exists());
    }

    #[test]
    fn write_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, "file, not dir").unwrap();
        let p2 = fixture("listing_page2");
        let source = FakeSource::new(&[(BASE, p2.as_str())]);

        assert!(run(&source, &settings(&blocker.join("daftar.csv"))).is_err());
    }
}
