use serde::Serialize;

/// One row of the court listing table.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourtRecord {
    #[serde(rename = "Nama Pengadilan")]
    pub court_name: String,
    #[serde(rename = "Pengadilan Tinggi")]
    pub superior_court: String,
    #[serde(rename = "Provinsi")]
    pub province: String,
    #[serde(rename = "Jumlah Putusan / Publikasi")]
    pub publication_count: String,
}

impl CourtRecord {
    pub fn new(
        court_name: impl Into<String>,
        superior_court: impl Into<String>,
        province: impl Into<String>,
        publication_count: impl Into<String>,
    ) -> Self {
        CourtRecord {
            court_name: court_name.into(),
            superior_court: superior_court.into(),
            province: province.into(),
            publication_count: publication_count.into(),
        }
    }
}
