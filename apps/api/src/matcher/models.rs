use serde::{Deserialize, Serialize};

/// One deduplicated job posting. Identified by its position in the corpus
/// (a dense index), not by `job_id`, which may be absent or repeated in the
/// source data. All metadata fields are optional; `None` serializes as
/// `null`, matching what the original dataset export emits for blanks.
///
/// The serde renames follow the dataset's CSV headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default, rename = "job_title")]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "type")]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default, rename = "listingDate")]
    pub listing_date: Option<String>,
    #[serde(rename = "job_text")]
    pub description_text: String,
}

/// A ranked match returned per query. Ephemeral; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub job_id: Option<String>,
    pub job_title: Option<String>,
    pub job_description: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "type")]
    pub employment_type: Option<String>,
    pub salary: Option<String>,
    #[serde(rename = "listingDate")]
    pub listing_date: Option<String>,
    /// Cosine similarity in [-1, 1], rounded to 4 decimal places.
    pub score: f32,
}

impl MatchResult {
    pub fn from_record(record: &JobRecord, score: f32) -> Self {
        Self {
            job_id: record.job_id.clone(),
            job_title: record.title.clone(),
            job_description: record.description_text.clone(),
            company: record.company.clone(),
            location: record.location.clone(),
            category: record.category.clone(),
            subcategory: record.subcategory.clone(),
            role: record.role.clone(),
            employment_type: record.employment_type.clone(),
            salary: record.salary.clone(),
            listing_date: record.listing_date.clone(),
            score: (score * 10_000.0).round() / 10_000.0,
        }
    }
}
