use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::matcher::models::JobRecord;

#[derive(Debug, Error)]
pub enum CorpusLoadError {
    #[error("Failed to read job dataset: {0}")]
    Read(#[from] csv::Error),

    #[error("Job dataset contains no usable rows after deduplication")]
    Empty,
}

/// The deduplicated, ordered collection of job records available for
/// matching. Built once, immutable thereafter; the position of a record is
/// the canonical index space shared with the embedding index.
#[derive(Debug)]
pub struct Corpus {
    records: Vec<JobRecord>,
}

impl Corpus {
    /// Loads job records from a CSV file and deduplicates them on exact
    /// `description_text` equality. The first occurrence wins; later
    /// duplicates and rows without a description are dropped silently
    /// (intentional lossy step — the caller cannot distinguish "filtered"
    /// from "never existed"). Rows missing only optional metadata are kept.
    pub fn load_csv(path: &Path) -> Result<Self, CorpusLoadError> {
        let mut reader = csv::Reader::from_path(path)?;

        let mut records = Vec::new();
        let mut seen = HashSet::new();
        let mut total = 0usize;

        for row in reader.deserialize::<JobRecord>() {
            let record = row?;
            total += 1;

            if record.description_text.trim().is_empty() {
                debug!("skipping row {total}: empty job description");
                continue;
            }
            if !seen.insert(record.description_text.clone()) {
                debug!("skipping row {total}: duplicate job description");
                continue;
            }
            records.push(record);
        }

        if records.is_empty() {
            return Err(CorpusLoadError::Empty);
        }

        info!(
            "Loaded {} rows, deduplicated to {} unique jobs",
            total,
            records.len()
        );

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&JobRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    /// Job description texts in corpus order, for the embedding build.
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.description_text.as_str())
    }

    #[cfg(test)]
    pub fn from_records(records: Vec<JobRecord>) -> Self {
        Self { records }
    }
}
