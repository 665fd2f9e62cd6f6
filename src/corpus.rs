//! In-memory corpus index.
//!
//! The record set is loaded once from a JSON file at startup and never
//! mutated afterwards. Retrieval is a linear case-insensitive substring
//! scan over titles and contents; presence is the only relevance signal.

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::CorpusRecord;

/// The fixed set of records searched by every request.
#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<CorpusRecord>,
}

impl Corpus {
    /// Loads the record set from a JSON file (array of `{Title, Content}`
    /// objects).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;
        let records: Vec<CorpusRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse dataset file: {}", path.display()))?;
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<CorpusRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records whose lowercased title or content contains the
    /// lowercased term, in load order.
    ///
    /// An empty term matches every record (empty-substring containment is
    /// always true). An empty result is a valid outcome, not an error.
    pub fn search(&self, term: &str) -> Vec<CorpusRecord> {
        let needle = term.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.title.to_lowercase().contains(&needle)
                    || r.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(title: &str, content: &str) -> CorpusRecord {
        CorpusRecord {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn test_corpus() -> Corpus {
        Corpus::from_records(vec![
            make_record("Entropy", "A measure of disorder in a system."),
            make_record("Black Hole", "A region of spacetime with extreme gravity."),
            make_record("Enthalpy", "Total heat content of a system."),
        ])
    }

    #[test]
    fn test_matches_title_case_insensitive() {
        let matches = test_corpus().search("entropy");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Entropy");
    }

    #[test]
    fn test_matches_content() {
        let matches = test_corpus().search("spacetime");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Black Hole");
    }

    #[test]
    fn test_preserves_load_order() {
        // "system" appears in the content of records 0 and 2.
        let matches = test_corpus().search("system");
        let titles: Vec<&str> = matches.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Entropy", "Enthalpy"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        assert!(test_corpus().search("thermodynamics").is_empty());
    }

    #[test]
    fn test_empty_term_matches_everything() {
        assert_eq!(test_corpus().search("").len(), 3);
    }

    #[test]
    fn test_duplicates_not_deduplicated() {
        let corpus = Corpus::from_records(vec![
            make_record("Entropy", "First copy."),
            make_record("Entropy", "Second copy."),
        ]);
        assert_eq!(corpus.search("entropy").len(), 2);
    }

    #[test]
    fn test_monotonic_in_specificity() {
        // Every match for the longer term must also match its substring.
        let corpus = test_corpus();
        let broad = corpus.search("ent");
        let narrow = corpus.search("entropy");
        for record in &narrow {
            assert!(broad.contains(record));
        }
        assert!(narrow.len() <= broad.len());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("dataset.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = Corpus::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse dataset file"));
    }

    #[test]
    fn test_load_dataset_format() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("dataset.json");
        std::fs::write(
            &path,
            r#"[{"Title": "Entropy", "Content": "A measure of disorder."}]"#,
        )
        .unwrap();
        let corpus = Corpus::load(&path).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.search("disorder")[0].title, "Entropy");
    }
}
