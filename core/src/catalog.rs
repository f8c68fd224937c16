use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::EngineError;
use crate::model::{SparseVector, VectorSpaceModel};

/// One catalog resource. Immutable after load; identity is its position in
/// the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "Grade Level")]
    pub grade_level: String,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Topic Keywords")]
    pub topic_keywords: String,
    #[serde(rename = "URL")]
    pub url: String,
}

impl CatalogEntry {
    /// The vectorizer input derived from an entry: grade level, subject and
    /// topic keywords joined by single spaces, in that field order.
    pub fn combined_text(&self) -> String {
        format!("{} {} {}", self.grade_level, self.subject, self.topic_keywords)
    }
}

/// A catalog entry paired with its precomputed vector. Keeping the pair in
/// one record makes the positional-alignment invariant structural rather
/// than a convention across two parallel arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedEntry {
    pub entry: CatalogEntry,
    pub vector: SparseVector,
}

/// The in-memory catalog: aligned entries and vectors, read-only after
/// construction. Reloads replace the whole structure.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: Vec<IndexedEntry>,
}

impl CatalogIndex {
    /// Pair entries with already-computed vectors. The two sequences must
    /// come from the same build pass over the same catalog.
    pub fn from_parts(
        entries: Vec<CatalogEntry>,
        vectors: Vec<SparseVector>,
    ) -> Result<CatalogIndex, EngineError> {
        if entries.len() != vectors.len() {
            return Err(EngineError::Internal(format!(
                "catalog/vector misalignment: {} entries, {} vectors",
                entries.len(),
                vectors.len()
            )));
        }
        let entries = entries
            .into_iter()
            .zip(vectors)
            .map(|(entry, vector)| IndexedEntry { entry, vector })
            .collect();
        Ok(CatalogIndex { entries })
    }

    /// Build combined texts, fit the vector space model over them, and store
    /// the aligned result.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> (VectorSpaceModel, CatalogIndex) {
        let corpus: Vec<String> = entries.iter().map(|e| e.combined_text()).collect();
        let (model, vectors) = VectorSpaceModel::build(&corpus);
        let entries = entries
            .into_iter()
            .zip(vectors)
            .map(|(entry, vector)| IndexedEntry { entry, vector })
            .collect();
        (model, CatalogIndex { entries })
    }

    pub fn all(&self) -> &[IndexedEntry] {
        &self.entries
    }

    /// Order-preserving subset view; each reference keeps its entry and
    /// vector together, so alignment survives filtering.
    pub fn filter<P>(&self, predicate: P) -> Vec<&IndexedEntry>
    where
        P: Fn(&CatalogEntry) -> bool,
    {
        self.entries
            .iter()
            .filter(|ie| predicate(&ie.entry))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const REQUIRED_HEADERS: [&str; 4] = ["Grade Level", "Subject", "Topic Keywords", "URL"];

/// Load catalog entries from a CSV source with required headers
/// `Grade Level, Subject, Topic Keywords, URL`. A missing file, unreadable
/// content, or a missing column is a `DataSource` error; a headers-only file
/// with all columns present is a valid empty catalog.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<CatalogEntry>, EngineError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| EngineError::DataSource(format!("{}: {e}", path.display())))?;
    let headers = reader
        .headers()
        .map_err(|e| EngineError::DataSource(format!("{}: {e}", path.display())))?
        .clone();
    for required in REQUIRED_HEADERS {
        if !headers.iter().any(|h| h == required) {
            return Err(EngineError::DataSource(format!(
                "{}: missing required column '{required}'",
                path.display()
            )));
        }
    }
    let mut entries = Vec::new();
    for record in reader.deserialize::<CatalogEntry>() {
        let entry =
            record.map_err(|e| EngineError::DataSource(format!("{}: {e}", path.display())))?;
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn entry(grade: &str, subject: &str, topics: &str, url: &str) -> CatalogEntry {
        CatalogEntry {
            grade_level: grade.into(),
            subject: subject.into(),
            topic_keywords: topics.into(),
            url: url.into(),
        }
    }

    #[test]
    fn combined_text_field_order() {
        let e = entry("5", "Math", "fractions decimals", "u1");
        assert_eq!(e.combined_text(), "5 Math fractions decimals");
    }

    #[test]
    fn filter_preserves_order_and_alignment() {
        let (_, index) = CatalogIndex::from_entries(vec![
            entry("5", "Math", "fractions", "u1"),
            entry("6", "Math", "algebra", "u2"),
            entry("5", "Science", "plants", "u3"),
        ]);
        let fifth = index.filter(|e| e.grade_level == "5");
        assert_eq!(fifth.len(), 2);
        assert_eq!(fifth[0].entry.url, "u1");
        assert_eq!(fifth[1].entry.url, "u3");
        for ie in fifth {
            assert_eq!(ie.vector.dims, index.all()[0].vector.dims);
        }
    }

    #[test]
    fn from_parts_rejects_misaligned_input() {
        let err = CatalogIndex::from_parts(
            vec![entry("5", "Math", "fractions", "u1")],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Internal(_)));
    }

    #[test]
    fn loads_csv_with_required_headers() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "Grade Level,Subject,Topic Keywords,URL").unwrap();
        writeln!(f, "5,Math,fractions decimals,u1").unwrap();
        writeln!(f, "5,Science,plants photosynthesis,u2").unwrap();
        let entries = load_catalog(f.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].subject, "Math");
        assert_eq!(entries[1].url, "u2");
    }

    #[test]
    fn missing_column_is_a_data_source_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "Grade Level,Subject,URL").unwrap();
        writeln!(f, "5,Math,u1").unwrap();
        let err = load_catalog(f.path()).unwrap_err();
        assert!(matches!(err, EngineError::DataSource(_)));
    }

    #[test]
    fn missing_column_fails_even_without_data_rows() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "Grade Level,Subject,URL").unwrap();
        let err = load_catalog(f.path()).unwrap_err();
        match err {
            EngineError::DataSource(msg) => assert!(msg.contains("Topic Keywords")),
            other => panic!("expected DataSource, got {other}"),
        }
    }

    #[test]
    fn absent_file_is_a_data_source_error() {
        let err = load_catalog("/nonexistent/catalog.csv").unwrap_err();
        assert!(matches!(err, EngineError::DataSource(_)));
    }

    #[test]
    fn headers_only_is_a_valid_empty_catalog() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "Grade Level,Subject,Topic Keywords,URL").unwrap();
        let entries = load_catalog(f.path()).unwrap();
        assert!(entries.is_empty());
    }
}
