use std::collections::HashSet;
use std::fs;

use anyhow::{Context, Result, anyhow};

use super::model::DocumentCollection;

pub fn load_collection(path: &str) -> Result<DocumentCollection> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read document collection from {path}"))?;

    let collection: DocumentCollection = serde_json::from_str(&raw)
        .with_context(|| format!("invalid document collection JSON in {path}"))?;

    validate_ids(&collection)?;

    if collection.documents.is_empty() {
        log::warn!("document collection {path} contains no documents; map will only show a root");
    } else {
        log::info!(
            "loaded {} documents / {} sections from {path}",
            collection.document_count(),
            collection.section_count()
        );
    }

    Ok(collection)
}

// Node ids are derived from these ids, so duplicates would silently merge
// nodes in the map.
fn validate_ids(collection: &DocumentCollection) -> Result<()> {
    let mut document_ids = HashSet::new();
    let mut section_ids = HashSet::new();

    for document in &collection.documents {
        if document.id.is_empty() {
            return Err(anyhow!("document {:?} has an empty id", document.title));
        }
        if !document_ids.insert(document.id.as_str()) {
            return Err(anyhow!("duplicate document id {:?}", document.id));
        }

        for section in &document.sections {
            if section.id.is_empty() {
                return Err(anyhow!(
                    "section {:?} in document {:?} has an empty id",
                    section.title,
                    document.id
                ));
            }
            if !section_ids.insert(section.id.as_str()) {
                return Err(anyhow!("duplicate section id {:?}", section.id));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::load_collection;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp");
        file
    }

    #[test]
    fn loads_a_minimal_collection() {
        let file = write_temp(
            r#"{
                "title": "Research pack",
                "documents": [
                    {
                        "id": "d1",
                        "title": "Paper",
                        "sections": [
                            {
                                "id": "s1",
                                "title": "Intro",
                                "summary": "What it is about",
                                "keyPoints": ["first", "second"],
                                "colorTheme": "blue"
                            }
                        ]
                    }
                ]
            }"#,
        );

        let collection = load_collection(file.path().to_str().unwrap()).expect("load");
        assert_eq!(collection.title.as_deref(), Some("Research pack"));
        assert_eq!(collection.document_count(), 1);
        assert_eq!(collection.section_count(), 1);

        let (document, section) = collection.section("s1").expect("section lookup");
        assert_eq!(document.id, "d1");
        assert_eq!(section.key_points.len(), 2);
        assert_eq!(section.color_theme.as_deref(), Some("blue"));
    }

    #[test]
    fn optional_fields_default() {
        let file = write_temp(
            r#"{"documents": [{"id": "d1", "title": "Bare", "sections": [{"id": "s1", "title": "Only"}]}]}"#,
        );

        let collection = load_collection(file.path().to_str().unwrap()).expect("load");
        let (_, section) = collection.section("s1").expect("section lookup");
        assert!(section.summary.is_empty());
        assert!(section.key_points.is_empty());
        assert!(section.color_theme.is_none());
    }

    #[test]
    fn rejects_duplicate_document_ids() {
        let file = write_temp(
            r#"{"documents": [
                {"id": "d1", "title": "A", "sections": []},
                {"id": "d1", "title": "B", "sections": []}
            ]}"#,
        );

        let error = load_collection(file.path().to_str().unwrap()).unwrap_err();
        assert!(error.to_string().contains("duplicate document id"));
    }

    #[test]
    fn rejects_malformed_json() {
        let file = write_temp("{not json");
        let error = load_collection(file.path().to_str().unwrap()).unwrap_err();
        assert!(error.to_string().contains("invalid document collection"));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let error = load_collection("/nonexistent/collection.json").unwrap_err();
        assert!(error.to_string().contains("/nonexistent/collection.json"));
    }
}
