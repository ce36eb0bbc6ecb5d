use serde::Deserialize;

/// One analyzed section of a document, as produced by the external analysis
/// pipeline. Summary and key points feed the detail panel; this crate never
/// edits them.
#[derive(Clone, Debug, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, rename = "keyPoints")]
    pub key_points: Vec<String>,
    #[serde(default, rename = "colorTheme")]
    pub color_theme: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// The full collection handed over by the document store. Document order is
/// meaningful: it seeds the angular layout of the map.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DocumentCollection {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl DocumentCollection {
    pub fn document(&self, document_id: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find(|document| document.id == document_id)
    }

    pub fn section(&self, section_id: &str) -> Option<(&Document, &Section)> {
        self.documents.iter().find_map(|document| {
            document
                .sections
                .iter()
                .find(|section| section.id == section_id)
                .map(|section| (document, section))
        })
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn section_count(&self) -> usize {
        self.documents
            .iter()
            .map(|document| document.sections.len())
            .sum()
    }
}
