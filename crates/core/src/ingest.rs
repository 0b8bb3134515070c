//! Batch extraction of uploaded or on-disk sources.
//!
//! Transport is the caller's concern: the core receives `(identity hint,
//! source text)` pairs and answers with one tree per document plus a tally.

use crate::content::ContentTree;
use crate::extract::{ExtractConfig, extract_with_config, identity_hint_from_path};
use crate::fetch::fetch_file;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One source to extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// File name or other identifier; classifies the page and becomes its slug
    #[serde(alias = "name")]
    pub identity_hint: String,
    #[serde(alias = "source")]
    pub source_text: String,
}

impl SourceDocument {
    pub fn new(identity_hint: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self { identity_hint: identity_hint.into(), source_text: source_text.into() }
    }

    /// Identity hint with any directory and extension removed.
    fn stem(&self) -> String {
        let stem = identity_hint_from_path(Path::new(&self.identity_hint));
        if stem.is_empty() { self.identity_hint.clone() } else { stem }
    }
}

/// Result of a batch extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub total_files: usize,
    pub successful_extractions: usize,
    pub contents: Vec<ContentTree>,
}

impl IngestReport {
    pub fn failed(&self) -> usize {
        self.total_files - self.successful_extractions
    }
}

/// Extracts every document. Extraction itself cannot fail, so every
/// document counts as a success.
pub fn extract_batch(documents: &[SourceDocument], config: &ExtractConfig) -> IngestReport {
    let contents: Vec<ContentTree> = documents
        .iter()
        .map(|doc| extract_with_config(&doc.source_text, &doc.stem(), config))
        .collect();

    IngestReport { total_files: documents.len(), successful_extractions: contents.len(), contents }
}

/// Reads and extracts files. Unreadable files are logged and counted as
/// failures; the batch keeps going.
pub fn ingest_paths<P: AsRef<Path>>(paths: &[P], config: &ExtractConfig) -> IngestReport {
    let mut report = IngestReport { total_files: paths.len(), ..Default::default() };

    for path in paths {
        let path = path.as_ref();
        match fetch_file(path) {
            Ok(source) => {
                let tree = extract_with_config(&source, &identity_hint_from_path(path), config);
                report.contents.push(tree);
                report.successful_extractions += 1;
            }
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to ingest source"),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{DocumentType, NodeKind};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_extract_batch() {
        let docs = vec![
            SourceDocument::new("src/pages/Services.tsx", "<h1>Our Services</h1>"),
            SourceDocument::new("Contact", r#"<SEOHead title="Contact" />"#),
        ];
        let report = extract_batch(&docs, &ExtractConfig::default());

        assert_eq!(report.total_files, 2);
        assert_eq!(report.successful_extractions, 2);
        assert_eq!(report.contents[0].slug, "services");
        assert_eq!(report.contents[0].document_type, DocumentType::Service);
        assert_eq!(report.contents[0].node(NodeKind::H1, 0).unwrap().text, "Our Services");
        assert_eq!(report.contents[1].seo_meta.title, "Contact");
    }

    #[test]
    fn test_source_document_accepts_upload_names() {
        let doc: SourceDocument = serde_json::from_str(r#"{"name":"About.tsx","source":"<h1>A</h1>"}"#).unwrap();
        assert_eq!(doc, SourceDocument::new("About.tsx", "<h1>A</h1>"));
    }

    #[test]
    fn test_ingest_paths_counts_failures() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("Portfolio.tsx");
        fs::write(&good, "<h2>Recent Work</h2>").unwrap();
        let missing = dir.path().join("Missing.tsx");

        let report = ingest_paths(&[good, missing], &ExtractConfig::default());
        assert_eq!(report.total_files, 2);
        assert_eq!(report.successful_extractions, 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.contents[0].document_type, DocumentType::Portfolio);
    }

    #[test]
    fn test_report_json_shape() {
        let report = extract_batch(&[SourceDocument::new("home", "")], &ExtractConfig::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["totalFiles"], 1);
        assert_eq!(json["successfulExtractions"], 1);
        assert_eq!(json["contents"][0]["slug"], "home");
    }
}
