use crate::Result;
use crate::content::ContentTree;
use crate::scoring::AnalysisReport;
use serde::Serialize;

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    if pretty { Ok(serde_json::to_string_pretty(value)?) } else { Ok(serde_json::to_string(value)?) }
}

/// Serialize an analysis report (camelCase fields)
pub fn report_to_json(report: &AnalysisReport, pretty: bool) -> Result<String> {
    to_json(report, pretty)
}

/// Serialize a content tree in its storage shape
pub fn tree_to_json(tree: &ContentTree, pretty: bool) -> Result<String> {
    to_json(tree, pretty)
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn report(&self, report: &AnalysisReport) -> Result<String> {
        report_to_json(report, self.config.pretty)
    }

    pub fn tree(&self, tree: &ContentTree) -> Result<String> {
        tree_to_json(tree, self.config.pretty)
    }

    /// Serialize any serde value, e.g. an ingest or bulk edit report
    pub fn value<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        to_json(value, self.config.pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentNode, DocumentType, NodeKind};
    use crate::keywords::KeywordSpec;
    use crate::scoring::score;

    fn tree() -> ContentTree {
        let mut tree = ContentTree::new("about", DocumentType::About);
        tree.seo_meta.canonical_url = "https://example.com/about".to_string();
        tree.insert_node(ContentNode::new(NodeKind::H2, 1, "Our Craft"));
        tree
    }

    #[test]
    fn test_tree_to_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&tree_to_json(&tree(), false).unwrap()).unwrap();

        assert_eq!(json["documentType"], "about");
        assert_eq!(json["seoMeta"]["canonicalUrl"], "https://example.com/about");
        assert_eq!(json["nodes"]["heading_h2_1"]["type"], "h2");
        assert_eq!(json["nodes"]["heading_h2_1"]["index"], 1);
        assert_eq!(json["nodes"]["heading_h2_1"]["content"], "Our Craft");
    }

    #[test]
    fn test_tree_json_parses_back() {
        let original = tree();
        let json = tree_to_json(&original, true).unwrap();
        let parsed: ContentTree = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_pretty_vs_compact() {
        let report = score(&tree(), &KeywordSpec::new(["framing"]));
        let formatter = JsonFormatter::new(JsonConfig { pretty: true });

        assert!(formatter.report(&report).unwrap().contains('\n'));
        assert!(!report_to_json(&report, false).unwrap().contains('\n'));
    }

    #[test]
    fn test_value_serializes_other_reports() {
        let formatter = JsonFormatter::new(JsonConfig::default());
        let json = formatter.value(&crate::ingest::IngestReport::default()).unwrap();

        assert_eq!(json, r#"{"totalFiles":0,"successfulExtractions":0,"contents":[]}"#);
    }
}
