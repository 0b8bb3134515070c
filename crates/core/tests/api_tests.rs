//! Library API integration tests
use pagewright_core::*;
use std::path::PathBuf;

fn get_fixture_path(name: &str) -> PathBuf {
    PathBuf::from(format!("../../tests/fixtures/{}", name))
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

#[test]
fn test_extract_file_api() {
    let tree = extract_file(&get_fixture_path("About.tsx"), &ExtractConfig::default()).expect("should extract");

    assert_eq!(tree.slug, "about");
    assert_eq!(tree.document_type, DocumentType::About);
    assert_eq!(tree.seo_meta.canonical_url, "https://heightsframeshop.example/about");
    assert_eq!(tree.node(NodeKind::H1, 0).unwrap().text, "About Our Frame Shop");
    assert_eq!(tree.node(NodeKind::H2, 1).unwrap().text, "Conservation Standards");
    assert_eq!(tree.node(NodeKind::H3, 0).unwrap().text, "Museum Glass");

    assert_eq!(tree.count_of_kind(NodeKind::Paragraph), 3);
    let first = tree.first_paragraph().unwrap();
    assert!(first.text.starts_with("Custom framing has been our craft"));
    assert!(!first.text.contains("<strong>"));
}

#[test]
fn test_extract_skips_empty_headings_and_boilerplate() {
    let tree = extract(&read_fixture("Services.tsx"), "Services");

    assert_eq!(tree.document_type, DocumentType::Service);
    assert_eq!(tree.node(NodeKind::H2, 0).unwrap().text, "Shadow Boxes");
    assert_eq!(tree.node(NodeKind::H2, 1).unwrap().text, "Canvas Stretching");
    assert_eq!(tree.count_of_kind(NodeKind::Paragraph), 1);
}

#[test]
fn test_extract_never_fails_on_garbage() {
    let tree = extract("<<<< not markup at all >>>> <h1 <p>", "whatever");
    assert!(tree.nodes.is_empty());
    assert!(tree.seo_meta.is_empty());
    assert_eq!(tree.document_type, DocumentType::General);
}

#[test]
fn test_score_fixture_with_keyword_file() {
    let keywords = KeywordParser::parse_file(get_fixture_path("keywords.txt")).unwrap();
    assert_eq!(keywords.as_slice()[0], "custom framing");

    let tree = extract(&read_fixture("About.tsx"), "About");
    let report = score(&tree, &keywords);

    assert!(report.title_has_keyword);
    assert!(report.keyword_in_first_sentence);
    assert!(report.has_meta_description);
    assert_eq!(report.h1_count, 1);
    assert_eq!(report.category_breakdown.len(), 5);
    assert!(report.overall_score > 0 && report.overall_score <= 100);
    assert!(report.keyword_density["custom framing"] > 0.0);
}

#[test]
fn test_patch_fixture_preserves_layout() {
    let original = read_fixture("About.tsx");
    let mut tree = extract(&original, "About");
    tree.node_mut(NodeKind::H2, 0).unwrap().text = "How We Started".to_string();
    tree.seo_meta.description.clear();

    let patched = patch(&original, &tree);

    assert!(patched.contains(r#"<h2 className="text-3xl mt-12">How We Started</h2>"#));
    assert!(patched.contains("<Gallery images={featured} />"));
    assert!(patched.contains("<p>Call us today.</p>"));
    assert!(patched.contains("Meet the framers behind Heights Frame Shop."));
    assert_eq!(patched.replace("How We Started", "Our Story"), original);
}

#[test]
fn test_render_tree_fixture() {
    let tree: ContentTree = serde_json::from_str(&read_fixture("about-tree.json")).unwrap();
    let rendered = render(&tree);

    assert!(rendered.contains("export default function AboutUs()"));
    assert_eq!(extract(&rendered, "about-us"), tree);
}

#[test]
fn test_ingest_fixture_directory() {
    let paths = [get_fixture_path("About.tsx"), get_fixture_path("Services.tsx"), get_fixture_path("Nope.tsx")];
    let report = ingest_paths(&paths, &ExtractConfig::default());

    assert_eq!(report.total_files, 3);
    assert_eq!(report.successful_extractions, 2);
    let slugs: Vec<_> = report.contents.iter().map(|t| t.slug.as_str()).collect();
    assert_eq!(slugs, ["about", "services"]);
}

#[tokio::test]
async fn test_bulk_edit_through_store() {
    let store = MemoryStore::new();
    for name in ["About.tsx", "Services.tsx"] {
        let tree = extract_file(&get_fixture_path(name), &ExtractConfig::default()).unwrap();
        store.save(&tree, PageStatus::Published).await.unwrap();
    }

    let slugs = vec!["about".to_string(), "services".to_string()];
    let edit = BulkEdit::new("Custom Framing", "Bespoke Framing", [TargetField::SeoMeta]).dry_run(true);
    let report = commit_edit(&store, &slugs, &edit).await.unwrap();
    assert_eq!(report.total_affected, 2);
    assert_eq!(store.load("services").await.unwrap().unwrap().version, 1);

    let report = commit_edit(&store, &slugs, &edit.clone().dry_run(false)).await.unwrap();
    assert!(!report.dry_run);

    let services = store.load("services").await.unwrap().unwrap();
    assert_eq!(services.version, 2);
    assert_eq!(services.tree.seo_meta.title, "Bespoke Framing Services");

    let published = store
        .list(&PageFilter { status: Some(PageStatus::Published), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(published.len(), 2);
}
