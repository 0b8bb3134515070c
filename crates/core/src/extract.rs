//! Best-effort content recovery from JSX-like page markup.
//!
//! The extractor is a pattern recogniser over a small fixed vocabulary, not
//! a parser: four SEO attributes (`title`, `description`, `keywords`,
//! `canonicalUrl`) and four element kinds (`h1`, `h2`, `h3`, `p`). It never
//! fails. Input with none of the patterns yields an empty tree.
//!
//! Tolerance notes:
//! - Each attribute is read from its first occurrence anywhere in the text.
//! - Element pairs are matched lazily (`<h2 ...>` to the nearest `</h2>`), so
//!   nesting an element inside another of the same kind is not understood.
//! - Nested markup inside a captured element is stripped from the text.

use crate::content::{ContentNode, ContentTree, DocumentType, NodeKind, SeoMeta};
use crate::Result;
use regex::Regex;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

/// Configuration for content extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Paragraphs whose stripped text has at most this many characters are
    /// treated as boilerplate and never become nodes
    pub min_paragraph_chars: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { min_paragraph_chars: 50 }
    }
}

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

static ELEMENTS: LazyLock<[Regex; 4]> = LazyLock::new(|| NodeKind::ALL.map(|kind| element_regex(kind.tag())));

static ATTRIBUTES: LazyLock<[Regex; 4]> =
    LazyLock::new(|| ["title", "description", "keywords", "canonicalUrl"].map(attribute_regex));

/// Open/close pair for one tag. The open tag must end the tag name (so `<p`
/// does not match `<pre>`) and must not be self-closing.
fn element_regex(tag: &str) -> Regex {
    let pattern = format!(r"(?s)<{tag}(?:\s[^>]*[^/>]|\s)?>(.*?)</{tag}\s*>");
    Regex::new(&pattern).expect("element pattern")
}

/// `name="..."` with backslash-escaped quotes allowed inside the literal.
fn attribute_regex(name: &str) -> Regex {
    let pattern = format!(r#"\b{name}="((?:[^"\\]|\\.)*)""#);
    Regex::new(&pattern).expect("attribute pattern")
}

pub(crate) fn element_pattern(kind: NodeKind) -> &'static Regex {
    let index = NodeKind::ALL.iter().position(|k| *k == kind).unwrap_or(0);
    &ELEMENTS[index]
}

pub(crate) fn attribute_pattern(name: &str) -> Option<&'static Regex> {
    let index = ["title", "description", "keywords", "canonicalUrl"]
        .iter()
        .position(|attr| *attr == name)?;
    Some(&ATTRIBUTES[index])
}

/// Removes every markup tag and trims surrounding whitespace.
pub fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").trim().to_string()
}

/// Escapes backslashes and double quotes for an attribute literal.
pub(crate) fn escape_attribute(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Reverses [`escape_attribute`]. Any other backslash sequence is kept as written.
fn unescape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('\\' | '"')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Whether a candidate of `kind` with the given stripped text becomes a node.
///
/// Shared with the reconstructor so that ordinals assigned here are the
/// ordinals reversed at patch time.
pub(crate) fn accepts(kind: NodeKind, stripped: &str, config: &ExtractConfig) -> bool {
    match kind {
        NodeKind::Paragraph => stripped.chars().count() > config.min_paragraph_chars,
        _ => !stripped.is_empty(),
    }
}

/// One accepted element occurrence in source order.
#[derive(Debug, Clone)]
pub(crate) struct ElementMatch {
    /// Byte range of the inner markup between the open and close tags
    pub inner: Range<usize>,
    /// Inner text with nested tags stripped
    pub text: String,
}

/// Scans `source` for accepted elements of one kind, in document order.
pub(crate) fn scan_elements(source: &str, kind: NodeKind, config: &ExtractConfig) -> Vec<ElementMatch> {
    element_pattern(kind)
        .captures_iter(source)
        .filter_map(|caps| {
            let inner = caps.get(1)?;
            let text = strip_tags(inner.as_str());
            accepts(kind, &text, config).then(|| ElementMatch { inner: inner.range(), text })
        })
        .collect()
}

/// Recovers the SEO attribute block. Missing attributes become empty strings.
pub fn extract_seo_meta(source: &str) -> SeoMeta {
    let mut meta = SeoMeta::default();

    for name in ["title", "description", "keywords", "canonicalUrl"] {
        if let Some(pattern) = attribute_pattern(name)
            && let Some(caps) = pattern.captures(source)
            && let Some(value) = caps.get(1)
            && let Some(field) = meta.field_mut(name)
        {
            *field = unescape_attribute(value.as_str());
        }
    }

    meta
}

/// Extracts a content tree using the default configuration.
///
/// # Example
///
/// ```rust
/// use pagewright_core::{DocumentType, NodeKind, extract};
///
/// let source = r#"<SEOHead title="Framing" /><h1>Custom Framing</h1>"#;
/// let tree = extract(source, "Services");
///
/// assert_eq!(tree.slug, "services");
/// assert_eq!(tree.document_type, DocumentType::Service);
/// assert_eq!(tree.seo_meta.title, "Framing");
/// assert_eq!(tree.node(NodeKind::H1, 0).unwrap().text, "Custom Framing");
/// ```
pub fn extract(source: &str, identity_hint: &str) -> ContentTree {
    extract_with_config(source, identity_hint, &ExtractConfig::default())
}

/// Extracts a content tree from markup text.
///
/// Each kind is scanned independently, so ordinals are zero-based per kind
/// and only accepted candidates consume an ordinal.
pub fn extract_with_config(source: &str, identity_hint: &str, config: &ExtractConfig) -> ContentTree {
    let mut tree = ContentTree::new(identity_hint.to_lowercase(), DocumentType::classify(identity_hint));
    tree.seo_meta = extract_seo_meta(source);

    for kind in NodeKind::ALL {
        for (ordinal, element) in scan_elements(source, kind, config).into_iter().enumerate() {
            tree.insert_node(ContentNode::new(kind, ordinal, element.text));
        }
    }

    tree
}

/// Derives an identity hint from a file path: the file name without extension.
pub fn identity_hint_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reads and extracts a source file, using its stem as the identity hint.
pub fn extract_file(path: &Path, config: &ExtractConfig) -> Result<ContentTree> {
    let source = crate::fetch::fetch_file(path)?;
    Ok(extract_with_config(&source, &identity_hint_from_path(path), config))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_A: &str = "Our framing studio has served the neighborhood for more than twenty years now.";
    const LONG_B: &str = "Every frame is cut, joined and finished by hand in our workshop on the premises.";

    fn page(body: &str) -> String {
        format!(
            r#"import SEOHead from '../components/SEOHead';

export default function About() {{
  return (
    <>
      <SEOHead
        title="About Our Frame Shop"
        description="Learn about our shop."
        keywords="framing, art"
        canonicalUrl="https://example.com/about"
      />
      {body}
    </>
  );
}}"#
        )
    }

    #[test]
    fn test_extract_seo_meta() {
        let tree = extract(&page(""), "About");
        assert_eq!(tree.seo_meta.title, "About Our Frame Shop");
        assert_eq!(tree.seo_meta.description, "Learn about our shop.");
        assert_eq!(tree.seo_meta.keywords, "framing, art");
        assert_eq!(tree.seo_meta.canonical_url, "https://example.com/about");
    }

    #[test]
    fn test_missing_attribute_is_empty() {
        let meta = extract_seo_meta(r#"<SEOHead title="Only a title" />"#);
        assert_eq!(meta.title, "Only a title");
        assert!(meta.description.is_empty());
        assert!(meta.canonical_url.is_empty());
    }

    #[test]
    fn test_attribute_requires_word_boundary() {
        let meta = extract_seo_meta(r#"<Hero subtitle="Not this" /><SEOHead title="This one" />"#);
        assert_eq!(meta.title, "This one");
    }

    #[test]
    fn test_attribute_with_escaped_quotes() {
        let meta = extract_seo_meta(r#"<SEOHead title="The \"Best\" Frames" />"#);
        assert_eq!(meta.title, r#"The "Best" Frames"#);
    }

    #[test]
    fn test_attribute_with_escaped_backslash() {
        let meta = extract_seo_meta(r#"<SEOHead title="C:\\" description="desc" keywords="a\nb" />"#);
        assert_eq!(meta.title, r"C:\");
        assert_eq!(meta.description, "desc");
        assert_eq!(meta.keywords, r"a\nb");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(escape_attribute(r#"say "hi" \ bye"#), r#"say \"hi\" \\ bye"#);
        assert_eq!(unescape_attribute(&escape_attribute(r#"C:\ "x""#)), r#"C:\ "x""#);
    }

    #[test]
    fn test_slug_and_document_type() {
        let tree = extract("", "LocationHoustonHeights");
        assert_eq!(tree.slug, "locationhoustonheights");
        assert_eq!(tree.document_type, DocumentType::Location);
    }

    #[test]
    fn test_empty_input() {
        let tree = extract("", "index");
        assert!(tree.nodes.is_empty());
        assert!(tree.seo_meta.is_empty());
        assert_eq!(tree.document_type, DocumentType::General);
    }

    #[test]
    fn test_headings_per_kind_ordinals() {
        let body = r#"<h1 className="big">Main</h1><h2>First</h2><h3>Deep</h3><h2>Second</h2>"#;
        let tree = extract(&page(body), "about");

        assert_eq!(tree.node(NodeKind::H1, 0).unwrap().text, "Main");
        assert_eq!(tree.node(NodeKind::H2, 0).unwrap().text, "First");
        assert_eq!(tree.node(NodeKind::H2, 1).unwrap().text, "Second");
        assert_eq!(tree.node(NodeKind::H3, 0).unwrap().text, "Deep");
        assert_eq!(tree.nodes.len(), 4);
    }

    #[test]
    fn test_nested_markup_is_stripped() {
        let body = format!(r#"<p className="lead"><strong>Hand made.</strong> {LONG_A}</p>"#);
        let tree = extract(&page(&body), "about");
        let text = &tree.node(NodeKind::Paragraph, 0).unwrap().text;
        assert_eq!(text, &format!("Hand made. {LONG_A}"));
    }

    #[test]
    fn test_multiline_elements() {
        let body = format!("<p>\n        {LONG_A}\n      </p>");
        let tree = extract(&page(&body), "about");
        assert_eq!(tree.node(NodeKind::Paragraph, 0).unwrap().text, LONG_A);
    }

    #[test]
    fn test_short_paragraphs_do_not_consume_ordinals() {
        let body = format!("<p>Short caption</p><p>{LONG_A}</p><p>Tiny</p><p>{LONG_B}</p>");
        let tree = extract(&page(&body), "about");

        assert_eq!(tree.count_of_kind(NodeKind::Paragraph), 2);
        assert_eq!(tree.node(NodeKind::Paragraph, 0).unwrap().text, LONG_A);
        assert_eq!(tree.node(NodeKind::Paragraph, 1).unwrap().text, LONG_B);
    }

    #[test]
    fn test_paragraph_threshold_is_exclusive() {
        let exactly_fifty = "x".repeat(50);
        let fifty_one = "y".repeat(51);
        let body = format!("<p>{exactly_fifty}</p><p>{fifty_one}</p>");
        let tree = extract(&body, "page");

        assert_eq!(tree.count_of_kind(NodeKind::Paragraph), 1);
        assert_eq!(tree.node(NodeKind::Paragraph, 0).unwrap().text, fifty_one);
    }

    #[test]
    fn test_empty_headings_skipped() {
        let tree = extract("<h2>  </h2><h2><span></span></h2><h2>Real</h2>", "page");
        assert_eq!(tree.count_of_kind(NodeKind::H2), 1);
        assert_eq!(tree.node(NodeKind::H2, 0).unwrap().text, "Real");
    }

    #[test]
    fn test_tag_name_boundary() {
        let body = format!("<pre>{LONG_A}</pre><picture>{LONG_B}</picture>");
        let tree = extract(&body, "page");
        assert_eq!(tree.count_of_kind(NodeKind::Paragraph), 0);
    }

    #[test]
    fn test_unclosed_element_is_ignored() {
        let body = format!("<h1>Broken heading<p>{LONG_A}</p>");
        let tree = extract(&body, "page");
        assert_eq!(tree.count_of_kind(NodeKind::H1), 0);
        assert_eq!(tree.count_of_kind(NodeKind::Paragraph), 1);
    }

    #[test]
    fn test_custom_threshold() {
        let config = ExtractConfig { min_paragraph_chars: 5 };
        let tree = extract_with_config("<p>Six chars</p><p>tiny</p>", "page", &config);
        assert_eq!(tree.count_of_kind(NodeKind::Paragraph), 1);
    }

    #[test]
    fn test_identity_hint_from_path() {
        assert_eq!(identity_hint_from_path(Path::new("src/pages/AboutUs.tsx")), "AboutUs");
        assert_eq!(identity_hint_from_path(Path::new("contact")), "contact");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("  <b>bold</b> and <i>italic</i> "), "bold and italic");
        assert_eq!(strip_tags("plain"), "plain");
    }
}
