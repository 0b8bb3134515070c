//! Markup reconstruction from an edited content tree.
//!
//! Two strategies are offered:
//! - [`render`] regenerates a canonical page component from scratch.
//! - [`patch`] edits an existing page in place, touching only the SEO
//!   attributes and the elements addressed by the tree's nodes.
//!
//! Patching re-scans the original with the same acceptance rules the
//! extractor uses, so a node's `(kind, ordinal)` address resolves to the
//! same element it was extracted from.

use crate::content::{ContentTree, NodeKind, SeoMeta};
use crate::extract::{ExtractConfig, attribute_pattern, escape_attribute, scan_elements};
use crate::Result;
use std::fmt::Write as _;
use std::path::Path;

/// Configuration for full regeneration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Component that receives the SEO attributes
    pub seo_component: String,
    /// Import path of the SEO component
    pub seo_import: String,
    /// className of the element wrapping all nodes
    pub container_class: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            seo_component: "SEOHead".to_string(),
            seo_import: "../components/SEOHead".to_string(),
            container_class: "container mx-auto px-4 py-12".to_string(),
        }
    }
}

fn element_class(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::H1 => "text-4xl font-bold mb-6",
        NodeKind::H2 => "text-3xl font-semibold mt-8 mb-4",
        NodeKind::H3 => "text-2xl font-semibold mt-6 mb-3",
        NodeKind::Paragraph => "text-lg mb-4",
    }
}

/// Converts a `-`/`_` separated slug into a component identifier.
///
/// ```rust
/// use pagewright_core::to_pascal_case;
///
/// assert_eq!(to_pascal_case("about-us"), "AboutUs");
/// assert_eq!(to_pascal_case("custom_framing-services"), "CustomFramingServices");
/// assert_eq!(to_pascal_case("404"), "Page404");
/// ```
pub fn to_pascal_case(slug: &str) -> String {
    let mut name = String::with_capacity(slug.len());
    for word in slug.split(['-', '_']).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }

    match name.chars().next() {
        None => "Page".to_string(),
        Some(c) if c.is_ascii_digit() => format!("Page{}", name),
        Some(_) => name,
    }
}

/// Regenerates a page with the default configuration.
pub fn render(tree: &ContentTree) -> String {
    render_with_config(tree, &RenderConfig::default())
}

/// Regenerates a canonical page component.
///
/// Nodes are emitted by ordinal, ties broken by kind order, so
/// `heading_h1_0, heading_h2_0, paragraph_0, heading_h2_1, ...`.
pub fn render_with_config(tree: &ContentTree, config: &RenderConfig) -> String {
    let mut nodes = tree.nodes_in_order();
    nodes.sort_by_key(|node| (node.ordinal_index, node.kind));

    let mut body = String::new();
    for node in nodes {
        let tag = node.kind.tag();
        let _ = writeln!(
            body,
            "      <{tag} className=\"{}\">{}</{tag}>",
            element_class(node.kind),
            node.text
        );
    }

    let meta = &tree.seo_meta;
    format!(
        r#"import React from 'react';
import {component} from '{import}';

export default function {name}() {{
  return (
    <>
      <{component}
        title="{title}"
        description="{description}"
        keywords="{keywords}"
        canonicalUrl="{canonical}"
      />

      <div className="{container}">
{body}
      </div>
    </>
  );
}}
"#,
        component = config.seo_component,
        import = config.seo_import,
        name = to_pascal_case(&tree.slug),
        title = escape_attribute(&meta.title),
        description = escape_attribute(&meta.description),
        keywords = escape_attribute(&meta.keywords),
        canonical = escape_attribute(&meta.canonical_url),
        container = config.container_class,
        body = body.trim_end(),
    )
}

/// Patches `original` with the default extraction rules.
pub fn patch(original: &str, tree: &ContentTree) -> String {
    patch_with_config(original, tree, &ExtractConfig::default())
}

/// Applies an edited tree to existing markup.
///
/// Non-empty SEO fields replace the first occurrence of their attribute.
/// Each edited node replaces the inner markup of the accepted element at
/// its ordinal; a node whose text still equals the element's stripped text
/// leaves the element alone. Everything else is left byte-for-byte intact.
/// Node text is inserted verbatim.
pub fn patch_with_config(original: &str, tree: &ContentTree, config: &ExtractConfig) -> String {
    let mut text = patch_seo_meta(original, &tree.seo_meta);

    for kind in NodeKind::ALL {
        let targets = tree.nodes_of_kind(kind);
        if targets.is_empty() {
            continue;
        }

        let occurrences = scan_elements(&text, kind, config);
        let mut edits: Vec<_> = targets
            .into_iter()
            .filter_map(|node| {
                let occurrence = occurrences.get(node.ordinal_index);
                if occurrence.is_none() {
                    tracing::debug!(key = %node.key(), "no element at ordinal, skipping");
                }
                occurrence
                    .filter(|o| o.text != node.text)
                    .map(|o| (o.inner.clone(), node.text.as_str()))
            })
            .collect();

        // Splice from the end so earlier ranges stay valid, once per element.
        edits.sort_by_key(|(range, _)| std::cmp::Reverse(range.start));
        edits.dedup_by_key(|(range, _)| range.start);
        for (range, replacement) in edits {
            text.replace_range(range, replacement);
        }
    }

    text
}

fn patch_seo_meta(original: &str, meta: &SeoMeta) -> String {
    let mut text = original.to_string();

    for (name, value) in meta.fields() {
        if value.is_empty() {
            continue;
        }
        let Some(pattern) = attribute_pattern(name) else {
            continue;
        };
        if let Some(found) = pattern.find(&text) {
            let range = found.range();
            text.replace_range(range, &format!("{}=\"{}\"", name, escape_attribute(value)));
        }
    }

    text
}

/// Patches the file at `path`, regenerating from scratch when it is missing.
pub fn patch_file(path: &Path, tree: &ContentTree) -> Result<String> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "original missing, rendering from tree");
        return Ok(render(tree));
    }
    let original = crate::fetch::fetch_file(path)?;
    Ok(patch(&original, tree))
}
