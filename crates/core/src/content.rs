//! Content tree data model shared by every engine.
//!
//! A [`ContentTree`] is the structured form of one page: its identity, a
//! document category, the SEO attribute block and a set of addressable
//! content nodes. Nodes are addressed by `(kind, ordinal)`, encoded as a
//! stable string key such as `heading_h2_0` or `paragraph_3`.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The fixed vocabulary of content elements recognised in source markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    H1,
    H2,
    H3,
    Paragraph,
}

impl NodeKind {
    /// All kinds in canonical document order.
    pub const ALL: [NodeKind; 4] = [NodeKind::H1, NodeKind::H2, NodeKind::H3, NodeKind::Paragraph];

    /// Markup tag name for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::H1 => "h1",
            NodeKind::H2 => "h2",
            NodeKind::H3 => "h3",
            NodeKind::Paragraph => "p",
        }
    }

    /// Prefix used when building node keys.
    pub fn key_prefix(self) -> &'static str {
        match self {
            NodeKind::H1 => "heading_h1",
            NodeKind::H2 => "heading_h2",
            NodeKind::H3 => "heading_h3",
            NodeKind::Paragraph => "paragraph",
        }
    }

    /// Builds the stable key for the node of this kind at `ordinal`.
    pub fn key(self, ordinal: usize) -> String {
        format!("{}_{}", self.key_prefix(), ordinal)
    }

    /// Parses a node key back into its kind and ordinal.
    ///
    /// ```rust
    /// use pagewright_core::NodeKind;
    ///
    /// assert_eq!(NodeKind::parse_key("heading_h2_4"), Some((NodeKind::H2, 4)));
    /// assert_eq!(NodeKind::parse_key("paragraph_0"), Some((NodeKind::Paragraph, 0)));
    /// assert_eq!(NodeKind::parse_key("sidebar_1"), None);
    /// ```
    pub fn parse_key(key: &str) -> Option<(NodeKind, usize)> {
        let (prefix, ordinal) = key.rsplit_once('_')?;
        let ordinal = ordinal.parse().ok()?;
        let kind = NodeKind::ALL.into_iter().find(|k| k.key_prefix() == prefix)?;
        Some((kind, ordinal))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Paragraph => write!(f, "paragraph"),
            heading => write!(f, "{}", heading.tag()),
        }
    }
}

/// One recovered content unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Zero-based position among nodes of the same kind, in document order.
    #[serde(rename = "index")]
    pub ordinal_index: usize,
    #[serde(rename = "content")]
    pub text: String,
}

impl ContentNode {
    pub fn new(kind: NodeKind, ordinal_index: usize, text: impl Into<String>) -> Self {
        Self { kind, ordinal_index, text: text.into() }
    }

    /// Stable `kind_index` key of this node.
    pub fn key(&self) -> String {
        self.kind.key(self.ordinal_index)
    }
}

/// The SEO attribute block of a page. Values are used as-is and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub canonical_url: String,
}

impl SeoMeta {
    /// Field names paired with their values, in attribute-block order.
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
            ("keywords", self.keywords.as_str()),
            ("canonicalUrl", self.canonical_url.as_str()),
        ]
    }

    /// Mutable access to a field by its attribute name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "title" => Some(&mut self.title),
            "description" => Some(&mut self.description),
            "keywords" => Some(&mut self.keywords),
            "canonicalUrl" => Some(&mut self.canonical_url),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_empty())
    }
}

/// Page category derived from the identity hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    About,
    Service,
    Location,
    Portfolio,
    Contact,
    #[default]
    #[serde(other)]
    General,
}

impl DocumentType {
    /// Classified categories in match priority order. `General` is the fallback.
    pub const PRIORITY: [DocumentType; 5] = [
        DocumentType::About,
        DocumentType::Service,
        DocumentType::Location,
        DocumentType::Portfolio,
        DocumentType::Contact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::About => "about",
            DocumentType::Service => "service",
            DocumentType::Location => "location",
            DocumentType::Portfolio => "portfolio",
            DocumentType::Contact => "contact",
            DocumentType::General => "general",
        }
    }

    /// Classifies an identity hint: the first category whose tag occurs in
    /// the lower-cased hint wins.
    pub fn classify(identity_hint: &str) -> DocumentType {
        let lower = identity_hint.to_lowercase();
        Self::PRIORITY
            .into_iter()
            .find(|doc_type| lower.contains(doc_type.as_str()))
            .unwrap_or(DocumentType::General)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::PRIORITY
            .into_iter()
            .chain([DocumentType::General])
            .find(|doc_type| doc_type.as_str() == lower)
            .ok_or_else(|| format!("Invalid document type: {}", s))
    }
}

/// Structured representation of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTree {
    pub slug: String,
    #[serde(default)]
    pub document_type: DocumentType,
    #[serde(default)]
    pub seo_meta: SeoMeta,
    #[serde(default, deserialize_with = "deserialize_nodes")]
    pub nodes: BTreeMap<String, ContentNode>,
}

/// Files every node under its own key whatever key it arrived under, so a
/// deserialized tree holds at most one node per `(kind, ordinal)`.
fn deserialize_nodes<'de, D>(deserializer: D) -> Result<BTreeMap<String, ContentNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, ContentNode>::deserialize(deserializer)?;
    let mut nodes = BTreeMap::new();
    for (key, node) in raw {
        let own_key = node.key();
        if key != own_key {
            tracing::debug!(key = %key, node = %own_key, "node filed under its own key");
        }
        // An entry already under its own key wins over a stray one.
        if key == own_key || !nodes.contains_key(&own_key) {
            nodes.insert(own_key, node);
        }
    }
    Ok(nodes)
}

impl ContentTree {
    pub fn new(slug: impl Into<String>, document_type: DocumentType) -> Self {
        Self { slug: slug.into(), document_type, ..Default::default() }
    }

    /// Files a node under its own key, replacing any node with the same
    /// `(kind, ordinal)`.
    pub fn insert_node(&mut self, node: ContentNode) -> Option<ContentNode> {
        self.nodes.insert(node.key(), node)
    }

    pub fn node(&self, kind: NodeKind, ordinal: usize) -> Option<&ContentNode> {
        self.nodes.get(&kind.key(ordinal))
    }

    pub fn node_mut(&mut self, kind: NodeKind, ordinal: usize) -> Option<&mut ContentNode> {
        self.nodes.get_mut(&kind.key(ordinal))
    }

    /// Nodes in canonical document order: h1, h2, h3, paragraph, each by ordinal.
    pub fn nodes_in_order(&self) -> Vec<&ContentNode> {
        let mut nodes: Vec<&ContentNode> = self.nodes.values().collect();
        nodes.sort_by_key(|node| (node.kind, node.ordinal_index));
        nodes
    }

    /// Nodes of one kind ordered by ordinal.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<&ContentNode> {
        let mut nodes: Vec<&ContentNode> = self.nodes.values().filter(|node| node.kind == kind).collect();
        nodes.sort_by_key(|node| node.ordinal_index);
        nodes
    }

    pub fn count_of_kind(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|node| node.kind == kind).count()
    }

    /// The accepted paragraph with the smallest ordinal.
    pub fn first_paragraph(&self) -> Option<&ContentNode> {
        self.nodes
            .values()
            .filter(|node| node.kind == NodeKind::Paragraph)
            .min_by_key(|node| node.ordinal_index)
    }

    /// Projects the node set into the tagged payload walked by bulk edits.
    ///
    /// Each node becomes `{ "<key>": { "content": Text } }`. The kind is
    /// implied by the key and is not part of the editable payload.
    pub fn content_value(&self) -> ContentValue {
        let entries = self
            .nodes
            .iter()
            .map(|(key, node)| {
                let mut fields = BTreeMap::new();
                fields.insert("content".to_string(), ContentValue::Text(node.text.clone()));
                (key.clone(), ContentValue::Map(fields))
            })
            .collect();
        ContentValue::Map(entries)
    }

    /// Writes an edited payload back onto existing nodes, matched by key.
    ///
    /// Entries that do not name an existing node, or lack a text `content`
    /// leaf, are ignored.
    pub fn apply_content_value(&mut self, value: &ContentValue) {
        let ContentValue::Map(entries) = value else {
            return;
        };

        for (key, entry) in entries {
            if let Some(node) = self.nodes.get_mut(key)
                && let Some(text) = entry.get("content").and_then(ContentValue::as_text)
            {
                node.text = text.to_string();
            }
        }
    }
}

/// Tagged content payload: a string leaf or a nested mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Text(String),
    Map(BTreeMap<String, ContentValue>),
}

impl ContentValue {
    /// Looks up a child of a mapping.
    pub fn get(&self, key: &str) -> Option<&ContentValue> {
        match self {
            ContentValue::Map(entries) => entries.get(key),
            ContentValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentValue::Text(text) => Some(text),
            ContentValue::Map(_) => None,
        }
    }
}

/// Lifecycle status of a stored page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
}

impl PageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Published => "published",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(format!("Invalid status: {}. Valid options: draft, published", s)),
        }
    }
}
