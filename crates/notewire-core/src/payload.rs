use serde::{Deserialize, Serialize};

/// Block node kind as reported by the backend kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "NodeDocument")]
    Document,
    #[serde(rename = "NodeHeading")]
    Heading,
    #[serde(rename = "NodeParagraph")]
    Paragraph,
    #[serde(rename = "NodeListItem")]
    ListItem,
    #[serde(rename = "NodeBlockquote")]
    Blockquote,
    /// Kinds introduced by newer kernels; rendered generically.
    #[serde(other)]
    Other,
}

impl NodeKind {
    pub fn is_document(&self) -> bool {
        matches!(self, Self::Document)
    }
}

/// Identity of one block: which document it lives in and its stable id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef {
    pub url: String,
    pub path: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

/// A reference site inside some document, pointing at a definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefBlock {
    pub def: BlockRef,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub content: String,
}

/// Scoped-query group: one referencing document and the blocks in it
/// that point at the session's document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefererGroup {
    pub url: String,
    pub path: String,
    pub blocks: Vec<RefBlock>,
}

/// Global-query group: one defined item with every referencing site
/// inlined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefGroup {
    pub def: DefBlock,
    pub refs: Vec<DefRef>,
}

/// The defined item heading a [`DefGroup`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefBlock {
    pub url: String,
    pub path: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub content: String,
}

/// One referencing site inside a [`DefGroup`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefRef {
    pub url: String,
    pub path: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub content: String,
}

/// Relation graph payload. Node/link internals are chart configuration,
/// opaque to the protocol layer and handed to the renderer verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<serde_json::Value>,
    #[serde(default)]
    pub links: Vec<serde_json::Value>,
}

/// Fetched data handed to a renderer. The two backlink shapes are
/// structurally different (grouped by referencing source vs. grouped
/// by defined target) and renderers must branch on the variant.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryResult {
    /// Global backlinks: one entry per definition, refs inlined.
    Backlinks(Vec<DefGroup>),
    /// Scoped backlinks: per-referencing-document breakdown.
    TreeBacklinks(Vec<RefererGroup>),
    /// Relation graph.
    Graph(GraphData),
}

impl QueryResult {
    /// True when the result carries nothing to display.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Backlinks(groups) => groups.is_empty(),
            Self::TreeBacklinks(groups) => groups.is_empty(),
            Self::Graph(data) => data.nodes.is_empty(),
        }
    }
}
