use serde::{Deserialize, Serialize};

/// What a panel is looking at. Fixed at session construction and only
/// ever compared after that.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum PanelContext {
    /// Aggregate data across all documents.
    Global,
    /// One specific document.
    Scoped { url: String, path: String },
}

impl PanelContext {
    pub fn scoped(url: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Scoped {
            url: url.into(),
            path: path.into(),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// Relevance rule for change broadcasts.
    ///
    /// A global session refetches on every notification. A scoped
    /// session refetches only on an exact url+path match (no
    /// normalization, case-sensitive), so a panel pinned to one
    /// document never thrashes on unrelated edits.
    pub fn matches(&self, hint: &ContextHint) -> bool {
        match self {
            Self::Global => true,
            Self::Scoped { url, path } => hint.url == *url && hint.path == *path,
        }
    }
}

/// Context hint carried by a change broadcast. An empty url and path
/// means the change applies to the global context only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextHint {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub path: String,
}

impl ContextHint {
    pub fn new(url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
        }
    }

    pub fn is_global(&self) -> bool {
        self.url.is_empty() && self.path.is_empty()
    }
}

/// Key identifying one open document, used by the editor registry for
/// cross-panel highlight lookups.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocKey {
    pub url: String,
    pub path: String,
}

impl DocKey {
    pub fn new(url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
        }
    }
}
