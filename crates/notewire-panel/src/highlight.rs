//! Cross-panel highlight linkage.
//!
//! Hovering a rendered reference entry highlights the matching open
//! editor, either the whole view for a document-level link or one
//! block located by its stable id. Best-effort: no matching editor
//! open means no effect.

use std::sync::Arc;

use dashmap::DashMap;
use notewire_core::{DocKey, NodeKind};

/// Typed descriptor of a hovered reference entry. Carried in render
/// output instead of being decoded back out of display attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefTarget {
    pub url: String,
    pub path: String,
    pub block_id: String,
    pub kind: NodeKind,
}

impl RefTarget {
    pub fn doc_key(&self) -> DocKey {
        DocKey::new(self.url.clone(), self.path.clone())
    }
}

/// A live editor view that can show a transient highlight.
pub trait EditorSurface: Send + Sync {
    /// Highlight the whole document view.
    fn highlight_document(&self);
    /// Highlight one block; returns false when the block is not in
    /// this view (the highlight is then skipped entirely).
    fn highlight_block(&self, block_id: &str) -> bool;
    /// Remove any highlight this registry applied.
    fn clear_highlight(&self);
}

/// Registry of open editors keyed by document identity. Shared between
/// the UI shell (which registers editors) and panel render output
/// handlers (which look them up on hover).
#[derive(Clone, Default)]
pub struct EditorRegistry {
    editors: Arc<DashMap<DocKey, Arc<dyn EditorSurface>>>,
}

impl EditorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, key: DocKey, surface: Arc<dyn EditorSurface>) {
        self.editors.insert(key, surface);
    }

    pub fn unregister(&self, key: &DocKey) {
        self.editors.remove(key);
    }

    pub fn count(&self) -> usize {
        self.editors.len()
    }

    /// Pointer entered a reference entry. Returns whether a highlight
    /// was applied.
    pub fn hover_enter(&self, target: &RefTarget) -> bool {
        let Some(editor) = self.editors.get(&target.doc_key()) else {
            return false;
        };
        if target.kind.is_document() {
            editor.highlight_document();
            true
        } else {
            editor.highlight_block(&target.block_id)
        }
    }

    /// Pointer left a reference entry.
    pub fn hover_leave(&self, target: &RefTarget) {
        if let Some(editor) = self.editors.get(&target.doc_key()) {
            editor.clear_highlight();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct MockSurface {
        doc_highlights: AtomicU32,
        block_highlights: AtomicU32,
        clears: AtomicU32,
        known_block: String,
    }

    impl MockSurface {
        fn with_block(id: &str) -> Self {
            Self {
                known_block: id.into(),
                ..Default::default()
            }
        }
    }

    impl EditorSurface for MockSurface {
        fn highlight_document(&self) {
            self.doc_highlights.fetch_add(1, Ordering::SeqCst);
        }

        fn highlight_block(&self, block_id: &str) -> bool {
            if block_id == self.known_block {
                self.block_highlights.fetch_add(1, Ordering::SeqCst);
                true
            } else {
                false
            }
        }

        fn clear_highlight(&self) {
            self.clears.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn target(kind: NodeKind, block_id: &str) -> RefTarget {
        RefTarget {
            url: "file://doc1".into(),
            path: "/a/b".into(),
            block_id: block_id.into(),
            kind,
        }
    }

    #[test]
    fn document_target_highlights_whole_view() {
        let registry = EditorRegistry::new();
        let surface = Arc::new(MockSurface::default());
        registry.register(DocKey::new("file://doc1", "/a/b"), surface.clone());

        assert!(registry.hover_enter(&target(NodeKind::Document, "d1")));
        assert_eq!(surface.doc_highlights.load(Ordering::SeqCst), 1);
        assert_eq!(surface.block_highlights.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn block_target_highlights_block_by_id() {
        let registry = EditorRegistry::new();
        let surface = Arc::new(MockSurface::with_block("b1"));
        registry.register(DocKey::new("file://doc1", "/a/b"), surface.clone());

        assert!(registry.hover_enter(&target(NodeKind::Paragraph, "b1")));
        assert_eq!(surface.block_highlights.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_block_applies_nothing() {
        let registry = EditorRegistry::new();
        let surface = Arc::new(MockSurface::with_block("b1"));
        registry.register(DocKey::new("file://doc1", "/a/b"), surface.clone());

        assert!(!registry.hover_enter(&target(NodeKind::Paragraph, "gone")));
        assert_eq!(surface.block_highlights.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn no_matching_editor_is_a_noop() {
        let registry = EditorRegistry::new();
        assert!(!registry.hover_enter(&target(NodeKind::Document, "d1")));
        registry.hover_leave(&target(NodeKind::Document, "d1"));
    }

    #[test]
    fn hover_leave_clears() {
        let registry = EditorRegistry::new();
        let surface = Arc::new(MockSurface::default());
        registry.register(DocKey::new("file://doc1", "/a/b"), surface.clone());

        registry.hover_enter(&target(NodeKind::Document, "d1"));
        registry.hover_leave(&target(NodeKind::Document, "d1"));
        assert_eq!(surface.clears.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregister_removes_lookup() {
        let registry = EditorRegistry::new();
        let key = DocKey::new("file://doc1", "/a/b");
        registry.register(key.clone(), Arc::new(MockSurface::default()));
        assert_eq!(registry.count(), 1);
        registry.unregister(&key);
        assert!(!registry.hover_enter(&target(NodeKind::Document, "d1")));
    }
}
