//! Renderer seam. Sessions hand fetched data here and nothing flows
//! back into protocol decisions.

use notewire_core::QueryResult;

/// User-visible strings, passed explicitly instead of read from any
/// process-global locale state.
#[derive(Clone, Debug)]
pub struct Labels {
    /// Placeholder shown when a query returns nothing.
    pub empty: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            empty: "No backlinks yet".into(),
        }
    }
}

/// Pure consumer of fetched data. Invoked only by the owning session.
///
/// Contract: an empty result set must render the designated
/// empty-state placeholder, never an empty container.
pub trait Renderer: Send {
    fn render(&mut self, result: &QueryResult);
}

/// Line-oriented renderer used by the headless client and tests.
#[derive(Debug, Default)]
pub struct TextRenderer {
    labels: Labels,
    lines: Vec<String>,
    render_count: u64,
}

impl TextRenderer {
    pub fn new(labels: Labels) -> Self {
        Self {
            labels,
            lines: Vec::new(),
            render_count: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    fn basename(url: &str) -> &str {
        url.trim_end_matches('/').rsplit('/').next().unwrap_or(url)
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, result: &QueryResult) {
        self.render_count += 1;
        self.lines.clear();

        if result.is_empty() {
            self.lines.push(self.labels.empty.clone());
            return;
        }

        match result {
            QueryResult::TreeBacklinks(groups) => {
                for group in groups {
                    self.lines
                        .push(format!("{}{}", Self::basename(&group.url), group.path));
                    for block in &group.blocks {
                        self.lines.push(format!("  {}", block.content));
                    }
                }
            }
            QueryResult::Backlinks(groups) => {
                for group in groups {
                    self.lines.push(group.def.content.clone());
                    for r in &group.refs {
                        self.lines.push(format!("  {}", r.content));
                    }
                }
            }
            QueryResult::Graph(data) => {
                self.lines
                    .push(format!("{} nodes, {} links", data.nodes.len(), data.links.len()));
            }
        }
    }
}
