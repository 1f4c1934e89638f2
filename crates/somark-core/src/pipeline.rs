//! The full analysis and the marking facade on top of it.

use tracing::debug;

use crate::aggregate::{build_result_tree, ResultNode};
use crate::classify::annotate_types;
use crate::context::AnalyzerContext;
use crate::document::Document;
use crate::error::AnalysisError;
use crate::overlay::{build_marks, LabelMode, OverlaySurface};
use crate::prune::prune;
use crate::select::{annotations, select_at_depth, Annotation};
use crate::visibility::annotate_visibility;

/// Runs the four passes on a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer;

impl Analyzer {
    pub fn new() -> Self {
        Self
    }

    /// Visibility, types, result tree, prune. Returns the pruned tree, or
    /// `None` when nothing in the document is typed.
    pub fn run<D: Document + ?Sized>(&self, doc: &D) -> Result<Option<ResultNode>, AnalysisError> {
        let mut ctx = AnalyzerContext::new(doc);
        annotate_visibility(&mut ctx)?;
        annotate_types(&mut ctx)?;
        let Some(tree) = build_result_tree(&ctx)? else {
            debug!("Document has no typed elements");
            return Ok(None);
        };
        let tree = prune(tree)?;
        debug!(nodes = tree.size(), signature = %tree.signature, "Pruned tree");
        Ok(Some(tree))
    }
}

/// Caches the result tree of the last analysis and marks selections of it.
#[derive(Debug, Default)]
pub struct Marker {
    analyzer: Analyzer,
    tree: Option<ResultNode>,
}

impl Marker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the cached tree and analyze `doc` from scratch.
    pub fn aggregate<D: Document + ?Sized>(&mut self, doc: &D) -> Result<(), AnalysisError> {
        self.tree = None;
        self.tree = self.analyzer.run(doc)?;
        Ok(())
    }

    pub fn tree(&self) -> Option<&ResultNode> {
        self.tree.as_ref()
    }

    /// Selected nodes at `depth`; empty before the first aggregation.
    pub fn select(&self, depth: i64) -> Result<Vec<&ResultNode>, AnalysisError> {
        match &self.tree {
            Some(tree) => select_at_depth(tree, depth),
            None if depth < 0 => Err(AnalysisError::NegativeDepth(depth)),
            None => Ok(Vec::new()),
        }
    }

    /// Replace whatever is on `surface` with marks for the selection at
    /// `depth`, and return its annotation records.
    pub async fn mark<S: OverlaySurface + ?Sized>(
        &self,
        surface: &mut S,
        depth: i64,
        mode: LabelMode,
    ) -> Result<Vec<Annotation>, AnalysisError> {
        surface.clear().await?;
        let selected = self.select(depth)?;
        if !selected.is_empty() {
            surface.draw(&build_marks(&selected, mode)).await?;
        }
        Ok(annotations(&selected))
    }

    pub async fn unmark<S: OverlaySurface + ?Sized>(&self, surface: &mut S) -> Result<(), AnalysisError> {
        surface.clear().await
    }
}
