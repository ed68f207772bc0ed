//! Thin owner tying the pieces together: holds the parsed tree, runs the
//! extraction pass exactly once, and exposes read-only views, statistics and
//! pattern detection over the cached sequence.

use std::collections::BTreeMap;

use scraper::Html;
use tracing::debug;

use crate::analyze::detect::{detect, DetectOptions};
use crate::analyze::extract::extract_elements;
use crate::analyze::signature::signature_of;
use crate::error::AnalysisResult;
use crate::models::{DocumentStats, ElementRecord, ElementSignature, PatternSet};

/// One analyzed document.
///
/// Extraction is lazy and cached: the first accessor to need elements pays
/// for the tree walk, later calls reuse the same buffer. Not internally
/// synchronized; callers serialize access to one model, while independent
/// models are freely processed in parallel.
pub struct DocumentModel {
    html: Html,
    elements: Option<Vec<ElementRecord>>,
}

impl DocumentModel {
    /// Wrap an already-parsed document. The core never parses markup itself.
    pub fn new(html: Html) -> Self {
        Self {
            html,
            elements: None,
        }
    }

    /// The extracted element sequence, in document order. Runs the
    /// extraction pass on first call and caches it.
    pub fn elements(&mut self) -> AnalysisResult<&[ElementRecord]> {
        self.ensure_extracted()?;
        Ok(self.elements.as_deref().unwrap_or_default())
    }

    /// Drop the cached sequence; the next accessor re-extracts. For callers
    /// that replaced or mutated the underlying tree.
    pub fn invalidate(&mut self) {
        self.elements = None;
    }

    /// Swap in a different parsed tree and invalidate the cache.
    pub fn replace_tree(&mut self, html: Html) {
        self.html = html;
        self.elements = None;
    }

    /// Aggregate statistics over the cached sequence.
    pub fn stats(&mut self) -> AnalysisResult<DocumentStats> {
        let elements = self.elements()?;

        let total = elements.len();
        let depth_sum: usize = elements.iter().map(|e| e.depth).sum();
        let average_depth = if total == 0 {
            0.0
        } else {
            depth_sum as f64 / total as f64
        };

        let mut tag_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut element_type_counts: BTreeMap<String, usize> = BTreeMap::new();
        for e in elements {
            *tag_counts.entry(e.tag.clone()).or_insert(0) += 1;
            *element_type_counts
                .entry(e.element_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        Ok(DocumentStats {
            total_elements: total,
            unique_tags: tag_counts.len(),
            average_depth,
            max_depth: elements.iter().map(|e| e.depth).max().unwrap_or(0),
            elements_with_classes: elements.iter().filter(|e| e.has_classes()).count(),
            elements_with_ids: elements.iter().filter(|e| e.id.is_some()).count(),
            elements_with_text: elements.iter().filter(|e| !e.text.is_empty()).count(),
            element_type_counts,
            tag_counts,
        })
    }

    /// Detect repeating patterns. Forces extraction first, so detection
    /// never runs against an unpopulated cache.
    pub fn detect_patterns(&mut self, options: &DetectOptions) -> AnalysisResult<PatternSet<'_>> {
        self.ensure_extracted()?;
        detect(self.elements.as_deref().unwrap_or_default(), options)
    }

    /// All elements whose signature matches, in document order.
    pub fn elements_matching(
        &mut self,
        signature: &ElementSignature,
        parent_context: bool,
    ) -> AnalysisResult<Vec<&ElementRecord>> {
        self.ensure_extracted()?;
        Ok(self
            .elements
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|e| &signature_of(e, parent_context) == signature)
            .collect())
    }

    fn ensure_extracted(&mut self) -> AnalysisResult<()> {
        if self.elements.is_none() {
            let records = extract_elements(&self.html.tree.root())?;
            debug!(elements = records.len(), "document cache populated");
            self.elements = Some(records);
        }
        Ok(())
    }
}

// ── Tests ──
