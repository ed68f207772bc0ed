use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

/// Coarse element categories used by the document statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Content,
    Navigation,
    Structural,
    Interactive,
    Metadata,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Content => "content",
            ElementType::Navigation => "navigation",
            ElementType::Structural => "structural",
            ElementType::Interactive => "interactive",
            ElementType::Metadata => "metadata",
        }
    }
}

/// One extracted markup element, immutable after extraction.
///
/// Records are owned by the `DocumentModel` cache; everything downstream
/// borrows them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementRecord {
    /// Lowercase element name.
    pub tag: String,
    /// Class tokens in appearance order, trimmed, empty tokens dropped.
    pub classes: Vec<String>,
    pub id: Option<String>,
    /// Own (immediate) text, whitespace-normalized and length-capped.
    pub text: String,
    /// All attributes except `class` and `id`.
    pub attributes: HashMap<String, String>,
    /// Signature key of the parent element, `""` for roots.
    pub parent_signature: String,
    /// 0 for roots, +1 per extracted ancestor.
    pub depth: usize,
    /// Sibling indices among extracted element children, root to self.
    pub path: Vec<usize>,
    /// Simplified positional XPath, e.g. `/html/body/div/p[2]`.
    pub xpath: String,
    pub element_type: ElementType,
    /// Number of extracted element children.
    pub children_count: usize,
}

impl ElementRecord {
    pub fn has_classes(&self) -> bool {
        !self.classes.is_empty()
    }
}

/// Hashable structural identity used as the grouping key.
///
/// Two signatures are equal iff tag, classes hash and (when present) parent
/// hash all match. The hashes are truncated digests: grouping keys only,
/// never security-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ElementSignature {
    pub tag: String,
    /// Truncated digest of the sorted class list; class order is irrelevant.
    pub classes_hash: String,
    /// Truncated digest of the parent's signature key, when parent-context
    /// mode is on and the element is not a root.
    pub parent_hash: Option<String>,
}

impl ElementSignature {
    /// Canonical string form, also carried as `parent_signature` on child
    /// records. Each key folds in the parent's own key, so equality is
    /// sensitive to the whole ancestor chain.
    pub fn key(&self) -> String {
        match &self.parent_hash {
            Some(p) => format!("{}:{}:{}", self.tag, self.classes_hash, p),
            None => format!("{}:{}", self.tag, self.classes_hash),
        }
    }
}

impl fmt::Display for ElementSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// A detected repeating group: elements sharing one signature, in document
/// order, with its confidence breakdown and any nested sub-patterns.
#[derive(Debug, Clone, Serialize)]
pub struct PatternInfo<'a> {
    pub signature: ElementSignature,
    pub elements: Vec<&'a ElementRecord>,
    pub count: usize,
    /// Combined score in [0, 1].
    pub confidence: f64,
    /// Repetition component of the confidence.
    pub count_score: f64,
    /// Attribute-shape component of the confidence.
    pub consistency_score: f64,
    /// Sub-patterns found among the members' descendants.
    pub nested: Vec<PatternInfo<'a>>,
}

/// Detection result: patterns in first-occurrence document order with O(1)
/// lookup by signature. Iteration order is part of the contract.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PatternSet<'a> {
    entries: Vec<PatternInfo<'a>>,
    #[serde(skip)]
    index: HashMap<ElementSignature, usize>,
}

impl<'a> PatternSet<'a> {
    pub(crate) fn push(&mut self, pattern: PatternInfo<'a>) {
        self.index.insert(pattern.signature.clone(), self.entries.len());
        self.entries.push(pattern);
    }

    pub fn get(&self, signature: &ElementSignature) -> Option<&PatternInfo<'a>> {
        self.index.get(signature).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternInfo<'a>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a PatternSet<'a> {
    type Item = &'a PatternInfo<'a>;
    type IntoIter = std::slice::Iter<'a, PatternInfo<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Aggregate statistics over the extracted element sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentStats {
    pub total_elements: usize,
    pub unique_tags: usize,
    /// Exact mean depth, not rounded.
    pub average_depth: f64,
    pub max_depth: usize,
    pub elements_with_classes: usize,
    pub elements_with_ids: usize,
    pub elements_with_text: usize,
    /// Per-category counts keyed by lowercase category name.
    pub element_type_counts: BTreeMap<String, usize>,
    pub tag_counts: BTreeMap<String, usize>,
}
