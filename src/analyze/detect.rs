//! Pattern detection: group the element sequence by signature, filter, score,
//! and resolve nested sub-patterns.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::signature::signature_of;
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{ElementRecord, ElementSignature, PatternInfo, PatternSet};

/// Minimum repetitions before a group counts as a pattern.
pub const DEFAULT_THRESHOLD: usize = 10;

/// The count score saturates once a group reaches this multiple of the
/// threshold.
pub const COUNT_SATURATION: f64 = 3.0;

/// Bound on nested-pattern recursion, so detection halts on adversarial or
/// deeply nested input.
pub const MAX_NESTING_DEPTH: usize = 3;

/// Structurally repeating but non-content containers, dropped when
/// boilerplate exclusion is on.
pub const BOILERPLATE_TAGS: &[&str] = &[
    "nav", "menu", "header", "footer", "aside", "script", "style", "noscript",
];

/// Detection tuning. `Default` matches the documented defaults.
#[derive(Debug, Clone, Serialize)]
pub struct DetectOptions {
    /// Groups below this member count are dropped. Must be at least 1.
    pub threshold: usize,
    /// Drop groups whose tag is in [`BOILERPLATE_TAGS`].
    pub exclude_boilerplate: bool,
    /// Resolve sub-patterns among each pattern's descendants.
    pub nesting: bool,
    /// Fold the parent signature into each element's grouping key.
    pub parent_context: bool,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            exclude_boilerplate: true,
            nesting: false,
            parent_context: true,
        }
    }
}

/// Group `elements` into repeating patterns.
///
/// The returned set iterates in first-occurrence document order. An empty
/// input or a result with no qualifying group is an empty set, not an error;
/// a zero threshold is a validation error.
pub fn detect<'a>(
    elements: &'a [ElementRecord],
    options: &DetectOptions,
) -> AnalysisResult<PatternSet<'a>> {
    if options.threshold == 0 {
        return Err(AnalysisError::InvalidThreshold {
            value: options.threshold,
        });
    }

    let groups = group_by_signature(elements.iter(), options.parent_context);
    let mut consumed: HashSet<ElementSignature> = HashSet::new();
    let mut set = PatternSet::default();

    for (signature, members) in groups {
        if !survives(&signature, members.len(), options) || consumed.contains(&signature) {
            continue;
        }
        consumed.insert(signature.clone());
        let mut pattern = score_group(signature, members, options.threshold);
        if options.nesting {
            resolve_nested(&mut pattern, elements, options, 1, &mut consumed);
        }
        set.push(pattern);
    }

    debug!(
        elements = elements.len(),
        patterns = set.len(),
        threshold = options.threshold,
        "pattern detection complete"
    );
    Ok(set)
}

/// Signature → members, preserving first-occurrence order across groups and
/// document order within each group.
fn group_by_signature<'a, I>(
    elements: I,
    parent_context: bool,
) -> Vec<(ElementSignature, Vec<&'a ElementRecord>)>
where
    I: IntoIterator<Item = &'a ElementRecord>,
{
    let mut order: Vec<ElementSignature> = Vec::new();
    let mut members: HashMap<ElementSignature, Vec<&ElementRecord>> = HashMap::new();

    for element in elements {
        let signature = signature_of(element, parent_context);
        members
            .entry(signature.clone())
            .or_insert_with(|| {
                order.push(signature);
                Vec::new()
            })
            .push(element);
    }

    order
        .into_iter()
        .map(|sig| {
            let group = members.remove(&sig).unwrap_or_default();
            (sig, group)
        })
        .collect()
}

fn survives(signature: &ElementSignature, count: usize, options: &DetectOptions) -> bool {
    if options.exclude_boilerplate && BOILERPLATE_TAGS.contains(&signature.tag.as_str()) {
        return false;
    }
    count >= options.threshold
}

fn score_group<'a>(
    signature: ElementSignature,
    elements: Vec<&'a ElementRecord>,
    threshold: usize,
) -> PatternInfo<'a> {
    let count = elements.len();
    let count_score = (count as f64 / (threshold as f64 * COUNT_SATURATION)).min(1.0);
    let consistency_score = consistency(&elements);
    let confidence = ((count_score + consistency_score) / 2.0).clamp(0.0, 1.0);

    PatternInfo {
        signature,
        elements,
        count,
        confidence,
        count_score,
        consistency_score,
        nested: Vec::new(),
    }
}

/// Fraction of members whose attribute-name set matches the group's modal
/// set. Extra or missing attribute keys pull the score down.
fn consistency(members: &[&ElementRecord]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }

    let mut shapes: HashMap<Vec<&str>, usize> = HashMap::new();
    for member in members {
        let mut keys: Vec<&str> = member.attributes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        *shapes.entry(keys).or_insert(0) += 1;
    }

    let modal = shapes.values().copied().max().unwrap_or(0);
    modal as f64 / members.len() as f64
}

/// Run detection over the strict descendants of `parent`'s members and attach
/// what survives as nested sub-patterns. A signature consumed here is never
/// re-emitted as a later top-level sibling.
fn resolve_nested<'a>(
    parent: &mut PatternInfo<'a>,
    elements: &'a [ElementRecord],
    options: &DetectOptions,
    level: usize,
    consumed: &mut HashSet<ElementSignature>,
) {
    if level > MAX_NESTING_DEPTH {
        return;
    }

    let descendants: Vec<&ElementRecord> = elements
        .iter()
        .filter(|e| {
            parent
                .elements
                .iter()
                .any(|m| is_strict_descendant(&m.path, &e.path))
        })
        .collect();
    if descendants.is_empty() {
        return;
    }

    for (signature, members) in
        group_by_signature(descendants.iter().copied(), options.parent_context)
    {
        if !survives(&signature, members.len(), options) || consumed.contains(&signature) {
            continue;
        }
        consumed.insert(signature.clone());
        let mut sub = score_group(signature, members, options.threshold);
        resolve_nested(&mut sub, elements, options, level + 1, consumed);
        parent.nested.push(sub);
    }
}

fn is_strict_descendant(ancestor: &[usize], candidate: &[usize]) -> bool {
    candidate.len() > ancestor.len() && candidate[..ancestor.len()] == *ancestor
}

// ── Tests ──
