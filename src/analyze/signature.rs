//! Structural signature derivation.
//!
//! A signature is the grouping key for pattern detection: tag plus a
//! truncated digest of the class set, optionally chained to the parent's
//! signature. Deterministic across runs; class order and attribute
//! declaration order never affect it.

use crate::models::{ElementRecord, ElementSignature};

/// Truncation length for signature digests, in hex chars. A conscious
/// brevity/collision tradeoff: collisions only blur grouping precision.
pub const SIGNATURE_HASH_LEN: usize = 8;

const CLASS_DELIMITER: &str = ",";

/// Truncated digest of the sorted, delimiter-joined class list.
///
/// Sorting makes class order irrelevant; an empty list hashes the empty
/// string, so classless elements of the same tag still group together.
pub fn classes_hash(classes: &[String]) -> String {
    let mut sorted: Vec<&str> = classes.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    short_hash(&sorted.join(CLASS_DELIMITER))
}

/// Truncated digest of a parent signature key.
pub(crate) fn context_hash(parent_key: &str) -> String {
    short_hash(parent_key)
}

/// Derive the signature for one record.
///
/// With `include_parent`, non-root elements fold in a digest of the carried
/// parent signature key. Those keys chain parent context downward during
/// extraction, so the whole ancestor chain participates without walking it
/// here.
pub fn signature_of(record: &ElementRecord, include_parent: bool) -> ElementSignature {
    let parent_hash = if include_parent && record.depth > 0 && !record.parent_signature.is_empty()
    {
        Some(context_hash(&record.parent_signature))
    } else {
        None
    };

    ElementSignature {
        tag: record.tag.clone(),
        classes_hash: classes_hash(&record.classes),
        parent_hash,
    }
}

fn short_hash(input: &str) -> String {
    blake3::hash(input.as_bytes()).to_hex()[..SIGNATURE_HASH_LEN].to_string()
}

// ── Tests ──
