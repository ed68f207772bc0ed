//! Element extraction: one pre-order walk over the supplied parse tree,
//! producing the flat, depth-annotated record sequence everything else reads.
//!
//! The emitted order — parents before children, siblings left to right — is
//! the canonical document order used for group iteration and tie-breaks.
//! Parent context travels downward as an explicit signature-key argument;
//! records never hold back-references.

use std::collections::HashMap;

use tracing::debug;

use super::signature::signature_of;
use crate::dom::DomNode;
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{ElementRecord, ElementType};

/// Hard depth bound. A cycle in child references shows up as unbounded
/// depth; this converts nontermination into an error.
pub const MAX_TREE_DEPTH: usize = 256;

/// Cap on the normalized own-text kept per record.
pub const TEXT_LIMIT: usize = 200;

/// Walk the tree under `root` and emit a record per markup element.
///
/// `root` itself is treated as the synthetic container: its element children
/// become depth-0 roots. Text nodes, comments and doctypes are skipped. An
/// element-free tree yields an empty sequence, not an error.
pub fn extract_elements<N: DomNode>(root: &N) -> AnalysisResult<Vec<ElementRecord>> {
    let mut out = Vec::new();
    let roots: Vec<N> = element_children(root);
    visit_siblings(&roots, 0, &[], "", "", &mut out)?;
    debug!(elements = out.len(), "extraction pass complete");
    Ok(out)
}

fn element_children<N: DomNode>(node: &N) -> Vec<N> {
    node.children().into_iter().filter(N::is_element).collect()
}

/// Visit one sibling run at `depth`, assigning sibling indices and
/// positional xpath segments, then recurse into each element.
fn visit_siblings<N: DomNode>(
    siblings: &[N],
    depth: usize,
    parent_path: &[usize],
    parent_sig_key: &str,
    parent_xpath: &str,
    out: &mut Vec<ElementRecord>,
) -> AnalysisResult<()> {
    let tags: Vec<String> = siblings
        .iter()
        .map(|s| s.tag_name().to_ascii_lowercase())
        .collect();

    let mut tag_totals: HashMap<&str, usize> = HashMap::new();
    for tag in &tags {
        *tag_totals.entry(tag.as_str()).or_insert(0) += 1;
    }

    let mut tag_seen: HashMap<&str, usize> = HashMap::new();
    for (idx, (node, tag)) in siblings.iter().zip(&tags).enumerate() {
        if depth >= MAX_TREE_DEPTH {
            return Err(AnalysisError::TreeDepthExceeded {
                tag: tag.clone(),
                limit: MAX_TREE_DEPTH,
            });
        }

        let position = tag_seen.entry(tag.as_str()).or_insert(0);
        *position += 1;
        let segment = if tag_totals[tag.as_str()] > 1 {
            format!("{}[{}]", tag, position)
        } else {
            tag.clone()
        };
        let xpath = format!("{}/{}", parent_xpath, segment);

        let mut path = parent_path.to_vec();
        path.push(idx);

        let kids = element_children(node);
        let record = build_record(node, tag, depth, parent_sig_key, path.clone(), xpath.clone(), kids.len());

        // Children see the parent's full signature key, so context chains.
        let carried = signature_of(&record, true).key();
        out.push(record);

        visit_siblings(&kids, depth + 1, &path, &carried, &xpath, out)?;
    }
    Ok(())
}

fn build_record<N: DomNode>(
    node: &N,
    tag: &str,
    depth: usize,
    parent_sig_key: &str,
    path: Vec<usize>,
    xpath: String,
    children_count: usize,
) -> ElementRecord {
    let mut classes: Vec<String> = Vec::new();
    let mut id = None;
    let mut attributes = HashMap::new();

    for (name, value) in node.attributes() {
        match name.as_str() {
            "class" => {
                classes = value
                    .split_whitespace()
                    .map(str::to_string)
                    .collect();
            }
            "id" => id = Some(value),
            _ => {
                attributes.insert(name, value);
            }
        }
    }

    let element_type = classify(tag, &classes);

    ElementRecord {
        tag: tag.to_string(),
        classes,
        id,
        text: normalize_text(&node.own_text()),
        attributes,
        parent_signature: parent_sig_key.to_string(),
        depth,
        path,
        xpath,
        element_type,
        children_count,
    }
}

/// Category scheme for the statistics boundary.
fn classify(tag: &str, classes: &[String]) -> ElementType {
    if matches!(tag, "nav" | "menu") || classes.iter().any(|c| c.to_lowercase().contains("nav")) {
        ElementType::Navigation
    } else if matches!(tag, "button" | "input" | "select" | "textarea" | "a" | "form") {
        ElementType::Interactive
    } else if matches!(tag, "meta" | "link" | "script" | "style" | "title" | "head") {
        ElementType::Metadata
    } else if matches!(tag, "header" | "footer" | "aside" | "section" | "article" | "main") {
        ElementType::Structural
    } else {
        ElementType::Content
    }
}

/// Collapse runs of whitespace to single spaces and cap the length.
fn normalize_text(raw: &str) -> String {
    let mut normalized = String::new();
    for word in raw.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(word);
        if normalized.chars().count() >= TEXT_LIMIT {
            return normalized.chars().take(TEXT_LIMIT).collect();
        }
    }
    normalized
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn extract(html: &str) -> Vec<ElementRecord> {
        let doc = Html::parse_document(html);
        extract_elements(&doc.tree.root()).unwrap()
    }

    fn fixture(name: &str) -> Vec<ElementRecord> {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap();
        extract(&html)
    }

    #[test]
    fn simple_document_order_and_depths() {
        let elements = fixture("simple");
        let tags: Vec<&str> = elements.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(
            tags,
            ["html", "head", "title", "meta", "body", "div", "p", "p", "a", "span"]
        );
        let depths: Vec<usize> = elements.iter().map(|e| e.depth).collect();
        assert_eq!(depths, [0, 1, 2, 2, 1, 2, 3, 3, 3, 2]);
    }

    #[test]
    fn roots_have_depth_zero_and_no_parent_signature() {
        let elements = fixture("simple");
        assert_eq!(elements[0].depth, 0);
        assert_eq!(elements[0].parent_signature, "");
        for e in &elements[1..] {
            assert!(e.depth > 0);
            assert!(!e.parent_signature.is_empty());
        }
    }

    #[test]
    fn path_tracks_depth_and_sibling_position() {
        let elements = fixture("simple");
        for e in &elements {
            assert_eq!(e.path.len(), e.depth + 1, "path/depth mismatch at <{}>", e.tag);
        }
        let second_p = &elements[7];
        assert_eq!(second_p.tag, "p");
        // html -> body -> div -> second p
        assert_eq!(second_p.path, vec![0, 1, 0, 1]);
    }

    #[test]
    fn xpath_positions_only_where_siblings_repeat() {
        let elements = fixture("simple");
        let xpaths: Vec<&str> = elements.iter().map(|e| e.xpath.as_str()).collect();
        assert!(xpaths.contains(&"/html/body/div/p[1]"));
        assert!(xpaths.contains(&"/html/body/div/p[2]"));
        assert!(xpaths.contains(&"/html/body/div/a"));
        assert!(xpaths.contains(&"/html/body/span"));
    }

    #[test]
    fn class_and_id_are_lifted_out_of_attributes() {
        let elements = fixture("simple");
        let div = elements.iter().find(|e| e.tag == "div").unwrap();
        assert_eq!(div.id.as_deref(), Some("container"));
        assert!(div.attributes.is_empty());
        assert_eq!(div.children_count, 3);

        let a = elements.iter().find(|e| e.tag == "a").unwrap();
        assert_eq!(a.attributes.get("href").map(String::as_str), Some("#"));
        assert_eq!(a.element_type, ElementType::Interactive);
    }

    #[test]
    fn own_text_is_normalized() {
        let elements = extract("<html><body><p>  Hello \n\n  world  </p></body></html>");
        let p = elements.iter().find(|e| e.tag == "p").unwrap();
        assert_eq!(p.text, "Hello world");
    }

    #[test]
    fn own_text_excludes_descendants() {
        let elements = extract("<html><body><div>outer<span>inner</span></div></body></html>");
        let div = elements.iter().find(|e| e.tag == "div").unwrap();
        assert_eq!(div.text, "outer");
    }

    #[test]
    fn classification_matches_category_scheme() {
        let elements = fixture("simple");
        let by_tag = |t: &str| elements.iter().find(|e| e.tag == t).unwrap().element_type;
        assert_eq!(by_tag("head"), ElementType::Metadata);
        assert_eq!(by_tag("meta"), ElementType::Metadata);
        assert_eq!(by_tag("a"), ElementType::Interactive);
        assert_eq!(by_tag("p"), ElementType::Content);
    }

    #[test]
    fn nav_class_forces_navigation_category() {
        let elements = extract(r#"<html><body><div class="top-NavBar">x</div></body></html>"#);
        let div = elements.iter().find(|e| e.tag == "div").unwrap();
        assert_eq!(div.element_type, ElementType::Navigation);
    }

    // Synthetic trees for shapes scraper cannot produce.

    struct FakeNode {
        tag: &'static str,
        remaining: usize,
    }

    impl DomNode for FakeNode {
        fn is_element(&self) -> bool {
            !self.tag.is_empty()
        }
        fn tag_name(&self) -> String {
            self.tag.to_string()
        }
        fn attributes(&self) -> Vec<(String, String)> {
            Vec::new()
        }
        fn children(&self) -> Vec<Self> {
            if self.remaining == 0 {
                Vec::new()
            } else {
                vec![FakeNode { tag: "div", remaining: self.remaining - 1 }]
            }
        }
        fn own_text(&self) -> String {
            String::new()
        }
    }

    #[test]
    fn element_free_tree_yields_empty_sequence() {
        let root = FakeNode { tag: "", remaining: 0 };
        assert!(extract_elements(&root).unwrap().is_empty());
    }

    #[test]
    fn runaway_depth_is_reported_not_followed() {
        let root = FakeNode { tag: "", remaining: MAX_TREE_DEPTH + 50 };
        let err = extract_elements(&root).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::TreeDepthExceeded { limit: MAX_TREE_DEPTH, .. }
        ));
    }

    #[test]
    fn depth_just_under_the_bound_is_fine() {
        let root = FakeNode { tag: "", remaining: MAX_TREE_DEPTH };
        let elements = extract_elements(&root).unwrap();
        assert_eq!(elements.len(), MAX_TREE_DEPTH);
        assert_eq!(elements.last().unwrap().depth, MAX_TREE_DEPTH - 1);
    }
}
