//! Parse-tree input boundary.
//!
//! The core never fetches or parses markup. Callers hand it an
//! already-parsed tree through the [`DomNode`] capability set; the adapter
//! below covers `scraper::Html`, and tests supply synthetic trees.

use ego_tree::NodeRef;
use scraper::Node;

/// Minimal capability set the traversal needs from a parse-tree node.
pub trait DomNode: Sized {
    /// True for actual markup elements; text, comments, doctypes and the
    /// synthetic document wrapper all answer false.
    fn is_element(&self) -> bool;

    /// Element name as the parser recorded it. Only meaningful when
    /// `is_element()` holds; `""` otherwise.
    fn tag_name(&self) -> String;

    /// Attribute name/value pairs, declaration order as parsed.
    fn attributes(&self) -> Vec<(String, String)>;

    /// All child nodes in order, element or not.
    fn children(&self) -> Vec<Self>;

    /// Concatenated immediate text children, untrimmed.
    fn own_text(&self) -> String;
}

impl<'a> DomNode for NodeRef<'a, Node> {
    fn is_element(&self) -> bool {
        self.value().is_element()
    }

    fn tag_name(&self) -> String {
        self.value()
            .as_element()
            .map(|e| e.name().to_string())
            .unwrap_or_default()
    }

    fn attributes(&self) -> Vec<(String, String)> {
        self.value()
            .as_element()
            .map(|e| {
                e.attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn children(&self) -> Vec<Self> {
        NodeRef::children(self).collect()
    }

    fn own_text(&self) -> String {
        NodeRef::children(self)
            .filter_map(|c| c.value().as_text().map(|t| &**t))
            .collect()
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn adapter_exposes_the_parsed_tree() {
        let doc = Html::parse_document(
            r#"<html><body><p class="x" id="p1">hi<!-- note --><b>bold</b></p></body></html>"#,
        );
        let root = doc.tree.root();

        // The document node is the synthetic wrapper, not an element.
        assert!(!root.is_element());
        assert_eq!(root.tag_name(), "");

        let html = root
            .children()
            .into_iter()
            .find(DomNode::is_element)
            .unwrap();
        assert_eq!(html.tag_name(), "html");

        let body = html.children().into_iter().find(|c| c.tag_name() == "body").unwrap();
        let p = body.children().into_iter().find(DomNode::is_element).unwrap();
        assert_eq!(p.tag_name(), "p");
        let attrs = p.attributes();
        assert!(attrs.contains(&("class".to_string(), "x".to_string())));
        assert!(attrs.contains(&("id".to_string(), "p1".to_string())));

        // Own text only: the comment and the <b> subtree stay out.
        assert_eq!(p.own_text(), "hi");
    }
}
