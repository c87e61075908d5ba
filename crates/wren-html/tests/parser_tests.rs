//! Integration tests for the tree builder.

use wren_dom::{DomTree, NodeId, NodeType};
use wren_html::parse;

/// Helper to get the first element with the given tag, depth-first.
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

/// Helper to get the concatenated text content of a subtree.
fn text_content(tree: &DomTree, id: NodeId) -> String {
    let mut result = String::new();
    if let Some(node) = tree.get(id) {
        match &node.node_type {
            NodeType::Text(data) => result.push_str(data),
            _ => {
                for &child_id in tree.children(id) {
                    result.push_str(&text_content(tree, child_id));
                }
            }
        }
    }
    result
}

/// Count Element and Text nodes, excluding the Document node.
fn count_content_nodes(tree: &DomTree) -> usize {
    tree.iter_all()
        .filter(|&id| {
            matches!(
                tree.get(id).map(|n| &n.node_type),
                Some(NodeType::Element(_) | NodeType::Text(_))
            )
        })
        .count()
}

#[test]
fn root_is_always_html_under_document() {
    let tree = parse("");
    assert!(matches!(
        tree.get(NodeId::ROOT).unwrap().node_type,
        NodeType::Document
    ));
    let html = tree.document_element().unwrap();
    assert_eq!(tree.as_element(html).unwrap().tag_name, "html");
    assert_eq!(tree.parent(html), Some(NodeId::ROOT));
}

#[test]
fn nested_elements() {
    let tree = parse("<body><div><p>Text</p></div></body>");
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    let p = find_element(&tree, div, "p").unwrap();
    assert_eq!(text_content(&tree, p), "Text");
}

#[test]
fn tag_names_are_lowercased() {
    let tree = parse("<BODY><DiV></DiV></BODY>");
    assert!(find_element(&tree, NodeId::ROOT, "div").is_some());
    assert!(find_element(&tree, NodeId::ROOT, "body").is_some());
}

#[test]
fn attributes_parse_with_quotes_and_bare_forms() {
    let tree = parse(r#"<body><a HREF="a b.html" class='x y' disabled>go</a></body>"#);
    let a = find_element(&tree, NodeId::ROOT, "a").unwrap();
    let data = tree.as_element(a).unwrap();
    // Keys lowercased, quoted values atomic across whitespace, quotes
    // stripped, value case preserved.
    assert_eq!(data.attrs.get("href").map(String::as_str), Some("a b.html"));
    assert_eq!(data.attrs.get("class").map(String::as_str), Some("x y"));
    assert_eq!(data.attrs.get("disabled").map(String::as_str), Some(""));
}

#[test]
fn attribute_value_case_is_preserved() {
    let tree = parse(r#"<body><a href="Page.HTML"></a></body>"#);
    let a = find_element(&tree, NodeId::ROOT, "a").unwrap();
    assert_eq!(
        tree.as_element(a).unwrap().attrs.get("href").map(String::as_str),
        Some("Page.HTML")
    );
}

#[test]
fn doctype_and_comments_are_ignored() {
    let tree = parse("<!DOCTYPE html><body><!-- note -->hi</body>");
    let body = find_element(&tree, NodeId::ROOT, "body").unwrap();
    assert_eq!(text_content(&tree, body), "hi");
    // Document > html > body > text
    assert_eq!(count_content_nodes(&tree), 3);
}

#[test]
fn void_elements_take_no_children() {
    let tree = parse("<body><br>after</body>");
    let body = find_element(&tree, NodeId::ROOT, "body").unwrap();
    let br = find_element(&tree, NodeId::ROOT, "br").unwrap();
    assert!(tree.children(br).is_empty());
    // The text lands in body, not in br.
    assert_eq!(tree.parent(br), Some(body));
    assert_eq!(text_content(&tree, body), "after");
}

#[test]
fn unclosed_tags_close_implicitly_at_end_of_input() {
    let tree = parse("<body><div><p>dangling");
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    let p = find_element(&tree, div, "p").unwrap();
    assert_eq!(text_content(&tree, p), "dangling");
    // p is inside div, div inside body.
    assert_eq!(
        tree.parent(div),
        find_element(&tree, NodeId::ROOT, "body")
    );
}

#[test]
fn unbalanced_close_is_ignored() {
    let tree = parse("</div><body>hi</body>");
    let body = find_element(&tree, NodeId::ROOT, "body").unwrap();
    assert_eq!(text_content(&tree, body), "hi");
}

#[test]
fn whitespace_only_text_is_dropped() {
    let tree = parse("<body>\n   <p>kept</p>\n</body>");
    // Document, html, body, p, "kept"; no whitespace text nodes.
    assert_eq!(count_content_nodes(&tree), 4);
}

#[test]
fn truncated_tag_at_end_contributes_nothing() {
    let tree = parse("<body>text<di");
    let body = find_element(&tree, NodeId::ROOT, "body").unwrap();
    assert_eq!(text_content(&tree, body), "text");
    assert_eq!(count_content_nodes(&tree), 3);
}

#[test]
fn node_count_matches_undropped_tokens() {
    // 4 elements (html, body, p, br) + 2 text nodes; the doctype, the
    // closing tags, and the whitespace-only run are dropped by rule.
    let tree = parse("<!doctype html><body> <p>one</p><br>two</body>");
    assert_eq!(count_content_nodes(&tree), 6);
}
