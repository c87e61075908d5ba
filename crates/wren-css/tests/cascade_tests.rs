//! Integration tests for cascade and style resolution.

use std::collections::{HashMap, HashSet};

use wren_common::url::Url;
use wren_css::{
    ComputedStyle, CssParser, Rule, StyleContext, VISITED_LINK_COLOR, resolve_styles,
};
use wren_dom::{DomTree, NodeId, NodeType};
use wren_html::parse;

fn css(text: &str) -> Vec<Rule> {
    CssParser::new(text).parse()
}

fn resolve(tree: &DomTree, rules: &[Rule]) -> HashMap<NodeId, ComputedStyle> {
    let visited = HashSet::new();
    resolve_styles(
        tree,
        rules,
        &StyleContext {
            visited: &visited,
            base: None,
        },
    )
}

fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    for &child in tree.children(from) {
        if let Some(found) = find_element(tree, child, tag) {
            return Some(found);
        }
    }
    None
}

#[test]
fn class_beats_tag_specificity() {
    // Priority 10 beats priority 1, regardless of rule order.
    let rules = css("p { color: red; } .big { color: blue; }");
    let tree = parse(r#"<body><p class="big">hi</p></body>"#);
    let styles = resolve(&tree, &rules);

    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(styles[&p].get("color"), Some("blue"));
}

#[test]
fn important_stylesheet_beats_inline() {
    let rules = css("p { color: red !important; }");
    let tree = parse(r#"<body><p style="color:blue">hi</p></body>"#);
    let styles = resolve(&tree, &rules);

    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(styles[&p].get("color"), Some("red"));
}

#[test]
fn inline_beats_plain_stylesheet() {
    let rules = css("p { color: red; } .big { color: green; }");
    let tree = parse(r#"<body><p class="big" style="color:blue">hi</p></body>"#);
    let styles = resolve(&tree, &rules);

    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(styles[&p].get("color"), Some("blue"));
}

#[test]
fn important_inline_beats_important_stylesheet() {
    let rules = css("p { color: red !important; }");
    let tree = parse(r#"<body><p style="color:blue !important">hi</p></body>"#);
    let styles = resolve(&tree, &rules);

    // 11000 inline-important beats 10001 stylesheet-important.
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(styles[&p].get("color"), Some("blue"));
}

#[test]
fn inline_applies_when_stylesheet_is_silent() {
    let rules = css("p { color: red; }");
    let tree = parse(r#"<body><p style="background-color:yellow">hi</p></body>"#);
    let styles = resolve(&tree, &rules);

    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(styles[&p].get("background-color"), Some("yellow"));
}

#[test]
fn equal_priority_keeps_the_earliest_rule() {
    // Stable, stylesheet-order tie-breaking: the first rule of equal
    // priority wins.
    let rules = css("p { color: red; } p { color: blue; }");
    let tree = parse("<body><p>hi</p></body>");
    let styles = resolve(&tree, &rules);

    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(styles[&p].get("color"), Some("red"));
}

#[test]
fn inherited_properties_flow_down() {
    let rules = css("body { color: green; font-weight: bold; }");
    let tree = parse("<body><div><p>hi</p></div></body>");
    let styles = resolve(&tree, &rules);

    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(styles[&p].get("color"), Some("green"));
    assert_eq!(styles[&p].get("font-weight"), Some("bold"));
}

#[test]
fn non_inherited_properties_do_not_flow_down() {
    let rules = css("body { background-color: gray; }");
    let tree = parse("<body><p>hi</p></body>");
    let styles = resolve(&tree, &rules);

    let body = find_element(&tree, NodeId::ROOT, "body").unwrap();
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(styles[&body].get("background-color"), Some("gray"));
    assert_eq!(styles[&p].get("background-color"), None);
}

#[test]
fn defaults_apply_at_the_root() {
    let tree = parse("<body>hi</body>");
    let styles = resolve(&tree, &[]);

    let html = tree.document_element().unwrap();
    assert_eq!(styles[&html].get("font-size"), Some("16px"));
    assert_eq!(styles[&html].get("color"), Some("black"));
    assert_eq!(styles[&html].get("display"), Some("inline"));
}

#[test]
fn text_nodes_inherit_only() {
    let rules = css("p { color: red; }");
    let tree = parse("<body><p>words here</p></body>");
    let styles = resolve(&tree, &rules);

    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    let text = tree.children(p)[0];
    assert!(matches!(
        tree.get(text).unwrap().node_type,
        NodeType::Text(_)
    ));
    assert_eq!(styles[&text].get("color"), Some("red"));
}

#[test]
fn document_node_has_no_style() {
    let tree = parse("<body>hi</body>");
    let styles = resolve(&tree, &[]);
    assert!(!styles.contains_key(&NodeId::ROOT));
}

#[test]
fn percentage_font_size_resolves_against_parent() {
    // 150% of a 20px parent is 30px (spec-level example).
    let rules = css("body { font-size: 20px; } p { font-size: 150%; }");
    let tree = parse("<body><p>hi</p></body>");
    let styles = resolve(&tree, &rules);

    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(styles[&p].get("font-size"), Some("30px"));
}

#[test]
fn percentage_font_size_defaults_to_sixteen() {
    // No parent value parses: fall back to 16px.
    let rules = css("body { font-size: huge; } p { font-size: 50%; }");
    let tree = parse("<body><p>hi</p></body>");
    let styles = resolve(&tree, &rules);

    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(styles[&p].get("font-size"), Some("8px"));
}

#[test]
fn percentage_truncates_to_whole_pixels() {
    let rules = css("body { font-size: 15px; } p { font-size: 110%; }");
    let tree = parse("<body><p>hi</p></body>");
    let styles = resolve(&tree, &rules);

    // 15 * 1.1 = 16.5, truncated.
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(styles[&p].get("font-size"), Some("16px"));
}

#[test]
fn resolved_percentages_cascade_as_pixels() {
    // The child of a percentage-sized element inherits pixels, not the
    // percentage.
    let rules = css("body { font-size: 20px; } p { font-size: 150%; }");
    let tree = parse("<body><p><span>hi</span></p></body>");
    let styles = resolve(&tree, &rules);

    let span = find_element(&tree, NodeId::ROOT, "span").unwrap();
    assert_eq!(styles[&span].get("font-size"), Some("30px"));
}

#[test]
fn visited_anchor_is_recolored() {
    let base = Url::parse("http://example.org/index.html").unwrap();
    let mut visited = HashSet::new();
    let _ = visited.insert("http://example.org/seen.html".to_string());

    let tree = parse(
        r#"<body><a href="seen.html">old</a><a href="new.html">new</a></body>"#,
    );
    let styles = resolve_styles(
        &tree,
        &css("a { color: blue; }"),
        &StyleContext {
            visited: &visited,
            base: Some(&base),
        },
    );

    let first = find_element(&tree, NodeId::ROOT, "a").unwrap();
    assert_eq!(styles[&first].get("color"), Some(VISITED_LINK_COLOR));

    // The second anchor resolves to an unvisited URL and keeps its rule
    // color.
    let body = find_element(&tree, NodeId::ROOT, "body").unwrap();
    let second = tree.children(body)[1];
    assert_eq!(styles[&second].get("color"), Some("blue"));
}

#[test]
fn resolution_is_deterministic() {
    let rules = css(
        "body { font-size: 18px; } p { color: red; } .big { color: blue; font-size: 125%; }",
    );
    let tree = parse(r#"<body><p class="big" style="font-weight:bold">hi</p></body>"#);

    let first = resolve(&tree, &rules);
    let second = resolve(&tree, &rules);
    assert_eq!(first, second);
}
