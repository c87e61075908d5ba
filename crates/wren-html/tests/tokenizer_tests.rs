//! Integration tests for the markup tokenizer.

use wren_html::{Token, Tokenizer, tokenize};

fn text(s: &str) -> Token {
    Token::Text(s.to_string())
}

fn tag(s: &str) -> Token {
    Token::Tag(s.to_string())
}

#[test]
fn empty_input_produces_no_tokens() {
    assert_eq!(tokenize(""), vec![]);
}

#[test]
fn plain_text_is_one_token() {
    assert_eq!(tokenize("hello world"), vec![text("hello world")]);
}

#[test]
fn tags_and_text_interleave() {
    assert_eq!(
        tokenize("<p>hello</p>"),
        vec![tag("p"), text("hello"), tag("/p")]
    );
}

#[test]
fn tag_content_is_raw() {
    assert_eq!(
        tokenize(r#"<a href="x.html" class=link>"#),
        vec![tag(r#"a href="x.html" class=link"#)]
    );
}

#[test]
fn open_angle_flushes_pending_text() {
    assert_eq!(
        tokenize("before<b>after"),
        vec![text("before"), tag("b"), text("after")]
    );
}

#[test]
fn unterminated_tag_is_dropped() {
    assert_eq!(tokenize("hello <b"), vec![text("hello ")]);
    assert_eq!(tokenize("<unclosed"), vec![]);
}

#[test]
fn trailing_text_is_emitted() {
    assert_eq!(tokenize("<br>tail"), vec![tag("br"), text("tail")]);
}

#[test]
fn empty_tag_is_emitted() {
    assert_eq!(tokenize("<>"), vec![tag("")]);
}

#[test]
fn tokenizer_is_lazy() {
    let mut tokens = Tokenizer::new("<a>text<b>");
    assert_eq!(tokens.next(), Some(tag("a")));
    assert_eq!(tokens.next(), Some(text("text")));
    // Restart from scratch: same results.
    let again = tokenize("<a>text<b>");
    assert_eq!(again, vec![tag("a"), text("text"), tag("b")]);
}

#[test]
fn multibyte_text_survives() {
    assert_eq!(
        tokenize("<p>héllo wörld</p>"),
        vec![tag("p"), text("héllo wörld"), tag("/p")]
    );
}
