//! Lenient markup tokenizer and tree builder for the wren renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer**: a two-state lexer that splits markup into text and
//!   raw tag tokens. Lazy (an [`Iterator`]), total (no input can make it
//!   fail), and restartable from the source text.
//! - **Tree Builder**: consumes tokens into a [`wren_dom::DomTree`],
//!   recovering from unterminated, unbalanced, and unclosed tags the way
//!   lenient browsers do: the output is always a single well-formed tree.
//!
//! # Not implemented
//!
//! This is deliberately not a conformant HTML5 parser: no character
//! references, no RCDATA/RAWTEXT states, no insertion modes, no foster
//! parenting. Comments and doctypes are dropped rather than preserved.

/// Tree construction from tokens.
pub mod parser;
/// Markup tokenization.
pub mod tokenizer;

pub use parser::{TreeBuilder, VOID_ELEMENTS, parse, print_tree};
pub use tokenizer::{Token, Tokenizer, tokenize};
