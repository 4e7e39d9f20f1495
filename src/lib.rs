//! `istf-parser` — the parser stage of a streaming, interpolation-aware
//! CSS-in-JS pipeline, producing a flat Intermediate Style Token Format
//! (ISTF) event stream.
//!
//! # Overview
//!
//! A CSS-in-JS tag literal such as
//!
//! ```text
//! css`
//!   .first ${dynamicClass} {
//!     color: ${color};
//!     &:hover { color: papayawhip; }
//!   }
//! `
//! ```
//!
//! is not plain text: the host templating facility splits it into static
//! string fragments interleaved with opaque interpolation handles before it
//! ever reaches this crate. An upstream lexer turns that pair of arrays into
//! a stream of [`Token`]s; this crate turns the token stream into a flat
//! stream of [`Node`]s that a downstream prefixer, code generator, or
//! serializer can consume without backtracking.
//!
//! The hard part is context-sensitive ambiguity: `a: b` opens either a
//! declaration (`a: b;`) or a nested selector (`a:hover { … }`), and the
//! grammar cannot tell which until it has seen a few tokens past the colon.
//! [`Parser`] resolves this with a small lookahead buffer (see
//! [`BufferStream`]) rather than a separate grammar layer or backtracking.
//!
//! # Example
//!
//! ```
//! use istf_parser::{Parser, Node, RuleKind, Side, Token, TokenKind, Span, Position};
//!
//! fn tok(kind: TokenKind) -> Token {
//!     Token::new(kind, Span::new(Position::new(1, 1), Position::new(1, 1)))
//! }
//!
//! // `.banner { color: papayawhip; }`
//! let tokens = vec![
//!     tok(TokenKind::Word(".banner".into())),
//!     tok(TokenKind::Brace(Side::Open)),
//!     tok(TokenKind::Word("color".into())),
//!     tok(TokenKind::Colon),
//!     tok(TokenKind::Word("papayawhip".into())),
//!     tok(TokenKind::Semicolon),
//!     tok(TokenKind::Brace(Side::Close)),
//! ];
//! let mut iter = tokens.into_iter();
//! let parser = Parser::new(move || iter.next());
//! let nodes: Vec<Node> = parser.collect::<Result<_, _>>().unwrap();
//! assert_eq!(
//!     nodes,
//!     vec![
//!         Node::RuleStart(RuleKind::Style),
//!         Node::Selector(".banner".into()),
//!         Node::Property("color".into()),
//!         Node::Value("papayawhip".into()),
//!         Node::RuleEnd,
//!     ]
//! );
//! ```
//!
//! # What this crate does not do
//!
//! Tokenization of raw source text, interleaving interpolation handles with
//! string fragments, CSS prefixing/code generation, and any host-language
//! bindings are all out of scope — they are the lexer/input stage and the
//! downstream stages of the larger pipeline this crate is one link in.

mod buffer_stream;
mod error;
mod lazy_stream;
mod log;
mod node;
mod node_buffer;
mod parser;
mod span;
mod token;

#[cfg(test)]
mod __tests__;

pub use buffer_stream::BufferStream;
pub use error::ParseError;
pub use lazy_stream::LazyStream;
pub use log::Log;
pub use node::{Node, RuleKind};
pub use node_buffer::NodeBuffer;
pub use parser::{Parser, ParserConfig};
pub use span::{Position, Span};
pub use token::{Handle, QuoteKind, Side, Token, TokenKind};
