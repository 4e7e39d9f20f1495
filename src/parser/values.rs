//! Recursive-descent value and string parsing (§4.4 "Value parsing" /
//! "String parsing"), reached from [`super::Parser::property_loop`] and
//! recursively from function argument lists.

use super::Parser;
use crate::error::ParseError;
use crate::node::Node;
use crate::node_buffer::NodeBuffer;
use crate::token::{QuoteKind, Side, Token, TokenKind};

/// Accumulates a run of sibling values, tracking the count of *atomic*
/// items separately from the raw node count.
///
/// A single value atom — a bare word, a string, or a whole function call
/// like `calc(...)` — can expand to more than one [`Node`] once its own
/// interior (string fragments, function arguments) is spliced in. Counting
/// `NodeBuffer::size` directly would treat a lone `calc(min(100%, 50px))`
/// as "4 items" (its `FunctionStart`/2 values/`FunctionEnd`) and wrap it in
/// a spurious `CompoundValueStart`/`CompoundValueEnd`, even though it is a
/// single value with no top-level comma. `items` exists to track the true
/// atom count so the §3 compound-wrapping invariant holds regardless of how
/// many nodes an atom's own interior contributes.
struct ValueItems {
    buf: NodeBuffer,
    count: usize,
}

impl ValueItems {
    fn new() -> Self {
        Self {
            buf: NodeBuffer::create(),
            count: 0,
        }
    }

    /// Append a single-node atom (`Value`, `ValueRef`).
    fn push_atom(&mut self, node: Node) {
        self.buf.add(node);
        self.count += 1;
    }

    /// Append a (possibly multi-node) group that nonetheless counts as one
    /// atom: a parsed string, or a `FunctionStart`/.../`FunctionEnd` call.
    fn push_group(&mut self, mut group: NodeBuffer) {
        self.buf.concat(&mut group);
        self.count += 1;
    }

    /// Wrap in `CompoundValueStart`/`CompoundValueEnd` when two or more
    /// atoms were pushed; leave a single atom (or none) bare (§3).
    fn into_wrapped(self) -> NodeBuffer {
        let Self { mut buf, count } = self;
        if count < 2 {
            return buf;
        }
        let mut wrapped = NodeBuffer::create();
        wrapped.add(Node::CompoundValueStart);
        wrapped.concat(&mut buf);
        wrapped.add(Node::CompoundValueEnd);
        wrapped
    }
}

impl<F: FnMut() -> Option<Token>> Parser<F> {
    /// `parseValues` (§4.4). `level` tracks parenthesis nesting so a
    /// top-level `Semicolon`/`Brace(Close)`/done terminates the value list
    /// while the same tokens inside a `url(...)`/function call do not.
    pub(super) fn parse_values(&mut self, level: usize) -> Result<NodeBuffer, ParseError> {
        let mut items = ValueItems::new();

        loop {
            let token = self.pull();
            match token {
                None if level == 0 => return Ok(items.into_wrapped()),
                None => {
                    return Err(ParseError::premature_end(
                        "unclosed function call in value",
                        self.last_span,
                    ))
                }
                Some(token) => match token.kind {
                    TokenKind::Word(w) => {
                        if matches!(
                            self.peek().map(|t| t.kind),
                            Some(TokenKind::Paren(Side::Open))
                        ) {
                            self.pull();
                            let mut inner = self.parse_values(level + 1)?;
                            let mut call = NodeBuffer::create();
                            call.add(Node::FunctionStart(w));
                            call.concat(&mut inner);
                            call.add(Node::FunctionEnd);
                            items.push_group(call);
                        } else {
                            items.push_atom(Node::Value(w));
                        }
                    }
                    TokenKind::Quote(kind) => {
                        let string = self.parse_string(kind)?;
                        items.push_group(string);
                    }
                    TokenKind::Str(s) if level > 0 => {
                        items.push_atom(Node::Value(s));
                    }
                    TokenKind::Interpolation(h) => {
                        items.push_atom(Node::ValueRef(h));
                    }
                    TokenKind::Comma => {
                        let head = items.into_wrapped();
                        let mut tail = self.parse_values(level)?;
                        let mut joined = head;
                        joined.concat(&mut tail);
                        return Ok(joined);
                    }
                    TokenKind::Paren(Side::Close) if level > 0 => {
                        return Ok(items.into_wrapped());
                    }
                    TokenKind::Brace(Side::Close) | TokenKind::Semicolon if level == 0 => {
                        self.push_back(token);
                        return Ok(items.into_wrapped());
                    }
                    other => {
                        return Err(ParseError::unexpected("values", other, token.span))
                    }
                },
            }
        }
    }

    /// `parseString` (§4.4). Consumes tokens up to the matching closing
    /// quote, collapsing a single interpolation-free fragment into a bare
    /// quoted `Value` and wrapping everything else in
    /// `StringStart`/`StringEnd`.
    pub(super) fn parse_string(&mut self, quote: QuoteKind) -> Result<NodeBuffer, ParseError> {
        let mut items = NodeBuffer::create();
        let mut raw = String::new();
        let mut saw_interpolation = false;

        loop {
            let token = self.pull().ok_or_else(|| {
                ParseError::premature_end("unterminated string", self.last_span)
            })?;

            match token.kind {
                TokenKind::Str(s) => raw.push_str(&s),
                TokenKind::Interpolation(h) => {
                    saw_interpolation = true;
                    if !raw.is_empty() {
                        items.add(Node::Value(std::mem::take(&mut raw)));
                    }
                    items.add(Node::ValueRef(h));
                }
                TokenKind::Quote(k) if k == quote => {
                    if items.size() > 1 || saw_interpolation {
                        if !raw.is_empty() {
                            items.add(Node::Value(std::mem::take(&mut raw)));
                        }
                        let mut wrapped = NodeBuffer::create();
                        wrapped.add(Node::StringStart(quote.as_char().to_string()));
                        wrapped.concat(&mut items);
                        wrapped.add(Node::StringEnd);
                        return Ok(wrapped);
                    }
                    let q = quote.as_char();
                    let mut bare = NodeBuffer::create();
                    bare.add(Node::Value(format!("{q}{raw}{q}")));
                    return Ok(bare);
                }
                other => return Err(ParseError::unexpected("string", other, token.span)),
            }
        }
    }
}
