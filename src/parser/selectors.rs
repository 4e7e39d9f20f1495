//! Recursive-descent selector parsing with combinator insertion (§4.4
//! "SelectorLoop and selector parsing").

use super::Parser;
use crate::error::ParseError;
use crate::node::Node;
use crate::node_buffer::NodeBuffer;
use crate::span::Span;
use crate::token::{Side, Token, TokenKind};

/// Accumulates a selector group, tracking the count of *atomic* selectors
/// separately from the raw node count — combinators are separators, not
/// atoms, and a pseudo-function atom like `:not(.first)` contributes
/// several nodes (`FunctionStart`/.../`FunctionEnd`) for what is still a
/// single selector. See the analogous `ValueItems` in `values.rs` for why
/// counting `NodeBuffer::size` directly would under/over-wrap here.
struct SelectorItems {
    buf: NodeBuffer,
    count: usize,
}

impl SelectorItems {
    fn new() -> Self {
        Self {
            buf: NodeBuffer::create(),
            count: 0,
        }
    }

    /// Append a single-node atomic selector (`Selector`, `SelectorRef`,
    /// `UniversalSelector`, `ParentSelector`).
    fn push_atom(&mut self, node: Node) {
        self.buf.add(node);
        self.count += 1;
    }

    /// Append a (possibly multi-node) group that still counts as one
    /// selector atom: an interpolated pseudo-class, or a
    /// `FunctionStart`/.../`FunctionEnd` pseudo function.
    fn push_group(&mut self, mut group: NodeBuffer) {
        self.buf.concat(&mut group);
        self.count += 1;
    }

    /// Append a combinator. Combinators separate atoms; they are never
    /// themselves counted as atoms.
    fn push_combinator(&mut self, node: Node) {
        self.buf.add(node);
    }

    /// Wrap in `CompoundSelectorStart`/`CompoundSelectorEnd` when two or
    /// more atoms were pushed; leave a single atom (or none) bare (§3).
    fn into_wrapped(self) -> NodeBuffer {
        let Self { mut buf, count } = self;
        if count < 2 {
            return buf;
        }
        let mut wrapped = NodeBuffer::create();
        wrapped.add(Node::CompoundSelectorStart);
        wrapped.concat(&mut buf);
        wrapped.add(Node::CompoundSelectorEnd);
        wrapped
    }
}

impl<F: FnMut() -> Option<Token>> Parser<F> {
    /// `parseSelectors` (§4.4). `level` tracks parenthesis nesting the same
    /// way [`Parser::parse_values`] does, for `:not(...)`-style pseudo
    /// functions.
    pub(super) fn parse_selectors(&mut self, level: usize) -> Result<NodeBuffer, ParseError> {
        let mut items = SelectorItems::new();

        loop {
            let token = self.pull().ok_or_else(|| {
                ParseError::premature_end("unclosed selector", self.last_span)
            })?;

            match token.kind {
                TokenKind::Colon => {
                    self.parse_pseudo(&mut items, token.span)?;
                }
                TokenKind::Asterisk => {
                    items.push_atom(Node::UniversalSelector);
                    self.append_combinator(&mut items, token.span)?;
                }
                TokenKind::Ampersand => {
                    items.push_atom(Node::ParentSelector);
                    self.append_combinator(&mut items, token.span)?;
                }
                TokenKind::Word(w) => {
                    items.push_atom(Node::Selector(w));
                    self.append_combinator(&mut items, token.span)?;
                }
                TokenKind::Interpolation(h) => {
                    items.push_atom(Node::SelectorRef(h));
                    self.append_combinator(&mut items, token.span)?;
                }
                TokenKind::Comma => {
                    let head = items.into_wrapped();
                    let mut tail = self.parse_selectors(level)?;
                    let mut joined = head;
                    joined.concat(&mut tail);
                    return Ok(joined);
                }
                TokenKind::Paren(Side::Close) if level > 0 => {
                    return Ok(items.into_wrapped());
                }
                TokenKind::Brace(Side::Open) if level == 0 => {
                    return Ok(items.into_wrapped());
                }
                other => return Err(ParseError::unexpected("selectors", other, token.span)),
            }
        }
    }

    /// Handles a leading `Colon` atom: a pseudo-class (`:hover`), a pseudo
    /// function (`:not(...)`), or an interpolated pseudo-class name.
    fn parse_pseudo(
        &mut self,
        items: &mut SelectorItems,
        colon_span: Span,
    ) -> Result<(), ParseError> {
        let next = self
            .pull()
            .ok_or_else(|| ParseError::premature_end("expected pseudo-class", colon_span))?;

        match next.kind {
            TokenKind::Word(w) => {
                if w.is_empty() {
                    return Err(ParseError::unexpected(
                        "pseudo-class",
                        "empty name",
                        next.span,
                    ));
                }
                if matches!(
                    self.peek().map(|t| t.kind),
                    Some(TokenKind::Paren(Side::Open))
                ) {
                    self.pull();
                    let mut inner = self.parse_selectors(1)?;
                    let mut call = NodeBuffer::create();
                    call.add(Node::FunctionStart(format!(":{w}")));
                    call.concat(&mut inner);
                    call.add(Node::FunctionEnd);
                    items.push_group(call);
                } else {
                    items.push_atom(Node::Selector(format!(":{w}")));
                }
                self.append_combinator(items, next.span)
            }
            TokenKind::Interpolation(h) => {
                let mut pseudo = NodeBuffer::create();
                pseudo.add(Node::Selector(":".to_string()));
                pseudo.add(Node::SelectorRef(h));
                items.push_group(pseudo);
                self.append_combinator(items, next.span)
            }
            other => Err(ParseError::unexpected("pseudo-class", other, next.span)),
        }
    }

    /// Combinator insertion table (§4.4). `prev_span` is the span of the
    /// atomic selector token just appended; used only for the implicit
    /// space-combinator adjacency test.
    fn append_combinator(
        &mut self,
        items: &mut SelectorItems,
        prev_span: Span,
    ) -> Result<(), ParseError> {
        // `WordCombinator` is an advisory lexer hint, never itself acted on
        // (§9) — but it still occupies a slot in the token stream and must
        // be consumed here, or the next `parse_selectors` iteration would
        // pull it as the "current" token and reject it as unexpected.
        while matches!(self.peek().map(|t| t.kind), Some(TokenKind::WordCombinator)) {
            self.pull();
        }

        let peeked = self.peek();
        let combinator = match peeked.as_ref().map(|t| &t.kind) {
            Some(TokenKind::Arrow) => {
                self.pull();
                if matches!(self.peek().map(|t| t.kind), Some(TokenKind::Arrow)) {
                    self.pull();
                    Some(Node::DoubledChildCombinator)
                } else {
                    Some(Node::ChildCombinator)
                }
            }
            Some(TokenKind::Plus) => {
                self.pull();
                Some(Node::NextSiblingCombinator)
            }
            Some(TokenKind::Tilde) => {
                self.pull();
                Some(Node::SubsequentSiblingCombinator)
            }
            Some(
                TokenKind::Comma
                | TokenKind::Paren(_)
                | TokenKind::Brace(_),
            )
            | None => None,
            Some(_) => {
                let next_span = peeked.as_ref().unwrap().span;
                if prev_span.touches(&next_span) {
                    None
                } else {
                    Some(Node::SpaceCombinator)
                }
            }
        };

        if let Some(node) = combinator {
            items.push_combinator(node);
            let after = self.peek();
            match after.map(|t| t.kind) {
                // `Colon` is a valid selector lead-in (`& > :hover`), not an
                // empty tail — only an outright empty/terminated tail after
                // a combinator is an error.
                Some(TokenKind::Comma | TokenKind::Paren(Side::Close) | TokenKind::Brace(Side::Open))
                | None => {
                    return Err(ParseError::premature_end(
                        "expected selector after combinator",
                        self.last_span,
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
