//! The mode-dispatched pull driver (§4.4).
//!
//! [`Parser`] is the crate's single public entry point: it wraps an upstream
//! token producer in a [`BufferStream`] and exposes the emitted [`Node`]
//! stream as a plain [`Iterator`]. Everything else in this module tree
//! (`values`, `selectors`) is reached only through `impl` blocks on
//! [`Parser`] — there is no separate "AST" type to hand back to the caller,
//! per the crate's flat-stream design.

mod selectors;
mod values;

use crate::buffer_stream::BufferStream;
use crate::error::ParseError;
use crate::lazy_stream::LazyStream;
use crate::log::Log;
use crate::node::{Node, RuleKind};
use crate::node_buffer::NodeBuffer;
use crate::span::Span;
use crate::token::{Side, Token, TokenKind};
use once_cell::unsync::OnceCell;

/// The four dispatch states of the driver (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    MainLoop,
    PropertyLoop,
    SelectorLoop,
    BufferLoop,
}

/// Configuration surface for a [`Parser`] (§2.1).
///
/// Mirrors the teacher crate's tokenizer/production debug toggles
/// (`OnceCell<Log<...>>`): the log level can be set at most once, before the
/// first pull, and is left untouched (defaulting to [`Log::None`]) if the
/// caller never configures it.
#[derive(Debug, Default)]
pub struct ParserConfig {
    log: OnceCell<Log>,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the debug trace level. Returns the previously-set level as an
    /// error if this config has already been configured once.
    pub fn set_log(&self, level: Log) -> Result<(), Log> {
        self.log.set(level).map_err(|rejected| rejected)
    }

    fn log(&self) -> Log {
        self.log.get().copied().unwrap_or_default()
    }
}

/// Maps a leading `@word` to the [`RuleKind`] it opens, per the §4.4
/// `AtWord` hook. Only the recognized at-rule names are resolved here; the
/// condition/prelude and body grammar for any of them remain out of scope
/// (§9 — this is deliberately just the hook, not the grammar).
fn at_word_kind(name: &str) -> Option<RuleKind> {
    match name {
        "charset" => Some(RuleKind::Charset),
        "import" => Some(RuleKind::Import),
        "media" => Some(RuleKind::Media),
        "font-face" => Some(RuleKind::FontFace),
        "page" => Some(RuleKind::Page),
        "keyframes" | "-webkit-keyframes" | "-moz-keyframes" => Some(RuleKind::Keyframes),
        "namespace" => Some(RuleKind::Namespace),
        "counter-style" => Some(RuleKind::CounterStyle),
        "supports" => Some(RuleKind::Supports),
        "document" => Some(RuleKind::Document),
        "font-feature-values" => Some(RuleKind::FontFeatureValues),
        "viewport" => Some(RuleKind::Viewport),
        _ => None,
    }
}

/// The streaming parser. Consumes a token producer and yields a flat ISTF
/// [`Node`] stream via its [`Iterator`] impl (§5, §6).
pub struct Parser<F: FnMut() -> Option<Token>> {
    stream: BufferStream<Token, F>,
    mode: Mode,
    depth: usize,
    last_span: Span,
    buffer: NodeBuffer,
    config: ParserConfig,
    poison: Option<ParseError>,
}

impl<F: FnMut() -> Option<Token>> Parser<F> {
    /// Build a parser pulling from `produce`, a nullary token producer.
    pub fn new(produce: F) -> Self {
        Self::with_config(produce, ParserConfig::new())
    }

    /// Build a parser with an explicit [`ParserConfig`].
    pub fn with_config(produce: F, config: ParserConfig) -> Self {
        Self {
            stream: BufferStream::new(LazyStream::new(produce)),
            mode: Mode::MainLoop,
            depth: 0,
            last_span: Span::zero(),
            buffer: NodeBuffer::create(),
            config,
            poison: None,
        }
    }

    fn pull(&mut self) -> Option<Token> {
        let token = self.stream.next();
        if let Some(t) = &token {
            self.last_span = t.span;
        }
        token
    }

    fn peek(&mut self) -> Option<Token> {
        self.stream.peek()
    }

    fn push_back(&mut self, token: Token) {
        self.stream.buffer(token);
    }

    fn transition(&mut self, to: Mode) {
        self.config.log().log_transition(self.mode, to);
        self.mode = to;
    }

    /// MainLoop dispatch (§4.4). Returns `Some` with a node to emit, or
    /// `None` to mean "state changed, re-enter the dispatcher without
    /// surfacing anything to the caller yet".
    fn main_loop(&mut self) -> Result<Option<Node>, ParseError> {
        let token = match self.pull() {
            Some(t) => t,
            None if self.depth == 0 => return Ok(Some(Node::EOF)),
            None => {
                return Err(ParseError::premature_end(
                    "rules unclosed",
                    self.last_span,
                ))
            }
        };

        match token.kind {
            TokenKind::Semicolon => Ok(None),

            TokenKind::Word(_) | TokenKind::Interpolation(_)
                if matches!(self.peek().map(|t| t.kind), Some(TokenKind::Colon)) =>
            {
                let colon = self.pull().expect("peeked colon must be present");
                match self.disambiguate(token, colon)? {
                    Route::Selector => {
                        self.depth += 1;
                        self.transition(Mode::SelectorLoop);
                        Ok(Some(Node::RuleStart(RuleKind::Style)))
                    }
                    Route::Declaration => {
                        self.transition(Mode::PropertyLoop);
                        Ok(None)
                    }
                }
            }

            TokenKind::AtWord(name) => {
                let kind = at_word_kind(&name).ok_or_else(|| {
                    ParseError::unexpected("at-rule", format!("@{name}"), token.span)
                })?;
                self.depth += 1;
                Ok(Some(Node::RuleStart(kind)))
            }

            TokenKind::Brace(Side::Close) if self.depth > 0 => {
                self.depth -= 1;
                Ok(Some(Node::RuleEnd))
            }

            other => {
                self.push_back(Token::new(other, token.span));
                self.depth += 1;
                self.transition(Mode::SelectorLoop);
                Ok(Some(Node::RuleStart(RuleKind::Style)))
            }
        }
    }

    /// Declaration-or-selector disambiguation (§4.4). `first` and `colon`
    /// have already been consumed from the stream; this buffers further
    /// tokens by peeking until a routing decision can be made, then pushes
    /// every consumed token back in order so the chosen mode re-reads them
    /// fresh.
    fn disambiguate(&mut self, first: Token, colon: Token) -> Result<Route, ParseError> {
        let mut pending = vec![first, colon];

        let route = loop {
            let peeked = self.peek();
            match peeked {
                None => {
                    return Err(ParseError::premature_end(
                        "expected selector or declaration",
                        self.last_span,
                    ))
                }
                Some(t) if is_selector_decisive(&t.kind) => {
                    pending.push(self.pull().expect("peeked token must be present"));
                    break Route::Selector;
                }
                Some(t)
                    if matches!(t.kind, TokenKind::Brace(Side::Close) | TokenKind::Semicolon) =>
                {
                    pending.push(self.pull().expect("peeked token must be present"));
                    break Route::Declaration;
                }
                Some(_) => {
                    pending.push(self.pull().expect("peeked token must be present"));
                }
            }
        };

        // `BufferStream::buffer` appends to the back of its FIFO, so
        // re-queuing in original order here reproduces the exact sequence
        // the chosen mode would have seen without any disambiguation buffer.
        for token in pending {
            self.push_back(token);
        }
        Ok(route)
    }

    /// `PropertyLoop` dispatch (§4.4). Always transitions to `BufferLoop`.
    fn property_loop(&mut self) -> Result<Node, ParseError> {
        let name_token = self
            .pull()
            .ok_or_else(|| ParseError::premature_end("expected property", self.last_span))?;

        let property = match name_token.kind {
            TokenKind::Word(w) => Node::Property(w),
            TokenKind::Interpolation(h) => Node::PropertyRef(h),
            other => {
                return Err(ParseError::unexpected(
                    "property",
                    other,
                    name_token.span,
                ))
            }
        };

        let colon = self
            .pull()
            .ok_or_else(|| ParseError::premature_end("expected `:`", self.last_span))?;
        if colon.kind != TokenKind::Colon {
            return Err(ParseError::unexpected("property", colon.kind, colon.span));
        }

        let values = self.parse_values(0)?;
        self.buffer = values;
        self.transition(Mode::BufferLoop);
        Ok(property)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Selector,
    Declaration,
}

fn is_selector_decisive(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Brace(Side::Open)
            | TokenKind::Ampersand
            | TokenKind::Plus
            | TokenKind::Arrow
            | TokenKind::Tilde
            | TokenKind::Asterisk
            | TokenKind::Colon
    )
}

impl<F: FnMut() -> Option<Token>> Iterator for Parser<F> {
    type Item = Result<Node, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = &self.poison {
            return Some(Err(err.clone()));
        }

        loop {
            let result = match self.mode {
                Mode::MainLoop => self.main_loop(),
                Mode::PropertyLoop => self.property_loop().map(Some),
                Mode::SelectorLoop => {
                    self.parse_selectors(0).map(|buf| {
                        self.buffer = buf;
                        self.transition(Mode::BufferLoop);
                        None
                    })
                }
                Mode::BufferLoop => Ok(match self.buffer.take() {
                    Some(node) => Some(node),
                    None => {
                        self.transition(Mode::MainLoop);
                        None
                    }
                }),
            };

            match result {
                Ok(Some(Node::EOF)) => return None,
                Ok(Some(node)) => {
                    self.config.log().log_node(&node);
                    return Some(Ok(node));
                }
                Ok(None) => continue,
                Err(err) => {
                    self.poison = Some(err.clone());
                    return Some(Err(err));
                }
            }
        }
    }
}
