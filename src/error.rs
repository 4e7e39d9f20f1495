use crate::span::Span;
use std::fmt::{Display, Formatter};

/// A structured parse failure: a message plus the span of the last token the
/// driver observed before failing (§6 "Errors", §7).
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    pub(crate) fn unexpected(context: &str, found: impl Display, span: Span) -> Self {
        Self::new(format!("unexpected token in {context}: found {found}"), span)
    }

    pub(crate) fn premature_end(context: &str, span: Span) -> Self {
        Self::new(format!("unexpected end, {context}"), span)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SyntaxError: {} @ {}", self.message, self.span)
    }
}

impl std::error::Error for ParseError {}
