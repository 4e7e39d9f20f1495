//! A small hand-rolled leveled debug logger, in the same spirit as the
//! teacher crate's `util::Log` — this parser is a single-pass, synchronous
//! driver (§5) with no use for a full logging framework, so tracing is kept
//! to `println!` calls gated behind both `cfg(debug_assertions)` and a
//! runtime level set once via [`crate::parser::ParserConfig`].

use std::fmt::{Debug, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Log {
    /// No tracing.
    None,
    /// Mode transitions only.
    Default,
    /// Mode transitions plus every emitted node.
    Trace,
}

impl Log {
    fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default => 1,
            Log::Trace => 2,
        }
    }

    pub(crate) fn log_transition(&self, from: impl Debug, to: impl Debug) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Default.order() {
            println!("[istf-parser] {:?} -> {:?}", from, to);
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = (from, to);
        }
    }

    pub(crate) fn log_node(&self, node: impl Debug) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Trace.order() {
            println!("[istf-parser] emit {:?}", node);
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = node;
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Log::None
    }
}

impl Display for Log {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}
