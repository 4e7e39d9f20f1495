//! The Intermediate Style Token Format (ISTF) emitted by the parser.

use crate::token::Handle;
use std::fmt::{Debug, Display, Formatter};

/// The kind of CSS rule a `RuleStart` frames.
///
/// Carries a stable small-integer discriminant (`as u8`) so downstream wire
/// encoders can serialize a `RuleStart` as a single byte rather than naming
/// the variant, per §3.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[repr(u8)]
pub enum RuleKind {
    Style = 0,
    Charset = 1,
    Import = 2,
    Media = 3,
    FontFace = 4,
    Page = 5,
    Keyframes = 6,
    Keyframe = 7,
    Margin = 8,
    Namespace = 9,
    CounterStyle = 10,
    Supports = 11,
    Document = 12,
    FontFeatureValues = 13,
    Viewport = 14,
    RegionStyle = 15,
}

impl Display for RuleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

/// A single emitted ISTF event.
///
/// `EOF` is internal bookkeeping only (it marks the end of the driver's own
/// dispatch, §3) and is never surfaced through the public iterator — see
/// [`crate::parser::Parser`]'s `Iterator` impl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    // Rule framing
    RuleStart(RuleKind),
    RuleEnd,
    RuleName(String),

    // Selectors
    Selector(String),
    ParentSelector,
    UniversalSelector,
    CompoundSelectorStart,
    CompoundSelectorEnd,
    SelectorRef(Handle),
    SpaceCombinator,
    ChildCombinator,
    DoubledChildCombinator,
    NextSiblingCombinator,
    SubsequentSiblingCombinator,

    // Declarations
    Property(String),
    PropertyRef(Handle),
    Value(String),
    ValueRef(Handle),
    CompoundValueStart,
    CompoundValueEnd,

    // Functions / strings
    FunctionStart(String),
    FunctionEnd,
    StringStart(String),
    StringEnd,

    // Auxiliary
    Condition(String),
    AnimationName(String),
    PartialRef(Handle),

    /// Internal sentinel; never surfaced to callers (§3, §6).
    EOF,
}

impl Node {
    /// Whether this node is a combinator (used by selector parsing to avoid
    /// emitting a combinator directly after another one, and by the
    /// property-test harness to validate §8's adjacency invariants).
    pub fn is_combinator(&self) -> bool {
        matches!(
            self,
            Node::SpaceCombinator
                | Node::ChildCombinator
                | Node::DoubledChildCombinator
                | Node::NextSiblingCombinator
                | Node::SubsequentSiblingCombinator
        )
    }
}
