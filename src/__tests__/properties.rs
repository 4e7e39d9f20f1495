//! Property-based tests (§8.1) over generated bounded-depth token streams,
//! checking the invariants §8 calls out rather than fixed literal
//! scenarios (see `scenarios.rs` for those).

use crate::{Handle, Node, Parser, Position, Side, Span, Token, TokenKind};
use proptest::prelude::*;

fn tok(kind: TokenKind) -> Token {
    Token::new(kind, Span::new(Position::new(1, 1), Position::new(1, 1)))
}

/// A single declaration: `name: v1[, v2][interpolation];`
fn arb_declaration(handle_seed: u32) -> impl Strategy<Value = Vec<Token>> {
    (
        "[a-z][a-z-]{0,8}",
        prop::collection::vec("[a-z0-9%]{1,6}", 1..4),
        proptest::bool::ANY,
    )
        .prop_map(move |(name, values, with_interpolation)| {
            let mut tokens = vec![tok(TokenKind::Word(name)), tok(TokenKind::Colon)];
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    tokens.push(tok(TokenKind::Comma));
                }
                tokens.push(tok(TokenKind::Word(v.clone())));
            }
            if with_interpolation {
                tokens.push(tok(TokenKind::Interpolation(Handle(handle_seed))));
            }
            tokens.push(tok(TokenKind::Semicolon));
            tokens
        })
}

/// A selector group: one or two class-like atoms joined by a combinator,
/// or a single parent-selector pseudo-class.
fn arb_selector_group() -> impl Strategy<Value = Vec<Token>> {
    prop_oneof![
        "[.][a-z]{1,6}".prop_map(|name| vec![tok(TokenKind::Word(name))]),
        ("[.][a-z]{1,6}", "[.][a-z]{1,6}").prop_map(|(a, b)| vec![
            tok(TokenKind::Word(a)),
            tok(TokenKind::WordCombinator),
            tok(TokenKind::Word(b)),
        ]),
        "[a-z]{3,8}".prop_map(|name| vec![
            tok(TokenKind::Ampersand),
            tok(TokenKind::Colon),
            tok(TokenKind::Word(name)),
        ]),
    ]
}

/// A flat rule: selector group, brace-open, 0-3 declarations, brace-close.
fn arb_rule(handle_seed: u32) -> impl Strategy<Value = Vec<Token>> {
    (
        arb_selector_group(),
        prop::collection::vec(arb_declaration(handle_seed), 0..3),
    )
        .prop_map(|(selector, decls)| {
            let mut tokens = selector;
            tokens.push(tok(TokenKind::Brace(Side::Open)));
            for decl in decls {
                tokens.extend(decl);
            }
            tokens.push(tok(TokenKind::Brace(Side::Close)));
            tokens
        })
}

/// A whole stylesheet: 1-4 independent flat rules back to back.
fn arb_stylesheet() -> impl Strategy<Value = Vec<Token>> {
    prop::collection::vec(1u32..1000, 1..4).prop_flat_map(|seeds| {
        let rules: Vec<_> = seeds.into_iter().map(arb_rule).collect();
        rules
            .into_iter()
            .fold(Just(Vec::<Token>::new()).boxed(), |acc, rule| {
                (acc, rule)
                    .prop_map(|(mut all, mut r)| {
                        all.append(&mut r);
                        all
                    })
                    .boxed()
            })
    })
}

fn parse_all(tokens: Vec<Token>) -> Result<Vec<Node>, crate::ParseError> {
    let mut iter = tokens.into_iter();
    Parser::new(move || iter.next()).collect()
}

/// Walks `nodes`, checking every `*Start`/`*End` pair nests correctly and
/// that rule depth returns to zero, every compound wrapper holds >=2
/// atoms, and every pseudo name is non-empty.
fn check_structural_invariants(nodes: &[Node]) {
    let mut rule_depth: i64 = 0;
    let mut compound_stack: Vec<(&'static str, usize)> = Vec::new();

    for node in nodes {
        match node {
            Node::RuleStart(_) => rule_depth += 1,
            Node::RuleEnd => rule_depth -= 1,
            Node::CompoundSelectorStart => compound_stack.push(("selector", 0)),
            Node::CompoundSelectorEnd => {
                let (label, count) = compound_stack
                    .pop()
                    .expect("CompoundSelectorEnd without matching Start");
                assert_eq!(label, "selector");
                assert!(count >= 2, "compound selector with fewer than 2 atoms");
            }
            Node::CompoundValueStart => compound_stack.push(("value", 0)),
            Node::CompoundValueEnd => {
                let (label, count) = compound_stack
                    .pop()
                    .expect("CompoundValueEnd without matching Start");
                assert_eq!(label, "value");
                assert!(count >= 2, "compound value with fewer than 2 atoms");
            }
            Node::FunctionStart(name) => {
                assert!(
                    !name.is_empty() && name != ":",
                    "function/pseudo name must be non-empty"
                );
            }
            Node::Selector(name) => {
                if name.starts_with(':') {
                    assert!(name.len() > 1, "pseudo-class selector must have a name");
                }
                if let Some((_, count)) = compound_stack.last_mut() {
                    *count += 1;
                }
            }
            atom if is_selector_or_value_atom(atom) => {
                if let Some((_, count)) = compound_stack.last_mut() {
                    *count += 1;
                }
            }
            _ => {}
        }
        assert!(rule_depth >= 0, "rule depth went negative");
    }

    assert_eq!(rule_depth, 0, "rule depth did not return to zero");
    assert!(compound_stack.is_empty(), "unclosed compound wrapper");
}

fn is_selector_or_value_atom(node: &Node) -> bool {
    matches!(
        node,
        Node::Selector(_)
            | Node::SelectorRef(_)
            | Node::UniversalSelector
            | Node::ParentSelector
            | Node::Value(_)
            | Node::ValueRef(_)
    ) || matches!(node, Node::FunctionEnd)
}

fn interpolation_handles(nodes: &[Node]) -> Vec<Handle> {
    nodes
        .iter()
        .filter_map(|n| match n {
            Node::SelectorRef(h) | Node::PropertyRef(h) | Node::ValueRef(h) | Node::PartialRef(h) => {
                Some(*h)
            }
            _ => None,
        })
        .collect()
}

fn interpolation_handles_in_tokens(tokens: &[Token]) -> Vec<Handle> {
    tokens
        .iter()
        .filter_map(|t| match t.kind {
            TokenKind::Interpolation(h) => Some(h),
            _ => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn generated_stylesheets_satisfy_structural_invariants(tokens in arb_stylesheet()) {
        // Every shape `arb_stylesheet` produces (flat rules, bare/WordCombinator
        // selector pairs, parent-pseudo selectors, comma/interpolated
        // declarations) is well-formed by construction, so a rejection here
        // is always a real regression, not an acceptable generator gap.
        let input_handles = interpolation_handles_in_tokens(&tokens);
        let nodes = parse_all(tokens).expect("generator only produces well-formed streams");
        check_structural_invariants(&nodes);
        prop_assert_eq!(interpolation_handles(&nodes), input_handles);
    }

    #[test]
    fn truncating_a_valid_stream_never_panics(
        tokens in arb_stylesheet(),
        cut in 0usize..40,
    ) {
        let truncated: Vec<Token> = tokens.into_iter().take(cut).collect();
        // Either a clean parse of a (possibly empty) prefix or a structured
        // error — never a panic.
        let _ = parse_all(truncated);
    }
}

#[test]
fn unbalanced_brace_always_errors() {
    let tokens = vec![
        tok(TokenKind::Word(".a".into())),
        tok(TokenKind::Brace(Side::Open)),
        tok(TokenKind::Word("color".into())),
        tok(TokenKind::Colon),
        tok(TokenKind::Word("red".into())),
        tok(TokenKind::Semicolon),
        // missing closing brace
    ];
    assert!(parse_all(tokens).is_err());
}

#[test]
fn extra_closing_brace_at_depth_zero_is_treated_as_rule_end_and_then_fails() {
    // A bare `}` at depth 0 is not itself special-cased by MainLoop (only
    // `Brace(Close)` at depth > 0 is); it falls through to the "start a new
    // rule" branch, is buffered, and SelectorLoop then rejects it.
    let tokens = vec![tok(TokenKind::Brace(Side::Close))];
    assert!(parse_all(tokens).is_err());
}
