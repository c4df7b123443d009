use rstest::rstest;

use super::*;
use crate::environment::WindowSlot;
use crate::node::{CHILDREN_FIELD, KIND_FIELD, NAME_FIELD, POSITION_FIELD};
use crate::pattern::{PatternCompiler, WindowMode};

fn ident(name: &str) -> Node {
    Object::new()
        .with(KIND_FIELD, "identifier")
        .with(NAME_FIELD, name)
        .into()
}

fn positioned(name: &str, line: i64) -> Node {
    Object::new()
        .with(KIND_FIELD, "identifier")
        .with(POSITION_FIELD, Object::new().with("Line", line))
        .with(NAME_FIELD, name)
        .into()
}

fn call(callee: Node, args: Vec<Node>) -> Node {
    let mut children = vec![callee];
    children.extend(args);
    Object::new()
        .with(KIND_FIELD, "call_expression")
        .with(CHILDREN_FIELD, Node::Array(children))
        .into()
}

fn compile(node: &Node) -> Pattern {
    PatternCompiler::default().compile(node)
}

fn window(elements: Vec<Node>, mode: WindowMode) -> Pattern {
    compile(&Node::Array(elements))
        .into_window(mode)
        .expect("non-empty sequence")
}

#[rstest]
#[case::identifier(ident("value"))]
#[case::call(call(ident("Xf"), vec![ident("a"), ident("Xb")]))]
#[case::array(Node::Array(vec![ident("Xa"), Node::Null, Node::from(3_i64)]))]
fn identity_round_trip(#[case] node: Node) {
    let pattern = compile(&node);
    let mut env = Environment::new();
    assert!(pattern.check(&node, &mut env));
    assert_eq!(pattern.construct(&env).expect("construct"), node);
}

#[test]
fn capture_binds_whole_subtree() {
    let pattern = compile(&call(ident("Xf"), vec![ident("Xarg")]));
    let target = call(ident("run"), vec![call(ident("inner"), Vec::new())]);

    let mut env = Environment::new();
    assert!(pattern.check(&target, &mut env));
    assert_eq!(env.get("Xf"), Some(&ident("run")));
    assert_eq!(env.get("Xarg"), Some(&call(ident("inner"), Vec::new())));
}

#[test]
fn repeated_capture_cannot_match_twice() {
    let pattern = compile(&call(ident("X1"), vec![ident("X1")]));
    let target = call(ident("a"), vec![ident("a")]);

    let mut env = Environment::new();
    assert!(!pattern.check(&target, &mut env));
}

#[test]
fn sequence_requires_exact_length() {
    let pattern = compile(&Node::Array(vec![ident("Xa")]));
    let mut env = Environment::new();
    assert!(!pattern.check(&Node::Array(vec![ident("a"), ident("b")]), &mut env));
}

#[test]
fn undeclared_fields_are_ignored() {
    let pattern = compile(&Object::new().with(KIND_FIELD, "identifier").into());
    let mut env = Environment::new();
    assert!(pattern.check(&ident("anything"), &mut env));
}

#[test]
fn position_is_ignored_and_dropped() {
    let pattern = compile(&positioned("a", 1));
    let mut env = Environment::new();
    assert!(pattern.check(&positioned("a", 42), &mut env));

    let rebuilt = pattern.construct(&env).expect("construct");
    assert_eq!(rebuilt, ident("a"));
}

#[test]
fn missing_position_does_not_block_match() {
    let pattern = compile(&positioned("a", 1));
    let mut env = Environment::new();
    assert!(pattern.check(&ident("a"), &mut env));
}

#[test]
fn construct_reports_unbound_capture() {
    let pattern = compile(&ident("Xmissing"));
    let err = pattern.construct(&Environment::new()).expect_err("unbound");
    assert!(matches!(err, SyntaxError::UnboundVariable { .. }));
}

#[test]
fn construct_refuses_wildcard() {
    let err = Pattern::Wildcard
        .construct(&Environment::new())
        .expect_err("wildcard");
    assert!(matches!(err, SyntaxError::ConstructFromWildcard));
}

#[test]
fn single_window_picks_leftmost_offset() {
    let pattern = window(vec![ident("Xv")], WindowMode::Single);
    let target = Node::Array(vec![ident("a"), ident("b"), ident("c")]);

    let mut env = Environment::new();
    assert!(pattern.check(&target, &mut env));
    assert_eq!(env.get("Xv"), Some(&ident("a")));
    assert_eq!(
        env.slot(),
        Some(&WindowSlot::Single {
            left: Vec::new(),
            right: vec![ident("b"), ident("c")],
        })
    );
    assert_eq!(pattern.construct(&env).expect("construct"), target);
}

fn alternating() -> Node {
    Node::Array(vec![
        ident("a"),
        ident("b"),
        ident("a"),
        ident("b"),
        ident("a"),
    ])
}

#[test]
fn single_window_stops_at_first_occurrence() {
    let pattern = window(vec![ident("a")], WindowMode::Single);

    let mut env = Environment::new();
    assert!(pattern.check(&alternating(), &mut env));
    assert_eq!(
        env.slot(),
        Some(&WindowSlot::Single {
            left: Vec::new(),
            right: vec![ident("b"), ident("a"), ident("b"), ident("a")],
        })
    );
}

#[test]
fn single_window_skips_failed_offsets() {
    let pattern = window(vec![ident("b"), ident("Xnext")], WindowMode::Single);
    let target = Node::Array(vec![ident("a"), ident("b"), ident("c"), ident("d")]);

    let mut env = Environment::new();
    assert!(pattern.check(&target, &mut env));
    assert_eq!(env.get("Xnext"), Some(&ident("c")));
    assert_eq!(
        env.slot(),
        Some(&WindowSlot::Single {
            left: vec![ident("a")],
            right: vec![ident("d")],
        })
    );
}

#[test]
fn failed_trials_leave_no_bindings() {
    let pattern = window(vec![ident("Xv"), ident("z")], WindowMode::Single);
    let target = Node::Array(vec![ident("a"), ident("b")]);

    let mut env = Environment::new();
    assert!(!pattern.check(&target, &mut env));
    assert!(env.is_empty());
}

#[test]
fn multi_window_records_every_match() {
    let pattern = window(vec![ident("a")], WindowMode::Multi);
    let target = alternating();

    let mut env = Environment::new();
    assert!(pattern.check(&target, &mut env));
    let Some(WindowSlot::Multi { sides, matched }) = env.slot() else {
        panic!("expected multi slot");
    };
    assert_eq!(matched.len(), 3);
    assert_eq!(
        sides,
        &vec![
            Vec::new(),
            vec![ident("b")],
            vec![ident("b")],
            Vec::new()
        ]
    );
    assert_eq!(pattern.construct(&env).expect("construct"), target);
}

#[test]
fn multi_window_matches_do_not_overlap() {
    let pattern = window(vec![ident("Xl"), ident("Xr")], WindowMode::Multi);
    let target = Node::Array(vec![ident("a"), ident("b"), ident("c")]);

    let mut env = Environment::new();
    assert!(pattern.check(&target, &mut env));
    let slot = env.slot().expect("slot");
    assert_eq!(slot.match_count(), 1);
    let WindowSlot::Multi { sides, .. } = slot else {
        panic!("expected multi slot");
    };
    assert_eq!(sides, &vec![Vec::new(), vec![ident("c")]]);
}

#[test]
fn multi_window_rewrites_each_match_with_its_own_bindings() {
    let before = window(vec![ident("Xl"), ident("Xr")], WindowMode::Multi);
    let after = window(vec![ident("Xr"), ident("Xl")], WindowMode::Multi);
    let target = Node::Array(vec![
        ident("a"),
        ident("b"),
        ident("c"),
        ident("d"),
        ident("e"),
    ]);

    let mut env = Environment::new();
    assert!(before.check(&target, &mut env));
    let rebuilt = after.construct(&env).expect("construct");
    assert_eq!(
        rebuilt,
        Node::Array(vec![
            ident("b"),
            ident("a"),
            ident("d"),
            ident("c"),
            ident("e"),
        ])
    );
}

#[rstest]
#[case::no_occurrence(Node::Array(vec![ident("b"), ident("b"), ident("b")]))]
#[case::shorter_than_window(Node::Array(Vec::new()))]
#[case::not_an_array(ident("a"))]
fn multi_window_without_matches_fails(#[case] target: Node) {
    let pattern = window(vec![ident("a")], WindowMode::Multi);
    let mut env = Environment::new();
    assert!(!pattern.check(&target, &mut env));
    assert!(env.slot().is_none());
}

#[rstest]
#[case::single(WindowMode::Single)]
#[case::multi(WindowMode::Multi)]
fn window_construct_without_slot_fails(#[case] mode: WindowMode) {
    let pattern = window(vec![ident("a")], mode);
    let err = pattern.construct(&Environment::new()).expect_err("no slot");
    assert!(matches!(err, SyntaxError::UnboundWindow { .. }));
}

#[test]
fn find_all_visits_in_pre_order() {
    let tree = call(ident("Xouter"), vec![call(ident("inner"), Vec::new())]);
    let pattern = compile(&call(ident("Xf"), Vec::new()));

    let matches = pattern.find_all(&tree);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches.first().and_then(|m| m.capture("Xf")), Some(&ident("inner")));
}

#[test]
fn find_first_returns_outermost_match() {
    let inner = call(ident("g"), vec![ident("x")]);
    let tree = call(ident("f"), vec![inner.clone()]);
    let pattern = compile(&call(ident("Xf"), vec![ident("Xarg")]));

    let first = pattern.find_first(&tree).expect("match");
    assert_eq!(first.node(), &tree);
    assert_eq!(first.capture("Xarg"), Some(&inner));
    assert_eq!(pattern.find_all(&tree).len(), 2);
}

#[test]
fn find_first_on_missing_pattern_is_none() {
    let pattern = compile(&ident("absent"));
    assert!(pattern.find_first(&call(ident("f"), Vec::new())).is_none());
}
