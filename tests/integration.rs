use pegase_rs::combinator::RepetitionMax;
use pegase_rs::error::{EdgeKind, Expectation, Failure};
use pegase_rs::parser::Parser;
use pegase_rs::value::Value;

fn literal_failure_at(failures: &[Failure], at: usize, text: &str) -> bool {
    failures.iter().any(|f| match f {
        Failure::Expectation { range, expected } => {
            range.from == at && expected.contains(&Expectation::Literal(text.to_string()))
        }
        Failure::Semantic { .. } => false,
    })
}

#[test]
fn scenario_1_single_literal_with_default_skipper() {
    let grammar = Parser::literal("a", true);
    let result = grammar.parse("a a").unwrap();
    assert_eq!(result.from, 0);
    assert_eq!(result.to, 1);
    assert_eq!(result.raw, "a");
}

#[test]
fn scenario_2_sequence_skips_leading_and_internal_whitespace() {
    let grammar = Parser::literal("a", true).then(Parser::literal("b", true));
    let result = grammar.parse(" ab ").unwrap();
    assert_eq!(result.from, 1);
    assert_eq!(result.to, 3);
    assert_eq!(result.raw, "ab");
}

#[test]
fn scenario_3_ordered_choice_reports_failed_alternative() {
    let grammar = Parser::literal("a", true).or(Parser::literal("b", true));
    let result = grammar.parse("b").unwrap();
    assert_eq!(result.raw, "b");
    assert!(literal_failure_at(&result.failures, 0, "a"));
}

#[test]
fn scenario_4_greedy_repetition_capped_at_max() {
    let grammar = Parser::literal("a", true).repeated_between(2, RepetitionMax::Bounded(3));
    let result = grammar.parse("aaaa").unwrap();
    assert_eq!(result.from, 0);
    assert_eq!(result.to, 3);
    assert_eq!(result.value, Value::List(vec![
        Value::Str("a".to_string()),
        Value::Str("a".to_string()),
        Value::Str("a".to_string()),
    ]));
}

#[test]
fn scenario_4b_repetition_below_min_fails() {
    let grammar = Parser::literal("a", true).repeated_between(2, RepetitionMax::Bounded(3));
    assert!(grammar.parse("a").is_err());
}

#[test]
fn scenario_5_commit_promotes_failure_and_drops_precommit_expectation() {
    // 'if' $commit 'then'
    let grammar = Parser::literal("if", true)
        .action(|mut args| {
            args.commit();
            Ok(args.value)
        })
        .then(Parser::literal("then", true));

    let failed = grammar.parse("if x").unwrap_err();
    assert!(literal_failure_at(&failed.failures, 3, "then"));
    assert!(!literal_failure_at(&failed.failures, 0, "if"));
}

#[test]
fn scenario_6_named_recursion_terminates_on_empty_suffix() {
    // x: 'a' x?
    let x_rule = Parser::literal("a", true).then(Parser::reference("x").or_not());
    let grammar = Parser::grammar(vec![("x".to_string(), x_rule)]).unwrap();

    let result = grammar.parse("aaa").unwrap();
    assert_eq!(result.from, 0);
    assert_eq!(result.to, 3);
}

#[test]
fn start_and_end_edges() {
    let grammar = Parser::start().then(Parser::literal("a", true)).then(Parser::end());
    assert!(grammar.parse("a").is_ok());

    let failed = Parser::start()
        .then(Parser::literal("a", true))
        .parse_with("xa", |o| o.with_from(1))
        .unwrap_err();
    assert!(failed
        .failures
        .iter()
        .any(|f| matches!(f, Failure::Expectation { expected, .. } if expected.contains(&Expectation::Edge(EdgeKind::Start)))));
}

#[test]
fn case_insensitive_literal_preserves_raw_casing() {
    let grammar = Parser::literal("abc", true).ignore_case();
    let result = grammar.parse("AbC").unwrap();
    assert_eq!(result.raw, "AbC");
}

#[test]
fn token_presents_body_as_atomic_unit() {
    let keyword = Parser::literal("foo", true)
        .then(Parser::literal("bar", true))
        .token(Some("foobar"));
    let result = keyword.parse("foobar").unwrap();
    assert_eq!(result.raw, "foobar");

    let failed = keyword.parse("foo bar").unwrap_err();
    assert!(failed.failures.iter().any(|f| matches!(
        f,
        Failure::Expectation { expected, .. }
            if expected.iter().any(|e| matches!(e, Expectation::Token { alias, .. } if alias.as_deref() == Some("foobar")))
    )));
}

#[test]
fn sequence_associativity_produces_same_flat_result() {
    let a = Parser::literal("a", true);
    let b = Parser::literal("b", true);
    let c = Parser::literal("c", true);

    let left_nested = a.clone().then(b.clone()).then(c.clone());
    let right_nested = Parser::sequence(vec![a, Parser::sequence(vec![b, c])]);

    let left_result = left_nested.parse("abc").unwrap();
    let right_result = right_nested.parse("abc").unwrap();

    assert_eq!(left_result.from, right_result.from);
    assert_eq!(left_result.to, right_result.to);
    assert_eq!(left_result.value, right_result.value);
    assert_eq!(left_result.value, Value::List(vec![
        Value::Str("a".to_string()),
        Value::Str("b".to_string()),
        Value::Str("c".to_string()),
    ]));
}

#[test]
fn capture_and_action_compose() {
    let grammar = Parser::regex(r"[0-9]+")
        .unwrap()
        .capture("digits")
        .map(|args| {
            let digits = args.captures.get("digits").and_then(Value::as_str).unwrap_or_default();
            Value::Str(format!("n={digits}"))
        });

    let result = grammar.parse("42").unwrap();
    assert_eq!(result.value, Value::Str("n=42".to_string()));
}
