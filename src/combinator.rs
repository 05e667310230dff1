//! Combinators that assemble and extend existing parsers: ordered sequencing, ordered choice,
//! repetition, and the delegating wrappers (token, capture, option-override) that change how a
//! single child is invoked or how its result is presented upward.

use std::rc::Rc;

use crate::matched::{Captures, Match};
use crate::node::{preskip, ParserNode};
use crate::options::{Internals, OptionsOverride, ParseOptions};
use crate::span::Range;
use crate::value::Value;
use crate::error::{Expectation, Failure};

/// The upper bound of a [`RepetitionParser`]; `Unbounded` is the `max = ∞` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepetitionMax {
    Bounded(usize),
    Unbounded,
}

impl RepetitionMax {
    fn reached(self, count: usize) -> bool {
        match self {
            RepetitionMax::Bounded(max) => count >= max,
            RepetitionMax::Unbounded => false,
        }
    }
}

/// Matches each child in turn, threading the cursor; any child failure short-circuits to `None`.
#[derive(Clone)]
pub struct SequenceParser {
    pub children: Vec<Rc<ParserNode>>,
}

impl SequenceParser {
    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        let mut cursor = options.from;
        let mut start = None;
        let mut values = Vec::new();
        let mut captures = Captures::new();

        for child in &self.children {
            let child_options = options.clone().with_from(cursor);
            let m = child.exec(&child_options, internals)?;
            start.get_or_insert(m.range.from);
            cursor = m.range.to;
            // Concatenate the child's own emitted children rather than its composite value, so
            // a nested sequence flattens away instead of showing up as a one-item sub-list: this
            // is what keeps `a.then(b).then(c)` and `a.then(b.then(c))` equal.
            values.extend(m.children);
            Match::merge_captures_from(&mut captures, &m.captures);
        }

        // An empty sequence (or one whose first child never preskips) matches the empty range
        // right where it started.
        let start = start.unwrap_or(options.from);

        Some(Match {
            range: Range::new(start, cursor),
            value: Value::List(values.clone()),
            children: values,
            captures,
        })
    }
}

/// Tries each child in turn from the same starting cursor; the first success wins. If every
/// child fails, each child's failures remain in `internals.failures` for later merging —
/// backtracking is implicit because no child's failure ever mutates `options`.
#[derive(Clone)]
pub struct OptionParser {
    pub children: Vec<Rc<ParserNode>>,
}

impl OptionParser {
    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        for child in &self.children {
            if let Some(m) = child.exec(options, internals) {
                return Some(m);
            }
        }
        None
    }
}

/// Greedily matches `child` at the advancing cursor until it fails or `max` is reached. Succeeds
/// iff at least `min` repetitions were matched.
#[derive(Clone)]
pub struct RepetitionParser {
    pub child: Rc<ParserNode>,
    pub min: usize,
    pub max: RepetitionMax,
}

impl RepetitionParser {
    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        let start = options.from;
        let mut cursor = start;
        let mut values = Vec::new();

        loop {
            if self.max.reached(values.len()) {
                break;
            }
            let child_options = options.clone().with_from(cursor);
            match self.child.exec(&child_options, internals) {
                Some(m) => {
                    cursor = m.range.to;
                    values.push(m.value);
                }
                None => break,
            }
        }

        if values.len() >= self.min {
            let value = Value::List(values);
            Some(Match {
                range: Range::new(start, cursor),
                // A repetition presents itself as one item to an enclosing sequence — its own
                // list of iterations, not flattened into the sequence's emitted values.
                children: Match::singleton_children(&value),
                value,
                captures: Captures::new(),
            })
        } else {
            None
        }
    }
}

/// Presents `child` as an atomic, whitespace-sensitive unit: the body is matched with
/// `skip = false` under a private failures buffer. On success, the child's failures are
/// discarded (the token presents itself as a single unit to its caller); on failure, a single
/// `Expectation::Token` is recorded carrying the discarded buffer.
#[derive(Clone)]
pub struct TokenParser {
    pub child: Rc<ParserNode>,
    pub alias: Option<String>,
}

impl TokenParser {
    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        let from = preskip(options, internals)?;
        let body_options = options.clone().with_from(from).with_skip(false);

        let mut private = Internals::new();
        let result = self.child.exec(&body_options, &mut private);

        // Warnings still matter to the caller even when the token's own failures don't.
        internals.warnings.extend(private.warnings);

        match result {
            // A token is atomic from its caller's perspective: it contributes its own value as a
            // single item upward, not whatever flat list its body assembled internally.
            Some(mut m) => {
                m.children = Match::singleton_children(&m.value);
                Some(m)
            }
            None => {
                let failures = private.final_failures();
                internals.push_failure(Failure::expectation(
                    from,
                    Expectation::Token {
                        alias: self.alias.clone(),
                        failures,
                    },
                ));
                None
            }
        }
    }
}

/// Matches `child`, then binds its value under `name` in the returned captures.
#[derive(Clone)]
pub struct CaptureParser {
    pub child: Rc<ParserNode>,
    pub name: String,
}

impl CaptureParser {
    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        let mut m = self.child.exec(options, internals)?;
        m.captures.insert(self.name.clone(), m.value.clone());
        Some(m)
    }
}

/// Matches `child` under a shallow override of `options` — the seam used to scope case
/// insensitivity, swap the skipper, or otherwise inject a configuration change.
#[derive(Clone)]
pub struct OptionMergeParser {
    pub child: Rc<ParserNode>,
    pub overrides: OptionsOverride,
}

impl OptionMergeParser {
    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        let merged = self.overrides.apply(options.clone());
        self.child.exec(&merged, internals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use crate::primitive::LiteralParser;

    fn lit(s: &str) -> Rc<ParserNode> {
        Rc::new(ParserNode::Literal(LiteralParser::new(s, true)))
    }

    fn no_skip_options(input: &str) -> ParseOptions<'_> {
        ParseOptions::defaults(input).with_skip(false)
    }

    #[test]
    fn sequence_filters_unit_values() {
        let seq = SequenceParser {
            children: vec![
                Rc::new(ParserNode::Literal(LiteralParser::new("a", false))),
                lit("b"),
            ],
        };
        let mut internals = Internals::new();
        let options = no_skip_options("ab");
        let m = seq.exec(&options, &mut internals).unwrap();
        assert_eq!(m.value, Value::List(vec![Value::Str("b".to_string())]));
        assert_eq!(m.range, Range::new(0, 2));
    }

    #[test]
    fn sequence_flattens_regardless_of_nesting() {
        // left-nested: (a b) c, as `a.then(b).then(c)` produces
        let left_nested = SequenceParser {
            children: vec![
                Rc::new(ParserNode::Sequence(SequenceParser {
                    children: vec![lit("a"), lit("b")],
                })),
                lit("c"),
            ],
        };
        // right-nested: a (b c)
        let right_nested = SequenceParser {
            children: vec![
                lit("a"),
                Rc::new(ParserNode::Sequence(SequenceParser {
                    children: vec![lit("b"), lit("c")],
                })),
            ],
        };

        let mut internals = Internals::new();
        let options = no_skip_options("abc");
        let left = left_nested.exec(&options, &mut internals).unwrap();
        let right = right_nested.exec(&options, &mut internals).unwrap();

        let flat = Value::List(vec![
            Value::Str("a".to_string()),
            Value::Str("b".to_string()),
            Value::Str("c".to_string()),
        ]);
        assert_eq!(left.value, flat);
        assert_eq!(right.value, flat);
        assert_eq!(left.range, right.range);
    }

    #[test]
    fn option_tries_in_order() {
        let opt = OptionParser {
            children: vec![lit("a"), lit("b")],
        };
        let mut internals = Internals::new();
        let options = no_skip_options("b");
        let m = opt.exec(&options, &mut internals).unwrap();
        assert_eq!(m.value, Value::Str("b".to_string()));
        assert!(internals
            .failures
            .iter()
            .any(|f| matches!(f, Failure::Expectation { expected, .. } if expected.contains(&Expectation::Literal("a".to_string())))));
    }

    #[test]
    fn repetition_is_greedy_and_capped() {
        let rep = RepetitionParser {
            child: lit("a"),
            min: 2,
            max: RepetitionMax::Bounded(3),
        };
        let mut internals = Internals::new();
        let options = no_skip_options("aaaa");
        let m = rep.exec(&options, &mut internals).unwrap();
        assert_eq!(m.range, Range::new(0, 3));
    }

    #[test]
    fn repetition_zero_min_allows_empty_match() {
        let rep = RepetitionParser {
            child: lit("a"),
            min: 0,
            max: RepetitionMax::Unbounded,
        };
        let mut internals = Internals::new();
        let options = no_skip_options("zzz");
        let m = rep.exec(&options, &mut internals).unwrap();
        assert_eq!(m.range, Range::empty_at(0));
        assert_eq!(m.value, Value::List(Vec::new()));
    }

    #[test]
    fn token_discards_inner_failures_on_success() {
        let token = TokenParser {
            child: Rc::new(ParserNode::Sequence(SequenceParser {
                children: vec![lit("a"), lit("b")],
            })),
            alias: Some("ab-token".to_string()),
        };
        let mut internals = Internals::new();
        let options = no_skip_options("ab");
        let m = token.exec(&options, &mut internals).unwrap();
        assert_eq!(m.range, Range::new(0, 2));
        assert!(internals.failures.is_empty());
    }

    #[test]
    fn token_wraps_inner_failures_on_failure() {
        let token = TokenParser {
            child: Rc::new(ParserNode::Sequence(SequenceParser {
                children: vec![lit("a"), lit("b")],
            })),
            alias: Some("ab-token".to_string()),
        };
        let mut internals = Internals::new();
        let options = no_skip_options("ac");
        assert!(token.exec(&options, &mut internals).is_none());
        assert_eq!(internals.failures.len(), 1);
        match &internals.failures[0] {
            Failure::Expectation { expected, .. } => match &expected[0] {
                Expectation::Token { alias, failures } => {
                    assert_eq!(alias.as_deref(), Some("ab-token"));
                    assert_eq!(failures.len(), 1);
                }
                other => panic!("expected Token expectation, got {other:?}"),
            },
            other => panic!("expected Expectation failure, got {other:?}"),
        }
    }

    #[test]
    fn capture_binds_value_under_name() {
        let cap = CaptureParser {
            child: lit("a"),
            name: "letter".to_string(),
        };
        let mut internals = Internals::new();
        let options = no_skip_options("a");
        let m = cap.exec(&options, &mut internals).unwrap();
        assert_eq!(m.captures.get("letter"), Some(&Value::Str("a".to_string())));
    }
}
