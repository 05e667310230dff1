//! Match-failure data types and the `merge_failures` diagnostic reduction.
//!
//! Match failures are data, never exceptions: they accumulate in [`Internals`](crate::options::Internals)
//! as the engine explores (and abandons) alternatives, and are only turned into a single
//! diagnostic at the very end of a [`parse`](crate::parser::Parser::parse) call. Configuration
//! errors ([`ConfigError`]) are the other, unrelated error family: they indicate a malformed
//! grammar rather than a rejected input, and are surfaced immediately through `Result`/`?`.

use std::collections::HashSet;

use crate::span::Range;

/// What was expected at a particular position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expectation {
    /// A literal string was expected.
    Literal(String),
    /// Input matching a regular expression was expected; carries the pattern source.
    RegExp(String),
    /// A named token failed; carries its alias (if any) and the failures of its body.
    Token {
        alias: Option<String>,
        failures: Vec<Failure>,
    },
    /// The start or end of input was expected.
    Edge(EdgeKind),
}

/// Which edge of the input an [`Expectation::Edge`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Start,
    End,
}

/// A diagnosed failure to match, tied to the range at which it occurred.
///
/// Expectation failures always have `range.from == range.to` (failures are reported at a point,
/// not a span); semantic failures span the range of the action whose body raised them.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    Expectation {
        range: Range,
        expected: Vec<Expectation>,
    },
    Semantic {
        range: Range,
        message: String,
    },
}

impl Failure {
    /// The range this failure is tied to.
    pub fn range(&self) -> Range {
        match self {
            Failure::Expectation { range, .. } => *range,
            Failure::Semantic { range, .. } => *range,
        }
    }

    /// Build a single-expectation `Expectation` failure at a point.
    pub fn expectation(at: usize, expected: Expectation) -> Self {
        Failure::Expectation {
            range: Range::empty_at(at),
            expected: vec![expected],
        }
    }

    /// Build a `Semantic` failure spanning `range`.
    pub fn semantic(range: Range, message: impl Into<String>) -> Self {
        Failure::Semantic {
            range,
            message: message.into(),
        }
    }
}

/// An advisory message that does not affect success or failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub range: Range,
    pub message: String,
}

/// Reduce a list of failures to the deepest-reaching diagnostic.
///
/// PEG users want the error from "how far we got": the deepest point in the input any branch
/// could reach before every alternative died, together with the union of everything that could
/// have followed at that point. Concretely:
///
/// 1. If `failures` is empty, return an empty list.
/// 2. Find `f_max`, the maximum `from` among all failures.
/// 3. Keep only the failures at `f_max`.
/// 4. `Semantic` failures pass through individually; `Expectation` failures at `f_max` are
///    combined into a single `Expectation` failure whose list is the deduplicated, order-preserving
///    concatenation of the inputs' expected lists.
///
/// `merge_failures` is idempotent: `merge_failures(&merge_failures(xs)) == merge_failures(&xs)`.
pub fn merge_failures(failures: &[Failure]) -> Vec<Failure> {
    let Some(f_max) = failures.iter().map(|f| f.range().from).max() else {
        return Vec::new();
    };

    let deepest: Vec<&Failure> = failures.iter().filter(|f| f.range().from == f_max).collect();

    let mut result = Vec::new();
    let mut expected = Vec::new();
    let mut seen = HashSet::new();
    let mut expectation_range = None;

    for failure in deepest {
        match failure {
            Failure::Semantic { .. } => result.push(failure.clone()),
            Failure::Expectation { range, expected: items } => {
                expectation_range.get_or_insert(*range);
                for item in items {
                    if seen.insert(item.clone()) {
                        expected.push(item.clone());
                    }
                }
            }
        }
    }

    if let Some(range) = expectation_range {
        result.push(Failure::Expectation { range, expected });
    }

    result
}

/// Errors that indicate a malformed grammar rather than a rejected input.
///
/// Unlike [`Failure`], these are not part of the match algebra: they are returned by fallible
/// parser constructors (or, for [`Reference`](crate::recursive::ReferenceParser) resolution, at
/// match time against a malformed grammar) and propagated with `?`, never collected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reference to undefined rule {0:?}")]
    UnresolvedReference(String),
    #[error("grammar must declare at least one rule")]
    EmptyGrammar,
    #[error("duplicate rule name {0:?}")]
    DuplicateRule(String),
    #[error("invalid regular expression: {source}")]
    InvalidRegex {
        #[from]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(from: usize, to: usize, s: &str) -> Failure {
        Failure::Expectation {
            range: Range::new(from, to),
            expected: vec![Expectation::Literal(s.to_string())],
        }
    }

    #[test]
    fn merge_empty_is_empty() {
        assert_eq!(merge_failures(&[]), Vec::new());
    }

    #[test]
    fn merge_keeps_only_deepest() {
        let failures = vec![lit(0, 0, "a"), lit(3, 3, "b"), lit(1, 1, "c")];
        let merged = merge_failures(&failures);
        assert_eq!(
            merged,
            vec![Failure::Expectation {
                range: Range::new(3, 3),
                expected: vec![Expectation::Literal("b".to_string())],
            }]
        );
    }

    #[test]
    fn merge_dedupes_preserving_order() {
        let failures = vec![lit(2, 2, "a"), lit(2, 2, "b"), lit(2, 2, "a")];
        let merged = merge_failures(&failures);
        assert_eq!(
            merged,
            vec![Failure::Expectation {
                range: Range::new(2, 2),
                expected: vec![
                    Expectation::Literal("a".to_string()),
                    Expectation::Literal("b".to_string())
                ],
            }]
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let failures = vec![lit(0, 0, "a"), lit(5, 5, "b"), lit(5, 5, "c")];
        let once = merge_failures(&failures);
        let twice = merge_failures(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_keeps_semantic_failures_separate() {
        let failures = vec![
            Failure::semantic(Range::new(4, 6), "bad number"),
            lit(4, 4, "digit"),
        ];
        let merged = merge_failures(&failures);
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().any(|f| matches!(f, Failure::Semantic { .. })));
        assert!(merged.iter().any(|f| matches!(f, Failure::Expectation { .. })));
    }
}
