//! The `Parser` newtype: a fluent, cheaply-cloned handle around a parser tree, plus the
//! [`Parser::parse`] entry point that turns a root node's `exec` result into a [`ParseResult`].

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use crate::action::{ActionArgs, ActionParser};
use crate::combinator::{
    CaptureParser, OptionMergeParser, OptionParser, RepetitionMax, RepetitionParser, SequenceParser, TokenParser,
};
use crate::error::{ConfigError, Failure, Warning};
use crate::node::ParserNode;
use crate::options::{Internals, OptionsOverride, ParseOptions, Tracer};
use crate::primitive::{EndEdgeParser, LiteralParser, RegExpParser, StartEdgeParser};
use crate::recursive::ReferenceParser;
use crate::value::Value;

/// A successful parse: the consumed range, the computed value, the raw matched text, whatever
/// was captured, and the diagnostics accumulated along the way (a success can still carry
/// `failures` — the deepest point an abandoned alternative reached).
#[derive(Debug, Clone, PartialEq)]
pub struct Success {
    pub from: usize,
    pub to: usize,
    pub value: Value,
    pub raw: String,
    pub captures: HashMap<String, Value>,
    pub warnings: Vec<Warning>,
    pub failures: Vec<Failure>,
}

/// A failed parse: no value, only diagnostics. `failures` is always non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Failed {
    pub warnings: Vec<Warning>,
    pub failures: Vec<Failure>,
}

/// The outcome of a [`Parser::parse`] call.
pub type ParseResult = Result<Success, Failed>;

/// A cheaply-cloned handle around a parser tree.
///
/// Every combinator method consumes `self` and returns a new `Parser` wrapping a fresh
/// [`ParserNode`] — construction is just a handful of `Rc` allocations, never a deep copy of
/// existing subtrees, since children are shared via `Rc::clone`.
#[derive(Clone)]
pub struct Parser(pub Rc<ParserNode>);

impl Parser {
    pub fn node(&self) -> &Rc<ParserNode> {
        &self.0
    }

    fn wrap(node: ParserNode) -> Self {
        Self(Rc::new(node))
    }

    /// Matches a fixed literal string. `emit` controls whether the literal contributes a value
    /// to its parent (bare punctuation usually sets this to `false`).
    pub fn literal(literal: impl Into<String>, emit: bool) -> Self {
        Self::wrap(ParserNode::Literal(LiteralParser::new(literal, emit)))
    }

    /// Matches text against a regular expression, anchored at the cursor.
    pub fn regex(pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self::wrap(ParserNode::RegExp(RegExpParser::new(pattern)?)))
    }

    /// Matches iff the cursor is at index 0.
    pub fn start() -> Self {
        Self::wrap(ParserNode::StartEdge(StartEdgeParser))
    }

    /// Matches iff, after preskipping, the cursor is at the end of input.
    pub fn end() -> Self {
        Self::wrap(ParserNode::EndEdge(EndEdgeParser))
    }

    /// Calls into a named rule of the enclosing grammar at match time.
    pub fn reference(label: impl Into<String>) -> Self {
        Self::wrap(ParserNode::Reference(ReferenceParser::new(label)))
    }

    /// Builds a named-rule table. See [`GrammarParser::build`](crate::recursive::GrammarParser::build).
    pub fn grammar(rules: Vec<(String, Self)>) -> Result<Self, ConfigError> {
        let rules = rules.into_iter().map(|(name, p)| (name, p.0)).collect();
        Ok(Self(crate::recursive::GrammarParser::build(rules)?))
    }

    /// Sequences `self` then `other`, concatenating their emitted values (no-value entries
    /// filtered out) and merging captures.
    pub fn then(self, other: Self) -> Self {
        Self::wrap(ParserNode::Sequence(SequenceParser {
            children: vec![self.0, other.0],
        }))
    }

    /// Sequences an arbitrary number of parsers.
    pub fn sequence(children: Vec<Self>) -> Self {
        Self::wrap(ParserNode::Sequence(SequenceParser {
            children: children.into_iter().map(|p| p.0).collect(),
        }))
    }

    /// Ordered choice: tries `self`, then `other` at the same starting cursor.
    pub fn or(self, other: Self) -> Self {
        Self::wrap(ParserNode::Option(OptionParser {
            children: vec![self.0, other.0],
        }))
    }

    /// Ordered choice among an arbitrary number of alternatives, tried in order.
    pub fn choice(children: Vec<Self>) -> Self {
        Self::wrap(ParserNode::Option(OptionParser {
            children: children.into_iter().map(|p| p.0).collect(),
        }))
    }

    /// Zero or more repetitions, greedy.
    pub fn repeated(self) -> Self {
        self.repeated_between(0, RepetitionMax::Unbounded)
    }

    /// One or more repetitions, greedy.
    pub fn repeated_at_least_once(self) -> Self {
        self.repeated_between(1, RepetitionMax::Unbounded)
    }

    /// Between `min` and `max` repetitions (inclusive), greedy.
    pub fn repeated_between(self, min: usize, max: RepetitionMax) -> Self {
        Self::wrap(ParserNode::Repetition(RepetitionParser {
            child: self.0,
            min,
            max,
        }))
    }

    /// Zero or one occurrence. Unlike [`Parser::repeated_between`], this yields the child's own
    /// value (wrapped in the no-value case as `Value::Unit`) rather than a list.
    pub fn or_not(self) -> Self {
        let empty = Self::wrap(ParserNode::Sequence(SequenceParser { children: vec![] }));
        self.or(empty)
    }

    /// Presents `self` as an atomic, whitespace-sensitive token.
    pub fn token(self, alias: Option<impl Into<String>>) -> Self {
        Self::wrap(ParserNode::Token(TokenParser {
            child: self.0,
            alias: alias.map(Into::into),
        }))
    }

    /// Binds the result under `name` in the returned captures.
    pub fn capture(self, name: impl Into<String>) -> Self {
        Self::wrap(ParserNode::Capture(CaptureParser {
            child: self.0,
            name: name.into(),
        }))
    }

    /// Runs a semantic action against a successful match.
    pub fn action(
        self,
        f: impl Fn(ActionArgs<'_, '_>) -> Result<Value, Box<dyn std::error::Error>> + 'static,
    ) -> Self {
        Self::wrap(ParserNode::Action(ActionParser::new(self.0, f)))
    }

    /// Shorthand over [`Parser::action`] for actions that cannot fail.
    pub fn map(self, f: impl Fn(ActionArgs<'_, '_>) -> Value + 'static) -> Self {
        self.action(move |args| Ok(f(args)))
    }

    /// Applies a shallow options override while matching `self`.
    pub fn with_options_override(self, overrides: OptionsOverride) -> Self {
        Self::wrap(ParserNode::OptionMerge(OptionMergeParser {
            child: self.0,
            overrides,
        }))
    }

    /// Scopes `self` to match case-insensitively.
    pub fn ignore_case(self) -> Self {
        self.with_options_override(OptionsOverride {
            ignore_case: Some(true),
            ..Default::default()
        })
    }

    /// Scopes `self` to use a different skipper.
    pub fn with_skipper(self, skipper: Self) -> Self {
        self.with_options_override(OptionsOverride {
            skipper: Some(skipper.0),
            ..Default::default()
        })
    }

    /// Scopes `self` to never skip, even if the ambient options say otherwise.
    pub fn no_skip(self) -> Self {
        self.with_options_override(OptionsOverride {
            skip: Some(false),
            ..Default::default()
        })
    }

    /// Run this parser against `input` with default options: cursor 0, the default whitespace
    /// skipper, skipping enabled, case-sensitive.
    pub fn parse(&self, input: &str) -> ParseResult {
        self.parse_with(input, |options| options)
    }

    /// Like [`Parser::parse`], but `f` may override any field of the default [`ParseOptions`]
    /// before the root node is matched (cursor, skipper, `skip`, `ignore_case`, context, tracer).
    pub fn parse_with<'a>(
        &self,
        input: &'a str,
        f: impl FnOnce(ParseOptions<'a>) -> ParseOptions<'a>,
    ) -> ParseResult {
        let options = f(ParseOptions::defaults(input));
        let mut internals = Internals::new();

        match self.0.exec(&options, &mut internals) {
            Some(m) => Ok(Success {
                from: m.range.from,
                to: m.range.to,
                raw: input[m.range.from..m.range.to].to_string(),
                value: m.value,
                captures: m.captures,
                warnings: internals.warnings,
                failures: internals.final_failures(),
            }),
            None => Err(Failed {
                warnings: internals.warnings,
                failures: internals.final_failures(),
            }),
        }
    }

    /// Attach user context retrievable from within semantic actions via `args.options.context`.
    pub fn parse_with_context(&self, input: &str, context: Rc<dyn Any>) -> ParseResult {
        self.parse_with(input, |options| options.with_context(context))
    }

    /// Attach a [`Tracer`] for the duration of this parse.
    pub fn parse_with_tracer(&self, input: &str, tracer: Rc<dyn Tracer>) -> ParseResult {
        self.parse_with(input, |options| options.with_tracer(tracer))
    }
}
