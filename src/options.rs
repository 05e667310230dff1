//! Per-call configuration ([`ParseOptions`]) and the mutable diagnostic scratchpad
//! ([`Internals`]) threaded through a single [`parse`](crate::parser::Parser::parse) invocation.

use std::any::Any;
use std::rc::Rc;

use crate::error::{merge_failures, Failure};
use crate::matched::Match;
use crate::node::ParserNode;
use crate::span::Range;

/// A sink for parser trace events, the hook a visualization tool would implement.
///
/// Every `exec` invocation fires `enter` first, then exactly one of `matched`/`fail`. Labels are
/// derived from a [`Reference`](crate::recursive::ReferenceParser) label, a
/// [`Token`](crate::combinator::TokenParser) alias, or a type tag such as `"Literal"`.
pub trait Tracer {
    fn enter(&self, label: &str, options: &ParseOptions<'_>);
    fn matched(&self, label: &str, options: &ParseOptions<'_>, m: &Match);
    fn fail(&self, label: &str, options: &ParseOptions<'_>);
}

/// Per-invocation, immutable parse configuration.
///
/// `ParseOptions` is a small, cheaply cloned record: the only heap-owning fields are `Rc`s, so
/// producing an overridden copy (as every delegating parser that changes context does) is just a
/// handful of reference-count bumps, never a deep copy of the grammar or the input.
#[derive(Clone)]
pub struct ParseOptions<'a> {
    pub input: &'a str,
    pub from: usize,
    pub grammar: Option<Rc<ParserNode>>,
    pub skipper: Rc<ParserNode>,
    pub skip: bool,
    pub ignore_case: bool,
    pub context: Option<Rc<dyn Any>>,
    pub tracer: Option<Rc<dyn Tracer>>,
}

impl<'a> ParseOptions<'a> {
    /// Defaults used by [`Parser::parse`](crate::parser::Parser::parse): cursor at 0, the default
    /// whitespace skipper, skipping enabled, case-sensitive.
    pub fn defaults(input: &'a str) -> Self {
        Self {
            input,
            from: 0,
            grammar: None,
            skipper: crate::primitive::default_skipper(),
            skip: true,
            ignore_case: false,
            context: None,
            tracer: None,
        }
    }

    pub fn with_from(mut self, from: usize) -> Self {
        self.from = from;
        self
    }

    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_skipper(mut self, skipper: Rc<ParserNode>) -> Self {
        self.skipper = skipper;
        self
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_grammar(mut self, grammar: Rc<ParserNode>) -> Self {
        self.grammar = Some(grammar);
        self
    }

    pub fn with_context(mut self, context: Rc<dyn Any>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_tracer(mut self, tracer: Rc<dyn Tracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// The skipper re-entered with `skip = false`, so that skipping the skipper never recurses.
    pub fn for_preskip(&self) -> ParseOptions<'a> {
        self.clone().with_skip(false).with_from(self.from)
    }
}

/// A shallow, optional-field override applied by
/// [`OptionMergeParser`](crate::combinator::OptionMergeParser) to inject a scoped change — a
/// different skipper, a case-insensitive region — without touching the rest of the options.
#[derive(Clone, Default)]
pub struct OptionsOverride {
    pub from: Option<usize>,
    pub skipper: Option<Rc<ParserNode>>,
    pub skip: Option<bool>,
    pub ignore_case: Option<bool>,
    pub context: Option<Rc<dyn Any>>,
}

impl OptionsOverride {
    pub fn apply<'a>(&self, mut options: ParseOptions<'a>) -> ParseOptions<'a> {
        if let Some(from) = self.from {
            options.from = from;
        }
        if let Some(skipper) = &self.skipper {
            options.skipper = skipper.clone();
        }
        if let Some(skip) = self.skip {
            options.skip = skip;
        }
        if let Some(ignore_case) = self.ignore_case {
            options.ignore_case = ignore_case;
        }
        if let Some(context) = &self.context {
            options.context = Some(context.clone());
        }
        options
    }
}

/// The mutable scratchpad threaded through a single `parse` call.
///
/// `warnings` and `failures` grow monotonically during the match and are released when the call
/// returns. `$commit` moves the current tentative `failures` into `committed_failures` (merging
/// them first) and clears `failures`, which is why `committed_failures` only ever grows.
#[derive(Debug, Default)]
pub struct Internals {
    pub warnings: Vec<crate::error::Warning>,
    pub failures: Vec<Failure>,
    pub committed_failures: Vec<Failure>,
}

impl Internals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_failure(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    pub fn warn(&mut self, range: Range, message: impl Into<String>) {
        self.warnings.push(crate::error::Warning {
            range,
            message: message.into(),
        });
    }

    /// PEG "cut": move and merge the tentative failures into the committed set, then clear them.
    pub fn commit(&mut self) {
        let merged = merge_failures(&self.failures);
        self.committed_failures.extend(merged);
        self.failures.clear();
    }

    /// The failures that would be reported if `parse` ended right now: committed failures
    /// followed by the merge of whatever is still tentative.
    pub fn final_failures(&self) -> Vec<Failure> {
        let mut result = self.committed_failures.clone();
        result.extend(merge_failures(&self.failures));
        result
    }
}
