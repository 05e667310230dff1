//! Semantic actions: running user code against a successful match, with `$commit`/`$warn`
//! hooks exposed as plain closures rather than sigil keys on a dynamic argument object.

use std::rc::Rc;

use crate::matched::{Captures, Match};
use crate::node::ParserNode;
use crate::options::{Internals, ParseOptions};
use crate::span::Range;
use crate::value::Value;

/// The argument passed to a semantic action: the match it ran against, plus `commit`/`warn`
/// hooks bound to the current `Internals`.
///
/// The source this engine's behavior is modeled on blends captures and sigil keys into one
/// dynamic object (`$value`, `$raw`, `$commit`, ...). In a typed host that blend is split into a
/// captures mapping and this fixed-field record, so actions get compile-time checked field
/// access instead of stringly-typed sigils.
pub struct ActionArgs<'a, 'i> {
    pub value: Value,
    pub raw: &'i str,
    pub range: Range,
    pub captures: &'a Captures,
    pub options: &'a ParseOptions<'i>,
    internals: &'a mut Internals,
}

impl<'a, 'i> ActionArgs<'a, 'i> {
    pub fn from(&self) -> usize {
        self.range.from
    }

    pub fn to(&self) -> usize {
        self.range.to
    }

    /// PEG "cut": commit the tentative failures seen so far, forbidding them from becoming the
    /// final diagnostic.
    pub fn commit(&mut self) {
        self.internals.commit();
    }

    /// Record an advisory warning tied to the action's match range.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.internals.warn(self.range, message);
    }
}

type ActionFn = dyn Fn(ActionArgs<'_, '_>) -> Result<Value, Box<dyn std::error::Error>>;

/// Runs `child`, then invokes `action` against the resulting match. The action's return value
/// becomes the new match's value; an `Err` is converted into a `Failure::Semantic` spanning the
/// child's match range.
pub struct ActionParser {
    pub child: Rc<ParserNode>,
    pub action: Rc<ActionFn>,
}

impl Clone for ActionParser {
    fn clone(&self) -> Self {
        Self {
            child: self.child.clone(),
            action: self.action.clone(),
        }
    }
}

impl ActionParser {
    pub fn new(
        child: Rc<ParserNode>,
        action: impl Fn(ActionArgs<'_, '_>) -> Result<Value, Box<dyn std::error::Error>> + 'static,
    ) -> Self {
        Self {
            child,
            action: Rc::new(action),
        }
    }

    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        let m = self.child.exec(options, internals)?;
        let range = m.range;
        let raw = &options.input[range.from..range.to];

        let args = ActionArgs {
            value: m.value,
            raw,
            range,
            captures: &m.captures,
            options,
            internals,
        };

        match (self.action)(args) {
            // An action's result is atomic from its caller's perspective, same as a token: it
            // contributes the computed value as a single item upward.
            Ok(value) => Some(Match {
                range,
                children: Match::singleton_children(&value),
                value,
                captures: m.captures,
            }),
            Err(err) => {
                internals.push_failure(crate::error::Failure::semantic(range, err.to_string()));
                None
            }
        }
    }
}
