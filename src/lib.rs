#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! A parsing library built around Parsing Expression Grammars (PEGs).
//!
//! Grammars are trees of [`ParserNode`] variants — either built by hand through the fluent
//! [`Parser`] combinator API, or lowered from a template-based surface syntax by a separate
//! metagrammar crate, which is out of scope here. Running a grammar against an input string
//! yields either a successful [`Success`] (a computed value, captured sub-values, and the
//! consumed range) or a [`Failed`] carrying a deepest-reached diagnostic.

/// Semantic actions and the `$commit`/`$warn` hooks available to them.
pub mod action;
/// Combinators that assemble and extend existing parsers: sequencing, ordered choice,
/// repetition, tokens, captures, and options overrides.
pub mod combinator;
/// Match-failure data types and the `merge_failures` diagnostic reduction.
pub mod error;
/// The `Match` value type and the captures it carries.
pub mod matched;
/// The closed set of parser node variants and the single `exec` dispatch over them.
pub mod node;
/// Per-call configuration and the mutable diagnostic scratchpad.
pub mod options;
/// The `Parser` fluent handle and the `parse` entry point.
pub mod parser;
/// Parser primitives: literals, regular expressions, and the start/end-of-input edges.
pub mod primitive;
/// Named recursion: grammars and rule references.
pub mod recursive;
/// Byte ranges into a parsed input.
pub mod span;
/// The domain value type produced by matches.
pub mod value;

pub use crate::error::{ConfigError, EdgeKind, Expectation, Failure, Warning};
pub use crate::matched::{Captures, Match};
pub use crate::node::ParserNode;
pub use crate::options::{OptionsOverride, ParseOptions, Tracer};
pub use crate::parser::{Failed, ParseResult, Parser, Success};
pub use crate::span::Range;
pub use crate::value::Value;

/// Commonly used functions, traits and types.
pub mod prelude {
    pub use crate::combinator::RepetitionMax;
    pub use crate::error::{ConfigError, EdgeKind, Expectation, Failure, Warning};
    pub use crate::options::{OptionsOverride, ParseOptions, Tracer};
    pub use crate::parser::{Failed, ParseResult, Parser, Success};
    pub use crate::span::Range;
    pub use crate::value::Value;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn smoke_literal_with_default_skipper() {
        let a = Parser::literal("a", true);
        let result = a.parse("a a").unwrap();
        assert_eq!((result.from, result.to), (0, 1));
        assert_eq!(result.raw, "a");
    }
}
