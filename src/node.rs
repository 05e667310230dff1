//! The closed set of parser node variants and the single `exec` dispatch over them.
//!
//! A tagged enum is used here rather than a trait object hierarchy: the input type is always
//! `&str`, so there is no need for the generic `Parser<I, O>` trait this engine's combinator
//! ancestors use for arbitrary token streams. A closed sum lets the compiler check that every
//! variant is handled and avoids a virtual-call per node.

use crate::action::ActionParser;
use crate::combinator::{CaptureParser, OptionMergeParser, OptionParser, RepetitionParser, SequenceParser, TokenParser};
use crate::matched::Match;
use crate::options::{Internals, ParseOptions};
use crate::primitive::{EndEdgeParser, LiteralParser, RegExpParser, StartEdgeParser};
use crate::recursive::{GrammarParser, ReferenceParser};

/// A node in a parser tree. See the module docs for the contract each variant must uphold.
pub enum ParserNode {
    Literal(LiteralParser),
    RegExp(RegExpParser),
    StartEdge(StartEdgeParser),
    EndEdge(EndEdgeParser),
    Sequence(SequenceParser),
    Option(OptionParser),
    Repetition(RepetitionParser),
    Token(TokenParser),
    Capture(CaptureParser),
    OptionMerge(OptionMergeParser),
    Action(ActionParser),
    Grammar(GrammarParser),
    Reference(ReferenceParser),
}

impl ParserNode {
    /// Attempt to match starting at `options.from`. Returns `None` on failure, having pushed at
    /// least one failure describing why (except for combinators that only aggregate their
    /// children's failures).
    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        let tracing = options.tracer.is_some();
        let need_label = tracing || cfg!(feature = "trace-log");
        let label = need_label.then(|| self.label()).unwrap_or_default();
        if let Some(tracer) = &options.tracer {
            tracer.enter(&label, options);
        }

        let result = match self {
            ParserNode::Literal(p) => p.exec(options, internals),
            ParserNode::RegExp(p) => p.exec(options, internals),
            ParserNode::StartEdge(p) => p.exec(options, internals),
            ParserNode::EndEdge(p) => p.exec(options, internals),
            ParserNode::Sequence(p) => p.exec(options, internals),
            ParserNode::Option(p) => p.exec(options, internals),
            ParserNode::Repetition(p) => p.exec(options, internals),
            ParserNode::Token(p) => p.exec(options, internals),
            ParserNode::Capture(p) => p.exec(options, internals),
            ParserNode::OptionMerge(p) => p.exec(options, internals),
            ParserNode::Action(p) => p.exec(options, internals),
            ParserNode::Grammar(p) => p.exec(options, internals),
            ParserNode::Reference(p) => p.exec(options, internals),
        };

        #[cfg(feature = "trace-log")]
        match &result {
            Some(m) => log::trace!("{label} matched [{}, {})", m.range.from, m.range.to),
            None => log::trace!("{label} failed at {}", options.from),
        }

        if let Some(tracer) = &options.tracer {
            match &result {
                Some(m) => tracer.matched(&label, options, m),
                None => tracer.fail(&label, options),
            }
        }

        result
    }

    /// A human-readable tag used by the tracer and `log` instrumentation: a
    /// [`Reference`](ReferenceParser)'s label, a [`Token`](TokenParser)'s alias, or a type tag.
    pub fn label(&self) -> String {
        match self {
            ParserNode::Literal(_) => "Literal".to_string(),
            ParserNode::RegExp(_) => "RegExp".to_string(),
            ParserNode::StartEdge(_) => "StartEdge".to_string(),
            ParserNode::EndEdge(_) => "EndEdge".to_string(),
            ParserNode::Sequence(_) => "Sequence".to_string(),
            ParserNode::Option(_) => "Option".to_string(),
            ParserNode::Repetition(_) => "Repetition".to_string(),
            ParserNode::Token(p) => p.alias.clone().unwrap_or_else(|| "Token".to_string()),
            ParserNode::Capture(_) => "Capture".to_string(),
            ParserNode::OptionMerge(_) => "OptionMerge".to_string(),
            ParserNode::Action(_) => "Action".to_string(),
            ParserNode::Grammar(_) => "Grammar".to_string(),
            ParserNode::Reference(p) => p.label.clone(),
        }
    }
}

/// Advance the cursor past input matched by `options.skipper`, if `options.skip` is set.
///
/// Skipping re-enters the skipper with `skip = false` so that it never tries to skip past itself.
/// Returns the post-skip cursor, or `None` if the skipper itself fails to match (in which case
/// the caller's terminal or token attempt fails too, without pushing its own failure — the
/// skipper's failure already describes what went wrong).
pub fn preskip(options: &ParseOptions<'_>, internals: &mut Internals) -> Option<usize> {
    if !options.skip {
        return Some(options.from);
    }
    let skip_options = options.for_preskip();
    let m = options.skipper.exec(&skip_options, internals)?;
    Some(m.range.to)
}
