//! Parser primitives that match specific input patterns: literals, regular expressions, and the
//! start/end-of-input edges.
//!
//! These are the leaves of a parser tree. Every one of them preskips before attempting to match,
//! with the sole exception of [`StartEdgeParser`], which asserts against index 0 and would make
//! no sense after skipping past leading whitespace.

use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ConfigError, EdgeKind, Expectation, Failure};
use crate::matched::{Captures, Match};
use crate::node::{preskip, ParserNode};
use crate::options::{Internals, ParseOptions};
use crate::span::Range;
use crate::value::Value;

/// Matches a fixed literal string.
#[derive(Debug, Clone)]
pub struct LiteralParser {
    pub literal: String,
    /// Whether this literal contributes its text to the parent's emitted value list.
    pub emit: bool,
}

impl LiteralParser {
    pub fn new(literal: impl Into<String>, emit: bool) -> Self {
        Self {
            literal: literal.into(),
            emit,
        }
    }

    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        let from = preskip(options, internals)?;
        let len = self.literal.len();
        let to = from + len;

        let matches = options
            .input
            .get(from..to)
            .is_some_and(|candidate| {
                if options.ignore_case {
                    candidate.to_lowercase() == self.literal.to_lowercase()
                } else {
                    candidate == self.literal
                }
            });

        if matches {
            let value = if self.emit {
                Value::Str(self.literal.clone())
            } else {
                Value::Unit
            };
            Some(Match {
                range: Range::new(from, to),
                children: Match::singleton_children(&value),
                value,
                captures: Captures::new(),
            })
        } else {
            internals.push_failure(Failure::expectation(
                from,
                Expectation::Literal(self.literal.clone()),
            ));
            None
        }
    }
}

/// Matches input against a regular expression, anchored at the cursor.
///
/// `regex` has no native "sticky" flag, so anchoring is implemented by prefixing the user's
/// pattern with `\A` and matching against the input slice starting at the cursor — the pattern
/// can therefore only ever match starting exactly there, which is what "anchored" means here.
#[derive(Debug, Clone)]
pub struct RegExpParser {
    source: String,
    sensitive: Regex,
    insensitive: Regex,
}

impl RegExpParser {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let anchored = format!("\\A(?:{pattern})");
        let sensitive = Regex::new(&anchored)?;
        let insensitive = Regex::new(&format!("(?i){anchored}"))?;
        Ok(Self {
            source: pattern.to_string(),
            sensitive,
            insensitive,
        })
    }

    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        let from = preskip(options, internals)?;
        let regex = if options.ignore_case {
            &self.insensitive
        } else {
            &self.sensitive
        };

        match regex.captures(&options.input[from..]) {
            Some(caps) => {
                let whole = caps.get(0).expect("capture group 0 always matches");
                let to = from + whole.end();
                let mut captures = Captures::new();
                for name in regex.capture_names().flatten() {
                    if let Some(group) = caps.name(name) {
                        captures.insert(name.to_string(), Value::Str(group.as_str().to_string()));
                    }
                }
                let value = Value::Str(whole.as_str().to_string());
                Some(Match {
                    range: Range::new(from, to),
                    children: Match::singleton_children(&value),
                    value,
                    captures,
                })
            }
            None => {
                internals.push_failure(Failure::expectation(
                    from,
                    Expectation::RegExp(self.source.clone()),
                ));
                None
            }
        }
    }
}

/// Matches iff the cursor is at index 0. Never preskips (see module docs).
#[derive(Debug, Clone, Copy)]
pub struct StartEdgeParser;

impl StartEdgeParser {
    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        if options.from == 0 {
            Some(Match {
                range: Range::empty_at(0),
                value: Value::Unit,
                children: Vec::new(),
                captures: Captures::new(),
            })
        } else {
            internals.push_failure(Failure::expectation(
                options.from,
                Expectation::Edge(EdgeKind::Start),
            ));
            None
        }
    }
}

/// Matches iff, after preskipping, the cursor equals the input length.
#[derive(Debug, Clone, Copy)]
pub struct EndEdgeParser;

impl EndEdgeParser {
    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        let from = preskip(options, internals)?;
        if from == options.input.len() {
            Some(Match {
                range: Range::empty_at(from),
                value: Value::Unit,
                children: Vec::new(),
                captures: Captures::new(),
            })
        } else {
            internals.push_failure(Failure::expectation(from, Expectation::Edge(EdgeKind::End)));
            None
        }
    }
}

/// The skipper used by [`ParseOptions::defaults`] when the user supplies none: runs of ASCII
/// whitespace.
fn whitespace_regex() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\A\s*").expect("static whitespace pattern is valid"))
}

/// Build the default whitespace skipper: a bare regex terminal with no emitted value.
pub fn default_skipper() -> Rc<ParserNode> {
    // A hand-rolled RegExpParser sharing the compiled pattern above, rather than going through
    // `RegExpParser::new` (which would recompile it per call to `default_skipper`).
    Rc::new(ParserNode::RegExp(RegExpParser {
        source: r"\s*".to_string(),
        sensitive: whitespace_regex().clone(),
        insensitive: whitespace_regex().clone(),
    }))
}
