//! Named recursion without pointer cycles: a [`GrammarParser`] owns all of its rules by exclusive
//! ownership, and a [`ReferenceParser`] holds only a label, resolved against `options.grammar` at
//! match time. The parser tree stays acyclic; recursion happens through re-entry of `exec`.

use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::error::ConfigError;
use crate::matched::Match;
use crate::node::ParserNode;
use crate::options::{Internals, ParseOptions};

/// A named rule table. Matching a `GrammarParser` directly runs its first (declaration-order)
/// rule; its real purpose is to be the handle installed into `options.grammar` so that
/// [`ReferenceParser`] nodes elsewhere in the tree can resolve their labels.
pub struct GrammarParser {
    rules: IndexMap<String, Rc<ParserNode>>,
    /// A weak handle back to the `Rc<ParserNode>` that wraps this grammar, so `exec` can install
    /// a strong clone of itself into `options.grammar` without requiring the caller to already
    /// hold that `Rc`.
    self_handle: Weak<ParserNode>,
}

impl GrammarParser {
    /// Build a grammar node. Returns [`ConfigError::EmptyGrammar`] if `rules` is empty, or
    /// [`ConfigError::DuplicateRule`] if a name is repeated (construction takes an ordered list
    /// of pairs precisely so duplicates can be detected; an `IndexMap` built via `FromIterator`
    /// would silently keep only the last entry).
    pub fn build(rules: Vec<(String, Rc<ParserNode>)>) -> Result<Rc<ParserNode>, ConfigError> {
        if rules.is_empty() {
            return Err(ConfigError::EmptyGrammar);
        }

        let mut table = IndexMap::with_capacity(rules.len());
        for (name, parser) in rules {
            if table.insert(name.clone(), parser).is_some() {
                return Err(ConfigError::DuplicateRule(name));
            }
        }

        Ok(Rc::new_cyclic(|handle| {
            ParserNode::Grammar(GrammarParser {
                rules: table,
                self_handle: handle.clone(),
            })
        }))
    }

    pub fn rules(&self) -> &IndexMap<String, Rc<ParserNode>> {
        &self.rules
    }

    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        let handle = self
            .self_handle
            .upgrade()
            .expect("GrammarParser outlives the Rc it was built from");
        let (_, first_rule) = self
            .rules
            .first()
            .expect("GrammarParser::build rejects empty rule tables");
        let scoped = options.clone().with_grammar(handle);
        first_rule.exec(&scoped, internals)
    }
}

impl ParserNode {
    /// Borrow this node as a [`GrammarParser`], if it is one.
    pub fn as_grammar(&self) -> Option<&GrammarParser> {
        match self {
            ParserNode::Grammar(g) => Some(g),
            _ => None,
        }
    }
}

/// Calls into a named rule of `options.grammar` at match time, and additionally captures the
/// result under the rule's own label.
#[derive(Debug, Clone)]
pub struct ReferenceParser {
    pub label: String,
}

impl ReferenceParser {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn exec(&self, options: &ParseOptions<'_>, internals: &mut Internals) -> Option<Match> {
        let grammar = options
            .grammar
            .as_ref()
            .unwrap_or_else(|| panic!("{}", ConfigError::UnresolvedReference(self.label.clone())));
        let table = grammar
            .as_grammar()
            .expect("options.grammar always points at a GrammarParser node");
        let target = table
            .rules()
            .get(&self.label)
            .unwrap_or_else(|| panic!("{}", ConfigError::UnresolvedReference(self.label.clone())));

        let mut m = target.exec(options, internals)?;
        m.captures.insert(self.label.clone(), m.value.clone());
        Some(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::{OptionParser, SequenceParser};
    use crate::primitive::LiteralParser;
    use crate::value::Value;

    #[test]
    fn recursive_rule_terminates_on_empty_suffix() {
        // x: 'a' x?
        let x_ref = Rc::new(ParserNode::Reference(ReferenceParser::new("x")));
        let x_rule = Rc::new(ParserNode::Sequence(SequenceParser {
            children: vec![
                Rc::new(ParserNode::Literal(LiteralParser::new("a", true))),
                Rc::new(ParserNode::Option(OptionParser {
                    children: vec![
                        x_ref,
                        Rc::new(ParserNode::Sequence(SequenceParser { children: vec![] })),
                    ],
                })),
            ],
        }));

        let grammar = GrammarParser::build(vec![("x".to_string(), x_rule)]).unwrap();
        let mut internals = Internals::new();
        let options = ParseOptions::defaults("aaa").with_skip(false);
        let m = grammar.exec(&options, &mut internals).unwrap();
        assert_eq!(m.range.to, 3);
        assert!(matches!(m.value, Value::List(_)));
    }

    #[test]
    fn empty_grammar_is_rejected() {
        assert!(matches!(
            GrammarParser::build(vec![]).unwrap_err(),
            ConfigError::EmptyGrammar
        ));
    }

    #[test]
    fn duplicate_rule_is_rejected() {
        let leaf = Rc::new(ParserNode::Literal(LiteralParser::new("a", true)));
        let err = GrammarParser::build(vec![
            ("x".to_string(), leaf.clone()),
            ("x".to_string(), leaf),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRule(name) if name == "x"));
    }
}
