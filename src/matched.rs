use std::collections::HashMap;

use crate::span::Range;
use crate::value::Value;

/// The named sub-values captured while matching, keyed by capture name.
pub type Captures = HashMap<String, Value>;

/// A successful match: the range consumed, the value computed, the flat list of values this
/// match contributes to an enclosing sequence, and whatever was captured along the way.
///
/// `children` and `value` answer different questions. `value` is this node's own result —
/// for a sequence or repetition, an assembled `Value::List`. `children` is what this node hands
/// upward when it sits directly inside another sequence: terminals contribute zero or one item,
/// a sequence contributes the concatenation of its own children's `children` (so a sequence
/// nested inside a sequence flattens away rather than appearing as a sub-list), and an atomizing
/// wrapper such as a token or an action contributes its own `value` as a single item.
///
/// Matches are immutable. They are built once, by the parser that succeeded, and never mutated
/// afterwards — a parent combining several matches builds a *new* `Match`, it never reaches back
/// into a child's.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub range: Range,
    pub value: Value,
    pub children: Vec<Value>,
    pub captures: Captures,
}

impl Match {
    pub fn from(&self) -> usize {
        self.range.from
    }

    pub fn to(&self) -> usize {
        self.range.to
    }

    /// The single-item contribution an atomizing wrapper (token, action) hands to an enclosing
    /// sequence: `value` itself, unless it's `Value::Unit`, in which case it contributes nothing.
    pub fn singleton_children(value: &Value) -> Vec<Value> {
        if value.is_unit() {
            Vec::new()
        } else {
            vec![value.clone()]
        }
    }

    /// Merge `other`'s captures into `self`'s, with `other`'s entries winning on key collision.
    ///
    /// This implements the right-biased, traversal-order merge described for capture
    /// propagation: callers fold children's matches into a parent in traversal order, so a later
    /// child's capture of the same name overwrites an earlier one.
    pub fn merge_captures_from(captures: &mut Captures, other: &Captures) {
        for (k, v) in other {
            captures.insert(k.clone(), v.clone());
        }
    }
}
