use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// The domain datum produced by a successful match.
///
/// The core engine only needs to know about a handful of shapes: the text a terminal matched,
/// the list a combinator assembled from its children, and the absence of an intrinsic value.
/// Anything richer than that is the business of [`Action`](crate::action::ActionParser)
/// callbacks, which may stash arbitrary data behind [`Value::Dynamic`].
#[derive(Clone)]
pub enum Value {
    /// No intrinsic value (e.g. a suppressed literal, an edge assertion).
    Unit,
    /// Matched text, or a literal string value.
    Str(String),
    /// The ordered values produced by a sequence or repetition's children.
    List(Vec<Value>),
    /// An escape hatch for semantic actions that compute something outside this enum's shapes.
    Dynamic(Rc<dyn Any>),
}

impl Value {
    /// Borrow the value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Borrow the value as a list of children, if it is one.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Whether this value carries no information at all.
    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "Unit"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::List(items) => write!(f, "List({items:?})"),
            Value::Dynamic(_) => write!(f, "Dynamic(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            // Dynamic values are opaque; two Dynamic values are never considered equal since we
            // have no way to compare their contents.
            _ => false,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}
