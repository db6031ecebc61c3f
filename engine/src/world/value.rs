//! The small tagged union backing every dynamic property value.
//!
//! Design note (spec.md §9): "dynamic nested property maps of unknown
//! arity" become a single `Value` enum with `Map<Value, Value>`-style
//! branches; closures stored as property values (dynamic `description`
//! etc.) are modelled as a sum of a static string, a bracket template,
//! or a computed closure, since the template form covers the
//! overwhelming majority of authored content without embedding code.

use std::fmt;
use std::rc::Rc;

use super::id::EntityId;
use super::World;

/// A dynamic property value.
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Text(String),
    Id(EntityId),
    List(Vec<Value>),
    /// A bracket-templated string, expanded at render time (spec.md §4.3).
    Template(String),
    /// An author-supplied closure computing a value from the world.
    Computed(Rc<dyn Fn(&World, &EntityId) -> Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Template(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<&EntityId> {
        match self {
            Value::Id(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn computed(f: impl Fn(&World, &EntityId) -> Value + 'static) -> Value {
        Value::Computed(Rc::new(f))
    }

    /// Resolves closures/templates into a plain string, for callers that
    /// don't need the full template-expansion machinery in `text::template`.
    pub fn resolve_text(&self, world: &World, subject: &EntityId) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Text(s) | Value::Template(s) => s.clone(),
            Value::Id(id) => id.to_string(),
            Value::List(items) => items
                .iter()
                .map(|v| v.resolve_text(world, subject))
                .collect::<Vec<_>>()
                .join(", "),
            Value::Computed(f) => f(world, subject).resolve_text(world, subject),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Text(s) => write!(f, "Text({s:?})"),
            Value::Id(id) => write!(f, "Id({id})"),
            Value::List(items) => write!(f, "List({items:?})"),
            Value::Template(s) => write!(f, "Template({s:?})"),
            Value::Computed(_) => write!(f, "Computed(..)"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<EntityId> for Value {
    fn from(v: EntityId) -> Self {
        Value::Id(v)
    }
}
