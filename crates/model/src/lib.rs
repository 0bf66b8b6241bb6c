//! graphchecker-model: the compiled model handed to the conformance checker.
//!
//! A [`Model`] holds every message schema and every process graph produced
//! from one source text. Process graphs are labeled transition systems:
//! [`State`]s connected by [`Transition`]s that carry send/receive labels,
//! guards and valuations. All types are plain data and serialize with serde.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ──────────────────────────────────────────────
// Model
// ──────────────────────────────────────────────

/// The complete compiled output: all message schemas plus all process graphs,
/// in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub messages: Vec<Message>,
    pub processes: Vec<Process>,
}

impl Model {
    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.name == name)
    }

    /// Serialize the whole model to a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

// ──────────────────────────────────────────────
// Messages
// ──────────────────────────────────────────────

/// A message schema. Field order is declaration order; duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub name: String,
    pub fields: Vec<String>,
}

/// Renders the schema back as a `defmessage` form that compiles to itself.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(defmessage {}", self.name)?;
        for field in &self.fields {
            write!(f, " (field {})", field)?;
        }
        write!(f, ")")
    }
}

// ──────────────────────────────────────────────
// Process graphs
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableId(pub u32);

/// A graph state. Named states are addressable as labels (`:start`,
/// `:goal`); unnamed states are reachable only through edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl State {
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

/// The communication label of a transition. A transition sends or receives
/// at most one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Action {
    Send(String),
    Receive(String),
}

/// Field keyword (e.g. `:amount`) to the expression computing its value.
pub type Valuation = BTreeMap<String, Expression>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    /// `Some` (possibly empty) on every send produced from a `!send` form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuation: Option<Valuation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guard: Option<Expression>,
}

impl Transition {
    /// An unlabeled edge.
    pub fn epsilon(from: StateId, to: StateId) -> Self {
        Transition {
            from,
            to,
            action: None,
            valuation: None,
            guard: None,
        }
    }

    pub fn send(&self) -> Option<&str> {
        match &self.action {
            Some(Action::Send(m)) => Some(m),
            _ => None,
        }
    }

    pub fn receive(&self) -> Option<&str> {
        match &self.action {
            Some(Action::Receive(m)) => Some(m),
            _ => None,
        }
    }
}

/// A process variable introduced by a lexical binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
    pub name: String,
}

/// One compiled process graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub vars: Vec<Variable>,
    pub initial: StateId,
    pub states: Vec<State>,
    pub transitions: Vec<Transition>,
}

impl Process {
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    pub fn state_named(&self, name: &str) -> Option<&State> {
        self.states
            .iter()
            .find(|s| s.name.as_deref() == Some(name))
    }

    /// Outgoing transitions of `id`, in recording order.
    pub fn transitions_from(&self, id: StateId) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.from == id)
    }
}

// ──────────────────────────────────────────────
// Expressions
// ──────────────────────────────────────────────

/// An unevaluated expression used for guards and valuations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Expression {
    Ref(String),
    Int(i64),
    List(Vec<Expression>),
}

impl Expression {
    pub fn reference(name: impl Into<String>) -> Self {
        Expression::Ref(name.into())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Ref(name) => write!(f, "{}", name),
            Expression::Int(n) => write!(f, "{}", n),
            Expression::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}
