//! Graph state for one process under construction.
//!
//! The builder owns every state and transition of the process. State ids
//! are handed out from a counter starting at 1, which is always the implicit
//! `:start` state. `current` is the open end of the path being built; `None`
//! marks a point that control cannot reach (after an unconditional `goto`).

use crate::error::GraphError;
use crate::options::CompileOptions;
use graphchecker_model::{Process, State, StateId, Transition, Variable, VariableId};
use std::collections::{BTreeSet, HashMap};

/// Name of the implicit initial state.
pub const START_LABEL: &str = ":start";

#[derive(Debug)]
pub struct ProcessBuilder {
    next_state: u32,
    next_variable: u32,
    initial: StateId,
    current: Option<StateId>,
    states: Vec<State>,
    transitions: Vec<Transition>,
    named: HashMap<String, StateId>,
    /// Names placed by a label form (plus `:start`). A named state outside
    /// this set was only ever the target of a forward `goto`.
    declared: BTreeSet<String>,
    scopes: Vec<HashMap<String, Variable>>,
    variables: Vec<Variable>,
}

impl Default for ProcessBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessBuilder {
    pub fn new() -> Self {
        let mut b = ProcessBuilder {
            next_state: 1,
            next_variable: 0,
            initial: StateId(1),
            current: None,
            states: Vec::new(),
            transitions: Vec::new(),
            named: HashMap::new(),
            declared: BTreeSet::new(),
            scopes: Vec::new(),
            variables: Vec::new(),
        };
        let start = b.push_state(Some(START_LABEL.to_owned()));
        b.named.insert(START_LABEL.to_owned(), start);
        b.declared.insert(START_LABEL.to_owned());
        b.initial = start;
        b.current = Some(start);
        b
    }

    // -- States and transitions ------------------------------------

    fn push_state(&mut self, name: Option<String>) -> StateId {
        let id = StateId(self.next_state);
        self.next_state += 1;
        tracing::trace!(state = %id, name = name.as_deref().unwrap_or(""), "allocated state");
        self.states.push(State { id, name });
        id
    }

    pub fn alloc_unnamed_state(&mut self) -> StateId {
        self.push_state(None)
    }

    pub fn alloc_named_state(&mut self, name: &str) -> Result<StateId, GraphError> {
        if self.named.contains_key(name) {
            return Err(GraphError::DuplicateStateName(name.to_owned()));
        }
        let id = self.push_state(Some(name.to_owned()));
        self.named.insert(name.to_owned(), id);
        Ok(id)
    }

    pub fn state_for_name(&self, name: &str) -> Option<StateId> {
        self.named.get(name).copied()
    }

    pub fn add_transition(&mut self, t: Transition) {
        tracing::trace!(from = %t.from, to = %t.to, "recorded transition");
        self.transitions.push(t);
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn current(&self) -> Option<StateId> {
        self.current
    }

    pub fn set_current(&mut self, state: Option<StateId>) {
        self.current = state;
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    // -- Labels ------------------------------------------------------

    /// The state a label form names: a state reserved earlier by a forward
    /// `goto`, or a fresh one. A label may be declared only once.
    pub fn declare_label(&mut self, name: &str) -> Result<StateId, GraphError> {
        if self.declared.contains(name) {
            return Err(GraphError::DuplicateStateName(name.to_owned()));
        }
        let id = match self.state_for_name(name) {
            Some(id) => id,
            None => self.alloc_named_state(name)?,
        };
        self.declared.insert(name.to_owned());
        Ok(id)
    }

    /// The state a `goto` jumps to, reserving it if not yet declared.
    pub fn jump_target(&mut self, name: &str) -> Result<StateId, GraphError> {
        match self.state_for_name(name) {
            Some(id) => Ok(id),
            None => self.alloc_named_state(name),
        }
    }

    /// Jump targets that no label form has declared, in name order.
    pub fn unresolved_labels(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .named
            .keys()
            .filter(|n| !self.declared.contains(n.as_str()))
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    // -- Lexical scopes ----------------------------------------------

    pub fn open_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn close_scope(&mut self) -> Result<(), GraphError> {
        self.scopes.pop().map(|_| ()).ok_or(GraphError::NoOpenScope)
    }

    /// Bind `name` in the innermost scope.
    pub fn bind_variable(&mut self, name: &str) -> Result<VariableId, GraphError> {
        let scope = self.scopes.last_mut().ok_or(GraphError::NoOpenScope)?;
        if scope.contains_key(name) {
            return Err(GraphError::DuplicateVariable(name.to_owned()));
        }
        let v = Variable {
            id: VariableId(self.next_variable),
            name: name.to_owned(),
        };
        self.next_variable += 1;
        scope.insert(name.to_owned(), v.clone());
        let id = v.id;
        self.variables.push(v);
        Ok(id)
    }

    /// Innermost binding of `name`.
    pub fn resolve_variable(&self, name: &str) -> Result<&Variable, GraphError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .ok_or_else(|| GraphError::UnresolvedVariable(name.to_owned()))
    }

    // -- Completion --------------------------------------------------

    /// Close the graph into a [`Process`]. Every variable ever bound is
    /// recorded, whether or not its scope is still open.
    pub fn finish(
        self,
        name: Option<String>,
        opts: &CompileOptions,
    ) -> Result<Process, GraphError> {
        if !opts.allow_unresolved_labels {
            if let Some(label) = self.unresolved_labels().first() {
                return Err(GraphError::UnresolvedLabel((*label).to_owned()));
            }
        }
        tracing::debug!(
            process = name.as_deref().unwrap_or("<anonymous>"),
            states = self.states.len(),
            transitions = self.transitions.len(),
            "finished process graph"
        );
        Ok(Process {
            name,
            vars: self.variables,
            initial: self.initial,
            states: self.states,
            transitions: self.transitions,
        })
    }
}
