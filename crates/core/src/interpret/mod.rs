//! Top-level interpreter: turns the syntax tree into a [`Model`].
//!
//! Recognized top-level forms:
//!
//! ```text
//! (defmessage [:name] Name [[:fields] (field [:name] F) (field F) ...])
//! (defprocess [[:name] Name] [:vars (v1 v2 ...)] body-form*)
//! ```
//!
//! Non-list nodes at top level are ignored. The first failing form aborts
//! the whole interpretation.

mod body;

use crate::ast::{Node, NodeKind};
use crate::builder::ProcessBuilder;
use crate::call::{read_call, CallForm};
use crate::error::{ArgumentError, CompileError, DispatchError, FormContext};
use crate::options::CompileOptions;
use graphchecker_model::{Message, Model, Process};

pub use body::translate_body_form;

pub fn interpret(nodes: &[Node], opts: &CompileOptions) -> Result<Model, CompileError> {
    let mut model = Model::default();

    for node in nodes {
        let Node::List(children) = node else {
            continue;
        };
        let mut call = read_call(children)?;
        tracing::debug!(form = call.fn_name(), "interpreting top-level form");
        match call.fn_name() {
            "defmessage" => {
                let message = defmessage(&mut call).in_form("defmessage")?;
                model.messages.push(message);
            }
            "defprocess" => {
                let process = defprocess(&mut call, opts).in_form("defprocess")?;
                model.processes.push(process);
            }
            other => return Err(DispatchError::UnknownTopLevelForm(other.to_owned()).into()),
        }
    }

    Ok(model)
}

pub(crate) fn defmessage(call: &mut CallForm<'_>) -> Result<Message, CompileError> {
    let name = call.next_named_param(":name").symbol()?.to_owned();

    let mut fields = Vec::new();
    while !call.is_exhausted() {
        let mut field = if fields.is_empty() {
            call.next_named_param(":fields").call()
        } else {
            call.next_positional_param().call()
        }
        .in_form("field")?;

        if field.fn_name() != "field" {
            return Err(DispatchError::UnexpectedForm {
                expected: "field".to_owned(),
                found: field.fn_name().to_owned(),
            }
            .into());
        }
        let field_name = field.next_named_param(":name").symbol().in_form("field")?;
        field.finish().in_form("field")?;
        fields.push(field_name.to_owned());
    }

    Ok(Message { name, fields })
}

pub(crate) fn defprocess(
    call: &mut CallForm<'_>,
    opts: &CompileOptions,
) -> Result<Process, CompileError> {
    // A leading keyword other than :name/:vars is the first body label.
    let name = match call.peek() {
        Some(Node::Keyword(k)) if k == ":name" => {
            Some(call.next_named_param(":name").symbol()?.to_owned())
        }
        Some(Node::Symbol(_)) => Some(call.next_positional_param().symbol()?.to_owned()),
        _ => None,
    };

    let mut b = ProcessBuilder::new();
    b.open_scope();
    if call.take_keyword(":vars") {
        for var in call.next_positional_param().list().in_form(":vars")? {
            let Node::Symbol(v) = var else {
                return Err(ArgumentError::KindMismatch {
                    expected: NodeKind::Symbol,
                    found: var.kind(),
                }
                .into());
            };
            b.bind_variable(v)?;
        }
    }

    for form in call.remaining() {
        translate_body_form(form, &mut b)?;
    }

    Ok(b.finish(name, opts)?)
}
