//! Process body translation: one body form at a time, each extending the
//! graph from the builder's current state.

use crate::ast::Node;
use crate::builder::{ProcessBuilder, START_LABEL};
use crate::call::{read_call, CallForm};
use crate::error::{ArgumentError, CompileError, DispatchError, FormContext, GraphError};
use crate::expression::{negate, to_expression};
use graphchecker_model::{Action, StateId, Transition, Valuation};

type FormTranslator =
    fn(&mut CallForm<'_>, StateId, &mut ProcessBuilder) -> Result<(), CompileError>;

/// Translate one body form: a bare label keyword or a call form.
pub fn translate_body_form(node: &Node, b: &mut ProcessBuilder) -> Result<(), CompileError> {
    match node {
        Node::Keyword(name) => name_current_state(name, b),
        Node::List(children) => {
            let mut call = read_call(children)?;
            let form = call.fn_name();
            let translate: FormTranslator = match form {
                "!send" => send,
                "?receive" => receive,
                "goto" => goto,
                "if" => if_then_else,
                "let" | "select" => {
                    return Err(DispatchError::UnsupportedBodyForm(form.to_owned()).into())
                }
                other => return Err(DispatchError::UnknownBodyForm(other.to_owned()).into()),
            };
            let Some(from) = b.current() else {
                return Err(GraphError::Unreachable {
                    form: form.to_owned(),
                }
                .into());
            };
            translate(&mut call, from, b).in_form(form)
        }
        other => Err(DispatchError::UnrecognizedBodyExpression(other.kind()).into()),
    }
}

/// A bare label names the current position. Control falls through into it
/// from the current state, if that state is reachable.
fn name_current_state(name: &str, b: &mut ProcessBuilder) -> Result<(), CompileError> {
    if name == START_LABEL && b.current() == Some(b.initial()) {
        return Ok(());
    }
    let state = b.declare_label(name)?;
    if let Some(from) = b.current() {
        b.add_transition(Transition::epsilon(from, state));
    }
    b.set_current(Some(state));
    Ok(())
}

fn send(
    call: &mut CallForm<'_>,
    from: StateId,
    b: &mut ProcessBuilder,
) -> Result<(), CompileError> {
    let message = call.next_named_param(":message").symbol()?.to_owned();

    let mut valuation = Valuation::new();
    while !call.is_exhausted() {
        let key = call.next_positional_param().keyword()?;
        let value = call
            .next_positional_param()
            .node()
            .map_err(|_| ArgumentError::MissingValue {
                keyword: key.to_owned(),
            })?;
        if valuation.contains_key(key) {
            return Err(ArgumentError::DuplicateKeyword(key.to_owned()).into());
        }
        valuation.insert(key.to_owned(), to_expression(value)?);
    }

    let to = b.alloc_unnamed_state();
    b.add_transition(Transition {
        action: Some(Action::Send(message)),
        valuation: Some(valuation),
        ..Transition::epsilon(from, to)
    });
    b.set_current(Some(to));
    Ok(())
}

fn receive(
    call: &mut CallForm<'_>,
    from: StateId,
    b: &mut ProcessBuilder,
) -> Result<(), CompileError> {
    let message = call.next_named_param(":message").symbol()?.to_owned();
    call.finish()?;

    let to = b.alloc_unnamed_state();
    b.add_transition(Transition {
        action: Some(Action::Receive(message)),
        ..Transition::epsilon(from, to)
    });
    b.set_current(Some(to));
    Ok(())
}

fn goto(
    call: &mut CallForm<'_>,
    from: StateId,
    b: &mut ProcessBuilder,
) -> Result<(), CompileError> {
    let label = call.next_positional_param().keyword()?;
    call.finish()?;

    let to = b.jump_target(label)?;
    b.add_transition(Transition::epsilon(from, to));
    b.set_current(None);
    Ok(())
}

/// `(if guard then [else])`. Both branches start from the current state
/// and rejoin at a fresh state; a branch that ends unreachable contributes
/// no join edge, and if neither branch is reachable there is no join.
fn if_then_else(
    call: &mut CallForm<'_>,
    if_start: StateId,
    b: &mut ProcessBuilder,
) -> Result<(), CompileError> {
    let guard = call.next_positional_param().expression()?;
    let then_form = call.next_positional_param().node()?;
    let else_form = call.next_optional_param();
    call.finish()?;

    let then_start = b.alloc_unnamed_state();
    b.add_transition(Transition {
        action: Some(Action::Send("then".to_owned())),
        guard: Some(guard.clone()),
        ..Transition::epsilon(if_start, then_start)
    });
    b.set_current(Some(then_start));
    translate_body_form(then_form, b)?;
    let then_end = b.current();

    b.set_current(Some(if_start));
    let else_end = match else_form {
        Some(else_form) => {
            let else_start = b.alloc_unnamed_state();
            b.add_transition(Transition {
                guard: Some(negate(guard)),
                ..Transition::epsilon(if_start, else_start)
            });
            b.set_current(Some(else_start));
            translate_body_form(else_form, b)?;
            b.current()
        }
        None => None,
    };

    if then_end.is_none() && else_end.is_none() {
        b.set_current(None);
        return Ok(());
    }

    let if_end = b.alloc_unnamed_state();
    for (end, label) in [(then_end, "ifend"), (else_end, "elseend")] {
        if let Some(end) = end {
            b.add_transition(Transition {
                action: Some(Action::Send(label.to_owned())),
                ..Transition::epsilon(end, if_end)
            });
        }
    }
    b.set_current(Some(if_end));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::lexer::lex;
    use crate::parser::parse;
    use graphchecker_model::Expression;

    fn run(b: &mut ProcessBuilder, src: &str) -> Result<(), CompileError> {
        for node in parse(&lex(src).unwrap()).unwrap() {
            translate_body_form(&node, b)?;
        }
        Ok(())
    }

    fn fresh(src: &str) -> ProcessBuilder {
        let mut b = ProcessBuilder::new();
        run(&mut b, src).unwrap_or_else(|e| panic!("{}: {}", src, e));
        b
    }

    fn send_edge(from: u32, to: u32, message: &str) -> Transition {
        Transition {
            action: Some(Action::Send(message.to_owned())),
            ..Transition::epsilon(StateId(from), StateId(to))
        }
    }

    fn guard_foo_is_one() -> Expression {
        Expression::List(vec![
            Expression::reference("="),
            Expression::reference("foo"),
            Expression::Int(1),
        ])
    }

    #[test]
    fn send_without_fields_has_empty_valuation() {
        for src in ["(!send MessageName)", "(!send :message MessageName)"] {
            let b = fresh(src);
            assert_eq!(b.states().len(), 2);
            assert!(!b.states()[1].is_named());
            assert_eq!(
                b.transitions(),
                &[Transition {
                    valuation: Some(Valuation::new()),
                    ..send_edge(1, 2, "MessageName")
                }]
            );
            assert_eq!(b.transitions()[0].receive(), None);
            assert_eq!(b.current(), Some(StateId(2)));
        }
    }

    #[test]
    fn send_with_field_valuation() {
        let b = fresh("(!send :message MessageName :fieldOne (+ 1 var-one) :fieldTwo var-two)");
        let mut expected = Valuation::new();
        expected.insert(
            ":fieldOne".to_owned(),
            Expression::List(vec![
                Expression::reference("+"),
                Expression::Int(1),
                Expression::reference("var-one"),
            ]),
        );
        expected.insert(":fieldTwo".to_owned(), Expression::reference("var-two"));
        assert_eq!(b.transitions()[0].valuation.as_ref(), Some(&expected));
        assert_eq!(b.transitions()[0].send(), Some("MessageName"));
    }

    #[test]
    fn send_valuation_errors() {
        let cases = [
            (
                "(!send M :a)",
                ArgumentError::MissingValue {
                    keyword: ":a".into(),
                },
            ),
            ("(!send M :a 1 :a 2)", ArgumentError::DuplicateKeyword(":a".into())),
            (
                "(!send M x 1)",
                ArgumentError::KindMismatch {
                    expected: NodeKind::Keyword,
                    found: NodeKind::Symbol,
                },
            ),
        ];
        for (src, expected) in cases {
            let err = run(&mut ProcessBuilder::new(), src).unwrap_err();
            assert_eq!(err.forms(), vec!["!send"], "{}", src);
            assert_eq!(err.root(), &CompileError::Argument(expected), "{}", src);
        }
    }

    #[test]
    fn receive_has_only_a_receive_label() {
        for src in ["(?receive MessageName)", "(?receive :message MessageName)"] {
            let b = fresh(src);
            assert_eq!(
                b.transitions(),
                &[Transition {
                    action: Some(Action::Receive("MessageName".into())),
                    ..Transition::epsilon(StateId(1), StateId(2))
                }]
            );
            assert_eq!(b.current(), Some(StateId(2)));
        }
    }

    #[test]
    fn receive_rejects_a_valuation() {
        let err = run(&mut ProcessBuilder::new(), "(?receive M :f x)").unwrap_err();
        assert_eq!(
            err.root(),
            &CompileError::Argument(ArgumentError::TrailingArguments { count: 2 })
        );
    }

    #[test]
    fn goto_unknown_label_reserves_it_and_clears_current() {
        let b = fresh("(goto :unknown-state)");
        let target = b.state_for_name(":unknown-state").unwrap();
        assert_eq!(target, StateId(2));
        assert_eq!(b.transitions(), &[Transition::epsilon(StateId(1), target)]);
        assert_eq!(b.current(), None);
    }

    #[test]
    fn repeated_goto_targets_the_same_state() {
        let b = fresh("(if (= foo 1) (goto :out) (goto :out))");
        let out = b.state_for_name(":out").unwrap();
        let into_out: Vec<_> = b.transitions().iter().filter(|t| t.to == out).collect();
        assert_eq!(into_out.len(), 2);
        assert_eq!(b.states().iter().filter(|s| s.is_named()).count(), 2);
    }

    #[test]
    fn goto_known_label() {
        let mut b = ProcessBuilder::new();
        let known = b.alloc_named_state(":known-state").unwrap();
        run(&mut b, "(goto :known-state)").unwrap();
        assert_eq!(b.transitions(), &[Transition::epsilon(StateId(1), known)]);
        assert_eq!(b.states().len(), 2);
    }

    #[test]
    fn label_after_goto_resumes_without_fall_through() {
        let b = fresh("(goto :b) :a (!send M) :b");
        let a = b.state_for_name(":a").unwrap();
        let target = b.state_for_name(":b").unwrap();
        assert_eq!(
            b.transitions(),
            &[
                Transition::epsilon(StateId(1), target),
                Transition {
                    valuation: Some(Valuation::new()),
                    ..send_edge(a.0, 4, "M")
                },
                Transition::epsilon(StateId(4), target),
            ]
        );
        assert_eq!(b.current(), Some(target));
        assert!(b.unresolved_labels().is_empty());
    }

    #[test]
    fn label_from_unreachable_point_has_no_incoming_edge() {
        let mut b = ProcessBuilder::new();
        b.set_current(None);
        run(&mut b, ":some-state").unwrap();
        assert_eq!(b.current(), b.state_for_name(":some-state"));
        assert!(b.transitions().is_empty());
    }

    #[test]
    fn redeclaring_start_first_is_a_no_op() {
        let b = fresh(":start");
        assert_eq!(b.states().len(), 1);
        assert!(b.transitions().is_empty());
        assert_eq!(b.current(), Some(b.initial()));
    }

    #[test]
    fn redeclaring_start_later_collides() {
        let err = run(&mut ProcessBuilder::new(), "(!send M) :start").unwrap_err();
        assert_eq!(
            err,
            CompileError::Graph(GraphError::DuplicateStateName(":start".into()))
        );
    }

    #[test]
    fn declaring_a_label_twice_collides() {
        let err = run(&mut ProcessBuilder::new(), ":a (!send M) :a").unwrap_err();
        assert_eq!(
            err,
            CompileError::Graph(GraphError::DuplicateStateName(":a".into()))
        );
    }

    #[test]
    fn if_with_both_branches_joins() {
        let b = fresh("(if (= foo 1) (!send :message MessageA) (!send :message MessageB))");
        let empty = Some(Valuation::new());
        assert_eq!(b.states().len(), 6);
        assert_eq!(
            b.transitions(),
            &[
                Transition {
                    guard: Some(guard_foo_is_one()),
                    ..send_edge(1, 2, "then")
                },
                Transition {
                    valuation: empty.clone(),
                    ..send_edge(2, 3, "MessageA")
                },
                Transition {
                    guard: Some(negate(guard_foo_is_one())),
                    ..Transition::epsilon(StateId(1), StateId(4))
                },
                Transition {
                    valuation: empty,
                    ..send_edge(4, 5, "MessageB")
                },
                send_edge(3, 6, "ifend"),
                send_edge(5, 6, "elseend"),
            ]
        );
        assert_eq!(b.current(), Some(StateId(6)));
    }

    #[test]
    fn if_without_else_joins_then_branch_only() {
        let b = fresh("(if ok (?receive Ack))");
        assert_eq!(b.states().len(), 4);
        assert_eq!(b.transitions().len(), 3);
        assert_eq!(b.transitions()[2], send_edge(3, 4, "ifend"));
        assert_eq!(b.current(), Some(StateId(4)));
    }

    #[test]
    fn diverging_then_without_else_leaves_no_join() {
        let b = fresh("(if (= x 1) (goto :done))");
        assert_eq!(b.current(), None);
        // start, then-start, :done
        assert_eq!(b.states().len(), 3);
        assert!(b.transitions().iter().all(|t| t.send() != Some("ifend")));
    }

    #[test]
    fn one_diverging_branch_joins_the_other() {
        let b = fresh("(if c (goto :out) (!send M))");
        let joins: Vec<_> = b
            .transitions()
            .iter()
            .filter_map(|t| t.send())
            .filter(|s| s.ends_with("end"))
            .collect();
        assert_eq!(joins, vec!["elseend"]);
        assert!(b.current().is_some());
    }

    #[test]
    fn nested_errors_name_every_enclosing_form() {
        let err = run(&mut ProcessBuilder::new(), "(if c (if d (!send)))").unwrap_err();
        assert_eq!(err.forms(), vec!["if", "if", "!send"]);
        assert_eq!(
            err.root(),
            &CompileError::Argument(ArgumentError::MissingParameter)
        );
    }

    #[test]
    fn if_guard_must_be_an_expression() {
        let err = run(&mut ProcessBuilder::new(), "(if \"yes\" (!send M))").unwrap_err();
        assert!(matches!(err.root(), CompileError::Translation(_)));
    }

    #[test]
    fn forms_after_goto_are_unreachable() {
        let err = run(&mut ProcessBuilder::new(), "(goto :x) (!send M)").unwrap_err();
        assert_eq!(
            err,
            CompileError::Graph(GraphError::Unreachable {
                form: "!send".into()
            })
        );
    }

    #[test]
    fn unsupported_and_unknown_forms() {
        for (src, expected) in [
            ("(let ((x 1)) (!send M))", DispatchError::UnsupportedBodyForm("let".into())),
            (
                "(select (!send A) (!send B))",
                DispatchError::UnsupportedBodyForm("select".into()),
            ),
            ("(launch M)", DispatchError::UnknownBodyForm("launch".into())),
            ("42", DispatchError::UnrecognizedBodyExpression(NodeKind::Int)),
        ] {
            let err = run(&mut ProcessBuilder::new(), src).unwrap_err();
            assert_eq!(err, CompileError::Dispatch(expected), "{}", src);
        }
    }
}
