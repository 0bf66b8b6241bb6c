use crate::ast::Node;
use crate::error::TranslationError;
use graphchecker_model::Expression;

/// Translate a syntax node into an expression tree. Strings and keywords
/// have no expression form.
pub fn to_expression(node: &Node) -> Result<Expression, TranslationError> {
    match node {
        Node::List(children) => children
            .iter()
            .map(to_expression)
            .collect::<Result<Vec<_>, _>>()
            .map(Expression::List),
        Node::Symbol(name) => Ok(Expression::Ref(name.clone())),
        Node::Int(n) => Ok(Expression::Int(*n)),
        other => Err(TranslationError::UnhandledNode(other.kind())),
    }
}

/// `expr` wrapped as `(not expr)`.
pub fn negate(expr: Expression) -> Expression {
    Expression::List(vec![Expression::reference("not"), expr])
}
