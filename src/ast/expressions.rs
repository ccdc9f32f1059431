use std::fmt::Display;

use crate::lexer::tokens::Token;

/// A function call, either a whole statement or an operand inside an
/// expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub name: String,
    pub args: ExpressionList,
}

impl Display for CallExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.args)
    }
}

/// One element of an expression's postfix sequence. Nested calls are folded
/// into a single operand during window extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprItem {
    Token(Token),
    Call(CallExpr),
}

impl Display for ExprItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprItem::Token(token) => write!(f, "{}", token),
            ExprItem::Call(call) => write!(f, "{}", call),
        }
    }
}

/// An operand/operator sequence in postfix order. Evaluating it left to
/// right with a stack, every operator finds its operands already on the
/// stack and exactly one value remains at the end; the parser rejects
/// sequences that would break this.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub items: Vec<ExprItem>,
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.items
                .iter()
                .map(|item| item.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        )
    }
}

/// Positional call arguments, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpressionList {
    pub expressions: Vec<Expression>,
}

impl Display for ExpressionList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.expressions
                .iter()
                .map(|expression| expression.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
