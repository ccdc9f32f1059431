use crate::lexer::tokens::TokenKind;

/// Operator precedence, weakest first. Every operator in the language is
/// left-associative, so during postfix conversion an operator pops all
/// stacked operators of equal or higher power before being pushed.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub enum BindingPower {
    Logical,
    Additive,
    Multiplicative,
    Primary,
}

/// How a token behaves inside an expression window.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ExprRole {
    Operand,
    Operator(BindingPower),
    OpenParen,
    CloseParen,
}

/// Classifies a token for the expression engine, or `None` for tokens that
/// have no business inside an expression. The match is exhaustive so a new
/// token kind cannot be forgotten here.
pub fn expr_role(kind: &TokenKind) -> Option<ExprRole> {
    match kind {
        TokenKind::Identifier(_)
        | TokenKind::Number(_)
        | TokenKind::String(_)
        | TokenKind::True
        | TokenKind::False => Some(ExprRole::Operand),

        // unary: consumes a single operand at evaluation time
        TokenKind::Not => Some(ExprRole::Operator(BindingPower::Primary)),

        TokenKind::Star | TokenKind::Slash => {
            Some(ExprRole::Operator(BindingPower::Multiplicative))
        }
        TokenKind::Plus | TokenKind::Dash => Some(ExprRole::Operator(BindingPower::Additive)),

        TokenKind::Equals
        | TokenKind::NotEquals
        | TokenKind::Greater
        | TokenKind::GreaterEquals
        | TokenKind::Less
        | TokenKind::LessEquals
        | TokenKind::And
        | TokenKind::Or => Some(ExprRole::Operator(BindingPower::Logical)),

        TokenKind::OpenParen => Some(ExprRole::OpenParen),
        TokenKind::CloseParen => Some(ExprRole::CloseParen),

        TokenKind::Assignment
        | TokenKind::Comma
        | TokenKind::NewLine
        | TokenKind::EOF
        | TokenKind::If
        | TokenKind::Else
        | TokenKind::EndIf
        | TokenKind::While
        | TokenKind::EndWhile => None,
    }
}
