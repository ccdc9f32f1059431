use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Builds a fatal error for a broken internal contract. These are never
    /// expected for any input, well-formed or not.
    pub fn internal(message: impl Into<String>, position: Position) -> Self {
        Error {
            internal_error: ErrorImpl::Internal {
                message: message.into(),
            },
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    /// Returns whether the error signals an internal contract violation
    /// rather than a problem with the source program. Fatal errors should be
    /// treated like assertion failures, not user-facing diagnostics.
    pub fn is_fatal(&self) -> bool {
        matches!(self.internal_error, ErrorImpl::Internal { .. })
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedDecimalSeparator => "UnexpectedDecimalSeparator",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnsupportedOperator { .. } => "UnsupportedOperator",
            ErrorImpl::IsolatedCarriageReturn => "IsolatedCarriageReturn",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::ExpectedNewline { .. } => "ExpectedNewline",
            ErrorImpl::ExpectedLineEnd { .. } => "ExpectedLineEnd",
            ErrorImpl::ExpectedStatement => "ExpectedStatement",
            ErrorImpl::ExpectedEndIf => "ExpectedEndIf",
            ErrorImpl::ExpectedEndWhile => "ExpectedEndWhile",
            ErrorImpl::ExpressionExpected => "ExpressionExpected",
            ErrorImpl::EmptyParentheses => "EmptyParentheses",
            ErrorImpl::UnmatchedCloseParen => "UnmatchedCloseParen",
            ErrorImpl::MissingClosingParen => "MissingClosingParen",
            ErrorImpl::ExtraClosingParen => "ExtraClosingParen",
            ErrorImpl::MisplacedComma => "MisplacedComma",
            ErrorImpl::UnterminatedExpressionList => "UnterminatedExpressionList",
            ErrorImpl::UnbalancedExpression => "UnbalancedExpression",
            ErrorImpl::Internal { .. } => "Internal",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedDecimalSeparator => ErrorTip::Suggestion(String::from(
                "A number can contain at most one decimal point",
            )),
            ErrorImpl::UnterminatedString => ErrorTip::Suggestion(String::from(
                "String literals must be closed with `\"` before the end of the line",
            )),
            ErrorImpl::UnsupportedOperator { op } => ErrorTip::Suggestion(format!(
                "Single `{}` is not an operator, did you mean `{}{}`?",
                op, op, op
            )),
            ErrorImpl::IsolatedCarriageReturn => ErrorTip::Suggestion(String::from(
                "A carriage return must be followed by a line feed",
            )),
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("Invalid number: `{}`", token))
            }
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token in expression: `{}`", token))
            }
            ErrorImpl::ExpectedNewline { token } => {
                ErrorTip::Suggestion(format!("Expected a newline, got `{}`", token))
            }
            ErrorImpl::ExpectedLineEnd { token } => ErrorTip::Suggestion(format!(
                "Expected a newline or end of input, got `{}`",
                token
            )),
            ErrorImpl::ExpectedStatement => ErrorTip::Suggestion(String::from(
                "A statement must be a function call, an assignment, `if` or `while`",
            )),
            ErrorImpl::ExpectedEndIf => ErrorTip::Suggestion(String::from(
                "Every `if` block must be closed with `endif`",
            )),
            ErrorImpl::ExpectedEndWhile => ErrorTip::Suggestion(String::from(
                "Every `while` block must be closed with `endwhile`",
            )),
            ErrorImpl::ExpressionExpected => {
                ErrorTip::Suggestion(String::from("Expected an expression here"))
            }
            ErrorImpl::EmptyParentheses => ErrorTip::Suggestion(String::from(
                "Parentheses in an expression must contain an expression",
            )),
            ErrorImpl::UnmatchedCloseParen => ErrorTip::Suggestion(String::from(
                "This closing parenthesis has no matching opening parenthesis",
            )),
            ErrorImpl::MissingClosingParen => ErrorTip::Suggestion(String::from(
                "Add the missing closing parenthesis at the end of the expression",
            )),
            ErrorImpl::ExtraClosingParen => {
                ErrorTip::Suggestion(String::from("Remove the extra closing parenthesis"))
            }
            ErrorImpl::MisplacedComma => ErrorTip::Suggestion(String::from(
                "Commas can only separate arguments inside a function call",
            )),
            ErrorImpl::UnterminatedExpressionList => ErrorTip::Suggestion(String::from(
                "The arguments of a function call must end with a closing parenthesis",
            )),
            ErrorImpl::UnbalancedExpression => ErrorTip::Suggestion(String::from(
                "The expression has leftover operands or operators",
            )),
            ErrorImpl::Internal { .. } => ErrorTip::Suggestion(String::from(
                "This is a bug in the parser, not in the source program",
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected decimal separator")]
    UnexpectedDecimalSeparator,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unsupported operator {op:?}")]
    UnsupportedOperator { op: String },
    #[error("carriage return without a following line feed")]
    IsolatedCarriageReturn,
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("expected a newline, got {token:?}")]
    ExpectedNewline { token: String },
    #[error("expected a newline or end of input, got {token:?}")]
    ExpectedLineEnd { token: String },
    #[error("expected a function call or an assignment")]
    ExpectedStatement,
    #[error("expected endif")]
    ExpectedEndIf,
    #[error("expected endwhile")]
    ExpectedEndWhile,
    #[error("expression expected")]
    ExpressionExpected,
    #[error("empty parenthesis not allowed in an expression")]
    EmptyParentheses,
    #[error("unmatched closing parenthesis")]
    UnmatchedCloseParen,
    #[error("missing closing parenthesis")]
    MissingClosingParen,
    #[error("extra closing parenthesis")]
    ExtraClosingParen,
    #[error("misplaced comma")]
    MisplacedComma,
    #[error("list of expressions must end with a closing parenthesis")]
    UnterminatedExpressionList,
    #[error("expression does not reduce to a single value")]
    UnbalancedExpression,
    #[error("internal parser error: {message}")]
    Internal { message: String },
}
