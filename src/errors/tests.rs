//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(10, Rc::new("test.basic".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert!(!error.is_fatal());
}

#[test]
fn test_error_position() {
    let pos = Position(42, Rc::new("test.basic".to_string()));
    let error = Error::new(ErrorImpl::ExpressionExpected, pos.clone());

    assert_eq!(error.get_position().0, 42);
}

#[test]
fn test_internal_error_is_fatal() {
    let error = Error::internal("broken contract", Position::null());

    assert_eq!(error.get_error_name(), "Internal");
    assert!(error.is_fatal());
}

#[test]
fn test_syntax_errors_are_not_fatal() {
    let errors = [
        ErrorImpl::ExpectedEndIf,
        ErrorImpl::ExpectedEndWhile,
        ErrorImpl::MisplacedComma,
        ErrorImpl::MissingClosingParen,
        ErrorImpl::ExtraClosingParen,
        ErrorImpl::EmptyParentheses,
        ErrorImpl::UnbalancedExpression,
    ];

    for error_impl in errors {
        let error = Error::new(error_impl, Position::null());
        assert!(!error.is_fatal());
    }
}

#[test]
fn test_unsupported_operator_tip() {
    let error = Error::new(
        ErrorImpl::UnsupportedOperator {
            op: "&".to_string(),
        },
        Position::null(),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("&&")),
        ErrorTip::None => panic!("expected a suggestion"),
    }
}

#[test]
fn test_unrecognised_token_has_no_tip() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position::null(),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}
