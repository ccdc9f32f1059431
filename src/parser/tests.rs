//! Unit tests for the parser module.
//!
//! This module contains tests for:
//! - The checkpointing token stream (replay, single-checkpoint invariant)
//! - Infix-to-postfix conversion and the completeness check
//! - Statement parsing and call/assignment disambiguation
//! - Error cases

use std::cell::Cell;
use std::rc::Rc;

use crate::ast::{expressions::ExprItem, statements::Stmt};
use crate::errors::errors::Error;
use crate::lexer::{
    lexer::{tokenize, Lexer},
    tokens::{Token, TokenKind},
};
use crate::Position;

use super::expr::build_postfix;
use super::parser::parse_source;
use super::stream::TokenStream;

struct CountingSource {
    tokens: std::vec::IntoIter<Token>,
    pulls: Rc<Cell<usize>>,
}

impl Iterator for CountingSource {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pulls.set(self.pulls.get() + 1);
        self.tokens.next().map(Ok)
    }
}

fn stream_of(source: &str) -> TokenStream<Lexer> {
    let lexer = Lexer::new(source.to_string(), Some("test.basic".to_string()));
    let file = lexer.file();
    TokenStream::new(lexer, file).unwrap()
}

fn window_of(source: &str) -> Vec<ExprItem> {
    tokenize(source.to_string(), Some("test.basic".to_string()))
        .unwrap()
        .into_iter()
        .filter(|token| token.kind != TokenKind::EOF)
        .map(ExprItem::Token)
        .collect()
}

fn postfix_of(source: &str) -> String {
    build_postfix(window_of(source), Position::null())
        .unwrap()
        .to_string()
}

// --- token stream ---

#[test]
fn test_stream_current_and_advance() {
    let mut stream = stream_of("a + b");

    assert_eq!(
        stream.current().kind,
        TokenKind::Identifier("a".to_string())
    );
    assert_eq!(stream.advance().unwrap().kind, TokenKind::Plus);
    assert_eq!(
        stream.advance().unwrap().kind,
        TokenKind::Identifier("b".to_string())
    );
}

#[test]
fn test_stream_synthesizes_end_of_input() {
    let mut stream = stream_of("a");

    assert_eq!(stream.advance().unwrap().kind, TokenKind::EOF);
    assert_eq!(stream.advance().unwrap().kind, TokenKind::EOF);
    assert!(!stream.has_tokens());
}

#[test]
fn test_stream_commit_keeps_position() {
    let mut stream = stream_of("a + b");

    stream.begin_checkpoint().unwrap();
    stream.advance().unwrap();
    stream.advance().unwrap();
    stream.commit_checkpoint().unwrap();

    assert_eq!(
        stream.current().kind,
        TokenKind::Identifier("b".to_string())
    );
}

#[test]
fn test_stream_rollback_replays_without_rescanning() {
    let tokens = tokenize("a + b - c".to_string(), None).unwrap();
    let pulls = Rc::new(Cell::new(0));
    let source = CountingSource {
        tokens: tokens.into_iter(),
        pulls: Rc::clone(&pulls),
    };

    let mut stream = TokenStream::new(source, Rc::new("test.basic".to_string())).unwrap();
    assert_eq!(pulls.get(), 1);

    stream.begin_checkpoint().unwrap();
    let first: Vec<TokenKind> = (0..3)
        .map(|_| stream.advance().unwrap().kind.clone())
        .collect();
    assert_eq!(pulls.get(), 4);

    stream.rollback_checkpoint().unwrap();
    assert_eq!(
        stream.current().kind,
        TokenKind::Identifier("a".to_string())
    );

    let replayed: Vec<TokenKind> = (0..3)
        .map(|_| stream.advance().unwrap().kind.clone())
        .collect();

    // the replay is byte-for-byte the recorded run and never re-pulls
    assert_eq!(first, replayed);
    assert_eq!(pulls.get(), 4);

    assert_eq!(
        stream.advance().unwrap().kind,
        TokenKind::Identifier("c".to_string())
    );
    assert_eq!(pulls.get(), 5);
}

#[test]
fn test_stream_rejects_second_checkpoint() {
    let mut stream = stream_of("a b c");

    stream.begin_checkpoint().unwrap();
    let error = stream.begin_checkpoint().unwrap_err();

    assert!(error.is_fatal());
}

#[test]
fn test_stream_rejects_checkpoint_while_draining() {
    let mut stream = stream_of("a b c");

    stream.begin_checkpoint().unwrap();
    stream.advance().unwrap();
    stream.rollback_checkpoint().unwrap();

    let error = stream.begin_checkpoint().unwrap_err();
    assert!(error.is_fatal());

    // draining the buffer makes a new checkpoint legal again
    stream.advance().unwrap();
    stream.begin_checkpoint().unwrap();
}

#[test]
fn test_stream_commit_requires_active_checkpoint() {
    let mut stream = stream_of("a");

    assert!(stream.commit_checkpoint().unwrap_err().is_fatal());
    assert!(stream.rollback_checkpoint().unwrap_err().is_fatal());
}

// --- postfix conversion ---

#[test]
fn test_postfix_relational_chain() {
    assert_eq!(postfix_of("10 + 20 == 30 + 40"), "10 20 + 30 40 + ==");
}

#[test]
fn test_postfix_parentheses() {
    assert_eq!(postfix_of("(10 + 20) * 2"), "10 20 + 2 *");
}

#[test]
fn test_postfix_precedence() {
    assert_eq!(postfix_of("1 + 2 * 3"), "1 2 3 * +");
}

#[test]
fn test_postfix_left_associativity() {
    assert_eq!(postfix_of("10 - 4 - 3"), "10 4 - 3 -");
}

#[test]
fn test_postfix_unary_not() {
    assert_eq!(postfix_of("!true && false"), "true ! false &&");
}

#[test]
fn test_postfix_logical_and_relational_share_precedence() {
    assert_eq!(postfix_of("a == b && c"), "a b == c &&");
}

#[test]
fn test_postfix_unmatched_close_paren() {
    let error = build_postfix(window_of("1 + 2)"), Position::null()).unwrap_err();
    assert_eq!(error.get_error_name(), "UnmatchedCloseParen");
}

#[test]
fn test_postfix_rejects_adjacent_operands() {
    let error = build_postfix(window_of("10 20"), Position::null()).unwrap_err();
    assert_eq!(error.get_error_name(), "UnbalancedExpression");
}

#[test]
fn test_postfix_rejects_dangling_operator() {
    let error = build_postfix(window_of("+ 1"), Position::null()).unwrap_err();
    assert_eq!(error.get_error_name(), "UnbalancedExpression");
}

#[test]
fn test_postfix_rejects_misplaced_comma() {
    let error = build_postfix(window_of("1 , 2"), Position::null()).unwrap_err();
    assert_eq!(error.get_error_name(), "MisplacedComma");
}

// --- statements ---

#[test]
fn test_parse_zero_arg_call() {
    let program = parse_source("foo()\n".to_string(), None).unwrap();

    assert_eq!(program.len(), 1);
    let Stmt::Call(call) = &program[0] else {
        panic!("expected a call, got {:?}", program[0]);
    };
    assert_eq!(call.name, "foo");
    assert!(call.args.expressions.is_empty());
}

#[test]
fn test_parse_assignment() {
    let program = parse_source("foo = 1\n".to_string(), None).unwrap();

    assert_eq!(program.len(), 1);
    let Stmt::Assignment(assignment) = &program[0] else {
        panic!("expected an assignment, got {:?}", program[0]);
    };
    assert_eq!(assignment.target, "foo");
    assert_eq!(assignment.value.to_string(), "1");
}

#[test]
fn test_parse_bare_identifier_fails() {
    let error = parse_source("foo\n".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "ExpectedStatement");
    assert!(!error.is_fatal());
}

#[test]
fn test_parse_call_with_args() {
    let program = parse_source("foo(1, 2 + 3)\n".to_string(), None).unwrap();

    let Stmt::Call(call) = &program[0] else {
        panic!("expected a call");
    };
    assert_eq!(call.args.expressions.len(), 2);
    assert_eq!(call.args.expressions[0].to_string(), "1");
    assert_eq!(call.args.expressions[1].to_string(), "2 3 +");
}

#[test]
fn test_parse_nested_call() {
    let program = parse_source("foo(bar(1), 2)\n".to_string(), None).unwrap();

    let Stmt::Call(call) = &program[0] else {
        panic!("expected a call");
    };
    assert_eq!(call.args.expressions.len(), 2);

    let ExprItem::Call(inner) = &call.args.expressions[0].items[0] else {
        panic!("expected a nested call operand");
    };
    assert_eq!(inner.name, "bar");
    assert_eq!(inner.args.expressions.len(), 1);
}

#[test]
fn test_parse_call_inside_expression() {
    let program = parse_source("x = f(2) * 3\n".to_string(), None).unwrap();

    let Stmt::Assignment(assignment) = &program[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(assignment.value.to_string(), "f(2) 3 *");
}

#[test]
fn test_parse_assignment_with_call_after_rollback() {
    let program = parse_source("foo = bar(1) + 2\n".to_string(), None).unwrap();

    let Stmt::Assignment(assignment) = &program[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(assignment.target, "foo");
    assert_eq!(assignment.value.to_string(), "bar(1) 2 +");
}

#[test]
fn test_parse_if_else() {
    let source = "if a > 0\n  x = 1\nelse\n  x = 2\nendif\n";
    let program = parse_source(source.to_string(), None).unwrap();

    assert_eq!(program.len(), 2); // the conditional and the trailing blank line
    let Stmt::If(if_stmt) = &program[0] else {
        panic!("expected an if statement");
    };
    assert_eq!(if_stmt.condition.to_string(), "a 0 >");
    assert_eq!(if_stmt.then_body.len(), 1);
    assert!(matches!(
        &if_stmt.then_body[0],
        Stmt::Assignment(assignment) if assignment.target == "x"
    ));
    // the newline right after `else` parses as a blank line in the branch
    assert_eq!(if_stmt.else_body.len(), 2);
    assert!(matches!(if_stmt.else_body[0], Stmt::NoOp));
    assert!(matches!(
        &if_stmt.else_body[1],
        Stmt::Assignment(assignment) if assignment.value.to_string() == "2"
    ));
    assert!(matches!(program[1], Stmt::NoOp));
}

#[test]
fn test_parse_if_without_else() {
    let source = "if a\n  f()\nendif\n";
    let program = parse_source(source.to_string(), None).unwrap();

    let Stmt::If(if_stmt) = &program[0] else {
        panic!("expected an if statement");
    };
    assert_eq!(if_stmt.then_body.len(), 1);
    assert!(if_stmt.else_body.is_empty());
}

#[test]
fn test_parse_missing_endif() {
    let source = "if a > 0\n  x = 1\n";
    let error = parse_source(source.to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "ExpectedEndIf");
}

#[test]
fn test_parse_while() {
    let source = "x = 0\nwhile x < 3\n  x = x + 1\nendwhile\n";
    let program = parse_source(source.to_string(), None).unwrap();

    assert_eq!(program.len(), 3);
    let Stmt::While(while_stmt) = &program[1] else {
        panic!("expected a while statement");
    };
    assert_eq!(while_stmt.condition.to_string(), "x 3 <");
    assert_eq!(while_stmt.body.len(), 1);
}

#[test]
fn test_parse_missing_endwhile() {
    let source = "while x < 3\n  x = x + 1\n";
    let error = parse_source(source.to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "ExpectedEndWhile");
}

#[test]
fn test_parse_condition_needs_newline() {
    let error = parse_source("if a > 0".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "ExpectedNewline");
}

#[test]
fn test_parse_empty_condition() {
    let error = parse_source("if\nendif\n".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "ExpressionExpected");
}

#[test]
fn test_parse_trailing_comma_in_call() {
    let error = parse_source("foo(1,)\n".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "ExpressionExpected");
}

#[test]
fn test_parse_extra_close_paren() {
    let error = parse_source("x = (1 + 1))\n".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "ExtraClosingParen");
}

#[test]
fn test_parse_missing_close_paren() {
    let error = parse_source("x = (1 + 2\n".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "MissingClosingParen");
}

#[test]
fn test_parse_unclosed_call_arguments() {
    let error = parse_source("x = f((1)\n".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "MissingClosingParen");
}

#[test]
fn test_parse_empty_parens_in_expression() {
    let error = parse_source("x = 1 + ()\n".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "EmptyParentheses");
}

#[test]
fn test_parse_misplaced_comma_outside_call() {
    let error = parse_source("x = 1, 2\n".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "MisplacedComma");
}

#[test]
fn test_parse_blank_lines_produce_noops() {
    let program = parse_source("\n\nx = 1\n\n".to_string(), None).unwrap();

    assert_eq!(program.len(), 4);
    assert!(matches!(program[0], Stmt::NoOp));
    assert!(matches!(program[1], Stmt::NoOp));
    assert!(matches!(program[2], Stmt::Assignment(_)));
    assert!(matches!(program[3], Stmt::NoOp));
}

#[test]
fn test_parse_assignment_at_end_of_input() {
    let program = parse_source("x = 1".to_string(), None).unwrap();

    assert_eq!(program.len(), 1);
    assert!(matches!(program[0], Stmt::Assignment(_)));
}

#[test]
fn test_parse_call_requires_line_end() {
    let error = parse_source("foo() x\n".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "ExpectedNewline");
    assert!(!error.is_fatal());
}

#[test]
fn test_parse_statement_cannot_start_with_operator() {
    let error = parse_source("+ x\n".to_string(), None).unwrap_err();

    assert!(error.is_fatal());
}

#[test]
fn test_parse_is_idempotent() {
    let source = "x = 0\nwhile x < 3\n  x = x + 1\nendwhile\n";

    let first = parse_source(source.to_string(), None).unwrap();
    let second = parse_source(source.to_string(), None).unwrap();

    assert_eq!(first, second);
}
