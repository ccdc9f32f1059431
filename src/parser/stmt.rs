use crate::{
    ast::{
        expressions::CallExpr,
        statements::{AssignmentStmt, IfStmt, Stmt, WhileStmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{
    expr::{parse_call_expr, parse_expr},
    parser::Parser,
    stream::TokenSource,
};

/// Parses one statement, dispatching on the current token. A leading
/// identifier is ambiguous between a call and an assignment and is resolved
/// speculatively; `if` and `while` open terminator-delimited blocks; a
/// newline is a blank line.
pub fn parse_stmt<I: TokenSource>(parser: &mut Parser<I>) -> Result<Stmt, Error> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Identifier(_) => parse_identifier_stmt(parser, token),
        TokenKind::If => Ok(Stmt::If(parse_if_stmt(parser)?)),
        TokenKind::While => Ok(Stmt::While(parse_while_stmt(parser)?)),
        TokenKind::NewLine => {
            parser.advance()?;
            Ok(Stmt::NoOp)
        }
        TokenKind::EOF => Ok(Stmt::NoOp),
        _ => Err(Error::internal(
            "expected a newline or end of input here",
            token.span.start,
        )),
    }
}

/// Parses statements until the current token is one of the terminator
/// keywords or the input ends; the enclosing construct consumes its
/// terminator and reports it when missing.
pub fn parse_block<I: TokenSource>(
    parser: &mut Parser<I>,
    terminators: &[TokenKind],
) -> Result<Vec<Stmt>, Error> {
    let mut body = Vec::new();

    while !terminators.contains(parser.current_kind()) && parser.has_tokens() {
        body.push(parse_stmt(parser)?);
    }

    Ok(body)
}

/// Disambiguates `name(...)` from `name = ...` by attempting the call
/// grammar under a checkpoint and rolling back to the identifier when the
/// attempt reports "not a call".
fn parse_identifier_stmt<I: TokenSource>(
    parser: &mut Parser<I>,
    ident: Token,
) -> Result<Stmt, Error> {
    parser.begin_checkpoint()?;

    let stmt = match parse_call_stmt(parser, &ident)? {
        Some(call) => {
            parser.commit_checkpoint()?;
            Stmt::Call(call)
        }
        None => {
            parser.rollback_checkpoint()?;
            match parse_assignment_stmt(parser, &ident)? {
                Some(assignment) => Stmt::Assignment(assignment),
                None => {
                    return Err(Error::new(ErrorImpl::ExpectedStatement, ident.span.start));
                }
            }
        }
    };

    // both grammars have already verified the terminator, so anything but a
    // newline or the end of input here is a broken invariant
    match parser.current_kind() {
        TokenKind::NewLine => {
            parser.advance()?;
        }
        TokenKind::EOF => {}
        _ => {
            return Err(Error::internal(
                "a parsed statement must end at a newline",
                parser.position(),
            ));
        }
    }

    Ok(stmt)
}

/// The statement-level call grammar: the call itself, then a mandatory
/// newline. Returns `Ok(None)` when the identifier turns out not to start a
/// call at all.
fn parse_call_stmt<I: TokenSource>(
    parser: &mut Parser<I>,
    ident: &Token,
) -> Result<Option<CallExpr>, Error> {
    let Some(call) = parse_call_expr(parser, ident)? else {
        return Ok(None);
    };

    if parser.current_kind() != &TokenKind::CloseParen {
        return Err(Error::internal(
            "a parsed call must land on its closing parenthesis",
            parser.position(),
        ));
    }

    let next = parser.advance()?.clone();
    if next.kind == TokenKind::NewLine {
        Ok(Some(call))
    } else {
        Err(Error::new(
            ErrorImpl::ExpectedNewline {
                token: next.to_string(),
            },
            next.span.start,
        ))
    }
}

/// The assignment grammar: identifier, `=`, expression, line end. Returns
/// `Ok(None)` when the token after the identifier is not `=`.
fn parse_assignment_stmt<I: TokenSource>(
    parser: &mut Parser<I>,
    ident: &Token,
) -> Result<Option<AssignmentStmt>, Error> {
    let TokenKind::Identifier(target) = &ident.kind else {
        return Err(Error::internal(
            "assignment parsing requires an identifier token",
            ident.span.start.clone(),
        ));
    };

    if parser.current_token() != ident {
        return Err(Error::internal(
            "assignment parsing must start at the target identifier",
            parser.position(),
        ));
    }

    if parser.advance()?.kind != TokenKind::Assignment {
        return Ok(None);
    }
    parser.advance()?;

    let value = parse_expr(parser)?;

    match parser.current_kind() {
        TokenKind::NewLine | TokenKind::EOF => Ok(Some(AssignmentStmt {
            target: target.clone(),
            value,
        })),
        _ => {
            let token = parser.current_token();
            Err(Error::new(
                ErrorImpl::ExpectedLineEnd {
                    token: token.to_string(),
                },
                token.span.start.clone(),
            ))
        }
    }
}

pub fn parse_if_stmt<I: TokenSource>(parser: &mut Parser<I>) -> Result<IfStmt, Error> {
    parser.advance()?;

    let condition = parse_expr(parser)?;
    expect_newline(parser)?;

    let then_body = parse_block(parser, &[TokenKind::Else, TokenKind::EndIf])?;

    let else_body = if parser.current_kind() == &TokenKind::Else {
        parser.advance()?;
        parse_block(parser, &[TokenKind::EndIf])?
    } else {
        Vec::new()
    };

    if parser.current_kind() == &TokenKind::EndIf {
        parser.advance()?;
        Ok(IfStmt {
            condition,
            then_body,
            else_body,
        })
    } else {
        Err(Error::new(ErrorImpl::ExpectedEndIf, parser.position()))
    }
}

pub fn parse_while_stmt<I: TokenSource>(parser: &mut Parser<I>) -> Result<WhileStmt, Error> {
    parser.advance()?;

    let condition = parse_expr(parser)?;
    expect_newline(parser)?;

    let body = parse_block(parser, &[TokenKind::EndWhile])?;

    if parser.current_kind() == &TokenKind::EndWhile {
        parser.advance()?;
        Ok(WhileStmt { condition, body })
    } else {
        Err(Error::new(ErrorImpl::ExpectedEndWhile, parser.position()))
    }
}

fn expect_newline<I: TokenSource>(parser: &mut Parser<I>) -> Result<(), Error> {
    if parser.current_kind() == &TokenKind::NewLine {
        parser.advance()?;
        Ok(())
    } else {
        let token = parser.current_token();
        Err(Error::new(
            ErrorImpl::ExpectedNewline {
                token: token.to_string(),
            },
            token.span.start.clone(),
        ))
    }
}
