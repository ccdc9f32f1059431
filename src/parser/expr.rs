use crate::{
    ast::expressions::{CallExpr, ExprItem, Expression, ExpressionList},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position,
};

use super::{
    lookups::{expr_role, ExprRole},
    parser::Parser,
    stream::TokenSource,
};

/// How an expression window ended. Call arguments must end on a comma or on
/// the call's closing parenthesis; everything else ends at the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEnd {
    Line,
    Comma,
    Paren,
}

/// Parses one expression outside of a call argument (assignment right-hand
/// side, `if`/`while` condition). Stops at the newline without consuming it.
pub fn parse_expr<I: TokenSource>(parser: &mut Parser<I>) -> Result<Expression, Error> {
    let at = parser.position();
    let (window, _) = collect_expr_window(parser, false)?;
    build_postfix(window, at)
}

/// Parses the comma-separated argument expressions of a call, leaving the
/// cursor on the call's closing parenthesis.
pub fn parse_expr_list<I: TokenSource>(parser: &mut Parser<I>) -> Result<ExpressionList, Error> {
    let mut expressions = Vec::new();

    loop {
        let at = parser.position();
        let (window, end) = collect_expr_window(parser, true)?;
        expressions.push(build_postfix(window, at)?);

        match end {
            WindowEnd::Comma => {
                parser.advance()?;
            }
            WindowEnd::Paren => break,
            WindowEnd::Line => {
                return Err(Error::new(
                    ErrorImpl::UnterminatedExpressionList,
                    parser.position(),
                ));
            }
        }
    }

    Ok(ExpressionList { expressions })
}

/// Attempts to parse a call starting at the given identifier. Returns
/// `Ok(None)` when the identifier is not followed by `(`; the identifier is
/// consumed either way, so the caller decides what the lone identifier was.
/// On success the cursor is left on the call's closing parenthesis.
pub fn parse_call_expr<I: TokenSource>(
    parser: &mut Parser<I>,
    ident: &Token,
) -> Result<Option<CallExpr>, Error> {
    let TokenKind::Identifier(name) = &ident.kind else {
        return Err(Error::internal(
            "call parsing requires an identifier token",
            ident.span.start.clone(),
        ));
    };

    if parser.current_token() != ident {
        return Err(Error::internal(
            "call parsing must start at the callee identifier",
            parser.position(),
        ));
    }

    if parser.advance()?.kind != TokenKind::OpenParen {
        return Ok(None);
    }

    if parser.advance()?.kind == TokenKind::CloseParen {
        // a call without arguments
        return Ok(Some(CallExpr {
            name: name.clone(),
            args: ExpressionList::default(),
        }));
    }

    let args = parse_expr_list(parser)?;

    Ok(Some(CallExpr {
        name: name.clone(),
        args,
    }))
}

/// Collects the tokens of one expression, folding nested calls into single
/// operands as they are found. `in_call` starts the pending close-paren
/// counter at 1 so the argument knows which parenthesis ends the call.
/// The ending comma or parenthesis is not consumed and not part of the
/// window.
fn collect_expr_window<I: TokenSource>(
    parser: &mut Parser<I>,
    in_call: bool,
) -> Result<(Vec<ExprItem>, WindowEnd), Error> {
    let mut pending_close_parens: i32 = if in_call { 1 } else { 0 };
    let mut window: Vec<ExprItem> = Vec::new();
    let mut end = WindowEnd::Line;

    loop {
        let token = parser.current_token().clone();

        match &token.kind {
            TokenKind::NewLine | TokenKind::EOF => {
                break;
            }
            TokenKind::Comma if in_call => {
                // the comma accounts for a parenthesis picked up by the
                // next argument of the same call
                pending_close_parens -= 1;
                end = WindowEnd::Comma;
                break;
            }
            TokenKind::Identifier(_) => match parse_call_expr(parser, &token)? {
                Some(call) => {
                    window.push(ExprItem::Call(call));
                    parser.advance()?;
                }
                None => {
                    // not a call; the attempt consumed exactly the
                    // identifier, which becomes a plain operand
                    window.push(ExprItem::Token(token));
                }
            },
            TokenKind::OpenParen => {
                pending_close_parens += 1;
                window.push(ExprItem::Token(token));
                if parser.advance()?.kind == TokenKind::CloseParen {
                    return Err(Error::new(ErrorImpl::EmptyParentheses, parser.position()));
                }
            }
            TokenKind::CloseParen => {
                pending_close_parens -= 1;
                if in_call && pending_close_parens == 0 {
                    end = WindowEnd::Paren;
                    break;
                }
                window.push(ExprItem::Token(token));
                parser.advance()?;
            }
            _ => {
                window.push(ExprItem::Token(token));
                parser.advance()?;
            }
        }
    }

    if window.is_empty() {
        return Err(Error::new(ErrorImpl::ExpressionExpected, parser.position()));
    }

    if in_call {
        match end {
            WindowEnd::Paren => {}
            WindowEnd::Comma if pending_close_parens == 0 => {}
            _ => {
                let ends_in_close_paren = matches!(
                    window.last(),
                    Some(ExprItem::Token(token)) if token.kind == TokenKind::CloseParen
                );
                let error = if ends_in_close_paren {
                    ErrorImpl::MissingClosingParen
                } else {
                    ErrorImpl::MisplacedComma
                };
                return Err(Error::new(error, parser.position()));
            }
        }
    }

    if pending_close_parens > 0 {
        return Err(Error::new(
            ErrorImpl::MissingClosingParen,
            parser.position(),
        ));
    }
    if pending_close_parens < 0 {
        return Err(Error::new(ErrorImpl::ExtraClosingParen, parser.position()));
    }

    Ok((window, end))
}

/// Converts an infix window to postfix with an explicit operator stack
/// (shunting-yard). Operands go straight to the output; an operator first
/// pops every stacked operator of equal or higher binding power, which
/// makes the whole table left-associative. Parentheses are structural and
/// never appear in the output.
pub fn build_postfix(window: Vec<ExprItem>, at: Position) -> Result<Expression, Error> {
    let mut opstack: Vec<Token> = Vec::new();
    let mut items: Vec<ExprItem> = Vec::new();

    for item in window {
        let token = match item {
            ExprItem::Call(call) => {
                items.push(ExprItem::Call(call));
                continue;
            }
            ExprItem::Token(token) => token,
        };

        match expr_role(&token.kind) {
            Some(ExprRole::Operand) => items.push(ExprItem::Token(token)),
            Some(ExprRole::OpenParen) => opstack.push(token),
            Some(ExprRole::CloseParen) => loop {
                match opstack.pop() {
                    None => {
                        return Err(Error::new(
                            ErrorImpl::UnmatchedCloseParen,
                            token.span.start.clone(),
                        ));
                    }
                    Some(top) if top.kind == TokenKind::OpenParen => break,
                    Some(top) => items.push(ExprItem::Token(top)),
                }
            },
            Some(ExprRole::Operator(power)) => {
                loop {
                    let pops_stack_top = match opstack.last() {
                        Some(top) => matches!(
                            expr_role(&top.kind),
                            Some(ExprRole::Operator(top_power)) if top_power >= power
                        ),
                        None => false,
                    };
                    if !pops_stack_top {
                        break;
                    }
                    if let Some(top) = opstack.pop() {
                        items.push(ExprItem::Token(top));
                    }
                }
                opstack.push(token);
            }
            None => {
                let position = token.span.start.clone();
                let error = match token.kind {
                    TokenKind::Comma => ErrorImpl::MisplacedComma,
                    _ => ErrorImpl::UnexpectedToken {
                        token: token.to_string(),
                    },
                };
                return Err(Error::new(error, position));
            }
        }
    }

    while let Some(top) = opstack.pop() {
        if top.kind == TokenKind::OpenParen {
            return Err(Error::new(
                ErrorImpl::MissingClosingParen,
                top.span.start.clone(),
            ));
        }
        items.push(ExprItem::Token(top));
    }

    check_expr_complete(&items, &at)?;

    Ok(Expression { items })
}

/// Rejects postfix sequences that cannot evaluate to a single value, such
/// as `1 1 1 +` or a lone operator. Operands and calls push one value, `!`
/// replaces the top value, every other operator replaces the top two.
fn check_expr_complete(items: &[ExprItem], at: &Position) -> Result<(), Error> {
    let mut depth: i64 = 0;

    for item in items {
        let (takes, gives) = match item {
            ExprItem::Call(_) => (0, 1),
            ExprItem::Token(token) => match expr_role(&token.kind) {
                Some(ExprRole::Operand) => (0, 1),
                Some(ExprRole::Operator(_)) if token.kind == TokenKind::Not => (1, 1),
                Some(ExprRole::Operator(_)) => (2, 1),
                _ => {
                    return Err(Error::internal(
                        "postfix output may only contain operands and operators",
                        at.clone(),
                    ));
                }
            },
        };

        if depth < takes {
            return Err(Error::new(ErrorImpl::UnbalancedExpression, at.clone()));
        }
        depth += gives - takes;
    }

    if depth == 1 {
        Ok(())
    } else {
        Err(Error::new(ErrorImpl::UnbalancedExpression, at.clone()))
    }
}
