//! Parser driver and entry points.
//!
//! The `Parser` struct owns the checkpointing token stream and offers the
//! cursor helpers the grammar functions in `stmt` and `expr` build on. The
//! `parse` entry point collects statements until end of input; blank lines
//! appear in the output as `NoOp` nodes.

use crate::{
    ast::statements::Stmt,
    errors::errors::Error,
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{
    stmt::parse_stmt,
    stream::{TokenSource, TokenStream},
};

/// The main parser structure. It wraps the token stream and tracks nothing
/// else; all grammar state lives on the call stack.
pub struct Parser<I: TokenSource> {
    stream: TokenStream<I>,
}

impl<I: TokenSource> Parser<I> {
    pub fn new(stream: TokenStream<I>) -> Self {
        Parser { stream }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.stream.current()
    }

    /// Returns the kind of the current token.
    pub fn current_kind(&self) -> &TokenKind {
        &self.stream.current().kind
    }

    /// Advances to the next token and returns it.
    pub fn advance(&mut self) -> Result<&Token, Error> {
        self.stream.advance()
    }

    /// Returns the source position of the current token.
    pub fn position(&self) -> Position {
        self.stream.current().span.start.clone()
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.stream.has_tokens()
    }

    pub fn begin_checkpoint(&mut self) -> Result<(), Error> {
        self.stream.begin_checkpoint()
    }

    pub fn commit_checkpoint(&mut self) -> Result<(), Error> {
        self.stream.commit_checkpoint()
    }

    pub fn rollback_checkpoint(&mut self) -> Result<(), Error> {
        self.stream.rollback_checkpoint()
    }
}

/// Parses a stream of tokens into an ordered list of statements.
///
/// This is the main entry point for parsing. It consumes statements until
/// the end-of-input sentinel; the first error of either severity aborts the
/// run and no partial AST is returned.
pub fn parse<I: TokenSource>(stream: TokenStream<I>) -> Result<Vec<Stmt>, Error> {
    let mut parser = Parser::new(stream);

    let mut body = Vec::new();
    while parser.has_tokens() {
        body.push(parse_stmt(&mut parser)?);
    }

    Ok(body)
}

/// Runs the whole pipeline on a source text: lexing, streaming and parsing.
pub fn parse_source(source: String, file: Option<String>) -> Result<Vec<Stmt>, Error> {
    let lexer = Lexer::new(source, file);
    let file = lexer.file();
    let stream = TokenStream::new(lexer, file)?;
    parse(stream)
}
