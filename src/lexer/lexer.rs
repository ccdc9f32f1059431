use std::rc::Rc;

use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type PatternHandler = fn(&mut Lexer, &str) -> Result<Option<Token>, Error>;

#[derive(Clone)]
pub struct TokenPattern {
    regex: Regex,
    handler: PatternHandler,
}

/// Scans source text into a lazy sequence of tokens. An ordered pattern
/// table is tried at the cursor on every pull; the first pattern matching at
/// offset zero wins, so two-character operators sit above their
/// one-character prefixes. The sequence is finite and non-restartable.
pub struct Lexer {
    patterns: Vec<TokenPattern>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("<memory>"))
        };

        Lexer {
            pos: 0,
            patterns: vec![
                TokenPattern { regex: Regex::new("[A-Za-z_][A-Za-z0-9_]*").unwrap(), handler: symbol_handler },
                TokenPattern { regex: Regex::new(r"[0-9]+(\.[0-9]*)?").unwrap(), handler: number_handler },
                TokenPattern { regex: Regex::new(r"[ \t]+").unwrap(), handler: skip_handler },
                TokenPattern { regex: Regex::new(r#""[^"\r\n]*""#).unwrap(), handler: string_handler },
                TokenPattern { regex: Regex::new("\"").unwrap(), handler: open_string_handler },
                TokenPattern { regex: Regex::new(r"\r\n|\n").unwrap(), handler: newline_handler },
                TokenPattern { regex: Regex::new(r"\r").unwrap(), handler: carriage_return_handler },
                TokenPattern { regex: Regex::new("==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
                TokenPattern { regex: Regex::new("!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
                TokenPattern { regex: Regex::new(">=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
                TokenPattern { regex: Regex::new("<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
                TokenPattern { regex: Regex::new("&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&") },
                TokenPattern { regex: Regex::new(r"\|\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||") },
                TokenPattern { regex: Regex::new("=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
                TokenPattern { regex: Regex::new("!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!") },
                TokenPattern { regex: Regex::new(">").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
                TokenPattern { regex: Regex::new("<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
                TokenPattern { regex: Regex::new(r"[&|]").unwrap(), handler: unsupported_operator_handler },
                TokenPattern { regex: Regex::new(r"\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
                TokenPattern { regex: Regex::new(r"\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
                TokenPattern { regex: Regex::new(",").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
                TokenPattern { regex: Regex::new(r"\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
                TokenPattern { regex: Regex::new("-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
                TokenPattern { regex: Regex::new(r"\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
                TokenPattern { regex: Regex::new("/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
            ],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> u32 {
        self.pos as u32
    }

    pub fn file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }

    pub fn here(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }

    pub fn span_ahead(&self, len: usize) -> Span {
        Span {
            start: Position(self.pos as u32, Rc::clone(&self.file)),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }

    fn at(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// Produces the next token, or `Ok(None)` once the text is exhausted.
    /// Trivia between tokens is skipped here; it never reaches a handler
    /// producing a token.
    pub fn next_token(&mut self) -> Result<Option<Token>, Error> {
        while !self.at_eof() {
            let rest = &self.source[self.pos..];

            let mut matched: Option<(PatternHandler, String)> = None;
            for pattern in &self.patterns {
                if let Some(found) = pattern.regex.find(rest) {
                    if found.start() == 0 {
                        matched = Some((pattern.handler, found.as_str().to_string()));
                        break;
                    }
                }
            }

            let Some((handler, text)) = matched else {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken {
                        token: self.at().to_string(),
                    },
                    self.here(),
                ));
            };

            if let Some(token) = handler(self, &text)? {
                return Ok(Some(token));
            }
        }

        Ok(None)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

fn skip_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    lexer.advance_n(matched.len());
    Ok(None)
}

fn newline_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let span = lexer.span_ahead(matched.len());
    lexer.advance_n(matched.len());
    Ok(Some(MK_TOKEN!(TokenKind::NewLine, span)))
}

fn carriage_return_handler(lexer: &mut Lexer, _matched: &str) -> Result<Option<Token>, Error> {
    Err(Error::new(ErrorImpl::IsolatedCarriageReturn, lexer.here()))
}

fn unsupported_operator_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    Err(Error::new(
        ErrorImpl::UnsupportedOperator {
            op: matched.to_string(),
        },
        lexer.here(),
    ))
}

fn open_string_handler(lexer: &mut Lexer, _matched: &str) -> Result<Option<Token>, Error> {
    Err(Error::new(ErrorImpl::UnterminatedString, lexer.here()))
}

fn string_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let span = lexer.span_ahead(matched.len());
    let value = matched[1..matched.len() - 1].to_string();
    lexer.advance_n(matched.len());
    Ok(Some(MK_TOKEN!(TokenKind::String(value), span)))
}

fn number_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let span = lexer.span_ahead(matched.len());
    let value: f64 = matched.parse().map_err(|_| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: matched.to_string(),
            },
            lexer.here(),
        )
    })?;
    lexer.advance_n(matched.len());

    // a second decimal point right after the literal ("1.2.3")
    if lexer.peek() == Some('.') {
        return Err(Error::new(
            ErrorImpl::UnexpectedDecimalSeparator,
            lexer.here(),
        ));
    }

    Ok(Some(MK_TOKEN!(TokenKind::Number(value), span)))
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let span = lexer.span_ahead(matched.len());
    lexer.advance_n(matched.len());

    let kind = match RESERVED_LOOKUP.get(matched) {
        Some(kind) => kind.clone(),
        None => TokenKind::Identifier(matched.to_string()),
    };

    Ok(Some(MK_TOKEN!(kind, span)))
}

/// Eagerly scans a whole source text, appending the terminal sentinel.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lexer = Lexer::new(source, file);

    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }

    tokens.push(Token::end_of_input(lexer.position(), lexer.file()));
    Ok(tokens)
}
