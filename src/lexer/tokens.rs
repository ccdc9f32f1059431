use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display, rc::Rc};

use crate::{Position, Span};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("endif", TokenKind::EndIf);
        map.insert("while", TokenKind::While);
        map.insert("endwhile", TokenKind::EndWhile);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    EOF,
    NewLine,

    Number(f64),
    String(String),
    Identifier(String),

    OpenParen,
    CloseParen,
    Comma,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Plus,
    Dash,
    Slash,
    Star,

    // Reserved
    If,
    Else,
    EndIf,
    While,
    EndWhile,
    True,
    False,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::EOF => write!(f, "end of input"),
            TokenKind::NewLine => write!(f, "newline"),
            TokenKind::Number(value) => write!(f, "{}", value),
            TokenKind::String(value) => write!(f, "{}", value),
            TokenKind::Identifier(name) => write!(f, "{}", name),
            TokenKind::OpenParen => write!(f, "("),
            TokenKind::CloseParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Assignment => write!(f, "="),
            TokenKind::Equals => write!(f, "=="),
            TokenKind::Not => write!(f, "!"),
            TokenKind::NotEquals => write!(f, "!="),
            TokenKind::Less => write!(f, "<"),
            TokenKind::LessEquals => write!(f, "<="),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::GreaterEquals => write!(f, ">="),
            TokenKind::Or => write!(f, "||"),
            TokenKind::And => write!(f, "&&"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Dash => write!(f, "-"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::If => write!(f, "if"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::EndIf => write!(f, "endif"),
            TokenKind::While => write!(f, "while"),
            TokenKind::EndWhile => write!(f, "endwhile"),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Token {
    /// Builds the terminal sentinel token. The lexer itself never yields it;
    /// the token stream (and the eager `tokenize`) synthesize it once the
    /// text is exhausted.
    pub fn end_of_input(offset: u32, file: Rc<String>) -> Token {
        Token {
            kind: TokenKind::EOF,
            span: Span {
                start: Position(offset, Rc::clone(&file)),
                end: Position(offset, file),
            },
        }
    }
}
