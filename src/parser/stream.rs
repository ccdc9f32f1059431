use std::collections::VecDeque;
use std::rc::Rc;

use crate::{
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
};

/// Anything that can feed tokens to the parser: the lexer itself, or an
/// already-scanned token list in tests.
pub trait TokenSource: Iterator<Item = Result<Token, Error>> {}

impl<I: Iterator<Item = Result<Token, Error>>> TokenSource for I {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckpointState {
    Idle,
    Recording,
    Draining,
}

/// Wraps a forward-only token source with a single logical cursor plus an
/// optional replay buffer, so the parser can attempt one grammar and fall
/// back to another without losing its position.
///
/// While a checkpoint is recording, every token produced by `advance` is
/// copied into the buffer. Rolling back rewinds the logical cursor to the
/// checkpoint and replays the buffer before the source is consulted again;
/// the source itself never produces a token twice. At most one checkpoint
/// can be in flight, which bounds the buffer to the tokens consumed since
/// the checkpoint began.
pub struct TokenStream<I: TokenSource> {
    source: I,
    file: Rc<String>,
    current: Token,
    recorded: Vec<Token>,
    pending: VecDeque<Token>,
    state: CheckpointState,
    last_end: u32,
}

impl<I: TokenSource> TokenStream<I> {
    pub fn new(mut source: I, file: Rc<String>) -> Result<Self, Error> {
        let mut last_end = 0;
        let current = match source.next() {
            Some(token) => {
                let token = token?;
                last_end = token.span.end.0;
                token
            }
            None => Token::end_of_input(0, Rc::clone(&file)),
        };

        Ok(TokenStream {
            source,
            file,
            current,
            recorded: Vec::new(),
            pending: VecDeque::new(),
            state: CheckpointState::Idle,
            last_end,
        })
    }

    /// The token at the logical cursor, without consuming it.
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Moves the cursor forward one token and returns the new current token.
    /// Once the source is exhausted this keeps returning the end-of-input
    /// sentinel.
    pub fn advance(&mut self) -> Result<&Token, Error> {
        let next = if let Some(token) = self.pending.pop_front() {
            if self.pending.is_empty() && self.state == CheckpointState::Draining {
                self.state = CheckpointState::Idle;
            }
            token
        } else {
            self.pull()?
        };

        if self.state == CheckpointState::Recording {
            self.recorded.push(next.clone());
        }

        self.current = next;
        Ok(&self.current)
    }

    fn pull(&mut self) -> Result<Token, Error> {
        match self.source.next() {
            Some(token) => {
                let token = token?;
                self.last_end = token.span.end.0;
                Ok(token)
            }
            None => Ok(Token::end_of_input(self.last_end, Rc::clone(&self.file))),
        }
    }

    /// Starts recording tokens so the cursor can later be rewound to the
    /// current position. Precondition: no other checkpoint is active or
    /// still draining; breaking it is a contract violation, not a parse
    /// error.
    pub fn begin_checkpoint(&mut self) -> Result<(), Error> {
        if self.state != CheckpointState::Idle || !self.pending.is_empty() {
            return Err(Error::internal(
                "cannot begin a checkpoint while another is active or undrained",
                self.current.span.start.clone(),
            ));
        }

        self.recorded.push(self.current.clone());
        self.state = CheckpointState::Recording;
        Ok(())
    }

    /// Discards the recording; the cursor keeps its advanced position.
    pub fn commit_checkpoint(&mut self) -> Result<(), Error> {
        if self.state != CheckpointState::Recording {
            return Err(Error::internal(
                "no active checkpoint to commit",
                self.current.span.start.clone(),
            ));
        }

        self.recorded.clear();
        self.state = CheckpointState::Idle;
        Ok(())
    }

    /// Rewinds the cursor to the checkpoint; the recorded tokens replay in
    /// original order before the source is consulted again.
    pub fn rollback_checkpoint(&mut self) -> Result<(), Error> {
        if self.state != CheckpointState::Recording {
            return Err(Error::internal(
                "no active checkpoint to roll back",
                self.current.span.start.clone(),
            ));
        }

        let mut recorded = std::mem::take(&mut self.recorded).into_iter();
        let anchor = match recorded.next() {
            Some(anchor) => anchor,
            None => {
                return Err(Error::internal(
                    "checkpoint buffer lost its anchor token",
                    self.current.span.start.clone(),
                ))
            }
        };

        self.current = anchor;
        self.pending = recorded.collect();
        self.state = if self.pending.is_empty() {
            CheckpointState::Idle
        } else {
            CheckpointState::Draining
        };
        Ok(())
    }

    /// True while the cursor has not reached the end-of-input sentinel.
    pub fn has_tokens(&self) -> bool {
        self.current.kind != TokenKind::EOF
    }
}
