//! Config file tokenizer.
//!
//! # Responsibilities
//! - Produce one token at a time from the raw config text
//! - Recognize words, quoted strings, `{`, `}`, `;`, and comments
//! - Report an unterminated quote as a lexical error
//!
//! # Design Decisions
//! - Character-at-a-time state machine; tokens are never buffered in bulk
//! - Quoted tokens keep their surrounding quotes and escape sequences
//!   verbatim; interpretation is the consumer's problem
//! - A delimiter ending a word is left unconsumed for the next call

use std::iter::Peekable;
use std::str::Chars;

use super::ConfigError;

/// The kind of a lexical unit in the config grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Unquoted run of non-whitespace, non-delimiter characters.
    Word,
    /// Single- or double-quoted string, quotes included in the value.
    QuotedString,
    /// `{`
    BlockOpen,
    /// `}`
    BlockClose,
    /// `;`
    StatementEnd,
    /// `#` to end of line; emitted but discarded by the parser.
    Comment,
    /// Clean end of input.
    Eof,
}

/// One token: its kind plus the raw text it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Tokenizer state while consuming one token.
enum State {
    /// Skipping whitespace before a token.
    Initial,
    /// Inside a quoted string; the char is the closing quote.
    Quote(char),
    /// Inside a `#` comment.
    Comment,
    /// Inside an unquoted word.
    Word,
}

/// Streaming tokenizer over config text.
pub struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    /// Consume and return the next token.
    ///
    /// Returns `Eof` forever once the input is exhausted. The only lexical
    /// error is end of input inside a quoted string.
    pub fn next_token(&mut self) -> Result<Token, ConfigError> {
        let mut state = State::Initial;
        let mut value = String::new();

        loop {
            // A word ends at a delimiter without consuming it.
            if let State::Word = state {
                match self.chars.peek() {
                    Some(&c) if matches!(c, ' ' | '\t' | '\n' | '\r' | ';' | '{' | '}') => {
                        return Ok(Token::new(TokenKind::Word, value));
                    }
                    Some(_) => {}
                    None => return Ok(Token::new(TokenKind::Word, value)),
                }
            }

            let c = match self.chars.next() {
                Some(c) => c,
                None => {
                    return match state {
                        State::Quote(_) => Err(ConfigError::UnterminatedQuote),
                        State::Comment => Ok(Token::new(TokenKind::Comment, value)),
                        _ => Ok(Token::new(TokenKind::Eof, "")),
                    };
                }
            };

            match state {
                State::Initial => match c {
                    '{' => return Ok(Token::new(TokenKind::BlockOpen, "{")),
                    '}' => return Ok(Token::new(TokenKind::BlockClose, "}")),
                    ';' => return Ok(Token::new(TokenKind::StatementEnd, ";")),
                    '#' => state = State::Comment,
                    '\'' | '"' => {
                        value.push(c);
                        state = State::Quote(c);
                    }
                    ' ' | '\t' | '\n' | '\r' => {}
                    _ => {
                        value.push(c);
                        state = State::Word;
                    }
                },
                State::Quote(closing) => {
                    value.push(c);
                    if c == '\\' {
                        // The escaped character can never close the quote.
                        match self.chars.next() {
                            Some(escaped) => value.push(escaped),
                            None => return Err(ConfigError::UnterminatedQuote),
                        }
                    } else if c == closing {
                        return Ok(Token::new(TokenKind::QuotedString, value));
                    }
                }
                State::Comment => {
                    if c == '\n' || c == '\r' {
                        return Ok(Token::new(TokenKind::Comment, value));
                    }
                    value.push(c);
                }
                State::Word => value.push(c),
            }
        }
    }
}
