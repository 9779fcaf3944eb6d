//! Config grammar parser.
//!
//! # Responsibilities
//! - Turn the token stream into a tree of statements with nested blocks
//! - Validate statement/block structure against the grammar
//! - Reject unbalanced braces and misplaced tokens
//!
//! # Design Decisions
//! - Legality of each token is decided from the previous token's kind alone
//! - Open blocks are tracked on an explicit index stack; ownership of the
//!   finished tree is strictly nested (no shared or cyclic references)
//! - Comments are consumed and discarded without affecting grammar state
//! - Any violation aborts the whole parse; callers never see a partial tree

use super::tokenizer::{Token, TokenKind, Tokenizer};
use super::ConfigError;

/// One directive: its words, plus an optional nested block.
///
/// A well-formed statement always has at least one token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statement {
    pub tokens: Vec<String>,
    pub block: Option<Block>,
}

/// An ordered group of statements. The root of a parsed config is a `Block`
/// with no enclosing statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub statements: Vec<Statement>,
}

/// Parse config text into its statement tree.
pub fn parse_config(input: &str) -> Result<Block, ConfigError> {
    let mut tokenizer = Tokenizer::new(input);
    let mut root = Block::default();

    // Stack of open blocks. Blocks under construction live here; closing a
    // block pops it and attaches it to the last statement one level up.
    let mut stack: Vec<Block> = vec![std::mem::take(&mut root)];
    // Kind of the previous grammar-relevant token (None at stream start).
    let mut prev: Option<TokenKind> = None;

    loop {
        let token = tokenizer.next_token()?;
        match token.kind {
            TokenKind::Comment => continue,
            TokenKind::Word | TokenKind::QuotedString => {
                let starts_statement = !matches!(
                    prev,
                    Some(TokenKind::Word) | Some(TokenKind::QuotedString)
                );
                if starts_statement {
                    current(&mut stack).statements.push(Statement::default());
                }
                match current(&mut stack).statements.last_mut() {
                    Some(statement) => statement.tokens.push(token.value),
                    None => return Err(bad_transition(&token, prev)),
                }
            }
            TokenKind::StatementEnd => {
                if !word_like(prev) {
                    return Err(bad_transition(&token, prev));
                }
            }
            TokenKind::BlockOpen => {
                if !word_like(prev) {
                    return Err(bad_transition(&token, prev));
                }
                stack.push(Block::default());
            }
            TokenKind::BlockClose => {
                let closeable = matches!(
                    prev,
                    Some(TokenKind::StatementEnd)
                        | Some(TokenKind::BlockClose)
                        | Some(TokenKind::BlockOpen)
                );
                if !closeable || stack.len() < 2 {
                    return Err(bad_transition(&token, prev));
                }
                let finished = stack.pop().unwrap_or_default();
                match current(&mut stack).statements.last_mut() {
                    Some(statement) => statement.block = Some(finished),
                    None => return Err(bad_transition(&token, prev)),
                }
            }
            TokenKind::Eof => {
                if stack.len() != 1 {
                    return Err(ConfigError::Syntax(
                        "mismatched braces: some blocks were not closed".into(),
                    ));
                }
                let ended_cleanly = matches!(
                    prev,
                    Some(TokenKind::StatementEnd) | Some(TokenKind::BlockClose)
                );
                if !ended_cleanly {
                    return Err(ConfigError::Syntax(
                        "config ended without a completed statement".into(),
                    ));
                }
                return Ok(stack.pop().unwrap_or_default());
            }
        }
        prev = Some(token.kind);
    }
}

fn current(stack: &mut Vec<Block>) -> &mut Block {
    // The stack is seeded with the root block and only popped when it holds
    // at least two entries, so it is never empty here.
    stack.last_mut().expect("block stack is never empty")
}

fn word_like(prev: Option<TokenKind>) -> bool {
    matches!(
        prev,
        Some(TokenKind::Word) | Some(TokenKind::QuotedString)
    )
}

fn bad_transition(token: &Token, prev: Option<TokenKind>) -> ConfigError {
    ConfigError::Syntax(format!(
        "unexpected {:?} token {:?} after {:?}",
        token.kind, token.value, prev
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_statement() {
        let block = parse_config("listen 8080;").unwrap();
        assert_eq!(block.statements.len(), 1);
        assert_eq!(block.statements[0].tokens, vec!["listen", "8080"]);
        assert!(block.statements[0].block.is_none());
    }

    #[test]
    fn test_nested_block() {
        let block = parse_config("location /static StaticFileHandler { root /var/www; }").unwrap();
        assert_eq!(block.statements.len(), 1);
        let statement = &block.statements[0];
        assert_eq!(
            statement.tokens,
            vec!["location", "/static", "StaticFileHandler"]
        );
        let child = statement.block.as_ref().unwrap();
        assert_eq!(child.statements.len(), 1);
        assert_eq!(child.statements[0].tokens, vec!["root", "/var/www"]);
    }

    #[test]
    fn test_deeply_nested_blocks() {
        let block = parse_config("a { b { c d; } }").unwrap();
        let inner = block.statements[0].block.as_ref().unwrap();
        let innermost = inner.statements[0].block.as_ref().unwrap();
        assert_eq!(innermost.statements[0].tokens, vec!["c", "d"]);
    }

    #[test]
    fn test_empty_block_is_legal() {
        let block = parse_config("server { }").unwrap();
        let child = block.statements[0].block.as_ref().unwrap();
        assert!(child.statements.is_empty());
    }

    #[test]
    fn test_comments_are_discarded() {
        let block = parse_config("# leading comment\nlisten 80; # trailing\n").unwrap();
        assert_eq!(block.statements.len(), 1);
        assert_eq!(block.statements[0].tokens, vec!["listen", "80"]);
    }

    #[test]
    fn test_empty_input_fails() {
        // A config must contain at least one completed statement.
        assert!(parse_config("").is_err());
    }

    #[test]
    fn test_unbalanced_open_brace_fails() {
        assert!(parse_config("server { listen 80;").is_err());
    }

    #[test]
    fn test_unbalanced_close_brace_fails() {
        assert!(parse_config("listen 80; }").is_err());
    }

    #[test]
    fn test_semicolon_without_statement_fails() {
        assert!(parse_config(";").is_err());
    }

    #[test]
    fn test_block_without_statement_name_fails() {
        assert!(parse_config("{ listen 80; }").is_err());
    }

    #[test]
    fn test_missing_final_semicolon_fails() {
        assert!(parse_config("listen 80").is_err());
    }

    #[test]
    fn test_unterminated_quote_fails() {
        assert!(matches!(
            parse_config("root \"unclosed;"),
            Err(ConfigError::UnterminatedQuote)
        ));
    }

    #[test]
    fn test_quoted_tokens_join_statements() {
        let block = parse_config("log_file \"/var/log/server.log\";").unwrap();
        assert_eq!(
            block.statements[0].tokens,
            vec!["log_file", "\"/var/log/server.log\""]
        );
    }
}
