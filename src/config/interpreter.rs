//! Config interpretation.
//!
//! # Responsibilities
//! - Pull the listen port out of the parsed tree
//! - Turn `location` statements into validated route entries
//! - Enforce per-handler argument requirements and URI uniqueness
//!
//! # Design Decisions
//! - Two independent passes over the tree; neither mutates it
//! - Port search is depth-first and first-match-wins; route extraction looks
//!   at root-level statements only
//! - A trailing slash on a location URI is rejected outright rather than
//!   silently normalized

use std::collections::{HashMap, HashSet};

use super::parser::Block;
use super::ConfigError;

/// One resolved `location` directive: a URI prefix, the handler that serves
/// it, and the handler's construction arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub uri_prefix: String,
    pub handler_name: String,
    pub args: HashMap<String, String>,
}

/// Depth-first search for a `<key> <value>;` statement anywhere in the tree.
///
/// A statement only matches with exactly two tokens; child blocks of each
/// statement are searched before the following sibling.
fn find_value_for_key(block: &Block, key: &str) -> Option<String> {
    for statement in &block.statements {
        if statement.tokens.len() == 2 && statement.tokens[0] == key {
            return Some(statement.tokens[1].clone());
        }
        if let Some(child) = &statement.block {
            if let Some(value) = find_value_for_key(child, key) {
                return Some(value);
            }
        }
    }
    None
}

/// Extract the listen port from the first depth-first `listen` directive.
pub fn find_listen_port(root: &Block) -> Result<u16, ConfigError> {
    let value =
        find_value_for_key(root, "listen").ok_or(ConfigError::MissingDirective("listen"))?;
    value
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidPort(value))
}

/// Pull a required directive out of a location's child block.
fn required_arg(
    statement_block: Option<&Block>,
    handler: &str,
    directive: &'static str,
) -> Result<String, ConfigError> {
    statement_block
        .and_then(|block| find_value_for_key(block, directive))
        .ok_or_else(|| ConfigError::MissingHandlerDirective {
            handler: handler.to_string(),
            directive,
        })
}

/// Extract route entries from the root block's `location` statements.
///
/// Validates per-handler required arguments and rejects trailing-slash and
/// duplicate URIs. Errors here are fatal at startup.
pub fn extract_route_entries(root: &Block) -> Result<Vec<RouteEntry>, ConfigError> {
    let mut entries = Vec::new();

    for statement in &root.statements {
        if statement.tokens.len() < 3 || statement.tokens[0] != "location" {
            continue;
        }

        let uri = statement.tokens[1].clone();
        if uri.ends_with('/') {
            return Err(ConfigError::TrailingSlash(uri));
        }

        let handler = statement.tokens[2].clone();
        let child = statement.block.as_ref();
        let mut args = HashMap::new();

        match handler.as_str() {
            "StaticFileHandler" => {
                args.insert("mount_point".to_string(), uri.clone());
                args.insert(
                    "doc_root".to_string(),
                    required_arg(child, &handler, "root")?,
                );
            }
            "CrudHandler" => {
                args.insert(
                    "data_path".to_string(),
                    required_arg(child, &handler, "data_path")?,
                );
            }
            "QuizHandler" | "ResultHandler" | "CreateQuizHandler" => {
                args.insert(
                    "quiz_root".to_string(),
                    required_arg(child, &handler, "quiz_root")?,
                );
            }
            "EchoHandler" | "HealthHandler" | "SleepHandler" => {}
            _ => return Err(ConfigError::UnknownHandler(handler)),
        }

        entries.push(RouteEntry {
            uri_prefix: uri,
            handler_name: handler,
            args,
        });
    }

    let mut seen = HashSet::new();
    for entry in &entries {
        if !seen.insert(entry.uri_prefix.as_str()) {
            return Err(ConfigError::DuplicateLocation(entry.uri_prefix.clone()));
        }
    }

    Ok(entries)
}
