//! Longest-prefix routing trie.
//!
//! # Responsibilities
//! - Index route entries by `/`-separated URI path segment
//! - Resolve a request URI to its most specific configured prefix
//!
//! # Design Decisions
//! - Terminal nodes hold indices into a stable `Vec<RouteEntry>`; the vector
//!   is append-only during build and frozen afterwards
//! - A missing child stops descent but never invalidates an ancestor match
//! - Query strings are stripped before matching

use std::collections::HashMap;

use crate::config::RouteEntry;

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<String, TrieNode>,
    /// Index of the route entry terminating at this node, if any.
    entry: Option<usize>,
}

/// The immutable routing table: route entries plus the trie indexing them.
#[derive(Debug, Default)]
pub struct RoutingTable {
    entries: Vec<RouteEntry>,
    root: TrieNode,
}

impl RoutingTable {
    /// Build the table from validated route entries. URIs are unique by the
    /// time they reach here (the interpreter rejects duplicates).
    pub fn build(entries: Vec<RouteEntry>) -> Self {
        let mut table = Self {
            entries,
            root: TrieNode::default(),
        };
        for index in 0..table.entries.len() {
            let prefix = table.entries[index].uri_prefix.clone();
            table.insert(&prefix, index);
        }
        table
    }

    fn insert(&mut self, uri_prefix: &str, index: usize) {
        let mut node = &mut self.root;
        for segment in uri_prefix.split('/').filter(|s| !s.is_empty()) {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.entry = Some(index);
    }

    /// Longest-prefix lookup. Returns the entry for the most specific
    /// configured prefix that is an ancestor of (or equal to) the request
    /// path, or `None` when no prefix matches.
    pub fn find(&self, request_uri: &str) -> Option<&RouteEntry> {
        let path = request_uri.split('?').next().unwrap_or(request_uri);

        let mut node = &self.root;
        let mut best = None;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            match node.children.get(segment) {
                Some(child) => {
                    node = child;
                    if node.entry.is_some() {
                        best = node.entry;
                    }
                }
                None => break,
            }
        }
        best.map(|index| &self.entries[index])
    }

    /// The stable entry collection, in configuration order.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }
}
