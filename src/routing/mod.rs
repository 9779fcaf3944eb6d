//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteEntry[] from the config interpreter
//!     → Append into a stable entry vector
//!     → Insert each URI prefix into the segment trie (index references)
//!     → Freeze as immutable RoutingTable
//!
//! Per request:
//!     Request URI
//!     → trie.rs (strip query, walk segments, longest-prefix match)
//!     → Return: &RouteEntry or None
//! ```
//!
//! # Design Decisions
//! - Built once before any connection is accepted, immutable at runtime,
//!   shared across sessions without locks
//! - Trie nodes store indices into the entry vector, never copies or raw
//!   back-references
//! - Deterministic: same URI always resolves to the same entry

pub mod trie;

pub use trie::RoutingTable;
