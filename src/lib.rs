//! An arena-backed red-black tree with ordered set, map, multiset and multimap containers.
//!
//! Nodes are allocated from a `TypedArena` and linked by handles, so the tree is free of
//! `unsafe` code. Every operation that needs a new node returns a `Result` and leaves the tree
//! unchanged when the arena refuses the allocation.

pub mod arena;
mod config;
mod error;
pub mod ordering;
pub mod rb_tree;

pub use crate::config::{Config, DEFAULT_CHUNK_SIZE};
pub use crate::error::{Error, Result};
pub use crate::rb_tree::{Cursor, RbTree, TreeMap, TreeMultiMap, TreeMultiSet, TreeSet, Violation};
