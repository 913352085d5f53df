//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions.
//!
//! `RbTree` is the engine: it stores values ordered by an extracted key, supports unique and
//! equal insertion, and exposes positions as `Cursor`s. `TreeSet`, `TreeMap`, `TreeMultiSet`
//! and `TreeMultiMap` are thin containers over it.

mod cursor;
mod map;
mod multimap;
mod multiset;
mod node;
mod rebalance;
mod set;
mod tree;
mod verify;

pub use self::cursor::{Cursor, IntoIter, Iter};
pub use self::map::{TreeMap, TreeMapIntoIter, TreeMapIter};
pub use self::multimap::{TreeMultiMap, TreeMultiMapIter, TreeMultiMapValues};
pub use self::multiset::TreeMultiSet;
pub use self::node::Color;
pub use self::set::{TreeSet, TreeSetIntoIter, TreeSetIter};
pub use self::tree::RbTree;
pub use self::verify::Violation;
