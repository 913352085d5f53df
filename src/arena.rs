//! Chunked block allocator for tree nodes.

use crate::config::Config;
use crate::error::{Error, Result};
use log::{trace, warn};
use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to a block in a `TypedArena<T>`.
///
/// Handles stay valid until the block they name is freed. A freed handle may be handed out
/// again by a later allocation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Entry {
    chunk_index: usize,
    block_index: usize,
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<Entry>),
}

/// A fixed-size block allocator that only allocates a single type of object.
///
/// Blocks are carved out of chunks of `chunk_size` objects. A chunk is never reallocated
/// once created, and freed blocks are threaded onto a free list that is consumed before any
/// new chunk is requested. An optional `limit` bounds the number of live objects; an
/// allocation past the limit fails without touching the arena.
///
/// Moving a value into a vacant block is the only way to construct an object, and `free`
/// hands the object back so the caller decides when it is destroyed.
///
/// # Examples
///
/// ```
/// use ordered_tree::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1).unwrap();
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// ```
pub struct TypedArena<T> {
    head: Option<Entry>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    limit: Option<usize>,
    size: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn is_valid_entry(&self, entry: &Entry) -> bool {
        entry.chunk_index < self.chunks.len()
            && entry.block_index < self.chunks[entry.chunk_index].len()
    }

    /// Constructs a new, empty `TypedArena<T>` with a specific number of objects per chunk and
    /// no limit on the number of live objects.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// assert!(arena.is_empty());
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Error: chunk size must be positive.");
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size,
            limit: None,
            size: 0,
            capacity: 0,
        }
    }

    /// Constructs a new, empty `TypedArena<T>` sized according to `config`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::arena::TypedArena;
    /// use ordered_tree::Config;
    ///
    /// let mut arena = TypedArena::with_config(&Config::default().with_node_limit(1));
    /// assert!(arena.allocate(0).is_ok());
    /// assert!(arena.allocate(1).is_err());
    /// ```
    pub fn with_config(config: &Config) -> Self {
        let mut arena = TypedArena::new(config.chunk_size);
        arena.limit = config.node_limit;
        arena
    }

    /// Moves `value` into a vacant block and returns its `Entry`. Fails with
    /// `Error::AllocationFailed` when the arena already holds `limit` objects, in which case
    /// `value` is dropped and the arena is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0).unwrap();
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Result<Entry> {
        if let Some(limit) = self.limit {
            if self.size >= limit {
                warn!("refusing allocation: arena is at its limit of {} blocks", limit);
                return Err(Error::AllocationFailed { limit });
            }
        }

        if self.head.is_none() && self.size == self.capacity {
            trace!(
                "growing arena to {} chunks of {} blocks",
                self.chunks.len() + 1,
                self.chunk_size,
            );
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
        }
        self.size += 1;

        match self.head.take() {
            None => {
                let chunk_count = self.chunks.len();
                let last_chunk = &mut self.chunks[chunk_count - 1];
                last_chunk.push(Block::Occupied(value));
                Ok(Entry {
                    chunk_index: chunk_count - 1,
                    block_index: last_chunk.len() - 1,
                })
            },
            Some(entry) => {
                let vacant_block = mem::replace(
                    &mut self.chunks[entry.chunk_index][entry.block_index],
                    Block::Occupied(value),
                );

                match vacant_block {
                    Block::Vacant(next_entry) => {
                        self.head = next_entry;
                        Ok(entry)
                    },
                    Block::Occupied(_) => unreachable!("Expected a vacant block on the free list."),
                }
            },
        }
    }

    /// Deallocates an object in the typed arena and returns the object.
    ///
    /// # Panics
    ///
    /// Panics if entry corresponds to an invalid or vacant block.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0).unwrap();
    /// assert_eq!(arena.free(&x), 0);
    /// ```
    pub fn free(&mut self, entry: &Entry) -> T {
        if !self.is_valid_entry(entry) {
            panic!("Error: attempting to free invalid block.");
        }
        if let Block::Vacant(_) = self.chunks[entry.chunk_index][entry.block_index] {
            panic!("Error: attempting to free vacant block.");
        }
        let old_block = mem::replace(
            &mut self.chunks[entry.chunk_index][entry.block_index],
            Block::Vacant(self.head.take()),
        );
        self.size -= 1;
        self.head = Some(*entry);
        match old_block {
            Block::Occupied(value) => value,
            Block::Vacant(_) => unreachable!(),
        }
    }

    /// Drops every object in the arena and releases all chunks.
    pub fn clear(&mut self) {
        self.head = None;
        self.chunks.clear();
        self.size = 0;
        self.capacity = 0;
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of blocks the arena can hold without requesting another chunk.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the maximum number of live objects, if one was configured.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns an immutable reference to an object in the typed arena. Returns `None` if the entry
    /// does not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0).unwrap();
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn get(&self, entry: &Entry) -> Option<&T> {
        if !self.is_valid_entry(entry) {
            return None;
        }
        match self.chunks[entry.chunk_index][entry.block_index] {
            Block::Occupied(ref value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to an object in the typed arena. Returns `None` if the entry
    /// does not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0).unwrap();
    /// assert_eq!(arena.get_mut(&x), Some(&mut 0));
    /// ```
    pub fn get_mut(&mut self, entry: &Entry) -> Option<&mut T> {
        if !self.is_valid_entry(entry) {
            return None;
        }
        match self.chunks[entry.chunk_index][entry.block_index] {
            Block::Occupied(ref mut value) => Some(value),
            Block::Vacant(_) => None,
        }
    }
}

impl<T> Index<Entry> for TypedArena<T> {
    type Output = T;

    fn index(&self, entry: Entry) -> &Self::Output {
        self.get(&entry).expect("Error: entry does not refer to a live block.")
    }
}

impl<T> IndexMut<Entry> for TypedArena<T> {
    fn index_mut(&mut self, entry: Entry) -> &mut Self::Output {
        self.get_mut(&entry).expect("Error: entry does not refer to a live block.")
    }
}
