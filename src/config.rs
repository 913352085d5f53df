//! Construction-time settings for trees and the containers built on them.

/// Number of node blocks an arena grows by when no free block is left.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Settings applied when a tree is constructed.
///
/// # Examples
///
/// ```
/// use ordered_tree::Config;
///
/// let config = Config::default().with_chunk_size(64).with_node_limit(1_000);
/// assert_eq!(config.chunk_size, 64);
/// assert_eq!(config.node_limit, Some(1_000));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Number of node blocks requested from the system at a time.
    pub chunk_size: usize,
    /// Upper bound on the number of live nodes. Insertions past the bound fail with
    /// `Error::AllocationFailed`.
    pub node_limit: Option<usize>,
}

impl Config {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_node_limit(mut self, node_limit: usize) -> Self {
        self.node_limit = Some(node_limit);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chunk_size: DEFAULT_CHUNK_SIZE,
            node_limit: None,
        }
    }
}
