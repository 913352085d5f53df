use std::error;
use std::fmt;
use std::result;

/// Errors surfaced by fallible tree operations.
///
/// A failed operation leaves the tree exactly as it was before the call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The node arena refused a block because it already holds `limit` live nodes.
    AllocationFailed { limit: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AllocationFailed { limit } => {
                write!(f, "node allocation failed: arena limit of {} nodes reached", limit)
            },
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
