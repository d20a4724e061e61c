//! Result type alias for Merkur operations

use super::errors::MerkurError;

/// Result type used throughout Merkur
///
/// All fallible operations in the engine return this type, allowing
/// errors to be propagated with the `?` operator.
pub type Result<T> = std::result::Result<T, MerkurError>;
