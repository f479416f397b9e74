//! External collaborators the gateway depends on but does not own.

mod match_directory;

pub use match_directory::{InMemoryMatchDirectory, MatchDirectory};
