//! Line protocol spoken by the `chessfield` binary.
//!
//! One command per line on stdin, one response per line on stdout. The
//! parser turns text into [`Command`]s; formatting of responses lives with
//! the session that produces them.

pub mod parser;

pub use parser::{parse_command, Command, Facing};
