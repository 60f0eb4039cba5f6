//! The `boxword` inspector: reads value literals, encodes them with one of the
//! word layouts of [boxword_runtime] and prints the resulting bits.

pub mod cli;
pub mod inspect;
pub mod repl;

pub use inspect::{InspectError, Literal, Report, Session};
