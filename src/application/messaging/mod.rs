//! Message handling - parsing and command routing

pub mod parser;
pub mod router;

pub use parser::MessageParser;
pub use router::{ChatState, Reply, Router};
