pub use board::*;
pub use errors::*;
pub use game::*;
pub use protocol::*;
pub use visualization::*;
pub use vote::*;
pub use win::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod errors;
mod game;
mod protocol;
mod visualization;
mod vote;
mod win;
