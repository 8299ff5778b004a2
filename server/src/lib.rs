mod bootstrap;
mod connection;
mod error;
mod recording;
mod session;
pub use bootstrap::*;
pub use connection::*;
pub use error::*;
pub use recording::*;
pub use session::*;
