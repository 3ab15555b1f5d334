//! Browser module - session traits and the agent-browser driver
//!
//! The execution engine talks to the traits in `session`; `cli` is the
//! shipped implementation on top of the agent-browser CLI.

pub mod cli;
pub mod session;

pub use cli::{CliSession, CliSessionProvider};
pub use session::{BrowserSession, SessionProvider};
