//! Core logic for curfewd
//!
//! Pure window evaluation (`in_window`), the remote command grammar
//! (`RemoteCommand`), the command protocol that applies commands against
//! the policy store (`CommandProtocol`), and the enforcement executor
//! that dispatches lock/shutdown through the host adapter.

mod command;
mod evaluator;
mod executor;
mod protocol;

pub use command::*;
pub use evaluator::*;
pub use executor::*;
pub use protocol::*;
