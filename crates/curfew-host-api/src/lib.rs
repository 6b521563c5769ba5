//! Host adapter interfaces for curfewd
//!
//! The core never invokes OS primitives directly; it goes through the
//! `EnforcementHost` trait. `MockHost` records invocations for tests.

mod mock;
mod traits;

pub use mock::*;
pub use traits::*;
