//! Linux host adapter for curfewd

mod adapter;

pub use adapter::*;
