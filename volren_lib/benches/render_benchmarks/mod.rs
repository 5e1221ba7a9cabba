//! Benchmark categories by traversal and host

pub mod cell;
pub mod front;
pub mod view_space;
