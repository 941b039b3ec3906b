//! Contains the IO of this crate.
pub mod ipc;
