//! A minimal implementation of the Arrow columnar memory layout together
//! with a random-access reader for the Arrow IPC file format.
//!
//! The in-memory side follows the Arrow physical specification: every array
//! is backed by an optional validity [`bitmap`](crate::bitmap::Bitmap) and
//! one or more [`buffers`](crate::buffer::Buffer) (offsets, values), with
//! nested arrays owning their children. The IO side lives in
//! [`io::ipc`](crate::io::ipc) and decodes the footer-indexed file format.
pub mod array;
pub mod bitmap;
pub mod buffer;
pub mod datatypes;
pub mod io;
pub mod offset;
pub mod record_batch;
pub mod types;
