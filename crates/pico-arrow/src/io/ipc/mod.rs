//! APIs to read the Arrow IPC file format.
//!
//! The file format is a sequence of length-prefixed flatbuffer messages
//! (one per record batch) indexed by a footer at the end of the file,
//! delimited by a magic byte string at both ends. The metadata container
//! itself is handled by the `arrow_format` crate; this module decodes the
//! file framing and materializes record batches from it.
mod compression;
mod endianness;
pub mod read;

pub use compression::{decompress_lz4, decompress_zstd};

/// The magic string of a feather v1 file, no longer supported.
pub const ARROW_MAGIC_V1: [u8; 4] = [b'F', b'E', b'A', b'1'];
/// The magic string at the head and tail of an Arrow IPC file.
pub const ARROW_MAGIC_V2: [u8; 6] = [b'A', b'R', b'R', b'O', b'W', b'1'];
pub(crate) const CONTINUATION_MARKER: [u8; 4] = [0xff; 4];

/// Struct containing fields and metadata about an IPC field that have no
/// in-memory representation, notably the dictionary id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IpcField {
    /// Optional children, in the same order as the field's children.
    pub fields: Vec<IpcField>,
    /// The dictionary id, when the field is dictionary-encoded.
    pub dictionary_id: Option<i64>,
}

/// Struct containing the schema-level information that only exists on the
/// IPC representation of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpcSchema {
    /// The per-field IPC information.
    pub fields: Vec<IpcField>,
    /// Whether the data is little-endian.
    pub is_little_endian: bool,
}
