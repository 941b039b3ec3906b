//! APIs to read Arrow record batches from the IPC file format.
//!
//! Reading is a two-step process: decode the [`FileMetadata`] from the file
//! footer, then materialize record batches on demand — either through the
//! [`FileReader`] facade or the free [`read_batch`] for callers that manage
//! their own source handles (e.g. one per thread).
mod array;
mod common;
mod deserialize;
mod file;
mod read_basic;
mod reader;
mod schema;

use ahash::AHashMap;

use crate::array::Array;

pub use common::{read_dictionary, read_record_batch};
pub use file::{
    deserialize_footer, read_batch, read_file_dictionaries, read_file_metadata,
    read_file_metadata_at, FileMetadata,
};
pub use reader::{FileReader, FileReaderOptions};
pub use schema::fb_to_schema;

/// The dictionary memo: how dictionary-encoded fields resolve their values,
/// keyed by dictionary id. Write-once at open, read-only afterwards.
pub type Dictionaries = AHashMap<i64, Box<dyn Array>>;

pub(crate) type Node<'a> = arrow_format::ipc::FieldNodeRef<'a>;
pub(crate) type IpcBuffer<'a> = arrow_format::ipc::BufferRef<'a>;
pub(crate) type Compression<'a> = arrow_format::ipc::BodyCompressionRef<'a>;

/// The bound on the nesting depth of the array loader; deeper schemas fail
/// with [`PicoError::NestingTooDeep`](pico_error::PicoError::NestingTooDeep)
/// instead of overflowing the stack on pathological inputs.
pub const MAX_NESTING_DEPTH: usize = 64;

/// The different variants of out-of-spec (malformed) files this module
/// detects.
#[derive(Debug)]
pub enum OutOfSpecKind {
    /// The file does not end with the expected footer trailer.
    InvalidFooter,
    /// The footer length is negative.
    NegativeFooterLength,
    /// The footer flatbuffer is invalid.
    InvalidFlatbufferFooter(arrow_format::ipc::planus::Error),
    /// The footer does not contain a schema.
    MissingSchema,
    /// The schema flatbuffer is invalid.
    InvalidFlatbufferSchema(arrow_format::ipc::planus::Error),
    /// The footer does not contain record batch blocks.
    MissingRecordBatches,
    /// The record-batch blocks are invalid.
    InvalidFlatbufferRecordBatches(arrow_format::ipc::planus::Error),
    /// The dictionary blocks are invalid.
    InvalidFlatbufferDictionaries(arrow_format::ipc::planus::Error),
    /// The footer version is invalid.
    InvalidFlatbufferVersion(arrow_format::ipc::planus::Error),
    /// A message flatbuffer is invalid.
    InvalidFlatbufferMessage(arrow_format::ipc::planus::Error),
    /// A message does not contain a header.
    MissingMessageHeader,
    /// A message header is invalid.
    InvalidFlatbufferHeader(arrow_format::ipc::planus::Error),
    /// A message header is of an unexpected type.
    UnexpectedMessageType,
    /// A message body length is invalid.
    InvalidFlatbufferBodyLength(arrow_format::ipc::planus::Error),
    /// The body length declared by a message differs from its block's.
    UnexpectedBodyLength {
        /// The body length of the block, from the footer.
        block: i64,
        /// The body length of the message.
        message: i64,
    },
    /// A record batch does not declare its buffers.
    MissingMessageBuffers,
    /// The buffer descriptors are invalid.
    InvalidFlatbufferBuffers(arrow_format::ipc::planus::Error),
    /// A record batch does not declare its field nodes.
    MissingMessageNodes,
    /// The field-node descriptors are invalid.
    InvalidFlatbufferNodes(arrow_format::ipc::planus::Error),
    /// The compression descriptor is invalid.
    InvalidFlatbufferCompression(arrow_format::ipc::planus::Error),
    /// The loader required a buffer descriptor but the message has none left.
    ExpectedBuffer,
    /// A buffer descriptor points outside the block body.
    InvalidBufferBounds {
        /// The buffer offset relative to the body.
        offset: i64,
        /// The buffer length.
        length: i64,
        /// The body length of the block.
        body_length: i64,
    },
    /// A buffer is too small for the declared number of elements.
    InvalidBuffer {
        /// The declared number of elements.
        length: usize,
        /// The elements' type.
        type_name: &'static str,
        /// The required number of bytes.
        required_number_of_bytes: usize,
        /// The size of the buffer, in bytes.
        buffer_length: usize,
    },
    /// A bitmap buffer is too small for the declared number of bits.
    InvalidBitmap {
        /// The declared number of bits.
        length: usize,
        /// The number of bits the buffer can hold.
        number_of_bits: usize,
    },
    /// A length or offset field is negative.
    UnexpectedNegativeInteger,
    /// A dictionary message references an id no schema field declares.
    InvalidId {
        /// The requested dictionary id.
        requested_id: i64,
    },
    /// The schema field a dictionary id resolves to is not dictionary-encoded.
    InvalidIdDataType {
        /// The requested dictionary id.
        requested_id: i64,
    },
    /// A dictionary message does not carry its values batch.
    MissingData,
    /// The dictionary values batch is invalid.
    InvalidFlatbufferData(arrow_format::ipc::planus::Error),
    /// The delta flag of a dictionary message is invalid.
    InvalidFlatbufferIsDelta(arrow_format::ipc::planus::Error),
    /// The id of a dictionary message is invalid.
    InvalidFlatbufferId(arrow_format::ipc::planus::Error),
}

impl std::fmt::Display for OutOfSpecKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use OutOfSpecKind::*;
        match self {
            UnexpectedBodyLength { block, message } => write!(
                f,
                "the block declares a body of {block} bytes but its message declares {message} bytes"
            ),
            InvalidBufferBounds {
                offset,
                length,
                body_length,
            } => write!(
                f,
                "buffer (offset: {offset}, length: {length}) is out of bounds of a body of {body_length} bytes"
            ),
            InvalidBuffer {
                length,
                type_name,
                required_number_of_bytes,
                buffer_length,
            } => write!(
                f,
                "a buffer of {buffer_length} bytes cannot hold {length} elements of type {type_name} ({required_number_of_bytes} bytes required)"
            ),
            InvalidBitmap {
                length,
                number_of_bits,
            } => write!(
                f,
                "a bitmap of {number_of_bits} bits cannot hold {length} elements"
            ),
            other => write!(f, "{other:?}"),
        }
    }
}
