use std::io::{Read, Seek, SeekFrom};
use std::sync::Arc;

use arrow_format::ipc::planus::ReadAsRoot;
use arrow_format::ipc::FooterRef;
use pico_error::{pico_bail, pico_err, PicoResult};

use super::super::{ARROW_MAGIC_V1, ARROW_MAGIC_V2, CONTINUATION_MARKER};
use super::common::{read_dictionary, read_record_batch};
use super::schema::fb_to_schema;
use super::{Dictionaries, OutOfSpecKind};
use crate::datatypes::SchemaRef;
use crate::io::ipc::IpcSchema;
use crate::record_batch::RecordBatch;

/// Metadata of an Arrow IPC file, decoded from the footer at its end.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// The schema read from the file footer.
    pub schema: SchemaRef,

    /// The file's [`IpcSchema`].
    pub ipc_schema: IpcSchema,

    /// The blocks in the file: a block indicates the region in the file to
    /// read to get a record batch.
    pub blocks: Vec<arrow_format::ipc::Block>,

    /// The dictionary blocks, in the order their batches must be decoded.
    pub dictionaries: Option<Vec<arrow_format::ipc::Block>>,

    /// The metadata-format version declared by the footer.
    pub version: arrow_format::ipc::MetadataVersion,

    /// The total size of the file in bytes.
    pub size: u64,
}

impl FileMetadata {
    /// The number of record batches in the file.
    pub fn num_record_batches(&self) -> usize {
        self.blocks.len()
    }

    /// The number of dictionary batches in the file.
    pub fn num_dictionaries(&self) -> usize {
        self.dictionaries.as_ref().map_or(0, |blocks| blocks.len())
    }
}

// the trailer of the file: the footer length (u32 LE) followed by the magic
const TRAILER_LEN: u64 = 4 + ARROW_MAGIC_V2.len() as u64;

/// Validates a block descriptor: every field must be non-negative and a
/// multiple of 8, and the whole block must lie inside the file.
fn check_block(block: &arrow_format::ipc::Block, file_size: u64) -> PicoResult<()> {
    let offset = block.offset;
    let meta_data_length = i64::from(block.meta_data_length);
    let body_length = block.body_length;

    for (name, value) in [
        ("offset", offset),
        ("metadata length", meta_data_length),
        ("body length", body_length),
    ] {
        if value < 0 {
            pico_bail!(oos = OutOfSpecKind::UnexpectedNegativeInteger)
        }
        if value % 8 != 0 {
            pico_bail!(Misaligned: "block {name} {value} is not a multiple of 8")
        }
    }

    let end = offset
        .checked_add(meta_data_length)
        .and_then(|x| x.checked_add(body_length))
        .ok_or_else(|| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?;
    if end as u64 > file_size {
        pico_bail!(oos = format!(
            "block (offset: {offset}, metadata: {meta_data_length}, body: {body_length}) exceeds the file size of {file_size} bytes"
        ))
    }
    Ok(())
}

/// Reads and validates the file trailer, returning the footer length.
fn read_footer_len<R: Read + Seek>(reader: &mut R, end: u64) -> PicoResult<usize> {
    reader.seek(SeekFrom::Start(end - TRAILER_LEN))?;

    let mut trailer = [0u8; TRAILER_LEN as usize];
    reader.read_exact(&mut trailer)?;

    if trailer[4..] != ARROW_MAGIC_V2 {
        pico_bail!(NotArrowFile: "the file does not end with the arrow magic")
    }

    let footer_len = i32::from_le_bytes(trailer[..4].try_into().unwrap());
    let footer_len: usize = footer_len
        .try_into()
        .map_err(|_| pico_err!(oos = OutOfSpecKind::NegativeFooterLength))?;

    if footer_len == 0 || footer_len as u64 > end - 2 * ARROW_MAGIC_V2.len() as u64 - 4 {
        pico_bail!(oos = OutOfSpecKind::InvalidFooter)
    }

    Ok(footer_len)
}

fn check_head_magic<R: Read + Seek>(reader: &mut R) -> PicoResult<()> {
    reader.seek(SeekFrom::Start(0))?;
    let mut magic = [0u8; ARROW_MAGIC_V2.len()];
    reader.read_exact(&mut magic)?;

    if magic != ARROW_MAGIC_V2 {
        if magic[..4] == ARROW_MAGIC_V1 {
            pico_bail!(Unsupported: "feather v1 files are not supported")
        }
        pico_bail!(NotArrowFile: "the file does not start with the arrow magic")
    }
    Ok(())
}

fn read_footer<R: Read + Seek>(reader: &mut R, end: u64, footer_len: usize) -> PicoResult<Vec<u8>> {
    reader.seek(SeekFrom::Start(end - TRAILER_LEN - footer_len as u64))?;

    let mut serialized_footer = vec![];
    serialized_footer.try_reserve(footer_len)?;
    reader
        .by_ref()
        .take(footer_len as u64)
        .read_to_end(&mut serialized_footer)?;
    Ok(serialized_footer)
}

/// Deserializes a footer metadata region into a [`FileMetadata`].
pub fn deserialize_footer(footer_data: &[u8], size: u64) -> PicoResult<FileMetadata> {
    let footer = FooterRef::read_as_root(footer_data)
        .map_err(|err| pico_err!(oos = OutOfSpecKind::InvalidFlatbufferFooter(err)))?;

    let version = footer
        .version()
        .map_err(|err| pico_err!(oos = OutOfSpecKind::InvalidFlatbufferVersion(err)))?;

    let blocks = footer
        .record_batches()
        .map_err(|err| pico_err!(oos = OutOfSpecKind::InvalidFlatbufferRecordBatches(err)))?
        .ok_or_else(|| pico_err!(oos = OutOfSpecKind::MissingRecordBatches))?;
    let blocks = blocks
        .iter()
        .map(|block| {
            block
                .try_into()
                .map_err(|err| pico_err!(oos = OutOfSpecKind::InvalidFlatbufferRecordBatches(err)))
        })
        .collect::<PicoResult<Vec<arrow_format::ipc::Block>>>()?;

    let ipc_schema = footer
        .schema()
        .map_err(|err| pico_err!(oos = OutOfSpecKind::InvalidFlatbufferSchema(err)))?
        .ok_or_else(|| pico_err!(oos = OutOfSpecKind::MissingSchema))?;
    let (schema, ipc_schema) = fb_to_schema(ipc_schema)?;

    let dictionaries = footer
        .dictionaries()
        .map_err(|err| pico_err!(oos = OutOfSpecKind::InvalidFlatbufferDictionaries(err)))?
        .map(|dictionaries| {
            dictionaries
                .into_iter()
                .map(|block| {
                    block.try_into().map_err(|err| {
                        pico_err!(oos = OutOfSpecKind::InvalidFlatbufferDictionaries(err))
                    })
                })
                .collect::<PicoResult<Vec<_>>>()
        })
        .transpose()?;

    Ok(FileMetadata {
        schema: Arc::new(schema),
        ipc_schema,
        blocks,
        dictionaries,
        version,
        size,
    })
}

/// Reads an Arrow IPC file's metadata from the end of `reader`.
pub fn read_file_metadata<R: Read + Seek>(reader: &mut R) -> PicoResult<FileMetadata> {
    let end = reader.seek(SeekFrom::End(0))?;
    read_file_metadata_at(reader, end)
}

/// Reads an Arrow IPC file's metadata, taking `end` as the position one past
/// the trailing magic (the file size, unless the file is embedded in a
/// larger byte source).
pub fn read_file_metadata_at<R: Read + Seek>(reader: &mut R, end: u64) -> PicoResult<FileMetadata> {
    // the file must hold the two magics, the footer length and a non-empty footer
    if end <= 2 * ARROW_MAGIC_V2.len() as u64 + 4 {
        pico_bail!(oos = format!("the file is too small to be an arrow file: {end} bytes"))
    }

    check_head_magic(reader)?;
    let footer_len = read_footer_len(reader, end)?;
    let serialized_footer = read_footer(reader, end, footer_len)?;
    deserialize_footer(&serialized_footer, end)
}

fn get_message_from_block_offset<'a, R: Read + Seek>(
    reader: &mut R,
    offset: u64,
    message_scratch: &'a mut Vec<u8>,
) -> PicoResult<arrow_format::ipc::MessageRef<'a>> {
    // read length
    reader.seek(SeekFrom::Start(offset))?;
    let mut meta_buf = [0; 4];
    reader.read_exact(&mut meta_buf)?;
    if meta_buf == CONTINUATION_MARKER {
        // continuation marker encountered, read message next
        reader.read_exact(&mut meta_buf)?;
    }
    let meta_len: usize = i32::from_le_bytes(meta_buf)
        .try_into()
        .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?;

    message_scratch.clear();
    message_scratch.try_reserve(meta_len)?;
    reader
        .by_ref()
        .take(meta_len as u64)
        .read_to_end(message_scratch)?;

    arrow_format::ipc::MessageRef::read_as_root(message_scratch)
        .map_err(|err| pico_err!(oos = OutOfSpecKind::InvalidFlatbufferMessage(err)))
}

/// Reads the message of a block and checks that its declared body length
/// matches the block's.
fn get_message_from_block<'a, R: Read + Seek>(
    reader: &mut R,
    block: &arrow_format::ipc::Block,
    message_scratch: &'a mut Vec<u8>,
) -> PicoResult<arrow_format::ipc::MessageRef<'a>> {
    let offset: u64 = block
        .offset
        .try_into()
        .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?;

    let message = get_message_from_block_offset(reader, offset, message_scratch)?;

    let body_length = message
        .body_length()
        .map_err(|err| pico_err!(oos = OutOfSpecKind::InvalidFlatbufferBodyLength(err)))?;
    if body_length != block.body_length {
        pico_bail!(
            oos = OutOfSpecKind::UnexpectedBodyLength {
                block: block.body_length,
                message: body_length,
            }
        )
    }

    Ok(message)
}

pub(crate) fn get_record_batch(
    message: arrow_format::ipc::MessageRef,
) -> PicoResult<arrow_format::ipc::RecordBatchRef> {
    let header = message
        .header()
        .map_err(|err| pico_err!(oos = OutOfSpecKind::InvalidFlatbufferHeader(err)))?
        .ok_or_else(|| pico_err!(oos = OutOfSpecKind::MissingMessageHeader))?;
    match header {
        arrow_format::ipc::MessageHeaderRef::RecordBatch(batch) => Ok(batch),
        _ => pico_bail!(oos = OutOfSpecKind::UnexpectedMessageType),
    }
}

pub(crate) fn get_dictionary_batch<'a>(
    message: &'a arrow_format::ipc::MessageRef,
) -> PicoResult<arrow_format::ipc::DictionaryBatchRef<'a>> {
    let header = message
        .header()
        .map_err(|err| pico_err!(oos = OutOfSpecKind::InvalidFlatbufferHeader(err)))?
        .ok_or_else(|| pico_err!(oos = OutOfSpecKind::MissingMessageHeader))?;
    match header {
        arrow_format::ipc::MessageHeaderRef::DictionaryBatch(batch) => Ok(batch),
        _ => pico_bail!(oos = OutOfSpecKind::UnexpectedMessageType),
    }
}

fn read_dictionary_block<R: Read + Seek>(
    reader: &mut R,
    metadata: &FileMetadata,
    block: &arrow_format::ipc::Block,
    dictionaries: &mut Dictionaries,
    message_scratch: &mut Vec<u8>,
    dictionary_scratch: &mut Vec<u8>,
) -> PicoResult<()> {
    check_block(block, metadata.size)?;

    let message = get_message_from_block(reader, block, message_scratch)?;
    let batch = get_dictionary_batch(&message)?;

    let offset: u64 = block
        .offset
        .try_into()
        .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?;
    let length: u64 = block
        .meta_data_length
        .try_into()
        .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?;

    read_dictionary(
        batch,
        &metadata.schema.fields,
        &metadata.ipc_schema,
        dictionaries,
        reader,
        offset + length,
        block.body_length as u64,
        dictionary_scratch,
    )
}

/// Reads all the file's dictionary batches into a [`Dictionaries`] memo.
/// This function is IO-bounded.
pub fn read_file_dictionaries<R: Read + Seek>(
    reader: &mut R,
    metadata: &FileMetadata,
    scratch: &mut Vec<u8>,
) -> PicoResult<Dictionaries> {
    let mut dictionaries = Dictionaries::default();

    let blocks = if let Some(blocks) = &metadata.dictionaries {
        blocks
    } else {
        return Ok(dictionaries);
    };
    // use a temporary smaller scratch for the messages
    let mut message_scratch: Vec<u8> = Default::default();

    for block in blocks {
        read_dictionary_block(
            reader,
            metadata,
            block,
            &mut dictionaries,
            &mut message_scratch,
            scratch,
        )?;
    }
    Ok(dictionaries)
}

/// Reads the record batch at position `index` from the reader.
///
/// This function is useful for random access to the file: the dictionaries
/// and metadata are immutable, so multiple threads may call it concurrently
/// over the same file provided each drives its own reader handle.
/// # Panics
/// Panics iff `index >= metadata.num_record_batches()`: an out-of-bounds
/// index is a programming error, not a property of the file.
pub fn read_batch<R: Read + Seek>(
    reader: &mut R,
    dictionaries: &Dictionaries,
    metadata: &FileMetadata,
    index: usize,
    message_scratch: &mut Vec<u8>,
    data_scratch: &mut Vec<u8>,
) -> PicoResult<RecordBatch> {
    assert!(
        index < metadata.blocks.len(),
        "record batch index out of bounds"
    );
    let block = metadata.blocks[index];
    check_block(&block, metadata.size)?;

    let message = get_message_from_block(reader, &block, message_scratch)?;
    let batch = get_record_batch(message)?;

    let offset: u64 = block
        .offset
        .try_into()
        .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?;
    let length: u64 = block
        .meta_data_length
        .try_into()
        .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?;

    read_record_batch(
        batch,
        &metadata.schema,
        &metadata.ipc_schema,
        dictionaries,
        reader,
        offset + length,
        block.body_length as u64,
        data_scratch,
    )
}
