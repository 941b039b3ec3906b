use std::io::{Read, Seek};

use pico_error::{pico_bail, PicoResult};

use super::file::{
    read_batch, read_file_dictionaries, read_file_metadata, read_file_metadata_at, FileMetadata,
};
use super::Dictionaries;
use crate::datatypes::SchemaRef;
use crate::record_batch::RecordBatch;

/// Options of [`FileReader::try_new`].
#[derive(Debug, Clone, Default)]
pub struct FileReaderOptions {
    /// The position one past the trailing magic. Defaults to seeking to the
    /// end of the source; set it when the file is embedded in a larger byte
    /// source.
    pub footer_offset: Option<u64>,
    /// When set, opening fails with `SchemaMismatch` if the file's schema
    /// differs from it.
    pub expected_schema: Option<SchemaRef>,
}

/// A random-access and sequential reader over an Arrow IPC file.
///
/// The reader holds the decoded footer metadata and the dictionary memo,
/// both immutable once constructed, plus a single source handle it drives
/// for every read. For concurrent random access, share the
/// [`FileMetadata`] and [`Dictionaries`] across threads and call
/// [`read_batch`] with one source handle per thread.
pub struct FileReader<R: Read + Seek> {
    reader: R,
    metadata: FileMetadata,
    dictionaries: Dictionaries,
    // the cursor of the `Iterator` implementation
    current_block: usize,
    // the batch cached by `record_batch`, replaced at the next call
    current: Option<RecordBatch>,
    message_scratch: Vec<u8>,
    data_scratch: Vec<u8>,
}

impl<R: Read + Seek> FileReader<R> {
    /// Opens the file: decodes and validates the footer, compares the
    /// schema against `options.expected_schema` when provided, and eagerly
    /// loads the dictionary memo.
    pub fn try_new(mut reader: R, options: FileReaderOptions) -> PicoResult<Self> {
        let metadata = if let Some(end) = options.footer_offset {
            read_file_metadata_at(&mut reader, end)?
        } else {
            read_file_metadata(&mut reader)?
        };

        if let Some(expected) = &options.expected_schema {
            if expected.as_ref() != metadata.schema.as_ref() {
                pico_bail!(SchemaMismatch:
                    "the file's schema is not the expected one (got: {:?}, want: {:?})",
                    metadata.schema,
                    expected
                )
            }
        }

        let mut data_scratch = Vec::new();
        let dictionaries = read_file_dictionaries(&mut reader, &metadata, &mut data_scratch)?;

        Ok(Self {
            reader,
            metadata,
            dictionaries,
            current_block: 0,
            current: None,
            message_scratch: Default::default(),
            data_scratch,
        })
    }

    /// Creates a new [`FileReader`] from already-decoded metadata and
    /// dictionaries.
    pub fn new(reader: R, metadata: FileMetadata, dictionaries: Dictionaries) -> Self {
        Self {
            reader,
            metadata,
            dictionaries,
            current_block: 0,
            current: None,
            message_scratch: Default::default(),
            data_scratch: Default::default(),
        }
    }

    /// The file's metadata.
    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    /// The file's schema.
    pub fn schema(&self) -> &SchemaRef {
        &self.metadata.schema
    }

    /// The metadata-format version of the file.
    pub fn version(&self) -> arrow_format::ipc::MetadataVersion {
        self.metadata.version
    }

    /// The number of record batches in the file.
    pub fn num_record_batches(&self) -> usize {
        self.metadata.num_record_batches()
    }

    /// The number of dictionary batches in the file.
    pub fn num_dictionaries(&self) -> usize {
        self.metadata.num_dictionaries()
    }

    /// Reads the record batch at position `index`, returning an owned batch.
    ///
    /// Reading the same index twice returns equal batches.
    /// # Panics
    /// Panics iff `index >= self.num_record_batches()`: an out-of-bounds
    /// index is a programming error, not a property of the file.
    pub fn record_batch_at(&mut self, index: usize) -> PicoResult<RecordBatch> {
        read_batch(
            &mut self.reader,
            &self.dictionaries,
            &self.metadata,
            index,
            &mut self.message_scratch,
            &mut self.data_scratch,
        )
    }

    /// Reads the record batch at position `index` into the reader's cache,
    /// returning a reference valid until the next call to this function.
    /// # Panics
    /// Panics iff `index >= self.num_record_batches()`.
    pub fn record_batch(&mut self, index: usize) -> PicoResult<&RecordBatch> {
        let batch = self.record_batch_at(index)?;
        Ok(self.current.insert(batch))
    }

    /// Consumes the reader, returning the source. The decoded metadata,
    /// the dictionary memo and any cached batch are dropped; the source is
    /// not closed.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Seek> Iterator for FileReader<R> {
    type Item = PicoResult<RecordBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_block == self.metadata.blocks.len() {
            return None;
        }
        let batch = self.record_batch_at(self.current_block);
        self.current_block += 1;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.metadata.blocks.len() - self.current_block;
        (remaining, Some(remaining))
    }
}
