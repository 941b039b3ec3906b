//! A small writer over `arrow_format`'s builder, used to synthesize IPC
//! files bit-exactly without a writer in the crate under test.
use arrow_format::ipc;
use arrow_format::ipc::planus::Builder;
use pico_arrow::datatypes::{DataType, Field, IntervalUnit, Schema, TimeUnit, UnionMode};

pub const MAGIC: [u8; 6] = *b"ARROW1";
pub const CONTINUATION: [u8; 4] = [0xff; 4];

fn ipc_timeunit(unit: TimeUnit) -> ipc::TimeUnit {
    match unit {
        TimeUnit::Second => ipc::TimeUnit::Second,
        TimeUnit::Millisecond => ipc::TimeUnit::Millisecond,
        TimeUnit::Microsecond => ipc::TimeUnit::Microsecond,
        TimeUnit::Nanosecond => ipc::TimeUnit::Nanosecond,
    }
}

fn int_type(bit_width: i32, is_signed: bool) -> ipc::Type {
    ipc::Type::Int(Box::new(ipc::Int {
        bit_width,
        is_signed,
    }))
}

/// Serializes a logical type into its flatbuffer representation plus the
/// serialized child fields.
fn ipc_type(data_type: &DataType) -> (ipc::Type, Vec<ipc::Field>) {
    use DataType::*;
    match data_type {
        Null => (ipc::Type::Null(Box::new(ipc::Null {})), vec![]),
        Boolean => (ipc::Type::Bool(Box::new(ipc::Bool {})), vec![]),
        Int8 => (int_type(8, true), vec![]),
        Int16 => (int_type(16, true), vec![]),
        Int32 => (int_type(32, true), vec![]),
        Int64 => (int_type(64, true), vec![]),
        UInt8 => (int_type(8, false), vec![]),
        UInt16 => (int_type(16, false), vec![]),
        UInt32 => (int_type(32, false), vec![]),
        UInt64 => (int_type(64, false), vec![]),
        Float16 => (
            ipc::Type::FloatingPoint(Box::new(ipc::FloatingPoint {
                precision: ipc::Precision::Half,
            })),
            vec![],
        ),
        Float32 => (
            ipc::Type::FloatingPoint(Box::new(ipc::FloatingPoint {
                precision: ipc::Precision::Single,
            })),
            vec![],
        ),
        Float64 => (
            ipc::Type::FloatingPoint(Box::new(ipc::FloatingPoint {
                precision: ipc::Precision::Double,
            })),
            vec![],
        ),
        Decimal(precision, scale) => (
            ipc::Type::Decimal(Box::new(ipc::Decimal {
                precision: *precision as i32,
                scale: *scale as i32,
                bit_width: 128,
            })),
            vec![],
        ),
        Date32 => (
            ipc::Type::Date(Box::new(ipc::Date {
                unit: ipc::DateUnit::Day,
            })),
            vec![],
        ),
        Date64 => (
            ipc::Type::Date(Box::new(ipc::Date {
                unit: ipc::DateUnit::Millisecond,
            })),
            vec![],
        ),
        Time32(unit) => (
            ipc::Type::Time(Box::new(ipc::Time {
                unit: ipc_timeunit(*unit),
                bit_width: 32,
            })),
            vec![],
        ),
        Time64(unit) => (
            ipc::Type::Time(Box::new(ipc::Time {
                unit: ipc_timeunit(*unit),
                bit_width: 64,
            })),
            vec![],
        ),
        Timestamp(unit, timezone) => (
            ipc::Type::Timestamp(Box::new(ipc::Timestamp {
                unit: ipc_timeunit(*unit),
                timezone: timezone.clone(),
            })),
            vec![],
        ),
        Duration(unit) => (
            ipc::Type::Duration(Box::new(ipc::Duration {
                unit: ipc_timeunit(*unit),
            })),
            vec![],
        ),
        Interval(unit) => (
            ipc::Type::Interval(Box::new(ipc::Interval {
                unit: match unit {
                    IntervalUnit::YearMonth => ipc::IntervalUnit::YearMonth,
                    IntervalUnit::DayTime => ipc::IntervalUnit::DayTime,
                    IntervalUnit::MonthDayNano => ipc::IntervalUnit::MonthDayNano,
                },
            })),
            vec![],
        ),
        Binary => (ipc::Type::Binary(Box::new(ipc::Binary {})), vec![]),
        LargeBinary => (
            ipc::Type::LargeBinary(Box::new(ipc::LargeBinary {})),
            vec![],
        ),
        Utf8 => (ipc::Type::Utf8(Box::new(ipc::Utf8 {})), vec![]),
        LargeUtf8 => (ipc::Type::LargeUtf8(Box::new(ipc::LargeUtf8 {})), vec![]),
        FixedSizeBinary(size) => (
            ipc::Type::FixedSizeBinary(Box::new(ipc::FixedSizeBinary {
                byte_width: *size as i32,
            })),
            vec![],
        ),
        List(inner) => (
            ipc::Type::List(Box::new(ipc::List {})),
            vec![ipc_field(inner)],
        ),
        LargeList(inner) => (
            ipc::Type::LargeList(Box::new(ipc::LargeList {})),
            vec![ipc_field(inner)],
        ),
        FixedSizeList(inner, size) => (
            ipc::Type::FixedSizeList(Box::new(ipc::FixedSizeList {
                list_size: *size as i32,
            })),
            vec![ipc_field(inner)],
        ),
        Struct(fields) => (
            ipc::Type::Struct(Box::new(ipc::Struct {})),
            fields.iter().map(ipc_field).collect(),
        ),
        Map(inner, keys_sorted) => (
            ipc::Type::Map(Box::new(ipc::Map {
                keys_sorted: *keys_sorted,
            })),
            vec![ipc_field(inner)],
        ),
        Union(fields, ids, mode) => (
            ipc::Type::Union(Box::new(ipc::Union {
                mode: match mode {
                    UnionMode::Dense => ipc::UnionMode::Dense,
                    UnionMode::Sparse => ipc::UnionMode::Sparse,
                },
                type_ids: ids.clone(),
            })),
            fields.iter().map(ipc_field).collect(),
        ),
        other => panic!("type {other:?} is not supported by the test writer"),
    }
}

pub fn ipc_field(field: &Field) -> ipc::Field {
    let (type_, children) = ipc_type(field.data_type.to_logical_type());
    let custom_metadata = if field.metadata.is_empty() {
        None
    } else {
        Some(
            field
                .metadata
                .iter()
                .map(|(key, value)| ipc::KeyValue {
                    key: Some(key.clone()),
                    value: Some(value.clone()),
                })
                .collect(),
        )
    };
    ipc::Field {
        name: Some(field.name.clone()),
        nullable: field.is_nullable,
        type_: Some(type_),
        dictionary: None,
        children: Some(children),
        custom_metadata,
    }
}

fn serialize<T>(root: &T) -> Vec<u8>
where
    for<'a> &'a T: ipc::planus::WriteAsOffset<T>,
{
    let mut builder = Builder::new();
    builder.finish(root, None).to_vec()
}

/// The per-buffer body encoding the builder applies.
#[derive(Clone, Copy, Debug)]
pub enum BodyCodec {
    Zstd,
    Lz4,
    /// Declares ZSTD but stores every buffer raw behind the `-1` sentinel.
    ZstdSentinel,
}

impl BodyCodec {
    fn compression_type(&self) -> ipc::CompressionType {
        match self {
            BodyCodec::Zstd | BodyCodec::ZstdSentinel => ipc::CompressionType::Zstd,
            BodyCodec::Lz4 => ipc::CompressionType::Lz4Frame,
        }
    }

    fn encode(&self, raw: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            BodyCodec::Zstd => {
                out.extend_from_slice(&(raw.len() as i64).to_le_bytes());
                out.extend_from_slice(&zstd::encode_all(raw, 0).unwrap());
            },
            BodyCodec::Lz4 => {
                out.extend_from_slice(&(raw.len() as i64).to_le_bytes());
                let mut encoder = lz4::EncoderBuilder::new().build(Vec::new()).unwrap();
                std::io::Write::write_all(&mut encoder, raw).unwrap();
                let (frame, result) = encoder.finish();
                result.unwrap();
                out.extend_from_slice(&frame);
            },
            BodyCodec::ZstdSentinel => {
                out.extend_from_slice(&(-1i64).to_le_bytes());
                out.extend_from_slice(raw);
            },
        }
        out
    }
}

/// Serializes an Arrow IPC file: magic, schema message, batches, footer.
pub struct FileBuilder {
    pub data: Vec<u8>,
    pub fields: Vec<ipc::Field>,
    pub record_blocks: Vec<ipc::Block>,
    pub dictionary_blocks: Vec<ipc::Block>,
}

impl FileBuilder {
    pub fn new(schema: &Schema) -> Self {
        Self::from_ipc_fields(schema.fields.iter().map(ipc_field).collect())
    }

    /// Builds over already-serialized fields, for dictionary-encoded cases
    /// the logical [`Schema`] cannot express directly.
    pub fn from_ipc_fields(fields: Vec<ipc::Field>) -> Self {
        let mut builder = Self {
            data: vec![],
            fields,
            record_blocks: vec![],
            dictionary_blocks: vec![],
        };
        builder.data.extend_from_slice(&MAGIC);
        // pad the header to an 8-byte boundary
        builder.data.extend_from_slice(&[0, 0]);

        let message = ipc::Message {
            version: ipc::MetadataVersion::V5,
            header: Some(ipc::MessageHeader::Schema(Box::new(
                builder.ipc_schema(),
            ))),
            body_length: 0,
            custom_metadata: None,
        };
        builder.write_message(&message, &[]);
        builder
    }

    fn ipc_schema(&self) -> ipc::Schema {
        ipc::Schema {
            endianness: ipc::Endianness::Little,
            fields: Some(self.fields.clone()),
            custom_metadata: None,
            features: None,
        }
    }

    /// Writes a length-prefixed message (with continuation marker and 8-byte
    /// padding) followed by its body, returning the block locating it.
    fn write_message(&mut self, message: &ipc::Message, body: &[u8]) -> ipc::Block {
        let offset = self.data.len();
        let flatbuffer = serialize(message);
        let padded_len = flatbuffer.len().div_ceil(8) * 8;

        self.data.extend_from_slice(&CONTINUATION);
        self.data
            .extend_from_slice(&(padded_len as i32).to_le_bytes());
        self.data.extend_from_slice(&flatbuffer);
        self.data.resize(offset + 8 + padded_len, 0);
        self.data.extend_from_slice(body);

        ipc::Block {
            offset: offset as i64,
            meta_data_length: (8 + padded_len) as i32,
            body_length: body.len() as i64,
        }
    }

    /// Lays out `buffers` into a body (8-byte aligned offsets, unpadded
    /// descriptor lengths) and returns the descriptors plus the body bytes.
    /// Empty buffers get a zero-length descriptor and no body bytes.
    fn layout_body(buffers: &[Vec<u8>], codec: Option<BodyCodec>) -> (Vec<ipc::Buffer>, Vec<u8>) {
        let mut body = Vec::new();
        let mut descriptors = Vec::new();
        for raw in buffers {
            let encoded: Vec<u8> = match (raw.is_empty(), codec) {
                (true, _) | (_, None) => raw.clone(),
                (false, Some(codec)) => codec.encode(raw),
            };
            descriptors.push(ipc::Buffer {
                offset: body.len() as i64,
                length: encoded.len() as i64,
            });
            body.extend_from_slice(&encoded);
            while body.len() % 8 != 0 {
                body.push(0);
            }
        }
        (descriptors, body)
    }

    fn record_batch_header(
        length: i64,
        nodes: &[(i64, i64)],
        descriptors: Vec<ipc::Buffer>,
        codec: Option<BodyCodec>,
    ) -> ipc::RecordBatch {
        ipc::RecordBatch {
            length,
            nodes: Some(
                nodes
                    .iter()
                    .map(|(length, null_count)| ipc::FieldNode {
                        length: *length,
                        null_count: *null_count,
                    })
                    .collect(),
            ),
            buffers: Some(descriptors),
            compression: codec.map(|codec| {
                Box::new(ipc::BodyCompression {
                    codec: codec.compression_type(),
                    method: ipc::BodyCompressionMethod::Buffer,
                })
            }),
        }
    }

    /// Appends a record batch. `nodes` are `(length, null_count)` pairs in
    /// pre-order; `buffers` are the raw (uncompressed) buffer contents in
    /// consumption order.
    pub fn record_batch(
        &mut self,
        length: i64,
        nodes: &[(i64, i64)],
        buffers: &[Vec<u8>],
        codec: Option<BodyCodec>,
    ) {
        let (descriptors, body) = Self::layout_body(buffers, codec);
        let message = ipc::Message {
            version: ipc::MetadataVersion::V5,
            header: Some(ipc::MessageHeader::RecordBatch(Box::new(
                Self::record_batch_header(length, nodes, descriptors, codec),
            ))),
            body_length: body.len() as i64,
            custom_metadata: None,
        };
        let block = self.write_message(&message, &body);
        self.record_blocks.push(block);
    }

    /// Appends a dictionary batch holding a single-column values batch.
    pub fn dictionary_batch(
        &mut self,
        id: i64,
        length: i64,
        nodes: &[(i64, i64)],
        buffers: &[Vec<u8>],
    ) {
        let (descriptors, body) = Self::layout_body(buffers, None);
        let message = ipc::Message {
            version: ipc::MetadataVersion::V5,
            header: Some(ipc::MessageHeader::DictionaryBatch(Box::new(
                ipc::DictionaryBatch {
                    id,
                    data: Some(Box::new(Self::record_batch_header(
                        length, nodes, descriptors, None,
                    ))),
                    is_delta: false,
                },
            ))),
            body_length: body.len() as i64,
            custom_metadata: None,
        };
        let block = self.write_message(&message, &body);
        self.dictionary_blocks.push(block);
    }

    /// Writes the end-of-stream marker, the footer and the trailer.
    pub fn finish(mut self) -> Vec<u8> {
        self.data.extend_from_slice(&CONTINUATION);
        self.data.extend_from_slice(&0i32.to_le_bytes());

        let footer = ipc::Footer {
            version: ipc::MetadataVersion::V5,
            schema: Some(Box::new(self.ipc_schema())),
            dictionaries: Some(self.dictionary_blocks),
            record_batches: Some(self.record_blocks),
            custom_metadata: None,
        };
        let flatbuffer = serialize(&footer);
        self.data.extend_from_slice(&flatbuffer);
        self.data
            .extend_from_slice(&(flatbuffer.len() as i32).to_le_bytes());
        self.data.extend_from_slice(&MAGIC);
        self.data
    }
}

/// Little-endian bytes of a slice of plain values.
pub fn le_bytes<T: bytemuck::Pod>(values: &[T]) -> Vec<u8> {
    bytemuck::cast_slice(values).to_vec()
}
