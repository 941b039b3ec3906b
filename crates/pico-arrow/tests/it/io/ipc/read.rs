use std::io::Cursor;
use std::sync::Arc;

use arrow_format::ipc;
use pico_arrow::array::*;
use pico_arrow::bitmap::Bitmap;
use pico_arrow::datatypes::{DataType, Field, Schema, TimeUnit, UnionMode};
use pico_arrow::io::ipc::read::{
    read_batch, read_file_metadata, Dictionaries, FileReader, FileReaderOptions,
};
use pico_error::PicoError;

use super::{le_bytes, FileBuilder};

fn open(data: Vec<u8>) -> FileReader<Cursor<Vec<u8>>> {
    FileReader::try_new(Cursor::new(data), Default::default()).unwrap()
}

#[test]
fn empty_table() {
    let schema = Schema::from(vec![]);
    let data = FileBuilder::new(&schema).finish();

    let mut reader = open(data);
    assert_eq!(reader.num_record_batches(), 0);
    assert_eq!(reader.num_dictionaries(), 0);
    assert_eq!(reader.version(), ipc::MetadataVersion::V5);
    assert!(reader.schema().fields.is_empty());
    assert!(reader.next().is_none());
}

#[test]
fn int32_no_nulls() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(3, &[(3, 0)], &[vec![], le_bytes(&[1i32, 2, 3])], None);
    let data = builder.finish();

    let mut reader = open(data);
    assert_eq!(reader.num_record_batches(), 1);
    let batch = reader.record_batch_at(0).unwrap();
    assert_eq!(batch.len(), 3);

    let column = &batch.arrays()[0];
    assert!(column.validity().is_none());
    assert_eq!(*column, PrimitiveArray::<i32>::from_slice([1, 2, 3]).boxed());
}

#[test]
fn int32_with_null() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    // validity 0b101: the middle value is unset (its slot is don't-care)
    builder.record_batch(
        3,
        &[(3, 1)],
        &[vec![0b0000_0101], le_bytes(&[1i32, 0, 3])],
        None,
    );
    let data = builder.finish();

    let batch = open(data).record_batch_at(0).unwrap();
    let expected = PrimitiveArray::<i32>::from([Some(1), None, Some(3)]).boxed();
    assert_eq!(batch.arrays()[0], expected);
    assert_eq!(batch.arrays()[0].null_count(), 1);
}

#[test]
fn utf8() {
    let schema = Schema::from(vec![Field::new("a", DataType::Utf8, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(
        2,
        &[(2, 0)],
        &[vec![], le_bytes(&[0i32, 2, 5]), b"abcde".to_vec()],
        None,
    );
    let data = builder.finish();

    let batch = open(data).record_batch_at(0).unwrap();
    let expected = Utf8Array::<i32>::from_slice(["ab", "cde"]).boxed();
    assert_eq!(batch.arrays()[0], expected);
    assert!(batch.arrays()[0].validity().is_none());
}

#[test]
fn boolean() {
    let schema = Schema::from(vec![Field::new("a", DataType::Boolean, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(
        4,
        &[(4, 1)],
        &[vec![0b0000_1011], vec![0b0000_0011]],
        None,
    );
    let data = builder.finish();

    let batch = open(data).record_batch_at(0).unwrap();
    let expected = BooleanArray::from([Some(true), Some(true), None, Some(false)]).boxed();
    assert_eq!(batch.arrays()[0], expected);
}

#[test]
fn struct_slot_order() {
    // node order is struct, a, b; buffer order is struct-validity,
    // a-validity, a-values, b-validity, b-offsets, b-values
    let fields = vec![
        Field::new("a", DataType::Int32, true),
        Field::new("b", DataType::Utf8, true),
    ];
    let data_type = DataType::Struct(fields.clone());
    let schema = Schema::from(vec![Field::new("s", data_type.clone(), true)]);

    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(
        1,
        &[(1, 0), (1, 0), (1, 0)],
        &[
            vec![],
            vec![],
            le_bytes(&[7i32]),
            vec![],
            le_bytes(&[0i32, 1]),
            b"x".to_vec(),
        ],
        None,
    );
    let data = builder.finish();

    let batch = open(data).record_batch_at(0).unwrap();
    let expected = StructArray::new(
        data_type,
        1,
        vec![
            PrimitiveArray::<i32>::from_slice([7]).boxed(),
            Utf8Array::<i32>::from_slice(["x"]).boxed(),
        ],
        None,
    )
    .boxed();
    assert_eq!(batch.arrays()[0], expected);
}

#[test]
fn list() {
    let data_type = DataType::List(Box::new(Field::new("item", DataType::Int32, true)));
    let schema = Schema::from(vec![Field::new("a", data_type.clone(), true)]);

    // [[1, 2], [], None]
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(
        3,
        &[(3, 1), (2, 0)],
        &[
            vec![0b0000_0011],
            le_bytes(&[0i32, 2, 2, 2]),
            vec![],
            le_bytes(&[1i32, 2]),
        ],
        None,
    );
    let data = builder.finish();

    let batch = open(data).record_batch_at(0).unwrap();
    let expected = ListArray::<i32>::new(
        data_type,
        vec![0i32, 2, 2, 2].try_into().unwrap(),
        PrimitiveArray::<i32>::from_slice([1, 2]).boxed(),
        Some(Bitmap::from([true, true, false])),
    )
    .boxed();
    assert_eq!(batch.arrays()[0], expected);
}

#[test]
fn fixed_size_list() {
    let data_type =
        DataType::FixedSizeList(Box::new(Field::new("item", DataType::Int32, true)), 2);
    let schema = Schema::from(vec![Field::new("a", data_type.clone(), true)]);

    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(
        2,
        &[(2, 0), (4, 0)],
        &[vec![], vec![], le_bytes(&[1i32, 2, 3, 4])],
        None,
    );
    let data = builder.finish();

    let batch = open(data).record_batch_at(0).unwrap();
    let expected = FixedSizeListArray::new(
        data_type,
        PrimitiveArray::<i32>::from_slice([1, 2, 3, 4]).boxed(),
        None,
    )
    .boxed();
    assert_eq!(batch.arrays()[0], expected);
}

#[test]
fn map() {
    let entries = DataType::Struct(vec![
        Field::new("key", DataType::Utf8, false),
        Field::new("value", DataType::Int32, true),
    ]);
    let data_type = DataType::Map(
        Box::new(Field::new("entries", entries.clone(), false)),
        false,
    );
    let schema = Schema::from(vec![Field::new("a", data_type.clone(), true)]);

    // {"a": 1}, {"b": 2, "c": 3}
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(
        2,
        &[(2, 0), (3, 0), (3, 0), (3, 0)],
        &[
            vec![],
            le_bytes(&[0i32, 1, 3]),
            vec![],
            vec![],
            le_bytes(&[0i32, 1, 2, 3]),
            b"abc".to_vec(),
            vec![],
            le_bytes(&[1i32, 2, 3]),
        ],
        None,
    );
    let data = builder.finish();

    let batch = open(data).record_batch_at(0).unwrap();
    let expected = MapArray::new(
        data_type,
        vec![0i32, 1, 3].try_into().unwrap(),
        StructArray::new(
            entries,
            3,
            vec![
                Utf8Array::<i32>::from_slice(["a", "b", "c"]).boxed(),
                PrimitiveArray::<i32>::from_slice([1, 2, 3]).boxed(),
            ],
            None,
        )
        .boxed(),
        None,
    )
    .boxed();
    assert_eq!(batch.arrays()[0], expected);
}

#[test]
fn fixed_size_binary() {
    let schema = Schema::from(vec![Field::new("a", DataType::FixedSizeBinary(2), true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(2, &[(2, 0)], &[vec![], vec![1, 2, 3, 4]], None);
    let data = builder.finish();

    let batch = open(data).record_batch_at(0).unwrap();
    let expected = FixedSizeBinaryArray::from_slice([[1u8, 2], [3, 4]]).boxed();
    assert_eq!(batch.arrays()[0], expected);
}

#[test]
fn null_column_empty_body() {
    // a record whose only column is of the null type has no body at all
    let schema = Schema::from(vec![Field::new("a", DataType::Null, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(3, &[(3, 3)], &[], None);
    let data = builder.finish();

    let batch = open(data).record_batch_at(0).unwrap();
    assert_eq!(batch.len(), 3);
    assert_eq!(batch.arrays()[0], NullArray::new(DataType::Null, 3).boxed());
    assert_eq!(batch.arrays()[0].null_count(), 3);
}

#[test]
fn zero_length_primitive_consumes_slot() {
    // the values slot of an empty primitive array is counted but not read
    let schema = Schema::from(vec![
        Field::new("a", DataType::Int32, true),
        Field::new("b", DataType::Int64, true),
    ]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(
        0,
        &[(0, 0), (0, 0)],
        &[vec![], vec![], vec![], vec![]],
        None,
    );
    let data = builder.finish();

    let batch = open(data).record_batch_at(0).unwrap();
    assert_eq!(batch.len(), 0);
    assert_eq!(
        batch.arrays()[0],
        PrimitiveArray::<i32>::from_slice([]).boxed()
    );
    assert_eq!(
        batch.arrays()[1],
        PrimitiveArray::<i64>::from_slice([]).boxed()
    );
}

#[test]
fn temporal_and_decimal() {
    let schema = Schema::from(vec![
        Field::new(
            "ts",
            DataType::Timestamp(TimeUnit::Millisecond, Some("+00:00".to_string())),
            true,
        ),
        Field::new("d", DataType::Date32, true),
        Field::new("dec", DataType::Decimal(38, 2), true),
    ]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(
        2,
        &[(2, 0), (2, 0), (2, 0)],
        &[
            vec![],
            le_bytes(&[1_000i64, 2_000]),
            vec![],
            le_bytes(&[10i32, 20]),
            vec![],
            le_bytes(&[100i128, -200]),
        ],
        None,
    );
    let data = builder.finish();

    let batch = open(data).record_batch_at(0).unwrap();
    assert_eq!(
        batch.arrays()[0],
        PrimitiveArray::<i64>::from_slice([1_000, 2_000])
            .to(DataType::Timestamp(
                TimeUnit::Millisecond,
                Some("+00:00".to_string())
            ))
            .boxed()
    );
    assert_eq!(
        batch.arrays()[1],
        PrimitiveArray::<i32>::from_slice([10, 20])
            .to(DataType::Date32)
            .boxed()
    );
    assert_eq!(
        batch.arrays()[2],
        PrimitiveArray::<i128>::from_slice([100, -200])
            .to(DataType::Decimal(38, 2))
            .boxed()
    );
}

#[test]
fn extension_reads_storage() {
    let mut field = Field::new("e", DataType::Int32, true);
    field
        .metadata
        .insert("ARROW:extension:name".to_string(), "com.example.id".to_string());
    let schema = Schema::from(vec![field]);

    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(2, &[(2, 0)], &[vec![], le_bytes(&[5i32, 6])], None);
    let data = builder.finish();

    let mut reader = open(data);
    let data_type = DataType::Extension(
        "com.example.id".to_string(),
        Box::new(DataType::Int32),
        None,
    );
    assert_eq!(reader.schema().fields[0].data_type, data_type);

    let batch = reader.record_batch_at(0).unwrap();
    let expected = PrimitiveArray::<i32>::try_new(data_type, vec![5, 6].into(), None)
        .unwrap()
        .boxed();
    assert_eq!(batch.arrays()[0], expected);
}

#[test]
fn sequential_read_equals_indexed() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(2, &[(2, 0)], &[vec![], le_bytes(&[1i32, 2])], None);
    builder.record_batch(3, &[(3, 0)], &[vec![], le_bytes(&[3i32, 4, 5])], None);
    let data = builder.finish();

    let mut reader = open(data.clone());
    let indexed = vec![
        reader.record_batch_at(0).unwrap(),
        reader.record_batch_at(1).unwrap(),
    ];

    let reader = open(data);
    let sequential = reader.collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(indexed, sequential);
}

#[test]
fn record_batch_at_is_idempotent() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(3, &[(3, 0)], &[vec![], le_bytes(&[1i32, 2, 3])], None);
    let data = builder.finish();

    let mut reader = open(data);
    let first = reader.record_batch_at(0).unwrap();
    let second = reader.record_batch_at(0).unwrap();
    assert_eq!(first, second);
}

#[test]
fn cached_record_batch() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(1, &[(1, 0)], &[vec![], le_bytes(&[1i32])], None);
    builder.record_batch(1, &[(1, 0)], &[vec![], le_bytes(&[2i32])], None);
    let data = builder.finish();

    let mut reader = open(data);
    let batch = reader.record_batch(0).unwrap();
    assert_eq!(
        batch.arrays()[0],
        PrimitiveArray::<i32>::from_slice([1]).boxed()
    );
    let batch = reader.record_batch(1).unwrap();
    assert_eq!(
        batch.arrays()[0],
        PrimitiveArray::<i32>::from_slice([2]).boxed()
    );
}

#[test]
#[should_panic(expected = "record batch index out of bounds")]
fn record_batch_at_out_of_bounds_panics() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(1, &[(1, 0)], &[vec![], le_bytes(&[1i32])], None);
    let data = builder.finish();

    let mut reader = open(data);
    // one past the end is out of bounds
    let _ = reader.record_batch_at(1);
}

#[test]
fn concurrent_reads_equal_serial() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(2, &[(2, 0)], &[vec![], le_bytes(&[1i32, 2])], None);
    builder.record_batch(2, &[(2, 0)], &[vec![], le_bytes(&[3i32, 4])], None);
    let data = builder.finish();

    let metadata = Arc::new(read_file_metadata(&mut Cursor::new(&data)).unwrap());
    let dictionaries = Arc::new(Dictionaries::default());

    let serial: Vec<_> = (0..2)
        .map(|index| {
            read_batch(
                &mut Cursor::new(&data),
                &dictionaries,
                &metadata,
                index,
                &mut vec![],
                &mut vec![],
            )
            .unwrap()
        })
        .collect();

    let concurrent = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|index| {
                let metadata = metadata.clone();
                let dictionaries = dictionaries.clone();
                let data = &data;
                scope.spawn(move || {
                    read_batch(
                        &mut Cursor::new(data),
                        &dictionaries,
                        &metadata,
                        index,
                        &mut vec![],
                        &mut vec![],
                    )
                    .unwrap()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(serial, concurrent);
}

#[test]
fn footer_offset_option() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(1, &[(1, 0)], &[vec![], le_bytes(&[7i32])], None);
    let mut data = builder.finish();
    let end = data.len() as u64;
    // the file is embedded in a larger byte source
    data.extend_from_slice(&[0xAB; 32]);

    let options = FileReaderOptions {
        footer_offset: Some(end),
        ..Default::default()
    };
    let mut reader = FileReader::try_new(Cursor::new(data), options).unwrap();
    let batch = reader.record_batch_at(0).unwrap();
    assert_eq!(
        batch.arrays()[0],
        PrimitiveArray::<i32>::from_slice([7]).boxed()
    );
}

#[test]
fn expected_schema() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let data = FileBuilder::new(&schema).finish();

    let options = FileReaderOptions {
        expected_schema: Some(Arc::new(schema)),
        ..Default::default()
    };
    assert!(FileReader::try_new(Cursor::new(data.clone()), options).is_ok());

    let other = Schema::from(vec![Field::new("a", DataType::Int64, true)]);
    let options = FileReaderOptions {
        expected_schema: Some(Arc::new(other)),
        ..Default::default()
    };
    let Err(err) = FileReader::try_new(Cursor::new(data), options) else {
        panic!("expected an error");
    };
    assert!(matches!(err, PicoError::SchemaMismatch(_)));
}

#[test]
fn file_too_small() {
    let err = read_file_metadata(&mut Cursor::new(b"ARROW1\0\0".to_vec())).unwrap_err();
    assert!(matches!(err, PicoError::OutOfSpec(_)));
}

#[test]
fn missing_tail_magic() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut data = FileBuilder::new(&schema).finish();
    let len = data.len();
    data[len - 1] = b'!';

    let err = read_file_metadata(&mut Cursor::new(data)).unwrap_err();
    assert!(matches!(err, PicoError::NotArrowFile(_)));
}

#[test]
fn missing_head_magic() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut data = FileBuilder::new(&schema).finish();
    data[0] = b'!';

    let err = read_file_metadata(&mut Cursor::new(data)).unwrap_err();
    assert!(matches!(err, PicoError::NotArrowFile(_)));
}

#[test]
fn feather_v1_is_rejected() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut data = FileBuilder::new(&schema).finish();
    data[..4].copy_from_slice(b"FEA1");

    let err = read_file_metadata(&mut Cursor::new(data)).unwrap_err();
    assert!(matches!(err, PicoError::Unsupported(_)));
}

#[test]
fn zero_footer_length() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut data = FileBuilder::new(&schema).finish();
    let len = data.len();
    data[len - 10..len - 6].copy_from_slice(&0i32.to_le_bytes());

    let err = read_file_metadata(&mut Cursor::new(data)).unwrap_err();
    assert!(matches!(err, PicoError::OutOfSpec(_)));
}

#[test]
fn oversized_footer_length() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut data = FileBuilder::new(&schema).finish();
    let len = data.len();
    data[len - 10..len - 6].copy_from_slice(&i32::MAX.to_le_bytes());

    let err = read_file_metadata(&mut Cursor::new(data)).unwrap_err();
    assert!(matches!(err, PicoError::OutOfSpec(_)));
}

#[test]
fn misaligned_block() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(1, &[(1, 0)], &[vec![], le_bytes(&[1i32])], None);
    builder.record_blocks[0].offset += 4;
    let data = builder.finish();

    let err = open(data).record_batch_at(0).unwrap_err();
    assert!(matches!(err, PicoError::Misaligned(_)));
}

#[test]
fn body_length_mismatch() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(1, &[(1, 0)], &[vec![], le_bytes(&[1i32])], None);
    builder.record_blocks[0].body_length += 8;
    let data = builder.finish();

    let err = open(data).record_batch_at(0).unwrap_err();
    assert!(matches!(err, PicoError::OutOfSpec(_)));
}

#[test]
fn unexpected_message_type() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(1, &[(1, 0)], &[vec![], le_bytes(&[1i32])], None);
    // point the record block at the schema message at the head of the file
    builder.record_blocks[0] = ipc::Block {
        offset: 8,
        meta_data_length: 16,
        body_length: 0,
    };
    let data = builder.finish();

    let err = open(data).record_batch_at(0).unwrap_err();
    assert!(matches!(err, PicoError::OutOfSpec(_)));
}

#[test]
fn missing_field_nodes() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(3, &[], &[vec![], le_bytes(&[1i32, 2, 3])], None);
    let data = builder.finish();

    let err = open(data).record_batch_at(0).unwrap_err();
    assert!(matches!(err, PicoError::OutOfSpec(_)));
}

#[test]
fn missing_buffers() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(3, &[(3, 0)], &[], None);
    let data = builder.finish();

    let err = open(data).record_batch_at(0).unwrap_err();
    assert!(matches!(err, PicoError::OutOfSpec(_)));
}

#[test]
fn non_monotonic_offsets() {
    let schema = Schema::from(vec![Field::new("a", DataType::Utf8, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(
        2,
        &[(2, 0)],
        &[vec![], le_bytes(&[0i32, 3, 1]), b"abc".to_vec()],
        None,
    );
    let data = builder.finish();

    let err = open(data).record_batch_at(0).unwrap_err();
    assert!(matches!(err, PicoError::OutOfSpec(_)));
}

#[test]
fn invalid_utf8() {
    let schema = Schema::from(vec![Field::new("a", DataType::Utf8, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(
        1,
        &[(1, 0)],
        &[vec![], le_bytes(&[0i32, 2]), vec![0xFF, 0xFE]],
        None,
    );
    let data = builder.finish();

    let err = open(data).record_batch_at(0).unwrap_err();
    assert!(matches!(err, PicoError::OutOfSpec(_)));
}

#[test]
fn union_is_unsupported() {
    let data_type = DataType::Union(
        vec![Field::new("i", DataType::Int32, true)],
        None,
        UnionMode::Sparse,
    );
    let schema = Schema::from(vec![Field::new("u", data_type, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(1, &[(1, 0), (1, 0)], &[vec![], vec![]], None);
    let data = builder.finish();

    let err = open(data).record_batch_at(0).unwrap_err();
    assert!(matches!(err, PicoError::Unsupported(_)));
}

fn dictionary_field() -> ipc::Field {
    ipc::Field {
        name: Some("d".to_string()),
        nullable: true,
        type_: Some(ipc::Type::Utf8(Box::new(ipc::Utf8 {}))),
        dictionary: Some(Box::new(ipc::DictionaryEncoding {
            id: 42,
            index_type: Some(Box::new(ipc::Int {
                bit_width: 32,
                is_signed: true,
            })),
            is_ordered: false,
            dictionary_kind: ipc::DictionaryKind::DenseArray,
        })),
        children: Some(vec![]),
        custom_metadata: None,
    }
}

#[test]
fn dictionary_section_is_unsupported_at_open() {
    let mut builder = FileBuilder::from_ipc_fields(vec![dictionary_field()]);
    builder.dictionary_batch(
        42,
        3,
        &[(3, 0)],
        &[vec![], le_bytes(&[0i32, 1, 2, 3]), b"abc".to_vec()],
    );
    builder.record_batch(3, &[(3, 0)], &[vec![], le_bytes(&[0i32, 1, 2])], None);
    let data = builder.finish();

    let Err(err) = FileReader::try_new(Cursor::new(data), Default::default()) else {
        panic!("expected an error");
    };
    assert!(matches!(err, PicoError::Unsupported(_)));
}

#[test]
fn dictionary_column_is_unsupported() {
    // no dictionary blocks: the file opens, but the column cannot be loaded
    let mut builder = FileBuilder::from_ipc_fields(vec![dictionary_field()]);
    builder.record_batch(3, &[(3, 0)], &[vec![], le_bytes(&[0i32, 1, 2])], None);
    let data = builder.finish();

    let mut reader = open(data);
    assert_eq!(reader.num_dictionaries(), 0);
    let err = reader.record_batch_at(0).unwrap_err();
    assert!(matches!(err, PicoError::Unsupported(_)));
}

fn nested_struct_schema(depth: usize) -> Schema {
    let mut data_type = DataType::Int32;
    for _ in 0..depth {
        data_type = DataType::Struct(vec![Field::new("c", data_type, true)]);
    }
    Schema::from(vec![Field::new("a", data_type, true)])
}

#[test]
fn nesting_at_the_limit_is_read() {
    let schema = nested_struct_schema(64);
    let mut builder = FileBuilder::new(&schema);
    let nodes = vec![(0i64, 0i64); 65];
    let buffers = vec![vec![]; 66];
    builder.record_batch(0, &nodes, &buffers, None);
    let data = builder.finish();

    let batch = open(data).record_batch_at(0).unwrap();
    assert_eq!(batch.len(), 0);
}

#[test]
fn nesting_too_deep() {
    let schema = nested_struct_schema(65);
    let mut builder = FileBuilder::new(&schema);
    let nodes = vec![(0i64, 0i64); 66];
    let buffers = vec![vec![]; 67];
    builder.record_batch(0, &nodes, &buffers, None);
    let data = builder.finish();

    let err = open(data).record_batch_at(0).unwrap_err();
    assert!(matches!(err, PicoError::NestingTooDeep(_)));
}

#[test]
fn metadata_reports_size_and_counts() {
    let schema = Schema::from(vec![Field::new("a", DataType::Int32, true)]);
    let mut builder = FileBuilder::new(&schema);
    builder.record_batch(1, &[(1, 0)], &[vec![], le_bytes(&[1i32])], None);
    let data = builder.finish();
    let size = data.len() as u64;

    let metadata = read_file_metadata(&mut Cursor::new(data)).unwrap();
    assert_eq!(metadata.size, size);
    assert_eq!(metadata.num_record_batches(), 1);
    assert_eq!(metadata.num_dictionaries(), 0);
}
