use arrow_format::ipc;
use pico_error::{pico_bail, pico_err, PicoResult};

use super::super::{IpcField, IpcSchema};
use super::OutOfSpecKind;
use crate::datatypes::{
    get_extension, DataType, Extension, Field, IntegerType, IntervalUnit, Metadata, Schema,
    TimeUnit, UnionMode,
};

fn try_unzip_vec<A, B, I: Iterator<Item = PicoResult<(A, B)>>>(
    iter: I,
) -> PicoResult<(Vec<A>, Vec<B>)> {
    let mut a = vec![];
    let mut b = vec![];
    for maybe_item in iter {
        let (a_i, b_i) = maybe_item?;
        a.push(a_i);
        b.push(b_i);
    }
    Ok((a, b))
}

fn deserialize_field(ipc_field: ipc::FieldRef) -> PicoResult<(Field, IpcField)> {
    let metadata = read_metadata(&ipc_field)?;

    let extension = get_extension(&metadata);

    let (data_type, ipc_field_) = get_data_type(ipc_field, extension, true)?;

    let field = Field::new(
        ipc_field
            .name()?
            .ok_or_else(|| pico_err!(oos = "every field in IPC must have a name"))?,
        data_type,
        ipc_field.nullable()?,
    )
    .with_metadata(metadata);

    Ok((field, ipc_field_))
}

fn read_metadata(field: &ipc::FieldRef) -> PicoResult<Metadata> {
    Ok(if let Some(list) = field.custom_metadata()? {
        let mut metadata_map = Metadata::new();
        for kv in list {
            let kv = kv?;
            if let (Some(k), Some(v)) = (kv.key()?, kv.value()?) {
                metadata_map.insert(k.to_string(), v.to_string());
            }
        }
        metadata_map
    } else {
        Metadata::default()
    })
}

fn deserialize_integer(int: ipc::IntRef) -> PicoResult<IntegerType> {
    Ok(match (int.bit_width()?, int.is_signed()?) {
        (8, true) => IntegerType::Int8,
        (8, false) => IntegerType::UInt8,
        (16, true) => IntegerType::Int16,
        (16, false) => IntegerType::UInt16,
        (32, true) => IntegerType::Int32,
        (32, false) => IntegerType::UInt32,
        (64, true) => IntegerType::Int64,
        (64, false) => IntegerType::UInt64,
        _ => pico_bail!(oos = "IPC: indexes can only be 8, 16, 32 or 64 bits wide"),
    })
}

fn deserialize_timeunit(time_unit: ipc::TimeUnit) -> TimeUnit {
    match time_unit {
        ipc::TimeUnit::Second => TimeUnit::Second,
        ipc::TimeUnit::Millisecond => TimeUnit::Millisecond,
        ipc::TimeUnit::Microsecond => TimeUnit::Microsecond,
        ipc::TimeUnit::Nanosecond => TimeUnit::Nanosecond,
    }
}

fn deserialize_children(
    field: ipc::FieldRef,
) -> PicoResult<(Vec<Field>, Vec<IpcField>)> {
    let children = field
        .children()?
        .ok_or_else(|| pico_err!(oos = "IPC: nested fields must contain children"))?;

    try_unzip_vec(children.iter().map(|child| {
        let child = child?;
        deserialize_field(child)
    }))
}

/// Converts the type declared by an IPC field into a [`DataType`] and the
/// corresponding [`IpcField`] tree (dictionary ids per nesting level).
fn get_data_type(
    field: ipc::FieldRef,
    extension: Extension,
    may_be_dictionary: bool,
) -> PicoResult<(DataType, IpcField)> {
    if let Some(dictionary) = field.dictionary()? {
        if may_be_dictionary {
            let int = dictionary
                .index_type()?
                .ok_or_else(|| pico_err!(oos = "indexes must be a type"))?;
            let index_type = deserialize_integer(int)?;
            let (inner, mut ipc_field) = get_data_type(field, extension, false)?;
            ipc_field.dictionary_id = Some(dictionary.id()?);
            return Ok((
                DataType::Dictionary(index_type, Box::new(inner), dictionary.is_ordered()?),
                ipc_field,
            ));
        }
    }

    if let Some(extension) = extension {
        let (name, metadata) = extension;
        let (data_type, fields) = get_data_type(field, None, false)?;
        return Ok((
            DataType::Extension(name, Box::new(data_type), metadata),
            fields,
        ));
    }

    let type_ = field
        .type_()?
        .ok_or_else(|| pico_err!(oos = "IPC: every field must have a type"))?;

    use ipc::TypeRef::*;
    Ok(match type_ {
        Null(_) => (DataType::Null, IpcField::default()),
        Bool(_) => (DataType::Boolean, IpcField::default()),
        Int(int) => {
            let data_type = deserialize_integer(int)?.into();
            (data_type, IpcField::default())
        },
        Binary(_) => (DataType::Binary, IpcField::default()),
        LargeBinary(_) => (DataType::LargeBinary, IpcField::default()),
        Utf8(_) => (DataType::Utf8, IpcField::default()),
        LargeUtf8(_) => (DataType::LargeUtf8, IpcField::default()),
        FixedSizeBinary(fixed) => (
            DataType::FixedSizeBinary(
                fixed
                    .byte_width()?
                    .try_into()
                    .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?,
            ),
            IpcField::default(),
        ),
        FloatingPoint(float) => {
            let data_type = match float.precision()? {
                ipc::Precision::Half => DataType::Float16,
                ipc::Precision::Single => DataType::Float32,
                ipc::Precision::Double => DataType::Float64,
            };
            (data_type, IpcField::default())
        },
        Date(date) => {
            let data_type = match date.unit()? {
                ipc::DateUnit::Day => DataType::Date32,
                ipc::DateUnit::Millisecond => DataType::Date64,
            };
            (data_type, IpcField::default())
        },
        Time(time) => {
            let unit = deserialize_timeunit(time.unit()?);
            let data_type = match (time.bit_width()?, unit) {
                (32, TimeUnit::Second) => DataType::Time32(TimeUnit::Second),
                (32, TimeUnit::Millisecond) => DataType::Time32(TimeUnit::Millisecond),
                (64, TimeUnit::Microsecond) => DataType::Time64(TimeUnit::Microsecond),
                (64, TimeUnit::Nanosecond) => DataType::Time64(TimeUnit::Nanosecond),
                (bits, precision) => {
                    pico_bail!(oos = format!(
                        "time type with bit width of {bits} and unit of {precision:?} is not supported"
                    ))
                },
            };
            (data_type, IpcField::default())
        },
        Timestamp(timestamp) => {
            let timezone = timestamp.timezone()?.map(|tz| tz.to_string());
            let time_unit = deserialize_timeunit(timestamp.unit()?);
            (
                DataType::Timestamp(time_unit, timezone),
                IpcField::default(),
            )
        },
        Interval(interval) => {
            let data_type = match interval.unit()? {
                ipc::IntervalUnit::YearMonth => DataType::Interval(IntervalUnit::YearMonth),
                ipc::IntervalUnit::DayTime => DataType::Interval(IntervalUnit::DayTime),
                ipc::IntervalUnit::MonthDayNano => {
                    DataType::Interval(IntervalUnit::MonthDayNano)
                },
            };
            (data_type, IpcField::default())
        },
        Duration(duration) => {
            let time_unit = deserialize_timeunit(duration.unit()?);
            (DataType::Duration(time_unit), IpcField::default())
        },
        Decimal(decimal) => {
            let bit_width = decimal.bit_width()?;
            if bit_width != 128 {
                pico_bail!(Unsupported: "decimals of bit width {bit_width} are not supported, only 128-bit decimals are")
            }
            let data_type = DataType::Decimal(
                decimal
                    .precision()?
                    .try_into()
                    .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?,
                decimal
                    .scale()?
                    .try_into()
                    .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?,
            );
            (data_type, IpcField::default())
        },
        List(_) => {
            let (mut children, mut ipc_children) = deserialize_children(field)?;
            if children.len() != 1 {
                pico_bail!(oos = "a list must have a single child field")
            }
            (
                DataType::List(Box::new(children.pop().unwrap())),
                IpcField {
                    fields: vec![ipc_children.pop().unwrap()],
                    dictionary_id: None,
                },
            )
        },
        LargeList(_) => {
            let (mut children, mut ipc_children) = deserialize_children(field)?;
            if children.len() != 1 {
                pico_bail!(oos = "a large list must have a single child field")
            }
            (
                DataType::LargeList(Box::new(children.pop().unwrap())),
                IpcField {
                    fields: vec![ipc_children.pop().unwrap()],
                    dictionary_id: None,
                },
            )
        },
        FixedSizeList(fixed) => {
            let (mut children, mut ipc_children) = deserialize_children(field)?;
            if children.len() != 1 {
                pico_bail!(oos = "a fixed-size list must have a single child field")
            }
            let size = fixed
                .list_size()?
                .try_into()
                .map_err(|_| pico_err!(oos = OutOfSpecKind::UnexpectedNegativeInteger))?;
            (
                DataType::FixedSizeList(Box::new(children.pop().unwrap()), size),
                IpcField {
                    fields: vec![ipc_children.pop().unwrap()],
                    dictionary_id: None,
                },
            )
        },
        Struct(_) => {
            let (children, ipc_children) = deserialize_children(field)?;
            (
                DataType::Struct(children),
                IpcField {
                    fields: ipc_children,
                    dictionary_id: None,
                },
            )
        },
        Map(map) => {
            let (mut children, mut ipc_children) = deserialize_children(field)?;
            if children.len() != 1 {
                pico_bail!(oos = "a map must have a single child field")
            }
            let data_type = DataType::Map(Box::new(children.pop().unwrap()), map.keys_sorted()?);
            (
                data_type,
                IpcField {
                    fields: vec![ipc_children.pop().unwrap()],
                    dictionary_id: None,
                },
            )
        },
        Union(union) => {
            let mode = UnionMode::sparse(union.mode()? == ipc::UnionMode::Sparse);
            let ids = union.type_ids()?.map(|x| x.iter().collect());
            let (children, ipc_children) = deserialize_children(field)?;
            (
                DataType::Union(children, ids, mode),
                IpcField {
                    fields: ipc_children,
                    dictionary_id: None,
                },
            )
        },
    })
}

/// Deserializes the flatbuffer schema into a [`Schema`] and its
/// [`IpcSchema`] companion.
pub fn fb_to_schema(schema: ipc::SchemaRef) -> PicoResult<(Schema, IpcSchema)> {
    let fields = schema
        .fields()?
        .ok_or_else(|| pico_err!(oos = OutOfSpecKind::MissingSchema))?;

    let (fields, ipc_fields) = try_unzip_vec(fields.iter().map(|field| {
        let field = field?;
        deserialize_field(field)
    }))?;

    let is_little_endian = match schema.endianness()? {
        ipc::Endianness::Little => true,
        ipc::Endianness::Big => false,
    };

    let mut metadata = Metadata::default();
    if let Some(md_fields) = schema.custom_metadata()? {
        for kv in md_fields {
            let kv = kv?;
            if let (Some(k), Some(v)) = (kv.key()?, kv.value()?) {
                metadata.insert(k.to_string(), v.to_string());
            }
        }
    }

    Ok((
        Schema { fields, metadata },
        IpcSchema {
            fields: ipc_fields,
            is_little_endian,
        },
    ))
}
